use crate::charts::all_charts;
use crate::errors::{AppError, AppResult};
use crate::models::{FieldKey, FieldUpdate};
use crate::report::{format_number, render_charts, render_inputs, render_report};
use crate::state::CalculatorState;
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  set <field> <value>   edit a quota or rate and recompute
  show                  print the daily and monthly targets
  inputs                print the current quotas and rates
  charts                draw the activity, funnel and quota charts
  reset                 restore the default inputs
  help                  show this message
  quit | exit           end the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Set(FieldUpdate),
    Show,
    Inputs,
    Charts,
    Reset,
    Help,
    Quit,
    Empty,
}

impl SessionCommand {
    pub fn parse(line: &str) -> AppResult<Self> {
        let trimmed = line.trim();
        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (trimmed, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Empty),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err(AppError::Input("Usage: set <field> <value>".to_string()));
                }
                Ok(Self::Set(FieldUpdate {
                    field: field.parse::<FieldKey>()?,
                    value: value.to_string(),
                }))
            }
            "show" => Ok(Self::Show),
            "inputs" => Ok(Self::Inputs),
            "charts" => Ok(Self::Charts),
            "reset" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(AppError::Input(format!("Unknown command '{}'. Type 'help'.", other))),
        }
    }
}

/// Line-driven calculator session: every edit re-renders the full report.
pub struct InteractiveSession<W: Write> {
    state: CalculatorState,
    out: W,
    chart_width: usize,
}

impl<W: Write> InteractiveSession<W> {
    pub fn new(state: CalculatorState, out: W, chart_width: usize) -> Self {
        Self {
            state,
            out,
            chart_width,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run<R: BufRead>(&mut self, input: R) -> AppResult<()> {
        tracing::info!("interactive session started");
        writeln!(self.out, "Sales Activity Calculator. Type 'help' for commands.")?;
        self.write_report()?;

        for line in input.lines() {
            let line = line?;
            match SessionCommand::parse(&line) {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.execute(command)?,
                Err(error) => {
                    tracing::warn!(error = %error, "rejected session command");
                    writeln!(self.out, "error: {}", error)?;
                }
            }
            self.out.flush()?;
        }

        tracing::info!("interactive session ended");
        Ok(())
    }

    pub fn execute(&mut self, command: SessionCommand) -> AppResult<()> {
        match command {
            SessionCommand::Set(update) => {
                self.state.apply(&update);
                writeln!(
                    self.out,
                    "{} = {}",
                    update.field.as_str(),
                    format_number(self.state.value(update.field))
                )?;
                self.write_report()
            }
            SessionCommand::Show => self.write_report(),
            SessionCommand::Inputs => {
                write!(self.out, "{}", render_inputs(&self.state.snapshot()))?;
                Ok(())
            }
            SessionCommand::Charts => {
                let bundle = all_charts(&self.state.snapshot());
                write!(self.out, "{}", render_charts(&bundle, self.chart_width))?;
                Ok(())
            }
            SessionCommand::Reset => {
                self.state.reset();
                self.write_report()
            }
            SessionCommand::Help => {
                write!(self.out, "{}", HELP)?;
                Ok(())
            }
            SessionCommand::Quit | SessionCommand::Empty => Ok(()),
        }
    }

    fn write_report(&mut self) -> AppResult<()> {
        writeln!(self.out)?;
        write!(self.out, "{}", render_report(&self.state.snapshot()))?;
        writeln!(self.out)?;
        Ok(())
    }
}
