use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::charts::all_charts;
use crate::config::initial_state;
use crate::errors::AppResult;
use crate::funnel::FunnelBreakdown;
use crate::models::{
    CalculatorSnapshot, ChartBundle, FieldKey, FieldUpdate, QuotaField, RateField,
};
use crate::report::{format_number, render_charts, render_report, MAX_CHART_WIDTH};
use crate::session::InteractiveSession;
use crate::state::CalculatorState;
use crate::telemetry::{init_tracing, LogOptions};

const DEFAULT_CHART_WIDTH: u16 = 40;

#[derive(Debug, Parser)]
#[command(
    name = "sales-activity",
    about = "Turn a monthly CW MRR quota into daily call, email and meeting targets",
    version
)]
pub struct Cli {
    /// Tracing filter directive, e.g. `debug` (overrides RUST_LOG).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Write JSON logs to a daily rolling file in this directory instead of stderr.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute targets once and print them.
    Calculate(CalculateArgs),

    /// Print chart data for the current inputs as JSON.
    Charts(InputArgs),

    /// Edit inputs line by line, re-rendering after every change.
    Interactive(InteractiveArgs),

    /// List every input field with its label and default.
    Fields,

    /// Open the desktop window.
    #[cfg(feature = "desktop")]
    Desktop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One flag per input field. Values are raw text and go through the same
/// coercion as an interactive edit.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldArgs {
    #[arg(long, alias = "pipe-build", allow_hyphen_values = true)]
    pub pipe_build_target: Option<String>,
    #[arg(long, alias = "meetings-held", allow_hyphen_values = true)]
    pub meetings_held_target: Option<String>,
    #[arg(long, alias = "cw-mrr", allow_hyphen_values = true)]
    pub cw_mrr_target: Option<String>,
    #[arg(long, alias = "connected-to-meeting", allow_hyphen_values = true)]
    pub connected_to_meeting_rate: Option<String>,
    #[arg(long, alias = "meeting-attendance", allow_hyphen_values = true)]
    pub meeting_attendance_rate: Option<String>,
    #[arg(long, alias = "meeting-to-mrr", allow_hyphen_values = true)]
    pub meeting_to_mrr_rate: Option<String>,
    #[arg(long, alias = "mrr-to-cw", allow_hyphen_values = true)]
    pub mrr_to_cw_rate: Option<String>,
    #[arg(long, alias = "email-to-meeting", allow_hyphen_values = true)]
    pub email_to_meeting_rate: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub avg_deal_size: Option<String>,
}

impl FieldArgs {
    pub fn updates(&self) -> Vec<FieldUpdate> {
        let quotas = [
            (QuotaField::PipeBuildTarget, &self.pipe_build_target),
            (QuotaField::MeetingsHeldTarget, &self.meetings_held_target),
            (QuotaField::CwMrrTarget, &self.cw_mrr_target),
        ]
        .into_iter()
        .map(|(field, value)| (FieldKey::Quota(field), value));

        let rates = [
            (RateField::ConnectedToMeetingRate, &self.connected_to_meeting_rate),
            (RateField::MeetingAttendanceRate, &self.meeting_attendance_rate),
            (RateField::MeetingToMrrRate, &self.meeting_to_mrr_rate),
            (RateField::MrrToCwRate, &self.mrr_to_cw_rate),
            (RateField::EmailToMeetingRate, &self.email_to_meeting_rate),
            (RateField::AvgDealSize, &self.avg_deal_size),
        ]
        .into_iter()
        .map(|(field, value)| (FieldKey::Rate(field), value));

        quotas
            .chain(rates)
            .filter_map(|(field, value)| {
                value.as_ref().map(|value| FieldUpdate {
                    field,
                    value: value.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// YAML or JSON file with starting quotas and rates.
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

impl InputArgs {
    pub fn build_state(&self) -> AppResult<CalculatorState> {
        let mut state = initial_state(self.scenario.as_deref())?;
        for update in self.fields.updates() {
            state.apply(&update);
        }
        Ok(state)
    }
}

#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Include the three charts in the output.
    #[arg(long)]
    pub charts: bool,

    /// Width of the longest bar, in columns.
    #[arg(
        long,
        default_value_t = DEFAULT_CHART_WIDTH,
        value_parser = clap::value_parser!(u16).range(1..=MAX_CHART_WIDTH as i64)
    )]
    pub chart_width: u16,
}

#[derive(Debug, Clone, Args)]
pub struct InteractiveArgs {
    /// YAML or JSON file with starting quotas and rates.
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// Width of the longest bar, in columns.
    #[arg(
        long,
        default_value_t = DEFAULT_CHART_WIDTH,
        value_parser = clap::value_parser!(u16).range(1..=MAX_CHART_WIDTH as i64)
    )]
    pub chart_width: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationOutput {
    #[serde(flatten)]
    pub snapshot: CalculatorSnapshot,
    pub breakdown: FunnelBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charts: Option<ChartBundle>,
}

impl Cli {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            filter: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            ..LogOptions::default()
        }
    }
}

// The desktop shell sets up its own file logging once the app data dir is known.
#[cfg(feature = "desktop")]
fn defers_tracing(command: &Commands) -> bool {
    matches!(command, Commands::Desktop)
}

#[cfg(not(feature = "desktop"))]
fn defers_tracing(_command: &Commands) -> bool {
    false
}

pub fn run_from_env() -> AppResult<()> {
    let cli = Cli::parse();
    if !defers_tracing(&cli.command) {
        init_tracing(&cli.log_options())?;
    }
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run<W: Write>(cli: Cli, out: &mut W) -> AppResult<()> {
    #[cfg(feature = "desktop")]
    let log_options = cli.log_options();
    match cli.command {
        Commands::Calculate(args) => run_calculate(&args, out),
        Commands::Charts(args) => run_charts(&args, out),
        Commands::Interactive(args) => run_interactive(&args, out),
        Commands::Fields => run_fields(out),
        #[cfg(feature = "desktop")]
        Commands::Desktop => crate::commands::run_desktop(log_options),
    }
}

fn run_calculate<W: Write>(args: &CalculateArgs, out: &mut W) -> AppResult<()> {
    let state = args.input.build_state()?;
    let snapshot = state.snapshot();
    let charts = args.charts.then(|| all_charts(&snapshot));

    match args.format {
        OutputFormat::Text => {
            write!(out, "{}", render_report(&snapshot))?;
            if let Some(bundle) = charts.as_ref() {
                writeln!(out)?;
                write!(out, "{}", render_charts(bundle, usize::from(args.chart_width)))?;
            }
        }
        OutputFormat::Json => {
            let output = CalculationOutput {
                snapshot,
                breakdown: FunnelBreakdown::compute(state.quotas(), state.rates()),
                charts,
            };
            serde_json::to_writer_pretty(&mut *out, &output)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn run_charts<W: Write>(args: &InputArgs, out: &mut W) -> AppResult<()> {
    let state = args.build_state()?;
    let bundle = all_charts(&state.snapshot());
    serde_json::to_writer_pretty(&mut *out, &bundle)?;
    writeln!(out)?;
    Ok(())
}

fn run_interactive<W: Write>(args: &InteractiveArgs, out: &mut W) -> AppResult<()> {
    let state = initial_state(args.scenario.as_deref())?;
    let stdin = std::io::stdin();
    let mut session = InteractiveSession::new(state, out, usize::from(args.chart_width));
    session.run(stdin.lock())
}

fn run_fields<W: Write>(out: &mut W) -> AppResult<()> {
    let defaults = CalculatorState::default();
    for field in FieldKey::all() {
        writeln!(
            out,
            "{:<24} {:<20} {:<32} {}",
            field.as_str(),
            field.short_name(),
            field.label(),
            format_number(defaults.value(field))
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Commands, OutputFormat};
    use clap::Parser;

    fn run_args(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        run(cli, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_field_flags_and_aliases() {
        let cli = Cli::try_parse_from([
            "sales-activity",
            "calculate",
            "--cw-mrr",
            "2520",
            "--avg-deal-size",
            "-3",
            "--format",
            "json",
        ])
        .unwrap();
        let Commands::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.input.fields.cw_mrr_target.as_deref(), Some("2520"));
        assert_eq!(args.input.fields.updates().len(), 2);

        let state = args.input.build_state().unwrap();
        assert_eq!(state.quotas().cw_mrr_target, 2520.0);
        assert_eq!(state.rates().avg_deal_size, 0.0);
    }

    #[test]
    fn calculate_prints_text_report() {
        let output = run_args(&["sales-activity", "calculate"]);
        assert!(output.contains("Connected Calls: 7"));
        assert!(output.contains("Booked Meetings: 1.33"));
        assert!(!output.contains("Conversion Funnel"));

        let output = run_args(&["sales-activity", "calculate", "--charts", "--chart-width", "10"]);
        assert!(output.contains("Conversion Funnel"));
    }

    #[test]
    fn chart_width_is_bounded() {
        for width in ["0", "401", "10000000000", "-5"] {
            let parsed = Cli::try_parse_from(["sales-activity", "calculate", "--charts", "--chart-width", width]);
            assert!(parsed.is_err(), "width {width} should be rejected");
        }
        let parsed = Cli::try_parse_from(["sales-activity", "interactive", "--chart-width", "10000000000"]);
        assert!(parsed.is_err());

        let output = run_args(&["sales-activity", "calculate", "--charts", "--chart-width", "400"]);
        assert!(output.contains("Conversion Funnel"));
    }

    #[test]
    fn calculate_json_includes_breakdown() {
        let output = run_args(&["sales-activity", "calculate", "--format", "json", "--charts"]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metrics"]["daily"]["emails"], serde_json::json!(134.0));
        assert_eq!(value["breakdown"]["requiredEmails"], serde_json::json!(2800.0));
        assert_eq!(value["quotas"]["cwMrrTarget"], serde_json::json!(1260.0));
        assert!(value["charts"]["funnel"]["stages"].is_array());
    }

    #[test]
    fn json_spells_out_infinity_and_nan() {
        let output = run_args(&["sales-activity", "calculate", "--format", "json", "--mrr-to-cw", "0"]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metrics"]["monthly"]["deals"], serde_json::json!("Infinity"));
        assert_eq!(value["breakdown"]["requiredMrr"], serde_json::json!("Infinity"));
        assert!(value.get("charts").is_none());

        let output = run_args(&[
            "sales-activity",
            "calculate",
            "--format",
            "json",
            "--cw-mrr",
            "0",
            "--mrr-to-cw",
            "0",
        ]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metrics"]["monthly"]["deals"], serde_json::json!("NaN"));
        assert_eq!(value["metrics"]["daily"]["emails"], serde_json::json!("NaN"));
    }

    #[test]
    fn fields_lists_defaults() {
        let output = run_args(&["sales-activity", "fields"]);
        assert_eq!(output.lines().count(), 9);
        assert!(output.contains("emailToMeetingRate"));
        assert!(output.contains("Average Deal Size ($)"));
    }
}
