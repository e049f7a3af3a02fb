use crate::errors::{AppError, AppResult};
use crate::input::sanitize;
use crate::models::{Quotas, Rates};
use crate::state::CalculatorState;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuotaOverrides {
    #[serde(alias = "pipeBuild")]
    pub pipe_build_target: Option<f64>,
    #[serde(alias = "meetingsHeld")]
    pub meetings_held_target: Option<f64>,
    #[serde(alias = "cwMrr")]
    pub cw_mrr_target: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RateOverrides {
    #[serde(alias = "connectedToMeeting")]
    pub connected_to_meeting_rate: Option<f64>,
    #[serde(alias = "meetingAttendance")]
    pub meeting_attendance_rate: Option<f64>,
    #[serde(alias = "meetingToMrr")]
    pub meeting_to_mrr_rate: Option<f64>,
    #[serde(alias = "mrrToCw")]
    pub mrr_to_cw_rate: Option<f64>,
    #[serde(alias = "emailToMeeting")]
    pub email_to_meeting_rate: Option<f64>,
    pub avg_deal_size: Option<f64>,
}

/// Starting inputs for a session. Keys left out keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub quotas: QuotaOverrides,
    #[serde(default)]
    pub rates: RateOverrides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Yaml,
    Json,
}

impl ScenarioFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

impl Scenario {
    pub fn parse(contents: &str, format: ScenarioFormat) -> AppResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        match format {
            ScenarioFormat::Json => serde_json::from_str(contents)
                .map_err(|error| AppError::Config(format!("Invalid JSON scenario: {}", error))),
            ScenarioFormat::Yaml => serde_yaml::from_str(contents)
                .map_err(|error| AppError::Config(format!("Invalid YAML scenario: {}", error))),
        }
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|error| {
            AppError::Config(format!("Failed to read scenario {}: {}", path.display(), error))
        })?;
        let scenario = Self::parse(&contents, ScenarioFormat::from_path(path))?;
        tracing::debug!(path = %path.display(), "scenario loaded");
        Ok(scenario)
    }

    pub fn quotas(&self) -> Quotas {
        let defaults = Quotas::default();
        let overrides = &self.quotas;
        Quotas {
            pipe_build_target: pick(overrides.pipe_build_target, defaults.pipe_build_target),
            meetings_held_target: pick(overrides.meetings_held_target, defaults.meetings_held_target),
            cw_mrr_target: pick(overrides.cw_mrr_target, defaults.cw_mrr_target),
        }
    }

    pub fn rates(&self) -> Rates {
        let defaults = Rates::default();
        let overrides = &self.rates;
        Rates {
            connected_to_meeting_rate: pick(overrides.connected_to_meeting_rate, defaults.connected_to_meeting_rate),
            meeting_attendance_rate: pick(overrides.meeting_attendance_rate, defaults.meeting_attendance_rate),
            meeting_to_mrr_rate: pick(overrides.meeting_to_mrr_rate, defaults.meeting_to_mrr_rate),
            mrr_to_cw_rate: pick(overrides.mrr_to_cw_rate, defaults.mrr_to_cw_rate),
            email_to_meeting_rate: pick(overrides.email_to_meeting_rate, defaults.email_to_meeting_rate),
            avg_deal_size: pick(overrides.avg_deal_size, defaults.avg_deal_size),
        }
    }

    pub fn into_state(self) -> CalculatorState {
        CalculatorState::new(self.quotas(), self.rates())
    }
}

fn pick(value: Option<f64>, default: f64) -> f64 {
    value.map(sanitize).unwrap_or(default)
}

/// Initial state for a session: the scenario at `path` if given, defaults otherwise.
pub fn initial_state(path: Option<&Path>) -> AppResult<CalculatorState> {
    match path {
        Some(path) => Ok(Scenario::load(path)?.into_state()),
        None => Ok(CalculatorState::default()),
    }
}
