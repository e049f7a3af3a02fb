use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotas {
    pub pipe_build_target: f64,
    pub meetings_held_target: f64,
    pub cw_mrr_target: f64,
}

impl Default for Quotas {
    fn default() -> Self {
        Self {
            pipe_build_target: 4200.0,
            meetings_held_target: 20.0,
            cw_mrr_target: 1260.0,
        }
    }
}

impl Quotas {
    pub fn get(&self, field: QuotaField) -> f64 {
        match field {
            QuotaField::PipeBuildTarget => self.pipe_build_target,
            QuotaField::MeetingsHeldTarget => self.meetings_held_target,
            QuotaField::CwMrrTarget => self.cw_mrr_target,
        }
    }

    pub fn set(&mut self, field: QuotaField, value: f64) {
        let slot = match field {
            QuotaField::PipeBuildTarget => &mut self.pipe_build_target,
            QuotaField::MeetingsHeldTarget => &mut self.meetings_held_target,
            QuotaField::CwMrrTarget => &mut self.cw_mrr_target,
        };
        *slot = value;
    }
}

/// Conversion percentages in the 0-100 range, plus the average deal size in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    pub connected_to_meeting_rate: f64,
    pub meeting_attendance_rate: f64,
    pub meeting_to_mrr_rate: f64,
    pub mrr_to_cw_rate: f64,
    pub email_to_meeting_rate: f64,
    pub avg_deal_size: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            connected_to_meeting_rate: 20.0,
            meeting_attendance_rate: 80.0,
            meeting_to_mrr_rate: 80.0,
            mrr_to_cw_rate: 50.0,
            email_to_meeting_rate: 1.0,
            avg_deal_size: 149.0,
        }
    }
}

impl Rates {
    pub fn get(&self, field: RateField) -> f64 {
        match field {
            RateField::ConnectedToMeetingRate => self.connected_to_meeting_rate,
            RateField::MeetingAttendanceRate => self.meeting_attendance_rate,
            RateField::MeetingToMrrRate => self.meeting_to_mrr_rate,
            RateField::MrrToCwRate => self.mrr_to_cw_rate,
            RateField::EmailToMeetingRate => self.email_to_meeting_rate,
            RateField::AvgDealSize => self.avg_deal_size,
        }
    }

    pub fn set(&mut self, field: RateField, value: f64) {
        let slot = match field {
            RateField::ConnectedToMeetingRate => &mut self.connected_to_meeting_rate,
            RateField::MeetingAttendanceRate => &mut self.meeting_attendance_rate,
            RateField::MeetingToMrrRate => &mut self.meeting_to_mrr_rate,
            RateField::MrrToCwRate => &mut self.mrr_to_cw_rate,
            RateField::EmailToMeetingRate => &mut self.email_to_meeting_rate,
            RateField::AvgDealSize => &mut self.avg_deal_size,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuotaField {
    PipeBuildTarget,
    MeetingsHeldTarget,
    CwMrrTarget,
}

impl QuotaField {
    pub const ALL: [QuotaField; 3] = [Self::PipeBuildTarget, Self::MeetingsHeldTarget, Self::CwMrrTarget];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PipeBuildTarget => "pipeBuildTarget",
            Self::MeetingsHeldTarget => "meetingsHeldTarget",
            Self::CwMrrTarget => "cwMrrTarget",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::PipeBuildTarget => "pipeBuild",
            Self::MeetingsHeldTarget => "meetingsHeld",
            Self::CwMrrTarget => "cwMrr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PipeBuildTarget => "Pipe Build Target ($)",
            Self::MeetingsHeldTarget => "Meetings Held Target",
            Self::CwMrrTarget => "CW MRR Target ($)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateField {
    ConnectedToMeetingRate,
    MeetingAttendanceRate,
    MeetingToMrrRate,
    MrrToCwRate,
    EmailToMeetingRate,
    AvgDealSize,
}

impl RateField {
    pub const ALL: [RateField; 6] = [
        Self::ConnectedToMeetingRate,
        Self::MeetingAttendanceRate,
        Self::MeetingToMrrRate,
        Self::MrrToCwRate,
        Self::EmailToMeetingRate,
        Self::AvgDealSize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectedToMeetingRate => "connectedToMeetingRate",
            Self::MeetingAttendanceRate => "meetingAttendanceRate",
            Self::MeetingToMrrRate => "meetingToMrrRate",
            Self::MrrToCwRate => "mrrToCwRate",
            Self::EmailToMeetingRate => "emailToMeetingRate",
            Self::AvgDealSize => "avgDealSize",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::ConnectedToMeetingRate => "connectedToMeeting",
            Self::MeetingAttendanceRate => "meetingAttendance",
            Self::MeetingToMrrRate => "meetingToMrr",
            Self::MrrToCwRate => "mrrToCw",
            Self::EmailToMeetingRate => "emailToMeeting",
            Self::AvgDealSize => "avgDealSize",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ConnectedToMeetingRate => "Connected Call to Meeting (%)",
            Self::MeetingAttendanceRate => "Meeting Attendance (%)",
            Self::MeetingToMrrRate => "Meeting to MRR (%)",
            Self::MrrToCwRate => "MRR to CW (%)",
            Self::EmailToMeetingRate => "Email to Meeting (%)",
            Self::AvgDealSize => "Average Deal Size ($)",
        }
    }
}

/// Any editable input field, quota or rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Quota(QuotaField),
    Rate(RateField),
}

impl FieldKey {
    pub fn all() -> impl Iterator<Item = FieldKey> {
        QuotaField::ALL
            .into_iter()
            .map(FieldKey::Quota)
            .chain(RateField::ALL.into_iter().map(FieldKey::Rate))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quota(field) => field.as_str(),
            Self::Rate(field) => field.as_str(),
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Self::Quota(field) => field.short_name(),
            Self::Rate(field) => field.short_name(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Quota(field) => field.label(),
            Self::Rate(field) => field.label(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_field_name(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("--")
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// Keyed by the case- and separator-insensitive spelling, so `cwMrrTarget`,
// `cw-mrr-target` and `cwMrr` all resolve.
static FIELD_ALIASES: Lazy<HashMap<String, FieldKey>> = Lazy::new(|| {
    let mut aliases = HashMap::new();
    for field in FieldKey::all() {
        aliases.insert(normalize_field_name(field.as_str()), field);
        aliases.insert(normalize_field_name(field.short_name()), field);
    }
    aliases
});

impl FromStr for FieldKey {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FIELD_ALIASES
            .get(&normalize_field_name(raw))
            .copied()
            .ok_or_else(|| AppError::Input(format!("Unknown field '{}'", raw.trim())))
    }
}

/// Computed values can be infinite or NaN after a zero rate. JSON has no
/// literal for either, so they travel as the strings `"Infinity"`,
/// `"-Infinity"` and `"NaN"`; finite values stay plain numbers.
pub mod js_number {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(D::Error::custom(format!("expected a number, got '{other}'"))),
            },
        }
    }
}

/// A raw edit as typed by the user; coercion happens when it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: FieldKey,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTargets {
    #[serde(with = "js_number")]
    pub connected_calls: f64,
    #[serde(with = "js_number")]
    pub emails: f64,
    #[serde(with = "js_number")]
    pub booked_meetings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTargets {
    #[serde(with = "js_number")]
    pub deals: f64,
    #[serde(with = "js_number")]
    pub attended_meetings: f64,
    #[serde(with = "js_number")]
    pub booked_meetings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub daily: DailyTargets,
    pub daily120: DailyTargets,
    pub monthly: MonthlyTargets,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    pub quotas: Quotas,
    pub rates: Rates,
    pub metrics: DerivedMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotaPayload {
    pub field: QuotaField,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatePayload {
    pub field: RateField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub key: String,
    pub label: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivityGroup {
    pub name: String,
    #[serde(with = "js_number")]
    pub connected_calls: f64,
    #[serde(with = "js_number")]
    pub booked_meetings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivityChart {
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub groups: Vec<DailyActivityGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub name: String,
    #[serde(with = "js_number")]
    pub value: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelChart {
    pub title: String,
    pub stages: Vec<FunnelStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    pub fill: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaCompositionChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBundle {
    pub daily_activity: DailyActivityChart,
    pub funnel: FunnelChart,
    pub quota_composition: QuotaCompositionChart,
}
