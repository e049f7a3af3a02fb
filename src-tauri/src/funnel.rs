//! Backward walk of the sales funnel, from the committed/won MRR target down to
//! the raw activity a rep needs each working day.
//!
//! Zero rates are not guarded: the divisions produce infinity or NaN and those
//! values flow through to the caller unchanged.

use crate::models::{js_number, DailyTargets, DerivedMetrics, MonthlyTargets, Quotas, Rates};
use serde::{Deserialize, Serialize};

/// Working days in one month of activity.
pub const WORKING_DAYS: f64 = 21.0;
/// Multiplier for the stretch (120%) daily targets.
pub const STRETCH_FACTOR: f64 = 1.2;

/// Monthly totals for every funnel stage, in the order they are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelBreakdown {
    #[serde(with = "js_number")]
    pub required_mrr: f64,
    #[serde(with = "js_number")]
    pub required_deals: f64,
    #[serde(with = "js_number")]
    pub required_attended_meetings: f64,
    #[serde(with = "js_number")]
    pub required_booked_meetings: f64,
    #[serde(with = "js_number")]
    pub required_connected_calls: f64,
    #[serde(with = "js_number")]
    pub required_emails: f64,
}

impl FunnelBreakdown {
    pub fn compute(quotas: &Quotas, rates: &Rates) -> Self {
        let required_mrr = quotas.cw_mrr_target / percent(rates.mrr_to_cw_rate);
        let required_deals = (required_mrr / rates.avg_deal_size).ceil();
        let required_attended_meetings = (required_deals / percent(rates.meeting_to_mrr_rate)).ceil();
        let required_booked_meetings =
            (required_attended_meetings / percent(rates.meeting_attendance_rate)).ceil();
        let required_connected_calls =
            (required_booked_meetings / percent(rates.connected_to_meeting_rate)).ceil();
        let required_emails = (required_booked_meetings / percent(rates.email_to_meeting_rate)).ceil();

        Self {
            required_mrr,
            required_deals,
            required_attended_meetings,
            required_booked_meetings,
            required_connected_calls,
            required_emails,
        }
    }

    pub fn metrics(&self) -> DerivedMetrics {
        let daily = DailyTargets {
            connected_calls: (self.required_connected_calls / WORKING_DAYS).ceil(),
            emails: (self.required_emails / WORKING_DAYS).ceil(),
            booked_meetings: round_two_decimals(self.required_booked_meetings / WORKING_DAYS),
        };

        // Rounding applies to the scaled value, never before scaling.
        let daily120 = DailyTargets {
            connected_calls: (daily.connected_calls * STRETCH_FACTOR).ceil(),
            emails: (daily.emails * STRETCH_FACTOR).ceil(),
            booked_meetings: round_two_decimals(daily.booked_meetings * STRETCH_FACTOR),
        };

        DerivedMetrics {
            daily,
            daily120,
            monthly: MonthlyTargets {
                deals: self.required_deals,
                attended_meetings: self.required_attended_meetings,
                booked_meetings: self.required_booked_meetings,
            },
        }
    }
}

pub fn calculate_metrics(quotas: &Quotas, rates: &Rates) -> DerivedMetrics {
    FunnelBreakdown::compute(quotas, rates).metrics()
}

fn percent(rate: f64) -> f64 {
    rate / 100.0
}

// Above this magnitude an f64 has no hundredths left, and scaling by 100 could overflow.
const ROUNDING_LIMIT: f64 = 1e15;

/// Rounds half away from zero at the second decimal. Infinity, NaN and values too
/// large to carry hundredths pass through.
pub fn round_two_decimals(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}
