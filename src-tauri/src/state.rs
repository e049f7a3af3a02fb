use crate::funnel::calculate_metrics;
use crate::input::coerce_numeric;
use crate::models::{
    CalculatorSnapshot, DerivedMetrics, FieldKey, FieldUpdate, QuotaField, Quotas, RateField, Rates,
};

/// Inputs for one calculator session. Metrics are never stored, only derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorState {
    quotas: Quotas,
    rates: Rates,
}

impl CalculatorState {
    pub fn new(quotas: Quotas, rates: Rates) -> Self {
        Self { quotas, rates }
    }

    pub fn quotas(&self) -> &Quotas {
        &self.quotas
    }

    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    pub fn value(&self, field: FieldKey) -> f64 {
        match field {
            FieldKey::Quota(field) => self.quotas.get(field),
            FieldKey::Rate(field) => self.rates.get(field),
        }
    }

    pub fn set_quota(&mut self, field: QuotaField, raw: &str) -> DerivedMetrics {
        let value = coerce_numeric(raw);
        self.quotas.set(field, value);
        tracing::debug!(field = field.as_str(), value, "quota updated");
        self.metrics()
    }

    pub fn set_rate(&mut self, field: RateField, raw: &str) -> DerivedMetrics {
        let value = coerce_numeric(raw);
        self.rates.set(field, value);
        tracing::debug!(field = field.as_str(), value, "rate updated");
        self.metrics()
    }

    pub fn apply(&mut self, update: &FieldUpdate) -> DerivedMetrics {
        match update.field {
            FieldKey::Quota(field) => self.set_quota(field, &update.value),
            FieldKey::Rate(field) => self.set_rate(field, &update.value),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
        tracing::debug!("inputs reset to defaults");
    }

    pub fn metrics(&self) -> DerivedMetrics {
        calculate_metrics(&self.quotas, &self.rates)
    }

    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            quotas: self.quotas,
            rates: self.rates,
            metrics: self.metrics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CalculatorState;
    use crate::models::{FieldKey, FieldUpdate, QuotaField, RateField};

    #[test]
    fn edits_recompute_metrics() {
        let mut state = CalculatorState::default();
        assert_eq!(state.metrics().monthly.deals, 17.0);

        let metrics = state.set_quota(QuotaField::CwMrrTarget, "2520");
        assert_eq!(metrics.monthly.deals, 34.0);
        assert_eq!(state.metrics(), metrics);
    }

    #[test]
    fn malformed_input_becomes_zero() {
        let mut state = CalculatorState::default();
        state.set_rate(RateField::AvgDealSize, "lots");
        assert_eq!(state.rates().avg_deal_size, 0.0);
        assert!(state.metrics().monthly.deals.is_infinite());

        state.set_quota(QuotaField::PipeBuildTarget, "-10");
        assert_eq!(state.quotas().pipe_build_target, 0.0);
    }

    #[test]
    fn apply_dispatches_by_field_kind() {
        let mut state = CalculatorState::default();
        state.apply(&FieldUpdate {
            field: FieldKey::Rate(RateField::ConnectedToMeetingRate),
            value: "40".to_string(),
        });
        assert_eq!(state.value(FieldKey::Rate(RateField::ConnectedToMeetingRate)), 40.0);
        assert_eq!(state.snapshot().metrics.daily.connected_calls, 4.0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = CalculatorState::default();
        state.set_quota(QuotaField::MeetingsHeldTarget, "99");
        state.reset();
        assert_eq!(state, CalculatorState::default());
    }
}
