use crate::models::{
    CalculatorSnapshot, ChartBundle, ChartSeries, DailyActivityChart, DailyActivityGroup, FunnelChart, FunnelStage,
    PieSlice, QuotaCompositionChart,
};

const INDIGO: &str = "#4f46e5";
const CYAN: &str = "#06b6d4";
const CYAN_DARK: &str = "#0891b2";
const CYAN_DARKER: &str = "#0e7490";

// Illustrative split shown next to the live numbers; not derived from input.
const QUOTA_COMPOSITION: [(&str, f64, &str); 3] = [
    ("Pipe Build", 50.0, INDIGO),
    ("Meetings Held", 30.0, CYAN),
    ("CW MRR", 20.0, CYAN_DARK),
];

pub fn daily_activity_chart(snapshot: &CalculatorSnapshot) -> DailyActivityChart {
    let metrics = &snapshot.metrics;
    DailyActivityChart {
        title: "Daily Activity Distribution".to_string(),
        series: vec![
            ChartSeries {
                key: "connectedCalls".to_string(),
                label: "Connected Calls".to_string(),
                fill: INDIGO.to_string(),
            },
            ChartSeries {
                key: "bookedMeetings".to_string(),
                label: "Booked Meetings".to_string(),
                fill: CYAN.to_string(),
            },
        ],
        groups: vec![
            DailyActivityGroup {
                name: "100% Target".to_string(),
                connected_calls: metrics.daily.connected_calls,
                booked_meetings: metrics.daily.booked_meetings,
            },
            DailyActivityGroup {
                name: "120% Target".to_string(),
                connected_calls: metrics.daily120.connected_calls,
                booked_meetings: metrics.daily120.booked_meetings,
            },
        ],
    }
}

/// Stage values for the horizontal funnel. Connected calls are re-derived from
/// the monthly booked meetings without rounding, so they can differ from the
/// ceiled figure behind the daily targets.
pub fn funnel_chart(snapshot: &CalculatorSnapshot) -> FunnelChart {
    let monthly = &snapshot.metrics.monthly;
    let connected_calls = monthly.booked_meetings / (snapshot.rates.connected_to_meeting_rate / 100.0);

    let stages = [
        ("Connected Calls", connected_calls, INDIGO),
        ("Booked Meetings", monthly.booked_meetings, CYAN),
        ("Attended Meetings", monthly.attended_meetings, CYAN_DARK),
        ("Closed Deals", monthly.deals, CYAN_DARKER),
    ]
    .into_iter()
    .map(|(name, value, fill)| FunnelStage {
        name: name.to_string(),
        value,
        fill: fill.to_string(),
    })
    .collect();

    FunnelChart {
        title: "Conversion Funnel".to_string(),
        stages,
    }
}

pub fn quota_composition_chart() -> QuotaCompositionChart {
    let slices = QUOTA_COMPOSITION
        .iter()
        .map(|(name, value, fill)| PieSlice {
            name: name.to_string(),
            value: *value,
            fill: fill.to_string(),
            label: format!("{}: {}%", name, value),
        })
        .collect();

    QuotaCompositionChart {
        title: "Quota Composition".to_string(),
        slices,
    }
}

pub fn all_charts(snapshot: &CalculatorSnapshot) -> ChartBundle {
    ChartBundle {
        daily_activity: daily_activity_chart(snapshot),
        funnel: funnel_chart(snapshot),
        quota_composition: quota_composition_chart(),
    }
}

#[cfg(test)]
mod tests {
    use super::{all_charts, daily_activity_chart, funnel_chart, quota_composition_chart};
    use crate::models::{QuotaField, RateField};
    use crate::state::CalculatorState;

    #[test]
    fn daily_chart_compares_base_and_stretch() {
        let chart = daily_activity_chart(&CalculatorState::default().snapshot());
        assert_eq!(chart.groups.len(), 2);
        assert_eq!(chart.groups[0].name, "100% Target");
        assert_eq!(chart.groups[0].connected_calls, 7.0);
        assert_eq!(chart.groups[1].connected_calls, 9.0);
        assert_eq!(chart.groups[1].booked_meetings, 1.6);
    }

    #[test]
    fn funnel_connected_calls_use_independent_formula() {
        let mut state = CalculatorState::default();
        state.set_rate(RateField::ConnectedToMeetingRate, "30");
        let snapshot = state.snapshot();
        let chart = funnel_chart(&snapshot);

        let names: Vec<&str> = chart.stages.iter().map(|stage| stage.name.as_str()).collect();
        assert_eq!(names, vec!["Connected Calls", "Booked Meetings", "Attended Meetings", "Closed Deals"]);
        // 28 / 0.3 is fractional; the monthly chain would have ceiled it to 94.
        assert!((chart.stages[0].value - 28.0 / 0.3).abs() < 1e-9);
        assert_eq!(chart.stages[3].value, 17.0);
    }

    #[test]
    fn pie_is_static() {
        let mut state = CalculatorState::default();
        let before = all_charts(&state.snapshot()).quota_composition;
        state.set_quota(QuotaField::CwMrrTarget, "0");
        let after = all_charts(&state.snapshot()).quota_composition;
        assert_eq!(before, after);

        let labels: Vec<String> = quota_composition_chart().slices.into_iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!["Pipe Build: 50%", "Meetings Held: 30%", "CW MRR: 20%"]);
    }
}
