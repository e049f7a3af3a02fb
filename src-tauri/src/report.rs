use crate::models::{CalculatorSnapshot, ChartBundle, DailyTargets, QuotaField, RateField};

const BAR_GLYPH: char = '█';

/// Upper bound on the bar length of a terminal chart.
pub const MAX_CHART_WIDTH: usize = 400;

/// Formats a metric the way the browser prints a JS number: shortest
/// round-trip digits, exponent notation outside `[1e-6, 1e21)`, and the
/// `Infinity`/`NaN` spellings.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{mantissa}e+{exponent}"),
            _ => formatted,
        };
    }
    format!("{}", value)
}

pub fn render_report(snapshot: &CalculatorSnapshot) -> String {
    let metrics = &snapshot.metrics;
    let mut out = String::new();
    push_daily(&mut out, "Daily Requirements (100%)", &metrics.daily);
    out.push('\n');
    push_daily(&mut out, "Daily Requirements (120%)", &metrics.daily120);
    out.push('\n');
    out.push_str("Monthly Projections\n");
    push_line(&mut out, "Required MRR Deals", metrics.monthly.deals);
    push_line(&mut out, "Required Attended Meetings", metrics.monthly.attended_meetings);
    push_line(&mut out, "Required Booked Meetings", metrics.monthly.booked_meetings);
    out
}

fn push_daily(out: &mut String, title: &str, targets: &DailyTargets) {
    out.push_str(title);
    out.push('\n');
    push_line(out, "Connected Calls", targets.connected_calls);
    push_line(out, "Emails", targets.emails);
    push_line(out, "Booked Meetings", targets.booked_meetings);
}

fn push_line(out: &mut String, label: &str, value: f64) {
    out.push_str(&format!("  {}: {}\n", label, format_number(value)));
}

pub fn render_inputs(snapshot: &CalculatorSnapshot) -> String {
    let mut out = String::from("Monthly Quotas\n");
    for field in QuotaField::ALL {
        out.push_str(&input_line(field.label(), snapshot.quotas.get(field), field.as_str()));
    }
    out.push_str("\nConversion Rates (%)\n");
    for field in RateField::ALL {
        out.push_str(&input_line(field.label(), snapshot.rates.get(field), field.as_str()));
    }
    out
}

fn input_line(label: &str, value: f64, key: &str) -> String {
    format!("  {:<32} {:>10}  [{}]\n", label, format_number(value), key)
}

/// Draws the three charts as horizontal bar rows at most `width` glyphs long.
/// `width` is capped at [`MAX_CHART_WIDTH`].
pub fn render_charts(bundle: &ChartBundle, width: usize) -> String {
    let width = width.min(MAX_CHART_WIDTH);
    let mut out = String::new();

    let daily = &bundle.daily_activity;
    let rows: Vec<(String, f64)> = daily
        .groups
        .iter()
        .flat_map(|group| {
            [
                (format!("{} / Connected Calls", group.name), group.connected_calls),
                (format!("{} / Booked Meetings", group.name), group.booked_meetings),
            ]
        })
        .collect();
    push_bars(&mut out, &daily.title, &rows, width, "");

    out.push('\n');
    let funnel = &bundle.funnel;
    let rows: Vec<(String, f64)> = funnel
        .stages
        .iter()
        .map(|stage| (stage.name.clone(), stage.value))
        .collect();
    push_bars(&mut out, &funnel.title, &rows, width, "");

    out.push('\n');
    let pie = &bundle.quota_composition;
    let rows: Vec<(String, f64)> = pie
        .slices
        .iter()
        .map(|slice| (slice.name.clone(), slice.value))
        .collect();
    push_bars(&mut out, &pie.title, &rows, width, "%");

    out
}

fn push_bars(out: &mut String, title: &str, rows: &[(String, f64)], width: usize, suffix: &str) {
    out.push_str(title);
    out.push('\n');

    let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let max = rows
        .iter()
        .map(|(_, value)| *value)
        .filter(|value| value.is_finite())
        .fold(0.0_f64, f64::max);

    for (label, value) in rows {
        let bar = bar_length(*value, max, width);
        let bar = BAR_GLYPH.to_string().repeat(bar);
        let separator = if bar.is_empty() { "" } else { " " };
        out.push_str(&format!(
            "  {:<label_width$} | {}{}{}{}\n",
            label,
            bar,
            separator,
            format_number(*value),
            suffix,
            label_width = label_width
        ));
    }
}

fn bar_length(value: f64, max: f64, width: usize) -> usize {
    if width == 0 || !value.is_finite() || value <= 0.0 || max <= 0.0 {
        return 0;
    }
    let width = width.min(MAX_CHART_WIDTH);
    let scaled = (value / max * width as f64).round() as usize;
    scaled.clamp(1, width)
}
