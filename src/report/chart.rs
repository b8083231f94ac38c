use chrono::Datelike;
use std::fmt::Write;

use crate::series::DailyValues;

/// Renders a Mermaid `xychart-beta` line chart with one line per series.
///
/// All series are expected to share the dates of the first one, which is
/// what [`crate::series::split_series`] produces.
pub fn line_chart(title: &str, y_label: &str, labels: &[&str], series: &[DailyValues]) -> String {
    let Some(first) = series.first().filter(|s| !s.is_empty()) else {
        return format!("**{title}**: _No data collected yet._\n");
    };

    // Month-day labels repeat once the history spans more than one year
    let label_format = match (first.dates.first(), first.dates.last()) {
        (Some(start), Some(end)) if start.year() != end.year() => "%Y-%m-%d",
        _ => "%m-%d",
    };
    let x_axis = first
        .dates
        .iter()
        .map(|date| format!("\"{}\"", date.format(label_format)))
        .collect::<Vec<_>>()
        .join(", ");
    let y_max = series.iter().map(DailyValues::max).max().unwrap_or(0).max(1);

    let mut out = String::new();
    out.push_str("```mermaid\nxychart-beta\n");
    let _ = writeln!(out, "    title \"{}\"", quote_safe(title));
    let _ = writeln!(out, "    x-axis [{x_axis}]");
    let _ = writeln!(out, "    y-axis \"{}\" 0 --> {y_max}", quote_safe(y_label));
    for line in series {
        let values = line
            .values
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "    line [{values}]");
    }
    out.push_str("```\n");

    if !labels.is_empty() {
        let _ = writeln!(out, "\n_Lines: {}_", labels.join(", "));
    }

    out
}

fn quote_safe(text: &str) -> String {
    text.replace('"', "'")
}
