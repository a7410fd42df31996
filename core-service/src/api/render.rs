//! Plain-text rendering for the terminal

use std::fmt::Write;

use serde_json::Value;

use super::form::{FormColumn, FormDescriptor, FormField, Widget};
use super::view::AssessmentView;
use super::Layout;

const COLUMN_WIDTH: usize = 52;

pub fn render_assessment(view: &AssessmentView, layout: Layout) -> String {
    let summary = summary_lines(view);
    let explanation = explanation_lines(view);

    match layout {
        Layout::Single => {
            let mut out = String::new();
            for line in summary.iter().chain(explanation.iter()) {
                let _ = writeln!(out, "{}", line);
            }
            out
        }
        Layout::TwoColumn => side_by_side(&[summary, explanation]),
    }
}

fn summary_lines(view: &AssessmentView) -> Vec<String> {
    let tag = if view.churn { "CHURN" } else { "NOT CHURN" };
    let mut lines = vec![
        format!("Prediction:        {} ({})", view.label, tag),
        format!("Churn probability: {}", view.probability_display),
    ];
    if let Some(history) = &view.history {
        let joined: Vec<String> = history.iter().map(|p| format!("{:.2}%", p * 100.0)).collect();
        lines.push(format!("Session history:   {}", joined.join(", ")));
    }
    lines
}

fn explanation_lines(view: &AssessmentView) -> Vec<String> {
    let mut lines = Vec::new();
    match (&view.explanation, &view.explanation_note) {
        (Some(explanation), _) => {
            lines.push(format!(
                "Top contributions (log-odds, baseline {:+.4}):",
                explanation.baseline
            ));
            for c in &explanation.top {
                lines.push(format!("  {:+.4}  {} = {}", c.contribution, c.feature, format_value(c.value)));
            }
            if let Some(label) = &explanation.other_label {
                lines.push(format!("  {:+.4}  {}", explanation.other_total, label));
            }
            lines.push(format!("Model output:      {:+.4}", explanation.model_output));
        }
        (None, Some(note)) => lines.push(format!("Explanation unavailable: {}", note)),
        (None, None) => {}
    }
    lines
}

pub fn render_form(form: &FormDescriptor) -> String {
    let columns: Vec<Vec<String>> = form.columns.iter().map(column_lines).collect();
    side_by_side(&columns)
}

/// Join columns line by line, padding all but the last
fn side_by_side(columns: &[Vec<String>]) -> String {
    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);

    let mut out = String::new();
    for i in 0..rows {
        let mut line = String::new();
        for (n, column) in columns.iter().enumerate() {
            let cell = column.get(i).map(String::as_str).unwrap_or("");
            if n + 1 < columns.len() {
                let _ = write!(line, "{:<width$}", cell, width = COLUMN_WIDTH);
            } else {
                line.push_str(cell);
            }
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn column_lines(column: &FormColumn) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(title) = &column.title {
        lines.push(format!("[{}]", title));
    }
    lines.extend(column.fields.iter().map(field_line));
    lines
}

fn field_line(field: &FormField) -> String {
    let domain = match &field.widget {
        Widget::Select { options } => options
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" | "),
        Widget::Slider { min, max } => format!("{}..{}", min, max),
        Widget::Number { min } => format!(">= {}", min),
    };
    format!(
        "{}: {} [default {}]",
        field.label,
        domain,
        display_value(&field.default)
    )
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}
