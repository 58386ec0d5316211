//! Flat CSV export
//!
//! One row per entry, fixed column order, stable across runs:
//! tool_name, tool_version, target_model, api_style, passrate,
//! duration_minutes, llm_model, submitted_at.
//!
//! Fields are quoted per standard CSV rules: a field containing a comma,
//! quote, CR, or LF is wrapped in quotes with embedded quotes doubled.
//! Passrate is formatted with three decimals, duration with two.

use super::entry::LeaderboardEntry;

/// The fixed header row.
pub const CSV_HEADER: &str =
    "tool_name,tool_version,target_model,api_style,passrate,duration_minutes,llm_model,submitted_at";

/// Renders the export for the given entries, in the given order.
pub fn export_csv(entries: &[LeaderboardEntry]) -> String {
    let mut out = String::with_capacity(64 * (entries.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for entry in entries {
        let fields = [
            escape(&entry.tool_name),
            escape(&entry.tool_version),
            escape(entry.target_model.as_str()),
            escape(entry.api_style.as_str()),
            format!("{:.3}", entry.passrate),
            format!("{:.2}", entry.duration_minutes),
            escape(&entry.llm_model),
            escape(&entry.submitted_timestamp),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// Quotes a field when it contains a delimiter, quote, or line break.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\r') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
