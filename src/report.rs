use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::json;
use unicode_width::UnicodeWidthStr;

use crate::classify::{Classification, Status};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// interactive grid
    Tui,
    /// plain text, one block per category
    Table,
    /// machine readable
    Json,
}

/// Plain text rendering for pipes and terminals without the grid.
pub fn render_table(classification: &Classification, status: &Status) -> String {
    let label_width = classification
        .iter()
        .map(|(category, _)| category.label().width())
        .max()
        .unwrap_or(0);

    let mut out = format!("{status}\n");
    for (category, names) in classification.iter() {
        let label = category.label();
        let padding = " ".repeat(label_width - label.width());
        out.push_str(&format!("\n{label}{padding}  {}\n", names.len()));
        if names.is_empty() {
            out.push_str("  -\n");
        }
        for name in names {
            out.push_str(&format!("  {name}\n"));
        }
    }
    out
}

pub fn render_json(classification: &Classification, status: &Status) -> serde_json::Value {
    json!({
        "status": status.to_string(),
        "ok": !status.is_failure(),
        "rows": classification.rows,
        "categories": classification.categories,
    })
}
