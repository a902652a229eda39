//! Output formatting helpers.

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use serde::Serialize;
use serde_json::Value;

use cimi_core::Representation;
use cimi_core::repr::display_value;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a progress note on stderr.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn header_cell(name: impl ToString) -> Cell {
    Cell::new(name)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// One row per resource, one column per attribute.
pub fn list_table(columns: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(header_cell));
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

/// Attribute/value pairs for a single resource.
pub fn show_table(rows: Vec<(String, String)>) {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![header_cell("Attribute"), header_cell("Value")]);
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name).fg(Color::Cyan), Cell::new(value)]);
    }
    println!("{table}");
}

/// Renders attribute `name` of `repr` for a table cell.
pub fn attribute_cell(repr: &Representation, name: &str) -> String {
    match name {
        "properties" => repr
            .properties()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", "),
        "created" | "updated" | "timeOfStatusChange" => {
            repr.str_attr(name).map(timestamp).unwrap_or_default()
        }
        "capacity" | "memory" => repr
            .i64_attr(name)
            .map(|kb| format!("{}KB", kb))
            .unwrap_or_default(),
        _ => repr.get(name).map(value_cell).unwrap_or_default(),
    }
}

/// Links render as their href; everything else as plain text.
pub fn value_cell(value: &Value) -> String {
    match value.get("href").and_then(Value::as_str) {
        Some(href) if value.as_object().is_some_and(|o| o.len() == 1) => href.to_string(),
        _ => display_value(value),
    }
}

/// RFC 3339 timestamps shown in local time; anything else verbatim.
pub fn timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cells_for_special_attributes() {
        let repr = Representation::from_value(json!({
            "id": "disks/1",
            "capacity": 2048,
            "properties": {"tier": "gold", "zone": "b"},
            "machine": {"href": "machines/3"},
            "initialLocation": "/dev/vda"
        }))
        .unwrap();
        assert_eq!(attribute_cell(&repr, "capacity"), "2048KB");
        assert_eq!(attribute_cell(&repr, "properties"), "tier=gold, zone=b");
        assert_eq!(attribute_cell(&repr, "machine"), "machines/3");
        assert_eq!(attribute_cell(&repr, "initialLocation"), "/dev/vda");
        assert_eq!(attribute_cell(&repr, "missing"), "");
    }

    #[test]
    fn unparsable_timestamp_is_verbatim() {
        assert_eq!(timestamp("yesterday"), "yesterday");
        assert!(!timestamp("2024-05-01T10:00:00Z").is_empty());
    }
}
