//! Plain-text tables and JSON output

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Print rows as a left-aligned table with a header line
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(ToString::to_string).collect();
    push_line(&mut out, &header, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// JSON acknowledgement for commands that remove a record
pub fn deleted(id: &str) -> serde_json::Value {
    serde_json::json!({ "deleted": true, "id": id })
}

pub fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

pub fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn columns_are_padded_to_widest_cell() {
        let rendered = render_table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "loja.com".to_string()],
                vec!["22".to_string(), "a.com".to_string()],
            ],
        );
        assert_eq!(rendered, "ID  NAME\n1   loja.com\n22  a.com\n");
    }

    #[test]
    fn empty_table_prints_header() {
        assert_eq!(render_table(&["ID"], &[]), "ID\n");
    }

    #[test]
    fn deletion_acknowledgement() {
        let ack = deleted("dom-1");
        assert_eq!(ack["deleted"], true);
        assert_eq!(ack["id"], "dom-1");
    }

    #[test]
    fn timestamp_formatting() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(timestamp(Some(dt)), "2024-05-01 12:00:00 UTC");
        assert_eq!(timestamp(None), "-");
    }
}
