//! Plain-text table rendering for query results and reports.

use serde_json::Value;

/// Render rows as an aligned text table. Column set and order come from
/// the first row; rows missing a column show "-".
pub fn render_table(rows: &[Value]) -> String {
    if rows.is_empty() {
        return "No data found for this query.".to_string();
    }

    let columns: Vec<String> = match rows[0].as_object() {
        Some(obj) => obj.keys().cloned().collect(),
        // Scalar rows (e.g. SELECT count(*)) get a single value column.
        None => return rows.iter().map(cell_text).collect::<Vec<_>>().join("\n"),
    };

    let mut widths: Vec<usize> = columns.iter().map(String::len).collect();
    let mut body: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = Vec::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            let text = row.get(col).map(cell_text).unwrap_or_else(|| "-".into());
            widths[i] = widths[i].max(text.len());
            cells.push(text);
        }
        body.push(cells);
    }

    let mut out = String::new();
    for (i, col) in columns.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", col, width = widths[i]));
    }
    out.push('\n');
    for (i, _) in columns.iter().enumerate() {
        out.push_str(&"-".repeat(widths[i]));
        out.push_str("  ");
    }
    out.push('\n');
    for cells in body {
        for (i, cell) in cells.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
