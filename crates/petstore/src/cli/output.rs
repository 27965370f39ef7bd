//! Rendering of query results for the terminal.

use crate::error::Result;
use crate::values::Cursor;

use super::OutputFormat;

/// Render `cursor` in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_cursor(cursor: &Cursor, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(render_plain(cursor)),
        OutputFormat::Table => Ok(render_table(cursor)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&cursor.to_json())?),
    }
}

/// One line per row, `column=value` pairs separated by spaces.
fn render_plain(cursor: &Cursor) -> String {
    let mut out = String::new();
    for row in cursor.rows() {
        let fields: Vec<String> = cursor
            .columns()
            .iter()
            .zip(row.values())
            .map(|(column, value)| format!("{column}={value}"))
            .collect();
        out.push_str(&fields.join(" "));
        out.push('\n');
    }
    out
}

fn render_table(cursor: &Cursor) -> String {
    let cells: Vec<Vec<String>> = cursor
        .rows()
        .map(|row| row.values().iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = cursor
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, cursor.columns(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&format!("({} row{})\n", cells.len(), if cells.len() == 1 { "" } else { "s" }));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ColumnValue;

    fn cursor() -> Cursor {
        Cursor::new(
            vec!["_id".to_string(), "name".to_string(), "weight".to_string()],
            vec![
                vec![ColumnValue::Integer(1), ColumnValue::from("Rex"), ColumnValue::Integer(20)],
                vec![ColumnValue::Integer(2), ColumnValue::from("Tom"), ColumnValue::Null],
            ],
        )
    }

    #[test]
    fn test_render_plain() {
        let out = render_cursor(&cursor(), OutputFormat::Plain).unwrap();
        assert_eq!(out, "_id=1 name=Rex weight=20\n_id=2 name=Tom weight=\n");
    }

    #[test]
    fn test_render_table() {
        let out = render_cursor(&cursor(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "_id  name  weight");
        assert_eq!(lines[1], "---  ----  ------");
        assert_eq!(lines[2], "1    Rex   20");
        assert_eq!(lines[3], "2    Tom");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_render_table_empty() {
        let empty = Cursor::new(vec!["name".to_string()], Vec::new());
        let out = render_cursor(&empty, OutputFormat::Table).unwrap();
        assert!(out.ends_with("(0 rows)\n"));
    }

    #[test]
    fn test_render_json() {
        let out = render_cursor(&cursor(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["name"], "Rex");
        assert!(parsed[1]["weight"].is_null());
    }
}
