// CutoffScout - core/export.rs
//
// CSV, JSON and plain-text table output of a filtered view.
// Core layer: writes to any Write trait object.

use crate::core::model::{Cell, Quota, Record};
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;

/// Column titles in display order.
pub const COLUMN_TITLES: [&str; 13] = [
    "College Code",
    "College Name",
    "Branch Code",
    "Branch Name",
    "OC",
    "BC",
    "BCM",
    "MBC",
    "MBCDNC",
    "MBCV",
    "SC",
    "SCA",
    "ST",
];

/// Output format for a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    /// Parse a format name ("table", "csv", "json"), case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn row_cells(record: &Record) -> impl Iterator<Item = &Cell> {
    [
        &record.college_code,
        &record.college_name,
        &record.branch_code,
        &record.branch_name,
    ]
    .into_iter()
    .chain(Quota::ALL.iter().map(move |&q| record.cutoff(q)))
}

/// Export records to CSV with a header row. Returns the number of data rows.
pub fn export_csv<W: Write>(records: &[&Record], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(COLUMN_TITLES)
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for record in records {
        let row: Vec<String> = row_cells(record).map(Cell::to_string).collect();
        csv_writer
            .write_record(&row)
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    Ok(count)
}

/// Export records to JSON (array of objects, source field names).
pub fn export_json<W: Write>(records: &[&Record], writer: W) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, records).map_err(|e| ExportError::Json { source: e })?;
    Ok(records.len())
}

/// Render up to `limit` records as an aligned text table.
///
/// The footer reads like `1-50 of 812 items`, where the total is the size of
/// the filtered view rather than of the dataset.
pub fn render_table<W: Write>(
    records: &[&Record],
    limit: usize,
    mut writer: W,
) -> Result<usize, ExportError> {
    let shown = &records[..records.len().min(limit)];

    let rows: Vec<Vec<String>> = shown
        .iter()
        .map(|r| row_cells(r).map(|c| clip(&c.to_string())).collect())
        .collect();

    let mut widths: Vec<usize> = COLUMN_TITLES.iter().map(|t| t.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let io = |e| ExportError::Io { source: e };

    let header: Vec<String> = COLUMN_TITLES.iter().map(|t| t.to_string()).collect();
    write_row(&mut writer, &header, &widths).map_err(io)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut writer, &rule, &widths).map_err(io)?;
    for row in &rows {
        write_row(&mut writer, row, &widths).map_err(io)?;
    }

    if records.is_empty() {
        writeln!(writer, "0 items").map_err(io)?;
    } else {
        writeln!(writer, "1-{} of {} items", shown.len(), records.len()).map_err(io)?;
    }
    writer.flush().map_err(io)?;

    Ok(shown.len())
}

fn write_row<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> std::io::Result<()> {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{c:<w$}"))
        .collect();
    writeln!(writer, "{}", line.join(" | ").trim_end())
}

fn clip(text: &str) -> String {
    let max = constants::TABLE_TEXT_COLUMN_WIDTH;
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(code: &str, name: &str, oc: Option<f64>) -> Record {
        Record {
            college_code: code.into(),
            college_name: name.into(),
            branch_code: "CS".into(),
            branch_name: "Computer Science".into(),
            oc: oc.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_export() {
        let a = make_record("1", "ABC College", Some(195.0));
        let b = make_record("2", "XYZ, Institute", None);
        let mut buf = Vec::new();
        let count = export_csv(&[&a, &b], &mut buf).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("College Code,College Name,Branch Code"));
        assert!(output.contains("1,ABC College,CS,Computer Science,195,,"));
        assert!(output.contains("\"XYZ, Institute\""));
    }

    #[test]
    fn test_json_export_uses_source_field_names() {
        let a = make_record("1", "Test College", Some(191.0));
        let mut buf = Vec::new();
        let count = export_json(&[&a], &mut buf).unwrap();
        assert_eq!(count, 1);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["con"], "Test College");
        assert_eq!(value[0]["OC"], 191);
        assert!(value[0].get("BC").is_none());
    }

    #[test]
    fn test_json_export_reproduces_source_text() {
        let source = r#"[
  {
    "_id": "r1",
    "coc": 1,
    "con": "ABC College",
    "brc": "CS",
    "brn": "Computer Science",
    "OC": 195,
    "BC": 187.5
  }
]"#;
        let records: Vec<Record> = serde_json::from_str(source).unwrap();
        let refs: Vec<&Record> = records.iter().collect();
        let mut buf = Vec::new();
        export_json(&refs, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), source);
    }

    #[test]
    fn test_table_limit_and_footer() {
        let records: Vec<Record> = (0..5)
            .map(|i| make_record(&i.to_string(), "College", Some(190.0)))
            .collect();
        let refs: Vec<&Record> = records.iter().collect();
        let mut buf = Vec::new();
        let shown = render_table(&refs, 3, &mut buf).unwrap();
        assert_eq!(shown, 3);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.lines().next().unwrap().starts_with("College Code"));
        assert_eq!(output.lines().count(), 2 + 3 + 1);
        assert!(output.ends_with("1-3 of 5 items\n"));
    }

    #[test]
    fn test_table_empty_view() {
        let mut buf = Vec::new();
        render_table(&[], 10, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().ends_with("0 items\n"));
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_name("yaml"), None);
    }
}
