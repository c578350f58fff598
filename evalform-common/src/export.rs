//! CSV export of evaluation records
//!
//! Layout: an unquoted header line (`id`, `created_at`, then every schema
//! field in canonical order) followed by one line per record in which every
//! cell is double-quoted and embedded quotes are doubled.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::record::EvaluationRecord;
use crate::schema::{self, FIELDS};
use crate::{Error, Result};

/// File name offered to browsers for the export
pub const EXPORT_FILE_NAME: &str = "evaluations.csv";

/// Header columns in export order
pub fn header() -> Vec<&'static str> {
    let mut columns = Vec::with_capacity(FIELDS.len() + 2);
    columns.push(schema::ID_COLUMN);
    columns.push(schema::CREATED_AT_COLUMN);
    columns.extend(FIELDS.iter().map(|f| f.name));
    columns
}

fn cells(record: &EvaluationRecord) -> Vec<String> {
    let mut cells = Vec::with_capacity(FIELDS.len() + 2);
    cells.push(record.id.to_string());
    cells.push(record.created_at.clone());
    cells.extend(record.fields.values().iter().map(|v| v.render()));
    cells
}

/// Serialize records, in the order given, into a CSV document
///
/// An empty slice yields [`Error::NoData`]: there is nothing to export.
pub fn to_csv(records: &[EvaluationRecord]) -> Result<String> {
    if records.is_empty() {
        return Err(Error::NoData);
    }

    let mut head = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    head.write_record(header())?;
    let buffer = head
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV header flush failed: {}", e)))?;

    let mut body = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for record in records {
        body.write_record(cells(record))?;
    }
    let bytes = body
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| Error::Internal(format!("CSV is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EvaluationFields, FieldValue};

    fn record(id: i64, first_name: &str, details: &str, passion: i64) -> EvaluationRecord {
        let mut fields = EvaluationFields::default();
        fields.set("firstName", FieldValue::Text(first_name.to_string()));
        fields.set("projectDetails", FieldValue::Text(details.to_string()));
        fields.set("passion", FieldValue::Score(passion));
        EvaluationRecord {
            id,
            created_at: format!("2025-01-0{} 08:00:00", id),
            fields,
        }
    }

    #[test]
    fn test_empty_is_no_data() {
        assert!(matches!(to_csv(&[]), Err(Error::NoData)));
    }

    #[test]
    fn test_header_line() {
        let csv = to_csv(&[record(1, "Ana", "", 0)]).unwrap();
        let first_line = csv.lines().next().unwrap();
        assert!(first_line.starts_with("id,created_at,firstName,lastName,phoneNumber,"));
        assert!(first_line.ends_with(",projectDetails,expectations,totalScore"));
        assert_eq!(first_line.split(',').count(), FIELDS.len() + 2);
    }

    #[test]
    fn test_quote_escaping() {
        let csv = to_csv(&[record(1, "Ana", r#"He said "hi""#, 0)]).unwrap();
        assert!(csv.contains(r#""He said ""hi""""#), "got: {}", csv);
    }

    #[test]
    fn test_every_cell_quoted() {
        let csv = to_csv(&[record(2, "Ana", "", 4)]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with(r#""2","2025-01-02 08:00:00","Ana","","#));
        // passion follows the seven identity columns
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells[2 + 7], r#""4""#);
        assert!(cells.iter().all(|c| c.starts_with('"') && c.ends_with('"')));
    }

    #[test]
    fn test_embedded_comma_and_newline() {
        let csv = to_csv(&[record(1, "Ana", "line one,\nline two", 0)]).unwrap();
        assert!(csv.contains("\"line one,\nline two\""));
    }

    #[test]
    fn test_order_preserved_and_deterministic() {
        let records = vec![record(3, "Cy", "", 1), record(2, "Bo", "", 2), record(1, "Al", "", 3)];
        let first = to_csv(&records).unwrap();
        let second = to_csv(&records).unwrap();
        assert_eq!(first, second);

        let ids: Vec<&str> = first
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(ids, vec![r#""3""#, r#""2""#, r#""1""#]);
        assert!(first.ends_with('\n'));
    }
}
