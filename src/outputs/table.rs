//! Append-only CSV persistence for raw article records.
//!
//! Each run appends whatever it fetched to one long-lived CSV. The header
//! row (the configured field whitelist) is written only when the file is
//! currently empty, so it appears exactly once over the file's lifetime no
//! matter how many runs append to it. Nothing is ever rewritten or
//! deduplicated.

use crate::models::ArticleRecord;
use crate::outputs::format_row;
use std::error::Error;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument};

/// Append `records` to the CSV at `path`.
///
/// `fields` is the column whitelist, in header order. Record fields outside
/// the whitelist are dropped; whitelisted fields a record lacks are written
/// as empty cells.
///
/// # Errors
///
/// Surfaces I/O failures opening or writing the file.
#[instrument(level = "debug", skip(records, fields), fields(path = %path.display(), count = records.len()))]
pub fn append_records(
    records: &[ArticleRecord],
    path: &Path,
    fields: &[String],
) -> Result<(), Box<dyn Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let needs_header = file.metadata()?.len() == 0;

    let mut out = String::new();
    if needs_header {
        debug!("Article table is empty; writing header");
        out.push_str(&format_row(fields.iter().cloned()));
    }
    for record in records {
        out.push_str(&format_row(
            fields.iter().map(|f| record.field(f).unwrap_or_default()),
        ));
    }

    file.write_all(out.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn record(value: serde_json::Value) -> ArticleRecord {
        serde_json::from_value(value).unwrap()
    }

    fn whitelist() -> Vec<String> {
        ["id", "webPublicationDate", "pillarName"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn test_first_append_writes_header_then_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let records = vec![
            record(json!({ "id": "1", "webPublicationDate": "2024-02-11T08:00:00Z", "pillarName": "Politics" })),
            record(json!({ "id": "2", "webPublicationDate": "2024-02-10T08:00:00Z", "pillarName": "World" })),
        ];

        append_records(&records, &path, &whitelist()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,webPublicationDate,pillarName");
        assert_eq!(lines[1], "1,2024-02-11T08:00:00Z,Politics");
        assert_eq!(lines[2], "2,2024-02-10T08:00:00Z,World");
    }

    #[test]
    fn test_second_append_writes_no_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let first = vec![record(json!({ "id": "1" }))];
        let second = vec![record(json!({ "id": "2" }))];

        append_records(&first, &path, &whitelist()).unwrap();
        append_records(&second, &path, &whitelist()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let headers = contents
            .lines()
            .filter(|l| l.starts_with("id,"))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_extra_fields_dropped_and_missing_fields_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let records = vec![record(json!({
            "id": "1",
            "pillarName": "Opinion",
            "sectionName": "not in the whitelist",
        }))];

        append_records(&records, &path, &whitelist()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[1], "1,,Opinion");
        assert!(!contents.contains("not in the whitelist"));
    }

    #[test]
    fn test_values_with_commas_stay_in_one_cell() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.csv");
        let records = vec![record(json!({
            "id": "world/1",
            "pillarName": "News, mostly",
        }))];

        append_records(&records, &path, &whitelist()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[1], "world/1,,\"News, mostly\"");
    }

    #[test]
    fn test_appending_nothing_to_empty_file_still_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("articles.csv");

        append_records(&[], &path, &whitelist()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "id,webPublicationDate,pillarName\n");
    }
}
