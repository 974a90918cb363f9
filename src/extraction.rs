//! # Report extraction
//!
//! Locate fixed-format records inside free-form POD reports and turn them into typed
//! [`ReportRecord`] values.
//!
//! ## Overview
//! -----------------
//! - [`extract_records`] opens a report file and extracts every record of one kind.
//! - [`parse_records`] does the same on any [`BufRead`] source (used by the tests and by
//!   [`extract_records`] itself).
//!
//! The report is scanned **line by line**. Within a line every non-overlapping match of
//! the record pattern yields one record, so a line can produce zero, one or several
//! records. Records keep file order; repeated identifiers are kept.
//!
//! ## Error Handling
//! -----------------
//! Extraction is all-or-nothing per file:
//! - an unreadable file is reported as [`PodCheckError::ReportIo`],
//! - a capture that matches the pattern but is not a valid float (for instance a `?`
//!   placeholder) is reported as [`PodCheckError::InvalidNumericField`] with the 1-based
//!   line number and the field name.
//!
//! ## See also
//! ------------
//! * [`SummaryRecord`](crate::records::SummaryRecord) – `pod.out` records.
//! * [`RmsRecord`](crate::records::RmsRecord) – `pod.rms` records.
use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use regex::Captures;
use tracing::debug;

use crate::{podcheck_errors::PodCheckError, records::ReportRecord};

/// Extract every record of kind `R` from the report at `path`.
///
/// Arguments
/// -----------------
/// * `path` – Report file to read.
///
/// Return
/// ----------
/// * The records in file order, or a [`PodCheckError`] if the file cannot be read or a
///   numeric field cannot be converted.
pub fn extract_records<R: ReportRecord>(path: &Utf8Path) -> Result<Vec<R>, PodCheckError> {
    let file = File::open(path).map_err(|source| PodCheckError::ReportIo {
        path: path.to_owned(),
        source,
    })?;

    let records = parse_records(BufReader::new(file), path)?;
    debug!(
        report = %R::KIND,
        path = %path,
        records = records.len(),
        "extracted report records"
    );
    Ok(records)
}

/// Extract every record of kind `R` from a buffered reader.
///
/// `source` only names the input in error messages.
pub fn parse_records<R: ReportRecord, B: BufRead>(
    reader: B,
    source: &Utf8Path,
) -> Result<Vec<R>, PodCheckError> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| PodCheckError::ReportIo {
            path: source.to_owned(),
            source: err,
        })?;

        for caps in R::pattern().captures_iter(&line) {
            records.push(record_from_captures::<R>(&caps, source, idx + 1)?);
        }
    }

    Ok(records)
}

/// Build one record from a pattern match.
///
/// Numeric captures are trimmed before conversion: RMS captures carry one leading
/// free character which is usually a space.
fn record_from_captures<R: ReportRecord>(
    caps: &Captures<'_>,
    source: &Utf8Path,
    line: usize,
) -> Result<R, PodCheckError> {
    let identifier = caps.get(1).map_or("", |m| m.as_str());

    let values = R::FIELD_NAMES[1..]
        .iter()
        .enumerate()
        .map(|(i, &field)| {
            let raw = caps.get(i + 2).map_or("", |m| m.as_str());
            raw.trim()
                .parse::<f64>()
                .map_err(|err| PodCheckError::InvalidNumericField {
                    path: source.to_owned(),
                    line,
                    field,
                    value: raw.to_string(),
                    source: err,
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(R::from_fields(identifier, &values))
}

#[cfg(test)]
mod extraction_test {
    use std::io::Cursor;

    use camino::Utf8PathBuf;

    use super::*;
    use crate::records::{RmsRecord, SummaryRecord};

    fn parse<R: ReportRecord>(text: &str) -> Result<Vec<R>, PodCheckError> {
        parse_records(Cursor::new(text), Utf8Path::new("inline"))
    }

    #[test]
    fn test_summary_line() {
        let text = "header\n RMS-XYZ ITRF CMP G05        1.2        3.4        5.6\ntrailer\n";
        let records: Vec<SummaryRecord> = parse(text).unwrap();
        assert_eq!(records, vec![SummaryRecord::new("G05", 1.2, 3.4, 5.6)]);
    }

    #[test]
    fn test_rms_line() {
        let line = format!("PRN: {:<9}{:11}ALL:  1.0  2.0  3.0  4.0", "G05", "");
        let records: Vec<RmsRecord> = parse(&line).unwrap();
        assert_eq!(records, vec![RmsRecord::new("G05", 1.0, 2.0, 3.0, 4.0)]);
    }

    #[test]
    fn test_rms_negative_value() {
        let line = format!("PRN: {:<9}{:11}ALL:  1.0 -2.5  3.0  4.0", "G07", "");
        let records: Vec<RmsRecord> = parse(&line).unwrap();
        assert_eq!(records, vec![RmsRecord::new("G07", 1.0, -2.5, 3.0, 4.0)]);
    }

    #[test]
    fn test_multiple_matches_per_line_and_repeats() {
        let rec = "RMS-XYZ ITRF CMP G01        1.0        2.0        3.0";
        let text = format!("{rec} | {rec}\n{rec}\nnothing here\n");
        let records: Vec<SummaryRecord> = parse(&text).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.satellite == "G01"));
    }

    #[test]
    fn test_no_match_yields_empty() {
        let text = "RMS-XYZ ITRF CMP G1        1.0        2.0        3.0\n";
        let records: Vec<SummaryRecord> = parse(text).unwrap();
        assert!(records.is_empty());

        let records: Vec<SummaryRecord> = parse("").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_placeholder_value_fails_conversion() {
        let text = "ok\nRMS-XYZ ITRF CMP G05        1.2        ?.??        5.6\n";
        let err = parse::<SummaryRecord>(text).unwrap_err();
        match err {
            PodCheckError::InvalidNumericField {
                line, field, value, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(field, "y");
                assert_eq!(value, "?.??");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let path = Utf8PathBuf::from("does/not/exist/pod.out");
        let err = extract_records::<SummaryRecord>(&path).unwrap_err();
        assert_eq!(
            err,
            PodCheckError::ReportIo {
                path,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }
        );
    }
}
