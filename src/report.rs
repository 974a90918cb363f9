//! # Comparison report rendering
//!
//! Human-readable and machine-readable renderers for a [`ComparisonReport`].
//!
//! ## Text layout
//!
//! `{}` on a [`ComparisonReport`] prints, in order:
//!
//! 1. the four extracted sequences (`solution summary`, `run summary`, `solution rms`,
//!    `run rms`), one record per line,
//! 2. the summary and RMS differences, one pair per line,
//! 3. every violation,
//! 4. a verdict line: `Everything passed` or `N tolerance violation(s)`.
//!
//! Sections are always printed so that a failing run can be inspected from its output.
//!
//! ## JSON
//!
//! [`write_json_report`] serializes the whole report (parameters, records, differences,
//! violations and verdict) as pretty-printed JSON.
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::{
    comparison::ComparisonReport, evaluation::Evaluation, podcheck_errors::PodCheckError,
};

/// Verdict line printed after a successful comparison.
pub const SUCCESS_LINE: &str = "Everything passed";

/// Titled list of displayable items.
struct Section<'a, T> {
    title: &'a str,
    items: &'a [T],
}

impl<'a, T> Section<'a, T> {
    fn new(title: &'a str, items: &'a [T]) -> Self {
        Section { title, items }
    }
}

impl<T: fmt::Display> fmt::Display for Section<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}):", self.title, self.items.len())?;
        for item in self.items {
            writeln!(f, "  {item}")?;
        }
        Ok(())
    }
}

fn write_evaluation<D: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    evaluation: &Evaluation<D>,
) -> fmt::Result {
    write!(f, "{}", Section::new(title, &evaluation.diffs))?;
    if evaluation.ignored > 0 {
        writeln!(f, "  ({} unpaired record(s) ignored)", evaluation.ignored)?;
    }
    Ok(())
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Section::new("solution summary", &self.solution_summary))?;
        write!(f, "{}", Section::new("run summary", &self.run_summary))?;
        write!(f, "{}", Section::new("solution rms", &self.solution_rms))?;
        write!(f, "{}", Section::new("run rms", &self.run_rms))?;

        write_evaluation(f, "summary differences", &self.summary)?;
        match &self.rms {
            Some(rms) => write_evaluation(f, "rms differences", rms)?,
            None => writeln!(f, "rms differences: skipped")?,
        }

        let violations: Vec<_> = self.violations().collect();
        if violations.is_empty() {
            write!(f, "{SUCCESS_LINE}")
        } else {
            writeln!(f, "violations ({}):", violations.len())?;
            for violation in &violations {
                writeln!(f, "  {violation}")?;
            }
            write!(f, "{} tolerance violation(s)", violations.len())
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    #[serde(flatten)]
    report: &'a ComparisonReport,
}

/// Write `report` to `path` as pretty-printed JSON.
pub fn write_json_report(report: &ComparisonReport, path: &Utf8Path) -> Result<(), PodCheckError> {
    let write_error = |source: std::io::Error| PodCheckError::ReportWrite {
        path: path.to_owned(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
    serde_json::to_writer_pretty(
        &mut writer,
        &JsonReport {
            passed: report.passed(),
            report,
        },
    )
    .map_err(|source| PodCheckError::JsonReport {
        path: path.to_owned(),
        source,
    })?;
    writer.flush().map_err(write_error)?;
    Ok(())
}
