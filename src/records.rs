//! # Report records
//!
//! Typed views over the two record kinds found in POD reports:
//!
//! - [`SummaryRecord`] – one `RMS-XYZ ITRF CMP` line of `pod.out`: a satellite designator
//!   and the X/Y/Z components.
//! - [`RmsRecord`] – one `PRN: ... ALL:` line of `pod.rms`: a PRN label and the radial,
//!   tangential, normal and 3D RMS values.
//!
//! Both implement [`ReportRecord`], which is all the extractor needs to know about a
//! record kind: its pattern, the names of its captured fields, and how to build a record
//! from the captured identifier and the parsed numeric values.
//!
//! Records are immutable once parsed. Sequences keep file order and repeated identifiers.
use std::fmt;
use std::sync::LazyLock;

use nalgebra::Vector3;
use regex::Regex;
use serde::Serialize;

use crate::constants::{RMS_PATTERN, SUMMARY_PATTERN};

static SUMMARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SUMMARY_PATTERN).expect("summary pattern is a valid regex"));

static RMS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RMS_PATTERN).expect("RMS pattern is a valid regex"));

/// The two report kinds compared by podcheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Summary,
    Rms,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Summary => write!(f, "summary"),
            ReportKind::Rms => write!(f, "rms"),
        }
    }
}

/// A record kind recognised by the extractor.
///
/// Capture group 1 of [`ReportRecord::pattern`] is the identifier, the following groups
/// are numeric, in the order given by [`ReportRecord::FIELD_NAMES`] (identifier excluded).
pub trait ReportRecord: Sized {
    /// Report kind this record belongs to.
    const KIND: ReportKind;

    /// Names of the identifier and numeric fields, in capture order.
    const FIELD_NAMES: &'static [&'static str];

    /// Compiled pattern locating one record inside a line.
    fn pattern() -> &'static Regex;

    /// Build a record from the raw identifier capture and the parsed numeric values.
    ///
    /// `values.len()` is always `FIELD_NAMES.len() - 1`.
    fn from_fields(identifier: &str, values: &[f64]) -> Self;

    /// Identifier used for pairing and reporting.
    fn identifier(&self) -> &str;
}

/// Per-satellite X/Y/Z summary statistics from `pod.out`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    /// Satellite designator, verbatim (e.g. `G05`).
    pub satellite: String,
    /// X, Y, Z components.
    pub components: Vector3<f64>,
}

impl SummaryRecord {
    pub fn new(satellite: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        SummaryRecord {
            satellite: satellite.into(),
            components: Vector3::new(x, y, z),
        }
    }
}

impl ReportRecord for SummaryRecord {
    const KIND: ReportKind = ReportKind::Summary;
    const FIELD_NAMES: &'static [&'static str] = &["satellite", "x", "y", "z"];

    fn pattern() -> &'static Regex {
        &SUMMARY_REGEX
    }

    fn from_fields(identifier: &str, values: &[f64]) -> Self {
        SummaryRecord::new(identifier, values[0], values[1], values[2])
    }

    fn identifier(&self) -> &str {
        &self.satellite
    }
}

impl fmt::Display for SummaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} x={:>12.6} y={:>12.6} z={:>12.6}",
            self.satellite, self.components.x, self.components.y, self.components.z
        )
    }
}

/// Per-satellite RTN statistics from `pod.rms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmsRecord {
    /// PRN label, whitespace-trimmed.
    pub prn: String,
    pub radial: f64,
    pub tangential: f64,
    pub normal: f64,
    /// Combined 3D value.
    pub three_d: f64,
}

impl RmsRecord {
    pub fn new(
        prn: impl Into<String>,
        radial: f64,
        tangential: f64,
        normal: f64,
        three_d: f64,
    ) -> Self {
        RmsRecord {
            prn: prn.into(),
            radial,
            tangential,
            normal,
            three_d,
        }
    }
}

impl ReportRecord for RmsRecord {
    const KIND: ReportKind = ReportKind::Rms;
    const FIELD_NAMES: &'static [&'static str] =
        &["prn", "radial", "tangential", "normal", "3d"];

    fn pattern() -> &'static Regex {
        &RMS_REGEX
    }

    fn from_fields(identifier: &str, values: &[f64]) -> Self {
        RmsRecord::new(identifier.trim(), values[0], values[1], values[2], values[3])
    }

    fn identifier(&self) -> &str {
        &self.prn
    }
}

impl fmt::Display for RmsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} R={:>10.4} T={:>10.4} N={:>10.4} 3D={:>10.4}",
            self.prn, self.radial, self.tangential, self.normal, self.three_d
        )
    }
}
