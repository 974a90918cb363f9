//! # Comparison parameters
//!
//! This module defines [`CompareParams`], the single configuration object of a comparison
//! run, and its validating builder [`CompareParamsBuilder`].
//!
//! ## Purpose
//!
//! [`CompareParams`] gathers everything a run needs, so that it can be constructed once
//! (by the command line, or by tests) and passed explicitly to
//! [`run_comparison`](crate::comparison::run_comparison):
//!
//! - the report file names (reference reports are read from `<base_dir>/solution/`,
//!   candidate reports from `<base_dir>/`),
//! - the error margin applied to every difference,
//! - how records are paired ([`PairingMode`]) and how RMS differences are tested ([`RmsCheck`]),
//! - whether an evaluation pass stops at its first violation.
//!
//! ## Defaults
//!
//! | field            | default       |
//! |------------------|---------------|
//! | `base_dir`       | `.`           |
//! | `solution_out`   | `pod.out`     |
//! | `solution_rms`   | `pod.rms`     |
//! | `run_out`        | `pod.out`     |
//! | `run_rms`        | `pod.rms`     |
//! | `error_margin`   | `0.1`         |
//! | `pairing`        | `Positional`  |
//! | `rms_check`      | `Signed`      |
//! | `fail_fast`      | `false`       |
use std::cmp::Ordering::Greater;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::constants::{
    DEFAULT_ERROR_MARGIN, DEFAULT_RMS_FILE, DEFAULT_SUMMARY_FILE, SOLUTION_DIR,
};
use crate::podcheck_errors::PodCheckError;

/// How reference and candidate records are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// Pair by position, up to the shorter sequence. Extra records are ignored.
    #[default]
    Positional,
    /// Pair the n-th occurrence of an identifier on each side.
    ByIdentifier,
}

/// How a signed RMS difference is tested against the error margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RmsCheck {
    /// `diff < margin`: only the upper bound is checked.
    #[default]
    Signed,
    /// `|diff| < margin`.
    Absolute,
}

impl RmsCheck {
    /// Return true iff `diff` is within `margin` under this check.
    ///
    /// NaN never passes.
    #[inline]
    pub fn accepts(self, diff: f64, margin: f64) -> bool {
        match self {
            RmsCheck::Signed => diff < margin,
            RmsCheck::Absolute => diff.abs() < margin,
        }
    }
}

/// Configuration of one comparison run.
///
/// Built once through [`CompareParams::builder`], which rejects a non-positive or
/// non-finite `error_margin` and empty report names, then passed by reference to
/// [`run_comparison`](crate::comparison::run_comparison). Report paths are resolved with
/// [`solution_out_path`](CompareParams::solution_out_path) and its siblings.
#[derive(Debug, Clone, Serialize)]
pub struct CompareParams {
    /// Directory the reports are resolved against.
    pub base_dir: Utf8PathBuf,
    /// Reference summary report, under `solution/`.
    pub solution_out: Utf8PathBuf,
    /// Reference RMS report, under `solution/`.
    pub solution_rms: Utf8PathBuf,
    /// Candidate summary report.
    pub run_out: Utf8PathBuf,
    /// Candidate RMS report.
    pub run_rms: Utf8PathBuf,
    /// Strictly positive tolerance applied to every difference.
    pub error_margin: f64,
    pub pairing: PairingMode,
    pub rms_check: RmsCheck,
    /// Stop an evaluation pass at its first violation.
    pub fail_fast: bool,
}

impl CompareParams {
    /// Construct a new [`CompareParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`CompareParamsBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use podcheck::params::{CompareParams, RmsCheck};
    ///
    /// let params = CompareParams::builder()
    ///     .error_margin(0.05)
    ///     .rms_check(RmsCheck::Absolute)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.error_margin, 0.05);
    /// ```
    pub fn builder() -> CompareParamsBuilder {
        CompareParamsBuilder::new()
    }

    fn solution_dir(&self) -> Utf8PathBuf {
        self.base_dir.join(SOLUTION_DIR)
    }

    /// Path of the reference summary report.
    pub fn solution_out_path(&self) -> Utf8PathBuf {
        self.solution_dir().join(&self.solution_out)
    }

    /// Path of the reference RMS report.
    pub fn solution_rms_path(&self) -> Utf8PathBuf {
        self.solution_dir().join(&self.solution_rms)
    }

    /// Path of the candidate summary report.
    pub fn run_out_path(&self) -> Utf8PathBuf {
        self.base_dir.join(&self.run_out)
    }

    /// Path of the candidate RMS report.
    pub fn run_rms_path(&self) -> Utf8PathBuf {
        self.base_dir.join(&self.run_rms)
    }
}

impl Default for CompareParams {
    fn default() -> Self {
        CompareParams {
            base_dir: Utf8PathBuf::from("."),
            solution_out: Utf8PathBuf::from(DEFAULT_SUMMARY_FILE),
            solution_rms: Utf8PathBuf::from(DEFAULT_RMS_FILE),
            run_out: Utf8PathBuf::from(DEFAULT_SUMMARY_FILE),
            run_rms: Utf8PathBuf::from(DEFAULT_RMS_FILE),
            error_margin: DEFAULT_ERROR_MARGIN,
            pairing: PairingMode::default(),
            rms_check: RmsCheck::default(),
            fail_fast: false,
        }
    }
}

/// Builder for [`CompareParams`], with validation.
#[derive(Debug, Clone)]
pub struct CompareParamsBuilder {
    params: CompareParams,
}

impl Default for CompareParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: CompareParams::default(),
        }
    }

    pub fn base_dir(mut self, v: impl AsRef<Utf8Path>) -> Self {
        self.params.base_dir = v.as_ref().to_owned();
        self
    }
    pub fn solution_out(mut self, v: impl AsRef<Utf8Path>) -> Self {
        self.params.solution_out = v.as_ref().to_owned();
        self
    }
    pub fn solution_rms(mut self, v: impl AsRef<Utf8Path>) -> Self {
        self.params.solution_rms = v.as_ref().to_owned();
        self
    }
    pub fn run_out(mut self, v: impl AsRef<Utf8Path>) -> Self {
        self.params.run_out = v.as_ref().to_owned();
        self
    }
    pub fn run_rms(mut self, v: impl AsRef<Utf8Path>) -> Self {
        self.params.run_rms = v.as_ref().to_owned();
        self
    }
    pub fn error_margin(mut self, v: f64) -> Self {
        self.params.error_margin = v;
        self
    }
    pub fn pairing(mut self, v: PairingMode) -> Self {
        self.params.pairing = v;
        self
    }
    pub fn rms_check(mut self, v: RmsCheck) -> Self {
        self.params.rms_check = v;
        self
    }
    pub fn fail_fast(mut self, v: bool) -> Self {
        self.params.fail_fast = v;
        self
    }

    /// Finalize the builder and produce a [`CompareParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `error_margin` must be finite and strictly positive.
    /// * The four report file names must be non-empty.
    pub fn build(self) -> Result<CompareParams, PodCheckError> {
        let p = &self.params;

        if !p.error_margin.is_finite() || p.error_margin.partial_cmp(&0.0) != Some(Greater) {
            return Err(PodCheckError::InvalidParameter(format!(
                "error_margin must be finite and > 0 (got {})",
                p.error_margin
            )));
        }

        for (name, file) in [
            ("solution_out", &p.solution_out),
            ("solution_rms", &p.solution_rms),
            ("run_out", &p.run_out),
            ("run_rms", &p.run_rms),
        ] {
            if file.as_str().is_empty() {
                return Err(PodCheckError::InvalidParameter(format!(
                    "{name} must not be empty"
                )));
            }
        }

        Ok(self.params)
    }
}
