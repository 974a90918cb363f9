//! # Constants for podcheck
//!
//! This module centralizes the **file-layout conventions**, **default values**, and the
//! **record patterns** shared by the extractor, the evaluator, and the command line.
//!
//! ## Overview
//!
//! - Fixed directory holding the reference ("solution") reports
//! - Default report file names and tolerance
//! - The two textual record patterns recognised inside POD reports
//!
//! The record patterns are matched against existing reference reports, so their exact
//! spacing is part of the file-format contract and must not be reformatted.

// -------------------------------------------------------------------------------------------------
// File layout
// -------------------------------------------------------------------------------------------------

/// Directory (relative to the working directory) holding the reference reports
pub const SOLUTION_DIR: &str = "solution";

/// Default name of the summary report (`pod.out`)
pub const DEFAULT_SUMMARY_FILE: &str = "pod.out";

/// Default name of the RMS report (`pod.rms`)
pub const DEFAULT_RMS_FILE: &str = "pod.rms";

// -------------------------------------------------------------------------------------------------
// Tolerance
// -------------------------------------------------------------------------------------------------

/// Default error margin applied to every difference check
pub const DEFAULT_ERROR_MARGIN: f64 = 0.1;

// -------------------------------------------------------------------------------------------------
// Record patterns
// -------------------------------------------------------------------------------------------------

/// Per-satellite ITRF summary line of `pod.out`.
///
/// Captures: satellite designator, then the X, Y, Z components. The numeric class also
/// admits `?` so that placeholder values are caught at float conversion.
pub const SUMMARY_PATTERN: &str = r"RMS-XYZ ITRF CMP ([A-Z]\d\d)        ([0-9.0-9?]+)        ([0-9.0-9?]+)        ([0-9.0-9?]+)";

/// Per-satellite RTN summary line of `pod.rms`.
///
/// Captures: the 9-character PRN field, then radial, tangential, normal and 3D RMS.
/// Each numeric capture carries one leading free character (space or sign).
pub const RMS_PATTERN: &str = r"(?s)PRN:.(.........)...........ALL:.(.[0-9.0-9?]+).(.[0-9.0-9?]+).(.[0-9.0-9?]+).(.[0-9.0-9?]+)";
