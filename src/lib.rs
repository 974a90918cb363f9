//! # podcheck
//!
//! Regression check for precise-orbit-determination (POD) runs: extract the per-satellite
//! statistics of a new run's `pod.out` / `pod.rms` reports, compare them with the
//! reference reports stored under `solution/`, and report every difference that is not
//! below the error margin.
//!
//! ```rust,no_run
//! use podcheck::{run_comparison, CompareParams};
//!
//! let params = CompareParams::builder().error_margin(0.1).build()?;
//! let report = run_comparison(&params)?;
//! println!("{report}");
//! assert!(report.passed());
//! # Ok::<(), podcheck::PodCheckError>(())
//! ```
pub mod comparison;
pub mod constants;
pub mod evaluation;
pub mod extraction;
pub mod params;
pub mod podcheck_errors;
pub mod records;
pub mod report;
pub mod telemetry;

pub use comparison::{run_comparison, ComparisonReport};
pub use params::{CompareParams, PairingMode, RmsCheck};
pub use podcheck_errors::PodCheckError;
pub use records::{ReportKind, RmsRecord, SummaryRecord};
