//! # Comparison pipeline
//!
//! [`run_comparison`] wires the extractor and the evaluator together:
//!
//! ```text
//! solution/pod.out ─┐                      ┌─ Evaluation<SummaryDiff>
//! pod.out ──────────┴─ extract ─ evaluate ─┤
//! solution/pod.rms ─┐                      │
//! pod.rms ──────────┴─ extract ─ evaluate ─┴─ Evaluation<RmsDiff>
//! ```
//!
//! The four reports are fully extracted before any comparison starts, so a missing file
//! or a malformed value stops the run before anything is evaluated.
use serde::Serialize;
use tracing::info;

use crate::{
    evaluation::{evaluate, Evaluation, RmsDiff, SummaryDiff, Violation},
    extraction::extract_records,
    params::CompareParams,
    podcheck_errors::PodCheckError,
    records::{ReportKind, RmsRecord, SummaryRecord},
};

/// Everything produced by one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub params: CompareParams,
    pub solution_summary: Vec<SummaryRecord>,
    pub run_summary: Vec<SummaryRecord>,
    pub solution_rms: Vec<RmsRecord>,
    pub run_rms: Vec<RmsRecord>,
    pub summary: Evaluation<SummaryDiff>,
    /// `None` when the RMS pass was skipped by `fail_fast`.
    pub rms: Option<Evaluation<RmsDiff>>,
}

impl ComparisonReport {
    /// True iff neither pass recorded a violation.
    pub fn passed(&self) -> bool {
        self.summary.passed() && self.rms.as_ref().map_or(true, |rms| rms.passed())
    }

    /// Violations of both passes, summary first.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.summary
            .violations
            .iter()
            .chain(self.rms.iter().flat_map(|rms| rms.violations.iter()))
    }
}

/// Run the full comparison described by `params`.
///
/// Return
/// ----------
/// * A [`ComparisonReport`] (which may hold violations), or a [`PodCheckError`] if any of
///   the four reports cannot be read or contains an unparsable value.
pub fn run_comparison(params: &CompareParams) -> Result<ComparisonReport, PodCheckError> {
    let solution_summary = extract_records::<SummaryRecord>(&params.solution_out_path())?;
    let run_summary = extract_records::<SummaryRecord>(&params.run_out_path())?;
    let solution_rms = extract_records::<RmsRecord>(&params.solution_rms_path())?;
    let run_rms = extract_records::<RmsRecord>(&params.run_rms_path())?;

    info!(
        report = %ReportKind::Summary,
        solution = solution_summary.len(),
        run = run_summary.len(),
        "extracted records"
    );
    info!(
        report = %ReportKind::Rms,
        solution = solution_rms.len(),
        run = run_rms.len(),
        "extracted records"
    );

    let summary = evaluate(&solution_summary, &run_summary, params);
    let rms = if params.fail_fast && !summary.passed() {
        info!("summary comparison failed, skipping RMS comparison");
        None
    } else {
        Some(evaluate(&solution_rms, &run_rms, params))
    };

    Ok(ComparisonReport {
        params: params.clone(),
        solution_summary,
        run_summary,
        solution_rms,
        run_rms,
        summary,
        rms,
    })
}
