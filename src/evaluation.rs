//! # Difference evaluation
//!
//! Pair a reference sequence with a candidate sequence of the same record kind, compute
//! the per-pair differences and classify every pair against the error margin.
//!
//! ## Pairing
//! -----------------
//! [`pair_records`] turns two sequences into [`RecordPair`]s according to
//! [`PairingMode`]:
//!
//! - **Positional**: record *i* of the reference pairs with record *i* of the candidate,
//!   up to the shorter length. Records beyond that are reported as one-sided pairs and
//!   ignored by [`evaluate`], which only logs how many were skipped. A pair whose
//!   identifiers differ is not diffed and yields [`Violation::IdentifierMismatch`].
//! - **ByIdentifier**: the *n*-th occurrence of an identifier in the candidate pairs with
//!   the *n*-th occurrence in the reference. One-sided records yield [`Violation::Unpaired`].
//!
//! ## Differences
//! -----------------
//! - Summary records: candidate − reference as a 3-vector and its Euclidean norm. The pair
//!   passes iff `norm < error_margin`.
//! - RMS records: four signed differences candidate − reference (radial, tangential,
//!   normal, 3D), each tested with the configured [`RmsCheck`](crate::params::RmsCheck).
//!
//! A failing pair is logged (identifier and values) **before** its violations are recorded.
//! Violations are collected into the returned [`Evaluation`]; nothing here aborts the run.
use std::collections::HashMap;
use std::fmt;

use itertools::{EitherOrBoth, Itertools};
use nalgebra::Vector3;
use serde::Serialize;
use tracing::warn;

use crate::{
    params::{CompareParams, PairingMode},
    records::{ReportKind, ReportRecord, RmsRecord, SummaryRecord},
};

/// Quantity tested against the error margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Norm of the X/Y/Z difference vector.
    Magnitude,
    Radial,
    Tangential,
    Normal,
    ThreeD,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Metric::Magnitude => "|dXYZ|",
            Metric::Radial => "R",
            Metric::Tangential => "T",
            Metric::Normal => "N",
            Metric::ThreeD => "3D",
        };
        f.write_str(label)
    }
}

/// Side of the comparison a record comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Reference,
    Candidate,
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    Exceeded {
        report: ReportKind,
        identifier: String,
        metric: Metric,
        value: f64,
        tolerance: f64,
    },
    IdentifierMismatch {
        report: ReportKind,
        position: usize,
        reference: String,
        candidate: String,
    },
    Unpaired {
        report: ReportKind,
        identifier: String,
        side: Side,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Exceeded {
                report,
                identifier,
                metric,
                value,
                tolerance,
            } => write!(
                f,
                "[{report}] {identifier}: {metric} difference {value} is not below {tolerance}"
            ),
            Violation::IdentifierMismatch {
                report,
                position,
                reference,
                candidate,
            } => write!(
                f,
                "[{report}] record #{}: reference {reference} paired with candidate {candidate}",
                position + 1
            ),
            Violation::Unpaired {
                report,
                identifier,
                side,
            } => {
                let only = match side {
                    Side::Reference => "reference",
                    Side::Candidate => "candidate",
                };
                write!(f, "[{report}] {identifier}: present in the {only} only")
            }
        }
    }
}

/// Outcome of pairing two sequences.
#[derive(Debug, PartialEq)]
pub enum RecordPair<'a, R> {
    Paired(&'a R, &'a R),
    ReferenceOnly(&'a R),
    CandidateOnly(&'a R),
}

/// Difference between one reference record and one candidate record.
pub trait RecordDiff: fmt::Display {
    /// Identifier of the candidate record.
    fn identifier(&self) -> &str;

    /// Metrics failing the error margin, with their value.
    fn exceeded(&self, params: &CompareParams) -> Vec<(Metric, f64)>;
}

/// A record kind that can be compared.
pub trait Comparable: ReportRecord {
    type Diff: RecordDiff + Serialize;

    /// `candidate − reference`.
    fn diff(reference: &Self, candidate: &Self) -> Self::Diff;
}

/// Difference between two [`SummaryRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDiff {
    pub satellite: String,
    pub delta: Vector3<f64>,
    pub magnitude: f64,
}

impl RecordDiff for SummaryDiff {
    fn identifier(&self) -> &str {
        &self.satellite
    }

    fn exceeded(&self, params: &CompareParams) -> Vec<(Metric, f64)> {
        if self.magnitude < params.error_margin {
            Vec::new()
        } else {
            vec![(Metric::Magnitude, self.magnitude)]
        }
    }
}

impl fmt::Display for SummaryDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<9} |dXYZ| = {}", self.satellite, self.magnitude)
    }
}

impl Comparable for SummaryRecord {
    type Diff = SummaryDiff;

    fn diff(reference: &Self, candidate: &Self) -> SummaryDiff {
        let delta = candidate.components - reference.components;
        SummaryDiff {
            satellite: candidate.satellite.clone(),
            magnitude: delta.norm(),
            delta,
        }
    }
}

/// Signed differences between two [`RmsRecord`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RmsDiff {
    pub prn: String,
    pub radial: f64,
    pub tangential: f64,
    pub normal: f64,
    pub three_d: f64,
}

impl RmsDiff {
    fn metrics(&self) -> [(Metric, f64); 4] {
        [
            (Metric::Radial, self.radial),
            (Metric::Tangential, self.tangential),
            (Metric::Normal, self.normal),
            (Metric::ThreeD, self.three_d),
        ]
    }
}

impl RecordDiff for RmsDiff {
    fn identifier(&self) -> &str {
        &self.prn
    }

    fn exceeded(&self, params: &CompareParams) -> Vec<(Metric, f64)> {
        self.metrics()
            .into_iter()
            .filter(|&(_, value)| !params.rms_check.accepts(value, params.error_margin))
            .collect()
    }
}

impl fmt::Display for RmsDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<9} R = {}, T = {}, N = {}, 3D = {}",
            self.prn, self.radial, self.tangential, self.normal, self.three_d
        )
    }
}

impl Comparable for RmsRecord {
    type Diff = RmsDiff;

    fn diff(reference: &Self, candidate: &Self) -> RmsDiff {
        RmsDiff {
            prn: candidate.prn.clone(),
            radial: candidate.radial - reference.radial,
            tangential: candidate.tangential - reference.tangential,
            normal: candidate.normal - reference.normal,
            three_d: candidate.three_d - reference.three_d,
        }
    }
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation<D> {
    pub report: ReportKind,
    /// Differences of every diffed pair, in pairing order.
    pub diffs: Vec<D>,
    pub violations: Vec<Violation>,
    /// One-sided records skipped under positional pairing.
    pub ignored: usize,
}

impl<D> Evaluation<D> {
    fn new(report: ReportKind) -> Self {
        Evaluation {
            report,
            diffs: Vec::new(),
            violations: Vec::new(),
            ignored: 0,
        }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Pair `reference` with `candidate` according to `mode`.
///
/// Positional pairs come in index order, one-sided pairs last. Identifier pairs come in
/// candidate order, followed by reference-only records in reference order.
pub fn pair_records<'a, R: ReportRecord>(
    reference: &'a [R],
    candidate: &'a [R],
    mode: PairingMode,
) -> Vec<RecordPair<'a, R>> {
    match mode {
        PairingMode::Positional => reference
            .iter()
            .zip_longest(candidate)
            .map(|pair| match pair {
                EitherOrBoth::Both(r, c) => RecordPair::Paired(r, c),
                EitherOrBoth::Left(r) => RecordPair::ReferenceOnly(r),
                EitherOrBoth::Right(c) => RecordPair::CandidateOnly(c),
            })
            .collect(),
        PairingMode::ByIdentifier => {
            let occurrences = reference
                .iter()
                .enumerate()
                .map(|(i, r)| (r.identifier(), i))
                .into_group_map();
            let mut taken = vec![false; reference.len()];
            let mut seen: HashMap<&str, usize> = HashMap::new();
            let mut pairs = Vec::with_capacity(reference.len().max(candidate.len()));

            for c in candidate {
                let nth = seen.entry(c.identifier()).or_insert(0);
                match occurrences
                    .get(c.identifier())
                    .and_then(|idx| idx.get(*nth))
                {
                    Some(&i) => {
                        *nth += 1;
                        taken[i] = true;
                        pairs.push(RecordPair::Paired(&reference[i], c));
                    }
                    None => pairs.push(RecordPair::CandidateOnly(c)),
                }
            }

            pairs.extend(
                reference
                    .iter()
                    .zip(taken)
                    .filter(|(_, taken)| !taken)
                    .map(|(r, _)| RecordPair::ReferenceOnly(r)),
            );
            pairs
        }
    }
}

/// Compare `candidate` against `reference`.
///
/// Arguments
/// -----------------
/// * `reference` – Records from the solution report.
/// * `candidate` – Records from the new run.
/// * `params` – Error margin, pairing mode, RMS check and fail-fast switch.
///
/// Return
/// ----------
/// * An [`Evaluation`] holding every computed difference and every violation. With
///   `fail_fast`, the pass stops after the pair that produced the first violation.
pub fn evaluate<R: Comparable>(
    reference: &[R],
    candidate: &[R],
    params: &CompareParams,
) -> Evaluation<R::Diff> {
    let mut evaluation = Evaluation::new(R::KIND);

    for (position, pair) in pair_records(reference, candidate, params.pairing)
        .into_iter()
        .enumerate()
    {
        if params.fail_fast && !evaluation.passed() {
            break;
        }

        match pair {
            RecordPair::Paired(r, c) => {
                if params.pairing == PairingMode::Positional && r.identifier() != c.identifier() {
                    warn!(
                        report = %R::KIND,
                        position,
                        reference = r.identifier(),
                        candidate = c.identifier(),
                        "identifiers differ at the same position"
                    );
                    evaluation.violations.push(Violation::IdentifierMismatch {
                        report: R::KIND,
                        position,
                        reference: r.identifier().to_string(),
                        candidate: c.identifier().to_string(),
                    });
                    continue;
                }

                let diff = R::diff(r, c);
                let exceeded = diff.exceeded(params);
                if !exceeded.is_empty() {
                    warn!(
                        report = %R::KIND,
                        tolerance = params.error_margin,
                        "difference found for {diff}"
                    );
                }
                evaluation
                    .violations
                    .extend(exceeded.into_iter().map(|(metric, value)| Violation::Exceeded {
                        report: R::KIND,
                        identifier: diff.identifier().to_string(),
                        metric,
                        value,
                        tolerance: params.error_margin,
                    }));
                evaluation.diffs.push(diff);
            }
            RecordPair::ReferenceOnly(r) => one_sided(&mut evaluation, r, Side::Reference, params),
            RecordPair::CandidateOnly(c) => one_sided(&mut evaluation, c, Side::Candidate, params),
        }
    }

    if evaluation.ignored > 0 {
        warn!(
            report = %R::KIND,
            reference = reference.len(),
            candidate = candidate.len(),
            ignored = evaluation.ignored,
            "sequence lengths differ, extra records ignored"
        );
    }

    evaluation
}

fn one_sided<R: ReportRecord, D>(
    evaluation: &mut Evaluation<D>,
    record: &R,
    side: Side,
    params: &CompareParams,
) {
    match params.pairing {
        PairingMode::Positional => evaluation.ignored += 1,
        PairingMode::ByIdentifier => {
            warn!(report = %R::KIND, identifier = record.identifier(), ?side, "unpaired record");
            evaluation.violations.push(Violation::Unpaired {
                report: R::KIND,
                identifier: record.identifier().to_string(),
                side,
            });
        }
    }
}

#[cfg(test)]
mod evaluation_test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::params::RmsCheck;

    fn params() -> CompareParams {
        CompareParams::builder().build().unwrap()
    }

    fn summary(sat: &str, x: f64, y: f64, z: f64) -> SummaryRecord {
        SummaryRecord::new(sat, x, y, z)
    }

    #[test]
    fn test_identical_sequences_pass() {
        let seq = vec![
            summary("G01", 1.0, 2.0, 3.0),
            summary("G02", -4.5, 0.25, 7.0),
            summary("G03", 0.0, 0.0, 0.0),
        ];
        for margin in [1e-9, 0.1, 10.0] {
            let params = CompareParams::builder().error_margin(margin).build().unwrap();
            let eval = evaluate(&seq, &seq, &params);
            assert!(eval.passed());
            assert_eq!(eval.diffs.len(), 3);
            assert!(eval.diffs.iter().all(|d| d.magnitude == 0.0));
        }
    }

    #[test]
    fn test_summary_magnitude_exceeds() {
        let reference = vec![summary("G01", 0.0, 0.0, 0.0)];
        let candidate = vec![summary("G01", 1.0, 0.0, 0.0)];
        let eval = evaluate(&reference, &candidate, &params());

        assert!(!eval.passed());
        assert_relative_eq!(eval.diffs[0].magnitude, 1.0);
        assert_eq!(
            eval.violations,
            vec![Violation::Exceeded {
                report: ReportKind::Summary,
                identifier: "G01".into(),
                metric: Metric::Magnitude,
                value: 1.0,
                tolerance: 0.1,
            }]
        );
    }

    #[test]
    fn test_summary_magnitude_is_euclidean() {
        let reference = vec![summary("G07", 1.0, 1.0, 1.0)];
        let candidate = vec![summary("G07", 1.03, 0.96, 1.0)];
        let eval = evaluate(&reference, &candidate, &params());
        assert_relative_eq!(eval.diffs[0].magnitude, 0.05, epsilon = 1e-12);
        assert!(eval.passed());
    }

    #[test]
    fn test_margin_is_strict_upper_bound() {
        let reference = vec![summary("G01", 0.0, 0.0, 0.0)];
        let candidate = vec![summary("G01", 0.5, 0.0, 0.0)];
        let params = CompareParams::builder().error_margin(0.5).build().unwrap();
        assert!(!evaluate(&reference, &candidate, &params).passed());
    }

    #[test]
    fn test_length_mismatch_is_not_a_violation() {
        let reference = vec![
            summary("G01", 0.0, 0.0, 0.0),
            summary("G02", 0.0, 0.0, 0.0),
            summary("G03", 0.0, 0.0, 0.0),
        ];
        let candidate = reference[..2].to_vec();

        let eval = evaluate(&reference, &candidate, &params());
        assert!(eval.passed());
        assert_eq!(eval.diffs.len(), 2);
        assert_eq!(eval.ignored, 1);
    }

    #[test]
    fn test_signed_rms_check_accepts_large_negative() {
        let reference = vec![RmsRecord::new("G05", 6.0, 1.0, 1.0, 1.0)];
        let candidate = vec![RmsRecord::new("G05", 1.0, 1.0, 1.0, 1.0)];
        let eval = evaluate(&reference, &candidate, &params());

        assert_relative_eq!(eval.diffs[0].radial, -5.0);
        assert!(eval.passed());
    }

    #[test]
    fn test_absolute_rms_check_rejects_large_negative() {
        let reference = vec![RmsRecord::new("G05", 6.0, 1.0, 1.0, 1.0)];
        let candidate = vec![RmsRecord::new("G05", 1.0, 1.0, 1.0, 1.0)];
        let params = CompareParams::builder()
            .rms_check(RmsCheck::Absolute)
            .build()
            .unwrap();
        let eval = evaluate(&reference, &candidate, &params);

        assert_eq!(eval.violations.len(), 1);
        assert!(matches!(
            eval.violations[0],
            Violation::Exceeded {
                metric: Metric::Radial,
                ..
            }
        ));
    }

    #[test]
    fn test_rms_reports_every_failing_component() {
        let reference = vec![RmsRecord::new("G09", 1.0, 1.0, 1.0, 1.0)];
        let candidate = vec![RmsRecord::new("G09", 1.5, 1.05, 2.0, 1.0)];
        let eval = evaluate(&reference, &candidate, &params());

        let metrics: Vec<Metric> = eval
            .violations
            .iter()
            .filter_map(|v| match v {
                Violation::Exceeded { metric, .. } => Some(*metric),
                _ => None,
            })
            .collect();
        assert_eq!(metrics, vec![Metric::Radial, Metric::Normal]);
    }

    #[test]
    fn test_positional_identifier_mismatch() {
        let reference = vec![summary("G01", 0.0, 0.0, 0.0), summary("G02", 0.0, 0.0, 0.0)];
        let candidate = vec![summary("G02", 0.0, 0.0, 0.0), summary("G01", 0.0, 0.0, 0.0)];
        let eval = evaluate(&reference, &candidate, &params());

        assert_eq!(eval.diffs.len(), 0);
        assert_eq!(
            eval.violations[0],
            Violation::IdentifierMismatch {
                report: ReportKind::Summary,
                position: 0,
                reference: "G01".into(),
                candidate: "G02".into(),
            }
        );
    }

    #[test]
    fn test_identifier_mismatch_display_is_one_based() {
        let violation = Violation::IdentifierMismatch {
            report: ReportKind::Summary,
            position: 0,
            reference: "G01".into(),
            candidate: "G02".into(),
        };
        assert_eq!(
            violation.to_string(),
            "[summary] record #1: reference G01 paired with candidate G02"
        );
    }

    #[test]
    fn test_identifier_pairing() {
        let reference = vec![
            summary("G01", 0.0, 0.0, 0.0),
            summary("G02", 0.0, 0.0, 0.0),
            summary("G03", 0.0, 0.0, 0.0),
        ];
        let candidate = vec![
            summary("G03", 0.0, 0.0, 0.0),
            summary("G01", 0.0, 0.0, 0.0),
            summary("G04", 0.0, 0.0, 0.0),
        ];
        let params = CompareParams::builder()
            .pairing(PairingMode::ByIdentifier)
            .build()
            .unwrap();

        let pairs = pair_records(&reference, &candidate, params.pairing);
        assert_eq!(
            pairs,
            vec![
                RecordPair::Paired(&reference[2], &candidate[0]),
                RecordPair::Paired(&reference[0], &candidate[1]),
                RecordPair::CandidateOnly(&candidate[2]),
                RecordPair::ReferenceOnly(&reference[1]),
            ]
        );

        let eval = evaluate(&reference, &candidate, &params);
        assert_eq!(eval.diffs.len(), 2);
        assert_eq!(
            eval.violations,
            vec![
                Violation::Unpaired {
                    report: ReportKind::Summary,
                    identifier: "G04".into(),
                    side: Side::Candidate,
                },
                Violation::Unpaired {
                    report: ReportKind::Summary,
                    identifier: "G02".into(),
                    side: Side::Reference,
                },
            ]
        );
    }

    #[test]
    fn test_identifier_pairing_with_repeats() {
        let reference = vec![summary("G01", 0.0, 0.0, 0.0), summary("G01", 5.0, 0.0, 0.0)];
        let candidate = vec![summary("G01", 0.0, 0.0, 0.0), summary("G01", 5.0, 0.0, 0.0)];
        let params = CompareParams::builder()
            .pairing(PairingMode::ByIdentifier)
            .build()
            .unwrap();
        let eval = evaluate(&reference, &candidate, &params);
        assert!(eval.passed());
        assert_eq!(eval.diffs.len(), 2);
    }

    #[test]
    fn test_fail_fast_stops_at_first_violation() {
        let reference = vec![summary("G01", 0.0, 0.0, 0.0), summary("G02", 0.0, 0.0, 0.0)];
        let candidate = vec![summary("G01", 1.0, 0.0, 0.0), summary("G02", 1.0, 0.0, 0.0)];

        let collect_all = evaluate(&reference, &candidate, &params());
        assert_eq!(collect_all.violations.len(), 2);

        let params = CompareParams::builder().fail_fast(true).build().unwrap();
        let eval = evaluate(&reference, &candidate, &params);
        assert_eq!(eval.violations.len(), 1);
        assert_eq!(eval.diffs.len(), 1);
    }
}
