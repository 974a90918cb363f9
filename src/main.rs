//! podcheck - compare a POD run against its reference solution
//!
//! Reads `solution/<solutionout>` and `solution/<solutionrms>` (reference) and
//! `<runout>` / `<runrms>` (new run) from the working directory, prints the extracted
//! records and their differences, and exits with a non-zero status when any difference
//! is not below the error margin.

use std::process::ExitCode;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use podcheck::constants::{DEFAULT_ERROR_MARGIN, DEFAULT_RMS_FILE, DEFAULT_SUMMARY_FILE};
use podcheck::report::write_json_report;
use podcheck::telemetry::init_tracing;
use podcheck::{run_comparison, CompareParams, PairingMode, RmsCheck};

/// Two-letter single-dash flags kept for existing job scripts.
const LEGACY_FLAGS: [(&str, &str); 5] = [
    ("-so", "--solutionout"),
    ("-sr", "--solutionrms"),
    ("-ro", "--runout"),
    ("-rr", "--runrms"),
    ("-em", "--errormargin"),
];

#[derive(Parser, Debug)]
#[command(name = "podcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare pod output rms and out files", long_about = None)]
struct Cli {
    /// Solution pod.out file name, read from solution/ (alias: -so)
    #[arg(long = "solutionout", default_value = DEFAULT_SUMMARY_FILE)]
    solution_out: Utf8PathBuf,

    /// Solution pod.rms file name, read from solution/ (alias: -sr)
    #[arg(long = "solutionrms", default_value = DEFAULT_RMS_FILE)]
    solution_rms: Utf8PathBuf,

    /// New pod run pod.out file name (alias: -ro)
    #[arg(long = "runout", default_value = DEFAULT_SUMMARY_FILE)]
    run_out: Utf8PathBuf,

    /// New pod run pod.rms file name (alias: -rr)
    #[arg(long = "runrms", default_value = DEFAULT_RMS_FILE)]
    run_rms: Utf8PathBuf,

    /// Error margin for the comparison of the two output files (alias: -em)
    #[arg(long = "errormargin", env = "PODCHECK_ERROR_MARGIN", default_value_t = DEFAULT_ERROR_MARGIN)]
    error_margin: f64,

    /// How signed RMS differences are tested against the error margin
    #[arg(long, value_enum, default_value_t = RmsCheckArg::Signed)]
    rms_check: RmsCheckArg,

    /// How reference and run records are paired
    #[arg(long, value_enum, default_value_t = PairingArg::Positional)]
    pairing: PairingArg,

    /// Stop at the first violation
    #[arg(long)]
    fail_fast: bool,

    /// Also write the full report as JSON to this path
    #[arg(long)]
    json_report: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RmsCheckArg {
    /// Only the upper bound: `diff < margin`
    Signed,
    /// `|diff| < margin`
    Absolute,
}

impl From<RmsCheckArg> for RmsCheck {
    fn from(arg: RmsCheckArg) -> Self {
        match arg {
            RmsCheckArg::Signed => RmsCheck::Signed,
            RmsCheckArg::Absolute => RmsCheck::Absolute,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PairingArg {
    /// Pair records by position
    Positional,
    /// Pair records by satellite identifier
    Identifier,
}

impl From<PairingArg> for PairingMode {
    fn from(arg: PairingArg) -> Self {
        match arg {
            PairingArg::Positional => PairingMode::Positional,
            PairingArg::Identifier => PairingMode::ByIdentifier,
        }
    }
}

impl Cli {
    fn to_params(&self) -> Result<CompareParams> {
        CompareParams::builder()
            .solution_out(&self.solution_out)
            .solution_rms(&self.solution_rms)
            .run_out(&self.run_out)
            .run_rms(&self.run_rms)
            .error_margin(self.error_margin)
            .rms_check(self.rms_check.into())
            .pairing(self.pairing.into())
            .fail_fast(self.fail_fast)
            .build()
            .context("invalid command line parameters")
    }
}

/// Rewrite the legacy two-letter flags (`-so value`, `-so=value`) to their long form.
fn expand_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            for (short, long) in LEGACY_FLAGS {
                if arg == short {
                    return long.to_string();
                }
                if let Some(value) = arg.strip_prefix(short).and_then(|v| v.strip_prefix('=')) {
                    return format!("{long}={value}");
                }
            }
            arg
        })
        .collect()
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse_from(expand_legacy_flags(std::env::args()));

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json_logs, level);

    let params = cli.to_params()?;
    info!(
        solution_out = %params.solution_out_path(),
        solution_rms = %params.solution_rms_path(),
        run_out = %params.run_out_path(),
        run_rms = %params.run_rms_path(),
        error_margin = params.error_margin,
        "comparing pod run against solution"
    );

    let report = run_comparison(&params).context("comparison aborted")?;
    println!("{report}");

    if let Some(path) = &cli.json_report {
        write_json_report(&report, path)
            .with_context(|| format!("failed to write JSON report to {path}"))?;
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
