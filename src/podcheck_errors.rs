use std::num::ParseFloatError;

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodCheckError {
    #[error("Unable to read report {path}")]
    ReportIo {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid numeric value {value:?} for field `{field}` in {path} at line {line}")]
    InvalidNumericField {
        path: Utf8PathBuf,
        line: usize,
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Invalid comparison parameter: {0}")]
    InvalidParameter(String),

    #[error("Unable to serialize JSON report {path}")]
    JsonReport {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to write report {path}")]
    ReportWrite {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PartialEq for PodCheckError {
    fn eq(&self, other: &Self) -> bool {
        use PodCheckError::*;
        match (self, other) {
            (ReportIo { path: a, .. }, ReportIo { path: b, .. }) => a == b,
            (
                InvalidNumericField {
                    path: pa,
                    line: la,
                    field: fa,
                    value: va,
                    ..
                },
                InvalidNumericField {
                    path: pb,
                    line: lb,
                    field: fb,
                    value: vb,
                    ..
                },
            ) => pa == pb && la == lb && fa == fb && va == vb,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // io / serde errors are not comparable: same variant means equal
            (JsonReport { path: a, .. }, JsonReport { path: b, .. }) => a == b,
            (ReportWrite { path: a, .. }, ReportWrite { path: b, .. }) => a == b,

            _ => false,
        }
    }
}
