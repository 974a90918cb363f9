use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Scratch working directory laid out like a POD run: reports at the root, reference
/// reports under `solution/`.
pub struct RunDir {
    _tmp: TempDir,
    pub root: Utf8PathBuf,
}

impl RunDir {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(tmp.path()).unwrap().to_owned();
        fs::create_dir(root.join("solution")).unwrap();
        RunDir { _tmp: tmp, root }
    }

    pub fn write_solution(&self, name: &str, content: &str) {
        fs::write(self.root.join("solution").join(name), content).unwrap();
    }

    pub fn write_run(&self, name: &str, content: &str) {
        fs::write(self.root.join(name), content).unwrap();
    }
}

/// One `pod.out` summary line.
pub fn summary_line(sat: &str, x: &str, y: &str, z: &str) -> String {
    format!(" RMS-XYZ ITRF CMP {sat}        {x}        {y}        {z}\n")
}

/// One `pod.rms` line with the field spacing of the RMS report.
pub fn rms_line(prn: &str, values: [&str; 4]) -> String {
    let numbers: String = values
        .iter()
        .map(|v| {
            if v.starts_with('-') {
                format!(" {v}")
            } else {
                format!("  {v}")
            }
        })
        .collect();
    format!(" PRN: {prn:<9}  Npts: 96 ALL:{numbers}\n")
}
