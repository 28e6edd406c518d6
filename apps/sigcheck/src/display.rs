//! Report rendering on stdout

use crate::error::CliError;
use sigcheck_verify::VerificationReport;
use std::path::Path;

/// Renders the final report in text or JSON
pub struct OutputRenderer {
    json: bool,
}

impl OutputRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print the report
    ///
    /// JSON mode always prints the full report. Text mode prints a summary
    /// only for a clean run; failures are reported through the error path.
    pub fn render_report(
        &self,
        report: &VerificationReport,
        root_dir: &Path,
    ) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(report)?);
        } else if report.all_matched() {
            println!("{}", summary_line(report, root_dir));
        }
        Ok(())
    }
}

fn summary_line(report: &VerificationReport, root_dir: &Path) -> String {
    let n = report.len();
    let noun = if n == 1 { "file" } else { "files" };
    format!("OK: {n} {noun} verified under {}", root_dir.display())
}
