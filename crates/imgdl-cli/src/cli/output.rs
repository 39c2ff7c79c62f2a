//! Failure report rendering.

use anyhow::Result;
use imgdl_core::{BatchReport, FailureRecord};
use std::io::Write;
use std::path::Path;

/// One `url<TAB>status` line per failure, or a JSON array.
pub fn write_failures<W: Write>(out: &mut W, failures: &[FailureRecord], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, failures)?;
        writeln!(out)?;
    } else {
        for failure in failures {
            writeln!(out, "{}", failure)?;
        }
    }
    Ok(())
}

pub fn write_json_report(path: &Path, failures: &[FailureRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(failures)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn summary_line(report: &BatchReport) -> String {
    format!(
        "saved {} image(s), ignored {} non-image(s), {} unreachable, {} failed",
        report.saved,
        report.ignored,
        report.unreachable,
        report.failures.len()
    )
}
