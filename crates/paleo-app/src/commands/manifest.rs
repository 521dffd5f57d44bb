use std::path::Path;

use paleo_io::{WriteError, write_json};
use paleo_types::Manifest;

use crate::pipeline::{self, Options, RunError};
use crate::report::ManifestReport;
use crate::state::AppState;

/// Annotate one manifest and write it to `output`.
///
/// A cancelled run still writes the canvases finished so far.
pub async fn transcribe_manifest(
    state: &AppState,
    source: &str,
    output: &Path,
    options: &Options,
) -> Result<ManifestReport, RunError> {
    let (manifest, report) = pipeline::run(state, source, options).await?;
    write_output(output, &manifest, &report).await?;
    Ok(report)
}

/// Write an annotated manifest and log its report
pub async fn write_output(
    output: &Path,
    manifest: &Manifest,
    report: &ManifestReport,
) -> Result<(), WriteError> {
    write_json(output, manifest).await?;

    for failure in &report.failures {
        tracing::warn!(
            "Canvas {} ({}) has no annotations: {}",
            failure.index,
            failure.canvas_id,
            failure.message
        );
    }
    tracing::info!("{report}");

    Ok(())
}
