//! Per-manifest driver: load, optionally clean up, then transcribe and
//! annotate every canvas in order.
//!
//! A failing canvas never aborts the manifest. Its error is logged,
//! recorded in the [`ManifestReport`] and the canvas is left untouched.

use paleo_core::describe::metadata_entries;
use paleo_core::vendor::strip_vendor_artifacts;
use paleo_core::{AssembleError, SchemaError, load_manifest};
use paleo_io::{FetchError, WriteError};
use paleo_transcriber::TranscribeError;
use paleo_types::{Canvas, Manifest, TranscriptionMode};

use crate::report::ManifestReport;
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Identifier for the output manifest
    pub new_id: Option<String>,
    pub strip_vendor: bool,
    pub coordinate_mode: bool,
    pub describe: bool,
}

impl Options {
    pub fn mode(&self) -> TranscriptionMode {
        if self.coordinate_mode {
            TranscriptionMode::Coordinates
        } else {
            TranscriptionMode::WholeCanvas
        }
    }
}

/// Failure that stops a whole manifest
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid manifest: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Failure confined to one canvas
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("canvas has no image")]
    NoImage,

    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

struct CanvasOutcome {
    added: usize,
    text: Option<String>,
}

/// Fetch a manifest and bring it to v3
pub async fn load(
    state: &AppState,
    manifest_ref: &str,
    options: &Options,
) -> Result<Manifest, RunError> {
    tracing::info!("Loading manifest {manifest_ref}");
    let document = state.fetcher.json(manifest_ref).await?;
    let mut manifest = load_manifest(document, options.new_id.as_deref())?;

    if options.strip_vendor {
        strip_vendor_artifacts(&mut manifest, &state.config.iiif.thumbnail_size);
    }

    Ok(manifest)
}

/// Load and annotate one manifest
pub async fn run(
    state: &AppState,
    manifest_ref: &str,
    options: &Options,
) -> Result<(Manifest, ManifestReport), RunError> {
    let mut manifest = load(state, manifest_ref, options).await?;
    let report = annotate_manifest(state, &mut manifest, options).await;
    Ok((manifest, report))
}

pub async fn annotate_manifest(
    state: &AppState,
    manifest: &mut Manifest,
    options: &Options,
) -> ManifestReport {
    let mode = options.mode();
    let total = manifest.items.len();
    let mut report = ManifestReport::new(&manifest.id, total);
    let mut transcripts = Vec::new();

    for (index, canvas) in manifest.items.iter_mut().enumerate() {
        if state.cancel.is_cancelled() {
            tracing::warn!("Cancelled before canvas {}/{}", index + 1, total);
            report.cancelled = true;
            break;
        }

        tracing::info!("Transcribing canvas {}/{}: {}", index + 1, total, canvas.id);
        match process_canvas(state, canvas, mode).await {
            Ok(outcome) => {
                report.record_annotated(outcome.added);
                transcripts.extend(outcome.text);
            }
            Err(e) => {
                tracing::warn!("Canvas {} ({}) failed: {e}", index, canvas.id);
                report.record_failure(index, &canvas.id, e.to_string());
            }
        }
    }

    if options.describe && !report.cancelled {
        describe(state, manifest, &transcripts, &mut report).await;
    }

    report
}

async fn process_canvas(
    state: &AppState,
    canvas: &mut Canvas,
    mode: TranscriptionMode,
) -> Result<CanvasOutcome, ProcessingError> {
    let image = canvas
        .primary_image()
        .map(|image| image.id.clone())
        .ok_or(ProcessingError::NoImage)?;

    let result = state.transcriber.transcribe(&image, mode).await?;
    let added = state.assembler.attach(canvas, &result)?;

    Ok(CanvasOutcome {
        added,
        text: result.transcript.plain_text(),
    })
}

/// Append model-derived descriptive metadata; failures are recorded only
async fn describe(
    state: &AppState,
    manifest: &mut Manifest,
    transcripts: &[String],
    report: &mut ManifestReport,
) {
    if transcripts.is_empty() {
        tracing::warn!("No transcripts to describe for {}", manifest.id);
        report.describe_error = Some("no transcripts".to_string());
        return;
    }

    tracing::info!("Extracting descriptive metadata for {}", manifest.id);
    match state.transcriber.describe(&transcripts.join("\n\n")).await {
        Ok(description) => {
            let entries = metadata_entries(&description);
            report.metadata_added = entries.len();
            manifest.metadata.extend(entries);
        }
        Err(e) => {
            tracing::warn!("Metadata extraction failed for {}: {e}", manifest.id);
            report.describe_error = Some(e.to_string());
        }
    }
}
