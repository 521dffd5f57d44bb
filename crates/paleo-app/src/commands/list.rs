use std::collections::HashMap;
use std::path::Path;

use paleo_io::{output_file_name, parse_list};

use crate::commands::manifest::write_output;
use crate::pipeline::{self, Options, RunError};
use crate::report::BatchReport;
use crate::state::AppState;

/// Annotate every manifest named in the list at `list_ref`.
///
/// Only a list that cannot be read is an error. Manifests whose output
/// already exists are skipped and manifest failures are recorded in the
/// report. A manifest interrupted by cancellation is not written, so the
/// next run picks it up again.
pub async fn run_list(
    state: &AppState,
    list_ref: &str,
    out_dir: &Path,
    options: &Options,
) -> Result<BatchReport, RunError> {
    let entries = parse_list(&state.fetcher.text(list_ref).await?);
    tracing::info!(
        "{} manifests listed in {list_ref} ({} duplicates ignored)",
        entries.identifiers.len(),
        entries.duplicates
    );

    let mut report = BatchReport {
        duplicates: entries.duplicates,
        ..Default::default()
    };
    // Each output keeps the identifier of its source manifest
    let options = Options {
        new_id: None,
        ..options.clone()
    };
    // Output name -> first identifier that claimed it
    let mut claimed: HashMap<String, &str> = HashMap::new();

    for identifier in &entries.identifiers {
        if state.cancel.is_cancelled() {
            tracing::warn!("Cancelled before {identifier}");
            report.cancelled = true;
            break;
        }

        let file_name = output_file_name(identifier);
        if let Some(first) = claimed.get(&file_name) {
            let message = format!("output {file_name} already claimed by {first}");
            tracing::warn!("Skipping {identifier}: {message}");
            report.failed.push((identifier.clone(), message));
            continue;
        }
        claimed.insert(file_name.clone(), identifier);

        let output = out_dir.join(&file_name);
        if tokio::fs::try_exists(&output).await.unwrap_or(false) {
            tracing::info!("Skipping {identifier}: {} exists", output.display());
            report.skipped_existing += 1;
            continue;
        }

        let manifest_ref = state.config.iiif.manifest_ref(identifier);
        let (manifest, manifest_report) = match pipeline::run(state, &manifest_ref, &options).await
        {
            Ok(done) => done,
            Err(e) => {
                tracing::error!("Manifest {identifier} failed: {e}");
                report.failed.push((identifier.clone(), e.to_string()));
                continue;
            }
        };

        if manifest_report.cancelled {
            tracing::warn!(
                "Cancelled during {identifier}, not writing {}",
                output.display()
            );
            report.cancelled = true;
            break;
        }

        match write_output(&output, &manifest, &manifest_report).await {
            Ok(()) => {
                report.processed += 1;
                report.canvas_failures += manifest_report.failures.len();
            }
            Err(e) => {
                tracing::error!("Manifest {identifier} failed: {e}");
                report.failed.push((identifier.clone(), e.to_string()));
            }
        }
    }

    tracing::info!("{report}");
    Ok(report)
}
