use std::fmt;

/// A canvas that received no annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasFailure {
    pub index: usize,
    pub canvas_id: String,
    pub message: String,
}

/// Outcome of annotating one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestReport {
    pub manifest_id: String,
    pub canvases: usize,
    /// Canvases that received annotations
    pub annotated: usize,
    pub annotations_added: usize,
    pub failures: Vec<CanvasFailure>,
    pub metadata_added: usize,
    /// Set when `--describe` was requested and did not succeed
    pub describe_error: Option<String>,
    /// Stopped early on Ctrl+C
    pub cancelled: bool,
}

impl ManifestReport {
    pub fn new(manifest_id: &str, canvases: usize) -> Self {
        Self {
            manifest_id: manifest_id.to_string(),
            canvases,
            ..Default::default()
        }
    }

    pub fn record_annotated(&mut self, added: usize) {
        self.annotated += 1;
        self.annotations_added += added;
    }

    pub fn record_failure(&mut self, index: usize, canvas_id: &str, message: String) {
        self.failures.push(CanvasFailure {
            index,
            canvas_id: canvas_id.to_string(),
            message,
        });
    }
}

impl fmt::Display for ManifestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} canvases annotated, {} annotations added, {} failed",
            self.manifest_id,
            self.annotated,
            self.canvases,
            self.annotations_added,
            self.failures.len()
        )?;
        if self.metadata_added > 0 {
            write!(f, ", {} metadata fields", self.metadata_added)?;
        }
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

/// Outcome of a list run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped_existing: usize,
    pub duplicates: usize,
    /// Identifier and reason for each manifest that could not be written
    pub failed: Vec<(String, String)>,
    /// Canvas failures summed across processed manifests
    pub canvas_failures: usize,
    pub cancelled: bool,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped (existing), {} duplicates, {} failed, {} canvas failures",
            self.processed,
            self.skipped_existing,
            self.duplicates,
            self.failed.len(),
            self.canvas_failures
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_report_summary() {
        let mut report = ManifestReport::new("https://example.org/m", 3);
        report.record_annotated(2);
        report.record_failure(1, "https://example.org/c1", "boom".into());
        report.record_annotated(2);

        assert_eq!(report.annotations_added, 4);
        assert_eq!(
            report.to_string(),
            "https://example.org/m: 2/3 canvases annotated, 4 annotations added, 1 failed"
        );
    }
}
