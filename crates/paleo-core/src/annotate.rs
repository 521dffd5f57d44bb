use chrono::{DateTime, SecondsFormat, Utc};
use paleo_config::annotation::AnnotationConfig;
use paleo_types::{
    Agent, Annotation, AnnotationPage, Body, Canvas, Motivation, Region, Target, TextualBody,
    Transcript, TranscriptionResult, WordBox,
};
use uuid::Uuid;

use crate::error::AssembleError;
use crate::preprocess::html_span;

/// Tool identity written as the generator of every annotation
pub const GENERATOR: &str = concat!("paleo ", env!("CARGO_PKG_VERSION"));

const PAGE_SUFFIX: &str = "/annotations/htr";

/// Builds transcription and rationale annotations for canvases
#[derive(Debug, Clone)]
pub struct Assembler {
    creator: Agent,
    generator: Agent,
    transcript_language: String,
    rationale_language: String,
}

impl Assembler {
    /// `model` is recorded as the creator of every annotation
    pub fn new(model: &str, config: &AnnotationConfig) -> Self {
        Self {
            creator: Agent::software(model),
            generator: Agent::software(GENERATOR),
            transcript_language: config.transcript_language.clone(),
            rationale_language: config.rationale_language.clone(),
        }
    }

    /// Attach annotations stamped with the current time
    pub fn attach(
        &self,
        canvas: &mut Canvas,
        result: &TranscriptionResult,
    ) -> Result<usize, AssembleError> {
        self.attach_at(canvas, result, Utc::now())
    }

    /// Attach annotations for one transcription result.
    ///
    /// Appends rather than replaces: running twice duplicates annotations.
    /// Returns the number of annotations added.
    pub fn attach_at(
        &self,
        canvas: &mut Canvas,
        result: &TranscriptionResult,
        now: DateTime<Utc>,
    ) -> Result<usize, AssembleError> {
        let stamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut annotations = match &result.transcript {
            Transcript::Text(text) => vec![self.whole_canvas_transcription(canvas, text)],
            Transcript::Words(words) => self.word_transcriptions(canvas, words, result.source_size),
            Transcript::Undecodable { error, raw } => {
                return Err(AssembleError::Undecodable {
                    error: error.clone(),
                    raw: raw.clone(),
                });
            }
        };
        annotations.push(self.rationale(canvas, &result.rationale));

        for annotation in &mut annotations {
            annotation.creator = Some(self.creator.clone().into());
            annotation.generator = Some(self.generator.clone().into());
            annotation.created = Some(stamp.clone());
            annotation.generated = Some(stamp.clone());
        }

        let added = annotations.len();
        annotation_page(canvas).items.extend(annotations);

        tracing::debug!("Attached {added} annotations to {}", canvas.id);
        Ok(added)
    }

    fn whole_canvas_transcription(&self, canvas: &Canvas, text: &str) -> Annotation {
        let body = TextualBody::new(html_span(text), "text/html", &self.transcript_language)
            .with_purpose(Motivation::Transcribing);

        Annotation::new(
            annotation_id(&canvas.id),
            Motivation::Transcribing,
            Body::TextualBody(body),
            Target::canvas(&canvas.id),
        )
    }

    fn word_transcriptions(
        &self,
        canvas: &Canvas,
        words: &[WordBox],
        source_size: Option<(u32, u32)>,
    ) -> Vec<Annotation> {
        let (scale_x, scale_y) = scale(canvas, source_size);

        words
            .iter()
            .filter_map(|word| {
                let Some(region) = canvas_region(canvas, word, scale_x, scale_y) else {
                    tracing::debug!("Dropping empty box for {:?} on {}", word.raw, canvas.id);
                    return None;
                };
                let body = TextualBody::new(&word.raw, "text/plain", &self.transcript_language)
                    .with_purpose(Motivation::Transcribing);

                Some(Annotation::new(
                    annotation_id(&canvas.id),
                    Motivation::Transcribing,
                    Body::TextualBody(body),
                    Target::region(&canvas.id, region),
                ))
            })
            .collect()
    }

    fn rationale(&self, canvas: &Canvas, rationale: &str) -> Annotation {
        let body = TextualBody::new(rationale, "text/markdown", &self.rationale_language)
            .with_purpose(Motivation::Commenting);

        Annotation::new(
            annotation_id(&canvas.id),
            Motivation::Commenting,
            Body::TextualBody(body),
            Target::canvas(&canvas.id),
        )
    }
}

fn annotation_id(canvas_id: &str) -> String {
    format!("{canvas_id}/annotation/{}", Uuid::new_v4())
}

/// The canvas's transcription page, created on first use
fn annotation_page(canvas: &mut Canvas) -> &mut AnnotationPage {
    let page_id = format!("{}{PAGE_SUFFIX}", canvas.id);
    let index = match canvas.annotations.iter().position(|page| page.id == page_id) {
        Some(index) => index,
        None => {
            canvas.annotations.push(AnnotationPage::new(page_id));
            canvas.annotations.len() - 1
        }
    };
    &mut canvas.annotations[index]
}

/// Factor from source image pixels to canvas pixels
fn scale(canvas: &Canvas, source_size: Option<(u32, u32)>) -> (f64, f64) {
    match source_size {
        Some((width, height)) if width > 0 && height > 0 => (
            f64::from(canvas.width) / f64::from(width),
            f64::from(canvas.height) / f64::from(height),
        ),
        _ => (1.0, 1.0),
    }
}

/// Box scaled to canvas pixels and clamped inside the canvas; `None` when
/// nothing of it remains
fn canvas_region(canvas: &Canvas, word: &WordBox, scale_x: f64, scale_y: f64) -> Option<Region> {
    let (x, w) = clamp_span(word.x * scale_x, word.w * scale_x, canvas.width);
    let (y, h) = clamp_span(word.y * scale_y, word.h * scale_y, canvas.height);

    if w == 0 || h == 0 {
        return None;
    }

    let region = Region { x, y, w, h };
    debug_assert!(region.fits_within(canvas.width, canvas.height));
    Some(region)
}

fn clamp_span(start: f64, length: f64, limit: u32) -> (u32, u32) {
    let limit = f64::from(limit);
    // NaN falls back to zero through max()
    let start = start.round().max(0.0).min(limit);
    let end = (start + length.round().max(0.0)).min(limit);
    (start as u32, (end - start) as u32)
}
