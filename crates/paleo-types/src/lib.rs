pub mod annotation;
pub mod language;
pub mod manifest;
pub mod transcription;

pub use annotation::{
    Agent, AgentRef, Annotation, AnnotationPage, Body, Choice, Motivation, OneOrMany, Region,
    Target, TextualBody,
};
pub use language::LanguageMap;
pub use manifest::{Canvas, ImageResource, Manifest, MetadataEntry, PRESENTATION_3_CONTEXT};
pub use transcription::{Transcript, TranscriptionMode, TranscriptionResult, WordBox};
