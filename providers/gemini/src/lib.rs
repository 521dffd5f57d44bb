pub mod api;
pub mod inline;
pub mod prompt;
pub mod transcriber;

pub use api::{Reply, parse_reply};
pub use prompt::Prompts;
pub use transcriber::GeminiTranscriber;
