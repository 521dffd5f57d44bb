pub mod annotate;
pub mod convert;
pub mod describe;
pub mod error;
pub mod image_uri;
pub mod preprocess;
pub mod toon;
pub mod vendor;
pub mod wordbox;

pub use annotate::{Assembler, GENERATOR};
pub use convert::{convert, load_manifest};
pub use error::{AssembleError, SchemaError};
