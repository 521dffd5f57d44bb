pub mod list;
pub mod manifest;
