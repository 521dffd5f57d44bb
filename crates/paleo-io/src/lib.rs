pub mod list;
pub mod output;
pub mod source;

pub use list::{ListEntries, parse_list};
pub use output::{WriteError, output_file_name, to_json_string, write_json};
pub use source::{FetchError, Fetcher, Source};
