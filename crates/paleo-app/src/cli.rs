use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pipeline::Options;

#[derive(Parser, Debug)]
#[command(
    name = "paleo",
    version,
    about = "Convert IIIF manifests to Presentation 3 and annotate them with handwriting transcriptions"
)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model identifier, overrides config and PALEO_MODEL
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Annotate a single manifest
    Manifest(ManifestArgs),
    /// Annotate every manifest named in a list file
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Manifest URL or local path
    #[arg(long, short)]
    pub source: String,

    /// Where to write the annotated manifest
    #[arg(long, short)]
    pub output: PathBuf,

    /// Identifier for the output manifest
    #[arg(long)]
    pub new_id: Option<String>,

    #[command(flatten)]
    pub processing: ProcessingArgs,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// List file (URL or path), one manifest identifier per line
    #[arg(long, short)]
    pub list: String,

    /// Directory receiving one annotated manifest per identifier
    #[arg(long, short)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub processing: ProcessingArgs,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ProcessingArgs {
    /// Rewrite the thumbnail size and relabel canvases "Page N"
    #[arg(long)]
    pub strip_vendor: bool,

    /// Transcribe word by word with bounding boxes
    #[arg(long)]
    pub coordinates: bool,

    /// Derive descriptive metadata from the transcripts
    #[arg(long)]
    pub describe: bool,
}

impl ProcessingArgs {
    pub fn options(self, new_id: Option<String>) -> Options {
        Options {
            new_id,
            strip_vendor: self.strip_vendor,
            coordinate_mode: self.coordinates,
            describe: self.describe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_command() {
        let cli = Cli::parse_from([
            "paleo",
            "manifest",
            "--source",
            "https://example.org/iiif/1/manifest",
            "--output",
            "out/1.json",
            "--coordinates",
            "--model",
            "gemini-2.5-flash",
        ]);

        assert_eq!(cli.model.as_deref(), Some("gemini-2.5-flash"));
        let Command::Manifest(args) = cli.cmd else {
            panic!("expected manifest command");
        };
        let options = args.processing.options(args.new_id);
        assert!(options.coordinate_mode);
        assert!(!options.strip_vendor);
        assert_eq!(args.output, PathBuf::from("out/1.json"));
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::parse_from([
            "paleo",
            "--log-json",
            "list",
            "--list",
            "ids.txt",
            "--output-dir",
            "out",
            "--strip-vendor",
            "--describe",
        ]);

        assert!(cli.log_json);
        let Command::List(args) = cli.cmd else {
            panic!("expected list command");
        };
        assert_eq!(args.list, "ids.txt");
        assert!(args.processing.strip_vendor && args.processing.describe);
    }
}
