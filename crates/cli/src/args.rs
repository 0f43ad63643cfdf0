//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// carelog: summaries, risk assessments and transcripts for care logs
#[derive(Parser, Debug)]
#[command(name = "carelog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a care note into one or two short sentences
    Summarize(SummarizeArgs),

    /// Assess dementia-related risk signs in a set of care logs
    Assess(AssessArgs),

    /// Transcribe an audio recording
    Transcribe(TranscribeArgs),

    /// Transcribe a recording and summarize the transcript
    Preview(PreviewArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Text to summarize
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// File containing text to summarize (use - for stdin)
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// JSON file with care logs: an array or {"careLogs": [...]} (use - for stdin)
    #[arg(long)]
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output care-plan items instead of the raw assessment
    #[arg(long)]
    pub plans: bool,
}

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// Audio file to transcribe
    #[arg(long)]
    pub audio: PathBuf,

    /// MIME type of the audio (guessed from the extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Audio file to preview
    #[arg(long)]
    pub audio: PathBuf,

    /// MIME type of the audio (guessed from the extension when omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
