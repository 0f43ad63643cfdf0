//! CLI subcommands

pub mod assess;
pub mod config;
pub mod doctor;
pub mod preview;
pub mod summarize;
pub mod transcribe;

mod providers;
