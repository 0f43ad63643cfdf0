//! Summarize command - one-shot summary of a care note

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::PathBuf;

use super::providers::build_summarizer;
use crate::args::SummarizeArgs;
use crate::config::AppConfig;

pub async fn execute(args: SummarizeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let text = get_input_text(&args)?;

    if text.trim().is_empty() {
        anyhow::bail!("No text provided for summarization");
    }

    let summarizer = build_summarizer(&config)?;

    tracing::info!(
        provider = summarizer.name(),
        text_length = text.len(),
        "Summarizing text"
    );

    let result = summarizer
        .summarize(&text)
        .await
        .context("Summarization failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        println!("{}", result.summary);
    }

    Ok(())
}

fn get_input_text(args: &SummarizeArgs) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    match args.file {
        Some(ref path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        // Stdin for "-" or when no input is specified
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read from stdin")?;
            Ok(text)
        }
    }
}
