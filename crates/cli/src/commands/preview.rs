//! Preview command - transcript plus summary of a recording

use anyhow::{Context, Result};
use carelog_domain::usecases::LogPreviewUseCase;
use std::path::PathBuf;

use super::providers::{build_summarizer, build_transcriber};
use super::transcribe::read_audio;
use crate::args::PreviewArgs;
use crate::config::AppConfig;

pub async fn execute(args: PreviewArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let audio = read_audio(&args.audio, args.mime.as_deref())?;
    let transcriber = build_transcriber(&config)?;
    let summarizer = build_summarizer(&config)?;

    let usecase = LogPreviewUseCase::new(&*transcriber, &*summarizer);
    let preview = match usecase.preview(&audio).await {
        Ok(preview) => preview,
        Err(e) => {
            let step = e.step();
            tracing::error!(step, error = %e, "Preview failed");
            return Err(e).with_context(|| format!("Preview failed at step: {}", step));
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&preview).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        println!("Transcript:");
        println!("{}", preview.transcript);
        println!();
        println!("Summary:");
        println!("{}", preview.summary);
    }

    Ok(())
}
