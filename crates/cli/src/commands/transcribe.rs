//! Transcribe command - speech-to-text for a recording

use anyhow::{Context, Result};
use carelog_domain::{AudioInput, MAX_AUDIO_BYTES, mime_for_extension};
use std::path::{Path, PathBuf};

use super::providers::build_transcriber;
use crate::args::TranscribeArgs;
use crate::config::AppConfig;

pub async fn execute(args: TranscribeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let audio = read_audio(&args.audio, args.mime.as_deref())?;
    if audio.bytes.len() > MAX_AUDIO_BYTES {
        anyhow::bail!(
            "Audio file is {} bytes; the limit is {} bytes",
            audio.bytes.len(),
            MAX_AUDIO_BYTES
        );
    }
    if !audio.is_supported() {
        anyhow::bail!("Unsupported audio type: {}", audio.mime_type);
    }

    let transcriber = build_transcriber(&config)?;

    tracing::info!(
        provider = transcriber.name(),
        bytes = audio.bytes.len(),
        mime_type = %audio.mime_type,
        "Transcribing audio"
    );

    let result = transcriber
        .transcribe(&audio)
        .await
        .context("Transcription failed")?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        println!("{}", result.text);
    }

    Ok(())
}

/// Load an audio file, taking the MIME type from `mime` or the file extension
pub(crate) fn read_audio(path: &Path, mime: Option<&str>) -> Result<AudioInput> {
    let mime_type = match mime {
        Some(mime) => mime.trim().to_string(),
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .map(str::to_string)
            .with_context(|| {
                format!(
                    "Cannot infer audio type of {}; pass --mime",
                    path.display()
                )
            })?,
    };

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(AudioInput::new(bytes, mime_type))
}
