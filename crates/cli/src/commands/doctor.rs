//! Doctor command - validate configuration and show status

use anyhow::Result;
use carelog_adapters::llm::{Capability, supported_providers};
use carelog_domain::normalize::SanitizeLimits;
use serde::Serialize;
use std::path::PathBuf;

use super::providers::{load_api_key, provider_config};
use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    chat: CheckResult,
    transcription: CheckResult,
    summary: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        chat: CheckResult::error("Not checked"),
        transcription: CheckResult::error("Not checked"),
        summary: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.chat = check_provider(config, Capability::Summarization);
        report.transcription = check_provider(config, Capability::Transcription);
        report.summary = check_summary_limits(config);
    }

    let checks = [
        &report.config,
        &report.chat,
        &report.transcription,
        &report.summary,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

fn check_provider(config: &AppConfig, capability: Capability) -> CheckResult {
    let (settings, key_env) = provider_config(config, capability);
    let provider = settings.provider.as_str();
    let supported = supported_providers(capability);

    if !supported.contains(&provider) {
        return CheckResult::error(format!(
            "Provider {} does not support {} (supported: {})",
            provider,
            capability,
            supported.join(", ")
        ));
    }

    let Some(key_env) = key_env else {
        return CheckResult::ok(format!("Provider: {} (offline)", provider));
    };

    let details = serde_json::json!({
        "provider": provider,
        "model": settings.model,
        "base_url": settings.base_url,
    });
    let model = settings.model.as_deref().unwrap_or_default();

    // Report whether the key is set without revealing it
    if load_api_key(&key_env).is_some() {
        CheckResult::ok(format!(
            "Provider: {}, Model: {}, API key: {} (set)",
            provider, model, key_env
        ))
        .with_details(details)
    } else {
        CheckResult::warn(format!(
            "Provider: {}, Model: {}, API key: {} (not set)",
            provider, model, key_env
        ))
        .with_details(details)
    }
}

fn check_summary_limits(config: &AppConfig) -> CheckResult {
    let limits = match SanitizeLimits::new(config.summary.max_chars, config.summary.max_sentences) {
        Ok(limits) => limits,
        Err(e) => return CheckResult::error(e.to_string()),
    };

    CheckResult::ok(format!(
        "Max {} chars, {} sentences, risk validation: {}",
        limits.max_chars(),
        limits.max_sentences(),
        if config.risk.strict_validation {
            "strict"
        } else {
            "lenient"
        }
    ))
}

fn print_report(report: &DoctorReport) {
    println!("carelog Doctor Report");
    println!("=====================");
    println!();

    print_check("Config", &report.config);
    print_check("Chat Provider", &report.chat);
    print_check("Transcription", &report.transcription);
    print_check("Summary", &report.summary);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
