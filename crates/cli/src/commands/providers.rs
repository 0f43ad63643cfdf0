//! Provider construction from the application config

use anyhow::{Context, Result};
use carelog_adapters::llm::{Capability, PipelineOptions, ProviderConfig, get_provider_with};
use carelog_domain::normalize::SanitizeLimits;
use carelog_domain::policy::RiskPolicyConfig;
use carelog_domain::{RiskAssessor, Summarizer, Transcriber};
use secrecy::SecretString;

use crate::config::AppConfig;

pub(crate) fn build_summarizer(config: &AppConfig) -> Result<Box<dyn Summarizer>> {
    Ok(build(config, Capability::Summarization)?.into_summarizer()?)
}

pub(crate) fn build_risk_assessor(config: &AppConfig) -> Result<Box<dyn RiskAssessor>> {
    Ok(build(config, Capability::RiskAssessment)?.into_risk_assessor()?)
}

pub(crate) fn build_transcriber(config: &AppConfig) -> Result<Box<dyn Transcriber>> {
    Ok(build(config, Capability::Transcription)?.into_transcriber()?)
}

fn build(config: &AppConfig, capability: Capability) -> Result<carelog_adapters::ProviderHandle> {
    let (provider_config, key_env) = provider_config(config, capability);
    let provider = provider_config.provider.clone();

    get_provider_with(capability, &provider_config, &pipeline_options(config)?).with_context(|| {
        match key_env {
            Some(env) => format!(
                "Failed to configure {} provider {} (API key env: {})",
                capability, provider, env
            ),
            None => format!("Failed to configure {} provider {}", capability, provider),
        }
    })
}

/// Provider settings for `capability` and the env var its key is read from
pub(crate) fn provider_config(
    config: &AppConfig,
    capability: Capability,
) -> (ProviderConfig, Option<String>) {
    let ai = &config.ai;
    let name = match capability {
        Capability::Transcription => ai.transcription_provider.trim().to_ascii_lowercase(),
        Capability::Summarization | Capability::RiskAssessment => {
            ai.provider.trim().to_ascii_lowercase()
        }
    };

    let mut provider_config = ProviderConfig::new(name.clone());
    provider_config.timeout_secs = ai.timeout_secs;

    let (key_env, base_url, model) = match (name.as_str(), capability) {
        ("openai", Capability::Transcription) => (
            &ai.openai.api_key_env,
            &ai.openai.base_url,
            &ai.openai.transcription_model,
        ),
        ("sakura", Capability::Transcription) => (
            &ai.sakura.api_key_env,
            &ai.sakura.base_url,
            &ai.sakura.transcription_model,
        ),
        ("sakura", _) => (
            &ai.sakura.api_key_env,
            &ai.sakura.base_url,
            &ai.sakura.chat_model,
        ),
        _ => return (provider_config, None),
    };

    if let Some(api_key) = load_api_key(key_env) {
        provider_config = provider_config.with_api_key(api_key);
    }

    (
        provider_config.with_base_url(base_url).with_model(model),
        Some(key_env.clone()),
    )
}

pub(crate) fn pipeline_options(config: &AppConfig) -> Result<PipelineOptions> {
    let summary = SanitizeLimits::new(config.summary.max_chars, config.summary.max_sentences)
        .context("Invalid [summary] settings")?;

    Ok(PipelineOptions {
        summary,
        risk: RiskPolicyConfig {
            strict: config.risk.strict_validation,
            ..RiskPolicyConfig::default()
        },
    })
}

/// Read an API key from `env_var`; blank or unset yields `None`
pub(crate) fn load_api_key(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }

    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(|key| SecretString::new(key.into()))
}
