//! Recover a single JSON object from model output
//!
//! Recovery strategies are independent pure functions tried in order; the
//! refinement round-trip is a separate stage behind [`JsonRefiner`].

use regex::Regex;
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt;
use std::sync::LazyLock;

use crate::ports::{AiError, JsonRefiner};

pub const PARSE_FAILURE: &str = "Failed to parse risk assessment JSON";

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*(.*?)```").expect("Valid regex"));
static FENCED_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)```").expect("Valid regex"));

/// A recovery strategy: locate a JSON candidate inside free text
pub type RecoveryStrategy = fn(&str) -> Option<&str>;

/// Strategies in priority order
pub const RECOVERY_STRATEGIES: &[(&str, RecoveryStrategy)] = &[
    ("fenced_json", fenced_json),
    ("fenced_any", fenced_any),
    ("brace_scan", brace_span),
];

/// Content of the first ```json fence
pub fn fenced_json(text: &str) -> Option<&str> {
    let inner = FENCED_JSON.captures(text)?.get(1)?.as_str().trim();
    (!inner.is_empty()).then_some(inner)
}

/// The brace span inside the first fence of any language
pub fn fenced_any(text: &str) -> Option<&str> {
    let inner = FENCED_ANY.captures(text)?.get(1)?.as_str();
    brace_span(inner)
}

/// Greedy span from the first `{` to the last `}`
pub fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// First candidate produced by any strategy
pub fn recover_json_span(text: &str) -> Option<&str> {
    RECOVERY_STRATEGIES.iter().find_map(|(name, strategy)| {
        let span = strategy(text)?;
        tracing::debug!(strategy = %name, "Recovered JSON candidate");
        Some(span)
    })
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Direct parse, then the recovery strategies. Only objects count.
pub fn try_parse_json(text: &str) -> Option<Map<String, Value>> {
    parse_object(text.trim()).or_else(|| parse_object(recover_json_span(text)?))
}

/// Parse `text` as a JSON object, asking `refiner` to reformat it once if the
/// local strategies fail. With no refiner the local failure is final.
pub async fn extract_json(
    text: &str,
    refiner: Option<&dyn JsonRefiner>,
) -> Result<Map<String, Value>, AiError> {
    extract_json_with(text, refiner, Ok::<_, Infallible>).await
}

/// Like [`extract_json`], but an object only counts once `accept` takes it.
///
/// A rejected object is treated the same as no object: the refiner gets one
/// attempt, and the refined object must pass `accept` too.
pub async fn extract_json_with<T, E, F>(
    text: &str,
    refiner: Option<&dyn JsonRefiner>,
    accept: F,
) -> Result<T, AiError>
where
    E: fmt::Display,
    F: Fn(Map<String, Value>) -> Result<T, E>,
{
    let local_failure = match try_parse_json(text).map(&accept) {
        Some(Ok(value)) => return Ok(value),
        Some(Err(rejection)) => format!("{}: {}", PARSE_FAILURE, rejection),
        None => PARSE_FAILURE.to_string(),
    };

    let Some(refiner) = refiner else {
        tracing::error!(raw = %text, error = %local_failure, "Unusable JSON and no refinement stage");
        return Err(AiError::Parse(local_failure));
    };

    tracing::warn!(error = %local_failure, "Local JSON recovery failed, requesting refinement");
    let refined = refiner.refine(text).await?;

    match try_parse_json(&refined).map(&accept) {
        Some(Ok(value)) => Ok(value),
        Some(Err(rejection)) => {
            tracing::error!(raw = %text, refined = %refined, error = %rejection, "Refined JSON was rejected");
            Err(AiError::Parse(format!("{}: {}", PARSE_FAILURE, rejection)))
        }
        None => {
            tracing::error!(raw = %text, refined = %refined, "Refined output is still not JSON");
            Err(AiError::Parse(PARSE_FAILURE.to_string()))
        }
    }
}

/// Wrap `body` in a fenced code block
pub fn fence(language: &str, body: &str) -> String {
    format!("```{}\n{}\n```", language, body)
}
