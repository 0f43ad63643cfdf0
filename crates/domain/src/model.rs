//! Domain models and value objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a detected risk. Closed set: anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// A single risk sign found in the care logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Machine identifier, e.g. "fall_risk"
    pub id: String,
    /// Human-readable heading
    pub title: String,
    pub severity: Severity,
    /// Log excerpts backing the finding
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Recommended response
    #[serde(default)]
    pub recommendation: String,
    /// Concrete follow-up tasks (at most three)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<String>>,
    /// Target outcome, one sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// Structured result of a risk assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: Severity,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Output of the summarization capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

/// Output of the transcription capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
}

/// A caregiver note as sent to the risk assessor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub content: String,
}

/// Audio payload handed to a transcriber
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl AudioInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// File extension used for the multipart upload
    pub fn extension(&self) -> &'static str {
        extension_for_mime(&self.mime_type)
    }

    pub fn is_supported(&self) -> bool {
        is_supported_audio_type(&self.mime_type)
    }
}

/// MIME types accepted for transcription
pub const SUPPORTED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
    "audio/wav",
    "audio/wave",
    "audio/x-wav",
    "audio/webm",
    "audio/ogg",
    "audio/flac",
    "audio/aac",
    "application/octet-stream",
];

/// Case-insensitive, ignoring parameters such as `;codecs=opus`
pub fn is_supported_audio_type(mime_type: &str) -> bool {
    SUPPORTED_AUDIO_TYPES.contains(&essence(mime_type).as_str())
}

fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Upload limit shared by the supported transcription APIs
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Guess a MIME type from a file extension; `None` for unsupported formats
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" | "mpeg" => Some("audio/mpeg"),
        "mp4" => Some("audio/mp4"),
        "m4a" => Some("audio/m4a"),
        "wav" => Some("audio/wav"),
        "webm" => Some("audio/webm"),
        "ogg" => Some("audio/ogg"),
        "flac" => Some("audio/flac"),
        _ => None,
    }
}

/// Map an audio MIME type to the file extension providers expect
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match essence(mime_type).as_str() {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/mp4" => "mp4",
        "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
        "audio/webm" => "webm",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        _ => "mp3",
    }
}

/// Display level of a care-plan item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanLevel {
    Alert,
    Warning,
}

impl PlanLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanLevel::Alert => "alert",
            PlanLevel::Warning => "warning",
        }
    }
}

impl From<Severity> for PlanLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => PlanLevel::Alert,
            Severity::Medium => PlanLevel::Warning,
        }
    }
}

/// A care-plan draft derived from one finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlanItem {
    pub uuid: Uuid,
    /// 1-based position within the assessment
    pub id: usize,
    pub level: PlanLevel,
    pub title: String,
    pub tasks: Vec<String>,
    pub goal: String,
    pub description: String,
}

/// Transcript plus its summary, as shown before a log is confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPreview {
    pub transcript: String,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_assessment_uses_camel_case() {
        let assessment = RiskAssessment {
            risk_level: Severity::High,
            findings: vec![],
            notes: None,
        };
        let json = serde_json::to_value(&assessment).unwrap();
        assert_eq!(json, serde_json::json!({"riskLevel": "high", "findings": []}));
    }

    #[test]
    fn test_unknown_severity_rejected() {
        let result: Result<Severity, _> = serde_json::from_str(r#""low""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("audio/x-m4a"), "m4a");
        assert_eq!(extension_for_mime("audio/wave"), "wav");
        assert_eq!(extension_for_mime("application/octet-stream"), "mp3");
        assert_eq!(extension_for_mime("audio/webm;codecs=opus"), "webm");
    }

    #[test]
    fn test_supported_audio_types() {
        assert!(is_supported_audio_type("audio/x-wav"));
        assert!(is_supported_audio_type("Audio/WebM; codecs=opus"));
        assert!(!is_supported_audio_type("text/plain"));
        assert!(!is_supported_audio_type(""));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("M4A"), Some("audio/m4a"));
        assert_eq!(mime_for_extension("mpeg"), Some("audio/mpeg"));
        assert_eq!(mime_for_extension("txt"), None);
    }

    #[test]
    fn test_severity_maps_to_plan_level() {
        assert_eq!(PlanLevel::from(Severity::High), PlanLevel::Alert);
        assert_eq!(PlanLevel::from(Severity::Medium), PlanLevel::Warning);
    }
}
