//! Shape constraints for risk assessments returned by a model

use serde_json::{Map, Value};

use crate::model::RiskAssessment;

/// Policy configuration
#[derive(Debug, Clone)]
pub struct RiskPolicyConfig {
    /// Reject instead of repairing recoverable violations
    pub strict: bool,
    /// Maximum tasks per finding
    pub max_tasks: usize,
}

impl Default for RiskPolicyConfig {
    fn default() -> Self {
        Self {
            strict: true,
            max_tasks: 3,
        }
    }
}

/// Validator turning a parsed JSON object into a typed [`RiskAssessment`]
#[derive(Debug, Clone, Default)]
pub struct RiskPolicy {
    config: RiskPolicyConfig,
}

impl RiskPolicy {
    pub fn new(config: RiskPolicyConfig) -> Self {
        Self { config }
    }

    /// Deserialize and validate. Enum values and required fields are always
    /// enforced; the task limit is enforced in strict mode and truncated otherwise.
    pub fn parse(&self, object: Map<String, Value>) -> Result<RiskAssessment, PolicyViolation> {
        let assessment: RiskAssessment = serde_json::from_value(Value::Object(object))
            .map_err(|e| PolicyViolation::Schema(e.to_string()))?;
        self.validate(assessment)
    }

    pub fn validate(&self, mut assessment: RiskAssessment) -> Result<RiskAssessment, PolicyViolation> {
        for (index, finding) in assessment.findings.iter_mut().enumerate() {
            if finding.id.trim().is_empty() {
                return Err(PolicyViolation::MissingField {
                    index,
                    field: "id",
                });
            }
            if finding.title.trim().is_empty() {
                return Err(PolicyViolation::MissingField {
                    index,
                    field: "title",
                });
            }

            if let Some(tasks) = finding.tasks.as_mut() {
                if tasks.len() > self.config.max_tasks {
                    if self.config.strict {
                        return Err(PolicyViolation::TooManyTasks {
                            index,
                            count: tasks.len(),
                            max: self.config.max_tasks,
                        });
                    }
                    tasks.truncate(self.config.max_tasks);
                }
            }
        }

        Ok(assessment)
    }
}

/// Policy violation errors
#[derive(Debug, thiserror::Error)]
pub enum PolicyViolation {
    #[error("Schema mismatch: {0}")]
    Schema(String),
    #[error("Finding {index} has an empty {field}")]
    MissingField { index: usize, field: &'static str },
    #[error("Finding {index} has {count} tasks (max {max})")]
    TooManyTasks {
        index: usize,
        count: usize,
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn finding(tasks: Vec<&str>) -> Value {
        json!({
            "id": "fall_risk",
            "title": "転倒リスクの増加",
            "severity": "high",
            "evidence": ["夜間のトイレでふらつき"],
            "recommendation": "見守り強化",
            "tasks": tasks,
            "goal": "転倒が発生しない"
        })
    }

    #[test]
    fn test_policy_accepts_valid_assessment() {
        let policy = RiskPolicy::default();
        let result = policy
            .parse(object(json!({
                "riskLevel": "high",
                "findings": [finding(vec!["足元灯を設置"])],
                "notes": "夜間に注意"
            })))
            .unwrap();

        assert_eq!(result.risk_level, Severity::High);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.notes.as_deref(), Some("夜間に注意"));
    }

    #[test]
    fn test_policy_rejects_unknown_severity() {
        let policy = RiskPolicy::default();
        let result = policy.parse(object(json!({"riskLevel": "low", "findings": []})));
        assert!(matches!(result, Err(PolicyViolation::Schema(_))));
    }

    #[test]
    fn test_policy_requires_findings() {
        let policy = RiskPolicy::default();
        let result = policy.parse(object(json!({"riskLevel": "medium"})));
        assert!(matches!(result, Err(PolicyViolation::Schema(_))));
    }

    #[test]
    fn test_policy_rejects_empty_title() {
        let mut bad = finding(vec![]);
        bad["title"] = json!(" ");
        let policy = RiskPolicy::default();
        let result = policy.parse(object(json!({"riskLevel": "high", "findings": [bad]})));
        assert!(matches!(
            result,
            Err(PolicyViolation::MissingField { field: "title", .. })
        ));
    }

    #[test]
    fn test_strict_policy_rejects_too_many_tasks() {
        let policy = RiskPolicy::default();
        let result = policy.parse(object(json!({
            "riskLevel": "high",
            "findings": [finding(vec!["a", "b", "c", "d"])]
        })));
        assert!(matches!(
            result,
            Err(PolicyViolation::TooManyTasks { count: 4, max: 3, .. })
        ));
    }

    #[test]
    fn test_lenient_policy_truncates_tasks() {
        let policy = RiskPolicy::new(RiskPolicyConfig {
            strict: false,
            ..Default::default()
        });
        let result = policy
            .parse(object(json!({
                "riskLevel": "high",
                "findings": [finding(vec!["a", "b", "c", "d"])]
            })))
            .unwrap();
        assert_eq!(result.findings[0].tasks.as_ref().unwrap().len(), 3);
    }
}
