//! Assess command - risk assessment of a set of care logs

use anyhow::{Context, Result};
use carelog_domain::usecases::care_plan_items;
use carelog_domain::{CareLog, RiskAssessment};
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::providers::build_risk_assessor;
use crate::args::AssessArgs;
use crate::config::AppConfig;

/// Accepted input layouts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CareLogInput {
    List(Vec<CareLog>),
    Wrapped {
        #[serde(rename = "careLogs")]
        care_logs: Vec<CareLog>,
    },
}

impl CareLogInput {
    fn into_logs(self) -> Vec<CareLog> {
        match self {
            CareLogInput::List(logs) => logs,
            CareLogInput::Wrapped { care_logs } => care_logs,
        }
    }
}

pub async fn execute(args: AssessArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let raw = read_source(&args.file)?;
    let care_logs = parse_care_logs(&raw)?;

    if care_logs.is_empty() {
        anyhow::bail!("No care logs found in {}", args.file.display());
    }

    let assessor = build_risk_assessor(&config)?;

    tracing::info!(
        provider = assessor.name(),
        logs = care_logs.len(),
        "Assessing care logs"
    );

    let assessment = assessor
        .assess_risk(&care_logs)
        .await
        .context("Risk assessment failed")?;

    if args.plans {
        let items = care_plan_items(&assessment);
        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&items).context("Failed to serialize output")?
            );
        } else if items.is_empty() {
            println!("No care-plan items.");
        } else {
            for item in &items {
                println!("{}. [{}] {}", item.id, item.level.as_str(), item.title);
                println!("   Goal: {}", item.goal);
                for task in &item.tasks {
                    println!("   - {}", task);
                }
            }
        }
    } else if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&assessment).context("Failed to serialize output")?
        );
    } else {
        print_assessment(&assessment);
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

pub(crate) fn parse_care_logs(raw: &str) -> Result<Vec<CareLog>> {
    let input: CareLogInput = serde_json::from_str(raw)
        .context("Care logs must be a JSON array or an object with a careLogs array")?;
    Ok(input.into_logs())
}

fn print_assessment(assessment: &RiskAssessment) {
    println!("Risk Assessment");
    println!("===============");
    println!();
    println!("Risk level: {}", assessment.risk_level.as_str());
    if let Some(ref notes) = assessment.notes {
        println!("Notes: {}", notes);
    }
    println!();

    if assessment.findings.is_empty() {
        println!("No findings.");
        return;
    }

    println!("Findings:");
    for finding in &assessment.findings {
        println!(
            "  - {} [{}] {}",
            finding.id,
            finding.severity.as_str(),
            finding.title
        );
        if !finding.recommendation.is_empty() {
            println!("    Recommendation: {}", finding.recommendation);
        }
        if !finding.evidence.is_empty() {
            println!("    Evidence:");
            for e in &finding.evidence {
                println!("      - \"{}\"", e);
            }
        }
        println!();
    }
}
