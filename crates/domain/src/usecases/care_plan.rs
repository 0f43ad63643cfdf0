//! Project a risk assessment into care-plan drafts

use uuid::Uuid;

use crate::model::{CarePlanItem, Finding, PlanLevel, RiskAssessment};

const MAX_PLAN_TASKS: usize = 3;

/// One draft per finding, in order, numbered from 1
pub fn care_plan_items(assessment: &RiskAssessment) -> Vec<CarePlanItem> {
    assessment
        .findings
        .iter()
        .enumerate()
        .map(|(index, finding)| plan_item(index + 1, finding))
        .collect()
}

fn plan_item(id: usize, finding: &Finding) -> CarePlanItem {
    let tasks: Vec<String> = match &finding.tasks {
        Some(tasks) => tasks.iter().take(MAX_PLAN_TASKS).cloned().collect(),
        None if !finding.recommendation.is_empty() => vec![finding.recommendation.clone()],
        None => Vec::new(),
    };
    let goal = finding.goal.clone().unwrap_or_default();

    // Stored description: first task, else goal, else recommendation.
    let description = tasks
        .first()
        .cloned()
        .or_else(|| (!goal.is_empty()).then(|| goal.clone()))
        .unwrap_or_else(|| finding.recommendation.clone());

    CarePlanItem {
        uuid: Uuid::new_v4(),
        id,
        level: PlanLevel::from(finding.severity),
        title: finding.title.clone(),
        tasks,
        goal,
        description,
    }
}
