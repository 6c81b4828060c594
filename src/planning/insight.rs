use serde::Serialize;

use crate::data::goals::{priority_label, Goal};
use crate::planning::simulation::SimulationOutcome;

/// A goal costing more than this while ranked as a wish is called out.
pub const LUXURY_COST_THRESHOLD: f64 = 100_000.0;
pub const LUXURY_PRIORITY_CEILING: u8 = 4;
/// More active goals than this triggers the focus hint.
pub const CROWDED_GOAL_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Warning,
    Insight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanInsight {
    pub kind: InsightKind,
    pub text: String,
}

/// Rule-based trade-off feedback, first match wins: shortfall, expensive wish, crowded board.
pub fn plan_insight(goals: &[Goal], outcome: &SimulationOutcome) -> Option<PlanInsight> {
    let active: Vec<&Goal> = goals.iter().filter(|g| g.active).collect();

    if !outcome.success {
        let when = outcome
            .shortfall_year
            .map(|y| format!("in {y}"))
            .unwrap_or_else(|| "during the plan".to_string());
        let largest_optional = active
            .iter()
            .filter(|g| g.priority < 7)
            .max_by(|a, b| a.cost.total_cmp(&b.cost));
        let advice = match largest_optional {
            Some(goal) => format!("Consider reducing the scope of '{}'", goal.name),
            None => "Consider reducing goal costs".to_string(),
        };
        return Some(PlanInsight {
            kind: InsightKind::Warning,
            text: format!(
                "Warning: Projecting a shortfall {when}. {advice} or delaying 'Retirement' by 2 years."
            ),
        });
    }

    if let Some(luxury) = active
        .iter()
        .find(|g| g.cost > LUXURY_COST_THRESHOLD && g.priority < LUXURY_PRIORITY_CEILING)
    {
        return Some(PlanInsight {
            kind: InsightKind::Insight,
            text: format!(
                "Observation: '{}' is high cost but marked as '{}'. Removing it frees up ${:.0} for higher priorities.",
                luxury.name,
                priority_label(luxury.priority),
                luxury.cost
            ),
        });
    }

    if active.len() > CROWDED_GOAL_COUNT {
        return Some(PlanInsight {
            kind: InsightKind::Insight,
            text: "You have many competing goals active. Try prioritizing your top 3 to see the impact on your long-term safety.".to_string(),
        });
    }

    None
}
