//! Prompt text for the advisory calls. Pure string building, no I/O.

use crate::scoring::{top_results, VendorResult, WeightState};

/// Results listed in the shared context block.
pub const CONTEXT_TOP_N: usize = 5;
/// Weights above this count as a "priority" in the vendor insight prompt.
pub const INSIGHT_PRIORITY_THRESHOLD: f64 = 10.0;

const PHILOSOPHY: &str = "\
You are an expert RIA technology consultant following a specific Philosophy:
1. Non-Custodial Orientation (Assets stay at Fidelity/Schwab).
2. Anti-Bloat (Systems must be simple & stable).
3. API-First (Avoid screen scraping).";

pub fn weights_summary(weights: &WeightState, separator: &str, with_percent: bool) -> String {
    weights
        .active()
        .map(|(id, value)| {
            if with_percent {
                format!("{id}: {value}%")
            } else {
                format!("{id}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn ranking_summary(results: &[VendorResult]) -> String {
    top_results(results, CONTEXT_TOP_N)
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} ({})", i + 1, r.name, r.final_score))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shared context block: active weights and the current top rankings.
pub fn context_block(weights: &WeightState, results: &[VendorResult]) -> String {
    format!(
        "Current Configuration:\nWeights: {}\n\nTop Rankings:\n{}",
        weights_summary(weights, ", ", true),
        ranking_summary(results)
    )
}

pub fn selection_analysis_prompt(
    winner: &VendorResult,
    weights: &WeightState,
    results: &[VendorResult],
) -> String {
    let runner_up = results
        .iter()
        .find(|r| r.name != winner.name)
        .map_or("the next-best option", |r| r.name.as_str());
    format!(
        "{PHILOSOPHY}\n\n{context}\n\nTask:\n\
Provide a concise, executive summary (max 150 words).\n\
1. Validate why {winner} is the correct choice based specifically on the user's highest weighted categories.\n\
2. Mention one trade-off or risk compared to the runner-up ({runner_up}).\n\
3. Use a professional, strategic tone.",
        context = context_block(weights, results),
        winner = winner.name,
    )
}

pub fn comparison_prompt(
    target: &VendorResult,
    winner: &VendorResult,
    weights: &WeightState,
) -> String {
    format!(
        "Compare {target} vs {winner} (The Winner).\n\
Context: The user values these weights: {weights}.\n\
Scores: {target}={target_score}, {winner}={winner_score}.\n\n\
Provide a 2-sentence reason why {target} lost to {winner}, focusing on the weighted categories where they fell short.",
        target = target.name,
        winner = winner.name,
        weights = weights_summary(weights, ",", false),
        target_score = target.final_score,
        winner_score = winner.final_score,
    )
}

pub fn vendor_insight_prompt(vendor: &VendorResult, weights: &WeightState) -> String {
    let priorities = weights
        .iter()
        .filter(|(_, v)| *v > INSIGHT_PRIORITY_THRESHOLD)
        .map(|(id, _)| id)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Analyze {name} for an RIA.\n\
User Priorities: {priorities}.\n\n\
Philosophy:\n\
- Prefer API/OAuth over scraping.\n\
- Prefer simple/stable over complex/bloated.\n\n\
Provide 3 concise bullet points on how this vendor fits this philosophy.",
        name = vendor.name,
    )
}

pub fn chat_system_instruction(weights: &WeightState, results: &[VendorResult]) -> String {
    format!(
        "You are an intelligent assistant for the RIA Command Center.\n\
You MUST adhere to the \"Technology & Vendors Master Document\" philosophy:\n\
- Technology must enhance clarity.\n\
- Systems must be simple and stable.\n\
- Favor API-first integrations (Tier 1).\n\
- Avoid screen-scraping (Tier 3).\n\
- Non-custodial orientation.\n\n\
Current Matrix Context:\n{context}\n\n\
Keep answers concise (under 100 words) and helpful.",
        context = context_block(weights, results)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::builtin_catalog;
    use crate::scoring::score_catalog;

    fn ranked() -> (WeightState, Vec<VendorResult>) {
        let catalog = builtin_catalog();
        let weights = WeightState::new().with("plan", 100.0).with("crm", 0.0);
        let results = score_catalog(&catalog, &weights);
        (weights, results)
    }

    #[test]
    fn context_lists_positive_weights_and_top_five() {
        let (weights, results) = ranked();
        let context = context_block(&weights, &results);
        assert!(context.contains("Weights: plan: 100%"));
        assert!(!context.contains("crm"));
        assert!(context.contains("1. RightCapital (10)"));
        assert!(context.contains("5. "));
        assert!(!context.contains("6. "));
    }

    #[test]
    fn analysis_names_runner_up() {
        let (weights, results) = ranked();
        let prompt = selection_analysis_prompt(&results[0], &weights, &results);
        assert!(prompt.contains("why RightCapital is the correct choice"));
        assert!(prompt.contains("runner-up (eMoney)"));
    }

    #[test]
    fn insight_priorities_use_threshold() {
        let (_, results) = ranked();
        let weights = WeightState::new().with("plan", 11.0).with("ui", 10.0);
        let prompt = vendor_insight_prompt(&results[0], &weights);
        assert!(prompt.contains("User Priorities: plan."));
    }
}
