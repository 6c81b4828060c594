use serde::Serialize;

use crate::data::catalog::{Category, Vendor};
use crate::scoring::weights::WeightState;

/// A vendor with its weighted composite score. Derived on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorResult {
    pub name: String,
    pub scores: Vec<u8>,
    pub final_score: f64,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weighted composite for one vendor.
///
/// `Σ(score[i] * w[i] / 100) / (Σ w[i] / 100)` over the categories the vendor has scores for.
/// With no positive weight among them the plain mean of those scores is used instead.
pub fn final_score(vendor: &Vendor, categories: &[Category], weights: &WeightState) -> f64 {
    let mut weighted = 0.0;
    let mut weight_total = 0.0;
    let mut raw_total = 0.0;
    let mut counted = 0usize;

    for (category, score) in categories.iter().zip(vendor.scores.iter()) {
        let w = weights.effective(&category.id) / 100.0;
        let s = f64::from(*score);
        weighted += s * w;
        weight_total += w;
        raw_total += s;
        counted += 1;
    }

    if counted == 0 {
        return 0.0;
    }
    if weight_total > 0.0 {
        round_one_decimal(weighted / weight_total)
    } else {
        round_one_decimal(raw_total / counted as f64)
    }
}

/// Score every vendor and sort descending by final score. Ties keep input order.
pub fn rank_vendors(
    vendors: &[Vendor],
    categories: &[Category],
    weights: &WeightState,
) -> Vec<VendorResult> {
    let mut ranked: Vec<VendorResult> = vendors
        .iter()
        .map(|vendor| VendorResult {
            name: vendor.name.clone(),
            scores: vendor.scores.clone(),
            final_score: final_score(vendor, categories, weights),
        })
        .collect();

    ranked.sort_by(|left, right| right.final_score.total_cmp(&left.final_score));

    ranked
}

pub fn top_results(results: &[VendorResult], n: usize) -> &[VendorResult] {
    &results[..results.len().min(n)]
}

pub fn find_result<'a>(results: &'a [VendorResult], name: &str) -> Option<&'a VendorResult> {
    let needle = name.trim();
    results.iter().find(|r| r.name.eq_ignore_ascii_case(needle))
}
