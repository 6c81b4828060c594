pub mod ranking;
pub mod weights;

pub use ranking::{final_score, find_result, rank_vendors, top_results, VendorResult};
pub use weights::WeightState;

use crate::data::catalog::Catalog;

/// Rank every vendor in the catalog under `weights`.
pub fn score_catalog(catalog: &Catalog, weights: &WeightState) -> Vec<VendorResult> {
    rank_vendors(&catalog.vendors, &catalog.categories, weights)
}
