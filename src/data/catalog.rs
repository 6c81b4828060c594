//! Reference data: scoring categories, vendors and their narratives.
//! Built-in defaults ship with the binary; a JSON file at [DEFAULT_CATALOG_PATH] overrides them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Fraction of the whole; defaults across a catalog sum to 1.0.
    pub default_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    /// One score (1-10) per category, aligned by position with [Catalog::categories].
    pub scores: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub best_for: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub vendors: Vec<Vendor>,
    #[serde(default)]
    pub narratives: BTreeMap<String, Narrative>,
}

impl Catalog {
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_category(&self, id: &str) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    /// Case-insensitive lookup so CLI and API callers can pass "emoney" for "eMoney".
    pub fn find_vendor(&self, name: &str) -> Option<&Vendor> {
        let needle = name.trim();
        self.vendors
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(needle))
    }

    pub fn narrative(&self, vendor_name: &str) -> Option<&Narrative> {
        self.narratives.get(vendor_name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        builtin_catalog()
    }
}

/// Load the catalog from JSON. Falls back to the built-in catalog if the file is missing or invalid.
pub fn load_catalog(path: &str) -> Catalog {
    let path = Path::new(path);
    if !path.exists() {
        return builtin_catalog();
    }
    let raw = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "catalog unreadable, using built-in data");
            return builtin_catalog();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "catalog invalid, using built-in data");
            builtin_catalog()
        }
    }
}

fn category(id: &str, name: &str, default_weight: f64) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        default_weight,
    }
}

fn vendor(name: &str, scores: [u8; 11]) -> Vendor {
    Vendor {
        name: name.to_string(),
        scores: scores.to_vec(),
    }
}

fn narrative(pros: &[&str], cons: &[&str], best_for: &str) -> Narrative {
    Narrative {
        pros: pros.iter().map(|s| s.to_string()).collect(),
        cons: cons.iter().map(|s| s.to_string()).collect(),
        best_for: best_for.to_string(),
    }
}

pub fn builtin_categories() -> Vec<Category> {
    vec![
        category("plan", "Planning", 0.15),
        category("crm", "CRM", 0.15),
        category("agg", "Agg/API", 0.12),
        category("rep", "Reporting", 0.10),
        category("ui", "UI/UX", 0.10),
        category("int", "Integrations", 0.10),
        category("work", "Workflow", 0.08),
        category("bill", "Billing", 0.05),
        category("comp", "Compliance", 0.05),
        category("onb", "Onboarding", 0.05),
        category("price", "Pricing", 0.05),
    ]
}

pub fn builtin_vendors() -> Vec<Vendor> {
    vec![
        vendor("RightCapital", [10, 5, 9, 6, 9, 8, 7, 5, 6, 8, 9]),
        vendor("Wealthbox", [4, 10, 7, 5, 10, 10, 9, 4, 5, 9, 9]),
        vendor("Redtail", [5, 8, 6, 5, 6, 9, 7, 5, 7, 7, 9]),
        vendor("Advyzon", [6, 8, 8, 10, 7, 7, 8, 9, 7, 8, 7]),
        vendor("Orion", [7, 5, 9, 10, 6, 9, 8, 9, 9, 7, 4]),
        vendor("Black Diamond", [6, 4, 8, 10, 9, 7, 7, 8, 6, 7, 3]),
        vendor("eMoney", [10, 5, 9, 7, 6, 7, 6, 6, 7, 6, 5]),
        vendor("Salesforce FSC", [5, 9, 8, 7, 6, 9, 10, 6, 8, 5, 2]),
        vendor("RIA in a Box", [2, 3, 2, 2, 7, 6, 9, 2, 10, 10, 7]),
    ]
}

fn builtin_narratives() -> BTreeMap<String, Narrative> {
    let entries = [
        (
            "RightCapital",
            narrative(
                &["Modern UI/UX", "Strong Tax & Cash Flow Viz", "Good Aggregation"],
                &["Less Estate Planning depth than eMoney", "Newer entrant"],
                "The 'v1' Launch Stack recommendation.",
            ),
        ),
        (
            "Wealthbox",
            narrative(
                &["Modern 'social' design", "Zero training time", "Strong API"],
                &["Light on compliance features", "Not an all-in-one"],
                "Agile firms prioritizing speed & UX.",
            ),
        ),
        (
            "Redtail",
            narrative(
                &["Industry standard", "Deep workflow history", "Cost effective"],
                &["Dated Interface", "Slower innovation cycle"],
                "Firms wanting the 'safe' standard choice.",
            ),
        ),
        (
            "Advyzon",
            narrative(
                &[
                    "True All-In-One (CRM+Rep+Bill)",
                    "Single database structure",
                    "High support touch",
                ],
                &["Planning module is basic", "Proprietary ecosystem"],
                "Advisors wanting one login for everything.",
            ),
        ),
        (
            "Orion",
            narrative(
                &[
                    "Massive integration marketplace",
                    "Deepest reporting/billing",
                    "Trading capabilities",
                ],
                &["Overkill for <$100M AUM", "Steep learning curve", "Expensive"],
                "Scaling firms anticipating >500 clients.",
            ),
        ),
        (
            "Black Diamond",
            narrative(
                &[
                    "Beautiful client portal",
                    "Excellent alternative asset reporting",
                    "Concierge service",
                ],
                &["Very expensive", "Weak CRM (recommends integration)"],
                "High-Net-Worth / Boutique focus.",
            ),
        ),
        (
            "eMoney",
            narrative(
                &[
                    "Gold standard for cash flow",
                    "Deep estate planning",
                    "Client portal is sticky",
                ],
                &["Expensive", "UI feeling dated vs RightCapital"],
                "Planning-centric firms doing deep estate work.",
            ),
        ),
        (
            "Salesforce FSC",
            narrative(
                &["Infinite customization", "Enterprise scale", "Ecosystem"],
                &[
                    "Requires consultant to setup",
                    "Very expensive",
                    "Overwhelming",
                ],
                "Large enterprises (> $1B AUM).",
            ),
        ),
        (
            "RIA in a Box",
            narrative(
                &[
                    "Automated compliance calendar",
                    "Registration expertise",
                    "Audit prep tools",
                ],
                &[
                    "Specialist tool (not a core stack replacement)",
                    "Separate login",
                ],
                "Firms needing a dedicated Compliance OS.",
            ),
        ),
    ];
    entries
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect()
}

pub fn builtin_catalog() -> Catalog {
    Catalog {
        categories: builtin_categories(),
        vendors: builtin_vendors(),
        narratives: builtin_narratives(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_weights_sum_to_one() {
        let total: f64 = builtin_categories().iter().map(|c| c.default_weight).sum();
        assert!((total - 1.0).abs() < 1e-9, "got {total}");
    }

    #[test]
    fn every_builtin_vendor_has_a_narrative_and_aligned_scores() {
        let catalog = builtin_catalog();
        for v in &catalog.vendors {
            assert_eq!(v.scores.len(), catalog.categories.len(), "{}", v.name);
            assert!(catalog.narrative(&v.name).is_some(), "{}", v.name);
        }
    }

    #[test]
    fn find_vendor_ignores_case_and_whitespace() {
        let catalog = builtin_catalog();
        assert_eq!(
            catalog.find_vendor("  emoney ").map(|v| v.name.as_str()),
            Some("eMoney")
        );
        assert!(catalog.find_vendor("Nope").is_none());
    }

    #[test]
    fn load_catalog_falls_back_when_missing() {
        let catalog = load_catalog("/definitely/not/here/catalog.json");
        assert_eq!(catalog, builtin_catalog());
    }
}
