use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::catalog::Category;

/// User-adjustable importance per category id. Values are not required to sum to 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightState(BTreeMap<String, f64>);

impl WeightState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting weights: each category's default fraction as a 0-100 integer.
    pub fn from_defaults(categories: &[Category]) -> Self {
        Self(
            categories
                .iter()
                .map(|c| (c.id.clone(), (c.default_weight * 100.0).round()))
                .collect(),
        )
    }

    pub fn with(mut self, category_id: &str, weight: f64) -> Self {
        self.set(category_id, weight);
        self
    }

    pub fn set(&mut self, category_id: &str, weight: f64) {
        self.0.insert(category_id.to_string(), weight);
    }

    /// Weight used by the scorer: missing, negative and non-finite entries count as zero.
    pub fn effective(&self, category_id: &str) -> f64 {
        match self.0.get(category_id) {
            Some(w) if w.is_finite() && *w > 0.0 => *w,
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries with a positive weight, in key order.
    pub fn active(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter().filter(|(_, v)| *v > 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Multiply every weight by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.iter().map(|(k, v)| (k.clone(), v * factor)).collect())
    }

    /// Keys that do not name a category in `categories`.
    pub fn unknown_keys<'a>(&'a self, categories: &[Category]) -> Vec<&'a str> {
        self.0
            .keys()
            .filter(|k| !categories.iter().any(|c| &c.id == *k))
            .map(String::as_str)
            .collect()
    }

    /// Keys whose value is negative or not a finite number.
    pub fn invalid_keys(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, v)| !v.is_finite() || **v < 0.0)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

impl FromIterator<(String, f64)> for WeightState {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
