use std::collections::HashSet;
use std::fmt;
use std::fs;

use crate::data::catalog::Catalog;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Allowed drift of the summed default weights away from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Read and validate a catalog JSON file. Err only when the file cannot be read or parsed.
pub fn validate_catalog_file(path: &str) -> Result<ValidationReport, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("unable to read '{path}': {err}"))?;
    let catalog: Catalog = serde_json::from_str(&raw)
        .map_err(|err| format!("unable to parse json '{path}': {err}"))?;
    Ok(validate_catalog(&catalog))
}

pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    if catalog.categories.is_empty() {
        report.push(ValidationSeverity::Error, "categories", "no categories defined");
    }

    let mut seen_ids = HashSet::new();
    for (index, category) in catalog.categories.iter().enumerate() {
        let context = format!("categories[{index}]");
        if category.id.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.id"),
                "missing non-empty 'id'",
            );
        } else if !seen_ids.insert(category.id.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.id"),
                format!("duplicate id '{}'", category.id),
            );
        }
        if category.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            );
        }
        if !category.default_weight.is_finite() || category.default_weight < 0.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.defaultWeight"),
                format!("must be a non-negative number, got {}", category.default_weight),
            );
        }
    }

    let weight_sum: f64 = catalog.categories.iter().map(|c| c.default_weight).sum();
    if !catalog.categories.is_empty() && (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        report.push(
            ValidationSeverity::Warning,
            "categories",
            format!("default weights sum to {weight_sum:.4}, expected 1.0"),
        );
    }

    let mut seen_vendors = HashSet::new();
    for (index, vendor) in catalog.vendors.iter().enumerate() {
        let context = format!("vendors[{index}] name='{}'", vendor.name);
        if vendor.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("vendors[{index}].name"),
                "missing non-empty 'name'",
            );
        } else if !seen_vendors.insert(vendor.name.to_lowercase()) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "duplicate vendor name",
            );
        }
        if vendor.scores.len() != catalog.categories.len() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.scores"),
                format!(
                    "expected {} scores (one per category), got {}",
                    catalog.categories.len(),
                    vendor.scores.len()
                ),
            );
        }
        for (score_index, score) in vendor.scores.iter().enumerate() {
            if !(MIN_SCORE..=MAX_SCORE).contains(score) {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.scores[{score_index}]"),
                    format!("score {score} outside {MIN_SCORE}..={MAX_SCORE}"),
                );
            }
        }
        if catalog.narrative(&vendor.name).is_none() {
            report.push(ValidationSeverity::Info, context, "no narrative");
        }
    }

    for name in catalog.narratives.keys() {
        if !catalog.vendors.iter().any(|v| &v.name == name) {
            report.push(
                ValidationSeverity::Warning,
                format!("narratives['{name}']"),
                "narrative for unknown vendor",
            );
        }
    }

    report
}
