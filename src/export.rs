//! Raw vendor matrix as CSV: `Vendor,<category names...>` then one row of unweighted scores per vendor.

use thiserror::Error;

use crate::data::catalog::{Catalog, Vendor};

pub const MATRIX_FILE_NAME: &str = "vendor_matrix.csv";

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid utf-8")]
    Utf8,
    #[error("missing header row")]
    MissingHeader,
    #[error("first header column must be 'Vendor', got '{0}'")]
    BadHeader(String),
    #[error("row {row}: invalid score '{value}' in column '{column}'")]
    BadScore {
        row: usize,
        column: String,
        value: String,
    },
}

/// Parsed matrix: category names from the header plus each vendor's raw scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixCsv {
    pub categories: Vec<String>,
    pub vendors: Vec<Vendor>,
}

pub fn export_matrix_csv(catalog: &Catalog) -> Result<String, CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(catalog.categories.len() + 1);
    header.push("Vendor");
    header.extend(catalog.category_names());
    writer.write_record(&header)?;

    for vendor in &catalog.vendors {
        let mut row = Vec::with_capacity(vendor.scores.len() + 1);
        row.push(vendor.name.clone());
        row.extend(vendor.scores.iter().map(u8::to_string));
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| CsvError::Csv(err.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| CsvError::Utf8)
}

pub fn parse_matrix_csv(input: &str) -> Result<MatrixCsv, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_bytes());
    let mut records = reader.records();

    let header = records.next().ok_or(CsvError::MissingHeader)??;
    let first = header.get(0).unwrap_or_default();
    if first.trim() != "Vendor" {
        return Err(CsvError::BadHeader(first.to_string()));
    }
    let categories: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

    let mut vendors = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record?;
        let row = index + 1;
        let name = record.get(0).unwrap_or_default().to_string();
        let mut scores = Vec::with_capacity(record.len().saturating_sub(1));
        for (column_index, value) in record.iter().enumerate().skip(1) {
            let score = value.trim().parse::<u8>().map_err(|_| CsvError::BadScore {
                row,
                column: categories
                    .get(column_index - 1)
                    .cloned()
                    .unwrap_or_else(|| format!("#{column_index}")),
                value: value.to_string(),
            })?;
            scores.push(score);
        }
        vendors.push(Vendor { name, scores });
    }

    Ok(MatrixCsv {
        categories,
        vendors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::builtin_catalog;

    #[test]
    fn header_lists_category_names_after_vendor() {
        let csv = export_matrix_csv(&builtin_catalog()).expect("export");
        let header = csv.lines().next().expect("header");
        assert_eq!(
            header,
            "Vendor,Planning,CRM,Agg/API,Reporting,UI/UX,Integrations,Workflow,Billing,Compliance,Onboarding,Pricing"
        );
        assert!(csv.contains("\nRightCapital,10,5,9,6,9,8,7,5,6,8,9\n"));
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let mut catalog = builtin_catalog();
        catalog.vendors[0].name = "Acme, Inc.".to_string();
        let csv = export_matrix_csv(&catalog).expect("export");
        assert!(csv.contains("\"Acme, Inc.\",10,"));
    }

    #[test]
    fn bad_score_reports_row_and_column() {
        let err = parse_matrix_csv("Vendor,Planning,CRM\nA,5,x\n").expect_err("should fail");
        match err {
            CsvError::BadScore { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "CRM");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn wrong_first_header_is_rejected() {
        assert!(matches!(
            parse_matrix_csv("Name,Planning\nA,5\n"),
            Err(CsvError::BadHeader(_))
        ));
        assert!(matches!(parse_matrix_csv(""), Err(CsvError::MissingHeader)));
    }
}
