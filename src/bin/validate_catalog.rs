//! Validate a vendor catalog file and print every diagnostic.
//! Run: cargo run --bin validate_catalog -- [path]

use riadesk::data::catalog::DEFAULT_CATALOG_PATH;
use riadesk::data::validate::{validate_catalog_file, ValidationSeverity};

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

    let report = match validate_catalog_file(&path) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    println!(
        "Validated {}: {} errors, {} warnings, {} info",
        path,
        report.count(ValidationSeverity::Error),
        report.count(ValidationSeverity::Warning),
        report.count(ValidationSeverity::Info)
    );
    if report.has_errors() {
        std::process::exit(1);
    }
}
