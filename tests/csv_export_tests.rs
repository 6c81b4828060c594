use riadesk::data::catalog::{builtin_catalog, Catalog, Category, Vendor};
use riadesk::export::{export_matrix_csv, parse_matrix_csv, CsvError};

#[test]
fn builtin_catalog_round_trips_through_csv() {
    let catalog = builtin_catalog();
    let csv = export_matrix_csv(&catalog).expect("export should succeed");
    let parsed = parse_matrix_csv(&csv).expect("exported csv should parse");

    assert_eq!(parsed.categories, catalog.category_names());
    assert_eq!(parsed.vendors, catalog.vendors);
}

#[test]
fn names_with_commas_and_quotes_survive() {
    let catalog = Catalog {
        categories: vec![Category {
            id: "plan".to_string(),
            name: "Planning, Tax & \"Cash\"".to_string(),
            default_weight: 1.0,
        }],
        vendors: vec![Vendor {
            name: "Acme, Inc.".to_string(),
            scores: vec![7],
        }],
        narratives: Default::default(),
    };
    let csv = export_matrix_csv(&catalog).expect("export should succeed");
    let parsed = parse_matrix_csv(&csv).expect("csv should parse");
    assert_eq!(parsed.categories, vec!["Planning, Tax & \"Cash\"".to_string()]);
    assert_eq!(parsed.vendors[0].name, "Acme, Inc.");
    assert_eq!(parsed.vendors[0].scores, vec![7]);
}

#[test]
fn malformed_input_is_reported() {
    assert!(matches!(parse_matrix_csv(""), Err(CsvError::MissingHeader)));
    assert!(matches!(
        parse_matrix_csv("Name,Planning\nA,1\n"),
        Err(CsvError::BadHeader(_))
    ));
    match parse_matrix_csv("Vendor,Planning\nA,ten\n") {
        Err(CsvError::BadScore { row, column, value }) => {
            assert_eq!(row, 1);
            assert_eq!(column, "Planning");
            assert_eq!(value, "ten");
        }
        other => panic!("expected BadScore, got {other:?}"),
    }
}
