use folio_challenges::{
    portfolio::loader::{load_items, normalize_profit_rate, parse_items, RejectedRow, RowError},
    ErrorCategory, PortfolioError,
};
use folio_utils::TableError;
use std::path::PathBuf;

#[test]
fn test_normalize_profit_rate() {
    assert_eq!(normalize_profit_rate(15.0), 0.15);
    assert_eq!(normalize_profit_rate(0.15), 0.15);
    assert_eq!(normalize_profit_rate(1.0), 1.0);
    assert_eq!(normalize_profit_rate(0.0), 0.0);
}

#[test]
fn test_parse_comma_table_with_percent_values() {
    let report = parse_items("name,price,profit\nAction-1,20,5\nAction-2,30,10%\n").unwrap();
    assert!(report.rejected.is_empty());
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].name(), "Action-1");
    assert_eq!(report.items[0].cost(), 20.0);
    assert_eq!(report.items[0].profit_rate(), 0.05);
    assert_eq!(report.items[1].profit_rate(), 0.10);
}

#[test]
fn test_parse_semicolon_table_with_comma_decimals() {
    let text = "Actions;Coût;Cost;Bénéfice après 2 ans\nShare-A;x;1 500,50;12,5%\nShare-B;y;250;0,2\n";
    let report = parse_items(text).unwrap();
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].cost(), 1500.5);
    assert_eq!(report.items[0].profit_rate(), 0.125);
    assert_eq!(report.items[1].profit_rate(), 0.2);
}

#[test]
fn test_rejected_rows_are_reported() {
    let text = "id,cost,profit_pct\n\
                A,100,10\n\
                ,100,10\n\
                C,0,10\n\
                D,-5,10\n\
                E,abc,10\n\
                F,100,\n\
                G,100,0\n";
    let report = parse_items(text).unwrap();
    assert_eq!(
        report.items.iter().map(|i| i.name()).collect::<Vec<_>>(),
        vec!["A", "G"]
    );
    assert_eq!(
        report.rejected,
        vec![
            RejectedRow {
                line: 3,
                error: RowError::Missing("name")
            },
            RejectedRow {
                line: 4,
                error: RowError::NonPositiveCost(0.0)
            },
            RejectedRow {
                line: 5,
                error: RowError::NonPositiveCost(-5.0)
            },
            RejectedRow {
                line: 6,
                error: RowError::Unparseable {
                    field: "cost",
                    value: "abc".to_string()
                }
            },
            RejectedRow {
                line: 7,
                error: RowError::Missing("profit_rate")
            },
        ]
    );
}

#[test]
fn test_missing_column_fails_whole_table() {
    let err = parse_items("name,price\nA,10\n").unwrap_err();
    assert!(matches!(
        err,
        PortfolioError::Table(TableError::MissingColumn { ref column, .. }) if column == "profit_rate"
    ));
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[test]
fn test_missing_file() {
    let err = load_items(PathBuf::from("/nonexistent/folio/items.csv")).unwrap_err();
    assert!(matches!(err, PortfolioError::Io { .. }));
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[test]
fn test_load_items_from_file() {
    let path = std::env::temp_dir().join(format!("folio-loader-{}.csv", std::process::id()));
    std::fs::write(&path, "name;price;profit\nA;2000;30\nB;3500;15\nC;1000;50\n").unwrap();
    let report = load_items(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(report.items.len(), 3);
    assert_eq!(report.items[2].profit_rate(), 0.5);
}
