mod common;

use chrono::NaiveDate;
use common::{TestWorkspace, column, orders_table};
use sheet_cleaner::{
    CleanOptions, CleanState, Cleaner, SemanticType, Table, TypeMapping, TypeSource, Value,
    clean_table, io_utils::WriteOptions,
};

fn ints(values: &[i64]) -> Vec<Option<Value>> {
    values.iter().map(|v| Some(Value::Integer(*v))).collect()
}

#[test]
fn clean_resolves_types_and_normalizes_headers() {
    let table = orders_table();
    let mut cleaner = Cleaner::new(&table, TypeMapping::new());
    cleaner.clean();
    let cleaned = cleaner.clean_data();

    assert_eq!(
        cleaned.headers(),
        vec!["order_id", "price", "shipped", "weight", "notes", "empty"]
    );
    assert_eq!(cleaned.column("order_id").unwrap().cells, ints(&[1, 2, 3, 4]));
    assert_eq!(
        cleaned.column("price").unwrap().cells,
        vec![
            Some(Value::from("10")),
            Some(Value::from("")),
            Some(Value::from("12")),
            Some(Value::from("abc")),
        ]
    );
    assert_eq!(
        cleaned.column("shipped").unwrap().cells,
        vec![
            Some(Value::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
            None,
            Some(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())),
            Some(Value::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())),
        ]
    );
    assert_eq!(
        cleaned.column("weight").unwrap().cells,
        vec![
            Some(Value::Float(1.5)),
            Some(Value::Float(2.0)),
            Some(Value::Float(0.0)),
            Some(Value::Float(0.25)),
        ]
    );
    assert_eq!(
        cleaned.column("empty").unwrap().cells,
        vec![Some(Value::from("")); 4]
    );

    let resolved = cleaner
        .resolved_columns()
        .iter()
        .map(|c| (c.name.as_str(), c.semantic_type))
        .collect::<Vec<_>>();
    assert_eq!(
        resolved,
        vec![
            ("order id", SemanticType::Int),
            (" price ", SemanticType::Text),
            ("shipped", SemanticType::DateTime),
            ("weight", SemanticType::Float),
            ("notes", SemanticType::Text),
            ("empty", SemanticType::Text),
        ]
    );
}

#[test]
fn explicit_mapping_overrides_detection() {
    let table = Table::new(vec![column("price", &[Some("3"), Some("4"), None])]).unwrap();
    let mapping = TypeMapping::new().with("price", SemanticType::Float);
    let mut cleaner = Cleaner::new(&table, mapping);
    cleaner.clean();

    assert_eq!(
        cleaner.clean_data().column("price").unwrap().cells,
        vec![
            Some(Value::Float(3.0)),
            Some(Value::Float(4.0)),
            Some(Value::Float(0.0)),
        ]
    );
    assert_eq!(cleaner.resolved_columns()[0].source, TypeSource::Mapping);
}

#[test]
fn mapping_uses_original_column_names() {
    let table = orders_table();
    let mapping = TypeMapping::new().with(" price ", SemanticType::Int);
    let cleaned = clean_table(&table, mapping);
    assert_eq!(cleaned.column("price").unwrap().cells, ints(&[10, 0, 12, 0]));
}

#[test]
fn mapping_can_force_numeric_column_to_text() {
    let table = Table::new(vec![column("zip", &[Some("02134"), Some("90210")])]).unwrap();
    let cleaned = clean_table(&table, TypeMapping::new().with("zip", SemanticType::Text));
    assert_eq!(
        cleaned.column("zip").unwrap().cells,
        vec![Some(Value::from("02134")), Some(Value::from("90210"))]
    );
}

#[test]
fn fallback_column_is_reasserted_as_integers() {
    let table = Table::new(vec![column("n", &[Some("5"), Some("inf"), None])]).unwrap();
    let cleaned = clean_table(&table, TypeMapping::new().with("n", SemanticType::Int));
    assert_eq!(cleaned.column("n").unwrap().cells, ints(&[5, 0, 0]));
}

#[test]
fn cleaning_twice_is_not_cumulative() {
    let table = orders_table();
    let mut cleaner = Cleaner::new(&table, TypeMapping::new());
    let first = cleaner.clean().clean_data().clone();
    let second = cleaner.clean().clean_data().clone();
    assert_eq!(first, second);
}

#[test]
fn source_table_is_never_mutated() {
    let table = orders_table();
    let before = table.clone();
    let mut cleaner = Cleaner::new(&table, TypeMapping::new().with("weight", SemanticType::Int));
    cleaner.clean();
    cleaner.clean();
    assert_eq!(table, before);
}

#[test]
fn accessor_returns_copy_before_cleaning() {
    let table = orders_table();
    let cleaner = Cleaner::new(&table, TypeMapping::new());
    assert_eq!(cleaner.state(), CleanState::Uncleaned);
    assert_eq!(cleaner.clean_data(), &table);
    assert!(cleaner.resolved_columns().is_empty());
}

#[test]
fn accessor_is_stable_after_cleaning() {
    let table = orders_table();
    let mut cleaner = Cleaner::new(&table, TypeMapping::new());
    cleaner.clean();
    assert_eq!(cleaner.state(), CleanState::Cleaned);
    let first = cleaner.clean_data().clone();
    assert_eq!(cleaner.clean_data(), &first);
    assert_eq!(cleaner.clean_data(), &first);
}

#[test]
fn header_normalization_can_be_disabled() {
    let table = orders_table();
    let cleaned = Cleaner::new(&table, TypeMapping::new())
        .with_options(CleanOptions {
            normalize_headers: false,
        })
        .run();
    assert_eq!(cleaned.headers(), table.headers());
}

#[test]
fn run_matches_clean_then_accessor() {
    let table = orders_table();
    let mut cleaner = Cleaner::new(&table, TypeMapping::new());
    let expected = cleaner.clean().clean_data().clone();
    assert_eq!(clean_table(&table, TypeMapping::new()), expected);
}

#[test]
fn every_cleaned_column_holds_a_single_type() {
    let cleaned = clean_table(&orders_table(), TypeMapping::new());
    for column in cleaned.columns() {
        let kinds = column
            .non_missing()
            .map(std::mem::discriminant)
            .collect::<std::collections::HashSet<_>>();
        assert!(kinds.len() <= 1, "column {} mixes types", column.name);
    }
}

#[test]
fn save_writes_cleaned_table() {
    let workspace = TestWorkspace::new();
    let output = workspace.join("cleaned.csv");
    let table = orders_table();
    let mut cleaner = Cleaner::new(&table, TypeMapping::new());
    cleaner
        .clean()
        .save(&output, &WriteOptions::default())
        .expect("save");

    let written = std::fs::read_to_string(&output).expect("read output");
    let lines = written.lines().collect::<Vec<_>>();
    assert_eq!(lines[0], "order_id,price,shipped,weight,notes,empty");
    assert_eq!(lines[1], "1,10,2024-01-01,1.5,,");
    assert_eq!(lines[2], "2,,,2.0,fragile,");
}
