use covid_slides::data::{CsvSource, DataLoader, DataRecord, DatasetSource, LoadError};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_typed_records_in_source_order() {
    let dataset = CsvSource::new().load(&fixture("sample_2021.csv")).unwrap();

    assert_eq!(dataset.skipped_rows, 0);
    assert_eq!(
        dataset.records,
        vec![
            DataRecord::new(2021, 1, 190740.85799999986, 60356748.0),
            DataRecord::new(2021, 5, 36450.272000000004, 114530378.0),
            DataRecord::new(2022, 3, 80424.85000000005, 161874846.0),
            DataRecord::new(2023, 4, 43591.153999999944, 183419494.0),
        ]
    );
}

#[test]
fn malformed_rows_are_skipped_and_counted() {
    let dataset = CsvSource::new().load(&fixture("malformed.csv")).unwrap();

    assert_eq!(dataset.skipped_rows, 5);
    let months: Vec<(i32, u32)> = dataset.records.iter().map(|r| (r.year, r.month)).collect();
    assert_eq!(months, vec![(2021, 1), (2021, 5)]);
}

#[test]
fn missing_column_is_reported() {
    let err = CsvSource::new()
        .load(&fixture("missing_column.csv"))
        .unwrap_err();
    assert!(
        matches!(&err, LoadError::MissingColumn(name) if name == "new_vaccinations_smoothed"),
        "unexpected error: {err}"
    );
}

#[test]
fn missing_file_is_not_found() {
    let path = fixture("does_not_exist.csv");
    let err = CsvSource::new().load(&path).unwrap_err();
    assert!(matches!(err, LoadError::NotFound(p) if p == path));
}

#[test]
fn background_load_delivers_dataset() {
    let loader = DataLoader::csv(false);
    let pending = loader.spawn(&fixture("sample_2021.csv"), 7);
    assert_eq!(pending.generation(), 7);

    let dataset = pending.wait().unwrap();
    assert_eq!(dataset.records.len(), 4);
}

#[test]
fn cached_loader_returns_same_dataset() {
    let loader = DataLoader::csv(true);
    let path = fixture("sample_2021.csv");
    let first = loader.load_now(&path).unwrap();
    let second = loader.load_now(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn bundled_dataset_covers_every_slide_year() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/covid_yearly_data.csv");
    let dataset = CsvSource::new().load(&path).unwrap();

    assert_eq!(dataset.skipped_rows, 0);
    for year in [2021, 2022, 2023] {
        let months = dataset.records.iter().filter(|r| r.year == year).count();
        assert_eq!(months, 12, "year {year}");
    }
}
