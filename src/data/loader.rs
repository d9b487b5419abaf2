//! CSV Data Loader Module
//! Parses the yearly COVID dataset with Polars and hands results back from a worker thread.

use crate::data::{DataRecord, Metric};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use thiserror::Error;
use tracing::{debug, info, warn};

const YEAR_COLUMN: &str = "year";
const MONTH_COLUMN: &str = "month";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Missing required column `{0}`")]
    MissingColumn(String),
    #[error("Loader stopped before producing a result")]
    Interrupted,
}

pub type LoadResult = Result<Arc<Dataset>, LoadError>;

/// Records of one load cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<DataRecord>,
    /// Rows dropped because a field failed numeric coercion or validation.
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn new(records: Vec<DataRecord>) -> Self {
        Self {
            records,
            skipped_rows: 0,
        }
    }
}

/// Anything that can produce a dataset for a source path.
pub trait DatasetSource: Send + Sync {
    fn load(&self, uri: &Path) -> LoadResult;
}

/// Reads the dataset from a CSV file.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSource;

impl CsvSource {
    pub fn new() -> Self {
        Self
    }

    /// Convert a raw (all text) frame into typed records, skipping rows that do not coerce.
    pub fn records_from_frame(df: &DataFrame) -> Result<Dataset, LoadError> {
        let years = Self::numeric_column(df, YEAR_COLUMN)?;
        let months = Self::numeric_column(df, MONTH_COLUMN)?;
        let deaths = Self::numeric_column(df, Metric::Deaths.column())?;
        let vaccinations = Self::numeric_column(df, Metric::Vaccinations.column())?;

        let years = years.f64()?;
        let months = months.f64()?;
        let deaths = deaths.f64()?;
        let vaccinations = vaccinations.f64()?;

        let mut records = Vec::with_capacity(df.height());
        let mut skipped_rows = 0;

        for i in 0..df.height() {
            let row = (years.get(i), months.get(i), deaths.get(i), vaccinations.get(i));
            match Self::coerce_row(row) {
                Some(record) => records.push(record),
                None => {
                    debug!(row = i + 1, "skipping row that failed numeric coercion");
                    skipped_rows += 1;
                }
            }
        }

        Ok(Dataset {
            records,
            skipped_rows,
        })
    }

    fn numeric_column(df: &DataFrame, name: &str) -> Result<Column, LoadError> {
        let column = df
            .column(name)
            .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
        // Non-strict cast: unparsable text becomes null and is skipped per row.
        Ok(column.cast(&DataType::Float64)?)
    }

    fn coerce_row(
        (year, month, deaths, vaccinations): (Option<f64>, Option<f64>, Option<f64>, Option<f64>),
    ) -> Option<DataRecord> {
        let (year, month, deaths, vaccinations) = (year?, month?, deaths?, vaccinations?);

        if year.fract() != 0.0 || !(i32::MIN as f64..=i32::MAX as f64).contains(&year) {
            return None;
        }
        if month.fract() != 0.0 || !(1.0..=12.0).contains(&month) {
            return None;
        }
        let valid_metric = |v: f64| v.is_finite() && v >= 0.0;
        if !valid_metric(deaths) || !valid_metric(vaccinations) {
            return None;
        }

        Some(DataRecord::new(
            year as i32,
            month as u32,
            deaths,
            vaccinations,
        ))
    }
}

impl DatasetSource for CsvSource {
    fn load(&self, uri: &Path) -> LoadResult {
        if !uri.is_file() {
            return Err(LoadError::NotFound(uri.to_path_buf()));
        }

        // Every column is read as text so coercion failures stay per row.
        let df = LazyCsvReader::new(uri)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let dataset = Self::records_from_frame(&df)?;
        if dataset.skipped_rows > 0 {
            warn!(
                path = %uri.display(),
                skipped = dataset.skipped_rows,
                "dropped malformed dataset rows"
            );
        }
        info!(
            path = %uri.display(),
            rows = dataset.records.len(),
            "loaded dataset"
        );

        Ok(Arc::new(dataset))
    }
}

/// Memoizes another source by path. Failed loads are not cached.
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl<S: DatasetSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl<S: DatasetSource> DatasetSource for CachedSource<S> {
    fn load(&self, uri: &Path) -> LoadResult {
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(uri)
        {
            debug!(path = %uri.display(), "dataset cache hit");
            return Ok(Arc::clone(hit));
        }

        let dataset = self.inner.load(uri)?;
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(uri.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }
}

/// Starts dataset loads on background threads.
#[derive(Clone)]
pub struct DataLoader {
    source: Arc<dyn DatasetSource>,
}

impl DataLoader {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self { source }
    }

    /// CSV loader, optionally memoized by path.
    pub fn csv(cache: bool) -> Self {
        if cache {
            Self::new(Arc::new(CachedSource::new(CsvSource::new())))
        } else {
            Self::new(Arc::new(CsvSource::new()))
        }
    }

    /// Load synchronously on the calling thread.
    pub fn load_now(&self, uri: &Path) -> LoadResult {
        self.source.load(uri)
    }

    /// Start a one-shot load in a background thread.
    pub fn spawn(&self, uri: &Path, generation: u64) -> PendingLoad {
        let (tx, rx) = channel();
        let source = Arc::clone(&self.source);
        let path = uri.to_path_buf();

        thread::spawn(move || {
            let _ = tx.send(source.load(&path));
        });

        PendingLoad { generation, rx }
    }
}

/// Handle to a load running on a worker thread.
pub struct PendingLoad {
    generation: u64,
    rx: Receiver<LoadResult>,
}

impl PendingLoad {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Non-blocking check; `None` while the worker is still running.
    pub fn try_take(&self) -> Option<LoadResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Interrupted)),
        }
    }

    /// Block until the worker reports.
    pub fn wait(self) -> LoadResult {
        self.rx.recv().unwrap_or(Err(LoadError::Interrupted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl DatasetSource for CountingSource {
        fn load(&self, _uri: &Path) -> LoadResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Dataset::new(vec![DataRecord::new(2021, 1, 1.0, 2.0)])))
        }
    }

    struct PanickingSource;

    impl DatasetSource for PanickingSource {
        fn load(&self, _uri: &Path) -> LoadResult {
            panic!("source blew up");
        }
    }

    #[test]
    fn coerce_row_rejects_invalid_fields() {
        assert!(CsvSource::coerce_row((Some(2021.0), Some(1.0), Some(5.0), Some(6.0))).is_some());
        assert!(CsvSource::coerce_row((None, Some(1.0), Some(5.0), Some(6.0))).is_none());
        assert!(CsvSource::coerce_row((Some(2021.5), Some(1.0), Some(5.0), Some(6.0))).is_none());
        assert!(CsvSource::coerce_row((Some(2021.0), Some(0.0), Some(5.0), Some(6.0))).is_none());
        assert!(CsvSource::coerce_row((Some(2021.0), Some(13.0), Some(5.0), Some(6.0))).is_none());
        assert!(CsvSource::coerce_row((Some(2021.0), Some(2.0), Some(-1.0), Some(6.0))).is_none());
        assert!(
            CsvSource::coerce_row((Some(2021.0), Some(2.0), Some(1.0), Some(f64::NAN))).is_none()
        );
    }

    #[test]
    fn records_from_frame_skips_unparsable_rows() {
        let df = df!(
            "year" => ["2021", "2021", "2022"],
            "month" => ["1", "x", "3"],
            "new_deaths_smoothed" => ["10.5", "1", "7"],
            "new_vaccinations_smoothed" => ["100", "2", "70"],
        )
        .unwrap();

        let dataset = CsvSource::records_from_frame(&df).unwrap();
        assert_eq!(dataset.skipped_rows, 1);
        assert_eq!(
            dataset.records,
            vec![
                DataRecord::new(2021, 1, 10.5, 100.0),
                DataRecord::new(2022, 3, 7.0, 70.0),
            ]
        );
    }

    #[test]
    fn records_from_frame_requires_metric_columns() {
        let df = df!(
            "year" => ["2021"],
            "month" => ["1"],
            "new_deaths_smoothed" => ["10.5"],
        )
        .unwrap();

        let err = CsvSource::records_from_frame(&df).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "new_vaccinations_smoothed"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = CsvSource::new()
            .load(Path::new("does/not/exist.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn cached_source_loads_once_per_path() {
        let cached = CachedSource::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let a = cached.load(Path::new("a.csv")).unwrap();
        let b = cached.load(Path::new("a.csv")).unwrap();
        cached.load(Path::new("b.csv")).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cached.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn spawned_load_reports_on_channel() {
        let loader = DataLoader::new(Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        }));
        let pending = loader.spawn(Path::new("any.csv"), 7);
        assert_eq!(pending.generation(), 7);

        let dataset = pending.wait().unwrap();
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn panicking_worker_is_interrupted() {
        let loader = DataLoader::new(Arc::new(PanickingSource));
        let err = loader.spawn(Path::new("any.csv"), 1).wait().unwrap_err();
        assert!(matches!(err, LoadError::Interrupted));
    }
}
