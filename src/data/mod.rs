//! Data module - CSV loading and year filtering

mod loader;
mod processor;
mod record;

pub use loader::{
    CachedSource, CsvSource, DataLoader, Dataset, DatasetSource, LoadError, LoadResult,
    PendingLoad,
};
pub use processor::DataProcessor;
pub use record::{DataRecord, Metric};
