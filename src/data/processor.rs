//! Data Processor Module
//! Narrows the loaded dataset to the rows a slide plots.

use crate::data::{DataRecord, Metric};

/// Filtering helpers over loaded records.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows of the given year, in source order.
    pub fn select_year(records: &[DataRecord], year: i32) -> Vec<DataRecord> {
        records.iter().filter(|r| r.year == year).copied().collect()
    }

    /// One metric's values, in row order.
    pub fn metric_values(records: &[DataRecord], metric: Metric) -> Vec<f64> {
        records.iter().map(|r| r.value(metric)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<DataRecord> {
        vec![
            DataRecord::new(2021, 5, 36450.272, 114530378.0),
            DataRecord::new(2022, 3, 80424.85, 161874846.0),
            DataRecord::new(2021, 1, 190740.858, 60356748.0),
        ]
    }

    #[test]
    fn select_year_preserves_source_order() {
        let rows = DataProcessor::select_year(&sample(), 2021);
        let months: Vec<u32> = rows.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![5, 1]);
    }

    #[test]
    fn select_year_without_match_is_empty() {
        assert!(DataProcessor::select_year(&sample(), 1999).is_empty());
    }

    #[test]
    fn metric_values_follow_rows() {
        let rows = DataProcessor::select_year(&sample(), 2021);
        assert_eq!(
            DataProcessor::metric_values(&rows, Metric::Deaths),
            vec![36450.272, 190740.858]
        );
    }
}
