use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thicket_metrics::{MetricKey, ResultOption};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationReport {
    pub name: String,
    pub begin_line: usize,
    pub metrics: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReport {
    pub name: String,
    pub begin_line: usize,
    pub metrics: BTreeMap<String, f64>,
    /// Operation metrics reduced over the class, keyed `METRIC.reduction`.
    pub aggregates: BTreeMap<String, f64>,
    pub operations: Vec<OperationReport>,
}

/// Metric values of one analyzed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub classes: Vec<ClassReport>,
    /// Canonical (metric, options) pairs interned during the run.
    pub key_pool_size: usize,
    pub nodes: usize,
}

impl Report {
    pub(crate) fn named<N>(values: Vec<(MetricKey<N>, f64)>) -> BTreeMap<String, f64> {
        values
            .into_iter()
            .map(|(key, value)| (key.name().to_string(), value))
            .collect()
    }

    pub(crate) fn result_option_name(result_option: ResultOption) -> &'static str {
        match result_option {
            ResultOption::Sum => "sum",
            ResultOption::Highest => "highest",
            ResultOption::Average => "average",
        }
    }
}
