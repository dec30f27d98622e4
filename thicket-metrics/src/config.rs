use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::options::MetricOptions;
use crate::result_option::ResultOption;

/// Per-run analysis settings.
///
/// ```
/// use thicket_metrics::{AnalysisConfig, MetricOption, ResultOption};
///
/// let config: AnalysisConfig = serde_json::from_str(
///     r#"{ "options": { "CYCLO": ["ignoreBooleanPaths"] }, "aggregate": ["highest"] }"#,
/// )
/// .unwrap();
/// assert!(config.options_for("CYCLO").contains(&MetricOption::new("ignoreBooleanPaths")));
/// assert!(config.options_for("NCSS").is_empty());
/// assert_eq!(config.aggregate, vec![ResultOption::Highest]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Options per metric name. Metrics not listed use no options.
    pub options: BTreeMap<String, MetricOptions>,
    /// Reductions of operation metrics reported on each container.
    pub aggregate: Vec<ResultOption>,
}

impl AnalysisConfig {
    pub fn options_for(&self, metric: &str) -> &MetricOptions {
        self.options.get(metric).unwrap_or(MetricOptions::empty())
    }

    pub fn with_options(mut self, metric: impl Into<String>, options: MetricOptions) -> Self {
        self.options.insert(metric.into(), options);
        self
    }

    pub fn with_aggregate(mut self, result_option: ResultOption) -> Self {
        self.aggregate.push(result_option);
        self
    }
}
