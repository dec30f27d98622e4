//! Metric catalogs per language.

use thicket_ast::Node;
use tracing::trace;

use crate::computer::MetricsComputer;
use crate::config::AnalysisConfig;
use crate::error::MetricLookupError;
use crate::key::MetricKey;

/// The metrics one language defines, and the computer they run on.
pub trait LanguageMetricsProvider<N: Node> {
    /// Metrics of containers (classes, modules).
    fn class_metrics(&self) -> &[MetricKey<N>];

    /// Metrics of operations (methods, functions).
    fn operation_metrics(&self) -> &[MetricKey<N>];

    fn computer(&self) -> &MetricsComputer<N>;

    /// Class metrics followed by operation metrics.
    fn metrics(&self) -> Vec<MetricKey<N>> {
        self.class_metrics()
            .iter()
            .chain(self.operation_metrics())
            .cloned()
            .collect()
    }

    /// Every metric supporting `node`, with default options, in catalog order.
    /// Metrics yielding NaN are left out.
    fn compute_all_metrics_for(&self, node: &N) -> Vec<(MetricKey<N>, f64)> {
        self.compute_all_metrics_configured(node, &AnalysisConfig::default())
    }

    /// Like [`LanguageMetricsProvider::compute_all_metrics_for`], with options
    /// taken from `config`.
    fn compute_all_metrics_configured(
        &self,
        node: &N,
        config: &AnalysisConfig,
    ) -> Vec<(MetricKey<N>, f64)> {
        trace!(node = node.kind(), "computing all metrics");
        let computer = self.computer();
        self.class_metrics()
            .iter()
            .chain(self.operation_metrics())
            .filter(|key| key.supports(node))
            .filter_map(|key| {
                let value = computer.compute_for_node(key, node, config.options_for(key.name()));
                (!value.is_nan()).then(|| (key.clone(), value))
            })
            .collect()
    }

    /// The single metric named `name` that supports `node`.
    fn find_metric(&self, name: &str, node: &N) -> Result<MetricKey<N>, MetricLookupError> {
        let named: Vec<&MetricKey<N>> = self
            .class_metrics()
            .iter()
            .chain(self.operation_metrics())
            .filter(|key| key.name() == name)
            .collect();
        if named.is_empty() {
            return Err(MetricLookupError::UnknownMetric(name.to_string()));
        }

        let mut supported = named.into_iter().filter(|key| key.supports(node));
        match (supported.next(), supported.next()) {
            (Some(key), None) => Ok(key.clone()),
            (None, _) => Err(MetricLookupError::UnsupportedNode {
                metric: name.to_string(),
                kind: node.kind(),
            }),
            (Some(_), Some(_)) => Err(MetricLookupError::Ambiguous {
                metric: name.to_string(),
                kind: node.kind(),
            }),
        }
    }

    /// Memoized value of the metric named `name` on `node`, with default options.
    fn metric_by_name(&self, node: &N, name: &str) -> Result<f64, MetricLookupError> {
        let key = self.find_metric(name, node)?;
        Ok(key.compute_for_default(node, self.computer()))
    }
}

/// A provider assembled from plain lists of keys.
#[derive(Debug, Clone)]
pub struct BasicMetricsProvider<N> {
    class_metrics: Vec<MetricKey<N>>,
    operation_metrics: Vec<MetricKey<N>>,
    computer: MetricsComputer<N>,
}

impl<N: Node> BasicMetricsProvider<N> {
    pub fn new(
        class_metrics: Vec<MetricKey<N>>,
        operation_metrics: Vec<MetricKey<N>>,
        computer: MetricsComputer<N>,
    ) -> Self {
        Self {
            class_metrics,
            operation_metrics,
            computer,
        }
    }
}

impl<N: Node> LanguageMetricsProvider<N> for BasicMetricsProvider<N> {
    fn class_metrics(&self) -> &[MetricKey<N>] {
        &self.class_metrics
    }

    fn operation_metrics(&self) -> &[MetricKey<N>] {
        &self.operation_metrics
    }

    fn computer(&self) -> &MetricsComputer<N> {
        &self.computer
    }
}
