use std::sync::Arc;

use thicket_ast::{Node, NodeStreamExt};
use thicket_metrics::{KeyPool, LanguageMetricsProvider, MetricKey, MetricsComputer};

use crate::metrics;
use crate::nodes::{TwigKind, TwigNode};

/// The method declarations of a class.
pub fn find_operations(class: &TwigNode) -> Vec<TwigNode> {
    class
        .children()
        .filter_kind(TwigKind::MethodDeclaration.name())
        .collect()
}

/// Metrics provider for twig trees.
#[derive(Debug, Clone)]
pub struct TwigMetrics {
    class_metrics: Vec<MetricKey<TwigNode>>,
    operation_metrics: Vec<MetricKey<TwigNode>>,
    computer: MetricsComputer<TwigNode>,
}

impl TwigMetrics {
    /// A provider with its own key pool.
    pub fn new() -> Self {
        Self::with_pool(Arc::new(KeyPool::new()))
    }

    pub fn with_pool(pool: Arc<KeyPool<TwigNode>>) -> Self {
        Self {
            class_metrics: metrics::class_metrics(),
            operation_metrics: metrics::operation_metrics(),
            computer: MetricsComputer::with_pool(pool, find_operations),
        }
    }
}

impl Default for TwigMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageMetricsProvider<TwigNode> for TwigMetrics {
    fn class_metrics(&self) -> &[MetricKey<TwigNode>] {
        &self.class_metrics
    }

    fn operation_metrics(&self) -> &[MetricKey<TwigNode>] {
        &self.operation_metrics
    }

    fn computer(&self) -> &MetricsComputer<TwigNode> {
        &self.computer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use thicket_metrics::{MetricLookupError, MetricOptions, ResultOption};

    const SOURCE: &str = "import x.Y;
class Account {
    public field balance;
    public method getBalance() { return balance; }
    method withdraw(n) {
        if (n < balance && n > 0) { balance = balance - n; }
        return balance;
    }
}";

    fn names(values: Vec<(MetricKey<TwigNode>, f64)>) -> Vec<(String, f64)> {
        values
            .into_iter()
            .map(|(k, v)| (k.name().to_string(), v))
            .collect()
    }

    #[test]
    fn all_class_metrics() {
        let provider = TwigMetrics::new();
        let root = parse(SOURCE).unwrap();
        let class = root.child(1);

        assert_eq!(
            names(provider.compute_all_metrics_for(&class)),
            vec![
                ("WMC".to_string(), 4.0),
                ("NCSS".to_string(), 8.0),
                ("LOC".to_string(), 8.0),
                ("NOPA".to_string(), 1.0),
                ("NOAM".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn all_operation_metrics() {
        let provider = TwigMetrics::new();
        let root = parse(SOURCE).unwrap();
        let withdraw = root.child(1).last_child().unwrap();

        assert_eq!(
            names(provider.compute_all_metrics_for(&withdraw)),
            vec![
                ("CYCLO".to_string(), 3.0),
                ("NCSS".to_string(), 4.0),
                ("LOC".to_string(), 4.0),
            ]
        );
    }

    #[test]
    fn lookup_resolves_by_node() {
        let provider = TwigMetrics::new();
        let root = parse(SOURCE).unwrap();
        let class = root.child(1);
        let getter = class.child(1);

        assert_eq!(provider.metric_by_name(&class, "NCSS"), Ok(8.0));
        assert_eq!(provider.metric_by_name(&getter, "NCSS"), Ok(2.0));
        assert_eq!(
            provider.metric_by_name(&root, "NCSS"),
            Err(MetricLookupError::UnsupportedNode {
                metric: "NCSS".to_string(),
                kind: "CompilationUnit",
            })
        );
        assert!(matches!(
            provider.metric_by_name(&class, "ATFD"),
            Err(MetricLookupError::UnknownMetric(_))
        ));
    }

    #[test]
    fn highest_cyclo_over_methods() {
        let provider = TwigMetrics::new();
        let root = parse(SOURCE).unwrap();
        let class = root.child(1);

        let highest = metrics::OP_CYCLO.aggregate(
            &class,
            MetricOptions::empty(),
            ResultOption::Highest,
            provider.computer(),
        );
        let average = provider.computer().compute_with_result_option(
            &metrics::OP_CYCLO,
            &class,
            MetricOptions::empty(),
            ResultOption::Average,
        );
        assert_eq!(highest, 3.0);
        assert_eq!(average, 2.0);
    }

    #[test]
    fn shared_pool_shares_memoized_values() {
        let pool = Arc::new(KeyPool::new());
        let one = TwigMetrics::with_pool(Arc::clone(&pool));
        let two = TwigMetrics::with_pool(Arc::clone(&pool));
        let root = parse(SOURCE).unwrap();
        let class = root.child(1);

        one.compute_all_metrics_for(&class);
        let populated = class.data().len();
        two.compute_all_metrics_for(&class);
        assert_eq!(class.data().len(), populated);
    }
}
