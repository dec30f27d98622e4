use std::fmt;

/// Failure to resolve a metric by name on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricLookupError {
    /// No metric of the provider has this name.
    UnknownMetric(String),
    /// Metrics with this name exist but none supports the node.
    UnsupportedNode { metric: String, kind: &'static str },
    /// Several metrics with this name support the node.
    Ambiguous { metric: String, kind: &'static str },
}

impl fmt::Display for MetricLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricLookupError::UnknownMetric(name) => write!(f, "unknown metric '{}'", name),
            MetricLookupError::UnsupportedNode { metric, kind } => {
                write!(f, "metric '{}' cannot be computed on a {} node", metric, kind)
            }
            MetricLookupError::Ambiguous { metric, kind } => write!(
                f,
                "ambiguous metric name '{}', several metrics are supported on a {} node",
                metric, kind
            ),
        }
    }
}

impl std::error::Error for MetricLookupError {}
