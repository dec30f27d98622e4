#![forbid(unsafe_code)]

//! # Thicket Metrics
//!
//! Named metrics over [`thicket_ast::Node`] trees, memoized per node.
//!
//! A [`MetricKey`] pairs a name with a [`Metric`] calculator. Together with a
//! set of [`MetricOptions`] it is interned by a [`KeyPool`] into a
//! [`ParameterizedMetricKey`], whose data slot holds the memoized value on
//! every node the metric was computed for. The [`MetricsComputer`] ties the
//! pool to a language's [`OperationFinder`] and reduces values over a
//! container's operations with a [`ResultOption`]. NaN is the only
//! "not applicable" signal: it never shows up in aggregates or in
//! [`LanguageMetricsProvider::compute_all_metrics_for`].
//!
//! ```
//! use thicket_ast::dummy::{leaf, node, DummyNode};
//! use thicket_ast::Node;
//! use thicket_metrics::{MetricKey, MetricOptions, MetricsComputer};
//!
//! let children = MetricKey::from_fn("CHILDREN", |n: &DummyNode, _: &MetricOptions| {
//!     n.num_children() as f64
//! });
//! let computer = MetricsComputer::without_operations();
//! let root = node("root", vec![leaf("a"), leaf("b")]).build();
//!
//! assert_eq!(children.compute_for_default(&root, &computer), 2.0);
//! ```

pub mod computer;
pub mod config;
pub mod error;
pub mod key;
pub mod options;
pub mod pool;
pub mod provider;
pub mod result_option;

pub use computer::{MetricsComputer, NoOperations, OperationFinder};
pub use config::AnalysisConfig;
pub use error::MetricLookupError;
pub use key::{FnMetric, Metric, MetricKey};
pub use options::{MetricOption, MetricOptions};
pub use pool::{KeyPool, ParameterizedMetricKey};
pub use provider::{BasicMetricsProvider, LanguageMetricsProvider};
pub use result_option::ResultOption;
