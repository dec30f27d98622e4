//! Thicket computes code metrics over syntax trees.
//!
//! The engine is language neutral: a front end implements
//! [`thicket_ast::Node`] for its tree and lists its metrics in a
//! [`thicket_metrics::LanguageMetricsProvider`]. Traversal goes through the
//! axis streams of [`thicket_ast`], and every metric value is memoized on the
//! node it was computed for.
//!
//! ## Example Usage
//!
//! ```rust
//! # #[cfg(feature = "twig")]
//! # fn main() -> anyhow::Result<()> {
//! use thicket::AnalysisConfig;
//!
//! let report = thicket::analyze(
//!     "class Greeter {
//!         public method greet(name) { if (name) say(name); }
//!     }",
//!     &AnalysisConfig::default(),
//! )?;
//!
//! assert_eq!(report.classes[0].name, "Greeter");
//! assert_eq!(report.classes[0].operations[0].metrics["CYCLO"], 2.0);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "twig"))]
//! # fn main() {}
//! ```

pub use thicket_ast;
pub use thicket_metrics;
#[cfg(feature = "twig")]
pub use thicket_twig;

pub use thicket_ast::{Axis, Node, NodeStreamExt};
pub use thicket_metrics::{
    AnalysisConfig, LanguageMetricsProvider, MetricKey, MetricOption, MetricOptions,
    MetricsComputer, ResultOption,
};

pub mod report;

pub use report::{ClassReport, OperationReport, Report};

#[cfg(feature = "twig")]
pub use twig::analyze;

#[cfg(feature = "twig")]
mod twig {
    use anyhow::{Context, Result};
    use thicket_ast::{Node, NodeStreamExt};
    use thicket_metrics::{AnalysisConfig, LanguageMetricsProvider};
    use thicket_twig::{TwigKind, TwigMetrics, TwigNodeExt};
    use tracing::instrument;

    use crate::report::{ClassReport, OperationReport, Report};

    /// Parses a twig file and computes every applicable metric of its classes
    /// and methods.
    ///
    /// Each call analyzes with a fresh key pool, so nothing is retained
    /// between calls. WMC takes the CYCLO options unless it has its own.
    #[instrument(skip_all, fields(len = source.len()))]
    pub fn analyze(source: &str, config: &AnalysisConfig) -> Result<Report> {
        let root = thicket_twig::parse(source).context("failed to parse twig source")?;
        let provider = TwigMetrics::new();
        let config = &with_wmc_options(config);

        let classes = root
            .children()
            .filter_kind(TwigKind::ClassDeclaration.name())
            .map(|class| {
                let metrics = Report::named(provider.compute_all_metrics_configured(&class, config));
                let aggregates = provider
                    .operation_metrics()
                    .iter()
                    .flat_map(move |key| {
                        config.aggregate.iter().map(move |result_option| (key, *result_option))
                    })
                    .filter_map(|(key, result_option)| {
                        let value = key.aggregate(
                            &class,
                            config.options_for(key.name()),
                            result_option,
                            provider.computer(),
                        );
                        (!value.is_nan()).then(|| {
                            (format!("{}.{}", key.name(), Report::result_option_name(result_option)), value)
                        })
                    })
                    .collect();
                let operations = provider
                    .computer()
                    .find_operations(&class)
                    .into_iter()
                    .map(|operation| OperationReport {
                        name: operation.image().unwrap_or_default().to_string(),
                        begin_line: operation.begin_line(),
                        metrics: Report::named(
                            provider.compute_all_metrics_configured(&operation, config),
                        ),
                    })
                    .collect();

                ClassReport {
                    name: class.image().unwrap_or_default().to_string(),
                    begin_line: class.begin_line(),
                    metrics,
                    aggregates,
                    operations,
                }
            })
            .collect();

        Ok(Report {
            classes,
            key_pool_size: provider.computer().pool().len(),
            nodes: root.descendants_or_self().count(),
        })
    }

    fn with_wmc_options(config: &AnalysisConfig) -> AnalysisConfig {
        let mut config = config.clone();
        if let Some(cyclo) = config.options.get("CYCLO").cloned() {
            config.options.entry("WMC".to_string()).or_insert(cyclo);
        }
        config
    }

}
