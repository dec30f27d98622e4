//! Metric keys and the calculator trait.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thicket_ast::Node;

use crate::computer::MetricsComputer;
use crate::options::MetricOptions;
use crate::result_option::ResultOption;

/// Computes one metric on nodes of type `N`.
///
/// Calculators are pure: the same node and options give the same value. NaN
/// means the metric cannot be computed on that node. The computer passed to
/// [`Metric::compute_for`] lets composite metrics reuse memoized values of
/// other metrics.
pub trait Metric<N>: Send + Sync {
    fn supports(&self, node: &N) -> bool {
        let _ = node;
        true
    }

    fn compute_for(&self, node: &N, options: &MetricOptions, computer: &MetricsComputer<N>) -> f64;
}

/// A [`Metric`] built from closures, see [`MetricKey::from_fn`].
pub struct FnMetric<S, C> {
    supports: S,
    compute: C,
}

impl<N, S, C> Metric<N> for FnMetric<S, C>
where
    S: Fn(&N) -> bool + Send + Sync,
    C: Fn(&N, &MetricOptions) -> f64 + Send + Sync,
{
    fn supports(&self, node: &N) -> bool {
        (self.supports)(node)
    }

    fn compute_for(&self, node: &N, options: &MetricOptions, _: &MetricsComputer<N>) -> f64 {
        (self.compute)(node, options)
    }
}

/// Identity of one metric: a name and a calculator.
///
/// Keys are equal when they have the same name and share the same calculator
/// instance. Two keys built separately from equal closures are different keys.
pub struct MetricKey<N> {
    name: Cow<'static, str>,
    calculator: Arc<dyn Metric<N>>,
}

impl<N: Node> MetricKey<N> {
    pub fn new(name: impl Into<Cow<'static, str>>, calculator: impl Metric<N> + 'static) -> Self {
        Self {
            name: name.into(),
            calculator: Arc::new(calculator),
        }
    }

    /// A key supporting every node, computing with `compute`.
    pub fn from_fn<C>(name: impl Into<Cow<'static, str>>, compute: C) -> Self
    where
        C: Fn(&N, &MetricOptions) -> f64 + Send + Sync + 'static,
    {
        Self::from_fns(name, |_: &N| true, compute)
    }

    pub fn from_fns<S, C>(name: impl Into<Cow<'static, str>>, supports: S, compute: C) -> Self
    where
        S: Fn(&N) -> bool + Send + Sync + 'static,
        C: Fn(&N, &MetricOptions) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, FnMetric { supports, compute })
    }

    pub fn supports(&self, node: &N) -> bool {
        self.calculator.supports(node)
    }

    /// Memoized value of this metric on `node`, NaN if unsupported.
    pub fn compute_for(&self, node: &N, options: &MetricOptions, computer: &MetricsComputer<N>) -> f64 {
        computer.compute_for_node(self, node, options)
    }

    pub fn compute_for_default(&self, node: &N, computer: &MetricsComputer<N>) -> f64 {
        self.compute_for(node, MetricOptions::empty(), computer)
    }

    /// Reduces the values of this metric on the operations of `container`.
    pub fn aggregate(
        &self,
        container: &N,
        options: &MetricOptions,
        result_option: ResultOption,
        computer: &MetricsComputer<N>,
    ) -> f64 {
        computer.compute_with_result_option(self, container, options, result_option)
    }
}

impl<N> MetricKey<N> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calculator(&self) -> &dyn Metric<N> {
        self.calculator.as_ref()
    }

    fn calculator_addr(&self) -> *const () {
        Arc::as_ptr(&self.calculator) as *const ()
    }
}

impl<N> Clone for MetricKey<N> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            calculator: Arc::clone(&self.calculator),
        }
    }
}

impl<N> PartialEq for MetricKey<N> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.calculator_addr() == other.calculator_addr()
    }
}

impl<N> Eq for MetricKey<N> {}

impl<N> Hash for MetricKey<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.calculator_addr().hash(state);
    }
}

impl<N> fmt::Debug for MetricKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MetricKey({})", self.name)
    }
}

impl<N> fmt::Display for MetricKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
