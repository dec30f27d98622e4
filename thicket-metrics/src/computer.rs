//! Memoized metric computation.

use std::fmt;
use std::sync::Arc;

use thicket_ast::Node;
use tracing::{instrument, trace};

use crate::key::MetricKey;
use crate::options::MetricOptions;
use crate::pool::KeyPool;
use crate::result_option::ResultOption;

/// Finds the operations (methods, functions, ...) declared by a container node.
pub trait OperationFinder<N>: Send + Sync {
    fn find_operations(&self, container: &N) -> Vec<N>;
}

impl<N, F> OperationFinder<N> for F
where
    F: Fn(&N) -> Vec<N> + Send + Sync,
{
    fn find_operations(&self, container: &N) -> Vec<N> {
        self(container)
    }
}

/// An [`OperationFinder`] for languages without operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOperations;

impl<N> OperationFinder<N> for NoOperations {
    fn find_operations(&self, _: &N) -> Vec<N> {
        Vec::new()
    }
}

/// Computes metrics and memoizes them on the nodes they were computed for.
///
/// A computer is cheap to clone; clones share the key pool. Use one pool per
/// analysis run and drop it with the run.
pub struct MetricsComputer<N> {
    pool: Arc<KeyPool<N>>,
    finder: Arc<dyn OperationFinder<N>>,
}

impl<N> Clone for MetricsComputer<N> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            finder: Arc::clone(&self.finder),
        }
    }
}

impl<N> fmt::Debug for MetricsComputer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsComputer")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl<N: Node> MetricsComputer<N> {
    /// A computer with a fresh pool.
    pub fn new(finder: impl OperationFinder<N> + 'static) -> Self {
        Self::with_pool(Arc::new(KeyPool::new()), finder)
    }

    pub fn without_operations() -> Self {
        Self::new(NoOperations)
    }

    pub fn with_pool(pool: Arc<KeyPool<N>>, finder: impl OperationFinder<N> + 'static) -> Self {
        Self {
            pool,
            finder: Arc::new(finder),
        }
    }

    pub fn pool(&self) -> &Arc<KeyPool<N>> {
        &self.pool
    }

    pub fn find_operations(&self, container: &N) -> Vec<N> {
        self.finder.find_operations(container)
    }

    /// Value of `key` on `node`, computed at most once per node and pooled
    /// (key, options) pair. NaN if `key` does not support `node`.
    #[instrument(level = "trace", skip_all, fields(metric = %key, node = node.kind()))]
    pub fn compute_for_node(&self, key: &MetricKey<N>, node: &N, options: &MetricOptions) -> f64 {
        if !key.supports(node) {
            return f64::NAN;
        }
        let canonical = self.pool.get_instance(key, options);
        node.data().compute_if_absent(canonical.slot(), || {
            trace!(%canonical, "computing");
            key.calculator().compute_for(node, options, self)
        })
    }

    /// Runs the calculator of `key` on `node` without reading or writing the
    /// memoized value. NaN if `key` does not support `node`.
    pub fn compute_uncached(&self, key: &MetricKey<N>, node: &N, options: &MetricOptions) -> f64 {
        if !key.supports(node) {
            return f64::NAN;
        }
        key.calculator().compute_for(node, options, self)
    }

    /// Reduces the memoized values of `key` over `nodes`. Unsupported nodes and
    /// NaN values are left out.
    pub fn aggregate<I>(
        &self,
        key: &MetricKey<N>,
        nodes: I,
        options: &MetricOptions,
        result_option: ResultOption,
    ) -> f64
    where
        I: IntoIterator<Item = N>,
    {
        result_option.reduce(
            nodes
                .into_iter()
                .filter(|node| key.supports(node))
                .map(|node| self.compute_for_node(key, &node, options)),
        )
    }

    /// Reduces the values of `key` over the operations of `container`.
    #[instrument(level = "debug", skip_all, fields(metric = %key, container = container.kind(), result_option = ?result_option))]
    pub fn compute_with_result_option(
        &self,
        key: &MetricKey<N>,
        container: &N,
        options: &MetricOptions,
        result_option: ResultOption,
    ) -> f64 {
        let operations = self.finder.find_operations(container);
        self.aggregate(key, operations, options, result_option)
    }
}
