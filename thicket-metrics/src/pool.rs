//! Interning of (metric key, options) pairs.
//!
//! Memoized values are stored on nodes under the [`DataKey`] of a
//! [`ParameterizedMetricKey`]. Data keys compare by identity, so every
//! logically equal pair must resolve to the same canonical instance; the
//! [`KeyPool`] guarantees this.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thicket_ast::DataKey;
use tracing::debug;

use crate::key::MetricKey;
use crate::options::MetricOptions;

/// A metric key bound to a set of options.
pub struct ParameterizedMetricKey<N> {
    key: MetricKey<N>,
    options: MetricOptions,
    slot: DataKey<f64>,
}

impl<N> ParameterizedMetricKey<N> {
    fn new(key: MetricKey<N>, options: MetricOptions) -> Self {
        let slot = DataKey::new(format!("metric.{}", key.name()));
        Self { key, options, slot }
    }

    pub fn key(&self) -> &MetricKey<N> {
        &self.key
    }

    pub fn options(&self) -> &MetricOptions {
        &self.options
    }

    /// Where values for this pair are memoized on each node.
    pub fn slot(&self) -> &DataKey<f64> {
        &self.slot
    }
}

impl<N> PartialEq for ParameterizedMetricKey<N> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.options == other.options
    }
}

impl<N> Eq for ParameterizedMetricKey<N> {}

impl<N> fmt::Display for ParameterizedMetricKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParameterizedMetricKey{{key={}, options={}}}",
            self.key.name(),
            self.options
        )
    }
}

impl<N> fmt::Debug for ParameterizedMetricKey<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Owns the canonical [`ParameterizedMetricKey`] instances of one analysis run.
///
/// Lookups and inserts happen under one lock, so concurrent callers never
/// observe two canonical instances for one pair. Entries are kept until
/// [`KeyPool::clear`] or until the pool is dropped.
pub struct KeyPool<N> {
    entries: Mutex<HashMap<(MetricKey<N>, MetricOptions), Arc<ParameterizedMetricKey<N>>>>,
}

impl<N> Default for KeyPool<N> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<N> KeyPool<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical instance for `(key, options)`, created on first request.
    pub fn get_instance(
        &self,
        key: &MetricKey<N>,
        options: &MetricOptions,
    ) -> Arc<ParameterizedMetricKey<N>> {
        let mut entries = self.entries.lock();
        let canonical = entries
            .entry((key.clone(), options.clone()))
            .or_insert_with(|| {
                debug!(metric = %key, %options, "interning parameterized metric key");
                Arc::new(ParameterizedMetricKey::new(key.clone(), options.clone()))
            });
        Arc::clone(canonical)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Forgets every canonical instance.
    ///
    /// Values memoized under the old instances stay on their nodes but are no
    /// longer reachable through this pool.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        debug!(entries = entries.len(), "clearing key pool");
        entries.clear();
    }
}

impl<N> fmt::Debug for KeyPool<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPool").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MetricOption;
    use thicket_ast::dummy::DummyNode;

    fn key(name: &'static str) -> MetricKey<DummyNode> {
        MetricKey::from_fn(name, |_: &DummyNode, _: &MetricOptions| 0.0)
    }

    #[test]
    fn same_pair_same_instance() {
        let pool = KeyPool::new();
        let cyclo = key("CYCLO");
        let options = MetricOptions::of(["ignoreBooleanPaths"]);

        let first = pool.get_instance(&cyclo, &options);
        let second = pool.get_instance(&cyclo.clone(), &MetricOptions::of(["ignoreBooleanPaths"]));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.slot(), second.slot());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn different_options_different_instance() {
        let pool = KeyPool::new();
        let cyclo = key("CYCLO");

        let plain = pool.get_instance(&cyclo, MetricOptions::empty());
        let ignoring = pool.get_instance(&cyclo, &MetricOptions::of([MetricOption::new("ignoreBooleanPaths")]));

        assert!(!Arc::ptr_eq(&plain, &ignoring));
        assert_ne!(*plain, *ignoring);
        assert_ne!(plain.slot(), ignoring.slot());
    }

    #[test]
    fn different_keys_with_same_name_are_distinct() {
        let pool = KeyPool::new();
        let a = pool.get_instance(&key("NCSS"), MetricOptions::empty());
        let b = pool.get_instance(&key("NCSS"), MetricOptions::empty());
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn display() {
        let pool = KeyPool::new();
        let pk = pool.get_instance(&key("LOC"), &MetricOptions::of(["b", "a"]));
        assert_eq!(pk.to_string(), "ParameterizedMetricKey{key=LOC, options={a, b}}");
        assert_eq!(pk.slot().name(), "metric.LOC");
    }

    #[test]
    fn clear_starts_over() {
        let pool = KeyPool::new();
        let loc = key("LOC");
        let before = pool.get_instance(&loc, MetricOptions::empty());
        pool.clear();
        assert!(pool.is_empty());
        let after = pool.get_instance(&loc, MetricOptions::empty());
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn pools_are_independent() {
        let loc = key("LOC");
        let one = KeyPool::new().get_instance(&loc, MetricOptions::empty());
        let two = KeyPool::new().get_instance(&loc, MetricOptions::empty());
        assert!(!Arc::ptr_eq(&one, &two));
        assert_eq!(*one, *two);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_get_instance_agrees() {
        let pool = Arc::new(KeyPool::new());
        let wmc = key("WMC");

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let wmc = wmc.clone();
                tokio::spawn(async move { pool.get_instance(&wmc, MetricOptions::empty()) })
            })
            .collect();

        let mut instances = Vec::new();
        for handle in handles {
            instances.push(handle.await.unwrap());
        }
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(pool.len(), 1);
    }
}
