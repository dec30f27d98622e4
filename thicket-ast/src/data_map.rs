//! Typed per-node side table.
//!
//! Each node owns one [`DataMap`]. Values are addressed by [`DataKey`]s, which
//! compare by identity: two keys created with the same name are still distinct
//! slots. Values are populated lazily and never evicted while the node lives.

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(0);

type Slot = Arc<OnceCell<Box<dyn Any + Send + Sync>>>;

/// Identity-bearing key into a [`DataMap`], typed by the value it addresses.
pub struct DataKey<T> {
    id: u64,
    name: Cow<'static, str>,
    _value: PhantomData<fn() -> T>,
}

impl<T> DataKey<T> {
    /// Allocates a fresh, process-unique key.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> Clone for DataKey<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            _value: PhantomData,
        }
    }
}

impl<T> PartialEq for DataKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for DataKey<T> {}

impl<T> Hash for DataKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for DataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataKey({}#{})", self.name, self.id)
    }
}

impl<T> fmt::Display for DataKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A type-safe, generic data holder attached to a node.
///
/// [`DataMap::compute_if_absent`] runs its computation at most once per key:
/// concurrent callers for the same key wait for the first computation and
/// observe its value. Computations for other keys of the same map may run
/// while one is in progress, so a value may be derived from other values of
/// the same node.
#[derive(Default)]
pub struct DataMap {
    slots: Mutex<HashMap<u64, Slot>>,
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`, computing and storing it first if absent.
    ///
    /// If `compute` panics the slot stays empty and the panic propagates.
    pub fn compute_if_absent<T, F>(&self, key: &DataKey<T>, compute: F) -> T
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let slot = self.slot(key.id);
        let value = slot.get_or_init(|| {
            tracing::trace!(key = %key, "populating data slot");
            let boxed: Box<dyn Any + Send + Sync> = Box::new(compute());
            boxed
        });
        downcast(key, value.as_ref())
    }

    pub fn get<T>(&self, key: &DataKey<T>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let slot = self.slots.lock().get(&key.id).cloned()?;
        slot.get().map(|value| downcast(key, value.as_ref()))
    }

    /// Stores `value` under `key`, returning the previous value if there was one.
    pub fn put<T>(&self, key: &DataKey<T>, value: T) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        let previous = self
            .slots
            .lock()
            .insert(key.id, Arc::new(OnceCell::with_value(boxed)))?;
        previous.get().map(|old| downcast(key, old.as_ref()))
    }

    pub fn contains<T>(&self, key: &DataKey<T>) -> bool {
        self.slots
            .lock()
            .get(&key.id)
            .map_or(false, |slot| slot.get().is_some())
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: u64) -> Slot {
        self.slots.lock().entry(id).or_default().clone()
    }
}

impl fmt::Debug for DataMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataMap").field("len", &self.len()).finish()
    }
}

fn downcast<T: Clone + 'static>(key: &DataKey<T>, value: &(dyn Any + Send + Sync)) -> T {
    match value.downcast_ref::<T>() {
        Some(v) => v.clone(),
        // ids are unique per DataKey<T>, so a slot only ever holds a T
        None => unreachable!("data slot for {key:?} holds a value of another type"),
    }
}
