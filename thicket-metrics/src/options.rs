//! Metric option flags.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A named flag altering how a metric is computed, e.g. `countImports`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricOption(Cow<'static, str>);

impl MetricOption {
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<String> for MetricOption {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&'static str> for MetricOption {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for MetricOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMPTY: MetricOptions = MetricOptions {
    flags: BTreeSet::new(),
};

/// An immutable set of [`MetricOption`]s.
///
/// Two option sets are equal when they hold the same flags, regardless of the
/// order they were given in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricOptions {
    flags: BTreeSet<MetricOption>,
}

impl MetricOptions {
    /// The shared empty option set.
    pub fn empty() -> &'static MetricOptions {
        &EMPTY
    }

    pub fn of<I>(flags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MetricOption>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, flag: &MetricOption) -> bool {
        self.flags.contains(flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricOption> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl fmt::Display for MetricOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.flags.iter().join(", "))
    }
}

impl FromIterator<MetricOption> for MetricOptions {
    fn from_iter<T: IntoIterator<Item = MetricOption>>(iter: T) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}
