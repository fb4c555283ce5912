use crate::{
    obs::sink::{self, MetricsEvent, StructureKind},
    structure::{Mergeable, SearchStructure},
};
use derive_more::{Deref, IntoIterator};
use std::{borrow::Cow, collections::HashSet, hash::Hash};

///
/// ResultStructure
///
/// Terminal layer of a lookup tree: the set of rows matched by every key
/// above it. Derefs to the backing set for read-only access.
///

#[derive(Clone, Debug, Deref, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct ResultStructure<V> {
    values: HashSet<V>,
}

impl<V: Clone + Eq + Hash> ResultStructure<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashSet::new(),
        }
    }

    /// Result holding exactly `value`.
    #[must_use]
    pub fn with_value(value: V) -> Self {
        let mut result = Self {
            values: HashSet::with_capacity(1),
        };
        result.put(value);

        result
    }

    /// Result seeded with an existing set.
    #[must_use]
    pub const fn from_set(values: HashSet<V>) -> Self {
        Self { values }
    }

    /// Already at the leaf: every key resolves to `self`.
    #[must_use]
    pub const fn get<Q: ?Sized>(&self, _key: &Q) -> &Self {
        self
    }

    /// Add a single value.
    pub fn put(&mut self, value: V) {
        sink::record(MetricsEvent::Put {
            kind: StructureKind::Result,
            merged: self.values.contains(&value),
        });
        self.values.insert(value);
    }

    #[must_use]
    pub fn into_set(self) -> HashSet<V> {
        self.values
    }
}

impl<V: Clone + Eq + Hash> Default for ResultStructure<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Eq + Hash> PartialEq for ResultStructure<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<V: Clone + Eq + Hash> Eq for ResultStructure<V> {}

impl<V: Clone + Eq + Hash> From<HashSet<V>> for ResultStructure<V> {
    fn from(values: HashSet<V>) -> Self {
        Self::from_set(values)
    }
}

impl<V: Clone + Eq + Hash> FromIterator<V> for ResultStructure<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<V: Clone + Eq + Hash> SearchStructure for ResultStructure<V> {
    type Value = V;

    fn values(&self) -> Cow<'_, HashSet<V>> {
        Cow::Borrowed(&self.values)
    }

    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: Clone + Eq + Hash> Mergeable for ResultStructure<V> {
    fn merge(&mut self, other: Self) {
        self.values.extend(other.values);
    }
}

///
/// TESTS
///
