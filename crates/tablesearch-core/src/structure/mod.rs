//! Module: structure
//! Responsibility: composable lookup layers (exact key, single-bound range,
//! two-column range) that terminate in a set of matched rows.
//! Does not own: row storage or row lifecycle; rows are referenced, never owned.
//! Boundary: callers build a tree with `put` once, then query it with `get`.
//!
//! Structures are not synchronised. Build them on one thread, then share the
//! finished value read-only; a reload publishes a fresh instance.

mod key;
mod range;
mod result;
mod two_column;


use crate::{
    error::SearchError,
    obs::sink::{self, MetricsEvent},
};
use std::{borrow::Cow, collections::HashSet, hash::Hash};

// re-exports
pub use key::KeyStructure;
pub use range::{RangeStructure, RangeType};
pub use result::ResultStructure;
pub use two_column::{TwoColumnRange, TwoColumnRangeStructure};

///
/// SearchStructure
///
/// Read contract shared by every layer of a lookup tree.
/// Descending one level is an inherent `get` on each structure because the
/// key type differs per layer.
///

pub trait SearchStructure {
    type Value: Clone + Eq + Hash;

    /// Flatten this structure into its set of matched values.
    ///
    /// Leaf structures hand out their backing set; intermediate structures
    /// build the union of every nested structure.
    fn values(&self) -> Cow<'_, HashSet<Self::Value>>;

    /// Whether no value is reachable from this structure.
    fn is_empty(&self) -> bool;

    /// Return the single matched value, `None` when nothing matched, or
    /// `NonUniqueResult` when more than one value matched.
    fn unique(&self) -> Result<Option<Self::Value>, SearchError> {
        let values = self.values();

        match values.len() {
            0 => Ok(None),
            1 => Ok(values.iter().next().cloned()),
            count => {
                sink::record(MetricsEvent::UniqueViolation { count });
                Err(SearchError::NonUniqueResult { count })
            }
        }
    }

    /// Like `unique`, substituting `default` when nothing matched.
    fn unique_or(&self, default: Self::Value) -> Result<Self::Value, SearchError> {
        Ok(self.unique()?.unwrap_or(default))
    }
}

///
/// Mergeable
///
/// Lets an outer layer combine two nested structures on key collision
/// without knowing their concrete type.
///

pub trait Mergeable: Clone {
    /// Absorb every entry of `other` into `self`.
    fn merge(&mut self, other: Self);

    /// Independent copy sharing no storage with `self`.
    #[must_use]
    fn copy(&self) -> Self {
        self.clone()
    }
}

impl<T: SearchStructure + ?Sized> SearchStructure for Box<T> {
    type Value = T::Value;

    fn values(&self) -> Cow<'_, HashSet<Self::Value>> {
        (**self).values()
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<T: Mergeable> Mergeable for Box<T> {
    fn merge(&mut self, other: Self) {
        (**self).merge(*other);
    }
}

/// Record and build a `NullArgument` failure.
pub(crate) fn null_argument(argument: &'static str) -> SearchError {
    sink::record(MetricsEvent::NullArgument { argument });

    SearchError::null_argument(argument)
}

/// Union of the flattened values of every nested structure.
pub(crate) fn union_values<'a, S>(nested: impl Iterator<Item = &'a S>) -> HashSet<S::Value>
where
    S: SearchStructure + 'a,
{
    let mut values = HashSet::new();
    for structure in nested {
        values.extend(structure.values().iter().cloned());
    }

    values
}
