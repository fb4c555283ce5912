//! Module: structure::range
//! Responsibility: single-bound range matching over an ordered set of bounds.
//! Boundary: the `RangeType` chosen at construction decides which stored
//! bound a query resolves to; it never changes afterwards.

#![allow(deprecated)]

use crate::{
    error::SearchError,
    obs::sink::{self, MetricsEvent, StructureKind},
    structure::{Mergeable, SearchStructure, null_argument, union_values},
};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    collections::{BTreeMap, HashSet, btree_map::Entry},
    ops::Bound,
};

///
/// RangeType
///
/// How a query value resolves against the stored bounds.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeType {
    /// Greatest stored bound less than or equal to the key.
    #[default]
    LowerBoundEqual,

    /// Smallest stored bound greater than or equal to the key.
    UpperBoundEqual,

    /// Greatest stored bound strictly less than the key.
    #[deprecated(note = "use `RangeType::LowerBoundEqual`")]
    LowerBound,

    /// Smallest stored bound strictly greater than the key.
    #[deprecated(note = "use `RangeType::UpperBoundEqual`")]
    UpperBound,
}

impl RangeType {
    /// Whether a key equal to a stored bound resolves to that bound.
    #[must_use]
    pub const fn is_inclusive(self) -> bool {
        matches!(self, Self::LowerBoundEqual | Self::UpperBoundEqual)
    }

    /// Whether stored bounds are lower bounds (the key sits above them).
    #[must_use]
    pub const fn is_lower(self) -> bool {
        matches!(self, Self::LowerBoundEqual | Self::LowerBound)
    }

    fn select<'a, K: Ord, S>(self, map: &'a BTreeMap<K, S>, key: &K) -> Option<&'a S> {
        let entry = match self {
            Self::LowerBoundEqual => map.range::<K, _>(..=key).next_back(),
            Self::UpperBoundEqual => map.range::<K, _>(key..).next(),
            Self::LowerBound => map.range::<K, _>(..key).next_back(),
            Self::UpperBound => map
                .range::<K, _>((Bound::Excluded(key), Bound::Unbounded))
                .next(),
        };

        entry.map(|(_, value)| value)
    }
}

///
/// RangeStructure
///
/// Range layer keyed by single bounds. Each stored bound stands for the
/// interval between it and its neighbour in the direction of the range type.
///

#[derive(Clone, Debug)]
pub struct RangeStructure<K, S> {
    map: BTreeMap<K, S>,
    range_type: RangeType,
    empty: S,
}

impl<K, S> RangeStructure<K, S>
where
    K: Ord,
    S: SearchStructure + Mergeable + Default,
{
    #[must_use]
    pub fn new(range_type: RangeType) -> Self {
        Self {
            map: BTreeMap::new(),
            range_type,
            empty: S::default(),
        }
    }

    /// Construct from a range type read from a nullable source.
    pub fn try_new(range_type: Option<RangeType>) -> Result<Self, SearchError> {
        range_type
            .map(Self::new)
            .ok_or_else(|| null_argument("range_type"))
    }

    /// Structure holding a single bound.
    #[must_use]
    pub fn with_entry(range_type: RangeType, bound: K, value: S) -> Self {
        let mut structure = Self::new(range_type);
        structure.put(bound, value);

        structure
    }

    #[must_use]
    pub const fn range_type(&self) -> RangeType {
        self.range_type
    }

    /// Nested structure for the bound `key` resolves to, or an empty one
    /// when no stored bound applies.
    #[must_use]
    pub fn get(&self, key: &K) -> &S {
        self.range_type
            .select(&self.map, key)
            .unwrap_or(&self.empty)
    }

    /// Like `get`, for keys read from a nullable column.
    pub fn try_get(&self, key: Option<&K>) -> Result<&S, SearchError> {
        key.map(|key| self.get(key))
            .ok_or_else(|| null_argument("key"))
    }

    /// Insert `value` at `bound`, merging into any structure already there.
    pub fn put(&mut self, bound: K, value: S) {
        let merged = self.absorb(bound, value);

        sink::record(MetricsEvent::Put {
            kind: StructureKind::Range,
            merged,
        });
    }

    // Place an entry without recording a put; true when it collided.
    fn absorb(&mut self, bound: K, value: S) -> bool {
        match self.map.entry(bound) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().merge(value);
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
                false
            }
        }
    }

    /// Stored bounds in ascending order.
    pub fn bounds(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Number of stored bounds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl<K, S> Default for RangeStructure<K, S>
where
    K: Ord,
    S: SearchStructure + Mergeable + Default,
{
    fn default() -> Self {
        Self::new(RangeType::default())
    }
}

impl<K: Ord, S: PartialEq> PartialEq for RangeStructure<K, S> {
    fn eq(&self, other: &Self) -> bool {
        self.range_type == other.range_type && self.map == other.map
    }
}

impl<K: Ord, S: Eq> Eq for RangeStructure<K, S> {}

impl<K, S> SearchStructure for RangeStructure<K, S>
where
    K: Ord,
    S: SearchStructure,
{
    type Value = S::Value;

    fn values(&self) -> Cow<'_, HashSet<Self::Value>> {
        Cow::Owned(union_values(self.map.values()))
    }

    fn is_empty(&self) -> bool {
        self.map.values().all(SearchStructure::is_empty)
    }
}

impl<K, S> Mergeable for RangeStructure<K, S>
where
    K: Clone + Ord,
    S: SearchStructure + Mergeable + Default,
{
    /// Bounds of `other` are merged in; `self` keeps its range type.
    fn merge(&mut self, other: Self) {
        for (bound, value) in other.map {
            if self.absorb(bound, value) {
                sink::record(MetricsEvent::Merge {
                    kind: StructureKind::Range,
                });
            }
        }
    }
}

///
/// TESTS
///
