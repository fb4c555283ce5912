use crate::{
    error::SearchError,
    obs::sink::{self, MetricsEvent, StructureKind},
    structure::{Mergeable, SearchStructure, null_argument, union_values},
};
use std::{
    borrow::{Borrow, Cow},
    cmp::Ordering,
    collections::{BTreeMap, HashSet, btree_map::Entry},
    hash::{Hash, Hasher},
};

///
/// TwoColumnRange
///
/// Inclusive interval read from a from/to column pair.
///
/// Equality, ordering and hashing look at the lower bound only, so two
/// ranges anchored at the same lower bound are the same map key.
///

#[derive(Clone, Copy, Debug)]
pub struct TwoColumnRange<K> {
    lower: K,
    upper: K,
}

impl<K: Ord> TwoColumnRange<K> {
    #[must_use]
    pub const fn new(lower: K, upper: K) -> Self {
        Self { lower, upper }
    }

    /// Construct from bounds read from nullable columns.
    pub fn try_new(lower: Option<K>, upper: Option<K>) -> Result<Self, SearchError> {
        let lower = lower.ok_or_else(|| null_argument("lower_bound"))?;
        let upper = upper.ok_or_else(|| null_argument("upper_bound"))?;

        Ok(Self::new(lower, upper))
    }

    #[must_use]
    pub const fn lower_bound(&self) -> &K {
        &self.lower
    }

    #[must_use]
    pub const fn upper_bound(&self) -> &K {
        &self.upper
    }

    /// Whether this range starts at or before the end of `other`.
    #[must_use]
    pub fn is_lower_or_equal_upper_bound(&self, other: &Self) -> bool {
        self.lower <= other.upper
    }

    /// Whether `key` lies within `[lower, upper]`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        &self.lower <= key && key <= &self.upper
    }
}

impl<K: Ord> PartialEq for TwoColumnRange<K> {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
    }
}

impl<K: Ord> Eq for TwoColumnRange<K> {}

impl<K: Ord> PartialOrd for TwoColumnRange<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for TwoColumnRange<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lower.cmp(&other.lower)
    }
}

impl<K: Hash> Hash for TwoColumnRange<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
    }
}

// Ord and Eq agree with the lower bound, so maps keyed by ranges can be
// probed with a bare key.
impl<K> Borrow<K> for TwoColumnRange<K> {
    fn borrow(&self) -> &K {
        &self.lower
    }
}

///
/// TwoColumnRangeStructure
///
/// Interval layer: resolves a point to the stored interval with the greatest
/// lower bound not above it, provided the point is within that interval.
///

#[derive(Clone, Debug)]
pub struct TwoColumnRangeStructure<K, S> {
    map: BTreeMap<TwoColumnRange<K>, S>,
    empty: S,
}

impl<K, S> TwoColumnRangeStructure<K, S>
where
    K: Ord,
    S: SearchStructure + Mergeable + Default,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            empty: S::default(),
        }
    }

    /// Structure holding a single interval.
    #[must_use]
    pub fn with_entry(lower: K, upper: K, value: S) -> Self {
        let mut structure = Self::new();
        structure.put(lower, upper, value);

        structure
    }

    /// Nested structure whose interval contains `key`, or an empty one.
    #[must_use]
    pub fn get(&self, key: &K) -> &S {
        self.map
            .range::<K, _>(..=key)
            .next_back()
            .filter(|(range, _)| key <= range.upper_bound())
            .map_or(&self.empty, |(_, value)| value)
    }

    /// Like `get`, for keys read from a nullable column; a null key is a miss.
    #[must_use]
    pub fn get_nullable(&self, key: Option<&K>) -> &S {
        key.map_or(&self.empty, |key| self.get(key))
    }

    /// Insert `value` for `[lower, upper]`.
    pub fn put(&mut self, lower: K, upper: K, value: S) {
        self.put_range(TwoColumnRange::new(lower, upper), value);
    }

    /// Insert `value` for `range`. A range sharing its lower bound with a
    /// stored one merges into it, and the stored upper bound is kept.
    pub fn put_range(&mut self, range: TwoColumnRange<K>, value: S) {
        let merged = self.absorb(range, value);

        sink::record(MetricsEvent::Put {
            kind: StructureKind::TwoColumnRange,
            merged,
        });
    }

    // Place an entry without recording a put; true when it collided.
    fn absorb(&mut self, range: TwoColumnRange<K>, value: S) -> bool {
        match self.map.entry(range) {
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

    /// Stored intervals ordered by lower bound.
    pub fn ranges(&self) -> impl Iterator<Item = &TwoColumnRange<K>> {
        self.map.keys()
    }

    /// Number of stored intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl<K, S> Default for TwoColumnRangeStructure<K, S>
where
    K: Ord,
    S: SearchStructure + Mergeable + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, S: PartialEq> PartialEq for TwoColumnRangeStructure<K, S> {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len()
            && self
                .map
                .iter()
                .zip(&other.map)
                .all(|((a, x), (b, y))| a.lower == b.lower && a.upper == b.upper && x == y)
    }
}

impl<K: Ord, S: Eq> Eq for TwoColumnRangeStructure<K, S> {}

impl<K, S> SearchStructure for TwoColumnRangeStructure<K, S>
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

impl<K, S> Mergeable for TwoColumnRangeStructure<K, S>
where
    K: Clone + Ord,
    S: SearchStructure + Mergeable + Default,
{
    fn merge(&mut self, other: Self) {
        for (range, value) in other.map {
            if self.absorb(range, value) {
                sink::record(MetricsEvent::Merge {
                    kind: StructureKind::TwoColumnRange,
                });
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::ResultStructure;
    use std::collections::hash_map::DefaultHasher;

    type Leaf = ResultStructure<&'static str>;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn structure() -> TwoColumnRangeStructure<i32, Leaf> {
        let mut structure = TwoColumnRangeStructure::new();
        structure.put(0, 8, Leaf::with_value("A"));
        structure.put(12, 20, Leaf::with_value("B"));

        structure
    }

    fn lookup(structure: &TwoColumnRangeStructure<i32, Leaf>, key: i32) -> Option<&'static str> {
        structure.get(&key).unique().expect("single interval")
    }

    #[test]
    fn point_inside_interval_matches() {
        let structure = structure();

        assert_eq!(lookup(&structure, 0), Some("A"));
        assert_eq!(lookup(&structure, 5), Some("A"));
        assert_eq!(lookup(&structure, 8), Some("A"));
        assert_eq!(lookup(&structure, 12), Some("B"));
        assert_eq!(lookup(&structure, 20), Some("B"));
    }

    #[test]
    fn gap_and_outside_points_miss() {
        let structure = structure();

        assert_eq!(lookup(&structure, 10), None);
        assert_eq!(lookup(&structure, 100), None);
        assert_eq!(lookup(&structure, -123), None);
    }

    #[test]
    fn null_key_is_a_miss() {
        let structure = structure();

        assert!(structure.get_nullable(None).is_empty());
        assert_eq!(structure.get_nullable(Some(&3)).unique(), Ok(Some("A")));
    }

    #[test]
    fn null_bounds_are_rejected() {
        assert_eq!(
            TwoColumnRange::try_new(None, Some(1)),
            Err(SearchError::NullArgument {
                argument: "lower_bound"
            })
        );
        assert_eq!(
            TwoColumnRange::try_new(Some(1), None),
            Err(SearchError::NullArgument {
                argument: "upper_bound"
            })
        );

        let range = TwoColumnRange::try_new(Some(1), Some(4)).expect("both bounds");
        assert_eq!((*range.lower_bound(), *range.upper_bound()), (1, 4));
    }

    #[test]
    fn identity_follows_lower_bound() {
        let a = TwoColumnRange::new(1, 5);
        let b = TwoColumnRange::new(1, 9);
        let c = TwoColumnRange::new(2, 5);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
        assert!(a < c);
    }

    #[test]
    fn lower_or_equal_upper_bound() {
        let probe = TwoColumnRange::new(5, 5);

        assert!(probe.is_lower_or_equal_upper_bound(&TwoColumnRange::new(0, 8)));
        assert!(probe.is_lower_or_equal_upper_bound(&TwoColumnRange::new(0, 5)));
        assert!(!probe.is_lower_or_equal_upper_bound(&TwoColumnRange::new(0, 4)));
        assert!(TwoColumnRange::new(0, 8).contains(&8));
        assert!(!TwoColumnRange::new(0, 8).contains(&9));
    }

    #[test]
    fn shared_lower_bound_merges_and_keeps_first_upper() {
        let mut structure = TwoColumnRangeStructure::with_entry(0, 8, Leaf::with_value("A"));
        structure.put(0, 10, Leaf::with_value("B"));

        assert_eq!(structure.len(), 1);
        assert_eq!(structure.ranges().next().map(|r| *r.upper_bound()), Some(8));
        assert_eq!(structure.get(&4).values().len(), 2);
        assert!(structure.get(&9).is_empty());
    }

    #[test]
    fn overlapping_intervals_resolve_to_nearest_lower_bound() {
        let mut structure = TwoColumnRangeStructure::with_entry(0, 100, Leaf::with_value("A"));
        structure.put(40, 45, Leaf::with_value("B"));

        assert_eq!(lookup(&structure, 39), Some("A"));
        assert_eq!(lookup(&structure, 42), Some("B"));
        // past the inner interval the wider one is not consulted
        assert_eq!(lookup(&structure, 50), None);
        assert_eq!(lookup(&structure, 100), None);
    }

    #[test]
    fn shared_lower_bound_keeps_first_interval_for_lookup() {
        let mut structure = TwoColumnRangeStructure::with_entry(10, 20, Leaf::with_value("A"));
        structure.put(10, 30, Leaf::with_value("B"));

        assert_eq!(structure.get(&15).values().len(), 2);
        assert!(structure.get(&25).is_empty());
        assert_eq!(structure.get(&20).values().len(), 2);
    }

    #[test]
    fn merge_adds_intervals_of_other() {
        let mut left = TwoColumnRangeStructure::with_entry(0, 8, Leaf::with_value("A"));
        let right = TwoColumnRangeStructure::with_entry(12, 20, Leaf::with_value("B"));

        left.merge(right);

        assert_eq!(left, structure());
    }
}
