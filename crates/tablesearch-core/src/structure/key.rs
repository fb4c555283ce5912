use crate::{
    obs::sink::{self, MetricsEvent, StructureKind},
    structure::{Mergeable, SearchStructure, union_values},
};
use std::{
    borrow::{Borrow, Cow},
    collections::{HashMap, HashSet, hash_map::Entry},
    hash::Hash,
};

///
/// KeyStructure
///
/// Exact-match layer: maps a discrete key to the nested structure holding
/// every row that carries that key. Colliding puts merge instead of
/// overwriting.
///

#[derive(Clone, Debug)]
pub struct KeyStructure<K, S> {
    map: HashMap<K, S>,
    empty: S,
}

impl<K, S> KeyStructure<K, S>
where
    K: Eq + Hash,
    S: SearchStructure + Mergeable + Default,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            empty: S::default(),
        }
    }

    /// Structure holding a single entry.
    #[must_use]
    pub fn with_entry(key: K, value: S) -> Self {
        let mut structure = Self::new();
        structure.put(key, value);

        structure
    }

    /// Nested structure stored under `key`, or an empty one on a miss.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> &S
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.get(key).unwrap_or(&self.empty)
    }

    /// Insert `value` under `key`, merging into any structure already there.
    pub fn put(&mut self, key: K, value: S) {
        let merged = self.absorb(key, value);

        sink::record(MetricsEvent::Put {
            kind: StructureKind::Key,
            merged,
        });
    }

    // Place an entry without recording a put; true when it collided.
    fn absorb(&mut self, key: K, value: S) -> bool {
        match self.map.entry(key) {
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

    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl<K, S> Default for KeyStructure<K, S>
where
    K: Eq + Hash,
    S: SearchStructure + Mergeable + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> PartialEq for KeyStructure<K, S>
where
    K: Eq + Hash,
    S: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K: Eq + Hash, S: Eq> Eq for KeyStructure<K, S> {}

impl<K, S> SearchStructure for KeyStructure<K, S>
where
    K: Eq + Hash,
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

impl<K, S> Mergeable for KeyStructure<K, S>
where
    K: Clone + Eq + Hash,
    S: SearchStructure + Mergeable + Default,
{
    fn merge(&mut self, other: Self) {
        for (key, value) in other.map {
            if self.absorb(key, value) {
                sink::record(MetricsEvent::Merge {
                    kind: StructureKind::Key,
                });
            }
        }
    }
}

///
/// TESTS
///
