use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

/// Assigns dense identifiers to keys, remembering insertion order.
#[derive(Debug)]
pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

// `ids` maps every key to its position in `keys`, so `keys` alone decides
// equality.
impl<K> PartialEq for Indexer<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl<K> Indexer<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    /// Returns the identifier of `key`, inserting it if unseen.
    pub fn get_id<Q: ?Sized>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.ids.len();
            self.keys.push(key.to_owned());
            self.ids.insert(key.to_owned(), id);
            id
        }
    }

    /// Returns the identifier of `key` without inserting.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Eq + Hash,
    {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }
}

impl<K> Default for Indexer<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates occurrence counts per key, remembering insertion order.
#[derive(Debug)]
pub struct CountTable<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
    counts: Vec<u64>,
}

// As for `Indexer`, `ids` is derived state; `keys` and `counts` carry the
// whole table.
impl<K> PartialEq for CountTable<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys && self.counts == other.counts
    }
}

impl<K> CountTable<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
            counts: vec![],
        }
    }

    pub fn add(&mut self, key: K, delta: u64) {
        match self.ids.entry(key) {
            Entry::Occupied(e) => {
                self.counts[*e.get()] += delta;
            }
            Entry::Vacant(e) => {
                self.keys.push(e.key().clone());
                self.counts.push(delta);
                e.insert(self.keys.len() - 1);
            }
        }
    }

    pub fn get<Q: ?Sized>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Eq + Hash,
    {
        self.ids.get(key).map_or(0, |&id| self.counts[id])
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.keys.iter().zip(self.counts.iter().copied())
    }
}

impl<K> Default for CountTable<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
