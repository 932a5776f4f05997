use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;
use thiserror::Error;

use crate::raw::{Handle, RawRbTree};
use crate::{ColorFlips, Distance};

mod capacity;

/// Returned by [`RbTreeMap::insert`] when the key is already present.
///
/// The map is left untouched and the rejected pair is handed back.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("key is already present in the map")]
pub struct DuplicateKey<K, V> {
    pub key: K,
    pub value: V,
}

/// An ordered map based on a red-black tree, with every structural mutation
/// reporting how many node colors it toggled.
///
/// Nodes live in an arena and reference each other through stable handles; a
/// single black sentinel stands in for every missing child. Keys are unique:
/// inserting an existing key is rejected rather than overwriting.
///
/// Beyond the usual lookups the map answers two ordered queries:
///
/// - [`range`](RbTreeMap::range) - every entry with `low <= key <= high`
/// - [`nearest`](RbTreeMap::nearest) - the entries closest to a target key
///
/// # Examples
///
/// ```
/// use shelfmark::RbTreeMap;
///
/// let mut shelf = RbTreeMap::new();
/// shelf.insert(120, "Dune").unwrap();
/// shelf.insert(80, "Emma").unwrap();
/// shelf.insert(200, "Ulysses").unwrap();
///
/// assert_eq!(shelf.get(&80), Some(&"Emma"));
/// assert!(shelf.insert(80, "Persuasion").is_err());
///
/// let in_range: Vec<_> = shelf.range(&50, &150).into_iter().map(|(k, _)| *k).collect();
/// assert_eq!(in_range, [80, 120]);
///
/// let closest: Vec<_> = shelf.nearest(&90).into_iter().map(|(k, _)| *k).collect();
/// assert_eq!(closest, [80]);
/// ```
pub struct RbTreeMap<K, V> {
    raw: RawRbTree<K, V>,
}

impl<K, V> RbTreeMap<K, V> {
    /// Makes a new, empty `RbTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfmark::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> RbTreeMap<K, V> {
        RbTreeMap { raw: RawRbTree::new() }
    }

    /// Clears the map, removing all elements.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfmark::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the first key-value pair in the map, the one with the minimum key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let root = self.raw.root();
        if root.is_nil() {
            return None;
        }
        Some(self.entry_at(self.raw.minimum(root)))
    }

    /// Returns the last key-value pair in the map, the one with the maximum key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let root = self.raw.root();
        if root.is_nil() {
            return None;
        }
        Some(self.entry_at(self.raw.maximum(root)))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfmark::RbTreeMap;
    ///
    /// let map: RbTreeMap<_, _> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    /// let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            raw: &self.raw,
            stack: SmallVec::new(),
            remaining: self.raw.len(),
        };
        iter.push_left_spine(self.raw.root());
        iter
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    fn entry_at(&self, handle: Handle) -> (&K, &V) {
        (self.raw.key(handle), self.raw.value(handle))
    }

    #[cfg(test)]
    pub(crate) fn validate_invariants(&self)
    where
        K: Ord + fmt::Debug,
    {
        self.raw.validate_invariants();
    }
}

impl<K: Ord, V> RbTreeMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfmark::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns the stored key and value for the supplied key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        Some(self.entry_at(handle))
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Inserts a key-value pair and rebalances, returning the number of color toggles
    /// the rebalancing performed.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKey`] holding the rejected pair if `key` is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfmark::{ColorFlips, RbTreeMap};
    ///
    /// let mut map = RbTreeMap::new();
    /// assert_eq!(map.insert(37, "a"), Ok(ColorFlips(1)));
    ///
    /// let err = map.insert(37, "b").unwrap_err();
    /// assert_eq!((err.key, err.value), (37, "b"));
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, key: K, value: V) -> Result<ColorFlips, DuplicateKey<K, V>> {
        self.raw.insert(key, value).map_err(|(key, value)| DuplicateKey { key, value })
    }

    /// Removes a key from the map, returning its value and the number of color
    /// toggles the rebalancing performed.
    ///
    /// # Examples
    ///
    /// ```
    /// use shelfmark::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.remove(&1).map(|(v, _)| v), Some("a"));
    /// assert!(map.remove(&1).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(V, ColorFlips)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).map(|(_, value, flips)| (value, flips))
    }

    /// Removes a key from the map, returning the stored key, its value and the
    /// number of color toggles the rebalancing performed.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V, ColorFlips)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Returns every entry with `low <= key <= high`, in ascending key order.
    ///
    /// An inverted range (`low > high`) yields nothing. Subtrees that cannot
    /// contain a match are skipped.
    ///
    /// # Complexity
    ///
    /// O(log n + m) for m matches.
    pub fn range<Q>(&self, low: &Q, high: &Q) -> Vec<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.range(low, high).into_iter().map(|h| self.entry_at(h)).collect()
    }
}

impl<K: Ord + Distance, V> RbTreeMap<K, V> {
    /// Returns the entries whose keys are closest to `target`.
    ///
    /// The probe follows the search path of `target` from the root and keeps
    /// every visited entry at the smallest distance seen, so ties (one key on
    /// each side of the target) are all returned, in visit order. The search
    /// path passes both the predecessor and the successor of `target`, so
    /// this agrees with an exhaustive scan.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn nearest(&self, target: &K) -> Vec<(&K, &V)> {
        self.raw.nearest(target).into_iter().map(|h| self.entry_at(h)).collect()
    }
}

impl<K, V> Default for RbTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbTreeMap<K, V> {
    /// Builds a map from pairs; for repeated keys the first pair wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RbTreeMap::new();
        for (k, v) in iter {
            let _ = map.insert(k, v);
        }
        map
    }
}

impl<K: Ord, Q, V> core::ops::Index<&Q> for RbTreeMap<K, V>
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RbTreeMap`.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V> IntoIterator for &'a RbTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// An in-order iterator over the entries of a `RbTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeMap`].
///
/// [`iter`]: RbTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    raw: &'a RawRbTree<K, V>,
    // Red-black height is at most 2*log2(n+1); 64 covers any realistic tree inline.
    stack: SmallVec<[Handle; 64]>,
    remaining: usize,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left_spine(&mut self, mut handle: Handle) {
        while !handle.is_nil() {
            self.stack.push(handle);
            handle = self.raw.left(handle);
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        let raw = self.raw;
        let handle = self.stack.pop()?;
        self.push_left_spine(raw.right(handle));
        self.remaining -= 1;
        Some((raw.key(handle), raw.value(handle)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn first_and_last() {
        let map: RbTreeMap<i32, char> = [(5, 'e'), (1, 'a'), (9, 'i')].into_iter().collect();
        assert_eq!(map.first_key_value(), Some((&1, &'a')));
        assert_eq!(map.last_key_value(), Some((&9, &'i')));

        let empty: RbTreeMap<i32, char> = RbTreeMap::new();
        assert_eq!(empty.first_key_value(), None);
        assert_eq!(empty.iter().next(), None);
    }

    #[test]
    fn from_iter_keeps_first_duplicate() {
        let map: RbTreeMap<i32, &str> = [(1, "first"), (1, "second")].into_iter().collect();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&1], "first");
        map.validate_invariants();
    }

    #[test]
    fn iter_reports_exact_size() {
        let map: RbTreeMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
        let mut iter = map.iter();
        assert_eq!(iter.len(), 100);
        iter.next();
        assert_eq!(iter.len(), 99);
        assert_eq!(iter.count(), 99);
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let map: RbTreeMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
    }

    #[test]
    fn clear_then_reuse() {
        let mut map: RbTreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
        map.clear();
        assert!(map.is_empty());
        map.insert(3, 3).unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3]);
        map.validate_invariants();
    }
}
