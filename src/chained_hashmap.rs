use std::{
    borrow::{Borrow, Cow},
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    iter, mem,
};

use log::debug;

use crate::{
    cursor::{Cursor, Iter},
    error::TableError,
};

/// Number of buckets a freshly constructed table starts with
pub const START_CAPACITY: usize = 16;
/// Load factor at or above which an insert doubles the capacity
pub const UPPER_LOAD_FACTOR: f64 = 0.75;
/// Load factor at or below which an erase halves the capacity
pub const LOWER_LOAD_FACTOR: f64 = 0.25;

/// A collision list: every entry whose key masks to the same slot, in insertion order
pub(crate) type Bucket<K, V> = Vec<(K, V)>;

/// A hash table resolving collisions by separate chaining.
///
/// Every slot of the bucket array holds a `Vec` of the entries whose key hashes to it.
/// The number of buckets is always a power of two, so a slot is picked by masking the
/// hash with `capacity - 1`. The table grows (doubles) when an insert brings the load
/// factor to [`UPPER_LOAD_FACTOR`] and shrinks (halves) when an erase brings it down to
/// [`LOWER_LOAD_FACTOR`]. Shrinking stops at a single bucket.
///
/// Unlike `std::collections::HashMap`, [`insert`](Self::insert) never overwrites a value
/// that is already stored; use [`index_or_insert`](Self::index_or_insert) or
/// [`get_mut`](Self::get_mut) for that.
///
/// Note: This implementation is not thread-safe. Callers sharing a table between threads
/// must guard every access with their own lock.
#[derive(Debug)]
pub struct ChainedHashMap<K, V> {
    /// The bucket array, `capacity` collision lists long
    buckets: Vec<Bucket<K, V>>,
    /// Current number of entries across all buckets
    size: usize,
    /// `size / capacity`, refreshed after every structural change
    load_factor: f64,
}

/// Builds `capacity` empty buckets without requiring `Clone` on the entries
fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    iter::repeat_with(Vec::new).take(capacity).collect()
}

impl<K, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChainedHashMap<K, V> {
    /// Creates an empty table with [`START_CAPACITY`] buckets
    #[must_use]
    pub fn new() -> Self {
        Self { buckets: empty_buckets(START_CAPACITY), size: 0, load_factor: 0.0 }
    }

    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the cached `len / capacity` ratio
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Removes every entry. The capacity is left untouched.
    pub fn clear(&mut self) {
        if self.size == 0 {
            return;
        }
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.size = 0;
        self.refresh_load_factor();
    }

    /// Returns a cursor on the first entry, or the end cursor if the table is empty
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::begin(&self.buckets)
    }

    /// Returns the cursor one past the last entry
    #[must_use]
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::end(&self.buckets)
    }

    /// Returns an iterator over the entries in bucket order, then insertion order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.begin(), self.size)
    }

    /// Returns the length of every bucket, in slot order
    pub fn bucket_lengths(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }

    /// Recomputes the cached load factor from the current size and capacity
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn refresh_load_factor(&mut self) {
        self.load_factor = self.size as f64 / self.buckets.len() as f64;
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Builds a table from parallel key and value sequences.
    ///
    /// Pairs are applied in order; when a key repeats, the later value replaces the
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ArityMismatch`] if the sequences differ in length.
    pub fn from_parallel<IK, IV>(keys: IK, values: IV) -> Result<Self, TableError>
    where
        IK: IntoIterator<Item = K>,
        IK::IntoIter: ExactSizeIterator,
        IV: IntoIterator<Item = V>,
        IV::IntoIter: ExactSizeIterator,
    {
        let keys = keys.into_iter();
        let values = values.into_iter();
        if keys.len() != values.len() {
            return Err(TableError::ArityMismatch { keys: keys.len(), values: values.len() });
        }

        let mut table = Self::new();
        table.extend(keys.zip(values));
        Ok(table)
    }

    /// Hashes a key with the std `DefaultHasher`
    fn hash<Q: ?Sized + Hash>(key: &Q) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Maps a key onto a slot of a bucket array with `capacity` buckets
    #[allow(clippy::cast_possible_truncation)]
    fn slot_for<Q: ?Sized + Hash>(key: &Q, capacity: usize) -> usize {
        (Self::hash(key) as usize) & capacity.saturating_sub(1)
    }

    /// Locates a key as `(slot, position in bucket)`
    fn find<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = Self::slot_for(key, self.capacity());
        let position = self.buckets.get(slot)?.iter().position(|(k, _)| k.borrow() == key)?;
        Some((slot, position))
    }

    /// Inserts a key-value pair if the key is not present yet.
    ///
    /// Returns false, leaving the stored value untouched, when the key already exists.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.push_new(key, value);
        true
    }

    /// Appends an entry whose key is known to be absent, growing first if needed.
    ///
    /// Returns where the entry landed.
    #[allow(clippy::indexing_slicing)]
    fn push_new(&mut self, key: K, value: V) -> (usize, usize) {
        self.size = self.size.saturating_add(1);
        self.refresh_load_factor();
        if self.load_factor >= UPPER_LOAD_FACTOR {
            self.rehash(self.capacity().saturating_mul(2));
        }

        // The mask keeps the slot below the capacity.
        let slot = Self::slot_for(&key, self.capacity());
        let bucket = &mut self.buckets[slot];
        bucket.push((key, value));
        (slot, bucket.len().saturating_sub(1))
    }

    /// Stores a pair, replacing the value if the key is already present
    fn upsert(&mut self, key: K, value: V) {
        if let Some(slot) = self.get_mut(&key) {
            *slot = value;
        } else {
            self.push_new(key, value);
        }
    }

    /// Moves every entry into a fresh bucket array of `new_capacity` buckets.
    ///
    /// Entries are visited in the old iteration order, so entries sharing a new bucket
    /// keep their relative order.
    #[allow(clippy::indexing_slicing)]
    fn rehash(&mut self, new_capacity: usize) {
        debug!(
            "Rehashing {} entries from {} to {} buckets",
            self.size,
            self.capacity(),
            new_capacity
        );
        let old = mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for (key, value) in old.into_iter().flatten() {
            let slot = Self::slot_for(&key, new_capacity);
            self.buckets[slot].push((key, value));
        }
        self.refresh_load_factor();
    }

    /// Returns true if the table holds the key
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Retrieves the value bound to a key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (slot, position) = self.find(key)?;
        self.buckets.get(slot)?.get(position).map(|(_, v)| v)
    }

    /// Retrieves a mutable reference to the value bound to a key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (slot, position) = self.find(key)?;
        self.buckets.get_mut(slot)?.get_mut(position).map(|(_, v)| v)
    }

    /// Returns the value bound to a key.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::KeyNotFound`] if the key is absent.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, TableError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).ok_or(TableError::KeyNotFound)
    }

    /// Returns a mutable reference to the value bound to a key.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::KeyNotFound`] if the key is absent.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, TableError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(key).ok_or(TableError::KeyNotFound)
    }

    /// Returns the value bound to `key`, first inserting `V::default()` if it is absent.
    ///
    /// The insertion may resize the table.
    #[allow(clippy::indexing_slicing)]
    pub fn index_or_insert(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (slot, position) = match self.find(&key) {
            Some(found) => found,
            None => self.push_new(key, V::default()),
        };
        &mut self.buckets[slot][position].1
    }

    /// Returns the value bound to `key` without ever mutating the table.
    ///
    /// A miss yields an owned `V::default()` that is not stored anywhere.
    pub fn index_or_default<Q>(&self, key: &Q) -> Cow<'_, V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone + Default,
    {
        self.get(key).map_or_else(|| Cow::Owned(V::default()), Cow::Borrowed)
    }

    /// Returns the slot index of a stored key.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::KeyNotFound`] if the key is absent.
    pub fn bucket_index<Q>(&self, key: &Q) -> Result<usize, TableError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|(slot, _)| slot).ok_or(TableError::KeyNotFound)
    }

    /// Returns the number of entries sharing the bucket of a stored key.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::KeyNotFound`] if the key is absent.
    pub fn bucket_size<Q>(&self, key: &Q) -> Result<usize, TableError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.bucket_index(key)?;
        self.buckets.get(slot).map(Vec::len).ok_or(TableError::KeyNotFound)
    }

    /// Removes a key and returns its value, shrinking the table if it became sparse
    #[allow(clippy::arithmetic_side_effects)]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (slot, position) = self.find(key)?;
        let (_, value) = self.buckets.get_mut(slot)?.remove(position);
        self.size = self.size.saturating_sub(1);
        self.refresh_load_factor();

        // A zero-bucket array could not take the next insert.
        if self.load_factor <= LOWER_LOAD_FACTOR && self.capacity() > 1 {
            self.rehash(self.capacity() / 2);
        }
        Some(value)
    }

    /// Removes a key. Returns false if it was not present.
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_some()
    }
}

/// Copies by replaying the source's iteration order into a fresh table, so the copy's
/// capacity follows from its own insert history.
impl<K, V> Clone for ChainedHashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        for (key, value) in self {
            copy.insert(key.clone(), value.clone());
        }
        copy
    }
}

/// Two tables are equal when size, capacity and load factor agree and their entries
/// match pairwise in iteration order.
impl<K, V> PartialEq for ChainedHashMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size &&
            self.capacity() == other.capacity() &&
            self.load_factor == other.load_factor &&
            self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for ChainedHashMap<K, V> {}

impl<K, V> Extend<(K, V)> for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.upsert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, K, V> IntoIterator for &'a ChainedHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
