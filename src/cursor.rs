//! Positional cursors and the iterator built on them
//!
//! A [`Cursor`] is a `(bucket index, index in bucket)` pair over a borrowed bucket array.
//! Because it holds a shared borrow of the table, the table cannot be mutated (and so
//! cannot resize) while any cursor or [`Iter`] derived from it is alive.

use std::{fmt, iter::FusedIterator};

use crate::chained_hashmap::Bucket;

/// A forward-only position inside a [`ChainedHashMap`](crate::ChainedHashMap).
///
/// Entries are visited in ascending bucket order, then in stored order within a bucket.
/// The end position is `(capacity, 0)`.
///
/// Two cursors compare equal when their coordinates match. The table they walk is not
/// part of the comparison, so cursors over different tables can compare equal.
pub struct Cursor<'a, K, V> {
    /// The bucket array being walked
    buckets: &'a [Bucket<K, V>],
    /// Slot of the current entry, `buckets.len()` at the end
    bucket_index: usize,
    /// Position of the current entry inside its bucket
    index_in_bucket: usize,
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Positions a cursor on the first entry of the first non-empty bucket
    pub(crate) fn begin(buckets: &'a [Bucket<K, V>]) -> Self {
        let mut cursor = Self { buckets, bucket_index: 0, index_in_bucket: 0 };
        cursor.seek_occupied();
        cursor
    }

    /// Positions a cursor one past the last entry
    pub(crate) fn end(buckets: &'a [Bucket<K, V>]) -> Self {
        Self { buckets, bucket_index: buckets.len(), index_in_bucket: 0 }
    }

    /// Moves to the first entry of the first non-empty bucket at or after the current one
    fn seek_occupied(&mut self) {
        let start = self.bucket_index;
        self.bucket_index = self
            .buckets
            .iter()
            .skip(start)
            .position(|bucket| !bucket.is_empty())
            .map_or(self.buckets.len(), |offset| start.saturating_add(offset));
        self.index_in_bucket = 0;
    }

    /// Steps to the next entry. Advancing the end cursor leaves it at the end.
    pub fn advance(&mut self) {
        let Some(bucket) = self.buckets.get(self.bucket_index) else {
            return;
        };
        let next = self.index_in_bucket.saturating_add(1);
        if next < bucket.len() {
            self.index_in_bucket = next;
        } else {
            self.bucket_index = self.bucket_index.saturating_add(1);
            self.seek_occupied();
        }
    }

    /// Returns the entry under the cursor, or `None` at the end
    #[must_use]
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        self.buckets
            .get(self.bucket_index)?
            .get(self.index_in_bucket)
            .map(|(key, value)| (key, value))
    }

    /// Returns `(bucket index, index in bucket)`
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.bucket_index, self.index_in_bucket)
    }

    /// Returns true once the cursor has moved past the last entry
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.bucket_index >= self.buckets.len()
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K, V> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("bucket_index", &self.bucket_index)
            .field("index_in_bucket", &self.index_in_bucket)
            .finish_non_exhaustive()
    }
}

/// Iterator over the entries of a [`ChainedHashMap`](crate::ChainedHashMap)
pub struct Iter<'a, K, V> {
    /// Position of the next entry to yield
    cursor: Cursor<'a, K, V>,
    /// Entries not yet yielded
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Wraps a cursor positioned at the first entry of a table holding `len` entries
    pub(crate) fn new(cursor: Cursor<'a, K, V>, len: usize) -> Self {
        Self { cursor, remaining: len }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.get()?;
        self.cursor.advance();
        self.remaining = self.remaining.saturating_sub(1);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { cursor: self.cursor, remaining: self.remaining }
    }
}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("cursor", &self.cursor)
            .field("remaining", &self.remaining)
            .finish()
    }
}
