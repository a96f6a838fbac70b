//! Utility functions and traits for `ChainedHashMap`

use crate::ChainedHashMap;

/// Extension trait for table implementations that provides additional utility methods
pub trait TableExtensions<K, V> {
    /// Returns the keys of the table as a Vec, in iteration order
    fn keys(&self) -> Vec<K>;

    /// Returns the values of the table as a Vec, in iteration order
    fn values(&self) -> Vec<V>;

    /// Returns the length of the longest collision list
    fn longest_chain(&self) -> usize;
}

impl<K, V> TableExtensions<K, V> for ChainedHashMap<K, V>
where
    K: Clone,
    V: Clone,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn longest_chain(&self) -> usize {
        self.bucket_lengths().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_and_values() {
        let mut map = ChainedHashMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("c".to_string(), 3);

        let mut keys = map.keys();
        keys.sort(); // Sort for predictable comparison

        let mut values = map.values();
        values.sort_unstable();

        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_keys_follow_iteration_order() {
        let map: ChainedHashMap<u16, u16> = (0..50).map(|i| (i, i)).collect();
        let iterated: Vec<u16> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(map.keys(), iterated);
        assert_eq!(map.values(), iterated);
    }

    #[test]
    fn test_longest_chain() {
        let empty: ChainedHashMap<String, i32> = ChainedHashMap::new();
        assert_eq!(empty.longest_chain(), 0);

        let map: ChainedHashMap<u32, u32> = (0..200).map(|i| (i, i)).collect();
        let longest = map.longest_chain();
        assert!(longest >= 1);
        assert!(map.bucket_lengths().all(|len| len <= longest));
    }
}
