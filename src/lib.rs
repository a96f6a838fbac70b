//! # Chained Hash Map
//!
//! A Rust implementation of a separate-chaining hash table with load-factor driven
//! resizing, and a phrase-score spam detector built on top of it.
//!
//! The table keeps a power-of-two number of buckets, each an insertion-ordered list of
//! entries. It doubles when an insert brings the load factor to 0.75 and halves when an
//! erase brings it down to 0.25, rehashing every entry in both cases.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chainmap::{ChainedHashMap, TableError};
//!
//! // Create a new table
//! let mut map = ChainedHashMap::new();
//!
//! // Insert values
//! assert!(map.insert("apple".to_string(), 1));
//! assert!(map.insert("banana".to_string(), 2));
//!
//! // Insert never overwrites an existing value
//! assert!(!map.insert("apple".to_string(), 10));
//! assert_eq!(map.at("apple"), Ok(&1));
//!
//! // Update values through the subscript
//! *map.index_or_insert("apple".to_string()) = 10;
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! assert!(map.erase("apple"));
//! assert_eq!(map.at("apple"), Err(TableError::KeyNotFound));
//! ```
//!
//! ## Bulk Construction and Iteration
//!
//! ```rust
//! use chainmap::ChainedHashMap;
//!
//! let map = ChainedHashMap::from_parallel(["a", "b", "c"], ["1", "2", "3"]).unwrap();
//! assert_eq!(map.len(), 3);
//!
//! let mut cursor = map.begin();
//! let mut visited = 0;
//! while cursor != map.end() {
//!     visited += 1;
//!     cursor.advance();
//! }
//! assert_eq!(visited, map.iter().count());
//! ```

/// Module implementing the separate-chaining hash table
mod chained_hashmap;
/// Cursors and iterators over the table
pub mod cursor;
/// Error type of the table
mod error;
/// Logger setup for the binaries
pub mod logger;
/// Spam detection built on the table
pub mod spam;
/// Utility traits for the table
mod utils;

pub use chained_hashmap::{ChainedHashMap, LOWER_LOAD_FACTOR, START_CAPACITY, UPPER_LOAD_FACTOR};
pub use cursor::{Cursor, Iter};
pub use error::TableError;
pub use utils::TableExtensions;
