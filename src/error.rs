//! Errors reported by [`ChainedHashMap`](crate::ChainedHashMap)

use thiserror::Error;

/// Failures surfaced by the table's fallible accessors and constructors.
///
/// None of the operations that return this error mutate the table before failing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The requested key is not stored in the table
    #[error("key not found in table")]
    KeyNotFound,
    /// Parallel key and value sequences had different lengths
    #[error("number of keys ({keys}) and values ({values}) don't match")]
    ArityMismatch {
        /// Length of the key sequence
        keys: usize,
        /// Length of the value sequence
        values: usize,
    },
}
