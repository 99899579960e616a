//! Error types for the radix trie library
use std::fmt;

/// Result type alias for radix trie operations
pub type Result<T> = std::result::Result<T, RadixError>;

/// Main error type for radix trie operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadixError {
    /// Malformed textual prefix, out-of-range prefixlen, or a prefix of the
    /// wrong family for a trie that already committed to one.
    InvalidArgument(String),

    /// `delete` of a prefix that has no matching real node.
    NotFound,

    /// Read of a user-data key that was never set on the node.
    KeyNotFound(String),

    /// Read of a handle attribute that isn't one of the documented ones.
    AttributeNotFound(String),

    /// An iterator was advanced after the trie was structurally mutated.
    ConcurrentModification,
}

impl fmt::Display for RadixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadixError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            RadixError::NotFound => write!(f, "not found"),
            RadixError::KeyNotFound(key) => write!(f, "key not found: {}", key),
            RadixError::AttributeNotFound(attr) => write!(f, "attribute not found: {}", attr),
            RadixError::ConcurrentModification => {
                write!(f, "trie was modified during iteration")
            }
        }
    }
}

impl std::error::Error for RadixError {}

impl From<std::net::AddrParseError> for RadixError {
    fn from(err: std::net::AddrParseError) -> Self {
        RadixError::InvalidArgument(err.to_string())
    }
}

impl From<std::num::ParseIntError> for RadixError {
    fn from(err: std::num::ParseIntError) -> Self {
        RadixError::InvalidArgument(err.to_string())
    }
}
