//! radix_trie - longest-prefix-match radix trie for IPv4/IPv6 prefixes
//!
//! A bit-indexed Patricia trie over IP prefixes: insert, delete, exact-match
//! lookup, best (longest-prefix) match lookup, stable iteration, and
//! per-node user data that survives both node removal and trie drop.
//!
//! # Quick Start
//!
//! ```rust
//! use radix_trie::{Trie, Prefix};
//!
//! let mut trie = Trie::new();
//! let net = Prefix::parse("10.0.0.0/8")?;
//! let handle = trie.add(&net)?;
//! handle.set("owner", "example-corp");
//!
//! let best = trie.search_best(&Prefix::parse("10.1.2.3/32")?).unwrap();
//! assert_eq!(best.prefix(), "10.0.0.0/8");
//! assert_eq!(best.get("owner")?, radix_trie::Value::from("example-corp"));
//! # Ok::<(), radix_trie::RadixError>(())
//! ```
//!
//! # Architecture
//!
//! Four layers, leaves first:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ Trie: owns the spine, runs   │
//! │ insert/delete/search/iterate │
//! ├──────────────────────────────┤
//! │ Node: glue or real, tagged   │
//! │ sum; real nodes carry a      │
//! │ Handle-shared payload        │
//! ├──────────────────────────────┤
//! │ Prefix: canonical address +  │
//! │ length, bit access           │
//! └──────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for radix trie operations.
pub mod error;
/// Iteration over a trie's stored prefixes, with concurrent-modification
/// detection.
pub mod iter;
/// Trie nodes and the externally-visible node handle.
mod node;
/// Prefix parsing, canonicalisation, and bit access.
pub mod prefix;
/// The trie container itself.
pub mod trie;
/// User-data value type stored on real nodes.
pub mod value;

pub use crate::error::{RadixError, Result};
pub use crate::iter::Iter;
pub use crate::node::{Attribute, Handle};
pub use crate::prefix::{Family, Prefix};
pub use crate::trie::Trie;
pub use crate::value::Value;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_match_climbs_to_most_specific_covering_prefix() {
        let mut trie = Trie::new();
        trie.add(&Prefix::parse("10.0.0.0/8").unwrap()).unwrap();
        trie.add(&Prefix::parse("10.0.0.0/16").unwrap()).unwrap();
        trie.add(&Prefix::parse("10.0.0.0/24").unwrap()).unwrap();

        let best = trie.search_best(&Prefix::parse("10.0.0.1/32").unwrap()).unwrap();
        assert_eq!(best.prefix(), "10.0.0.0/24");
    }

    #[test]
    fn trie_locks_to_first_family() {
        let mut trie = Trie::new();
        trie.add(&Prefix::parse("10.0.0.0/8").unwrap()).unwrap();
        assert!(trie.add(&Prefix::parse("::1/128").unwrap()).is_err());
    }

    #[test]
    fn handle_survives_trie_drop() {
        let mut trie = Trie::new();
        let handle = trie.add(&Prefix::parse("192.168.0.0/16").unwrap()).unwrap();
        handle.set("note", "survives");
        drop(trie);
        assert_eq!(handle.get("note").unwrap(), Value::Str("survives".to_string()));
    }

    #[test]
    fn add_is_idempotent_and_returns_same_handle() {
        let mut trie = Trie::new();
        let a = trie.add(&Prefix::parse("172.16.0.0/12").unwrap()).unwrap();
        a.set("hits", 1i64);
        let b = trie.add(&Prefix::parse("172.16.0.0/12").unwrap()).unwrap();
        assert!(a.is_same_node(&b));
        assert_eq!(b.get("hits").unwrap(), Value::Int(1));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn delete_then_recover_allows_reinsertion() {
        let mut trie = Trie::new();
        trie.add(&Prefix::parse("10.0.0.0/8").unwrap()).unwrap();
        trie.add(&Prefix::parse("10.0.0.0/16").unwrap()).unwrap();
        trie.delete(&Prefix::parse("10.0.0.0/8").unwrap()).unwrap();
        assert!(trie.search_exact(&Prefix::parse("10.0.0.0/8").unwrap()).is_none());
        assert!(trie.search_exact(&Prefix::parse("10.0.0.0/16").unwrap()).is_some());
        let h = trie.add(&Prefix::parse("10.0.0.0/8").unwrap()).unwrap();
        assert!(h.get("anything").is_err());
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn bulk_grid_insert_and_delete() {
        let mut trie = Trie::new();
        for a in 0u8..16 {
            for b in 0u8..8 {
                let text = format!("10.{}.{}.0/24", a, b);
                trie.add(&Prefix::parse(&text).unwrap()).unwrap();
            }
        }
        assert_eq!(trie.len(), 16 * 8);
        for a in 0u8..16 {
            for b in 0u8..8 {
                let text = format!("10.{}.{}.0/24", a, b);
                trie.delete(&Prefix::parse(&text).unwrap()).unwrap();
            }
        }
        assert_eq!(trie.len(), 0);
        assert_eq!(trie.nodes().len(), 0);
    }
}
