//! Structure-version-checked iteration over a trie's stored prefixes.
//!
//! The traversal itself is materialised eagerly at [`Trie::iter`] time (see
//! `trie::collect`), so the iterator never holds a live borrow of the
//! trie's structural spine across calls to `next`. Each `next` instead
//! compares the version it captured at construction against the trie's
//! current version (cheaply, via a shared `Rc<Cell<u64>>`) and fails on
//! the first `next` call after a structural mutation has happened.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{RadixError, Result};
use crate::node::Handle;

/// Iterator returned by [`crate::Trie::iter`].
pub struct Iter {
    items: std::vec::IntoIter<Handle>,
    captured_version: u64,
    current_version: Rc<Cell<u64>>,
    poisoned: bool,
}

impl Iter {
    pub(crate) fn new(items: Vec<Handle>, captured_version: u64, current_version: Rc<Cell<u64>>) -> Self {
        Self {
            items: items.into_iter(),
            captured_version,
            current_version,
            poisoned: false,
        }
    }
}

impl Iterator for Iter {
    type Item = Result<Handle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }
        if self.current_version.get() != self.captured_version {
            self.poisoned = true;
            return Some(Err(RadixError::ConcurrentModification));
        }
        self.items.next().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use crate::prefix::Prefix;
    use crate::trie::Trie;

    #[test]
    fn iterates_in_stable_order_without_mutation() {
        let mut trie = Trie::new();
        trie.add(&Prefix::parse("10.0.0.0/8").unwrap()).unwrap();
        trie.add(&Prefix::parse("10.1.0.0/16").unwrap()).unwrap();
        let collected: Vec<_> = trie.iter().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn detects_concurrent_modification() {
        let mut trie = Trie::new();
        trie.add(&Prefix::parse("2001:db8::/32").unwrap()).unwrap();
        trie.add(&Prefix::parse("2001:db8:1::/48").unwrap()).unwrap();
        let mut it = trie.iter();
        let first = it.next().unwrap();
        assert!(first.is_ok());
        trie.delete(&Prefix::parse("2001:db8::/32").unwrap()).unwrap();
        let second = it.next().unwrap();
        assert!(matches!(second, Err(crate::error::RadixError::ConcurrentModification)));
    }
}
