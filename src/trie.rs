//! The trie container: owns the structural spine, enforces the Patricia
//! invariants, and implements insert/delete/lookup.
//!
//! Insert and delete are both expressed as a single recursive walk over
//! `Option<Box<Node>>` slots, in a panic-safe take/replace style, rather
//! than via explicit parent back-pointers: each recursive frame re-derives
//! its own local "first differing bit" against a representative
//! descendant, and the frame where that bit turns out to be above the
//! current node's own `bit_index` is exactly the frame that performs the
//! split. The recursive call stack unwinding plays the role an explicit
//! walk back up to the shallowest affected ancestor would, without needing
//! to store parent edges at all.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{RadixError, Result};
use crate::node::{Handle, Node};
use crate::prefix::{Family, Prefix};

/// A bit-indexed Patricia trie over IPv4 or IPv6 prefixes.
///
/// Commits to one address family on its first successful `add`; every
/// later `add`/`delete`/`search_*` against a prefix of the other family
/// fails with `invalid-argument`.
pub struct Trie {
    root: Option<Box<Node>>,
    family: Option<Family>,
    count: usize,
    /// Monotonic structure-version counter, shared (via `Rc<Cell<_>>`, not
    /// `RefCell`, since only the count itself needs interior mutability)
    /// with every live `Iter` so iteration can detect a structural
    /// mutation that happened after it was created without needing to
    /// borrow `self` for its whole lifetime.
    version: Rc<Cell<u64>>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// An empty trie, committed to no family yet.
    pub fn new() -> Self {
        Self {
            root: None,
            family: None,
            count: 0,
            version: Rc::new(Cell::new(0)),
        }
    }

    /// Number of stored (real) prefixes.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the trie holds no prefixes.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The family this trie has committed to, or `None` if still empty.
    pub fn family(&self) -> Option<Family> {
        self.family
    }

    fn bump_version(&mut self) {
        self.version.set(self.version.get().wrapping_add(1));
    }

    fn check_family(&mut self, prefix: &Prefix) -> Result<()> {
        match self.family {
            None => {
                self.family = Some(prefix.family());
                Ok(())
            }
            Some(f) if f == prefix.family() => Ok(()),
            Some(f) => Err(RadixError::InvalidArgument(format!(
                "trie is committed to {}, cannot add a {} prefix",
                f,
                prefix.family()
            ))),
        }
    }

    /// Insert `prefix` if absent, or return the existing handle. Preserves
    /// user data on an existing node (idempotent: calling twice returns the
    /// same handle both times).
    pub fn add(&mut self, prefix: &Prefix) -> Result<Handle> {
        self.check_family(prefix)?;
        let (handle, changed) = insert(&mut self.root, prefix);
        if changed {
            self.count += 1;
            self.bump_version();
        }
        Ok(handle)
    }

    /// Remove the real node exactly matching `prefix`.
    ///
    /// Fails with `not-found` if no such node exists. Handles held outside
    /// the trie for `prefix` remain valid.
    pub fn delete(&mut self, prefix: &Prefix) -> Result<()> {
        if self.family.is_some() && self.family != Some(prefix.family()) {
            return Err(RadixError::InvalidArgument(format!(
                "trie is committed to {}, cannot delete a {} prefix",
                self.family.unwrap(),
                prefix.family()
            )));
        }
        delete(&mut self.root, prefix)?;
        self.count -= 1;
        self.bump_version();
        Ok(())
    }

    /// Exact-match lookup: the real node whose prefix equals `prefix`
    /// exactly, or `None`.
    pub fn search_exact(&self, prefix: &Prefix) -> Option<Handle> {
        search_exact(self.root.as_deref(), prefix)
    }

    /// Best-match (longest-prefix-covering) lookup.
    pub fn search_best(&self, prefix: &Prefix) -> Option<Handle> {
        search_best(self.root.as_deref(), prefix)
    }

    /// All stored real nodes, in depth-first left-before-right order.
    pub fn nodes(&self) -> Vec<Handle> {
        let mut out = Vec::with_capacity(self.count);
        collect(self.root.as_deref(), &mut out);
        out
    }

    /// Canonical textual prefixes of all stored real nodes, same order as
    /// [`Trie::nodes`].
    pub fn prefixes(&self) -> Vec<String> {
        self.nodes().iter().map(Handle::prefix).collect()
    }

    /// A structure-version-checked iterator over all stored real nodes.
    pub fn iter(&self) -> crate::iter::Iter {
        crate::iter::Iter::new(self.nodes(), self.version.get(), Rc::clone(&self.version))
    }
}

fn first_diff_bit(a: &Prefix, b: &Prefix, upper: u8) -> u8 {
    for i in 0..upper {
        if a.bit(i) != b.bit(i) {
            return i;
        }
    }
    upper
}

/// Returns `(handle, structure_changed)`.
fn insert(slot: &mut Option<Box<Node>>, prefix: &Prefix) -> (Handle, bool) {
    if slot.is_none() {
        let node = Box::new(Node::new_real(prefix.prefixlen(), *prefix));
        let handle = node.handle().unwrap();
        *slot = Some(node);
        return (handle, true);
    }

    let comparand = *slot.as_deref().unwrap().any_real_descendant();
    let upper = prefix.prefixlen().min(comparand.prefixlen());
    let d = first_diff_bit(prefix, &comparand, upper);

    let bit_index = slot.as_deref().unwrap().bit_index;

    if d < bit_index {
        // Split strictly above this node: the whole existing subtree
        // becomes a sibling (or single child, if the new prefix is a
        // proper ancestor of it).
        let old = slot.take().unwrap();
        if d == prefix.prefixlen() {
            let mut parent = Node::new_real(d, *prefix);
            let side = comparand.bit(d);
            *parent.child_mut(side) = Some(old);
            let handle = parent.handle().unwrap();
            *slot = Some(Box::new(parent));
            (handle, true)
        } else {
            let new_leaf = Box::new(Node::new_real(prefix.prefixlen(), *prefix));
            let handle = new_leaf.handle().unwrap();
            let old_side = comparand.bit(d);
            let glue = if old_side {
                Node::new_glue(d, new_leaf, old)
            } else {
                Node::new_glue(d, old, new_leaf)
            };
            *slot = Some(Box::new(glue));
            (handle, true)
        }
    } else if bit_index == d && bit_index == prefix.prefixlen() {
        let node = slot.as_mut().unwrap();
        if node.is_real() {
            (node.handle().unwrap(), false)
        } else {
            node.kind = crate::node::NodeKind::Real(crate::node::RealNodeData::new(*prefix));
            (node.handle().unwrap(), true)
        }
    } else {
        let node = slot.as_mut().unwrap();
        let side = prefix.bit(node.bit_index);
        insert(node.child_mut(side), prefix)
    }
}

fn delete(slot: &mut Option<Box<Node>>, prefix: &Prefix) -> Result<()> {
    let bit_index = match slot.as_deref() {
        Some(node) => node.bit_index,
        None => return Err(RadixError::NotFound),
    };

    if bit_index > prefix.prefixlen() {
        return Err(RadixError::NotFound);
    }

    if bit_index == prefix.prefixlen() {
        let matches = matches!(slot.as_deref().unwrap().real_prefix(), Some(p) if p == prefix);
        if !matches {
            return Err(RadixError::NotFound);
        }
        let mut node_box = slot.take().unwrap();
        let left = node_box.left.take();
        let right = node_box.right.take();
        *slot = match (left, right) {
            (None, None) => None,
            (Some(c), None) | (None, Some(c)) => Some(c),
            (Some(l), Some(r)) => Some(Box::new(Node::new_glue(bit_index, l, r))),
        };
        return Ok(());
    }

    let side = prefix.bit(bit_index);
    {
        let node = slot.as_deref_mut().unwrap();
        delete(node.child_mut(side), prefix)?;
    }

    let node = slot.as_deref().unwrap();
    if !node.is_real() && node.child_count() < 2 {
        let mut node_box = slot.take().unwrap();
        let only_child = node_box.left.take().or_else(|| node_box.right.take());
        *slot = only_child;
    }

    Ok(())
}

fn search_exact(mut cur: Option<&Node>, prefix: &Prefix) -> Option<Handle> {
    loop {
        let node = cur?;
        if node.bit_index == prefix.prefixlen() {
            return match node.real_prefix() {
                Some(p) if p == prefix => node.handle(),
                _ => None,
            };
        }
        if node.bit_index > prefix.prefixlen() {
            return None;
        }
        let side = prefix.bit(node.bit_index);
        cur = node.child(side);
    }
}

fn search_best(mut cur: Option<&Node>, query: &Prefix) -> Option<Handle> {
    let mut best: Option<Handle> = None;
    while let Some(node) = cur {
        if let Some(p) = node.real_prefix() {
            if p.covers(query) {
                best = node.handle();
            }
        }
        if node.bit_index >= query.prefixlen() {
            break;
        }
        let side = query.bit(node.bit_index);
        cur = node.child(side);
    }
    best
}

fn collect(cur: Option<&Node>, out: &mut Vec<Handle>) {
    if let Some(node) = cur {
        if let Some(h) = node.handle() {
            out.push(h);
        }
        collect(node.left.as_deref(), out);
        collect(node.right.as_deref(), out);
    }
}
