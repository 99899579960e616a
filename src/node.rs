//! Trie nodes and the externally-visible node [`Handle`].
//!
//! Two roles share one structural record: a *glue* node is a pure branch
//! point with no stored prefix, and a *real* node represents a stored
//! prefix and carries a [`Handle`]-shared payload. The role is a tagged
//! sum (`NodeKind`) rather than a nullable-prefix field.
//!
//! Real-node payloads live behind `Rc<RealNodeData>` (user data behind a
//! `RefCell` for interior mutability) so a [`Handle`] keeps reporting
//! `prefix`/`network`/`prefixlen`/`family`/`data` after the trie drops its
//! structural reference to the node.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{RadixError, Result};
use crate::prefix::{Family, Prefix};
use crate::value::Value;

/// Payload of a real node: immutable prefix plus mutable user data.
pub(crate) struct RealNodeData {
    pub(crate) prefix: Prefix,
    data: RefCell<HashMap<String, Value>>,
}

impl RealNodeData {
    pub(crate) fn new(prefix: Prefix) -> Rc<Self> {
        Rc::new(Self {
            prefix,
            data: RefCell::new(HashMap::new()),
        })
    }
}

/// Structural role of a [`Node`].
pub(crate) enum NodeKind {
    /// Internal branch point; never exposed as a [`Handle`].
    Glue,
    /// A stored prefix, with a handle-shared payload.
    Real(Rc<RealNodeData>),
}

/// One node of the trie's binary spine.
pub(crate) struct Node {
    pub(crate) bit_index: u8,
    pub(crate) kind: NodeKind,
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
}

impl Node {
    pub(crate) fn new_real(bit_index: u8, prefix: Prefix) -> Self {
        Self {
            bit_index,
            kind: NodeKind::Real(RealNodeData::new(prefix)),
            left: None,
            right: None,
        }
    }

    pub(crate) fn new_glue(bit_index: u8, left: Box<Node>, right: Box<Node>) -> Self {
        Self {
            bit_index,
            kind: NodeKind::Glue,
            left: Some(left),
            right: Some(right),
        }
    }

    pub(crate) fn is_real(&self) -> bool {
        matches!(self.kind, NodeKind::Real(_))
    }

    pub(crate) fn real_prefix(&self) -> Option<&Prefix> {
        match &self.kind {
            NodeKind::Real(data) => Some(&data.prefix),
            NodeKind::Glue => None,
        }
    }

    pub(crate) fn handle(&self) -> Option<Handle> {
        match &self.kind {
            NodeKind::Real(data) => Some(Handle {
                inner: Rc::clone(data),
            }),
            NodeKind::Glue => None,
        }
    }

    pub(crate) fn child(&self, side: bool) -> Option<&Node> {
        if side {
            self.right.as_deref()
        } else {
            self.left.as_deref()
        }
    }

    pub(crate) fn child_mut(&mut self, side: bool) -> &mut Option<Box<Node>> {
        if side {
            &mut self.right
        } else {
            &mut self.left
        }
    }

    /// Child count, used by the delete/collapse invariant (I5: no glue
    /// node with fewer than two children survives a completed mutation).
    pub(crate) fn child_count(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }

    /// Walk down from this node picking a real descendant, used to find a
    /// comparand prefix during insert.
    pub(crate) fn any_real_descendant(&self) -> &Prefix {
        match &self.kind {
            NodeKind::Real(data) => &data.prefix,
            NodeKind::Glue => self
                .left
                .as_deref()
                .or(self.right.as_deref())
                .expect("glue node always has a child (I5)")
                .any_real_descendant(),
        }
    }
}

/// A caller-visible reference to a stored prefix.
///
/// Remains valid and keeps reporting its attributes after the trie that
/// produced it is dropped, or after the prefix is deleted from the trie —
/// only further lookups on the trie stop finding it.
#[derive(Clone)]
pub struct Handle {
    inner: Rc<RealNodeData>,
}

impl Handle {
    /// Canonical textual prefix, e.g. `"10.0.0.0/8"`.
    pub fn prefix(&self) -> String {
        self.inner.prefix.canonical()
    }

    /// Network address without `/prefixlen`.
    pub fn network(&self) -> String {
        self.inner.prefix.network()
    }

    /// Prefix length.
    pub fn prefixlen(&self) -> u8 {
        self.inner.prefix.prefixlen()
    }

    /// Address family.
    pub fn family(&self) -> Family {
        self.inner.prefix.family()
    }

    /// Read a user-data value by key.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.inner
            .data
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| RadixError::KeyNotFound(key.to_string()))
    }

    /// Write a user-data value, overwriting any existing value for `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.inner
            .data
            .borrow_mut()
            .insert(key.into(), value.into());
    }

    /// Remove a user-data value, returning it if present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.data.borrow_mut().remove(key)
    }

    /// Snapshot of all user data currently set on this node.
    pub fn data(&self) -> HashMap<String, Value> {
        self.inner.data.borrow().clone()
    }

    /// Access one of the documented handle attributes by name: `prefix`,
    /// `network`, `prefixlen`, `family`, or `data`. Any other name fails
    /// with `attribute-not-found`.
    pub fn attribute(&self, name: &str) -> Result<Attribute> {
        match name {
            "prefix" => Ok(Attribute::Prefix(self.prefix())),
            "network" => Ok(Attribute::Network(self.network())),
            "prefixlen" => Ok(Attribute::Prefixlen(self.prefixlen())),
            "family" => Ok(Attribute::Family(self.family())),
            "data" => Ok(Attribute::Data(self.data())),
            other => Err(RadixError::AttributeNotFound(other.to_string())),
        }
    }

    /// Whether `self` and `other` refer to the same node, i.e. would have
    /// been returned by the same `add` call (`add` is idempotent and
    /// returns the same handle both times).
    pub fn is_same_node(&self, other: &Handle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").field("prefix", &self.prefix()).finish()
    }
}

/// The value of one of a [`Handle`]'s documented attributes, as returned by
/// [`Handle::attribute`].
#[derive(Debug, Clone)]
pub enum Attribute {
    /// `prefix` — canonical textual prefix.
    Prefix(String),
    /// `network` — network address without `/prefixlen`.
    Network(String),
    /// `prefixlen` — prefix length.
    Prefixlen(u8),
    /// `family` — address family.
    Family(Family),
    /// `data` — snapshot of the user-data mapping.
    Data(HashMap<String, Value>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_data_roundtrip() {
        let prefix = Prefix::parse("10.0.0.0/8").unwrap();
        let node = Node::new_real(8, prefix);
        let h = node.handle().unwrap();
        assert!(h.get("missing").is_err());
        h.set("asn", 64512i64);
        assert_eq!(h.get("asn").unwrap(), Value::Int(64512));
    }

    #[test]
    fn handle_attribute_access() {
        let prefix = Prefix::parse("10.0.0.0/8").unwrap();
        let node = Node::new_real(8, prefix);
        let h = node.handle().unwrap();
        assert!(matches!(h.attribute("prefix"), Ok(Attribute::Prefix(_))));
        assert!(matches!(
            h.attribute("nonexistent"),
            Err(RadixError::AttributeNotFound(_))
        ));
    }

    #[test]
    fn handle_identity_tracks_same_rc() {
        let prefix = Prefix::parse("10.0.0.0/8").unwrap();
        let node = Node::new_real(8, prefix);
        let h1 = node.handle().unwrap();
        let h2 = node.handle().unwrap();
        assert!(h1.is_same_node(&h2));
    }
}
