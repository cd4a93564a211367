//! Per-unit fact store.
//!
//! Records which nodes and bindings hold big-integer values, which nodes a
//! rewrite rule has already consumed, and which nodes the traversal has
//! finished. Facts are only ever added; the store lives exactly as long as
//! one lowering run over one unit.
//!
//! Negative classifications are cached too, stamped with an epoch. The epoch
//! moves whenever a new fact could turn an earlier "not a big integer" into
//! "big integer": a binding becomes tainted, or a node with a cached negative
//! becomes tainted.

use bitflags::bitflags;
use jsbi_ir::{BindingId, NodeId};
use rustc_hash::FxHashSet;

bitflags! {
    /// Facts attached to one node.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FactFlags: u8 {
        /// The node's runtime value is a big integer.
        const TAINTED = 1 << 0;
        /// A rewrite rule produced or consumed this node; rules skip it.
        const REWRITTEN = 1 << 1;
        /// The traversal finished this node; later passes skip it.
        const SETTLED = 1 << 2;
    }
}

/// Node and binding facts for one unit.
#[derive(Clone, Debug, Default)]
pub struct FactStore {
    nodes: Vec<FactFlags>,
    bindings: FxHashSet<BindingId>,
    /// Per node: `epoch + 1` of its last negative classification, 0 if none.
    negatives: Vec<u32>,
    epoch: u32,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags recorded for `node`; empty for unknown or invalid ids.
    pub fn flags(&self, node: NodeId) -> FactFlags {
        if !node.is_valid() {
            return FactFlags::empty();
        }
        self.nodes.get(node.index()).copied().unwrap_or_default()
    }

    #[inline]
    pub fn is_tainted(&self, node: NodeId) -> bool {
        self.flags(node).contains(FactFlags::TAINTED)
    }

    #[inline]
    pub fn is_rewritten(&self, node: NodeId) -> bool {
        self.flags(node).contains(FactFlags::REWRITTEN)
    }

    #[inline]
    pub fn is_settled(&self, node: NodeId) -> bool {
        self.flags(node).contains(FactFlags::SETTLED)
    }

    pub fn mark_tainted(&mut self, node: NodeId) {
        if !self.is_tainted(node) && self.is_known_untainted(node) {
            self.epoch += 1;
        }
        self.insert(node, FactFlags::TAINTED);
    }

    pub fn mark_rewritten(&mut self, node: NodeId) {
        self.insert(node, FactFlags::REWRITTEN);
    }

    pub fn mark_settled(&mut self, node: NodeId) {
        self.insert(node, FactFlags::SETTLED);
    }

    /// Whether `node` classified as "not a big integer" and no fact has been
    /// added since that could change the answer.
    pub fn is_known_untainted(&self, node: NodeId) -> bool {
        node.is_valid() && self.negatives.get(node.index()).copied() == Some(self.epoch + 1)
    }

    /// Cache a negative classification of `node`.
    pub fn record_untainted(&mut self, node: NodeId) {
        if !node.is_valid() {
            return;
        }
        let index = node.index();
        if index >= self.negatives.len() {
            self.negatives.resize(index + 1, 0);
        }
        self.negatives[index] = self.epoch + 1;
    }

    /// Give `copy` every fact `original` has.
    pub fn copy_facts(&mut self, original: NodeId, copy: NodeId) {
        let flags = self.flags(original);
        if !flags.is_empty() {
            self.insert(copy, flags);
        }
    }

    /// Taint `binding`; returns whether it was newly tainted.
    pub fn taint_binding(&mut self, binding: BindingId) -> bool {
        let added = self.bindings.insert(binding);
        if added {
            self.epoch += 1;
        }
        added
    }

    pub fn is_binding_tainted(&self, binding: BindingId) -> bool {
        self.bindings.contains(&binding)
    }

    /// Number of nodes carrying the taint fact.
    pub fn tainted_node_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|flags| flags.contains(FactFlags::TAINTED))
            .count()
    }

    pub fn tainted_binding_count(&self) -> usize {
        self.bindings.len()
    }

    fn insert(&mut self, node: NodeId, flags: FactFlags) {
        if !node.is_valid() {
            return;
        }
        let index = node.index();
        if index >= self.nodes.len() {
            self.nodes.resize(index + 1, FactFlags::empty());
        }
        self.nodes[index] |= flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facts_are_sticky() {
        let mut facts = FactStore::new();
        let node = NodeId::new(7);
        assert!(!facts.is_tainted(node));
        facts.mark_tainted(node);
        facts.mark_rewritten(node);
        facts.mark_tainted(node);
        assert_eq!(facts.flags(node), FactFlags::TAINTED | FactFlags::REWRITTEN);
        assert!(!facts.is_tainted(NodeId::new(3)));
        assert_eq!(facts.tainted_node_count(), 1);
    }

    #[test]
    fn invalid_ids_are_ignored() {
        let mut facts = FactStore::new();
        facts.mark_tainted(NodeId::INVALID);
        assert!(!facts.is_tainted(NodeId::INVALID));
        assert_eq!(facts.tainted_node_count(), 0);
    }

    #[test]
    fn settled_is_independent_of_taint() {
        let mut facts = FactStore::new();
        let node = NodeId::new(2);
        facts.mark_settled(node);
        assert!(facts.is_settled(node));
        assert!(!facts.is_tainted(node));
        assert!(!facts.is_rewritten(node));
    }

    #[test]
    fn negatives_expire_when_that_node_is_tainted() {
        let mut facts = FactStore::new();
        let node = NodeId::new(4);
        let other = NodeId::new(5);
        facts.record_untainted(node);
        facts.record_untainted(other);
        assert!(facts.is_known_untainted(node));

        facts.mark_tainted(node);
        assert!(!facts.is_known_untainted(node));
        assert!(!facts.is_known_untainted(other));
    }

    #[test]
    fn tainting_an_unclassified_node_keeps_negatives() {
        let mut facts = FactStore::new();
        let cached = NodeId::new(1);
        facts.record_untainted(cached);
        facts.mark_tainted(NodeId::new(9));
        assert!(facts.is_known_untainted(cached));
    }

    #[test]
    fn copy_carries_all_flags() {
        let mut facts = FactStore::new();
        let original = NodeId::new(1);
        let copy = NodeId::new(40);
        facts.mark_tainted(original);
        facts.mark_rewritten(original);
        facts.copy_facts(original, copy);
        assert_eq!(facts.flags(copy), facts.flags(original));
    }
}
