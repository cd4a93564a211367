//! Tree Visitor Pattern
//!
//! Provides generic read-only traversal of the arena-allocated tree.
//!
//! # Design
//!
//! Override `visit_node` to add custom behavior at specific node kinds and
//! call [`walk_node`] to continue into children. The visitor can mutate its
//! own state during traversal; the tree itself is not mutated.
//!
//! Walks are depth-first, left to right, in the order returned by
//! [`NodeArena::children`](crate::NodeArena::children).
//!
//! # Example
//!
//! ```text
//! struct CountLiterals {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountLiterals {
//!     fn visit_node(&mut self, id: NodeId, arena: &'ast NodeArena) {
//!         if let NodeKind::BigInt(_) = arena.kind(id) {
//!             self.count += 1;
//!         }
//!         walk_node(self, id, arena);
//!     }
//! }
//! ```

use crate::{ensure_sufficient_stack, NodeArena, NodeId};

/// Tree visitor trait.
pub trait Visitor<'ast> {
    /// Visit a node by ID.
    fn visit_node(&mut self, id: NodeId, arena: &'ast NodeArena) {
        walk_node(self, id, arena);
    }
}

/// Walk a node's children.
pub fn walk_node<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: NodeId,
    arena: &'ast NodeArena,
) {
    ensure_sufficient_stack(|| {
        for child in arena.children(id) {
            visitor.visit_node(child, arena);
        }
    });
}
