//! Big-integer taint classification.
//!
//! Decides from node shape, recorded facts and binding resolution whether
//! a node's runtime value is a big integer. Read-only over the tree; answers
//! are written back to the fact store, so each node is classified once:
//! positives become the taint fact, negatives are cached until a new taint
//! could change them.
//!
//! Rules, first match wins:
//! 0. the node carries the taint fact
//! 1. big-integer literal
//! 2. identifier whose binding is tainted
//! 3. call whose callee is the constructor name, or a member of it
//! 4. binary operation in the operator table with a tainted operand
//! 5. `-x`/`~x` with a tainted operand
//! 6. compound assignment in the operator table with a tainted value
//!
//! Everything else, including invalid ids, is not a big integer.
//!
//! Constructor detection is by name only. A local binding that shadows the
//! constructor name is still treated as the constructor.

use jsbi_ir::{ensure_sufficient_stack, Name, NodeArena, NodeId, NodeKind, NodeRange, ScopeTree};

use crate::facts::FactStore;
use crate::ops::{binary_method, unary_method};

/// View used to answer "is this a big integer?".
pub struct Classifier<'a> {
    pub arena: &'a NodeArena,
    pub scopes: &'a ScopeTree,
    pub facts: &'a mut FactStore,
    /// Interned constructor name.
    pub ctor: Name,
}

/// Whether `callee` names the constructor `ctor` or one of its static members.
pub fn is_ctor_callee(arena: &NodeArena, callee: NodeId, ctor: Name) -> bool {
    if !arena.contains(callee) {
        return false;
    }
    match *arena.kind(callee) {
        NodeKind::Ident(name) => name == ctor,
        NodeKind::Member { object, .. } => {
            arena.contains(object) && *arena.kind(object) == NodeKind::Ident(ctor)
        }
        _ => false,
    }
}

impl Classifier<'_> {
    pub fn is_big_int_value(&mut self, id: NodeId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.facts.is_tainted(id) {
            return true;
        }
        if self.facts.is_known_untainted(id) {
            return false;
        }
        let big = ensure_sufficient_stack(|| self.classify_shape(id));
        if big {
            self.facts.mark_tainted(id);
        } else {
            self.facts.record_untainted(id);
        }
        big
    }

    /// Whether any node of `list` is a big integer.
    pub fn any_big_int(&mut self, list: NodeRange) -> bool {
        let arena = self.arena;
        arena.list(list).iter().any(|&id| self.is_big_int_value(id))
    }

    pub fn is_ctor_callee(&self, callee: NodeId) -> bool {
        is_ctor_callee(self.arena, callee, self.ctor)
    }

    fn classify_shape(&mut self, id: NodeId) -> bool {
        match *self.arena.kind(id) {
            NodeKind::BigInt(_) => true,
            NodeKind::Ident(_) => self
                .scopes
                .binding_of(id)
                .is_some_and(|binding| self.facts.is_binding_tainted(binding)),
            NodeKind::Call { callee, .. } => self.is_ctor_callee(callee),
            NodeKind::Binary { op, left, right } => {
                binary_method(op).is_some()
                    && (self.is_big_int_value(left) || self.is_big_int_value(right))
            }
            NodeKind::Unary { op, operand } => {
                unary_method(op).is_some() && self.is_big_int_value(operand)
            }
            NodeKind::Assign { op, value, .. } => {
                op.base_op().and_then(binary_method).is_some() && self.is_big_int_value(value)
            }
            _ => false,
        }
    }
}
