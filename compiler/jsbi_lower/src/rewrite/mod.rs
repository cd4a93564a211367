//! Big-integer rewrite engine.
//!
//! One depth-first pass over a unit. Each node is handled in two phases:
//!
//! - **enter** (pre-order): literal, constructor call, binary, unary and
//!   compound-assignment rules. A rule replaces the node in place, so its id,
//!   its span and its parent stay the same.
//! - **exit** (post-order): member calls that received a big-integer
//!   argument. Runs after the arguments themselves were rewritten.
//!
//! Every rewritten node gets the `REWRITTEN` and `TAINTED` facts, and every
//! node the traversal has finished gets `SETTLED`. Nodes with either fact are
//! never entered again, so [`Rewriter::rewrite_subtree`] over a finished
//! subtree is a no-op, even where a binding became tainted after one of its
//! uses was visited. A rewrite inside a variable initializer also taints the
//! declared binding, so later uses of the name classify as big integers.

use jsbi_ir::{
    ensure_sufficient_stack, AssignOp, Name, NodeArena, NodeId, NodeKind, ScopeTree, Span,
    StringInterner,
};
use smallvec::SmallVec;

use crate::classify::{is_ctor_callee, Classifier};
use crate::config::{LibraryNames, LowerConfig};
use crate::facts::{FactFlags, FactStore};
use crate::ops::{binary_method, math_method, unary_method};

/// What the traversal does after a node's enter phase.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Flow {
    /// Visit the (possibly new) children, then run the exit phase.
    Descend,
    /// The node and everything below it is final.
    Settled,
}

/// Rewrite rules, for statistics and tracing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Rule {
    Literal,
    Constructor,
    Binary,
    Unary,
    CompoundAssign,
    MethodCall,
}

impl Rule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Rule::Literal => "literal",
            Rule::Constructor => "constructor",
            Rule::Binary => "binary",
            Rule::Unary => "unary",
            Rule::CompoundAssign => "compound-assign",
            Rule::MethodCall => "method-call",
        }
    }
}

/// Number of rewrites per rule for one unit.
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct RewriteStats {
    pub literals: usize,
    pub constructor_calls: usize,
    pub binary: usize,
    pub unary: usize,
    pub compound_assignments: usize,
    pub method_calls: usize,
}

impl RewriteStats {
    pub fn total(&self) -> usize {
        self.literals
            + self.constructor_calls
            + self.binary
            + self.unary
            + self.compound_assignments
            + self.method_calls
    }

    fn record(&mut self, rule: Rule) {
        let counter = match rule {
            Rule::Literal => &mut self.literals,
            Rule::Constructor => &mut self.constructor_calls,
            Rule::Binary => &mut self.binary,
            Rule::Unary => &mut self.unary,
            Rule::CompoundAssign => &mut self.compound_assignments,
            Rule::MethodCall => &mut self.method_calls,
        };
        *counter += 1;
    }
}

/// Rewrites one unit in place.
pub struct Rewriter<'a> {
    arena: &'a mut NodeArena,
    interner: &'a StringInterner,
    scopes: ScopeTree,
    facts: FactStore,
    names: LibraryNames,
    math_affordance: bool,
    /// Nodes currently being descended through, outermost first.
    ancestors: SmallVec<[NodeId; 16]>,
    stats: RewriteStats,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        arena: &'a mut NodeArena,
        interner: &'a StringInterner,
        scopes: ScopeTree,
        config: &LowerConfig,
    ) -> Self {
        let names = LibraryNames::intern(config, interner);
        Self::with_names(arena, interner, scopes, names, config.math_affordance)
    }

    /// Build from names the caller already interned.
    pub(crate) fn with_names(
        arena: &'a mut NodeArena,
        interner: &'a StringInterner,
        scopes: ScopeTree,
        names: LibraryNames,
        math_affordance: bool,
    ) -> Self {
        Rewriter {
            arena,
            interner,
            scopes,
            facts: FactStore::new(),
            names,
            math_affordance,
            ancestors: SmallVec::new(),
            stats: RewriteStats::default(),
        }
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn stats(&self) -> RewriteStats {
        self.stats
    }

    /// Release the per-unit state.
    pub fn finish(self) -> (FactStore, ScopeTree, RewriteStats) {
        (self.facts, self.scopes, self.stats)
    }

    /// Rewrite `id` and everything below it.
    ///
    /// Each node is visited once per rewriter: running this again over a
    /// subtree it already finished changes nothing. A use visited before its
    /// binding became tainted stays as it was.
    pub fn rewrite_subtree(&mut self, id: NodeId) {
        if !self.arena.contains(id) {
            return;
        }
        ensure_sufficient_stack(|| {
            if self.enter(id) == Flow::Descend {
                self.descend(id);
                self.exit(id);
            }
        });
        self.facts.mark_settled(id);
    }

    fn descend(&mut self, id: NodeId) {
        self.ancestors.push(id);
        for child in self.arena.children(id) {
            self.rewrite_subtree(child);
        }
        self.ancestors.pop();
    }

    fn classifier(&mut self) -> Classifier<'_> {
        Classifier {
            arena: &*self.arena,
            scopes: &self.scopes,
            facts: &mut self.facts,
            ctor: self.names.ctor,
        }
    }

    fn is_big_int(&mut self, id: NodeId) -> bool {
        self.classifier().is_big_int_value(id)
    }

    fn enter(&mut self, id: NodeId) -> Flow {
        if self
            .facts
            .flags(id)
            .intersects(FactFlags::REWRITTEN | FactFlags::SETTLED)
        {
            return Flow::Settled;
        }
        let kind = *self.arena.kind(id);
        match kind {
            NodeKind::BigInt(digits) => self.rewrite_literal(id, digits),
            NodeKind::Call { callee, args }
                if is_ctor_callee(&*self.arena, callee, self.names.ctor) =>
            {
                let property = match *self.arena.kind(callee) {
                    NodeKind::Member { property, .. } => property,
                    _ => self.names.factory,
                };
                let callee = self.library_member(property, self.arena.span(callee));
                self.arena.replace(id, NodeKind::Call { callee, args });
                self.settle(id, Rule::Constructor);
                Flow::Descend
            }
            NodeKind::Binary { op, left, right } => {
                match binary_method(op) {
                    Some(method) if self.is_big_int(left) || self.is_big_int(right) => {
                        self.replace_with_call(id, method, &[left, right]);
                        self.settle(id, Rule::Binary);
                    }
                    _ => {}
                }
                Flow::Descend
            }
            NodeKind::Unary { op, operand } => {
                match unary_method(op) {
                    Some(method) if self.is_big_int(operand) => {
                        self.replace_with_call(id, method, &[operand]);
                        self.settle(id, Rule::Unary);
                    }
                    _ => {}
                }
                Flow::Descend
            }
            NodeKind::Assign { op, target, value } => {
                match op.base_op().and_then(binary_method) {
                    Some(method) if self.is_big_int(value) => {
                        self.rewrite_compound(id, method, target, value)
                    }
                    _ => Flow::Descend,
                }
            }
            _ => Flow::Descend,
        }
    }

    /// `123n` → `Lib.BigInt("123")`.
    fn rewrite_literal(&mut self, id: NodeId, digits: Name) -> Flow {
        let span = self.arena.span(id);
        let callee = self.library_member(self.names.factory, span);
        let text = self.arena.alloc_kind(NodeKind::Str(digits), span);
        let args = self.arena.alloc_list(&[text]);
        self.arena.replace(id, NodeKind::Call { callee, args });
        self.settle(id, Rule::Literal);
        Flow::Settled
    }

    /// `x op= y` → `x = Lib.method(x, y)`, after `x` and `y` are settled.
    fn rewrite_compound(&mut self, id: NodeId, method: &str, target: NodeId, value: NodeId) -> Flow {
        self.descend(id);

        let (operand, pairs) = self.arena.deep_clone(target);
        for (original, copy) in pairs {
            self.scopes.record_alias(copy, original);
            self.facts.copy_facts(original, copy);
        }

        let span = self.arena.span(id);
        let callee = self.library_member(self.interner.intern(method), span);
        let args = self.arena.alloc_list(&[operand, value]);
        let call = self.arena.alloc_kind(NodeKind::Call { callee, args }, span);
        self.facts.mark_rewritten(call);
        self.facts.mark_tainted(call);

        self.arena.replace(
            id,
            NodeKind::Assign {
                op: AssignOp::Assign,
                target,
                value: call,
            },
        );
        self.settle(id, Rule::CompoundAssign);
        Flow::Settled
    }

    /// Member calls with a big-integer argument.
    ///
    /// `Math.f(..)` is redirected to the library; any other receiver is kept
    /// and the call is only marked, so its result counts as a big integer.
    fn exit(&mut self, id: NodeId) {
        if !self.math_affordance || self.facts.is_rewritten(id) {
            return;
        }
        let NodeKind::Call { callee, args } = *self.arena.kind(id) else {
            return;
        };
        let NodeKind::Member { object, property } = *self.arena.kind(callee) else {
            return;
        };
        if !self.classifier().any_big_int(args) {
            return;
        }

        let on_math = self.arena.contains(object)
            && *self.arena.kind(object) == NodeKind::Ident(self.names.math);
        if on_math {
            let method = math_method(self.interner.lookup(property));
            let property = self.interner.intern(method);
            self.arena.replace(object, NodeKind::Ident(self.names.library));
            self.arena.replace(callee, NodeKind::Member { object, property });
        }
        self.settle(id, Rule::MethodCall);
    }

    /// Replace `id` with `Lib.method(args..)`.
    fn replace_with_call(&mut self, id: NodeId, method: &str, args: &[NodeId]) {
        let span = self.arena.span(id);
        let callee = self.library_member(self.interner.intern(method), span);
        let args = self.arena.alloc_list(args);
        self.arena.replace(id, NodeKind::Call { callee, args });
    }

    /// Allocate `Lib.property`.
    fn library_member(&mut self, property: Name, span: Span) -> NodeId {
        let object = self.arena.alloc_kind(NodeKind::Ident(self.names.library), span);
        self.arena
            .alloc_kind(NodeKind::Member { object, property }, span)
    }

    fn settle(&mut self, id: NodeId, rule: Rule) {
        self.facts.mark_rewritten(id);
        self.facts.mark_tainted(id);
        self.taint_enclosing_declarator();
        self.stats.record(rule);
        tracing::trace!(node = ?id, rule = rule.as_str(), "rewrote");
    }

    /// Taint the binding of the nearest enclosing variable declarator.
    fn taint_enclosing_declarator(&mut self) {
        let declarator = self
            .ancestors
            .iter()
            .rev()
            .copied()
            .find(|&node| matches!(self.arena.kind(node), NodeKind::VarDeclarator { .. }));
        let Some(declarator) = declarator else {
            return;
        };
        self.facts.mark_tainted(declarator);
        if let Some(binding) = self.scopes.binding_declared_by(declarator) {
            if self.facts.taint_binding(binding) {
                tracing::trace!(?binding, "binding tainted");
            }
        }
    }
}

#[cfg(test)]
mod tests;
