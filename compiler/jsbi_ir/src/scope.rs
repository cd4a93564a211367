//! Lexical scopes and binding resolution.
//!
//! [`ScopeTree::build`] runs once per unit, before any rewriting:
//! - the program, every function/arrow and every block open a scope
//! - `let`/`const`/`function`/`import` declarations are hoisted to their
//!   block, `var` declarations to the nearest function or program scope
//! - parameters are declared in their function scope
//! - every `Ident` node in expression position is resolved against the
//!   scope chain; unresolved identifiers are globals
//!
//! Resolution is keyed by `NodeId`, so it stays valid while the tree is
//! rewritten in place. Identifiers cloned during rewriting are registered
//! with [`ScopeTree::record_alias`].

use rustc_hash::FxHashMap;

use crate::visitor::{walk_node, Visitor};
use crate::{DeclKind, Name, NodeArena, NodeId, NodeKind, NodeRange};

/// Index of a scope in a [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a binding in a [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BindingId(u32);

impl BindingId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Param,
    Function,
    Import,
}

impl From<DeclKind> for BindingKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Var => Self::Var,
            DeclKind::Let => Self::Let,
            DeclKind::Const => Self::Const,
        }
    }
}

/// A declared name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Binding {
    pub name: Name,
    pub kind: BindingKind,
    /// The declaring site: a `VarDeclarator`, `Param`, `FunctionDecl` or
    /// `ImportDefault` node. For redeclared `var`s, the first declarator.
    pub declared_by: NodeId,
    pub scope: ScopeId,
}

#[derive(Clone, Debug)]
struct Scope {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    names: FxHashMap<Name, BindingId>,
}

/// Scopes, bindings and identifier resolution for one unit.
#[derive(Clone, Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    /// `Ident` node → binding it refers to.
    references: FxHashMap<NodeId, BindingId>,
    /// Declaring node → binding it declares.
    declarations: FxHashMap<NodeId, BindingId>,
}

impl ScopeTree {
    /// Build the scope tree for the unit rooted at `root`.
    pub fn build(arena: &NodeArena, root: NodeId) -> Self {
        let mut builder = ScopeBuilder {
            tree: ScopeTree::default(),
            current: ScopeId(0),
        };
        builder.current = builder.tree.push_scope(None, ScopeKind::Program);
        if arena.contains(root) {
            builder.visit_node(root, arena);
        }
        builder.tree
    }

    /// The program scope.
    pub fn root_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Binding an identifier node resolves to, if any.
    pub fn binding_of(&self, node: NodeId) -> Option<BindingId> {
        self.references.get(&node).copied()
    }

    /// Binding declared by a declaring node, if any.
    pub fn binding_declared_by(&self, node: NodeId) -> Option<BindingId> {
        self.declarations.get(&node).copied()
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, binding)| (BindingId(to_u32(i)), binding))
    }

    pub fn scope_kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope.index()].kind
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Resolve `name` starting at `scope` and walking outwards.
    pub fn lookup(&self, scope: ScopeId, name: Name) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(&binding) = scope.names.get(&name) {
                return Some(binding);
            }
            current = scope.parent;
        }
        None
    }

    /// Give `copy` the same resolution as `original`.
    ///
    /// Used when a rewrite clones an identifier into a second position.
    pub fn record_alias(&mut self, copy: NodeId, original: NodeId) {
        if let Some(binding) = self.binding_of(original) {
            self.references.insert(copy, binding);
        }
    }

    fn push_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(to_u32(self.scopes.len()));
        self.scopes.push(Scope {
            parent,
            kind,
            names: FxHashMap::default(),
        });
        id
    }

    fn declare(&mut self, scope: ScopeId, name: Name, kind: BindingKind, declared_by: NodeId) {
        if let Some(&existing) = self.scopes[scope.index()].names.get(&name) {
            self.declarations.insert(declared_by, existing);
            return;
        }
        let id = BindingId(to_u32(self.bindings.len()));
        self.bindings.push(Binding {
            name,
            kind,
            declared_by,
            scope,
        });
        self.scopes[scope.index()].names.insert(name, id);
        self.declarations.insert(declared_by, id);
    }

    /// Nearest enclosing function or program scope.
    fn function_scope(&self, scope: ScopeId) -> ScopeId {
        let mut current = scope;
        loop {
            let entry = &self.scopes[current.index()];
            match (entry.kind, entry.parent) {
                (ScopeKind::Block, Some(parent)) => current = parent,
                _ => return current,
            }
        }
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("scope table exceeded u32::MAX entries"))
}

struct ScopeBuilder {
    tree: ScopeTree,
    current: ScopeId,
}

impl ScopeBuilder {
    fn with_scope(&mut self, kind: ScopeKind, f: impl FnOnce(&mut Self)) {
        let saved = self.current;
        self.current = self.tree.push_scope(Some(saved), kind);
        f(self);
        self.current = saved;
    }

    /// Declare the block-scoped names of a statement list.
    fn hoist_lexical(&mut self, arena: &NodeArena, stmts: NodeRange) {
        for &stmt in arena.list(stmts) {
            match *arena.kind(stmt) {
                NodeKind::VarDecl { kind, declarators } if kind.is_lexical() => {
                    self.declare_declarators(arena, declarators, kind);
                }
                NodeKind::FunctionDecl { name, .. } => {
                    self.tree
                        .declare(self.current, name, BindingKind::Function, stmt);
                }
                NodeKind::ImportDefault { local, .. } => {
                    self.tree
                        .declare(self.current, local, BindingKind::Import, stmt);
                }
                _ => {}
            }
        }
    }

    /// Declare every `var` reachable from a statement list without crossing
    /// a function boundary.
    fn hoist_vars(&mut self, arena: &NodeArena, stmts: NodeRange) {
        for &stmt in arena.list(stmts) {
            self.hoist_vars_in(arena, stmt);
        }
    }

    fn hoist_vars_in(&mut self, arena: &NodeArena, stmt: NodeId) {
        if !stmt.is_valid() {
            return;
        }
        match *arena.kind(stmt) {
            NodeKind::VarDecl {
                kind: DeclKind::Var,
                declarators,
            } => {
                let target = self.tree.function_scope(self.current);
                for &declarator in arena.list(declarators) {
                    if let NodeKind::VarDeclarator { name, .. } = *arena.kind(declarator) {
                        self.tree.declare(target, name, BindingKind::Var, declarator);
                    }
                }
            }
            NodeKind::Block { body } => self.hoist_vars(arena, body),
            NodeKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                self.hoist_vars_in(arena, then_branch);
                self.hoist_vars_in(arena, else_branch);
            }
            _ => {}
        }
    }

    fn declare_declarators(&mut self, arena: &NodeArena, declarators: NodeRange, kind: DeclKind) {
        for &declarator in arena.list(declarators) {
            if let NodeKind::VarDeclarator { name, .. } = *arena.kind(declarator) {
                self.tree
                    .declare(self.current, name, kind.into(), declarator);
            }
        }
    }

    fn visit_function(&mut self, arena: &NodeArena, params: NodeRange, body: NodeId) {
        self.with_scope(ScopeKind::Function, |this| {
            for &param in arena.list(params) {
                if let NodeKind::Param { name } = *arena.kind(param) {
                    this.tree
                        .declare(this.current, name, BindingKind::Param, param);
                }
            }
            if !body.is_valid() {
                return;
            }
            // A block body shares the function scope.
            if let NodeKind::Block { body: stmts } = *arena.kind(body) {
                this.hoist_vars(arena, stmts);
                this.hoist_lexical(arena, stmts);
                for &stmt in arena.list(stmts) {
                    this.visit_node(stmt, arena);
                }
            } else {
                this.visit_node(body, arena);
            }
        });
    }
}

impl<'ast> Visitor<'ast> for ScopeBuilder {
    fn visit_node(&mut self, id: NodeId, arena: &'ast NodeArena) {
        match *arena.kind(id) {
            NodeKind::Program { body } => {
                self.hoist_vars(arena, body);
                self.hoist_lexical(arena, body);
                walk_node(self, id, arena);
            }
            NodeKind::Block { body } => self.with_scope(ScopeKind::Block, |this| {
                this.hoist_lexical(arena, body);
                walk_node(this, id, arena);
            }),
            NodeKind::FunctionDecl { params, body, .. } | NodeKind::Arrow { params, body } => {
                self.visit_function(arena, params, body);
            }
            NodeKind::Ident(name) => {
                if let Some(binding) = self.tree.lookup(self.current, name) {
                    self.tree.references.insert(id, binding);
                }
            }
            _ => walk_node(self, id, arena),
        }
    }
}
