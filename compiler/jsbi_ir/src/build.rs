//! Programmatic tree construction.
//!
//! Used by tests and by callers that assemble trees without a parser. Every
//! node gets the builder's current span, [`Span::DUMMY`] unless set with
//! [`TreeBuilder::at`].

use crate::{
    AssignOp, BinaryOp, DeclKind, Name, NodeArena, NodeId, NodeKind, Span, StringInterner, UnaryOp,
};

/// Allocates nodes into an arena, interning text on the way.
pub struct TreeBuilder<'a> {
    arena: &'a mut NodeArena,
    interner: &'a StringInterner,
    span: Span,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(arena: &'a mut NodeArena, interner: &'a StringInterner) -> Self {
        TreeBuilder {
            arena,
            interner,
            span: Span::DUMMY,
        }
    }

    /// Use `span` for nodes allocated from now on.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.span = span;
        self
    }

    fn node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.alloc_kind(kind, self.span)
    }

    fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn ident(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.ident_named(name)
    }

    pub fn ident_named(&mut self, name: Name) -> NodeId {
        self.node(NodeKind::Ident(name))
    }

    /// Big-integer literal from its digits, without the `n` suffix.
    pub fn bigint(&mut self, digits: &str) -> NodeId {
        let digits = self.name(digits);
        self.node(NodeKind::BigInt(digits))
    }

    pub fn number(&mut self, text: &str) -> NodeId {
        let text = self.name(text);
        self.node(NodeKind::Number(text))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        let value = self.name(value);
        self.node(NodeKind::Str(value))
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.node(NodeKind::Bool(value))
    }

    pub fn null(&mut self) -> NodeId {
        self.node(NodeKind::Null)
    }

    pub fn member(&mut self, object: NodeId, property: &str) -> NodeId {
        let property = self.name(property);
        self.node(NodeKind::Member { object, property })
    }

    /// Dotted path such as `Math.random` or `console.log`.
    ///
    /// # Panics
    /// Panics if `segments` is empty.
    pub fn path(&mut self, segments: &[&str]) -> NodeId {
        let (first, rest) = segments
            .split_first()
            .unwrap_or_else(|| panic!("path needs at least one segment"));
        let mut node = self.ident(first);
        for segment in rest {
            node = self.member(node, segment);
        }
        node
    }

    pub fn call(&mut self, callee: NodeId, args: &[NodeId]) -> NodeId {
        let args = self.arena.alloc_list(args);
        self.node(NodeKind::Call { callee, args })
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::Binary { op, left, right })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.node(NodeKind::Unary { op, operand })
    }

    pub fn assign(&mut self, op: AssignOp, target: NodeId, value: NodeId) -> NodeId {
        self.node(NodeKind::Assign { op, target, value })
    }

    pub fn array(&mut self, elements: &[NodeId]) -> NodeId {
        let elements = self.arena.alloc_list(elements);
        self.node(NodeKind::Array { elements })
    }

    pub fn param(&mut self, name: &str) -> NodeId {
        let name = self.name(name);
        self.node(NodeKind::Param { name })
    }

    /// `(params) => body` where `body` is an expression or a block.
    pub fn arrow(&mut self, params: &[&str], body: NodeId) -> NodeId {
        let params = self.params(params);
        self.node(NodeKind::Arrow { params, body })
    }

    fn params(&mut self, names: &[&str]) -> crate::NodeRange {
        let ids: Vec<NodeId> = names.iter().map(|name| self.param(name)).collect();
        self.arena.alloc_list(&ids)
    }

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.node(NodeKind::ExprStmt { expr })
    }

    pub fn block(&mut self, stmts: &[NodeId]) -> NodeId {
        let body = self.arena.alloc_list(stmts);
        self.node(NodeKind::Block { body })
    }

    pub fn if_stmt(&mut self, test: NodeId, then_branch: NodeId, else_branch: Option<NodeId>) -> NodeId {
        self.node(NodeKind::If {
            test,
            then_branch,
            else_branch: else_branch.unwrap_or(NodeId::INVALID),
        })
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Return {
            value: value.unwrap_or(NodeId::INVALID),
        })
    }

    pub fn declarator(&mut self, name: &str, init: Option<NodeId>) -> NodeId {
        let name = self.name(name);
        self.node(NodeKind::VarDeclarator {
            name,
            init: init.unwrap_or(NodeId::INVALID),
        })
    }

    /// Declaration statement over already built declarators.
    pub fn declare(&mut self, kind: DeclKind, declarators: &[NodeId]) -> NodeId {
        let declarators = self.arena.alloc_list(declarators);
        self.node(NodeKind::VarDecl { kind, declarators })
    }

    /// `let name = init;`
    pub fn let_(&mut self, name: &str, init: NodeId) -> NodeId {
        let declarator = self.declarator(name, Some(init));
        self.declare(DeclKind::Let, &[declarator])
    }

    /// `const name = init;`
    pub fn const_(&mut self, name: &str, init: NodeId) -> NodeId {
        let declarator = self.declarator(name, Some(init));
        self.declare(DeclKind::Const, &[declarator])
    }

    /// `var name = init;`
    pub fn var(&mut self, name: &str, init: NodeId) -> NodeId {
        let declarator = self.declarator(name, Some(init));
        self.declare(DeclKind::Var, &[declarator])
    }

    pub fn function(&mut self, name: &str, params: &[&str], body: &[NodeId]) -> NodeId {
        let name = self.name(name);
        let params = self.params(params);
        let body = self.block(body);
        self.node(NodeKind::FunctionDecl { name, params, body })
    }

    pub fn import_default(&mut self, local: &str, source: &str) -> NodeId {
        let local = self.name(local);
        let source = self.name(source);
        self.node(NodeKind::ImportDefault { local, source })
    }

    pub fn program(&mut self, stmts: &[NodeId]) -> NodeId {
        let body = self.arena.alloc_list(stmts);
        self.node(NodeKind::Program { body })
    }
}
