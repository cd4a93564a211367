//! Syntax tree node kinds.
//!
//! The tree covers the script subset the lowering pass needs to see:
//! declarations, blocks, conditionals, functions and the expression forms
//! that can produce or consume big-integer values. Optional children use the
//! [`NodeId::INVALID`] sentinel rather than `Option<NodeId>`.

mod operators;

pub use operators::{AssignOp, BinaryOp, UnaryOp};

use crate::{Name, NodeId, NodeRange, Span};

/// Declaration keyword of a variable declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub const fn as_keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }

    /// `let` and `const` are block scoped, `var` is function scoped.
    #[inline]
    pub const fn is_lexical(self) -> bool {
        !matches!(self, Self::Var)
    }
}

/// Node kind with its children.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // Statements
    /// Root of one compilation unit.
    Program { body: NodeRange },
    /// `import local from "source";`
    ImportDefault { local: Name, source: Name },
    /// `let a = 1, b;` with `VarDeclarator` children.
    VarDecl { kind: DeclKind, declarators: NodeRange },
    /// One `name = init` entry of a declaration. `init` may be INVALID.
    VarDeclarator { name: Name, init: NodeId },
    /// `function name(params) { body }`; `body` is a `Block`.
    FunctionDecl {
        name: Name,
        params: NodeRange,
        body: NodeId,
    },
    /// A simple function parameter.
    Param { name: Name },
    /// `return value;` where `value` may be INVALID.
    Return { value: NodeId },
    /// `if (test) then_branch else else_branch`; `else_branch` may be INVALID.
    If {
        test: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    Block { body: NodeRange },
    ExprStmt { expr: NodeId },

    // Expressions
    /// Big-integer literal; the name holds the digits without the `n` suffix.
    BigInt(Name),
    /// Numeric literal, kept as its source text.
    Number(Name),
    Str(Name),
    Bool(bool),
    Null,
    Ident(Name),
    /// Non-computed member access `object.property`.
    Member { object: NodeId, property: Name },
    Call { callee: NodeId, args: NodeRange },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Unary { op: UnaryOp, operand: NodeId },
    Assign {
        op: AssignOp,
        target: NodeId,
        value: NodeId,
    },
    Array { elements: NodeRange },
    /// `(params) => body`; `body` is a `Block` or an expression.
    Arrow { params: NodeRange, body: NodeId },
}

impl NodeKind {
    /// Short kind label for diagnostics and tracing.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Program { .. } => "program",
            Self::ImportDefault { .. } => "import",
            Self::VarDecl { .. } => "variable declaration",
            Self::VarDeclarator { .. } => "variable declarator",
            Self::FunctionDecl { .. } => "function declaration",
            Self::Param { .. } => "parameter",
            Self::Return { .. } => "return",
            Self::If { .. } => "if",
            Self::Block { .. } => "block",
            Self::ExprStmt { .. } => "expression statement",
            Self::BigInt(_) => "bigint literal",
            Self::Number(_) => "number literal",
            Self::Str(_) => "string literal",
            Self::Bool(_) => "boolean literal",
            Self::Null => "null",
            Self::Ident(_) => "identifier",
            Self::Member { .. } => "member access",
            Self::Call { .. } => "call",
            Self::Binary { .. } => "binary operation",
            Self::Unary { .. } => "unary operation",
            Self::Assign { .. } => "assignment",
            Self::Array { .. } => "array",
            Self::Arrow { .. } => "arrow function",
        }
    }

    /// Whether this kind is valid in expression position.
    pub const fn is_expression(&self) -> bool {
        matches!(
            self,
            Self::BigInt(_)
                | Self::Number(_)
                | Self::Str(_)
                | Self::Bool(_)
                | Self::Null
                | Self::Ident(_)
                | Self::Member { .. }
                | Self::Call { .. }
                | Self::Binary { .. }
                | Self::Unary { .. }
                | Self::Assign { .. }
                | Self::Array { .. }
                | Self::Arrow { .. }
        )
    }
}

/// A node as stored by the arena: kind plus source span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    #[inline]
    pub const fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }
}
