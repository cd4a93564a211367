//! JSBI IR - Syntax Tree Substrate
//!
//! This crate contains the data structures the big-integer lowering pass
//! operates on:
//! - Spans for source locations
//! - Names for interned identifiers and literal text
//! - A flat, mutable node arena addressed by `NodeId`
//! - Operator enums with their source symbols and precedence
//! - Lexical scopes and binding resolution
//! - A visitor, a tree builder and a source printer
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers, digits and strings → `Name(u32)`
//! - **Flatten Everything**: no `Box<Node>`, children are `NodeId(u32)` indices
//! - **Replace In Place**: rewriting a node overwrites its slot, so parents and
//!   side tables keyed by `NodeId` stay valid across rewrites
//!
//! Parsing is not part of this crate. Trees come from an upstream parser or
//! are assembled with [`TreeBuilder`].

mod arena;
pub mod ast;
mod build;
mod interner;
mod name;
mod node_id;
mod print;
pub mod scope;
mod span;
mod stack;
pub mod visitor;

pub use arena::NodeArena;
pub use ast::{AssignOp, BinaryOp, DeclKind, Node, NodeKind, UnaryOp};
pub use build::TreeBuilder;
pub use interner::StringInterner;
pub use name::Name;
pub use node_id::{NodeId, NodeRange};
pub use print::print_unit;
pub use scope::{Binding, BindingId, BindingKind, ScopeId, ScopeKind, ScopeTree};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
