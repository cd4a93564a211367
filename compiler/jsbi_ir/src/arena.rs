//! Node arena with in-place replacement.
//!
//! [`NodeArena`] uses struct-of-arrays layout (parallel `kinds` and `spans`
//! arrays indexed by [`NodeId`]) plus one flat `lists` array addressed by
//! [`NodeRange`]. Nodes are never freed; a replaced node's old children stay
//! allocated but unreachable.

use smallvec::SmallVec;

use crate::ast::{Node, NodeKind};
use crate::{ensure_sufficient_stack, NodeId, NodeRange, Span};

/// Children of one node, in source order.
pub type Children = SmallVec<[NodeId; 4]>;

fn to_u32(value: usize, what: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("too many {what}: {value} exceeds u32::MAX"))
}

fn to_u16(value: usize, what: &str) -> u16 {
    u16::try_from(value).unwrap_or_else(|_| panic!("{what} too long: {value} exceeds u16::MAX"))
}

/// Arena owning every node of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    /// Node kinds (parallel with spans).
    kinds: Vec<NodeKind>,
    /// Source spans (parallel with kinds).
    spans: Vec<Span>,
    /// Flattened child lists for ranges (bodies, args, elements, params).
    lists: Vec<NodeId>,
}

impl NodeArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            kinds: Vec::with_capacity(nodes),
            spans: Vec::with_capacity(nodes),
            lists: Vec::with_capacity(nodes / 2),
        }
    }

    /// Allocate a node, returning its ID.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.alloc_kind(node.kind, node.span)
    }

    /// Allocate a node from its parts.
    pub fn alloc_kind(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(to_u32(self.kinds.len(), "nodes"));
        self.kinds.push(kind);
        self.spans.push(span);
        id
    }

    /// Get the kind of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    /// Get the source span of a node.
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    /// Reconstruct a full `Node`.
    pub fn get(&self, id: NodeId) -> Node {
        Node::new(self.kinds[id.index()], self.spans[id.index()])
    }

    /// Whether `id` addresses a node of this arena.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_valid() && id.index() < self.kinds.len()
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Overwrite the kind of `id`, keeping its identity and span.
    ///
    /// Returns the previous kind.
    pub fn replace(&mut self, id: NodeId, kind: NodeKind) -> NodeKind {
        std::mem::replace(&mut self.kinds[id.index()], kind)
    }

    /// Allocate a contiguous list of node IDs.
    pub fn alloc_list(&mut self, ids: &[NodeId]) -> NodeRange {
        if ids.is_empty() {
            return NodeRange::EMPTY;
        }
        let start = to_u32(self.lists.len(), "list entries");
        self.lists.extend_from_slice(ids);
        NodeRange::new(start, to_u16(ids.len(), "node list"))
    }

    /// Get node IDs from a range.
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.lists[start..start + range.len()]
    }

    /// Overwrite one entry of a list.
    pub fn set_list_item(&mut self, range: NodeRange, index: usize, id: NodeId) {
        assert!(index < range.len(), "list index {index} out of {range:?}");
        self.lists[range.start as usize + index] = id;
    }

    /// Allocate a new list holding `first` followed by the items of `range`.
    ///
    /// The old range is left untouched, so other holders of it are unaffected.
    pub fn prepend_to_list(&mut self, range: NodeRange, first: NodeId) -> NodeRange {
        let start = to_u32(self.lists.len(), "list entries");
        self.lists.push(first);
        if !range.is_empty() {
            let old = range.start as usize;
            self.lists.extend_from_within(old..old + range.len());
        }
        NodeRange::new(start, to_u16(range.len() + 1, "node list"))
    }

    /// Children of a node in source (and evaluation) order.
    pub fn children(&self, id: NodeId) -> Children {
        let kind = *self.kind(id);
        let mut out = Children::new();
        let mut push = |child: NodeId| {
            if child.is_valid() {
                out.push(child);
            }
        };
        match kind {
            NodeKind::Program { body: list }
            | NodeKind::Block { body: list }
            | NodeKind::VarDecl {
                declarators: list, ..
            }
            | NodeKind::Array { elements: list } => {
                self.list(list).iter().copied().for_each(&mut push);
            }
            NodeKind::VarDeclarator { init, .. } => push(init),
            NodeKind::FunctionDecl { params, body, .. } | NodeKind::Arrow { params, body } => {
                self.list(params).iter().copied().for_each(&mut push);
                push(body);
            }
            NodeKind::Return { value } => push(value),
            NodeKind::If {
                test,
                then_branch,
                else_branch,
            } => {
                push(test);
                push(then_branch);
                push(else_branch);
            }
            NodeKind::ExprStmt { expr } => push(expr),
            NodeKind::Member { object, .. } => push(object),
            NodeKind::Call { callee, args } => {
                push(callee);
                self.list(args).iter().copied().for_each(&mut push);
            }
            NodeKind::Binary { left, right, .. } => {
                push(left);
                push(right);
            }
            NodeKind::Unary { operand, .. } => push(operand),
            NodeKind::Assign { target, value, .. } => {
                push(target);
                push(value);
            }
            NodeKind::ImportDefault { .. }
            | NodeKind::Param { .. }
            | NodeKind::BigInt(_)
            | NodeKind::Number(_)
            | NodeKind::Str(_)
            | NodeKind::Bool(_)
            | NodeKind::Null
            | NodeKind::Ident(_) => {}
        }
        out
    }

    /// Copy the subtree rooted at `id` into fresh nodes.
    ///
    /// Returns the new root and every `(original, copy)` pair, so callers can
    /// carry side-table entries (binding resolution, facts) over to the copy.
    pub fn deep_clone(&mut self, id: NodeId) -> (NodeId, Vec<(NodeId, NodeId)>) {
        let mut pairs = Vec::new();
        let root = self.clone_node(id, &mut pairs);
        (root, pairs)
    }

    fn clone_node(&mut self, id: NodeId, pairs: &mut Vec<(NodeId, NodeId)>) -> NodeId {
        if !id.is_valid() {
            return NodeId::INVALID;
        }
        ensure_sufficient_stack(|| {
            let span = self.span(id);
            let original = *self.kind(id);
            let kind = match original {
                NodeKind::Program { body } => NodeKind::Program {
                    body: self.clone_list(body, pairs),
                },
                NodeKind::Block { body } => NodeKind::Block {
                    body: self.clone_list(body, pairs),
                },
                NodeKind::VarDecl { kind, declarators } => NodeKind::VarDecl {
                    kind,
                    declarators: self.clone_list(declarators, pairs),
                },
                NodeKind::VarDeclarator { name, init } => NodeKind::VarDeclarator {
                    name,
                    init: self.clone_node(init, pairs),
                },
                NodeKind::FunctionDecl { name, params, body } => NodeKind::FunctionDecl {
                    name,
                    params: self.clone_list(params, pairs),
                    body: self.clone_node(body, pairs),
                },
                NodeKind::Return { value } => NodeKind::Return {
                    value: self.clone_node(value, pairs),
                },
                NodeKind::If {
                    test,
                    then_branch,
                    else_branch,
                } => NodeKind::If {
                    test: self.clone_node(test, pairs),
                    then_branch: self.clone_node(then_branch, pairs),
                    else_branch: self.clone_node(else_branch, pairs),
                },
                NodeKind::ExprStmt { expr } => NodeKind::ExprStmt {
                    expr: self.clone_node(expr, pairs),
                },
                NodeKind::Member { object, property } => NodeKind::Member {
                    object: self.clone_node(object, pairs),
                    property,
                },
                NodeKind::Call { callee, args } => NodeKind::Call {
                    callee: self.clone_node(callee, pairs),
                    args: self.clone_list(args, pairs),
                },
                NodeKind::Binary { op, left, right } => NodeKind::Binary {
                    op,
                    left: self.clone_node(left, pairs),
                    right: self.clone_node(right, pairs),
                },
                NodeKind::Unary { op, operand } => NodeKind::Unary {
                    op,
                    operand: self.clone_node(operand, pairs),
                },
                NodeKind::Assign { op, target, value } => NodeKind::Assign {
                    op,
                    target: self.clone_node(target, pairs),
                    value: self.clone_node(value, pairs),
                },
                NodeKind::Array { elements } => NodeKind::Array {
                    elements: self.clone_list(elements, pairs),
                },
                NodeKind::Arrow { params, body } => NodeKind::Arrow {
                    params: self.clone_list(params, pairs),
                    body: self.clone_node(body, pairs),
                },
                leaf @ (NodeKind::ImportDefault { .. }
                | NodeKind::Param { .. }
                | NodeKind::BigInt(_)
                | NodeKind::Number(_)
                | NodeKind::Str(_)
                | NodeKind::Bool(_)
                | NodeKind::Null
                | NodeKind::Ident(_)) => leaf,
            };
            let copy = self.alloc_kind(kind, span);
            pairs.push((id, copy));
            copy
        })
    }

    fn clone_list(&mut self, range: NodeRange, pairs: &mut Vec<(NodeId, NodeId)>) -> NodeRange {
        let items: SmallVec<[NodeId; 8]> = self.list(range).iter().copied().collect();
        let copies: SmallVec<[NodeId; 8]> = items
            .into_iter()
            .map(|item| self.clone_node(item, pairs))
            .collect();
        self.alloc_list(&copies)
    }
}
