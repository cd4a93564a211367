//! Source printer.
//!
//! Renders a unit back to script text in one fixed layout: 4-space
//! indentation, one statement per line, semicolons, double-quoted strings.
//! Parentheses are inserted from operator precedence alone, so a tree
//! printed, reparsed and printed again yields the same text.

use crate::{ensure_sufficient_stack, NodeArena, NodeId, NodeKind, NodeRange, StringInterner};

/// Level of primary expressions: literals, identifiers, calls, members.
const PRIMARY: u8 = 0;
/// Level of prefix unary operators.
const UNARY: u8 = 1;
/// Level of assignments and arrow functions; loosest we print.
const ASSIGN: u8 = 16;

/// Print the unit rooted at `root`.
pub fn print_unit(arena: &NodeArena, root: NodeId, interner: &StringInterner) -> String {
    let mut printer = Printer {
        arena,
        interner,
        out: Emitter::default(),
        indent: 0,
    };
    printer.stmt(root);
    printer.out.finish()
}

/// In-memory text sink.
#[derive(Default)]
struct Emitter {
    buffer: String,
}

impl Emitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level * 4 {
            self.buffer.push(' ');
        }
    }

    /// Ensure the output ends with exactly one newline.
    fn finish(mut self) -> String {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer
    }
}

struct Printer<'a> {
    arena: &'a NodeArena,
    interner: &'a StringInterner,
    out: Emitter,
    indent: usize,
}

impl Printer<'_> {
    fn text(&self, name: crate::Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn stmt_list(&mut self, list: NodeRange) {
        for &stmt in self.arena.list(list) {
            self.out.emit_indent(self.indent);
            self.stmt(stmt);
            self.out.emit_newline();
        }
    }

    fn stmt(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| self.stmt_inner(id));
    }

    fn stmt_inner(&mut self, id: NodeId) {
        match *self.arena.kind(id) {
            NodeKind::Program { body } => self.stmt_list(body),
            NodeKind::ImportDefault { local, source } => {
                self.out.emit("import ");
                self.out.emit(self.text(local));
                self.out.emit(" from ");
                self.string(self.text(source));
                self.out.emit_char(';');
            }
            NodeKind::VarDecl { kind, declarators } => {
                self.out.emit(kind.as_keyword());
                self.out.emit_char(' ');
                self.comma_list(declarators, |p, declarator| p.stmt(declarator));
                self.out.emit_char(';');
            }
            NodeKind::VarDeclarator { name, init } => {
                self.out.emit(self.text(name));
                if init.is_valid() {
                    self.out.emit(" = ");
                    self.expr(init, ASSIGN);
                }
            }
            NodeKind::FunctionDecl { name, params, body } => {
                self.out.emit("function ");
                self.out.emit(self.text(name));
                self.params(params);
                self.out.emit_char(' ');
                self.stmt(body);
            }
            NodeKind::Param { name } => self.out.emit(self.text(name)),
            NodeKind::Return { value } => {
                self.out.emit("return");
                if value.is_valid() {
                    self.out.emit_char(' ');
                    self.expr(value, ASSIGN);
                }
                self.out.emit_char(';');
            }
            NodeKind::If {
                test,
                then_branch,
                else_branch,
            } => {
                self.out.emit("if (");
                self.expr(test, ASSIGN);
                self.out.emit(") ");
                self.stmt(then_branch);
                if else_branch.is_valid() {
                    self.out.emit(" else ");
                    self.stmt(else_branch);
                }
            }
            NodeKind::Block { body } => {
                if body.is_empty() {
                    self.out.emit("{}");
                    return;
                }
                self.out.emit_char('{');
                self.out.emit_newline();
                self.indent += 1;
                self.stmt_list(body);
                self.indent -= 1;
                self.out.emit_indent(self.indent);
                self.out.emit_char('}');
            }
            NodeKind::ExprStmt { expr } => {
                self.expr(expr, ASSIGN);
                self.out.emit_char(';');
            }
            _ => self.expr(id, ASSIGN),
        }
    }

    fn params(&mut self, params: NodeRange) {
        self.out.emit_char('(');
        self.comma_list(params, |p, param| p.stmt(param));
        self.out.emit_char(')');
    }

    fn comma_list(&mut self, list: NodeRange, mut each: impl FnMut(&mut Self, NodeId)) {
        for (i, &item) in self.arena.list(list).iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            each(self, item);
        }
    }

    /// Print an expression, parenthesized if it binds looser than `max`.
    fn expr(&mut self, id: NodeId, max: u8) {
        let needs_parens = level(self.arena.kind(id)) > max;
        if needs_parens {
            self.out.emit_char('(');
        }
        ensure_sufficient_stack(|| self.expr_inner(id));
        if needs_parens {
            self.out.emit_char(')');
        }
    }

    fn expr_inner(&mut self, id: NodeId) {
        match *self.arena.kind(id) {
            NodeKind::BigInt(digits) => {
                self.out.emit(self.text(digits));
                self.out.emit_char('n');
            }
            NodeKind::Number(text) => self.out.emit(self.text(text)),
            NodeKind::Str(value) => self.string(self.text(value)),
            NodeKind::Bool(value) => self.out.emit(if value { "true" } else { "false" }),
            NodeKind::Null => self.out.emit("null"),
            NodeKind::Ident(name) => self.out.emit(self.text(name)),
            NodeKind::Member { object, property } => {
                self.expr(object, PRIMARY);
                self.out.emit_char('.');
                self.out.emit(self.text(property));
            }
            NodeKind::Call { callee, args } => {
                self.expr(callee, PRIMARY);
                self.out.emit_char('(');
                self.comma_list(args, |p, arg| p.expr(arg, ASSIGN));
                self.out.emit_char(')');
            }
            NodeKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let (left_max, right_max) = if op.is_right_assoc() {
                    (PRIMARY, prec)
                } else {
                    (prec, prec - 1)
                };
                self.expr(left, left_max);
                self.out.emit_char(' ');
                self.out.emit(op.as_symbol());
                self.out.emit_char(' ');
                self.expr(right, right_max);
            }
            NodeKind::Unary { op, operand } => {
                self.out.emit(op.as_symbol());
                let operand_kind = self.arena.kind(operand);
                let spaced = op.is_keyword()
                    || matches!(
                        *operand_kind,
                        NodeKind::Unary { op: inner, .. } if inner.as_symbol() == op.as_symbol()
                    );
                if spaced {
                    self.out.emit_char(' ');
                }
                self.expr(operand, UNARY);
            }
            NodeKind::Assign { op, target, value } => {
                self.expr(target, PRIMARY);
                self.out.emit_char(' ');
                self.out.emit(op.as_symbol());
                self.out.emit_char(' ');
                self.expr(value, ASSIGN);
            }
            NodeKind::Array { elements } => {
                self.out.emit_char('[');
                self.comma_list(elements, |p, element| p.expr(element, ASSIGN));
                self.out.emit_char(']');
            }
            NodeKind::Arrow { params, body } => {
                self.params(params);
                self.out.emit(" => ");
                if matches!(self.arena.kind(body), NodeKind::Block { .. }) {
                    self.stmt(body);
                } else {
                    self.expr(body, ASSIGN);
                }
            }
            NodeKind::Program { .. }
            | NodeKind::ImportDefault { .. }
            | NodeKind::VarDecl { .. }
            | NodeKind::VarDeclarator { .. }
            | NodeKind::FunctionDecl { .. }
            | NodeKind::Param { .. }
            | NodeKind::Return { .. }
            | NodeKind::If { .. }
            | NodeKind::Block { .. }
            | NodeKind::ExprStmt { .. } => self.stmt_inner(id),
        }
    }

    fn string(&mut self, value: &str) {
        self.out.emit_char('"');
        for c in value.chars() {
            match c {
                '"' => self.out.emit("\\\""),
                '\\' => self.out.emit("\\\\"),
                '\n' => self.out.emit("\\n"),
                '\r' => self.out.emit("\\r"),
                '\t' => self.out.emit("\\t"),
                c if c.is_control() => self.out.emit(&format!("\\u{:04x}", u32::from(c))),
                c => self.out.emit_char(c),
            }
        }
        self.out.emit_char('"');
    }
}

/// Binding level of an expression node; statements never need parens.
fn level(kind: &NodeKind) -> u8 {
    match kind {
        NodeKind::Binary { op, .. } => op.precedence(),
        NodeKind::Unary { .. } => UNARY,
        NodeKind::Assign { .. } | NodeKind::Arrow { .. } => ASSIGN,
        _ => PRIMARY,
    }
}
