//! Operator and method-name tables.
//!
//! Pure static data: which source operators have a library counterpart and
//! what the counterpart is called.

use jsbi_ir::{BinaryOp, UnaryOp};

/// Name of the library's constructor-like factory.
pub const LIBRARY_FACTORY: &str = "BigInt";

/// Source operator token → library method.
///
/// `==`, `!=`, `>>>`, `&&`, `||`, `??`, `in` and `instanceof` have no entry
/// and are never rewritten.
pub const OPERATOR_TABLE: &[(&str, &str)] = &[
    ("+", "add"),
    ("-", "subtract"),
    ("*", "multiply"),
    ("/", "divide"),
    ("%", "remainder"),
    ("**", "exponentiate"),
    ("<<", "leftShift"),
    (">>", "signedRightShift"),
    ("&", "bitwiseAnd"),
    ("|", "bitwiseOr"),
    ("^", "bitwiseXor"),
    ("<", "lessThan"),
    (">", "greaterThan"),
    ("<=", "lessThanOrEqual"),
    (">=", "greaterThanOrEqual"),
    ("===", "equal"),
    ("!==", "notEqual"),
];

/// Library method for a binary operator, if the operator is in the table.
pub const fn binary_method(op: BinaryOp) -> Option<&'static str> {
    Some(match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "subtract",
        BinaryOp::Mul => "multiply",
        BinaryOp::Div => "divide",
        BinaryOp::Mod => "remainder",
        BinaryOp::Exp => "exponentiate",
        BinaryOp::Shl => "leftShift",
        BinaryOp::Shr => "signedRightShift",
        BinaryOp::BitAnd => "bitwiseAnd",
        BinaryOp::BitOr => "bitwiseOr",
        BinaryOp::BitXor => "bitwiseXor",
        BinaryOp::Lt => "lessThan",
        BinaryOp::Gt => "greaterThan",
        BinaryOp::LtEq => "lessThanOrEqual",
        BinaryOp::GtEq => "greaterThanOrEqual",
        BinaryOp::StrictEq => "equal",
        BinaryOp::StrictNotEq => "notEqual",
        BinaryOp::UShr
        | BinaryOp::In
        | BinaryOp::InstanceOf
        | BinaryOp::LooseEq
        | BinaryOp::LooseNotEq
        | BinaryOp::And
        | BinaryOp::Or
        | BinaryOp::Coalesce => return None,
    })
}

/// Library method for a source operator token.
pub fn method_for_token(token: &str) -> Option<&'static str> {
    OPERATOR_TABLE
        .iter()
        .find(|(symbol, _)| *symbol == token)
        .map(|&(_, method)| method)
}

/// Library method for a prefix operator: `-x` and `~x` only.
pub const fn unary_method(op: UnaryOp) -> Option<&'static str> {
    match op {
        UnaryOp::Neg => Some("unaryMinus"),
        UnaryOp::BitNot => Some("bitwiseNot"),
        UnaryOp::Plus | UnaryOp::Not | UnaryOp::TypeOf | UnaryOp::Void => None,
    }
}

/// Math namespace function → library method. Unlisted names pass through.
const MATH_TABLE: &[(&str, &str)] = &[("pow", "exponentiate")];

pub fn math_method(name: &str) -> &str {
    MATH_TABLE
        .iter()
        .find(|(from, _)| *from == name)
        .map_or(name, |&(_, to)| to)
}
