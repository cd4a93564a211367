//! Binary, Unary and Assignment Operators
//!
//! Precedence numbers follow the convention "higher number = binds less
//! tightly". Level 0 is reserved for primary expressions (identifiers,
//! literals, calls, member access) and level 1 for unary operators.

/// Binary operators, including relational and logical ones.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,

    // Shift
    Shl,
    Shr,
    UShr,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,

    // Relational
    Lt,
    Gt,
    LtEq,
    GtEq,
    In,
    InstanceOf,

    // Equality
    LooseEq,
    LooseNotEq,
    StrictEq,
    StrictNotEq,

    // Logical
    And,
    Or,
    Coalesce,
}

impl BinaryOp {
    /// Every binary operator, in declaration order.
    pub const ALL: [BinaryOp; 25] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Exp,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::Lt,
        Self::Gt,
        Self::LtEq,
        Self::GtEq,
        Self::In,
        Self::InstanceOf,
        Self::LooseEq,
        Self::LooseNotEq,
        Self::StrictEq,
        Self::StrictNotEq,
        Self::And,
        Self::Or,
        Self::Coalesce,
    ];

    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Exp => "**",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::In => "in",
            Self::InstanceOf => "instanceof",
            Self::LooseEq => "==",
            Self::LooseNotEq => "!=",
            Self::StrictEq => "===",
            Self::StrictNotEq => "!==",
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
        }
    }

    /// Parse a source-level symbol.
    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        Self::ALL.into_iter().find(|op| op.as_symbol() == symbol)
    }

    /// Returns the precedence level of this operator.
    ///
    /// - 2: `**`
    /// - 3: `*` `/` `%`
    /// - 4: `+` `-`
    /// - 5: `<<` `>>` `>>>`
    /// - 6: `<` `>` `<=` `>=` `in` `instanceof`
    /// - 7: `==` `!=` `===` `!==`
    /// - 8: `&`
    /// - 9: `^`
    /// - 10: `|`
    /// - 11: `&&`
    /// - 12: `||`
    /// - 13: `??`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Exp => 2,
            Self::Mul | Self::Div | Self::Mod => 3,
            Self::Add | Self::Sub => 4,
            Self::Shl | Self::Shr | Self::UShr => 5,
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq | Self::In | Self::InstanceOf => 6,
            Self::LooseEq | Self::LooseNotEq | Self::StrictEq | Self::StrictNotEq => 7,
            Self::BitAnd => 8,
            Self::BitXor => 9,
            Self::BitOr => 10,
            Self::And => 11,
            Self::Or => 12,
            Self::Coalesce => 13,
        }
    }

    /// `**` is the only right-associative binary operator.
    #[inline]
    pub const fn is_right_assoc(self) -> bool {
        matches!(self, Self::Exp)
    }
}

/// Unary (prefix) operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
}

impl UnaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::TypeOf => "typeof",
            Self::Void => "void",
        }
    }

    /// Keyword operators need a space before their operand.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        matches!(self, Self::TypeOf | Self::Void)
    }
}

/// Assignment operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Coalesce,
}

impl AssignOp {
    /// Every assignment operator, in declaration order.
    pub const ALL: [AssignOp; 16] = [
        Self::Assign,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::Exp,
        Self::Shl,
        Self::Shr,
        Self::UShr,
        Self::BitAnd,
        Self::BitOr,
        Self::BitXor,
        Self::And,
        Self::Or,
        Self::Coalesce,
    ];

    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::Mod => "%=",
            Self::Exp => "**=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
            Self::UShr => ">>>=",
            Self::BitAnd => "&=",
            Self::BitOr => "|=",
            Self::BitXor => "^=",
            Self::And => "&&=",
            Self::Or => "||=",
            Self::Coalesce => "??=",
        }
    }

    /// The binary operator a compound assignment applies: the assignment
    /// token with its trailing `=` stripped. `None` for plain `=`.
    pub const fn base_op(self) -> Option<BinaryOp> {
        match self {
            Self::Assign => None,
            Self::Add => Some(BinaryOp::Add),
            Self::Sub => Some(BinaryOp::Sub),
            Self::Mul => Some(BinaryOp::Mul),
            Self::Div => Some(BinaryOp::Div),
            Self::Mod => Some(BinaryOp::Mod),
            Self::Exp => Some(BinaryOp::Exp),
            Self::Shl => Some(BinaryOp::Shl),
            Self::Shr => Some(BinaryOp::Shr),
            Self::UShr => Some(BinaryOp::UShr),
            Self::BitAnd => Some(BinaryOp::BitAnd),
            Self::BitOr => Some(BinaryOp::BitOr),
            Self::BitXor => Some(BinaryOp::BitXor),
            Self::And => Some(BinaryOp::And),
            Self::Or => Some(BinaryOp::Or),
            Self::Coalesce => Some(BinaryOp::Coalesce),
        }
    }
}
