//! Rendered fragments and C operator precedence.

use crate::error::{CodegenError, CodegenResult};

/// C operator precedence of an expression fragment. Lower binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(pub u8);

impl Order {
    /// Literals, calls, parenthesized expressions.
    pub const ATOMIC: Self = Self(0);
    /// Prefix `-`, `!`, `~`.
    pub const UNARY: Self = Self(2);
    pub const MULTIPLICATIVE: Self = Self(3);
    pub const ADDITIVE: Self = Self(4);
    pub const SHIFT: Self = Self(5);
    pub const RELATIONAL: Self = Self(6);
    pub const EQUALITY: Self = Self(7);
    pub const BIT_AND: Self = Self(8);
    pub const BIT_XOR: Self = Self(9);
    pub const BIT_OR: Self = Self(10);
    pub const LOGICAL_AND: Self = Self(11);
    pub const LOGICAL_OR: Self = Self(12);
    pub const COMMA: Self = Self(15);
    /// Context that accepts any expression (call arguments, conditions).
    pub const NONE: Self = Self(99);

    /// The context for the right operand of a left-associative operator.
    ///
    /// An operand of the same precedence must be parenthesized there:
    /// `a - (b - c)`.
    pub fn right_operand(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Whether a fragment of this order needs parentheses in `context`.
    pub fn needs_parens_in(self, context: Order) -> bool {
        self > context
    }
}

/// The textual result of rendering one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// One or more complete lines, each ending in `\n`.
    Statement(String),
    /// An expression with the precedence of its outermost operator.
    Expression { code: String, order: Order },
}

impl Fragment {
    pub fn expression(code: impl Into<String>, order: Order) -> Self {
        Self::Expression {
            code: code.into(),
            order,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Statement(code) | Self::Expression { code, .. } => code,
        }
    }

    pub fn into_expression(self) -> CodegenResult<(String, Order)> {
        match self {
            Self::Expression { code, order } => Ok((code, order)),
            Self::Statement(code) => Err(CodegenError::Internal(format!(
                "expected an expression fragment, got statement `{}`",
                code.trim_end()
            ))),
        }
    }

    pub fn into_statement(self) -> CodegenResult<String> {
        match self {
            Self::Statement(code) => Ok(code),
            Self::Expression { code, .. } => Err(CodegenError::Internal(format!(
                "expected a statement fragment, got expression `{code}`"
            ))),
        }
    }

    /// Expression code ready to embed in `context`, parenthesized if needed.
    pub fn in_context(self, context: Order) -> CodegenResult<String> {
        let (code, order) = self.into_expression()?;
        if order.needs_parens_in(context) {
            Ok(format!("({code})"))
        } else {
            Ok(code)
        }
    }
}
