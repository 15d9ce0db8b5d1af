//! Expression rendering.
//!
//! Every value block renders to a [`Fragment::Expression`] tagged with
//! the C precedence of its outermost operator. Operands are embedded with
//! [`value_code`], which parenthesizes them only when needed and renders
//! an empty socket as `0`.

use avrblocks_types::block::{ArithOp, BitOp, CompareOp, Expr, ExprKind, Quantity};

use crate::context::RenderContext;
use crate::error::CodegenResult;
use crate::fragment::{Fragment, Order};

/// Code for an empty value socket.
pub const DEFAULT_VALUE: &str = "0";

/// Render a value block.
pub fn emit_expr(expr: &Expr, ctx: &mut RenderContext) -> CodegenResult<Fragment> {
    ctx.enter()?;
    let fragment = emit_expr_kind(&expr.kind, ctx);
    ctx.exit();
    fragment
}

fn emit_expr_kind(kind: &ExprKind, ctx: &mut RenderContext) -> CodegenResult<Fragment> {
    match kind {
        // ── Literals ──────────────────────────────────────────────────────
        ExprKind::StringLit(text) => Ok(Fragment::expression(format!("\"{text}\""), Order::ATOMIC)),
        ExprKind::CharLit(c) => Ok(Fragment::expression(c.to_string(), Order::ATOMIC)),
        ExprKind::IntLit(n) => {
            let order = if *n < 0 { Order::UNARY } else { Order::ATOMIC };
            Ok(Fragment::expression(n.to_string(), order))
        }
        ExprKind::BoolLit(b) => Ok(Fragment::expression(if *b { "1" } else { "0" }, Order::ATOMIC)),

        // ── Sensor reads ─────────────────────────────────────────────────
        ExprKind::Scd41Reading(quantity) => {
            ctx.use_scd41();
            Ok(Fragment::expression(scd41_getter(*quantity), Order::ATOMIC))
        }

        // ── Operators ────────────────────────────────────────────────────
        ExprKind::Compare { left, op, right } => emit_binary(
            left.as_deref(),
            op.symbol(),
            compare_order(*op),
            right.as_deref(),
            ctx,
        ),
        ExprKind::Arithmetic { left, op, right } => emit_binary(
            left.as_deref(),
            op.symbol(),
            arith_order(*op),
            right.as_deref(),
            ctx,
        ),
        ExprKind::Bitwise { left, op, right } => emit_binary(
            left.as_deref(),
            op.symbol(),
            bit_order(*op),
            right.as_deref(),
            ctx,
        ),
    }
}

/// Render an optional value for embedding in `context`.
pub fn value_code(
    expr: Option<&Expr>,
    context: Order,
    ctx: &mut RenderContext,
) -> CodegenResult<String> {
    match expr {
        Some(expr) => emit_expr(expr, ctx)?.in_context(context),
        None => Ok(DEFAULT_VALUE.to_string()),
    }
}

fn emit_binary(
    left: Option<&Expr>,
    symbol: &str,
    order: Order,
    right: Option<&Expr>,
    ctx: &mut RenderContext,
) -> CodegenResult<Fragment> {
    let left = value_code(left, order, ctx)?;
    let right = value_code(right, order.right_operand(), ctx)?;
    Ok(Fragment::expression(format!("{left} {symbol} {right}"), order))
}

// ══════════════════════════════════════════════════════════════════════════════
// Tables
// ══════════════════════════════════════════════════════════════════════════════

fn scd41_getter(quantity: Quantity) -> &'static str {
    match quantity {
        Quantity::Co2 => "scd41_get_co2()",
        Quantity::Temperature => "scd41_get_temperature()",
        Quantity::Humidity => "scd41_get_humidity()",
    }
}

fn compare_order(op: CompareOp) -> Order {
    match op {
        CompareOp::Equal | CompareOp::NotEqual => Order::EQUALITY,
        CompareOp::GreaterEqual
        | CompareOp::Greater
        | CompareOp::SmallerEqual
        | CompareOp::Smaller => Order::RELATIONAL,
    }
}

fn arith_order(op: ArithOp) -> Order {
    match op {
        ArithOp::Add | ArithOp::Sub => Order::ADDITIVE,
        ArithOp::Mul | ArithOp::Div | ArithOp::Mod => Order::MULTIPLICATIVE,
    }
}

fn bit_order(op: BitOp) -> Order {
    match op {
        BitOp::ShiftLeft | BitOp::ShiftRight => Order::SHIFT,
        BitOp::And => Order::BIT_AND,
        BitOp::Xor => Order::BIT_XOR,
        BitOp::Or => Order::BIT_OR,
    }
}
