//! Statement rendering.

use avrblocks_types::block::{DelayUnit, Expr, SpiPin, Stmt, StmtKind};

use crate::context::RenderContext;
use crate::error::{CodegenError, CodegenResult};
use crate::expr::{emit_expr, value_code};
use crate::fragment::{Fragment, Order};

/// Render a chain of statements in order.
pub fn emit_stmts(stmts: &[Stmt], ctx: &mut RenderContext) -> CodegenResult<String> {
    let mut out = String::new();
    for stmt in stmts {
        out.push_str(&emit_stmt(stmt, ctx)?.into_statement()?);
    }
    Ok(out)
}

/// Render a single statement block. The fragment ends with a newline.
pub fn emit_stmt(stmt: &Stmt, ctx: &mut RenderContext) -> CodegenResult<Fragment> {
    ctx.enter()?;
    let code = emit_stmt_kind(&stmt.kind, ctx);
    ctx.exit();
    code.map(Fragment::Statement)
}

fn emit_stmt_kind(kind: &StmtKind, ctx: &mut RenderContext) -> CodegenResult<String> {
    match kind {
        // ── Air quality sensor ───────────────────────────────────────────
        StmtKind::Scd41MeasureSingle => {
            ctx.use_scd41();
            Ok("measure_single_shot(0x01);\n".to_string())
        }
        StmtKind::Scd41RetrieveValues => {
            ctx.use_scd41();
            Ok("read_measurement();\n".to_string())
        }

        // ── 7 segment display ────────────────────────────────────────────
        StmtKind::SevsegPrintNumber { number } => {
            ctx.use_sevseg();
            let number = argument(number, ctx)?;
            Ok(format!("sevseg_print_number({number});\n"))
        }
        StmtKind::SevsegPrintFloat { number } => {
            ctx.use_sevseg();
            let number = argument(number, ctx)?;
            Ok(format!("sevseg_print_float({number}, 2);\n"))
        }
        StmtKind::SevsegPrintDigit { number, digit } => {
            ctx.use_sevseg();
            let number = argument(number, ctx)?;
            let digit = argument(digit, ctx)?;
            Ok(format!("sevseg_print_digit({number}, {digit});\n"))
        }
        StmtKind::SevsegClear => {
            ctx.use_sevseg();
            Ok("sevseg_clear();\n".to_string())
        }

        // ── SPI ──────────────────────────────────────────────────────────
        StmtKind::SpiDevice { pin } => {
            ctx.use_spi();
            Ok(emit_spi_device(*pin))
        }

        // ── Timing ───────────────────────────────────────────────────────
        StmtKind::Delay { amount, unit } => {
            ctx.use_delay();
            emit_delay(*amount, *unit)
        }

        // ── Control ──────────────────────────────────────────────────────
        StmtKind::If { condition, body } => {
            let mut out = emit_branch("if", condition, body, ctx)?;
            out.push('\n');
            Ok(out)
        }
        StmtKind::When {
            first,
            first_body,
            second,
            second_body,
        } => {
            let mut out = emit_branch("if", first, first_body, ctx)?;
            out.push('\n');
            out.push_str(&emit_branch("else if", second, second_body, ctx)?);
            out.push('\n');
            Ok(out)
        }
        StmtKind::WhenElse {
            condition,
            then_body,
            else_body,
        } => {
            let mut out = emit_branch("if", condition, then_body, ctx)?;
            out.push_str("\nelse\n{\n");
            out.push_str(&emit_stmts(else_body, ctx)?);
            out.push_str("}\n");
            Ok(out)
        }

        // ── Value block in a chain ───────────────────────────────────────
        StmtKind::Expr(expr) => {
            let (code, _) = emit_expr(expr, ctx)?.into_expression()?;
            Ok(format!("{code};\n"))
        }
    }
}

/// A call argument. Arguments never need parentheses.
fn argument(expr: &Option<Box<Expr>>, ctx: &mut RenderContext) -> CodegenResult<String> {
    value_code(expr.as_deref(), Order::NONE, ctx)
}

/// `keyword (condition)` followed by a braced body, without a trailing newline.
fn emit_branch(
    keyword: &str,
    condition: &Option<Box<Expr>>,
    body: &[Stmt],
    ctx: &mut RenderContext,
) -> CodegenResult<String> {
    let condition = value_code(condition.as_deref(), Order::NONE, ctx)?;
    let body = emit_stmts(body, ctx)?;
    Ok(format!("{keyword} ({condition})\n{{\n{body}}}"))
}

fn emit_spi_device(pin: SpiPin) -> String {
    let id = pin.device_id();
    format!(
        "SpiDevice spi_device_{id} = {{ &DDRC, &PORTC, {} }};\nspi_master_device_init(&spi_device_{id});\n",
        pin.pin_name()
    )
}

fn emit_delay(amount: u64, unit: DelayUnit) -> CodegenResult<String> {
    match unit {
        DelayUnit::Micros => Ok(format!("_delay_us({amount});\n")),
        DelayUnit::Millis => Ok(format!("_delay_ms({amount});\n")),
        DelayUnit::Seconds => {
            let millis = amount.checked_mul(1000).ok_or_else(|| {
                CodegenError::LimitExceeded(format!("delay of {amount} s overflows milliseconds"))
            })?;
            Ok(format!("_delay_ms({millis});\n"))
        }
    }
}
