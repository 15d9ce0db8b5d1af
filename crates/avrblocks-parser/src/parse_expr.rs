//! Value-block lowering.

use crate::parser::Parser;
use avrblocks_types::block::{ArithOp, BitOp, CompareOp, Expr, ExprKind, Quantity};
use avrblocks_types::registry::{InputKind, Output};
use avrblocks_types::{BlockShape, BlockType, ErrorCode, SerializedBlock};

impl<'ws> Parser<'ws> {
    /// Lower the block plugged into a value socket.
    ///
    /// Returns `None` for an empty or disabled socket, which the emitter
    /// renders as `0`, and for a child that failed to lower (the error is
    /// already recorded).
    pub(crate) fn parse_value(
        &mut self,
        block: &SerializedBlock,
        shape: &BlockShape,
        socket: &str,
    ) -> Option<Box<Expr>> {
        let child = block.input(socket)?;
        if !child.is_enabled() {
            return None;
        }
        let (child_type, child_shape) = self.resolve(child)?;

        if !child_shape.is_value() {
            self.error_with_hint(
                child,
                ErrorCode::MISPLACED_BLOCK,
                format!(
                    "'{child_type}' is a statement block and cannot fill socket '{socket}' of '{}'",
                    block.block_type
                ),
                "move the block into a statement chain",
            );
            return None;
        }

        let check = match shape.input(socket).map(|row| row.kind) {
            Some(InputKind::Value { check }) => check,
            _ => None,
        };
        if let (Some(expected), Output::Typed(actual)) = (check, child_shape.output) {
            if expected != actual {
                self.error_at(
                    child,
                    ErrorCode::SOCKET_TYPE_MISMATCH,
                    format!(
                        "socket '{socket}' of '{}' expects {}, '{child_type}' produces {}",
                        block.block_type,
                        expected.name(),
                        actual.name()
                    ),
                );
                return None;
            }
        }

        if !self.enter(child) {
            return None;
        }
        let expr = self.parse_expr(child, child_type, &child_shape);
        self.exit();
        expr.map(Box::new)
    }

    /// Lower a value block.
    pub(crate) fn parse_expr(
        &mut self,
        block: &SerializedBlock,
        block_type: BlockType,
        shape: &BlockShape,
    ) -> Option<Expr> {
        use BlockType as T;

        let kind = match block_type {
            T::InputString => ExprKind::StringLit(self.text_field(block, "value")?),
            T::InputChar => {
                let value = self.integer_field(block, shape, "value")?;
                ExprKind::CharLit(u8::try_from(value).ok()?)
            }
            T::InputInt => {
                let value = self.integer_field(block, shape, "value")?;
                ExprKind::IntLit(i16::try_from(value).ok()?)
            }
            T::InputBool => {
                let value = self.dropdown_field(
                    block,
                    shape,
                    "value",
                    ErrorCode::INVALID_FIELD_OPTION,
                    |tag| match tag {
                        "value_true" => Some(true),
                        "value_false" => Some(false),
                        _ => None,
                    },
                )?;
                ExprKind::BoolLit(value)
            }

            T::Scd41GetValueCo2 => ExprKind::Scd41Reading(Quantity::Co2),
            T::Scd41GetValueTemp => ExprKind::Scd41Reading(Quantity::Temperature),
            T::Scd41GetValueRh => ExprKind::Scd41Reading(Quantity::Humidity),
            T::Scd41GetValue => {
                let quantity = self.dropdown_field(
                    block,
                    shape,
                    "value",
                    ErrorCode::INVALID_FIELD_OPTION,
                    Quantity::from_tag,
                )?;
                ExprKind::Scd41Reading(quantity)
            }

            T::LogicMath => {
                let left = self.parse_value(block, shape, "value1");
                let right = self.parse_value(block, shape, "value2");
                let op = self.dropdown_field(
                    block,
                    shape,
                    "equation",
                    ErrorCode::INVALID_FIELD_OPTION,
                    CompareOp::from_tag,
                )?;
                ExprKind::Compare { left, op, right }
            }
            T::MathBasic => {
                let left = self.parse_value(block, shape, "value1");
                let right = self.parse_value(block, shape, "value2");
                let op = self.dropdown_field(
                    block,
                    shape,
                    "equation",
                    ErrorCode::INVALID_FIELD_OPTION,
                    ArithOp::from_tag,
                )?;
                ExprKind::Arithmetic { left, op, right }
            }
            T::Operators => {
                let left = self.parse_value(block, shape, "value1");
                let right = self.parse_value(block, shape, "value2");
                let op = self.dropdown_field(
                    block,
                    shape,
                    "Operators",
                    ErrorCode::INVALID_FIELD_OPTION,
                    BitOp::from_tag,
                )?;
                ExprKind::Bitwise { left, op, right }
            }

            T::EventsStart
            | T::EventsLoop
            | T::LogicIf
            | T::LogicWhen
            | T::LogicWhen2
            | T::Scd41StartMeasureSingle
            | T::Scd41RetrieveValues
            | T::SevsegPrintNumber
            | T::SevsegClear
            | T::SevsegPrintDigit
            | T::SevsegPrintFloat
            | T::SpiDevice
            | T::UtilsDelay => {
                self.error_at(
                    block,
                    ErrorCode::MISPLACED_BLOCK,
                    format!("'{block_type}' does not produce a value"),
                );
                return None;
            }
        };
        Some(Expr::new(&block.id, kind))
    }
}
