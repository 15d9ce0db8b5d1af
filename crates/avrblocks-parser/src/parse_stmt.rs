//! Statement-chain lowering.

use crate::parser::Parser;
use avrblocks_types::block::{DelayUnit, SpiPin, Stmt, StmtKind};
use avrblocks_types::{BlockShape, BlockType, ErrorCode, SerializedBlock};

/// Largest accepted delay amount. Keeps `amount * 1000` in range.
const MAX_DELAY_AMOUNT: i64 = u32::MAX as i64;

impl<'ws> Parser<'ws> {
    /// Lower a chain of blocks linked through `next`.
    ///
    /// Disabled blocks are skipped; the chain continues below them.
    pub(crate) fn parse_chain(&mut self, first: Option<&SerializedBlock>) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        let mut cursor = first;
        while let Some(block) = cursor {
            if self.too_many_errors() {
                break;
            }
            if block.is_enabled() {
                if let Some(stmt) = self.parse_statement(block) {
                    stmts.push(stmt);
                }
            }
            cursor = block.next_block();
        }
        stmts
    }

    /// Lower the chain plugged into a statement socket.
    fn parse_body(&mut self, block: &SerializedBlock, socket: &str) -> Vec<Stmt> {
        let Some(first) = block.input(socket) else {
            return Vec::new();
        };
        if !self.enter(first) {
            return Vec::new();
        }
        let body = self.parse_chain(Some(first));
        self.exit();
        body
    }

    /// Lower one block of a chain.
    fn parse_statement(&mut self, block: &SerializedBlock) -> Option<Stmt> {
        use BlockType as T;

        let (block_type, shape) = self.resolve(block)?;
        let kind = match block_type {
            T::EventsStart | T::EventsLoop => {
                self.error_with_hint(
                    block,
                    ErrorCode::MISPLACED_BLOCK,
                    format!("'{block_type}' can only be placed at the top level"),
                    "detach the block from the chain",
                );
                return None;
            }

            // Value blocks dropped into a chain become expression statements.
            T::InputString
            | T::InputChar
            | T::InputBool
            | T::InputInt
            | T::LogicMath
            | T::MathBasic
            | T::Operators
            | T::Scd41GetValueCo2
            | T::Scd41GetValueTemp
            | T::Scd41GetValueRh
            | T::Scd41GetValue => StmtKind::Expr(self.parse_expr(block, block_type, &shape)?),

            T::Scd41StartMeasureSingle => StmtKind::Scd41MeasureSingle,
            T::Scd41RetrieveValues => StmtKind::Scd41RetrieveValues,

            T::SevsegPrintNumber => StmtKind::SevsegPrintNumber {
                number: self.parse_value(block, &shape, "number"),
            },
            T::SevsegPrintFloat => StmtKind::SevsegPrintFloat {
                number: self.parse_value(block, &shape, "number"),
            },
            T::SevsegPrintDigit => StmtKind::SevsegPrintDigit {
                number: self.parse_value(block, &shape, "number"),
                digit: self.parse_value(block, &shape, "digit"),
            },
            T::SevsegClear => StmtKind::SevsegClear,

            T::SpiDevice => {
                let pin = self.dropdown_field(
                    block,
                    &shape,
                    "Pin",
                    ErrorCode::INVALID_FIELD_OPTION,
                    SpiPin::from_tag,
                )?;
                StmtKind::SpiDevice { pin }
            }
            T::UtilsDelay => self.parse_delay(block, &shape)?,

            T::LogicIf => StmtKind::If {
                condition: self.parse_value(block, &shape, "condition"),
                body: self.parse_body(block, "command"),
            },
            T::LogicWhen => StmtKind::When {
                first: self.parse_value(block, &shape, "logic1"),
                first_body: self.parse_body(block, "statement1"),
                second: self.parse_value(block, &shape, "logic2"),
                second_body: self.parse_body(block, "statement2"),
            },
            T::LogicWhen2 => StmtKind::WhenElse {
                condition: self.parse_value(block, &shape, "logic1"),
                then_body: self.parse_body(block, "statement1"),
                else_body: self.parse_body(block, "statement2"),
            },
        };
        Some(Stmt::new(&block.id, kind))
    }

    /// `utils_delay`: both fields are validated before giving up.
    fn parse_delay(&mut self, block: &SerializedBlock, shape: &BlockShape) -> Option<StmtKind> {
        let amount = self.integer_field(block, shape, "num_time");
        let unit = self.dropdown_field(
            block,
            shape,
            "set_time",
            ErrorCode::INVALID_DELAY_UNIT,
            DelayUnit::from_tag,
        );
        let amount = amount?;
        if amount > MAX_DELAY_AMOUNT {
            self.error_at(
                block,
                ErrorCode::FIELD_OUT_OF_RANGE,
                format!("delay of {amount} exceeds the maximum of {MAX_DELAY_AMOUNT}"),
            );
            return None;
        }
        Some(StmtKind::Delay {
            amount: u64::try_from(amount).ok()?,
            unit: unit?,
        })
    }
}
