//! Field validation against the registry's field specs.

use crate::parser::Parser;
use avrblocks_types::registry::FieldSpec;
use avrblocks_types::{BlockShape, ErrorCode, FieldValue, SerializedBlock};

impl<'ws> Parser<'ws> {
    /// Look up a field value, reporting it when absent.
    fn require_field<'b>(&mut self, block: &'b SerializedBlock, name: &str) -> Option<&'b FieldValue> {
        let value = block.field(name);
        if value.is_none() {
            self.error_with_hint(
                block,
                ErrorCode::MISSING_FIELD,
                format!("'{}' has no value for field '{name}'", block.block_type),
                "re-create the block from the toolbox",
            );
        }
        value
    }

    fn wrong_kind(&mut self, block: &SerializedBlock, name: &str, expected: &str, got: &FieldValue) {
        self.error_at(
            block,
            ErrorCode::FIELD_WRONG_KIND,
            format!(
                "field '{name}' expects {expected}, found {}",
                got.kind_name()
            ),
        );
    }

    /// Validate a dropdown field and map its tag to a typed payload.
    ///
    /// `code` distinguishes dropdowns with a dedicated error code
    /// (the delay unit) from the generic option error.
    pub(crate) fn dropdown_field<T>(
        &mut self,
        block: &SerializedBlock,
        shape: &BlockShape,
        name: &str,
        code: ErrorCode,
        from_tag: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let value = self.require_field(block, name)?;
        let Some(tag) = value.as_str() else {
            self.wrong_kind(block, name, "an option tag", value);
            return None;
        };
        if let Some(typed) = from_tag(tag) {
            return Some(typed);
        }

        let message = format!("unknown option '{tag}' for field '{name}'");
        match shape.field(name) {
            Some(FieldSpec::Dropdown { options, .. }) => {
                let tags: Vec<&str> = options.iter().map(|(_, tag)| *tag).collect();
                self.error_with_hint(
                    block,
                    code,
                    message,
                    format!("expected one of: {}", tags.join(", ")),
                );
            }
            _ => self.error_at(block, code, message),
        }
        None
    }

    /// Validate a whole-number field against its declared bounds.
    pub(crate) fn integer_field(
        &mut self,
        block: &SerializedBlock,
        shape: &BlockShape,
        name: &str,
    ) -> Option<i64> {
        let value = self.require_field(block, name)?;
        let Some(number) = value.as_number() else {
            self.wrong_kind(block, name, "a number", value);
            return None;
        };
        if !number.is_finite() || number.fract() != 0.0 {
            self.error_at(
                block,
                ErrorCode::FIELD_NOT_INTEGER,
                format!("field '{name}' must be a whole number, found {number}"),
            );
            return None;
        }
        if let Some(FieldSpec::Number { min, max, .. }) = shape.field(name) {
            if number < *min || number > *max {
                let range = if max.is_finite() {
                    format!("{min}..={max}")
                } else {
                    format!("at least {min}")
                };
                self.error_at(
                    block,
                    ErrorCode::FIELD_OUT_OF_RANGE,
                    format!("field '{name}' is {number}, expected {range}"),
                );
                return None;
            }
        }
        Some(number as i64)
    }

    /// Read a free-text field.
    pub(crate) fn text_field(&mut self, block: &SerializedBlock, name: &str) -> Option<String> {
        let value = self.require_field(block, name)?;
        match value {
            FieldValue::Text(text) => Some(text.clone()),
            other => {
                self.wrong_kind(block, name, "text", other);
                None
            }
        }
    }
}
