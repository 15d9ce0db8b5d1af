//! Per-pass render state.

use crate::error::{CodegenError, CodegenResult};
use crate::requirements::{Requirement, RequirementSet};

/// Deepest block nesting the renderer follows.
pub const MAX_RENDER_DEPTH: u32 = 64;

/// State threaded through rendering of one chain.
///
/// A fresh context starts with an empty [`RequirementSet`]; the assembler
/// merges the sets of the two chains afterwards.
#[derive(Debug, Default)]
pub struct RenderContext {
    pub requirements: RequirementSet,
    depth: u32,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enter(&mut self) -> CodegenResult<()> {
        if self.depth >= MAX_RENDER_DEPTH {
            return Err(CodegenError::LimitExceeded(format!(
                "blocks nested deeper than {MAX_RENDER_DEPTH} levels"
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ── Peripheral requirements ──

    /// SCD41 air-quality sensor on the I2C bus.
    pub(crate) fn use_scd41(&mut self) {
        self.requirements.include(Requirement::Scd41);
        self.requirements.init(Requirement::I2cMaster);
    }

    /// 7-segment display on the I2C bus.
    pub(crate) fn use_sevseg(&mut self) {
        self.requirements.include(Requirement::Sevseg);
        self.requirements.init(Requirement::I2cMaster);
        self.requirements.init(Requirement::Sevseg);
    }

    pub(crate) fn use_spi(&mut self) {
        self.requirements.include(Requirement::SpiMaster);
        self.requirements.init(Requirement::SpiMaster);
    }

    /// `<util/delay.h>` needs `F_CPU` defined before it.
    pub(crate) fn use_delay(&mut self) {
        self.requirements.include(Requirement::Delay);
        self.requirements.define(Requirement::Fcpu);
    }
}
