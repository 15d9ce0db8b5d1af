//! Prologue requirements: includes, initializers and defines.
//!
//! Rendering a block records the peripherals it needs in a
//! [`RequirementSet`]. The assembler merges the sets of both chains and
//! emits each text at most once, in the declaration order of
//! [`Requirement`] regardless of discovery order.

use std::collections::BTreeSet;

/// A peripheral driver or build setting a program can depend on.
///
/// Declaration order is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Requirement {
    I2cMaster,
    SpiMaster,
    Scd41,
    Sevseg,
    Delay,
    Fcpu,
}

/// An initializer call with the comment line printed above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Init {
    pub comment: &'static str,
    pub call: &'static str,
}

impl Requirement {
    pub const ALL: &'static [Requirement] = &[
        Self::I2cMaster,
        Self::SpiMaster,
        Self::Scd41,
        Self::Sevseg,
        Self::Delay,
        Self::Fcpu,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::I2cMaster => "i2c_master",
            Self::SpiMaster => "spi_master",
            Self::Scd41 => "scd41",
            Self::Sevseg => "sevseg",
            Self::Delay => "delay",
            Self::Fcpu => "fcpu",
        }
    }

    pub fn include(self) -> Option<&'static str> {
        match self {
            Self::I2cMaster => Some("#include \"i2c_master.h\""),
            Self::SpiMaster => Some("#include \"spi_master.h\""),
            Self::Scd41 => Some("#include \"SCD41.h\""),
            Self::Sevseg => Some("#include \"sevseg.h\""),
            Self::Delay => Some("#include <util/delay.h>"),
            Self::Fcpu => None,
        }
    }

    pub fn init(self) -> Option<Init> {
        let (comment, call) = match self {
            Self::I2cMaster => ("// init i2c", "i2c_master_init(200000);"),
            Self::SpiMaster => ("// init spi", "spi_master_init(8);"),
            Self::Sevseg => ("// init 7-Segment-Display", "sevseg_init();"),
            Self::Scd41 | Self::Delay | Self::Fcpu => return None,
        };
        Some(Init { comment, call })
    }

    pub fn define(self) -> Option<&'static str> {
        match self {
            Self::Fcpu => Some("#define F_CPU 12000000UL"),
            _ => None,
        }
    }
}

/// Three independent ordered sets of requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    includes: BTreeSet<Requirement>,
    inits: BTreeSet<Requirement>,
    defines: BTreeSet<Requirement>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&mut self, requirement: Requirement) {
        if requirement.include().is_some() {
            self.includes.insert(requirement);
        }
    }

    pub fn init(&mut self, requirement: Requirement) {
        if requirement.init().is_some() {
            self.inits.insert(requirement);
        }
    }

    pub fn define(&mut self, requirement: Requirement) {
        if requirement.define().is_some() {
            self.defines.insert(requirement);
        }
    }

    /// Union with another set.
    pub fn merge(&mut self, other: &RequirementSet) {
        self.includes.extend(&other.includes);
        self.inits.extend(&other.inits);
        self.defines.extend(&other.defines);
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.inits.is_empty() && self.defines.is_empty()
    }

    pub fn includes(&self) -> impl Iterator<Item = Requirement> + '_ {
        self.includes.iter().copied()
    }

    pub fn inits(&self) -> impl Iterator<Item = Requirement> + '_ {
        self.inits.iter().copied()
    }

    pub fn defines(&self) -> impl Iterator<Item = Requirement> + '_ {
        self.defines.iter().copied()
    }

    pub fn include_lines(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.includes().filter_map(Requirement::include)
    }

    pub fn init_blocks(&self) -> impl Iterator<Item = Init> + '_ {
        self.inits().filter_map(Requirement::init)
    }

    pub fn define_lines(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.defines().filter_map(Requirement::define)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let with_include = Requirement::ALL.iter().filter(|r| r.include().is_some());
        assert_eq!(with_include.count(), 5);
        let with_init: Vec<_> = Requirement::ALL
            .iter()
            .filter(|r| r.init().is_some())
            .map(|r| r.name())
            .collect();
        assert_eq!(with_init, ["i2c_master", "spi_master", "sevseg"]);
        assert_eq!(Requirement::Fcpu.define(), Some("#define F_CPU 12000000UL"));
    }

    #[test]
    fn test_fixed_order_regardless_of_discovery() {
        let mut set = RequirementSet::new();
        set.include(Requirement::Delay);
        set.include(Requirement::Sevseg);
        set.include(Requirement::I2cMaster);
        set.include(Requirement::Sevseg);
        let lines: Vec<_> = set.include_lines().collect();
        assert_eq!(
            lines,
            [
                "#include \"i2c_master.h\"",
                "#include \"sevseg.h\"",
                "#include <util/delay.h>"
            ]
        );
    }

    #[test]
    fn test_entries_without_text_are_ignored() {
        let mut set = RequirementSet::new();
        set.init(Requirement::Scd41);
        set.define(Requirement::Delay);
        set.include(Requirement::Fcpu);
        assert!(set.is_empty());
    }

    #[test]
    fn test_merge_is_union() {
        let mut a = RequirementSet::new();
        a.include(Requirement::Scd41);
        a.init(Requirement::I2cMaster);
        let mut b = RequirementSet::new();
        b.include(Requirement::Scd41);
        b.define(Requirement::Fcpu);
        a.merge(&b);
        assert_eq!(a.includes().collect::<Vec<_>>(), [Requirement::Scd41]);
        assert_eq!(a.inits().collect::<Vec<_>>(), [Requirement::I2cMaster]);
        assert_eq!(a.defines().collect::<Vec<_>>(), [Requirement::Fcpu]);
    }
}
