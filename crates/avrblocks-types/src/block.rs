//! Typed block tree.
//!
//! The parser lowers the host's serialized workspace into this closed sum
//! type. Every dropdown field becomes an enum and every numeric field a
//! bounded integer, so the code generator never sees an out-of-range value.
//! Value sockets that are unconnected are `None`.

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete block program: the chain hanging off `start` and the chain
/// hanging off `loop`.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub start: Chain,
    pub main_loop: Chain,
}

/// A statement chain anchored at an entry marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    /// Id of the entry-marker block the chain hangs off.
    pub anchor: String,
    pub stmts: Vec<Stmt>,
}

impl Chain {
    pub fn new(anchor: impl Into<String>, stmts: Vec<Stmt>) -> Self {
        Self {
            anchor: anchor.into(),
            stmts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement block.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub id: String,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(id: impl Into<String>, kind: StmtKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Every statement-shaped block the registry declares.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `scd41_start_measure_single`
    Scd41MeasureSingle,
    /// `scd41_retrieve_values`
    Scd41RetrieveValues,
    /// `sevseg_print_number`
    SevsegPrintNumber { number: Option<Box<Expr>> },
    /// `sevseg_print_float`
    SevsegPrintFloat { number: Option<Box<Expr>> },
    /// `sevseg_print_digit`
    SevsegPrintDigit {
        number: Option<Box<Expr>>,
        digit: Option<Box<Expr>>,
    },
    /// `sevseg_clear`
    SevsegClear,
    /// `spi_Device`
    SpiDevice { pin: SpiPin },
    /// `utils_delay`
    Delay { amount: u64, unit: DelayUnit },
    /// `logic_if`
    If {
        condition: Option<Box<Expr>>,
        body: Vec<Stmt>,
    },
    /// `logic_when`: `if … else if …`
    When {
        first: Option<Box<Expr>>,
        first_body: Vec<Stmt>,
        second: Option<Box<Expr>>,
        second_body: Vec<Stmt>,
    },
    /// `logic_when2`: `if … else …`
    WhenElse {
        condition: Option<Box<Expr>>,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    /// A value block placed directly in a statement chain.
    Expr(Expr),
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A value block.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: String,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(id: impl Into<String>, kind: ExprKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Every value-shaped block the registry declares.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `input_string`
    StringLit(String),
    /// `input_char`
    CharLit(u8),
    /// `input_int`
    IntLit(i16),
    /// `input_bool`
    BoolLit(bool),
    /// `scd41_get_value` and its per-quantity shorthands.
    Scd41Reading(Quantity),
    /// `logic_math`
    Compare {
        left: Option<Box<Expr>>,
        op: CompareOp,
        right: Option<Box<Expr>>,
    },
    /// `math_basic`
    Arithmetic {
        left: Option<Box<Expr>>,
        op: ArithOp,
        right: Option<Box<Expr>>,
    },
    /// `operators`
    Bitwise {
        left: Option<Box<Expr>>,
        op: BitOp,
        right: Option<Box<Expr>>,
    },
}

// ══════════════════════════════════════════════════════════════════════════════
// Field payloads
// ══════════════════════════════════════════════════════════════════════════════

/// Unit selected on a delay block (`set_time`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayUnit {
    Micros,
    Millis,
    Seconds,
}

impl DelayUnit {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "opt_us" => Some(Self::Micros),
            "opt_ms" => Some(Self::Millis),
            "opt_s" => Some(Self::Seconds),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Micros => "opt_us",
            Self::Millis => "opt_ms",
            Self::Seconds => "opt_s",
        }
    }
}

/// Physical quantity measured by the SCD41 air-quality sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Co2,
    Temperature,
    Humidity,
}

impl Quantity {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "opt_co2" => Some(Self::Co2),
            "opt_temp" => Some(Self::Temperature),
            "opt_rh" => Some(Self::Humidity),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Co2 => "opt_co2",
            Self::Temperature => "opt_temp",
            Self::Humidity => "opt_rh",
        }
    }
}

/// Port-C pin used as chip select for an SPI device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpiPin {
    Pc7,
    Pc6,
    Pc5,
    Pc4,
    Pc3,
    Pc2,
}

impl SpiPin {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "opt_PC7" => Some(Self::Pc7),
            "opt_PC6" => Some(Self::Pc6),
            "opt_PC5" => Some(Self::Pc5),
            "opt_PC4" => Some(Self::Pc4),
            "opt_PC3" => Some(Self::Pc3),
            "opt_PC2" => Some(Self::Pc2),
            _ => None,
        }
    }

    /// 1-based device id shown to the user.
    pub fn device_id(self) -> u8 {
        match self {
            Self::Pc7 => 1,
            Self::Pc6 => 2,
            Self::Pc5 => 3,
            Self::Pc4 => 4,
            Self::Pc3 => 5,
            Self::Pc2 => 6,
        }
    }

    /// Pin macro from `<avr/io.h>`.
    pub fn pin_name(self) -> &'static str {
        match self {
            Self::Pc7 => "PC7",
            Self::Pc6 => "PC6",
            Self::Pc5 => "PC5",
            Self::Pc4 => "PC4",
            Self::Pc3 => "PC3",
            Self::Pc2 => "PC2",
        }
    }
}

/// Comparison selected on `logic_math`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equal,
    GreaterEqual,
    Greater,
    SmallerEqual,
    Smaller,
    NotEqual,
}

impl CompareOp {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "equal" => Some(Self::Equal),
            "greater_equal" => Some(Self::GreaterEqual),
            "greater" => Some(Self::Greater),
            "smaller_equal" => Some(Self::SmallerEqual),
            "smaller" => Some(Self::Smaller),
            "not_equal" => Some(Self::NotEqual),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::GreaterEqual => ">=",
            Self::Greater => ">",
            Self::SmallerEqual => "<=",
            Self::Smaller => "<",
            Self::NotEqual => "!=",
        }
    }
}

/// Arithmetic operator selected on `math_basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "mul" => Some(Self::Mul),
            "div" => Some(Self::Div),
            "mod" => Some(Self::Mod),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }
}

/// Shift / bitwise operator selected on `operators`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitOp {
    ShiftLeft,
    ShiftRight,
    And,
    Or,
    Xor,
}

impl BitOp {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "opt_LEFT" => Some(Self::ShiftLeft),
            "opt_RIGHT" => Some(Self::ShiftRight),
            "opt_AND" => Some(Self::And),
            "opt_OR" => Some(Self::Or),
            "opt_XOR" => Some(Self::Xor),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
        }
    }
}
