//! Block registry: the closed set of block types and their shapes.
//!
//! [`describe`] returns the declarative [`BlockShape`] of a block type:
//! its input rows in display order, the fields on each row, connection
//! points, output type and visual style. The parser validates serialized
//! blocks against it and the compiler derives the host's block
//! definitions, theme and toolbox from it.

use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Block types
// ══════════════════════════════════════════════════════════════════════════════

/// Every block type the editor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockType {
    EventsStart,
    EventsLoop,
    InputString,
    InputChar,
    InputBool,
    InputInt,
    LogicIf,
    LogicMath,
    Operators,
    MathBasic,
    LogicWhen,
    LogicWhen2,
    Scd41StartMeasureSingle,
    Scd41RetrieveValues,
    Scd41GetValueCo2,
    Scd41GetValueTemp,
    Scd41GetValueRh,
    Scd41GetValue,
    SevsegPrintNumber,
    SevsegClear,
    SevsegPrintDigit,
    SevsegPrintFloat,
    SpiDevice,
    UtilsDelay,
}

impl BlockType {
    /// All block types in registry order.
    pub const ALL: &'static [BlockType] = &[
        Self::EventsStart,
        Self::EventsLoop,
        Self::InputString,
        Self::InputChar,
        Self::InputBool,
        Self::InputInt,
        Self::LogicIf,
        Self::LogicMath,
        Self::Operators,
        Self::MathBasic,
        Self::LogicWhen,
        Self::LogicWhen2,
        Self::Scd41StartMeasureSingle,
        Self::Scd41RetrieveValues,
        Self::Scd41GetValueCo2,
        Self::Scd41GetValueTemp,
        Self::Scd41GetValueRh,
        Self::Scd41GetValue,
        Self::SevsegPrintNumber,
        Self::SevsegClear,
        Self::SevsegPrintDigit,
        Self::SevsegPrintFloat,
        Self::SpiDevice,
        Self::UtilsDelay,
    ];

    /// The identifier used in serialized workspaces.
    pub fn name(self) -> &'static str {
        match self {
            Self::EventsStart => "events_start",
            Self::EventsLoop => "events_loop",
            Self::InputString => "input_string",
            Self::InputChar => "input_char",
            Self::InputBool => "input_bool",
            Self::InputInt => "input_int",
            Self::LogicIf => "logic_if",
            Self::LogicMath => "logic_math",
            Self::Operators => "operators",
            Self::MathBasic => "math_basic",
            Self::LogicWhen => "logic_when",
            Self::LogicWhen2 => "logic_when2",
            Self::Scd41StartMeasureSingle => "scd41_start_measure_single",
            Self::Scd41RetrieveValues => "scd41_retrieve_values",
            Self::Scd41GetValueCo2 => "scd41_get_value_co2",
            Self::Scd41GetValueTemp => "scd41_get_value_temp",
            Self::Scd41GetValueRh => "scd41_get_value_rh",
            Self::Scd41GetValue => "scd41_get_value",
            Self::SevsegPrintNumber => "sevseg_print_number",
            Self::SevsegClear => "sevseg_clear",
            Self::SevsegPrintDigit => "sevseg_print_digit",
            Self::SevsegPrintFloat => "sevseg_print_float",
            Self::SpiDevice => "spi_Device",
            Self::UtilsDelay => "utils_delay",
        }
    }

    /// Resolve a serialized identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// `events_start` and `events_loop` anchor the two program sections.
    pub fn is_entry_marker(self) -> bool {
        matches!(self, Self::EventsStart | Self::EventsLoop)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Shapes
// ══════════════════════════════════════════════════════════════════════════════

/// Type constraint carried by value sockets and value outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Uint16,
    Float,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Uint16 => "uint16",
            Self::Float => "float",
        }
    }
}

/// What a block plugs into on its left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Statement or marker block.
    None,
    /// Value block without a type constraint.
    Any,
    /// Value block of a specific type.
    Typed(ValueType),
}

/// The kind of an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Fields only, no connection.
    Dummy,
    /// Value socket with an optional type check.
    Value { check: Option<ValueType> },
    /// Statement-chain socket.
    Statement,
    /// Fields only; forces a line break after the row.
    EndRow,
}

/// A single field on an input row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// Static text.
    Label(&'static str),
    /// Free text.
    Text {
        name: &'static str,
        default: &'static str,
    },
    /// Bounded number. `precision: Some(1.0)` restricts to integers.
    Number {
        name: &'static str,
        default: f64,
        min: f64,
        max: f64,
        precision: Option<f64>,
    },
    /// Fixed enum: `(label, tag)` pairs.
    Dropdown {
        name: &'static str,
        options: &'static [(&'static str, &'static str)],
    },
}

impl FieldSpec {
    /// The serialized field name, `None` for labels.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Self::Label(_) => None,
            Self::Text { name, .. } | Self::Number { name, .. } | Self::Dropdown { name, .. } => {
                Some(*name)
            }
        }
    }
}

/// One input row of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub name: &'static str,
    pub kind: InputKind,
    pub fields: Vec<FieldSpec>,
}

impl InputRow {
    fn new(name: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            kind,
            fields: Vec::new(),
        }
    }

    fn dummy(name: &'static str) -> Self {
        Self::new(name, InputKind::Dummy)
    }

    fn value(name: &'static str, check: Option<ValueType>) -> Self {
        Self::new(name, InputKind::Value { check })
    }

    fn statement(name: &'static str) -> Self {
        Self::new(name, InputKind::Statement)
    }

    fn end_row(name: &'static str) -> Self {
        Self::new(name, InputKind::EndRow)
    }

    fn label(mut self, text: &'static str) -> Self {
        self.fields.push(FieldSpec::Label(text));
        self
    }

    fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }
}

/// Declarative description of a block type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockShape {
    pub block_type: BlockType,
    pub rows: Vec<InputRow>,
    pub output: Output,
    pub previous_statement: bool,
    pub next_statement: bool,
    pub inputs_inline: bool,
    pub style: Option<BlockStyle>,
    pub tooltip: &'static str,
    pub deletable: bool,
    pub editable: bool,
}

impl BlockShape {
    fn base(block_type: BlockType, style: Option<BlockStyle>) -> Self {
        Self {
            block_type,
            rows: Vec::new(),
            output: Output::None,
            previous_statement: false,
            next_statement: false,
            inputs_inline: false,
            style,
            tooltip: "",
            deletable: true,
            editable: true,
        }
    }

    fn row(mut self, row: InputRow) -> Self {
        self.rows.push(row);
        self
    }

    fn chained(mut self) -> Self {
        self.previous_statement = true;
        self.next_statement = true;
        self
    }

    fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    fn inline(mut self) -> Self {
        self.inputs_inline = true;
        self
    }

    fn marker(mut self, tooltip: &'static str) -> Self {
        self.next_statement = true;
        self.tooltip = tooltip;
        self.deletable = false;
        self.editable = false;
        self
    }

    /// True for blocks that plug into a value socket.
    pub fn is_value(&self) -> bool {
        self.output != Output::None
    }

    /// All named fields across all rows.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.rows
            .iter()
            .flat_map(|row| row.fields.iter())
            .filter(|spec| spec.name().is_some())
    }

    /// Look up a named field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|spec| spec.name() == Some(name))
    }

    /// Look up a value or statement socket by name.
    pub fn input(&self, name: &str) -> Option<&InputRow> {
        self.rows.iter().find(|row| {
            row.name == name && matches!(row.kind, InputKind::Value { .. } | InputKind::Statement)
        })
    }
}

const BOOL_OPTIONS: &[(&str, &str)] = &[("true", "value_true"), ("false", "value_false")];

const COMPARE_OPTIONS: &[(&str, &str)] = &[
    ("==", "equal"),
    (">=", "greater_equal"),
    (">", "greater"),
    ("<=", "smaller_equal"),
    ("<", "smaller"),
    ("!=", "not_equal"),
];

const BIT_OPTIONS: &[(&str, &str)] = &[
    ("LEFT", "opt_LEFT"),
    ("RIGHT", "opt_RIGHT"),
    ("AND", "opt_AND"),
    ("OR", "opt_OR"),
    ("XOR", "opt_XOR"),
];

const ARITH_OPTIONS: &[(&str, &str)] = &[
    ("+", "add"),
    ("-", "sub"),
    ("*", "mul"),
    ("/", "div"),
    ("%", "mod"),
];

const QUANTITY_OPTIONS: &[(&str, &str)] = &[
    ("CO2", "opt_co2"),
    ("Temperature", "opt_temp"),
    ("Relative Humidity", "opt_rh"),
];

const SPI_PIN_OPTIONS: &[(&str, &str)] = &[
    ("1", "opt_PC7"),
    ("2", "opt_PC6"),
    ("3", "opt_PC5"),
    ("4", "opt_PC4"),
    ("5", "opt_PC3"),
    ("6", "opt_PC2"),
];

const DELAY_UNIT_OPTIONS: &[(&str, &str)] =
    &[("µs", "opt_us"), ("ms", "opt_ms"), ("s", "opt_s")];

/// Describe a block type.
pub fn describe(block_type: BlockType) -> BlockShape {
    use BlockStyle as S;
    use BlockType as T;

    let shape = |style| BlockShape::base(block_type, Some(style));

    match block_type {
        // ── Entry markers ──
        T::EventsStart => shape(S::Event)
            .row(InputRow::dummy("").label("Start"))
            .marker("Start"),
        T::EventsLoop => shape(S::Event)
            .row(InputRow::dummy("").label("Loop"))
            .marker("Loop"),

        // ── Datatypes ──
        T::InputString => shape(S::Datatypes)
            .row(InputRow::dummy("NAME").label("String").field(FieldSpec::Text {
                name: "value",
                default: "Test",
            }))
            .output(Output::Any),
        T::InputChar => shape(S::Datatypes)
            .row(InputRow::dummy("NAME").label("char").field(FieldSpec::Number {
                name: "value",
                default: 0.0,
                min: 0.0,
                max: 255.0,
                precision: None,
            }))
            .output(Output::Any),
        T::InputBool => shape(S::Datatypes)
            .row(InputRow::dummy("NAME").label("bool").field(FieldSpec::Dropdown {
                name: "value",
                options: BOOL_OPTIONS,
            }))
            .output(Output::Any),
        T::InputInt => shape(S::Datatypes)
            .row(InputRow::dummy("NAME").label("int").field(FieldSpec::Number {
                name: "value",
                default: 0.0,
                min: -32768.0,
                max: 32767.0,
                precision: None,
            }))
            .output(Output::Any),

        // ── Logic ──
        T::LogicIf => shape(S::Logic)
            .row(InputRow::value("condition", None).label("If"))
            .row(InputRow::statement("command"))
            .chained(),
        T::LogicMath => shape(S::Logic)
            .row(InputRow::value("value1", None))
            .row(InputRow::value("value2", None).field(FieldSpec::Dropdown {
                name: "equation",
                options: COMPARE_OPTIONS,
            }))
            .inline()
            .output(Output::Any),
        T::LogicWhen => shape(S::Logic)
            .row(InputRow::value("logic1", None).label("When"))
            .row(InputRow::statement("statement1").label("then"))
            .row(InputRow::value("logic2", None).label("else when"))
            .row(InputRow::statement("statement2").label("then"))
            .inline()
            .chained(),
        T::LogicWhen2 => shape(S::Logic)
            .row(InputRow::value("logic1", None).label("When"))
            .row(InputRow::statement("statement1").label("then"))
            .row(InputRow::dummy("NAME").label("else"))
            .row(InputRow::statement("statement2").label("then"))
            .inline()
            .chained(),

        // ── Math ──
        T::Operators => BlockShape::base(block_type, None)
            .row(InputRow::value("value1", None))
            .row(InputRow::value("value2", None).field(FieldSpec::Dropdown {
                name: "Operators",
                options: BIT_OPTIONS,
            }))
            .inline()
            .output(Output::Any),
        T::MathBasic => shape(S::Math)
            .row(InputRow::value("value1", None))
            .row(InputRow::value("value2", None).field(FieldSpec::Dropdown {
                name: "equation",
                options: ARITH_OPTIONS,
            }))
            .inline()
            .output(Output::Any),

        // ── Air quality (SCD41) ──
        T::Scd41StartMeasureSingle => shape(S::Scd41)
            .row(InputRow::dummy("NAME").label("Start new air quality measurement (single)"))
            .chained(),
        T::Scd41RetrieveValues => shape(S::Scd41)
            .row(InputRow::dummy("NAME").label("Retrieve values from air quality sensor"))
            .chained(),
        T::Scd41GetValueCo2 => shape(S::Scd41)
            .row(InputRow::dummy("NAME").label("Air quality: CO2"))
            .output(Output::Typed(ValueType::Uint16)),
        T::Scd41GetValueTemp => shape(S::Scd41)
            .row(InputRow::dummy("NAME").label("Air quality: temperature"))
            .output(Output::Typed(ValueType::Float)),
        T::Scd41GetValueRh => shape(S::Scd41)
            .row(InputRow::dummy("NAME").label("Air quality: Humidity"))
            .output(Output::Typed(ValueType::Float)),
        T::Scd41GetValue => shape(S::Scd41)
            .row(
                InputRow::dummy("NAME")
                    .label("Air quality:")
                    .field(FieldSpec::Dropdown {
                        name: "value",
                        options: QUANTITY_OPTIONS,
                    }),
            )
            .output(Output::Typed(ValueType::Uint16)),

        // ── 7 segment display ──
        T::SevsegPrintNumber => shape(S::Sevseg)
            .row(InputRow::value("number", Some(ValueType::Uint16)).label("Print"))
            .row(InputRow::end_row("NAME").label("on 7 segment display"))
            .chained(),
        T::SevsegClear => shape(S::Sevseg)
            .row(InputRow::dummy("NAME").label("Clear 7 segment display"))
            .chained(),
        T::SevsegPrintDigit => shape(S::Sevseg)
            .row(InputRow::value("number", None).label("Print number"))
            .row(InputRow::value("digit", None).label("on digit"))
            .row(InputRow::end_row("NAME").label("of 7 segment display"))
            .inline()
            .chained(),
        T::SevsegPrintFloat => shape(S::Sevseg)
            .row(InputRow::value("number", Some(ValueType::Float)).label("Print float"))
            .row(InputRow::end_row("NAME").label("on 7 segment display"))
            .chained(),

        // ── SPI ──
        T::SpiDevice => shape(S::Spi)
            .row(
                InputRow::dummy("NAME")
                    .label("Create SPI-Device with ID")
                    .field(FieldSpec::Dropdown {
                        name: "Pin",
                        options: SPI_PIN_OPTIONS,
                    }),
            )
            .chained(),

        // ── Utils ──
        T::UtilsDelay => shape(S::Utils)
            .row(
                InputRow::dummy("NAME")
                    .label("Wait for")
                    .field(FieldSpec::Number {
                        name: "num_time",
                        default: 0.0,
                        min: 1.0,
                        max: f64::INFINITY,
                        precision: Some(1.0),
                    })
                    .field(FieldSpec::Dropdown {
                        name: "set_time",
                        options: DELAY_UNIT_OPTIONS,
                    }),
            )
            .chained(),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Styles & toolbox
// ══════════════════════════════════════════════════════════════════════════════

/// Named block style of the editor theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockStyle {
    Scd41,
    Event,
    Sevseg,
    Utils,
    Datatypes,
    Logic,
    Pixelmatrix,
    Math,
    Spi,
}

impl BlockStyle {
    /// Styles in theme declaration order.
    pub const ALL: &'static [BlockStyle] = &[
        Self::Scd41,
        Self::Event,
        Self::Sevseg,
        Self::Utils,
        Self::Datatypes,
        Self::Logic,
        Self::Pixelmatrix,
        Self::Math,
        Self::Spi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Scd41 => "scd41",
            Self::Event => "event",
            Self::Sevseg => "sevseg",
            Self::Utils => "utils",
            Self::Datatypes => "datatypes",
            Self::Logic => "logic",
            Self::Pixelmatrix => "pixelmatrix",
            Self::Math => "math",
            Self::Spi => "spi",
        }
    }

    /// Primary colour, when the theme defines one.
    pub fn colour(self) -> Option<&'static str> {
        match self {
            Self::Scd41 => Some("#007fff"),
            Self::Event => Some("#00d800"),
            Self::Sevseg => Some("#7f00ff"),
            Self::Utils => Some("#aa0000"),
            Self::Datatypes => Some("#875F9A"),
            Self::Logic => Some("#195e83"),
            Self::Pixelmatrix => Some("#FF0000"),
            Self::Math => Some("#69bdd2"),
            Self::Spi => None,
        }
    }

    /// Whether the style also colours a toolbox category.
    pub fn has_category(self) -> bool {
        !matches!(self, Self::Event | Self::Spi)
    }
}

/// A toolbox category in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Datatypes,
    Logic,
    Math,
    AirQuality,
    SevenSegment,
    Utils,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Self::Datatypes,
        Self::Logic,
        Self::Math,
        Self::AirQuality,
        Self::SevenSegment,
        Self::Utils,
    ];

    /// Display name in the toolbox.
    pub fn name(self) -> &'static str {
        match self {
            Self::Datatypes => "datatypes",
            Self::Logic => "logic",
            Self::Math => "math",
            Self::AirQuality => "Air Quality",
            Self::SevenSegment => "7 Segment Display",
            Self::Utils => "Utils",
        }
    }

    pub fn style(self) -> BlockStyle {
        match self {
            Self::Datatypes => BlockStyle::Datatypes,
            Self::Logic => BlockStyle::Logic,
            Self::Math => BlockStyle::Math,
            Self::AirQuality => BlockStyle::Scd41,
            Self::SevenSegment => BlockStyle::Sevseg,
            Self::Utils => BlockStyle::Utils,
        }
    }

    /// Blocks offered in this category.
    pub fn contents(self) -> &'static [BlockType] {
        use BlockType as T;
        match self {
            Self::Datatypes => &[T::InputString, T::InputChar, T::InputBool, T::InputInt],
            Self::Logic => &[T::LogicIf, T::LogicMath, T::LogicWhen, T::LogicWhen2],
            Self::Math => &[T::MathBasic, T::Operators],
            Self::AirQuality => &[
                T::Scd41StartMeasureSingle,
                T::Scd41RetrieveValues,
                T::Scd41GetValueCo2,
                T::Scd41GetValueTemp,
                T::Scd41GetValueRh,
            ],
            Self::SevenSegment => &[T::SevsegPrintNumber, T::SevsegPrintFloat],
            Self::Utils => &[T::UtilsDelay],
        }
    }
}
