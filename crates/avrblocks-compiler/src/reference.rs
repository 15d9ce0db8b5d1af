//! Machine-generated editor artifacts.
//!
//! Produces three JSON documents from the block registry, so the host
//! editor never carries a hand-written copy:
//! 1. **Block definitions** in the editor's JSON block format
//! 2. **Toolbox** tree (categories and their blocks)
//! 3. **Theme** (block and category styles)

use avrblocks_types::registry::{BlockStyle, Category, FieldSpec, InputKind, InputRow, Output};
use avrblocks_types::{describe, BlockShape, BlockType};
use serde_json::{json, Map, Value};

/// Theme name registered with the editor.
pub const THEME_NAME: &str = "Theme";

// ══════════════════════════════════════════════════════════════════════════════
// Block definitions
// ══════════════════════════════════════════════════════════════════════════════

/// Definitions of every block type, in registry order.
pub fn block_definitions() -> Value {
    Value::Array(
        BlockType::ALL
            .iter()
            .map(|&t| block_definition(&describe(t)))
            .collect(),
    )
}

/// One block definition: `message0` with `%n` placeholders and `args0`.
pub fn block_definition(shape: &BlockShape) -> Value {
    let mut message = Vec::new();
    let mut args = Vec::new();
    for row in &shape.rows {
        for field in &row.fields {
            match field {
                FieldSpec::Label(text) => message.push((*text).to_string()),
                _ => {
                    args.push(field_arg(field));
                    message.push(format!("%{}", args.len()));
                }
            }
        }
        args.push(input_arg(row));
        message.push(format!("%{}", args.len()));
    }

    let mut def = Map::new();
    def.insert("type".into(), json!(shape.block_type.name()));
    def.insert("message0".into(), json!(message.join(" ")));
    def.insert("args0".into(), Value::Array(args));
    match shape.output {
        Output::None => {}
        Output::Any => {
            def.insert("output".into(), Value::Null);
        }
        Output::Typed(ty) => {
            def.insert("output".into(), json!(ty.name()));
        }
    }
    if shape.previous_statement {
        def.insert("previousStatement".into(), Value::Null);
    }
    if shape.next_statement {
        def.insert("nextStatement".into(), Value::Null);
    }
    if shape.inputs_inline {
        def.insert("inputsInline".into(), json!(true));
    }
    if let Some(style) = shape.style {
        def.insert("style".into(), json!(style.name()));
    }
    def.insert("tooltip".into(), json!(shape.tooltip));
    def.insert("helpUrl".into(), json!(""));
    if !shape.deletable {
        def.insert("deletable".into(), json!(false));
    }
    if !shape.editable {
        def.insert("editable".into(), json!(false));
    }
    Value::Object(def)
}

fn field_arg(field: &FieldSpec) -> Value {
    match field {
        FieldSpec::Label(text) => json!({ "type": "field_label", "text": text }),
        FieldSpec::Text { name, default } => {
            json!({ "type": "field_input", "name": name, "text": default })
        }
        FieldSpec::Number {
            name,
            default,
            min,
            max,
            precision,
        } => {
            let mut arg = json!({ "type": "field_number", "name": name, "value": default, "min": min });
            // JSON has no infinity; an absent bound is unbounded.
            if max.is_finite() {
                arg["max"] = json!(max);
            }
            if let Some(precision) = precision {
                arg["precision"] = json!(precision);
            }
            arg
        }
        FieldSpec::Dropdown { name, options } => {
            let options: Vec<Value> = options.iter().map(|(label, tag)| json!([label, tag])).collect();
            json!({ "type": "field_dropdown", "name": name, "options": options })
        }
    }
}

fn input_arg(row: &InputRow) -> Value {
    match row.kind {
        InputKind::Dummy => json!({ "type": "input_dummy", "name": row.name }),
        InputKind::EndRow => json!({ "type": "input_end_row", "name": row.name }),
        InputKind::Statement => json!({ "type": "input_statement", "name": row.name }),
        InputKind::Value { check } => {
            let mut arg = json!({ "type": "input_value", "name": row.name });
            if let Some(check) = check {
                arg["check"] = json!(check.name());
            }
            arg
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Toolbox & theme
// ══════════════════════════════════════════════════════════════════════════════

/// The category toolbox.
pub fn toolbox() -> Value {
    let categories: Vec<Value> = Category::ALL
        .iter()
        .map(|&category| {
            let blocks: Vec<Value> = category
                .contents()
                .iter()
                .map(|t| json!({ "kind": "block", "type": t.name() }))
                .collect();
            json!({
                "kind": "category",
                "name": category.name(),
                "categorystyle": category.style().name(),
                "contents": blocks,
            })
        })
        .collect();
    json!({ "kind": "categoryToolbox", "contents": categories })
}

/// Block and category styles.
pub fn theme() -> Value {
    let mut block_styles = Map::new();
    let mut category_styles = Map::new();
    for &style in BlockStyle::ALL {
        let Some(colour) = style.colour() else {
            continue;
        };
        block_styles.insert(style.name().into(), json!({ "colourPrimary": colour }));
        if style.has_category() {
            category_styles.insert(style.name().into(), json!({ "colour": colour }));
        }
    }
    json!({
        "name": THEME_NAME,
        "base": "classic",
        "blockStyles": block_styles,
        "categoryStyles": category_styles,
    })
}

/// Pretty-printed JSON for the CLI and the browser host.
pub fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

pub fn generate_block_definitions() -> String {
    to_pretty_json(&block_definitions())
}

pub fn generate_toolbox() -> String {
    to_pretty_json(&toolbox())
}

pub fn generate_theme() -> String {
    to_pretty_json(&theme())
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(t: BlockType) -> Value {
        block_definition(&describe(t))
    }

    #[test]
    fn every_block_has_a_definition() {
        let defs = block_definitions();
        let defs = defs.as_array().unwrap();
        assert_eq!(defs.len(), BlockType::ALL.len());
        for (def, t) in defs.iter().zip(BlockType::ALL) {
            assert_eq!(def["type"], t.name());
        }
    }

    #[test]
    fn placeholders_match_args() {
        for &t in BlockType::ALL {
            let def = definition(t);
            let args = def["args0"].as_array().unwrap().len();
            let message = def["message0"].as_str().unwrap();
            for n in 1..=args {
                assert!(message.contains(&format!("%{n}")), "{t} missing %{n}");
            }
        }
    }

    #[test]
    fn delay_definition() {
        let def = definition(BlockType::UtilsDelay);
        assert_eq!(def["message0"], "Wait for %1 %2 %3");
        assert_eq!(def["args0"][0]["type"], "field_number");
        assert_eq!(def["args0"][0]["min"], 1.0);
        assert!(def["args0"][0].get("max").is_none());
        assert_eq!(def["args0"][1]["options"][2], json!(["s", "opt_s"]));
        assert_eq!(def["args0"][2]["type"], "input_dummy");
        assert!(def.get("previousStatement").is_some());
        assert_eq!(def["style"], "utils");
    }

    #[test]
    fn typed_sockets_and_outputs() {
        let print = definition(BlockType::SevsegPrintFloat);
        assert_eq!(print["args0"][0]["check"], "float");
        let co2 = definition(BlockType::Scd41GetValueCo2);
        assert_eq!(co2["output"], "uint16");
        let int = definition(BlockType::InputInt);
        assert!(int["output"].is_null());
        assert!(int.get("output").is_some());
    }

    #[test]
    fn entry_markers_are_locked() {
        let def = definition(BlockType::EventsStart);
        assert_eq!(def["deletable"], false);
        assert_eq!(def["editable"], false);
        assert!(def.get("previousStatement").is_none());
        assert_eq!(def["tooltip"], "Start");
    }

    #[test]
    fn toolbox_categories() {
        let tb = toolbox();
        assert_eq!(tb["kind"], "categoryToolbox");
        let names: Vec<_> = tb["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["datatypes", "logic", "math", "Air Quality", "7 Segment Display", "Utils"]
        );
        assert_eq!(tb["contents"][3]["categorystyle"], "scd41");
        assert_eq!(tb["contents"][0]["contents"][0]["type"], "input_string");
    }

    #[test]
    fn theme_styles() {
        let theme = theme();
        assert_eq!(theme["blockStyles"]["event"]["colourPrimary"], "#00d800");
        assert!(theme["blockStyles"].get("spi").is_none());
        assert!(theme["categoryStyles"].get("event").is_none());
        assert_eq!(theme["categoryStyles"]["math"]["colour"], "#69bdd2");
    }

    #[test]
    fn pretty_json_round_trips() {
        let text = to_pretty_json(&toolbox());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, toolbox());
    }
}
