//! Cosmetic formatter for generated C.
//!
//! Re-indents every line by brace depth, drops blank lines directly
//! inside braces and collapses longer runs of blank lines. Braces after
//! `//` and inside well-formed string and character literals are not
//! counted. String literals reach the output unescaped, so a user string
//! holding a bare `"` ends the literal early and a following brace shifts
//! the indentation of later lines. The C itself is unaffected. The result
//! is stable: formatting formatted output changes nothing.

use serde::{Deserialize, Serialize};

/// Formatter settings, loaded from the `[format]` table of the generator
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per indentation level.
    pub indent_size: usize,
    /// Indent with one tab per level instead of spaces.
    pub indent_with_tabs: bool,
    /// Longest run of blank lines kept.
    pub max_blank_lines: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            indent_with_tabs: false,
            max_blank_lines: 1,
        }
    }
}

impl FormatOptions {
    fn indent(&self, depth: usize) -> String {
        if self.indent_with_tabs {
            "\t".repeat(depth)
        } else {
            " ".repeat(self.indent_size * depth)
        }
    }
}

/// Brace counts of one line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Braces {
    opens: usize,
    closes: usize,
    /// Closing braces before any other code on the line.
    leading_closes: usize,
}

fn scan_braces(line: &str) -> Braces {
    let mut braces = Braces::default();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut seen_code = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                seen_code = true;
            }
            '/' if chars.peek() == Some(&'/') => break,
            '{' => {
                braces.opens += 1;
                seen_code = true;
            }
            '}' => {
                braces.closes += 1;
                if !seen_code {
                    braces.leading_closes += 1;
                }
            }
            c if c.is_whitespace() => {}
            _ => seen_code = true,
        }
    }
    braces
}

/// Re-indent `source`. The output ends with exactly one newline unless it
/// is empty.
pub fn format(source: &str, options: &FormatOptions) -> String {
    let mut out = String::new();
    let mut depth: usize = 0;
    let mut pending_blank: usize = 0;
    // Start of file behaves like the line after an opening brace.
    let mut after_open = true;

    for line in source.lines().map(str::trim) {
        if line.is_empty() {
            pending_blank += 1;
            continue;
        }
        let braces = scan_braces(line);

        let before_close = braces.leading_closes > 0;
        if !after_open && !before_close {
            for _ in 0..pending_blank.min(options.max_blank_lines) {
                out.push('\n');
            }
        }
        pending_blank = 0;

        out.push_str(&options.indent(depth.saturating_sub(braces.leading_closes)));
        out.push_str(line);
        out.push('\n');

        depth = (depth + braces.opens).saturating_sub(braces.closes);
        after_open = line.ends_with('{');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(source: &str) -> String {
        format(source, &FormatOptions::default())
    }

    #[test]
    fn test_indents_by_depth() {
        let out = fmt("int main(void)\n{\nwhile (1)\n{\nfoo();\n}\n}\n");
        assert_eq!(
            out,
            "int main(void)\n{\n    while (1)\n    {\n        foo();\n    }\n}\n"
        );
    }

    #[test]
    fn test_blank_lines_inside_braces_are_dropped() {
        let out = fmt("{\n\n\nfoo();\n\n}\n");
        assert_eq!(out, "{\n    foo();\n}\n");
    }

    #[test]
    fn test_blank_runs_collapse() {
        let out = fmt("a();\n\n\n\nb();\n");
        assert_eq!(out, "a();\n\nb();\n");
        let none = format(
            "a();\n\n\nb();\n",
            &FormatOptions {
                max_blank_lines: 0,
                ..FormatOptions::default()
            },
        );
        assert_eq!(none, "a();\nb();\n");
    }

    #[test]
    fn test_tabs_and_width() {
        let tabs = FormatOptions {
            indent_with_tabs: true,
            ..FormatOptions::default()
        };
        assert_eq!(format("{\nx;\n}", &tabs), "{\n\tx;\n}\n");
        let two = FormatOptions {
            indent_size: 2,
            ..FormatOptions::default()
        };
        assert_eq!(format("{\n{\nx;\n}\n}", &two), "{\n  {\n    x;\n  }\n}\n");
    }

    #[test]
    fn test_balanced_braces_on_one_line() {
        let out = fmt("{\nSpiDevice d = { &DDRC, &PORTC, PC7 };\nx();\n}\n");
        assert_eq!(
            out,
            "{\n    SpiDevice d = { &DDRC, &PORTC, PC7 };\n    x();\n}\n"
        );
    }

    #[test]
    fn test_braces_in_strings_and_comments_ignored() {
        assert_eq!(scan_braces("print(\"{\"); // }"), Braces::default());
        assert_eq!(
            scan_braces("c = '}';"),
            Braces::default(),
        );
        assert_eq!(
            scan_braces("} else {"),
            Braces {
                opens: 1,
                closes: 1,
                leading_closes: 1
            }
        );
    }

    #[test]
    fn test_unescaped_quote_shifts_indent_only() {
        // The literal closes after `a`, so the `{` counts.
        let source = "{\nprint(\"a\"{\");\nx();\n}\nafter();\n";
        assert_eq!(scan_braces("print(\"a\"{\");").opens, 1);
        let out = fmt(source);
        let trimmed: Vec<&str> = out.lines().map(str::trim).collect();
        assert_eq!(trimmed, ["{", "print(\"a\"{\");", "x();", "}", "after();"]);
        assert_eq!(out.lines().nth(2), Some("        x();"));
    }

    #[test]
    fn test_idempotent() {
        let once = fmt("#include <x.h>\n\nint main(void)\n{\n// init\nfoo();\n\nwhile (1)\n{\n}\n}");
        assert_eq!(fmt(&once), once);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: FormatOptions = serde_json::from_str(r#"{ "indent_size": 2 }"#).unwrap();
        assert_eq!(options.indent_size, 2);
        assert!(!options.indent_with_tabs);
        assert_eq!(options.max_blank_lines, 1);
    }
}
