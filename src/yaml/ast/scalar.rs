//! Scalar values
//!
//!     Plain scalars are resolved with the YAML 1.2 core schema patterns below. Quoted scalars
//!     are always strings; their raw token text is decoded here (escape sequences for double
//!     quotes, doubled quotes for single quotes).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use super::node::ScalarStyle;

/// A resolved scalar value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(x) if x.is_nan() => write!(f, ".nan"),
            ScalarValue::Float(x) if x.is_infinite() => {
                write!(f, "{}.inf", if *x < 0.0 { "-" } else { "" })
            }
            ScalarValue::Float(x) => write!(f, "{:?}", x),
            ScalarValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

const SCALAR_PATTERNS: &[(&str, &str)] = &[
    ("null", r"^(?:~|null|Null|NULL)$"),
    ("bool", r"^(?:true|True|TRUE|false|False|FALSE)$"),
    ("int", r"^[-+]?[0-9]+$"),
    ("int_octal", r"^0o[0-7]+$"),
    ("int_hex", r"^0x[0-9a-fA-F]+$"),
    (
        "float",
        r"^[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?$",
    ),
    ("float_inf", r"^[-+]?\.(?:inf|Inf|INF)$"),
    ("float_nan", r"^\.(?:nan|NaN|NAN)$"),
];

static COMPILED_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SCALAR_PATTERNS
        .iter()
        .filter_map(|(name, pattern)| Regex::new(pattern).ok().map(|regex| (*name, regex)))
        .collect()
});

/// Resolve the text of a plain (unquoted) scalar.
pub fn resolve_plain(text: &str) -> ScalarValue {
    if text.is_empty() {
        return ScalarValue::Null;
    }
    let matched = COMPILED_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(text))
        .map(|(name, _)| *name);

    match matched {
        Some("null") => ScalarValue::Null,
        Some("bool") => ScalarValue::Bool(text.eq_ignore_ascii_case("true")),
        Some("int") => text
            .parse::<i64>()
            .map(ScalarValue::Integer)
            .or_else(|_| text.parse::<f64>().map(ScalarValue::Float))
            .unwrap_or_else(|_| ScalarValue::String(text.to_string())),
        Some("int_octal") => radix(&text[2..], 8, text),
        Some("int_hex") => radix(&text[2..], 16, text),
        Some("float") => text
            .parse::<f64>()
            .map(ScalarValue::Float)
            .unwrap_or_else(|_| ScalarValue::String(text.to_string())),
        Some("float_inf") if text.starts_with('-') => ScalarValue::Float(f64::NEG_INFINITY),
        Some("float_inf") => ScalarValue::Float(f64::INFINITY),
        Some("float_nan") => ScalarValue::Float(f64::NAN),
        _ => ScalarValue::String(text.to_string()),
    }
}

fn radix(digits: &str, base: u32, text: &str) -> ScalarValue {
    i64::from_str_radix(digits, base)
        .map(ScalarValue::Integer)
        .unwrap_or_else(|_| ScalarValue::String(text.to_string()))
}

/// Value of a scalar written in `style`. Quoted scalars are always strings.
pub fn resolve(raw: &str, style: ScalarStyle) -> ScalarValue {
    match style {
        ScalarStyle::Plain => resolve_plain(raw),
        _ => ScalarValue::String(decode(raw, style)),
    }
}

/// Text of a scalar written in `style`, with escapes decoded. Used for keys.
pub fn decode(raw: &str, style: ScalarStyle) -> String {
    match style {
        ScalarStyle::Plain => raw.to_string(),
        ScalarStyle::SingleQuoted => decode_single_quoted(raw),
        ScalarStyle::DoubleQuoted => decode_double_quoted(raw),
    }
}

/// Decode the raw content of a double-quoted scalar.
///
/// Unknown escapes are kept as written.
pub fn decode_double_quoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some(escaped) => escaped,
            None => {
                out.push('\\');
                break;
            }
        };
        match escaped {
            '0' => out.push('\0'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            't' | '\t' => out.push('\t'),
            'n' => out.push('\n'),
            'v' => out.push('\u{0b}'),
            'f' => out.push('\u{0c}'),
            'r' => out.push('\r'),
            'e' => out.push('\u{1b}'),
            ' ' => out.push(' '),
            '"' => out.push('"'),
            '/' => out.push('/'),
            '\\' => out.push('\\'),
            'N' => out.push('\u{85}'),
            '_' => out.push('\u{a0}'),
            'L' => out.push('\u{2028}'),
            'P' => out.push('\u{2029}'),
            'x' | 'u' | 'U' => {
                let width = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars.clone().take(width).collect();
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => {
                        out.push(ch);
                        for _ in 0..width {
                            chars.next();
                        }
                    }
                    None => {
                        out.push('\\');
                        out.push(escaped);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Decode the raw content of a single-quoted scalar (`''` is a literal quote).
pub fn decode_single_quoted(raw: &str) -> String {
    raw.replace("''", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ScalarValue::Null)]
    #[case("~", ScalarValue::Null)]
    #[case("null", ScalarValue::Null)]
    #[case("True", ScalarValue::Bool(true))]
    #[case("FALSE", ScalarValue::Bool(false))]
    #[case("42", ScalarValue::Integer(42))]
    #[case("-7", ScalarValue::Integer(-7))]
    #[case("0o17", ScalarValue::Integer(15))]
    #[case("0xff", ScalarValue::Integer(255))]
    #[case("3.5", ScalarValue::Float(3.5))]
    #[case("1e3", ScalarValue::Float(1000.0))]
    #[case("-.inf", ScalarValue::Float(f64::NEG_INFINITY))]
    #[case("yes", ScalarValue::String("yes".to_string()))]
    #[case("1.2.3", ScalarValue::String("1.2.3".to_string()))]
    #[case("hello world", ScalarValue::String("hello world".to_string()))]
    fn test_resolve_plain(#[case] text: &str, #[case] expected: ScalarValue) {
        assert_eq!(resolve_plain(text), expected);
    }

    #[test]
    fn test_nan() {
        assert!(matches!(resolve_plain(".nan"), ScalarValue::Float(x) if x.is_nan()));
    }

    #[test]
    fn test_oversized_integer_becomes_float() {
        assert_eq!(
            resolve_plain("12345678901234567890"),
            ScalarValue::Float(12345678901234567890.0)
        );
    }

    #[test]
    fn test_decode_double_quoted() {
        assert_eq!(decode_double_quoted(r#"he said \"hi\""#), "he said \"hi\"");
        assert_eq!(decode_double_quoted(r"a\tb\nc\\d"), "a\tb\nc\\d");
        assert_eq!(decode_double_quoted(r"\x41\u00e9\U0001F600"), "Aé😀");
        assert_eq!(decode_double_quoted(r"\q\u12"), r"\q\u12");
    }

    #[test]
    fn test_decode_single_quoted() {
        assert_eq!(decode_single_quoted("it''s"), "it's");
        assert_eq!(decode_single_quoted(r"C:\path"), r"C:\path");
    }

    #[test]
    fn test_quoted_scalars_stay_strings() {
        assert_eq!(
            resolve("42", ScalarStyle::SingleQuoted),
            ScalarValue::String("42".to_string())
        );
        assert_eq!(resolve("42", ScalarStyle::Plain), ScalarValue::Integer(42));
        assert_eq!(decode(r"a\tb", ScalarStyle::DoubleQuoted), "a\tb");
    }

    #[test]
    fn test_display() {
        assert_eq!(ScalarValue::Null.to_string(), "null");
        assert_eq!(ScalarValue::Float(1.0).to_string(), "1.0");
        assert_eq!(ScalarValue::String("a b".into()).to_string(), "\"a b\"");
        assert_eq!(ScalarValue::Float(f64::NEG_INFINITY).to_string(), "-.inf");
    }
}
