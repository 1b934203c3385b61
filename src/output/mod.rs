//! Rendering of matched values.
//!
//! Unlabeled queries print one line per match: strings verbatim, other
//! values as compact JSON, null as nothing. Labeled queries print a shell
//! assignment for `eval`:
//!
//! ```text
//! export NAME=<items>;
//! ```
//!
//! where the items depend on the kind of the matched value. Objects list
//! their keys, arrays their indices, scalars their value, and null nothing.

pub mod shell;

use std::io::{self, Write};

use serde_json::{Number, Value};

use shell::{quote, FieldJoiner};

/// What to print for a matched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Print the value itself (`-e`).
    Value,
    /// Print the name of the value's type (`-t`).
    Type,
}

/// Name of the JSON type of `value`.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Writes one query result in the requested mode.
pub fn write_result<W: Write>(
    out: &mut W,
    mode: OutputMode,
    label: Option<&str>,
    value: &Value,
    separator: &str,
) -> io::Result<()> {
    match mode {
        OutputMode::Value => write_value(out, label, value, separator),
        OutputMode::Type => write_type(out, label, value),
    }
}

/// Writes a matched value, as a plain line or as an `export` statement.
pub fn write_value<W: Write>(
    out: &mut W,
    label: Option<&str>,
    value: &Value,
    separator: &str,
) -> io::Result<()> {
    let Some(name) = label else {
        return match value {
            Value::Null => Ok(()),
            Value::String(s) => writeln!(out, "{}", s),
            other => writeln!(out, "{}", other),
        };
    };

    let mut joiner = FieldJoiner::new(separator);
    write!(out, "export {}=", name)?;

    match value {
        Value::Object(members) => {
            for (key, member) in members {
                if member.is_null() {
                    continue;
                }
                write!(out, "{}{}", joiner.next_separator(), quote(key))?;
            }
        }
        Value::Array(items) => {
            for idx in 0..items.len() {
                write!(out, "{}{}", joiner.next_separator(), idx)?;
            }
        }
        Value::Bool(b) => write!(out, "{}{}", joiner.next_separator(), u8::from(*b))?,
        Value::Number(n) => write!(out, "{}{}", joiner.next_separator(), format_number(n))?,
        Value::String(s) => write!(out, "{}{}", joiner.next_separator(), quote(s))?,
        Value::Null => {}
    }

    write!(out, "; ")
}

/// Writes the type name of a matched value.
pub fn write_type<W: Write>(out: &mut W, label: Option<&str>, value: &Value) -> io::Result<()> {
    match label {
        Some(name) => write!(out, "export {}={}; ", name, type_name(value)),
        None => writeln!(out, "{}", type_name(value)),
    }
}

/// Integers print as-is, floats with six decimals.
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        format!("{:.6}", n.as_f64().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_value(label: Option<&str>, value: &Value) -> String {
        let mut out = Vec::new();
        write_value(&mut out, label, value, " ").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&Value::Null), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(1)), "int");
        assert_eq!(type_name(&json!(1.5)), "double");
        assert_eq!(type_name(&json!("s")), "string");
        assert_eq!(type_name(&json!([])), "array");
        assert_eq!(type_name(&json!({})), "object");
    }

    #[test]
    fn test_unlabeled_values() {
        assert_eq!(render_value(None, &json!("hi")), "hi\n");
        assert_eq!(render_value(None, &json!(5)), "5\n");
        assert_eq!(render_value(None, &json!({"a": [1, 2]})), "{\"a\":[1,2]}\n");
        assert_eq!(render_value(None, &Value::Null), "");
    }

    #[test]
    fn test_export_scalars() {
        assert_eq!(render_value(Some("A"), &json!("it's")), "export A='it'\"'\"'s'; ");
        assert_eq!(render_value(Some("A"), &json!(42)), "export A=42; ");
        assert_eq!(render_value(Some("A"), &json!(1.5)), "export A=1.500000; ");
        assert_eq!(render_value(Some("A"), &json!(true)), "export A=1; ");
        assert_eq!(render_value(Some("A"), &json!(false)), "export A=0; ");
    }

    #[test]
    fn test_export_null_is_empty_assignment() {
        assert_eq!(render_value(Some("A"), &Value::Null), "export A=; ");
    }

    #[test]
    fn test_export_object_keys_skip_null_members() {
        let value = json!({"b": 1, "skip": null, "a": "x"});
        assert_eq!(render_value(Some("K"), &value), "export K='b'\\ 'a'; ");
    }

    #[test]
    fn test_export_array_indices() {
        let mut out = Vec::new();
        write_value(&mut out, Some("I"), &json!(["x", "y", "z"]), ",").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "export I=0,1,2; ");
    }

    #[test]
    fn test_write_type() {
        let mut out = Vec::new();
        write_type(&mut out, None, &json!([1])).unwrap();
        write_type(&mut out, Some("T"), &json!("s")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "array\nexport T=string; ");
    }

    #[test]
    fn test_write_result_dispatches_on_mode() {
        let mut out = Vec::new();
        write_result(&mut out, OutputMode::Type, None, &json!(1), " ").unwrap();
        write_result(&mut out, OutputMode::Value, None, &json!(1), " ").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "int\n1\n");
    }
}
