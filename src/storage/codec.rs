//! Cell encoding between typed field values and CSV text.

use crate::domain::model::schema::{parse_bool, FieldSpec, FieldType};
use serde_json::Value as JsonValue;

/// Renders a field value as the text stored in its CSV cell.
///
/// This is also the text that filters match against.
pub fn render_cell(field_type: FieldType, value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(true) => "True".to_string(),
        JsonValue::Bool(false) => "False".to_string(),
        JsonValue::Number(n) => match (field_type, n.as_f64()) {
            (FieldType::Float, Some(f)) => render_float(f),
            _ => n.to_string(),
        },
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => {
            let inner: Vec<String> = items
                .iter()
                .map(|item| render_cell(FieldType::Int, item))
                .collect();
            format!("[{}]", inner.join(", "))
        }
        JsonValue::Object(_) => value.to_string(),
    }
}

// Floats always keep a decimal point so `8.0` does not read back as an int.
fn render_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Parses a CSV cell back into the value of `field`.
pub fn parse_cell(field: &FieldSpec, raw: &str) -> Result<JsonValue, String> {
    if raw.is_empty() {
        return Ok(match field.field_type {
            FieldType::Text if field.required => JsonValue::from(""),
            FieldType::IntList if field.required => JsonValue::Array(Vec::new()),
            _ => JsonValue::Null,
        });
    }

    match field.field_type {
        FieldType::Int => parse_int(raw).map(JsonValue::from),
        FieldType::Float => raw
            .trim()
            .parse::<f64>()
            .map(JsonValue::from)
            .map_err(|_| format!("expected float, found '{}'", raw)),
        FieldType::Bool => parse_bool(raw)
            .map(JsonValue::from)
            .ok_or_else(|| format!("expected bool, found '{}'", raw)),
        FieldType::Text | FieldType::Date | FieldType::DateTime => Ok(JsonValue::from(raw)),
        FieldType::Enum(allowed) => {
            if allowed.contains(&raw) {
                Ok(JsonValue::from(raw))
            } else {
                Err(format!("'{}' is not one of {:?}", raw, allowed))
            }
        }
        FieldType::IntList => {
            let inner = raw
                .trim()
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .ok_or_else(|| format!("expected list, found '{}'", raw))?;
            if inner.trim().is_empty() {
                return Ok(JsonValue::Array(Vec::new()));
            }
            inner
                .split(',')
                .map(|item| parse_int(item).map(JsonValue::from))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array)
        }
    }
}

// Accepts `3.0` as well, which is how other tools write int columns holding blanks.
fn parse_int(raw: &str) -> Result<i64, String> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
        _ => Err(format!("expected int, found '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ITENS: FieldSpec = FieldSpec::required("itens", FieldType::IntList);
    const PRECO: FieldSpec = FieldSpec::required("preco", FieldType::Float);
    const PAGAMENTO: FieldSpec =
        FieldSpec::optional("forma_pagamento", FieldType::Enum(&["Pix", "Cartão"]));

    #[test]
    fn renders_scalars_like_the_table_file() {
        assert_eq!(render_cell(FieldType::Float, &json!(8.5)), "8.5");
        assert_eq!(render_cell(FieldType::Float, &json!(8.0)), "8.0");
        assert_eq!(render_cell(FieldType::Int, &json!(7)), "7");
        assert_eq!(render_cell(FieldType::Bool, &json!(true)), "True");
        assert_eq!(render_cell(FieldType::IntList, &json!([1, 2])), "[1, 2]");
        assert_eq!(render_cell(FieldType::Text, &JsonValue::Null), "");
    }

    #[test]
    fn parses_cells_back_to_typed_values() {
        assert_eq!(parse_cell(&PRECO, "8.5").unwrap(), json!(8.5));
        assert_eq!(parse_cell(&ITENS, "[1, 2]").unwrap(), json!([1, 2]));
        assert_eq!(parse_cell(&ITENS, "[]").unwrap(), json!([]));
        assert_eq!(parse_cell(&PAGAMENTO, "").unwrap(), JsonValue::Null);
        assert_eq!(parse_cell(&PAGAMENTO, "Pix").unwrap(), json!("Pix"));
        assert_eq!(
            parse_cell(&FieldSpec::required("id", FieldType::Int), "3.0").unwrap(),
            json!(3)
        );
    }

    #[test]
    fn rejects_cells_of_the_wrong_type() {
        assert!(parse_cell(&PRECO, "cheap").is_err());
        assert!(parse_cell(&ITENS, "1, 2").is_err());
        assert!(parse_cell(&PAGAMENTO, "Cheque").is_err());
    }
}
