//! Declarative field descriptors shared by every entity model.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;

/// Column type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Float,
    Text,
    Bool,
    /// `YYYY-MM-DD`
    Date,
    /// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]`
    DateTime,
    /// One of a closed set of literals.
    Enum(&'static [&'static str]),
    IntList,
}

impl FieldType {
    pub fn describe(&self) -> String {
        match self {
            FieldType::Int => "int".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Text => "string".to_string(),
            FieldType::Bool => "bool".to_string(),
            FieldType::Date => "date (YYYY-MM-DD)".to_string(),
            FieldType::DateTime => "datetime (ISO 8601)".to_string(),
            FieldType::Enum(allowed) => format!("one of {:?}", allowed),
            FieldType::IntList => "list of int".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Table whose ids this field must point at.
    pub references: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            references: None,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            references: None,
        }
    }

    pub const fn references(mut self, table: &'static str) -> Self {
        self.references = Some(table);
        self
    }

    /// Identifier fields are filtered by exact match instead of substring.
    pub fn is_identifier(&self) -> bool {
        self.name == "id" || self.references.is_some()
    }
}

/// The `id` column every table starts with.
pub const PRIMARY_KEY: FieldSpec = FieldSpec::required("id", FieldType::Int);

/// Short name of a JSON value's kind, used in validation reports.
pub fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Coerces a submitted JSON value to the canonical value stored for `field_type`.
///
/// Lenient on representation (`"8.5"` for a float, `"true"` for a bool), strict on content.
pub fn coerce_value(field_type: FieldType, v: &JsonValue) -> Result<JsonValue, String> {
    match field_type {
        FieldType::Int => {
            if let Some(n) = v.as_i64() {
                return Ok(JsonValue::from(n));
            }
            if let Some(s) = v.as_str() {
                let parsed = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| "expected int".to_string())?;
                return Ok(JsonValue::from(parsed));
            }
            Err("expected int".to_string())
        }
        FieldType::Float => {
            let parsed = if let Some(f) = v.as_f64() {
                f
            } else if let Some(s) = v.as_str() {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| "expected float".to_string())?
            } else {
                return Err("expected float".to_string());
            };
            if !parsed.is_finite() {
                return Err("expected a finite float".to_string());
            }
            Ok(JsonValue::from(parsed))
        }
        FieldType::Text => {
            if let Some(s) = v.as_str() {
                return Ok(JsonValue::from(s));
            }
            if v.is_number() || v.is_boolean() {
                return Ok(JsonValue::from(v.to_string()));
            }
            Err("expected string".to_string())
        }
        FieldType::Bool => {
            if let Some(b) = v.as_bool() {
                return Ok(JsonValue::from(b));
            }
            if let Some(s) = v.as_str() {
                return parse_bool(s)
                    .map(JsonValue::from)
                    .ok_or_else(|| "expected bool".to_string());
            }
            Err("expected bool".to_string())
        }
        FieldType::Date => {
            let s = v.as_str().ok_or_else(|| "expected date string".to_string())?;
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| "expected date (YYYY-MM-DD)".to_string())?;
            Ok(JsonValue::from(s.trim()))
        }
        FieldType::DateTime => {
            let s = v
                .as_str()
                .ok_or_else(|| "expected datetime string".to_string())?;
            if !is_datetime(s.trim()) {
                return Err("expected ISO 8601 datetime".to_string());
            }
            Ok(JsonValue::from(s.trim()))
        }
        FieldType::Enum(allowed) => {
            let s = v.as_str().ok_or_else(|| "expected string".to_string())?;
            if allowed.contains(&s) {
                Ok(JsonValue::from(s))
            } else {
                Err(format!("expected one of {:?}", allowed))
            }
        }
        FieldType::IntList => {
            let items = v.as_array().ok_or_else(|| "expected array".to_string())?;
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let n = item
                    .as_i64()
                    .ok_or_else(|| "expected array of int".to_string())?;
                out.push(JsonValue::from(n));
            }
            Ok(JsonValue::Array(out))
        }
    }
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

fn is_datetime(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUS: FieldType = FieldType::Enum(&["Em aberto", "Fechado"]);

    #[test]
    fn numeric_strings_are_coerced() {
        assert_eq!(coerce_value(FieldType::Int, &json!("42")).unwrap(), json!(42));
        assert_eq!(coerce_value(FieldType::Float, &json!("8.5")).unwrap(), json!(8.5));
        assert_eq!(coerce_value(FieldType::Float, &json!(3)).unwrap(), json!(3.0));
        assert!(coerce_value(FieldType::Int, &json!("abc")).is_err());
    }

    #[test]
    fn enum_requires_exact_literal() {
        assert_eq!(coerce_value(STATUS, &json!("Fechado")).unwrap(), json!("Fechado"));
        assert!(coerce_value(STATUS, &json!("fechado")).is_err());
        assert!(coerce_value(STATUS, &json!(1)).is_err());
    }

    #[test]
    fn dates_and_datetimes_are_validated() {
        assert!(coerce_value(FieldType::Date, &json!("1990-05-17")).is_ok());
        assert!(coerce_value(FieldType::Date, &json!("17/05/1990")).is_err());
        assert!(coerce_value(FieldType::DateTime, &json!("2024-03-01T12:30:00")).is_ok());
        assert!(coerce_value(FieldType::DateTime, &json!("2024-03-01T12:30:00-03:00")).is_ok());
        assert!(coerce_value(FieldType::DateTime, &json!("yesterday")).is_err());
    }

    #[test]
    fn int_list_rejects_mixed_items() {
        assert_eq!(
            coerce_value(FieldType::IntList, &json!([1, 2])).unwrap(),
            json!([1, 2])
        );
        assert!(coerce_value(FieldType::IntList, &json!([1, "x"])).is_err());
        assert!(coerce_value(FieldType::IntList, &json!(1)).is_err());
    }

    #[test]
    fn bool_accepts_common_spellings() {
        assert_eq!(coerce_value(FieldType::Bool, &json!("True")).unwrap(), json!(true));
        assert_eq!(coerce_value(FieldType::Bool, &json!("0")).unwrap(), json!(false));
        assert!(coerce_value(FieldType::Bool, &json!("maybe")).is_err());
    }
}
