//! Domain model definitions for the flat-file entities.

use crate::error::{FieldError, Result, StoreError};
use serde_json::Value as JsonValue;

pub mod entities;
pub mod registry;
pub mod schema;

pub use entities::{CardapioModel, ClienteModel, PedidoModel};
pub use registry::ModelRegistry;
pub use schema::{FieldSpec, FieldType, PRIMARY_KEY};

/// One row of a table: field name to value, `id` first, then schema order.
pub type Record = serde_json::Map<String, JsonValue>;

/// Trait that defines the contract for any entity stored as a table file.
///
/// The store works with any model through this trait. Each model provides:
/// - Table name (also the base name of the backing file)
/// - The ordered field schema, excluding `id`
/// - Optional defaults for omitted fields
pub trait EntityModel: Send + Sync {
    /// Returns the table name, e.g. `cardapio`.
    fn table_name(&self) -> &str;

    /// Human-readable singular name used in messages, e.g. `Menu item`.
    fn label(&self) -> &str;

    /// Ordered field schema, excluding the primary key.
    fn fields(&self) -> &[FieldSpec];

    fn primary_key_field(&self) -> &str {
        PRIMARY_KEY.name
    }

    fn file_name(&self) -> String {
        format!("{}.csv", self.table_name())
    }

    /// XML element name for one record. The document root is this name plus `s`.
    fn element_name(&self) -> &str {
        self.table_name()
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        if name == self.primary_key_field() {
            return Some(&PRIMARY_KEY);
        }
        self.fields().iter().find(|f| f.name == name)
    }

    /// Header row of the backing file.
    fn column_names(&self) -> Vec<String> {
        std::iter::once(self.primary_key_field())
            .chain(self.fields().iter().map(|f| f.name))
            .map(str::to_string)
            .collect()
    }

    /// Value used when a field is omitted from a submitted record.
    fn default_value(&self, _field: &str) -> Option<JsonValue> {
        None
    }

    /// Validates and coerces a submitted record body.
    ///
    /// Returns the body in schema order without `id`. Any `id` in the payload is ignored.
    /// All field problems are collected into a single validation error.
    fn validate_create_payload(&self, payload: &JsonValue) -> Result<Record> {
        let obj = payload
            .as_object()
            .ok_or_else(|| StoreError::validation(format!("{} must be a JSON object", self.label())))?;

        let mut errors = Vec::new();
        for (key, value) in obj {
            if key != self.primary_key_field() && self.field(key).is_none() {
                errors.push(FieldError {
                    field: key.clone(),
                    expected: "no such field".to_string(),
                    got: schema::json_kind(value).to_string(),
                });
            }
        }

        let mut out = Record::new();
        for spec in self.fields() {
            let submitted = match obj.get(spec.name) {
                Some(JsonValue::Null) | None => self.default_value(spec.name),
                Some(v) => Some(v.clone()),
            };
            match submitted {
                None if spec.required => errors.push(FieldError {
                    field: spec.name.to_string(),
                    expected: spec.field_type.describe(),
                    got: "missing".to_string(),
                }),
                None => {
                    out.insert(spec.name.to_string(), JsonValue::Null);
                }
                Some(v) => match schema::coerce_value(spec.field_type, &v) {
                    Ok(cv) => {
                        out.insert(spec.name.to_string(), cv);
                    }
                    Err(msg) => errors.push(FieldError {
                        field: spec.name.to_string(),
                        expected: msg,
                        got: schema::json_kind(&v).to_string(),
                    }),
                },
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(StoreError::Validation {
                message: format!("Invalid {} payload", self.label().to_lowercase()),
                errors,
            })
        }
    }

    /// Updates replace the whole body, so they validate exactly like creates.
    fn validate_update_payload(&self, payload: &JsonValue) -> Result<Record> {
        self.validate_create_payload(payload)
    }
}

/// Reads the `id` of a record, if it holds a non-negative integer.
pub fn record_id(model: &dyn EntityModel, record: &Record) -> Option<u64> {
    record.get(model.primary_key_field()).and_then(JsonValue::as_u64)
}
