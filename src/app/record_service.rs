//! The Record Service.
//!
//! This module sits between the HTTP handlers and the table files.
//! It is responsible for:
//! 1.  Loading a model's table file and decoding rows into typed records.
//! 2.  Assigning ids, applying filters, and persisting creates, updates and deletes.
//! 3.  Checking that order rows only point at existing customers and menu items.
//! 4.  Producing the zip, XML and SHA-256 exports of a table file.
//!
//! The service does no locking of its own. Callers serialize access to it
//! (the HTTP state keeps it behind a mutex).

use crate::crypto::hashing::sha256_hex;
use crate::domain::filter::{Filter, Pagination};
use crate::domain::model::{record_id, EntityModel, FieldType, ModelRegistry, Record};
use crate::error::{Result, StoreError};
use crate::storage::codec::{parse_cell, render_cell};
use crate::storage::export;
use crate::storage::table::CsvTable;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

pub struct RecordService {
    data_dir: PathBuf,
    registry: ModelRegistry,
}

impl RecordService {
    /// Opens the service over `data_dir`, creating the directory if needed.
    /// Table files are created lazily on first access.
    pub fn open(data_dir: impl Into<PathBuf>, registry: ModelRegistry) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir, registry })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Looks up the model behind an `{entity}` path segment.
    pub fn model(&self, name: &str) -> Result<Arc<dyn EntityModel>> {
        self.registry
            .get(name)
            .ok_or_else(|| StoreError::NotFound(format!("Unknown entity '{}'", name)))
    }

    fn table(&self, model: &dyn EntityModel) -> CsvTable {
        CsvTable::new(&self.data_dir, &model.file_name(), model.column_names())
    }

    /// Loads every record of the table, creating a header-only file if none exists.
    pub fn ensure_table(&self, model: &dyn EntityModel) -> Result<Vec<Record>> {
        let columns = model.column_names();
        let rows = self.table(model).read_rows()?;

        let mut records = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let mut record = Record::new();
            for (column, cell) in columns.iter().zip(row.iter()) {
                let Some(spec) = model.field(column) else {
                    continue;
                };
                let value = parse_cell(spec, cell).map_err(|msg| {
                    StoreError::storage(format!(
                        "{} row {}, column '{}': {}",
                        model.file_name(),
                        line + 1,
                        column,
                        msg
                    ))
                })?;
                record.insert(column.clone(), value);
            }
            if record_id(model, &record).is_none() {
                return Err(StoreError::storage(format!(
                    "{} row {}: id must be a non-negative integer",
                    model.file_name(),
                    line + 1
                )));
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Records matching `filter`, in file order.
    pub fn list(&self, model: &dyn EntityModel, filter: &Filter) -> Result<Vec<Record>> {
        Ok(self
            .ensure_table(model)?
            .into_iter()
            .filter(|record| filter.matches(model, record))
            .collect())
    }

    /// `list` followed by pagination of the filtered result.
    pub fn list_page(
        &self,
        model: &dyn EntityModel,
        filter: &Filter,
        pagination: Pagination,
    ) -> Result<Vec<Record>> {
        Ok(pagination.apply(self.list(model, filter)?))
    }

    /// First record whose id equals `id`.
    pub fn get(&self, model: &dyn EntityModel, id: u64) -> Result<Record> {
        self.ensure_table(model)?
            .into_iter()
            .find(|record| record_id(model, record) == Some(id))
            .ok_or_else(|| not_found(model, id))
    }

    /// Validates `payload`, assigns the next id and appends the record.
    pub fn create(&self, model: &dyn EntityModel, payload: &JsonValue) -> Result<Record> {
        let body = model.validate_create_payload(payload)?;
        self.check_references(model, &body)?;

        let records = self.ensure_table(model)?;
        let new_id = match records.iter().filter_map(|record| record_id(model, record)).max() {
            None => 0,
            Some(max) => next_id(max).ok_or_else(|| {
                StoreError::storage(format!(
                    "{} has no id left after {}",
                    model.file_name(),
                    max
                ))
            })?,
        };

        let record = with_id(model, new_id, body);
        self.table(model).append_row(&encode_row(model, &record))?;

        info!(entity = model.table_name(), id = new_id, "record created");
        Ok(record)
    }

    /// Replaces every non-id field of record `id` and rewrites the table.
    pub fn update(&self, model: &dyn EntityModel, id: u64, payload: &JsonValue) -> Result<Record> {
        let body = model.validate_update_payload(payload)?;

        let mut records = self.ensure_table(model)?;
        let index = records
            .iter()
            .position(|record| record_id(model, record) == Some(id))
            .ok_or_else(|| not_found(model, id))?;

        self.check_references(model, &body)?;

        let record = with_id(model, id, body);
        records[index] = record.clone();
        self.rewrite(model, &records)?;

        info!(entity = model.table_name(), id, "record updated");
        Ok(record)
    }

    /// Removes record `id` and rewrites the table. Returns the deleted id.
    pub fn delete(&self, model: &dyn EntityModel, id: u64) -> Result<u64> {
        let mut records = self.ensure_table(model)?;
        if records.is_empty() {
            return Err(StoreError::NotFound(format!(
                "No {} records stored",
                model.label().to_lowercase()
            )));
        }

        let before = records.len();
        records.retain(|record| record_id(model, record) != Some(id));
        if records.len() == before {
            return Err(not_found(model, id));
        }
        self.rewrite(model, &records)?;

        info!(entity = model.table_name(), id, "record deleted");
        Ok(id)
    }

    pub fn count(&self, model: &dyn EntityModel) -> Result<usize> {
        Ok(self.ensure_table(model)?.len())
    }

    /// Zip archive whose only entry is the table file, byte for byte.
    pub fn export_archive(&self, model: &dyn EntityModel) -> Result<Vec<u8>> {
        let table = self.table(model);
        export::archive(&table.file_name(), &table.read_raw()?)
    }

    pub fn export_document(&self, model: &dyn EntityModel) -> Result<String> {
        let raw = self.table(model).read_raw()?;
        export::document(model.element_name(), &raw)
    }

    /// Lowercase hex SHA-256 of the table file.
    pub fn export_digest(&self, model: &dyn EntityModel) -> Result<String> {
        Ok(sha256_hex(&self.table(model).read_raw()?))
    }

    fn rewrite(&self, model: &dyn EntityModel, records: &[Record]) -> Result<()> {
        let rows: Vec<Vec<String>> = records.iter().map(|r| encode_row(model, r)).collect();
        self.table(model).rewrite(&rows)
    }

    /// Every `references` field must point at ids present in the referenced table.
    /// Fails on the first missing id, in field order then list order.
    fn check_references(&self, model: &dyn EntityModel, body: &Record) -> Result<()> {
        let mut known: HashMap<&str, HashSet<u64>> = HashMap::new();

        for spec in model.fields() {
            let Some(target_name) = spec.references else {
                continue;
            };
            let wanted: Vec<i64> = match body.get(spec.name) {
                Some(JsonValue::Array(items)) => items.iter().filter_map(JsonValue::as_i64).collect(),
                Some(v) => v.as_i64().into_iter().collect(),
                None => Vec::new(),
            };
            if wanted.is_empty() {
                continue;
            }

            let target = self.registry.get(target_name).ok_or_else(|| {
                StoreError::storage(format!(
                    "{}.{} references unregistered table '{}'",
                    model.table_name(),
                    spec.name,
                    target_name
                ))
            })?;
            if !known.contains_key(target_name) {
                let ids = self
                    .ensure_table(target.as_ref())?
                    .iter()
                    .filter_map(|record| record_id(target.as_ref(), record))
                    .collect();
                known.insert(target_name, ids);
            }
            let ids = &known[target_name];

            if let Some(missing) = wanted
                .iter()
                .find(|id| u64::try_from(**id).map_or(true, |id| !ids.contains(&id)))
            {
                warn!(
                    entity = model.table_name(),
                    field = spec.name,
                    missing,
                    "reference to missing record"
                );
                return Err(StoreError::NotFound(format!(
                    "{} with id {} not found (referenced by {})",
                    target.label(),
                    missing,
                    spec.name
                )));
            }
        }
        Ok(())
    }
}

fn not_found(model: &dyn EntityModel, id: u64) -> StoreError {
    StoreError::NotFound(format!("{} {} not found", model.label(), id))
}

/// Id cells are read back as `i64`, so ids stop at `i64::MAX`.
fn next_id(max: u64) -> Option<u64> {
    max.checked_add(1).filter(|id| *id <= i64::MAX as u64)
}

fn with_id(model: &dyn EntityModel, id: u64, body: Record) -> Record {
    let mut record = Record::new();
    record.insert(model.primary_key_field().to_string(), JsonValue::from(id));
    record.extend(body);
    record
}

fn encode_row(model: &dyn EntityModel, record: &Record) -> Vec<String> {
    model
        .column_names()
        .iter()
        .map(|column| {
            let field_type = model
                .field(column)
                .map(|spec| spec.field_type)
                .unwrap_or(FieldType::Text);
            render_cell(field_type, record.get(column.as_str()).unwrap_or(&JsonValue::Null))
        })
        .collect()
}
