//! A single CSV file holding one table.
//!
//! The file always starts with a header row naming the schema columns in order.
//! Every write lands in a temporary file in the same directory that is synced and
//! then renamed over the table file, so readers only ever see complete tables.

use crate::error::{Result, StoreError};
use csv::StringRecord;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct CsvTable {
    path: PathBuf,
    header: Vec<String>,
}

impl CsvTable {
    pub fn new(data_dir: &Path, file_name: &str, header: Vec<String>) -> Self {
        Self {
            path: data_dir.join(file_name),
            header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name inside the data directory, e.g. `cardapio.csv`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Creates the file with only the header row if it is missing or empty.
    pub fn ensure(&self) -> Result<()> {
        let is_populated = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !is_populated {
            if let Some(dir) = self.path.parent() {
                fs::create_dir_all(dir)?;
            }
            let bytes = self.encode_rows(&[])?;
            self.write_atomic(&bytes)?;
            tracing::debug!(file = %self.file_name(), "created table file with header only");
        }
        Ok(())
    }

    /// Raw file bytes, after making sure the file exists.
    pub fn read_raw(&self) -> Result<Vec<u8>> {
        self.ensure()?;
        Ok(fs::read(&self.path)?)
    }

    /// All data rows in file order. Fails if the header does not match the schema
    /// or a row has the wrong number of cells.
    pub fn read_rows(&self) -> Result<Vec<StringRecord>> {
        let raw = self.read_raw()?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(raw.as_slice());

        let found: Vec<&str> = reader.headers()?.iter().collect();
        if found != self.header.iter().map(String::as_str).collect::<Vec<_>>() {
            return Err(StoreError::storage(format!(
                "header of {} is {:?}, expected {:?}",
                self.file_name(),
                found,
                self.header
            )));
        }

        let mut rows = Vec::new();
        for row in reader.records() {
            rows.push(row?);
        }
        Ok(rows)
    }

    /// Appends one row. The existing bytes and the new row go out in a single write.
    pub fn append_row(&self, row: &[String]) -> Result<()> {
        let mut bytes = self.read_raw()?;
        if !bytes.is_empty() && !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(row)?;
        bytes.extend_from_slice(&self.finish(writer)?);
        self.write_atomic(&bytes)
    }

    /// Replaces the whole file with the header plus `rows`.
    pub fn rewrite(&self, rows: &[Vec<String>]) -> Result<()> {
        let bytes = self.encode_rows(rows)?;
        self.write_atomic(&bytes)
    }

    fn encode_rows(&self, rows: &[Vec<String>]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        self.finish(writer)
    }

    fn finish(&self, writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
        writer
            .into_inner()
            .map_err(|e| StoreError::storage(format!("failed to encode rows: {}", e.error())))
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        // The temp file is created owner-only; keep the mode the table file already had.
        match fs::metadata(&self.path) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::from(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn header() -> Vec<String> {
        vec!["id".to_string(), "nome".to_string()]
    }

    fn row(id: &str, nome: &str) -> Vec<String> {
        vec![id.to_string(), nome.to_string()]
    }

    #[test]
    fn ensure_writes_header_only() {
        let dir = tempdir().unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        table.ensure().unwrap();
        assert_eq!(fs::read_to_string(table.path()).unwrap(), "id,nome\n");
        assert!(table.read_rows().unwrap().is_empty());
    }

    #[test]
    fn empty_file_is_treated_as_missing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cliente.csv"), "").unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        assert!(table.read_rows().unwrap().is_empty());
        assert_eq!(fs::read_to_string(table.path()).unwrap(), "id,nome\n");
    }

    #[test]
    fn append_keeps_existing_bytes() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cliente.csv"), "id,nome\n0,Ana").unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        table.append_row(&row("1", "Bruno, Jr.")).unwrap();
        assert_eq!(
            fs::read_to_string(table.path()).unwrap(),
            "id,nome\n0,Ana\n1,\"Bruno, Jr.\"\n"
        );
        assert_eq!(table.read_rows().unwrap().len(), 2);
    }

    #[test]
    fn rewrite_replaces_all_rows() {
        let dir = tempdir().unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        table.append_row(&row("0", "Ana")).unwrap();
        table.append_row(&row("1", "Bruno")).unwrap();
        table.rewrite(&[row("1", "Bruno")]).unwrap();
        assert_eq!(fs::read_to_string(table.path()).unwrap(), "id,nome\n1,Bruno\n");
    }

    #[cfg(unix)]
    #[test]
    fn writes_keep_the_table_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        table.ensure().unwrap();
        fs::set_permissions(table.path(), fs::Permissions::from_mode(0o644)).unwrap();

        table.append_row(&row("0", "Ana")).unwrap();
        let mode = fs::metadata(table.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        table.rewrite(&[]).unwrap();
        let mode = fs::metadata(table.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn mismatched_header_is_a_storage_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cliente.csv"), "nome,id\nAna,0\n").unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        assert!(matches!(table.read_rows(), Err(StoreError::StorageIo(_))));
    }

    #[test]
    fn short_row_is_a_storage_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("cliente.csv"), "id,nome\n0\n").unwrap();
        let table = CsvTable::new(dir.path(), "cliente.csv", header());
        assert!(matches!(table.read_rows(), Err(StoreError::StorageIo(_))));
    }
}
