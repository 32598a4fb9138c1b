//! Derived artifacts computed from the raw bytes of a table file.

use crate::error::{Result, StoreError};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Text used for a missing cell in the XML document.
const MISSING_CELL: &str = "nan";

/// Single-entry zip archive holding `bytes` under `entry_name`.
pub fn archive(entry_name: &str, bytes: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name, options)?;
    zip.write_all(bytes)?;
    Ok(zip.finish()?.into_inner())
}

/// XML rendering of a table file: `<{element}s>` holding one `<{element}>` per row,
/// with one child per column carrying the raw cell text.
pub fn document(element: &str, csv_bytes: &[u8]) -> Result<String> {
    let mut reader = csv::Reader::from_reader(csv_bytes);
    let headers = reader.headers()?.clone();
    let root = format!("{}s", element);

    let mut writer = Writer::new(Vec::new());
    let mut rows = reader.records().peekable();
    if rows.peek().is_none() {
        writer.write_event(Event::Empty(BytesStart::new(root.as_str())))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(root.as_str())))?;
        for row in rows {
            let row = row?;
            writer.write_event(Event::Start(BytesStart::new(element)))?;
            for (name, cell) in headers.iter().zip(row.iter()) {
                let text = if cell.is_empty() { MISSING_CELL } else { cell };
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(element)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;
    }

    String::from_utf8(writer.into_inner())
        .map_err(|_| StoreError::storage("table file is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    const TABLE: &[u8] = b"id,nome,forma_pagamento\n0,Ana & Bia,Pix\n1,Caio,\n";

    #[test]
    fn archive_holds_exact_file_bytes() {
        let bytes = archive("pedido.csv", TABLE).unwrap();
        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(zip.len(), 1);
        let mut entry = zip.by_name("pedido.csv").unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content, TABLE);
    }

    #[test]
    fn document_nests_rows_and_marks_missing_cells() {
        let xml = document("pedido", TABLE).unwrap();
        assert_eq!(
            xml,
            "<pedidos>\
             <pedido><id>0</id><nome>Ana &amp; Bia</nome><forma_pagamento>Pix</forma_pagamento></pedido>\
             <pedido><id>1</id><nome>Caio</nome><forma_pagamento>nan</forma_pagamento></pedido>\
             </pedidos>"
        );
    }

    #[test]
    fn document_of_empty_table_is_an_empty_root() {
        assert_eq!(document("cliente", b"id,nome\n").unwrap(), "<clientes/>");
    }
}
