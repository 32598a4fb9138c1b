//! File-backed table storage: CSV cell codec, table files, and export artifacts.

pub mod codec;
pub mod export;
pub mod table;

pub use table::CsvTable;
