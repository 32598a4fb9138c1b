pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::record_service::RecordService;
pub use crypto::hashing::sha256_hex;
pub use domain::filter::{Filter, Pagination};
pub use domain::model::{
    CardapioModel, ClienteModel, EntityModel, ModelRegistry, PedidoModel, Record,
};
pub use error::{FieldError, Result, StoreError};
