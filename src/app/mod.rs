pub mod record_service;
