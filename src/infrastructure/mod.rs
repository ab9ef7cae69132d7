//! Infrastructure module.
//!
//! This module contains the task store, its storage backends and the
//! service configuration.

pub mod config;
pub mod fail_injection;
pub mod jsonl;
pub mod repository;
pub mod store;

pub use config::{ConfigurationError, LogFormat, ServiceConfig};
pub use fail_injection::FailInjectingStorage;
pub use jsonl::JsonLinesStorage;
pub use repository::{IdStrategy, StorageError, StoreError, TaskStorage, WriteMode};
pub use store::TaskStore;
