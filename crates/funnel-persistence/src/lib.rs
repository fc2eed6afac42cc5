//! funnel-persistence
//!
//! Backends durables para el motor de funnels.
//!
//! Módulos:
//! - `file`: `FileStore` (un archivo JSON por namespace, implementa
//!   `PersistenceAdapter`) y `JsonlEventStore` (journal append-only).
//! - `config`: carga de configuración desde .env.
//! - `error`: errores de IO/serialización mapeados al contrato del core.

pub mod config;
pub mod error;
pub mod file;

pub use config::{engine_config_from_env, init_dotenv, StorageConfig};
pub use error::PersistenceError;
pub use file::{FileStore, JsonlEventStore};
