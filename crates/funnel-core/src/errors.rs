//! Errores específicos del core.
//!
//! `FunnelError` cubre los fallos del motor de navegación; `StorageError` es
//! el contrato de error de los `PersistenceAdapter` (nunca llega al usuario:
//! el `AnswerStore` lo registra y sigue).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum FunnelError {
    /// Una función de rama nombró un step ausente del registro. Fatal para la
    /// instancia del funnel: sólo `reset()` permite continuar.
    #[error("step not found in registry: {0}")]
    StepNotFound(String),
    /// El funnel quedó en estado de error de configuración.
    #[error("funnel is broken (missing step {0}); only reset is allowed")]
    FunnelBroken(String),
    #[error("sub-flow not registered for items field: {0}")]
    SubflowNotFound(String),
    /// La lista que dispara el sub-flow estaba vacía (modo estricto).
    #[error("sub-flow triggered with an empty item list: {0}")]
    EmptySubflow(String),
    #[error("navigation locked while loading")]
    LoadingInProgress,
    #[error("funnel is not loading")]
    NotLoading,
    #[error("funnel already completed")]
    FunnelCompleted,
    #[error("duplicate step id: {0}")]
    DuplicateStep(String),
    #[error("step {0} is unreachable from the first step")]
    UnreachableStep(String),
    #[error("step {from} declares unknown target {target}")]
    UnknownTarget { from: String, target: String },
    #[error("invalid registry: {0}")]
    InvalidRegistry(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Error de un backend de almacenamiento local.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(String),
    #[error("storage serialization error: {0}")]
    Serialization(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
