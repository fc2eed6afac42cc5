//! Estado observable del motor: completitud, transiciones y configuración.

use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;
use crate::registry::CompletionAction;

/// Estado de completitud del funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionState {
    InProgress,
    /// Animación de carga en curso; `back` deshabilitado.
    Loading,
    Complete,
}

/// Resultado de un `continue_with` exitoso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Nuevo step externo activo.
    Step(String),
    /// Nueva posición dentro del sub-flow.
    Subflow { step_id: String, item: String, inner_index: usize },
    /// Se alcanzó el marcador terminal; comienza la carga.
    Loading,
}

/// Lo que el funnel entrega al consumidor terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub funnel: String,
    pub answers: AnswerMap,
    pub action: CompletionAction,
}

/// Configuración del motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Lista vacía al entrar al sub-flow: error (`true`) o log + continuación
    /// posterior al sub-flow (`false`).
    pub strict_subflow: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { strict_subflow: cfg!(debug_assertions) }
    }
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self { strict_subflow: true }
    }

    pub fn lenient() -> Self {
        Self { strict_subflow: false }
    }
}
