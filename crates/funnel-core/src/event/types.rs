//! Tipos de evento de navegación y estructura `FunnelEvent`.
//!
//! Rol en el flujo:
//! - Cada transición del `FunnelEngine` emite un evento a un `EventStore`
//!   append-only.
//! - El journal sirve para auditar una sesión (qué pasos se vieron, cuántas
//!   veces se volvió atrás) sin depender del estado mutable del motor.
//! - El enum `FunnelEventKind` define el contrato observable del motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunnelEventKind {
    /// Primer evento de una sesión. `resumed` indica que se rehidrataron
    /// respuestas previas.
    FunnelStarted { funnel: String, first_step: String, resumed: bool },
    /// Transición hacia adelante en el flujo externo.
    StepAdvanced { from: String, to: String },
    /// Entrada al sub-flow con la cola de ítems fijada.
    SubflowEntered { items_field: String, items: Vec<String> },
    /// Avance dentro del sub-flow.
    SubflowAdvanced { item: String, inner_index: usize },
    /// Salida del sub-flow hacia la continuación externa (`None` = Complete).
    SubflowExited { items_field: String, continuation: Option<String> },
    /// Navegación hacia atrás; `to` es el step que queda activo.
    SteppedBack { to: String },
    LoadingStarted { from: String },
    FunnelCompleted { answer_count: usize },
    /// Un `next_step` devolvió un id inexistente.
    ConfigurationError { message: String },
    FunnelReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelEvent {
    pub seq: u64, // asignado por EventStore in-memory (orden append)
    pub session_id: Uuid,
    pub kind: FunnelEventKind,
    pub ts: DateTime<Utc>,
}
