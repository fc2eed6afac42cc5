use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{FunnelEvent, FunnelEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, session_id: Uuid, kind: FunnelEventKind) -> FunnelEvent;
    /// Lista eventos de una sesión (orden ascendente por seq).
    fn list(&self, session_id: Uuid) -> Vec<FunnelEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    pub inner: HashMap<Uuid, Vec<FunnelEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, session_id: Uuid, kind: FunnelEventKind) -> FunnelEvent {
        let events = self.inner.entry(session_id).or_default();
        let seq = events.len() as u64;
        let ev = FunnelEvent { seq,
                               session_id,
                               kind,
                               ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, session_id: Uuid) -> Vec<FunnelEvent> {
        self.inner.get(&session_id).cloned().unwrap_or_default()
    }
}
