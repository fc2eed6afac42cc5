//! Builder para `FunnelEngine`.
//!
//! `EngineBuilderInit` sólo conoce el registro; al fijar la persistencia
//! transiciona a `EngineBuilder<P, E>`, donde se pueden reemplazar el event
//! store, la configuración y el id de sesión.
//!
//! ```ignore
//! let engine = FunnelEngine::builder(registry)
//!     .persistence(FileStore::new(dir))
//!     .config(EngineConfig::lenient())
//!     .build();
//! ```

use uuid::Uuid;

use super::core::FunnelEngine;
use super::state::EngineConfig;
use crate::event::{EventStore, InMemoryEventStore};
use crate::registry::StepRegistry;
use crate::store::PersistenceAdapter;

/// Estado inicial del builder: registro sin persistencia.
#[derive(Debug)]
pub struct EngineBuilderInit {
    pub registry: StepRegistry,
}

impl EngineBuilderInit {
    pub fn new(registry: StepRegistry) -> Self {
        Self { registry }
    }

    /// Define la persistencia y transiciona al builder completo.
    #[inline]
    pub fn persistence<P: PersistenceAdapter>(self, adapter: P) -> EngineBuilder<P, InMemoryEventStore> {
        EngineBuilder { registry: self.registry,
                        adapter,
                        event_store: InMemoryEventStore::default(),
                        config: EngineConfig::default(),
                        session_id: None }
    }
}

#[derive(Debug)]
pub struct EngineBuilder<P: PersistenceAdapter, E: EventStore> {
    registry: StepRegistry,
    adapter: P,
    event_store: E,
    config: EngineConfig,
    session_id: Option<Uuid>,
}

impl<P: PersistenceAdapter, E: EventStore> EngineBuilder<P, E> {
    /// Reemplaza el journal de eventos.
    #[inline]
    pub fn event_store<E2: EventStore>(self, event_store: E2) -> EngineBuilder<P, E2> {
        EngineBuilder { registry: self.registry,
                        adapter: self.adapter,
                        event_store,
                        config: self.config,
                        session_id: self.session_id }
    }

    #[inline]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fija el id de sesión (por defecto uno nuevo v4).
    #[inline]
    pub fn session_id(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Construye el motor: rehidrata respuestas y emite `FunnelStarted`.
    #[inline]
    pub fn build(self) -> FunnelEngine<P, E> {
        let session_id = self.session_id.unwrap_or_else(Uuid::new_v4);
        FunnelEngine::new_with_stores(self.registry, self.adapter, self.event_store, self.config, session_id)
    }
}
