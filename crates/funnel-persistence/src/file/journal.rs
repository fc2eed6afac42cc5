//! Journal de navegación en archivos JSON Lines.
//!
//! Un archivo `<session_id>.jsonl` por sesión, una línea por `FunnelEvent`.
//! El contrato `EventStore` es infalible: un fallo de escritura se registra
//! y el evento queda igualmente en la copia en memoria (el journal es
//! auxiliar y nunca bloquea la navegación).

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use funnel_core::{EventStore, FunnelEvent, FunnelEventKind, InMemoryEventStore};
use log::{debug, error, warn};
use uuid::Uuid;

use super::with_retry;
use crate::error::PersistenceError;

#[derive(Debug)]
pub struct JsonlEventStore {
    dir: PathBuf,
    mirror: InMemoryEventStore,
    /// Sesiones escritas por esta instancia (se listan desde memoria).
    written: HashSet<Uuid>,
}

impl JsonlEventStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(),
               mirror: InMemoryEventStore::default(),
               written: HashSet::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{session_id}.jsonl"))
    }

    fn append_line(&self, event: &FunnelEvent) -> Result<(), PersistenceError> {
        let line = serde_json::to_string(event)?;
        let path = self.session_path(event.session_id);
        with_retry("append", &path, || {
            fs::create_dir_all(&self.dir)?;
            let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
            writeln!(file, "{line}")?;
            Ok(())
        })
    }

    /// Lee el journal de una sesión desde disco. Líneas corruptas se omiten.
    pub fn read_session(&self, session_id: Uuid) -> Result<Vec<FunnelEvent>, PersistenceError> {
        let path = self.session_path(session_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let events = raw.lines()
                        .filter(|l| !l.trim().is_empty())
                        .filter_map(|l| match serde_json::from_str::<FunnelEvent>(l) {
                            Ok(ev) => Some(ev),
                            Err(e) => {
                                warn!("journal:skip corrupt line session={session_id} err={e}");
                                None
                            }
                        })
                        .collect();
        Ok(events)
    }
}

impl EventStore for JsonlEventStore {
    fn append_kind(&mut self, session_id: Uuid, kind: FunnelEventKind) -> FunnelEvent {
        let ev = self.mirror.append_kind(session_id, kind);
        match self.append_line(&ev) {
            Ok(()) => debug!("append_kind:done session={session_id} seq={}", ev.seq),
            Err(e) => error!("append_kind:write failed session={session_id} seq={} err={e}", ev.seq),
        }
        self.written.insert(session_id);
        ev
    }

    fn list(&self, session_id: Uuid) -> Vec<FunnelEvent> {
        if self.written.contains(&session_id) {
            return self.mirror.list(session_id);
        }
        self.read_session(session_id).unwrap_or_else(|e| {
                                         error!("list:read failed session={session_id} err={e}");
                                         Vec::new()
                                     })
    }
}
