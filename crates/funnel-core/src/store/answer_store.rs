//! `AnswerStore`: `AnswerMap` vivo + persistencia best-effort.

use log::{debug, warn};

use super::adapter::PersistenceAdapter;
use crate::answers::AnswerMap;

/// Respuestas de una instancia de funnel ligadas a su namespace durable.
///
/// Invariantes:
/// - `merge` es la única mutación durante la navegación.
/// - `persist` nunca falla hacia el caller: los errores se registran y se
///   descartan.
#[derive(Debug)]
pub struct AnswerStore<P: PersistenceAdapter> {
    namespace: String,
    adapter: P,
    answers: AnswerMap,
    namespaced_fields: Vec<String>,
}

impl<P: PersistenceAdapter> AnswerStore<P> {
    /// Crea el store vacío (sin rehidratar).
    pub fn new(namespace: impl Into<String>, adapter: P) -> Self {
        Self { namespace: namespace.into(),
               adapter,
               answers: AnswerMap::new(),
               namespaced_fields: Vec::new() }
    }

    /// Declara un campo con merge profundo por ítem.
    pub fn with_namespaced_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.namespaced_fields.contains(&field) {
            self.namespaced_fields.push(field);
        }
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut P {
        &mut self.adapter
    }

    /// Reemplaza el estado en memoria con el registro persistido. Devuelve
    /// `true` si se recuperó al menos un campo.
    pub fn rehydrate(&mut self) -> bool {
        self.answers = self.adapter.load(&self.namespace);
        debug!("rehydrate namespace={} fields={}", self.namespace, self.answers.len());
        !self.answers.is_empty()
    }

    pub fn merge(&mut self, delta: AnswerMap) {
        let fields: Vec<&str> = self.namespaced_fields.iter().map(String::as_str).collect();
        self.answers.merge(delta, &fields);
    }

    /// Guarda el mapa completo. Best-effort.
    pub fn persist(&mut self) {
        if let Err(e) = self.adapter.save(&self.namespace, &self.answers) {
            warn!("persist:dropped namespace={} err={e}", self.namespace);
        }
    }

    /// Copia de sólo lectura.
    pub fn snapshot(&self) -> AnswerMap {
        self.answers.clone()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Vacía el mapa y elimina el registro durable (reset explícito).
    pub fn clear(&mut self) {
        self.answers.clear();
        if let Err(e) = self.adapter.remove(&self.namespace) {
            warn!("clear:remove failed namespace={} err={e}", self.namespace);
        }
    }
}
