//! Funnel context implementation

use crate::answers::AnswerMap;
use crate::engine::{FunnelEngine, Transition};
use crate::errors::FunnelError;
use crate::event::EventStore;
use crate::step::Enrichment;
use crate::store::PersistenceAdapter;

/// Contexto de interacción con un funnel.
///
/// API ergonómica para la capa de UI: aplica `normalize` y `accepts` del
/// step activo antes de delegar en `continue_with`, y permite reproducir
/// guiones de respuestas.
pub struct FunnelCtx<'a, P: PersistenceAdapter, E: EventStore> {
    pub engine: &'a mut FunnelEngine<P, E>,
}

impl<'a, P: PersistenceAdapter, E: EventStore> FunnelCtx<'a, P, E> {
    #[inline]
    pub fn new(engine: &'a mut FunnelEngine<P, E>) -> Self {
        Self { engine }
    }

    /// Normaliza y valida el delta contra el step activo. `Ok(None)` si el
    /// step no lo acepta (el avance queda deshabilitado, no es un error).
    #[inline]
    pub fn answer(&mut self, delta: AnswerMap) -> Result<Option<Transition>, FunnelError> {
        let step = self.engine.current_step()?;
        let delta = step.normalize(delta);
        if !step.accepts(&delta) {
            return Ok(None);
        }
        self.engine.continue_with(delta).map(Some)
    }

    /// Atajo para un delta de un solo campo.
    #[inline]
    pub fn answer_field(&mut self,
                        field: &str,
                        value: impl Into<serde_json::Value>)
                        -> Result<Option<Transition>, FunnelError> {
        self.answer(AnswerMap::single(field, value))
    }

    /// Colaborador que el step activo pide para este delta (si alguno).
    #[inline]
    pub fn pending_enrichment(&self, delta: &AnswerMap) -> Option<Enrichment> {
        self.engine.current_step().ok().and_then(|s| s.enrichment(delta))
    }

    /// Reproduce respuestas en orden hasta agotarlas o llegar a la carga.
    /// Un delta rechazado por `accepts` corta el guion con error.
    #[inline]
    pub fn run_script(&mut self, deltas: Vec<AnswerMap>) -> Result<Vec<Transition>, FunnelError> {
        let mut transitions = Vec::with_capacity(deltas.len());
        for delta in deltas {
            let step_id = self.engine.current_step_id().to_string();
            match self.answer(delta)? {
                Some(Transition::Loading) => {
                    transitions.push(Transition::Loading);
                    break;
                }
                Some(t) => transitions.push(t),
                None => return Err(FunnelError::Internal(format!("scripted answer rejected by step {step_id}"))),
            }
        }
        Ok(transitions)
    }

    /// Retrocede hasta `n` veces; devuelve cuántas movieron la posición.
    #[inline]
    pub fn back_n(&mut self, n: usize) -> Result<usize, FunnelError> {
        let mut moved = 0;
        for _ in 0..n {
            if !self.engine.back()? {
                break;
            }
            moved += 1;
        }
        Ok(moved)
    }
}
