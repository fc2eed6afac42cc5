//! Sub-flow dinámico: una secuencia fija de steps internos repetida por cada
//! ítem de una lista elegida por el usuario (p.ej. medicamentos).
//!
//! `SubflowDefinition` es inmutable y vive en el registro. `SubflowState` es
//! el estado de una ejecución concreta: cola fijada al entrar, cursor
//! `(item, inner_index)` y su propio historial.

use serde::{Deserialize, Serialize};

use crate::answers::AnswerMap;
use crate::history::History;
use crate::step::{NextStep, StepDefinition};

/// Continuación hacia el flujo externo al terminar el sub-flow.
pub type Continuation = fn(&AnswerMap) -> NextStep;

pub struct SubflowDefinition {
    items_field: String,
    answers_field: String,
    inner: Vec<Box<dyn StepDefinition>>,
    continuation: Continuation,
    continuation_targets: Vec<NextStep>,
}

impl SubflowDefinition {
    /// `items_field`: campo con la lista de ítems; `answers_field`: campo con
    /// namespace por ítem donde se guardan las respuestas internas.
    pub fn new(items_field: &str, answers_field: &str, continuation: Continuation) -> Self {
        Self { items_field: items_field.to_string(),
               answers_field: answers_field.to_string(),
               inner: Vec::new(),
               continuation,
               continuation_targets: Vec::new() }
    }

    pub fn inner_step<S: StepDefinition + 'static>(mut self, step: S) -> Self {
        self.inner.push(Box::new(step));
        self
    }

    /// Destinos posibles de la continuación (validación del grafo).
    pub fn with_targets(mut self, targets: Vec<NextStep>) -> Self {
        self.continuation_targets = targets;
        self
    }

    pub fn items_field(&self) -> &str {
        &self.items_field
    }

    pub fn answers_field(&self) -> &str {
        &self.answers_field
    }

    pub fn inner_len(&self) -> usize {
        self.inner.len()
    }

    pub fn inner(&self, index: usize) -> Option<&dyn StepDefinition> {
        self.inner.get(index).map(|s| s.as_ref())
    }

    pub fn inner_steps(&self) -> impl Iterator<Item = &dyn StepDefinition> {
        self.inner.iter().map(|s| s.as_ref())
    }

    pub fn continuation(&self, answers: &AnswerMap) -> NextStep {
        (self.continuation)(answers)
    }

    pub fn continuation_targets(&self) -> &[NextStep] {
        &self.continuation_targets
    }
}

impl std::fmt::Debug for SubflowDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubflowDefinition")
         .field("items_field", &self.items_field)
         .field("answers_field", &self.answers_field)
         .field("inner", &self.inner)
         .finish()
    }
}

/// Posición dentro del sub-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubflowCursor {
    pub item_index: usize,
    pub inner_index: usize,
}

/// Resultado de avanzar el cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubflowAdvance {
    Moved(SubflowCursor),
    /// Se completó el último step interno del último ítem.
    Finished,
}

/// Estado de una ejecución del sub-flow.
///
/// La cola y el historial se conservan tras la salida para permitir el
/// reingreso con `back`; sólo se descartan al reiniciar o al volver a entrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubflowState {
    items_field: String,
    queue: Vec<String>,
    entry_step: String,
    cursor: SubflowCursor,
    history: History<SubflowCursor>,
    active: bool,
}

impl SubflowState {
    /// Entra en `(primer ítem, 0)`. El caller garantiza `queue` no vacía.
    pub fn enter(items_field: &str, queue: Vec<String>, entry_step: &str) -> Self {
        Self { items_field: items_field.to_string(),
               queue,
               entry_step: entry_step.to_string(),
               cursor: SubflowCursor { item_index: 0,
                                       inner_index: 0 },
               history: History::new(),
               active: true }
    }

    pub fn items_field(&self) -> &str {
        &self.items_field
    }

    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    /// Step externo que disparó la entrada.
    pub fn entry_step(&self) -> &str {
        &self.entry_step
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cursor(&self) -> SubflowCursor {
        self.cursor
    }

    pub fn current_item(&self) -> Option<&str> {
        self.queue.get(self.cursor.item_index).map(String::as_str)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Apila la posición actual y avanza. Al terminar el último ítem se
    /// desactiva, dejando la última posición en el historial.
    pub fn advance(&mut self, inner_len: usize) -> SubflowAdvance {
        self.history.push(self.cursor);
        let SubflowCursor { item_index, inner_index } = self.cursor;
        if inner_index + 1 < inner_len {
            self.cursor = SubflowCursor { item_index,
                                          inner_index: inner_index + 1 };
        } else if item_index + 1 < self.queue.len() {
            self.cursor = SubflowCursor { item_index: item_index + 1,
                                          inner_index: 0 };
        } else {
            self.active = false;
            return SubflowAdvance::Finished;
        }
        SubflowAdvance::Moved(self.cursor)
    }

    /// Retrocede una posición. `None` si el historial propio está vacío: el
    /// caller sale hacia `entry_step` y el estado queda inactivo.
    pub fn back(&mut self) -> Option<SubflowCursor> {
        match self.history.pop() {
            Some(previous) => {
                self.cursor = previous;
                Some(previous)
            }
            None => {
                self.active = false;
                None
            }
        }
    }

    /// Reingresa tras una salida completa, en la última posición registrada.
    pub fn reenter(&mut self) -> Option<SubflowCursor> {
        let last = self.history.pop()?;
        self.cursor = last;
        self.active = true;
        Some(last)
    }
}
