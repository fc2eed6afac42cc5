//! Core FunnelEngine implementation

use std::time::Instant;

use log::{debug, error, warn};
use uuid::Uuid;

use super::builder::EngineBuilderInit;
use super::state::{Completion, CompletionState, EngineConfig, Transition};
use crate::answers::AnswerMap;
use crate::errors::FunnelError;
use crate::event::{EventStore, FunnelEvent, FunnelEventKind, InMemoryEventStore};
use crate::history::{History, HistoryEntry};
use crate::registry::StepRegistry;
use crate::step::{NextStep, StepDefinition, StepView};
use crate::store::{AnswerStore, PersistenceAdapter};
use crate::subflow::{SubflowAdvance, SubflowState};

/// Controlador de navegación de un funnel.
///
/// Orquesta registro, `AnswerStore`, historial externo y sub-flow. Todas las
/// operaciones son síncronas y toman `&mut self`: hay un solo step activo por
/// instancia.
#[derive(Debug)]
pub struct FunnelEngine<P, E = InMemoryEventStore>
    where P: PersistenceAdapter,
          E: EventStore
{
    registry: StepRegistry,
    store: AnswerStore<P>,
    event_store: E,
    session_id: Uuid,
    config: EngineConfig,
    /// Step externo activo. Mientras el sub-flow está activo conserva el step
    /// que disparó la entrada.
    current: String,
    history: History<HistoryEntry>,
    subflow: Option<SubflowState>,
    completion: CompletionState,
    loading_since: Option<Instant>,
    /// Id ausente que rompió el funnel (error de configuración).
    broken: Option<String>,
}

impl FunnelEngine<crate::store::InMemoryPersistence, InMemoryEventStore> {
    /// Crea un nuevo builder para configurar el engine
    #[inline]
    pub fn builder(registry: StepRegistry) -> EngineBuilderInit {
        EngineBuilderInit { registry }
    }
}

impl<P, E> FunnelEngine<P, E>
    where P: PersistenceAdapter,
          E: EventStore
{
    /// Crea el motor, rehidrata las respuestas del namespace del registro y
    /// emite `FunnelStarted`.
    pub fn new_with_stores(registry: StepRegistry,
                           adapter: P,
                           event_store: E,
                           config: EngineConfig,
                           session_id: Uuid)
                           -> Self {
        let mut store = AnswerStore::new(registry.namespace(), adapter);
        for field in registry.namespaced_fields() {
            store = store.with_namespaced_field(field.clone());
        }
        let resumed = store.rehydrate();
        let current = registry.first_id().to_string();
        let mut engine = Self { registry,
                                store,
                                event_store,
                                session_id,
                                config,
                                current,
                                history: History::new(),
                                subflow: None,
                                completion: CompletionState::InProgress,
                                loading_since: None,
                                broken: None };
        let kind = FunnelEventKind::FunnelStarted { funnel: engine.registry.funnel().to_string(),
                                                    first_step: engine.current.clone(),
                                                    resumed };
        engine.record(kind);
        engine
    }

    fn record(&mut self, kind: FunnelEventKind) {
        let _ = self.event_store.append_kind(self.session_id, kind);
    }

    fn guard_broken(&self) -> Result<(), FunnelError> {
        match &self.broken {
            Some(missing) => Err(FunnelError::FunnelBroken(missing.clone())),
            None => Ok(()),
        }
    }

    /// Marca el funnel como roto y devuelve el error original.
    fn break_with(&mut self, missing: &str, err: FunnelError) -> FunnelError {
        error!("funnel:broken funnel={} from={} missing={missing}", self.registry.funnel(), self.current);
        self.broken = Some(missing.to_string());
        self.record(FunnelEventKind::ConfigurationError { message: err.to_string() });
        err
    }

    fn active_subflow(&self) -> Option<&SubflowState> {
        self.subflow.as_ref().filter(|s| s.is_active())
    }

    // ------------------------------------------------------------------
    // Forward
    // ------------------------------------------------------------------

    /// Registra el delta de respuestas del step activo y avanza.
    ///
    /// merge → persist → rama (sub-flow o registro) → historial → nuevo step.
    pub fn continue_with(&mut self, delta: AnswerMap) -> Result<Transition, FunnelError> {
        self.guard_broken()?;
        match self.completion {
            CompletionState::Loading => return Err(FunnelError::LoadingInProgress),
            CompletionState::Complete => return Err(FunnelError::FunnelCompleted),
            CompletionState::InProgress => {}
        }
        if self.active_subflow().is_some() {
            return self.continue_subflow(delta);
        }

        self.store.merge(delta);
        self.store.persist();
        let next = self.registry.lookup(&self.current)?.next_step(self.store.answers());
        debug!("continue:outer from={} next={next:?}", self.current);
        let origin = HistoryEntry::Step(self.current.clone());
        self.follow(next, origin)
    }

    fn continue_subflow(&mut self, delta: AnswerMap) -> Result<Transition, FunnelError> {
        let Some(state) = self.subflow.as_ref() else {
            return Err(FunnelError::Internal("sub-flow not active".into()));
        };
        let items_field = state.items_field().to_string();
        let item = state.current_item()
                        .map(str::to_string)
                        .ok_or_else(|| FunnelError::Internal("sub-flow cursor out of range".into()))?;
        let cursor = state.cursor();
        let last_item = cursor.item_index + 1 == state.queue().len();

        let definition = self.registry.subflow(&items_field)?;
        let answers_field = definition.answers_field().to_string();
        let inner_len = definition.inner_len();
        let last_inner = cursor.inner_index + 1 == inner_len;

        // las respuestas internas van a `answers_field[item]`
        let mut per_item = serde_json::Map::new();
        per_item.insert(item.clone(), delta.into_value());
        self.store.merge(AnswerMap::single(answers_field, serde_json::Value::Object(per_item)));
        self.store.persist();

        if last_item && last_inner {
            let next = definition.continuation(self.store.answers());
            debug!("subflow:exit items_field={items_field} continuation={next:?}");
            let continuation = match &next {
                NextStep::Continue(id) => Some(id.clone()),
                _ => None,
            };
            if let NextStep::EnterSubflow(field) = &next {
                return Err(FunnelError::InvalidRegistry(format!("nested sub-flow {field} after {items_field}")));
            }
            if next == NextStep::Complete {
                // sin avanzar: back desde Complete vuelve a la última posición
                self.record(FunnelEventKind::SubflowExited { items_field,
                                                             continuation });
                return Ok(self.start_loading());
            }
            if let NextStep::Continue(id) = &next {
                if let Err(e) = self.registry.lookup(id) {
                    return Err(self.break_with(id, e));
                }
            }
            if let Some(state) = self.subflow.as_mut() {
                state.advance(inner_len);
            }
            self.record(FunnelEventKind::SubflowExited { items_field: items_field.clone(),
                                                         continuation });
            return self.follow(next, HistoryEntry::Subflow(items_field));
        }

        let Some(state) = self.subflow.as_mut() else {
            return Err(FunnelError::Internal("sub-flow not active".into()));
        };
        match state.advance(inner_len) {
            SubflowAdvance::Moved(_) => {}
            SubflowAdvance::Finished => {
                return Err(FunnelError::Internal("sub-flow finished before its last position".into()));
            }
        }
        let transition = self.subflow_transition()?;
        if let Transition::Subflow { item, inner_index, .. } = &transition {
            self.record(FunnelEventKind::SubflowAdvanced { item: item.clone(),
                                                           inner_index: *inner_index });
        }
        Ok(transition)
    }

    /// Aplica el resultado de una función de rama. `origin` es lo que se
    /// apila en el historial externo si el avance es a un step concreto.
    fn follow(&mut self, next: NextStep, origin: HistoryEntry) -> Result<Transition, FunnelError> {
        match next {
            NextStep::Continue(id) => {
                if let Err(e) = self.registry.lookup(&id) {
                    return Err(self.break_with(&id, e));
                }
                let from = match &origin {
                    HistoryEntry::Step(step) => step.clone(),
                    HistoryEntry::Subflow(field) => format!("subflow:{field}"),
                };
                self.history.push(origin);
                self.current = id.clone();
                self.record(FunnelEventKind::StepAdvanced { from,
                                                            to: id.clone() });
                Ok(Transition::Step(id))
            }
            NextStep::EnterSubflow(items_field) => match origin {
                HistoryEntry::Step(_) => self.enter_subflow(&items_field),
                HistoryEntry::Subflow(previous) => {
                    Err(FunnelError::InvalidRegistry(format!("nested sub-flow {items_field} after {previous}")))
                }
            },
            NextStep::Complete => Ok(self.start_loading()),
        }
    }

    fn enter_subflow(&mut self, items_field: &str) -> Result<Transition, FunnelError> {
        let definition = match self.registry.subflow(items_field) {
            Ok(def) => def,
            Err(e) => return Err(self.break_with(items_field, e)),
        };
        let items = self.store.answers().get_list(items_field);
        if items.is_empty() {
            if self.config.strict_subflow {
                warn!("subflow:empty strict items_field={items_field} step={}", self.current);
                return Err(FunnelError::EmptySubflow(items_field.to_string()));
            }
            error!("subflow:empty items_field={items_field} step={}; falling through to continuation",
                   self.current);
            let next = definition.continuation(self.store.answers());
            if matches!(next, NextStep::EnterSubflow(_)) {
                return Err(FunnelError::InvalidRegistry(format!("sub-flow {items_field} continues into a sub-flow")));
            }
            let origin = HistoryEntry::Step(self.current.clone());
            return self.follow(next, origin);
        }

        debug!("subflow:enter items_field={items_field} items={items:?}");
        self.subflow = Some(SubflowState::enter(items_field, items.clone(), &self.current));
        self.record(FunnelEventKind::SubflowEntered { items_field: items_field.to_string(),
                                                      items });
        self.subflow_transition()
    }

    fn subflow_transition(&self) -> Result<Transition, FunnelError> {
        let state = self.active_subflow()
                        .ok_or_else(|| FunnelError::Internal("sub-flow not active".into()))?;
        let definition = self.registry.subflow(state.items_field())?;
        let cursor = state.cursor();
        let step = definition.inner(cursor.inner_index)
                             .ok_or_else(|| FunnelError::Internal("inner index out of range".into()))?;
        let item = state.current_item()
                        .ok_or_else(|| FunnelError::Internal("sub-flow cursor out of range".into()))?;
        Ok(Transition::Subflow { step_id: step.id().to_string(),
                                 item: item.to_string(),
                                 inner_index: cursor.inner_index })
    }

    fn start_loading(&mut self) -> Transition {
        debug!("completion:loading funnel={} from={}", self.registry.funnel(), self.current_step_id());
        self.completion = CompletionState::Loading;
        self.loading_since = Some(Instant::now());
        let from = self.current_step_id().to_string();
        self.record(FunnelEventKind::LoadingStarted { from });
        Transition::Loading
    }

    // ------------------------------------------------------------------
    // Loading → Complete
    // ------------------------------------------------------------------

    /// Evalúa el temporizador de carga. Devuelve la completitud exactamente
    /// una vez, cuando transcurrió la duración fija.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Completion>, FunnelError> {
        self.guard_broken()?;
        if self.completion != CompletionState::Loading {
            return Ok(None);
        }
        let elapsed = self.loading_since
                          .map(|since| now.saturating_duration_since(since))
                          .unwrap_or_default();
        if elapsed >= self.registry.loading_duration() {
            return self.finish_loading().map(Some);
        }
        Ok(None)
    }

    /// Fuerza el fin de la animación. Un segundo llamado es rechazado.
    pub fn finish_loading(&mut self) -> Result<Completion, FunnelError> {
        self.guard_broken()?;
        match self.completion {
            CompletionState::Loading => {}
            CompletionState::Complete => return Err(FunnelError::FunnelCompleted),
            CompletionState::InProgress => return Err(FunnelError::NotLoading),
        }
        self.completion = CompletionState::Complete;
        self.loading_since = None;
        let answers = self.store.snapshot();
        self.record(FunnelEventKind::FunnelCompleted { answer_count: answers.len() });
        debug!("completion:complete funnel={} answers={}", self.registry.funnel(), answers.len());
        Ok(Completion { funnel: self.registry.funnel().to_string(),
                        answers,
                        action: self.registry.completion_action().clone() })
    }

    // ------------------------------------------------------------------
    // Backward
    // ------------------------------------------------------------------

    /// Retrocede una posición. Precedencia: completitud → historial del
    /// sub-flow → historial externo. Devuelve `false` si no había adónde ir.
    pub fn back(&mut self) -> Result<bool, FunnelError> {
        self.guard_broken()?;
        match self.completion {
            CompletionState::Loading => return Err(FunnelError::LoadingInProgress),
            CompletionState::Complete => {
                self.completion = CompletionState::InProgress;
                self.record_back();
                return Ok(true);
            }
            CompletionState::InProgress => {}
        }

        if let Some(state) = self.subflow.as_mut().filter(|s| s.is_active()) {
            // historial vacío: sale al step de entrada sin tocar la pila externa
            let _ = state.back();
            self.record_back();
            return Ok(true);
        }

        match self.history.pop() {
            None => Ok(false),
            Some(HistoryEntry::Step(id)) => {
                self.current = id;
                self.record_back();
                Ok(true)
            }
            Some(HistoryEntry::Subflow(field)) => {
                let state = self.subflow
                                .as_mut()
                                .filter(|s| s.items_field() == field)
                                .ok_or_else(|| FunnelError::Internal(format!("no retained sub-flow for {field}")))?;
                if state.reenter().is_none() {
                    return Err(FunnelError::Internal(format!("retained sub-flow {field} has no history")));
                }
                self.current = state.entry_step().to_string();
                self.record_back();
                Ok(true)
            }
        }
    }

    fn record_back(&mut self) {
        let to = self.current_step_id().to_string();
        debug!("back:to step={to}");
        self.record(FunnelEventKind::SteppedBack { to });
    }

    /// `true` si `back()` movería la posición.
    pub fn can_go_back(&self) -> bool {
        if self.broken.is_some() {
            return false;
        }
        match self.completion {
            CompletionState::Loading => false,
            CompletionState::Complete => true,
            CompletionState::InProgress => !self.history.is_empty() || self.active_subflow().is_some(),
        }
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Reinicio completo: respuestas (y registro durable), historiales,
    /// sub-flow, completitud y error de configuración. Vuelve al primer step.
    pub fn reset(&mut self) {
        self.store.clear();
        self.history.clear();
        self.subflow = None;
        self.completion = CompletionState::InProgress;
        self.loading_since = None;
        self.broken = None;
        self.current = self.registry.first_id().to_string();
        self.record(FunnelEventKind::FunnelReset);
    }

    // ------------------------------------------------------------------
    // Lectura
    // ------------------------------------------------------------------

    /// Id del step activo (el step interno si el sub-flow está activo).
    pub fn current_step_id(&self) -> &str {
        if let Some(state) = self.active_subflow() {
            if let Some(step) = self.registry
                                    .subflow(state.items_field())
                                    .ok()
                                    .and_then(|def| def.inner(state.cursor().inner_index))
            {
                return step.id();
            }
        }
        &self.current
    }

    /// `(ítem, índice interno)` si el sub-flow está activo.
    pub fn subflow_position(&self) -> Option<(&str, usize)> {
        let state = self.active_subflow()?;
        Some((state.current_item()?, state.cursor().inner_index))
    }

    /// Definición del step activo.
    pub fn current_step(&self) -> Result<&dyn StepDefinition, FunnelError> {
        self.guard_broken()?;
        if let Some(state) = self.active_subflow() {
            let definition = self.registry.subflow(state.items_field())?;
            return definition.inner(state.cursor().inner_index)
                             .ok_or_else(|| FunnelError::Internal("inner index out of range".into()));
        }
        self.registry.lookup(&self.current)
    }

    /// Vista renderizable del step activo. Dentro del sub-flow el prefill sale
    /// de las respuestas del ítem actual.
    pub fn current_view(&self) -> Result<StepView, FunnelError> {
        let step = self.current_step()?;
        if let Some(state) = self.active_subflow() {
            let definition = self.registry.subflow(state.items_field())?;
            let item = state.current_item().unwrap_or_default();
            let item_answers = self.store
                                   .answers()
                                   .item_answers(definition.answers_field(), item)
                                   .cloned()
                                   .map(AnswerMap::from)
                                   .unwrap_or_default();
            return Ok(step.render(&item_answers, Some(item)));
        }
        Ok(step.render(self.store.answers(), None))
    }

    pub fn completion_state(&self) -> CompletionState {
        self.completion
    }

    pub fn is_broken(&self) -> bool {
        self.broken.is_some()
    }

    pub fn answers(&self) -> &AnswerMap {
        self.store.answers()
    }

    pub fn snapshot(&self) -> AnswerMap {
        self.store.snapshot()
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn persistence(&self) -> &P {
        self.store.adapter()
    }

    /// Eventos de la sesión actual.
    pub fn events(&self) -> Vec<FunnelEvent> {
        self.event_store.list(self.session_id)
    }

    /// Variante compacta de eventos de la sesión
    pub fn event_variants(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .map(|e| match e.kind {
                FunnelEventKind::FunnelStarted { .. } => "I",
                FunnelEventKind::StepAdvanced { .. } => "S",
                FunnelEventKind::SubflowEntered { .. } => "E",
                FunnelEventKind::SubflowAdvanced { .. } => "A",
                FunnelEventKind::SubflowExited { .. } => "X",
                FunnelEventKind::SteppedBack { .. } => "B",
                FunnelEventKind::LoadingStarted { .. } => "L",
                FunnelEventKind::FunnelCompleted { .. } => "C",
                FunnelEventKind::ConfigurationError { .. } => "F",
                FunnelEventKind::FunnelReset => "R",
            })
            .collect()
    }
}
