//! funnel-core: motor de navegación por pasos para funnels de preguntas
//! (registro de steps, respuestas acumuladas, historial, sub-flow dinámico).
pub mod answers;
pub mod choice;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod history;
pub mod registry;
pub mod step;
pub mod store;
pub mod subflow;

pub use answers::{merge_json, merge_namespaced, AnswerMap};
pub use engine::{Completion, CompletionState, EngineBuilderInit, EngineConfig, FunnelCtx, FunnelEngine, Transition};
pub use errors::{FunnelError, StorageError};
pub use event::{EventStore, FunnelEvent, FunnelEventKind, InMemoryEventStore};
pub use history::{History, HistoryEntry};
pub use registry::{CompletionAction, RegistryBuilder, StepRegistry};
pub use step::{Enrichment, InputKind, NextStep, StepDefinition, StepView};
pub use store::{AnswerStore, InMemoryPersistence, PersistenceAdapter};
pub use subflow::{SubflowCursor, SubflowDefinition, SubflowState};
