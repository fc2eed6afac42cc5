//! Persistencia local de respuestas: trait `PersistenceAdapter` (inyectado)
//! y `AnswerStore`.

mod adapter;
mod answer_store;

pub use adapter::{InMemoryPersistence, PersistenceAdapter};
pub use answer_store::AnswerStore;
