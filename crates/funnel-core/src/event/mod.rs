//! Journal de navegación: eventos y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{FunnelEvent, FunnelEventKind};
