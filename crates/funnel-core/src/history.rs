//! Pilas de historial para navegación hacia atrás.

use serde::{Deserialize, Serialize};

/// Entrada del historial externo.
///
/// `Subflow` es el marcador sintético que representa un sub-flow completo:
/// se apila una sola vez al salir del sub-flow, de modo que un `back` desde
/// el step posterior reingresa al historial propio del sub-flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryEntry {
    Step(String),
    Subflow(String),
}

/// Pila LIFO simple. `pop` sobre vacío devuelve `None` (no-op).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History<T> {
    entries: Vec<T>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_order_and_empty_pop() {
        let mut h = History::new();
        assert_eq!(h.pop(), None);
        h.push(HistoryEntry::Step("age".into()));
        h.push(HistoryEntry::Subflow("ht1Medications".into()));
        assert_eq!(h.len(), 2);
        assert_eq!(h.pop(), Some(HistoryEntry::Subflow("ht1Medications".into())));
        assert_eq!(h.pop(), Some(HistoryEntry::Step("age".into())));
        assert!(h.is_empty());
    }
}
