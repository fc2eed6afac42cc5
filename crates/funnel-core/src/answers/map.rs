use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::merge::merge_namespaced;

/// Respuestas acumuladas de una instancia de funnel.
///
/// Crece de forma monótona durante la navegación hacia adelante: los campos
/// sólo se agregan o sobreescriben, nunca se eliminan (salvo `clear` en un
/// reset explícito). Se serializa como un objeto JSON plano, que es
/// exactamente el registro persistido.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(Map<String, Value>);

impl AnswerMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Construye un mapa a partir de un `Value`; cualquier cosa que no sea un
    /// objeto produce un mapa vacío.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    /// Atajo para deltas de un solo campo.
    pub fn single(field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = Self::new();
        map.insert(field, value);
        map
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Valor de texto de un campo, si existe y es string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Lista de strings de un campo. Elementos no-string se ignoran.
    pub fn get_list(&self, field: &str) -> Vec<String> {
        match self.0.get(field) {
            Some(Value::Array(items)) => items.iter()
                                              .filter_map(|v| v.as_str().map(str::to_string))
                                              .collect(),
            _ => Vec::new(),
        }
    }

    /// `true` si el campo es exactamente el string `expected`.
    pub fn is(&self, field: &str, expected: &str) -> bool {
        self.get_str(field) == Some(expected)
    }

    /// Respuestas registradas para un ítem dentro de un campo con namespace.
    pub fn item_answers(&self, namespace: &str, item: &str) -> Option<&Map<String, Value>> {
        self.0.get(namespace)?.get(item)?.as_object()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Merge de un delta.
    ///
    /// Shallow a nivel superior, excepto los campos listados en `namespaced`,
    /// que se fusionan por clave de ítem (ver [`merge_namespaced`]).
    pub fn merge(&mut self, delta: AnswerMap, namespaced: &[&str]) {
        for (field, value) in delta.0 {
            let merged = match self.0.get(&field) {
                Some(existing) if namespaced.contains(&field.as_str()) => merge_namespaced(existing, &value),
                _ => value,
            };
            self.0.insert(field, merged);
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for AnswerMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
