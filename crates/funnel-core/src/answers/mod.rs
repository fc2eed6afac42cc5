//! Respuestas acumuladas (`AnswerMap`) y utilidades de merge.

mod map;
pub mod merge;

pub use map::AnswerMap;
pub use merge::{merge_json, merge_namespaced};
