//! Constantes del motor core.
//!
//! Agrupa nombres de campos reservados, namespaces de persistencia y
//! duraciones fijas de la animación de carga. Los namespaces se mantienen
//! estables entre versiones: cambiarlos equivale a perder el progreso
//! guardado de los usuarios.

use std::time::Duration;

/// Campo del `AnswerMap` donde se guardan las respuestas por medicamento.
/// Es el único campo con merge profundo por clave de ítem.
pub const MEDICATION_ANSWERS: &str = "medicationAnswers";

/// Campo con la lista de medicamentos elegida que dispara el sub-flow.
pub const MEDICATION_ITEMS: &str = "ht1Medications";

/// Namespace de almacenamiento del funnel de onboarding.
pub const ONBOARD_NAMESPACE: &str = "prevent-quiz-onboard-data";
/// Namespace del quiz de salud (legacy).
pub const HEALTH_NAMESPACE: &str = "prevent-quiz-responses";
/// Namespace del funnel de voz y tono.
pub const VOICE_TONE_NAMESPACE: &str = "prevent-quiz-voice-tone-data";

/// Animación de la fase 1 del onboarding (~4 s).
pub const ONBOARD_LOADING: Duration = Duration::from_millis(4000);
/// Animación del quiz de salud: 3 s fijos más el fade final de 400 ms.
pub const HEALTH_LOADING: Duration = Duration::from_millis(3400);
/// Transición final del funnel de voz y tono.
pub const VOICE_TONE_LOADING: Duration = Duration::from_millis(1500);
