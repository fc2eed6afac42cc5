//! Macros utilitarias para reducir boilerplate al definir Steps de pregunta
//! con rama incondicional.
//!
//! Exportadas en la raíz del crate para poder usarlas como:
//!   use funnel_core::question_step;
//!
//! Los steps con ramas condicionales se escriben a mano implementando
//! `StepDefinition`.

/// Declara un step unitario (sin fields) con un `next` fijo.
///
/// Formas soportadas:
/// - question_step! { Name { id, title, prompt, input, next } }
/// - question_step! { Name { id, title, prompt, input, next, accepts: path } }
///   donde `path` es `fn(&AnswerMap) -> bool`.
#[macro_export]
macro_rules! question_step {
    // ---------------- Con predicado de validación ----------------
    (
        $name:ident {
            id: $id:expr,
            title: $title:expr,
            prompt: $prompt:expr,
            input: $input:expr,
            next: $next:expr,
            accepts: $accepts:path $(,)?
        }
    ) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl $crate::step::StepDefinition for $name {
            fn id(&self) -> &str { $id }
            fn title(&self) -> &str { $title }
            fn render(&self, answers: &$crate::answers::AnswerMap, context: Option<&str>) -> $crate::step::StepView {
                $crate::step::StepView::new($id, $title, $prompt, $input).prefilled_from(answers)
                                                                         .with_context(context)
            }
            fn next_step(&self, _answers: &$crate::answers::AnswerMap) -> $crate::step::NextStep { $next }
            fn targets(&self) -> Vec<$crate::step::NextStep> { vec![$next] }
            fn accepts(&self, delta: &$crate::answers::AnswerMap) -> bool { $accepts(delta) }
        }
    };

    // ---------------- Sin predicado: valida contra el InputKind ----------------
    (
        $name:ident {
            id: $id:expr,
            title: $title:expr,
            prompt: $prompt:expr,
            input: $input:expr,
            next: $next:expr $(,)?
        }
    ) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;
        impl $name { pub fn new() -> Self { Self } }
        impl $crate::step::StepDefinition for $name {
            fn id(&self) -> &str { $id }
            fn title(&self) -> &str { $title }
            fn render(&self, answers: &$crate::answers::AnswerMap, context: Option<&str>) -> $crate::step::StepView {
                $crate::step::StepView::new($id, $title, $prompt, $input).prefilled_from(answers)
                                                                         .with_context(context)
            }
            fn next_step(&self, _answers: &$crate::answers::AnswerMap) -> $crate::step::NextStep { $next }
            fn targets(&self) -> Vec<$crate::step::NextStep> { vec![$next] }
            fn accepts(&self, delta: &$crate::answers::AnswerMap) -> bool {
                let input: $crate::step::InputKind = $input;
                input.admits(delta)
            }
        }
    };
}
