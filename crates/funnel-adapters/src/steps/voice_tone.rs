//! Steps del funnel de voz y tono (`/voice-tone`).
//!
//! Secuencia lineal de once pantallas. Casi todas son selecciones con un
//! rango de cantidad permitido, descritas como datos (`ChoiceStep`).

use serde_json::Value;

use funnel_core::{AnswerMap, InputKind, NextStep, StepDefinition, StepView};

pub const MISSION_SELECTION: &str = "mission_selection";
pub const CORE_VALUES: &str = "core_values";
pub const COMPETITIVE_DIFFERENTIALS: &str = "competitive_differentials";
pub const MARKET_SEGMENT: &str = "market_segment";
pub const COMPETITIVE_CONTEXT: &str = "competitive_context";
pub const TARGET_AUDIENCE: &str = "target_audience";
pub const PUBLIC_PERCEPTION: &str = "public_perception";
pub const EMOTIONAL_BENEFITS: &str = "emotional_benefits";
pub const REASONS_TO_BELIEVE: &str = "reasons_to_believe";
pub const PERSONALITY_ATTRIBUTES: &str = "personality_attributes";
pub const BRAND_CONSISTENCY: &str = "brand_consistency";

pub const OTHER_SEGMENT: &str = "Outro (Nicho Específico)";

const MISSIONS: &[&str] = &["Transformação do cliente",
                            "Impacto social/cultural",
                            "Excelência e inovação",
                            "Propósito pessoal/profissional",
                            "Eficiência/Simplificação",
                            "Acesso/Democratização",
                            "Conexão/Comunidade",
                            "Liberdade/Autonomia",
                            "Legado/Inspiração",
                            "Especialização/Nicho",
                            "Proteção/Segurança",
                            "Prazer/Estilo de vida",
                            "Performance/Alta competição",
                            "Sustentabilidade/Meio ambiente",
                            "Educação/Consciência",
                            "Exclusividade/Status",
                            "Velocidade/Agilidade",
                            "Exploração/Descoberta",
                            "Identidade/Expressão pessoal",
                            "Transformação cultural/comportamental",
                            "Colaboração/Cocriação",
                            "Justiça/Equidade"];

const CORE_VALUE_OPTIONS: &[&str] = &["Ética e Integridade",
                                      "Respeito às Pessoas",
                                      "Excelência e Qualidade",
                                      "Inovação e Curiosidade",
                                      "Foco no Cliente",
                                      "Colaboração e Trabalho em Equipe",
                                      "Sustentabilidade e Responsabilidade Social",
                                      "Liberdade e Autonomia",
                                      "Coragem e Resiliência",
                                      "Humanidade e Empatia",
                                      "Disciplina",
                                      "Transparência Radical",
                                      "Velocidade/Agilidade",
                                      "Meritocracia e Reconhecimento",
                                      "Accountability (Responsabilização)",
                                      "Aprendizado Contínuo"];

const DIFFERENTIALS: &[&str] = &["Preço Acessível / Custo-benefício",
                                 "Qualidade Superior",
                                 "Inovação Tecnológica",
                                 "Atendimento e Suporte Excepcional",
                                 "Personalização/Flexibilidade",
                                 "Marca Autêntica/História Única",
                                 "Velocidade/Agilidade na Entrega",
                                 "Conveniência e Facilidade de Uso",
                                 "Expertise/Especialização",
                                 "Impacto Socioambiental Positivo",
                                 "Comunidade e Networking",
                                 "Parcerias ou Acessos Exclusivos"];

const SEGMENTS: &[&str] = &["Tecnologia (Software/Serviços Digitais)",
                            "Finanças (Fintech/Serviços Financeiros)",
                            "Saúde e Bem-estar",
                            "Educação",
                            "Varejo e Bens de Consumo",
                            "Alimentação/Hospitalidade",
                            "Indústria/Manufatura",
                            "Serviços Profissionais",
                            "ONG/Impacto Social",
                            OTHER_SEGMENT];

const CONTEXTS: &[&str] = &["\"Pioneira\" – Mercado Emergente",
                            "\"Desafiante\" – Ingressando contra Gigantes",
                            "\"Disruptiva\" – Quebrando o Status Quo",
                            "\"Líder estabelecida\" – Referência de Mercado",
                            "\"Especialista de Nicho\" – Foco segmentado",
                            "\"Concorrência Fragmentada\" – Muitos Jogadores Pequenos"];

const AUDIENCES: &[&str] = &["Jovens Adultos Urbanos",
                             "Famílias e Pais/Mães",
                             "Adolescentes / Geração Z",
                             "Profissionais em Início de Carreira",
                             "Classe Alta / Público Premium",
                             "Nichos de Interesse Específico",
                             "Seniors da Melhor Idade",
                             "Pequenas e Médias Empresas",
                             "Grandes Empresas / Corporativo",
                             "Startups e Empresas Inovadoras",
                             "Setor Público/Instituições",
                             "Por Área de Atuação",
                             "Decisores e Personas Específicas"];

const PERCEPTIONS: &[&str] = &["Desconhecimento",
                               "Ceticismo",
                               "Insatisfação Latente",
                               "Satisfeito com Concorrente",
                               "Sensível a Preço",
                               "Consciente e Exigente",
                               "Entusiastas da Marca (caso já tenha clientes)"];

const BENEFITS: &[&str] = &["Tranquilidade/Paz de Espírito",
                            "Sentimento de Confiança",
                            "Status/Orgulho",
                            "Pertencimento",
                            "Inspiração/Motivação",
                            "Diversão/Alegria",
                            "Realização Pessoal",
                            "Alívio/Conforto",
                            "Conexão Emocional",
                            "Autonomia/Liberdade"];

const REASONS: &[&str] = &["Expertise e Experiência",
                           "Tecnologia Proprietária/Metodologia Comprovada",
                           "Casos de Sucesso e Depoimentos",
                           "Certificações/Prêmios/Recomendações",
                           "Parcerias Estratégicas",
                           "Qualidade Superior do Produto",
                           "Garantias e Políticas Claras",
                           "Comunidade de Usuários Engajada",
                           "Resultados Mensuráveis",
                           "Missão/Valores Fortes (Confiabilidade Moral)"];

/// Pares de atributos opuestos, aplanados.
const ATTRIBUTES: &[&str] = &["Amigável / Conversacional",
                              "Formal / Polido",
                              "Descontraído / Divertido",
                              "Sério / Sóbrio",
                              "Inspirador / Emocional",
                              "Informativo / Direto",
                              "Inovador / Vanguardista",
                              "Tradicional / Conservador",
                              "Autoritativo / Especialista",
                              "Humilde / Colaborativo",
                              "Enérgico / Entusiasmado",
                              "Calmo / Paciente",
                              "Exclusivo / Sofisticado",
                              "Acessível / Simples",
                              "Empático / Acolhedor",
                              "Objetivo / Frio"];

const CONSISTENCY: &[&str] = &["Guia de Tom de Voz Formalizado",
                               "Identidade Visual e Mensagens-Chave Coerentes",
                               "Adequação Multicanal",
                               "Treinamento Interno Contínuo",
                               "Ser Líder no Mercado X",
                               "Expandir Portfólio de Produtos/Serviços",
                               "Alcançar Novos Segmentos de Cliente",
                               "Impacto e Legado",
                               "Flexibilidade na Narrativa"];

/// Pantalla de selección descrita como datos.
///
/// `min`/`max` acotan la cantidad de opciones elegidas; con `single` el
/// campo guarda un string en vez de una lista.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceStep {
    pub id: &'static str,
    pub title: &'static str,
    pub prompt: &'static str,
    pub field: &'static str,
    pub options: &'static [&'static str],
    pub single: bool,
    pub min: usize,
    pub max: Option<usize>,
    pub next: Option<&'static str>,
}

impl ChoiceStep {
    fn input(&self) -> InputKind {
        if self.single {
            InputKind::single(self.field, self.options)
        } else {
            InputKind::multi(self.field, self.options)
        }
    }

    fn selected(&self, delta: &AnswerMap) -> Option<Vec<String>> {
        match delta.get(self.field)? {
            Value::String(s) if self.single => Some(vec![s.clone()]),
            Value::Array(_) if !self.single => Some(delta.get_list(self.field)),
            _ => None,
        }
    }
}

impl StepDefinition for ChoiceStep {
    fn id(&self) -> &str {
        self.id
    }

    fn title(&self) -> &str {
        self.title
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(self.id, self.title, self.prompt, self.input()).prefilled_from(answers)
                                                                     .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        match self.next {
            Some(id) => NextStep::to(id),
            None => NextStep::Complete,
        }
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![self.next_step(&AnswerMap::new())]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        let Some(selected) = self.selected(delta) else { return false };
        let known = selected.iter().all(|s| self.options.contains(&s.as_str()));
        let n = selected.len();
        known && n >= self.min && self.max.map_or(true, |m| n <= m)
    }
}

pub fn mission_selection() -> ChoiceStep {
    ChoiceStep { id: MISSION_SELECTION,
                 title: "Missão",
                 prompt: "Qual é a missão central da marca?",
                 field: "brandMissions",
                 options: MISSIONS,
                 single: false,
                 min: 1,
                 max: Some(3),
                 next: Some(CORE_VALUES) }
}

pub fn core_values() -> ChoiceStep {
    ChoiceStep { id: CORE_VALUES,
                 title: "Valores",
                 prompt: "Quais valores não são negociáveis da marca?",
                 field: "coreValues",
                 options: CORE_VALUE_OPTIONS,
                 single: false,
                 min: 1,
                 max: Some(3),
                 next: Some(COMPETITIVE_DIFFERENTIALS) }
}

pub fn competitive_differentials() -> ChoiceStep {
    ChoiceStep { id: COMPETITIVE_DIFFERENTIALS,
                 title: "Diferenciais",
                 prompt: "Quais são os diferenciais competitivos da marca?",
                 field: "competitiveDifferentials",
                 options: DIFFERENTIALS,
                 single: false,
                 min: 1,
                 max: Some(3),
                 next: Some(MARKET_SEGMENT) }
}

pub fn competitive_context() -> ChoiceStep {
    ChoiceStep { id: COMPETITIVE_CONTEXT,
                 title: "Contexto competitivo",
                 prompt: "Como a marca se posiciona frente à concorrência?",
                 field: "competitiveContext",
                 options: CONTEXTS,
                 single: true,
                 min: 1,
                 max: Some(1),
                 next: Some(TARGET_AUDIENCE) }
}

pub fn target_audience() -> ChoiceStep {
    ChoiceStep { id: TARGET_AUDIENCE,
                 title: "Público-alvo",
                 prompt: "Quem é o público-alvo da marca?",
                 field: "targetAudience",
                 options: AUDIENCES,
                 single: false,
                 min: 1,
                 max: None,
                 next: Some(PUBLIC_PERCEPTION) }
}

pub fn public_perception() -> ChoiceStep {
    ChoiceStep { id: PUBLIC_PERCEPTION,
                 title: "Percepção",
                 prompt: "Como o público percebe a categoria hoje?",
                 field: "publicPerception",
                 options: PERCEPTIONS,
                 single: true,
                 min: 1,
                 max: Some(1),
                 next: Some(EMOTIONAL_BENEFITS) }
}

pub fn emotional_benefits() -> ChoiceStep {
    ChoiceStep { id: EMOTIONAL_BENEFITS,
                 title: "Benefício emocional",
                 prompt: "Qual sentimento a marca deve despertar?",
                 field: "emotionalBenefit",
                 options: BENEFITS,
                 single: true,
                 min: 1,
                 max: Some(1),
                 next: Some(REASONS_TO_BELIEVE) }
}

pub fn reasons_to_believe() -> ChoiceStep {
    ChoiceStep { id: REASONS_TO_BELIEVE,
                 title: "Razões para acreditar",
                 prompt: "Por que o público deve acreditar na marca?",
                 field: "reasonsToBelieves",
                 options: REASONS,
                 single: false,
                 min: 1,
                 max: Some(2),
                 next: Some(PERSONALITY_ATTRIBUTES) }
}

pub fn personality_attributes() -> ChoiceStep {
    ChoiceStep { id: PERSONALITY_ATTRIBUTES,
                 title: "Personalidade",
                 prompt: "Quais atributos definem a personalidade da marca?",
                 field: "personalityAttributes",
                 options: ATTRIBUTES,
                 single: false,
                 min: 3,
                 max: Some(5),
                 next: Some(BRAND_CONSISTENCY) }
}

pub fn brand_consistency() -> ChoiceStep {
    ChoiceStep { id: BRAND_CONSISTENCY,
                 title: "Consistência",
                 prompt: "Quais elementos de branding e planos de expansão são relevantes?",
                 field: "brandConsistencyElements",
                 options: CONSISTENCY,
                 single: false,
                 min: 1,
                 max: None,
                 next: None }
}

/// Segmento de mercado; `Outro` exige el texto libre `customMarketSegment`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketSegment;

impl StepDefinition for MarketSegment {
    fn id(&self) -> &str {
        MARKET_SEGMENT
    }

    fn title(&self) -> &str {
        "Segmento"
    }

    fn render(&self, answers: &AnswerMap, context: Option<&str>) -> StepView {
        StepView::new(MARKET_SEGMENT,
                      "Segmento",
                      "Em qual segmento de mercado a marca atua?",
                      InputKind::single("marketSegment", SEGMENTS)).prefilled_from(answers)
                                                                   .with_context(context)
    }

    fn next_step(&self, _answers: &AnswerMap) -> NextStep {
        NextStep::to(COMPETITIVE_CONTEXT)
    }

    fn targets(&self) -> Vec<NextStep> {
        vec![NextStep::to(COMPETITIVE_CONTEXT)]
    }

    fn accepts(&self, delta: &AnswerMap) -> bool {
        match delta.get_str("marketSegment") {
            Some(OTHER_SEGMENT) => delta.get_str("customMarketSegment").is_some_and(|c| !c.trim().is_empty()),
            Some(segment) => SEGMENTS.contains(&segment),
            None => false,
        }
    }

    /// Un segmento predefinido limpia el texto libre anterior.
    fn normalize(&self, mut delta: AnswerMap) -> AnswerMap {
        let custom = match delta.get_str("marketSegment") {
            Some(OTHER_SEGMENT) => delta.get_str("customMarketSegment").unwrap_or_default().trim().to_string(),
            Some(_) => String::new(),
            None => return delta,
        };
        delta.insert("customMarketSegment", custom);
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bounded_multi_select() {
        let step = personality_attributes();
        let two = AnswerMap::from_value(json!({"personalityAttributes": ["Formal / Polido", "Calmo / Paciente"]}));
        assert!(!step.accepts(&two));
        let three = AnswerMap::from_value(json!({"personalityAttributes":
                                                     ["Formal / Polido", "Calmo / Paciente", "Objetivo / Frio"]}));
        assert!(step.accepts(&three));
        let unknown = AnswerMap::from_value(json!({"personalityAttributes": ["a", "b", "c"]}));
        assert!(!step.accepts(&unknown));
    }

    #[test]
    fn single_choice_requires_a_string() {
        let step = public_perception();
        assert!(step.accepts(&AnswerMap::single("publicPerception", "Ceticismo")));
        assert!(!step.accepts(&AnswerMap::from_value(json!({"publicPerception": ["Ceticismo"]}))));
    }

    #[test]
    fn custom_segment_only_for_other() {
        let other = MarketSegment.normalize(AnswerMap::from_value(json!({"marketSegment": OTHER_SEGMENT,
                                                                          "customMarketSegment": "  Pet shops "})));
        assert!(MarketSegment.accepts(&other));
        assert_eq!(other.get_str("customMarketSegment"), Some("Pet shops"));

        let missing = AnswerMap::single("marketSegment", OTHER_SEGMENT);
        assert!(!MarketSegment.accepts(&MarketSegment.normalize(missing)));

        let fixed = MarketSegment.normalize(AnswerMap::from_value(json!({"marketSegment": "Educação",
                                                                          "customMarketSegment": "x"})));
        assert_eq!(fixed.get_str("customMarketSegment"), Some(""));
        assert!(MarketSegment.accepts(&fixed));
    }

    #[test]
    fn last_step_completes() {
        assert_eq!(brand_consistency().next_step(&AnswerMap::new()), NextStep::Complete);
    }
}
