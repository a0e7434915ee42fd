//! Keyword responder behind the chat widget.
//!
//! Rules are checked in [`RULES`] order and the first match answers. Payment sits
//! first so a question mixing payment and price/time/route words gets the payment
//! answer.

use serde::{Deserialize, Serialize};

use crate::estimator::SimulationResult;
use crate::format::{format_currency, format_distance, format_duration};

pub const ASSISTANT_DELAY_MS: u32 = 700;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Payment,
    Price,
    Time,
    Route,
}

pub struct Rule {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

pub const RULES: &[Rule] = &[
    Rule {
        topic: Topic::Payment,
        keywords: &["pagamento", "pagar", "pix", "cartão", "cartao", "dinheiro", "boleto"],
    },
    Rule {
        topic: Topic::Price,
        keywords: &[
            "preço",
            "preco",
            "valor",
            "custo",
            "custa",
            "quanto fica",
            "quanto sai",
            "frete",
        ],
    },
    Rule {
        topic: Topic::Time,
        keywords: &[
            "quanto tempo",
            "tempo",
            "demora",
            "prazo",
            "minutos",
            "chega",
            "quando",
        ],
    },
    Rule {
        topic: Topic::Route,
        keywords: &[
            "quantos km",
            "rota",
            "distância",
            "distancia",
            "caminho",
            "km",
            "trajeto",
            "longe",
        ],
    },
];

pub fn classify(question: &str) -> Option<Topic> {
    let question = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| question.contains(kw)))
        .map(|rule| rule.topic)
}

pub fn respond(question: &str, last: Option<&SimulationResult>) -> String {
    match (classify(question), last) {
        (Some(Topic::Payment), Some(result)) => format!(
            "Aceitamos Pix, cartão e dinheiro na entrega. Na sua última simulação você escolheu {}.",
            result.payment.label()
        ),
        (Some(Topic::Payment), None) => {
            "Aceitamos Pix, cartão e dinheiro na entrega.".to_string()
        }
        (Some(Topic::Price), Some(result)) => format!(
            "A entrega de {} até {} sai por {}.",
            result.start_label,
            result.end_label,
            format_currency(result.price)
        ),
        (Some(Topic::Time), Some(result)) => format!(
            "O tempo estimado é de {}, já considerando o trânsito.",
            format_duration(result.time_minutes)
        ),
        (Some(Topic::Route), Some(result)) => format!(
            "O trajeto de {} até {} tem cerca de {}.",
            result.start_label,
            result.end_label,
            format_distance(result.distance_km)
        ),
        (Some(_), None) => {
            "Faça uma simulação de rota primeiro e eu te conto o preço, o tempo e a distância."
                .to_string()
        }
        (None, Some(result)) => format!(
            "Sua última simulação: {} → {}, {} em {}. Pergunte sobre preço, tempo, rota ou pagamento.",
            result.start_label,
            result.end_label,
            format_currency(result.price),
            format_duration(result.time_minutes)
        ),
        (None, None) => {
            "Olá! Posso ajudar com preço, tempo de entrega, rota ou formas de pagamento.".to_string()
        }
    }
}
