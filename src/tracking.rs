//! Tracking response types and normalization.
//!
//! The tracking endpoint returns one object per queried code, each carrying a
//! nested event history. [`normalize`] flattens that nesting into
//! [`TrackingResult`]: index-aligned arrays where position `i` of every array
//! describes the same event, in the order the carrier reported them.

use serde::Deserialize;

use crate::error::Error;

/// Maximum number of object codes the carrier accepts per tracking request.
pub(crate) const PAGE_LIMIT: usize = 50;

/// How much event history a tracking query returns per object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Only the most recent event (`U`).
    LastEvent,
    /// The full event history (`T`).
    AllEvents,
    /// Only the first recorded event (`P`).
    FirstEvent,
}

impl EventScope {
    pub(crate) fn wire_value(self) -> &'static str {
        match self {
            EventScope::LastEvent => "U",
            EventScope::AllEvents => "T",
            EventScope::FirstEvent => "P",
        }
    }
}

/// One page of the carrier's tracking response.
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectsPage {
    #[serde(default)]
    pub(crate) objetos: Vec<TrackedObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackedObject {
    #[serde(rename = "codObjeto")]
    pub(crate) cod_objeto: String,
    #[serde(default, rename = "dtPrevista")]
    pub(crate) dt_prevista: Option<String>,
    /// Absent (not merely empty) when the carrier has no history for the
    /// code and reports `mensagem` instead.
    #[serde(default)]
    pub(crate) eventos: Option<Vec<TrackingEvent>>,
    #[serde(default)]
    pub(crate) mensagem: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackingEvent {
    #[serde(default, rename = "dtHrCriado")]
    pub(crate) dt_hr_criado: Option<String>,
    #[serde(default)]
    pub(crate) descricao: Option<String>,
    #[serde(default)]
    pub(crate) unidade: Option<TrackingUnit>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TrackingUnit {
    #[serde(default)]
    pub(crate) tipo: Option<String>,
    #[serde(default)]
    pub(crate) endereco: Option<UnitAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UnitAddress {
    #[serde(default)]
    pub(crate) cidade: Option<String>,
    #[serde(default)]
    pub(crate) uf: Option<String>,
}

/// Normalized tracking outcome for a single object code.
///
/// The five event arrays are always the same length and index-aligned: entry
/// `i` holds the timestamp, description, unit type, city and state of the
/// same event. When the carrier has no history for the code (unknown or not
/// yet posted), the arrays are empty and [`message`](Self::message) carries
/// the carrier's explanation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingResult {
    pub code: String,
    /// Expected delivery timestamp, when the carrier forecasts one.
    pub expected_delivery: Option<String>,
    pub event_times: Vec<String>,
    pub descriptions: Vec<String>,
    /// Type of the carrier unit that recorded each event (agency, hub, ...).
    pub unit_types: Vec<String>,
    pub cities: Vec<String>,
    pub states: Vec<String>,
    /// Carrier message when the object has no event history.
    pub message: Option<String>,
}

/// Combined outcome of one tracking call.
///
/// A failed page never discards the other pages: its codes are simply absent
/// from `results` and the failure is recorded in `page_failures`.
#[derive(Debug, Default)]
pub struct TrackingReport {
    /// Normalized objects in page order, then carrier order within a page.
    pub results: Vec<TrackingResult>,
    pub page_failures: Vec<PageFailure>,
}

/// A tracking page that the carrier refused.
#[derive(Debug)]
pub struct PageFailure {
    /// Zero-based index of the failed page of up to 50 codes.
    pub page: usize,
    pub error: Error,
}

pub(crate) fn normalize(object: TrackedObject) -> TrackingResult {
    let mut result = TrackingResult {
        code: object.cod_objeto,
        ..TrackingResult::default()
    };

    let Some(eventos) = object.eventos else {
        result.message = object.mensagem;
        return result;
    };

    result.expected_delivery = object.dt_prevista;
    for event in eventos {
        let unidade = event.unidade.unwrap_or_default();
        let endereco = unidade.endereco.unwrap_or_default();
        result.event_times.push(event.dt_hr_criado.unwrap_or_default());
        result.descriptions.push(event.descricao.unwrap_or_default());
        result.unit_types.push(unidade.tipo.unwrap_or_default());
        result.cities.push(endereco.cidade.unwrap_or_default());
        result.states.push(endereco.uf.unwrap_or_default());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(json: &str) -> TrackedObject {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn arrays_are_index_aligned_with_carrier_order() {
        let result = normalize(object(
            r#"{
                "codObjeto": "AA000000000BR",
                "dtPrevista": "2024-04-10T23:59:59",
                "eventos": [
                    {"dtHrCriado": "2024-04-05T09:00:00", "descricao": "Objeto postado",
                     "unidade": {"tipo": "Agência dos Correios",
                                 "endereco": {"cidade": "Belo Horizonte", "uf": "MG"}}},
                    {"dtHrCriado": "2024-04-06T14:30:00", "descricao": "Objeto em trânsito",
                     "unidade": {"tipo": "Unidade de Tratamento",
                                 "endereco": {"cidade": "São Paulo", "uf": "SP"}}}
                ]
            }"#,
        ));

        assert_eq!(result.code, "AA000000000BR");
        assert_eq!(result.expected_delivery.as_deref(), Some("2024-04-10T23:59:59"));
        for arr in [
            &result.event_times,
            &result.descriptions,
            &result.unit_types,
            &result.cities,
            &result.states,
        ] {
            assert_eq!(arr.len(), 2);
        }
        assert_eq!(result.descriptions[1], "Objeto em trânsito");
        assert_eq!(result.states[0], "MG");
        assert!(result.message.is_none());
    }

    #[test]
    fn missing_event_history_yields_message() {
        let result = normalize(object(
            r#"{"codObjeto": "XX000000000BR", "mensagem": "Objeto não encontrado"}"#,
        ));
        assert_eq!(result.message.as_deref(), Some("Objeto não encontrado"));
        assert!(result.event_times.is_empty());
        assert!(result.expected_delivery.is_none());
    }

    #[test]
    fn empty_event_list_is_not_the_message_case() {
        let result = normalize(object(
            r#"{"codObjeto": "AA000000001BR", "eventos": []}"#,
        ));
        assert!(result.message.is_none());
        assert!(result.event_times.is_empty());
    }

    #[test]
    fn missing_unit_fields_keep_alignment() {
        let result = normalize(object(
            r#"{"codObjeto": "AA000000002BR",
                "eventos": [{"dtHrCriado": "2024-04-05T09:00:00", "descricao": "Postado"}]}"#,
        ));
        assert_eq!(result.unit_types, vec![String::new()]);
        assert_eq!(result.cities, vec![String::new()]);
        assert_eq!(result.states, vec![String::new()]);
    }
}
