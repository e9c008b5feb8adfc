//! Pre-shipment registration: request construction and receipt extraction.
//!
//! A pre-shipment submits the full shipment record (sender, recipient,
//! package, add-on services, fiscal note) ahead of drop-off; the carrier
//! answers with the generated identifiers, including the tracking code.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Error;

/// Structured address as the carrier expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "cep")]
    pub postal_code: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(default, rename = "complemento", skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    #[serde(rename = "bairro")]
    pub district: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "uf")]
    pub state: String,
}

/// Sender or recipient of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    #[serde(rename = "nome")]
    pub name: String,
    /// Two-digit mobile area code.
    #[serde(rename = "dddCelular")]
    pub mobile_area_code: String,
    #[serde(rename = "celular")]
    pub mobile: String,
    /// CPF or CNPJ, digits only.
    #[serde(rename = "cpfCnpj")]
    pub tax_id: String,
    #[serde(rename = "endereco")]
    pub address: Address,
}

/// Parameters for a pre-shipment registration.
///
/// Like [`crate::PriceRequest`], this accepts either a struct literal or a
/// single JSON record via [`PrepostRequest::from_value`] (the serde names
/// are the caller-facing field names). When `sender` is absent the client
/// falls back to the configured default sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepostRequest {
    /// Carrier product code, e.g. `03298`.
    #[serde(rename = "servico")]
    pub service: String,
    /// Add-on service mnemonics (`RR`, `VD`, ...).
    #[serde(default, rename = "codigosServicosAdicionais")]
    pub add_ons: Vec<String>,
    #[serde(rename = "destinatario")]
    pub recipient: Party,
    #[serde(default, rename = "remetente", skip_serializing_if = "Option::is_none")]
    pub sender: Option<Party>,
    /// Declared value; forwarded with the `VD` add-on when present.
    #[serde(default, rename = "valorDeclarado", skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<String>,
    /// Instructions for the neighbor-delivery add-on (`EV`) when present.
    #[serde(
        default,
        rename = "orientacaoEntregaVizinho",
        skip_serializing_if = "Option::is_none"
    )]
    pub neighbor_instructions: Option<String>,
    /// Fiscal note number.
    #[serde(default, rename = "nNFe", skip_serializing_if = "Option::is_none")]
    pub fiscal_note_number: Option<String>,
    /// Fiscal note access key (44 digits).
    #[serde(default, rename = "chNfe", skip_serializing_if = "Option::is_none")]
    pub fiscal_note_key: Option<String>,
    /// Weight in grams.
    #[serde(rename = "pesoInformado")]
    pub weight: String,
    #[serde(rename = "altura")]
    pub height: String,
    #[serde(rename = "largura")]
    pub width: String,
    #[serde(rename = "comprimento")]
    pub length: String,
    /// `S` to request carrier collection, `N` otherwise.
    #[serde(rename = "coleta")]
    pub request_collection: String,
    #[serde(rename = "dataPrevistaPostagem")]
    pub posting_date: String,
    /// Carrier payment mode code.
    #[serde(rename = "pagamento")]
    pub payment_mode: String,
    /// `S` for a reverse-logistics shipment, `N` otherwise.
    #[serde(rename = "reversa")]
    pub reverse_logistics: String,
}

impl PrepostRequest {
    /// Accepts the "single record" call style: one JSON object holding the
    /// named parameters.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::InvalidArgument(
                "pre-shipment parameters must be a single JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidArgument(format!("bad pre-shipment parameters: {e}")))
    }
}

/// One entry of the outgoing `listaServicoAdicional`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AddOnSelection {
    #[serde(rename = "codigoServicoAdicional")]
    pub(crate) code: String,
    #[serde(rename = "valorDeclarado", skip_serializing_if = "Option::is_none")]
    pub(crate) declared_value: Option<String>,
    #[serde(
        rename = "orientacaoEntregaVizinho",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) neighbor_instructions: Option<String>,
}

/// Translates the requested add-on mnemonics for the requested product.
///
/// `VD` carries the declared value and `EV` the neighbor instructions when
/// those were supplied; every other accepted add-on is the bare identifier.
/// A product absent from the catalog yields no entries at all.
pub(crate) fn add_on_selections(request: &PrepostRequest, catalog: &Catalog) -> Vec<AddOnSelection> {
    let Some(product) = catalog.product(&request.service) else {
        return Vec::new();
    };

    request
        .add_ons
        .iter()
        .filter_map(|name| {
            let code = product.add_on_code(name)?.to_string();
            let mut selection = AddOnSelection {
                code,
                declared_value: None,
                neighbor_instructions: None,
            };
            if name == "VD" {
                selection.declared_value = request.declared_value.clone();
            } else if name == "EV" {
                selection.neighbor_instructions = request.neighbor_instructions.clone();
            }
            Some(selection)
        })
        .collect()
}

/// The carrier's pre-shipment template with the request overlaid.
#[derive(Debug, Serialize)]
pub(crate) struct PrepostPayload {
    #[serde(rename = "remetente")]
    pub(crate) sender: Party,
    #[serde(rename = "destinatario")]
    pub(crate) recipient: Party,
    #[serde(rename = "codigoServico")]
    pub(crate) service_code: String,
    #[serde(rename = "numeroNotaFiscal", skip_serializing_if = "Option::is_none")]
    pub(crate) fiscal_note_number: Option<String>,
    #[serde(rename = "chaveNFe", skip_serializing_if = "Option::is_none")]
    pub(crate) fiscal_note_key: Option<String>,
    #[serde(rename = "numeroCartaoPostagem")]
    pub(crate) postage_card: String,
    #[serde(rename = "listaServicoAdicional")]
    pub(crate) add_ons: Vec<AddOnSelection>,
    #[serde(rename = "pesoInformado")]
    pub(crate) weight: String,
    #[serde(rename = "alturaInformada")]
    pub(crate) height: String,
    #[serde(rename = "larguraInformada")]
    pub(crate) width: String,
    #[serde(rename = "comprimentoInformado")]
    pub(crate) length: String,
    #[serde(rename = "cienteObjetoNaoProibido")]
    pub(crate) object_not_prohibited: String,
    #[serde(rename = "solicitarColeta")]
    pub(crate) request_collection: String,
    #[serde(rename = "dataPrevistaPostagem")]
    pub(crate) posting_date: String,
    #[serde(rename = "modalidadePagamento")]
    pub(crate) payment_mode: String,
    #[serde(rename = "logisticaReversa")]
    pub(crate) reverse_logistics: String,
}

pub(crate) fn build_payload(
    request: &PrepostRequest,
    sender: Party,
    postage_card: &str,
    add_ons: Vec<AddOnSelection>,
) -> PrepostPayload {
    PrepostPayload {
        sender,
        recipient: request.recipient.clone(),
        service_code: request.service.clone(),
        fiscal_note_number: request.fiscal_note_number.clone(),
        fiscal_note_key: request.fiscal_note_key.clone(),
        postage_card: postage_card.to_string(),
        add_ons,
        weight: request.weight.clone(),
        height: request.height.clone(),
        width: request.width.clone(),
        length: request.length.clone(),
        // Template default: the declaration that the contents are not
        // prohibited is always submitted.
        object_not_prohibited: "S".to_string(),
        request_collection: request.request_collection.clone(),
        posting_date: request.posting_date.clone(),
        payment_mode: request.payment_mode.clone(),
        reverse_logistics: request.reverse_logistics.clone(),
    }
}

/// Identifiers generated by the carrier for a registered pre-shipment.
///
/// Fields mirror what the carrier actually returned; a missing field is
/// `None` rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrepostReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "codigoServico")]
    pub service_code: Option<String>,
    #[serde(default, rename = "numeroNotaFiscal")]
    pub fiscal_note_number: Option<String>,
    /// The generated tracking code.
    #[serde(default, rename = "codigoObjeto")]
    pub object_code: Option<String>,
    #[serde(default, rename = "dataHora")]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn party() -> Party {
        Party {
            name: "LUIZ CARLOS".into(),
            mobile_area_code: "31".into(),
            mobile: "999999999".into(),
            tax_id: "29939998207".into(),
            address: Address {
                postal_code: "17217850".into(),
                street: "Rua dos Bobos".into(),
                number: "0".into(),
                complement: Some("casa".into()),
                district: "Jardim Cial".into(),
                city: "São Paulo".into(),
                state: "SP".into(),
            },
        }
    }

    fn request() -> PrepostRequest {
        PrepostRequest {
            service: "03298".into(),
            add_ons: vec!["RR".into(), "VD".into()],
            recipient: party(),
            sender: Some(party()),
            declared_value: Some("214.10".into()),
            neighbor_instructions: None,
            fiscal_note_number: Some("349".into()),
            fiscal_note_key: Some("31241441856872000179550010000003491717558899".into()),
            weight: "460".into(),
            height: "4".into(),
            width: "12".into(),
            length: "17".into(),
            request_collection: "N".into(),
            posting_date: "10/04/2024".into(),
            payment_mode: "2".into(),
            reverse_logistics: "N".into(),
        }
    }

    #[test]
    fn vd_carries_declared_value_and_others_are_bare() {
        let selections = add_on_selections(&request(), &Catalog::default());
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].code, "025");
        assert!(selections[0].declared_value.is_none());
        assert_eq!(selections[1].code, "064");
        assert_eq!(selections[1].declared_value.as_deref(), Some("214.10"));
    }

    #[test]
    fn ev_carries_neighbor_instructions_when_supplied() {
        let mut req = request();
        req.service = "03220".into();
        req.add_ons = vec!["EV".into()];
        req.neighbor_instructions = Some("entregar ao vizinho da casa 2".into());
        let selections = add_on_selections(&req, &Catalog::default());
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].code, "011");
        assert_eq!(
            selections[0].neighbor_instructions.as_deref(),
            Some("entregar ao vizinho da casa 2")
        );
    }

    #[test]
    fn unknown_product_yields_no_selections() {
        let mut req = request();
        req.service = "99999".into();
        assert!(add_on_selections(&req, &Catalog::default()).is_empty());
    }

    #[test]
    fn record_style_matches_struct_literal() {
        let from_record = PrepostRequest::from_value(json!({
            "servico": "03298",
            "codigosServicosAdicionais": ["RR", "VD"],
            "destinatario": serde_json::to_value(party()).unwrap(),
            "remetente": serde_json::to_value(party()).unwrap(),
            "valorDeclarado": "214.10",
            "nNFe": "349",
            "chNfe": "31241441856872000179550010000003491717558899",
            "pesoInformado": "460",
            "altura": "4",
            "largura": "12",
            "comprimento": "17",
            "coleta": "N",
            "dataPrevistaPostagem": "10/04/2024",
            "pagamento": "2",
            "reversa": "N"
        }))
        .unwrap();
        assert_eq!(from_record, request());
    }

    #[test]
    fn payload_injects_postage_card_and_template_defaults() {
        let req = request();
        let add_ons = add_on_selections(&req, &Catalog::default());
        let payload = build_payload(&req, party(), "0067599079", add_ons);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["numeroCartaoPostagem"], "0067599079");
        assert_eq!(value["codigoServico"], "03298");
        assert_eq!(value["cienteObjetoNaoProibido"], "S");
        assert_eq!(value["pesoInformado"], "460");
        assert_eq!(value["alturaInformada"], "4");
        assert_eq!(value["remetente"]["endereco"]["cep"], "17217850");
        assert_eq!(
            value["listaServicoAdicional"][1]["valorDeclarado"],
            "214.10"
        );
    }
}
