//! Price quote request construction and response extraction.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Error;

/// Parameters for a price quote batch.
///
/// Two construction styles are supported and produce identical request
/// bodies: a plain struct literal with named fields, or
/// [`PriceRequest::from_value`] for callers holding the parameters as one
/// JSON record (the serde names below are the carrier's own field names).
///
/// `declared_value` only participates when `add_ons` requests the
/// declared-value insurance service (`VD`); otherwise it is dropped from the
/// outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRequest {
    #[serde(rename = "coProduto")]
    pub product_codes: Vec<String>,
    #[serde(rename = "cepOrigem")]
    pub origin_zip: String,
    #[serde(rename = "cepDestino")]
    pub destination_zip: String,
    /// Weight in grams, as the carrier expects it (a string).
    #[serde(rename = "psObjeto")]
    pub weight: String,
    /// Object format code (e.g. `2` for a box).
    #[serde(rename = "tpObjeto")]
    pub object_type: String,
    #[serde(rename = "altura")]
    pub height: String,
    #[serde(rename = "largura")]
    pub width: String,
    #[serde(rename = "comprimento")]
    pub length: String,
    #[serde(default, rename = "vlDeclarado", skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<String>,
    #[serde(rename = "dtEvento")]
    pub posting_date: String,
    /// Add-on service mnemonics (`AR`, `VD`, ...), translated per product
    /// through the catalog.
    #[serde(rename = "servicosAdicionais")]
    pub add_ons: Vec<String>,
}

impl PriceRequest {
    /// Accepts the "single record" call style: one JSON object holding the
    /// named parameters. Anything that is not a JSON object, or that is
    /// missing required fields, is an [`Error::InvalidArgument`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::InvalidArgument(
                "price parameters must be a single JSON object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| Error::InvalidArgument(format!("bad price parameters: {e}")))
    }
}

/// One per-product entry of the outgoing price batch.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PriceParams {
    #[serde(rename = "coProduto")]
    product_code: String,
    #[serde(rename = "nuContrato")]
    contract: String,
    #[serde(rename = "nuDR")]
    regional_code: u32,
    #[serde(rename = "cepOrigem")]
    origin_zip: String,
    #[serde(rename = "cepDestino")]
    destination_zip: String,
    #[serde(rename = "psObjeto")]
    weight: String,
    #[serde(rename = "tpObjeto")]
    object_type: String,
    #[serde(rename = "altura")]
    height: String,
    #[serde(rename = "largura")]
    width: String,
    #[serde(rename = "comprimento")]
    length: String,
    #[serde(rename = "vlDeclarado", skip_serializing_if = "Option::is_none")]
    declared_value: Option<String>,
    #[serde(rename = "dtEvento")]
    posting_date: String,
    #[serde(rename = "servicosAdicionais")]
    add_on_codes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PriceBatch {
    #[serde(rename = "idLote")]
    pub(crate) batch_id: String,
    #[serde(rename = "parametrosProduto")]
    pub(crate) entries: Vec<PriceParams>,
}

/// Expands the request into per-product entries.
///
/// Products absent from the catalog are silently skipped, as are add-on
/// mnemonics a product does not accept. The declared value survives only
/// when `VD` was requested.
pub(crate) fn build_batch(
    request: &PriceRequest,
    catalog: &Catalog,
    contract: &str,
    regional_code: u32,
) -> PriceBatch {
    let declared_value = if request.add_ons.iter().any(|s| s == "VD") {
        request.declared_value.clone()
    } else {
        None
    };

    let entries = request
        .product_codes
        .iter()
        .filter_map(|code| {
            let product = catalog.product(code)?;
            let add_on_codes = request
                .add_ons
                .iter()
                .filter_map(|name| product.add_on_code(name))
                .map(str::to_string)
                .collect();

            Some(PriceParams {
                product_code: code.clone(),
                contract: contract.to_string(),
                regional_code,
                origin_zip: request.origin_zip.clone(),
                destination_zip: request.destination_zip.clone(),
                weight: request.weight.clone(),
                object_type: request.object_type.clone(),
                height: request.height.clone(),
                width: request.width.clone(),
                length: request.length.clone(),
                declared_value: declared_value.clone(),
                posting_date: request.posting_date.clone(),
                add_on_codes,
            })
        })
        .collect();

    PriceBatch {
        batch_id: "1".to_string(),
        entries,
    }
}

/// One element of the carrier's price response array.
#[derive(Debug, Deserialize)]
pub(crate) struct PriceEntry {
    #[serde(default, rename = "coProduto")]
    pub(crate) product_code: String,
    #[serde(default, rename = "pcFinal")]
    pub(crate) final_price: String,
}

/// Final quoted price for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub product_code: String,
    /// Price as formatted by the carrier, e.g. `27,30`.
    pub final_price: String,
}

impl From<PriceEntry> for PriceQuote {
    fn from(entry: PriceEntry) -> Self {
        Self {
            product_code: entry.product_code,
            final_price: entry.final_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> PriceRequest {
        PriceRequest {
            product_codes: vec!["03220".into(), "03298".into()],
            origin_zip: "33110580".into(),
            destination_zip: "33145160".into(),
            weight: "300".into(),
            object_type: "2".into(),
            height: "4".into(),
            width: "12".into(),
            length: "17".into(),
            declared_value: Some("50".into()),
            posting_date: "06/04/2024".into(),
            add_ons: vec!["RR".into()],
        }
    }

    #[test]
    fn record_and_named_field_styles_build_the_same_body() {
        let from_record = PriceRequest::from_value(json!({
            "coProduto": ["03220", "03298"],
            "cepOrigem": "33110580",
            "cepDestino": "33145160",
            "psObjeto": "300",
            "tpObjeto": "2",
            "altura": "4",
            "largura": "12",
            "comprimento": "17",
            "vlDeclarado": "50",
            "dtEvento": "06/04/2024",
            "servicosAdicionais": ["RR"]
        }))
        .unwrap();

        assert_eq!(from_record, request());

        let catalog = Catalog::default();
        let a = build_batch(&from_record, &catalog, "9912345678", 20);
        let b = build_batch(&request(), &catalog, "9912345678", 20);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }

    #[test]
    fn non_record_input_is_invalid_argument() {
        let err = PriceRequest::from_value(json!(["03220"])).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn declared_value_dropped_without_vd() {
        let batch = build_batch(&request(), &Catalog::default(), "9912345678", 20);
        let value = serde_json::to_value(&batch).unwrap();
        for entry in value["parametrosProduto"].as_array().unwrap() {
            assert!(entry.get("vlDeclarado").is_none());
        }
    }

    #[test]
    fn declared_value_kept_with_vd_and_translated_per_product() {
        let mut req = request();
        req.add_ons = vec!["VD".into()];
        let batch = build_batch(&req, &Catalog::default(), "9912345678", 20);
        let value = serde_json::to_value(&batch).unwrap();
        let entries = value["parametrosProduto"].as_array().unwrap();
        assert_eq!(entries[0]["vlDeclarado"], "50");
        assert_eq!(entries[0]["servicosAdicionais"], json!(["019"]));
        assert_eq!(entries[1]["servicosAdicionais"], json!(["064"]));
    }

    #[test]
    fn products_missing_from_the_catalog_are_skipped() {
        let mut req = request();
        req.product_codes = vec!["03220".into(), "99999".into()];
        let batch = build_batch(&req, &Catalog::default(), "9912345678", 20);
        assert_eq!(batch.entries.len(), 1);
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["parametrosProduto"][0]["coProduto"], "03220");
        assert_eq!(value["parametrosProduto"][0]["nuContrato"], "9912345678");
        assert_eq!(value["parametrosProduto"][0]["nuDR"], 20);
    }
}
