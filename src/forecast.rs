//! Delivery-time forecast request construction.
//!
//! Forecasts are submitted as one batch: one parameter entry per product,
//! all sharing the origin/destination and dates. The carrier's batch
//! response is passed through to the caller unreshaped.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ForecastParams {
    #[serde(rename = "coProduto")]
    pub(crate) product_code: String,
    #[serde(rename = "nuRequisicao")]
    pub(crate) request_number: String,
    #[serde(rename = "cepOrigem")]
    pub(crate) origin_zip: String,
    #[serde(rename = "cepDestino")]
    pub(crate) destination_zip: String,
    #[serde(rename = "dataPostagem")]
    pub(crate) posting_date: String,
    #[serde(rename = "dtEvento")]
    pub(crate) reference_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ForecastBatch {
    #[serde(rename = "idLote")]
    pub(crate) batch_id: String,
    #[serde(rename = "parametrosPrazo")]
    pub(crate) entries: Vec<ForecastParams>,
}

/// One entry per product code; only `coProduto` varies across entries.
pub(crate) fn build_batch<S: AsRef<str>>(
    product_codes: &[S],
    origin_zip: &str,
    destination_zip: &str,
    posting_date: &str,
    reference_date: &str,
) -> ForecastBatch {
    let entries = product_codes
        .iter()
        .map(|code| ForecastParams {
            product_code: code.as_ref().to_string(),
            request_number: "1".to_string(),
            origin_zip: origin_zip.to_string(),
            destination_zip: destination_zip.to_string(),
            posting_date: posting_date.to_string(),
            reference_date: reference_date.to_string(),
        })
        .collect();

    ForecastBatch {
        batch_id: "1".to_string(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_product_sharing_everything_else() {
        let batch = build_batch(
            &["03220", "03298", "04227"],
            "33110580",
            "33145160",
            "05/04/2024",
            "05/04/2024",
        );

        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["idLote"], "1");
        let entries = value["parametrosPrazo"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["coProduto"], "03220");
        assert_eq!(entries[2]["coProduto"], "04227");
        for entry in entries {
            assert_eq!(entry["cepOrigem"], "33110580");
            assert_eq!(entry["cepDestino"], "33145160");
            assert_eq!(entry["dataPostagem"], "05/04/2024");
            assert_eq!(entry["dtEvento"], "05/04/2024");
            assert_eq!(entry["nuRequisicao"], "1");
        }
    }

    #[test]
    fn identical_inputs_build_identical_bodies() {
        let a = build_batch(&["03220"], "01000000", "04000000", "04/04/2024", "05/04/2024");
        let b = build_batch(&["03220"], "01000000", "04000000", "04/04/2024", "05/04/2024");
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
    }
}
