//! Static product / add-on-service reference data.
//!
//! The carrier identifies add-on services (return receipt, declared-value
//! insurance, ...) by numeric codes that differ per product. Callers name
//! add-ons by their short mnemonic (`AR`, `VD`, ...); the catalog translates
//! those names into the per-product carrier identifiers.
//!
//! The built-in [`Catalog::default`] covers the usual contract products;
//! deployments with a different contract can load their own table with
//! [`Catalog::from_json`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};

/// One contracted product and the add-on services it accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    /// Carrier product code, e.g. `03220`.
    pub code: String,
    /// Human-readable product name.
    pub name: String,
    /// Add-on mnemonic (e.g. `VD`) to the carrier service identifier for
    /// this product.
    pub add_ons: BTreeMap<String, String>,
}

impl ProductEntry {
    /// Carrier identifier for an add-on mnemonic, if this product accepts it.
    pub fn add_on_code(&self, name: &str) -> Option<&str> {
        self.add_ons.get(name).map(String::as_str)
    }
}

/// Product catalog used by price quoting and pre-shipment registration.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub products: Vec<ProductEntry>,
}

impl Catalog {
    /// Loads a catalog from its JSON representation:
    /// `{"products": [{"code": ..., "name": ..., "add_ons": {...}}, ...]}`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::Decode)
    }

    /// Looks up a product by carrier code.
    pub fn product(&self, code: &str) -> Option<&ProductEntry> {
        self.products.iter().find(|p| p.code == code)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        fn entry(code: &str, name: &str, add_ons: &[(&str, &str)]) -> ProductEntry {
            ProductEntry {
                code: code.to_string(),
                name: name.to_string(),
                add_ons: add_ons
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }

        Self {
            products: vec![
                entry(
                    "03220",
                    "SEDEX CONTRATO AG",
                    &[
                        ("AR", "001"),
                        ("MP", "002"),
                        ("VD", "019"),
                        ("RR", "025"),
                        ("EV", "011"),
                    ],
                ),
                entry(
                    "03298",
                    "PAC CONTRATO AG",
                    &[
                        ("AR", "001"),
                        ("MP", "002"),
                        ("VD", "064"),
                        ("RR", "025"),
                        ("EV", "011"),
                    ],
                ),
                entry(
                    "04227",
                    "CORREIOS MINI ENVIOS CTR AG",
                    &[("VD", "065"), ("RR", "025")],
                ),
            ],
        }
    }
}
