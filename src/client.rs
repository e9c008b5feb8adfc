use anyhow::Context;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::{SessionConfig, load_config};
use crate::error::{Error, Result, status_error};
use crate::forecast;
use crate::prepost::{self, Party, PrepostReceipt, PrepostRequest};
use crate::price::{self, PriceEntry, PriceQuote, PriceRequest};
use crate::token::{AuthMode, TokenInfo, TokenResponse};
use crate::tracking::{self, EventScope, ObjectsPage, PageFailure, TrackingReport};
use crate::util::urljoin;

const TRACKING_PATH: &str = "srorastro/v1/objetos";
const FORECAST_PATH: &str = "prazo/v1/nacional";
const PRICE_PATH: &str = "preco/v1/nacional";
const PREPOST_PATH: &str = "prepostagem/v1/prepostagens";

/// Which credential a request is authorized with.
enum Auth<'a> {
    /// Basic `user:access_code`; only the token endpoints accept it.
    Basic,
    /// The bearer token issued by a token endpoint.
    Bearer(&'a str),
}

/// Synchronous client for the Correios REST API.
///
/// Holds the session fields (credentials, postage card, contract, regional
/// code) plus the current bearer token. All fields except the token are
/// fixed at construction; [`Client::refresh_token`] is the only mutation.
///
/// Each operation performs exactly one HTTP round-trip per request it needs
/// (tracking issues one per page of 50 codes) and never retries.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    user: String,
    access_code: String,
    postage_card: Option<String>,
    contract: Option<String>,
    regional_code: Option<u32>,
    token: Option<String>,
    default_sender: Option<Party>,
    catalog: Catalog,

    http: HttpClient,
}

impl Client {
    /// Creates a client from environment variables and/or `.correiosrc`.
    ///
    /// See [`SessionConfig`] for the variables involved.
    pub fn from_env() -> Result<Self> {
        Self::new(load_config().map_err(Error::Config)?)
    }

    /// Creates a client from an explicit session configuration.
    pub fn new(cfg: SessionConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("correios-api-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("correios-api-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build HTTP client")
            .map_err(Error::Config)?;

        Ok(Self {
            base_url: cfg.base_url,
            user: cfg.user,
            access_code: cfg.access_code,
            postage_card: cfg.postage_card,
            contract: cfg.contract,
            regional_code: cfg.regional_code,
            token: cfg.token,
            default_sender: cfg.default_sender,
            catalog: Catalog::default(),
            http,
        })
    }

    /// Replaces the product/add-on catalog (defaults to the built-in table).
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Seeds the session with a previously issued bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The bearer token currently held by the session, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Obtains a fresh bearer token and stores it on the session.
    ///
    /// Success is HTTP 201. A 400 maps to [`Error::Validation`], a 5xx to
    /// [`Error::Server`]; a missing postage card / contract number for the
    /// chosen mode fails before any network call.
    pub fn refresh_token(&mut self, mode: AuthMode) -> Result<TokenInfo> {
        let number = match mode {
            AuthMode::PostageCard => Some(self.postage_card.clone().ok_or_else(|| {
                Error::InvalidArgument("postage card number not configured".to_string())
            })?),
            AuthMode::Contract => Some(self.contract.clone().ok_or_else(|| {
                Error::InvalidArgument("contract number not configured".to_string())
            })?),
            AuthMode::Anonymous => None,
        };

        let body = match &number {
            Some(numero) => serde_json::json!({ "numero": numero }),
            None => serde_json::json!({}),
        };

        let parsed: TokenResponse =
            self.post_json(mode.endpoint_path(), Auth::Basic, &body, StatusCode::CREATED)?;
        self.token = Some(parsed.token.clone());
        Ok(TokenInfo::from(parsed))
    }

    /// Resolves shipment status for one or many tracking codes.
    ///
    /// Codes are queried in pages of 50, one GET per page, in order. A page
    /// the carrier refuses is isolated in
    /// [`TrackingReport::page_failures`] without discarding the others.
    pub fn track<S: AsRef<str>>(&self, scope: EventScope, codes: &[S]) -> Result<TrackingReport> {
        if codes.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one tracking code is required".to_string(),
            ));
        }
        let token = self.bearer()?;
        let url = urljoin(&self.base_url, TRACKING_PATH);

        let mut report = TrackingReport::default();
        for (page, chunk) in codes.chunks(tracking::PAGE_LIMIT).enumerate() {
            let mut query: Vec<(&str, &str)> = chunk
                .iter()
                .map(|code| ("codigosObjetos", code.as_ref()))
                .collect();
            query.push(("resultado", scope.wire_value()));

            let outcome: Result<ObjectsPage> = self
                .http
                .get(&url)
                .bearer_auth(token)
                .query(&query)
                .send()
                .map_err(Error::Transport)
                .and_then(|resp| self.read_json(resp, StatusCode::OK));

            match outcome {
                Ok(objects) => report
                    .results
                    .extend(objects.objetos.into_iter().map(tracking::normalize)),
                Err(error) => report.page_failures.push(PageFailure { page, error }),
            }
        }

        Ok(report)
    }

    /// Estimates delivery lead time for each product between two postal
    /// codes. The carrier's batch response is returned unreshaped.
    pub fn forecast<S: AsRef<str>>(
        &self,
        product_codes: &[S],
        origin_zip: &str,
        destination_zip: &str,
        posting_date: &str,
        reference_date: &str,
    ) -> Result<Value> {
        let batch = forecast::build_batch(
            product_codes,
            origin_zip,
            destination_zip,
            posting_date,
            reference_date,
        );
        let token = self.bearer()?;
        self.post_json(FORECAST_PATH, Auth::Bearer(token), &batch, StatusCode::OK)
    }

    /// Computes price quotes for the requested products.
    ///
    /// Products absent from the catalog are omitted from the batch; the
    /// session's contract number and regional code are injected into every
    /// entry.
    pub fn price(&self, request: &PriceRequest) -> Result<Vec<PriceQuote>> {
        let contract = self.contract.as_deref().ok_or_else(|| {
            Error::InvalidArgument("contract number not configured".to_string())
        })?;
        let regional_code = self.regional_code.ok_or_else(|| {
            Error::InvalidArgument("regional code (nuDR) not configured".to_string())
        })?;

        let batch = price::build_batch(request, &self.catalog, contract, regional_code);
        let token = self.bearer()?;
        let entries: Vec<PriceEntry> =
            self.post_json(PRICE_PATH, Auth::Bearer(token), &batch, StatusCode::OK)?;
        Ok(entries.into_iter().map(PriceQuote::from).collect())
    }

    /// Registers a pre-shipment and returns the generated identifiers.
    ///
    /// Falls back to the configured default sender when the request carries
    /// none; the session's postage card number is injected into the payload.
    pub fn register(&self, request: &PrepostRequest) -> Result<PrepostReceipt> {
        let postage_card = self.postage_card.as_deref().ok_or_else(|| {
            Error::InvalidArgument("postage card number not configured".to_string())
        })?;
        let sender = request
            .sender
            .clone()
            .or_else(|| self.default_sender.clone())
            .ok_or_else(|| {
                Error::InvalidArgument(
                    "no sender on the request and no default sender configured".to_string(),
                )
            })?;

        let add_ons = prepost::add_on_selections(request, &self.catalog);
        let payload = prepost::build_payload(request, sender, postage_card, add_ons);
        let token = self.bearer()?;
        self.post_json(PREPOST_PATH, Auth::Bearer(token), &payload, StatusCode::OK)
    }

    /// The session token, or an immediate failure for bearer-authenticated
    /// operations called before any [`Client::refresh_token`].
    fn bearer(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            Error::InvalidArgument(
                "no bearer token on the session, call refresh_token first".to_string(),
            )
        })
    }

    fn apply_auth(&self, req: RequestBuilder, auth: Auth<'_>) -> RequestBuilder {
        match auth {
            Auth::Basic => req.basic_auth(&self.user, Some(&self.access_code)),
            Auth::Bearer(token) => req.bearer_auth(token),
        }
    }

    fn post_json<TReq: Serialize, TResp: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth<'_>,
        request: &TReq,
        expect: StatusCode,
    ) -> Result<TResp> {
        let url = urljoin(&self.base_url, path);
        let req = self.apply_auth(self.http.post(&url), auth);
        let resp = req.json(request).send()?;
        self.read_json(resp, expect)
    }

    fn read_json<TResp: DeserializeOwned>(&self, resp: Response, expect: StatusCode) -> Result<TResp> {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        if status != expect {
            return Err(status_error(status, &text));
        }
        Ok(serde_json::from_str::<TResp>(&text)?)
    }
}
