//! A small Rust client for the Correios (Brazilian postal carrier) REST API.
//!
//! The client covers five operations, each one request/response translation:
//! bearer-token refresh, package tracking, delivery-time forecasting, price
//! quoting and pre-shipment registration. Calls are synchronous, one HTTP
//! round-trip per logical request, with no retries — failures come back as
//! typed [`Error`] values for the caller to act on.
//!
//! ## Quick start
//! - Configure credentials via environment variables (`CORREIOS_USER`,
//!   `CORREIOS_ACCESS_CODE`, ...) or a `.correiosrc` file (supported in the
//!   current directory and in your home directory).
//! - Refresh a token, then call the operation you need.
//!
//! ```no_run
//! use correios_api::{AuthMode, Client, EventScope};
//!
//! fn main() -> correios_api::Result<()> {
//!     let mut client = Client::from_env()?;
//!     client.refresh_token(AuthMode::PostageCard)?;
//!
//!     let report = client.track(EventScope::LastEvent, &["AA000000000BR"])?;
//!     for item in &report.results {
//!         println!("{}: {:?}", item.code, item.descriptions.last());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For configuration details and the full operation list, see the README.

#![forbid(unsafe_code)]

mod catalog;
mod client;
mod config;
mod error;
mod forecast;
mod prepost;
mod price;
mod token;
mod tracking;
mod util;

pub use catalog::{Catalog, ProductEntry};
pub use client::Client;
pub use config::{DEFAULT_BASE_URL, SessionConfig};
pub use error::{Error, Result};
pub use prepost::{Address, Party, PrepostReceipt, PrepostRequest};
pub use price::{PriceQuote, PriceRequest};
pub use token::{AuthMode, TokenInfo};
pub use tracking::{EventScope, PageFailure, TrackingReport, TrackingResult};
