//! Authentication token types.

use std::str::FromStr;

use crate::error::Error;

/// Credential mode used to obtain a bearer token.
///
/// The carrier scopes tokens differently per mode: postage-card tokens unlock
/// the widest API set, contract tokens a subset, anonymous tokens only the
/// public endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Authenticate with the postage card number.
    PostageCard,
    /// Authenticate with the contract number.
    Contract,
    /// Authenticate with the account credentials alone.
    Anonymous,
}

impl AuthMode {
    pub(crate) fn endpoint_path(self) -> &'static str {
        match self {
            AuthMode::PostageCard => "token/v1/autentica/cartaopostagem",
            AuthMode::Contract => "token/v1/autentica/contrato",
            AuthMode::Anonymous => "token/v1/autentica",
        }
    }
}

impl FromStr for AuthMode {
    type Err = Error;

    /// Parses the carrier's historical mode strings; the empty string means
    /// anonymous. Anything else is rejected before any network call.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "cartao_postagem" | "postage_card" => Ok(AuthMode::PostageCard),
            "contrato" | "contract" => Ok(AuthMode::Contract),
            "" | "anonymous" => Ok(AuthMode::Anonymous),
            other => Err(Error::InvalidArgument(format!(
                "unrecognized authentication mode `{other}`"
            ))),
        }
    }
}

/// Raw token endpoint response.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) emissao: String,
    #[serde(rename = "expiraEm")]
    pub(crate) expira_em: String,
    pub(crate) token: String,
}

/// Outcome of a successful token refresh.
///
/// Timestamps are passed through as the carrier formats them; the client does
/// not track expiry itself — refresh again when `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub issued_at: String,
    pub expires_at: String,
    pub token: String,
}

impl From<TokenResponse> for TokenInfo {
    fn from(raw: TokenResponse) -> Self {
        Self {
            issued_at: raw.emissao,
            expires_at: raw.expira_em,
            token: raw.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_strings_round_trip() {
        assert_eq!("cartao_postagem".parse::<AuthMode>().unwrap(), AuthMode::PostageCard);
        assert_eq!("contrato".parse::<AuthMode>().unwrap(), AuthMode::Contract);
        assert_eq!("".parse::<AuthMode>().unwrap(), AuthMode::Anonymous);
    }

    #[test]
    fn bogus_mode_is_invalid_argument() {
        let err = "bogus".parse::<AuthMode>().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
