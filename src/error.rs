use reqwest::StatusCode;
use thiserror::Error;

/// Alias for `std::result::Result` with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the Correios client.
///
/// Only [`Error::InvalidArgument`] is raised before any network traffic;
/// everything else reflects an HTTP round-trip that happened (or failed to
/// happen). The client never retries — a transient [`Error::Server`] is the
/// caller's cue to try again later.
#[derive(Debug, Error)]
pub enum Error {
    /// The call was malformed and no request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The carrier rejected the request as malformed (HTTP 400). Often a
    /// missing field or an expired/mis-scoped bearer token.
    #[error("carrier rejected the request (HTTP 400): {detail}")]
    Validation { detail: String },

    /// The carrier reported a server-side failure (HTTP 5xx).
    #[error("carrier server error (HTTP {status}), try again later")]
    Server { status: u16 },

    /// Any other non-success status, with the raw response body.
    #[error("unexpected carrier response (HTTP {status}): {body}")]
    UnknownResponse { status: u16, body: String },

    /// The HTTP round-trip itself failed (connect, TLS, timeout).
    #[error("transport failure")]
    Transport(#[from] reqwest::Error),

    /// The carrier answered with a body we could not decode.
    #[error("failed to decode carrier response")]
    Decode(#[from] serde_json::Error),

    /// Client construction or configuration loading failed.
    #[error("configuration error: {0}")]
    Config(#[source] anyhow::Error),
}

/// Error payload shapes seen across Correios endpoints.
///
/// Some endpoints answer `{"mensagem": ..., "causa": ...}`, others a
/// `{"msgs": [...]}` list. All fields are optional so a partial match still
/// yields something readable.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct CarrierErrorBody {
    #[serde(default)]
    pub(crate) mensagem: Option<String>,
    #[serde(default)]
    pub(crate) causa: Option<String>,
    #[serde(default)]
    pub(crate) msgs: Vec<String>,
}

/// Maps a non-success carrier status to the error taxonomy.
pub(crate) fn status_error(status: StatusCode, body: &str) -> Error {
    if status == StatusCode::BAD_REQUEST {
        return Error::Validation {
            detail: validation_detail(body),
        };
    }
    if status.is_server_error() {
        return Error::Server {
            status: status.as_u16(),
        };
    }
    Error::UnknownResponse {
        status: status.as_u16(),
        body: body.to_string(),
    }
}

/// Best-effort extraction of a human-readable message from a 400 body.
/// Falls back to the raw text when the body is not one of the known shapes.
fn validation_detail(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<CarrierErrorBody>(body) {
        if let Some(mensagem) = parsed.mensagem {
            return match parsed.causa {
                Some(causa) if !causa.is_empty() => format!("{mensagem} ({causa})"),
                _ => mensagem,
            };
        }
        if !parsed.msgs.is_empty() {
            return parsed.msgs.join("; ");
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_400_to_validation_with_carrier_message() {
        let err = status_error(
            StatusCode::BAD_REQUEST,
            r#"{"mensagem":"CEP invalido","causa":"cepDestino"}"#,
        );
        match err {
            Error::Validation { detail } => assert_eq!(detail, "CEP invalido (cepDestino)"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn maps_400_msgs_list() {
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"msgs":["campo a","campo b"]}"#);
        match err {
            Error::Validation { detail } => assert_eq!(detail, "campo a; campo b"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn maps_5xx_to_server() {
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            Error::Server { status: 503 }
        ));
    }

    #[test]
    fn other_statuses_keep_the_raw_body() {
        match status_error(StatusCode::IM_A_TEAPOT, "short and stout") {
            Error::UnknownResponse { status, body } => {
                assert_eq!(status, 418);
                assert_eq!(body, "short and stout");
            }
            other => panic!("expected UnknownResponse, got {other:?}"),
        }
    }
}
