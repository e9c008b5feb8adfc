use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::prepost::Party;

/// Default production base URL of the carrier API.
pub const DEFAULT_BASE_URL: &str = "https://api.correios.com.br/";

/// Session settings for [`crate::Client`].
///
/// Everything except the bearer token is fixed at construction; the token is
/// refreshed on the client by [`crate::Client::refresh_token`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base API URL, typically [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Account identifier ("meu correios" user).
    pub user: String,
    /// Account access code, paired with `user` for Basic auth.
    pub access_code: String,
    /// Postage card number; required for postage-card token refresh and
    /// pre-shipment registration.
    pub postage_card: Option<String>,
    /// Contract number; required for contract token refresh and price quotes.
    pub contract: Option<String>,
    /// A previously issued bearer token, if any.
    pub token: Option<String>,
    /// Regional directorate code (`nuDR`) injected into price quotes.
    pub regional_code: Option<u32>,
    /// Default sender record used by pre-shipment registration when the
    /// request does not carry one.
    pub default_sender: Option<Party>,
}

impl SessionConfig {
    /// Minimal configuration: production base URL, credentials, nothing else.
    pub fn new(user: impl Into<String>, access_code: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user: user.into(),
            access_code: access_code.into(),
            postage_card: None,
            contract: None,
            token: None,
            regional_code: None,
            default_sender: None,
        }
    }
}

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    user: Option<String>,
    access_code: Option<String>,
    postage_card: Option<String>,
    contract: Option<String>,
    token: Option<String>,
    regional_code: Option<String>,
    sender: Option<String>,
}

/// Loads a session from (in order of precedence):
/// - environment variables `CORREIOS_URL`, `CORREIOS_USER`,
///   `CORREIOS_ACCESS_CODE`, `CORREIOS_POSTAGE_CARD`, `CORREIOS_CONTRACT`,
///   `CORREIOS_TOKEN`, `CORREIOS_DR`, `CORREIOS_SENDER`
/// - a `.correiosrc` file from `CORREIOS_RC`, the current directory, or the
///   home directory
pub(crate) fn load_config() -> Result<SessionConfig> {
    let mut url = std::env::var("CORREIOS_URL").ok();
    let mut user = std::env::var("CORREIOS_USER").ok();
    let mut access_code = std::env::var("CORREIOS_ACCESS_CODE").ok();
    let mut postage_card = std::env::var("CORREIOS_POSTAGE_CARD").ok();
    let mut contract = std::env::var("CORREIOS_CONTRACT").ok();
    let mut token = std::env::var("CORREIOS_TOKEN").ok();
    let mut regional_code = std::env::var("CORREIOS_DR").ok();
    let mut sender = std::env::var("CORREIOS_SENDER").ok();

    let rc_candidates = rc_candidates();
    for rc_path in &rc_candidates {
        if rc_path.exists() {
            let cfg = read_rc(rc_path).with_context(|| {
                format!("failed to read configuration file {}", rc_path.display())
            })?;

            url = url.or(cfg.url);
            user = user.or(cfg.user);
            access_code = access_code.or(cfg.access_code);
            postage_card = postage_card.or(cfg.postage_card);
            contract = contract.or(cfg.contract);
            token = token.or(cfg.token);
            regional_code = regional_code.or(cfg.regional_code);
            sender = sender.or(cfg.sender);
            break;
        }
    }

    let user = match user {
        Some(v) => v,
        None => bail!(
            "missing configuration: user (set CORREIOS_USER or put `user:` in one of: {})",
            candidates_display(&rc_candidates)
        ),
    };
    let access_code = match access_code {
        Some(v) => v,
        None => bail!(
            "missing configuration: access code (set CORREIOS_ACCESS_CODE or put `access_code:` in one of: {})",
            candidates_display(&rc_candidates)
        ),
    };

    let regional_code = match regional_code {
        Some(raw) => Some(
            raw.trim()
                .parse::<u32>()
                .with_context(|| format!("CORREIOS_DR / `dr:` is not a number: {raw}"))?,
        ),
        None => None,
    };

    let default_sender = match sender {
        Some(raw) => Some(
            serde_json::from_str::<Party>(&raw)
                .context("CORREIOS_SENDER / `sender:` is not a valid sender JSON record")?,
        ),
        None => None,
    };

    Ok(SessionConfig {
        base_url: url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        user,
        access_code,
        postage_card,
        contract,
        token,
        regional_code,
        default_sender,
    })
}

fn candidates_display(candidates: &[PathBuf]) -> String {
    if candidates.is_empty() {
        return ".correiosrc".to_string();
    }
    candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            let v = Some(v.to_string());
            match k.trim() {
                "url" => cfg.url = v,
                "user" => cfg.user = v,
                "access_code" => cfg.access_code = v,
                "postage_card" => cfg.postage_card = v,
                "contract" => cfg.contract = v,
                "token" => cfg.token = v,
                "dr" => cfg.regional_code = v,
                "sender" => cfg.sender = v,
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // Search order: explicit CORREIOS_RC, then the current working
    // directory, then the home directory.
    if let Ok(p) = std::env::var("CORREIOS_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".correiosrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".correiosrc"));
    }
    v
}
