use std::{env, fmt};

use thiserror::Error;

use crate::constants::{defaults, envvars, REMOTE_DEFAULTS};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Service-account credentials used for both outbound APIs
#[derive(Clone)]
pub struct Credentials {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Endpoints {
    pub sheets_api: String,
    pub firestore_api: String,
    pub token_uri: String,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    pub credentials: Credentials,
    pub sheet_id: String,
    pub sheet_raw_id: String,
    /// Account identifier the snapshot documents are keyed under
    pub account: String,
    pub endpoints: Endpoints,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Settings {
            port: port_from_env()?,
            credentials: Credentials {
                project_id: required(envvars::PROJECT_ID)?,
                client_email: required(envvars::CLIENT_EMAIL)?,
                private_key: unescape_newlines(&required(envvars::RSA)?),
            },
            sheet_id: required(envvars::SHEET_ID)?,
            sheet_raw_id: required(envvars::SHEET_RAW_ID)?,
            account: required(envvars::EMAIL)?,
            endpoints: Endpoints {
                sheets_api: remote_or_default(envvars::SHEETS_API_BASE_URL),
                firestore_api: remote_or_default(envvars::FIRESTORE_API_BASE_URL),
                token_uri: remote_or_default(envvars::GOOGLE_TOKEN_URI),
            },
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn port_from_env() -> Result<u16, ConfigError> {
    match env::var(envvars::PORT) {
        Ok(port_str) if !port_str.is_empty() => {
            port_str.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: envvars::PORT,
                value: port_str,
            })
        }
        _ => Ok(defaults::PORT),
    }
}

fn remote_or_default(name: &'static str) -> String {
    match env::var(name) {
        Ok(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
        _ => REMOTE_DEFAULTS
            .get(name)
            .map(|url| url.to_string())
            .unwrap_or_default(),
    }
}

/// Private keys stored in env files carry literal `\n` sequences instead of line breaks
pub fn unescape_newlines(key: &str) -> String {
    key.replace("\\n", "\n")
}
