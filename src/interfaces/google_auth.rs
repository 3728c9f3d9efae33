//! Service-account authentication against the Google OAuth2 token endpoint
//!
//! A signed RS256 assertion is exchanged for a short-lived bearer token
//! (JWT-bearer grant).
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ureq::Agent;

use crate::config::Credentials;
use crate::constants::defaults;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("could not sign assertion: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
    #[error("token request failed: {0}")]
    Request(#[from] ureq::Error),
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    defaults::TOKEN_LIFETIME_SECS
}

#[derive(Clone, Debug)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(defaults::TOKEN_EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

pub struct TokenSource {
    credentials: Credentials,
    token_uri: String,
    scope: String,
    agent: Agent,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(credentials: Credentials, token_uri: &str, scopes: &[&str], agent: Agent) -> Self {
        TokenSource {
            credentials,
            token_uri: token_uri.to_string(),
            scope: scopes.join(" "),
            agent,
            cached: Mutex::new(None),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.credentials.project_id
    }

    /// Always performs a new token exchange
    pub fn fetch(&self) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;
        log::debug!(
            "Requesting access token for {} (scope: {})",
            self.credentials.client_email,
            self.scope
        );

        let resp: TokenResponse = self
            .agent
            .post(&self.token_uri)
            .send_form([("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])?
            .body_mut()
            .read_json()?;

        Ok(AccessToken {
            secret: resp.access_token,
            expires_at: now + TimeDelta::seconds(resp.expires_in),
        })
    }

    /// Returns the cached token while it is still valid, otherwise fetches a new one
    pub fn cached(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = cached.as_ref() {
            if token.is_usable_at(Utc::now()) {
                return Ok(token.secret.clone());
            }
        }
        let token = self.fetch()?;
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.credentials.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat,
            exp: iat + defaults::TOKEN_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &key,
        )?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use mockito::Matcher;
    use serde_json::json;

    use crate::interfaces::get_ureq_agent;

    pub const TEST_KEY: &str = include_str!("../../tests/fixtures/service_account_key.pem");
    const TEST_PUBLIC_KEY: &str = include_str!("../../tests/fixtures/service_account_pub.pem");

    pub fn test_credentials() -> Credentials {
        Credentials {
            project_id: "pond-quality".into(),
            client_email: "ingest@pond-quality.iam.gserviceaccount.com".into(),
            private_key: TEST_KEY.into(),
        }
    }

    #[test]
    fn test_assertion_claims() {
        let token_uri = "https://oauth2.example.com/token";
        let source = TokenSource::new(test_credentials(), token_uri, &["a", "b"], get_ureq_agent());
        let assertion = source.assertion(Utc::now()).unwrap();

        let header = jsonwebtoken::decode_header(&assertion).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);

        let mut validation = jsonwebtoken::Validation::new(Algorithm::RS256);
        validation.set_audience(&[token_uri]);
        let data = jsonwebtoken::decode::<serde_json::Value>(
            &assertion,
            &jsonwebtoken::DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();
        assert_eq!(data.claims["iss"], "ingest@pond-quality.iam.gserviceaccount.com");
        assert_eq!(data.claims["scope"], "a b");
        assert_eq!(
            data.claims["exp"].as_i64().unwrap() - data.claims["iat"].as_i64().unwrap(),
            defaults::TOKEN_LIFETIME_SECS
        );
    }

    #[test]
    fn test_bad_key_fails_to_sign() {
        let mut credentials = test_credentials();
        credentials.private_key = "not a key".into();
        let source = TokenSource::new(credentials, "http://localhost/token", &["a"], get_ureq_agent());
        assert!(matches!(source.fetch(), Err(AuthError::Sign(_))));
    }

    #[test]
    fn test_token_exchange_and_cache() {
        let mut server = mockito::Server::new();
        let m = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), JWT_BEARER_GRANT.into()),
                Matcher::Regex("assertion=".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(json!({"access_token": "ya29.token", "expires_in": 3599, "token_type": "Bearer"}).to_string())
            .expect(1)
            .create();

        let source = TokenSource::new(
            test_credentials(),
            &format!("{}/token", server.url()),
            &["scope"],
            get_ureq_agent(),
        );
        assert_eq!(source.cached().unwrap(), "ya29.token");
        assert_eq!(source.cached().unwrap(), "ya29.token");
        m.assert();
    }

    #[test]
    fn test_token_endpoint_error() {
        let mut server = mockito::Server::new();
        let _m = server.mock("POST", "/token").with_status(401).create();

        let source = TokenSource::new(
            test_credentials(),
            &format!("{}/token", server.url()),
            &["scope"],
            get_ureq_agent(),
        );
        assert!(matches!(source.fetch(), Err(AuthError::Request(_))));
    }
}
