//! Session/auth gate.
//!
//! The gate asks an [`IdentityProvider`] for a bearer token and reports a
//! binary signed-in state. Token refresh and expiry are the provider's
//! business; a token is used as-is until the user signs out.

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// A bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AccessToken([REDACTED])")
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Auth HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Identity provider rejected the request (HTTP {status}): {reason}")]
    Rejected { status: u16, reason: String },
    #[error("Identity provider returned no token")]
    MissingToken,
    #[error("Sign-in was declined")]
    Declined,
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Something that can hand out a bearer token for a scope.
pub trait IdentityProvider: Send + Sync {
    fn request_token(&self, scope: &str) -> impl Future<Output = AuthResult<AccessToken>> + Send;
}

/// Hands out a token that was issued ahead of time.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<AccessToken>,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(AccessToken::new(token)),
        }
    }

    /// A provider that always declines.
    pub fn none() -> Self {
        Self { token: None }
    }

    /// Use `MEDBOX_ACCESS_TOKEN` from the configuration; declines without one.
    pub fn from_config(config: &crate::SyncConfig) -> Self {
        Self {
            token: config.access_token.clone().map(AccessToken),
        }
    }
}

impl IdentityProvider for StaticTokenProvider {
    async fn request_token(&self, _scope: &str) -> AuthResult<AccessToken> {
        self.token.clone().ok_or(AuthError::Declined)
    }
}

/// Exchanges a long-lived credential for a scoped access token at an HTTP
/// endpoint.
#[derive(Clone)]
pub struct TokenExchangeProvider {
    endpoint: String,
    credential: AccessToken,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    scope: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token: Option<String>,
}

/// Body of a refused token request. The document server answers with
/// `{error, details}`; some providers use `message` instead of `error`.
#[derive(Deserialize)]
struct Rejection {
    error: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

impl Rejection {
    fn reason(body: &str) -> String {
        let Ok(rejection) = serde_json::from_str::<Self>(body) else {
            return Self::fallback(body);
        };
        let headline = rejection.error.or(rejection.message);
        match (headline, rejection.details) {
            (Some(headline), Some(details)) => format!("{}: {}", headline.trim(), details.trim()),
            (Some(text), None) | (None, Some(text)) => text.trim().to_string(),
            (None, None) => Self::fallback(body),
        }
    }

    fn fallback(body: &str) -> String {
        match body.trim() {
            "" => "no reason given".to_string(),
            text => text.to_string(),
        }
    }
}

impl TokenExchangeProvider {
    pub fn new(endpoint: impl Into<String>, credential: impl Into<String>) -> AuthResult<Self> {
        let endpoint = endpoint.into().trim().trim_end_matches('/').to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AuthError::InvalidConfiguration(
                "token endpoint must include http:// or https://".to_string(),
            ));
        }

        let credential = credential.into().trim().to_string();
        if credential.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "credential must not be empty".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            credential: AccessToken(credential),
            client: reqwest::Client::builder().build()?,
        })
    }
}

impl IdentityProvider for TokenExchangeProvider {
    async fn request_token(&self, scope: &str) -> AuthResult<AccessToken> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credential.secret())
            .header("Accept", "application/json")
            .json(&TokenRequest { scope })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                reason: Rejection::reason(&body),
            });
        }

        let payload = response.json::<TokenResponse>().await?;
        payload
            .access_token
            .or(payload.token)
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(AccessToken)
            .ok_or(AuthError::MissingToken)
    }
}

/// Binary signed-in state backed by an identity provider.
#[derive(Debug)]
pub struct AuthGate<P> {
    provider: P,
    scope: String,
    token: Option<AccessToken>,
}

impl<P: IdentityProvider> AuthGate<P> {
    pub fn new(provider: P, scope: impl Into<String>) -> Self {
        Self {
            provider,
            scope: scope.into(),
            token: None,
        }
    }

    /// Request a token. On failure the gate is left signed out.
    pub async fn authenticate(&mut self) -> AuthResult<()> {
        self.token = None;
        let token = self.provider.request_token(&self.scope).await?;
        self.token = Some(token);
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_debug_redacts_secret() {
        let debug = format!("{:?}", AccessToken::new("secret"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn exchange_provider_rejects_invalid_configuration() {
        assert!(TokenExchangeProvider::new("auth.example.com", "cred").is_err());
        assert!(TokenExchangeProvider::new("https://auth.example.com", "  ").is_err());
        assert!(TokenExchangeProvider::new("https://auth.example.com/", "cred").is_ok());
    }

    #[test]
    fn rejection_reasons() {
        assert_eq!(Rejection::reason(r#"{"error":"Unauthorized"}"#), "Unauthorized");
        assert_eq!(
            Rejection::reason(r#"{"error":"Invalid document","details":"expected value"}"#),
            "Invalid document: expected value"
        );
        assert_eq!(Rejection::reason(r#"{"message":"scope denied"}"#), "scope denied");
        assert_eq!(Rejection::reason("upstream timeout"), "upstream timeout");
        assert_eq!(Rejection::reason("  "), "no reason given");

        let err = AuthError::Rejected {
            status: 502,
            reason: "no reason given".into(),
        };
        assert_eq!(
            err.to_string(),
            "Identity provider rejected the request (HTTP 502): no reason given"
        );
    }

    #[tokio::test]
    async fn gate_tracks_sign_in_state() {
        let mut gate = AuthGate::new(StaticTokenProvider::new("t-1"), "documents.file");
        assert!(!gate.is_authenticated());

        gate.authenticate().await.unwrap();
        assert_eq!(gate.token().map(AccessToken::secret), Some("t-1"));

        gate.sign_out();
        assert!(!gate.is_authenticated());
    }

    #[tokio::test]
    async fn static_provider_from_config() {
        let config = crate::SyncConfig {
            access_token: Some("from-env".into()),
            ..crate::SyncConfig::default()
        };
        let token = StaticTokenProvider::from_config(&config)
            .request_token("documents.file")
            .await
            .unwrap();
        assert_eq!(token.secret(), "from-env");

        let declined = StaticTokenProvider::from_config(&crate::SyncConfig::default());
        assert!(matches!(
            declined.request_token("documents.file").await,
            Err(AuthError::Declined)
        ));
    }

    #[tokio::test]
    async fn declined_sign_in_stays_signed_out() {
        let mut gate = AuthGate::new(StaticTokenProvider::none(), "documents.file");
        assert!(matches!(gate.authenticate().await, Err(AuthError::Declined)));
        assert!(!gate.is_authenticated());
    }
}
