use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::store::Identity;
use crate::error::NeoError;
use crate::headers::{CONTENT_TYPE_FORM_URL_ENCODED, HEADER_CONTENT_TYPE};
use crate::transport::{HttpBody, HttpDoer, HttpRequest};

pub const DEFAULT_TOKEN_PATH: &str = "/auth/realms/sandbox/protocol/openid-connect/token";

/// Access and refresh token pair issued by the platform's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_expires_in: i64,
    #[serde(default)]
    pub session_state: String,
}

/// Exchanges client credentials or a refresh token for a new [`TokenPair`].
///
/// Never touches a [`CredentialStore`](crate::auth::CredentialStore); callers
/// apply the result.
#[derive(Clone)]
pub struct Authenticator {
    token_url: String,
    identity: Identity,
    doer: Arc<dyn HttpDoer>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_url", &self.token_url)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(token_url: impl Into<String>, identity: Identity, doer: Arc<dyn HttpDoer>) -> Self {
        Self {
            token_url: token_url.into(),
            identity,
            doer,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// POST a form to the token endpoint and decode the token response.
    pub async fn exchange(&self, form: Vec<(String, String)>) -> Result<TokenPair, NeoError> {
        if form.is_empty() {
            return Err(NeoError::InvalidAuthRequest);
        }
        let grant = form
            .iter()
            .find(|(k, _)| k == "grant_type")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        tracing::debug!(grant = %grant, url = %self.token_url, "requesting token");

        let resp = self
            .doer
            .send(HttpRequest {
                method: "POST".into(),
                url: self.token_url.clone(),
                headers: vec![(
                    HEADER_CONTENT_TYPE.to_string(),
                    CONTENT_TYPE_FORM_URL_ENCODED.to_string(),
                )],
                body: Some(HttpBody::Form(form)),
            })
            .await?;

        if resp.status != 200 {
            return Err(NeoError::UnexpectedStatus {
                status: resp.status,
                reason: resp.reason,
            });
        }

        serde_json::from_slice(&resp.body).map_err(|e| NeoError::Decode {
            what: "access token",
            source: e,
        })
    }

    /// Client-credentials grant.
    pub async fn access_token(&self) -> Result<TokenPair, NeoError> {
        self.exchange(vec![
            ("client_id".into(), self.identity.client_id.clone()),
            ("client_secret".into(), self.identity.client_secret.clone()),
            ("grant_type".into(), "client_credentials".into()),
        ])
        .await
    }

    /// Refresh-token grant. Fails without contacting the server when `token`
    /// carries no refresh token.
    pub async fn refresh(&self, token: &TokenPair) -> Result<TokenPair, NeoError> {
        if token.refresh_token.is_empty() {
            return Err(NeoError::Auth("invalid refresh token".into()));
        }
        self.exchange(vec![
            ("client_id".into(), self.identity.client_id.clone()),
            ("client_secret".into(), self.identity.client_secret.clone()),
            ("refresh_token".into(), token.refresh_token.clone()),
            ("grant_type".into(), "refresh_token".into()),
        ])
        .await
    }
}
