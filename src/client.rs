use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::{Authenticator, CredentialStore, Identity, TokenPair, DEFAULT_TOKEN_PATH};
use crate::config::NeoConfig;
use crate::error::NeoError;
use crate::headers::{
    set_header, CONTENT_TYPE_JSON, HEADER_ACCEPT, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    HEADER_DEVICE_ID,
};
use crate::request::PreparedRequest;
use crate::sca::{
    is_step_up_status, Continuation, ContinuationKind, DefaultScaResolver, Outcome, PlatformError,
    ScaHandle, ScaResolver,
};
use crate::transport::{HttpBody, HttpDoer, HttpRequest};

pub const PRODUCTION_URL: &str = "https://api.neonomics.io";
pub const SANDBOX_URL: &str = "https://sandbox.neonomics.io";

/// How many times one call may refresh its token after a 401.
pub const MAX_REFRESHES: usize = 1;

/// Platform client: credentials, endpoints and transport. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    identity: Identity,
    base_url: String,
    token_url: String,
    doer: Arc<dyn HttpDoer>,
    resolver: Option<Arc<dyn ScaResolver>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("identity", &self.identity)
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(identity: Identity, base_url: &str, doer: Arc<dyn HttpDoer>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            identity,
            token_url: format!("{base_url}{DEFAULT_TOKEN_PATH}"),
            base_url,
            doer,
            resolver: Some(Arc::new(DefaultScaResolver::default())),
        }
    }

    pub fn production(identity: Identity, doer: Arc<dyn HttpDoer>) -> Self {
        Self::new(identity, PRODUCTION_URL, doer)
    }

    pub fn sandbox(identity: Identity, doer: Arc<dyn HttpDoer>) -> Self {
        Self::new(identity, SANDBOX_URL, doer)
    }

    /// Build a client from loaded configuration, using reqwest as transport.
    pub fn from_config(config: &NeoConfig) -> Result<Self, NeoError> {
        let identity = config.identity()?;
        let doer: Arc<dyn HttpDoer> = Arc::new(reqwest::Client::new());
        Ok(Self::new(identity, &config.base_url(), doer)
            .with_token_path(config.token_path())
            .with_resolver(Some(Arc::new(DefaultScaResolver::new(
                config.platform_domain(),
            )))))
    }

    pub fn with_token_path(mut self, path: &str) -> Self {
        self.token_url = format!("{}{}", self.base_url, path);
        self
    }

    /// `None` disables step-up resolution: step-up responses then fail with
    /// the platform error.
    pub fn with_resolver(mut self, resolver: Option<Arc<dyn ScaResolver>>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.token_url.clone(), self.identity.clone(), self.doer.clone())
    }

    /// Fetch a fresh token pair with the client-credentials grant.
    pub async fn access_token(&self) -> Result<TokenPair, NeoError> {
        self.authenticator().access_token().await
    }

    pub async fn refresh_token(&self, token: &TokenPair) -> Result<TokenPair, NeoError> {
        self.authenticator().refresh(token).await
    }

    /// Authenticate and return an API handle bound to `device_id`.
    pub async fn api(&self, device_id: &str) -> Result<Api, NeoError> {
        let token = self
            .access_token()
            .await
            .map_err(|e| NeoError::Auth(format!("failed to create an API instance: {e}")))?;
        Ok(self.api_with_token(device_id, token))
    }

    pub fn api_with_token(&self, device_id: &str, token: TokenPair) -> Api {
        Api {
            client: self.clone(),
            store: CredentialStore::new(token),
            device_id: device_id.to_string(),
        }
    }
}

/// An authenticated session against the platform. Every call goes through
/// [`Api::execute`].
#[derive(Debug)]
pub struct Api {
    client: Client,
    store: CredentialStore,
    device_id: String,
}

impl Api {
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Snapshot of the current token pair.
    pub fn token(&self) -> TokenPair {
        self.store.current()
    }

    /// Attach device, option and authentication headers. The fixed headers
    /// are written last so options can never override them.
    fn authorize(&self, req: &PreparedRequest, token: &TokenPair) -> HttpRequest {
        let mut headers = Vec::new();
        set_header(&mut headers, HEADER_DEVICE_ID, &self.device_id);
        for option in &req.options {
            let (name, value) = option.header();
            set_header(&mut headers, name, value);
        }
        set_header(&mut headers, HEADER_ACCEPT, CONTENT_TYPE_JSON);
        set_header(
            &mut headers,
            HEADER_AUTHORIZATION,
            &format!("Bearer {}", token.access_token),
        );
        set_header(&mut headers, HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);

        HttpRequest {
            method: req.method.clone(),
            url: req.url(&self.client.base_url),
            headers,
            body: req.body.clone().map(HttpBody::Json),
        }
    }

    /// Send `req` and interpret the response.
    ///
    /// - `expected`: the body is decoded into `T` (an empty body decodes as `null`).
    /// - 401: the token is refreshed and the request re-sent, at most
    ///   [`MAX_REFRESHES`] times; a further 401 is an authentication error.
    /// - 510/520/530: consent and payment-authorization errors become an
    ///   [`Outcome::Sca`] handle when a resolver is configured; anything
    ///   else is returned as [`NeoError::Platform`].
    /// - any other status is [`NeoError::UnexpectedStatus`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        req: &PreparedRequest,
        expected: u16,
    ) -> Result<Outcome<T>, NeoError> {
        let mut refreshes = 0;
        loop {
            let token = self.store.current();
            let http = self.authorize(req, &token);
            tracing::debug!(method = %http.method, url = %http.url, "sending request");

            let resp = self.client.doer.send(http.clone()).await?;

            if resp.status == expected {
                return decode_body(&resp.body).map(Outcome::Done);
            }

            if resp.status == 401 {
                if refreshes >= MAX_REFRESHES {
                    return Err(NeoError::Auth(format!(
                        "{} {} still unauthorized after token refresh",
                        http.method, http.url
                    )));
                }
                refreshes += 1;
                tracing::debug!(url = %http.url, "access token rejected, refreshing");
                let fresh = self.client.refresh_token(&token).await.map_err(|e| {
                    tracing::warn!("token refresh failed: {e}");
                    NeoError::Auth(format!("failed to refresh token: {e}"))
                })?;
                self.store.replace(fresh);
                continue;
            }

            if is_step_up_status(resp.status) {
                let error: PlatformError =
                    serde_json::from_slice(&resp.body).map_err(|e| NeoError::Decode {
                        what: "platform error",
                        source: e,
                    })?;
                let resolver = match &self.client.resolver {
                    Some(r) if error.is_consent_error() || error.is_payment_auth_error() => r,
                    _ => return Err(NeoError::Platform(error)),
                };
                tracing::debug!(
                    status = resp.status,
                    code = %error.error_code,
                    "step-up required"
                );
                let sca = resolver
                    .resolve(self.client.doer.as_ref(), &http, &error)
                    .await?;
                return Ok(Outcome::Sca(ScaHandle::new(
                    sca,
                    Continuation::retry(req.clone(), expected),
                )));
            }

            return Err(NeoError::UnexpectedStatus {
                status: resp.status,
                reason: resp.reason,
            });
        }
    }

    /// Pick up an operation once the end user has completed the step-up.
    pub async fn resume<T: DeserializeOwned>(
        &self,
        handle: ScaHandle<T>,
    ) -> Result<Outcome<T>, NeoError> {
        let ScaHandle {
            sca, continuation, ..
        } = handle;
        let (req, expected) = continuation.next_request(&sca)?;
        tracing::debug!(kind = ?continuation.kind, id = %sca.id, "resuming after step-up");

        let outcome = self.execute::<T>(&req, expected).await?;
        Ok(match (continuation.kind, continuation.payment) {
            (ContinuationKind::Initial, Some(ctx)) => {
                crate::api::payments::chain_payment(outcome, ctx)
            }
            _ => outcome,
        })
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, NeoError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| NeoError::Decode {
        what: "JSON",
        source: e,
    })
}
