use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NeoError;

/// Body of an outbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum HttpBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A fully resolved request, ready to hand to an [`HttpDoer`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

/// A response whose body has already been read to the end.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        Self {
            status,
            reason,
            body: body.into(),
        }
    }
}

impl std::fmt::Debug for dyn HttpDoer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDoer").finish()
    }
}

/// Sends a single HTTP request.
///
/// Implementations must read the response body to the end before returning,
/// so the underlying connection can be reused on every path. Retrying on
/// network failure, pooling, and timeouts all belong to the implementation.
#[async_trait]
pub trait HttpDoer: Send + Sync {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, NeoError>;
}

#[async_trait]
impl HttpDoer for reqwest::Client {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, NeoError> {
        let transport_err = |e: Box<dyn std::error::Error + Send + Sync>| NeoError::Transport {
            method: req.method.clone(),
            url: req.url.clone(),
            source: e,
        };

        let method = reqwest::Method::from_bytes(req.method.as_bytes())
            .map_err(|e| transport_err(Box::new(e)))?;
        let mut builder = self.request(method, &req.url);
        // Headers first: `json`/`form` only set content-type when it is absent.
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &req.body {
            builder = match body {
                HttpBody::Json(value) => builder.json(value),
                HttpBody::Form(pairs) => builder.form(pairs),
            };
        }

        let response = builder.send().await.map_err(|e| transport_err(Box::new(e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_err(Box::new(e)))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    //! An in-memory doer that replays canned responses and records requests.

    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    pub struct ScriptedDoer {
        responses: Mutex<VecDeque<HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedDoer {
        pub fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn remaining(&self) -> usize {
            self.responses.lock().unwrap().len()
        }
    }

    pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
        HttpResponse::new(status, serde_json::to_vec(&body).unwrap())
    }

    /// A sandbox API bound to `doer`, holding access token "tok".
    pub fn api(doer: Arc<ScriptedDoer>) -> crate::client::Api {
        crate::client::Client::sandbox(crate::auth::Identity::new("cid", "secret"), doer)
            .api_with_token(
                "dev-1",
                crate::auth::TokenPair {
                    access_token: "tok".into(),
                    token_type: "bearer".into(),
                    expires_in: 300,
                    refresh_token: "ref".into(),
                    refresh_expires_in: 1800,
                    session_state: String::new(),
                },
            )
    }

    #[async_trait]
    impl HttpDoer for ScriptedDoer {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, NeoError> {
            self.requests.lock().unwrap().push(req.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| NeoError::Transport {
                    method: req.method,
                    url: req.url,
                    source: "no scripted response left".into(),
                })
        }
    }
}
