use serde::{Deserialize, Serialize};

use crate::client::Api;
use crate::error::NeoError;
use crate::request::PreparedRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "sessionId")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    #[serde(default)]
    pub bank_id: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub provider_id: String,
}

impl Api {
    /// Create a new session for the given bank.
    pub async fn new_session(&self, bank_id: &str) -> Result<Session, NeoError> {
        if bank_id.is_empty() {
            return Err(NeoError::InvalidBankId);
        }
        let req = PreparedRequest::post("/ics/v3/session")
            .with_body(serde_json::json!({ "bankId": bank_id }));
        self.execute(&req, 201).await?.done_or_err()
    }

    pub async fn session_status(&self, session_id: &str) -> Result<SessionStatus, NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        let req = PreparedRequest::get(format!("/ics/v3/session/{session_id}"));
        self.execute(&req, 200).await?.done_or_err()
    }

    /// Delete and invalidate a session.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), NeoError> {
        if session_id.is_empty() {
            return Err(NeoError::InvalidSessionId);
        }
        let req = PreparedRequest::delete(format!("/ics/v3/session/{session_id}"));
        self.execute::<()>(&req, 204).await?.done_or_err()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::transport::scripted::{api, json_response, ScriptedDoer};
    use crate::transport::{HttpBody, HttpResponse};

    #[tokio::test]
    async fn new_session_posts_bank_id() {
        let doer = Arc::new(ScriptedDoer::new(vec![json_response(
            201,
            serde_json::json!({"sessionId": "abc"}),
        )]));
        let session = api(doer.clone()).new_session("bank-1").await.unwrap();
        assert_eq!(session.id, "abc");

        let req = &doer.requests()[0];
        assert_eq!(req.method, "POST");
        assert!(req.url.ends_with("/ics/v3/session"));
        assert_eq!(
            req.body,
            Some(HttpBody::Json(serde_json::json!({"bankId": "bank-1"})))
        );
    }

    #[tokio::test]
    async fn empty_ids_fail_before_network() {
        let doer = Arc::new(ScriptedDoer::new(vec![]));
        let api = api(doer.clone());
        assert!(matches!(api.new_session("").await, Err(NeoError::InvalidBankId)));
        assert!(matches!(api.session_status("").await, Err(NeoError::InvalidSessionId)));
        assert!(matches!(api.delete_session("").await, Err(NeoError::InvalidSessionId)));
        assert!(doer.requests().is_empty());
    }

    #[tokio::test]
    async fn delete_expects_no_content() {
        let doer = Arc::new(ScriptedDoer::new(vec![HttpResponse::new(204, "")]));
        api(doer.clone()).delete_session("s1").await.unwrap();
        let req = &doer.requests()[0];
        assert_eq!(req.method, "DELETE");
        assert!(req.url.ends_with("/ics/v3/session/s1"));
    }

    #[tokio::test]
    async fn status_decodes_fields() {
        let doer = Arc::new(ScriptedDoer::new(vec![json_response(
            200,
            serde_json::json!({
                "bankId": "b1",
                "bankName": "Hizonti",
                "createdAt": "2021-03-01T10:00:00Z",
                "providerId": "p1"
            }),
        )]));
        let status = api(doer).session_status("s1").await.unwrap();
        assert_eq!(status.bank_name, "Hizonti");
        assert_eq!(status.provider_id, "p1");
    }
}
