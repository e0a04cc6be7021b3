use async_trait::async_trait;

use crate::error::NeoError;
use crate::sca::types::{Consent, PlatformError, Sca};
use crate::transport::{HttpDoer, HttpRequest};

pub const DEFAULT_PLATFORM_DOMAIN: &str = "neonomics.io";

/// Turns a step-up error into something the end user can act on.
#[async_trait]
pub trait ScaResolver: Send + Sync {
    /// `origin` is the request that triggered the step-up, already carrying
    /// its authentication headers.
    async fn resolve(
        &self,
        doer: &dyn HttpDoer,
        origin: &HttpRequest,
        error: &PlatformError,
    ) -> Result<Sca, NeoError>;
}

/// Follows platform-owned consent links; hands third-party links straight
/// to the caller.
#[derive(Debug, Clone)]
pub struct DefaultScaResolver {
    platform_domain: String,
}

impl Default for DefaultScaResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM_DOMAIN)
    }
}

impl DefaultScaResolver {
    pub fn new(platform_domain: impl Into<String>) -> Self {
        Self {
            platform_domain: platform_domain.into(),
        }
    }

    /// True when `href` points at the platform's own host or a subdomain of it.
    pub fn is_platform_link(&self, href: &str) -> bool {
        let Ok(url) = reqwest::Url::parse(href) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        let domain = self.platform_domain.as_str();
        host == domain || host.ends_with(&format!(".{domain}"))
    }
}

#[async_trait]
impl ScaResolver for DefaultScaResolver {
    async fn resolve(
        &self,
        doer: &dyn HttpDoer,
        origin: &HttpRequest,
        error: &PlatformError,
    ) -> Result<Sca, NeoError> {
        let first = error.links.first().ok_or(NeoError::InvalidScaData)?;

        if !self.is_platform_link(&first.href) {
            tracing::debug!(href = %first.href, "step-up handled by a third party");
            return Ok(Sca {
                url: first.href.clone(),
                id: first.meta.id.clone(),
                error: Some(error.clone()),
            });
        }

        tracing::debug!(method = %first.r#type, href = %first.href, "following consent link");
        let resp = doer
            .send(HttpRequest {
                method: first.r#type.clone(),
                url: first.href.clone(),
                headers: origin.headers.clone(),
                body: None,
            })
            .await?;
        if resp.status != 200 {
            return Err(NeoError::ScaProtocol(format!(
                "invalid SCA response: {} {}",
                resp.status, resp.reason
            )));
        }

        let consent: Consent =
            serde_json::from_slice(&resp.body).map_err(|e| NeoError::Decode {
                what: "consent",
                source: e,
            })?;
        let visit = consent.links.first().ok_or(NeoError::InvalidConsent)?;
        let id = if consent.payment_id.is_empty() {
            visit.meta.id.clone()
        } else {
            consent.payment_id.clone()
        };

        Ok(Sca {
            url: visit.href.clone(),
            id,
            error: Some(error.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sca::types::{Link, Meta};
    use crate::transport::scripted::{json_response, ScriptedDoer};

    fn origin() -> HttpRequest {
        HttpRequest {
            method: "GET".into(),
            url: "https://sandbox.neonomics.io/ics/v3/accounts".into(),
            headers: vec![
                ("authorization".into(), "Bearer tok".into()),
                ("x-session-id".into(), "s1".into()),
            ],
            body: None,
        }
    }

    fn consent_error(href: &str, id: &str) -> PlatformError {
        PlatformError {
            error_code: "1426".into(),
            r#type: "CONSENT".into(),
            links: vec![Link {
                r#type: "GET".into(),
                rel: "consent".into(),
                href: href.into(),
                meta: Meta { id: id.into() },
            }],
            ..Default::default()
        }
    }

    #[test]
    fn platform_link_detection() {
        let r = DefaultScaResolver::default();
        assert!(r.is_platform_link("https://sandbox.neonomics.io/x"));
        assert!(r.is_platform_link("https://neonomics.io/x"));
        assert!(!r.is_platform_link("https://bank.example.com/consent"));
        assert!(!r.is_platform_link("https://neonomics.io.evil.com/x"));
        assert!(!r.is_platform_link("not a url"));
    }

    #[tokio::test]
    async fn missing_links_is_invalid_sca_data() {
        let doer = ScriptedDoer::new(vec![]);
        let err = DefaultScaResolver::default()
            .resolve(&doer, &origin(), &PlatformError::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NeoError::InvalidScaData));
    }

    #[tokio::test]
    async fn third_party_link_is_returned_verbatim() {
        let doer = ScriptedDoer::new(vec![]);
        let error = consent_error("https://bank.example.com/consent?x=1", "s9");
        let sca = DefaultScaResolver::default()
            .resolve(&doer, &origin(), &error)
            .await
            .unwrap();
        assert_eq!(sca.url, "https://bank.example.com/consent?x=1");
        assert_eq!(sca.id, "s9");
        assert_eq!(sca.error, Some(error));
        assert!(doer.requests().is_empty());
    }

    #[tokio::test]
    async fn platform_link_is_followed_with_origin_headers() {
        let doer = ScriptedDoer::new(vec![json_response(
            200,
            serde_json::json!({
                "message": "consent",
                "paymentId": "",
                "links": [{"href": "https://visit", "meta": {"id": "s1"}}]
            }),
        )]);
        let error = consent_error("https://sandbox.neonomics.io/x", "s1");
        let sca = DefaultScaResolver::default()
            .resolve(&doer, &origin(), &error)
            .await
            .unwrap();
        assert_eq!(sca.url, "https://visit");
        assert_eq!(sca.id, "s1");

        let reqs = doer.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, "GET");
        assert_eq!(reqs[0].url, "https://sandbox.neonomics.io/x");
        assert_eq!(reqs[0].headers, origin().headers);
    }

    #[tokio::test]
    async fn payment_id_wins_over_link_id() {
        let doer = ScriptedDoer::new(vec![json_response(
            200,
            serde_json::json!({
                "paymentId": "pay-7",
                "links": [{"href": "https://visit", "meta": {"id": "s1"}}]
            }),
        )]);
        let sca = DefaultScaResolver::default()
            .resolve(&doer, &origin(), &consent_error("https://sandbox.neonomics.io/x", "s1"))
            .await
            .unwrap();
        assert_eq!(sca.id, "pay-7");
    }

    #[tokio::test]
    async fn consent_without_links_is_invalid() {
        let doer = ScriptedDoer::new(vec![json_response(
            200,
            serde_json::json!({"message": "nothing", "links": []}),
        )]);
        let err = DefaultScaResolver::default()
            .resolve(&doer, &origin(), &consent_error("https://sandbox.neonomics.io/x", "s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, NeoError::InvalidConsent));
    }

    #[tokio::test]
    async fn non_200_consent_response_fails() {
        let doer = ScriptedDoer::new(vec![json_response(404, serde_json::json!({}))]);
        let err = DefaultScaResolver::default()
            .resolve(&doer, &origin(), &consent_error("https://sandbox.neonomics.io/x", "s1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "sca_error");
        assert!(err.to_string().contains("404"));
    }
}
