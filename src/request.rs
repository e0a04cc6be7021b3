use serde::{Deserialize, Serialize};

use crate::headers::RequestOption;

/// A request as built by an operation wrapper, before authentication.
///
/// `target` is either a path relative to the API base URL or an absolute URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedRequest {
    pub method: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<RequestOption>,
}

impl PreparedRequest {
    pub fn new(method: &str, target: impl Into<String>) -> Self {
        Self {
            method: method.to_string(),
            target: target.into(),
            body: None,
            options: Vec::new(),
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new("GET", target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new("POST", target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new("DELETE", target)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = RequestOption>) -> Self {
        self.options.extend(options);
        self
    }

    pub fn with_option(mut self, option: RequestOption) -> Self {
        self.options.push(option);
        self
    }

    /// Resolve `target` against `base_url` unless it is already absolute.
    pub fn url(&self, base_url: &str) -> String {
        if self.target.starts_with("http") {
            self.target.clone()
        } else {
            format!("{}{}", base_url.trim_end_matches('/'), self.target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_target_joins_base() {
        let req = PreparedRequest::get("/ics/v3/banks");
        assert_eq!(
            req.url("https://sandbox.neonomics.io/"),
            "https://sandbox.neonomics.io/ics/v3/banks"
        );
    }

    #[test]
    fn absolute_target_is_kept() {
        let req = PreparedRequest::get("https://other.example.com/x");
        assert_eq!(
            req.url("https://sandbox.neonomics.io"),
            "https://other.example.com/x"
        );
    }

    #[test]
    fn builder_accumulates_options() {
        let req = PreparedRequest::post("/ics/v3/session")
            .with_body(serde_json::json!({"bankId": "b1"}))
            .with_options([RequestOption::PsuIp("1.2.3.4".into())])
            .with_option(RequestOption::SessionId("s1".into()));
        assert_eq!(req.method, "POST");
        assert_eq!(req.options.len(), 2);
        assert_eq!(req.body.unwrap()["bankId"], "b1");
    }
}
