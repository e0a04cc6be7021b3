use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE_FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_JSON: &str = "application/json";

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_CONTENT_TYPE: &str = "content-type";

pub const HEADER_SESSION_ID: &str = "x-session-id";
pub const HEADER_REDIRECT_URL: &str = "x-redirect-url";
pub const HEADER_PSU_ID: &str = "x-psu-id";
pub const HEADER_PSU_IP: &str = "x-psu-ip-address";
pub const HEADER_DEVICE_ID: &str = "x-device-id";

/// Adjusts a request before it is sent.
///
/// Options are applied in order, so a later option replaces an earlier one
/// with the same header name. The accept, authorization and content-type
/// headers are always written after every option and cannot be overridden.
///
/// `PsuId` is sent as-is; encrypting it is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum RequestOption {
    SessionId(String),
    RedirectUrl(String),
    PsuId(String),
    PsuIp(String),
    DeviceId(String),
    Header(String, String),
}

impl RequestOption {
    pub fn header(&self) -> (&str, &str) {
        match self {
            RequestOption::SessionId(v) => (HEADER_SESSION_ID, v),
            RequestOption::RedirectUrl(v) => (HEADER_REDIRECT_URL, v),
            RequestOption::PsuId(v) => (HEADER_PSU_ID, v),
            RequestOption::PsuIp(v) => (HEADER_PSU_IP, v),
            RequestOption::DeviceId(v) => (HEADER_DEVICE_ID, v),
            RequestOption::Header(k, v) => (k, v),
        }
    }
}

/// Set `name` to `value`, replacing any existing entry case-insensitively.
pub fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_ascii_lowercase(), value.to_string()));
}

pub fn get_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
