use serde::{Deserialize, Serialize};

/// Status codes the platform reserves for "strong customer authentication
/// required". They are domain signals, not server failures.
pub const STEP_UP_STATUS_CODES: [u16; 3] = [510, 520, 530];

pub fn is_step_up_status(status: u16) -> bool {
    STEP_UP_STATUS_CODES.contains(&status)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub id: String,
}

/// A hypermedia link. `type` doubles as the HTTP method when followed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub meta: Meta,
}

/// Error payload returned by the platform alongside a step-up status code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformError {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl PlatformError {
    /// The end user must consent before the operation can proceed.
    pub fn is_consent_error(&self) -> bool {
        self.r#type == "CONSENT" && self.error_code == "1426"
    }

    /// A created payment awaits the end user's authorization.
    pub fn is_payment_auth_error(&self) -> bool {
        self.r#type == "CONSENT" && self.error_code == "1428"
    }
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error {}: {}", self.r#type, self.error_code, self.message)
    }
}

impl std::error::Error for PlatformError {}

/// Where the end user has to go to satisfy a step-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    #[serde(default)]
    pub message: String,
    /// Only present on payment consents.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub payment_id: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A resolved step-up: the URL to visit and the id to resume with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sca {
    pub url: String,
    /// Session id or payment id, depending on the flow. Opaque.
    pub id: String,
    pub error: Option<PlatformError>,
}
