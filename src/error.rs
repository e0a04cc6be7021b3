use std::path::PathBuf;

use crate::sca::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum NeoError {
    #[error("invalid auth request")]
    InvalidAuthRequest,

    #[error("invalid bank ID")]
    InvalidBankId,

    #[error("invalid session ID")]
    InvalidSessionId,

    #[error("invalid account ID")]
    InvalidAccountId,

    #[error("invalid payment ID")]
    InvalidPaymentId,

    #[error("invalid payment type '{input}'{}", format_suggestion(.suggestion.as_deref()))]
    InvalidPaymentType {
        input: String,
        suggestion: Option<String>,
    },

    #[error("invalid payment request: {0}")]
    InvalidPaymentRequest(String),

    #[error("invalid account info")]
    InvalidAccountInfo,

    #[error("invalid remittance info")]
    InvalidRemittanceInfo,

    #[error("{method} {url} err: {source}")]
    Transport {
        method: String,
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid SCA data")]
    InvalidScaData,

    #[error("invalid consent")]
    InvalidConsent,

    #[error("SCA resolution failed: {0}")]
    ScaProtocol(String),

    #[error(transparent)]
    Platform(PlatformError),

    #[error("unexpected HTTP response: {status} {reason}")]
    UnexpectedStatus { status: u16, reason: String },

    #[error("Error in config {}: {detail}", path.display())]
    ConfigError { path: PathBuf, detail: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn format_suggestion(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Broad failure classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Transport,
    Decode,
    Authentication,
    StepUpProtocol,
    Domain,
    Config,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Transport => "transport",
            ErrorCategory::Decode => "decode",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::StepUpProtocol => "step_up_protocol",
            ErrorCategory::Domain => "domain",
            ErrorCategory::Config => "config",
        }
    }
}

impl NeoError {
    /// Error code string for structured JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            NeoError::InvalidAuthRequest => "invalid_auth_request",
            NeoError::InvalidBankId => "invalid_bank_id",
            NeoError::InvalidSessionId => "invalid_session_id",
            NeoError::InvalidAccountId => "invalid_account_id",
            NeoError::InvalidPaymentId => "invalid_payment_id",
            NeoError::InvalidPaymentType { .. } => "invalid_payment_type",
            NeoError::InvalidPaymentRequest(_) => "invalid_payment_request",
            NeoError::InvalidAccountInfo => "invalid_account_info",
            NeoError::InvalidRemittanceInfo => "invalid_remittance_info",
            NeoError::Transport { .. } => "transport_error",
            NeoError::Decode { .. } => "decode_error",
            NeoError::Auth(_) => "auth_failed",
            NeoError::InvalidScaData => "invalid_sca_data",
            NeoError::InvalidConsent => "invalid_consent",
            NeoError::ScaProtocol(_) => "sca_error",
            NeoError::Platform(_) => "platform_error",
            NeoError::UnexpectedStatus { .. } => "unexpected_status",
            NeoError::ConfigError { .. } => "config_error",
            NeoError::IoError(_) => "io_error",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            NeoError::InvalidAuthRequest
            | NeoError::InvalidBankId
            | NeoError::InvalidSessionId
            | NeoError::InvalidAccountId
            | NeoError::InvalidPaymentId
            | NeoError::InvalidPaymentType { .. }
            | NeoError::InvalidPaymentRequest(_)
            | NeoError::InvalidAccountInfo
            | NeoError::InvalidRemittanceInfo => ErrorCategory::Validation,
            NeoError::Transport { .. } | NeoError::IoError(_) => ErrorCategory::Transport,
            NeoError::Decode { .. } => ErrorCategory::Decode,
            NeoError::Auth(_) => ErrorCategory::Authentication,
            NeoError::InvalidScaData | NeoError::InvalidConsent | NeoError::ScaProtocol(_) => {
                ErrorCategory::StepUpProtocol
            }
            NeoError::Platform(_) | NeoError::UnexpectedStatus { .. } => ErrorCategory::Domain,
            NeoError::ConfigError { .. } => ErrorCategory::Config,
        }
    }

    /// The platform error payload, when the server reported one.
    pub fn platform_error(&self) -> Option<&PlatformError> {
        match self {
            NeoError::Platform(e) => Some(e),
            _ => None,
        }
    }

    /// Produce a structured JSON error object for `--json` output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("message".into(), serde_json::Value::String(self.to_string()));
        obj.insert("code".into(), serde_json::Value::String(self.code().to_string()));
        obj.insert(
            "category".into(),
            serde_json::Value::String(self.category().as_str().to_string()),
        );
        if let Some(e) = self.platform_error() {
            obj.insert("errorCode".into(), serde_json::Value::String(e.error_code.clone()));
        }
        serde_json::json!({ "error": obj })
    }
}
