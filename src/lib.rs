pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod request;
pub mod sca;
pub mod transport;

pub use api::{
    Account, Bank, PaymentCreated, PaymentRequest, PaymentType, Session, SessionStatus,
    Transaction,
};
pub use auth::{Identity, TokenPair};
pub use client::{Api, Client, PRODUCTION_URL, SANDBOX_URL};
pub use config::{load_config, Environment, NeoConfig};
pub use error::{ErrorCategory, NeoError};
pub use headers::RequestOption;
pub use request::PreparedRequest;
pub use sca::{Consent, Outcome, PlatformError, Sca, ScaHandle, ScaResolver};
pub use transport::{HttpDoer, HttpRequest, HttpResponse};

/// Connect using discovered configuration: load it, authenticate, and
/// return an API handle for the configured device.
pub async fn connect(cli_config: Option<&str>) -> Result<Api, NeoError> {
    let config = load_config(cli_config)?;
    let client = Client::from_config(&config)?;
    client.api(&config.device_id()).await
}
