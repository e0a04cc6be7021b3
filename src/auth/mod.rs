pub mod store;
pub mod token;

pub use store::{CredentialStore, Identity};
pub use token::{Authenticator, TokenPair, DEFAULT_TOKEN_PATH};
