//! Operation wrappers: one request each, executed through [`Api::execute`](crate::client::Api::execute).

pub mod accounts;
pub mod banks;
pub mod consent;
pub mod payments;
pub mod session;
pub mod transactions;

pub use accounts::{Account, Balance};
pub use banks::Bank;
pub use payments::{
    AccountInfo, Address, Agent, PaymentCode, PaymentCreated, PaymentMetadata, PaymentRequest,
    PaymentType, RemittanceInfoStructured,
};
pub use session::{Session, SessionStatus};
pub use transactions::{Money, Transaction};
