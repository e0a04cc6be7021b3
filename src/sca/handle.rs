use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::api::payments::{complete_payment_request, PaymentType};
use crate::error::NeoError;
use crate::headers::RequestOption;
use crate::request::PreparedRequest;
use crate::sca::types::{PlatformError, Sca};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuationKind {
    /// Resume by re-sending the original request.
    Initial,
    /// Resume by completing the payment whose id the step-up carries.
    AwaitingPaymentCompletion,
}

/// What a payment creation needs to build its completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentContext {
    pub session_id: String,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub options: Vec<RequestOption>,
}

/// How to pick up a suspended operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    pub kind: ContinuationKind,
    pub request: PreparedRequest,
    pub expected_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentContext>,
}

impl Continuation {
    pub fn retry(request: PreparedRequest, expected_status: u16) -> Self {
        Self {
            kind: ContinuationKind::Initial,
            request,
            expected_status,
            payment: None,
        }
    }

    /// The request the next resume sends, and the status it expects.
    pub fn next_request(&self, sca: &Sca) -> Result<(PreparedRequest, u16), NeoError> {
        match self.kind {
            ContinuationKind::Initial => Ok((self.request.clone(), self.expected_status)),
            ContinuationKind::AwaitingPaymentCompletion => {
                let ctx = self.payment.as_ref().ok_or(NeoError::InvalidScaData)?;
                let req = complete_payment_request(
                    &ctx.session_id,
                    ctx.payment_type,
                    &sca.id,
                    ctx.options.iter().cloned(),
                )?;
                Ok((req, 201))
            }
        }
    }
}

/// A suspended operation waiting for the end user to complete a step-up.
///
/// Returned instead of a result, never alongside one. Hand it back to
/// [`Api::resume`](crate::client::Api::resume) once the user has visited
/// [`url`](Self::url); resuming may produce another handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ScaHandle<T> {
    pub sca: Sca,
    pub continuation: Continuation,
    #[serde(skip)]
    output: PhantomData<fn() -> T>,
}

impl<T> ScaHandle<T> {
    pub fn new(sca: Sca, continuation: Continuation) -> Self {
        Self {
            sca,
            continuation,
            output: PhantomData,
        }
    }

    pub fn url(&self) -> &str {
        &self.sca.url
    }

    /// Session id or payment id, depending on the flow.
    pub fn id(&self) -> &str {
        &self.sca.id
    }

    pub fn error(&self) -> Option<&PlatformError> {
        self.sca.error.as_ref()
    }

    pub fn kind(&self) -> ContinuationKind {
        self.continuation.kind
    }
}

/// Result of an operation that may stop for a step-up.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    Sca(ScaHandle<T>),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(v) => Some(v),
            Outcome::Sca(_) => None,
        }
    }

    pub fn handle(&self) -> Option<&ScaHandle<T>> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Sca(h) => Some(h),
        }
    }

    /// For operations the platform never gates behind a step-up: a handle
    /// becomes the platform error that caused it.
    pub fn done_or_err(self) -> Result<T, NeoError> {
        match self {
            Outcome::Done(v) => Ok(v),
            Outcome::Sca(h) => Err(match h.sca.error {
                Some(e) => NeoError::Platform(e),
                None => NeoError::ScaProtocol(format!("unexpected step-up: {}", h.sca.url)),
            }),
        }
    }
}
