pub mod handle;
pub mod resolver;
pub mod types;

pub use handle::{Continuation, ContinuationKind, Outcome, PaymentContext, ScaHandle};
pub use resolver::{DefaultScaResolver, ScaResolver, DEFAULT_PLATFORM_DOMAIN};
pub use types::{
    is_step_up_status, Consent, Link, Meta, PlatformError, Sca, STEP_UP_STATUS_CODES,
};
