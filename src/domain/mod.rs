//! Leave-request core: duration calculation, approval state machine and
//! input validation. Everything in here is pure and framework-free; the
//! HTTP layer in `crate::api` is the only caller.

use chrono::NaiveDate;
use derive_more::Display;

pub mod duration;
pub mod state;
pub mod transition;
pub mod validation;

pub use duration::{business_days, requested_days};
pub use state::{Period, State};
pub use transition::{LeaveAction, Notification, TransitionOutcome};

#[derive(Debug, Display, Clone, PartialEq)]
pub enum DomainError {
    #[display(fmt = "date_to cannot be before date_from")]
    InvalidRange,
    #[display(fmt = "{} is required", _0)]
    MissingRequiredField(&'static str),
    #[display(fmt = "date_from cannot be before {}", _0)]
    BackDated(NaiveDate),
}

impl std::error::Error for DomainError {}
