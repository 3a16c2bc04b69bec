//! Contribution submission flow
//!
//! Amount validation, fee split, wallet readiness gate, and the state machine
//! that sequences them around a single in-flight contribution.

mod amount;
mod controller;
mod fee;
mod gate;
mod view;

pub use amount::{ContributionAmount, MIN_CONTRIBUTION};
pub use controller::{SubmissionController, SubmissionState, SubmitOutcome};
pub use fee::{FeePreview, FeeSplit, FEE_RATE};
pub use gate::{PreconditionError, Remedy, TARGET_CHAIN_ID};
pub use view::{project, FormView, Notice};
