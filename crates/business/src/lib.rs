//! # Biopass Business
//!
//! Business layer for the Biopass attendance backend:
//! - `EnrollmentService`: the enrollment handshake (request / claim /
//!   finalize) with the polling scanner agent
//! - `AdmissionService`: the per-scan admission decision and the
//!   record-plus-notify action
//! - `RosterService`: thin queries and administrative edits
//! - `Notifier`: injected seam to the outbound notification channel

pub mod admission;
pub mod enrollment;
pub mod error;
pub mod notify;
pub mod roster;
pub mod services;

pub use admission::{Admission, AdmissionService};
pub use enrollment::EnrollmentService;
pub use error::{BusinessError, BusinessResult};
pub use notify::{LogNotifier, Notifier, NotifierConfig, NotifyError};
pub use roster::RosterService;
pub use services::ServiceContext;
