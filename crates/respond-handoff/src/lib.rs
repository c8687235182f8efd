//! Handoff-token construction for the respondent portal.
//!
//! Builds the short-lived signed claim set that authorizes one respondent to
//! complete one questionnaire instance on the downstream questionnaire
//! system. Data is reconciled from five upstream read APIs (case, collection
//! exercise, collection instrument, business party, survey); the result is a
//! single-use token the caller embeds in a redirect URL.

pub mod builder;
pub mod due;
pub mod error;
pub mod events;
pub mod upstream;

pub use builder::{HandoffClaims, HandoffPayloadBuilder};
pub use error::{Error, Result};
pub use events::EventResolver;
