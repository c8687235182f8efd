//! Core types and trait definitions for the respondent portal.
//!
//! This crate is deliberately free of HTTP and network dependencies.
//! All other crates depend on it; it performs no I/O of its own.

pub mod claims;
pub mod config;
pub mod error;
pub mod store;
pub mod token;

pub use error::{Error, Result};
