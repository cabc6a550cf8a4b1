//! Domain logic for the tour management service.
//!
//! Nothing in this crate performs I/O. The HTTP layer (`tourmgmt-api`) and
//! the storage layer (`tourmgmt-db`) both build on these pieces.

pub mod error;
pub mod negotiation;
pub mod patch;
pub mod types;
pub mod validation;
