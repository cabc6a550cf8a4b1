//! Request handlers.
//!
//! Handlers pick a representation through the tables in [`AppState`], call
//! the tour repository and map failures via [`AppError`].
//!
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod tours;
