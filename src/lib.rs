//! Client for a mobile-money payment backend
//!
//! The backend aggregates PayDunya, Pawapay and Moneroo behind a single
//! "smart payment" API and handles provider fallback itself. This crate
//! validates requests, relays them, and maps responses and failures to typed
//! results.

pub mod config;
pub mod error;
pub mod payments;

pub use error::{AppError, AppErrorKind, AppResult};
