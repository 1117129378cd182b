//! Client for the dua query service.
//!
//! [`FetchClient`] performs one GET per call with a fixed timeout and
//! returns either a validated list or a [`FetchError`] saying why not:
//!
//! - [`FetchError::Timeout`]: no answer within the timeout
//! - [`FetchError::NetworkUnreachable`]: connection failed
//! - [`FetchError::ServerError`]: non-2xx status, with the body kept
//! - [`FetchError::MalformedResponse`]: body is not a JSON array of records
//!
//! The [`DuaSource`] trait abstracts the four accessors for the navigator.

mod client;
pub mod error;
mod source;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, FetchClient};
pub use error::{FetchError, Result};
pub use source::DuaSource;
