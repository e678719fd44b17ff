//! Shared primitives and traits for the Nacre alignment crates.
//!
//! `nacre-core` provides the foundation that the other Nacre crates build on:
//!
//! - **Error types** — [`NacreError`] and [`Result`] for structured error handling
//! - **Traits** — Core abstractions like [`Sequence`], [`Scored`], [`Summarizable`]

pub mod error;
pub mod traits;

pub use error::{NacreError, Result};
pub use traits::*;
