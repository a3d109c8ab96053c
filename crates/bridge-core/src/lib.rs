//! Shared primitives for the bridge crates

#![allow(clippy::must_use_candidate)]

mod error;

pub use error::{ErrorBody, ErrorEnvelope, HttpError};
