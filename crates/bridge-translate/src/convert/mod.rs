//! Conversion between the Messages and Chat Completions wire formats
//!
//! Requests go one way, replies the other. Documents are mapped directly
//! without an intermediate representation.

pub mod request;
pub mod response;
