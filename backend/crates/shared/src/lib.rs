//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate holds the vocabulary every other crate agrees on:
//! - Error classification ([`error::kind::ErrorKind`])
//! - The unified HTTP-facing error ([`error::app_error::AppError`])
//! - Conversions from library errors into it
//!
//! Nothing here knows about sessions, cookies or notes.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
