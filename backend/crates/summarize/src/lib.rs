//! Summarize Backend Module
//!
//! `POST /api/summarize`: turns a note's text into a short summary using a
//! hosted inference API. Only reachable behind the session gate, which
//! supplies the caller's identity in `x-user-id`.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::SummarizeConfig;
pub use domain::summarizer::Summarizer;
pub use error::{ConfigError, SummarizeError, SummarizeResult};
pub use infra::huggingface::HuggingFaceSummarizer;
pub use presentation::router::summarize_router_generic;
