//! Application Layer

pub mod config;
pub mod summarize_text;

// Re-exports
pub use config::SummarizeConfig;
pub use summarize_text::SummarizeTextUseCase;
