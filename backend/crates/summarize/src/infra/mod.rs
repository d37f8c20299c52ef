//! Infrastructure Layer

pub mod huggingface;
