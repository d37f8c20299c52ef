//! Domain Layer
//!
//! The summarizer capability. Implementation is in the infrastructure layer.

pub mod summarizer;
