//! API DTOs (Data Transfer Objects)

use serde::Deserialize;

/// Request for POST /api/summarize
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
}
