use serde::{Deserialize, Serialize};

/// Request body shared by task create and update. `status` arrives as a
/// plain string and is parsed during validation so an unknown value is a
/// named field failure, never a silent coercion.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Result body for mutations with no entity to return.
#[derive(Debug, Serialize)]
pub struct MutationResult {
    pub success: bool,
}
