//! Response payloads of the admin upload endpoints

use serde::{Deserialize, Serialize};

/// Success body of `POST /admin/upload_image`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUploadReceipt {
    pub uploaded_count: u64,
}

/// Failure body returned by any admin endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorPayload {
    /// Extract a non-empty message from a raw response body, if it is an error payload
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorPayload>(body)
            .ok()
            .and_then(|p| p.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}
