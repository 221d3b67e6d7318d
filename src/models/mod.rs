//! Data models
//!
//! Client-side mirrors of what the backend content API returns:
//! - `BlogPost` and `Paper` list entries
//! - Response payloads for uploads and failures
//!
//! The client never mutates these; every list is a snapshot replaced wholesale
//! after each refresh.

mod blog;
mod de;
mod paper;
mod payload;

pub use blog::BlogPost;
pub use de::{display_date, parse_timestamp};
pub use paper::Paper;
pub use payload::{ErrorPayload, ImageUploadReceipt};
