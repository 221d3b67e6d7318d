//! Technical paper model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;

/// Paper as listed by `GET /admin/api/papers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Backend-assigned identifier
    #[serde(deserialize_with = "de::identifier")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub upload_date: DateTime<Utc>,
    /// Backend-assigned path of the stored file
    pub file_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_paper() {
        let json = r#"{
            "id": "p42",
            "title": "Neurosymbolic Detection",
            "description": "YOLO + ILP",
            "upload_date": 1714550400000,
            "file_url": "/static/papers/p42.pdf"
        }"#;
        let paper: Paper = serde_json::from_str(json).unwrap();

        assert_eq!(paper.id, "p42");
        assert_eq!(paper.file_url, "/static/papers/p42.pdf");
        assert_eq!(super::super::display_date(&paper.upload_date), "2024-05-01");
    }

    #[test]
    fn test_missing_file_url_rejected() {
        let json = r#"{"id": "p1", "title": "T", "upload_date": "2024-01-01"}"#;
        assert!(serde_json::from_str::<Paper>(json).is_err());
    }
}
