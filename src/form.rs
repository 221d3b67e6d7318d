//! Upload forms
//!
//! An `UploadForm` is the client-held state of one of the three upload forms on the
//! admin page. It is filled by the rendering layer, submitted as multipart data, and
//! reset only after the backend accepted it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which upload form an operation concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Paper,
    Blog,
    Images,
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Paper => write!(f, "paper"),
            FormKind::Blog => write!(f, "blog"),
            FormKind::Images => write!(f, "images"),
        }
    }
}

/// File attached to a form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    /// Multipart field name
    pub field: String,
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl FormFile {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its media type from the extension
    pub async fn from_path(field: impl Into<String>, path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(field, file_name, media_type_for_path(path), bytes))
    }
}

/// Client-held state of one upload form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    fields: Vec<(String, String)>,
    files: Vec<FormFile>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style text field
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_text(name, value);
        self
    }

    /// Builder-style file attachment
    pub fn with_file(mut self, file: FormFile) -> Self {
        self.attach(file);
        self
    }

    /// Set a text field, replacing an existing value with the same name
    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn attach(&mut self, file: FormFile) {
        self.files.push(file);
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FormFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    /// Clear every field and attachment
    pub fn reset(&mut self) {
        self.fields.clear();
        self.files.clear();
    }

    /// Build the multipart body sent to the backend
    pub fn to_multipart(&self) -> reqwest::Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();

        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }

        for file in &self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.media_type)?;
            form = form.part(file.field.clone(), part);
        }

        Ok(form)
    }
}

/// Label shown on a file input after a selection
///
/// A single file shows its name, several files show a count, an empty selection keeps
/// the placeholder.
pub fn file_label<S: AsRef<str>>(file_names: &[S]) -> Option<String> {
    match file_names {
        [] => None,
        [only] => Some(only.as_ref().to_string()),
        many => Some(format!("{} files selected", many.len())),
    }
}

/// Guess a media type from a file extension
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "md" | "markdown" => "text/markdown",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}
