//! Local image previews
//!
//! Thumbnails for images selected but not yet uploaded. Each thumbnail points at a
//! short-lived local object reference which must be released as soon as the
//! thumbnail has loaded; anything still outstanding is released when the previews
//! are cleared or replaced.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::form::FormFile;

/// Issues and releases local object references for selected files
pub trait ObjectUrlStore: Send + Sync {
    /// Create a reference the view can load the file from
    fn create(&self, file: &FormFile) -> String;

    /// Release a reference; releasing an unknown reference is a no-op
    fn revoke(&self, url: &str);
}

/// In-process object reference store handing out `blob:` references
#[derive(Debug, Default)]
pub struct LocalObjectUrls {
    live: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl LocalObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Arc<dyn ObjectUrlStore> {
        Arc::new(Self::new())
    }

    /// Bytes behind a live reference
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().get(url).cloned()
    }

    /// Number of references not yet released
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ObjectUrlStore for LocalObjectUrls {
    fn create(&self, file: &FormFile) -> String {
        let url = format!("blob:local/{}", Uuid::new_v4());
        self.lock().insert(url.clone(), Arc::from(file.bytes.as_slice()));
        url
    }

    fn revoke(&self, url: &str) {
        self.lock().remove(url);
    }
}

/// One rendered thumbnail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewView {
    pub url: String,
    pub file_name: String,
}

/// Thumbnails currently shown for the image form
pub struct PreviewSet {
    store: Arc<dyn ObjectUrlStore>,
    upload: UploadConfig,
    previews: Vec<PreviewView>,
    pending: Vec<String>,
}

impl PreviewSet {
    pub fn new(store: Arc<dyn ObjectUrlStore>, upload: UploadConfig) -> Self {
        Self {
            store,
            upload,
            previews: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Replace the current thumbnails with one per previewable file
    pub fn replace(&mut self, files: &[FormFile]) -> &[PreviewView] {
        self.clear();

        for file in files {
            if !self.upload.is_previewable(&file.media_type) {
                tracing::debug!(file = %file.file_name, media_type = %file.media_type, "Skipping preview");
                continue;
            }
            let url = self.store.create(file);
            self.pending.push(url.clone());
            self.previews.push(PreviewView {
                url,
                file_name: file.file_name.clone(),
            });
        }

        &self.previews
    }

    /// Release the reference behind a thumbnail that finished loading
    ///
    /// Returns false if the reference is not outstanding.
    pub fn loaded(&mut self, url: &str) -> bool {
        match self.pending.iter().position(|u| u == url) {
            Some(idx) => {
                let url = self.pending.swap_remove(idx);
                self.store.revoke(&url);
                true
            }
            None => false,
        }
    }

    /// Remove every thumbnail, releasing outstanding references
    pub fn clear(&mut self) {
        for url in self.pending.drain(..) {
            self.store.revoke(&url);
        }
        self.previews.clear();
    }

    pub fn previews(&self) -> &[PreviewView] {
        &self.previews
    }

    pub fn upload_config(&self) -> &UploadConfig {
        &self.upload
    }

    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for PreviewSet {
    fn drop(&mut self) {
        self.clear();
    }
}
