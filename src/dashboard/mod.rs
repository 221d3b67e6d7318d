//! Content admin client
//!
//! `ContentAdminClient` owns the admin page's interaction contract with the backend
//! content API: three upload forms, two read-only lists, delete actions, and the
//! notifications that report how each of them went.
//!
//! Collaborators are injected at construction: the API, the rendering layer, the
//! yes/no gate, and the store handing out local preview references.
//!
//! Every list shown is the snapshot the backend last returned. Mutations never touch
//! the displayed lists directly; they trigger a full refresh instead.

pub mod notification;
pub mod view;


use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{AdminApi, ApiError, RetryPolicy};
use crate::config::Config;
use crate::form::{FormFile, FormKind, UploadForm};
use crate::models::{BlogPost, Paper};
use crate::preview::{LocalObjectUrls, ObjectUrlStore, PreviewSet, PreviewView};

use notification::{Notification, NotificationCenter, NotificationKind};
use view::{blog_list_view, paper_list_view, AdminView, ConfirmGate, ListView, Progress, StatsView, Tab};

pub const PAPER_UPLOADED: &str = "Technical paper uploaded successfully!";
pub const BLOG_CREATED: &str = "Blog post created successfully!";
pub const BLOG_DELETED: &str = "Blog post deleted successfully!";
pub const PAPER_DELETED: &str = "Technical paper deleted successfully!";
pub const EDIT_UNAVAILABLE: &str = "Edit functionality will be available in a future update.";

pub const CONFIRM_DELETE_BLOG: &str = "Are you sure you want to delete this blog post?";
pub const CONFIRM_DELETE_PAPER: &str = "Are you sure you want to delete this technical paper?";
pub const CONFIRM_LOGOUT: &str = "Are you sure you want to logout?";

const UPLOAD_FAILED: &str = "Upload failed";
const CREATION_FAILED: &str = "Creation failed";
const BLOG_DELETE_FAILED: &str = "Failed to delete blog post";
const PAPER_DELETE_FAILED: &str = "Failed to delete paper";
const UPLOADING_IMAGES: &str = "Uploading Images...";

/// Display state of one list container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Populated,
    Empty,
}

/// A list's state plus whether the last refresh attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStatus {
    pub state: ListState,
    /// The view still shows an older snapshot because the latest refresh failed.
    /// Rendered exactly like a fresh list.
    pub stale: bool,
}

impl ListStatus {
    fn loading() -> Self {
        Self {
            state: ListState::Loading,
            stale: false,
        }
    }

    fn rendered(view: &ListView) -> Self {
        let state = match view {
            ListView::Loading => ListState::Loading,
            ListView::Empty { .. } => ListState::Empty,
            ListView::Populated { .. } => ListState::Populated,
        };
        Self { state, stale: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Backend accepted the form; it was cleared and the lists refreshed
    Accepted,
    /// Request failed; the form is untouched
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent
    Cancelled,
    Deleted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Both lists were replaced
    Updated,
    /// At least one fetch failed; neither list changed
    Stale,
}

/// Last snapshot rendered for each list
#[derive(Debug, Clone, Default)]
pub struct ContentSnapshot {
    pub blogs: Vec<BlogPost>,
    pub papers: Vec<Paper>,
}

pub struct ContentAdminClient {
    api: Arc<dyn AdminApi>,
    view: Arc<dyn AdminView>,
    gate: Arc<dyn ConfirmGate>,
    retry: RetryPolicy,
    notifications: NotificationCenter,
    previews: PreviewSet,
    snapshot: ContentSnapshot,
    blogs: ListStatus,
    papers: ListStatus,
    tab: Tab,
}

impl ContentAdminClient {
    pub fn new(
        api: Arc<dyn AdminApi>,
        view: Arc<dyn AdminView>,
        gate: Arc<dyn ConfirmGate>,
        config: &Config,
    ) -> Self {
        Self {
            api,
            view,
            gate,
            retry: config.retry.policy(),
            notifications: NotificationCenter::new(Duration::from_millis(config.notifications.ttl_ms)),
            previews: PreviewSet::new(LocalObjectUrls::boxed(), config.upload.clone()),
            snapshot: ContentSnapshot::default(),
            blogs: ListStatus::loading(),
            papers: ListStatus::loading(),
            tab: Tab::default(),
        }
    }

    /// Use a different store for preview references
    pub fn with_object_urls(mut self, store: Arc<dyn ObjectUrlStore>) -> Self {
        self.previews = PreviewSet::new(store, self.previews_config());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Show the initial tab and loading lists, then fetch the first snapshot
    pub async fn start(&mut self) -> RefreshOutcome {
        self.view.show_tab(self.tab);
        self.view.render_blogs(&ListView::Loading);
        self.view.render_papers(&ListView::Loading);
        self.refresh_content().await
    }

    /// Upload the paper form
    ///
    /// Submissions are sent exactly once whatever the retry policy: a transport error
    /// may arrive after the backend already stored the upload.
    pub async fn submit_paper(&mut self, form: &mut UploadForm) -> SubmitOutcome {
        self.view.set_busy(FormKind::Paper, true);
        let result = self.api.create_paper(form).await;
        self.view.set_busy(FormKind::Paper, false);

        match result {
            Ok(()) => {
                tracing::info!("Technical paper uploaded");
                self.notify(NotificationKind::Success, PAPER_UPLOADED);
                form.reset();
                self.refresh_content().await;
                SubmitOutcome::Accepted
            }
            Err(e) => {
                self.report_failure("upload_paper", &e, UPLOAD_FAILED);
                SubmitOutcome::Rejected
            }
        }
    }

    pub async fn submit_blog_post(&mut self, form: &mut UploadForm) -> SubmitOutcome {
        self.view.set_busy(FormKind::Blog, true);
        let result = self.api.create_blog(form).await;
        self.view.set_busy(FormKind::Blog, false);

        match result {
            Ok(()) => {
                tracing::info!("Blog post created");
                self.notify(NotificationKind::Success, BLOG_CREATED);
                form.reset();
                self.refresh_content().await;
                SubmitOutcome::Accepted
            }
            Err(e) => {
                self.report_failure("create_blog", &e, CREATION_FAILED);
                SubmitOutcome::Rejected
            }
        }
    }

    /// Upload the image form
    ///
    /// There is no byte-level progress: the indicator jumps from 0% to 100% when the
    /// response arrives and is hidden once the outcome is known.
    pub async fn submit_images(&mut self, form: &mut UploadForm) -> SubmitOutcome {
        self.view.set_busy(FormKind::Images, true);
        self.view.show_progress(Some(&Progress::new(UPLOADING_IMAGES, 0)));

        let result = self.api.upload_images(form).await;

        self.view.show_progress(Some(&Progress::new(UPLOADING_IMAGES, 100)));
        self.view.show_progress(None);
        self.view.set_busy(FormKind::Images, false);

        match result {
            Ok(receipt) => {
                tracing::info!(count = receipt.uploaded_count, "Images uploaded");
                self.notify(
                    NotificationKind::Success,
                    format!("{} image(s) uploaded successfully!", receipt.uploaded_count),
                );
                form.reset();
                self.clear_image_previews();
                self.refresh_content().await;
                SubmitOutcome::Accepted
            }
            Err(e) => {
                self.report_failure("upload_image", &e, UPLOAD_FAILED);
                SubmitOutcome::Rejected
            }
        }
    }

    /// Fetch both lists concurrently and render them only if both fetches succeed
    ///
    /// Failures are logged and otherwise swallowed: the previous snapshot stays on
    /// screen and both lists are marked stale.
    pub async fn refresh_content(&mut self) -> RefreshOutcome {
        let api = self.api.clone();
        let retry = self.retry;

        let (blogs, papers) = futures::join!(
            retry.run("list_blogs", || api.list_blogs()),
            retry.run("list_papers", || api.list_papers())
        );

        match (blogs, papers) {
            (Ok(blogs), Ok(papers)) => {
                let blog_view = blog_list_view(&blogs);
                let paper_view = paper_list_view(&papers);

                self.view.render_blogs(&blog_view);
                self.view.render_papers(&paper_view);
                self.view.render_stats(StatsView {
                    blogs: blogs.len(),
                    papers: papers.len(),
                });

                self.blogs = ListStatus::rendered(&blog_view);
                self.papers = ListStatus::rendered(&paper_view);
                self.snapshot = ContentSnapshot { blogs, papers };

                tracing::debug!(
                    blogs = self.snapshot.blogs.len(),
                    papers = self.snapshot.papers.len(),
                    "Content refreshed"
                );
                RefreshOutcome::Updated
            }
            (blogs, papers) => {
                if let Err(e) = &blogs {
                    tracing::error!(error = %e, "Failed to load blog posts");
                }
                if let Err(e) = &papers {
                    tracing::error!(error = %e, "Failed to load papers");
                }
                self.blogs.stale = true;
                self.papers.stale = true;
                RefreshOutcome::Stale
            }
        }
    }

    /// Delete a blog post after confirmation
    ///
    /// A failure shows the backend's `message` when it sent one, the transport error
    /// when the request never completed, and "Failed to delete blog post" otherwise.
    pub async fn delete_blog(&mut self, id: &str) -> DeleteOutcome {
        if !self.gate.confirm(CONFIRM_DELETE_BLOG) {
            tracing::debug!(id, "Blog deletion cancelled");
            return DeleteOutcome::Cancelled;
        }

        let api = self.api.clone();
        match self.retry.run("delete_blog", || api.delete_blog(id)).await {
            Ok(()) => {
                tracing::info!(id, "Blog post deleted");
                self.notify(NotificationKind::Success, BLOG_DELETED);
                self.refresh_content().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                self.report_failure("delete_blog", &e, BLOG_DELETE_FAILED);
                DeleteOutcome::Failed
            }
        }
    }

    /// Delete a technical paper after confirmation
    ///
    /// Failures are reported like `delete_blog`, with "Failed to delete paper" as the
    /// generic message.
    pub async fn delete_paper(&mut self, id: &str) -> DeleteOutcome {
        if !self.gate.confirm(CONFIRM_DELETE_PAPER) {
            tracing::debug!(id, "Paper deletion cancelled");
            return DeleteOutcome::Cancelled;
        }

        let api = self.api.clone();
        match self.retry.run("delete_paper", || api.delete_paper(id)).await {
            Ok(()) => {
                tracing::info!(id, "Technical paper deleted");
                self.notify(NotificationKind::Success, PAPER_DELETED);
                self.refresh_content().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                self.report_failure("delete_paper", &e, PAPER_DELETE_FAILED);
                DeleteOutcome::Failed
            }
        }
    }

    /// Editing is not implemented; the user is told so
    pub fn edit_blog(&mut self, id: &str) {
        tracing::debug!(id, "Edit requested");
        self.notify(NotificationKind::Info, EDIT_UNAVAILABLE);
    }

    /// Navigate to the logout target after confirmation; returns whether it happened
    pub fn logout(&mut self) -> bool {
        if !self.gate.confirm(CONFIRM_LOGOUT) {
            return false;
        }
        self.view.navigate(&self.api.logout_url());
        true
    }

    /// Make `tab` the only active section
    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.view.show_tab(tab);
    }

    pub fn active_tab(&self) -> Tab {
        self.tab
    }

    /// Show a thumbnail for every image among locally selected files
    pub fn preview_local_images(&mut self, files: &[FormFile]) -> Vec<PreviewView> {
        let previews = self.previews.replace(files).to_vec();
        self.view.render_previews(&previews);
        previews
    }

    /// Called by the view once a thumbnail has loaded; releases its reference
    pub fn thumbnail_loaded(&mut self, url: &str) -> bool {
        self.previews.loaded(url)
    }

    pub fn clear_image_previews(&mut self) {
        self.previews.clear();
        self.view.render_previews(&[]);
    }

    /// Notifications still visible now
    pub fn active_notifications(&mut self) -> Vec<Notification> {
        self.notifications.active(Utc::now())
    }

    pub fn snapshot(&self) -> &ContentSnapshot {
        &self.snapshot
    }

    pub fn blog_status(&self) -> ListStatus {
        self.blogs
    }

    pub fn paper_status(&self) -> ListStatus {
        self.papers
    }

    fn previews_config(&self) -> crate::config::UploadConfig {
        self.previews.upload_config().clone()
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let notification = self.notifications.push(kind, message, Utc::now());
        self.view.notify(&notification);
    }

    fn report_failure(&mut self, operation: &str, error: &ApiError, fallback: &str) {
        tracing::warn!(operation, error = %error, "Request failed");
        self.notify(NotificationKind::Error, error.user_message(fallback));
    }
}
