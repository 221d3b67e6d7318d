//! View-models and the rendering seam
//!
//! The dashboard never builds markup. It maps backend snapshots to the plain data
//! structures below and hands them to an `AdminView`, which decides how to show them.

use serde::Serialize;

use super::notification::Notification;
use crate::form::FormKind;
use crate::models::{display_date, BlogPost, Paper};
use crate::preview::PreviewView;

pub const NO_BLOGS: &str = "No blog posts yet. Create your first blog post above!";
pub const NO_PAPERS: &str = "No technical papers yet. Upload your first paper above!";

/// What a list container shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ListView {
    Loading,
    Empty {
        icon: &'static str,
        message: &'static str,
    },
    Populated {
        items: Vec<ContentItemView>,
    },
}

impl ListView {
    pub fn items(&self) -> &[ContentItemView] {
        match self {
            ListView::Populated { items } => items,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItemView {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub date_label: String,
    pub actions: Vec<ItemAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Edit,
    Delete,
    View,
}

/// Button attached to a list entry; `target` is an id or, for `View`, a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAction {
    pub kind: ActionKind,
    pub target: String,
    pub label: &'static str,
}

impl ItemAction {
    fn new(kind: ActionKind, target: &str) -> Self {
        let label = match kind {
            ActionKind::Edit => "Edit",
            ActionKind::Delete => "Delete",
            ActionKind::View => "View",
        };
        Self {
            kind,
            target: target.to_string(),
            label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsView {
    pub blogs: usize,
    pub papers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub title: String,
    pub percent: u8,
}

impl Progress {
    pub fn new(title: impl Into<String>, percent: u8) -> Self {
        Self {
            title: title.into(),
            percent: percent.min(100),
        }
    }
}

/// Admin page sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Papers,
    Blogs,
    Images,
    Manage,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Papers, Tab::Blogs, Tab::Images, Tab::Manage];
}

pub fn blog_list_view(blogs: &[BlogPost]) -> ListView {
    if blogs.is_empty() {
        return ListView::Empty {
            icon: "fa-blog",
            message: NO_BLOGS,
        };
    }

    let items = blogs
        .iter()
        .map(|blog| ContentItemView {
            id: blog.id.clone(),
            title: blog.title.clone(),
            summary: blog.excerpt.clone(),
            date_label: format!("Created: {}", display_date(&blog.created_at)),
            actions: vec![
                ItemAction::new(ActionKind::Edit, &blog.id),
                ItemAction::new(ActionKind::Delete, &blog.id),
            ],
        })
        .collect();

    ListView::Populated { items }
}

pub fn paper_list_view(papers: &[Paper]) -> ListView {
    if papers.is_empty() {
        return ListView::Empty {
            icon: "fa-file-alt",
            message: NO_PAPERS,
        };
    }

    let items = papers
        .iter()
        .map(|paper| ContentItemView {
            id: paper.id.clone(),
            title: paper.title.clone(),
            summary: paper.description.clone(),
            date_label: format!("Uploaded: {}", display_date(&paper.upload_date)),
            actions: vec![
                ItemAction::new(ActionKind::View, &paper.file_url),
                ItemAction::new(ActionKind::Delete, &paper.id),
            ],
        })
        .collect();

    ListView::Populated { items }
}

/// Rendering layer the dashboard reports to
pub trait AdminView: Send + Sync {
    fn render_blogs(&self, view: &ListView);

    fn render_papers(&self, view: &ListView);

    fn notify(&self, notification: &Notification);

    /// Disable or re-enable the submit button of a form
    fn set_busy(&self, form: FormKind, busy: bool);

    fn render_stats(&self, _stats: StatsView) {}

    /// `None` hides the progress indicator
    fn show_progress(&self, _progress: Option<&Progress>) {}

    fn render_previews(&self, _previews: &[PreviewView]) {}

    fn show_tab(&self, _tab: Tab) {}

    fn navigate(&self, url: &str);
}

/// Yes/no gate in front of destructive actions
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}
