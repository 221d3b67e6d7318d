//! HTML rendering of dashboard view-models
//!
//! Fragments for the admin page's containers: content lists, notifications, stats,
//! the progress indicator, and image previews. All templates are autoescaped, so
//! titles and excerpts coming from the backend are never interpreted as markup.

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::dashboard::notification::Notification;
use crate::dashboard::view::{ListView, Progress, StatsView};
use crate::preview::PreviewView;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

const CONTENT_LIST: &str = r#"{% if list.state == "loading" -%}
<div class="loading"><i class="fas fa-spinner fa-spin"></i> Loading...</div>
{%- elif list.state == "empty" -%}
<div class="no-content"><i class="fas {{ list.icon }}"></i><p>{{ list.message }}</p></div>
{%- else -%}
{% for item in list.items %}<div class="content-item" data-id="{{ item.id }}">
<div class="content-info"><h4>{{ item.title }}</h4><p>{{ item.summary }}</p><small>{{ item.date_label }}</small></div>
<div class="content-actions">{% for action in item.actions %}<button class="action-btn{% if action.kind == "delete" %} delete{% endif %}" data-action="{{ action.kind }}" data-target="{{ action.target }}" title="{{ action.label }}"></button>{% endfor %}</div>
</div>
{% endfor %}
{%- endif %}"#;

const NOTIFICATION: &str = r#"<div class="notification notification-{{ kind }}" data-id="{{ id }}"><div class="notification-content"><i class="fas {{ icon }}"></i><span>{{ message }}</span></div></div>"#;

const STATS: &str = r#"<div class="stat" data-stat="blogs"><span class="stat-number">{{ blogs }}</span></div><div class="stat" data-stat="papers"><span class="stat-number">{{ papers }}</span></div>"#;

const PROGRESS: &str = r#"<div class="progress-info"><h3>{{ title }}</h3><div class="progress-bar"><div class="progress-fill" style="width: {{ percent }}%"></div></div><span class="progress-text">{{ percent }}%</span></div>"#;

const PREVIEWS: &str = r#"{% for preview in previews %}<div class="image-preview"><img src="{{ preview.url }}" alt="{{ preview.file_name }}"><p>{{ preview.file_name }}</p></div>{% endfor %}"#;

pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("content_list.html", CONTENT_LIST),
            ("notification.html", NOTIFICATION),
            ("stats.html", STATS),
            ("progress.html", PROGRESS),
            ("previews.html", PREVIEWS),
        ])?;
        Ok(Self { tera })
    }

    pub fn content_list(&self, list: &ListView) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("list", list);
        self.render("content_list.html", &context)
    }

    pub fn notification(&self, notification: &Notification) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("id", &notification.id);
        context.insert("kind", &notification.kind);
        context.insert("icon", notification.kind.icon());
        context.insert("message", &notification.message);
        self.render("notification.html", &context)
    }

    pub fn stats(&self, stats: StatsView) -> Result<String, RenderError> {
        self.render_value("stats.html", &stats)
    }

    pub fn progress(&self, progress: &Progress) -> Result<String, RenderError> {
        self.render_value("progress.html", progress)
    }

    pub fn previews(&self, previews: &[PreviewView]) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("previews", previews);
        self.render("previews.html", &context)
    }

    fn render_value<T: Serialize>(&self, template: &str, value: &T) -> Result<String, RenderError> {
        let context = Context::from_serialize(value)?;
        self.render(template, &context)
    }

    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        Ok(self.tera.render(template, context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::notification::{NotificationCenter, NotificationKind};
    use crate::dashboard::view::{blog_list_view, paper_list_view, NO_PAPERS};
    use crate::models::{parse_timestamp, BlogPost, Paper};
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn test_loading_and_empty_states() {
        let renderer = HtmlRenderer::new().unwrap();

        let loading = renderer.content_list(&ListView::Loading).unwrap();
        assert!(loading.contains("Loading..."));

        let empty = renderer.content_list(&paper_list_view(&[])).unwrap();
        assert!(empty.contains("no-content"));
        assert!(empty.contains("fa-file-alt"));
        assert!(empty.contains(NO_PAPERS));
    }

    #[test]
    fn test_backend_text_is_escaped() {
        let renderer = HtmlRenderer::new().unwrap();
        let blogs = vec![BlogPost {
            id: "b1".into(),
            title: "<script>alert(1)</script>".into(),
            excerpt: "Tom & Jerry".into(),
            created_at: parse_timestamp("2024-01-15").unwrap(),
        }];

        let html = renderer.content_list(&blog_list_view(&blogs)).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("Created: 2024-01-15"));
        assert!(html.contains(r#"data-action="edit""#));
        assert!(html.contains(r#"class="action-btn delete""#));
    }

    #[test]
    fn test_paper_entries_render_view_action() {
        let renderer = HtmlRenderer::new().unwrap();
        let papers = vec![Paper {
            id: "p42".into(),
            title: "Chest X-ray".into(),
            description: "Transfer learning".into(),
            upload_date: parse_timestamp("2024-02-01").unwrap(),
            file_url: "papers.pdf".into(),
        }];

        let html = renderer.content_list(&paper_list_view(&papers)).unwrap();

        assert!(html.contains(r#"data-id="p42""#));
        assert!(html.contains(r#"data-action="view" data-target="papers.pdf""#));
        assert_eq!(html.matches("content-item").count(), 1);
    }

    #[test]
    fn test_notification_fragment() {
        let renderer = HtmlRenderer::new().unwrap();
        let mut center = NotificationCenter::new(Duration::from_secs(4));
        let n = center.push(NotificationKind::Error, "Upload failed", Utc::now());

        let html = renderer.notification(&n).unwrap();
        assert!(html.contains("notification-error"));
        assert!(html.contains("fa-exclamation-circle"));
        assert!(html.contains("<span>Upload failed</span>"));
    }

    #[test]
    fn test_stats_progress_and_previews() {
        let renderer = HtmlRenderer::new().unwrap();

        let stats = renderer.stats(StatsView { blogs: 3, papers: 5 }).unwrap();
        assert!(stats.contains(r#"<span class="stat-number">3</span>"#));
        assert!(stats.contains(r#"<span class="stat-number">5</span>"#));

        let progress = renderer.progress(&Progress::new("Uploading Images...", 100)).unwrap();
        assert!(progress.contains("width: 100%"));
        assert!(progress.contains("<h3>Uploading Images...</h3>"));

        let previews = renderer
            .previews(&[PreviewView {
                url: "blob:local/1".into(),
                file_name: "a.png".into(),
            }])
            .unwrap();
        assert!(previews.contains("<p>a.png</p>"));
    }
}
