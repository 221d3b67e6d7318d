//! Portfolio admin - content management client for a portfolio site's admin page
//!
//! This library provides the admin page's client side: uploading papers, blog posts
//! and images to the backend content API, listing and deleting what it stores, and
//! reporting every outcome through transient notifications.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod form;
pub mod models;
pub mod preview;
pub mod render;

pub use api::{AdminApi, ApiError, HttpAdminApi, RetryPolicy};
pub use config::Config;
pub use dashboard::ContentAdminClient;
