//! Backend content API
//!
//! This module contains the client side of the admin endpoints:
//! - `AdminApi`, the seam the dashboard talks through
//! - `HttpAdminApi`, the reqwest implementation
//! - `ApiError`, separating transport failures from application failures
//! - `RetryPolicy`, an explicit retry parameter (single attempt by default)

mod error;
mod http;
mod retry;


use async_trait::async_trait;

use crate::form::UploadForm;
use crate::models::{BlogPost, ImageUploadReceipt, Paper};

pub use error::ApiError;
pub use http::HttpAdminApi;
pub use retry::RetryPolicy;

/// Endpoint paths of the backend content API
pub mod endpoints {
    pub const UPLOAD_PAPER: &str = "/admin/upload_paper";
    pub const CREATE_BLOG: &str = "/admin/create_blog";
    pub const UPLOAD_IMAGE: &str = "/admin/upload_image";
    pub const BLOGS: &str = "/admin/api/blogs";
    pub const PAPERS: &str = "/admin/api/papers";
    pub const LOGOUT: &str = "/admin/logout";

    pub fn blog(id: &str) -> String {
        format!("{}/{}", BLOGS, urlencoding::encode(id))
    }

    pub fn paper(id: &str) -> String {
        format!("{}/{}", PAPERS, urlencoding::encode(id))
    }
}

/// Operations the admin page needs from the backend
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `POST /admin/upload_paper`
    async fn create_paper(&self, form: &UploadForm) -> Result<(), ApiError>;

    /// `POST /admin/create_blog`
    async fn create_blog(&self, form: &UploadForm) -> Result<(), ApiError>;

    /// `POST /admin/upload_image`
    async fn upload_images(&self, form: &UploadForm) -> Result<ImageUploadReceipt, ApiError>;

    /// `GET /admin/api/blogs`
    async fn list_blogs(&self) -> Result<Vec<BlogPost>, ApiError>;

    /// `GET /admin/api/papers`
    async fn list_papers(&self) -> Result<Vec<Paper>, ApiError>;

    /// `DELETE /admin/api/blogs/{id}`
    async fn delete_blog(&self, id: &str) -> Result<(), ApiError>;

    /// `DELETE /admin/api/papers/{id}`
    async fn delete_paper(&self, id: &str) -> Result<(), ApiError>;

    /// Navigation target that ends the admin session
    fn logout_url(&self) -> String;
}
