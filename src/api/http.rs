//! reqwest implementation of `AdminApi`

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::{endpoints, AdminApi, ApiError};
use crate::config::ApiConfig;
use crate::form::UploadForm;
use crate::models::{BlogPost, ErrorPayload, ImageUploadReceipt, Paper};

/// Talks to the backend content API over HTTP
pub struct HttpAdminApi {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpAdminApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_cookie: config.session_cookie.clone(),
        })
    }

    pub fn boxed(config: &ApiConfig) -> Result<Arc<dyn AdminApi>, ApiError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.session_cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    /// Send a request and turn non-success statuses into `ApiError::Application`
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // An unreadable error body still counts as an application error
        let body = response.bytes().await.unwrap_or_default();
        let message = ErrorPayload::message_from(&body);
        tracing::debug!(status = status.as_u16(), ?message, "Backend rejected request");

        Err(ApiError::Application {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_form(&self, path: &str, form: &UploadForm) -> Result<Response, ApiError> {
        let multipart = form.to_multipart()?;
        self.send(self.request(Method::POST, path).multipart(multipart)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Decode a success body; one that is not the expected JSON means the request did
/// not do what it was asked (a login page served after a redirect, for instance)
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await.map_err(ApiError::from)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn create_paper(&self, form: &UploadForm) -> Result<(), ApiError> {
        let response = self.send_form(endpoints::UPLOAD_PAPER, form).await?;
        read_json::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn create_blog(&self, form: &UploadForm) -> Result<(), ApiError> {
        let response = self.send_form(endpoints::CREATE_BLOG, form).await?;
        read_json::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn upload_images(&self, form: &UploadForm) -> Result<ImageUploadReceipt, ApiError> {
        let response = self.send_form(endpoints::UPLOAD_IMAGE, form).await?;
        read_json(response).await
    }

    async fn list_blogs(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.get_json(endpoints::BLOGS).await
    }

    async fn list_papers(&self) -> Result<Vec<Paper>, ApiError> {
        self.get_json(endpoints::PAPERS).await
    }

    async fn delete_blog(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&endpoints::blog(id)).await
    }

    async fn delete_paper(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&endpoints::paper(id)).await
    }

    fn logout_url(&self) -> String {
        self.url(endpoints::LOGOUT)
    }
}
