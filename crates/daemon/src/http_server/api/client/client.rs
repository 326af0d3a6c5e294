use bytes::Bytes;
use reqwest::{header::HeaderMap, header::HeaderValue, Client, Response};
use serde::Deserialize;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::http_server::api::v0::blobs::UploadResponse;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    msg: String,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&mut self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client);
        let response = Self::check(request_builder.send().await?).await?;
        Ok(response.json::<T::Response>().await?)
    }

    /// Push raw bytes to an upload URL handed out by the daemon.
    pub async fn upload_blob(
        &mut self,
        url: &Url,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<UploadResponse, ApiError> {
        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(data)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<UploadResponse>().await?)
    }

    /// Fetch the bytes behind a download URL.
    pub async fn download_blob(&mut self, url: &Url) -> Result<Bytes, ApiError> {
        let response = Self::check(self.client.get(url.clone()).send().await?).await?;
        Ok(response.bytes().await?)
    }

    /// Turn a non-2xx response into `ApiError::HttpStatus`, rendering
    /// the daemon's `{code, msg}` body as `[code] msg`.
    async fn check(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await?;
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => format!("[{}] {}", body.code, body.msg),
            Err(_) => text,
        };
        Err(ApiError::HttpStatus(status, message))
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
