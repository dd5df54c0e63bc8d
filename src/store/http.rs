//! HTTP 存储后端
//!
//! - 配置存储：`GET {endpoint}{path}`，响应体即参数原始值
//! - 对象存储：`GET {endpoint}/{bucket}/{key}`（S3 兼容的 path-style 访问）
//!
//! 每次查询只发一次请求，不设置超时、不重试，由调用方决定是否整体重跑。

use super::{BlobError, BlobStore, ConfigStore, StoreError, StoreValue};
use crate::models::ObjectLocation;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use url::Url;

fn parse_endpoint(endpoint: &str) -> Result<String, String> {
    let url = Url::parse(endpoint).map_err(|e| format!("invalid endpoint {}: {}", endpoint, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url.as_str().trim_end_matches('/').to_string()),
        other => Err(format!("unsupported endpoint scheme: {}", other)),
    }
}

/// 逐段百分号编码，保留 `/` 分隔
fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// 远程参数网关
pub struct HttpConfigStore {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpConfigStore {
    pub fn new(endpoint: &str, token: Option<String>) -> Result<Self, StoreError> {
        Ok(Self {
            client: Client::new(),
            endpoint: parse_endpoint(endpoint).map_err(StoreError::Unavailable)?,
            token,
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint,
            encode_segments(path.trim_start_matches('/'))
        )
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, path: &str) -> Result<StoreValue, StoreError> {
        let url = self.url_for(path);
        tracing::debug!("[STORE] GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => {
                let body = resp
                    .text()
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                Ok(StoreValue::from_raw(body))
            }
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(StoreError::AccessDenied(format!("{} returned {}", url, resp.status())))
            }
            status => Err(StoreError::Unavailable(format!("{} returned {}", url, status))),
        }
    }
}

/// S3 兼容对象存储（path-style）
pub struct HttpBlobStore {
    client: Client,
    endpoint: String,
}

impl HttpBlobStore {
    pub fn new(endpoint: &str) -> Result<Self, BlobError> {
        Ok(Self {
            client: Client::new(),
            endpoint: parse_endpoint(endpoint).map_err(BlobError::Unavailable)?,
        })
    }

    fn url_for(&self, location: &ObjectLocation) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint,
            urlencoding::encode(&location.bucket),
            encode_segments(&location.key)
        )
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, location: &ObjectLocation) -> Result<Bytes, BlobError> {
        let url = self.url_for(location);
        tracing::debug!("[STORE] GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => resp
                .bytes()
                .await
                .map_err(|e| BlobError::Unavailable(e.to_string())),
            StatusCode::NOT_FOUND => Err(BlobError::NotFound),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(BlobError::AccessDenied(format!("{} returned {}", url, resp.status())))
            }
            status => Err(BlobError::Unavailable(format!("{} returned {}", url, status))),
        }
    }
}
