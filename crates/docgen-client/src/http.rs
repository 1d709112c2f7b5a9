//! Authenticated HTTP client for the document generator API.
//!
//! Every request goes through [`ApiClient::request`], which injects the bearer
//! token, encodes the body and normalizes failures into [`ApiError`]. A 401
//! from any endpoint ends the session: the token is dropped, the navigator is
//! sent to the login route and the call fails with `SessionExpired`.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::navigation::Navigator;
use crate::session::SessionHandle;

/// Request payload.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Serialized as JSON with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Sent byte-for-byte; no content type is added.
    Raw(Vec<u8>),
    /// Multipart upload; the transport sets the boundary.
    Multipart(Form),
}

/// Per-call request descriptor.
#[derive(Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Body,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// Attach the session token. Off for credential exchanges.
    pub authenticate: bool,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: Body::Empty,
            headers: HeaderMap::new(),
            query: Vec::new(),
            authenticate: true,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn without_token(mut self) -> Self {
        self.authenticate = false;
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub data: serde_json::Value,
    pub status: StatusCode,
}

impl ApiResponse {
    /// Decode the whole body.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Decode a single top-level field, e.g. `{"customer": {...}}`.
    pub fn field<T: DeserializeOwned>(mut self, key: &str) -> Result<T> {
        let value = self
            .data
            .get_mut(key)
            .map(serde_json::Value::take)
            .ok_or_else(|| ApiError::Decode(format!("response has no '{}' field", key)))?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("field '{}': {}", key, e)))
    }

    /// The `message` field, when the backend sent one.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(|v| v.as_str())
    }
}

/// HTTP client bound to one API base URL and one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    base: Url,
    session: SessionHandle,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionHandle, navigator: Navigator) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            http,
            base_url,
            base,
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Absolute URLs are used as given; anything else is joined to the base URL.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Same scheme, host and port as the base URL, and a path at or below
    /// the base path on a segment boundary.
    fn is_api_url(&self, url: &str) -> bool {
        let Ok(target) = Url::parse(url) else {
            return false;
        };
        if target.scheme() != self.base.scheme()
            || target.host_str() != self.base.host_str()
            || target.port_or_known_default() != self.base.port_or_known_default()
        {
            return false;
        }
        let base_path = self.base.path().trim_end_matches('/');
        let path = target.path();
        base_path.is_empty()
            || path == base_path
            || path.strip_prefix(base_path).is_some_and(|rest| rest.starts_with('/'))
    }

    /// Headers shared by every call: caller headers plus exactly one
    /// `Authorization` value when a token is available.
    fn prepare_headers(&self, mut headers: HeaderMap) -> Result<HeaderMap> {
        if let Some(token) = self.session.token() {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
        }
        Ok(headers)
    }

    fn expire_session(&self, method: &Method, path: &str) {
        tracing::warn!(%method, path, "Received 401, ending session");
        self.session.clear();
        self.navigator.redirect_to_login();
    }

    /// A 401 only ends the session when it comes from the API itself.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        method: &Method,
        path: &str,
        api_origin: bool,
    ) -> Result<reqwest::Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::debug!(%method, path, error = %e, "Request did not complete");
            ApiError::NetworkError(e.to_string())
        })?;
        tracing::debug!(%method, path, status = %response.status(), "Request completed");

        if api_origin && response.status() == StatusCode::UNAUTHORIZED {
            self.expire_session(method, path);
            return Err(ApiError::SessionExpired);
        }
        Ok(response)
    }

    /// Perform a request and return the decoded envelope.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
        let RequestOptions {
            method,
            body,
            headers,
            query,
            authenticate,
        } = options;

        let url = self.url(path);
        let api_origin = self.is_api_url(&url);
        let mut headers = if authenticate && api_origin {
            self.prepare_headers(headers)?
        } else {
            headers
        };
        let mut builder = self.http.request(method.clone(), url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        builder = match body {
            Body::Empty => builder,
            _ if method == Method::GET => {
                tracing::debug!(path, "Ignoring body on GET request");
                builder
            }
            Body::Json(value) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                builder.body(serde_json::to_vec(&value)?)
            }
            Body::Raw(bytes) => builder.body(bytes),
            Body::Multipart(form) => {
                headers.remove(CONTENT_TYPE);
                builder.multipart(form)
            }
        };

        let response = self.send(builder.headers(headers), &method, path, api_origin).await?;
        let status = response.status();
        let data = read_body(response).await?;

        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status,
                message: error_message(&data, status),
            });
        }

        Ok(ApiResponse { data, status })
    }

    pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<ApiResponse> {
        self.request(path, RequestOptions::get().query(query)).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.request(path, RequestOptions::new(Method::POST).json(body)?).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.request(path, RequestOptions::new(Method::PUT).json(body)?).await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.request(path, RequestOptions::new(Method::PATCH).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(path, RequestOptions::new(Method::DELETE)).await
    }

    /// Multipart upload of `file` under the `file` field plus extra text fields.
    pub async fn upload_file(&self, path: &str, file: &Path, fields: &[(String, String)]) -> Result<ApiResponse> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let mut form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        for (key, value) in fields {
            form = form.text(key.clone(), value.clone());
        }

        self.request(path, RequestOptions::new(Method::POST).body(Body::Multipart(form)))
            .await
    }

    /// GET whose body is written to `destination`. Returns the byte count.
    ///
    /// `path` may also be an absolute URL, e.g. a document's `pdf_url`. The
    /// bearer token and the 401 policy only apply below the API base URL.
    pub async fn download_file(&self, path: &str, destination: &Path) -> Result<u64> {
        let method = Method::GET;
        let url = self.url(path);
        let api_origin = self.is_api_url(&url);
        let headers = if api_origin {
            self.prepare_headers(HeaderMap::new())?
        } else {
            tracing::debug!(path, "Download outside the API, sending no credentials");
            HeaderMap::new()
        };
        let builder = self.http.get(url).headers(headers);

        let response = self.send(builder, &method, path, api_origin).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                status,
                message: format!("Download failed: {}", status.canonical_reason().unwrap_or("Unknown")),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::NetworkError(e.to_string()))?;
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(destination, &bytes).await?;
        tracing::info!(path, destination = %destination.display(), bytes = bytes.len(), "Downloaded file");
        Ok(bytes.len() as u64)
    }
}

/// JSON bodies are parsed, anything else is kept as a string. Empty is `null`.
async fn read_body(response: reqwest::Response) -> Result<serde_json::Value> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::NetworkError(e.to_string()))?;

    if bytes.is_empty() {
        return Ok(serde_json::Value::Null);
    }
    if is_json {
        return serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()));
    }
    Ok(serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Prefer the body's `message`, then `error`, then the status line.
pub(crate) fn error_message(data: &serde_json::Value, status: StatusCode) -> String {
    ["message", "error"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        })
}
