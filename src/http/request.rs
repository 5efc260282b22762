//! Outbound request description.
//!
//! # Responsibilities
//! - Describe a call independently of reqwest (method, path, body, timeout)
//! - Build multipart payloads that can be cloned and inspected before sending
//! - Join endpoint paths onto the configured base URL

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Append `path` to `base`, keeping any path prefix the base already has.
pub fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
}

/// Build an absolute path from segments, percent-encoding each one.
pub fn resource_path(segments: &[&str]) -> String {
    let mut url = match Url::parse("http://localhost/") {
        Ok(url) => url,
        Err(_) => return format!("/{}", segments.join("/")),
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// A single multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, file_name: String, mime: String, bytes: Vec<u8> },
}

impl MultipartField {
    pub fn name(&self) -> &str {
        match self {
            MultipartField::Text { name, .. } | MultipartField::File { name, .. } => name,
        }
    }
}

/// Multipart payload kept as plain data until it is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    fields: Vec<MultipartField>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(MultipartField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(MultipartField::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        });
        self
    }

    pub fn fields(&self) -> &[MultipartField] {
        &self.fields
    }

    /// Value of the first text field called `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            MultipartField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub(crate) fn into_form(self) -> GatewayResult<Form> {
        let mut form = Form::new();
        for field in self.fields {
            form = match field {
                MultipartField::Text { name, value } => form.text(name, value),
                MultipartField::File { name, file_name, mime, bytes } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)
                        .map_err(|e| GatewayError::Transport(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Request body variants.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartPayload),
}

/// A gated call against the backend.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// Overrides the client's default timeout.
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> GatewayResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, payload: MultipartPayload) -> Self {
        self.body = RequestBody::Multipart(payload);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_keeps_prefix() {
        let base = Url::parse("http://localhost:8000/").unwrap();
        assert_eq!(
            join_path(&base, "/health-check").unwrap().as_str(),
            "http://localhost:8000/health-check"
        );

        let prefixed = Url::parse("https://careers.example.com/backend").unwrap();
        assert_eq!(
            join_path(&prefixed, "/api/resumes").unwrap().as_str(),
            "https://careers.example.com/backend/api/resumes"
        );
    }

    #[test]
    fn test_resource_path_encodes_segments() {
        assert_eq!(resource_path(&["api", "resumes", "42"]), "/api/resumes/42");
        assert_eq!(
            resource_path(&["api", "resumes", "a b/c"]),
            "/api/resumes/a%20b%2Fc"
        );
    }

    #[test]
    fn test_multipart_payload_lookup() {
        let payload = MultipartPayload::new()
            .file("file", "resume.pdf", "application/pdf", b"%PDF".to_vec())
            .text("job_title", "Backend Engineer")
            .text("use_fallback_provider", "false");

        assert_eq!(payload.fields().len(), 3);
        assert_eq!(payload.fields()[0].name(), "file");
        assert_eq!(payload.text_value("job_title"), Some("Backend Engineer"));
        assert_eq!(payload.text_value("use_fallback_provider"), Some("false"));
        assert_eq!(payload.text_value("job_description"), None);
    }

    #[test]
    fn test_request_builders() {
        let req = ApiRequest::post("/api/cover-letters")
            .json(&serde_json::json!({ "job_title": "SRE" }))
            .unwrap()
            .timeout(Duration::from_secs(45));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.timeout, Some(Duration::from_secs(45)));
        assert!(matches!(req.body, RequestBody::Json(_)));
    }
}
