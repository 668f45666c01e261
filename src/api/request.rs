use crate::error::{ApiError, Result};
use crate::models::ImageUpload;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// A request against the backend, kept as owned data so it can be sent again
/// after a credential refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// Whether a 401 on this request should trigger a refresh-and-retry.
    /// Credential-issuing endpoints turn this off so a wrong password is
    /// reported as-is.
    pub recover_auth: bool,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(FormData),
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            recover_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, form: FormData) -> Self {
        self.body = RequestBody::Form(form);
        self
    }

    pub fn without_auth_recovery(mut self) -> Self {
        self.recover_auth = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Bytes,
    },
}

/// Multipart form contents.
///
/// `reqwest::multipart::Form` is consumed on send, so the parts are held here
/// and turned into a fresh form for every attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    parts: Vec<(String, FormPart)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts
            .push((name.to_string(), FormPart::Text(value.into())));
        self
    }

    pub fn optional_text(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: Bytes) -> Self {
        self.parts.push((
            name.to_string(),
            FormPart::File {
                file_name: file_name.to_string(),
                mime: guess_image_mime(file_name).to_string(),
                bytes,
            },
        ));
        self
    }

    /// Read an image from disk and attach it under `name`.
    pub async fn image(self, name: &str, upload: Option<&ImageUpload>) -> Result<Self> {
        let Some(upload) = upload else {
            return Ok(self);
        };

        let bytes = tokio::fs::read(&upload.path).await.map_err(|e| {
            ApiError::Upload(format!("Failed to read {}: {}", upload.path.display(), e))
        })?;
        let file_name = upload
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        Ok(self.file(name, &file_name, Bytes::from(bytes)))
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            FormPart::Text(value) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn to_multipart(&self) -> Result<Form> {
        let mut form = Form::new();
        for (name, part) in &self.parts {
            form = match part {
                FormPart::Text(value) => form.text(name.clone(), value.clone()),
                FormPart::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.to_vec())
                        .file_name(file_name.clone())
                        .mime_str(mime)
                        .map_err(|e| ApiError::Upload(e.to_string()))?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

fn guess_image_mime(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
