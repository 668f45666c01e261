use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// An image attached to a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub name: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub interests: Vec<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone)]
pub struct EventForm {
    pub name: String,
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub min_participants: u32,
    pub max_participants: u32,
    pub description: String,
    pub joining_fee: f64,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewForm {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
