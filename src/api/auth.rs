use super::client::ApiClient;
use super::request::{ApiRequest, FormData};
use super::transport::Transport;
use crate::error::Result;
use crate::models::{LoginForm, RegisterForm};
use serde_json::Value;

/// Create an account. The backend expects multipart so a profile image can ride along.
pub async fn register<T: Transport>(client: &ApiClient<T>, form: &RegisterForm) -> Result<Value> {
    let data = FormData::new()
        .text("name", form.name.as_str())
        .text("email", form.email.as_str())
        .text("password", form.password.as_str())
        .optional_text("phone", form.phone.as_deref())
        .optional_text("location", form.location.as_deref())
        .image("file", form.image.as_ref())
        .await?;

    let request = ApiRequest::post("/auth/register")
        .form(data)
        .without_auth_recovery();
    client.call(&request).await
}

/// Sign in. On success the backend sets the credential cookies.
pub async fn login<T: Transport>(client: &ApiClient<T>, form: &LoginForm) -> Result<Value> {
    let request = ApiRequest::post("/auth/login")
        .json(form)?
        .without_auth_recovery();
    client.call(&request).await
}

/// Sign out. The backend clears the credential cookies.
pub async fn logout<T: Transport>(client: &ApiClient<T>) -> Result<()> {
    client.request(&ApiRequest::post("/auth/logout")).await?;
    Ok(())
}
