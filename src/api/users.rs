use super::client::ApiClient;
use super::request::{ApiRequest, FormData};
use super::transport::Transport;
use crate::error::Result;
use crate::models::{ProfileForm, RoleRequest, RoleRequestAction, Session, User};
use crate::session::IdentitySource;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

pub const GET_ME_PATH: &str = "/user/get-me";

/// Fields of `/user/get-me` that make up a session. Extra fields are ignored.
#[derive(Deserialize)]
struct Identity {
    #[serde(rename = "_id")]
    id: String,
    role: crate::models::Role,
    email: String,
}

impl From<Identity> for Session {
    fn from(identity: Identity) -> Self {
        Session {
            user_id: identity.id,
            role: identity.role,
            email: identity.email,
        }
    }
}

pub async fn get_me<T: Transport>(client: &ApiClient<T>) -> Result<User> {
    client.call(&ApiRequest::get(GET_ME_PATH)).await
}

pub async fn list<T: Transport>(client: &ApiClient<T>) -> Result<Vec<User>> {
    client.call(&ApiRequest::get("/user")).await
}

pub async fn get<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<User> {
    client.call(&ApiRequest::get(format!("/user/{}", id))).await
}

pub async fn update_profile<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    form: &ProfileForm,
) -> Result<User> {
    let mut data = FormData::new()
        .text("name", form.name.as_str())
        .optional_text("phone", form.phone.as_deref())
        .optional_text("location", form.location.as_deref())
        .optional_text("bio", form.bio.as_deref());
    for interest in &form.interests {
        data = data.text("interests[]", interest.as_str());
    }
    let data = data.image("file", form.image.as_ref()).await?;

    client
        .call(&ApiRequest::patch(format!("/user/{}", id)).form(data))
        .await
}

pub async fn delete<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<()> {
    client
        .request(&ApiRequest::delete(format!("/user/{}", id)))
        .await?;
    Ok(())
}

pub async fn request_host<T: Transport>(client: &ApiClient<T>) -> Result<()> {
    client.request(&ApiRequest::post("/user/request-host")).await?;
    Ok(())
}

pub async fn role_requests<T: Transport>(client: &ApiClient<T>) -> Result<Vec<RoleRequest>> {
    client.call(&ApiRequest::get("/user/role-requests")).await
}

pub async fn update_role_request<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    action: RoleRequestAction,
) -> Result<()> {
    let request = ApiRequest::patch(format!("/user/role-requests/{}", id))
        .json(&json!({ "action": action }))?;
    client.request(&request).await?;
    Ok(())
}

#[async_trait]
impl<T: Transport> IdentitySource for ApiClient<T> {
    async fn fetch_session(&self) -> Result<Session> {
        let identity: Identity = self.call(&ApiRequest::get(GET_ME_PATH)).await?;
        Ok(identity.into())
    }
}
