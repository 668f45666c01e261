use super::client::ApiClient;
use super::request::ApiRequest;
use super::transport::Transport;
use crate::error::Result;
use crate::models::{Review, ReviewForm};
use serde::Serialize;

#[derive(Serialize)]
struct NewReview<'a> {
    host: &'a str,
    event: &'a str,
    rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

pub async fn create<T: Transport>(
    client: &ApiClient<T>,
    host_id: &str,
    event_id: &str,
    form: &ReviewForm,
) -> Result<Review> {
    let body = NewReview {
        host: host_id,
        event: event_id,
        rating: form.rating,
        comment: form.comment.as_deref(),
    };
    client
        .call(&ApiRequest::post("/reviews").json(&body)?)
        .await
}

pub async fn for_event<T: Transport>(client: &ApiClient<T>, event_id: &str) -> Result<Vec<Review>> {
    client
        .call(&ApiRequest::get(format!("/reviews/event/{}", event_id)))
        .await
}

pub async fn for_host<T: Transport>(client: &ApiClient<T>, host_id: &str) -> Result<Vec<Review>> {
    client
        .call(&ApiRequest::get(format!("/reviews/host/{}", host_id)))
        .await
}
