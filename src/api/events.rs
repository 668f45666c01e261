use super::client::ApiClient;
use super::request::{ApiRequest, FormData};
use super::transport::Transport;
use crate::error::Result;
use crate::models::{Event, EventForm, User};

async fn event_form(form: &EventForm) -> Result<FormData> {
    FormData::new()
        .text("name", form.name.as_str())
        .text("type", form.event_type.as_str())
        .text("date", form.date.as_str())
        .text("time", form.time.as_str())
        .text("location", form.location.as_str())
        .text("minParticipants", form.min_participants.to_string())
        .text("maxParticipants", form.max_participants.to_string())
        .text("description", form.description.as_str())
        .text("joiningFee", form.joining_fee.to_string())
        .image("file", form.image.as_ref())
        .await
}

pub async fn list<T: Transport>(client: &ApiClient<T>) -> Result<Vec<Event>> {
    client.call(&ApiRequest::get("/events/all-events")).await
}

pub async fn get<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<Event> {
    client.call(&ApiRequest::get(format!("/events/{}", id))).await
}

pub async fn create<T: Transport>(client: &ApiClient<T>, form: &EventForm) -> Result<Event> {
    let data = event_form(form).await?;
    client.call(&ApiRequest::post("/events").form(data)).await
}

pub async fn update<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    form: &EventForm,
) -> Result<Event> {
    let data = event_form(form).await?;
    client
        .call(&ApiRequest::patch(format!("/events/{}", id)).form(data))
        .await
}

pub async fn delete<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<()> {
    client
        .request(&ApiRequest::delete(format!("/events/{}", id)))
        .await?;
    Ok(())
}

pub async fn join<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<()> {
    client
        .request(&ApiRequest::post(format!("/events/join/{}", id)))
        .await?;
    Ok(())
}

pub async fn participants<T: Transport>(client: &ApiClient<T>, id: &str) -> Result<Vec<User>> {
    client
        .call(&ApiRequest::get(format!("/events/participants/{}", id)))
        .await
}
