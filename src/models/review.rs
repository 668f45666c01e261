use super::user::UserRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event reference that may or may not be populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventRef {
    Id(String),
    Event(Box<super::event::Event>),
}

impl EventRef {
    pub fn id(&self) -> &str {
        match self {
            EventRef::Id(id) => id,
            EventRef::Event(event) => &event.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: UserRef,
    pub host: UserRef,
    pub event: EventRef,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
