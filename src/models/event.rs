use super::user::UserRef;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Open,
    Full,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(deserialize_with = "event_date")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub min_participants: u32,
    #[serde(default)]
    pub max_participants: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub joining_fee: f64,
    pub status: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<UserRef>,
    #[serde(default)]
    pub participants: Vec<UserRef>,
}

/// Full timestamps, or the bare `YYYY-MM-DD` the event form submits, read as
/// midnight UTC.
fn event_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = raw.parse::<DateTime<Utc>>() {
        return Ok(timestamp);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| de::Error::custom(format!("invalid event date '{}'", raw)))
}

impl Event {
    pub fn is_hosted_by(&self, user_id: &str) -> bool {
        self.host.as_ref().map_or(false, |h| h.id() == user_id)
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.id() == user_id)
    }
}

/// Client-side narrowing of an event listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    pub search: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}
