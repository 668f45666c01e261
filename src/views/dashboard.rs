use crate::models::{Event, EventStatus, Role, Session};
use chrono::{DateTime, Utc};

/// The events a dashboard shows for `session`: hosts see what they host,
/// everyone else sees what they joined.
pub fn view_for(session: &Session, events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .filter(|event| match session.role {
            Role::Host => event.is_hosted_by(&session.user_id),
            Role::User | Role::Admin => event.has_participant(&session.user_id),
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
    /// Only hosts earn revenue; `None` for everyone else.
    pub total_revenue: Option<f64>,
}

impl DashboardSummary {
    pub fn build(session: &Session, events: &[Event], now: DateTime<Utc>) -> Self {
        let mine = view_for(session, events);

        let upcoming = mine
            .iter()
            .filter(|e| e.date >= now && e.status == EventStatus::Open)
            .cloned()
            .collect();

        // An event can be both open and in the past; it counts as past then.
        let past = mine
            .iter()
            .filter(|e| e.date < now || e.status == EventStatus::Completed)
            .cloned()
            .collect();

        let total_revenue = (session.role == Role::Host).then(|| {
            mine.iter()
                .map(|e| e.joining_fee * e.participants.len() as f64)
                .sum::<f64>()
        });

        Self {
            upcoming,
            past,
            total_revenue,
        }
    }

    pub fn title(role: Role) -> &'static str {
        match role {
            Role::Host => "Host Dashboard",
            Role::User | Role::Admin => "My Dashboard",
        }
    }
}
