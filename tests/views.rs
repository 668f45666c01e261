use chrono::{DateTime, TimeZone, Utc};
use eventmates::models::{Event, EventFilters, Role, Session};
use eventmates::views::{filter_events, nav_links, view_for, DashboardSummary};
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
}

fn event(id: &str, date: &str, status: &str, host: &str, participants: &[&str]) -> Event {
    serde_json::from_value(json!({
        "_id": id,
        "name": format!("Event {}", id),
        "type": "Outdoor",
        "date": date,
        "time": "10:00",
        "location": "Sylhet",
        "description": "A day out",
        "joiningFee": 10.0,
        "status": status,
        "host": host,
        "participants": participants,
    }))
    .unwrap()
}

fn session(id: &str, role: Role) -> Session {
    Session {
        user_id: id.to_string(),
        role,
        email: format!("{}@x.com", id),
    }
}

fn catalogue() -> Vec<Event> {
    vec![
        event("e1", "2030-07-01T00:00:00Z", "open", "h1", &["u1", "u2"]),
        event("e2", "2030-01-01T00:00:00Z", "open", "h1", &["u1"]),
        event("e3", "2030-08-01T00:00:00Z", "completed", "h2", &["u1"]),
        event("e4", "2030-09-01T00:00:00Z", "open", "h2", &["u3"]),
    ]
}

fn ids(events: &[Event]) -> Vec<&str> {
    events.iter().map(|e| e.id.as_str()).collect()
}

#[test]
fn test_host_sees_hosted_events() {
    let mine = view_for(&session("h1", Role::Host), &catalogue());
    assert_eq!(ids(&mine), vec!["e1", "e2"]);
}

#[test]
fn test_user_sees_joined_events() {
    let mine = view_for(&session("u1", Role::User), &catalogue());
    assert_eq!(ids(&mine), vec!["e1", "e2", "e3"]);
}

#[test]
fn test_admin_sees_joined_events() {
    let mine = view_for(&session("u3", Role::Admin), &catalogue());
    assert_eq!(ids(&mine), vec!["e4"]);
}

#[test]
fn test_user_dashboard_summary() {
    let summary = DashboardSummary::build(&session("u1", Role::User), &catalogue(), now());

    assert_eq!(ids(&summary.upcoming), vec!["e1"]);
    // e2 already happened, e3 is marked completed
    assert_eq!(ids(&summary.past), vec!["e2", "e3"]);
    assert_eq!(summary.total_revenue, None);
}

#[test]
fn test_host_dashboard_revenue() {
    let summary = DashboardSummary::build(&session("h1", Role::Host), &catalogue(), now());

    // e1: 2 participants, e2: 1 participant, both at 10.0
    assert_eq!(summary.total_revenue, Some(30.0));
    assert_eq!(DashboardSummary::title(Role::Host), "Host Dashboard");
}

#[test]
fn test_filter_by_search_type_and_location() {
    let mut events = catalogue();
    events[1].name = "Tea Garden Walk".to_string();
    events[2].event_type = "Music".to_string();
    events[3].location = "Dhaka".to_string();

    let by_search = filter_events(
        &events,
        &EventFilters {
            search: Some("tea garden".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(ids(&by_search), vec!["e2"]);

    let by_type = filter_events(
        &events,
        &EventFilters {
            event_type: Some("Music".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(ids(&by_type), vec!["e3"]);

    let by_location = filter_events(
        &events,
        &EventFilters {
            location: Some("dhaka".to_string()),
            ..Default::default()
        },
    );
    assert_eq!(ids(&by_location), vec!["e4"]);
}

#[test]
fn test_filter_all_type_and_blank_values_match_everything() {
    let filters = EventFilters {
        search: Some("  ".to_string()),
        event_type: Some("All".to_string()),
        ..Default::default()
    };
    assert_eq!(filter_events(&catalogue(), &filters).len(), 4);
}

#[test]
fn test_filter_date_range_is_inclusive() {
    let filters = EventFilters {
        date_from: Some(Utc.with_ymd_and_hms(2030, 7, 1, 0, 0, 0).unwrap()),
        date_to: Some(Utc.with_ymd_and_hms(2030, 8, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    };
    assert_eq!(ids(&filter_events(&catalogue(), &filters)), vec!["e1", "e3"]);
}

#[test]
fn test_nav_links_for_visitors() {
    let labels: Vec<&str> = nav_links(None).iter().map(|l| l.label).collect();
    assert_eq!(
        labels,
        vec!["Home", "Explore Events", "About", "Contact", "Become a Host"]
    );
}

#[test]
fn test_nav_links_by_role() {
    let host = nav_links(Some(&session("h1", Role::Host)));
    assert!(host.iter().any(|l| l.label == "Create Event"));
    assert_eq!(host.last().unwrap().href, "/profile/h1");

    let user = nav_links(Some(&session("u1", Role::User)));
    assert!(user.iter().all(|l| l.label != "Create Event"));
    assert!(user.iter().any(|l| l.label == "My Events"));

    let admin = nav_links(Some(&session("a1", Role::Admin)));
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].href, "/dashboard");
}
