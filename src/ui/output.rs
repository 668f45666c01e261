use crate::gate::GateDecision;
use crate::models::{Event, Review, Role, RoleRequest, Session, User};
use crate::views::{DashboardSummary, NavLink};
use colored::*;

const RULE: &str = "──────────────────────────────────────────────────────────";

pub fn display_success(message: &str) {
    println!("{}", message.green());
}

/// Display the signed-in identity, or say nobody is
pub fn display_session(session: Option<&Session>) {
    match session {
        Some(session) => {
            println!("{} {}", "Signed in as".dimmed(), session.email.bold());
            println!("  {} {}", "id:".dimmed(), session.user_id);
            println!("  {} {}", "role:".dimmed(), role_label(session.role));
        }
        None => println!("{}", "Not signed in.".yellow()),
    }
}

fn role_label(role: Role) -> ColoredString {
    match role {
        Role::Admin => role.as_str().red().bold(),
        Role::Host => role.as_str().magenta().bold(),
        Role::User => role.as_str().cyan(),
    }
}

fn event_line(event: &Event) -> String {
    format!(
        "{} {} {} {}",
        event.date.format("%b %d, %Y").to_string().dimmed(),
        event.name.bold(),
        format!("[{}]", event.event_type).cyan(),
        format!("@ {}", event.location).dimmed()
    )
}

pub fn display_events(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No events found.".yellow());
        return;
    }

    let noun = if events.len() == 1 { "event" } else { "events" };
    println!("{}", format!("Found {} {}", events.len(), noun).dimmed());
    for event in events {
        println!("{}", event_line(event));
        println!("    {}", event.id.dimmed());
    }
}

pub fn display_event(event: &Event) {
    println!("{}", event.name.bold());
    println!("{}", RULE.dimmed());
    println!("{} {}", "Type:".dimmed(), event.event_type);
    println!(
        "{} {} {}",
        "When:".dimmed(),
        event.date.format("%A, %B %d, %Y"),
        event.time
    );
    println!("{} {}", "Where:".dimmed(), event.location);
    println!("{} {:?}", "Status:".dimmed(), event.status);
    println!(
        "{} {}/{} (min {})",
        "Participants:".dimmed(),
        event.participants.len(),
        event.max_participants,
        event.min_participants
    );
    println!("{} ${:.2}", "Fee:".dimmed(), event.joining_fee);
    if let Some(host) = &event.host {
        println!("{} {}", "Host:".dimmed(), host.name().unwrap_or(host.id()));
    }
    if !event.description.is_empty() {
        println!();
        println!("{}", event.description);
    }
}

pub fn display_users(users: &[User]) {
    if users.is_empty() {
        println!("{}", "No users found.".yellow());
        return;
    }
    for user in users {
        println!(
            "{} {} {} {}",
            user.name.bold(),
            format!("<{}>", user.email).dimmed(),
            role_label(user.role),
            user.id.dimmed()
        );
    }
}

pub fn display_user(user: &User) {
    println!("{} {}", user.name.bold(), role_label(user.role));
    println!("  {} {}", "email:".dimmed(), user.email);
    if let Some(location) = &user.location {
        println!("  {} {}", "location:".dimmed(), location);
    }
    if let Some(bio) = &user.bio {
        println!("  {} {}", "bio:".dimmed(), bio);
    }
    if !user.interests.is_empty() {
        println!("  {} {}", "interests:".dimmed(), user.interests.join(", "));
    }
}

pub fn display_role_requests(requests: &[RoleRequest]) {
    if requests.is_empty() {
        println!("{}", "No pending host requests.".yellow());
        return;
    }
    for request in requests {
        let status = request.status.as_deref().unwrap_or("pending");
        println!(
            "{} {} {}",
            request.id.bold(),
            format!("user {}", request.user.id()).dimmed(),
            status
        );
    }
}

pub fn display_reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("{}", "No reviews yet.".yellow());
        return;
    }
    for review in reviews {
        let stars = "★".repeat(usize::from(review.rating.min(5)));
        let author = review.user.name().unwrap_or(review.user.id());
        println!("{} {}", stars.yellow(), format!("by {}", author).dimmed());
        if let Some(comment) = &review.comment {
            println!("    {}", comment);
        }
    }
}

pub fn display_dashboard(session: &Session, summary: &DashboardSummary) {
    println!("{}", DashboardSummary::title(session.role).bold());
    println!("{}", format!("Welcome back, {}!", session.email).dimmed());
    println!("{}", RULE.dimmed());
    println!("{} {}", "Upcoming events:".dimmed(), summary.upcoming.len());
    println!("{} {}", "Past events:".dimmed(), summary.past.len());
    if let Some(revenue) = summary.total_revenue {
        println!("{} {}", "Total revenue:".dimmed(), format!("${:.2}", revenue).green());
    }

    println!();
    println!("{}", "Upcoming".bold());
    if summary.upcoming.is_empty() {
        println!("  {}", "No upcoming events".dimmed());
    }
    for event in &summary.upcoming {
        println!("  {}", event_line(event));
    }

    println!();
    println!("{}", "Past".bold());
    if summary.past.is_empty() {
        println!("  {}", "No past events".dimmed());
    }
    for event in &summary.past {
        println!("  {}", event_line(event));
    }
}

pub fn display_nav(links: &[NavLink]) {
    for link in links {
        println!("{} {}", link.label.bold(), link.href.dimmed());
    }
}

pub fn display_gate(path: &str, decision: &GateDecision) {
    match decision {
        GateDecision::Allow => println!("{} {}", path, "allow".green()),
        GateDecision::Redirect(target) => {
            println!("{} {} {}", path, "redirect ->".yellow(), target)
        }
    }
}
