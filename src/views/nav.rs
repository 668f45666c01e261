use crate::models::{Role, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
}

fn link(label: &'static str, href: impl Into<String>) -> NavLink {
    NavLink {
        label,
        href: href.into(),
    }
}

/// Menu entries for the current visitor.
pub fn nav_links(session: Option<&Session>) -> Vec<NavLink> {
    let Some(session) = session else {
        return vec![
            link("Home", "/"),
            link("Explore Events", "/event"),
            link("About", "/about"),
            link("Contact", "/contact"),
            link("Become a Host", "/becomeHost"),
        ];
    };

    let profile = format!("/profile/{}", session.user_id);
    match session.role {
        Role::User => vec![
            link("Home", "/"),
            link("Explore Events", "/event"),
            link("My Events", "/dashboard"),
            link("Profile", profile),
        ],
        Role::Host => vec![
            link("Home", "/"),
            link("Explore Events", "/event"),
            link("My Events (Hosted)", "/dashboard"),
            link("Create Event", "/event/createEvent"),
            link("Profile", profile),
        ],
        Role::Admin => vec![link("Admin Dashboard", "/dashboard")],
    }
}
