//! Pure, role-aware projections of backend data.

mod dashboard;
mod filters;
mod nav;

pub use dashboard::{view_for, DashboardSummary};
pub use filters::filter_events;
pub use nav::{nav_links, NavLink};
