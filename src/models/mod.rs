mod event;
mod forms;
mod review;
mod session;
mod user;

pub use event::{Event, EventFilters, EventStatus};
pub use forms::{EventForm, ImageUpload, LoginForm, ProfileForm, RegisterForm, ReviewForm};
pub use review::{EventRef, Review};
pub use session::{Role, Session};
pub use user::{RoleRequest, RoleRequestAction, User, UserRef, UserSummary};
