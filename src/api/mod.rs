pub mod auth;
pub mod client;
pub mod events;
pub mod request;
pub mod response;
pub mod reviews;
pub mod transport;
pub mod users;

pub use client::{ApiClient, Navigator, NoopNavigator, LOGIN_ROUTE, REFRESH_PATH};
pub use request::{ApiRequest, FormData, FormPart, RequestBody};
pub use transport::{HttpTransport, Transport};
