mod filesystem;
mod storage;
mod store;

pub use filesystem::FilesystemCredentialStore;
pub use storage::{CredentialStore, StoredCredentials};
pub use store::{mount_or_reload, IdentitySource, SessionStore, SessionView};
