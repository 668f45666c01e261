pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api/v1";

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_verbose() -> bool {
    false
}
