//! Build-time configuration with runtime fallbacks.
//!
//! Values come from environment variables captured at compile time
//! (`API_BASE_URL`, `TOKEN_KEY`, `APP_NAME`). When a value is not set the
//! defaults below are used.

/// Backend port used when the base URL is derived from the window location.
pub const DEFAULT_API_PORT: u16 = 5002;

const FALLBACK_API_BASE: &str = "http://localhost:5002";
const DEFAULT_TOKEN_KEY: &str = "token";
const DEFAULT_APP_NAME: &str = "Electronics Store";

/// Path of the users resource, appended to [`api_base`].
pub const USERS_ENDPOINT: &str = "/api/Users";

/// Get the base URL for API requests
///
/// # Returns
/// - `API_BASE_URL` when it was set at build time (trailing `/` removed)
/// - `"{protocol}//{hostname}:5002"` of the current page otherwise
/// - `"http://localhost:5002"` when no window is available
pub fn api_base() -> String {
    if let Some(base) = option_env!("API_BASE_URL").filter(|b| !b.is_empty()) {
        return base.trim_end_matches('/').to_string();
    }

    let window = match web_sys::window() {
        Some(w) => w,
        None => return FALLBACK_API_BASE.to_string(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "localhost".to_string());
    format!("{}//{}:{}", protocol, hostname, DEFAULT_API_PORT)
}

/// localStorage key holding the bearer token.
pub fn token_key() -> &'static str {
    option_env!("TOKEN_KEY")
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_TOKEN_KEY)
}

pub fn app_name() -> &'static str {
    option_env!("APP_NAME")
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_APP_NAME)
}
