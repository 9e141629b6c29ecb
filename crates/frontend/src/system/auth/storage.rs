use web_sys::window;

use crate::shared::config::token_key;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Get bearer token from localStorage
pub fn get_token() -> Option<String> {
    get_local_storage()?
        .get_item(token_key())
        .ok()?
        .filter(|t| !t.is_empty())
}

/// Remove the stored token
pub fn clear_token() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(token_key());
    }
}
