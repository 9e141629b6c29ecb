//! Client-side field rules for the user form.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::hash::Hash;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid pattern"));
static ARABIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{0600}-\x{06FF}]").expect("valid pattern"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid pattern"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+\-\s()]+$").expect("valid pattern"));

pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;

pub const USERNAME_REQUIRED: &str = "Username is required";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const USERNAME_ARABIC: &str = "Username must be in English only (Arabic letters are not allowed)";
pub const USERNAME_CHARS: &str =
    "Username may only contain English letters, digits and _ (no special characters or spaces)";
/// Shorter variant shown while typing.
pub const USERNAME_CHARS_LIVE: &str = "Username may only contain English letters, digits and _";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Email address is invalid";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const PHONE_INVALID: &str = "Phone number is invalid";

/// Per-field messages. An empty map means the form is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Eq + Hash> {
    errors: HashMap<F, String>,
}

impl<F: Eq + Hash> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: HashMap::new(),
        }
    }
}

impl<F: Eq + Hash + Copy> FieldErrors<F> {
    pub fn set(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

fn has_arabic(value: &str) -> bool {
    ARABIC_RE.is_match(value)
}

/// Full username check run on submit.
pub fn check_username(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(USERNAME_REQUIRED)
    } else if value.chars().count() < USERNAME_MIN_LEN {
        Some(USERNAME_TOO_SHORT)
    } else if !USERNAME_RE.is_match(value) {
        if has_arabic(value) {
            Some(USERNAME_ARABIC)
        } else {
            Some(USERNAME_CHARS)
        }
    } else {
        None
    }
}

/// Keystroke check: only flags disallowed characters, never length.
pub fn check_username_live(value: &str) -> Option<&'static str> {
    if value.is_empty() || USERNAME_RE.is_match(value) {
        None
    } else if has_arabic(value) {
        Some(USERNAME_ARABIC)
    } else {
        Some(USERNAME_CHARS_LIVE)
    }
}

pub fn check_email(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !EMAIL_RE.is_match(value) {
        Some(EMAIL_INVALID)
    } else {
        None
    }
}

pub fn check_password(value: &str) -> Option<&'static str> {
    if value.trim().is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if value.chars().count() < PASSWORD_MIN_LEN {
        Some(PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

/// Phone is optional; only a non-empty value is checked.
pub fn check_phone(value: &str) -> Option<&'static str> {
    if !value.is_empty() && !PHONE_RE.is_match(value) {
        Some(PHONE_INVALID)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert_eq!(check_username(""), Some(USERNAME_REQUIRED));
        assert_eq!(check_username("   "), Some(USERNAME_REQUIRED));
        assert_eq!(check_username("ab"), Some(USERNAME_TOO_SHORT));
        assert_eq!(check_username("abc_123"), None);
        assert_eq!(check_username("مدير"), Some(USERNAME_ARABIC));
        assert_eq!(check_username("ab!"), Some(USERNAME_CHARS));
        assert_eq!(check_username("john doe"), Some(USERNAME_CHARS));
    }

    #[test]
    fn test_username_live_rules() {
        assert_eq!(check_username_live(""), None);
        assert_eq!(check_username_live("a"), None);
        assert_eq!(check_username_live("a-"), Some(USERNAME_CHARS_LIVE));
        assert_eq!(check_username_live("aم"), Some(USERNAME_ARABIC));
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(check_email("a@b.com"), None);
        assert_eq!(check_email("a@b"), Some(EMAIL_INVALID));
        assert_eq!(check_email("a b@c.com"), Some(EMAIL_INVALID));
        assert_eq!(check_email(""), Some(EMAIL_REQUIRED));
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(check_password(""), Some(PASSWORD_REQUIRED));
        assert_eq!(check_password("12345"), Some(PASSWORD_TOO_SHORT));
        assert_eq!(check_password("123456"), None);
    }

    #[test]
    fn test_phone_rules() {
        assert_eq!(check_phone(""), None);
        assert_eq!(check_phone("+966 (50) 123-4567"), None);
        assert_eq!(check_phone("call me"), Some(PHONE_INVALID));
    }

    #[test]
    fn test_field_errors() {
        let mut errors: FieldErrors<u8> = FieldErrors::default();
        assert!(errors.is_empty());
        errors.set(1, "bad");
        assert_eq!(errors.get(1), Some("bad"));
        assert_eq!(errors.len(), 1);
        errors.clear(1);
        assert!(errors.is_empty());
    }
}
