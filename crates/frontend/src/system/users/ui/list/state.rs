use std::cmp::Ordering;

use contracts::system::users::{Role, User};
use leptos::prelude::*;

use crate::shared::components::pagination_controls::page_count;
use crate::shared::http::{ApiError, HttpTransport, TokenSource};
use crate::shared::list_utils::{cmp_text_opt, sort_list, Sortable};
use crate::system::users::api::UsersApi;

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 50];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Active, StatusFilter::Inactive];

    pub fn key(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All statuses",
            StatusFilter::Active => "Active",
            StatusFilter::Inactive => "Inactive",
        }
    }

    pub fn from_key(key: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .unwrap_or_default()
    }

    pub fn matches(self, user: &User) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => user.is_active,
            StatusFilter::Inactive => !user.is_active,
        }
    }
}

/// Which endpoint produces the list, derived from the current filters.
#[derive(Debug, Clone, PartialEq)]
pub enum UsersQuery {
    All,
    Search(String),
    ByRole(Role),
    Status(bool),
}

impl UsersQuery {
    /// Search wins over role, role over status.
    pub fn from_filters(search: &str, role: Option<Role>, status: StatusFilter) -> Self {
        let term = search.trim();
        if !term.is_empty() {
            return UsersQuery::Search(term.to_string());
        }
        if let Some(role) = role {
            return UsersQuery::ByRole(role);
        }
        match status {
            StatusFilter::All => UsersQuery::All,
            StatusFilter::Active => UsersQuery::Status(true),
            StatusFilter::Inactive => UsersQuery::Status(false),
        }
    }

    pub async fn fetch<T: HttpTransport, S: TokenSource>(
        &self,
        api: &UsersApi<T, S>,
    ) -> Result<Vec<User>, ApiError> {
        match self {
            UsersQuery::All => api.get_all_users().await,
            UsersQuery::Search(term) => api.search_users(term).await,
            UsersQuery::ByRole(role) => api.get_users_by_role(role.id()).await,
            UsersQuery::Status(true) => api.get_active_users().await,
            UsersQuery::Status(false) => api.get_inactive_users().await,
        }
    }
}

impl Sortable for User {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "full_name" => cmp_text_opt(self.full_name.as_deref(), other.full_name.as_deref()),
            "email" => self.email.to_lowercase().cmp(&other.email.to_lowercase()),
            "role" => self.role_id.cmp(&other.role_id),
            "is_active" => self.is_active.cmp(&other.is_active),
            "created_at" => self.created_at.cmp(&other.created_at),
            "last_login_at" => {
                cmp_text_opt(self.last_login_at.as_deref(), other.last_login_at.as_deref())
            }
            _ => self.username.to_lowercase().cmp(&other.username.to_lowercase()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UsersListState {
    /// Current page only.
    pub items: Vec<User>,
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub role_filter: Option<Role>,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub is_loaded: bool,
}

impl Default for UsersListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            search_query: String::new(),
            status_filter: StatusFilter::All,
            role_filter: None,
            sort_field: "username".to_string(),
            sort_ascending: true,
            page: 0,
            page_size: 10,
            total_count: 0,
            total_pages: 1,
            is_loaded: false,
        }
    }
}

impl UsersListState {
    pub fn query(&self) -> UsersQuery {
        UsersQuery::from_filters(&self.search_query, self.role_filter, self.status_filter)
    }

    /// Filters the fetched list down to what the endpoint could not express.
    ///
    /// A search result is still narrowed by role and status; a role result
    /// is still narrowed by status.
    pub fn matches(&self, user: &User) -> bool {
        let role_ok = self
            .role_filter
            .map_or(true, |role| user.role_id == role.id());
        role_ok && self.status_filter.matches(user)
    }

    /// Recomputes the visible page from the full fetched list.
    pub fn rebuild(&mut self, all: &[User]) {
        let mut data: Vec<User> = all.iter().filter(|u| self.matches(u)).cloned().collect();
        sort_list(&mut data, &self.sort_field, self.sort_ascending);

        self.total_count = data.len();
        self.total_pages = page_count(self.total_count, self.page_size);
        if self.page >= self.total_pages {
            self.page = self.total_pages - 1;
        }

        let start = self.page * self.page_size;
        let end = (start + self.page_size).min(data.len());
        self.items = data.get(start..end).unwrap_or(&[]).to_vec();
    }

    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field == field {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_field = field.to_string();
            self.sort_ascending = true;
        }
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    pub fn reset_filters(&mut self) {
        self.search_query.clear();
        self.status_filter = StatusFilter::All;
        self.role_filter = None;
        self.page = 0;
    }
}

pub fn create_state() -> RwSignal<UsersListState> {
    RwSignal::new(UsersListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::testing::RecordingTransport;
    use crate::shared::http::StaticToken;

    fn user(id: i64, username: &str, role: Role, is_active: bool) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{}@store.com", username),
            full_name: None,
            phone_number: None,
            role_id: role.id(),
            role_name: role.name().to_string(),
            is_active,
            created_at: format!("2024-01-{:02}T10:00:00", id),
            last_login_at: None,
            image: None,
            permissions: vec![],
        }
    }

    fn sample() -> Vec<User> {
        vec![
            user(1, "zaid", Role::Admin, true),
            user(2, "amal", Role::Pos, true),
            user(3, "Basma", Role::Pos, false),
            user(4, "omar", Role::Admin, false),
            user(5, "huda", Role::Pos, true),
        ]
    }

    fn usernames(state: &UsersListState) -> Vec<&str> {
        state.items.iter().map(|u| u.username.as_str()).collect()
    }

    #[test]
    fn test_query_precedence() {
        assert_eq!(
            UsersQuery::from_filters("  ali ", Some(Role::Pos), StatusFilter::Active),
            UsersQuery::Search("ali".to_string())
        );
        assert_eq!(
            UsersQuery::from_filters("", Some(Role::Pos), StatusFilter::Active),
            UsersQuery::ByRole(Role::Pos)
        );
        assert_eq!(
            UsersQuery::from_filters(" ", None, StatusFilter::Inactive),
            UsersQuery::Status(false)
        );
        assert_eq!(UsersQuery::from_filters("", None, StatusFilter::All), UsersQuery::All);
    }

    #[tokio::test]
    async fn test_query_fetch_hits_expected_endpoint() {
        let transport = RecordingTransport::default();
        for _ in 0..3 {
            transport.push(200, "OK", "[]");
        }
        let api = UsersApi::new("http://api.test", &transport, StaticToken::new("t"));

        UsersQuery::ByRole(Role::Pos).fetch(&api).await.unwrap();
        UsersQuery::Status(true).fetch(&api).await.unwrap();
        UsersQuery::Search("a b".to_string()).fetch(&api).await.unwrap();

        let urls: Vec<String> = transport.sent().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://api.test/api/Users/role/2",
                "http://api.test/api/Users/active",
                "http://api.test/api/Users/search?searchTerm=a%20b",
            ]
        );
    }

    #[test]
    fn test_rebuild_sorts_case_insensitively() {
        let mut state = UsersListState::default();
        state.rebuild(&sample());
        assert_eq!(usernames(&state), vec!["amal", "Basma", "huda", "omar", "zaid"]);

        state.toggle_sort("username");
        state.rebuild(&sample());
        assert_eq!(usernames(&state)[0], "zaid");

        state.toggle_sort("created_at");
        assert!(state.sort_ascending);
        state.rebuild(&sample());
        assert_eq!(usernames(&state)[0], "zaid");
    }

    #[test]
    fn test_rebuild_applies_role_and_status_locally() {
        let mut state = UsersListState {
            role_filter: Some(Role::Pos),
            status_filter: StatusFilter::Active,
            ..Default::default()
        };
        state.rebuild(&sample());
        assert_eq!(usernames(&state), vec!["amal", "huda"]);
        assert_eq!(state.total_count, 2);
    }

    #[test]
    fn test_rebuild_paginates_and_clamps_page() {
        let mut state = UsersListState::default();
        state.set_page_size(2);
        state.page = 2;
        state.rebuild(&sample());
        assert_eq!(state.total_pages, 3);
        assert_eq!(usernames(&state), vec!["zaid"]);

        state.status_filter = StatusFilter::Inactive;
        state.rebuild(&sample());
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.page, 0);
        assert_eq!(usernames(&state), vec!["Basma", "omar"]);
    }

    #[test]
    fn test_reset_filters() {
        let mut state = UsersListState {
            search_query: "x".to_string(),
            status_filter: StatusFilter::Inactive,
            role_filter: Some(Role::Admin),
            page: 3,
            ..Default::default()
        };
        state.reset_filters();
        assert_eq!(state.query(), UsersQuery::All);
        assert_eq!(state.page, 0);
    }

    #[test]
    fn test_status_filter_keys() {
        assert_eq!(StatusFilter::from_key("inactive"), StatusFilter::Inactive);
        assert_eq!(StatusFilter::from_key("bogus"), StatusFilter::All);
    }
}
