use serde::{Deserialize, Serialize};

/// Access level of a user account.
///
/// The set is fixed on the client; the server stores the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Pos,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Pos];

    pub fn id(self) -> i32 {
        match self {
            Role::Admin => 1,
            Role::Pos => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pos => "pos",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "System administrator",
            Role::Pos => "POS employee",
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }

    /// Case-insensitive lookup by server role name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role_id: i32,
    pub role_name: String,
    pub is_active: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl User {
    /// Full name when present, username otherwise.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Username and password cannot be changed through this payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role_id: i32,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDistribution {
    pub role_name: String,
    pub user_count: i64,
    pub percentage: f64,
}

/// Aggregate counters computed by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersSummary {
    pub total_users: i64,
    pub active_users: i64,
    pub inactive_users: i64,
    pub new_users_this_month: i64,
    pub users_logged_in_today: i64,
    #[serde(default)]
    pub role_distribution: Vec<RoleDistribution>,
}

/// Maps an empty form value to an absent field.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_lookup() {
        assert_eq!(Role::from_id(1), Some(Role::Admin));
        assert_eq!(Role::from_id(2), Some(Role::Pos));
        assert_eq!(Role::from_id(7), None);
        assert_eq!(Role::from_name("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_name("Pos"), Some(Role::Pos));
        assert_eq!(Role::from_name("cashier"), None);
    }

    #[test]
    fn test_create_dto_omits_absent_fields() {
        let dto = CreateUserDto {
            username: "abc_123".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            full_name: non_empty(""),
            phone_number: None,
            role_id: Some(2),
            is_active: Some(true),
            image: None,
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "abc_123",
                "email": "a@b.com",
                "password": "secret1",
                "roleId": 2,
                "isActive": true
            })
        );
    }

    #[test]
    fn test_update_dto_has_no_username_or_password() {
        let dto = UpdateUserDto {
            email: "a@b.com".to_string(),
            full_name: Some("Ali Hassan".to_string()),
            phone_number: None,
            role_id: 1,
            is_active: false,
            image: None,
        };

        let value = serde_json::to_value(&dto).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("username"));
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("phoneNumber"));
        assert_eq!(obj["fullName"], "Ali Hassan");
        assert_eq!(obj["isActive"], false);
    }

    #[test]
    fn test_user_parses_server_payload() {
        let user: User = serde_json::from_value(json!({
            "id": 5,
            "username": "ali99",
            "email": "ali@store.com",
            "fullName": null,
            "roleId": 2,
            "roleName": "pos",
            "isActive": true,
            "createdAt": "2024-01-02T10:00:00"
        }))
        .unwrap();

        assert_eq!(user.id, 5);
        assert_eq!(user.full_name, None);
        assert_eq!(user.last_login_at, None);
        assert!(user.permissions.is_empty());
        assert_eq!(user.display_name(), "ali99");
    }

    #[test]
    fn test_summary_parses_role_distribution() {
        let summary: UsersSummary = serde_json::from_value(json!({
            "totalUsers": 3,
            "activeUsers": 2,
            "inactiveUsers": 1,
            "newUsersThisMonth": 1,
            "usersLoggedInToday": 0,
            "roleDistribution": [
                { "roleName": "admin", "userCount": 1, "percentage": 33.3 },
                { "roleName": "pos", "userCount": 2, "percentage": 66.7 }
            ]
        }))
        .unwrap();

        assert_eq!(summary.total_users, 3);
        assert_eq!(summary.role_distribution.len(), 2);
        assert_eq!(summary.role_distribution[1].role_name, "pos");
    }
}
