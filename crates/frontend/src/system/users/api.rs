use contracts::system::users::{
    ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UsersSummary,
};
use serde::de::DeserializeOwned;

use crate::shared::config::{api_base, USERS_ENDPOINT};
use crate::shared::http::{
    ApiError, ApiRequest, ApiResponse, FetchTransport, HttpTransport, LocalStorageToken, Method,
    TokenSource,
};

/// Client for the `/api/Users` resource.
///
/// Holds nothing but the resource root, the transport and the token source.
/// The token is read again for every request.
#[derive(Debug, Clone)]
pub struct UsersApi<T = FetchTransport, S = LocalStorageToken> {
    root: String,
    transport: T,
    tokens: S,
}

/// Client wired to the browser: configured base URL, `fetch`, localStorage token.
pub fn users_api() -> UsersApi {
    UsersApi::new(&api_base(), FetchTransport, LocalStorageToken)
}

impl<T: HttpTransport, S: TokenSource> UsersApi<T, S> {
    pub fn new(base_url: &str, transport: T, tokens: S) -> Self {
        Self {
            root: format!("{}{}", base_url.trim_end_matches('/'), USERS_ENDPOINT),
            transport,
            tokens,
        }
    }

    /// Fetch all users
    pub async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        self.read("", "fetch users").await
    }

    /// Fetch one user by id
    pub async fn get_user_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.read(&format!("/{}", id), "fetch user").await
    }

    /// Create new user
    pub async fn create_user(&self, dto: &CreateUserDto) -> Result<User, ApiError> {
        let request = self.request(Method::Post, "")?.json(dto)?;
        self.mutate(request, "create user").await?.json()
    }

    /// Update user
    pub async fn update_user(&self, id: i64, dto: &UpdateUserDto) -> Result<User, ApiError> {
        let request = self.request(Method::Put, &format!("/{}", id))?.json(dto)?;
        self.mutate(request, "update user").await?.json()
    }

    /// Delete user
    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::Delete, &format!("/{}", id))?;
        self.mutate(request, "delete user").await.map(|_| ())
    }

    pub async fn activate_user(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::Put, &format!("/{}/activate", id))?;
        self.mutate(request, "activate user").await.map(|_| ())
    }

    pub async fn deactivate_user(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::Put, &format!("/{}/deactivate", id))?;
        self.mutate(request, "deactivate user").await.map(|_| ())
    }

    /// Server-side search by username, name or email
    pub async fn search_users(&self, term: &str) -> Result<Vec<User>, ApiError> {
        let path = format!("/search?searchTerm={}", urlencoding::encode(term));
        self.read(&path, "search users").await
    }

    pub async fn get_users_by_role(&self, role_id: i32) -> Result<Vec<User>, ApiError> {
        self.read(&format!("/role/{}", role_id), "fetch users by role")
            .await
    }

    pub async fn get_active_users(&self) -> Result<Vec<User>, ApiError> {
        self.read("/active", "fetch active users").await
    }

    pub async fn get_inactive_users(&self) -> Result<Vec<User>, ApiError> {
        self.read("/inactive", "fetch inactive users").await
    }

    pub async fn get_users_summary(&self) -> Result<UsersSummary, ApiError> {
        self.read("/summary", "fetch users summary").await
    }

    /// Change password
    pub async fn change_password(&self, id: i64, dto: &ChangePasswordDto) -> Result<(), ApiError> {
        let request = self
            .request(Method::Put, &format!("/{}/change-password", id))?
            .json(dto)?;
        self.mutate(request, "change password").await.map(|_| ())
    }

    /// Reset password to the server default
    pub async fn reset_password(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::Put, &format!("/{}/reset-password", id))?;
        self.mutate(request, "reset password").await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> Result<ApiRequest, ApiError> {
        let token = self
            .tokens
            .token()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NotAuthenticated)?;

        Ok(ApiRequest::new(method, format!("{}{}", self.root, path))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {}", token)))
    }

    async fn read<R: DeserializeOwned>(&self, path: &str, operation: &str) -> Result<R, ApiError> {
        let request = self.request(Method::Get, path)?;
        log::debug!("GET {}", request.url);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            log::warn!("Failed to {}: HTTP {}", operation, response.status);
            return Err(status_error(operation, &response, false));
        }

        response.json()
    }

    async fn mutate(&self, request: ApiRequest, operation: &str) -> Result<ApiResponse, ApiError> {
        log::debug!("{} {}", request.method.as_str(), request.url);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            log::warn!("Failed to {}: HTTP {}", operation, response.status);
            return Err(status_error(operation, &response, true));
        }

        Ok(response)
    }
}

/// Builds the error for a non-2xx response.
///
/// Mutations prefer the server's `message` field; reads always use the
/// generic `Failed to <operation>: <status text>` form.
fn status_error(operation: &str, response: &ApiResponse, read_body: bool) -> ApiError {
    let server_message = if read_body {
        server_message(&response.body)
    } else {
        None
    };

    ApiError::Status {
        status: response.status,
        message: server_message
            .unwrap_or_else(|| format!("Failed to {}: {}", operation, response.status_text)),
    }
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")?
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::StaticToken;
    use crate::shared::http::testing::RecordingTransport;

    const BASE: &str = "http://api.test/";

    fn client(transport: &RecordingTransport) -> UsersApi<&RecordingTransport, StaticToken> {
        UsersApi::new(BASE, transport, StaticToken::new("tok-1"))
    }

    const USER_JSON: &str = r#"{
        "id": 7,
        "username": "abc_123",
        "email": "a@b.com",
        "roleId": 2,
        "roleName": "pos",
        "isActive": true,
        "createdAt": "2024-01-15T14:30:00",
        "permissions": ["sales.read"]
    }"#;

    fn create_dto() -> CreateUserDto {
        CreateUserDto {
            username: "abc_123".to_string(),
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            full_name: None,
            phone_number: Some("+966 50 123".to_string()),
            role_id: Some(2),
            is_active: Some(true),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_sends_single_authorized_post() {
        let transport = RecordingTransport::replying(201, "Created", USER_JSON);
        let dto = create_dto();

        let user = client(&transport).create_user(&dto).await.unwrap();
        assert_eq!(user.id, 7);

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        let request = &sent[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://api.test/api/Users");
        assert_eq!(request.header_value("authorization"), Some("Bearer tok-1"));
        assert_eq!(request.header_value("Content-Type"), Some("application/json"));

        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::to_value(&dto).unwrap());
        assert!(body.get("fullName").is_none());
    }

    #[tokio::test]
    async fn test_mutation_error_uses_server_message() {
        let transport = RecordingTransport::replying(
            400,
            "Bad Request",
            r#"{"message":"Username already exists"}"#,
        );

        let err = client(&transport).create_user(&create_dto()).await.unwrap_err();
        assert_eq!(err.to_string(), "Username already exists");
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_mutation_error_without_message_is_generic() {
        let transport = RecordingTransport::replying(500, "Internal Server Error", "{}");
        let err = client(&transport).delete_user(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete user: Internal Server Error");

        let transport = RecordingTransport::replying(502, "Bad Gateway", "<html>oops</html>");
        let err = client(&transport).activate_user(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to activate user: Bad Gateway");
    }

    #[tokio::test]
    async fn test_read_error_ignores_body() {
        let transport =
            RecordingTransport::replying(404, "Not Found", r#"{"message":"User 9 not found"}"#);

        let err = client(&transport).get_user_by_id(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch user: Not Found");
    }

    #[tokio::test]
    async fn test_search_encodes_term() {
        let transport = RecordingTransport::replying(200, "OK", "[]");

        let users = client(&transport).search_users("ali hassan&co").await.unwrap();
        assert!(users.is_empty());
        assert_eq!(
            transport.sent()[0].url,
            "http://api.test/api/Users/search?searchTerm=ali%20hassan%26co"
        );
    }

    #[tokio::test]
    async fn test_endpoint_paths() {
        let transport = RecordingTransport::default();
        for _ in 0..8 {
            transport.push(204, "No Content", "");
        }
        let api = client(&transport);

        api.deactivate_user(4).await.unwrap();
        api.reset_password(4).await.unwrap();
        api.change_password(4, &ChangePasswordDto::default()).await.unwrap();
        let _ = api.get_users_by_role(2).await;
        let _ = api.get_active_users().await;
        let _ = api.get_inactive_users().await;
        let _ = api.get_users_summary().await;
        let _ = api.update_user(4, &UpdateUserDto {
            email: "a@b.com".to_string(),
            full_name: None,
            phone_number: None,
            role_id: 1,
            is_active: true,
            image: None,
        })
        .await;

        let calls: Vec<(Method, String)> = transport
            .sent()
            .into_iter()
            .map(|r| (r.method, r.url.trim_start_matches("http://api.test/api/Users").to_string()))
            .collect();
        assert_eq!(
            calls,
            vec![
                (Method::Put, "/4/deactivate".to_string()),
                (Method::Put, "/4/reset-password".to_string()),
                (Method::Put, "/4/change-password".to_string()),
                (Method::Get, "/role/2".to_string()),
                (Method::Get, "/active".to_string()),
                (Method::Get, "/inactive".to_string()),
                (Method::Get, "/summary".to_string()),
                (Method::Put, "/4".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_token_sends_nothing() {
        let transport = RecordingTransport::replying(200, "OK", "[]");
        let api = UsersApi::new(BASE, &transport, StaticToken(None));

        let err = api.get_all_users().await.unwrap_err();
        assert_eq!(err, ApiError::NotAuthenticated);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates_unchanged() {
        let transport =
            RecordingTransport::failing(ApiError::Transport("connection refused".to_string()));

        let err = client(&transport).get_all_users().await.unwrap_err();
        assert_eq!(err, ApiError::Transport("connection refused".to_string()));
    }
}
