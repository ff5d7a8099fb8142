//! Authentication operations.

use serde_json::json;

use super::Api;
use crate::errors::ClientError;
use crate::models::LoginResponse;

const LOGIN: &str = r#"
    mutation Login($email: String!, $password: String!) {
        login(email: $email, password: $password) {
            token
            username
            role
            message
        }
    }
"#;

const LOGOUT: &str = r#"
    mutation Logout {
        logout
    }
"#;

const GET_CURRENT_USER: &str = r#"
    query GetCurrentUser {
        getCurrentUser
    }
"#;

const GET_CURRENT_USER_ROLE: &str = r#"
    query GetCurrentUserRole {
        getCurrentUserRole
    }
"#;

impl Api {
    /// Exchange credentials for a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        self.gateway()
            .query(LOGIN, "login", json!({ "email": email, "password": password }))
            .await
    }

    /// Invalidate the session server-side.
    pub async fn logout(&self) -> Result<bool, ClientError> {
        self.gateway().query(LOGOUT, "logout", json!({})).await
    }

    /// Email of the authenticated user, resolved from the bearer token.
    pub async fn current_user(&self) -> Result<Option<String>, ClientError> {
        self.gateway()
            .query(GET_CURRENT_USER, "getCurrentUser", json!({}))
            .await
    }

    /// Role of the authenticated user, resolved from the bearer token.
    pub async fn current_user_role(&self) -> Result<Option<String>, ClientError> {
        self.gateway()
            .query(GET_CURRENT_USER_ROLE, "getCurrentUserRole", json!({}))
            .await
    }
}
