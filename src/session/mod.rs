//! Session store: the authenticated identity and its lifecycle.
//!
//! The session is owned here and read everywhere else through an explicit
//! handle; there is no ambient global. Login persists the token and derives
//! capability flags once; logout is unconditional locally even when the
//! server call fails.

use std::sync::{Arc, RwLock};

use crate::cache::QueryCache;
use crate::errors::ClientError;
use crate::models::{Capabilities, Credentials, Role, User};
use crate::notify::Notifier;
use crate::operations::Api;
use crate::token::TokenStore;

/// The authenticated identity active in this application instance.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub age: Option<i32>,
    /// Receptionists are pinned to one branch at login
    pub branch_id: Option<String>,
    pub branch_code: Option<String>,
}

impl Session {
    pub fn capabilities(&self) -> Capabilities {
        self.role.capabilities()
    }
}

/// Shared, synchronously readable slot for the active session.
///
/// The gateway clears it on an observed 401; everything else only reads.
pub type SessionHandle = Arc<RwLock<Option<Session>>>;

/// Owns the session lifecycle: login, restore-on-load, logout.
pub struct SessionStore {
    api: Arc<Api>,
    tokens: Arc<dyn TokenStore>,
    cache: Arc<QueryCache>,
    notifier: Notifier,
    handle: SessionHandle,
}

impl SessionStore {
    pub fn new(
        api: Arc<Api>,
        tokens: Arc<dyn TokenStore>,
        cache: Arc<QueryCache>,
        notifier: Notifier,
        handle: SessionHandle,
    ) -> Self {
        Self {
            api,
            tokens,
            cache,
            notifier,
            handle,
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On any failure the token is not persisted and no session is created.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        validate_credentials(credentials)?;

        let response = self
            .api
            .login(&credentials.email, &credentials.password)
            .await?;

        let token = match response.token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                let message = response
                    .message
                    .unwrap_or_else(|| "No token received".to_string());
                return Err(ClientError::Unauthorized(message));
            }
        };

        self.tokens.store(&token);
        self.cache.clear();

        let email = response.username.unwrap_or_else(|| credentials.email.clone());
        let session = match self.fetch_user_details(&email).await {
            Ok(session) => session,
            Err(err) => {
                // Half-open sessions are worse than no session
                self.tokens.clear();
                return Err(err);
            }
        };

        *self.handle.write().unwrap() = Some(session.clone());
        self.notifier.success("Login successful!");
        tracing::info!(user = %session.email, role = %session.role, "Logged in");
        Ok(session)
    }

    /// Rebuild the session from a previously persisted token, if any.
    pub async fn restore(&self) -> Result<Option<Session>, ClientError> {
        if self.tokens.load().is_none() {
            return Ok(None);
        }

        let email = match self.api.current_user().await {
            Ok(Some(email)) => email,
            Ok(None) => {
                self.clear_local();
                return Ok(None);
            }
            Err(err) => {
                tracing::warn!("Session restore failed: {}", err);
                self.clear_local();
                return Ok(None);
            }
        };

        match self.fetch_user_details(&email).await {
            Ok(session) => {
                *self.handle.write().unwrap() = Some(session.clone());
                Ok(Some(session))
            }
            Err(err) => {
                tracing::warn!("Session restore failed: {}", err);
                self.clear_local();
                Ok(None)
            }
        }
    }

    /// End the session. Local teardown is unconditional: the server call is
    /// best-effort and its failure does not keep the user logged in.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!("Server logout failed, clearing locally anyway: {}", err);
        }
        self.clear_local();
    }

    /// Synchronous read of the active session.
    pub fn current(&self) -> Option<Session> {
        self.handle.read().unwrap().clone()
    }

    /// Capability flags of the active session, if any.
    pub fn capabilities(&self) -> Option<Capabilities> {
        self.current().map(|s| s.capabilities())
    }

    pub fn handle(&self) -> SessionHandle {
        Arc::clone(&self.handle)
    }

    fn clear_local(&self) {
        self.tokens.clear();
        self.cache.clear();
        *self.handle.write().unwrap() = None;
    }

    /// Resolve the authenticated email to a full account and derive the
    /// session, enriching receptionists with their branch assignment.
    async fn fetch_user_details(&self, email: &str) -> Result<Session, ClientError> {
        let doctors = self.api.doctors().await?;
        let patients = self.api.patients().await?;

        let account: Option<User> = doctors
            .into_iter()
            .chain(patients)
            .find(|u| u.email.eq_ignore_ascii_case(email));

        let Some(account) = account else {
            return Err(ClientError::Unauthorized(format!(
                "No account found for {}",
                email
            )));
        };

        let mut session = Session {
            id: account.id.clone(),
            name: account.name,
            email: account.email,
            role: account.role,
            phone_number: account.phone_number,
            age: account.age,
            branch_id: None,
            branch_code: None,
        };

        if session.role == Role::Receptionist {
            match self.api.doctor_branches(&account.id).await {
                Ok(mappings) => {
                    if let Some(mapping) = mappings.into_iter().next() {
                        session.branch_id = Some(mapping.branch_id);
                        session.branch_code = Some(mapping.branch_code);
                    }
                }
                Err(err) => {
                    // A receptionist without a resolved branch still gets a
                    // session; views fall back to the requester-scoped query.
                    tracing::warn!("Failed to resolve receptionist branch: {}", err);
                }
            }
        }

        Ok(session)
    }
}

/// Client-side credential checks run before the login mutation is attempted.
fn validate_credentials(credentials: &Credentials) -> Result<(), ClientError> {
    let email = credentials.email.trim();
    if email.is_empty() {
        return Err(ClientError::Validation("Email is required".to_string()));
    }

    let looks_like_email = email
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        })
        .unwrap_or(false);
    if !looks_like_email {
        return Err(ClientError::Validation(
            "Please enter a valid email".to_string(),
        ));
    }

    if credentials.password.trim().is_empty() {
        return Err(ClientError::Validation("Password is required".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_credentials_require_email_shape() {
        assert!(validate_credentials(&creds("", "pw")).is_err());
        assert!(validate_credentials(&creds("not-an-email", "pw")).is_err());
        assert!(validate_credentials(&creds("a@b", "pw")).is_err());
        assert!(validate_credentials(&creds("a@b.com", "pw")).is_ok());
    }

    #[test]
    fn test_credentials_require_password() {
        assert!(validate_credentials(&creds("a@b.com", "")).is_err());
        assert!(validate_credentials(&creds("a@b.com", "   ")).is_err());
    }
}
