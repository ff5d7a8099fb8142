//! User administration: signup, update, and deletion of accounts.

use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{
    DoctorSignupInput, DoctorUpdateInput, PatientSignupInput, Role, SignupResponse, User,
};
use crate::notify::Notifier;
use crate::operations::Api;
use crate::session::Session;

use super::require_admin;

/// The user management screen.
pub struct UserAdmin {
    api: Arc<Api>,
    session: Session,
    notifier: Notifier,
    doctors: Vec<User>,
    patients: Vec<User>,
    search: String,
    role_filter: Option<Role>,
}

impl UserAdmin {
    pub fn new(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
            doctors: Vec::new(),
            patients: Vec::new(),
            search: String::new(),
            role_filter: None,
        }
    }

    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.doctors = self.api.doctors().await?;
        self.patients = self.api.patients().await?;
        Ok(())
    }

    pub fn doctors(&self) -> &[User] {
        &self.doctors
    }

    pub fn patients(&self) -> &[User] {
        &self.patients
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.trim().to_string();
    }

    pub fn set_role_filter(&mut self, role: Option<Role>) {
        self.role_filter = role;
    }

    /// The combined account table after search and role filtering.
    ///
    /// Search matches name or email, case-insensitively.
    pub fn filtered(&self) -> Vec<&User> {
        let needle = self.search.to_lowercase();
        self.doctors
            .iter()
            .chain(&self.patients)
            .filter(|u| self.role_filter.is_none_or(|r| u.role == r))
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Whether an account may be deleted at all. Admin accounts are
    /// permanent; the deployment must never lose its last administrator.
    pub fn is_deletable(user: &User) -> bool {
        user.role != Role::Admin
    }

    pub async fn signup_doctor(
        &mut self,
        input: &DoctorSignupInput,
    ) -> Result<SignupResponse, ClientError> {
        require_admin(&self.session)?;
        validate_signup(&input.name, &input.email, &input.password)?;

        match self.api.signup_doctor(input).await {
            Ok(response) if response.success => {
                self.notifier.success("Doctor account created successfully!");
                self.doctors = self.api.doctors().await?;
                Ok(response)
            }
            Ok(response) => {
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Signup failed".to_string());
                self.notifier.error(&message);
                Err(ClientError::Validation(message))
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    pub async fn signup_patient(
        &mut self,
        input: &PatientSignupInput,
    ) -> Result<SignupResponse, ClientError> {
        require_admin(&self.session)?;
        validate_signup(&input.name, &input.email, &input.password)?;

        match self.api.signup_patient(input).await {
            Ok(response) if response.success => {
                self.notifier.success("Patient account created successfully!");
                self.patients = self.api.patients().await?;
                Ok(response)
            }
            Ok(response) => {
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Signup failed".to_string());
                self.notifier.error(&message);
                Err(ClientError::Validation(message))
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    pub async fn update_doctor(
        &mut self,
        id: &str,
        input: &DoctorUpdateInput,
    ) -> Result<User, ClientError> {
        require_admin(&self.session)?;

        match self.api.update_doctor(id, input).await {
            Ok(user) => {
                self.notifier.success("Account updated successfully!");
                if let Some(existing) = self.doctors.iter_mut().find(|u| u.id == id) {
                    *existing = user.clone();
                }
                Ok(user)
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    pub async fn delete_doctor(&mut self, id: &str) -> Result<(), ClientError> {
        require_admin(&self.session)?;
        if let Some(user) = self.doctors.iter().find(|u| u.id == id) {
            if !Self::is_deletable(user) {
                let message = "Admin accounts cannot be deleted";
                self.notifier.error(message);
                return Err(ClientError::Validation(message.to_string()));
            }
        }

        match self.api.delete_doctor(id).await {
            Ok(_) => {
                self.notifier.success("Account deleted successfully!");
                self.doctors.retain(|u| u.id != id);
                Ok(())
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    pub async fn delete_patient(&mut self, id: &str) -> Result<(), ClientError> {
        require_admin(&self.session)?;

        match self.api.delete_patient(id).await {
            Ok(_) => {
                self.notifier.success("Account deleted successfully!");
                self.patients.retain(|u| u.id != id);
                Ok(())
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }
}

fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), ClientError> {
    if name.trim().is_empty() {
        return Err(ClientError::Validation("Name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ClientError::Validation(
            "Please enter a valid email".to_string(),
        ));
    }
    if password.len() < 6 {
        return Err(ClientError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::gateway::Gateway;
    use crate::token::MemoryTokenStore;
    use std::time::Duration;

    fn offline_api() -> Arc<Api> {
        let cache = Arc::new(QueryCache::new());
        let gateway = Arc::new(Gateway::new(
            "http://127.0.0.1:9/graphql",
            Arc::new(MemoryTokenStore::new()),
            Arc::clone(&cache),
            Arc::new(std::sync::RwLock::new(None)),
        ));
        Arc::new(Api::new(gateway, cache))
    }

    fn session(role: Role) -> Session {
        Session {
            id: "admin1".into(),
            name: "Admin".into(),
            email: "admin@clinic.test".into(),
            role,
            phone_number: None,
            age: None,
            branch_id: None,
            branch_code: None,
        }
    }

    fn user(id: &str, role: Role) -> User {
        User {
            id: id.into(),
            name: "Someone".into(),
            email: format!("{}@clinic.test", id),
            role,
            phone_number: None,
            age: None,
            is_active: Some(true),
            start_date: None,
            created_at: None,
        }
    }

    #[test]
    fn test_admin_accounts_not_deletable() {
        assert!(!UserAdmin::is_deletable(&user("a1", Role::Admin)));
        assert!(UserAdmin::is_deletable(&user("d1", Role::Doctor)));
        assert!(UserAdmin::is_deletable(&user("r1", Role::Receptionist)));
    }

    #[tokio::test]
    async fn test_delete_admin_rejected_without_network() {
        let mut screen = UserAdmin::new(
            offline_api(),
            session(Role::Admin),
            Notifier::new(Duration::from_secs(60)),
        );
        screen.doctors.push(user("a1", Role::Admin));

        let err = screen.delete_doctor("a1").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        // the account must still be listed
        assert_eq!(screen.doctors.len(), 1);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_manage_users() {
        let mut screen = UserAdmin::new(
            offline_api(),
            session(Role::Doctor),
            Notifier::new(Duration::from_secs(60)),
        );
        let err = screen.delete_patient("p1").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }

    #[test]
    fn test_search_and_role_filter() {
        let mut screen = UserAdmin::new(
            offline_api(),
            session(Role::Admin),
            Notifier::new(Duration::from_secs(60)),
        );
        screen.doctors = vec![user("d1", Role::Doctor), user("r1", Role::Receptionist)];
        screen.patients = vec![user("p1", Role::Patient)];

        assert_eq!(screen.filtered().len(), 3);

        screen.set_role_filter(Some(Role::Doctor));
        assert_eq!(screen.filtered().len(), 1);
        assert_eq!(screen.filtered()[0].id, "d1");

        screen.set_role_filter(None);
        screen.set_search("P1@CLINIC");
        assert_eq!(screen.filtered().len(), 1);
        assert_eq!(screen.filtered()[0].id, "p1");

        screen.set_search("nobody");
        assert!(screen.filtered().is_empty());
    }

    #[test]
    fn test_signup_validation() {
        assert!(validate_signup("", "a@b.com", "secret1").is_err());
        assert!(validate_signup("Name", "not-an-email", "secret1").is_err());
        assert!(validate_signup("Name", "a@b.com", "short").is_err());
        assert!(validate_signup("Name", "a@b.com", "secret1").is_ok());
    }
}
