//! Hospital branch administration.

use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{HospitalBranch, HospitalBranchInput};
use crate::notify::Notifier;
use crate::operations::Api;
use crate::session::Session;

use super::require_admin;

/// Editable branch form fields. New drafts start active.
#[derive(Debug, Clone)]
pub struct BranchDraft {
    pub branch_code: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub email: String,
    pub phone_number: String,
    pub is_active: bool,
}

impl Default for BranchDraft {
    fn default() -> Self {
        Self {
            branch_code: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            email: String::new(),
            phone_number: String::new(),
            is_active: true,
        }
    }
}

impl BranchDraft {
    pub fn from_branch(branch: &HospitalBranch) -> Self {
        Self {
            branch_code: branch.branch_code.clone(),
            address: branch.address.clone(),
            city: branch.city.clone(),
            state: branch.state.clone(),
            zip_code: branch.zip_code.clone().unwrap_or_default(),
            email: branch.email.clone().unwrap_or_default(),
            phone_number: branch.phone_number.clone(),
            is_active: branch.is_active,
        }
    }

    /// Validation errors for the required fields, in display order.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let require = |errors: &mut Vec<String>, value: &str, label: &str| {
            if value.trim().is_empty() {
                errors.push(format!("{} is required", label));
            }
        };
        require(&mut errors, &self.branch_code, "Branch code");
        require(&mut errors, &self.address, "Address");
        require(&mut errors, &self.city, "City");
        require(&mut errors, &self.state, "State");
        require(&mut errors, &self.phone_number, "Phone number");
        errors
    }

    fn to_input(&self) -> HospitalBranchInput {
        let optional = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        HospitalBranchInput {
            branch_code: self.branch_code.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: optional(&self.zip_code),
            email: optional(&self.email),
            phone_number: self.phone_number.trim().to_string(),
            is_active: self.is_active,
        }
    }
}

/// The branch management screen.
pub struct BranchAdmin {
    api: Arc<Api>,
    session: Session,
    notifier: Notifier,
    branches: Vec<HospitalBranch>,
    /// Branch id awaiting delete confirmation
    pending_delete: Option<String>,
}

impl BranchAdmin {
    pub fn new(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
            branches: Vec::new(),
            pending_delete: None,
        }
    }

    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.branches = self.api.hospital_branches().await?;
        Ok(())
    }

    pub fn branches(&self) -> &[HospitalBranch] {
        &self.branches
    }

    pub async fn create(&mut self, draft: &BranchDraft) -> Result<HospitalBranch, ClientError> {
        require_admin(&self.session)?;
        if let Some(first) = draft.validation_errors().into_iter().next() {
            return Err(ClientError::Validation(first));
        }

        match self.api.create_hospital_branch(&draft.to_input()).await {
            Ok(branch) => {
                self.notifier.success("Branch created successfully!");
                self.branches.push(branch.clone());
                Ok(branch)
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    pub async fn update(
        &mut self,
        id: &str,
        draft: &BranchDraft,
    ) -> Result<HospitalBranch, ClientError> {
        require_admin(&self.session)?;
        if let Some(first) = draft.validation_errors().into_iter().next() {
            return Err(ClientError::Validation(first));
        }

        match self.api.update_hospital_branch(id, &draft.to_input()).await {
            Ok(branch) => {
                self.notifier.success("Branch updated successfully!");
                if let Some(existing) = self.branches.iter_mut().find(|b| b.id == id) {
                    *existing = branch.clone();
                }
                Ok(branch)
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    /// First step of the two-step branch delete. Warns that the server will
    /// cascade removal of the branch's staff assignments.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.branches.iter().any(|b| b.id == id) {
            self.pending_delete = Some(id.to_string());
            self.notifier
                .warning("Deleting this branch also removes its staff assignments");
        }
        self.pending_delete.is_some()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn delete_confirm_pending(&self) -> bool {
        self.pending_delete.is_some()
    }

    /// Second step: delete the branch requested via [`request_delete`].
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        require_admin(&self.session)?;
        let Some(id) = self.pending_delete.take() else {
            return Err(ClientError::Validation(
                "Deletion has not been confirmed".to_string(),
            ));
        };

        match self.api.delete_hospital_branch(&id).await {
            Ok(_) => {
                self.notifier.success("Branch deleted successfully!");
                self.branches.retain(|b| b.id != id);
                Ok(())
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::gateway::Gateway;
    use crate::models::Role;
    use crate::notify::ToastKind;
    use crate::token::MemoryTokenStore;
    use std::time::Duration;

    fn offline_admin() -> BranchAdmin {
        let cache = Arc::new(QueryCache::new());
        let gateway = Arc::new(Gateway::new(
            "http://127.0.0.1:9/graphql",
            Arc::new(MemoryTokenStore::new()),
            Arc::clone(&cache),
            Arc::new(std::sync::RwLock::new(None)),
        ));
        BranchAdmin::new(
            Arc::new(crate::operations::Api::new(gateway, cache)),
            Session {
                id: "admin1".into(),
                name: "Admin".into(),
                email: "admin@clinic.test".into(),
                role: Role::Admin,
                phone_number: None,
                age: None,
                branch_id: None,
                branch_code: None,
            },
            Notifier::new(Duration::from_secs(60)),
        )
    }

    fn filled_draft() -> BranchDraft {
        BranchDraft {
            branch_code: "NYC01".into(),
            address: "1 Main St".into(),
            city: "New York".into(),
            state: "NY".into(),
            phone_number: "555-0100".into(),
            ..BranchDraft::default()
        }
    }

    #[test]
    fn test_new_drafts_start_active() {
        assert!(BranchDraft::default().is_active);
    }

    #[test]
    fn test_required_fields() {
        let errors = BranchDraft::default().validation_errors();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&"Branch code is required".to_string()));
        assert!(errors.contains(&"Phone number is required".to_string()));

        assert!(filled_draft().validation_errors().is_empty());
    }

    #[test]
    fn test_zip_and_email_optional() {
        let mut draft = filled_draft();
        draft.zip_code = "  ".into();
        draft.email = String::new();
        assert!(draft.validation_errors().is_empty());

        let input = draft.to_input();
        assert!(input.zip_code.is_none());
        assert!(input.email.is_none());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_and_warns_about_cascade() {
        let mut admin = offline_admin();
        admin.branches.push(HospitalBranch {
            id: "b1".into(),
            branch_code: "NYC01".into(),
            address: "1 Main St".into(),
            city: "New York".into(),
            state: "NY".into(),
            zip_code: None,
            email: None,
            phone_number: "555-0100".into(),
            is_active: true,
            started_at: None,
        });

        // no confirmation requested: refused before any network call
        let err = admin.confirm_delete().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        assert!(!admin.request_delete("unknown"));
        assert!(admin.request_delete("b1"));
        assert!(admin
            .notifier
            .active()
            .iter()
            .any(|t| t.kind == ToastKind::Warning
                && t.message.contains("removes its staff assignments")));

        admin.cancel_delete();
        assert!(!admin.delete_confirm_pending());
    }

    #[test]
    fn test_input_trims_whitespace() {
        let mut draft = filled_draft();
        draft.branch_code = "  NYC01  ".into();
        assert_eq!(draft.to_input().branch_code, "NYC01");
    }
}
