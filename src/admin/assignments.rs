//! Staff/branch assignment administration.

use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{DoctorBranchMapping, DoctorBranchMappingInput, HospitalBranch, Role, User};
use crate::notify::Notifier;
use crate::operations::Api;
use crate::session::Session;

use super::require_admin;

/// The assignment screen: which staff member works at which branch.
pub struct AssignmentAdmin {
    api: Arc<Api>,
    session: Session,
    notifier: Notifier,
    mappings: Vec<DoctorBranchMapping>,
    staff: Vec<User>,
    branches: Vec<HospitalBranch>,
}

impl AssignmentAdmin {
    pub fn new(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
            mappings: Vec::new(),
            staff: Vec::new(),
            branches: Vec::new(),
        }
    }

    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.mappings = self.api.doctor_branch_mappings().await?;
        self.branches = self.api.hospital_branches().await?;
        // the doctors query also returns receptionists; both are assignable
        self.staff = self
            .api
            .doctors()
            .await?
            .into_iter()
            .filter(|u| matches!(u.role, Role::Doctor | Role::Receptionist))
            .collect();
        Ok(())
    }

    pub fn mappings(&self) -> &[DoctorBranchMapping] {
        &self.mappings
    }

    /// Staff members eligible for assignment.
    pub fn assignable_staff(&self) -> &[User] {
        &self.staff
    }

    /// Branches that can receive assignments. Inactive branches are excluded.
    pub fn assignable_branches(&self) -> Vec<&HospitalBranch> {
        self.branches.iter().filter(|b| b.is_active).collect()
    }

    /// Whether this staff member already holds this assignment.
    pub fn is_duplicate(&self, doctor_id: &str, branch_id: &str) -> bool {
        self.mappings
            .iter()
            .any(|m| m.doctor_id == doctor_id && m.branch_id == branch_id)
    }

    /// Assign a staff member to a branch. Duplicates are rejected before the
    /// mutation is sent.
    pub async fn assign(
        &mut self,
        doctor_id: &str,
        branch_id: &str,
    ) -> Result<DoctorBranchMapping, ClientError> {
        require_admin(&self.session)?;

        if self.is_duplicate(doctor_id, branch_id) {
            let message = "This staff member is already assigned to this branch";
            self.notifier.warning(message);
            return Err(ClientError::Validation(message.to_string()));
        }

        let staff = self
            .staff
            .iter()
            .find(|u| u.id == doctor_id)
            .ok_or_else(|| ClientError::Validation("Please select a staff member".to_string()))?;
        let branch = self
            .branches
            .iter()
            .find(|b| b.id == branch_id)
            .ok_or_else(|| ClientError::Validation("Please select a branch".to_string()))?;

        let input = DoctorBranchMappingInput {
            doctor_id: staff.id.clone(),
            branch_id: branch.id.clone(),
            doctor_name: staff.name.clone(),
            branch_code: branch.branch_code.clone(),
        };

        match self.api.assign_doctor_to_branch(&input).await {
            Ok(mapping) => {
                self.notifier.success("Doctor assigned to branch successfully!");
                self.mappings.push(mapping.clone());
                Ok(mapping)
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    pub async fn remove(&mut self, doctor_id: &str, branch_id: &str) -> Result<(), ClientError> {
        require_admin(&self.session)?;

        match self.api.remove_doctor_from_branch(doctor_id, branch_id).await {
            Ok(_) => {
                self.notifier.success("Assignment removed successfully!");
                self.mappings
                    .retain(|m| !(m.doctor_id == doctor_id && m.branch_id == branch_id));
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

    fn screen(role: Role) -> AssignmentAdmin {
        AssignmentAdmin::new(
            offline_api(),
            session(role),
            Notifier::new(Duration::from_secs(60)),
        )
    }

    fn mapping(doctor: &str, branch: &str) -> DoctorBranchMapping {
        DoctorBranchMapping {
            id: format!("{}-{}", doctor, branch),
            doctor_id: doctor.into(),
            branch_id: branch.into(),
            doctor_name: "Dr. Smith".into(),
            branch_code: "NYC01".into(),
        }
    }

    #[test]
    fn test_duplicate_detection() {
        let mut screen = screen(Role::Admin);
        screen.mappings.push(mapping("d1", "b1"));

        assert!(screen.is_duplicate("d1", "b1"));
        assert!(!screen.is_duplicate("d1", "b2"));
        assert!(!screen.is_duplicate("d2", "b1"));
    }

    #[tokio::test]
    async fn test_duplicate_assignment_rejected_without_network() {
        let mut screen = screen(Role::Admin);
        screen.mappings.push(mapping("d1", "b1"));

        // offline api would fail with a network error if the mutation ran;
        // the duplicate guard must reject first
        let err = screen.assign("d1", "b1").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_assign() {
        let mut screen = screen(Role::Receptionist);
        let err = screen.assign("d1", "b1").await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }

    #[test]
    fn test_inactive_branches_not_assignable() {
        let mut screen = screen(Role::Admin);
        screen.branches = vec![
            HospitalBranch {
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
            },
            HospitalBranch {
                id: "b2".into(),
                branch_code: "BOS01".into(),
                address: "2 Elm St".into(),
                city: "Boston".into(),
                state: "MA".into(),
                zip_code: None,
                email: None,
                phone_number: "555-0200".into(),
                is_active: false,
                started_at: None,
            },
        ];

        let assignable = screen.assignable_branches();
        assert_eq!(assignable.len(), 1);
        assert_eq!(assignable[0].id, "b1");
    }
}
