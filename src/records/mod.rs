//! Medical records screen: patient personal information and the audit trail.
//!
//! Deliberately thin. Clinical data lives server-side; this screen only reads
//! the patient's own demographic sheet and lets staff append corrections.

use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{ActivityLog, PersonalInfo, PersonalInfoUpdateInput, Role};
use crate::notify::Notifier;
use crate::operations::Api;
use crate::session::Session;

/// The records screen for one patient.
pub struct RecordsView {
    api: Arc<Api>,
    session: Session,
    notifier: Notifier,
}

impl RecordsView {
    pub fn new(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
        }
    }

    /// Load a patient's demographic sheet.
    ///
    /// Patients may only read their own; staff may read any.
    pub async fn personal_info(&self, patient_id: &str) -> Result<PersonalInfo, ClientError> {
        self.authorize(patient_id)?;
        self.api.personal_info(patient_id).await
    }

    pub async fn update_personal_info(
        &self,
        patient_id: &str,
        input: &PersonalInfoUpdateInput,
    ) -> Result<PersonalInfo, ClientError> {
        self.authorize(patient_id)?;

        match self.api.update_personal_info(patient_id, input).await {
            Ok(info) => {
                self.notifier.success("Personal information updated!");
                Ok(info)
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }

    /// The full audit trail. Staff only.
    pub async fn activity_logs(&self) -> Result<Vec<ActivityLog>, ClientError> {
        if !self.session.capabilities().is_staff {
            return Err(ClientError::Unauthorized(
                "Staff access required".to_string(),
            ));
        }
        self.api.activity_logs().await
    }

    /// Audit entries for one entity type (e.g. "appointment", "branch").
    pub async fn activity_logs_by_type(
        &self,
        entity_type: &str,
    ) -> Result<Vec<ActivityLog>, ClientError> {
        if !self.session.capabilities().is_staff {
            return Err(ClientError::Unauthorized(
                "Staff access required".to_string(),
            ));
        }
        self.api.activity_logs_by_type(entity_type).await
    }

    fn authorize(&self, patient_id: &str) -> Result<(), ClientError> {
        if self.session.role == Role::Patient && self.session.id != patient_id {
            return Err(ClientError::Unauthorized(
                "You may only view your own records".to_string(),
            ));
        }
        Ok(())
    }
}
