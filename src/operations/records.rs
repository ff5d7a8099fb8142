//! Activity log and patient personal-info operations.

use serde_json::json;

use super::Api;
use crate::errors::ClientError;
use crate::models::{ActivityLog, PersonalInfo, PersonalInfoUpdateInput};

const GET_ACTIVITY_LOGS: &str = r#"
    query GetActivityLogs {
        getActivityLogs {
            id
            actionType
            entityType
            description
            timestamp
            performedBy
        }
    }
"#;

const GET_ACTIVITY_LOGS_BY_TYPE: &str = r#"
    query GetActivityLogsByType($entityType: String!) {
        getActivityLogsByType(entityType: $entityType) {
            id
            actionType
            entityType
            description
            timestamp
            performedBy
        }
    }
"#;

const GET_PERSONAL_INFO: &str = r#"
    query GetPersonalInfo($patientId: ID!) {
        personalInfo(patientId: $patientId) {
            id
            name
            email
            phoneNumber
            age
            address
            bloodGroup
            allergies
        }
    }
"#;

const UPDATE_PERSONAL_INFO: &str = r#"
    mutation UpdatePersonalInfo($patientId: ID!, $input: PersonalInfoUpdateInput!) {
        updatePersonalInfo(patientId: $patientId, input: $input) {
            id
            name
            email
            phoneNumber
            age
            address
            bloodGroup
            allergies
        }
    }
"#;

impl Api {
    pub async fn activity_logs(&self) -> Result<Vec<ActivityLog>, ClientError> {
        self.gateway()
            .query(GET_ACTIVITY_LOGS, "getActivityLogs", json!({}))
            .await
    }

    pub async fn activity_logs_by_type(
        &self,
        entity_type: &str,
    ) -> Result<Vec<ActivityLog>, ClientError> {
        self.gateway()
            .query(
                GET_ACTIVITY_LOGS_BY_TYPE,
                "getActivityLogsByType",
                json!({ "entityType": entity_type }),
            )
            .await
    }

    pub async fn personal_info(&self, patient_id: &str) -> Result<PersonalInfo, ClientError> {
        self.gateway()
            .query(GET_PERSONAL_INFO, "personalInfo", json!({ "patientId": patient_id }))
            .await
    }

    pub async fn update_personal_info(
        &self,
        patient_id: &str,
        input: &PersonalInfoUpdateInput,
    ) -> Result<PersonalInfo, ClientError> {
        self.gateway()
            .query(
                UPDATE_PERSONAL_INFO,
                "updatePersonalInfo",
                json!({ "patientId": patient_id, "input": input }),
            )
            .await
    }
}
