//! Hospital branch and staff/branch assignment operations.

use serde_json::{json, Value};

use super::Api;
use crate::cache::Collection;
use crate::errors::ClientError;
use crate::models::{
    DoctorBranchMapping, DoctorBranchMappingInput, HospitalBranch, HospitalBranchInput,
};

const BRANCH_FIELDS: &str = r#"
            id
            branchCode
            address
            city
            state
            zipCode
            email
            phoneNumber
            isActive
            startedAt
"#;

const MAPPING_FIELDS: &str = r#"
            id
            doctorId
            branchId
            doctorName
            branchCode
"#;

const GET_HOSPITAL_BRANCHES: &str = r#"
    query GetHospitalBranches {
        hospitalBranches {
            id
            branchCode
            address
            city
            state
            zipCode
            email
            phoneNumber
            isActive
            startedAt
        }
    }
"#;

const GET_ACTIVE_BRANCHES: &str = r#"
    query GetActiveBranches {
        activeBranches {
            id
            branchCode
            address
            city
            state
            zipCode
            email
            phoneNumber
            isActive
            startedAt
        }
    }
"#;

const DELETE_HOSPITAL_BRANCH: &str = r#"
    mutation DeleteHospitalBranch($id: ID!) {
        deleteHospitalBranch(id: $id)
    }
"#;

const GET_DOCTOR_BRANCH_MAPPINGS: &str = r#"
    query GetDoctorBranchMappings {
        doctorBranchMappings {
            id
            doctorId
            branchId
            doctorName
            branchCode
        }
    }
"#;

const GET_DOCTOR_BRANCHES: &str = r#"
    query GetDoctorBranches($doctorId: ID!) {
        doctorBranches(doctorId: $doctorId) {
            id
            doctorId
            branchId
            doctorName
            branchCode
        }
    }
"#;

const REMOVE_DOCTOR_FROM_BRANCH: &str = r#"
    mutation RemoveDoctorFromBranch($doctorId: ID!, $branchId: ID!) {
        removeDoctorFromBranch(doctorId: $doctorId, branchId: $branchId)
    }
"#;

impl Api {
    /// All hospital branches, via the shared cache.
    pub async fn hospital_branches(&self) -> Result<Vec<HospitalBranch>, ClientError> {
        self.cached_list(Collection::Branches, GET_HOSPITAL_BRANCHES, "hospitalBranches")
            .await
    }

    /// Branches currently accepting appointments.
    pub async fn active_branches(&self) -> Result<Vec<HospitalBranch>, ClientError> {
        self.gateway()
            .query(GET_ACTIVE_BRANCHES, "activeBranches", json!({}))
            .await
    }

    pub async fn create_hospital_branch(
        &self,
        input: &HospitalBranchInput,
    ) -> Result<HospitalBranch, ClientError> {
        let document = format!(
            "mutation CreateHospitalBranch($input: HospitalBranchInput!) {{\n        createHospitalBranch(input: $input) {{\n{BRANCH_FIELDS}        }}\n    }}"
        );
        let branch: Value = self
            .gateway()
            .query(&document, "createHospitalBranch", json!({ "input": input }))
            .await?;
        self.cache().upsert(Collection::Branches, &branch);
        Ok(serde_json::from_value(branch)?)
    }

    pub async fn update_hospital_branch(
        &self,
        id: &str,
        input: &HospitalBranchInput,
    ) -> Result<HospitalBranch, ClientError> {
        let document = format!(
            "mutation UpdateHospitalBranch($id: ID!, $input: HospitalBranchUpdateInput!) {{\n        updateHospitalBranch(id: $id, input: $input) {{\n{BRANCH_FIELDS}        }}\n    }}"
        );
        let branch: Value = self
            .gateway()
            .query(
                &document,
                "updateHospitalBranch",
                json!({ "id": id, "input": input }),
            )
            .await?;
        self.cache().upsert(Collection::Branches, &branch);
        Ok(serde_json::from_value(branch)?)
    }

    /// Delete a branch. The server cascades removal of its staff assignments,
    /// so the mapping collection is invalidated as well.
    pub async fn delete_hospital_branch(&self, id: &str) -> Result<bool, ClientError> {
        let deleted = self
            .gateway()
            .query(DELETE_HOSPITAL_BRANCH, "deleteHospitalBranch", json!({ "id": id }))
            .await?;
        self.cache()
            .invalidate(&[Collection::Branches, Collection::Mappings]);
        Ok(deleted)
    }

    /// Every staff/branch assignment, via the shared cache.
    pub async fn doctor_branch_mappings(&self) -> Result<Vec<DoctorBranchMapping>, ClientError> {
        self.cached_list(
            Collection::Mappings,
            GET_DOCTOR_BRANCH_MAPPINGS,
            "doctorBranchMappings",
        )
        .await
    }

    /// Assignments held by one staff member.
    pub async fn doctor_branches(
        &self,
        doctor_id: &str,
    ) -> Result<Vec<DoctorBranchMapping>, ClientError> {
        self.gateway()
            .query(GET_DOCTOR_BRANCHES, "doctorBranches", json!({ "doctorId": doctor_id }))
            .await
    }

    pub async fn assign_doctor_to_branch(
        &self,
        input: &DoctorBranchMappingInput,
    ) -> Result<DoctorBranchMapping, ClientError> {
        let document = format!(
            "mutation AssignDoctorToBranch($input: DoctorBranchMappingInput!) {{\n        assignDoctorToBranch(input: $input) {{\n{MAPPING_FIELDS}        }}\n    }}"
        );
        let mapping: Value = self
            .gateway()
            .query(&document, "assignDoctorToBranch", json!({ "input": input }))
            .await?;
        self.cache().upsert(Collection::Mappings, &mapping);
        Ok(serde_json::from_value(mapping)?)
    }

    pub async fn remove_doctor_from_branch(
        &self,
        doctor_id: &str,
        branch_id: &str,
    ) -> Result<bool, ClientError> {
        let removed = self
            .gateway()
            .query(
                REMOVE_DOCTOR_FROM_BRANCH,
                "removeDoctorFromBranch",
                json!({ "doctorId": doctor_id, "branchId": branch_id }),
            )
            .await?;
        self.cache().invalidate(&[Collection::Mappings]);
        Ok(removed)
    }
}
