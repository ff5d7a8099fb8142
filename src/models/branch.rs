//! Hospital branch and staff/branch assignment models.

use serde::{Deserialize, Serialize};

/// A physical hospital location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalBranch {
    pub id: String,
    pub branch_code: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone_number: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
}

/// Input for creating or updating a hospital branch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalBranchInput {
    pub branch_code: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone_number: String,
    pub is_active: bool,
}

/// A staff-to-branch assignment record.
///
/// "Doctor" is historical naming on the wire; receptionists use the same
/// mapping type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorBranchMapping {
    pub id: String,
    pub doctor_id: String,
    pub branch_id: String,
    pub doctor_name: String,
    pub branch_code: String,
}

/// Input for `assignDoctorToBranch`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorBranchMappingInput {
    pub doctor_id: String,
    pub branch_id: String,
    pub doctor_name: String,
    pub branch_code: String,
}

/// A branch a doctor can be booked at, joined from the mapping and branch
/// collections for display in the appointment form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchChoice {
    pub id: String,
    pub branch_code: String,
    pub city: String,
    pub state: String,
}

impl BranchChoice {
    pub fn label(&self) -> String {
        format!("{} - {}, {}", self.branch_code, self.city, self.state)
    }
}
