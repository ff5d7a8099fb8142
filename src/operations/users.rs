//! Doctor, patient, and staff account operations.

use serde_json::{json, Value};

use super::Api;
use crate::cache::Collection;
use crate::errors::ClientError;
use crate::models::{
    DoctorSignupInput, DoctorUpdateInput, PatientSignupInput, SignupResponse, User,
};

const GET_DOCTORS: &str = r#"
    query GetDoctors {
        doctors {
            id
            name
            email
            role
            startDate
            isActive
        }
    }
"#;

const GET_PATIENTS: &str = r#"
    query GetPatients {
        patients {
            id
            name
            email
            phoneNumber
            age
            role
        }
    }
"#;

const SIGNUP_DOCTOR: &str = r#"
    mutation SignupDoctor($input: DoctorSignupInput!) {
        signupDoctor(input: $input) {
            message
            success
            userId
            email
            role
        }
    }
"#;

const SIGNUP_PATIENT: &str = r#"
    mutation SignupPatient($input: PatientSignupInput!) {
        signupPatient(input: $input) {
            message
            success
            userId
            email
            role
        }
    }
"#;

const DELETE_DOCTOR: &str = r#"
    mutation DeleteDoctor($id: ID!) {
        deleteDoctor(id: $id)
    }
"#;

const DELETE_PATIENT: &str = r#"
    mutation DeletePatient($id: ID!) {
        deletePatient(id: $id)
    }
"#;

const UPDATE_DOCTOR: &str = r#"
    mutation UpdateDoctor($id: ID!, $input: DoctorUpdateInput!) {
        updateDoctor(id: $id, input: $input) {
            id
            name
            email
            role
            isActive
        }
    }
"#;

impl Api {
    /// All doctors and non-patient staff, via the shared cache.
    pub async fn doctors(&self) -> Result<Vec<User>, ClientError> {
        self.cached_list(Collection::Doctors, GET_DOCTORS, "doctors").await
    }

    /// All patients, via the shared cache.
    pub async fn patients(&self) -> Result<Vec<User>, ClientError> {
        self.cached_list(Collection::Patients, GET_PATIENTS, "patients").await
    }

    pub async fn signup_doctor(
        &self,
        input: &DoctorSignupInput,
    ) -> Result<SignupResponse, ClientError> {
        let response: SignupResponse = self
            .gateway()
            .query(SIGNUP_DOCTOR, "signupDoctor", json!({ "input": input }))
            .await?;
        self.cache().invalidate(&[Collection::Doctors]);
        Ok(response)
    }

    pub async fn signup_patient(
        &self,
        input: &PatientSignupInput,
    ) -> Result<SignupResponse, ClientError> {
        let response: SignupResponse = self
            .gateway()
            .query(SIGNUP_PATIENT, "signupPatient", json!({ "input": input }))
            .await?;
        self.cache().invalidate(&[Collection::Patients]);
        Ok(response)
    }

    pub async fn delete_doctor(&self, id: &str) -> Result<bool, ClientError> {
        let deleted = self
            .gateway()
            .query(DELETE_DOCTOR, "deleteDoctor", json!({ "id": id }))
            .await?;
        self.cache().remove(Collection::Doctors, id);
        Ok(deleted)
    }

    pub async fn delete_patient(&self, id: &str) -> Result<bool, ClientError> {
        let deleted = self
            .gateway()
            .query(DELETE_PATIENT, "deletePatient", json!({ "id": id }))
            .await?;
        self.cache().remove(Collection::Patients, id);
        Ok(deleted)
    }

    pub async fn update_doctor(
        &self,
        id: &str,
        input: &DoctorUpdateInput,
    ) -> Result<User, ClientError> {
        let user: Value = self
            .gateway()
            .query(UPDATE_DOCTOR, "updateDoctor", json!({ "id": id, "input": input }))
            .await?;
        self.cache().upsert(Collection::Doctors, &user);
        Ok(serde_json::from_value(user)?)
    }
}
