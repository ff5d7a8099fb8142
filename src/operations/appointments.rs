//! Appointment queries and mutations.

use chrono::NaiveDateTime;
use serde_json::json;

use super::Api;
use crate::errors::ClientError;
use crate::models::{
    Appointment, AppointmentConflict, AppointmentInput, AppointmentUpdateInput,
};

const APPOINTMENT_FIELDS: &str = r#"
            id
            title
            description
            doctorId
            patientId
            doctorName
            patientName
            startTime
            endTime
            status
            createdAt
            updatedAt
            duration
            branchId
            branchLocation
"#;

fn list_query(name: &str, signature: &str, call: &str) -> String {
    format!(
        "query {name}({signature}) {{\n        {call} {{\n{APPOINTMENT_FIELDS}        }}\n    }}"
    )
}

const CHECK_COLLISION: &str = r#"
    query CheckCollision($doctorId: ID!, $patientId: ID!, $startTime: String!, $endTime: String!) {
        checkCollision(doctorId: $doctorId, patientId: $patientId, startTime: $startTime, endTime: $endTime) {
            id
            title
            startTime
            endTime
            doctorName
            patientName
        }
    }
"#;

const DELETE_APPOINTMENT: &str = r#"
    mutation DeleteAppointment($id: ID!, $requesterId: ID!) {
        deleteAppointment(id: $id, requesterId: $requesterId)
    }
"#;

const DELETE_MULTIPLE_APPOINTMENTS: &str = r#"
    mutation DeleteMultipleAppointments($ids: [ID!]!, $requesterId: ID!) {
        deleteMultipleAppointments(ids: $ids, requesterId: $requesterId)
    }
"#;

impl Api {
    /// All appointments visible to a full-access requester.
    pub async fn appointments(&self, requester_id: &str) -> Result<Vec<Appointment>, ClientError> {
        let document = list_query(
            "GetAppointments",
            "$requesterId: ID!",
            "appointments(requesterId: $requesterId)",
        );
        self.gateway()
            .query(&document, "appointments", json!({ "requesterId": requester_id }))
            .await
    }

    /// Appointments where the given doctor participates.
    pub async fn appointments_by_doctor(
        &self,
        doctor_id: &str,
    ) -> Result<Vec<Appointment>, ClientError> {
        let document = list_query(
            "GetAppointmentsByDoctor",
            "$doctorId: ID!",
            "appointmentsByDoctor(doctorId: $doctorId)",
        );
        self.gateway()
            .query(&document, "appointmentsByDoctor", json!({ "doctorId": doctor_id }))
            .await
    }

    /// Appointments where the given patient participates.
    pub async fn appointments_by_patient(
        &self,
        patient_id: &str,
    ) -> Result<Vec<Appointment>, ClientError> {
        let document = list_query(
            "GetAppointmentsByPatient",
            "$patientId: ID!",
            "appointmentsByPatient(patientId: $patientId)",
        );
        self.gateway()
            .query(&document, "appointmentsByPatient", json!({ "patientId": patient_id }))
            .await
    }

    /// Appointments attributed to one hospital branch.
    pub async fn appointments_by_branch(
        &self,
        branch_id: &str,
        requester_id: &str,
    ) -> Result<Vec<Appointment>, ClientError> {
        let document = list_query(
            "GetAppointmentsByBranch",
            "$branchId: ID!, $requesterId: ID!",
            "appointmentsByBranch(branchId: $branchId, requesterId: $requesterId)",
        );
        self.gateway()
            .query(
                &document,
                "appointmentsByBranch",
                json!({ "branchId": branch_id, "requesterId": requester_id }),
            )
            .await
    }

    /// Overlapping appointments for the doctor/patient pair in the window.
    pub async fn check_collision(
        &self,
        doctor_id: &str,
        patient_id: &str,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Result<Vec<AppointmentConflict>, ClientError> {
        self.gateway()
            .query(
                CHECK_COLLISION,
                "checkCollision",
                json!({
                    "doctorId": doctor_id,
                    "patientId": patient_id,
                    "startTime": start_time,
                    "endTime": end_time,
                }),
            )
            .await
    }

    pub async fn create_appointment(
        &self,
        input: &AppointmentInput,
    ) -> Result<Appointment, ClientError> {
        let document = format!(
            "mutation CreateAppointment($input: AppointmentInput!) {{\n        createAppointment(input: $input) {{\n{APPOINTMENT_FIELDS}        }}\n    }}"
        );
        self.gateway()
            .query(&document, "createAppointment", json!({ "input": input }))
            .await
    }

    pub async fn update_appointment(
        &self,
        id: &str,
        input: &AppointmentUpdateInput,
        requester_id: &str,
    ) -> Result<Appointment, ClientError> {
        let document = format!(
            "mutation UpdateAppointment($id: ID!, $input: AppointmentUpdateInput!, $requesterId: ID!) {{\n        updateAppointment(id: $id, input: $input, requesterId: $requesterId) {{\n{APPOINTMENT_FIELDS}        }}\n    }}"
        );
        self.gateway()
            .query(
                &document,
                "updateAppointment",
                json!({ "id": id, "input": input, "requesterId": requester_id }),
            )
            .await
    }

    pub async fn delete_appointment(
        &self,
        id: &str,
        requester_id: &str,
    ) -> Result<bool, ClientError> {
        self.gateway()
            .query(
                DELETE_APPOINTMENT,
                "deleteAppointment",
                json!({ "id": id, "requesterId": requester_id }),
            )
            .await
    }

    pub async fn delete_multiple_appointments(
        &self,
        ids: &[String],
        requester_id: &str,
    ) -> Result<bool, ClientError> {
        self.gateway()
            .query(
                DELETE_MULTIPLE_APPOINTMENTS,
                "deleteMultipleAppointments",
                json!({ "ids": ids, "requesterId": requester_id }),
            )
            .await
    }
}
