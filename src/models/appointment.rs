//! Appointment model and the inputs for its mutations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Role;

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Scheduled
    }
}

/// A scheduled appointment between one doctor and one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub doctor_id: String,
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_location: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Duration in hours, as reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Appointment {
    /// Whether `user_id` participates in this appointment as doctor or patient.
    pub fn involves(&self, user_id: &str) -> bool {
        self.doctor_id == user_id || self.patient_id == user_id
    }

    /// Whether the given user may edit this appointment.
    ///
    /// Admins always can; doctors and patients only when they participate.
    pub fn editable_by(&self, user_id: &str, role: Role) -> bool {
        match role {
            Role::Admin => true,
            Role::Doctor => self.doctor_id == user_id,
            Role::Patient => self.patient_id == user_id,
            Role::Receptionist | Role::CustomerCare => false,
        }
    }
}

/// Input for `createAppointment`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
    pub doctor_id: String,
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

/// Input for `updateAppointment`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdateInput {
    pub title: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

/// A conflicting appointment reported by `checkCollision`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentConflict {
    pub id: String,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Appointment {
        Appointment {
            id: "a1".into(),
            title: "Checkup".into(),
            description: None,
            doctor_id: "d1".into(),
            patient_id: "p1".into(),
            doctor_name: Some("Smith".into()),
            patient_name: Some("Jones".into()),
            branch_id: None,
            branch_location: None,
            start_time: NaiveDate::from_ymd_opt(2026, 9, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            end_time: NaiveDate::from_ymd_opt(2026, 9, 1)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            status: AppointmentStatus::Scheduled,
            created_at: None,
            updated_at: None,
            duration: Some(1.0),
        }
    }

    #[test]
    fn test_editable_by_participant_only() {
        let appt = sample();
        assert!(appt.editable_by("anyone", Role::Admin));
        assert!(appt.editable_by("d1", Role::Doctor));
        assert!(!appt.editable_by("d2", Role::Doctor));
        assert!(appt.editable_by("p1", Role::Patient));
        assert!(!appt.editable_by("p2", Role::Patient));
        assert!(!appt.editable_by("r1", Role::Receptionist));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("doctorId").is_some());
        assert!(json.get("startTime").is_some());
        assert_eq!(json["status"], "scheduled");
    }
}
