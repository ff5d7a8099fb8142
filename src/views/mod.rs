//! Role-scoped appointment views.
//!
//! Both the list and the calendar load through [`AppointmentScope`], which
//! picks the query matching the session's role. The views hold data plus
//! selection/projection state; rendering is left to the embedding UI.

mod calendar;
mod list;

pub use calendar::{status_color, CalendarEvent, CalendarView, SlotSelection};
pub use list::AppointmentList;

use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::{Appointment, Role};
use crate::operations::Api;
use crate::session::Session;

/// Which slice of the appointment book a session may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentScope {
    /// Admin and customer care: everything.
    All,
    /// A doctor sees appointments where they are the doctor.
    Doctor(String),
    /// A patient sees appointments where they are the patient.
    Patient(String),
    /// A receptionist pinned to a branch sees that branch's book.
    Branch(String),
}

impl AppointmentScope {
    /// Derive the scope from a session.
    ///
    /// A receptionist without a resolved branch falls back to the
    /// requester-scoped query rather than seeing nothing.
    pub fn for_session(session: &Session) -> Self {
        match session.role {
            Role::Admin | Role::CustomerCare => AppointmentScope::All,
            Role::Doctor => AppointmentScope::Doctor(session.id.clone()),
            Role::Patient => AppointmentScope::Patient(session.id.clone()),
            Role::Receptionist => match &session.branch_id {
                Some(branch_id) => AppointmentScope::Branch(branch_id.clone()),
                None => AppointmentScope::All,
            },
        }
    }

    /// Run the scope's query.
    pub async fn load(
        &self,
        api: &Api,
        requester_id: &str,
    ) -> Result<Vec<Appointment>, ClientError> {
        match self {
            AppointmentScope::All => api.appointments(requester_id).await,
            AppointmentScope::Doctor(id) => api.appointments_by_doctor(id).await,
            AppointmentScope::Patient(id) => api.appointments_by_patient(id).await,
            AppointmentScope::Branch(branch_id) => {
                api.appointments_by_branch(branch_id, requester_id).await
            }
        }
    }
}

/// Shared loading state for the list and calendar views.
pub(crate) struct ViewData {
    api: Arc<Api>,
    session: Session,
    appointments: Vec<Appointment>,
    /// Admin-only client-side filter: show only one user's appointments
    selected_user_id: Option<String>,
}

impl ViewData {
    fn new(api: Arc<Api>, session: Session) -> Self {
        Self {
            api,
            session,
            appointments: Vec::new(),
            selected_user_id: None,
        }
    }

    async fn reload(&mut self) -> Result<(), ClientError> {
        let scope = AppointmentScope::for_session(&self.session);
        self.appointments = scope.load(&self.api, &self.session.id).await?;
        Ok(())
    }

    fn set_user_filter(&mut self, user_id: Option<&str>) {
        // Only full-access roles get the per-user display filter
        if self.session.capabilities().has_full_access {
            self.selected_user_id = user_id.map(str::to_string);
        }
    }

    fn visible(&self) -> Vec<&Appointment> {
        match &self.selected_user_id {
            Some(user_id) => self
                .appointments
                .iter()
                .filter(|a| a.involves(user_id))
                .collect(),
            None => self.appointments.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role, branch_id: Option<&str>) -> Session {
        Session {
            id: "u1".into(),
            name: "Test".into(),
            email: "t@clinic.test".into(),
            role,
            phone_number: None,
            age: None,
            branch_id: branch_id.map(str::to_string),
            branch_code: None,
        }
    }

    #[test]
    fn test_scope_follows_role() {
        assert_eq!(
            AppointmentScope::for_session(&session(Role::Admin, None)),
            AppointmentScope::All
        );
        assert_eq!(
            AppointmentScope::for_session(&session(Role::CustomerCare, None)),
            AppointmentScope::All
        );
        assert_eq!(
            AppointmentScope::for_session(&session(Role::Doctor, None)),
            AppointmentScope::Doctor("u1".into())
        );
        assert_eq!(
            AppointmentScope::for_session(&session(Role::Patient, None)),
            AppointmentScope::Patient("u1".into())
        );
    }

    #[test]
    fn test_receptionist_scope_prefers_branch() {
        assert_eq!(
            AppointmentScope::for_session(&session(Role::Receptionist, Some("b1"))),
            AppointmentScope::Branch("b1".into())
        );
        // no branch resolved at login: fall back to the requester-scoped query
        assert_eq!(
            AppointmentScope::for_session(&session(Role::Receptionist, None)),
            AppointmentScope::All
        );
    }
}
