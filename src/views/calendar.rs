//! Calendar projection of the appointment book.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::errors::ClientError;
use crate::models::{Appointment, AppointmentStatus};
use crate::operations::Api;
use crate::session::Session;

use super::ViewData;

/// Display color for an appointment's status.
pub fn status_color(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "#3b82f6",
        AppointmentStatus::Completed => "#10b981",
        AppointmentStatus::Cancelled => "#ef4444",
    }
}

/// A positioned, colored calendar entry.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: &'static str,
    pub editable: bool,
}

/// The time window chosen by clicking or dragging on the calendar,
/// used to pre-fill the appointment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSelection {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SlotSelection {
    /// A single-slot click: one hour starting at the clicked time.
    pub fn single(start: NaiveDateTime) -> Self {
        Self {
            start,
            end: start + chrono::Duration::hours(1),
        }
    }

    /// A drag across a range. A zero-length drag degrades to a single slot.
    pub fn range(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end > start {
            Self { start, end }
        } else {
            Self::single(start)
        }
    }
}

/// The calendar view over the session's visible appointments.
pub struct CalendarView {
    data: ViewData,
    /// First day of the displayed month
    month: NaiveDate,
}

impl CalendarView {
    pub fn new(api: Arc<Api>, session: Session, today: NaiveDate) -> Self {
        Self {
            data: ViewData::new(api, session),
            month: today.with_day(1).unwrap_or(today),
        }
    }

    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.data.reload().await
    }

    /// Restrict the display to appointments involving one user.
    /// Ignored for sessions without full access.
    pub fn set_user_filter(&mut self, user_id: Option<&str>) {
        self.data.set_user_filter(user_id);
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn next_month(&mut self) {
        self.month = add_months(self.month, 1);
    }

    pub fn previous_month(&mut self) {
        self.month = add_months(self.month, -1);
    }

    /// Events overlapping the displayed month, colored by status.
    pub fn events(&self) -> Vec<CalendarEvent> {
        let month_start = self.month.and_hms_opt(0, 0, 0).unwrap_or_default();
        let month_end = add_months(self.month, 1).and_hms_opt(0, 0, 0).unwrap_or_default();

        self.data
            .visible()
            .into_iter()
            .filter(|a| a.start_time < month_end && a.end_time > month_start)
            .map(|a| self.to_event(a))
            .collect()
    }

    fn to_event(&self, appointment: &Appointment) -> CalendarEvent {
        CalendarEvent {
            id: appointment.id.clone(),
            title: appointment.title.clone(),
            start: appointment.start_time,
            end: appointment.end_time,
            color: status_color(appointment.status),
            editable: appointment
                .editable_by(&self.data.session.id, self.data.session.role),
        }
    }
}

fn add_months(date: NaiveDate, delta: i32) -> NaiveDate {
    let zero_based = date.year() * 12 + date.month0() as i32 + delta;
    let year = zero_based.div_euclid(12);
    let month0 = zero_based.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryCache;
    use crate::gateway::Gateway;
    use crate::models::Role;
    use crate::token::MemoryTokenStore;

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
            id: "me".into(),
            name: "Test".into(),
            email: "t@clinic.test".into(),
            role,
            phone_number: None,
            age: None,
            branch_id: None,
            branch_code: None,
        }
    }

    fn appointment(id: &str, day: u32, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            title: "Visit".into(),
            description: None,
            doctor_id: "me".into(),
            patient_id: "p1".into(),
            doctor_name: None,
            patient_name: None,
            branch_id: None,
            branch_location: None,
            start_time: NaiveDate::from_ymd_opt(2026, 9, day)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            end_time: NaiveDate::from_ymd_opt(2026, 9, day)
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            status,
            created_at: None,
            updated_at: None,
            duration: Some(1.0),
        }
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(AppointmentStatus::Scheduled), "#3b82f6");
        assert_eq!(status_color(AppointmentStatus::Completed), "#10b981");
        assert_eq!(status_color(AppointmentStatus::Cancelled), "#ef4444");
    }

    #[test]
    fn test_events_limited_to_displayed_month() {
        let today = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
        let mut view = CalendarView::new(offline_api(), session(Role::Admin), today);
        view.data.appointments = vec![
            appointment("in", 10, AppointmentStatus::Scheduled),
            appointment("also-in", 30, AppointmentStatus::Completed),
        ];

        assert_eq!(view.events().len(), 2);

        view.next_month();
        assert!(view.events().is_empty());
        view.previous_month();
        assert_eq!(view.events().len(), 2);
    }

    #[test]
    fn test_event_editability_follows_session() {
        let today = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let mut view = CalendarView::new(offline_api(), session(Role::Receptionist), today);
        view.data.appointments = vec![appointment("a", 10, AppointmentStatus::Scheduled)];

        // receptionists see the book but cannot drag-edit entries
        assert!(!view.events()[0].editable);
    }

    #[test]
    fn test_month_arithmetic_wraps_year() {
        let dec = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        assert_eq!(add_months(dec, 1), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
        let jan = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(add_months(jan, -1), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    }

    #[test]
    fn test_slot_selection_defaults() {
        let start = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let slot = SlotSelection::single(start);
        assert_eq!(slot.end - slot.start, chrono::Duration::hours(1));

        let degraded = SlotSelection::range(start, start);
        assert_eq!(degraded, SlotSelection::single(start));
    }
}
