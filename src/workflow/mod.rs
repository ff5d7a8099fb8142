//! Appointment form workflow.
//!
//! A state machine over the form fields with field-level validation, the
//! doctor-to-branch dependency, and asynchronous conflict detection. Async
//! lookups carry a generation counter so a superseded request can never
//! overwrite newer state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::errors::ClientError;
use crate::models::{
    Appointment, AppointmentConflict, AppointmentInput, AppointmentStatus,
    AppointmentUpdateInput, BranchChoice, Role,
};
use crate::notify::Notifier;
use crate::operations::Api;
use crate::session::Session;

/// Maximum appointment length.
pub const MAX_DURATION_HOURS: i64 = 4;

/// Form fields subject to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    DoctorId,
    PatientId,
    BranchId,
    StartTime,
    EndTime,
    Status,
}

/// The appointment create/edit form.
pub struct AppointmentForm {
    api: Arc<Api>,
    session: Session,
    notifier: Notifier,
    edit: Option<Appointment>,

    title: String,
    description: String,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    status: AppointmentStatus,
    doctor_id: String,
    patient_id: String,
    branch_id: String,

    errors: HashMap<Field, String>,
    touched: HashSet<Field>,
    submit_error: Option<String>,
    /// None until the first check has run for a complete field set
    conflicts: Option<Vec<AppointmentConflict>>,
    available_branches: Vec<BranchChoice>,
    branches_loaded: bool,
    submitting: bool,
    delete_confirm_pending: bool,

    conflict_generation: u64,
    branch_generation: u64,
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t)
}

impl AppointmentForm {
    fn empty(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            notifier,
            edit: None,
            title: String::new(),
            description: String::new(),
            start_time: None,
            end_time: None,
            status: AppointmentStatus::Scheduled,
            doctor_id: String::new(),
            patient_id: String::new(),
            branch_id: String::new(),
            errors: HashMap::new(),
            touched: HashSet::new(),
            submit_error: None,
            conflicts: None,
            available_branches: Vec::new(),
            branches_loaded: false,
            submitting: false,
            delete_confirm_pending: false,
            conflict_generation: 0,
            branch_generation: 0,
        }
    }

    /// A fresh form, pre-filled with a one-hour window starting now and with
    /// the current user as doctor or patient when their role implies it.
    pub async fn create(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        let now = truncate_to_minute(Local::now().naive_local());
        Self::create_with_window(api, session, notifier, now, now + chrono::Duration::hours(1))
            .await
    }

    /// A fresh form with an explicit time window, used by calendar
    /// slot selection.
    pub async fn create_with_window(
        api: Arc<Api>,
        session: Session,
        notifier: Notifier,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        let mut form = Self::empty(api, session, notifier);
        form.start_time = Some(start);
        form.end_time = Some(end);

        match form.session.role {
            Role::Doctor => {
                form.doctor_id = form.session.id.clone();
                form.refresh_branches().await;
            }
            Role::Patient => form.patient_id = form.session.id.clone(),
            _ => {}
        }
        form
    }

    /// A form populated from an existing appointment.
    pub async fn edit(
        api: Arc<Api>,
        session: Session,
        notifier: Notifier,
        appointment: Appointment,
    ) -> Self {
        let mut form = Self::empty(api, session, notifier);
        form.title = appointment.title.clone();
        form.description = appointment.description.clone().unwrap_or_default();
        form.start_time = Some(appointment.start_time);
        form.end_time = Some(appointment.end_time);
        form.status = appointment.status;
        form.doctor_id = appointment.doctor_id.clone();
        form.patient_id = appointment.patient_id.clone();
        form.branch_id = appointment.branch_id.clone().unwrap_or_default();
        form.edit = Some(appointment);

        if !form.doctor_id.is_empty() {
            form.refresh_branches().await;
        }
        form
    }

    // ==================== FIELD ACCESS ====================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn doctor_id(&self) -> &str {
        &self.doctor_id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    /// Branches the selected doctor can be booked at.
    pub fn available_branches(&self) -> &[BranchChoice] {
        &self.available_branches
    }

    /// The branch picker is hidden when the doctor has no active assignments.
    pub fn branch_hidden(&self) -> bool {
        !self.doctor_id.is_empty() && self.branches_loaded && self.available_branches.is_empty()
    }

    pub fn branch_required(&self) -> bool {
        !self.available_branches.is_empty()
    }

    /// Known conflicts, once a complete field set has been checked.
    pub fn conflicts(&self) -> Option<&[AppointmentConflict]> {
        self.conflicts.as_deref()
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    pub fn delete_confirm_pending(&self) -> bool {
        self.delete_confirm_pending
    }

    // ==================== FIELD CHANGES ====================

    pub fn set_title(&mut self, value: &str) {
        self.title = value.to_string();
        self.field_changed(Field::Title);
    }

    pub fn set_description(&mut self, value: &str) {
        self.description = value.to_string();
        self.field_changed(Field::Description);
    }

    pub fn set_status(&mut self, status: AppointmentStatus) {
        self.status = status;
        self.field_changed(Field::Status);
    }

    pub fn set_branch(&mut self, branch_id: &str) {
        self.branch_id = branch_id.to_string();
        self.field_changed(Field::BranchId);
    }

    /// Selecting a doctor clears any previous branch choice and reloads that
    /// doctor's assignments.
    pub async fn set_doctor(&mut self, doctor_id: &str) {
        self.doctor_id = doctor_id.to_string();
        self.branch_id.clear();
        self.branches_loaded = false;
        self.available_branches.clear();
        self.field_changed(Field::DoctorId);

        if !self.doctor_id.is_empty() {
            self.refresh_branches().await;
        }
        self.maybe_check_conflicts().await;
    }

    pub async fn set_patient(&mut self, patient_id: &str) {
        self.patient_id = patient_id.to_string();
        self.field_changed(Field::PatientId);
        self.maybe_check_conflicts().await;
    }

    pub async fn set_start_time(&mut self, value: Option<NaiveDateTime>) {
        self.start_time = value;
        self.field_changed(Field::StartTime);
        self.field_changed(Field::EndTime);
        self.maybe_check_conflicts().await;
    }

    pub async fn set_end_time(&mut self, value: Option<NaiveDateTime>) {
        self.end_time = value;
        self.field_changed(Field::EndTime);
        self.field_changed(Field::StartTime);
        self.maybe_check_conflicts().await;
    }

    /// Blur/focus handler: marks the field touched and revalidates it.
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
        self.revalidate(field);
    }

    fn field_changed(&mut self, field: Field) {
        self.touched.insert(field);
        self.revalidate(field);
    }

    // ==================== VALIDATION ====================

    /// Validation error currently shown for a field (only once touched).
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(&field).map(String::as_str)
        } else {
            None
        }
    }

    fn revalidate(&mut self, field: Field) {
        match self.validate_field(field) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    fn validate_field(&self, field: Field) -> Option<String> {
        match field {
            Field::Title => {
                if self.title.trim().is_empty() {
                    return Some("Title is required".to_string());
                }
            }
            Field::DoctorId => {
                if self.doctor_id.trim().is_empty() {
                    return Some("Please select a doctor".to_string());
                }
            }
            Field::PatientId => {
                if self.patient_id.trim().is_empty() {
                    return Some("Please select a patient".to_string());
                }
            }
            Field::BranchId => {
                if self.branch_required() && self.branch_id.trim().is_empty() {
                    return Some("Please select a branch location".to_string());
                }
            }
            Field::StartTime => {
                let Some(start) = self.start_time else {
                    return Some("Start time is required".to_string());
                };
                if self.edit.is_none() && start < Local::now().naive_local() {
                    return Some("Cannot create appointments in the past".to_string());
                }
                if let Some(end) = self.end_time {
                    if start >= end {
                        return Some("Start time must be before end time".to_string());
                    }
                }
            }
            Field::EndTime => {
                let Some(end) = self.end_time else {
                    return Some("End time is required".to_string());
                };
                if let Some(start) = self.start_time {
                    if end <= start {
                        return Some("End time must be after start time".to_string());
                    }
                    if end - start > chrono::Duration::hours(MAX_DURATION_HOURS) {
                        return Some(format!(
                            "Appointment cannot exceed {} hours",
                            MAX_DURATION_HOURS
                        ));
                    }
                }
            }
            Field::Description | Field::Status => {}
        }
        None
    }

    fn required_fields(&self) -> Vec<Field> {
        let mut fields = vec![
            Field::Title,
            Field::StartTime,
            Field::EndTime,
            Field::DoctorId,
            Field::PatientId,
        ];
        if self.branch_required() {
            fields.push(Field::BranchId);
        }
        fields
    }

    fn validate_all(&mut self) -> bool {
        for field in self.required_fields() {
            self.touched.insert(field);
            self.revalidate(field);
        }
        self.required_fields()
            .iter()
            .all(|f| !self.errors.contains_key(f))
    }

    fn required_fields_filled(&self) -> bool {
        let filled = |v: &str| !v.trim().is_empty();
        filled(&self.title)
            && self.start_time.is_some()
            && self.end_time.is_some()
            && filled(&self.doctor_id)
            && filled(&self.patient_id)
            && (!self.branch_required() || filled(&self.branch_id))
    }

    fn has_conflicts(&self) -> bool {
        self.conflicts.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Whether the current user may edit the underlying appointment.
    pub fn can_edit(&self) -> bool {
        match &self.edit {
            None => true,
            Some(appointment) => appointment.editable_by(&self.session.id, self.session.role),
        }
    }

    /// Submission gate: required fields filled, no validation errors, no known
    /// conflicts, not already submitting, and the user is authorized.
    pub fn is_valid(&self) -> bool {
        self.required_fields_filled()
            && self.errors.is_empty()
            && !self.has_conflicts()
            && !self.submitting
            && self.can_edit()
    }

    // ==================== ASYNC LOOKUPS ====================

    /// Reload the selected doctor's active branch assignments.
    async fn refresh_branches(&mut self) {
        self.branch_generation += 1;
        let generation = self.branch_generation;

        let mappings = self.api.doctor_branches(&self.doctor_id).await;
        let branches = self.api.active_branches().await;

        if generation != self.branch_generation {
            // A newer doctor selection superseded this lookup
            return;
        }

        let (mappings, branches) = match (mappings, branches) {
            (Ok(m), Ok(b)) => (m, b),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!("Branch lookup failed: {}", err);
                self.available_branches.clear();
                self.branches_loaded = false;
                return;
            }
        };

        // only active branches accept bookings
        self.available_branches = mappings
            .into_iter()
            .filter_map(|mapping| {
                branches
                    .iter()
                    .find(|b| b.id == mapping.branch_id)
                    .map(|branch| BranchChoice {
                        id: branch.id.clone(),
                        branch_code: mapping.branch_code,
                        city: branch.city.clone(),
                        state: branch.state.clone(),
                    })
            })
            .collect();
        self.branches_loaded = true;

        if self.available_branches.len() == 1 && self.branch_id.is_empty() {
            self.branch_id = self.available_branches[0].id.clone();
        } else if self.available_branches.is_empty() {
            self.notifier
                .warning("Selected doctor is not assigned to any branches");
        }
        self.revalidate(Field::BranchId);
    }

    /// Run the conflict check when doctor, patient, start, and end are all
    /// present. Stale responses are discarded by generation.
    async fn maybe_check_conflicts(&mut self) {
        let (Some(start), Some(end)) = (self.start_time, self.end_time) else {
            self.conflicts = None;
            return;
        };
        if self.doctor_id.is_empty() || self.patient_id.is_empty() {
            self.conflicts = None;
            return;
        }

        self.conflict_generation += 1;
        let generation = self.conflict_generation;

        let result = self
            .api
            .check_collision(&self.doctor_id, &self.patient_id, start, end)
            .await;

        if generation != self.conflict_generation {
            return;
        }

        match result {
            Ok(found) => {
                let relevant: Vec<AppointmentConflict> = match &self.edit {
                    Some(editing) => found.into_iter().filter(|c| c.id != editing.id).collect(),
                    None => found,
                };
                if !relevant.is_empty() {
                    self.notifier.warning(&format!(
                        "Found {} conflicting appointment(s)",
                        relevant.len()
                    ));
                }
                self.conflicts = Some(relevant);
            }
            Err(err) => {
                tracing::warn!("Conflict check failed: {}", err);
                self.conflicts = Some(Vec::new());
                self.notifier
                    .error("Failed to check for appointment conflicts");
            }
        }
    }

    // ==================== SUBMISSION ====================

    /// Create or update the appointment.
    ///
    /// The conflict check is re-run first but is advisory only: it is not
    /// atomic with the write, so the server may still reject the commit. That
    /// rejection lands in `submit_error` and the form stays open for retry.
    pub async fn submit(&mut self) -> Result<Appointment, ClientError> {
        if !self.can_edit() {
            return Err(ClientError::Unauthorized(
                "You are not allowed to edit this appointment".to_string(),
            ));
        }

        if !self.validate_all() {
            let first = self
                .required_fields()
                .into_iter()
                .find_map(|f| self.errors.get(&f).cloned())
                .unwrap_or_else(|| "Please fill all required fields".to_string());
            return Err(ClientError::Validation(first));
        }

        self.maybe_check_conflicts().await;
        if self.has_conflicts() {
            let conflicts = self.conflicts.clone().unwrap_or_default();
            self.submit_error =
                Some("Cannot create appointment due to scheduling conflicts".to_string());
            return Err(ClientError::Conflict(conflicts));
        }

        self.submitting = true;
        self.submit_error = None;

        let (Some(start), Some(end)) = (self.start_time, self.end_time) else {
            self.submitting = false;
            return Err(ClientError::Validation(
                "Start and end times are required".to_string(),
            ));
        };

        let result = match &self.edit {
            Some(editing) => {
                let input = AppointmentUpdateInput {
                    title: self.title.trim().to_string(),
                    description: self.description.trim().to_string(),
                    start_time: start,
                    end_time: end,
                    status: self.status,
                };
                self.api
                    .update_appointment(&editing.id, &input, &self.session.id)
                    .await
            }
            None => {
                let input = AppointmentInput {
                    title: self.title.trim().to_string(),
                    description: self.description.trim().to_string(),
                    start_time: start,
                    end_time: end,
                    status: self.status,
                    doctor_id: self.doctor_id.clone(),
                    patient_id: self.patient_id.clone(),
                    branch_id: (!self.branch_id.is_empty()).then(|| self.branch_id.clone()),
                };
                self.api.create_appointment(&input).await
            }
        };

        self.submitting = false;

        match result {
            Ok(appointment) => {
                let message = if self.edit.is_some() {
                    "Appointment updated successfully!"
                } else {
                    "Appointment created successfully!"
                };
                self.notifier.success(message);
                Ok(appointment)
            }
            Err(err) => {
                let message = err.user_message();
                self.submit_error = Some(message.clone());
                self.notifier.error(&message);
                Err(err)
            }
        }
    }

    // ==================== DELETION ====================

    /// First step of the two-step delete confirmation.
    pub fn request_delete(&mut self) -> bool {
        if self.edit.is_some() && self.can_edit() {
            self.delete_confirm_pending = true;
        }
        self.delete_confirm_pending
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirm_pending = false;
    }

    /// Second step: actually delete. Requires a prior [`request_delete`].
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        if !self.delete_confirm_pending {
            return Err(ClientError::Validation(
                "Deletion has not been confirmed".to_string(),
            ));
        }
        let Some(editing) = &self.edit else {
            return Err(ClientError::Validation(
                "No appointment to delete".to_string(),
            ));
        };

        let result = self
            .api
            .delete_appointment(&editing.id, &self.session.id)
            .await;
        self.delete_confirm_pending = false;

        match result {
            Ok(_) => {
                self.notifier.success("Appointment deleted successfully!");
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                self.submit_error = Some(message.clone());
                self.notifier.error(&message);
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
    use chrono::NaiveDate;

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
            id: "u1".into(),
            name: "Test User".into(),
            email: "u1@clinic.test".into(),
            role,
            phone_number: None,
            age: None,
            branch_id: None,
            branch_code: None,
        }
    }

    fn form(role: Role) -> AppointmentForm {
        AppointmentForm::empty(
            offline_api(),
            session(role),
            Notifier::new(std::time::Duration::from_secs(60)),
        )
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_appointment(doctor: &str, patient: &str) -> Appointment {
        Appointment {
            id: "a1".into(),
            title: "Checkup".into(),
            description: None,
            doctor_id: doctor.into(),
            patient_id: patient.into(),
            doctor_name: None,
            patient_name: None,
            branch_id: None,
            branch_location: None,
            start_time: at(10, 0),
            end_time: at(11, 0),
            status: AppointmentStatus::Scheduled,
            created_at: None,
            updated_at: None,
            duration: Some(1.0),
        }
    }

    #[test]
    fn test_end_must_be_after_start() {
        let mut f = form(Role::Admin);
        f.start_time = Some(at(11, 0));
        f.end_time = Some(at(10, 0));
        assert_eq!(
            f.validate_field(Field::EndTime).as_deref(),
            Some("End time must be after start time")
        );

        f.end_time = Some(at(11, 0));
        assert_eq!(
            f.validate_field(Field::EndTime).as_deref(),
            Some("End time must be after start time")
        );
    }

    #[test]
    fn test_duration_capped_at_four_hours() {
        let mut f = form(Role::Admin);
        f.start_time = Some(at(9, 0));
        f.end_time = Some(at(13, 0));
        assert!(f.validate_field(Field::EndTime).is_none(), "exactly 4h is allowed");

        f.end_time = Some(at(13, 1));
        assert_eq!(
            f.validate_field(Field::EndTime).as_deref(),
            Some("Appointment cannot exceed 4 hours")
        );
    }

    #[test]
    fn test_past_start_blocked_for_new_but_not_edits() {
        let yesterday = Local::now().naive_local() - chrono::Duration::days(1);

        let mut f = form(Role::Admin);
        f.start_time = Some(yesterday);
        assert_eq!(
            f.validate_field(Field::StartTime).as_deref(),
            Some("Cannot create appointments in the past")
        );

        f.edit = Some(sample_appointment("d1", "p1"));
        assert!(f.validate_field(Field::StartTime).is_none());
    }

    #[test]
    fn test_branch_required_only_when_doctor_has_branches() {
        let mut f = form(Role::Admin);
        assert!(f.validate_field(Field::BranchId).is_none());

        f.available_branches.push(BranchChoice {
            id: "b1".into(),
            branch_code: "NYC01".into(),
            city: "New York".into(),
            state: "NY".into(),
        });
        assert_eq!(
            f.validate_field(Field::BranchId).as_deref(),
            Some("Please select a branch location")
        );
    }

    #[test]
    fn test_errors_visible_only_after_touch() {
        let mut f = form(Role::Admin);
        f.revalidate(Field::Title);
        assert!(f.visible_error(Field::Title).is_none());

        f.touch(Field::Title);
        assert_eq!(f.visible_error(Field::Title), Some("Title is required"));
    }

    #[test]
    fn test_non_participant_cannot_edit() {
        let mut f = form(Role::Doctor);
        f.edit = Some(sample_appointment("other-doctor", "p1"));
        assert!(!f.can_edit());
        assert!(!f.is_valid());

        let mut own = form(Role::Doctor);
        own.edit = Some(sample_appointment("u1", "p1"));
        assert!(own.can_edit());
    }

    #[test]
    fn test_known_conflicts_block_submission_gate() {
        let mut f = form(Role::Admin);
        f.title = "Visit".into();
        f.doctor_id = "d1".into();
        f.patient_id = "p1".into();
        f.start_time = Some(at(10, 0));
        f.end_time = Some(at(11, 0));
        assert!(f.is_valid());

        f.conflicts = Some(vec![AppointmentConflict {
            id: "a9".into(),
            title: "Other".into(),
            start_time: at(10, 30),
            end_time: at(11, 30),
            doctor_name: None,
            patient_name: None,
        }]);
        assert!(!f.is_valid());
    }

    #[test]
    fn test_delete_requires_confirmation_step() {
        let mut f = form(Role::Admin);
        assert!(!f.request_delete(), "nothing to delete on a create form");

        f.edit = Some(sample_appointment("d1", "p1"));
        assert!(f.request_delete());
        f.cancel_delete();
        assert!(!f.delete_confirm_pending());
    }
}
