//! Appointment list with multi-select bulk deletion.

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::ClientError;
use crate::models::Appointment;
use crate::notify::Notifier;
use crate::operations::Api;
use crate::session::Session;

use super::ViewData;

/// The tabular appointment view.
pub struct AppointmentList {
    data: ViewData,
    notifier: Notifier,
    selected: HashSet<String>,
    delete_confirm_pending: bool,
}

impl AppointmentList {
    pub fn new(api: Arc<Api>, session: Session, notifier: Notifier) -> Self {
        Self {
            data: ViewData::new(api, session),
            notifier,
            selected: HashSet::new(),
            delete_confirm_pending: false,
        }
    }

    /// Fetch the appointments this session may see. Clears any selection,
    /// since selected rows may no longer exist.
    pub async fn reload(&mut self) -> Result<(), ClientError> {
        self.data.reload().await?;
        self.selected.clear();
        self.delete_confirm_pending = false;
        Ok(())
    }

    /// Restrict the display to appointments involving one user.
    /// Ignored for sessions without full access.
    pub fn set_user_filter(&mut self, user_id: Option<&str>) {
        self.data.set_user_filter(user_id);
        self.selected.clear();
        self.delete_confirm_pending = false;
    }

    /// Rows after the display filter, sorted by start time ascending.
    pub fn rows(&self) -> Vec<&Appointment> {
        let mut rows = self.data.visible();
        rows.sort_by_key(|a| a.start_time);
        rows
    }

    // ==================== SELECTION ====================

    /// Toggle one row. Rows the session cannot edit are not selectable.
    pub fn toggle_selection(&mut self, appointment_id: &str) -> bool {
        let Some(appointment) = self
            .data
            .visible()
            .into_iter()
            .find(|a| a.id == appointment_id)
        else {
            return false;
        };
        if !appointment.editable_by(&self.data.session.id, self.data.session.role) {
            return false;
        }

        if !self.selected.remove(appointment_id) {
            self.selected.insert(appointment_id.to_string());
        }
        // a changed selection invalidates any pending confirmation
        self.delete_confirm_pending = false;
        true
    }

    /// Select every editable visible row, or clear if all are selected.
    pub fn toggle_select_all(&mut self) {
        let editable: HashSet<String> = self
            .data
            .visible()
            .into_iter()
            .filter(|a| a.editable_by(&self.data.session.id, self.data.session.role))
            .map(|a| a.id.clone())
            .collect();

        if self.selected == editable {
            self.selected.clear();
        } else {
            self.selected = editable;
        }
        self.delete_confirm_pending = false;
    }

    pub fn is_selected(&self, appointment_id: &str) -> bool {
        self.selected.contains(appointment_id)
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    // ==================== BULK DELETE ====================

    /// First step of the two-step bulk delete. Requires a non-empty selection.
    pub fn request_delete(&mut self) -> bool {
        if !self.selected.is_empty() {
            self.delete_confirm_pending = true;
        }
        self.delete_confirm_pending
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirm_pending = false;
    }

    pub fn delete_confirm_pending(&self) -> bool {
        self.delete_confirm_pending
    }

    /// Second step: delete every selected appointment, then reload.
    /// Requires a prior [`request_delete`].
    pub async fn confirm_delete(&mut self) -> Result<(), ClientError> {
        if !self.delete_confirm_pending {
            return Err(ClientError::Validation(
                "Deletion has not been confirmed".to_string(),
            ));
        }
        self.delete_confirm_pending = false;

        let ids: Vec<String> = self.selected.iter().cloned().collect();
        let count = ids.len();
        match self
            .data
            .api
            .delete_multiple_appointments(&ids, &self.data.session.id)
            .await
        {
            Ok(_) => {
                self.notifier
                    .success(&format!("{} appointment(s) deleted successfully!", count));
                self.reload().await
            }
            Err(err) => {
                self.notifier.error(&err.user_message());
                Err(err)
            }
        }
    }
}
