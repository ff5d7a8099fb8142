//! Typed client for the clinic appointment scheduling backend.
//!
//! Wraps the backend's GraphQL schema in a session store, a cached operation
//! catalog, and the screen-level workflows (appointment form, list, calendar,
//! admin, records) that an embedding UI drives.

pub mod admin;
pub mod cache;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod operations;
pub mod records;
pub mod session;
pub mod token;
pub mod views;
pub mod workflow;


use std::sync::Arc;

use crate::admin::{AssignmentAdmin, BranchAdmin, UserAdmin};
use crate::cache::QueryCache;
use crate::config::Config;
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::models::Appointment;
use crate::notify::Notifier;
use crate::operations::Api;
use crate::records::RecordsView;
use crate::session::{Session, SessionHandle, SessionStore};
use crate::token::{FileTokenStore, TokenStore};
use crate::views::{AppointmentList, CalendarView, SlotSelection};
use crate::workflow::AppointmentForm;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The assembled client: one gateway, one cache, one session.
///
/// Screen objects built from it share these through `Arc`, so a 401 observed
/// on any request tears down the session everywhere at once.
pub struct ClinicClient {
    api: Arc<Api>,
    sessions: SessionStore,
    notifier: Notifier,
    handle: SessionHandle,
}

impl ClinicClient {
    /// Build a client persisting its token at the configured path.
    pub fn new(config: &Config) -> Self {
        Self::with_token_store(config, Arc::new(FileTokenStore::new(&config.token_path)))
    }

    /// Build a client over an explicit token store.
    pub fn with_token_store(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        let cache = Arc::new(QueryCache::new());
        let handle: SessionHandle = Arc::new(std::sync::RwLock::new(None));
        let notifier = Notifier::new(config.toast_duration);

        let gateway = Arc::new(Gateway::new(
            &config.graphql_url,
            Arc::clone(&tokens),
            Arc::clone(&cache),
            Arc::clone(&handle),
        ));
        let api = Arc::new(Api::new(gateway, Arc::clone(&cache)));

        let sessions = SessionStore::new(
            Arc::clone(&api),
            tokens,
            cache,
            notifier.clone(),
            Arc::clone(&handle),
        );

        Self {
            api,
            sessions,
            notifier,
            handle,
        }
    }

    pub fn api(&self) -> &Arc<Api> {
        &self.api
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn require_session(&self) -> Result<Session, ClientError> {
        self.handle
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::Unauthorized("Not logged in".to_string()))
    }

    // ==================== SCREEN BUILDERS ====================

    pub fn appointment_list(&self) -> Result<AppointmentList, ClientError> {
        Ok(AppointmentList::new(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
        ))
    }

    pub fn calendar(&self, today: chrono::NaiveDate) -> Result<CalendarView, ClientError> {
        Ok(CalendarView::new(
            Arc::clone(&self.api),
            self.require_session()?,
            today,
        ))
    }

    pub async fn new_appointment(&self) -> Result<AppointmentForm, ClientError> {
        Ok(AppointmentForm::create(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
        )
        .await)
    }

    /// Appointment form pre-filled from a calendar slot click.
    pub async fn new_appointment_in_slot(
        &self,
        slot: SlotSelection,
    ) -> Result<AppointmentForm, ClientError> {
        Ok(AppointmentForm::create_with_window(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
            slot.start,
            slot.end,
        )
        .await)
    }

    pub async fn edit_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<AppointmentForm, ClientError> {
        Ok(AppointmentForm::edit(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
            appointment,
        )
        .await)
    }

    pub fn branch_admin(&self) -> Result<BranchAdmin, ClientError> {
        Ok(BranchAdmin::new(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
        ))
    }

    pub fn assignment_admin(&self) -> Result<AssignmentAdmin, ClientError> {
        Ok(AssignmentAdmin::new(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
        ))
    }

    pub fn user_admin(&self) -> Result<UserAdmin, ClientError> {
        Ok(UserAdmin::new(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
        ))
    }

    pub fn records(&self) -> Result<RecordsView, ClientError> {
        Ok(RecordsView::new(
            Arc::clone(&self.api),
            self.require_session()?,
            self.notifier.clone(),
        ))
    }
}
