//! Admin screens: branch management, staff/branch assignments, and user
//! administration.
//!
//! Each screen guards on the session's capabilities before performing writes,
//! mirroring the server's own authorization so a misconfigured UI cannot even
//! attempt a forbidden mutation.

mod assignments;
mod branches;
mod users;

pub use assignments::AssignmentAdmin;
pub use branches::{BranchAdmin, BranchDraft};
pub use users::UserAdmin;

use crate::errors::ClientError;
use crate::session::Session;

fn require_admin(session: &Session) -> Result<(), ClientError> {
    if session.capabilities().is_admin {
        Ok(())
    } else {
        Err(ClientError::Unauthorized(
            "Administrator access required".to_string(),
        ))
    }
}
