//! Role and specialist-scoping policy for subject management.
//!
//! Every write operation on a subject funnels through the same two
//! decisions, so they live here as pure functions instead of being
//! repeated per handler:
//!
//! - [`authorize_create`]: may this caller create a subject with the
//!   requested specialist assignments?
//! - [`authorize_manage`]: may this caller mutate (update, delete,
//!   activate, deactivate, edit prerequisites of) this existing subject?
//!
//! Admins are unrestricted. Teachers are scoped to their assigned
//! specialist set. Every other role is rejected.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_TEACHER};
use crate::types::DbId;

/// Authorize subject creation.
///
/// Teachers must have at least one assigned specialist, and every
/// specialist requested for the new subject must be among their own.
/// An empty request list is fine as long as the teacher has assignments.
pub fn authorize_create(
    role: &str,
    assigned: &HashSet<DbId>,
    requested: &[DbId],
) -> Result<(), CoreError> {
    if role == ROLE_ADMIN {
        return Ok(());
    }
    if role != ROLE_TEACHER {
        return Err(CoreError::Forbidden(
            "Only admin and teacher can access this resource".into(),
        ));
    }
    if assigned.is_empty() {
        return Err(CoreError::Forbidden(
            "Teacher must be assigned to at least one specialist".into(),
        ));
    }
    if requested.iter().any(|id| !assigned.contains(id)) {
        return Err(CoreError::Forbidden(
            "Teacher is not assigned to the requested specialists".into(),
        ));
    }
    Ok(())
}

/// Authorize mutation of an existing subject.
///
/// Teachers may act only when the subject's *current* specialist list
/// intersects their own assignments. A subject with no specialists at
/// all is manageable by any teacher that has at least one assignment.
///
/// Note: when an update replaces the specialist list, the check still
/// runs against the pre-update list only. That is the system's
/// long-standing contract (clients rely on it), even though it lets a
/// teacher hand a subject off to specialists outside their own set.
pub fn authorize_manage(
    role: &str,
    assigned: &HashSet<DbId>,
    current: &[DbId],
) -> Result<(), CoreError> {
    if role == ROLE_ADMIN {
        return Ok(());
    }
    if role != ROLE_TEACHER {
        return Err(CoreError::Forbidden(
            "Only admin and teacher can access this resource".into(),
        ));
    }
    if assigned.is_empty() {
        return Err(CoreError::Forbidden(
            "Teacher must be assigned to at least one specialist".into(),
        ));
    }
    if current.is_empty() || current.iter().any(|id| assigned.contains(id)) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Teacher is not assigned to any of this subject's specialists".into(),
        ))
    }
}
