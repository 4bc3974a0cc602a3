//! Prerequisite-list semantics.
//!
//! The prerequisite list is an ordered sequence of subject ids with two
//! invariants: a subject never lists itself, and no id appears twice.
//! Additions that would violate either invariant are silently skipped
//! rather than rejected -- bulk adds from clients are tolerated as
//! partial no-ops, and callers rely on that.

use crate::types::DbId;

/// Merge a batch of prerequisite additions into the current list.
///
/// Returns `(merged, appended)` where `appended` holds only the ids that
/// were actually added, in order. Skipped entries (the subject's own id,
/// ids already present, repeats within the batch) produce no error.
pub fn merge_prerequisites(
    subject_id: DbId,
    current: &[DbId],
    additions: &[DbId],
) -> (Vec<DbId>, Vec<DbId>) {
    let mut merged = current.to_vec();
    let mut appended = Vec::new();
    for &id in additions {
        if id == subject_id || merged.contains(&id) {
            continue;
        }
        merged.push(id);
        appended.push(id);
    }
    (merged, appended)
}

/// Remove a prerequisite from the list, preserving order.
///
/// Returns `None` when the id is not present, so callers can skip the
/// write entirely; absence is a no-op, not an error.
pub fn remove_prerequisite(current: &[DbId], prerequisite_id: DbId) -> Option<Vec<DbId>> {
    if !current.contains(&prerequisite_id) {
        return None;
    }
    Some(
        current
            .iter()
            .copied()
            .filter(|&id| id != prerequisite_id)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_new_prerequisites_in_order() {
        let (merged, appended) = merge_prerequisites(1, &[2], &[3, 4]);
        assert_eq!(merged, vec![2, 3, 4]);
        assert_eq!(appended, vec![3, 4]);
    }

    #[test]
    fn self_reference_is_silently_skipped() {
        let (merged, appended) = merge_prerequisites(1, &[2], &[1]);
        assert_eq!(merged, vec![2]);
        assert!(appended.is_empty());
    }

    #[test]
    fn existing_prerequisite_is_silently_skipped() {
        let (merged, appended) = merge_prerequisites(1, &[2, 3], &[3]);
        assert_eq!(merged, vec![2, 3]);
        assert!(appended.is_empty());
    }

    #[test]
    fn duplicates_within_batch_are_added_once() {
        let (merged, appended) = merge_prerequisites(1, &[], &[5, 5, 6, 5]);
        assert_eq!(merged, vec![5, 6]);
        assert_eq!(appended, vec![5, 6]);
    }

    #[test]
    fn mixed_batch_keeps_only_valid_entries() {
        let (merged, _) = merge_prerequisites(1, &[2], &[1, 2, 3, 3]);
        assert_eq!(merged, vec![2, 3]);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (merged, appended) = merge_prerequisites(1, &[2], &[]);
        assert_eq!(merged, vec![2]);
        assert!(appended.is_empty());
    }

    #[test]
    fn remove_existing_prerequisite() {
        assert_eq!(remove_prerequisite(&[2, 3, 4], 3), Some(vec![2, 4]));
    }

    #[test]
    fn remove_absent_prerequisite_is_none() {
        assert_eq!(remove_prerequisite(&[2, 3], 9), None);
    }

    #[test]
    fn remove_from_empty_list_is_none() {
        assert_eq!(remove_prerequisite(&[], 1), None);
    }
}
