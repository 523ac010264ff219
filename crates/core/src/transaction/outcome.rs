use serde::Serialize;

use super::TransactionStatus;

/// A consistent `(status, success)` pair.
///
/// Only constructible through [`classify`] or [`Outcome::from_status`], both
/// of which derive `success` from the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    status: TransactionStatus,
    success: bool,
}

impl Outcome {
    pub fn created() -> Self {
        Self::from_status(TransactionStatus::Created)
    }

    pub fn conflict() -> Self {
        Self::from_status(TransactionStatus::Conflict)
    }

    pub fn from_status(status: TransactionStatus) -> Self {
        Self {
            status,
            success: status.is_success(),
        }
    }

    pub fn status(self) -> TransactionStatus {
        self.status
    }

    pub fn success(self) -> bool {
        self.success
    }
}

/// Classify the outcome of a create operation.
///
/// Applied both to a whole batch (global errors) and to each entity (its own
/// errors); the two results are independent.
pub fn classify(has_errors: bool) -> Outcome {
    if has_errors {
        Outcome::conflict()
    } else {
        Outcome::created()
    }
}
