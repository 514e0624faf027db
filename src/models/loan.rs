//! Loan record model and derived status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Persisted loan lifecycle state. `Active → Returned` is the only
/// transition and it is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoredStatus {
    Active,
    Returned,
}

/// Display-time loan classification. `Overdue` is derived from `due_at`
/// against a reference instant and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Active => "Active",
            LoanStatus::Overdue => "Overdue",
            LoanStatus::Returned => "Returned",
        };
        write!(f, "{}", label)
    }
}

/// Loan record as stored in the ledger
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanRecord {
    pub id: i32,
    pub item_id: i32,
    pub borrower_id: i32,
    pub checkout_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub stored_status: StoredStatus,
    /// Opaque reference to the captured custody proof.
    pub custody_proof_ref: String,
    pub accessories_note: Option<String>,
}

impl LoanRecord {
    /// Classify this loan as of the given instant.
    ///
    /// A recorded return wins over any due date; an unreturned loan is
    /// overdue once its due date lies strictly before `as_of`.
    pub fn status_as_of(&self, as_of: DateTime<Utc>) -> LoanStatus {
        if self.returned_at.is_some() {
            return LoanStatus::Returned;
        }
        match self.due_at {
            Some(due) if due < as_of => LoanStatus::Overdue,
            _ => LoanStatus::Active,
        }
    }
}

/// Payload for inserting a new loan into the ledger
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub item_id: i32,
    pub borrower_id: i32,
    pub checkout_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub custody_proof_ref: String,
    pub accessories_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn loan(due_at: Option<DateTime<Utc>>, returned_at: Option<DateTime<Utc>>) -> LoanRecord {
        LoanRecord {
            id: 1,
            item_id: 10,
            borrower_id: 20,
            checkout_at: Utc::now() - Duration::days(30),
            due_at,
            returned_at,
            stored_status: if returned_at.is_some() {
                StoredStatus::Returned
            } else {
                StoredStatus::Active
            },
            custody_proof_ref: "ref".to_string(),
            accessories_note: None,
        }
    }

    #[test]
    fn overdue_when_due_date_passed_and_not_returned() {
        let now = Utc::now();
        let l = loan(Some(now - Duration::days(1)), None);
        assert_eq!(l.status_as_of(now), LoanStatus::Overdue);
    }

    #[test]
    fn returned_wins_over_past_due_date() {
        let now = Utc::now();
        let l = loan(Some(now - Duration::days(7)), Some(now - Duration::days(2)));
        assert_eq!(l.status_as_of(now), LoanStatus::Returned);
    }

    #[test]
    fn active_when_due_date_in_future() {
        let now = Utc::now();
        let l = loan(Some(now + Duration::days(7)), None);
        assert_eq!(l.status_as_of(now), LoanStatus::Active);
    }

    #[test]
    fn active_without_due_date() {
        let now = Utc::now();
        let l = loan(None, None);
        assert_eq!(l.status_as_of(now), LoanStatus::Active);
    }

    #[test]
    fn due_exactly_at_as_of_is_not_overdue() {
        let now = Utc::now();
        let l = loan(Some(now), None);
        assert_eq!(l.status_as_of(now), LoanStatus::Active);
    }
}
