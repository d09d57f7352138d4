use super::domain::{
    AppointmentDecision, AppointmentRecord, CommitteeDecision, CommitteeRecord, DecisionKind,
    DecisionStatus, NewDecision,
};
use crate::workflows::accounts::UserId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for committee and appointment decisions.
///
/// Listings are ordered newest first.
pub trait DecisionRepository: Send + Sync {
    fn insert_committee(
        &self,
        decision: NewDecision<CommitteeDecision>,
    ) -> Result<CommitteeRecord, RepositoryError>;

    fn insert_appointment(
        &self,
        decision: NewDecision<AppointmentDecision>,
    ) -> Result<AppointmentRecord, RepositoryError>;

    fn committees_by_status(
        &self,
        owner: UserId,
        status: DecisionStatus,
    ) -> Result<Vec<CommitteeRecord>, RepositoryError>;

    fn appointments_by_status(
        &self,
        owner: UserId,
        status: DecisionStatus,
    ) -> Result<Vec<AppointmentRecord>, RepositoryError>;

    fn committee(&self, id: i64) -> Result<Option<CommitteeRecord>, RepositoryError>;

    fn appointment(&self, id: i64) -> Result<Option<AppointmentRecord>, RepositoryError>;

    /// Remove the newest draft matching the number, kind and owner.
    /// Returns `false` when no such draft exists.
    fn delete_draft(
        &self,
        owner: UserId,
        kind: DecisionKind,
        decision_number: &str,
    ) -> Result<bool, RepositoryError>;
}
