use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    AppointmentRecord, CommitteeRecord, DecisionKind, DecisionRecord, DecisionStatus, NewDecision,
};
use super::forms::{AppointmentForm, CommitteeSubmission, DecisionFormError};
use super::repository::DecisionRepository;
use super::roster::{validate_roster, RosterViolation};
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::SessionUser;

/// Intake and retrieval of decision records for the signed-in user.
pub struct DecisionService<R> {
    repository: Arc<R>,
}

impl<R> DecisionService<R>
where
    R: DecisionRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and store a committee decision with the status chosen by its action.
    pub fn submit_committee(
        &self,
        actor: &SessionUser,
        fields: &HashMap<String, String>,
    ) -> Result<CommitteeRecord, DecisionServiceError> {
        let submission = CommitteeSubmission::from_fields(fields).inspect_err(|err| {
            warn!(user_id = actor.user_id.0, error = %err, "committee form rejected");
        })?;

        if let Err(violation) = validate_roster(&submission.members) {
            warn!(user_id = actor.user_id.0, error = %violation, "committee roster rejected");
            return Err(violation.into());
        }

        let status = submission.action.status();
        let decision = submission.into_decision()?;
        let record = self.repository.insert_committee(NewDecision {
            user_id: actor.user_id,
            governorate: actor.governorate.clone(),
            status,
            decision,
        })?;

        info!(
            decision_id = record.meta.id,
            decision_number = %record.decision.decision_number,
            status = status.as_str(),
            user = %actor.full_name,
            "stored committee decision"
        );
        Ok(record)
    }

    pub fn submit_appointment(
        &self,
        actor: &SessionUser,
        form: AppointmentForm,
    ) -> Result<AppointmentRecord, DecisionServiceError> {
        let (action, decision) = form.into_decision().inspect_err(|err| {
            warn!(user_id = actor.user_id.0, error = %err, "appointment form rejected");
        })?;

        let status = action.status();
        let record = self.repository.insert_appointment(NewDecision {
            user_id: actor.user_id,
            governorate: actor.governorate.clone(),
            status,
            decision,
        })?;

        info!(
            decision_id = record.meta.id,
            decision_number = %record.decision.decision_number,
            status = status.as_str(),
            user = %actor.full_name,
            "stored appointment decision"
        );
        Ok(record)
    }

    /// Most recent `created` decision of the given kind owned by the actor.
    pub fn latest_created(
        &self,
        actor: &SessionUser,
        kind: DecisionKind,
    ) -> Result<Option<DecisionRecord>, DecisionServiceError> {
        let latest = match kind {
            DecisionKind::Committee => self
                .repository
                .committees_by_status(actor.user_id, DecisionStatus::Created)?
                .into_iter()
                .next()
                .map(DecisionRecord::Committee),
            DecisionKind::Appointment => self
                .repository
                .appointments_by_status(actor.user_id, DecisionStatus::Created)?
                .into_iter()
                .next()
                .map(DecisionRecord::Appointment),
        };
        Ok(latest)
    }

    /// Drafts of the actor: committees first, then appointments.
    pub fn drafts(&self, actor: &SessionUser) -> Result<Vec<DecisionRecord>, DecisionServiceError> {
        let committees = self
            .repository
            .committees_by_status(actor.user_id, DecisionStatus::Draft)?;
        let appointments = self
            .repository
            .appointments_by_status(actor.user_id, DecisionStatus::Draft)?;

        Ok(committees
            .into_iter()
            .map(DecisionRecord::Committee)
            .chain(appointments.into_iter().map(DecisionRecord::Appointment))
            .collect())
    }

    /// Delete one of the actor's own drafts. Anything else is reported as not found.
    pub fn delete_draft(
        &self,
        actor: &SessionUser,
        decision_number: &str,
        draft_type: &str,
    ) -> Result<(), DecisionServiceError> {
        let kind = DecisionKind::parse(draft_type)
            .ok_or_else(|| DecisionServiceError::UnknownKind(draft_type.to_string()))?;

        if !self
            .repository
            .delete_draft(actor.user_id, kind, decision_number)?
        {
            warn!(
                user_id = actor.user_id.0,
                decision_number,
                kind = kind.as_str(),
                "draft delete refused"
            );
            return Err(DecisionServiceError::DraftNotFound);
        }

        info!(
            user_id = actor.user_id.0,
            decision_number,
            kind = kind.as_str(),
            "deleted draft decision"
        );
        Ok(())
    }

    /// Decision by id regardless of owner, for operator tooling.
    pub fn find(&self, kind: DecisionKind, id: i64) -> Result<DecisionRecord, DecisionServiceError> {
        let record = match kind {
            DecisionKind::Committee => self.repository.committee(id)?.map(DecisionRecord::Committee),
            DecisionKind::Appointment => self
                .repository
                .appointment(id)?
                .map(DecisionRecord::Appointment),
        };
        record.ok_or(DecisionServiceError::RecordNotFound)
    }

    /// Decision by id, visible to its owner only.
    pub fn find_owned(
        &self,
        actor: &SessionUser,
        kind: DecisionKind,
        id: i64,
    ) -> Result<DecisionRecord, DecisionServiceError> {
        let record = self.find(kind, id)?;
        if record.meta().user_id != actor.user_id {
            return Err(DecisionServiceError::RecordNotFound);
        }
        Ok(record)
    }
}

/// Error raised by the decision service.
#[derive(Debug, thiserror::Error)]
pub enum DecisionServiceError {
    #[error(transparent)]
    Form(#[from] DecisionFormError),
    #[error(transparent)]
    Roster(#[from] RosterViolation),
    #[error("unknown decision type `{0}`")]
    UnknownKind(String),
    #[error("draft not found")]
    DraftNotFound,
    #[error("decision not found")]
    RecordNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
