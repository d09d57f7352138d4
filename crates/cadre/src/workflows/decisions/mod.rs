//! Committee-formation and appointment decisions.
//!
//! A decision is stored once with the status chosen by the submit button
//! (`create_decision`, `save_draft`, `refer_to`, `next`). Stored decisions are
//! never edited; only drafts can be deleted, and only by their owner.

pub mod domain;
pub mod forms;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;
#[cfg(test)]
mod tests;

pub use domain::{
    AppointmentAttachments, AppointmentDecision, AppointmentRecord, CommitteeDecision,
    CommitteeMember, CommitteeRecord, DecisionAction, DecisionKind, DecisionRecord,
    DecisionStatus, MemberSlot, NewDecision, RecordMeta,
};
pub use forms::{AppointmentForm, CommitteeSubmission, DecisionFormError};
pub use repository::DecisionRepository;
pub use roster::{validate_roster, RosterViolation};
pub use router::decision_router;
pub use service::{DecisionService, DecisionServiceError};
