use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::accounts::UserId;

/// The two decision documents the portal issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Committee,
    Appointment,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Committee => "committee",
            DecisionKind::Appointment => "appointment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "committee" => Some(DecisionKind::Committee),
            "appointment" => Some(DecisionKind::Appointment),
            _ => None,
        }
    }
}

/// Status flag stamped on a decision when it is stored. It is never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Draft,
    Created,
    Referred,
    Next,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Draft => "draft",
            DecisionStatus::Created => "created",
            DecisionStatus::Referred => "referred",
            DecisionStatus::Next => "next",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(DecisionStatus::Draft),
            "created" => Some(DecisionStatus::Created),
            "referred" => Some(DecisionStatus::Referred),
            "next" => Some(DecisionStatus::Next),
            _ => None,
        }
    }
}

/// Submit button pressed on a decision form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    CreateDecision,
    SaveDraft,
    ReferTo,
    Next,
}

impl DecisionAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "create_decision" => Some(DecisionAction::CreateDecision),
            "save_draft" => Some(DecisionAction::SaveDraft),
            "refer_to" => Some(DecisionAction::ReferTo),
            "next" => Some(DecisionAction::Next),
            _ => None,
        }
    }

    pub fn status(&self) -> DecisionStatus {
        match self {
            DecisionAction::CreateDecision => DecisionStatus::Created,
            DecisionAction::SaveDraft => DecisionStatus::Draft,
            DecisionAction::ReferTo => DecisionStatus::Referred,
            DecisionAction::Next => DecisionStatus::Next,
        }
    }
}

/// Seats on a leadership committee, in the order they appear on the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSlot {
    Chairperson,
    AdminMember,
    HrMember,
    ItMember,
    LegalMember,
    OtherMember1,
    OtherMember2,
    Secretary,
    SecretaryMember1,
    SecretaryMember2,
}

impl MemberSlot {
    pub const ALL: [MemberSlot; 10] = [
        MemberSlot::Chairperson,
        MemberSlot::AdminMember,
        MemberSlot::HrMember,
        MemberSlot::ItMember,
        MemberSlot::LegalMember,
        MemberSlot::OtherMember1,
        MemberSlot::OtherMember2,
        MemberSlot::Secretary,
        MemberSlot::SecretaryMember1,
        MemberSlot::SecretaryMember2,
    ];

    /// Prefix of the `<prefix>_name`, `<prefix>_national_id` and `<prefix>_phone` form fields.
    pub fn field_prefix(&self) -> &'static str {
        match self {
            MemberSlot::Chairperson => "chairperson",
            MemberSlot::AdminMember => "admin_member",
            MemberSlot::HrMember => "hr_member",
            MemberSlot::ItMember => "it_member",
            MemberSlot::LegalMember => "legal_member",
            MemberSlot::OtherMember1 => "other_member_1",
            MemberSlot::OtherMember2 => "other_member_2",
            MemberSlot::Secretary => "secretary",
            MemberSlot::SecretaryMember1 => "secretary_member_1",
            MemberSlot::SecretaryMember2 => "secretary_member_2",
        }
    }

    /// Title printed on the decision document.
    pub fn title(&self) -> &'static str {
        match self {
            MemberSlot::Chairperson => "رئيس اللجنة",
            MemberSlot::AdminMember => "عضو الإدارة",
            MemberSlot::HrMember => "عضو الموارد البشرية",
            MemberSlot::ItMember => "عضو تكنولوجيا المعلومات",
            MemberSlot::LegalMember => "عضو الشؤون القانونية",
            MemberSlot::OtherMember1 => "عضو (1)",
            MemberSlot::OtherMember2 => "عضو (2)",
            MemberSlot::Secretary => "أمين اللجنة",
            MemberSlot::SecretaryMember1 => "عضو الأمانة (1)",
            MemberSlot::SecretaryMember2 => "عضو الأمانة (2)",
        }
    }

    pub fn is_secretariat(&self) -> bool {
        matches!(
            self,
            MemberSlot::Secretary | MemberSlot::SecretaryMember1 | MemberSlot::SecretaryMember2
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
    pub slot: MemberSlot,
    pub name: String,
    pub national_id: String,
    pub phone: String,
}

/// Decision forming a leadership-posts committee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeDecision {
    pub decision_number: String,
    pub decision_date: NaiveDate,
    pub preamble: String,
    pub members: Vec<CommitteeMember>,
    pub article_one_text: String,
    pub article_two_text: String,
    pub committee_tasks: String,
    pub article_four: String,
    pub competent_authority: String,
    pub authority_approval: String,
}

impl CommitteeDecision {
    /// Voting members followed by the secretariat, in slot order.
    pub fn board(&self) -> impl Iterator<Item = &CommitteeMember> {
        self.members.iter().filter(|member| !member.slot.is_secretariat())
    }

    pub fn secretariat(&self) -> impl Iterator<Item = &CommitteeMember> {
        self.members.iter().filter(|member| member.slot.is_secretariat())
    }
}

/// File names (as returned by the upload endpoint) attached to an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentAttachments {
    pub announcement_file: Option<String>,
    pub candidate_file: Option<String>,
    pub decision_file: Option<String>,
}

/// Decision appointing a candidate to an announced post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDecision {
    pub announcement_number: String,
    pub candidate_code: String,
    pub decision_number: String,
    pub decision_date: NaiveDate,
    pub article_one_text: String,
    pub article_two_text: String,
    pub article_three_text: String,
    pub competent_authority: String,
    pub authority_approval: String,
    pub files: AppointmentAttachments,
}

/// Ownership and lifecycle columns shared by both decision tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMeta {
    pub id: i64,
    pub user_id: UserId,
    pub governorate: String,
    pub status: DecisionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitteeRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub decision: CommitteeDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRecord {
    #[serde(flatten)]
    pub meta: RecordMeta,
    #[serde(flatten)]
    pub decision: AppointmentDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionRecord {
    Committee(CommitteeRecord),
    Appointment(AppointmentRecord),
}

impl DecisionRecord {
    pub fn kind(&self) -> DecisionKind {
        match self {
            DecisionRecord::Committee(_) => DecisionKind::Committee,
            DecisionRecord::Appointment(_) => DecisionKind::Appointment,
        }
    }

    pub fn meta(&self) -> &RecordMeta {
        match self {
            DecisionRecord::Committee(record) => &record.meta,
            DecisionRecord::Appointment(record) => &record.meta,
        }
    }

    pub fn decision_number(&self) -> &str {
        match self {
            DecisionRecord::Committee(record) => &record.decision.decision_number,
            DecisionRecord::Appointment(record) => &record.decision.decision_number,
        }
    }
}

/// Insert payload; id and timestamp are assigned by storage.
#[derive(Debug, Clone)]
pub struct NewDecision<T> {
    pub user_id: UserId,
    pub governorate: String,
    pub status: DecisionStatus,
    pub decision: T,
}
