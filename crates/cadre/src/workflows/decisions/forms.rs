//! Parsing of the two decision forms into typed submissions.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use super::domain::{
    AppointmentAttachments, AppointmentDecision, CommitteeDecision, CommitteeMember,
    DecisionAction, MemberSlot,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionFormError {
    #[error("{0} is required")]
    MissingField(String),
    #[error("decision date `{0}` must use the YYYY-MM-DD format")]
    InvalidDate(String),
    #[error("choose an action: create_decision, save_draft, refer_to or next")]
    MissingAction,
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}

/// Committee form fields before the roster is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitteeSubmission {
    pub action: DecisionAction,
    pub decision_number: String,
    pub raw_decision_date: String,
    pub preamble: String,
    pub members: Vec<CommitteeMember>,
    pub article_one_text: String,
    pub article_two_text: String,
    pub committee_tasks: String,
    pub article_four: String,
    pub competent_authority: String,
    pub authority_approval: String,
}

impl CommitteeSubmission {
    /// Read every named field of the committee form. Unknown keys are ignored.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, DecisionFormError> {
        let action = parse_action(fields.get("action").map(String::as_str))?;

        let mut members = Vec::with_capacity(MemberSlot::ALL.len());
        for slot in MemberSlot::ALL {
            let prefix = slot.field_prefix();
            members.push(CommitteeMember {
                slot,
                name: required(fields, &format!("{prefix}_name"))?,
                national_id: required(fields, &format!("{prefix}_national_id"))?,
                phone: required(fields, &format!("{prefix}_phone"))?,
            });
        }

        Ok(Self {
            action,
            decision_number: required(fields, "decision_number")?,
            raw_decision_date: required(fields, "decision_date")?,
            preamble: required(fields, "preamble")?,
            members,
            article_one_text: required(fields, "article_one_text")?,
            article_two_text: required(fields, "article_two_text")?,
            committee_tasks: required(fields, "committee_tasks")?,
            article_four: required(fields, "article_four")?,
            competent_authority: required(fields, "competent_authority")?,
            authority_approval: required(fields, "authority_approval")?,
        })
    }

    pub fn into_decision(self) -> Result<CommitteeDecision, DecisionFormError> {
        Ok(CommitteeDecision {
            decision_number: self.decision_number,
            decision_date: parse_decision_date(&self.raw_decision_date)?,
            preamble: self.preamble,
            members: self.members,
            article_one_text: self.article_one_text,
            article_two_text: self.article_two_text,
            committee_tasks: self.committee_tasks,
            article_four: self.article_four,
            competent_authority: self.competent_authority,
            authority_approval: self.authority_approval,
        })
    }
}

/// Appointment form; only the decision number and date are mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentForm {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub announcement_number: String,
    #[serde(default)]
    pub candidate_code: String,
    #[serde(default)]
    pub decision_number: String,
    #[serde(default)]
    pub decision_date: String,
    #[serde(default)]
    pub article_one_text: String,
    #[serde(default)]
    pub article_two_text: String,
    #[serde(default)]
    pub article_three_text: String,
    #[serde(default)]
    pub competent_authority: String,
    #[serde(default)]
    pub authority_approval: String,
    #[serde(default)]
    pub announcement_file: Option<String>,
    #[serde(default)]
    pub candidate_file: Option<String>,
    #[serde(default)]
    pub decision_file: Option<String>,
}

impl AppointmentForm {
    pub fn into_decision(self) -> Result<(DecisionAction, AppointmentDecision), DecisionFormError> {
        let action = parse_action(self.action.as_deref())?;
        let decision_date = parse_decision_date(&self.decision_date)?;
        let decision_number = self.decision_number.trim().to_string();
        if decision_number.is_empty() {
            return Err(DecisionFormError::MissingField("decision_number".to_string()));
        }

        Ok((
            action,
            AppointmentDecision {
                announcement_number: self.announcement_number.trim().to_string(),
                candidate_code: self.candidate_code.trim().to_string(),
                decision_number,
                decision_date,
                article_one_text: self.article_one_text,
                article_two_text: self.article_two_text,
                article_three_text: self.article_three_text,
                competent_authority: self.competent_authority,
                authority_approval: self.authority_approval,
                files: AppointmentAttachments {
                    announcement_file: non_blank(self.announcement_file),
                    candidate_file: non_blank(self.candidate_file),
                    decision_file: non_blank(self.decision_file),
                },
            },
        ))
    }
}

fn parse_action(raw: Option<&str>) -> Result<DecisionAction, DecisionFormError> {
    match raw.map(str::trim) {
        None | Some("") => Err(DecisionFormError::MissingAction),
        Some(value) => {
            DecisionAction::parse(value).ok_or_else(|| DecisionFormError::UnknownAction(value.to_string()))
        }
    }
}

pub fn parse_decision_date(raw: &str) -> Result<NaiveDate, DecisionFormError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DecisionFormError::InvalidDate(raw.to_string()))
}

fn required(fields: &HashMap<String, String>, key: &str) -> Result<String, DecisionFormError> {
    match fields.get(key).map(|value| value.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(DecisionFormError::MissingField(key.to_string())),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Complete committee form used by tests across the decisions workflow.
#[cfg(test)]
pub(crate) fn sample_committee_fields(action: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for (index, slot) in MemberSlot::ALL.iter().enumerate() {
        let prefix = slot.field_prefix();
        fields.insert(format!("{prefix}_name"), format!("Member {index}"));
        fields.insert(
            format!("{prefix}_national_id"),
            format!("2900101{:07}", index + 1),
        );
        fields.insert(format!("{prefix}_phone"), format!("0111234{:04}", index));
    }
    for (key, value) in [
        ("action", action),
        ("decision_number", "17"),
        ("decision_date", "2024-03-05"),
        ("preamble", "بعد الاطلاع على القانون"),
        ("article_one_text", "تشكل لجنة الوظائف القيادية"),
        ("article_two_text", "تختص اللجنة بما يلي"),
        ("committee_tasks", "فحص الطلبات"),
        ("article_four", "ينشر هذا القرار"),
        ("competent_authority", "المحافظ"),
        ("authority_approval", "معتمد"),
    ] {
        fields.insert(key.to_string(), value.to_string());
    }
    fields
}
