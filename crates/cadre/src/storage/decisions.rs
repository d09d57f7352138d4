use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{json_column, parse_column, to_json, SqliteStore};
use crate::workflows::accounts::UserId;
use crate::workflows::decisions::{
    AppointmentDecision, AppointmentRecord, CommitteeDecision, CommitteeRecord,
    DecisionKind, DecisionRepository, DecisionStatus, NewDecision, RecordMeta,
};
use crate::workflows::decisions::domain::AppointmentAttachments;
use crate::workflows::repository::RepositoryError;

const COMMITTEE_COLUMNS: &str = "id, user_id, governorate, status, created_at, decision_number, \
     decision_date, preamble, members, article_one_text, article_two_text, committee_tasks, \
     article_four, competent_authority, authority_approval";

const APPOINTMENT_COLUMNS: &str = "id, user_id, governorate, status, created_at, \
     announcement_number, candidate_code, decision_number, decision_date, article_one_text, \
     article_two_text, article_three_text, competent_authority, authority_approval, \
     announcement_file, candidate_file, decision_file";

/// Columns 0..=4 are shared by both decision tables.
fn meta_from_row(row: &Row) -> rusqlite::Result<RecordMeta> {
    Ok(RecordMeta {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        governorate: row.get(2)?,
        status: parse_column(3, row.get(3)?, DecisionStatus::parse)?,
        created_at: row.get(4)?,
    })
}

fn committee_from_row(row: &Row) -> rusqlite::Result<CommitteeRecord> {
    let members: String = row.get(8)?;
    Ok(CommitteeRecord {
        meta: meta_from_row(row)?,
        decision: CommitteeDecision {
            decision_number: row.get(5)?,
            decision_date: row.get(6)?,
            preamble: row.get(7)?,
            members: json_column(8, &members)?,
            article_one_text: row.get(9)?,
            article_two_text: row.get(10)?,
            committee_tasks: row.get(11)?,
            article_four: row.get(12)?,
            competent_authority: row.get(13)?,
            authority_approval: row.get(14)?,
        },
    })
}

fn appointment_from_row(row: &Row) -> rusqlite::Result<AppointmentRecord> {
    Ok(AppointmentRecord {
        meta: meta_from_row(row)?,
        decision: AppointmentDecision {
            announcement_number: row.get(5)?,
            candidate_code: row.get(6)?,
            decision_number: row.get(7)?,
            decision_date: row.get(8)?,
            article_one_text: row.get(9)?,
            article_two_text: row.get(10)?,
            article_three_text: row.get(11)?,
            competent_authority: row.get(12)?,
            authority_approval: row.get(13)?,
            files: AppointmentAttachments {
                announcement_file: row.get(14)?,
                candidate_file: row.get(15)?,
                decision_file: row.get(16)?,
            },
        },
    })
}

impl DecisionRepository for SqliteStore {
    fn insert_committee(
        &self,
        new: NewDecision<CommitteeDecision>,
    ) -> Result<CommitteeRecord, RepositoryError> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            let decision = &new.decision;
            conn.execute(
                "INSERT INTO leadership_committees (user_id, governorate, status, created_at,
                     decision_number, decision_date, preamble, members, article_one_text,
                     article_two_text, committee_tasks, article_four, competent_authority,
                     authority_approval)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    new.user_id.0,
                    new.governorate,
                    new.status.as_str(),
                    created_at,
                    decision.decision_number,
                    decision.decision_date,
                    decision.preamble,
                    to_json(&decision.members)?,
                    decision.article_one_text,
                    decision.article_two_text,
                    decision.committee_tasks,
                    decision.article_four,
                    decision.competent_authority,
                    decision.authority_approval,
                ],
            )?;
            Ok(CommitteeRecord {
                meta: RecordMeta {
                    id: conn.last_insert_rowid(),
                    user_id: new.user_id,
                    governorate: new.governorate,
                    status: new.status,
                    created_at,
                },
                decision: new.decision,
            })
        })
    }

    fn insert_appointment(
        &self,
        new: NewDecision<AppointmentDecision>,
    ) -> Result<AppointmentRecord, RepositoryError> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            let decision = &new.decision;
            conn.execute(
                "INSERT INTO appointment_decisions (user_id, governorate, status, created_at,
                     announcement_number, candidate_code, decision_number, decision_date,
                     article_one_text, article_two_text, article_three_text, competent_authority,
                     authority_approval, announcement_file, candidate_file, decision_file)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    new.user_id.0,
                    new.governorate,
                    new.status.as_str(),
                    created_at,
                    decision.announcement_number,
                    decision.candidate_code,
                    decision.decision_number,
                    decision.decision_date,
                    decision.article_one_text,
                    decision.article_two_text,
                    decision.article_three_text,
                    decision.competent_authority,
                    decision.authority_approval,
                    decision.files.announcement_file,
                    decision.files.candidate_file,
                    decision.files.decision_file,
                ],
            )?;
            Ok(AppointmentRecord {
                meta: RecordMeta {
                    id: conn.last_insert_rowid(),
                    user_id: new.user_id,
                    governorate: new.governorate,
                    status: new.status,
                    created_at,
                },
                decision: new.decision,
            })
        })
    }

    fn committees_by_status(
        &self,
        owner: UserId,
        status: DecisionStatus,
    ) -> Result<Vec<CommitteeRecord>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMITTEE_COLUMNS} FROM leadership_committees
                 WHERE user_id = ?1 AND status = ?2
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let records = stmt
                .query_map(params![owner.0, status.as_str()], committee_from_row)?
                .collect();
            records
        })
    }

    fn appointments_by_status(
        &self,
        owner: UserId,
        status: DecisionStatus,
    ) -> Result<Vec<AppointmentRecord>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointment_decisions
                 WHERE user_id = ?1 AND status = ?2
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let records = stmt
                .query_map(params![owner.0, status.as_str()], appointment_from_row)?
                .collect();
            records
        })
    }

    fn committee(&self, id: i64) -> Result<Option<CommitteeRecord>, RepositoryError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {COMMITTEE_COLUMNS} FROM leadership_committees WHERE id = ?1"),
                params![id],
                committee_from_row,
            )
            .optional()
        })
    }

    fn appointment(&self, id: i64) -> Result<Option<AppointmentRecord>, RepositoryError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointment_decisions WHERE id = ?1"),
                params![id],
                appointment_from_row,
            )
            .optional()
        })
    }

    fn delete_draft(
        &self,
        owner: UserId,
        kind: DecisionKind,
        decision_number: &str,
    ) -> Result<bool, RepositoryError> {
        let table = match kind {
            DecisionKind::Committee => "leadership_committees",
            DecisionKind::Appointment => "appointment_decisions",
        };
        self.with_conn(|conn| {
            let deleted = conn.execute(
                &format!(
                    "DELETE FROM {table} WHERE id = (
                         SELECT id FROM {table}
                         WHERE decision_number = ?1 AND user_id = ?2 AND status = 'draft'
                         ORDER BY created_at DESC, id DESC LIMIT 1)"
                ),
                params![decision_number, owner.0],
            )?;
            Ok(deleted > 0)
        })
    }
}
