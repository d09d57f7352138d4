use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_column, SqliteStore};
use crate::workflows::accounts::UserId;
use crate::workflows::jobs::domain::{NewJob, NewJobStatus};
use crate::workflows::jobs::{Job, JobId, JobRepository, JobState, JobStatusEntry};
use crate::workflows::repository::RepositoryError;

const JOB_COLUMNS: &str =
    "id, user_id, title, code, description, deadline, governorate, status, created_at";

fn job_from_row(row: &Row) -> rusqlite::Result<Job> {
    Ok(Job {
        id: JobId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        title: row.get(2)?,
        code: row.get(3)?,
        description: row.get(4)?,
        deadline: row.get(5)?,
        governorate: row.get(6)?,
        status: parse_column(7, row.get(7)?, JobState::parse)?,
        created_at: row.get(8)?,
    })
}

fn entry_from_row(row: &Row) -> rusqlite::Result<JobStatusEntry> {
    Ok(JobStatusEntry {
        id: row.get(0)?,
        job_id: JobId(row.get(1)?),
        status: parse_column(2, row.get(2)?, JobState::parse)?,
        notes: row.get(3)?,
        author_id: UserId(row.get(4)?),
        created_at: row.get(5)?,
    })
}

impl SqliteStore {
    fn jobs_where(
        &self,
        clause: &str,
        value: &dyn rusqlite::ToSql,
    ) -> Result<Vec<Job>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {JOB_COLUMNS} FROM jobs WHERE {clause} ORDER BY created_at DESC, id DESC"
            ))?;
            let jobs = stmt.query_map([value], job_from_row)?.collect();
            jobs
        })
    }
}

impl JobRepository for SqliteStore {
    fn insert_job(&self, job: NewJob) -> Result<Job, RepositoryError> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO jobs (user_id, title, code, description, deadline, governorate, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    job.user_id.0,
                    job.title,
                    job.code,
                    job.description,
                    job.deadline,
                    job.governorate,
                    JobState::Pending.as_str(),
                    created_at,
                ],
            )?;
            Ok(Job {
                id: JobId(conn.last_insert_rowid()),
                user_id: job.user_id,
                title: job.title,
                code: job.code,
                description: job.description,
                deadline: job.deadline,
                governorate: job.governorate,
                status: JobState::Pending,
                created_at,
            })
        })
    }

    fn job(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
                params![id.0],
                job_from_row,
            )
            .optional()
        })
    }

    fn job_by_code(&self, code: &str) -> Result<Option<Job>, RepositoryError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE code = ?1"),
                params![code],
                job_from_row,
            )
            .optional()
        })
    }

    fn jobs_by_status(&self, status: JobState) -> Result<Vec<Job>, RepositoryError> {
        self.jobs_where("status = ?1", &status.as_str())
    }

    fn jobs_by_owner(&self, owner: UserId) -> Result<Vec<Job>, RepositoryError> {
        self.jobs_where("user_id = ?1", &owner.0)
    }

    fn record_status(&self, entry: NewJobStatus) -> Result<JobStatusEntry, RepositoryError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let created_at = Utc::now();
            let updated = tx.execute(
                "UPDATE jobs SET status = ?1 WHERE id = ?2",
                params![entry.status.as_str(), entry.job_id.0],
            )?;
            if updated == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            tx.execute(
                "INSERT INTO job_statuses (job_id, status, notes, author_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.job_id.0,
                    entry.status.as_str(),
                    entry.notes,
                    entry.author_id.0,
                    created_at,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(JobStatusEntry {
                id,
                job_id: entry.job_id,
                status: entry.status,
                notes: entry.notes,
                author_id: entry.author_id,
                created_at,
            })
        })
    }

    fn status_history(&self, id: JobId) -> Result<Vec<JobStatusEntry>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, job_id, status, notes, author_id, created_at FROM job_statuses
                 WHERE job_id = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let entries = stmt.query_map(params![id.0], entry_from_row)?.collect();
            entries
        })
    }
}
