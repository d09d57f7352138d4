use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{json_column, parse_column, to_json, SqliteStore};
use crate::workflows::accounts::UserId;
use crate::workflows::repository::RepositoryError;
use crate::workflows::requests::domain::{
    NewForward, NewReturn, NewServiceRequest, RequestChanges, RequestForward, RequestId,
    RequestReturn, RequestState, ServiceRequest,
};
use crate::workflows::requests::RequestRepository;

const REQUEST_COLUMNS: &str =
    "id, user_id, request_type, title, description, status, attachments, notes, created_at, updated_at";

fn request_from_row(row: &Row) -> rusqlite::Result<ServiceRequest> {
    let attachments: String = row.get(6)?;
    Ok(ServiceRequest {
        id: RequestId(row.get(0)?),
        user_id: UserId(row.get(1)?),
        request_type: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: parse_column(5, row.get(5)?, RequestState::parse)?,
        attachments: json_column(6, &attachments)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn forward_from_row(row: &Row) -> rusqlite::Result<RequestForward> {
    Ok(RequestForward {
        id: row.get(0)?,
        request_id: RequestId(row.get(1)?),
        from_user_id: UserId(row.get(2)?),
        to_user_id: UserId(row.get(3)?),
        purpose: row.get(4)?,
        next_action: row.get(5)?,
        due_date: row.get(6)?,
        comments: row.get(7)?,
        status: parse_column(8, row.get(8)?, RequestState::parse)?,
        created_at: row.get(9)?,
    })
}

fn return_from_row(row: &Row) -> rusqlite::Result<RequestReturn> {
    Ok(RequestReturn {
        id: row.get(0)?,
        request_id: RequestId(row.get(1)?),
        returned_by: UserId(row.get(2)?),
        returned_to: UserId(row.get(3)?),
        reason: row.get(4)?,
        comments: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Load a request, failing with `QueryReturnedNoRows` when it is missing.
fn load_request(conn: &Connection, id: RequestId) -> rusqlite::Result<ServiceRequest> {
    conn.query_row(
        &format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"),
        params![id.0],
        request_from_row,
    )
}

fn set_status(conn: &Connection, id: RequestId, status: RequestState) -> rusqlite::Result<()> {
    let updated = conn.execute(
        "UPDATE requests SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), Utc::now(), id.0],
    )?;
    if updated == 0 {
        return Err(rusqlite::Error::QueryReturnedNoRows);
    }
    Ok(())
}

impl SqliteStore {
    fn requests_query(
        &self,
        sql: &str,
        owner: Option<UserId>,
    ) -> Result<Vec<ServiceRequest>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = match owner {
                Some(owner) => stmt.query_map(params![owner.0], request_from_row)?.collect(),
                None => stmt.query_map([], request_from_row)?.collect(),
            };
            rows
        })
    }
}

impl RequestRepository for SqliteStore {
    fn insert_request(&self, request: NewServiceRequest) -> Result<ServiceRequest, RepositoryError> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO requests (user_id, request_type, title, description, status, attachments, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?7)",
                params![
                    request.user_id.0,
                    request.request_type,
                    request.title,
                    request.description,
                    RequestState::Pending.as_str(),
                    to_json(&request.attachments)?,
                    now,
                ],
            )?;
            Ok(ServiceRequest {
                id: RequestId(conn.last_insert_rowid()),
                user_id: request.user_id,
                request_type: request.request_type,
                title: request.title,
                description: request.description,
                status: RequestState::Pending,
                attachments: request.attachments,
                notes: None,
                created_at: now,
                updated_at: now,
            })
        })
    }

    fn request(&self, id: RequestId) -> Result<Option<ServiceRequest>, RepositoryError> {
        self.with_conn(|conn| load_request(conn, id).optional())
    }

    fn update_request(
        &self,
        id: RequestId,
        changes: RequestChanges,
    ) -> Result<ServiceRequest, RepositoryError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let mut current = load_request(&tx, id)?;
            if let Some(title) = changes.title {
                current.title = title;
            }
            if let Some(description) = changes.description {
                current.description = description;
            }
            if let Some(attachments) = changes.attachments {
                current.attachments = attachments;
            }
            current.updated_at = Utc::now();
            tx.execute(
                "UPDATE requests SET title = ?1, description = ?2, attachments = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    current.title,
                    current.description,
                    to_json(&current.attachments)?,
                    current.updated_at,
                    id.0,
                ],
            )?;
            tx.commit()?;
            Ok(current)
        })
    }

    fn set_outcome(
        &self,
        id: RequestId,
        status: RequestState,
        notes: Option<String>,
    ) -> Result<ServiceRequest, RepositoryError> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE requests SET status = ?1, notes = COALESCE(?2, notes), updated_at = ?3
                 WHERE id = ?4",
                params![status.as_str(), notes, Utc::now(), id.0],
            )?;
            if updated == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            load_request(conn, id)
        })
    }

    fn save_notes(&self, id: RequestId, notes: String) -> Result<ServiceRequest, RepositoryError> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE requests SET notes = ?1, updated_at = ?2 WHERE id = ?3",
                params![notes, Utc::now(), id.0],
            )?;
            if updated == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            load_request(conn, id)
        })
    }

    fn forward_request(&self, forward: NewForward) -> Result<RequestForward, RepositoryError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            set_status(&tx, forward.request_id, RequestState::Forwarded)?;
            let created_at = Utc::now();
            tx.execute(
                "INSERT INTO request_forwards (request_id, from_user_id, to_user_id, purpose, next_action, due_date, comments, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    forward.request_id.0,
                    forward.from_user_id.0,
                    forward.to_user_id.0,
                    forward.purpose,
                    forward.next_action,
                    forward.due_date,
                    forward.comments,
                    RequestState::Pending.as_str(),
                    created_at,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(RequestForward {
                id,
                request_id: forward.request_id,
                from_user_id: forward.from_user_id,
                to_user_id: forward.to_user_id,
                purpose: forward.purpose,
                next_action: forward.next_action,
                due_date: forward.due_date,
                comments: forward.comments,
                status: RequestState::Pending,
                created_at,
            })
        })
    }

    fn return_request(&self, entry: NewReturn) -> Result<RequestReturn, RepositoryError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            set_status(&tx, entry.request_id, RequestState::Returned)?;
            let created_at = Utc::now();
            tx.execute(
                "INSERT INTO request_returns (request_id, returned_by, returned_to, reason, comments, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.request_id.0,
                    entry.returned_by.0,
                    entry.returned_to.0,
                    entry.reason,
                    entry.comments,
                    created_at,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(RequestReturn {
                id,
                request_id: entry.request_id,
                returned_by: entry.returned_by,
                returned_to: entry.returned_to,
                reason: entry.reason,
                comments: entry.comments,
                created_at,
            })
        })
    }

    fn all_requests(&self) -> Result<Vec<ServiceRequest>, RepositoryError> {
        self.requests_query(
            &format!("SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at DESC, id DESC"),
            None,
        )
    }

    fn requests_by_owner(&self, owner: UserId) -> Result<Vec<ServiceRequest>, RepositoryError> {
        self.requests_query(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM requests WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC"
            ),
            Some(owner),
        )
    }

    fn requests_forwarded_to(&self, user: UserId) -> Result<Vec<ServiceRequest>, RepositoryError> {
        self.requests_query(
            &format!(
                "SELECT {REQUEST_COLUMNS} FROM requests
                 WHERE id IN (SELECT request_id FROM request_forwards WHERE to_user_id = ?1)
                 ORDER BY created_at DESC, id DESC"
            ),
            Some(user),
        )
    }

    fn forwards(&self, id: RequestId) -> Result<Vec<RequestForward>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, request_id, from_user_id, to_user_id, purpose, next_action, due_date, comments, status, created_at
                 FROM request_forwards WHERE request_id = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![id.0], forward_from_row)?.collect();
            rows
        })
    }

    fn returns(&self, id: RequestId) -> Result<Vec<RequestReturn>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, request_id, returned_by, returned_to, reason, comments, created_at
                 FROM request_returns WHERE request_id = ?1 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt.query_map(params![id.0], return_from_row)?.collect();
            rows
        })
    }
}
