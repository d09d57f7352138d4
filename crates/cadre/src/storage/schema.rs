use rusqlite::{Connection, OptionalExtension};
use tracing::info;

pub(super) const SCHEMA_VERSION: i64 = 1;

pub(super) fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;
    let current: Option<i64> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .optional()?;

    match current {
        Some(version) if version >= SCHEMA_VERSION => {
            info!(version, "database schema is up to date");
        }
        _ => {
            info!(version = SCHEMA_VERSION, "creating database schema");
            conn.execute_batch(TABLES)?;
            conn.execute("DELETE FROM schema_version", [])?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
        }
    }
    Ok(())
}

const TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name       TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    password_hash   TEXT NOT NULL,
    roles           TEXT NOT NULL,
    governorate     TEXT NOT NULL,
    active          INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leadership_committees (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             INTEGER NOT NULL REFERENCES users(id),
    governorate         TEXT NOT NULL,
    status              TEXT NOT NULL,
    decision_number     TEXT NOT NULL,
    decision_date       TEXT NOT NULL,
    preamble            TEXT NOT NULL,
    members             TEXT NOT NULL,
    article_one_text    TEXT NOT NULL,
    article_two_text    TEXT NOT NULL,
    committee_tasks     TEXT NOT NULL,
    article_four        TEXT NOT NULL,
    competent_authority TEXT NOT NULL,
    authority_approval  TEXT NOT NULL,
    created_at          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_committees_owner_status
    ON leadership_committees(user_id, status);

CREATE TABLE IF NOT EXISTS appointment_decisions (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             INTEGER NOT NULL REFERENCES users(id),
    governorate         TEXT NOT NULL,
    status              TEXT NOT NULL,
    announcement_number TEXT NOT NULL,
    candidate_code      TEXT NOT NULL,
    decision_number     TEXT NOT NULL,
    decision_date       TEXT NOT NULL,
    article_one_text    TEXT NOT NULL,
    article_two_text    TEXT NOT NULL,
    article_three_text  TEXT NOT NULL,
    competent_authority TEXT NOT NULL,
    authority_approval  TEXT NOT NULL,
    announcement_file   TEXT,
    candidate_file      TEXT,
    decision_file       TEXT,
    created_at          TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_appointments_owner_status
    ON appointment_decisions(user_id, status);

CREATE TABLE IF NOT EXISTS jobs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    title       TEXT NOT NULL,
    code        TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL,
    deadline    TEXT NOT NULL,
    governorate TEXT NOT NULL,
    status      TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS job_statuses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id      INTEGER NOT NULL REFERENCES jobs(id),
    status      TEXT NOT NULL,
    notes       TEXT NOT NULL,
    author_id   INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS requests (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id),
    request_type TEXT NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    status       TEXT NOT NULL,
    attachments  TEXT NOT NULL,
    notes        TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS request_forwards (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id   INTEGER NOT NULL REFERENCES requests(id),
    from_user_id INTEGER NOT NULL REFERENCES users(id),
    to_user_id   INTEGER NOT NULL REFERENCES users(id),
    purpose      TEXT NOT NULL,
    next_action  TEXT NOT NULL,
    due_date     TEXT NOT NULL,
    comments     TEXT NOT NULL,
    status       TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS request_returns (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    request_id  INTEGER NOT NULL REFERENCES requests(id),
    returned_by INTEGER NOT NULL REFERENCES users(id),
    returned_to INTEGER NOT NULL REFERENCES users(id),
    reason      TEXT NOT NULL,
    comments    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
"#;
