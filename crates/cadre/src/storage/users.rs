use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::SqliteStore;
use crate::workflows::accounts::domain::{decode_roles, encode_roles, NewUser, User, UserId};
use crate::workflows::accounts::UserRepository;
use crate::workflows::repository::RepositoryError;

const USER_COLUMNS: &str =
    "id, full_name, email, password_hash, roles, governorate, active, created_at";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    let roles: String = row.get(4)?;
    Ok(User {
        id: UserId(row.get(0)?),
        full_name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        roles: decode_roles(&roles),
        governorate: row.get(5)?,
        active: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl UserRepository for SqliteStore {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO users (full_name, email, password_hash, roles, governorate, active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.full_name,
                    user.email,
                    user.password_hash,
                    encode_roles(&user.roles),
                    user.governorate,
                    user.active,
                    created_at,
                ],
            )?;
            Ok(User {
                id: UserId(conn.last_insert_rowid()),
                full_name: user.full_name,
                email: user.email,
                password_hash: user.password_hash,
                roles: user.roles,
                governorate: user.governorate,
                active: user.active,
                created_at,
            })
        })
    }

    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.0],
                user_from_row,
            )
            .optional()
        })
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()
        })
    }

    fn inactive_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE active = 0 ORDER BY id"
            ))?;
            let users = stmt.query_map([], user_from_row)?.collect();
            users
        })
    }

    fn set_active(&self, id: UserId, active: bool) -> Result<(), RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET active = ?1 WHERE id = ?2",
                params![active, id.0],
            )?;
            if changed == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            Ok(())
        })
    }

    fn user_count(&self) -> Result<usize, RepositoryError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as usize)
        })
    }
}
