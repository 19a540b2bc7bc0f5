//! `SQLite` storage implementation.

use crate::error::{StoreError, StoreResult};
use crate::gateway::IssueGateway;
use crate::model::{Identity, Issue, IssuePatch, NewIssue, Status};
use crate::storage::schema::apply_schema;
use crate::util::id::{IdConfig, IdGenerator};
use crate::util::time::{format_datetime, parse_datetime};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const ISSUE_COLUMNS: &str = "id, title, description, status, created_at, owner_id";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// A stored account, including its credential material.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub identity: Identity,
    /// Argon2 PHC string; carries its own salt and parameters.
    pub password_hash: String,
}

impl SqliteStorage {
    /// Open a connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened issue database");
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    // ------------------------------------------------------------------
    // Issues
    // ------------------------------------------------------------------

    /// List an owner's issues, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_issues(&self, owner_id: &str) -> StoreResult<Vec<Issue>> {
        let sql = format!(
            "SELECT {ISSUE_COLUMNS} FROM issues
             WHERE owner_id = ?
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let issues = stmt
            .query_map([owner_id], issue_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(issues)
    }

    /// Get one issue, if it exists and belongs to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_issue(&self, owner_id: &str, id: &str) -> StoreResult<Option<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ? AND owner_id = ?");
        let issue = self
            .conn
            .query_row(&sql, [id, owner_id], issue_from_row)
            .optional()?;
        Ok(issue)
    }

    /// Insert a new issue for `owner_id`.
    ///
    /// Assigns `id` and `created_at`. The draft is stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. blank title hitting the CHECK).
    pub fn create_issue(&mut self, owner_id: &str, new_issue: &NewIssue) -> StoreResult<Issue> {
        let created_at = Utc::now();
        let id = self.next_id(IdConfig::default(), &new_issue.title, owner_id, created_at)?;

        self.conn.execute(
            &format!("INSERT INTO issues ({ISSUE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"),
            params![
                id,
                new_issue.title,
                new_issue.description,
                new_issue.status.as_str(),
                format_datetime(&created_at),
                owner_id,
            ],
        )?;
        debug!(%id, owner_id, "Inserted issue");

        self.get_issue(owner_id, &id)?
            .ok_or(StoreError::NotFound { id })
    }

    /// Apply a patch to an owner's issue.
    ///
    /// An empty patch writes nothing but still checks the row exists for this owner.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row matches both id and owner.
    pub fn update_issue(
        &mut self,
        owner_id: &str,
        id: &str,
        patch: &IssuePatch,
    ) -> StoreResult<Issue> {
        if patch.is_empty() {
            return self.get_issue(owner_id, id)?.ok_or_else(|| StoreError::NotFound {
                id: id.to_string(),
            });
        }

        let mut set_clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(title) = &patch.title {
            set_clauses.push("title = ?");
            values.push(title.clone());
        }
        if let Some(description) = &patch.description {
            set_clauses.push("description = ?");
            values.push(description.clone());
        }
        if let Some(status) = patch.status {
            set_clauses.push("status = ?");
            values.push(status.as_str().to_string());
        }

        let sql = format!(
            "UPDATE issues SET {} WHERE id = ? AND owner_id = ?",
            set_clauses.join(", ")
        );
        values.push(id.to_string());
        values.push(owner_id.to_string());

        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        debug!(id, owner_id, "Updated issue");

        self.get_issue(owner_id, id)?.ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })
    }

    /// Remove an owner's issue.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row matches both id and owner.
    pub fn delete_issue(&mut self, owner_id: &str, id: &str) -> StoreResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM issues WHERE id = ? AND owner_id = ?",
            [id, owner_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        debug!(id, owner_id, "Deleted issue");
        Ok(())
    }

    /// Count an owner's issues.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_issues(&self, owner_id: &str) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM issues WHERE owner_id = ?",
            [owner_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    /// Insert an account. The caller hashes the password.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate email).
    pub fn create_user(&mut self, email: &str, password_hash: &str) -> StoreResult<Identity> {
        let created_at = Utc::now();
        let id = self.next_id(IdConfig::with_prefix("usr"), email, "", created_at)?;

        self.conn.execute(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
            params![id, email, password_hash, format_datetime(&created_at)],
        )?;
        debug!(%id, "Created account");

        self.find_user_by_email(email)?
            .map(|record| record.identity)
            .ok_or(StoreError::NotFound { id })
    }

    /// Look up an account by (already normalized) email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, email, created_at, password_hash FROM users WHERE email = ?",
                [email],
                |row| {
                    Ok(UserRecord {
                        identity: Identity {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            created_at: timestamp_column(row, 2)?,
                        },
                        password_hash: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn next_id(
        &self,
        config: IdConfig,
        seed_text: &str,
        owner: &str,
        created_at: DateTime<Utc>,
    ) -> StoreResult<String> {
        let table = if config.prefix == "usr" { "users" } else { "issues" };
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT count(*) FROM {table}"), [], |row| row.get(0))?;
        let exists_sql = format!("SELECT 1 FROM {table} WHERE id = ?");

        let generator = IdGenerator::new(config);
        generator.generate(
            seed_text,
            owner,
            created_at,
            usize::try_from(count).unwrap_or(0),
            |candidate| {
                let mut stmt = self.conn.prepare_cached(&exists_sql)?;
                Ok(stmt.exists([candidate])?)
            },
        )
    }
}

impl IssueGateway for SqliteStorage {
    fn list(&self, owner_id: &str) -> StoreResult<Vec<Issue>> {
        self.list_issues(owner_id)
    }

    fn create(&mut self, owner_id: &str, new_issue: &NewIssue) -> StoreResult<Issue> {
        self.create_issue(owner_id, new_issue)
    }

    fn update(&mut self, owner_id: &str, issue_id: &str, patch: &IssuePatch) -> StoreResult<Issue> {
        self.update_issue(owner_id, issue_id, patch)
    }

    fn delete(&mut self, owner_id: &str, issue_id: &str) -> StoreResult<()> {
        self.delete_issue(owner_id, issue_id)
    }
}

fn issue_from_row(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
    let status_text: String = row.get(3)?;
    let status = status_text.parse::<Status>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Issue {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status,
        created_at: timestamp_column(row, 4)?,
        owner_id: row.get(5)?,
    })
}

fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_datetime(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("invalid timestamp: {text}").into(),
        )
    })
}
