use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

use crate::board::drag::StatusSink;
use crate::models::{Application, Stage};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No application with ID {0}")]
    NotFound(i64),
    #[error("Unknown stage '{0}' stored in database")]
    BadStage(String),
}

/// Application repository for database operations
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Create a new application
    pub fn create(
        conn: &Connection,
        company: &str,
        role: &str,
        stage: Stage,
        url: Option<String>,
        notes: Option<String>,
    ) -> Result<Application> {
        let mut app = Application::new(company.to_string(), role.to_string());
        app.stage = stage;
        app.url = url;
        app.notes = notes;

        conn.execute(
            "INSERT INTO applications (uuid, company, role, stage, url, notes, created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                app.uuid,
                app.company,
                app.role,
                app.stage.as_str(),
                app.url,
                app.notes,
                app.created_ts,
                app.modified_ts,
            ],
        )
        .with_context(|| format!("Failed to create application: {} / {}", company, role))?;

        Ok(Application {
            id: Some(conn.last_insert_rowid()),
            ..app
        })
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Application> {
        let stage_str: String = row.get(4)?;
        let stage = Stage::from_str(&stage_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(StoreError::BadStage(stage_str)),
            )
        })?;
        Ok(Application {
            id: Some(row.get(0)?),
            uuid: row.get(1)?,
            company: row.get(2)?,
            role: row.get(3)?,
            stage,
            url: row.get(5)?,
            notes: row.get(6)?,
            created_ts: row.get(7)?,
            modified_ts: row.get(8)?,
        })
    }

    const SELECT: &'static str =
        "SELECT id, uuid, company, role, stage, url, notes, created_ts, modified_ts
         FROM applications";

    /// List all applications in insertion order (stable rowid order)
    pub fn list_all(conn: &Connection) -> Result<Vec<Application>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY id", Self::SELECT))?;
        let rows = stmt.query_map([], Self::from_row)?;

        let mut apps = Vec::new();
        for row in rows {
            apps.push(row?);
        }
        Ok(apps)
    }

    /// Get application by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Application>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", Self::SELECT))?;
        Ok(stmt.query_row([id], Self::from_row).optional()?)
    }

    /// Move an application to a new pipeline stage
    pub fn set_stage(conn: &Connection, id: i64, stage: Stage) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let changed = conn
            .execute(
                "UPDATE applications SET stage = ?1, modified_ts = ?2 WHERE id = ?3",
                rusqlite::params![stage.as_str(), now, id],
            )
            .with_context(|| format!("Failed to update stage for application {}", id))?;
        if changed == 0 {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(())
    }

    /// Update editable fields (None leaves the field untouched)
    pub fn update(
        conn: &Connection,
        id: i64,
        company: Option<&str>,
        role: Option<&str>,
        url: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        let existing =
            Self::get_by_id(conn, id)?.ok_or(StoreError::NotFound(id))?;
        let now = chrono::Utc::now().timestamp();
        conn.execute(
            "UPDATE applications SET company = ?1, role = ?2, url = ?3, notes = ?4, modified_ts = ?5
             WHERE id = ?6",
            rusqlite::params![
                company.unwrap_or(&existing.company),
                role.unwrap_or(&existing.role),
                url.or(existing.url.as_deref()),
                notes.or(existing.notes.as_deref()),
                now,
                id,
            ],
        )?;
        Ok(())
    }

    /// Delete an application
    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let changed = conn.execute("DELETE FROM applications WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(())
    }
}

/// [`StatusSink`] backed by the SQLite store. This is the board's only write
/// path into persistence.
pub struct SqliteSink<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSink<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl StatusSink for SqliteSink<'_> {
    fn update_status(&mut self, id: i64, to: Stage) -> Result<()> {
        ApplicationRepo::set_stage(self.conn, id, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    #[test]
    fn test_create_and_list() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let a = ApplicationRepo::create(&conn, "Acme", "Backend", Stage::ToApply, None, None)
            .unwrap();
        let b = ApplicationRepo::create(&conn, "Globex", "SRE", Stage::Applied, None, None)
            .unwrap();

        let apps = ApplicationRepo::list_all(&conn).unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].id, a.id);
        assert_eq!(apps[1].id, b.id);
        assert_eq!(apps[1].stage, Stage::Applied);
    }

    #[test]
    fn test_set_stage() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let app = ApplicationRepo::create(&conn, "Acme", "Backend", Stage::Applied, None, None)
            .unwrap();
        let id = app.id.unwrap();

        ApplicationRepo::set_stage(&conn, id, Stage::Offer).unwrap();
        let reloaded = ApplicationRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(reloaded.stage, Stage::Offer);
        assert!(reloaded.modified_ts >= app.modified_ts);
    }

    #[test]
    fn test_set_stage_missing_id() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let err = ApplicationRepo::set_stage(&conn, 99, Stage::Offer).unwrap_err();
        assert!(err.to_string().contains("No application with ID 99"));
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let app = ApplicationRepo::create(
            &conn,
            "Acme",
            "Backend",
            Stage::Applied,
            Some("https://acme.example/job".to_string()),
            None,
        )
        .unwrap();
        let id = app.id.unwrap();

        // Only role and notes given; company and url must survive untouched.
        ApplicationRepo::update(&conn, id, None, Some("Staff Backend"), None, Some("reached out"))
            .unwrap();
        let reloaded = ApplicationRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(reloaded.company, "Acme");
        assert_eq!(reloaded.role, "Staff Backend");
        assert_eq!(reloaded.url.as_deref(), Some("https://acme.example/job"));
        assert_eq!(reloaded.notes.as_deref(), Some("reached out"));
        assert!(reloaded.modified_ts >= app.modified_ts);
    }

    #[test]
    fn test_update_missing_id() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let err = ApplicationRepo::update(&conn, 42, Some("X"), None, None, None).unwrap_err();
        assert!(err.to_string().contains("No application with ID 42"));
    }

    #[test]
    fn test_delete() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let app = ApplicationRepo::create(&conn, "Acme", "Backend", Stage::ToApply, None, None)
            .unwrap();
        ApplicationRepo::delete(&conn, app.id.unwrap()).unwrap();
        assert!(ApplicationRepo::list_all(&conn).unwrap().is_empty());
        assert!(ApplicationRepo::delete(&conn, 1).is_err());
    }
}
