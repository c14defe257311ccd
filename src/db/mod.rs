//! Task persistence.
//!
//! [`TaskStore`] is the record-store seam the service depends on. [`Database`]
//! implements it on SQLite; saves are upserts, so concurrent edits of the
//! same task resolve as last write wins.

mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use uuid::Uuid;

use crate::models::*;

const TASK_COLUMNS: &str =
    "id, title, description, deadline, priority, status, create_date, update_date";

/// Record store keyed by task id.
pub trait TaskStore: Send + Sync {
    /// Inserts the task, or replaces the stored record with the same id.
    fn save(&self, task: &Task) -> Result<()>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Task>>;

    fn find_all(&self) -> Result<Vec<Task>>;

    /// Removes the record. Returns `false` when it was already gone.
    fn delete(&self, task: &Task) -> Result<bool>;
}

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "todo-list")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("todo-list.db"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }
}

impl TaskStore for Database {
    fn save(&self, task: &Task) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");

        conn.execute(
            "INSERT INTO tasks (id, title, description, deadline, priority, status, create_date, update_date)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                deadline = excluded.deadline,
                priority = excluded.priority,
                status = excluded.status,
                update_date = excluded.update_date",
            (
                task.id.to_string(),
                &task.title,
                &task.description,
                task.deadline.map(|d| d.to_rfc3339()),
                task.priority.as_str(),
                task.status.as_str(),
                task.create_date.to_rfc3339(),
                task.update_date.to_rfc3339(),
            ),
        )?;

        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(task_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    fn find_all(&self) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY create_date"))?;

        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    fn delete(&self, task: &Task) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?", [task.id.to_string()])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: parse_uuid(0, row.get(0)?)?,
        title: row.get(1)?,
        description: row.get(2)?,
        deadline: row
            .get::<_, Option<String>>(3)?
            .map(|s| parse_datetime(3, s))
            .transpose()?,
        priority: parse_enum(4, row.get(4)?, Priority::from_str)?,
        status: parse_enum(5, row.get(5)?, TaskStatus::from_str)?,
        create_date: parse_datetime(6, row.get(6)?)?,
        update_date: parse_datetime(7, row.get(7)?)?,
    })
}

fn conversion_error(
    column: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err.into())
}

fn parse_uuid(column: usize, s: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&s).map_err(|e| conversion_error(column, e))
}

fn parse_datetime(column: usize, s: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(column, e))
}

fn parse_enum<T>(
    column: usize,
    s: String,
    from_str: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    from_str(&s).ok_or_else(|| conversion_error(column, format!("unknown value {s:?}")))
}
