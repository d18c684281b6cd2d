use anyhow::{Context, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;

use crate::model::{Importance, Status, View};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL CHECK(length(trim(title)) > 0),
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    people      TEXT NOT NULL DEFAULT '',
    status      TEXT NOT NULL DEFAULT 'Plan'
                CHECK(status IN ('Plan', 'In Progress', 'Stuck', 'Complete')),
    importance  TEXT NOT NULL DEFAULT 'Urgent and Important'
                CHECK(importance IN ('Urgent and Important', 'Important and Not Urgent',
                                     'Not Important but Urgent', 'Not Important and Not Urgent')),
    view        TEXT NOT NULL DEFAULT 'daily'
                CHECK(view IN ('daily', 'weekly', 'monthly', 'yearly')),
    notes       TEXT NOT NULL DEFAULT '',
    attachments TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
    CHECK(end_date >= start_date)
);
";

// Enum columns are stored by label.
macro_rules! label_column {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                <$ty>::parse(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

label_column!(Status);
label_column!(Importance);
label_column!(View);

fn set_pragmas(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

pub fn open(path: &str) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("failed to open database {path}"))?;
    set_pragmas(&conn)?;
    Ok(conn)
}

/// Create the table if absent. Idempotent.
pub fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Open and initialize in one step.
pub fn open_and_init(path: &str) -> Result<Connection> {
    let conn = open(path)?;
    init(&conn)?;
    Ok(conn)
}

pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    set_pragmas(&conn)?;
    init(&conn)?;
    Ok(conn)
}
