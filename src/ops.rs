use anyhow::Result;
use rusqlite::{params, Connection, Row};
use thiserror::Error;

use crate::model::{Status, Task, TaskInput};
use crate::validate::{validate_input, ValidationError};

/// No row with this identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("task {0} not found")]
pub struct NotFound(pub i64);

const TASK_COLUMNS: &str = "id, title, start_date, end_date, people, status, importance, view, notes, attachments, created_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        start_date: row.get(2)?,
        end_date: row.get(3)?,
        people: row.get(4)?,
        status: row.get(5)?,
        importance: row.get(6)?,
        view: row.get(7)?,
        notes: row.get(8)?,
        attachments: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn task_exists(conn: &Connection, id: i64) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks WHERE id = ?1", [id], |row| {
        row.get(0)
    })?;
    Ok(count > 0)
}

fn require_task(conn: &Connection, id: i64) -> Result<()> {
    if !task_exists(conn, id)? {
        return Err(NotFound(id).into());
    }
    Ok(())
}

fn insert_row(conn: &Connection, input: &TaskInput) -> Result<i64> {
    conn.execute(
        "INSERT INTO tasks (title, start_date, end_date, people, status, importance, view, notes, attachments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            input.title,
            input.start_date,
            input.end_date,
            input.people,
            input.status,
            input.importance,
            input.view,
            input.notes,
            input.attachments,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a task and return its new identifier.
pub fn add_task(conn: &Connection, input: &TaskInput) -> Result<i64> {
    validate_input(input)?;
    insert_row(conn, input)
}

/// Overwrite every mutable field of a task. `id` and `created_at` are kept.
pub fn update_task(conn: &Connection, id: i64, input: &TaskInput) -> Result<()> {
    validate_input(input)?;
    require_task(conn, id)?;
    conn.execute(
        "UPDATE tasks SET title = ?1, start_date = ?2, end_date = ?3, people = ?4, status = ?5,
                          importance = ?6, view = ?7, notes = ?8, attachments = ?9
         WHERE id = ?10",
        params![
            input.title,
            input.start_date,
            input.end_date,
            input.people,
            input.status,
            input.importance,
            input.view,
            input.notes,
            input.attachments,
            id,
        ],
    )?;
    Ok(())
}

pub fn remove_task(conn: &Connection, id: i64) -> Result<()> {
    require_task(conn, id)?;
    conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
    Ok(())
}

/// Set status to Complete, touching nothing else.
pub fn mark_complete(conn: &Connection, id: i64) -> Result<()> {
    let task = get_task(conn, id)?;
    if task.status.is_complete() {
        return Err(ValidationError::AlreadyComplete(id).into());
    }
    conn.execute(
        "UPDATE tasks SET status = ?1 WHERE id = ?2",
        params![Status::Complete, id],
    )?;
    Ok(())
}

pub fn get_task(conn: &Connection, id: i64) -> Result<Task> {
    require_task(conn, id)?;
    let task = conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        [id],
        task_from_row,
    )?;
    Ok(task)
}

/// Row order for `list_tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Insertion order.
    #[default]
    Id,
    /// Creation time, newest first.
    NewestFirst,
}

pub fn list_tasks(conn: &Connection, order: ListOrder) -> Result<Vec<Task>> {
    let order_by = match order {
        ListOrder::Id => "id",
        ListOrder::NewestFirst => "created_at DESC, id DESC",
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY {order_by}"
    ))?;
    let rows = stmt.query_map([], task_from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}

pub fn count_tasks(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Insert a batch all-or-nothing. Every row is validated before the
/// transaction starts.
pub fn import_tasks(conn: &Connection, inputs: &[TaskInput]) -> Result<usize> {
    for input in inputs {
        validate_input(input)?;
    }
    let tx = conn.unchecked_transaction()?;
    for input in inputs {
        insert_row(&tx, input)?;
    }
    tx.commit()?;
    Ok(inputs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::{Importance, View};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn input(title: &str) -> TaskInput {
        let mut t = TaskInput::new(title, day(1));
        t.end_date = day(3);
        t.people = "sam".into();
        t.notes = "first draft".into();
        t
    }

    #[test]
    fn add_and_get_task() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("write report")).unwrap();
        let task = get_task(&conn, id).unwrap();
        assert_eq!(task.title, "write report");
        assert_eq!(task.start_date, day(1));
        assert_eq!(task.end_date, day(3));
        assert_eq!(task.people, "sam");
        assert_eq!(task.status, Status::Plan);
        assert_eq!(task.to_input(), input("write report"));
        assert!(!task.created_at.is_empty());
    }

    #[test]
    fn add_keeps_title_as_given() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("  padded  ")).unwrap();
        assert_eq!(get_task(&conn, id).unwrap().title, "  padded  ");
    }

    #[test]
    fn add_empty_title_fails_and_writes_nothing() {
        let conn = db::open_memory().unwrap();
        let err = add_task(&conn, &input("")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::EmptyTitle)
        );
        assert_eq!(count_tasks(&conn).unwrap(), 0);
    }

    #[test]
    fn add_inverted_dates_fails() {
        let conn = db::open_memory().unwrap();
        let mut bad = input("t");
        bad.start_date = day(5);
        bad.end_date = day(4);
        assert!(add_task(&conn, &bad).is_err());
        assert_eq!(count_tasks(&conn).unwrap(), 0);
    }

    #[test]
    fn ids_are_unique_and_not_reused() {
        let conn = db::open_memory().unwrap();
        let a = add_task(&conn, &input("a")).unwrap();
        let b = add_task(&conn, &input("b")).unwrap();
        assert_ne!(a, b);
        remove_task(&conn, b).unwrap();
        let c = add_task(&conn, &input("c")).unwrap();
        assert!(c > b);
    }

    #[test]
    fn update_overwrites_fields_but_keeps_identity() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("old")).unwrap();
        let before = get_task(&conn, id).unwrap();

        let mut changed = input("new");
        changed.status = Status::Stuck;
        changed.importance = Importance::ImportantNotUrgent;
        changed.view = View::Weekly;
        changed.attachments = "https://example.com/doc".into();
        update_task(&conn, id, &changed).unwrap();

        let after = get_task(&conn, id).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.to_input(), changed);
    }

    #[test]
    fn update_missing_task_fails() {
        let conn = db::open_memory().unwrap();
        let err = update_task(&conn, 42, &input("x")).unwrap_err();
        assert_eq!(err.downcast_ref::<NotFound>(), Some(&NotFound(42)));
    }

    #[test]
    fn update_validates_before_touching_row() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("keep")).unwrap();
        assert!(update_task(&conn, id, &input(" ")).is_err());
        assert_eq!(get_task(&conn, id).unwrap().title, "keep");
    }

    #[test]
    fn mark_complete_changes_only_status() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("t")).unwrap();
        let before = get_task(&conn, id).unwrap();
        mark_complete(&conn, id).unwrap();
        let after = get_task(&conn, id).unwrap();
        assert_eq!(after.status, Status::Complete);
        assert_eq!(Task { status: before.status, ..after }, before);
    }

    #[test]
    fn mark_complete_twice_fails() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("t")).unwrap();
        mark_complete(&conn, id).unwrap();
        let err = mark_complete(&conn, id).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::AlreadyComplete(id))
        );
    }

    #[test]
    fn remove_task_works() {
        let conn = db::open_memory().unwrap();
        let id = add_task(&conn, &input("t")).unwrap();
        remove_task(&conn, id).unwrap();
        assert!(get_task(&conn, id).is_err());
        assert!(remove_task(&conn, id).is_err());
    }

    #[test]
    fn list_orders() {
        let conn = db::open_memory().unwrap();
        let a = add_task(&conn, &input("a")).unwrap();
        let b = add_task(&conn, &input("b")).unwrap();
        // Same-second inserts fall back to id for the newest-first order.
        let ids: Vec<i64> = list_tasks(&conn, ListOrder::Id)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
        let ids: Vec<i64> = list_tasks(&conn, ListOrder::NewestFirst)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![b, a]);
    }

    #[test]
    fn list_newest_first_uses_created_at() {
        let conn = db::open_memory().unwrap();
        let old = add_task(&conn, &input("old")).unwrap();
        let new = add_task(&conn, &input("new")).unwrap();
        conn.execute(
            "UPDATE tasks SET created_at = '2030-01-01T00:00:00Z' WHERE id = ?1",
            [old],
        )
        .unwrap();
        let tasks = list_tasks(&conn, ListOrder::NewestFirst).unwrap();
        assert_eq!(tasks[0].id, old);
        assert_eq!(tasks[1].id, new);
    }

    #[test]
    fn import_is_all_or_nothing() {
        let conn = db::open_memory().unwrap();
        let batch = vec![input("a"), input(""), input("c")];
        assert!(import_tasks(&conn, &batch).is_err());
        assert_eq!(count_tasks(&conn).unwrap(), 0);

        let batch = vec![input("a"), input("b")];
        assert_eq!(import_tasks(&conn, &batch).unwrap(), 2);
        assert_eq!(count_tasks(&conn).unwrap(), 2);
    }
}
