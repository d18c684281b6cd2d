//! Task store used by the dashboards.
//!
//! Each operation opens its own connection, runs a single `ops` call and
//! closes it again. Reads go through a [`TtlCache`]; every write clears it,
//! whether or not the write succeeded.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use log::{debug, warn};

use crate::cache::TtlCache;
use crate::db;
use crate::model::{Task, TaskInput};
use crate::ops::{self, ListOrder};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

pub struct Store {
    db_path: String,
    cache: Mutex<TtlCache<Vec<Task>>>,
}

impl Store {
    /// Create the table if needed and return a store for `db_path`.
    pub fn open(db_path: impl Into<String>, ttl: Duration) -> Result<Self> {
        let db_path = db_path.into();
        db::open_and_init(&db_path)?;
        Ok(Self {
            db_path,
            cache: Mutex::new(TtlCache::new(ttl)),
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn cache(&self) -> MutexGuard<'_, TtlCache<Vec<Task>>> {
        // A panic while holding the lock cannot leave the cache half-written.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// All tasks, newest first, possibly up to one TTL stale.
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut cache = self.cache();
        let tasks = cache.get_or_try_load(|| {
            debug!("cache miss, loading tasks from {}", self.db_path);
            let conn = db::open(&self.db_path)?;
            ops::list_tasks(&conn, ListOrder::NewestFirst)
        })?;
        Ok(tasks.clone())
    }

    /// Read straight from the database, leaving the cache alone.
    pub fn list_uncached(&self, order: ListOrder) -> Result<Vec<Task>> {
        let conn = db::open(&self.db_path)?;
        ops::list_tasks(&conn, order)
    }

    /// Drop cached rows so the next `list` reads the database.
    pub fn invalidate(&self) {
        self.cache().invalidate();
    }

    pub fn get(&self, id: i64) -> Result<Task> {
        let conn = db::open(&self.db_path)?;
        ops::get_task(&conn, id)
    }

    pub fn count(&self) -> Result<usize> {
        let conn = db::open(&self.db_path)?;
        ops::count_tasks(&conn)
    }

    pub fn add(&self, input: &TaskInput) -> Result<i64> {
        self.write("add", |conn| ops::add_task(conn, input))
    }

    pub fn update(&self, id: i64, input: &TaskInput) -> Result<()> {
        self.write("update", |conn| ops::update_task(conn, id, input))
    }

    pub fn remove(&self, id: i64) -> Result<()> {
        self.write("delete", |conn| ops::remove_task(conn, id))
    }

    pub fn complete(&self, id: i64) -> Result<()> {
        self.write("complete", |conn| ops::mark_complete(conn, id))
    }

    pub fn import(&self, inputs: &[TaskInput]) -> Result<usize> {
        self.write("import", |conn| ops::import_tasks(conn, inputs))
    }

    fn write<T>(&self, what: &str, op: impl FnOnce(&rusqlite::Connection) -> Result<T>) -> Result<T> {
        let result = db::open(&self.db_path).and_then(|conn| op(&conn));
        self.invalidate();
        if let Err(e) = &result {
            warn!("{what} failed: {e:#}");
        }
        result
    }
}
