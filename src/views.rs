//! Selecting and ordering the tasks shown by each dashboard tab.

use std::cmp::Reverse;
use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::model::{Importance, Task, View};

/// Order of the completed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletedSort {
    /// End date, latest first. The end date stands in for the completion date.
    #[default]
    EndDateDesc,
    /// Importance label, alphabetically.
    Importance,
}

impl CompletedSort {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "end-date" | "end_date" | "date" => Ok(Self::EndDateDesc),
            "importance" | "priority" => Ok(Self::Importance),
            _ => bail!("invalid sort '{s}': must be end-date or importance"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EndDateDesc => "end-date",
            Self::Importance => "importance",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::EndDateDesc => Self::Importance,
            Self::Importance => Self::EndDateDesc,
        }
    }
}

/// Which subset of tasks to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewQuery {
    /// Open tasks tagged with a time bucket.
    Time(View),
    /// Open tasks in one Eisenhower quadrant.
    Priority(Importance),
    /// Complete tasks only.
    Completed(CompletedSort),
}

impl ViewQuery {
    /// Build a query from user-facing strings: `axis` is `time`, `priority`
    /// or `completed`. Missing qualifiers fall back to the first choice.
    pub fn parse(
        axis: &str,
        view: Option<&str>,
        importance: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Self> {
        match axis {
            "time" => {
                let view = view.map(View::parse).transpose()?.unwrap_or(View::Daily);
                Ok(Self::Time(view))
            }
            "priority" | "matrix" => {
                let importance = importance
                    .map(Importance::parse)
                    .transpose()?
                    .unwrap_or(Importance::UrgentImportant);
                Ok(Self::Priority(importance))
            }
            "completed" => {
                let sort = sort.map(CompletedSort::parse).transpose()?.unwrap_or_default();
                Ok(Self::Completed(sort))
            }
            _ => bail!("invalid axis '{axis}': must be time, priority, or completed"),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Time(view) => !task.status.is_complete() && task.view == *view,
            Self::Priority(importance) => {
                !task.status.is_complete() && task.importance == *importance
            }
            Self::Completed(_) => task.status.is_complete(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Time(view) => format!("{} tasks", view.title()),
            Self::Priority(importance) => importance.as_str().to_string(),
            Self::Completed(CompletedSort::EndDateDesc) => "Completed (by end date)".into(),
            Self::Completed(CompletedSort::Importance) => "Completed (by importance)".into(),
        }
    }
}

/// Tasks matching `query`, in input order for the time and priority axes
/// and in the requested order for the completed axis. Sorts are stable.
pub fn select<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| query.matches(t)).collect();
    if let ViewQuery::Completed(sort) = query {
        match sort {
            CompletedSort::EndDateDesc => out.sort_by_key(|t| Reverse(t.end_date)),
            CompletedSort::Importance => out.sort_by_key(|t| t.importance.as_str()),
        }
    }
    out
}

/// Counts for tab badges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub by_view: HashMap<View, usize>,
    pub by_importance: HashMap<Importance, usize>,
}

impl Summary {
    pub fn view_count(&self, view: View) -> usize {
        self.by_view.get(&view).copied().unwrap_or(0)
    }

    pub fn importance_count(&self, importance: Importance) -> usize {
        self.by_importance.get(&importance).copied().unwrap_or(0)
    }
}

pub fn summary(tasks: &[Task]) -> Summary {
    let mut s = Summary {
        total: tasks.len(),
        ..Summary::default()
    };
    for task in tasks {
        if task.status.is_complete() {
            s.completed += 1;
            continue;
        }
        s.active += 1;
        *s.by_view.entry(task.view).or_default() += 1;
        *s.by_importance.entry(task.importance).or_default() += 1;
    }
    s
}
