use chrono::NaiveDate;
use ratatui::widgets::ListState;

use super::form::TaskForm;
use crate::model::{Importance, Task, View};
use crate::store::Store;
use crate::views::{self, CompletedSort, Summary, ViewQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Time(View),
    Matrix,
    Completed,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Time(View::Daily),
        Tab::Time(View::Weekly),
        Tab::Time(View::Monthly),
        Tab::Time(View::Yearly),
        Tab::Matrix,
        Tab::Completed,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Time(v) => v.title(),
            Tab::Matrix => "Matrix",
            Tab::Completed => "Completed",
        }
    }
}

/// Modal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
    ConfirmDelete { id: i64, title: String },
}

pub struct App {
    pub tab: usize,
    pub quadrant: Importance,
    pub completed_sort: CompletedSort,
    pub tasks: Vec<Task>,
    pub rows: Vec<Task>,
    pub summary: Summary,
    pub cursor: usize,
    pub list_state: ListState,
    pub show_details: bool,
    pub mode: Mode,
    pub form: Option<TaskForm>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            tab: 0,
            quadrant: Importance::UrgentImportant,
            completed_sort: CompletedSort::default(),
            tasks: Vec::new(),
            rows: Vec::new(),
            summary: Summary::default(),
            cursor: 0,
            list_state: ListState::default(),
            show_details: false,
            mode: Mode::Normal,
            form: None,
            error: None,
            message: None,
        }
    }

    pub fn current_tab(&self) -> Tab {
        Tab::ALL[self.tab]
    }

    pub fn query(&self) -> ViewQuery {
        match self.current_tab() {
            Tab::Time(view) => ViewQuery::Time(view),
            Tab::Matrix => ViewQuery::Priority(self.quadrant),
            Tab::Completed => ViewQuery::Completed(self.completed_sort),
        }
    }

    /// Reload from the store (through its cache). A failed read keeps the
    /// last rows on screen and reports the error.
    pub fn refresh(&mut self, store: &Store) {
        match store.list() {
            Ok(tasks) => self.set_tasks(tasks),
            Err(e) => self.error = Some(format!("failed to load tasks: {e:#}")),
        }
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.summary = views::summary(&tasks);
        self.tasks = tasks;
        self.apply_view();
    }

    /// Recompute visible rows for the current tab, keeping the cursor on
    /// the same task when it is still visible.
    pub fn apply_view(&mut self) {
        let selected = self.selected().map(|t| t.id);
        self.rows = views::select(&self.tasks, &self.query())
            .into_iter()
            .cloned()
            .collect();
        if let Some(id) = selected {
            if let Some(pos) = self.rows.iter().position(|t| t.id == id) {
                self.cursor = pos;
            }
        }
        self.clamp_cursor();
    }

    pub fn clamp_cursor(&mut self) {
        if self.rows.is_empty() {
            self.cursor = 0;
            self.list_state.select(None);
        } else {
            if self.cursor >= self.rows.len() {
                self.cursor = self.rows.len() - 1;
            }
            self.list_state.select(Some(self.cursor));
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.rows.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    pub fn move_down(&mut self) {
        if !self.rows.is_empty() && self.cursor < self.rows.len() - 1 {
            self.cursor += 1;
            self.list_state.select(Some(self.cursor));
        }
    }

    pub fn select_tab(&mut self, tab: usize) {
        if tab < Tab::ALL.len() && tab != self.tab {
            self.tab = tab;
            self.cursor = 0;
            self.apply_view();
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab((self.tab + 1) % Tab::ALL.len());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab((self.tab + Tab::ALL.len() - 1) % Tab::ALL.len());
    }

    pub fn cycle_quadrant(&mut self, forward: bool) {
        let all = Importance::ALL;
        let i = all.iter().position(|q| *q == self.quadrant).unwrap_or(0);
        let n = all.len();
        self.quadrant = all[if forward { (i + 1) % n } else { (i + n - 1) % n }];
        self.cursor = 0;
        self.apply_view();
    }

    pub fn toggle_sort(&mut self) {
        self.completed_sort = self.completed_sort.toggled();
        self.apply_view();
    }

    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    /// Open the add form, preset to the current tab's view or quadrant.
    pub fn open_add_form(&mut self, today: NaiveDate) {
        let view = match self.current_tab() {
            Tab::Time(v) => v,
            _ => View::Daily,
        };
        let importance = match self.current_tab() {
            Tab::Matrix => self.quadrant,
            _ => Importance::UrgentImportant,
        };
        self.form = Some(TaskForm::new(today, view, importance));
    }

    pub fn open_edit_form(&mut self) {
        if let Some(task) = self.selected() {
            self.form = Some(TaskForm::edit(task));
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validate the open form and write it. Validation problems are shown in
    /// the form, storage problems in the status line. Either way the form
    /// stays open.
    pub fn submit_form(&mut self, store: &Store) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let Some(input) = form.validate() else {
            return;
        };
        let result = match form.editing {
            Some(id) => store.update(id, &input).map(|()| format!("Updated task {id}")),
            None => store.add(&input).map(|id| format!("Added task {id}")),
        };
        match result {
            Ok(msg) => {
                self.form = None;
                self.message = Some(msg);
                self.refresh(store);
            }
            Err(e) => self.error = Some(format!("{e:#}")),
        }
    }

    pub fn complete(&mut self, store: &Store, id: i64) {
        match store.complete(id) {
            Ok(()) => self.message = Some(format!("Marked task {id} complete")),
            Err(e) => self.error = Some(format!("{e:#}")),
        }
        self.refresh(store);
    }

    pub fn delete(&mut self, store: &Store, id: i64) {
        match store.remove(id) {
            Ok(()) => self.message = Some(format!("Deleted task {id}")),
            Err(e) => self.error = Some(format!("{e:#}")),
        }
        self.refresh(store);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
