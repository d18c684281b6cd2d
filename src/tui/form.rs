use chrono::NaiveDate;

use crate::model::{Importance, Status, Task, TaskInput, View};
use crate::validate::{parse_date, validate_input, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Start,
    End,
    People,
    Status,
    Importance,
    View,
    Notes,
    Attachments,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        Self::Title,
        Self::Start,
        Self::End,
        Self::People,
        Self::Status,
        Self::Importance,
        Self::View,
        Self::Notes,
        Self::Attachments,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Start => "Start",
            Self::End => "End",
            Self::People => "People",
            Self::Status => "Status",
            Self::Importance => "Importance",
            Self::View => "View",
            Self::Notes => "Notes",
            Self::Attachments => "Attachments",
        }
    }

    /// Choice fields cycle through a closed set instead of taking text.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Status | Self::Importance | Self::View)
    }
}

/// Step to the neighbour of `current` in `all`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let i = all.iter().position(|v| *v == current).unwrap_or(0);
    let n = all.len();
    let j = if forward { (i + 1) % n } else { (i + n - 1) % n };
    all[j]
}

/// Add/edit form state. Dates stay as typed text until submit.
pub struct TaskForm {
    /// `Some(id)` when editing an existing task.
    pub editing: Option<i64>,
    pub title: String,
    pub start: String,
    pub end: String,
    pub people: String,
    pub status: Status,
    pub importance: Importance,
    pub view: View,
    pub notes: String,
    pub attachments: String,
    pub focused: FormField,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn new(today: NaiveDate, view: View, importance: Importance) -> Self {
        Self::from_input(None, &TaskInput {
            view,
            importance,
            ..TaskInput::new("", today)
        })
    }

    pub fn edit(task: &Task) -> Self {
        Self::from_input(Some(task.id), &task.to_input())
    }

    fn from_input(editing: Option<i64>, input: &TaskInput) -> Self {
        Self {
            editing,
            title: input.title.clone(),
            start: input.start_date.to_string(),
            end: input.end_date.to_string(),
            people: input.people.clone(),
            status: input.status,
            importance: input.importance,
            view: input.view,
            notes: input.notes.clone(),
            attachments: input.attachments.clone(),
            focused: FormField::Title,
            error: None,
        }
    }

    /// Text buffer of the focused field, or `None` on a choice field.
    pub fn focused_buf_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Title => Some(&mut self.title),
            FormField::Start => Some(&mut self.start),
            FormField::End => Some(&mut self.end),
            FormField::People => Some(&mut self.people),
            FormField::Notes => Some(&mut self.notes),
            FormField::Attachments => Some(&mut self.attachments),
            FormField::Status | FormField::Importance | FormField::View => None,
        }
    }

    /// Move the focused choice field to its next or previous value.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.focused {
            FormField::Status => self.status = cycle(&Status::ALL, self.status, forward),
            FormField::Importance => {
                self.importance = cycle(&Importance::ALL, self.importance, forward)
            }
            FormField::View => self.view = cycle(&View::ALL, self.view, forward),
            _ => {}
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Start => self.start.clone(),
            FormField::End => self.end.clone(),
            FormField::People => self.people.clone(),
            FormField::Status => self.status.to_string(),
            FormField::Importance => self.importance.to_string(),
            FormField::View => self.view.to_string(),
            FormField::Notes => self.notes.clone(),
            FormField::Attachments => self.attachments.clone(),
        }
    }

    pub fn next_field(&mut self) {
        self.focused = cycle(&FormField::ALL, self.focused, true);
    }

    pub fn prev_field(&mut self) {
        self.focused = cycle(&FormField::ALL, self.focused, false);
    }

    pub fn to_input(&self) -> Result<TaskInput, ValidationError> {
        let input = TaskInput {
            title: self.title.clone(),
            start_date: parse_date(&self.start)?,
            end_date: parse_date(&self.end)?,
            people: self.people.clone(),
            status: self.status,
            importance: self.importance,
            view: self.view,
            notes: self.notes.clone(),
            attachments: self.attachments.clone(),
        };
        validate_input(&input)?;
        Ok(input)
    }

    /// Parse and validate, recording the first problem in `error`.
    pub fn validate(&mut self) -> Option<TaskInput> {
        match self.to_input() {
            Ok(input) => {
                self.error = None;
                Some(input)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
