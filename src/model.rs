use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Status {
    #[serde(rename = "Plan")]
    Plan,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Stuck")]
    Stuck,
    #[serde(rename = "Complete")]
    Complete,
}

impl Status {
    pub const ALL: [Status; 4] = [Self::Plan, Self::InProgress, Self::Stuck, Self::Complete];

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                field: "status",
                value: s.to_string(),
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "Plan",
            Self::InProgress => "In Progress",
            Self::Stuck => "Stuck",
            Self::Complete => "Complete",
        }
    }

    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }

    /// Returns display icon: x=complete, *=in progress, !=stuck, .=plan
    pub fn icon(self) -> &'static str {
        match self {
            Self::Plan => ".",
            Self::InProgress => "*",
            Self::Stuck => "!",
            Self::Complete => "x",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Eisenhower-matrix quadrant. `ALL` lists the quadrants in matrix order;
/// sorting by importance compares the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Importance {
    #[serde(rename = "Urgent and Important")]
    UrgentImportant,
    #[serde(rename = "Important and Not Urgent")]
    ImportantNotUrgent,
    #[serde(rename = "Not Important but Urgent")]
    UrgentNotImportant,
    #[serde(rename = "Not Important and Not Urgent")]
    NeitherUrgentNorImportant,
}

impl Importance {
    pub const ALL: [Importance; 4] = [
        Self::UrgentImportant,
        Self::ImportantNotUrgent,
        Self::UrgentNotImportant,
        Self::NeitherUrgentNorImportant,
    ];

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                field: "importance",
                value: s.to_string(),
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UrgentImportant => "Urgent and Important",
            Self::ImportantNotUrgent => "Important and Not Urgent",
            Self::UrgentNotImportant => "Not Important but Urgent",
            Self::NeitherUrgentNorImportant => "Not Important and Not Urgent",
        }
    }

    /// Short label for tab titles and narrow columns.
    pub fn short(self) -> &'static str {
        match self {
            Self::UrgentImportant => "Do",
            Self::ImportantNotUrgent => "Schedule",
            Self::UrgentNotImportant => "Delegate",
            Self::NeitherUrgentNorImportant => "Drop",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-grouping tag. Unrelated to status or importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum View {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl View {
    pub const ALL: [View; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownLabel {
                field: "view",
                value: s.to_string(),
            })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserializes a label column through `parse`, so JSON input accepts any case.
macro_rules! label_from_string {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = ValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }
    )*};
}

label_from_string!(Status, Importance, View);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub people: String,
    pub status: Status,
    pub importance: Importance,
    pub view: View,
    pub notes: String,
    pub attachments: String,
    pub created_at: String,
}

impl Task {
    /// The mutable part of this task, e.g. to prefill an edit form.
    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            people: self.people.clone(),
            status: self.status,
            importance: self.importance,
            view: self.view,
            notes: self.notes.clone(),
            attachments: self.attachments.clone(),
        }
    }
}

/// Every field a user may set, for both inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub people: String,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default = "default_importance")]
    pub importance: Importance,
    #[serde(default = "default_view")]
    pub view: View,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attachments: String,
}

fn default_status() -> Status {
    Status::Plan
}

fn default_importance() -> Importance {
    Importance::UrgentImportant
}

fn default_view() -> View {
    View::Daily
}

impl TaskInput {
    /// A blank task spanning a single day.
    pub fn new(title: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            title: title.into(),
            start_date: today,
            end_date: today,
            people: String::new(),
            status: default_status(),
            importance: default_importance(),
            view: default_view(),
            notes: String::new(),
            attachments: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(View::parse("Daily").unwrap(), View::Daily);
        assert_eq!(View::parse(" YEARLY ").unwrap(), View::Yearly);
        assert_eq!(Status::parse("in progress").unwrap(), Status::InProgress);
        assert_eq!(
            Importance::parse("not important but urgent").unwrap(),
            Importance::UrgentNotImportant
        );
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert!(View::parse("hourly").is_err());
        assert!(Status::parse("Done").is_err());
        assert!(Importance::parse("Whenever").is_err());
    }

    #[test]
    fn labels_round_trip_through_as_str() {
        for s in Status::ALL {
            assert_eq!(Status::parse(s.as_str()).unwrap(), s);
        }
        for i in Importance::ALL {
            assert_eq!(Importance::parse(i.as_str()).unwrap(), i);
        }
        for v in View::ALL {
            assert_eq!(View::parse(v.as_str()).unwrap(), v);
        }
    }

    #[test]
    fn deserialize_ignores_label_case() {
        let input: TaskInput = serde_json::from_str(
            r#"{"title":"t","start_date":"2024-03-01","end_date":"2024-03-02",
                "status":"in progress","importance":"URGENT AND IMPORTANT","view":"Weekly"}"#,
        )
        .unwrap();
        assert_eq!(input.status, Status::InProgress);
        assert_eq!(input.importance, Importance::UrgentImportant);
        assert_eq!(input.view, View::Weekly);

        let err = serde_json::from_str::<View>("\"hourly\"").unwrap_err();
        assert!(err.to_string().contains("hourly"));
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let json = serde_json::to_string(&View::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        let imp: Importance = serde_json::from_str("\"Important and Not Urgent\"").unwrap();
        assert_eq!(imp, Importance::ImportantNotUrgent);
    }

    #[test]
    fn input_defaults_fill_optional_fields() {
        let input: TaskInput = serde_json::from_str(
            r#"{"title":"t","start_date":"2024-03-01","end_date":"2024-03-02"}"#,
        )
        .unwrap();
        assert_eq!(input.status, Status::Plan);
        assert_eq!(input.importance, Importance::UrgentImportant);
        assert_eq!(input.view, View::Daily);
        assert!(input.people.is_empty());
    }
}
