//! CSV export and import.
//!
//! Column names follow the spreadsheet layout the dashboard originally kept
//! its tasks in, so a sheet downloaded as CSV imports directly.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Writer};
use serde::Deserialize;

use crate::model::{Importance, Status, Task, TaskInput, View};
use crate::validate::parse_date;

pub const HEADERS: [&str; 11] = [
    "ID",
    "Tasks",
    "Start Date",
    "End Date",
    "People",
    "Status",
    "Importance",
    "View",
    "Notes",
    "Attachments",
    "Created At",
];

/// `tasks_YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("tasks_{}.csv", date.format("%Y-%m-%d"))
}

/// Write a header row and one row per task. Returns the number of task rows.
pub fn write_csv<W: Write>(tasks: &[Task], out: W) -> Result<usize> {
    let mut writer = Writer::from_writer(out);
    writer
        .write_record(HEADERS)
        .context("failed to write CSV header")?;
    for task in tasks {
        writer
            .write_record([
                task.id.to_string(),
                task.title.clone(),
                task.start_date.to_string(),
                task.end_date.to_string(),
                task.people.clone(),
                task.status.to_string(),
                task.importance.to_string(),
                task.view.to_string(),
                task.notes.clone(),
                task.attachments.clone(),
                task.created_at.clone(),
            ])
            .with_context(|| format!("failed to write CSV row for task {}", task.id))?;
    }
    writer.flush().context("failed to flush CSV output")?;
    Ok(tasks.len())
}

pub fn to_csv_string(tasks: &[Task]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(tasks, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Write `tasks` to `dir/tasks_<date>.csv`, returning the path and row count.
pub fn export_to_dir(tasks: &[Task], dir: &Path, date: NaiveDate) -> Result<(PathBuf, usize)> {
    let path = dir.join(export_filename(date));
    let file = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let rows = write_csv(tasks, file)?;
    Ok((path, rows))
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Tasks")]
    title: String,
    #[serde(rename = "Start Date")]
    start_date: String,
    #[serde(rename = "End Date")]
    end_date: String,
    #[serde(rename = "People", default)]
    people: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "Importance", default)]
    importance: String,
    #[serde(rename = "View", default)]
    view: String,
    #[serde(rename = "Notes", default)]
    notes: String,
    #[serde(rename = "Attachments", default)]
    attachments: String,
}

fn label_or<T>(
    s: &str,
    default: T,
    parse: impl Fn(&str) -> Result<T, crate::validate::ValidationError>,
) -> Result<T> {
    if s.trim().is_empty() {
        Ok(default)
    } else {
        Ok(parse(s)?)
    }
}

impl CsvRow {
    fn into_input(self) -> Result<TaskInput> {
        Ok(TaskInput {
            title: self.title,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            people: self.people,
            status: label_or(&self.status, Status::Plan, Status::parse)?,
            importance: label_or(&self.importance, Importance::UrgentImportant, Importance::parse)?,
            view: label_or(&self.view, View::Daily, View::parse)?,
            notes: self.notes,
            attachments: self.attachments,
        })
    }
}

/// Parse CSV rows into task inputs. `ID` and `Created At` columns, when
/// present, are ignored: imported rows get fresh identifiers. Errors name
/// the offending line.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<TaskInput>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(input);
    let mut out = Vec::new();
    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = i + 2;
        let row = record.with_context(|| format!("line {line}: malformed row"))?;
        out.push(row.into_input().with_context(|| format!("line {line}"))?);
    }
    Ok(out)
}
