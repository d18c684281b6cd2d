use std::fmt::Write;

use crate::model::{Importance, Status, Task, TaskInput, View};
use crate::views::{CompletedSort, Summary, ViewQuery};

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Query string selecting `query`, in the form `GET /` accepts.
fn href(query: &ViewQuery) -> String {
    match query {
        ViewQuery::Time(view) => format!("/?axis=time&view={}", view.as_str()),
        ViewQuery::Priority(importance) => {
            format!("/?axis=priority&importance={}", importance.as_str().replace(' ', "+"))
        }
        ViewQuery::Completed(sort) => format!("/?axis=completed&sort={}", sort.as_str()),
    }
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 2rem; }
nav a { margin-right: 1rem; }
nav a.current { font-weight: bold; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 4px 8px; text-align: left; }
.muted { color: #888; }
form input, form select { margin: 2px 6px 2px 0; }
</style>";

const SCRIPT: &str = "<script>
async function send(method, url, body) {
  const opts = { method, headers: { 'Content-Type': 'application/json' } };
  if (body) opts.body = JSON.stringify(body);
  const resp = await fetch(url, opts);
  if (!resp.ok) {
    const err = await resp.json().catch(() => ({ error: resp.statusText }));
    alert(err.error);
    return;
  }
  location.reload();
}
function addTask(form) {
  const data = Object.fromEntries(new FormData(form));
  if (!data.end_date) data.end_date = data.start_date;
  send('POST', '/api/tasks', data);
  return false;
}
function editTask(form, id) {
  const data = Object.fromEntries(new FormData(form));
  if (!data.end_date) data.end_date = data.start_date;
  send('PUT', `/api/tasks/${id}`, data);
  return false;
}
function toggleEdit(id) {
  const row = document.getElementById('edit-' + id);
  row.hidden = !row.hidden;
}
function completeTask(id) { send('POST', `/api/tasks/${id}/complete`); }
function deleteTask(id) { if (confirm('Delete task ' + id + '?')) send('DELETE', `/api/tasks/${id}`); }
</script>";

fn nav(out: &mut String, current: &ViewQuery, summary: &Summary) {
    out.push_str("<nav>");
    let mut link = |query: ViewQuery, label: String| {
        let is_current = match (query, current) {
            (ViewQuery::Time(a), ViewQuery::Time(b)) => a == *b,
            (ViewQuery::Priority(_), ViewQuery::Priority(_))
            | (ViewQuery::Completed(_), ViewQuery::Completed(_)) => true,
            _ => false,
        };
        let class = if is_current { " class=\"current\"" } else { "" };
        let _ = write!(out, "<a href=\"{}\"{class}>{}</a>", href(&query), escape_html(&label));
    };
    for view in View::ALL {
        link(
            ViewQuery::Time(view),
            format!("{} ({})", view.title(), summary.view_count(view)),
        );
    }
    let quadrant = match current {
        ViewQuery::Priority(q) => *q,
        _ => Importance::UrgentImportant,
    };
    link(
        ViewQuery::Priority(quadrant),
        format!("Matrix ({})", summary.active),
    );
    link(
        ViewQuery::Completed(CompletedSort::default()),
        format!("Completed ({})", summary.completed),
    );
    out.push_str("</nav>\n");
}

/// Secondary links: the four quadrants, or the two completed sorts.
fn sub_nav(out: &mut String, current: &ViewQuery, summary: &Summary) {
    let choices: Vec<(ViewQuery, String)> = match current {
        ViewQuery::Priority(_) => Importance::ALL
            .iter()
            .map(|q| {
                (
                    ViewQuery::Priority(*q),
                    format!("{} ({})", q.as_str(), summary.importance_count(*q)),
                )
            })
            .collect(),
        ViewQuery::Completed(_) => [CompletedSort::EndDateDesc, CompletedSort::Importance]
            .iter()
            .map(|s| (ViewQuery::Completed(*s), format!("by {}", s.as_str())))
            .collect(),
        ViewQuery::Time(_) => return,
    };
    out.push_str("<nav>");
    for (query, label) in choices {
        let class = if query == *current { " class=\"current\"" } else { "" };
        let _ = write!(out, "<a href=\"{}\"{class}>{}</a>", href(&query), escape_html(&label));
    }
    out.push_str("</nav>\n");
}

fn task_rows(out: &mut String, rows: &[&Task]) {
    out.push_str(
        "<table>\n<tr><th>ID</th><th>Task</th><th>Start</th><th>End</th><th>People</th>\
         <th>Status</th><th>Importance</th><th>Notes</th><th>Attachments</th><th></th></tr>\n",
    );
    if rows.is_empty() {
        out.push_str("<tr><td colspan=\"10\" class=\"muted\">No tasks.</td></tr>\n");
    }
    for task in rows {
        let complete = if task.status.is_complete() {
            String::new()
        } else {
            format!("<button onclick=\"completeTask({})\">Complete</button>", task.id)
        };
        let _ = writeln!(
            out,
            "<tr><td>{id}</td><td>{title}</td><td>{start}</td><td>{end}</td><td>{people}</td>\
             <td>{status}</td><td>{importance}</td><td>{notes}</td><td>{attachments}</td>\
             <td><button onclick=\"toggleEdit({id})\">Edit</button>{complete}\
             <button onclick=\"deleteTask({id})\">Delete</button></td></tr>",
            id = task.id,
            title = escape_html(&task.title),
            start = task.start_date,
            end = task.end_date,
            people = escape_html(&task.people),
            status = task.status,
            importance = task.importance,
            notes = escape_html(&task.notes),
            attachments = escape_html(&task.attachments),
        );
        let _ = writeln!(
            out,
            "<tr id=\"edit-{id}\" hidden><td colspan=\"10\">\
             <form onsubmit=\"return editTask(this, {id})\">{fields}\
             <button type=\"submit\">Save</button></form></td></tr>",
            id = task.id,
            fields = task_fields(&task.to_input()),
        );
    }
    out.push_str("</table>\n");
}

fn options<T: Copy + PartialEq + std::fmt::Display>(all: &[T], selected: T) -> String {
    all.iter()
        .map(|v| {
            let sel = if *v == selected { " selected" } else { "" };
            format!("<option{sel}>{v}</option>")
        })
        .collect()
}

/// Inputs for every editable field, prefilled from `input`.
fn task_fields(input: &TaskInput) -> String {
    format!(
        "<input name=\"title\" placeholder=\"Task\" value=\"{title}\" required>\
         <input name=\"start_date\" type=\"date\" value=\"{start}\" required>\
         <input name=\"end_date\" type=\"date\" value=\"{end}\">\
         <input name=\"people\" placeholder=\"People\" value=\"{people}\">\
         <select name=\"status\">{status}</select>\
         <select name=\"importance\">{importance}</select>\
         <select name=\"view\">{view}</select>\
         <input name=\"notes\" placeholder=\"Notes\" value=\"{notes}\">\
         <input name=\"attachments\" placeholder=\"Attachment link\" value=\"{attachments}\">",
        title = escape_html(&input.title),
        start = input.start_date,
        end = input.end_date,
        people = escape_html(&input.people),
        status = options(&Status::ALL, input.status),
        importance = options(&Importance::ALL, input.importance),
        view = options(&View::ALL, input.view),
        notes = escape_html(&input.notes),
        attachments = escape_html(&input.attachments),
    )
}

fn add_form(out: &mut String, current: &ViewQuery) {
    let mut input = TaskInput::new("", chrono::Local::now().date_naive());
    if let ViewQuery::Time(view) = current {
        input.view = *view;
    }
    if let ViewQuery::Priority(importance) = current {
        input.importance = *importance;
    }
    let _ = writeln!(
        out,
        "<h2>Add task</h2>\n<form onsubmit=\"return addTask(this)\">{}\
         <button type=\"submit\">Add</button></form>",
        task_fields(&input),
    );
}

/// The full dashboard page for one view.
pub fn render_page(rows: &[&Task], query: &ViewQuery, summary: &Summary) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>taskboard</title>\n");
    out.push_str(STYLE);
    out.push_str(SCRIPT);
    out.push_str("</head><body>\n<h1>taskboard</h1>\n");
    let _ = writeln!(
        out,
        "<p class=\"muted\">{} tasks: {} open, {} complete. <a href=\"/export.csv\">Download CSV</a></p>",
        summary.total, summary.active, summary.completed
    );
    nav(&mut out, query, summary);
    sub_nav(&mut out, query, summary);
    let _ = writeln!(out, "<h2>{}</h2>", escape_html(&query.title()));
    task_rows(&mut out, rows);
    if !matches!(query, ViewQuery::Completed(_)) {
        add_form(&mut out, query);
    }
    out.push_str("</body></html>\n");
    out
}
