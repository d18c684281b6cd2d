use crate::model::Task;
use crate::views::Summary;

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID:          {}\n", task.id));
    out.push_str(&format!("Title:       {}\n", task.title));
    out.push_str(&format!("Start:       {}\n", task.start_date));
    out.push_str(&format!("End:         {}\n", task.end_date));
    if !task.people.is_empty() {
        out.push_str(&format!("People:      {}\n", task.people));
    }
    out.push_str(&format!("Status:      {}\n", task.status));
    out.push_str(&format!("Importance:  {}\n", task.importance));
    out.push_str(&format!("View:        {}\n", task.view));
    if !task.notes.is_empty() {
        out.push_str(&format!("Notes:       {}\n", task.notes));
    }
    if !task.attachments.is_empty() {
        out.push_str(&format!("Attachments: {}\n", task.attachments));
    }
    out.push_str(&format!("Created:     {}\n", task.created_at));
    out
}

/// One line per task: icon, id, title, date span and owner.
pub fn format_task_list(tasks: &[&Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        let people = if task.people.is_empty() {
            String::new()
        } else {
            format!("  @{}", task.people)
        };
        out.push_str(&format!(
            "{} {:>4}  {}  [{} .. {}] {}{}\n",
            task.status.icon(),
            task.id,
            task.title,
            task.start_date,
            task.end_date,
            task.importance.short(),
            people
        ));
    }
    out
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "{} tasks: {} open, {} complete\n",
        summary.total, summary.active, summary.completed
    )
}
