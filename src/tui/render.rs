use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};

use super::app::{App, Mode, Tab};
use super::form::{FormField, TaskForm};
use crate::model::{Importance, Status, Task};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    if app.show_details {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        render_list(frame, app, body[0]);
        render_details(frame, app, body[1]);
    } else {
        render_list(frame, app, chunks[1]);
    }

    render_status_line(frame, app, chunks[2]);

    if let Some(form) = &app.form {
        render_form(frame, form);
    }
    match &app.mode {
        Mode::Help => render_help(frame),
        Mode::ConfirmDelete { title, .. } => render_confirm(frame, title),
        Mode::Normal => {}
    }
}

/// Center a rectangle within an area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

pub fn status_style(status: Status) -> Style {
    match status {
        Status::Complete => Style::default().dim(),
        Status::InProgress => Style::default().fg(Color::Green),
        Status::Stuck => Style::default().fg(Color::Red),
        Status::Plan => Style::default().fg(Color::Yellow),
    }
}

fn importance_style(importance: Importance) -> Style {
    match importance {
        Importance::UrgentImportant => Style::default().fg(Color::Red).bold(),
        Importance::ImportantNotUrgent => Style::default().fg(Color::Cyan),
        Importance::UrgentNotImportant => Style::default().fg(Color::Magenta),
        Importance::NeitherUrgentNorImportant => Style::default().fg(Color::DarkGray),
    }
}

fn tab_label(app: &App, tab: Tab) -> String {
    let count = match tab {
        Tab::Time(view) => app.summary.view_count(view),
        Tab::Matrix => app.summary.active,
        Tab::Completed => app.summary.completed,
    };
    format!("{} ({count})", tab.title())
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(tab_label(app, *tab)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab)
        .block(Block::default().borders(Borders::ALL).title(" taskboard "))
        .highlight_style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(tabs, area);
}

fn task_line(task: &Task) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{} ", task.status.icon()), status_style(task.status)),
        Span::styled(format!("{:>4} ", task.id), Style::default().fg(Color::DarkGray)),
        Span::styled(task.title.clone(), Style::default().bold()),
        Span::raw(format!("  {} .. {} ", task.start_date, task.end_date)),
        Span::styled(task.importance.short(), importance_style(task.importance)),
    ];
    if !task.people.is_empty() {
        spans.push(Span::styled(
            format!("  @{}", task.people),
            Style::default().fg(Color::Blue),
        ));
    }
    Line::from(spans)
}

fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut title = format!(" {} ", app.query().title());
    if app.current_tab() == Tab::Matrix {
        title = format!(
            " {} ({}) [/]: quadrant ",
            app.quadrant,
            app.summary.importance_count(app.quadrant)
        );
    } else if app.current_tab() == Tab::Completed {
        title.push_str("s: sort ");
    }

    let items: Vec<ListItem> = if app.rows.is_empty() {
        vec![ListItem::new(Line::styled(
            "No tasks here. Press a to add one.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.rows.iter().map(|t| ListItem::new(task_line(t))).collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn detail_row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let text = match app.selected() {
        Some(task) => vec![
            detail_row("ID", task.id.to_string()),
            detail_row("Title", task.title.clone()),
            detail_row("Start", task.start_date.to_string()),
            detail_row("End", task.end_date.to_string()),
            detail_row("People", task.people.clone()),
            detail_row("Status", task.status.to_string()),
            detail_row("Importance", task.importance.to_string()),
            detail_row("View", task.view.to_string()),
            detail_row("Attachments", task.attachments.clone()),
            detail_row("Created", task.created_at.clone()),
            Line::raw(""),
            Line::raw(task.notes.clone()),
        ],
        None => vec![Line::raw("No task selected.")],
    };
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(err) = &app.error {
        Line::styled(err.clone(), Style::default().fg(Color::Red))
    } else if let Some(msg) = &app.message {
        Line::styled(msg.clone(), Style::default().fg(Color::Green))
    } else {
        Line::styled(
            format!(
                "{} open, {} complete  ?: help  a: add  e: edit  c: complete  d: delete  q: quit",
                app.summary.active, app.summary.completed
            ),
            Style::default().fg(Color::DarkGray),
        )
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame, form: &TaskForm) {
    let term = frame.area();
    let width = 64.min(term.width.saturating_sub(4));
    let rows = FormField::ALL.len() as u16 + 1 + u16::from(form.error.is_some());
    let height = (rows + 2).min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);

    frame.render_widget(Clear, area);

    let title = match form.editing {
        Some(id) => format!(" Edit Task {id} "),
        None => " Add Task ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = form.focused == *field;
            let label_style = if focused {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            };
            let value = form.value(*field);
            let value = match (focused, field.is_choice()) {
                (true, true) => format!("< {value} >"),
                (true, false) => format!("{value}_"),
                (false, _) => value,
            };
            Line::from(vec![
                Span::styled(format!("{:<12}", field.label()), label_style),
                Span::raw(value),
            ])
        })
        .collect();

    if let Some(err) = &form.error {
        lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    }
    lines.push(Line::styled(
        "Enter: save  Tab/S-Tab: fields  Left/Right: choose  C-u: clear  Esc: cancel",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines), inner);
}

const HELP: &[(&str, &str)] = &[
    ("j/Down  ", "Move down"),
    ("k/Up    ", "Move up"),
    ("Tab/l   ", "Next tab"),
    ("S-Tab/h ", "Previous tab"),
    ("1-6     ", "Jump to tab"),
    ("[ ]     ", "Change quadrant (Matrix)"),
    ("s       ", "Toggle sort (Completed)"),
    ("Enter   ", "Toggle details"),
    ("a       ", "Add task"),
    ("e       ", "Edit task"),
    ("c       ", "Mark complete"),
    ("d       ", "Delete task"),
    ("x       ", "Export CSV"),
    ("r       ", "Reload"),
    ("?       ", "Toggle help"),
    ("q/Esc   ", "Quit"),
];

fn render_help(frame: &mut Frame) {
    let term = frame.area();
    let width = 44.min(term.width.saturating_sub(4));
    let height = (HELP.len() as u16 + 2).min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(*key, Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_confirm(frame: &mut Frame, task_title: &str) {
    let term = frame.area();
    let width = 50.min(term.width.saturating_sub(4));
    let height = 5.min(term.height.saturating_sub(2));
    let area = centered_rect(width, height, term);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Delete ")
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(task_title, Style::default().bold()),
            Span::raw("?"),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Proceed? "),
            Span::styled("y", Style::default().fg(Color::Green).bold()),
            Span::raw("/"),
            Span::styled("n", Style::default().fg(Color::Red).bold()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::View;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn make_task(id: i64, title: &str, status: Status) -> Task {
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        Task {
            id,
            title: title.into(),
            start_date: d,
            end_date: d,
            people: "ana".into(),
            status,
            importance: Importance::UrgentImportant,
            view: View::Daily,
            notes: String::new(),
            attachments: String::new(),
            created_at: String::new(),
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn centered_rect_centers_within_area() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered_rect(40, 10, area);
        assert_eq!(r.x, 20);
        assert_eq!(r.y, 7);
        assert_eq!(r.width, 40);
        assert_eq!(r.height, 10);
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let r = centered_rect(40, 20, area);
        assert_eq!(r.width, 20);
        assert_eq!(r.height, 10);
    }

    #[test]
    fn draws_tabs_and_rows() {
        let mut app = App::new();
        app.set_tasks(vec![
            make_task(1, "pay rent", Status::Plan),
            make_task(2, "old thing", Status::Complete),
        ]);
        let out = screen(&mut app);
        assert!(out.contains("Daily (1)"));
        assert!(out.contains("Completed (1)"));
        assert!(out.contains("pay rent"));
        assert!(!out.contains("old thing"));
    }

    #[test]
    fn empty_tab_shows_hint() {
        let mut app = App::new();
        let out = screen(&mut app);
        assert!(out.contains("No tasks here"));
    }

    #[test]
    fn overlays_render() {
        let mut app = App::new();
        app.set_tasks(vec![make_task(4, "call bank", Status::Stuck)]);
        app.mode = Mode::ConfirmDelete {
            id: 4,
            title: "call bank".into(),
        };
        assert!(screen(&mut app).contains("Proceed?"));

        app.mode = Mode::Normal;
        app.open_add_form(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        let out = screen(&mut app);
        assert!(out.contains("Add Task"));
        assert!(out.contains("Importance"));
    }
}
