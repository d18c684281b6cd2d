mod app;
mod event;
mod form;
mod render;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::info;
use ratatui::prelude::*;

use crate::export;
use crate::ops::ListOrder;
use crate::store::Store;
use crate::watch;
use app::App;
use event::KeyAction;

pub fn run(store: &Store, poll_interval: u64) -> Result<()> {
    let mut app = App::new();
    app.refresh(store);

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, store, poll_interval);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

/// Write every task to `tasks_<today>.csv` in the working directory.
fn export_csv(store: &Store) -> Result<String> {
    let tasks = store.list_uncached(ListOrder::Id)?;
    let today = Local::now().date_naive();
    let (path, rows) = export::export_to_dir(&tasks, Path::new("."), today)?;
    info!("exported {rows} tasks to {}", path.display());
    Ok(format!("Exported {rows} tasks to {}", path.display()))
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &Store,
    poll_interval: u64,
) -> Result<()> {
    let poll_duration = Duration::from_millis(poll_interval);

    let (_watcher, rx) = watch::watch_db(store.db_path())?;

    loop {
        terminal.draw(|frame| render::draw(frame, app))?;

        if ct_event::poll(poll_duration)? {
            if let Event::Key(key) = ct_event::read()? {
                if key.kind == KeyEventKind::Press {
                    match event::handle_key(app, key) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Submit => app.submit_form(store),
                        KeyAction::AddForm => app.open_add_form(Local::now().date_naive()),
                        KeyAction::Complete(id) => app.complete(store, id),
                        KeyAction::Delete(id) => app.delete(store, id),
                        KeyAction::Export => match export_csv(store) {
                            Ok(msg) => app.message = Some(msg),
                            Err(e) => app.error = Some(format!("export failed: {e:#}")),
                        },
                        KeyAction::Refresh => {
                            store.invalidate();
                            app.refresh(store);
                        }
                        KeyAction::Continue => {}
                    }
                }
            }
        } else {
            // Idle tick: picks up rows once the cache entry expires.
            app.refresh(store);
        }

        // Another process wrote to the database.
        if watch::wait_for_change(&rx, Duration::ZERO) {
            watch::drain_events(&rx);
            store.invalidate();
            app.refresh(store);
        }
    }
}
