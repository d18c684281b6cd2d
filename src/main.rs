mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use log::LevelFilter;
use rusqlite::Connection;

use cli::{Cli, Command, FieldArgs};
use taskboard::config::{self, Config};
use taskboard::model::{Importance, Status, TaskInput, View};
use taskboard::ops::{self, ListOrder};
use taskboard::store::Store;
use taskboard::validate::parse_date;
use taskboard::views::{self, CompletedSort, ViewQuery};
use taskboard::{db, export, logging, output, paths, tui, web};

/// Overlay the fields given on the command line onto `input`.
fn apply_fields(input: &mut TaskInput, fields: FieldArgs) -> Result<()> {
    if let Some(s) = fields.start {
        input.start_date = parse_date(&s)?;
    }
    if let Some(e) = fields.end {
        input.end_date = parse_date(&e)?;
    }
    if let Some(p) = fields.people {
        input.people = p;
    }
    if let Some(s) = fields.status {
        input.status = Status::parse(&s)?;
    }
    if let Some(i) = fields.importance {
        input.importance = Importance::parse(&i)?;
    }
    if let Some(v) = fields.view {
        input.view = View::parse(&v)?;
    }
    if let Some(n) = fields.notes {
        input.notes = n;
    }
    if let Some(a) = fields.attachments {
        input.attachments = a;
    }
    Ok(())
}

/// Build the new task for `add`. A lone `--start` also sets the end date,
/// so a one-day task needs a single flag.
fn new_task_input(title: String, fields: FieldArgs) -> Result<TaskInput> {
    let today = Local::now().date_naive();
    let mut input = TaskInput::new(title, today);
    let start_only = fields.start.is_some() && fields.end.is_none();
    apply_fields(&mut input, fields)?;
    if start_only {
        input.end_date = input.start_date;
    }
    Ok(input)
}

fn dispatch(conn: &Connection, command: Command) -> Result<()> {
    match command {
        Command::Add {
            title,
            fields,
            json,
        } => {
            let input = new_task_input(title, fields)?;
            let id = ops::add_task(conn, &input)?;
            if json {
                let task = ops::get_task(conn, id)?;
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("{id}");
            }
            eprintln!("Added task {id} '{}'", input.title);
        }

        Command::Edit { id, title, fields } => {
            let mut input = ops::get_task(conn, id)?.to_input();
            if let Some(t) = title {
                input.title = t;
            }
            apply_fields(&mut input, fields)?;
            ops::update_task(conn, id, &input)?;
            eprintln!("Updated task {id}");
        }

        Command::Done { id } => {
            ops::mark_complete(conn, id)?;
            eprintln!("Marked task {id} complete");
        }

        Command::Rm { id } => {
            ops::remove_task(conn, id)?;
            eprintln!("Removed task {id}");
        }

        Command::Show { id, json } => {
            let task = ops::get_task(conn, id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print!("{}", output::format_task_detail(&task));
            }
        }

        Command::List {
            view,
            importance,
            completed,
            sort,
            json,
        } => {
            let tasks = ops::list_tasks(conn, ListOrder::NewestFirst)?;
            let query = if completed {
                Some(ViewQuery::Completed(
                    sort.as_deref()
                        .map(CompletedSort::parse)
                        .transpose()?
                        .unwrap_or_default(),
                ))
            } else if let Some(v) = view {
                Some(ViewQuery::Time(View::parse(&v)?))
            } else if let Some(i) = importance {
                Some(ViewQuery::Priority(Importance::parse(&i)?))
            } else {
                None
            };
            let selected = match &query {
                Some(q) => views::select(&tasks, q),
                None => tasks.iter().collect(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&selected)?);
            } else {
                print!("{}", output::format_task_list(&selected));
                if query.is_none() {
                    eprint!("{}", output::format_summary(&views::summary(&tasks)));
                }
            }
        }

        Command::Export { dir } => {
            let tasks = ops::list_tasks(conn, ListOrder::Id)?;
            let today = Local::now().date_naive();
            let (path, rows) = export::export_to_dir(&tasks, Path::new(&dir), today)?;
            println!("{}", path.display());
            eprintln!("Exported {rows} tasks");
        }

        Command::Import { file } => {
            let reader = std::fs::File::open(&file)
                .with_context(|| format!("failed to open {file}"))?;
            let inputs = export::read_csv(reader)?;
            let n = ops::import_tasks(conn, &inputs)?;
            eprintln!("Imported {n} tasks from {file}");
        }

        Command::Dashboard { .. } | Command::Serve { .. } => {
            bail!("dashboard and serve cannot run inside another command")
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let db_path = config.resolve_db_path(cli.db.as_deref(), cli.cloud);
    let db_path = config::prepare_db_path(&db_path)?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    match cli.command {
        Command::Dashboard { poll_interval } => {
            logging::init_file(&paths::log_path(), LevelFilter::Info)?;
            let store = Store::open(&db_path, config.cache_ttl())?;
            tui::run(&store, poll_interval)
        }
        Command::Serve { bind } => {
            logging::init_stderr(level.max(LevelFilter::Info));
            let store = Store::open(&db_path, config.cache_ttl())?;
            let addr = config.bind_addr(bind.as_deref()).to_string();
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(web::serve(store, &addr))
        }
        command => {
            logging::init_stderr(level);
            log::debug!("using database {db_path}");
            let conn = db::open_and_init(&db_path)?;
            dispatch(&conn, command)
        }
    }
}
