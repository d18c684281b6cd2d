//! HTTP dashboard: an HTML page per view, a JSON API over the task store,
//! and a CSV download.
//!
//! Handlers hand every store call to `spawn_blocking`, since rusqlite and
//! the cache mutex are synchronous.

mod html;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use log::{error, info};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::export;
use crate::model::{Task, TaskInput, View};
use crate::ops::{ListOrder, NotFound};
use crate::store::Store;
use crate::validate::ValidationError;
use crate::views::{self, ViewQuery};

type SharedStore = Arc<Store>;

/// Error answer: `{"error": msg}` with a status chosen by error kind.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        let status = if e.downcast_ref::<ValidationError>().is_some() {
            StatusCode::BAD_REQUEST
        } else if e.downcast_ref::<NotFound>().is_some() {
            StatusCode::NOT_FOUND
        } else {
            error!("request failed: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: format!("{e:#}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Query parameters selecting a view: `axis=time|priority|completed`
/// with `view`, `importance` or `sort`. Without `axis`, a lone qualifier
/// picks its own axis.
#[derive(Debug, Default, Deserialize)]
struct Selection {
    axis: Option<String>,
    view: Option<String>,
    importance: Option<String>,
    sort: Option<String>,
}

impl Selection {
    fn query(&self) -> Result<Option<ViewQuery>, ApiError> {
        let axis = match (
            self.axis.as_deref(),
            self.view.is_some(),
            self.importance.is_some(),
            self.sort.is_some(),
        ) {
            (Some(axis), ..) => axis,
            (None, false, false, false) => return Ok(None),
            (None, true, false, false) => "time",
            (None, false, true, false) => "priority",
            (None, false, false, true) => "completed",
            (None, ..) => {
                return Err(ApiError::bad_request(
                    "view, importance and sort select different axes; pass only one or set axis",
                ))
            }
        };
        ViewQuery::parse(
            axis,
            self.view.as_deref(),
            self.importance.as_deref(),
            self.sort.as_deref(),
        )
        .map(Some)
        .map_err(|e| ApiError::bad_request(format!("{e:#}")))
    }
}

async fn blocking<T, F>(store: &SharedStore, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> Result<T> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .context("store task panicked")?
        .map_err(ApiError::from)
}

fn json_body(payload: Result<Json<TaskInput>, JsonRejection>) -> Result<TaskInput, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

async fn index(
    State(store): State<SharedStore>,
    Query(selection): Query<Selection>,
) -> Result<Html<String>, ApiError> {
    let query = selection
        .query()?
        .unwrap_or(ViewQuery::Time(View::Daily));
    let tasks = blocking(&store, |s| s.list()).await?;
    let summary = views::summary(&tasks);
    let rows = views::select(&tasks, &query);
    Ok(Html(html::render_page(&rows, &query, &summary)))
}

async fn list_tasks(
    State(store): State<SharedStore>,
    Query(selection): Query<Selection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let query = selection.query()?;
    let tasks = blocking(&store, |s| s.list()).await?;
    let tasks = match query {
        Some(q) => views::select(&tasks, &q).into_iter().cloned().collect(),
        None => tasks,
    };
    Ok(Json(tasks))
}

async fn get_task(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(blocking(&store, move |s| s.get(id)).await?))
}

async fn create_task(
    State(store): State<SharedStore>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = json_body(payload)?;
    let task = blocking(&store, move |s| {
        let id = s.add(&input)?;
        s.get(id)
    })
    .await?;
    info!("added task {} '{}'", task.id, task.title);
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let input = json_body(payload)?;
    let task = blocking(&store, move |s| {
        s.update(id, &input)?;
        s.get(id)
    })
    .await?;
    info!("updated task {id}");
    Ok(Json(task))
}

async fn delete_task(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    blocking(&store, move |s| s.remove(id)).await?;
    info!("deleted task {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_task(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    let task = blocking(&store, move |s| {
        s.complete(id)?;
        s.get(id)
    })
    .await?;
    info!("completed task {id}");
    Ok(Json(task))
}

async fn export_csv(State(store): State<SharedStore>) -> Result<Response, ApiError> {
    let body = blocking(&store, |s| {
        let tasks = s.list_uncached(ListOrder::Id)?;
        export::to_csv_string(&tasks)
    })
    .await?;
    let filename = export::export_filename(Local::now().date_naive());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{id}/complete", post(complete_task))
        .route("/export.csv", get(export_csv))
        .with_state(store)
}

pub async fn serve(store: Store, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!("serving {} on http://{local}", store.db_path());
    axum::serve(listener, router(Arc::new(store)))
        .await
        .context("server error")
}
