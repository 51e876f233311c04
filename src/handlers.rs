use crate::error::{AppError, AppResult};
use crate::extract::{StudentInput, StudentPath};
use crate::routes::AppState;
use crate::schema::validate;
use crate::types::StudentForm;
use crate::views;
use axum::{
    extract::State,
    http::{Method, Uri},
    response::Html,
};
use std::sync::Arc;
use tracing::info;

#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "Listing of every student", content_type = "text/html", body = String),
        (status = 400, description = "Error page", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn list_students(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let records = state.store.list().await?;
    info!("Listing {} students", records.len());
    Ok(Html(views::students_page(&records)))
}

#[utoipa::path(
    get,
    path = "/students/new",
    responses(
        (status = 200, description = "Blank creation form", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn new_student_form() -> Html<String> {
    Html(views::new_student_form())
}

#[utoipa::path(
    post,
    path = "/students",
    request_body(content = StudentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Confirmation with the saved student", content_type = "text/html", body = String),
        (status = 400, description = "Validation failures", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<Arc<AppState>>,
    StudentInput(form): StudentInput,
) -> AppResult<Html<String>> {
    let student = validate(&form)?;
    let record = state.store.insert(student).await?;

    state.metrics.increment_created().await;
    info!("Created student id={}, name={}", record.id, record.name);
    Ok(Html(views::student_created(&record)))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = String, Path, description = "24-character hex student id")),
    responses(
        (status = 200, description = "Student detail", content_type = "text/html", body = String),
        (status = 400, description = "Not found or malformed id", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn show_student(
    State(state): State<Arc<AppState>>,
    path: StudentPath,
) -> AppResult<Html<String>> {
    let record = state
        .store
        .find(path.id)
        .await?
        .ok_or(AppError::NotFound(path.raw))?;
    Ok(Html(views::student_page(&record)))
}

#[utoipa::path(
    get,
    path = "/students/{id}/edit",
    params(("id" = String, Path, description = "24-character hex student id")),
    responses(
        (status = 200, description = "Edit form pre-filled with the student", content_type = "text/html", body = String),
        (status = 400, description = "Not found or malformed id", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn edit_student_form(
    State(state): State<Arc<AppState>>,
    path: StudentPath,
) -> AppResult<Html<String>> {
    let record = state
        .store
        .find(path.id)
        .await?
        .ok_or(AppError::NotFound(path.raw))?;
    Ok(Html(views::student_edit_form(&record)))
}

/// Full replacement: every field comes from the request, omitted optional
/// fields fall back to their defaults rather than to the stored values.
#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = String, Path, description = "24-character hex student id")),
    request_body(content = StudentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Confirmation with the replaced student", content_type = "text/html", body = String),
        (status = 400, description = "Validation failure, not found or malformed id", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<Arc<AppState>>,
    path: StudentPath,
    StudentInput(form): StudentInput,
) -> AppResult<Html<String>> {
    let student = validate(&form)?;
    let record = state
        .store
        .replace(path.id, student)
        .await?
        .ok_or(AppError::NotFound(path.raw))?;

    state.metrics.increment_updated().await;
    info!("Replaced student id={}", record.id);
    Ok(Html(views::student_updated(&record)))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = String, Path, description = "24-character hex student id")),
    responses(
        (status = 200, description = "Deletion confirmation", content_type = "text/html", body = String),
        (status = 400, description = "Malformed id or store failure", content_type = "text/html", body = String)
    ),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    path: StudentPath,
) -> AppResult<Html<String>> {
    let deleted = state.store.delete(path.id).await?;

    state.metrics.add_deleted(deleted).await;
    info!("Deleted student id={}, removed={}", path.id, deleted);
    Ok(Html(views::student_deleted()))
}

/// A path that exists, reached with a verb it does not serve.
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::BadRequest(format!("{} is not supported on {}", method, uri.path()))
}

pub async fn unknown_route(uri: Uri) -> AppError {
    AppError::BadRequest(format!("no page at {}", uri.path()))
}
