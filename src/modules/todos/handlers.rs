use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use taskshelf_http::{ApiResponse, AppError, AppJson, AppQuery, ListParams};

use super::models::{CreateTodoRequest, UpdateTodoRequest};
use super::service::TodoService;

/// Build the `/todo` router with its service attached.
pub fn router(service: TodoService) -> Router {
    Router::new()
        .route("/create", post(create_todo))
        .route("/list/all", get(list_todos))
        .route("/stats", get(todo_stats))
        .route("/status/{status}", get(todos_by_status))
        .route("/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/{id}/complete", patch(complete_todo))
        .route("/{id}/pending", patch(pending_todo))
        .with_state(service)
}

async fn create_todo(
    State(service): State<TodoService>,
    AppJson(payload): AppJson<CreateTodoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let todo = service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Todo created successfully", todo)),
    ))
}

async fn list_todos(
    State(service): State<TodoService>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (todos, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::list(todos, params.pagination(total))))
}

async fn todo_stats(State(service): State<TodoService>) -> Result<impl IntoResponse, AppError> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::data(stats)))
}

async fn todos_by_status(
    State(service): State<TodoService>,
    Path(status): Path<String>,
    AppQuery(params): AppQuery<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let status = status == "completed";
    let (todos, total) = service.list_by_status(status, &params).await?;
    Ok(Json(ApiResponse::list(todos, params.pagination(total))))
}

async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let todo = service.get(&id).await?;
    Ok(Json(ApiResponse::data(todo)))
}

async fn update_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateTodoRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.is_empty() {
        return Err(AppError::validation("No data provided for update"));
    }
    let todo = service.update(&id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Todo updated successfully",
        todo,
    )))
}

async fn delete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let todo = service.delete(&id).await?;
    Ok(Json(ApiResponse::with_message(
        "Todo deleted successfully",
        todo,
    )))
}

async fn complete_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let todo = service.complete(&id).await?;
    Ok(Json(ApiResponse::with_message(
        "Todo marked as completed",
        todo,
    )))
}

async fn pending_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let todo = service.pending(&id).await?;
    Ok(Json(ApiResponse::with_message(
        "Todo marked as pending",
        todo,
    )))
}
