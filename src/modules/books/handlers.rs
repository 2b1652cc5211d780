use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use taskshelf_http::{ApiResponse, AppError, AppJson, AppQuery};

use super::models::{BookListParams, CreateBookRequest, PriceRangeParams, UpdateBookRequest};
use super::service::BookService;

/// Build the `/book` router with its service attached.
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/create", post(create_book))
        .route("/list/all", get(list_books))
        .route("/price-range", get(books_by_price_range))
        .route("/genre/{genre}", get(books_by_genre))
        .route("/author/{author}", get(books_by_author))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(service)
}

async fn create_book(
    State(service): State<BookService>,
    AppJson(payload): AppJson<CreateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let book = service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Book created successfully", book)),
    ))
}

async fn list_books(
    State(service): State<BookService>,
    AppQuery(params): AppQuery<BookListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (books, total) = service.list(&params).await?;
    Ok(Json(ApiResponse::list(
        books,
        params.list().pagination(total),
    )))
}

async fn books_by_price_range(
    State(service): State<BookService>,
    AppQuery(params): AppQuery<PriceRangeParams>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(min_price), Some(max_price)) = (params.min_price, params.max_price) else {
        return Err(AppError::validation(
            "minPrice and maxPrice must be valid numbers",
        ));
    };

    let list = params.list();
    let (books, total) = service.by_price_range(min_price, max_price, &list).await?;
    Ok(Json(ApiResponse::list(books, list.pagination(total))))
}

async fn books_by_genre(
    State(service): State<BookService>,
    Path(genre): Path<String>,
    AppQuery(params): AppQuery<taskshelf_http::ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (books, total) = service.by_genre(&genre, &params).await?;
    Ok(Json(ApiResponse::list(books, params.pagination(total))))
}

async fn books_by_author(
    State(service): State<BookService>,
    Path(author): Path<String>,
    AppQuery(params): AppQuery<taskshelf_http::ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (books, total) = service.by_author(&author, &params).await?;
    Ok(Json(ApiResponse::list(books, params.pagination(total))))
}

async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = service.get(&id).await?;
    Ok(Json(ApiResponse::data(book)))
}

async fn update_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.is_empty() {
        return Err(AppError::validation("No data provided for update"));
    }
    let book = service.update(&id, payload).await?;
    Ok(Json(ApiResponse::with_message(
        "Book updated successfully",
        book,
    )))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = service.delete(&id).await?;
    Ok(Json(ApiResponse::with_message(
        "Book deleted successfully",
        book,
    )))
}
