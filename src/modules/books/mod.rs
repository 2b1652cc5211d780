pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use taskshelf_db::{Client, Migration};
use taskshelf_kernel::{InitCtx, Module};

use service::BookService;

pub(crate) const MIGRATION: Migration = Migration {
    id: "001_init",
    up: r#"
        DEFINE TABLE OVERWRITE book SCHEMAFULL;
        DEFINE FIELD OVERWRITE title          ON book TYPE string ASSERT string::len($value) >= 3;
        DEFINE FIELD OVERWRITE author         ON book TYPE string ASSERT $value != "";
        DEFINE FIELD OVERWRITE isbn           ON book TYPE string ASSERT $value != "";
        DEFINE FIELD OVERWRITE genre          ON book TYPE string ASSERT $value INSIDE ["Fiction", "Non-Fiction", "Science", "History", "Biography", "Mystery", "Romance", "Fantasy"];
        DEFINE FIELD OVERWRITE published_year ON book TYPE int ASSERT $value >= 1000;
        DEFINE FIELD OVERWRITE pages          ON book TYPE int ASSERT $value >= 1;
        DEFINE FIELD OVERWRITE price          ON book TYPE number ASSERT $value >= 0;
        DEFINE FIELD OVERWRITE stock          ON book TYPE int DEFAULT 0 ASSERT $value >= 0;
        DEFINE FIELD OVERWRITE description    ON book TYPE option<string>;
        DEFINE FIELD OVERWRITE created_at     ON book TYPE datetime DEFAULT time::now() READONLY;
        DEFINE FIELD OVERWRITE updated_at     ON book TYPE datetime VALUE time::now();
        DEFINE INDEX OVERWRITE book_isbn_unique ON book FIELDS isbn UNIQUE;
        "#,
};

/// Book module: catalog CRUD with filtered, sorted, and searched listings.
pub struct BooksModule {
    db: Client,
}

impl BooksModule {
    pub fn new(db: Client) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "book"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "book module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        handlers::router(BookService::new(self.db.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/create": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Book created" },
                            "400": {
                                "description": "Validation failure or duplicate ISBN",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/list/all": {
                    "get": {
                        "summary": "List, filter, or search books",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "page", "in": "query", "schema": { "type": "integer" } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } },
                            { "name": "search", "in": "query", "schema": { "type": "string" } },
                            { "name": "sort", "in": "query", "schema": { "type": "string" } },
                            { "name": "genre", "in": "query", "schema": { "type": "string" } },
                            { "name": "author", "in": "query", "schema": { "type": "string" } },
                            { "name": "minPrice", "in": "query", "schema": { "type": "number" } },
                            { "name": "maxPrice", "in": "query", "schema": { "type": "number" } },
                            { "name": "minYear", "in": "query", "schema": { "type": "integer" } },
                            { "name": "maxYear", "in": "query", "schema": { "type": "integer" } }
                        ],
                        "responses": {
                            "200": { "description": "Paginated book list" }
                        }
                    }
                },
                "/price-range": {
                    "get": {
                        "summary": "List books in an inclusive price range",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "minPrice", "in": "query", "required": true, "schema": { "type": "number" } },
                            { "name": "maxPrice", "in": "query", "required": true, "schema": { "type": "number" } }
                        ],
                        "responses": {
                            "200": { "description": "Paginated book list" },
                            "400": { "description": "Missing or invalid bounds" }
                        }
                    }
                },
                "/genre/{genre}": {
                    "get": {
                        "summary": "List books with an exact genre match",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "genre", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": { "description": "Paginated book list" }
                        }
                    }
                },
                "/author/{author}": {
                    "get": {
                        "summary": "List books by author substring",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "author", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": { "description": "Paginated book list" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch one book",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "The book" },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Partially update a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "Updated book" },
                            "400": { "description": "Validation failure, duplicate ISBN, or empty payload" },
                            "404": { "description": "Unknown id" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "Deleted book" },
                            "404": { "description": "Unknown id" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "genre": {
                                "type": "string",
                                "enum": ["Fiction", "Non-Fiction", "Science", "History", "Biography", "Mystery", "Romance", "Fantasy"]
                            },
                            "publishedYear": { "type": "integer" },
                            "pages": { "type": "integer" },
                            "price": { "type": "number" },
                            "stock": { "type": "integer" },
                            "description": { "type": "string" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "author", "isbn", "genre", "publishedYear", "pages", "price", "stock", "createdAt", "updatedAt"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "isbn": { "type": "string" },
                            "genre": { "type": "string" },
                            "publishedYear": { "type": "integer" },
                            "pages": { "type": "integer" },
                            "price": { "type": "number" },
                            "stock": { "type": "integer" },
                            "description": { "type": "string" }
                        },
                        "required": ["title", "author", "isbn", "genre", "publishedYear", "pages", "price"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![MIGRATION]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Client) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use taskshelf_db::ConnectOptions;
    use tower::util::ServiceExt;

    async fn test_router() -> Router {
        let db = taskshelf_db::connect(&ConnectOptions {
            endpoint: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
        })
        .await
        .unwrap();
        taskshelf_db::apply_migrations(&db, &[("book".to_string(), MIGRATION)])
            .await
            .unwrap();
        BooksModule::new(db).routes()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn book_payload() -> serde_json::Value {
        serde_json::json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "genre": "Fiction",
            "publishedYear": 1965,
            "pages": 412,
            "price": 9.99
        })
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_envelope() {
        let router = test_router().await;
        let response = router
            .oneshot(json_request(Method::POST, "/create", book_payload()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Book created successfully");
        assert_eq!(body["data"]["stock"], 0);
        assert_eq!(body["data"]["genre"], "Fiction");
    }

    #[tokio::test]
    async fn unknown_genre_in_payload_returns_400_envelope() {
        let router = test_router().await;
        let mut payload = book_payload();
        payload["genre"] = serde_json::json!("Poetry");

        let response = router
            .oneshot(json_request(Method::POST, "/create", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn duplicate_isbn_returns_400() {
        let router = test_router().await;
        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/create", book_payload()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(json_request(Method::POST, "/create", book_payload()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Book with this ISBN already exists");
    }

    #[tokio::test]
    async fn price_range_requires_both_bounds() {
        let router = test_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/price-range?minPrice=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "minPrice and maxPrice must be valid numbers");
    }

    #[tokio::test]
    async fn malformed_price_bound_returns_400_envelope() {
        let router = test_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/price-range?minPrice=abc&maxPrice=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn list_reports_pagination_metadata() {
        let router = test_router().await;
        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/create", book_payload()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/list/all?limit=200")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["pagination"]["limit"], 100);
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["pagination"]["pages"], 1);
    }

    #[tokio::test]
    async fn genre_path_listing_filters_exactly() {
        let router = test_router().await;
        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/create", book_payload()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/genre/Fiction")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["pagination"]["total"], 1);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/genre/History")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_returns_404_envelope() {
        let router = test_router().await;
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Book not found");
    }
}
