pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use taskshelf_db::{Client, Migration};
use taskshelf_kernel::{InitCtx, Module};

use service::TodoService;

pub(crate) const MIGRATION: Migration = Migration {
    id: "001_init",
    up: r#"
        DEFINE TABLE OVERWRITE todo SCHEMAFULL;
        DEFINE FIELD OVERWRITE title      ON todo TYPE string ASSERT $value != "";
        DEFINE FIELD OVERWRITE status     ON todo TYPE bool DEFAULT false;
        DEFINE FIELD OVERWRITE created_at ON todo TYPE datetime DEFAULT time::now() READONLY;
        DEFINE FIELD OVERWRITE updated_at ON todo TYPE datetime VALUE time::now();
        "#,
};

/// Todo module: CRUD, status transitions, and aggregate stats.
pub struct TodosModule {
    db: Client,
}

impl TodosModule {
    pub fn new(db: Client) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Module for TodosModule {
    fn name(&self) -> &'static str {
        "todo"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "todo module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        handlers::router(TodoService::new(self.db.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/create": {
                    "post": {
                        "summary": "Create a todo",
                        "tags": ["Todos"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateTodo" }
                                }
                            }
                        },
                        "responses": {
                            "201": { "description": "Todo created" },
                            "400": {
                                "description": "Validation failure",
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
                        "summary": "List or search todos",
                        "tags": ["Todos"],
                        "parameters": [
                            { "name": "page", "in": "query", "schema": { "type": "integer" } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } },
                            { "name": "search", "in": "query", "schema": { "type": "string" } },
                            { "name": "sort", "in": "query", "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": { "description": "Paginated todo list" }
                        }
                    }
                },
                "/stats": {
                    "get": {
                        "summary": "Aggregate todo counters",
                        "tags": ["Todos"],
                        "responses": {
                            "200": { "description": "Totals and completion rate" }
                        }
                    }
                },
                "/status/{status}": {
                    "get": {
                        "summary": "List todos by status",
                        "tags": ["Todos"],
                        "parameters": [
                            { "name": "status", "in": "path", "required": true, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": { "description": "Paginated todo list" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch one todo",
                        "tags": ["Todos"],
                        "responses": {
                            "200": { "description": "The todo" },
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
                        "summary": "Partially update a todo",
                        "tags": ["Todos"],
                        "responses": {
                            "200": { "description": "Updated todo" },
                            "400": { "description": "Validation failure or empty payload" },
                            "404": { "description": "Unknown id" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a todo",
                        "tags": ["Todos"],
                        "responses": {
                            "200": { "description": "Deleted todo" },
                            "404": { "description": "Unknown id" }
                        }
                    }
                },
                "/{id}/complete": {
                    "patch": {
                        "summary": "Force status to completed",
                        "tags": ["Todos"],
                        "responses": {
                            "200": { "description": "Updated todo" },
                            "404": { "description": "Unknown id" }
                        }
                    }
                },
                "/{id}/pending": {
                    "patch": {
                        "summary": "Force status to pending",
                        "tags": ["Todos"],
                        "responses": {
                            "200": { "description": "Updated todo" },
                            "404": { "description": "Unknown id" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Todo": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "status": { "type": "boolean" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "status", "createdAt", "updatedAt"]
                    },
                    "CreateTodo": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "status": { "type": "boolean" }
                        },
                        "required": ["title"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![MIGRATION]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "todo module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "todo module stopped");
        Ok(())
    }
}

/// Create a new instance of the todos module
pub fn create_module(db: Client) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(TodosModule::new(db))
}
