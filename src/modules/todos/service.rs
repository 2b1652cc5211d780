use taskshelf_db::{Client, OrderBy};
use taskshelf_http::{AppError, ListParams};

use super::models::{CreateTodoRequest, Todo, TodoContent, TodoPatch, TodoStats, UpdateTodoRequest};
use super::repository::TodoRepository;

/// Maps API sort field names onto store columns; unknown names are dropped.
fn sort_field(name: &str) -> Option<&'static str> {
    match name {
        "title" => Some("title"),
        "status" => Some("status"),
        "createdAt" => Some("created_at"),
        "updatedAt" => Some("updated_at"),
        _ => None,
    }
}

/// Business rules for the todo resource: field validation and not-found
/// translation in front of the repository.
#[derive(Clone)]
pub struct TodoService {
    repo: TodoRepository,
}

impl TodoService {
    pub fn new(db: Client) -> Self {
        Self {
            repo: TodoRepository::new(db),
        }
    }

    pub async fn create(&self, request: CreateTodoRequest) -> Result<Todo, AppError> {
        let Some(title) = request.title else {
            return Err(AppError::validation("Title is required"));
        };
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }

        let content = TodoContent {
            title: title.to_string(),
            status: request.status.unwrap_or(false),
        };
        let record = self.repo.create(content).await.map_err(AppError::internal)?;
        Ok(record.into())
    }

    pub async fn get(&self, id: &str) -> Result<Todo, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(AppError::internal)?
            .map(Todo::from)
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }

    /// List or search, one page at a time. A non-blank search term takes
    /// precedence and matches the title case-insensitively.
    pub async fn list(&self, params: &ListParams) -> Result<(Vec<Todo>, u64), AppError> {
        let page = if let Some(term) = params.search_term() {
            self.repo.search(term, params.window()).await
        } else {
            let mut order = params.sort_order(sort_field);
            if order.is_empty() {
                order.push(OrderBy::desc("created_at"));
            }
            self.repo.list(order, params.window()).await
        }
        .map_err(AppError::internal)?;

        Ok((page.items.into_iter().map(Todo::from).collect(), page.total))
    }

    pub async fn list_by_status(
        &self,
        status: bool,
        params: &ListParams,
    ) -> Result<(Vec<Todo>, u64), AppError> {
        let page = self
            .repo
            .list_by_status(status, params.window())
            .await
            .map_err(AppError::internal)?;
        Ok((page.items.into_iter().map(Todo::from).collect(), page.total))
    }

    pub async fn update(&self, id: &str, request: UpdateTodoRequest) -> Result<Todo, AppError> {
        self.ensure_exists(id).await?;

        let mut patch = TodoPatch {
            title: None,
            status: request.status,
        };
        if let Some(title) = request.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
            patch.title = Some(title.to_string());
        }

        self.repo
            .update(id, patch)
            .await
            .map_err(AppError::internal)?
            .map(Todo::from)
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }

    pub async fn delete(&self, id: &str) -> Result<Todo, AppError> {
        self.ensure_exists(id).await?;

        self.repo
            .delete(id)
            .await
            .map_err(AppError::internal)?
            .map(Todo::from)
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }

    /// Force status to true. Idempotent.
    pub async fn complete(&self, id: &str) -> Result<Todo, AppError> {
        self.set_status(id, true).await
    }

    /// Force status to false. Idempotent.
    pub async fn pending(&self, id: &str) -> Result<Todo, AppError> {
        self.set_status(id, false).await
    }

    async fn set_status(&self, id: &str, status: bool) -> Result<Todo, AppError> {
        self.ensure_exists(id).await?;

        let patch = TodoPatch {
            title: None,
            status: Some(status),
        };
        self.repo
            .update(id, patch)
            .await
            .map_err(AppError::internal)?
            .map(Todo::from)
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }

    pub async fn stats(&self) -> Result<TodoStats, AppError> {
        let completed = self
            .repo
            .count_by_status(true)
            .await
            .map_err(AppError::internal)?;
        let pending = self
            .repo
            .count_by_status(false)
            .await
            .map_err(AppError::internal)?;
        let total = completed + pending;

        let completion_rate = if total > 0 {
            round2(completed as f64 / total as f64 * 100.0)
        } else {
            0.0
        };

        Ok(TodoStats {
            total,
            completed,
            pending,
            completion_rate,
        })
    }

    async fn ensure_exists(&self, id: &str) -> Result<(), AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(AppError::internal)?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskshelf_db::ConnectOptions;

    async fn service() -> TodoService {
        let db = taskshelf_db::connect(&ConnectOptions {
            endpoint: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
        })
        .await
        .unwrap();
        taskshelf_db::apply_migrations(&db, &[("todo".to_string(), super::super::MIGRATION)])
            .await
            .unwrap();
        TodoService::new(db)
    }

    fn create_request(title: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            title: Some(title.to_string()),
            status: None,
        }
    }

    #[tokio::test]
    async fn create_trims_title_and_defaults_status() {
        let service = service().await;
        let todo = service.create(create_request("  buy milk  ")).await.unwrap();

        assert_eq!(todo.title, "buy milk");
        assert!(!todo.status);
        assert!(!todo.id.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_missing_and_blank_titles() {
        let service = service().await;

        let err = service.create(CreateTodoRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = service.create(create_request("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let service = service().await;
        let err = service.get("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_retrims_title_and_keeps_other_fields() {
        let service = service().await;
        let todo = service.create(create_request("original")).await.unwrap();

        let updated = service
            .update(
                &todo.id,
                UpdateTodoRequest {
                    title: Some("  renamed  ".to_string()),
                    status: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "renamed");
        assert!(!updated.status);
        assert_eq!(updated.id, todo.id);
    }

    #[tokio::test]
    async fn update_rejects_blank_title_without_writing() {
        let service = service().await;
        let todo = service.create(create_request("keep me")).await.unwrap();

        let err = service
            .update(
                &todo.id,
                UpdateTodoRequest {
                    title: Some("   ".to_string()),
                    status: Some(true),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let unchanged = service.get(&todo.id).await.unwrap();
        assert_eq!(unchanged.title, "keep me");
        assert!(!unchanged.status);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_are_not_found() {
        let service = service().await;

        let err = service
            .update(
                "missing",
                UpdateTodoRequest {
                    title: Some("x".to_string()),
                    status: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));

        let err = service.delete("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_returns_the_removed_todo() {
        let service = service().await;
        let todo = service.create(create_request("ephemeral")).await.unwrap();

        let deleted = service.delete(&todo.id).await.unwrap();
        assert_eq!(deleted.id, todo.id);

        let err = service.get(&todo.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn complete_then_pending_is_idempotent() {
        let service = service().await;
        let todo = service.create(create_request("flip me")).await.unwrap();

        let completed = service.complete(&todo.id).await.unwrap();
        assert!(completed.status);
        let completed_again = service.complete(&todo.id).await.unwrap();
        assert!(completed_again.status);

        let pending = service.pending(&todo.id).await.unwrap();
        assert!(!pending.status);
        let pending_again = service.pending(&todo.id).await.unwrap();
        assert!(!pending_again.status);
    }

    #[tokio::test]
    async fn stats_counts_and_rounds_completion_rate() {
        let service = service().await;

        let empty = service.stats().await.unwrap();
        assert_eq!(empty.total, 0);
        assert_eq!(empty.completion_rate, 0.0);

        for title in ["a", "b", "c"] {
            service.create(create_request(title)).await.unwrap();
        }
        let (todos, _) = service.list(&ListParams::default()).await.unwrap();
        service.complete(&todos[0].id).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completion_rate, 33.33);
    }

    #[tokio::test]
    async fn search_matches_title_case_insensitively() {
        let service = service().await;
        service.create(create_request("Buy groceries")).await.unwrap();
        service.create(create_request("Clean garage")).await.unwrap();

        let params = ListParams {
            search: Some("GROC".to_string()),
            ..Default::default()
        };
        let (todos, total) = service.list(&params).await.unwrap();

        assert_eq!(total, 1);
        assert_eq!(todos[0].title, "Buy groceries");
    }

    #[tokio::test]
    async fn list_paginates_with_total_count() {
        let service = service().await;
        for title in ["one", "two", "three"] {
            service.create(create_request(title)).await.unwrap();
        }

        let params = ListParams {
            page: Some(2),
            limit: Some(2),
            ..Default::default()
        };
        let (todos, total) = service.list(&params).await.unwrap();

        assert_eq!(total, 3);
        assert_eq!(todos.len(), 1);
    }

    #[tokio::test]
    async fn list_by_status_filters() {
        let service = service().await;
        let first = service.create(create_request("done")).await.unwrap();
        service.create(create_request("open")).await.unwrap();
        service.complete(&first.id).await.unwrap();

        let (done, total) = service
            .list_by_status(true, &ListParams::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(done[0].title, "done");

        let (open, total) = service
            .list_by_status(false, &ListParams::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(open[0].title, "open");
    }

    #[tokio::test]
    async fn sort_by_title_ascending() {
        let service = service().await;
        for title in ["bravo", "alpha", "charlie"] {
            service.create(create_request(title)).await.unwrap();
        }

        let params = ListParams {
            sort: Some("title:1".to_string()),
            ..Default::default()
        };
        let (todos, _) = service.list(&params).await.unwrap();
        let titles: Vec<&str> = todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha", "bravo", "charlie"]);
    }
}
