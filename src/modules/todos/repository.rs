use taskshelf_db::{
    fetch_count, fetch_page, Client, Condition, OrderBy, Page, QuerySpec, StoreError, Window,
};
use uuid::Uuid;

use super::models::{TodoContent, TodoPatch, TodoRecord};

pub const TABLE: &str = "todo";

const SEARCH_FIELDS: &[&str] = &["title"];

/// Store adapter for the `todo` table. Translates list options into
/// query specifications and owns all SurrealQL for this resource.
#[derive(Clone)]
pub struct TodoRepository {
    db: Client,
}

impl TodoRepository {
    pub fn new(db: Client) -> Self {
        Self { db }
    }

    pub async fn create(&self, content: TodoContent) -> Result<TodoRecord, StoreError> {
        let id = Uuid::now_v7().simple().to_string();
        let created: Option<TodoRecord> = self
            .db
            .create((TABLE, id.as_str()))
            .content(content)
            .await
            .map_err(StoreError::classify)?;
        created.ok_or(StoreError::EmptyWrite)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<TodoRecord>, StoreError> {
        self.db
            .select((TABLE, id))
            .await
            .map_err(StoreError::classify)
    }

    pub async fn list(
        &self,
        order: Vec<OrderBy>,
        window: Window,
    ) -> Result<Page<TodoRecord>, StoreError> {
        let spec = QuerySpec::table(TABLE).order_all(order).window(window);
        fetch_page(&self.db, &spec).await
    }

    pub async fn list_by_status(
        &self,
        status: bool,
        window: Window,
    ) -> Result<Page<TodoRecord>, StoreError> {
        let spec = QuerySpec::table(TABLE)
            .filter(Condition::eq("status", status))
            .order(OrderBy::desc("created_at"))
            .window(window);
        fetch_page(&self.db, &spec).await
    }

    pub async fn search(&self, term: &str, window: Window) -> Result<Page<TodoRecord>, StoreError> {
        let spec = QuerySpec::table(TABLE)
            .filter(Condition::any_contains_ci(SEARCH_FIELDS, term))
            .order(OrderBy::desc("created_at"))
            .window(window);
        fetch_page(&self.db, &spec).await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: TodoPatch,
    ) -> Result<Option<TodoRecord>, StoreError> {
        self.db
            .update((TABLE, id))
            .merge(patch)
            .await
            .map_err(StoreError::classify)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<TodoRecord>, StoreError> {
        self.db
            .delete((TABLE, id))
            .await
            .map_err(StoreError::classify)
    }

    pub async fn count_by_status(&self, status: bool) -> Result<u64, StoreError> {
        let spec = QuerySpec::table(TABLE).filter(Condition::eq("status", status));
        fetch_count(&self.db, &spec).await
    }
}
