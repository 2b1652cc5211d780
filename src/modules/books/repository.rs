use taskshelf_db::{
    fetch_all, fetch_page, Client, Condition, OrderBy, Page, QuerySpec, StoreError, Window,
};
use uuid::Uuid;

use super::models::{BookContent, BookFilters, BookPatch, BookRecord};

pub const TABLE: &str = "book";

const SEARCH_FIELDS: &[&str] = &["title", "author", "description"];

/// Store adapter for the `book` table. Composes query specifications
/// from filter options and owns all SurrealQL for this resource.
#[derive(Clone)]
pub struct BookRepository {
    db: Client,
}

impl BookRepository {
    pub fn new(db: Client) -> Self {
        Self { db }
    }

    pub async fn create(&self, content: BookContent) -> Result<BookRecord, StoreError> {
        let id = Uuid::now_v7().simple().to_string();
        let created: Option<BookRecord> = self
            .db
            .create((TABLE, id.as_str()))
            .content(content)
            .await
            .map_err(StoreError::classify)?;
        created.ok_or(StoreError::EmptyWrite)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<BookRecord>, StoreError> {
        self.db
            .select((TABLE, id))
            .await
            .map_err(StoreError::classify)
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, StoreError> {
        let spec = QuerySpec::table(TABLE)
            .filter(Condition::eq("isbn", isbn.to_string()))
            .window(Window::new(0, 1));
        let mut matches: Vec<BookRecord> = fetch_all(&self.db, &spec).await?;
        Ok(matches.pop())
    }

    /// Structured-filter listing: supplied filters are AND-composed.
    pub async fn find_all(
        &self,
        filters: BookFilters,
        order: Vec<OrderBy>,
        window: Window,
    ) -> Result<Page<BookRecord>, StoreError> {
        let spec = QuerySpec::table(TABLE)
            .filter_opt(filters.genre.map(|genre| Condition::eq("genre", genre)))
            .filter_opt(
                filters
                    .author
                    .map(|author| Condition::contains_ci("author", author)),
            )
            .filter_opt(filters.min_price.map(|price| Condition::gte("price", price)))
            .filter_opt(filters.max_price.map(|price| Condition::lte("price", price)))
            .filter_opt(
                filters
                    .min_year
                    .map(|year| Condition::gte("published_year", year)),
            )
            .filter_opt(
                filters
                    .max_year
                    .map(|year| Condition::lte("published_year", year)),
            )
            .order_all(order)
            .window(window);
        fetch_page(&self.db, &spec).await
    }

    /// Free-text search across title, author, and description.
    pub async fn search(&self, term: &str, window: Window) -> Result<Page<BookRecord>, StoreError> {
        let spec = QuerySpec::table(TABLE)
            .filter(Condition::any_contains_ci(SEARCH_FIELDS, term))
            .order(OrderBy::desc("created_at"))
            .window(window);
        fetch_page(&self.db, &spec).await
    }

    pub async fn update(
        &self,
        id: &str,
        patch: BookPatch,
    ) -> Result<Option<BookRecord>, StoreError> {
        self.db
            .update((TABLE, id))
            .merge(patch)
            .await
            .map_err(StoreError::classify)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<BookRecord>, StoreError> {
        self.db
            .delete((TABLE, id))
            .await
            .map_err(StoreError::classify)
    }
}
