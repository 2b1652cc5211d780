use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;
use surrealdb::RecordId;

use taskshelf_http::ListParams;

/// Catalog genres. Serialized names double as the stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    History,
    Biography,
    Mystery,
    Romance,
    Fantasy,
}

/// A catalog entry as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Genre,
    pub published_year: i32,
    pub pages: i32,
    pub price: f64,
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `book` table.
#[derive(Debug, Clone, Deserialize)]
pub struct BookRecord {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Genre,
    pub published_year: i32,
    pub pages: i32,
    pub price: f64,
    pub stock: i32,
    pub description: Option<String>,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id.key().to_string(),
            title: record.title,
            author: record.author,
            isbn: record.isbn,
            genre: record.genre,
            published_year: record.published_year,
            pages: record.pages,
            price: record.price,
            stock: record.stock,
            description: record.description,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        }
    }
}

/// Create payload; required-ness is enforced by the service so each
/// missing field gets its own message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<Genre>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
}

/// Partial update payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<Genre>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
}

impl UpdateBookRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.isbn.is_none()
            && self.genre.is_none()
            && self.published_year.is_none()
            && self.pages.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.description.is_none()
    }
}

/// Document content written on create.
#[derive(Debug, Clone, Serialize)]
pub struct BookContent {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: Genre,
    pub published_year: i32,
    pub pages: i32,
    pub price: f64,
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Merge patch written on update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Structured filter options for the list endpoint. Every field is
/// independently optional; supplied fields are AND-composed. Ignored
/// entirely while a search term is active.
#[derive(Debug, Clone, Default)]
pub struct BookFilters {
    pub genre: Option<String>,
    pub author: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

/// Query parameters of `/book/list/all`: the shared list surface plus
/// the structured filters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl BookListParams {
    /// The pagination/search/sort subset.
    pub fn list(&self) -> ListParams {
        ListParams {
            page: self.page,
            limit: self.limit,
            search: self.search.clone(),
            sort: self.sort.clone(),
        }
    }

    /// The structured-filter subset.
    pub fn filters(&self) -> BookFilters {
        BookFilters {
            genre: self.genre.clone(),
            author: self.author.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_year: self.min_year,
            max_year: self.max_year,
        }
    }
}

/// Query parameters of `/book/price-range`; both bounds are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeParams {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PriceRangeParams {
    pub fn list(&self) -> ListParams {
        ListParams {
            page: self.page,
            limit: self.limit,
            search: None,
            sort: None,
        }
    }
}
