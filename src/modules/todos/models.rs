use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;
use surrealdb::RecordId;

/// A todo item as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `todo` table.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoRecord {
    pub id: RecordId,
    pub title: String,
    pub status: bool,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id.key().to_string(),
            title: record.title,
            status: record.status,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        }
    }
}

/// Create payload. Fields are optional at the boundary; the service
/// enforces required-ness so missing fields get precise messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub status: Option<bool>,
}

/// Partial update payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub status: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.status.is_none()
    }
}

/// Document content written on create.
#[derive(Debug, Clone, Serialize)]
pub struct TodoContent {
    pub title: String,
    pub status: bool,
}

/// Merge patch written on update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

/// Aggregate counters for the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub completion_rate: f64,
}
