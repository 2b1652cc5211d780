//! SurrealDB client factory and migration tooling for taskshelf.
//!
//! Protocol is selected at runtime from the endpoint scheme (`ws://`,
//! `http://`, `mem://`), so the same factory serves production servers
//! and in-memory test instances.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

pub mod query;

pub use query::{Condition, Direction, OrderBy, QuerySpec, Window};

/// SurrealDB client handle using the `any` engine for runtime protocol selection.
pub type Client = surrealdb::Surreal<surrealdb::engine::any::Any>;

/// Connection parameters for the document store.
///
/// Kept free of the kernel settings types so this crate stays usable on
/// its own (tests connect with a literal `mem://` config).
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A store-level unique index rejected the write. This is the
    /// authoritative half of the two-layer uniqueness defense.
    #[error("unique index violation: {0}")]
    UniqueViolation(String),

    /// A write completed without returning the affected record.
    #[error("store returned no record for a write operation")]
    EmptyWrite,

    #[error(transparent)]
    Db(#[from] surrealdb::Error),
}

impl StoreError {
    /// Classify a raw driver error, promoting unique index rejections to
    /// their own variant so callers can map them to a conflict.
    pub fn classify(err: surrealdb::Error) -> Self {
        let text = err.to_string();
        if text.contains("already contains") {
            Self::UniqueViolation(text)
        } else {
            Self::Db(err)
        }
    }
}

/// A single schema migration contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Establish the store connection, authenticate when credentials are
/// configured, and select the namespace/database pair.
pub async fn connect(opts: &ConnectOptions) -> anyhow::Result<Client> {
    tracing::info!(
        endpoint = %sanitize_endpoint(&opts.endpoint),
        namespace = %opts.namespace,
        database = %opts.database,
        "connecting to store"
    );

    let client = surrealdb::engine::any::connect(opts.endpoint.as_str()).await?;

    if let (Some(username), Some(password)) = (&opts.username, &opts.password) {
        client
            .signin(surrealdb::opt::auth::Root { username, password })
            .await?;
    }

    client
        .use_ns(&opts.namespace)
        .use_db(&opts.database)
        .await?;

    Ok(client)
}

/// Execute module migrations in the order collected by the registry.
///
/// Migrations are SurrealQL `DEFINE ... OVERWRITE` scripts; re-running
/// them on boot is safe and keeps definitions current.
pub async fn apply_migrations(db: &Client, migrations: &[(String, Migration)]) -> anyhow::Result<()> {
    for (module, migration) in migrations {
        tracing::info!(module = %module, id = migration.id, "applying migration");
        db.query(migration.up).await?.check()?;
    }
    Ok(())
}

/// One page of query results together with the total match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// Run the count + fetch query pair described by a [`QuerySpec`].
///
/// The two statements execute back to back without snapshot isolation, so
/// `total` and `items` may disagree under concurrent writes.
pub async fn fetch_page<T>(db: &Client, spec: &QuerySpec) -> Result<Page<T>, StoreError>
where
    T: DeserializeOwned,
{
    let total = fetch_count(db, spec).await?;

    let select = spec.select_statement();
    let mut response = bind_all(db.query(select.sql), select.binds)
        .await
        .map_err(StoreError::classify)?;
    let items: Vec<T> = response.take(0).map_err(StoreError::classify)?;

    Ok(Page { items, total })
}

/// Run only the count half of a [`QuerySpec`].
pub async fn fetch_count(db: &Client, spec: &QuerySpec) -> Result<u64, StoreError> {
    let count = spec.count_statement();
    let mut response = bind_all(db.query(count.sql), count.binds)
        .await
        .map_err(StoreError::classify)?;
    Ok(response
        .take::<Option<CountRow>>(0)
        .map_err(StoreError::classify)?
        .map_or(0, |row| row.total))
}

/// Run only the fetch half of a [`QuerySpec`] (lookups that do not need a
/// total, e.g. existence probes).
pub async fn fetch_all<T>(db: &Client, spec: &QuerySpec) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    let select = spec.select_statement();
    let mut response = bind_all(db.query(select.sql), select.binds)
        .await
        .map_err(StoreError::classify)?;
    response.take(0).map_err(StoreError::classify)
}

fn bind_all<'r>(
    mut query: surrealdb::method::Query<'r, surrealdb::engine::any::Any>,
    binds: Vec<(String, serde_json::Value)>,
) -> surrealdb::method::Query<'r, surrealdb::engine::any::Any> {
    for bind in binds {
        query = query.bind(bind);
    }
    query
}

fn sanitize_endpoint(endpoint: &str) -> String {
    if let Some(at) = endpoint.find('@') {
        if let Some(scheme_end) = endpoint.find("://") {
            let scheme = &endpoint[..=scheme_end + 2];
            let tail = &endpoint[at..];
            return format!("{scheme}***{tail}");
        }
    }
    endpoint.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_opts() -> ConnectOptions {
        ConnectOptions {
            endpoint: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            username: None,
            password: None,
        }
    }

    #[test]
    fn sanitize_endpoint_hides_credentials() {
        let sanitized = sanitize_endpoint("ws://root:hunter2@db.internal:8000");
        assert!(sanitized.contains("***"));
        assert!(!sanitized.contains("hunter2"));
        assert!(sanitized.contains("db.internal:8000"));
    }

    #[test]
    fn sanitize_endpoint_passes_plain_urls() {
        assert_eq!(sanitize_endpoint("mem://"), "mem://");
        assert_eq!(sanitize_endpoint("ws://127.0.0.1:8000"), "ws://127.0.0.1:8000");
    }

    #[tokio::test]
    async fn connect_to_memory_instance() {
        let db = connect(&mem_opts()).await.expect("mem connect failed");
        db.query("INFO FOR DB").await.unwrap().check().unwrap();
    }

    #[tokio::test]
    async fn migrations_run_and_enforce_unique_index() {
        let db = connect(&mem_opts()).await.unwrap();
        let migrations = vec![(
            "widgets".to_string(),
            Migration {
                id: "001_init",
                up: r#"
                    DEFINE TABLE OVERWRITE widget SCHEMAFULL;
                    DEFINE FIELD OVERWRITE code ON widget TYPE string;
                    DEFINE INDEX OVERWRITE widget_code_unique ON widget FIELDS code UNIQUE;
                    "#,
            },
        )];
        apply_migrations(&db, &migrations).await.unwrap();

        db.query("CREATE widget:one SET code = 'a'")
            .await
            .unwrap()
            .check()
            .unwrap();
        let dup = db
            .query("CREATE widget:two SET code = 'a'")
            .await
            .unwrap()
            .check();
        let err = StoreError::classify(dup.unwrap_err());
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }
}
