use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::model::EnhancedArticle;
use crate::store::{ArticleStore, StoreError};

/// SQLite-backed implementation of the ArticleStore trait.
///
/// Whole documents are stored as JSON; `msid` and the two dates are copied
/// into indexed columns for version-set and listing queries.
pub struct SqliteArticleStore {
    conn: Mutex<Connection>,
}

impl SqliteArticleStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        info!(path = %path.display(), "opened sqlite article store");
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS versioned_articles (
                id TEXT PRIMARY KEY,
                msid TEXT NOT NULL,
                preprint_posted TEXT NOT NULL,
                published TEXT,
                document TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_versioned_articles_msid ON versioned_articles(msid);
            CREATE INDEX IF NOT EXISTS idx_versioned_articles_posted ON versioned_articles(preprint_posted);
            CREATE INDEX IF NOT EXISTS idx_versioned_articles_published ON versioned_articles(published);
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("lock: {}", e)))
    }

    fn query_documents(
        conn: &Connection,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> Result<Vec<EnhancedArticle>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Storage(format!("prepare: {}", e)))?;
        let documents = stmt
            .query_map(args, |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Storage(format!("query: {}", e)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Storage(format!("read row: {}", e)))?;
        documents.iter().map(|doc| decode(doc)).collect()
    }
}

fn timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode(document: &str) -> Result<EnhancedArticle, StoreError> {
    serde_json::from_str(document).map_err(|e| StoreError::Serialization(format!("decode: {}", e)))
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn upsert(&self, article: &EnhancedArticle) -> Result<(), StoreError> {
        let document = serde_json::to_string(article)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO versioned_articles (id, msid, preprint_posted, published, document)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                msid = excluded.msid,
                preprint_posted = excluded.preprint_posted,
                published = excluded.published,
                document = excluded.document",
            params![
                article.id,
                article.msid,
                timestamp(article.preprint_posted),
                article.published.map(timestamp),
                document,
            ],
        )
        .map_err(|e| StoreError::Storage(format!("upsert: {}", e)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EnhancedArticle>, StoreError> {
        let conn = self.lock()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM versioned_articles WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Storage(format!("find_by_id: {}", e)))?;
        document.as_deref().map(decode).transpose()
    }

    async fn find_by_msid(&self, msid: &str) -> Result<Vec<EnhancedArticle>, StoreError> {
        let conn = self.lock()?;
        Self::query_documents(
            &conn,
            "SELECT document FROM versioned_articles WHERE msid = ?1 ORDER BY preprint_posted DESC",
            params![msid],
        )
    }

    async fn list_all(&self) -> Result<Vec<EnhancedArticle>, StoreError> {
        let conn = self.lock()?;
        Self::query_documents(&conn, "SELECT document FROM versioned_articles", [])
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let deleted = conn
            .execute("DELETE FROM versioned_articles WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Storage(format!("remove: {}", e)))?;
        Ok(deleted > 0)
    }
}
