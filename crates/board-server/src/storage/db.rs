//! SQLite database layer (embedded, no external database server)

use anyhow::{Context, Result};
use board_types::Message;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed, and check it is writable
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;

            let test_file = parent.join(".write_test");
            match tokio::fs::write(&test_file, b"test").await {
                Ok(_) => {
                    let _ = tokio::fs::remove_file(&test_file).await;
                }
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Database directory is not writable: {}: {}",
                        parent.display(),
                        e
                    ));
                }
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open a private in-memory database, for tests.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true);

        // A memory database lives and dies with its connection, so the
        // pool must hold exactly one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Messages table. AUTOINCREMENT keeps deleted ids from ever being
        // reassigned; the CHECK constraints backstop the service-level
        // length validation.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                body TEXT NOT NULL CHECK (length(body) <= 250),
                username TEXT NOT NULL CHECK (length(username) <= 50),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Message operations
    pub async fn insert_message(&self, body: &str, username: &str) -> Result<Message> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO messages (body, username, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(body)
        .bind(username)
        .bind(created_at)
        .execute(&*self.pool)
        .await?;

        Ok(Message {
            id: result.last_insert_rowid(),
            body: body.to_string(),
            username: username.to_string(),
            created_at,
        })
    }

    pub async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        let row: Option<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, body, username, created_at
            FROM messages WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    /// All messages, oldest first (insertion order by id).
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT id, body, username, created_at
            FROM messages
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Replace the body of a message. Returns the number of rows touched,
    /// zero when the id does not exist.
    pub async fn update_message_body(&self, id: i64, body: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET body = ?1 WHERE id = ?2
            "#,
        )
        .bind(body)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a message. Returns the number of rows removed, zero when
    /// the id does not exist.
    pub async fn delete_message(&self, id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM messages WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    body: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(r: MessageRow) -> Self {
        Message {
            id: r.id,
            body: r.body,
            username: r.username,
            created_at: r.created_at,
        }
    }
}
