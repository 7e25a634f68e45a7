//! Message resource service
//!
//! Owns the business rules: presence and length validation on writes,
//! not-found mapping for targeted operations. The storage layer below it
//! stays free of HTTP concerns.

use crate::error::ApiError;
use crate::storage::Database;
use board_types::{Message, BODY_MAX_CHARS, USERNAME_MAX_CHARS};
use std::sync::Arc;
use tracing::{debug, info};

pub struct MessageService {
    db: Arc<Database>,
}

impl MessageService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Validate and persist a new message. Both fields are required and
    /// length-limited; nothing is written when validation fails.
    pub async fn create(
        &self,
        body: Option<String>,
        username: Option<String>,
    ) -> Result<Message, ApiError> {
        let body = body.ok_or(ApiError::InvalidInput)?;
        let username = username.ok_or(ApiError::InvalidInput)?;

        if body.chars().count() > BODY_MAX_CHARS
            || username.chars().count() > USERNAME_MAX_CHARS
        {
            return Err(ApiError::InvalidInput);
        }

        info!("Creating message: username={}", username);
        let message = self.db.insert_message(&body, &username).await?;

        Ok(message)
    }

    /// All messages, oldest first.
    pub async fn list(&self) -> Result<Vec<Message>, ApiError> {
        let messages = self.db.list_messages().await?;
        Ok(messages)
    }

    /// Replace the body of an existing message. A payload without a body
    /// is a successful no-op; `username` and `created_at` never change.
    pub async fn update(&self, id: i64, body: Option<String>) -> Result<Message, ApiError> {
        let existing = self
            .db
            .get_message(id)
            .await?
            .ok_or(ApiError::NotFound)?;

        let Some(body) = body else {
            return Ok(existing);
        };

        if body.chars().count() > BODY_MAX_CHARS {
            return Err(ApiError::InvalidInput);
        }

        debug!("Updating message {} body", id);
        let updated = self.db.update_message_body(id, &body).await?;
        if updated == 0 {
            // Row vanished between the read and the write
            return Err(ApiError::NotFound);
        }

        Ok(Message { body, ..existing })
    }

    /// Remove a message permanently. The id is not reassigned.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let deleted = self.db.delete_message(id).await?;
        if deleted == 0 {
            return Err(ApiError::NotFound);
        }

        info!("Deleted message {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> MessageService {
        let db = Arc::new(Database::in_memory().await.unwrap());
        MessageService::new(db)
    }

    #[tokio::test]
    async fn create_requires_both_fields() {
        let svc = service().await;

        let missing_username = svc.create(Some("hi".to_string()), None).await;
        assert!(matches!(missing_username, Err(ApiError::InvalidInput)));

        let missing_body = svc.create(None, Some("liza".to_string())).await;
        assert!(matches!(missing_body, Err(ApiError::InvalidInput)));

        // Nothing was written on either failure
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_accepts_fields_at_their_limits() {
        let svc = service().await;

        let body = "x".repeat(250);
        let username = "y".repeat(50);
        let message = svc.create(Some(body.clone()), Some(username.clone())).await.unwrap();

        assert_eq!(message.body, body);
        assert_eq!(message.username, username);
    }

    #[tokio::test]
    async fn create_rejects_overlong_fields() {
        let svc = service().await;

        let overlong_body = svc
            .create(Some("x".repeat(251)), Some("liza".to_string()))
            .await;
        assert!(matches!(overlong_body, Err(ApiError::InvalidInput)));

        let overlong_username = svc
            .create(Some("hi".to_string()), Some("y".repeat(51)))
            .await;
        assert!(matches!(overlong_username, Err(ApiError::InvalidInput)));

        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_without_body_is_a_noop() {
        let svc = service().await;

        let created = svc
            .create(Some("hi".to_string()), Some("liza".to_string()))
            .await
            .unwrap();

        let untouched = svc.update(created.id, None).await.unwrap();
        assert_eq!(untouched.id, created.id);
        assert_eq!(untouched.body, "hi");
        assert_eq!(untouched.username, "liza");
        assert_eq!(untouched.created_at.timestamp(), created.created_at.timestamp());
    }

    #[tokio::test]
    async fn update_rejects_overlong_body() {
        let svc = service().await;

        let created = svc
            .create(Some("hi".to_string()), Some("liza".to_string()))
            .await
            .unwrap();

        let result = svc.update(created.id, Some("x".repeat(251))).await;
        assert!(matches!(result, Err(ApiError::InvalidInput)));

        // Stored body unchanged
        let all = svc.list().await.unwrap();
        assert_eq!(all[0].body, "hi");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let svc = service().await;

        let update = svc.update(99999, Some("x".to_string())).await;
        assert!(matches!(update, Err(ApiError::NotFound)));

        let delete = svc.delete(99999).await;
        assert!(matches!(delete, Err(ApiError::NotFound)));
    }
}
