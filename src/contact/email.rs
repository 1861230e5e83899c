//! Email delivery seam
//!
//! Delivery itself belongs to an external service; the site only depends on
//! the [`EmailSender`] trait. The bundled [`OutboxSender`] drops accepted
//! submissions into a local directory as JSON, which is enough for a
//! self-hosted site polled by a delivery cron job.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Status value a sender returns for a delivered message
pub const SUCCESS_STATUS: u16 = 200;

/// Outbound message handed to the email collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Display name of the person writing in
    pub from_name: String,
    /// Address replies should go to
    pub reply_to: String,
    /// Free-form message body
    pub message: String,
}

/// Errors from the email collaborator
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email transport failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// An outbound email collaborator.
///
/// Returns a status code; anything other than [`SUCCESS_STATUS`] is treated
/// as a failed delivery.
pub trait EmailSender {
    fn send(
        &self,
        message: &EmailMessage,
    ) -> impl Future<Output = Result<u16, EmailError>> + Send;
}

/// Sender that writes each message to a JSON file in an outbox directory
#[derive(Debug, Clone)]
pub struct OutboxSender {
    dir: PathBuf,
}

impl OutboxSender {
    /// Create a sender writing into the given directory
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl EmailSender for OutboxSender {
    async fn send(&self, message: &EmailMessage) -> Result<u16, EmailError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}.json", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        let path = self.dir.join(filename);
        let body = serde_json::to_vec_pretty(message)?;
        tokio::fs::write(&path, body).await?;

        tracing::info!("Contact message from '{}' queued at {:?}", message.from_name, path);
        Ok(SUCCESS_STATUS)
    }
}
