//! Storage contract for one user's mood entries.
//!
//! Every call takes the owning user explicitly; adapters filter on it so a
//! caller can never read or touch another user's rows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::mood_entry::{EntryDataError, EntryId, MoodEntry, NewMoodEntry};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored entry is unreadable: {0}")]
    Corrupt(#[from] EntryDataError),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait EntryRepository: Send + Sync + 'static {
    /// All of the user's entries, in no particular order.
    async fn load_all(&self, user_id: Uuid) -> RepoResult<Vec<MoodEntry>>;

    /// Update the user's entry for `entry.date` if one exists, else insert.
    /// An updated row keeps its id.
    async fn upsert(&self, user_id: Uuid, entry: NewMoodEntry) -> RepoResult<MoodEntry>;

    /// `Ok(false)` when no such entry exists for this user.
    async fn remove(&self, user_id: Uuid, id: &EntryId) -> RepoResult<bool>;

    async fn ping(&self) -> bool;
}

/// Load for a read path: failures are logged and become an empty list, so
/// the aggregation views fall back to their no-data output.
pub async fn load_or_empty(repo: &dyn EntryRepository, user_id: Uuid) -> Vec<MoodEntry> {
    match repo.load_all(user_id).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "Failed to load mood entries");
            Vec::new()
        }
    }
}
