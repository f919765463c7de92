use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::repository::{EntryRepository, RepoResult};
use crate::models::mood_entry::{EntryId, MoodEntry, NewMoodEntry};
use crate::services::today::select_today;

/// In-process store (single-instance dev mode and tests).
/// Data is lost on restart.
#[derive(Clone, Default)]
pub struct MemoryEntryRepository {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    by_user: HashMap<Uuid, Vec<MoodEntry>>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId::from(self.next_id)
    }
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row as-is, bypassing the upsert lookup. Lets tests reproduce
    /// the duplicate rows a racing writer leaves behind.
    #[cfg(test)]
    pub async fn insert_raw(&self, user_id: Uuid, entry: MoodEntry) {
        let mut state = self.inner.lock().await;
        state.by_user.entry(user_id).or_default().push(entry);
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepository {
    async fn load_all(&self, user_id: Uuid) -> RepoResult<Vec<MoodEntry>> {
        let state = self.inner.lock().await;
        Ok(state.by_user.get(&user_id).cloned().unwrap_or_default())
    }

    async fn upsert(&self, user_id: Uuid, entry: NewMoodEntry) -> RepoResult<MoodEntry> {
        let mut state = self.inner.lock().await;

        let existing = state
            .by_user
            .get(&user_id)
            .and_then(|entries| select_today(entries, entry.date))
            .map(|e| e.id.clone());

        let id = match existing {
            Some(id) => id,
            None => state.allocate_id(),
        };
        let saved = entry.into_entry(id);

        let entries = state.by_user.entry(user_id).or_default();
        match entries.iter_mut().find(|e| e.id == saved.id) {
            Some(slot) => *slot = saved.clone(),
            None => entries.push(saved.clone()),
        }

        Ok(saved)
    }

    async fn remove(&self, user_id: Uuid, id: &EntryId) -> RepoResult<bool> {
        let mut state = self.inner.lock().await;
        let Some(entries) = state.by_user.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        Ok(entries.len() < before)
    }

    async fn ping(&self) -> bool {
        true
    }
}
