use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::repository::{EntryRepository, RepoResult};
use crate::models::mood_entry::{EntryId, MoodEntry, MoodEntryRow, NewMoodEntry};

#[derive(Clone)]
pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn load_all(&self, user_id: Uuid) -> RepoResult<Vec<MoodEntry>> {
        let rows = sqlx::query_as::<_, MoodEntryRow>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
            ORDER BY entry_date ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match MoodEntry::try_from(row) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(user_id = %user_id, entry_id = id, error = %e, "Skipping unreadable mood entry");
                        None
                    }
                }
            })
            .collect();

        Ok(entries)
    }

    async fn upsert(&self, user_id: Uuid, entry: NewMoodEntry) -> RepoResult<MoodEntry> {
        let mut tx = self.pool.begin().await?;

        // Read-then-write: without a unique (user_id, entry_date) constraint a
        // concurrent save can still insert a second row for the same date.
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM mood_entries
            WHERE user_id = $1 AND entry_date = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(entry.date)
        .fetch_optional(&mut *tx)
        .await?;

        let row = match existing {
            Some(id) => {
                sqlx::query_as::<_, MoodEntryRow>(
                    r#"
                    UPDATE mood_entries SET
                        mood = $3,
                        feelings = $4,
                        reflection = $5,
                        sleep_range = $6,
                        updated_at = NOW()
                    WHERE id = $1 AND user_id = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(user_id)
                .bind(entry.mood.label())
                .bind(&entry.feelings)
                .bind(&entry.reflection)
                .bind(entry.sleep_range.label())
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, MoodEntryRow>(
                    r#"
                    INSERT INTO mood_entries (user_id, entry_date, mood, feelings, reflection, sleep_range)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(entry.date)
                .bind(entry.mood.label())
                .bind(&entry.feelings)
                .bind(&entry.reflection)
                .bind(entry.sleep_range.label())
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            entry_id = row.id,
            date = %row.entry_date,
            updated = existing.is_some(),
            "Mood entry saved"
        );

        Ok(MoodEntry::try_from(row)?)
    }

    async fn remove(&self, user_id: Uuid, id: &EntryId) -> RepoResult<bool> {
        let Ok(id) = id.as_str().parse::<i64>() else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM mood_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
