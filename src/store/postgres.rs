// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EntityStore, StoreResult};
use crate::error::StoreError;
use crate::models::{NewPoll, NewVote, OptionTally, Poll, PollDetail, PollOption, Vote};

const POLL_COLUMNS: &str = "id, question, expires_at, created_at, updated_at";
const OPTION_COLUMNS: &str = "id, poll_id, position, text, created_at";
const VOTE_COLUMNS: &str = "id, poll_id, option_id, voter_identifier, created_at";

/// `EntityStore` backed by PostgreSQL. Integrity rules live in the schema
/// under `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn insert_poll(&self, new_poll: NewPoll) -> StoreResult<PollDetail> {
        let mut tx = self.pool.begin().await.map_err(StoreError::classify)?;

        let poll = sqlx::query_as::<_, Poll>(&format!(
            "INSERT INTO polls (id, question, expires_at) VALUES ($1, $2, $3) RETURNING {POLL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_poll.question)
        .bind(new_poll.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::classify)?;

        let mut options = Vec::with_capacity(new_poll.options.len());
        for (position, text) in new_poll.options.iter().enumerate() {
            let option = sqlx::query_as::<_, PollOption>(&format!(
                "INSERT INTO poll_options (id, poll_id, position, text) VALUES ($1, $2, $3, $4) RETURNING {OPTION_COLUMNS}"
            ))
            .bind(Uuid::new_v4())
            .bind(poll.id)
            .bind(position as i32)
            .bind(text)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::classify)?;
            options.push(option);
        }

        // Dropping `tx` on any error above rolls the whole poll back.
        tx.commit().await.map_err(StoreError::classify)?;

        Ok(PollDetail { poll, options })
    }

    async fn find_poll(&self, id: Uuid) -> StoreResult<Option<Poll>> {
        sqlx::query_as::<_, Poll>(&format!("SELECT {POLL_COLUMNS} FROM polls WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::classify)
    }

    async fn list_polls(&self) -> StoreResult<Vec<Poll>> {
        sqlx::query_as::<_, Poll>(&format!(
            "SELECT {POLL_COLUMNS} FROM polls ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::classify)
    }

    async fn poll_options(&self, poll_id: Uuid) -> StoreResult<Vec<PollOption>> {
        sqlx::query_as::<_, PollOption>(&format!(
            "SELECT {OPTION_COLUMNS} FROM poll_options WHERE poll_id = $1 ORDER BY created_at, position"
        ))
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::classify)
    }

    async fn find_option(
        &self,
        poll_id: Uuid,
        option_id: Uuid,
    ) -> StoreResult<Option<PollOption>> {
        sqlx::query_as::<_, PollOption>(&format!(
            "SELECT {OPTION_COLUMNS} FROM poll_options WHERE id = $1 AND poll_id = $2"
        ))
        .bind(option_id)
        .bind(poll_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::classify)
    }

    async fn insert_vote(&self, vote: NewVote) -> StoreResult<Vote> {
        // The unique constraint decides the race; there is no pre-check.
        sqlx::query_as::<_, Vote>(&format!(
            "INSERT INTO votes (id, poll_id, option_id, voter_identifier) VALUES ($1, $2, $3, $4) RETURNING {VOTE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(vote.poll_id)
        .bind(vote.option_id)
        .bind(&vote.voter_identifier)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::classify)
    }

    async fn tally_votes(&self, poll_id: Uuid) -> StoreResult<Vec<OptionTally>> {
        sqlx::query_as::<_, OptionTally>(
            r#"
            SELECT o.id AS option_id, o.text AS text, COUNT(v.id) AS votes
            FROM poll_options o
            LEFT JOIN votes v ON v.option_id = o.id AND v.poll_id = o.poll_id
            WHERE o.poll_id = $1
            GROUP BY o.id, o.text, o.created_at, o.position
            ORDER BY o.created_at ASC, o.position ASC
            "#,
        )
        .bind(poll_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::classify)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StoreError::classify)?;
        Ok(())
    }
}
