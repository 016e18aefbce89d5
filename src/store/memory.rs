// src/store/memory.rs
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EntityStore, StoreResult};
use crate::error::StoreError;
use crate::models::{NewPoll, NewVote, OptionTally, Poll, PollDetail, PollOption, Vote};

#[derive(Default)]
struct Tables {
    polls: Vec<Poll>,
    // Kept in insertion order, which is option creation order.
    options: Vec<PollOption>,
    votes: Vec<Vote>,
    voters: HashSet<(Uuid, String)>,
}

/// In-process `EntityStore`. Every write takes the single write lock, so the
/// voter uniqueness check and the insert happen as one step.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn option_rows(&self) -> usize {
        self.tables.read().await.options.len()
    }

    pub async fn vote_rows(&self) -> usize {
        self.tables.read().await.votes.len()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert_poll(&self, new_poll: NewPoll) -> StoreResult<PollDetail> {
        let now = Utc::now();
        let poll = Poll {
            id: Uuid::new_v4(),
            question: new_poll.question,
            expires_at: new_poll.expires_at,
            created_at: now,
            updated_at: now,
        };
        let options: Vec<PollOption> = new_poll
            .options
            .into_iter()
            .enumerate()
            .map(|(position, text)| PollOption {
                id: Uuid::new_v4(),
                poll_id: poll.id,
                position: position as i32,
                text,
                created_at: now,
            })
            .collect();

        let mut tables = self.tables.write().await;
        tables.polls.push(poll.clone());
        tables.options.extend(options.iter().cloned());

        Ok(PollDetail { poll, options })
    }

    async fn find_poll(&self, id: Uuid) -> StoreResult<Option<Poll>> {
        let tables = self.tables.read().await;
        Ok(tables.polls.iter().find(|p| p.id == id).cloned())
    }

    async fn list_polls(&self) -> StoreResult<Vec<Poll>> {
        let tables = self.tables.read().await;
        Ok(tables.polls.iter().rev().cloned().collect())
    }

    async fn poll_options(&self, poll_id: Uuid) -> StoreResult<Vec<PollOption>> {
        let tables = self.tables.read().await;
        Ok(tables
            .options
            .iter()
            .filter(|o| o.poll_id == poll_id)
            .cloned()
            .collect())
    }

    async fn find_option(
        &self,
        poll_id: Uuid,
        option_id: Uuid,
    ) -> StoreResult<Option<PollOption>> {
        let tables = self.tables.read().await;
        Ok(tables
            .options
            .iter()
            .find(|o| o.id == option_id && o.poll_id == poll_id)
            .cloned())
    }

    async fn insert_vote(&self, new_vote: NewVote) -> StoreResult<Vote> {
        let mut tables = self.tables.write().await;

        let option_in_poll = tables
            .options
            .iter()
            .any(|o| o.id == new_vote.option_id && o.poll_id == new_vote.poll_id);
        if !option_in_poll {
            return Err(StoreError::ForeignKeyViolation(
                "votes_option_in_poll_fkey".to_string(),
            ));
        }

        let key = (new_vote.poll_id, new_vote.voter_identifier.clone());
        if !tables.voters.insert(key) {
            return Err(StoreError::UniqueViolation(
                "unique_vote_per_poll_per_voter".to_string(),
            ));
        }

        let vote = Vote {
            id: Uuid::new_v4(),
            poll_id: new_vote.poll_id,
            option_id: new_vote.option_id,
            voter_identifier: new_vote.voter_identifier,
            created_at: Utc::now(),
        };
        tables.votes.push(vote.clone());
        Ok(vote)
    }

    async fn tally_votes(&self, poll_id: Uuid) -> StoreResult<Vec<OptionTally>> {
        let tables = self.tables.read().await;

        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for vote in tables.votes.iter().filter(|v| v.poll_id == poll_id) {
            *counts.entry(vote.option_id).or_insert(0) += 1;
        }

        Ok(tables
            .options
            .iter()
            .filter(|o| o.poll_id == poll_id)
            .map(|o| OptionTally {
                option_id: o.id,
                text: o.text.clone(),
                votes: counts.get(&o.id).copied().unwrap_or(0),
            })
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
