//! Persistence port for polls, options and votes.
//!
//! The voting engine only talks to an [`EntityStore`]; it never holds a
//! database handle of its own. Implementations must enforce the
//! `(poll_id, voter_identifier)` uniqueness of votes atomically, so that
//! concurrent inserts for the same voter see exactly one winner.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{NewPoll, NewVote, OptionTally, Poll, PollDetail, PollOption, Vote};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert a poll and all of its options as one atomic unit.
    async fn insert_poll(&self, poll: NewPoll) -> StoreResult<PollDetail>;

    async fn find_poll(&self, id: Uuid) -> StoreResult<Option<Poll>>;

    /// All polls, newest first.
    async fn list_polls(&self) -> StoreResult<Vec<Poll>>;

    /// Options of a poll ordered by creation.
    async fn poll_options(&self, poll_id: Uuid) -> StoreResult<Vec<PollOption>>;

    /// Look up an option only among the options of `poll_id`.
    async fn find_option(&self, poll_id: Uuid, option_id: Uuid)
        -> StoreResult<Option<PollOption>>;

    /// Insert a vote. A second vote for the same `(poll_id, voter_identifier)`
    /// fails with [`StoreError::UniqueViolation`].
    async fn insert_vote(&self, vote: NewVote) -> StoreResult<Vote>;

    /// Per-option vote counts for a poll, zero-vote options included, in
    /// option creation order.
    async fn tally_votes(&self, poll_id: Uuid) -> StoreResult<Vec<OptionTally>>;

    async fn ping(&self) -> StoreResult<()>;
}
