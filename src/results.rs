// src/results.rs
use uuid::Uuid;

use crate::error::{PollError, PollResult};
use crate::models::{OptionResult, PollResults};
use crate::store::EntityStore;

/// Vote counts for every option of a poll, in option creation order.
pub async fn get_results(store: &dyn EntityStore, poll_id: Uuid) -> PollResult<PollResults> {
    let poll = store
        .find_poll(poll_id)
        .await?
        .ok_or_else(|| PollError::NotFound("Poll".into()))?;

    let results = store
        .tally_votes(poll.id)
        .await?
        .into_iter()
        .map(|tally| OptionResult {
            option: tally.text,
            votes: tally.votes,
        })
        .collect();

    Ok(PollResults {
        poll: poll.question,
        results,
    })
}
