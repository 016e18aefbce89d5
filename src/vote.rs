// src/vote.rs
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{PollError, PollResult, StoreError};
use crate::models::{NewVote, Vote, ANONYMOUS_VOTER, MAX_TEXT_LEN};
use crate::poll::is_expired;
use crate::store::EntityStore;

/// Pick the identifier a vote is recorded under: the caller's own value, else
/// the fallback (usually the client address), else `"anonymous"`.
pub fn normalize_voter(voter_identifier: Option<&str>, fallback: Option<&str>) -> String {
    [voter_identifier, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(ANONYMOUS_VOTER)
        .to_string()
}

/// Record one vote. Fails with `PollClosed`, `InvalidOption` or `DuplicateVote`
/// without writing anything.
#[instrument(skip(store, voter_identifier, fallback))]
pub async fn cast_vote(
    store: &dyn EntityStore,
    poll_id: Uuid,
    option_id: Uuid,
    voter_identifier: Option<&str>,
    fallback: Option<&str>,
) -> PollResult<Vote> {
    let poll = store
        .find_poll(poll_id)
        .await?
        .ok_or_else(|| PollError::NotFound("Poll".into()))?;

    if is_expired(poll.expires_at, Utc::now()) {
        warn!("vote rejected: poll closed");
        return Err(PollError::PollClosed);
    }

    let option = match store.find_option(poll.id, option_id).await? {
        Some(option) => option,
        None => {
            warn!("vote rejected: option not in poll");
            return Err(PollError::InvalidOption);
        }
    };

    let voter_identifier = normalize_voter(voter_identifier, fallback);
    if voter_identifier.chars().count() > MAX_TEXT_LEN {
        return Err(PollError::Validation(format!(
            "Voter identifier may not exceed {MAX_TEXT_LEN} characters."
        )));
    }
    if voter_identifier.contains('\0') {
        return Err(PollError::Validation(
            "Voter identifier may not contain null characters.".into(),
        ));
    }

    let vote = store
        .insert_vote(NewVote {
            poll_id: poll.id,
            option_id: option.id,
            voter_identifier,
        })
        .await
        .map_err(|err| match err {
            StoreError::UniqueViolation(_) => {
                warn!("vote rejected: duplicate voter");
                PollError::DuplicateVote
            }
            // The option was removed between lookup and insert.
            StoreError::ForeignKeyViolation(_) => PollError::InvalidOption,
            other => PollError::Storage(other),
        })?;

    info!(vote_id = %vote.id, "vote recorded");
    Ok(vote)
}
