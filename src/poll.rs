// src/poll.rs
use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{PollError, PollResult};
use crate::models::{NewPoll, PollDetail, MAX_TEXT_LEN};
use crate::store::EntityStore;

pub const MIN_OPTIONS: usize = 2;

/// A poll without an expiry never closes; otherwise it closes at `expires_at`.
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(expires_at, Some(expires_at) if now >= expires_at)
}

fn validate(question: &str, options: &[String]) -> PollResult<()> {
    if options.len() < MIN_OPTIONS {
        return Err(PollError::Validation(format!(
            "A poll needs at least {MIN_OPTIONS} options."
        )));
    }
    if question.trim().is_empty() {
        return Err(PollError::Validation("Question may not be blank.".into()));
    }
    if question.contains('\0') {
        return Err(PollError::Validation("Question may not contain null characters.".into()));
    }
    for option in options {
        if option.contains('\0') {
            return Err(PollError::Validation(
                "Option text may not contain null characters.".into(),
            ));
        }
        if option.trim().is_empty() {
            return Err(PollError::Validation("Option text may not be blank.".into()));
        }
        if option.chars().count() > MAX_TEXT_LEN {
            return Err(PollError::Validation(format!(
                "Option text may not exceed {MAX_TEXT_LEN} characters."
            )));
        }
    }
    Ok(())
}

/// Create a poll and its options. Nothing is written unless the input is valid,
/// and the store writes the poll and its options together or not at all.
#[instrument(skip(store, options), fields(option_count = options.len()))]
pub async fn create_poll(
    store: &dyn EntityStore,
    question: String,
    options: Vec<String>,
    expires_at: Option<DateTime<Utc>>,
) -> PollResult<PollDetail> {
    validate(&question, &options)?;

    let detail = store
        .insert_poll(NewPoll {
            question,
            expires_at,
            options,
        })
        .await?;

    info!(poll_id = %detail.poll.id, "poll created");
    Ok(detail)
}

pub async fn get_poll(store: &dyn EntityStore, id: Uuid) -> PollResult<PollDetail> {
    let poll = store
        .find_poll(id)
        .await?
        .ok_or_else(|| PollError::NotFound("Poll".into()))?;
    let options = store.poll_options(poll.id).await?;
    Ok(PollDetail { poll, options })
}

pub async fn list_polls(store: &dyn EntityStore) -> PollResult<Vec<PollDetail>> {
    let polls = store.list_polls().await?;
    let mut details = Vec::with_capacity(polls.len());
    for poll in polls {
        let options = store.poll_options(poll.id).await?;
        details.push(PollDetail { poll, options });
    }
    Ok(details)
}
