// models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_TEXT_LEN: usize = 255;
pub const ANONYMOUS_VOTER: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Poll {
    pub id: Uuid,
    pub question: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PollOption {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub position: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub voter_identifier: String,
    pub created_at: DateTime<Utc>,
}

/// A poll together with its options in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct PollDetail {
    pub poll: Poll,
    pub options: Vec<PollOption>,
}

/// Rows to be written by `EntityStore::insert_poll`.
#[derive(Debug, Clone)]
pub struct NewPoll {
    pub question: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewVote {
    pub poll_id: Uuid,
    pub option_id: Uuid,
    pub voter_identifier: String,
}

/// Vote count for one option, as returned by the store's grouped count.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OptionTally {
    pub option_id: Uuid,
    pub text: String,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionResult {
    pub option: String,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    pub poll: String,
    pub results: Vec<OptionResult>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub option_id: Uuid,
    #[serde(default)]
    pub voter_identifier: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptionResponse {
    pub id: Uuid,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PollResponse {
    pub id: Uuid,
    pub question: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_expired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub options: Vec<OptionResponse>,
}

impl PollResponse {
    pub fn from_detail(detail: PollDetail, now: DateTime<Utc>) -> Self {
        let is_expired = crate::poll::is_expired(detail.poll.expires_at, now);
        PollResponse {
            id: detail.poll.id,
            question: detail.poll.question,
            expires_at: detail.poll.expires_at,
            is_expired,
            created_at: detail.poll.created_at,
            updated_at: detail.poll.updated_at,
            options: detail
                .options
                .into_iter()
                .map(|o| OptionResponse {
                    id: o.id,
                    text: o.text,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
