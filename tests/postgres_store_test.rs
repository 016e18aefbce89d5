//! Runs against a live database: `DATABASE_URL=postgres://… cargo test -- --ignored`

use std::sync::Arc;

use poll_backend::{db, poll, results, vote, PgStore, PollError};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&url, 10).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    PgStore::new(pool)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn unique_constraint_admits_one_concurrent_vote() {
    let store = Arc::new(store().await);
    let detail = poll::create_poll(&*store, "Q?".into(), strings(&["x", "y"]), None)
        .await
        .unwrap();
    let (poll_id, option_id) = (detail.poll.id, detail.options[0].id);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                vote::cast_vote(&*store, poll_id, option_id, Some("racer"), None).await
            })
        })
        .collect();

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.unwrap());
    }

    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter_map(|o| o.as_ref().err())
        .all(|e| matches!(e, PollError::DuplicateVote)));
}

#[tokio::test]
#[ignore]
async fn cross_poll_option_and_ordered_results() {
    let store = store().await;
    let first = poll::create_poll(&store, "First?".into(), strings(&["A", "B"]), None)
        .await
        .unwrap();
    let second = poll::create_poll(&store, "Second?".into(), strings(&["C", "D"]), None)
        .await
        .unwrap();

    let err = vote::cast_vote(&store, first.poll.id, second.options[0].id, Some("v"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PollError::InvalidOption));

    for (voter, option) in [("v1", 0), ("v2", 0), ("v3", 1), ("v4", 0)] {
        vote::cast_vote(&store, first.poll.id, first.options[option].id, Some(voter), None)
            .await
            .unwrap();
    }

    let tally = results::get_results(&store, first.poll.id).await.unwrap();
    let counts: Vec<_> = tally
        .results
        .iter()
        .map(|r| (r.option.as_str(), r.votes))
        .collect();
    assert_eq!(counts, vec![("A", 3), ("B", 1)]);
}
