mod common;

use std::fs;

use ballotbox::db::repositories::VoteRecordRepository;
use ballotbox::services::{Catalog, SubmissionReport};
use ballotbox::BallotError;
use common::{active_item, pair, setup_test_db, submission_engine, token_store};

async fn vote_count(db: &ballotbox::db::DatabaseConnection, token: &str, vote_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE token = ? AND vote_id = ?")
        .bind(token)
        .bind(vote_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_unknown_token_records_nothing() {
    let (dir, db) = setup_test_db().await;
    let catalog = Catalog::new(db.pool().clone());
    let engine = submission_engine(&dir, &db);
    let (_, item) = active_item(&catalog, "Budget", "Yes,No").await;

    let result = engine.submit("forged", &[pair(&item.vote_id, "Yes")]).await;
    assert!(matches!(result, Err(BallotError::InvalidToken)));

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_second_submission_counts_duplicates() {
    let (dir, db) = setup_test_db().await;
    let catalog = Catalog::new(db.pool().clone());
    let engine = submission_engine(&dir, &db);
    let (_, first) = active_item(&catalog, "Budget", "Yes,No").await;
    let (_, second) = active_item(&catalog, "Auditor", "Alice,Bob").await;
    let token = token_store(&db).issue_batch(1).await.unwrap().remove(0).token;

    let report = engine.submit(&token, &[pair(&first.vote_id, "Yes")]).await.unwrap();
    assert_eq!(
        report,
        SubmissionReport {
            submitted: 1,
            duplicates: 0,
            rejected: 0,
            total: 1
        }
    );

    let report = engine
        .submit(
            &token,
            &[pair(&first.vote_id, "No"), pair(&second.vote_id, "Bob")],
        )
        .await
        .unwrap();
    assert_eq!(report.submitted, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.total, 2);

    // The first choice stands
    let choice: String = sqlx::query_scalar("SELECT choice FROM votes WHERE token = ? AND vote_id = ?")
        .bind(&token)
        .bind(&first.vote_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(choice, "Yes");
}

#[tokio::test]
async fn test_rejected_pairs() {
    let (dir, db) = setup_test_db().await;
    let catalog = Catalog::new(db.pool().clone());
    let engine = submission_engine(&dir, &db);
    let (agenda, open) = active_item(&catalog, "Budget", "Yes,No").await;
    let closed = catalog
        .create_ballot_item(&agenda.agenda_id, "Closed", "Yes,No")
        .await
        .unwrap();
    let token = token_store(&db).issue_batch(1).await.unwrap().remove(0).token;

    let report = engine
        .submit(
            &token,
            &[
                pair(&closed.vote_id, "Yes"),
                pair("missing-item", "Yes"),
                pair(&open.vote_id, "Maybe"),
                pair(&open.vote_id, "No"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.rejected, 3);
    assert_eq!(report.submitted, 1);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.total, 4);
    assert_eq!(vote_count(&db, &token, &closed.vote_id).await, 0);
}

#[tokio::test]
async fn test_empty_submission_is_not_an_error() {
    let (dir, db) = setup_test_db().await;
    let engine = submission_engine(&dir, &db);
    let token = token_store(&db).issue_batch(1).await.unwrap().remove(0).token;

    let report = engine.submit(&token, &[]).await.unwrap();
    assert_eq!(report, SubmissionReport::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_submissions_record_once() {
    let (dir, db) = setup_test_db().await;
    let catalog = Catalog::new(db.pool().clone());
    let engine = submission_engine(&dir, &db);
    let (_, item) = active_item(&catalog, "Budget", "Yes,No").await;
    let token = token_store(&db).issue_batch(1).await.unwrap().remove(0).token;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        let token = token.clone();
        let pairs = vec![pair(&item.vote_id, "Yes")];
        handles.push(tokio::spawn(async move { engine.submit(&token, &pairs).await }));
    }

    let mut submitted = 0;
    let mut duplicates = 0;
    for handle in handles {
        let report = handle.await.unwrap().unwrap();
        submitted += report.submitted;
        duplicates += report.duplicates;
    }

    assert_eq!(submitted, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(vote_count(&db, &token, &item.vote_id).await, 1);
}

#[tokio::test]
async fn test_insert_collision_maps_to_duplicate_vote() {
    let (dir, db) = setup_test_db().await;
    let catalog = Catalog::new(db.pool().clone());
    let engine = submission_engine(&dir, &db);
    let (_, item) = active_item(&catalog, "Budget", "Yes,No").await;
    let token = token_store(&db).issue_batch(1).await.unwrap().remove(0).token;

    // Another request wins the race after this one passed its existence check
    VoteRecordRepository::insert(db.pool(), &item.vote_id, &token, "No")
        .await
        .unwrap();

    let result = engine.record(&token, &item.vote_id, "Yes").await;
    match result {
        Err(BallotError::DuplicateVote { vote_id }) => assert_eq!(vote_id, item.vote_id),
        other => panic!("expected duplicate vote, got {:?}", other),
    }
    assert_eq!(vote_count(&db, &token, &item.vote_id).await, 1);
}

#[tokio::test]
async fn test_accepted_votes_reach_audit_log() {
    let (dir, db) = setup_test_db().await;
    let catalog = Catalog::new(db.pool().clone());
    let engine = submission_engine(&dir, &db);
    let (_, item) = active_item(&catalog, "Budget", "Yes,No").await;
    let token = token_store(&db).issue_batch(1).await.unwrap().remove(0).token;

    engine.submit(&token, &[pair(&item.vote_id, "No")]).await.unwrap();
    engine.submit(&token, &[pair(&item.vote_id, "Yes")]).await.unwrap();

    let files: Vec<_> = fs::read_dir(dir.path().join("log"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let content = fs::read_to_string(&files[0]).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "timestamp,vote_id,token,choice");
    assert!(lines[1].ends_with(&format!(",{},{},No", item.vote_id, token)));
}
