//! Vote record repository for database operations

use sqlx::SqliteExecutor;

use crate::db::connection::DatabasePool;
use crate::db::models::{timestamp_now, VoteRecord};

/// Vote record repository
pub struct VoteRecordRepository;

impl VoteRecordRepository {
    /// Record one choice
    ///
    /// Fails with a unique violation when the token already voted on the item.
    pub async fn insert(
        pool: &DatabasePool,
        vote_id: &str,
        token: &str,
        choice: &str,
    ) -> Result<VoteRecord, sqlx::Error> {
        let timestamp = timestamp_now();
        let result = sqlx::query(
            "INSERT INTO votes (vote_id, token, choice, timestamp) VALUES (?, ?, ?, ?)",
        )
        .bind(vote_id)
        .bind(token)
        .bind(choice)
        .bind(&timestamp)
        .execute(pool)
        .await?;

        Ok(VoteRecord {
            id: result.last_insert_rowid(),
            vote_id: vote_id.to_string(),
            token: token.to_string(),
            choice: choice.to_string(),
            timestamp,
        })
    }

    /// Whether the token already has a record for the item
    pub async fn exists(
        pool: &DatabasePool,
        token: &str,
        vote_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM votes WHERE token = ? AND vote_id = ?)")
            .bind(token)
            .bind(vote_id)
            .fetch_one(pool)
            .await
    }

    /// Count per chosen option, options without votes are absent
    pub async fn tally(
        pool: &DatabasePool,
        vote_id: &str,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT choice, COUNT(*) FROM votes WHERE vote_id = ? GROUP BY choice ORDER BY choice",
        )
        .bind(vote_id)
        .fetch_all(pool)
        .await
    }

    /// Newest records first
    pub async fn recent(
        pool: &DatabasePool,
        vote_id: &str,
        limit: i64,
    ) -> Result<Vec<VoteRecord>, sqlx::Error> {
        sqlx::query_as::<_, VoteRecord>(
            "SELECT id, vote_id, token, choice, timestamp FROM votes
             WHERE vote_id = ? ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(vote_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Number of records for one item
    pub async fn count_for_item(pool: &DatabasePool, vote_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE vote_id = ?")
            .bind(vote_id)
            .fetch_one(pool)
            .await
    }

    /// Number of records overall
    pub async fn count(pool: &DatabasePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(pool)
            .await
    }

    /// Delete the records of one item
    pub async fn delete_by_item<'e, E>(executor: E, vote_id: &str) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM votes WHERE vote_id = ?")
            .bind(vote_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete the records of every item in an agenda
    pub async fn delete_by_agenda<'e, E>(executor: E, agenda_id: &str) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            "DELETE FROM votes WHERE vote_id IN (SELECT vote_id FROM vote_items WHERE agenda_id = ?)",
        )
        .bind(agenda_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
