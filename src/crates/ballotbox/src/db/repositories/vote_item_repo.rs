//! Ballot item repository for database operations

use sqlx::SqliteExecutor;

use crate::db::connection::DatabasePool;
use crate::db::models::VoteItem;

/// Ballot item repository
pub struct VoteItemRepository;

impl VoteItemRepository {
    /// Insert a ballot item
    pub async fn insert(pool: &DatabasePool, item: &VoteItem) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO vote_items (vote_id, agenda_id, title, options, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.vote_id)
        .bind(&item.agenda_id)
        .bind(&item.title)
        .bind(&item.options)
        .bind(item.is_active)
        .bind(&item.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get a ballot item by ID
    pub async fn get<'e, E>(executor: E, vote_id: &str) -> Result<Option<VoteItem>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, VoteItem>(
            "SELECT vote_id, agenda_id, title, options, is_active, created_at
             FROM vote_items WHERE vote_id = ?",
        )
        .bind(vote_id)
        .fetch_optional(executor)
        .await
    }

    /// List the items of one agenda in creation order
    pub async fn list_by_agenda(
        pool: &DatabasePool,
        agenda_id: &str,
    ) -> Result<Vec<VoteItem>, sqlx::Error> {
        sqlx::query_as::<_, VoteItem>(
            "SELECT vote_id, agenda_id, title, options, is_active, created_at
             FROM vote_items WHERE agenda_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(agenda_id)
        .fetch_all(pool)
        .await
    }

    /// List active items ordered by agenda creation, then item creation
    pub async fn list_active(pool: &DatabasePool) -> Result<Vec<VoteItem>, sqlx::Error> {
        sqlx::query_as::<_, VoteItem>(
            "SELECT i.vote_id, i.agenda_id, i.title, i.options, i.is_active, i.created_at
             FROM vote_items i
             INNER JOIN vote_agendas a ON a.agenda_id = i.agenda_id
             WHERE i.is_active = 1
             ORDER BY a.created_at ASC, a.rowid ASC, i.created_at ASC, i.rowid ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of active items
    pub async fn count_active(pool: &DatabasePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM vote_items WHERE is_active = 1")
            .fetch_one(pool)
            .await
    }

    /// Set the active flag; returns the number of matched rows
    pub async fn set_active(
        pool: &DatabasePool,
        vote_id: &str,
        active: bool,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE vote_items SET is_active = ? WHERE vote_id = ?")
            .bind(active)
            .bind(vote_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete one item row. Its votes must already be gone.
    pub async fn delete<'e, E>(executor: E, vote_id: &str) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM vote_items WHERE vote_id = ?")
            .bind(vote_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete every item of an agenda
    pub async fn delete_by_agenda<'e, E>(executor: E, agenda_id: &str) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM vote_items WHERE agenda_id = ?")
            .bind(agenda_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
