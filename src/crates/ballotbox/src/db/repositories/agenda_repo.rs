//! Agenda repository for database operations

use sqlx::SqliteExecutor;

use crate::db::connection::DatabasePool;
use crate::db::models::Agenda;

/// Agenda repository
pub struct AgendaRepository;

impl AgendaRepository {
    /// Insert an agenda
    pub async fn insert(pool: &DatabasePool, agenda: &Agenda) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO vote_agendas (agenda_id, title, created_at) VALUES (?, ?, ?)")
            .bind(&agenda.agenda_id)
            .bind(&agenda.title)
            .bind(&agenda.created_at)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Get an agenda by ID
    pub async fn get<'e, E>(executor: E, agenda_id: &str) -> Result<Option<Agenda>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_as::<_, Agenda>(
            "SELECT agenda_id, title, created_at FROM vote_agendas WHERE agenda_id = ?",
        )
        .bind(agenda_id)
        .fetch_optional(executor)
        .await
    }

    /// List agendas oldest first
    pub async fn list(pool: &DatabasePool) -> Result<Vec<Agenda>, sqlx::Error> {
        sqlx::query_as::<_, Agenda>(
            "SELECT agenda_id, title, created_at FROM vote_agendas ORDER BY created_at ASC, rowid ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Delete an agenda row. Items must already be gone.
    pub async fn delete<'e, E>(executor: E, agenda_id: &str) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM vote_agendas WHERE agenda_id = ?")
            .bind(agenda_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
