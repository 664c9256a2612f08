//! Agenda and ballot item catalog

use serde::Serialize;
use tracing::info;

use crate::db::models::vote_item::parse_options;
use crate::db::models::{Agenda, VoteItem};
use crate::db::repositories::{AgendaRepository, VoteItemRepository, VoteRecordRepository};
use crate::db::DatabasePool;
use crate::{BallotError, Result};

/// An agenda together with some of its items
#[derive(Debug, Clone, Serialize)]
pub struct AgendaWithItems {
    pub agenda: Agenda,
    pub items: Vec<VoteItem>,
}

/// Rows removed by a cascading delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub items: u64,
    pub votes: u64,
}

/// Creates, toggles, lists and deletes agendas and ballot items
#[derive(Debug, Clone)]
pub struct Catalog {
    pool: DatabasePool,
}

impl Catalog {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create_agenda(&self, title: &str) -> Result<Agenda> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BallotError::validation("Agenda title must not be empty"));
        }

        let agenda = Agenda::new(title);
        AgendaRepository::insert(&self.pool, &agenda).await?;

        info!(agenda_id = %agenda.agenda_id, title = %agenda.title, "Agenda created");
        Ok(agenda)
    }

    /// Create an inactive ballot item under an existing agenda
    ///
    /// `options` is free-form text; labels are split on commas and newlines.
    pub async fn create_ballot_item(
        &self,
        agenda_id: &str,
        title: &str,
        options: &str,
    ) -> Result<VoteItem> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BallotError::validation("Vote title must not be empty"));
        }
        let labels = parse_options(options);
        if labels.is_empty() {
            return Err(BallotError::validation(
                "At least one non-empty option is required",
            ));
        }
        self.get_agenda(agenda_id).await?;

        let item = VoteItem::new(agenda_id, title, &labels);
        VoteItemRepository::insert(&self.pool, &item).await?;

        info!(
            vote_id = %item.vote_id,
            agenda_id = %item.agenda_id,
            options = labels.len(),
            "Ballot item created"
        );
        Ok(item)
    }

    /// Open voting on an item. Idempotent.
    pub async fn activate(&self, vote_id: &str) -> Result<()> {
        self.set_active(vote_id, true).await
    }

    /// Close voting on an item. Idempotent.
    pub async fn deactivate(&self, vote_id: &str) -> Result<()> {
        self.set_active(vote_id, false).await
    }

    async fn set_active(&self, vote_id: &str, active: bool) -> Result<()> {
        let matched = VoteItemRepository::set_active(&self.pool, vote_id, active).await?;
        if matched == 0 {
            return Err(BallotError::not_found(format!("vote item {}", vote_id)));
        }
        info!(vote_id, active, "Ballot item state changed");
        Ok(())
    }

    /// Active items grouped by agenda, agendas and items in creation order
    ///
    /// Agendas without active items are omitted.
    pub async fn list_active_items(&self) -> Result<Vec<AgendaWithItems>> {
        let agendas = AgendaRepository::list(&self.pool).await?;
        let mut items = VoteItemRepository::list_active(&self.pool).await?;

        let mut grouped = Vec::new();
        for agenda in agendas {
            let (mine, rest): (Vec<VoteItem>, Vec<VoteItem>) = items
                .into_iter()
                .partition(|item| item.agenda_id == agenda.agenda_id);
            items = rest;
            if !mine.is_empty() {
                grouped.push(AgendaWithItems {
                    agenda,
                    items: mine,
                });
            }
        }
        Ok(grouped)
    }

    /// Delete an item and its recorded votes
    pub async fn delete_item(&self, vote_id: &str) -> Result<Removed> {
        let mut tx = self.pool.begin().await?;

        if VoteItemRepository::get(&mut *tx, vote_id).await?.is_none() {
            return Err(BallotError::not_found(format!("vote item {}", vote_id)));
        }
        let votes = VoteRecordRepository::delete_by_item(&mut *tx, vote_id).await?;
        let items = VoteItemRepository::delete(&mut *tx, vote_id).await?;
        tx.commit().await?;

        info!(vote_id, votes, "Ballot item deleted");
        Ok(Removed { items, votes })
    }

    /// Delete an agenda, its items and their recorded votes
    pub async fn delete_agenda(&self, agenda_id: &str) -> Result<Removed> {
        let mut tx = self.pool.begin().await?;

        if AgendaRepository::get(&mut *tx, agenda_id).await?.is_none() {
            return Err(BallotError::not_found(format!("agenda {}", agenda_id)));
        }
        let votes = VoteRecordRepository::delete_by_agenda(&mut *tx, agenda_id).await?;
        let items = VoteItemRepository::delete_by_agenda(&mut *tx, agenda_id).await?;
        AgendaRepository::delete(&mut *tx, agenda_id).await?;
        tx.commit().await?;

        info!(agenda_id, items, votes, "Agenda deleted");
        Ok(Removed { items, votes })
    }

    pub async fn get_agenda(&self, agenda_id: &str) -> Result<Agenda> {
        AgendaRepository::get(&self.pool, agenda_id)
            .await?
            .ok_or_else(|| BallotError::not_found(format!("agenda {}", agenda_id)))
    }

    pub async fn get_item(&self, vote_id: &str) -> Result<VoteItem> {
        VoteItemRepository::get(&self.pool, vote_id)
            .await?
            .ok_or_else(|| BallotError::not_found(format!("vote item {}", vote_id)))
    }

    pub async fn list_agendas(&self) -> Result<Vec<Agenda>> {
        Ok(AgendaRepository::list(&self.pool).await?)
    }

    /// Every item of an agenda, active or not
    pub async fn list_items(&self, agenda_id: &str) -> Result<Vec<VoteItem>> {
        Ok(VoteItemRepository::list_by_agenda(&self.pool, agenda_id).await?)
    }
}
