//! Tally and status reporting
//!
//! Counts are computed on demand from the votes table; nothing is cached.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::models::setting::MEETING_TITLE;
use crate::db::models::{Agenda, VoteItem, VoteRecord};
use crate::db::repositories::{
    AgendaRepository, SettingRepository, VoteItemRepository, VoteRecordRepository,
};
use crate::db::DatabasePool;
use crate::services::token_store::TokenCounts;
use crate::{BallotError, Result};

/// An item with its current counts
#[derive(Debug, Clone, Serialize)]
pub struct ItemTally {
    pub item: VoteItem,
    pub tally: BTreeMap<String, i64>,
    pub total_votes: i64,
}

/// An agenda with every item and its counts
#[derive(Debug, Clone, Serialize)]
pub struct AgendaSummary {
    pub agenda: Agenda,
    pub items: Vec<ItemTally>,
}

/// Detailed view of one item
#[derive(Debug, Clone, Serialize)]
pub struct ItemStatus {
    pub item: VoteItem,
    pub tally: BTreeMap<String, i64>,
    /// Newest first
    pub recent: Vec<VoteRecord>,
    pub total_votes: i64,
}

/// Admin dashboard view model
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub meeting_title: Option<String>,
    pub agendas: Vec<AgendaSummary>,
    pub total_votes: i64,
    pub active_items: i64,
    pub tokens: TokenCounts,
}

/// Read-only aggregation over recorded votes
#[derive(Debug, Clone)]
pub struct TallyReporter {
    pool: DatabasePool,
}

impl TallyReporter {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Votes per option; options without votes are absent
    pub async fn tally(&self, vote_id: &str) -> Result<BTreeMap<String, i64>> {
        let rows = VoteRecordRepository::tally(&self.pool, vote_id).await?;
        Ok(rows.into_iter().collect())
    }

    /// Latest records for an item, newest first
    pub async fn recent_records(&self, vote_id: &str, limit: i64) -> Result<Vec<VoteRecord>> {
        VoteRecordRepository::recent(&self.pool, vote_id, limit.max(0))
            .await
            .map_err(Into::into)
    }

    /// Tally and recent records of one item, active or not
    pub async fn item_status(&self, vote_id: &str, limit: i64) -> Result<ItemStatus> {
        let item = VoteItemRepository::get(&self.pool, vote_id)
            .await?
            .ok_or_else(|| BallotError::not_found(format!("vote item {}", vote_id)))?;

        let tally = self.tally(vote_id).await?;
        let recent = self.recent_records(vote_id, limit).await?;
        let total_votes = VoteRecordRepository::count_for_item(&self.pool, vote_id).await?;

        Ok(ItemStatus {
            item,
            tally,
            recent,
            total_votes,
        })
    }

    /// Everything the admin dashboard shows
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let mut agendas = Vec::new();
        for agenda in AgendaRepository::list(&self.pool).await? {
            let mut items = Vec::new();
            for item in VoteItemRepository::list_by_agenda(&self.pool, &agenda.agenda_id).await? {
                let tally = self.tally(&item.vote_id).await?;
                let total_votes = tally.values().sum();
                items.push(ItemTally {
                    item,
                    tally,
                    total_votes,
                });
            }
            agendas.push(AgendaSummary { agenda, items });
        }

        let meeting_title = SettingRepository::get(&self.pool, MEETING_TITLE)
            .await?
            .map(|setting| setting.value);

        Ok(Dashboard {
            meeting_title,
            agendas,
            total_votes: VoteRecordRepository::count(&self.pool).await?,
            active_items: VoteItemRepository::count_active(&self.pool).await?,
            tokens: TokenCounts::load(&self.pool).await?,
        })
    }
}
