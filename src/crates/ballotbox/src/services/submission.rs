//! Ballot submission engine
//!
//! Records one choice per (token, ballot item). Each pair commits on its own:
//! a duplicate or rejected pair never undoes the pairs recorded before it.
//! The `UNIQUE(token, vote_id)` constraint is the final arbiter when two
//! submissions for the same token race each other.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::audit::AuditLog;
use crate::db::models::VoteRecord;
use crate::db::repositories::{TokenRepository, VoteItemRepository, VoteRecordRepository};
use crate::db::{DatabaseError, DatabasePool};
use crate::{BallotError, Result};

/// Per-submission counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    /// Pairs recorded by this submission
    pub submitted: usize,
    /// Pairs the token had already voted on
    pub duplicates: usize,
    /// Pairs naming an unknown or closed item, or an unknown option
    pub rejected: usize,
    /// Pairs received
    pub total: usize,
}

/// Validates tokens and records choices
#[derive(Debug, Clone)]
pub struct SubmissionEngine {
    pool: DatabasePool,
    audit: Arc<AuditLog>,
}

impl SubmissionEngine {
    pub fn new(pool: DatabasePool, audit: Arc<AuditLog>) -> Self {
        Self { pool, audit }
    }

    /// Record `(vote_id, choice)` pairs for `token`
    ///
    /// Fails with [`BallotError::InvalidToken`] before touching anything when
    /// the token was never issued. A storage failure stops processing; pairs
    /// recorded before it stay recorded.
    pub async fn submit(&self, token: &str, pairs: &[(String, String)]) -> Result<SubmissionReport> {
        if TokenRepository::get(&self.pool, token).await?.is_none() {
            warn!("Submission with unknown token rejected");
            return Err(BallotError::InvalidToken);
        }

        let mut report = SubmissionReport {
            total: pairs.len(),
            ..Default::default()
        };

        for (vote_id, choice) in pairs {
            let accepts = match VoteItemRepository::get(&self.pool, vote_id).await? {
                Some(item) => item.is_active && item.has_option(choice),
                None => false,
            };
            if !accepts {
                debug!(vote_id = %vote_id, "Pair rejected: item closed, unknown, or bad option");
                report.rejected += 1;
                continue;
            }

            if VoteRecordRepository::exists(&self.pool, token, vote_id).await? {
                report.duplicates += 1;
                continue;
            }

            match self.record(token, vote_id, choice).await {
                Ok(record) => {
                    report.submitted += 1;
                    self.audit.record_or_log(&record).await;
                }
                Err(BallotError::DuplicateVote { .. }) => report.duplicates += 1,
                Err(e) => return Err(e),
            }
        }

        info!(
            submitted = report.submitted,
            duplicates = report.duplicates,
            rejected = report.rejected,
            total = report.total,
            "Ballot submitted"
        );
        Ok(report)
    }

    /// Insert one record, mapping a uniqueness collision to a duplicate vote
    ///
    /// No item or option checks happen here; [`submit`](Self::submit) does those.
    pub async fn record(&self, token: &str, vote_id: &str, choice: &str) -> Result<VoteRecord> {
        VoteRecordRepository::insert(&self.pool, vote_id, token, choice)
            .await
            .map_err(|e| match DatabaseError::from(e) {
                err if err.is_unique_violation() => BallotError::DuplicateVote {
                    vote_id: vote_id.to_string(),
                },
                err => BallotError::Storage(err),
            })
    }
}
