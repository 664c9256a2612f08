//! Token store: issuing and checking voting credentials

use serde::Serialize;
use tracing::info;

use crate::db::models::Token;
use crate::db::repositories::{TokenRepository, VoteRecordRepository};
use crate::db::DatabasePool;
use crate::{BallotError, Result};

/// Outcome of a token lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// No such token was issued
    NotFound,
    /// Token exists and may vote
    Valid,
    /// Token already voted on the item in question
    AlreadyUsed,
}

/// Issued/consumed token counters for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenCounts {
    pub issued: i64,
    /// Distinct issued tokens with at least one recorded vote
    pub consumed: i64,
    pub remaining: i64,
}

impl TokenCounts {
    pub async fn load(pool: &DatabasePool) -> Result<Self> {
        let issued = TokenRepository::count(pool).await?;
        let consumed = TokenRepository::count_consumed(pool).await?;
        Ok(Self {
            issued,
            consumed,
            remaining: issued.saturating_sub(consumed).max(0),
        })
    }
}

/// Issues and validates voting tokens
#[derive(Debug, Clone)]
pub struct TokenStore {
    pool: DatabasePool,
    max_batch_size: u32,
}

impl TokenStore {
    pub fn new(pool: DatabasePool, max_batch_size: u32) -> Self {
        Self {
            pool,
            max_batch_size,
        }
    }

    pub fn max_batch_size(&self) -> u32 {
        self.max_batch_size
    }

    /// Issue `count` fresh tokens in one transaction
    ///
    /// Serial numbers continue from the current maximum. Every statement in
    /// the transaction is a write, so overlapping batches wait on the busy
    /// timeout instead of failing, and each batch forms a contiguous run.
    pub async fn issue_batch(&self, count: i64) -> Result<Vec<Token>> {
        if count <= 0 {
            return Err(BallotError::validation(
                "Number of tokens must be greater than zero",
            ));
        }
        if count > i64::from(self.max_batch_size) {
            return Err(BallotError::validation(format!(
                "Number of tokens must not exceed {}",
                self.max_batch_size
            )));
        }

        let mut tx = self.pool.begin().await?;
        let mut tokens = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut token = Token::generate(0);
            token.serial_number = TokenRepository::insert_next(&mut *tx, &token).await?;
            tokens.push(token);
        }
        tx.commit().await?;

        info!(
            count,
            first_serial = tokens.first().map(|t| t.serial_number),
            last_serial = tokens.last().map(|t| t.serial_number),
            "Issued token batch"
        );
        Ok(tokens)
    }

    /// Whether the token exists
    pub async fn validate(&self, token: &str) -> Result<TokenStatus> {
        match TokenRepository::get(&self.pool, token).await? {
            Some(_) => Ok(TokenStatus::Valid),
            None => Ok(TokenStatus::NotFound),
        }
    }

    /// Whether the token exists and has not yet voted on `vote_id`
    pub async fn validate_for_item(&self, token: &str, vote_id: &str) -> Result<TokenStatus> {
        if TokenRepository::get(&self.pool, token).await?.is_none() {
            return Ok(TokenStatus::NotFound);
        }
        if VoteRecordRepository::exists(&self.pool, token, vote_id).await? {
            return Ok(TokenStatus::AlreadyUsed);
        }
        Ok(TokenStatus::Valid)
    }

    /// Delete tokens that never voted
    pub async fn delete_unused(&self) -> Result<u64> {
        let removed = TokenRepository::delete_unused(&self.pool).await?;
        info!(removed, "Deleted unused tokens");
        Ok(removed)
    }

    /// Delete every token; recorded votes stay
    pub async fn delete_all(&self) -> Result<u64> {
        let removed = TokenRepository::delete_all(&self.pool).await?;
        info!(removed, "Deleted all tokens");
        Ok(removed)
    }

    pub async fn counts(&self) -> Result<TokenCounts> {
        TokenCounts::load(&self.pool).await
    }

    /// All issued tokens ordered by serial
    pub async fn list(&self) -> Result<Vec<Token>> {
        Ok(TokenRepository::list(&self.pool).await?)
    }
}
