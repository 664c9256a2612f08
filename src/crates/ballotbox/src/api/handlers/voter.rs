//! Voter-facing handlers
//!
//! Both routes sit behind the network guard. The token is the only
//! credential; every failure to resolve it is answered with 403.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Form,
};

use crate::api::{
    error::ApiResult,
    models::{BallotAgenda, BallotEntry, BallotView, SubmitVoteForm, VoteQuery},
    response,
    routes::AppState,
};
use crate::services::TokenStatus;
use crate::BallotError;

/// Active ballot for a token
///
/// GET /vote?token=
pub async fn ballot(
    State(app_state): State<AppState>,
    Query(query): Query<VoteQuery>,
) -> ApiResult<impl IntoResponse> {
    let token = query
        .token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(BallotError::InvalidToken)?;

    if app_state.tokens.validate(&token).await? != TokenStatus::Valid {
        tracing::warn!("Ballot requested with unknown token");
        return Err(BallotError::InvalidToken.into());
    }

    let mut agendas = Vec::new();
    for group in app_state.catalog.list_active_items().await? {
        let mut items = Vec::with_capacity(group.items.len());
        for item in group.items {
            let status = app_state
                .tokens
                .validate_for_item(&token, &item.vote_id)
                .await?;
            items.push(BallotEntry {
                options: item.option_labels(),
                vote_id: item.vote_id,
                title: item.title,
                already_voted: status == TokenStatus::AlreadyUsed,
            });
        }
        agendas.push(BallotAgenda {
            agenda_id: group.agenda.agenda_id,
            title: group.agenda.title,
            items,
        });
    }

    let meeting_title = app_state.settings.meeting_title().await?;
    Ok(response::ok(BallotView {
        meeting_title,
        token,
        agendas,
    }))
}

/// Record the choices of one ballot
///
/// POST /submit_vote
pub async fn submit_vote(
    State(app_state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> ApiResult<impl IntoResponse> {
    let form = SubmitVoteForm::from_fields(fields);
    let token = form.token.ok_or(BallotError::InvalidToken)?;

    let report = app_state.submissions.submit(&token, &form.choices).await?;
    Ok(response::ok(report))
}
