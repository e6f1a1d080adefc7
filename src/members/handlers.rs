use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::SetDisplayNameRequest,
    repo::Member,
};
use crate::{auth::AuthMember, error::AppError, params, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/:group_id/members", get(list_members))
        .route("/groups/:group_id/members/me", put(set_display_name))
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Member>>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let members = state.members.list_members(&group_id).await?;
    Ok(Json(members))
}

/// Registers the caller in the group (if needed) under the given display name.
#[instrument(skip(state))]
pub async fn set_display_name(
    State(state): State<AppState>,
    AuthMember(member_id): AuthMember,
    Path(group_id): Path<String>,
    Json(body): Json<SetDisplayNameRequest>,
) -> Result<Json<Member>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let member = Member::new(member_id, body.display_name());
    state.members.upsert_member(&group_id, &member).await?;
    info!(%group_id, member_id = %member.id, display_name = %member.display_name, "member updated");
    Ok(Json(member))
}
