use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{dto::DayView, model::{DailyLogRecord, LogPatch}};
use crate::{auth::AuthMember, error::AppError, params, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/groups/:group_id/logs/:day", get(get_day).post(append_day))
}

/// The caller's record for `day`, or an empty one if nothing was logged yet.
#[instrument(skip(state))]
pub async fn get_day(
    State(state): State<AppState>,
    AuthMember(member_id): AuthMember,
    Path((group_id, day)): Path<(String, String)>,
) -> Result<Json<DayView>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let day = params::day(&day)?;

    let record = state
        .logs
        .get_record(&group_id, &member_id, day)
        .await?
        .unwrap_or_else(|| DailyLogRecord::empty(member_id.as_str(), day, OffsetDateTime::now_utc()));
    Ok(Json(record.into()))
}

/// Appends meals / exercises / extras to the caller's record for `day`.
/// An empty patch only refreshes `lastModified`.
#[instrument(skip(state, patch))]
pub async fn append_day(
    State(state): State<AppState>,
    AuthMember(member_id): AuthMember,
    Path((group_id, day)): Path<(String, String)>,
    Json(mut patch): Json<LogPatch>,
) -> Result<Json<DayView>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let day = params::day(&day)?;

    patch.assign_missing_ids();
    let (meals, exercises, extras) = (patch.meals.len(), patch.exercises.len(), patch.extras.len());

    let record = state
        .logs
        .append(&group_id, &member_id, day, patch, OffsetDateTime::now_utc())
        .await?;

    info!(%group_id, %member_id, %day, meals, exercises, extras, "activity logged");
    Ok(Json(record.into()))
}
