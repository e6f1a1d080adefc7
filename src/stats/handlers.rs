use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::{
    aggregate::Metric,
    dto::{LeaderboardQuery, SeriesQuery, WeekQuery},
    leaderboard::{build_leaderboard, LeaderboardRow, SortKey},
    series::{build_series, Series},
    week::{build_week_table, WeekTable},
};
use crate::{error::AppError, logs::day::Day, params, state::AppState};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/groups/:group_id/summary/week", get(week_summary))
        .route("/groups/:group_id/series", get(series))
        .route("/groups/:group_id/leaderboard", get(leaderboard))
}

#[instrument(skip(state))]
pub async fn week_summary(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(q): Query<WeekQuery>,
) -> Result<Json<WeekTable>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let reference = params::optional_day(q.date.as_deref())?.unwrap_or_else(Day::today_utc);

    let records = state.logs.list_records(&group_id).await?;
    let members = state.members.list_members(&group_id).await?;
    let table = build_week_table(&records, &members, reference);
    debug!(%group_id, week_start = %table.week_start, columns = table.columns.len(), "week table built");
    Ok(Json(table))
}

#[instrument(skip(state))]
pub async fn series(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(q): Query<SeriesQuery>,
) -> Result<Json<Series>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let metric: Metric = q.metric.parse()?;
    let range = q.range()?;

    let records = state.logs.list_records(&group_id).await?;
    let members = state.members.list_members(&group_id).await?;
    let series = build_series(
        &records,
        &members,
        &q.selected(),
        metric,
        &range,
        Day::today_utc(),
    );
    debug!(%group_id, ?metric, days = series.days.len(), datasets = series.datasets.len(), "series built");
    Ok(Json(series))
}

#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(q): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardRow>>, AppError> {
    let group_id = params::group_id(&group_id)?;
    let sort: SortKey = q.sort.parse()?;
    let range = q.range()?;

    let records = state.logs.list_records(&group_id).await?;
    let members = state.members.list_members(&group_id).await?;
    let rows = build_leaderboard(&records, &members, &range, sort, Day::today_utc());
    debug!(%group_id, ?range, ?sort, rows = rows.len(), "leaderboard built");
    Ok(Json(rows))
}
