//! Aggregation and scoring over daily log snapshots.
//!
//! Everything here is pure: builders take an immutable slice of records plus
//! explicit parameters and recompute their view on every call.

pub mod aggregate;
mod dto;
pub mod handlers;
pub mod leaderboard;
pub mod range;
mod roster;
pub mod scoring;
pub mod series;
pub mod week;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
