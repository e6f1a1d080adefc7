pub mod day;
mod dto;
pub mod handlers;
pub mod merge;
pub mod model;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub use dto::DayView;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
