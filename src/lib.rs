//! FitPals: shared group fitness logs with weekly summaries, charts and a
//! points leaderboard.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod logs;
pub mod members;
mod params;
pub mod stats;
pub mod state;
