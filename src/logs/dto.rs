use serde::Serialize;

use super::model::DailyLogRecord;
use crate::stats::{
    aggregate::{aggregate, DayTotals},
    scoring::{score, ScoreResult},
};

/// One member's day with its totals and points.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub record: DailyLogRecord,
    pub totals: DayTotals,
    pub score: ScoreResult,
}

impl From<DailyLogRecord> for DayView {
    fn from(record: DailyLogRecord) -> Self {
        let totals = aggregate(&record);
        let score = score(&totals);
        Self {
            record,
            totals,
            score,
        }
    }
}
