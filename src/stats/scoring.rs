use serde::{Deserialize, Serialize};

use super::aggregate::DayTotals;

const STEPS_PER_POINT: f64 = 500.0;
const WATER_PER_POINT: f64 = 500.0;
const PROTEIN_BONUS_GRAMS: f64 = 100.0;
const EXERCISE_BONUS_MINUTES: f64 = 30.0;
const GOAL_BONUS: u64 = 2;
const ACTIVE_DAY_BONUS: u64 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub points: u64,
    pub exercise_minutes: f64,
    pub protein_grams: f64,
    pub calories_net: f64,
}

/// Points for a single day:
/// one per meal and per exercise, one per 500 steps and per 500 ml water,
/// +2 for reaching 100 g protein, +2 for 30 exercise minutes, and +5 once
/// if anything at all was logged.
pub fn score(totals: &DayTotals) -> ScoreResult {
    // float -> int casts saturate; keep the sum saturating too
    let mut points = (totals.meal_count as u64)
        .saturating_add(totals.exercise_count as u64)
        .saturating_add((totals.steps / STEPS_PER_POINT).floor() as u64)
        .saturating_add((totals.water / WATER_PER_POINT).floor() as u64);

    if totals.protein_grams >= PROTEIN_BONUS_GRAMS {
        points = points.saturating_add(GOAL_BONUS);
    }
    if totals.exercise_minutes >= EXERCISE_BONUS_MINUTES {
        points = points.saturating_add(GOAL_BONUS);
    }
    if is_active(totals) {
        points = points.saturating_add(ACTIVE_DAY_BONUS);
    }

    ScoreResult {
        points,
        exercise_minutes: totals.exercise_minutes,
        protein_grams: totals.protein_grams,
        calories_net: totals.intake_calories - totals.exercise_calories,
    }
}

pub fn is_active(totals: &DayTotals) -> bool {
    totals.meal_count > 0 || totals.exercise_count > 0 || totals.steps > 0.0 || totals.water > 0.0
}
