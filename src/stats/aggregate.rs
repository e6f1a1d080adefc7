use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{error::StatsError, logs::model::DailyLogRecord};

/// Scalar totals for one member's day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
    pub meal_count: usize,
    pub exercise_count: usize,
    pub intake_calories: f64,
    pub protein_grams: f64,
    pub exercise_minutes: f64,
    pub exercise_calories: f64,
    pub water: f64,
    pub steps: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl DayTotals {
    /// Folds in totals from a later record of the same day: counters add up,
    /// a later weight observation wins.
    pub fn absorb(&mut self, later: &DayTotals) {
        self.meal_count += later.meal_count;
        self.exercise_count += later.exercise_count;
        self.intake_calories += later.intake_calories;
        self.protein_grams += later.protein_grams;
        self.exercise_minutes += later.exercise_minutes;
        self.exercise_calories += later.exercise_calories;
        self.water += later.water;
        self.steps += later.steps;
        if later.weight.is_some() {
            self.weight = later.weight;
        }
    }

    /// Value of `metric`; a missing weight reads as 0.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::IntakeCalories => self.intake_calories,
            Metric::ProteinGrams => self.protein_grams,
            Metric::ExerciseMinutes => self.exercise_minutes,
            Metric::ExerciseCalories => self.exercise_calories,
            Metric::Water => self.water,
            Metric::Steps => self.steps,
            Metric::Weight => self.weight.unwrap_or(0.0),
        }
    }
}

pub fn aggregate(record: &DailyLogRecord) -> DayTotals {
    let mut totals = DayTotals {
        meal_count: record.meals.len(),
        exercise_count: record.exercises.len(),
        ..Default::default()
    };
    for m in &record.meals {
        totals.intake_calories += m.calories;
        totals.protein_grams += m.protein;
    }
    for x in &record.exercises {
        totals.exercise_minutes += x.duration_minutes;
        totals.exercise_calories += x.calories_burned;
    }
    for e in &record.extras {
        totals.water += e.water;
        totals.steps += e.steps;
        if e.weight.is_some() {
            totals.weight = e.weight;
        }
    }
    totals
}

/// A chartable per-day quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    IntakeCalories,
    ProteinGrams,
    ExerciseMinutes,
    ExerciseCalories,
    Water,
    Steps,
    Weight,
}

impl FromStr for Metric {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "intakeCalories" | "calories" => Ok(Metric::IntakeCalories),
            "proteinGrams" | "protein" => Ok(Metric::ProteinGrams),
            "exerciseMinutes" | "exMinutes" => Ok(Metric::ExerciseMinutes),
            "exerciseCalories" | "exCalories" => Ok(Metric::ExerciseCalories),
            "water" => Ok(Metric::Water),
            "steps" => Ok(Metric::Steps),
            "weight" => Ok(Metric::Weight),
            other => Err(StatsError::invalid(format!("unknown metric {other:?}"))),
        }
    }
}
