use std::collections::HashMap;

use serde::Serialize;

use super::{aggregate::aggregate, aggregate::DayTotals, roster::Roster};
use crate::{
    logs::{day::Day, model::DailyLogRecord},
    members::repo::Member,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WeekMetric {
    Meals,
    IntakeCalories,
    ProteinGrams,
    ExerciseMinutes,
    ExerciseCalories,
    Water,
    Steps,
}

impl WeekMetric {
    pub const ALL: [WeekMetric; 7] = [
        WeekMetric::Meals,
        WeekMetric::IntakeCalories,
        WeekMetric::ProteinGrams,
        WeekMetric::ExerciseMinutes,
        WeekMetric::ExerciseCalories,
        WeekMetric::Water,
        WeekMetric::Steps,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeekMetric::Meals => "Meals Logged",
            WeekMetric::IntakeCalories => "Total Calories (intake)",
            WeekMetric::ProteinGrams => "Total Protein (g)",
            WeekMetric::ExerciseMinutes => "Exercise Minutes",
            WeekMetric::ExerciseCalories => "Exercise Calories",
            WeekMetric::Water => "Water (ml)",
            WeekMetric::Steps => "Steps",
        }
    }

    fn read(self, t: &DayTotals) -> f64 {
        match self {
            WeekMetric::Meals => t.meal_count as f64,
            WeekMetric::IntakeCalories => t.intake_calories,
            WeekMetric::ProteinGrams => t.protein_grams,
            WeekMetric::ExerciseMinutes => t.exercise_minutes,
            WeekMetric::ExerciseCalories => t.exercise_calories,
            WeekMetric::Water => t.water,
            WeekMetric::Steps => t.steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberColumn {
    pub member_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRow {
    pub metric: WeekMetric,
    pub label: &'static str,
    /// One value per column, same order as `WeekTable::columns`.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTable {
    pub week_start: Day,
    pub columns: Vec<MemberColumn>,
    pub rows: Vec<WeekRow>,
}

/// Metric × member totals from the Monday of `reference`'s week onward.
///
/// Columns appear in the order members are first met while scanning
/// `records`; members without records this week get no column. The upper
/// bound is open, so anything logged after `reference` is counted too.
pub fn build_week_table(records: &[DailyLogRecord], members: &[Member], reference: Day) -> WeekTable {
    let week_start = reference.week_start();
    let roster = Roster::new(members);

    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, DayTotals> = HashMap::new();
    for r in records.iter().filter(|r| r.day >= week_start) {
        let acc = totals.entry(r.member_id.as_str()).or_insert_with(|| {
            order.push(r.member_id.as_str());
            DayTotals::default()
        });
        acc.absorb(&aggregate(r));
    }

    let rows = WeekMetric::ALL
        .iter()
        .map(|&metric| WeekRow {
            metric,
            label: metric.label(),
            values: order
                .iter()
                .map(|id| totals.get(id).map_or(0.0, |t| metric.read(t)))
                .collect(),
        })
        .collect();

    let columns = order
        .iter()
        .map(|id| MemberColumn {
            member_id: id.to_string(),
            display_name: roster.name_of(id),
        })
        .collect();

    WeekTable {
        week_start,
        columns,
        rows,
    }
}
