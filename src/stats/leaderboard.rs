use std::{
    collections::{BTreeSet, HashMap},
    str::FromStr,
};

use serde::Serialize;

use super::{aggregate::aggregate, range::RangeSpec, roster::Roster, scoring::score};
use crate::{
    error::StatsError,
    logs::{day::Day, model::DailyLogRecord},
    members::repo::Member,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Points,
    ExMins,
    Protein,
    CaloriesNet,
}

impl FromStr for SortKey {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "points" => Ok(SortKey::Points),
            "exMins" | "exerciseMinutes" => Ok(SortKey::ExMins),
            "protein" | "proteinGrams" => Ok(SortKey::Protein),
            "caloriesNet" => Ok(SortKey::CaloriesNet),
            other => Err(StatsError::invalid(format!("unknown sort key {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    /// 1-based position.
    pub rank: usize,
    pub member_id: String,
    pub display_name: String,
    pub total_points: u64,
    pub total_exercise_minutes: f64,
    pub total_protein: f64,
    pub total_calories_net: f64,
    pub active_day_count: usize,
}

impl LeaderboardRow {
    fn key(&self, sort: SortKey) -> f64 {
        match sort {
            SortKey::Points => self.total_points as f64,
            SortKey::ExMins => self.total_exercise_minutes,
            SortKey::Protein => self.total_protein,
            SortKey::CaloriesNet => self.total_calories_net,
        }
    }
}

/// Scores every record in `range` per day and ranks members by the summed
/// `sort` key, highest first; ties go to the smaller member id.
pub fn build_leaderboard(
    records: &[DailyLogRecord],
    members: &[Member],
    range: &RangeSpec,
    sort: SortKey,
    today: Day,
) -> Vec<LeaderboardRow> {
    let roster = Roster::new(members);
    let mut rows: Vec<LeaderboardRow> = Vec::new();
    let mut days: Vec<BTreeSet<Day>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for r in range.filter(records, today) {
        let i = *index.entry(r.member_id.as_str()).or_insert_with(|| {
            rows.push(LeaderboardRow {
                rank: 0,
                member_id: r.member_id.clone(),
                display_name: roster.name_of(&r.member_id),
                total_points: 0,
                total_exercise_minutes: 0.0,
                total_protein: 0.0,
                total_calories_net: 0.0,
                active_day_count: 0,
            });
            days.push(BTreeSet::new());
            rows.len() - 1
        });

        let s = score(&aggregate(r));
        let row = &mut rows[i];
        row.total_points = row.total_points.saturating_add(s.points);
        row.total_exercise_minutes += s.exercise_minutes;
        row.total_protein += s.protein_grams;
        row.total_calories_net += s.calories_net;
        days[i].insert(r.day);
    }

    for (row, seen) in rows.iter_mut().zip(&days) {
        row.active_day_count = seen.len();
    }

    rows.sort_by(|a, b| {
        b.key(sort)
            .total_cmp(&a.key(sort))
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::model::{ExerciseEntry, ExtrasEntry, MealEntry};
    use time::macros::datetime;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn empty(member: &str, d: &str) -> DailyLogRecord {
        DailyLogRecord::empty(member, day(d), datetime!(2025-08-13 07:00 UTC))
    }

    fn scenario_a(member: &str, d: &str) -> DailyLogRecord {
        let mut r = empty(member, d);
        r.meals.push(MealEntry {
            calories: 500.0,
            protein: 30.0,
            ..Default::default()
        });
        r.extras.push(ExtrasEntry {
            water: 600.0,
            steps: 1000.0,
            weight: None,
        });
        r
    }

    fn workout(member: &str, d: &str, minutes: f64, burned: f64) -> DailyLogRecord {
        let mut r = empty(member, d);
        r.exercises.push(ExerciseEntry {
            duration_minutes: minutes,
            calories_burned: burned,
            ..Default::default()
        });
        r
    }

    fn today() -> Day {
        day("2025-08-13")
    }

    #[test]
    fn scenario_d_active_member_ranks_first() {
        let records = vec![empty("b", "2025-08-13"), scenario_a("a", "2025-08-13")];
        let members = vec![Member::new("a", "Ana"), Member::new("b", "Bo")];
        let board = build_leaderboard(&records, &members, &RangeSpec::All, SortKey::Points, today());

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].member_id, "a");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].display_name, "Ana");
        assert_eq!(board[0].total_points, 9);
        assert_eq!(board[1].member_id, "b");
        assert_eq!(board[1].total_points, 0);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn sums_across_days_and_counts_distinct_days() {
        let records = vec![
            scenario_a("a", "2025-08-11"),
            scenario_a("a", "2025-08-12"),
            workout("a", "2025-08-12", 45.0, 400.0),
        ];
        let board = build_leaderboard(&records, &[], &RangeSpec::All, SortKey::Points, today());
        let row = &board[0];
        // 9 + 9 + (1 entry + 2 minutes bonus + 5 active)
        assert_eq!(row.total_points, 26);
        assert_eq!(row.total_exercise_minutes, 45.0);
        assert_eq!(row.total_protein, 60.0);
        assert_eq!(row.total_calories_net, 600.0);
        assert_eq!(row.active_day_count, 2);
        assert_eq!(row.display_name, "a");
    }

    #[test]
    fn range_drops_old_and_future_days() {
        let records = vec![
            scenario_a("a", "2025-07-01"),
            scenario_a("a", "2025-08-10"),
            scenario_a("a", "2025-08-20"),
        ];
        let board = build_leaderboard(&records, &[], &RangeSpec::LastDays(7), SortKey::Points, today());
        assert_eq!(board[0].total_points, 9);
        assert_eq!(board[0].active_day_count, 1);
    }

    #[test]
    fn sorts_by_requested_key_with_id_tiebreak() {
        let records = vec![
            scenario_a("c", "2025-08-13"),
            workout("b", "2025-08-13", 60.0, 700.0),
            workout("a", "2025-08-13", 60.0, 100.0),
        ];

        let by_minutes = build_leaderboard(&records, &[], &RangeSpec::All, SortKey::ExMins, today());
        let ids: Vec<_> = by_minutes.iter().map(|r| r.member_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let by_net = build_leaderboard(&records, &[], &RangeSpec::All, SortKey::CaloriesNet, today());
        let ids: Vec<_> = by_net.iter().map(|r| r.member_id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);

        let by_protein = build_leaderboard(&records, &[], &RangeSpec::All, SortKey::Protein, today());
        assert_eq!(by_protein[0].member_id, "c");
    }

    #[test]
    fn point_totals_saturate_across_days() {
        let mut records = Vec::new();
        for d in ["2025-08-11", "2025-08-12"] {
            let mut r = empty("a", d);
            r.extras.push(ExtrasEntry {
                water: 0.0,
                steps: 1e22,
                weight: None,
            });
            records.push(r);
        }
        let board = build_leaderboard(&records, &[], &RangeSpec::All, SortKey::Points, today());
        assert_eq!(board[0].total_points, u64::MAX);
        assert_eq!(board[0].active_day_count, 2);
    }

    #[test]
    fn no_records_no_rows() {
        let members = vec![Member::new("a", "Ana")];
        assert!(build_leaderboard(&[], &members, &RangeSpec::All, SortKey::Points, today()).is_empty());
    }

    #[test]
    fn parses_sort_keys() {
        assert_eq!("points".parse::<SortKey>(), Ok(SortKey::Points));
        assert_eq!("exMins".parse::<SortKey>(), Ok(SortKey::ExMins));
        assert_eq!("caloriesNet".parse::<SortKey>(), Ok(SortKey::CaloriesNet));
        assert!("streak".parse::<SortKey>().is_err());
    }
}
