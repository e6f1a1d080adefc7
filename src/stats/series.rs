use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use super::{
    aggregate::{aggregate, DayTotals, Metric},
    range::RangeSpec,
    roster::Roster,
};
use crate::{
    logs::{day::Day, model::DailyLogRecord},
    members::repo::Member,
};

/// How many members are charted when the caller picks none.
pub const DEFAULT_SERIES_MEMBERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub member_id: String,
    pub label: String,
    /// Aligned with `Series::days`.
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub metric: Metric,
    pub days: Vec<Day>,
    pub datasets: Vec<Dataset>,
}

/// Per-member daily values of `metric` on a shared, ascending day axis.
///
/// The axis is every day that has any record in range, whoever logged it;
/// days a member skipped read as 0 so every dataset has the same length.
/// With no `selected` ids the first [`DEFAULT_SERIES_MEMBERS`] of `members`
/// are charted; repeated ids are charted once.
pub fn build_series(
    records: &[DailyLogRecord],
    members: &[Member],
    selected: &[String],
    metric: Metric,
    range: &RangeSpec,
    today: Day,
) -> Series {
    let roster = Roster::new(members);
    let in_range: Vec<&DailyLogRecord> = range.filter(records, today).collect();

    let days: Vec<Day> = in_range
        .iter()
        .map(|r| r.day)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut per_day: HashMap<(&str, Day), DayTotals> = HashMap::new();
    for r in &in_range {
        per_day
            .entry((r.member_id.as_str(), r.day))
            .or_default()
            .absorb(&aggregate(r));
    }

    let chosen: Vec<&str> = if selected.is_empty() {
        members
            .iter()
            .take(DEFAULT_SERIES_MEMBERS)
            .map(|m| m.id.as_str())
            .collect()
    } else {
        let mut seen = HashSet::new();
        selected
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    };

    let datasets = chosen
        .into_iter()
        .map(|id| Dataset {
            member_id: id.to_string(),
            label: roster.name_of(id),
            data: days
                .iter()
                .map(|&d| per_day.get(&(id, d)).map_or(0.0, |t| t.metric(metric)))
                .collect(),
        })
        .collect();

    Series {
        metric,
        days,
        datasets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::model::{ExtrasEntry, MealEntry};
    use time::macros::datetime;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn record(member: &str, d: &str, calories: f64, weight: Option<f64>) -> DailyLogRecord {
        let mut r = DailyLogRecord::empty(member, day(d), datetime!(2025-08-13 07:00 UTC));
        r.meals.push(MealEntry {
            calories,
            ..Default::default()
        });
        r.extras.push(ExtrasEntry {
            water: 0.0,
            steps: 0.0,
            weight,
        });
        r
    }

    fn members() -> Vec<Member> {
        ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|id| Member::new(*id, id.to_uppercase()))
            .collect()
    }

    fn today() -> Day {
        day("2025-08-20")
    }

    #[test]
    fn uniform_zero_filled_axis() {
        let records = vec![
            record("a", "2025-08-12", 500.0, None),
            record("b", "2025-08-10", 300.0, None),
            record("a", "2025-08-13", 200.0, None),
        ];
        let selected = vec!["a".to_string(), "b".to_string()];
        let s = build_series(&records, &members(), &selected, Metric::IntakeCalories, &RangeSpec::All, today());

        assert_eq!(s.days, [day("2025-08-10"), day("2025-08-12"), day("2025-08-13")]);
        assert_eq!(s.datasets.len(), 2);
        for ds in &s.datasets {
            assert_eq!(ds.data.len(), s.days.len());
        }
        assert_eq!(s.datasets[0].label, "A");
        assert_eq!(s.datasets[0].data, [0.0, 500.0, 200.0]);
        assert_eq!(s.datasets[1].data, [300.0, 0.0, 0.0]);
    }

    #[test]
    fn default_selection_is_first_five_members() {
        let records = vec![record("f", "2025-08-12", 100.0, None)];
        let s = build_series(&records, &members(), &[], Metric::IntakeCalories, &RangeSpec::All, today());
        let ids: Vec<_> = s.datasets.iter().map(|d| d.member_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
        assert!(s.datasets.iter().all(|d| d.data == [0.0]));
    }

    #[test]
    fn repeated_selection_is_charted_once() {
        let records = vec![record("a", "2025-08-12", 100.0, None)];
        let selected = vec!["a".to_string(), "a".to_string(), "b".to_string()];
        let s = build_series(&records, &members(), &selected, Metric::IntakeCalories, &RangeSpec::All, today());
        let ids: Vec<_> = s.datasets.iter().map(|d| d.member_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn missing_weight_is_zero_not_gap() {
        let records = vec![
            record("a", "2025-08-12", 0.0, Some(80.0)),
            record("a", "2025-08-13", 0.0, None),
        ];
        let selected = vec!["a".to_string()];
        let s = build_series(&records, &members(), &selected, Metric::Weight, &RangeSpec::All, today());
        assert_eq!(s.datasets[0].data, [80.0, 0.0]);
    }

    #[test]
    fn unknown_selected_member_uses_raw_id() {
        let records = vec![record("ghost", "2025-08-12", 50.0, None)];
        let selected = vec!["ghost".to_string()];
        let s = build_series(&records, &[], &selected, Metric::IntakeCalories, &RangeSpec::All, today());
        assert_eq!(s.datasets[0].label, "ghost");
        assert_eq!(s.datasets[0].data, [50.0]);
    }

    #[test]
    fn range_narrows_the_axis() {
        let records = vec![
            record("a", "2025-08-01", 10.0, None),
            record("a", "2025-08-15", 20.0, None),
        ];
        let range = RangeSpec::LastDays(7);
        let s = build_series(&records, &members(), &["a".to_string()], Metric::IntakeCalories, &range, today());
        assert_eq!(s.days, [day("2025-08-15")]);
        assert_eq!(s.datasets[0].data, [20.0]);
    }

    #[test]
    fn empty_records_give_empty_axis() {
        let s = build_series(&[], &members(), &[], Metric::Steps, &RangeSpec::All, today());
        assert!(s.days.is_empty());
        assert_eq!(s.datasets.len(), DEFAULT_SERIES_MEMBERS);
        assert!(s.datasets.iter().all(|d| d.data.is_empty()));
    }
}
