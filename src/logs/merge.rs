use time::OffsetDateTime;

use super::model::{DailyLogRecord, LogPatch};

/// Appends the patch's entries after the existing ones, in submission order,
/// and stamps the record with `now`. Nothing already recorded is replaced.
///
/// Callers must hold the store's per-`(member, day)` lock (or transaction) for
/// the whole read-merge-write, otherwise a concurrent append can be lost.
pub fn merge(mut base: DailyLogRecord, patch: LogPatch, now: OffsetDateTime) -> DailyLogRecord {
    let LogPatch {
        meals,
        exercises,
        extras,
    } = patch;
    base.meals.extend(meals);
    base.exercises.extend(exercises);
    base.extras.extend(extras);
    base.last_modified = now;
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::model::{ExerciseEntry, ExtrasEntry, MealEntry};
    use crate::stats::aggregate::aggregate;
    use time::macros::datetime;

    fn empty() -> DailyLogRecord {
        DailyLogRecord::empty("ana", "2025-08-13".parse().unwrap(), datetime!(2025-08-13 07:00 UTC))
    }

    fn meal(id: &str, calories: f64, protein: f64) -> MealEntry {
        MealEntry {
            id: id.into(),
            calories,
            protein,
            ..Default::default()
        }
    }

    fn exercise(id: &str, minutes: f64, burned: f64) -> ExerciseEntry {
        ExerciseEntry {
            id: id.into(),
            duration_minutes: minutes,
            calories_burned: burned,
            ..Default::default()
        }
    }

    fn extras(water: f64, steps: f64) -> ExtrasEntry {
        ExtrasEntry {
            water,
            steps,
            weight: None,
        }
    }

    #[test]
    fn meal_then_exercise_keeps_both() {
        let first = LogPatch {
            meals: vec![meal("m1", 500.0, 30.0)],
            ..Default::default()
        };
        let second = LogPatch {
            exercises: vec![exercise("x1", 40.0, 320.0)],
            ..Default::default()
        };

        let t1 = datetime!(2025-08-13 08:00 UTC);
        let t2 = datetime!(2025-08-13 18:30 UTC);
        let record = merge(merge(empty(), first, t1), second, t2);

        assert_eq!(record.meals.len(), 1);
        assert_eq!(record.exercises.len(), 1);
        assert_eq!(record.meals[0].id, "m1");
        assert_eq!(record.exercises[0].id, "x1");
        assert_eq!(record.last_modified, t2);
    }

    #[test]
    fn appends_in_submission_order() {
        let t = datetime!(2025-08-13 09:00 UTC);
        let a = LogPatch {
            meals: vec![meal("a", 1.0, 0.0), meal("b", 2.0, 0.0)],
            ..Default::default()
        };
        let b = LogPatch {
            meals: vec![meal("c", 3.0, 0.0)],
            ..Default::default()
        };
        let record = merge(merge(empty(), a, t), b, t);
        let ids: Vec<_> = record.meals.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn empty_patch_only_touches_timestamp() {
        let t = datetime!(2025-08-14 00:00 UTC);
        let record = merge(empty(), LogPatch::default(), t);
        assert!(record.meals.is_empty() && record.exercises.is_empty() && record.extras.is_empty());
        assert_eq!(record.last_modified, t);
    }

    #[test]
    fn totals_do_not_depend_on_patch_order() {
        let t = datetime!(2025-08-13 12:00 UTC);
        let p1 = LogPatch {
            meals: vec![meal("m1", 700.0, 45.0)],
            extras: vec![extras(500.0, 3000.0)],
            ..Default::default()
        };
        let p2 = LogPatch {
            meals: vec![meal("m2", 300.0, 60.0)],
            exercises: vec![exercise("x1", 25.0, 200.0)],
            extras: vec![extras(750.0, 4200.0)],
        };

        let forward = aggregate(&merge(merge(empty(), p1.clone(), t), p2.clone(), t));
        let backward = aggregate(&merge(merge(empty(), p2.clone(), t), p1.clone(), t));
        assert_eq!(forward, backward);

        let only1 = aggregate(&merge(empty(), p1, t));
        let only2 = aggregate(&merge(empty(), p2, t));
        assert_eq!(forward.intake_calories, only1.intake_calories + only2.intake_calories);
        assert_eq!(forward.protein_grams, only1.protein_grams + only2.protein_grams);
        assert_eq!(forward.exercise_minutes, only1.exercise_minutes + only2.exercise_minutes);
        assert_eq!(forward.water, only1.water + only2.water);
        assert_eq!(forward.steps, only1.steps + only2.steps);
    }
}
