use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::day::Day;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, rename = "type", deserialize_with = "lenient::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub calories: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub protein: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub fat: f64,
}

/// Accepts the short keys `duration`, `calories` and `hr` too; when both
/// spellings are sent the long one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawExerciseEntry")]
pub struct ExerciseEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub distance: f64,
    pub steps: f64,
    pub heart_rate: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExerciseEntry {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<Value>,
    #[serde(default)]
    time: Option<Value>,
    #[serde(default)]
    duration_minutes: Option<Value>,
    #[serde(default)]
    duration: Option<Value>,
    #[serde(default)]
    calories_burned: Option<Value>,
    #[serde(default)]
    calories: Option<Value>,
    #[serde(default)]
    distance: Option<Value>,
    #[serde(default)]
    steps: Option<Value>,
    #[serde(default)]
    heart_rate: Option<Value>,
    #[serde(default)]
    hr: Option<Value>,
}

impl From<RawExerciseEntry> for ExerciseEntry {
    fn from(raw: RawExerciseEntry) -> Self {
        let amount = |long: Option<Value>, short: Option<Value>| {
            long.or(short).as_ref().map_or(0.0, lenient::number)
        };
        Self {
            id: lenient::text_of(raw.id),
            kind: lenient::text_of(raw.kind),
            time: lenient::text_of(raw.time),
            duration_minutes: amount(raw.duration_minutes, raw.duration),
            calories_burned: amount(raw.calories_burned, raw.calories),
            distance: amount(raw.distance, None),
            steps: amount(raw.steps, None),
            heart_rate: amount(raw.heart_rate, raw.hr),
        }
    }
}

/// Hydration / step counter check-in. A day may hold many.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasEntry {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub water: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub steps: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::observation"
    )]
    pub weight: Option<f64>,
}

/// Everything one member logged on one day. At most one per `(member, day)`.
///
/// Per-field merge policy for a day's records:
/// - entry lists (`meals`, `exercises`, `extras`) are append-only;
/// - numeric counters (calories, protein, minutes, water, steps) are summed;
/// - `weight` keeps the last non-null observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogRecord {
    pub member_id: String,
    pub day: Day,
    #[serde(default)]
    pub meals: Vec<MealEntry>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default)]
    pub extras: Vec<ExtrasEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

impl DailyLogRecord {
    pub fn empty(member_id: impl Into<String>, day: Day, now: OffsetDateTime) -> Self {
        Self {
            member_id: member_id.into(),
            day,
            meals: Vec::new(),
            exercises: Vec::new(),
            extras: Vec::new(),
            last_modified: now,
        }
    }
}

/// New entries submitted for one `(member, day)`; any list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPatch {
    #[serde(default)]
    pub meals: Vec<MealEntry>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default)]
    pub extras: Vec<ExtrasEntry>,
}

impl LogPatch {
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty() && self.exercises.is_empty() && self.extras.is_empty()
    }

    /// Gives every meal and exercise without an id a fresh one.
    pub fn assign_missing_ids(&mut self) {
        let ids = self
            .meals
            .iter_mut()
            .map(|m| &mut m.id)
            .chain(self.exercises.iter_mut().map(|x| &mut x.id));
        for id in ids.filter(|id| id.trim().is_empty()) {
            *id = Uuid::new_v4().simple().to_string();
        }
    }
}

/// Coercion used at the deserialization boundary: malformed input never fails,
/// it degrades to zero / empty.
pub(crate) mod lenient {
    use super::*;

    pub(crate) fn number(value: &Value) -> f64 {
        let n = match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        if n.is_finite() && n > 0.0 {
            n
        } else {
            0.0
        }
    }

    pub(crate) fn amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(number(&Value::deserialize(d)?))
    }

    pub(crate) fn observation<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let n = number(&Value::deserialize(d)?);
        Ok((n > 0.0).then_some(n))
    }

    pub(crate) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text_of(Some(Value::deserialize(d)?)))
    }

    pub(crate) fn text_of(value: Option<Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        }
    }
}
