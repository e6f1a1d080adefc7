use std::collections::BTreeMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    day::Day,
    merge::merge,
    model::{DailyLogRecord, ExerciseEntry, ExtrasEntry, LogPatch, MealEntry},
};

/// Read/write access to a group's daily log records.
///
/// `append` is the only write path used by the service; it must serialize
/// read-merge-write per `(group, member, day)`.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// All records of the group, ordered by day then member id.
    async fn list_records(&self, group_id: &str) -> anyhow::Result<Vec<DailyLogRecord>>;

    async fn get_record(
        &self,
        group_id: &str,
        member_id: &str,
        day: Day,
    ) -> anyhow::Result<Option<DailyLogRecord>>;

    /// Stores `record` as-is, replacing whatever was there.
    async fn put_record(&self, group_id: &str, record: &DailyLogRecord) -> anyhow::Result<()>;

    async fn append(
        &self,
        group_id: &str,
        member_id: &str,
        day: Day,
        patch: LogPatch,
        now: OffsetDateTime,
    ) -> anyhow::Result<DailyLogRecord>;
}

// --- postgres ---

#[derive(Debug, FromRow)]
struct DailyLogRow {
    member_id: String,
    day: Date,
    meals: Json<Vec<MealEntry>>,
    exercises: Json<Vec<ExerciseEntry>>,
    extras: Json<Vec<ExtrasEntry>>,
    last_modified: OffsetDateTime,
}

impl From<DailyLogRow> for DailyLogRecord {
    fn from(r: DailyLogRow) -> Self {
        Self {
            member_id: r.member_id,
            day: Day::new(r.day),
            meals: r.meals.0,
            exercises: r.exercises.0,
            extras: r.extras.0,
            last_modified: r.last_modified,
        }
    }
}

#[derive(Clone)]
pub struct PgLogStore {
    db: PgPool,
}

impl PgLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn list_records(&self, group_id: &str) -> anyhow::Result<Vec<DailyLogRecord>> {
        let rows = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT member_id, day, meals, exercises, extras, last_modified
            FROM daily_logs
            WHERE group_id = $1
            ORDER BY day ASC, member_id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.db)
        .await
        .context("list daily logs")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_record(
        &self,
        group_id: &str,
        member_id: &str,
        day: Day,
    ) -> anyhow::Result<Option<DailyLogRecord>> {
        let row = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT member_id, day, meals, exercises, extras, last_modified
            FROM daily_logs
            WHERE group_id = $1 AND member_id = $2 AND day = $3
            "#,
        )
        .bind(group_id)
        .bind(member_id)
        .bind(day.date())
        .fetch_optional(&self.db)
        .await
        .context("get daily log")?;
        Ok(row.map(Into::into))
    }

    async fn put_record(&self, group_id: &str, record: &DailyLogRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_logs (group_id, member_id, day, meals, exercises, extras, last_modified)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (group_id, member_id, day) DO UPDATE
            SET meals = EXCLUDED.meals,
                exercises = EXCLUDED.exercises,
                extras = EXCLUDED.extras,
                last_modified = EXCLUDED.last_modified
            "#,
        )
        .bind(group_id)
        .bind(&record.member_id)
        .bind(record.day.date())
        .bind(Json(&record.meals))
        .bind(Json(&record.exercises))
        .bind(Json(&record.extras))
        .bind(record.last_modified)
        .execute(&self.db)
        .await
        .context("put daily log")?;
        Ok(())
    }

    async fn append(
        &self,
        group_id: &str,
        member_id: &str,
        day: Day,
        patch: LogPatch,
        now: OffsetDateTime,
    ) -> anyhow::Result<DailyLogRecord> {
        let mut tx = self.db.begin().await.context("begin append")?;

        // make sure there is a row to lock
        sqlx::query(
            r#"
            INSERT INTO daily_logs (group_id, member_id, day, last_modified)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (group_id, member_id, day) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(member_id)
        .bind(day.date())
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("seed daily log")?;

        let current: DailyLogRecord = sqlx::query_as::<_, DailyLogRow>(
            r#"
            SELECT member_id, day, meals, exercises, extras, last_modified
            FROM daily_logs
            WHERE group_id = $1 AND member_id = $2 AND day = $3
            FOR UPDATE
            "#,
        )
        .bind(group_id)
        .bind(member_id)
        .bind(day.date())
        .fetch_one(&mut *tx)
        .await
        .context("lock daily log")?
        .into();

        let merged = merge(current, patch, now);

        sqlx::query(
            r#"
            UPDATE daily_logs
            SET meals = $4, exercises = $5, extras = $6, last_modified = $7
            WHERE group_id = $1 AND member_id = $2 AND day = $3
            "#,
        )
        .bind(group_id)
        .bind(member_id)
        .bind(day.date())
        .bind(Json(&merged.meals))
        .bind(Json(&merged.exercises))
        .bind(Json(&merged.extras))
        .bind(merged.last_modified)
        .execute(&mut *tx)
        .await
        .context("update daily log")?;

        tx.commit().await.context("commit append")?;

        debug!(
            %group_id, %member_id, %day,
            meals = merged.meals.len(),
            exercises = merged.exercises.len(),
            extras = merged.extras.len(),
            "daily log appended"
        );
        Ok(merged)
    }
}

// --- in-memory ---

type RecordKey = (String, Day, String);

/// Process-local store. One mutex guards every key, which trivially
/// serializes appends.
#[derive(Default)]
pub struct MemoryLogStore {
    records: Mutex<BTreeMap<RecordKey, DailyLogRecord>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(group_id: &str, member_id: &str, day: Day) -> RecordKey {
        (group_id.to_string(), day, member_id.to_string())
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn list_records(&self, group_id: &str) -> anyhow::Result<Vec<DailyLogRecord>> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|((g, _, _), _)| g == group_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn get_record(
        &self,
        group_id: &str,
        member_id: &str,
        day: Day,
    ) -> anyhow::Result<Option<DailyLogRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(&Self::key(group_id, member_id, day)).cloned())
    }

    async fn put_record(&self, group_id: &str, record: &DailyLogRecord) -> anyhow::Result<()> {
        let mut records = self.records.lock().await;
        records.insert(
            Self::key(group_id, &record.member_id, record.day),
            record.clone(),
        );
        Ok(())
    }

    async fn append(
        &self,
        group_id: &str,
        member_id: &str,
        day: Day,
        patch: LogPatch,
        now: OffsetDateTime,
    ) -> anyhow::Result<DailyLogRecord> {
        let mut records = self.records.lock().await;
        let key = Self::key(group_id, member_id, day);
        let current = records
            .remove(&key)
            .unwrap_or_else(|| DailyLogRecord::empty(member_id, day, now));
        let merged = merge(current, patch, now);
        records.insert(key, merged.clone());
        debug!(
            %group_id, %member_id, %day,
            meals = merged.meals.len(),
            exercises = merged.exercises.len(),
            extras = merged.extras.len(),
            "daily log appended"
        );
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use time::macros::datetime;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn one_meal(id: &str) -> LogPatch {
        LogPatch {
            meals: vec![MealEntry {
                id: id.into(),
                calories: 100.0,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn append_creates_then_extends() {
        let store = MemoryLogStore::new();
        let now = datetime!(2025-08-13 10:00 UTC);
        store.append("crew", "ana", day("2025-08-13"), one_meal("m1"), now).await.unwrap();
        let patch = LogPatch {
            exercises: vec![ExerciseEntry {
                id: "x1".into(),
                duration_minutes: 30.0,
                ..Default::default()
            }],
            ..Default::default()
        };
        let record = store.append("crew", "ana", day("2025-08-13"), patch, now).await.unwrap();
        assert_eq!(record.meals.len(), 1);
        assert_eq!(record.exercises.len(), 1);

        let stored = store.get_record("crew", "ana", day("2025-08-13")).await.unwrap();
        assert_eq!(stored, Some(record));
    }

    #[tokio::test]
    async fn concurrent_appends_are_not_lost() {
        let store = Arc::new(MemoryLogStore::new());
        let now = datetime!(2025-08-13 10:00 UTC);
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append("crew", "ana", day("2025-08-13"), one_meal(&format!("m{i}")), now)
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        let record = store.get_record("crew", "ana", day("2025-08-13")).await.unwrap().unwrap();
        assert_eq!(record.meals.len(), 20);
    }

    #[tokio::test]
    async fn list_is_scoped_and_ordered() {
        let store = MemoryLogStore::new();
        let now = datetime!(2025-08-13 10:00 UTC);
        store.append("crew", "zoe", day("2025-08-12"), one_meal("a"), now).await.unwrap();
        store.append("crew", "ana", day("2025-08-13"), one_meal("b"), now).await.unwrap();
        store.append("crew", "ana", day("2025-08-12"), one_meal("c"), now).await.unwrap();
        store.append("other", "ana", day("2025-08-12"), one_meal("d"), now).await.unwrap();

        let listed = store.list_records("crew").await.unwrap();
        let keys: Vec<_> = listed
            .iter()
            .map(|r| (r.day.to_string(), r.member_id.as_str()))
            .collect();
        assert_eq!(
            keys,
            [
                ("2025-08-12".to_string(), "ana"),
                ("2025-08-12".to_string(), "zoe"),
                ("2025-08-13".to_string(), "ana"),
            ]
        );
        assert!(store.list_records("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn put_replaces_record() {
        let store = MemoryLogStore::new();
        let now = datetime!(2025-08-13 10:00 UTC);
        store.append("crew", "ana", day("2025-08-13"), one_meal("m1"), now).await.unwrap();
        let blank = DailyLogRecord::empty("ana", day("2025-08-13"), now);
        store.put_record("crew", &blank).await.unwrap();
        let stored = store.get_record("crew", "ana", day("2025-08-13")).await.unwrap();
        assert_eq!(stored, Some(blank));
    }
}
