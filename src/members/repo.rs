use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub display_name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Who belongs to a group. Joining (and its password gate) happens elsewhere;
/// this only records the member and their display name.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Members ordered by display name, then id.
    async fn list_members(&self, group_id: &str) -> anyhow::Result<Vec<Member>>;

    /// Adds the member or updates their display name.
    async fn upsert_member(&self, group_id: &str, member: &Member) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgMemberDirectory {
    db: PgPool,
}

impl PgMemberDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberDirectory for PgMemberDirectory {
    async fn list_members(&self, group_id: &str) -> anyhow::Result<Vec<Member>> {
        let rows = sqlx::query_as::<_, Member>(
            r#"
            SELECT member_id AS id, display_name
            FROM members
            WHERE group_id = $1
            ORDER BY display_name ASC, member_id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.db)
        .await
        .context("list members")?;
        Ok(rows)
    }

    async fn upsert_member(&self, group_id: &str, member: &Member) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO members (group_id, member_id, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id, member_id) DO UPDATE
            SET display_name = EXCLUDED.display_name
            "#,
        )
        .bind(group_id)
        .bind(&member.id)
        .bind(&member.display_name)
        .execute(&self.db)
        .await
        .context("upsert member")?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryMemberDirectory {
    groups: Mutex<HashMap<String, Vec<Member>>>,
}

impl MemoryMemberDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemberDirectory for MemoryMemberDirectory {
    async fn list_members(&self, group_id: &str) -> anyhow::Result<Vec<Member>> {
        let groups = self.groups.lock().await;
        let mut members = groups.get(group_id).cloned().unwrap_or_default();
        members.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(members)
    }

    async fn upsert_member(&self, group_id: &str, member: &Member) -> anyhow::Result<()> {
        let mut groups = self.groups.lock().await;
        let members = groups.entry(group_id.to_string()).or_default();
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => existing.display_name = member.display_name.clone(),
            None => members.push(member.clone()),
        }
        Ok(())
    }
}
