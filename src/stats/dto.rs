use serde::Deserialize;

use super::range::RangeSpec;
use crate::{error::AppError, params};

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Reference day; defaults to today (UTC).
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub metric: String,
    /// Comma-separated member ids.
    pub members: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl SeriesQuery {
    pub fn selected(&self) -> Vec<String> {
        self.members
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn range(&self) -> Result<RangeSpec, AppError> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(RangeSpec::All);
        }
        absolute(self.from.as_deref(), self.to.as_deref())
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_range")]
    pub range: String,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default = "default_sort")]
    pub sort: String,
}
fn default_range() -> String {
    "7".into()
}
fn default_sort() -> String {
    "points".into()
}

impl LeaderboardQuery {
    /// An explicit `from`/`to` wins over the relative `range`.
    pub fn range(&self) -> Result<RangeSpec, AppError> {
        if self.from.is_some() || self.to.is_some() {
            return absolute(self.from.as_deref(), self.to.as_deref());
        }
        Ok(self.range.parse::<RangeSpec>()?)
    }
}

fn absolute(from: Option<&str>, to: Option<&str>) -> Result<RangeSpec, AppError> {
    let from = params::optional_day(from)?;
    let to = params::optional_day(to)?;
    Ok(RangeSpec::between(from, to)?)
}
