use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::AppError, logs::day::Day};

pub(crate) fn is_valid_group_id(id: &str) -> bool {
    lazy_static! {
        static ref GROUP_ID_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").unwrap();
    }
    GROUP_ID_RE.is_match(id)
}

/// Group codes are case-insensitive; they are stored lowercase.
pub(crate) fn group_id(raw: &str) -> Result<String, AppError> {
    let id = raw.trim().to_lowercase();
    if !is_valid_group_id(&id) {
        return Err(AppError::BadRequest(format!("invalid group id {raw:?}")));
    }
    Ok(id)
}

pub(crate) fn day(raw: &str) -> Result<Day, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid day {raw:?}; expected YYYY-MM-DD")))
}

pub(crate) fn optional_day(raw: Option<&str>) -> Result<Option<Day>, AppError> {
    raw.filter(|s| !s.trim().is_empty()).map(day).transpose()
}
