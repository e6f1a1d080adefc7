use std::str::FromStr;

use crate::{
    error::StatsError,
    logs::{day::Day, model::DailyLogRecord},
};

/// Which days take part in a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    All,
    /// Today and the `n` days before it; future days are excluded.
    LastDays(u32),
    /// Inclusive on both ends; `None` leaves that side open.
    Between { from: Option<Day>, to: Option<Day> },
}

impl RangeSpec {
    pub fn between(from: Option<Day>, to: Option<Day>) -> Result<Self, StatsError> {
        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(StatsError::invalid(format!("range start {f} is after end {t}")));
            }
        }
        Ok(Self::Between { from, to })
    }

    pub fn contains(&self, day: Day, today: Day) -> bool {
        match *self {
            RangeSpec::All => true,
            RangeSpec::LastDays(n) => {
                let age = day.days_until(today);
                (0..=i64::from(n)).contains(&age)
            }
            RangeSpec::Between { from, to } => {
                from.map_or(true, |f| day >= f) && to.map_or(true, |t| day <= t)
            }
        }
    }

    pub fn filter<'a>(
        &'a self,
        records: &'a [DailyLogRecord],
        today: Day,
    ) -> impl Iterator<Item = &'a DailyLogRecord> + 'a {
        records.iter().filter(move |r| self.contains(r.day, today))
    }
}

/// Parses the relative form: `all` or a day count.
impl FromStr for RangeSpec {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(RangeSpec::All);
        }
        s.parse::<u32>()
            .map(RangeSpec::LastDays)
            .map_err(|_| StatsError::invalid(format!("unknown range {s:?}; expected \"all\" or a day count")))
    }
}
