//! Scan schedule expressions: `daily`/`day` or five cron fields
//! `minute hour day month weekday`.
//!
//! Weekdays count from Monday (`0 = mon` .. `6 = sun`), names are accepted
//! for weekdays and months. All five fields must match for a minute to
//! fire, including day and weekday.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use gogshelf_core::config::ScheduleConfig;
use gogshelf_core::constants::DEFAULT_DAILY_HOUR;
use gogshelf_core::errors::ScheduleError;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// How far ahead `next_after` searches before giving up (impossible
/// combinations such as Feb 30).
const HORIZON_YEARS: i32 = 5;

/// Allowed values of one cron field as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CronField {
    bits: u64,
}

impl CronField {
    fn every(min: u32, max: u32) -> Self {
        let mut field = Self { bits: 0 };
        for v in min..=max {
            field.bits |= 1 << v;
        }
        field
    }

    fn only(value: u32) -> Self {
        Self { bits: 1 << value }
    }

    pub fn contains(&self, value: u32) -> bool {
        value < 64 && self.bits & (1 << value) != 0
    }

    /// Smallest allowed value `>= from`.
    fn first_from(&self, from: u32) -> Option<u32> {
        (from..64).find(|v| self.contains(*v))
    }

    fn parse(
        field: &'static str,
        text: &str,
        min: u32,
        max: u32,
        names: &[&str],
    ) -> Result<Self, ScheduleError> {
        let invalid = |reason: String| ScheduleError::InvalidField {
            field,
            value: text.to_string(),
            reason,
        };

        let mut bits = 0u64;
        for item in text.split(',') {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => {
                    let step: u32 = step
                        .parse()
                        .map_err(|_| invalid(format!("bad step '{step}'")))?;
                    if step == 0 {
                        return Err(invalid("step must be at least 1".to_string()));
                    }
                    (range, Some(step))
                }
                None => (item, None),
            };

            let (lo, hi) = if range == "*" {
                (min, max)
            } else if let Some((a, b)) = range.split_once('-') {
                (
                    parse_value(a, min, names).ok_or_else(|| invalid(format!("bad value '{a}'")))?,
                    parse_value(b, min, names).ok_or_else(|| invalid(format!("bad value '{b}'")))?,
                )
            } else {
                let v = parse_value(range, min, names)
                    .ok_or_else(|| invalid(format!("bad value '{range}'")))?;
                if step.is_some() {
                    (v, max)
                } else {
                    (v, v)
                }
            };

            if lo < min || hi > max || lo > hi {
                return Err(invalid(format!("range must lie within {min}-{max}")));
            }
            let step = step.unwrap_or(1) as usize;
            for v in (lo..=hi).step_by(step) {
                bits |= 1 << v;
            }
        }
        Ok(Self { bits })
    }
}

fn parse_value(text: &str, min: u32, names: &[&str]) -> Option<u32> {
    if let Ok(v) = text.parse::<u32>() {
        return Some(v);
    }
    names
        .iter()
        .position(|name| *name == text)
        .map(|idx| min + idx as u32)
}

/// A parsed scan schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    expression: String,
    minute: CronField,
    hour: CronField,
    day: CronField,
    month: CronField,
    weekday: CronField,
}

impl Schedule {
    pub fn parse(expression: &str) -> Result<Self, ScheduleError> {
        let normalized = expression.trim().to_lowercase();
        let invalid = |reason: &str| ScheduleError::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.to_string(),
        };

        if normalized.is_empty() {
            return Err(invalid("empty expression"));
        }
        if normalized == "daily" || normalized == "day" {
            return Ok(Self {
                expression: normalized,
                minute: CronField::only(0),
                hour: CronField::only(DEFAULT_DAILY_HOUR),
                day: CronField::every(1, 31),
                month: CronField::every(1, 12),
                weekday: CronField::every(0, 6),
            });
        }

        let parts: Vec<&str> = normalized.split_whitespace().collect();
        let [minute, hour, day, month, weekday] = parts.as_slice() else {
            return Err(invalid("expected 'daily' or five fields: minute hour day month weekday"));
        };

        Ok(Self {
            minute: CronField::parse("minute", minute, 0, 59, &[])?,
            hour: CronField::parse("hour", hour, 0, 23, &[])?,
            day: CronField::parse("day", day, 1, 31, &[])?,
            month: CronField::parse("month", month, 1, 12, &MONTH_NAMES)?,
            weekday: CronField::parse("weekday", weekday, 0, 6, &WEEKDAY_NAMES)?,
            expression: normalized,
        })
    }

    /// The configured schedule; `None` when scans are on demand only.
    pub fn from_config(config: &ScheduleConfig) -> Result<Option<Self>, ScheduleError> {
        config.expression().map(Self::parse).transpose()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.month.contains(date.month())
            && self.day.contains(date.day())
            && self.weekday.contains(date.weekday().num_days_from_monday())
    }

    /// First firing time strictly after `after`, in the same time zone.
    /// Local times that do not exist (DST gaps) are skipped; ambiguous ones
    /// fire at their earlier instant.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = after.timezone();
        let start = after
            .naive_local()
            .with_second(0)?
            .with_nanosecond(0)?
            .checked_add_signed(TimeDelta::minutes(1))?;
        let horizon = start.year() + HORIZON_YEARS;

        let mut t = start;
        while t.year() <= horizon {
            if !self.month.contains(t.month()) {
                t = first_minute_of_next_month(t)?;
                continue;
            }
            if !self.matches_date(t.date()) {
                t = t.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            }
            let Some(hour) = self.hour.first_from(t.hour()) else {
                t = t.date().succ_opt()?.and_hms_opt(0, 0, 0)?;
                continue;
            };
            if hour != t.hour() {
                t = t.date().and_hms_opt(hour, 0, 0)?;
                continue;
            }
            let Some(minute) = self.minute.first_from(t.minute()) else {
                t = t.date().and_hms_opt(t.hour(), 0, 0)? + TimeDelta::hours(1);
                continue;
            };
            let candidate = t.date().and_hms_opt(hour, minute, 0)?;

            match tz.from_local_datetime(&candidate).earliest() {
                Some(fire) if fire > *after => return Some(fire),
                _ => t = candidate + TimeDelta::minutes(1),
            }
        }
        None
    }
}

fn first_minute_of_next_month(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = if t.month() == 12 {
        (t.year() + 1, 1)
    } else {
        (t.year(), t.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}
