#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use time::macros::format_description;
use time::{Date, Month};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCount {
    pub day: u8,
    pub count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DaywiseSeries {
    /// Ascending by day; days without incidents are absent.
    pub points: Vec<DayCount>,
    /// Raw values that did not parse as a calendar date.
    pub skipped: usize,
}

/// Groups incident dates falling in `month` of any year by day of month.
pub fn daywise_in_month<I, S>(dates: I, month: Month) -> DaywiseSeries
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut by_day: BTreeMap<u8, u64> = BTreeMap::new();
    let mut skipped = 0usize;
    for raw in dates {
        let Some(date) = parse_incident_date(raw.as_ref()) else {
            skipped += 1;
            continue;
        };
        if date.month() == month {
            *by_day.entry(date.day()).or_default() += 1;
        }
    }
    DaywiseSeries {
        points: by_day
            .into_iter()
            .map(|(day, count)| DayCount { day, count })
            .collect(),
        skipped,
    }
}

/// Accepts `YYYY-MM-DD` (optionally followed by a `T` or space separated
/// time) and `MM/DD/YYYY` (optionally followed by a time). Only the calendar
/// date is kept.
pub fn parse_incident_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let (date_part, rest) = match raw.find(['T', ' ']) {
        Some(split) => raw.split_at(split),
        None => (raw, ""),
    };
    if !rest.is_empty() && rest[1..].trim().is_empty() {
        return None;
    }
    if date_part.contains('/') {
        parse_us_date(date_part)
    } else {
        Date::parse(date_part, format_description!("[year]-[month]-[day]")).ok()
    }
}

fn parse_us_date(value: &str) -> Option<Date> {
    let mut parts = value.split('/');
    let month = parts.next()?.parse::<u8>().ok()?;
    let day = parts.next()?.parse::<u8>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}
