use time::{Date, Duration, OffsetDateTime, Weekday};
use time_tz::{ToTimezone, timezones};

use crate::mealplan::DayKey;

/// Maps a calendar date to its day key. The domain week starts on Monday.
pub fn day_key(date: Date) -> DayKey {
    DayKey::from_weekday(date.weekday())
}

/// Day key of `now` in its own offset.
pub fn today_key(now: OffsetDateTime) -> DayKey {
    day_key(now.date())
}

/// Current instant converted to the given IANA timezone, UTC when unknown.
pub fn now(tz: impl AsRef<str>) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    match timezones::get_by_name(tz.as_ref()) {
        Some(tz) => now.to_timezone(tz),
        _ => now,
    }
}

pub fn today(tz: impl AsRef<str>) -> Date {
    now(tz).date()
}

pub fn unix_now() -> u64 {
    OffsetDateTime::now_utc().unix_timestamp().max(0) as u64
}

/// Monday of the week containing `date`.
pub fn week_start(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday() as i64)
}

/// The seven concrete dates of the week containing `date`, paired with their key.
pub fn week_dates(date: Date) -> [(DayKey, Date); 7] {
    let monday = week_start(date);
    DayKey::ALL.map(|day| (day, monday + Duration::days(day.index() as i64)))
}

/// Unix timestamp of the date at UTC midnight, the storage form of calendar dates.
pub fn date_to_unix(date: Date) -> i64 {
    date.midnight().assume_utc().unix_timestamp()
}

pub fn date_from_unix(timestamp: i64) -> crate::Result<Date> {
    Ok(OffsetDateTime::from_unix_timestamp(timestamp)?.date())
}

impl DayKey {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => DayKey::Monday,
            Weekday::Tuesday => DayKey::Tuesday,
            Weekday::Wednesday => DayKey::Wednesday,
            Weekday::Thursday => DayKey::Thursday,
            Weekday::Friday => DayKey::Friday,
            Weekday::Saturday => DayKey::Saturday,
            Weekday::Sunday => DayKey::Sunday,
        }
    }
}
