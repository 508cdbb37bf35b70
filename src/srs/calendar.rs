//! Calendar-day arithmetic in an arbitrary time zone.
//!
//! Review dates move in whole local days, not in 24-hour steps: adding one day
//! to 09:00 the evening before a DST switch lands on 09:00 the next day even
//! though only 23 (or 25) hours elapsed.

use chrono::{
  DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};

/// Local calendar day of an instant, in the instant's own zone
pub fn calendar_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
  instant.date_naive()
}

/// Local calendar day of a stored UTC instant as seen from `tz`
pub fn calendar_day_in<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
  instant.with_timezone(tz).date_naive()
}

/// First instant of the local day containing `instant`
pub fn start_of_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> Option<DateTime<Tz>> {
  let midnight = instant.date_naive().and_time(NaiveTime::MIN);
  resolve_local(&instant.timezone(), midnight)
}

/// Move `instant` by `days` local calendar days, keeping its wall-clock time.
///
/// Returns `None` only when the result leaves chrono's representable range.
pub fn add_calendar_days<Tz: TimeZone>(instant: &DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
  let local = instant.naive_local();
  let shifted = if days >= 0 {
    local.checked_add_days(Days::new(days.unsigned_abs()))?
  } else {
    local.checked_sub_days(Days::new(days.unsigned_abs()))?
  };
  resolve_local(&instant.timezone(), shifted)
}

/// Map a wall-clock time to an instant.
///
/// Ambiguous times (DST fold) take the earlier instant. Times skipped by a
/// gap are read with the offset in force before it, which moves them forward
/// by the length of the gap whatever that length is.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
  match tz.from_local_datetime(&local) {
    LocalResult::Single(dt) => Some(dt),
    LocalResult::Ambiguous(earliest, _) => Some(earliest),
    LocalResult::None => {
      // Offsets stay within a day, so this instant precedes the transition
      let before_gap = local.checked_sub_signed(TimeDelta::days(1))?;
      let offset = tz.offset_from_utc_datetime(&before_gap).fix();
      let utc = local.checked_sub_signed(TimeDelta::seconds(offset.local_minus_utc().into()))?;
      Some(tz.from_utc_datetime(&utc))
    }
  }
}
