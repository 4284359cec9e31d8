use chrono::{DateTime, Duration, NaiveDateTime, Utc};

const SECONDS_PER_HOUR: i64 = 3600;

pub struct TimeUtils;

impl TimeUtils {
    /// Query timestamps arrive without an offset and are interpreted as UTC.
    #[inline]
    pub fn naive_to_utc(dt: NaiveDateTime) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(dt, Utc)
    }

    /// Start of the hour bucket containing `dt` (buckets are half-open `[h, h+1h)`).
    pub fn floor_hour(dt: DateTime<Utc>) -> DateTime<Utc> {
        let secs = dt.timestamp();
        let floored = secs - secs.rem_euclid(SECONDS_PER_HOUR);
        DateTime::from_timestamp(floored, 0).unwrap_or(dt)
    }

    /// `dt` plus one hour, or `None` past the last representable instant.
    #[inline]
    pub fn next_hour(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
        dt.checked_add_signed(Duration::hours(1))
    }

    /// First hour boundary at or after `dt`. `None` when that boundary is not representable.
    pub fn ceil_hour(dt: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let floored = Self::floor_hour(dt);
        if floored == dt {
            Some(dt)
        } else {
            Self::next_hour(floored)
        }
    }

    /// Every hour boundary from `first` through `last`, both inclusive.
    /// Both ends are expected to be hour-aligned.
    pub fn hours_inclusive(first: DateTime<Utc>, last: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> {
        std::iter::successors(Some(first), |h| Self::next_hour(*h)).take_while(move |h| *h <= last)
    }

    /// Whole hours between the buckets of `first` and `last`, counting both ends.
    /// Zero when `last` is before `first`.
    pub fn span_hours(first: DateTime<Utc>, last: DateTime<Utc>) -> i64 {
        let (first, last) = (Self::floor_hour(first), Self::floor_hour(last));
        if last < first {
            0
        } else {
            (last - first).num_hours() + 1
        }
    }
}
