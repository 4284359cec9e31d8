use std::collections::btree_map;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::core::util::time_util::TimeUtils;

/// Ordered hour-keyed series.
///
/// Keys are hour-aligned UTC timestamps. Series produced by [`HourlySeries::bucket_sum`]
/// and [`HourlySeries::fill_span`] carry a point for every hour of their span, with
/// empty hours stored as `0.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    points: BTreeMap<DateTime<Utc>, f64>,
}

impl HourlySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes points verbatim. Later duplicates overwrite earlier ones.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Buckets events into half-open hours, sums each bucket and zero-fills the
    /// hours between the first and last bucket.
    pub fn bucket_sum<I>(events: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let mut points: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
        for (time, value) in events {
            *points.entry(TimeUtils::floor_hour(time)).or_insert(0.0) += value;
        }

        let series = Self { points };
        match series.span() {
            Some((first, last)) => series.fill_span(first, last),
            None => series,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, time: &DateTime<Utc>) -> Option<f64> {
        self.points.get(time).copied()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, DateTime<Utc>, f64> {
        self.points.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.values().copied()
    }

    /// First and last key.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.keys().next()?;
        let last = self.points.keys().next_back()?;
        Some((*first, *last))
    }

    /// True when every key sits on an hour boundary.
    pub fn is_hour_aligned(&self) -> bool {
        self.points.keys().all(|k| TimeUtils::floor_hour(*k) == *k)
    }

    /// Moves every key down to the start of its hour. Points landing in the same
    /// hour keep the value of the latest one.
    pub fn floor_keys(&self) -> HourlySeries {
        let points = self
            .points
            .iter()
            .map(|(k, v)| (TimeUtils::floor_hour(*k), *v))
            .collect();
        HourlySeries { points }
    }

    /// Inserts `0.0` for every missing hour in `[first, last]`. Existing points are kept,
    /// including any outside that range.
    pub fn fill_span(mut self, first: DateTime<Utc>, last: DateTime<Utc>) -> Self {
        for hour in TimeUtils::hours_inclusive(TimeUtils::floor_hour(first), last) {
            self.points.entry(hour).or_insert(0.0);
        }
        self
    }

    /// Merges over the union of both key sets; a key missing on one side reads as `0.0`.
    pub fn combine<F>(&self, other: &HourlySeries, f: F) -> HourlySeries
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut points = BTreeMap::new();
        for key in self.points.keys().chain(other.points.keys()) {
            if points.contains_key(key) {
                continue;
            }
            let lhs = self.get(key).unwrap_or(0.0);
            let rhs = other.get(key).unwrap_or(0.0);
            points.insert(*key, f(lhs, rhs));
        }
        HourlySeries { points }
    }

    pub fn subtract(&self, other: &HourlySeries) -> HourlySeries {
        self.combine(other, |a, b| a - b)
    }

    /// Merges over the keys present in both series only.
    pub fn zip_shared<F>(&self, other: &HourlySeries, f: F) -> HourlySeries
    where
        F: Fn(f64, f64) -> f64,
    {
        let points = self
            .points
            .iter()
            .filter_map(|(k, a)| other.get(k).map(|b| (*k, f(*a, b))))
            .collect();
        HourlySeries { points }
    }

    pub fn cumsum(&self) -> HourlySeries {
        let mut acc = 0.0;
        let points = self
            .points
            .iter()
            .map(|(k, v)| {
                acc += v;
                (*k, acc)
            })
            .collect();
        HourlySeries { points }
    }

    /// Points with `from <= t <= to`. An inverted range yields an empty series.
    pub fn slice(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> HourlySeries {
        if from > to {
            return HourlySeries::new();
        }
        let points = self
            .points
            .range(from..=to)
            .map(|(k, v)| (*k, *v))
            .collect();
        HourlySeries { points }
    }
}

impl<'a> IntoIterator for &'a HourlySeries {
    type Item = (&'a DateTime<Utc>, &'a f64);
    type IntoIter = btree_map::Iter<'a, DateTime<Utc>, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn bucket_sum_groups_by_hour_and_fills_gaps() {
        let series = HourlySeries::bucket_sum(vec![
            (at(1, 10), 2.0),
            (at(1, 59), 3.0),
            (at(4, 0), 1.0),
        ]);

        let points: Vec<_> = series.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(
            points,
            vec![(hour(1), 5.0), (hour(2), 0.0), (hour(3), 0.0), (hour(4), 1.0)]
        );
    }

    #[test]
    fn bucket_keys_are_spaced_one_hour() {
        let series = HourlySeries::bucket_sum(vec![(at(0, 5), 1.0), (at(9, 30), 1.0), (at(3, 0), 1.0)]);
        let keys: Vec<_> = series.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), 10);
        assert!(keys.windows(2).all(|w| w[1] - w[0] == Duration::hours(1)));
    }

    #[test]
    fn bucket_sum_of_nothing_is_empty() {
        assert!(HourlySeries::bucket_sum(Vec::new()).is_empty());
    }

    #[test]
    fn subtract_uses_union_with_zero_fill() {
        let a = HourlySeries::from_points(vec![(hour(0), 5.0), (hour(1), 1.0)]);
        let b = HourlySeries::from_points(vec![(hour(1), 3.0), (hour(2), 2.0)]);

        let diff = a.subtract(&b);
        assert_eq!(diff.get(&hour(0)), Some(5.0));
        assert_eq!(diff.get(&hour(1)), Some(-2.0));
        assert_eq!(diff.get(&hour(2)), Some(-2.0));
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn zip_shared_keeps_intersection_only() {
        let a = HourlySeries::from_points(vec![(hour(0), 5.0), (hour(1), 1.0)]);
        let b = HourlySeries::from_points(vec![(hour(1), 3.0), (hour(2), 2.0)]);

        let diff = a.zip_shared(&b, |x, y| x - y);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get(&hour(1)), Some(-2.0));
    }

    #[test]
    fn cumsum_can_fall() {
        let s = HourlySeries::from_points(vec![(hour(0), 2.0), (hour(1), -3.0), (hour(2), 1.0)]);
        let values: Vec<_> = s.cumsum().values().collect();
        assert_eq!(values, vec![2.0, -1.0, 0.0]);
    }

    #[test]
    fn slice_is_inclusive_on_both_ends() {
        let s = HourlySeries::bucket_sum((0..6).map(|h| (hour(h), 1.0)));
        let sliced = s.slice(hour(1), hour(3));
        let keys: Vec<_> = sliced.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![hour(1), hour(2), hour(3)]);

        assert!(s.slice(hour(4), hour(2)).is_empty());
        assert!(s.slice(hour(10), hour(12)).is_empty());
    }

    #[test]
    fn floor_keys_snaps_to_hour_start() {
        let s = HourlySeries::from_points(vec![(at(0, 30), 1.0), (at(1, 10), 2.0), (at(1, 50), 3.0)]);
        assert!(!s.is_hour_aligned());

        let floored = s.floor_keys();
        assert!(floored.is_hour_aligned());
        let points: Vec<_> = floored.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(points, vec![(hour(0), 1.0), (hour(1), 3.0)]);
    }

    #[test]
    fn fill_span_keeps_existing_values() {
        let s = HourlySeries::from_points(vec![(hour(2), 7.0)]).fill_span(hour(0), hour(3));
        let values: Vec<_> = s.values().collect();
        assert_eq!(values, vec![0.0, 0.0, 7.0, 0.0]);
    }
}
