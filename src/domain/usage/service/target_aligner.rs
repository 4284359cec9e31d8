use tracing::{debug, warn};

use crate::domain::common::model::HourlySeries;
use crate::domain::common::service::time_window::QueryWindow;
use crate::domain::usage::model::{TargetSpec, TargetStep};

use super::target_series::TargetSeriesBuilder;

/// Target and running series restricted to the query window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    /// Un-cumulated target inside the window.
    pub target: HourlySeries,
    pub target_cumulative: HourlySeries,
    pub running_cumulative: HourlySeries,
}

/// Resolves the target into an hourly series (a constant level is held over `[start, end)`).
pub fn resolve_target(
    spec: &TargetSpec,
    window: &QueryWindow,
    builder: &dyn TargetSeriesBuilder,
) -> HourlySeries {
    match spec {
        TargetSpec::Level(level) => builder.build(&[TargetStep {
            start: window.start,
            end: window.end,
            level: *level as f64,
        }]),
        TargetSpec::Series(series) if series.is_hour_aligned() => series.clone(),
        TargetSpec::Series(series) => {
            warn!("Target series has points off the hour boundary; flooring them to the hour");
            series.floor_keys()
        }
    }
}

/// Cumulates target and running over their own full spans, then slices both to `[start, end]`.
pub fn align(target: &HourlySeries, running: &HourlySeries, window: &QueryWindow) -> AlignedSeries {
    let aligned = AlignedSeries {
        target: target.slice(window.start, window.end),
        target_cumulative: target.cumsum().slice(window.start, window.end),
        running_cumulative: running.cumsum().slice(window.start, window.end),
    };

    debug!(
        "Aligned to [{}, {}]: target={} points, running={} points",
        window.start,
        window.end,
        aligned.target_cumulative.len(),
        aligned.running_cumulative.len()
    );

    aligned
}

/// `running_cumulative - target_cumulative` on the timestamps both series share.
/// Positive means usage ran ahead of the allocation.
pub fn distance_from_target(aligned: &AlignedSeries) -> HourlySeries {
    aligned
        .running_cumulative
        .zip_shared(&aligned.target_cumulative, |running, target| running - target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::usage::service::target_series::SteppedTargetBuilder;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, 0, 0).unwrap()
    }

    fn window(from: u32, to: u32) -> QueryWindow {
        QueryWindow::new(hour(from), hour(to))
    }

    #[test]
    fn constant_target_is_a_staircase() {
        let w = window(0, 6);
        let target = resolve_target(&TargetSpec::Level(5), &w, &SteppedTargetBuilder);
        assert_eq!(target.len(), 6);
        assert!(target.values().all(|v| v == 5.0));

        let cumulative: Vec<_> = target.cumsum().values().collect();
        assert_eq!(cumulative, vec![5.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
    }

    #[test]
    fn series_target_passes_through() {
        let supplied = HourlySeries::from_points(vec![(hour(0), 1.0), (hour(1), 2.0)]);
        let target = resolve_target(&TargetSpec::Series(supplied.clone()), &window(0, 5), &SteppedTargetBuilder);
        assert_eq!(target, supplied);
    }

    #[test]
    fn unaligned_series_target_still_meets_running() {
        let supplied = HourlySeries::from_points((0..3).map(|h| (hour(h) + Duration::minutes(30), 5.0)));
        let w = window(0, 3);
        let target = resolve_target(&TargetSpec::Series(supplied), &w, &SteppedTargetBuilder);
        assert_eq!(target.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![hour(0), hour(1), hour(2)]);

        let running = HourlySeries::from_points(vec![(hour(0), 2.0), (hour(1), 2.0), (hour(2), 0.0)]);
        let distance = distance_from_target(&align(&target, &running, &w));
        assert_eq!(distance.values().collect::<Vec<_>>(), vec![-3.0, -6.0, -11.0]);
    }

    #[test]
    fn running_is_cumulated_before_slicing() {
        let running = HourlySeries::from_points((0..6).map(|h| (hour(h), 1.0)));
        let target = HourlySeries::from_points((0..6).map(|h| (hour(h), 0.0)));

        let aligned = align(&target, &running, &window(2, 4));

        let points: Vec<_> = aligned.running_cumulative.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(points, vec![(hour(2), 3.0), (hour(3), 4.0), (hour(4), 5.0)]);
    }

    #[test]
    fn distance_is_running_minus_target_on_shared_hours() {
        let running = HourlySeries::from_points(vec![(hour(0), 2.0), (hour(1), 2.0), (hour(2), 0.0)]);
        let w = window(0, 3);
        let target = resolve_target(&TargetSpec::Level(5), &w, &SteppedTargetBuilder);

        let aligned = align(&target, &running, &w);
        let distance = distance_from_target(&aligned);

        assert_eq!(distance.values().collect::<Vec<_>>(), vec![-3.0, -6.0, -11.0]);
        for (t, _) in &distance {
            assert!(*t >= w.start && *t <= w.end);
        }
    }

    #[test]
    fn disjoint_window_gives_empty_output() {
        let running = HourlySeries::from_points(vec![(hour(0), 2.0), (hour(1), 2.0)]);
        let far = QueryWindow::new(hour(0) + Duration::days(30), hour(0) + Duration::days(31));
        let target = resolve_target(&TargetSpec::Level(5), &far, &SteppedTargetBuilder);

        let aligned = align(&target, &running, &far);
        assert!(aligned.running_cumulative.is_empty());
        assert!(distance_from_target(&aligned).is_empty());
    }
}
