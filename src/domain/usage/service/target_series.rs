use crate::core::util::time_util::TimeUtils;
use crate::domain::common::model::HourlySeries;
use crate::domain::usage::model::TargetStep;

/// Produces a stepped hourly allocation series from `(start, end, level)` triples.
pub trait TargetSeriesBuilder {
    fn build(&self, steps: &[TargetStep]) -> HourlySeries;
}

/// One point per hour boundary `h` with `start <= h < end`. Where steps overlap, the later one wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteppedTargetBuilder;

impl TargetSeriesBuilder for SteppedTargetBuilder {
    fn build(&self, steps: &[TargetStep]) -> HourlySeries {
        let mut points = Vec::new();
        for step in steps {
            let mut next = TimeUtils::ceil_hour(step.start);
            while let Some(hour) = next.filter(|h| *h < step.end) {
                points.push((hour, step.level));
                next = TimeUtils::next_hour(hour);
            }
        }
        HourlySeries::from_points(points)
    }
}
