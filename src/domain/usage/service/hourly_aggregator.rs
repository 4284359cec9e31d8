use tracing::debug;

use crate::domain::common::model::HourlySeries;

use super::lifecycle_projector::{EventView, LifecycleEvents};

/// Per-hour usage totals for each lifecycle event kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyDeltas {
    pub submitted: HourlySeries,
    pub started: HourlySeries,
    pub ended: HourlySeries,
}

pub fn aggregate_view(view: &EventView) -> HourlySeries {
    HourlySeries::bucket_sum(view.iter().copied())
}

pub fn aggregate_hourly(events: &LifecycleEvents) -> HourlyDeltas {
    let deltas = HourlyDeltas {
        submitted: aggregate_view(&events.submitted),
        started: aggregate_view(&events.started),
        ended: aggregate_view(&events.ended),
    };

    debug!(
        "Hourly buckets: submitted={}, started={}, ended={}",
        deltas.submitted.len(),
        deltas.started.len(),
        deltas.ended.len()
    );

    deltas
}
