use tracing::{debug, warn};

use crate::domain::common::model::HourlySeries;

use super::hourly_aggregator::HourlyDeltas;

/// Queued and running levels over the full event span (not windowed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSeries {
    pub queued: HourlySeries,
    pub running: HourlySeries,
}

/// Builds cumulative levels from hourly deltas.
///
/// All three delta series are first padded to the common span (earliest to latest
/// bucket across submit/start/end) so both levels share one index.
/// Negative running levels are kept as-is: they point at irregular job records.
pub fn build_levels(deltas: &HourlyDeltas) -> LevelSeries {
    let spans = [&deltas.submitted, &deltas.started, &deltas.ended]
        .into_iter()
        .filter_map(HourlySeries::span);

    let (first, last) = match spans.reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1))) {
        Some(span) => span,
        None => return LevelSeries::default(),
    };

    let submitted = deltas.submitted.clone().fill_span(first, last);
    let started = deltas.started.clone().fill_span(first, last);
    let ended = deltas.ended.clone().fill_span(first, last);

    let queued = submitted.subtract(&started).cumsum();
    let running = started.subtract(&ended).cumsum();

    if let Some((at, level)) = running.iter().find(|(_, v)| **v < 0.0) {
        warn!("Running level goes negative ({}) at {}: more ends than starts in the job records", level, at);
    }

    debug!("Built levels over {} hours ({} → {})", queued.len(), first, last);
    LevelSeries { queued, running }
}
