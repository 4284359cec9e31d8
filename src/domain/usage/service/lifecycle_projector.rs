use chrono::{DateTime, Utc};

use crate::domain::usage::model::NormalizedJob;

pub type EventView = Vec<(DateTime<Utc>, f64)>;

/// The job set re-keyed by each lifecycle timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleEvents {
    pub submitted: EventView,
    pub started: EventView,
    pub ended: EventView,
}

/// Projects jobs onto submit/start/end events. Jobs that have not started (or ended)
/// yet simply have no start (or end) event.
pub fn project_lifecycle(jobs: &[NormalizedJob]) -> LifecycleEvents {
    let mut ordered: Vec<&NormalizedJob> = jobs.iter().collect();
    ordered.sort_by_key(|j| j.submit);

    let mut events = LifecycleEvents {
        submitted: Vec::with_capacity(ordered.len()),
        started: Vec::with_capacity(ordered.len()),
        ended: Vec::with_capacity(ordered.len()),
    };

    for job in ordered {
        let usage = job.usage_or_zero();
        events.submitted.push((job.submit, usage));
        if let Some(start) = job.start {
            events.started.push((start, usage));
        }
        if let Some(end) = job.end {
            events.ended.push((end, usage));
        }
    }

    events
}
