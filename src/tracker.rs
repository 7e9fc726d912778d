//! VisitTracker - recorder and reporter sharing one store.

use crate::store::KeyValueStore;
use crate::visits::{
    Acknowledgment, Clock, StatsReporter, StatsSnapshot, SystemClock, VisitEvent, VisitLimits,
    VisitRecorder,
};

/// Both visit operations over one store.
///
/// The two halves never call each other; they only meet in the store.
pub struct VisitTracker<S, C = SystemClock> {
    recorder: VisitRecorder<S, C>,
    reporter: StatsReporter<S>,
}

impl<S: KeyValueStore + Clone> VisitTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            recorder: VisitRecorder::new(store.clone()),
            reporter: StatsReporter::new(store),
        }
    }
}

impl<S: KeyValueStore, C: Clock> VisitTracker<S, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> VisitTracker<S, C2> {
        VisitTracker {
            recorder: self.recorder.with_clock(clock),
            reporter: self.reporter,
        }
    }

    pub fn with_limits(self, limits: VisitLimits) -> Self {
        Self {
            recorder: self.recorder.with_limits(limits),
            reporter: self.reporter.with_limits(limits),
        }
    }

    pub fn recorder(&self) -> &VisitRecorder<S, C> {
        &self.recorder
    }

    pub fn reporter(&self) -> &StatsReporter<S> {
        &self.reporter
    }

    pub fn record_visit(&self, event: &VisitEvent) -> Acknowledgment {
        self.recorder.record_visit(event)
    }

    pub fn get_stats(&self) -> StatsSnapshot {
        self.reporter.get_stats()
    }
}
