use crate::state::StateSnapshot;

/// Cadence of the deck's state poll, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 900;

pub const STATUS_WAITING_SYLLABUS: &str = "Waiting for syllabus";
pub const STATUS_WAITING_TESTS: &str = "Waiting for tests";
pub const STATUS_READY: &str = "Ready for AI analysis";

/// Emitted when a poll sees a different artifact-count pair than the last
/// one. Carries the full triggering snapshot so downstream consumers read
/// the plans counter fresh rather than from the stored comparison pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollChange {
    pub snapshot: StateSnapshot,
    pub status: &'static str,
}

/// Compares successive snapshots on the syllabus/test pair only. The
/// plans-generated counter is deliberately excluded from the equality
/// check: it is picked up opportunistically when the pair changes, or via
/// the plan-file mutation path.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last_seen: Option<(usize, usize)>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A detector that treats `snapshot` as already rendered, so the first
    /// poll after a bootstrap render does not re-trigger.
    pub fn primed(snapshot: &StateSnapshot) -> Self {
        Self {
            last_seen: Some((snapshot.syllabi, snapshot.tests)),
        }
    }

    pub fn observe(&mut self, snapshot: &StateSnapshot) -> Option<PollChange> {
        let pair = (snapshot.syllabi, snapshot.tests);
        if self.last_seen == Some(pair) {
            return None;
        }
        self.last_seen = Some(pair);
        Some(PollChange {
            snapshot: *snapshot,
            status: status_for_counts(pair.0, pair.1),
        })
    }
}

pub fn status_for_counts(syllabi: usize, tests: usize) -> &'static str {
    if syllabi > 0 && tests > 0 {
        STATUS_READY
    } else if syllabi > 0 {
        STATUS_WAITING_TESTS
    } else {
        STATUS_WAITING_SYLLABUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(syllabi: usize, tests: usize, plans: u64) -> StateSnapshot {
        StateSnapshot {
            syllabi,
            tests,
            plans_generated: plans,
        }
    }

    #[test]
    fn unchanged_pair_does_not_trigger() {
        let mut detector = ChangeDetector::primed(&snap(1, 2, 0));
        assert!(detector.observe(&snap(1, 2, 0)).is_none());
        assert!(detector.observe(&snap(1, 2, 0)).is_none());
    }

    #[test]
    fn plans_counter_alone_never_triggers() {
        let mut detector = ChangeDetector::primed(&snap(1, 1, 0));
        assert!(detector.observe(&snap(1, 1, 7)).is_none());
    }

    #[test]
    fn pair_change_triggers_once_and_carries_fresh_plans() {
        let mut detector = ChangeDetector::primed(&snap(0, 0, 0));
        let change = detector.observe(&snap(1, 0, 4)).expect("change");
        assert_eq!(change.snapshot.plans_generated, 4);
        assert_eq!(change.status, STATUS_WAITING_TESTS);
        assert!(detector.observe(&snap(1, 0, 4)).is_none());
    }

    #[test]
    fn unprimed_detector_fires_on_first_observation() {
        let mut detector = ChangeDetector::new();
        assert!(detector.observe(&snap(0, 0, 0)).is_some());
        assert!(detector.observe(&snap(0, 0, 0)).is_none());
    }

    #[test]
    fn status_follows_three_way_rule() {
        assert_eq!(status_for_counts(0, 0), STATUS_WAITING_SYLLABUS);
        assert_eq!(status_for_counts(0, 3), STATUS_WAITING_SYLLABUS);
        assert_eq!(status_for_counts(2, 0), STATUS_WAITING_TESTS);
        assert_eq!(status_for_counts(2, 1), STATUS_READY);
    }

    #[test]
    fn regression_to_fewer_artifacts_still_triggers() {
        let mut detector = ChangeDetector::primed(&snap(2, 2, 0));
        let change = detector.observe(&snap(2, 0, 0)).expect("change");
        assert_eq!(change.status, STATUS_WAITING_TESTS);
    }
}
