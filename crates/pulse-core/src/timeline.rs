/// The four ordered progress steps shown by the timeline row. Recomputed
/// from the current counts on every poll, so visual regression is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimelineStep {
    AwaitingSyllabus,
    SyllabusLoaded,
    ReadyForAnalysis,
    PlanDelivered,
}

impl TimelineStep {
    pub const ALL: [TimelineStep; 4] = [
        TimelineStep::AwaitingSyllabus,
        TimelineStep::SyllabusLoaded,
        TimelineStep::ReadyForAnalysis,
        TimelineStep::PlanDelivered,
    ];

    /// 1-based position, matching the marker numbering on screen.
    pub fn index(self) -> u8 {
        match self {
            TimelineStep::AwaitingSyllabus => 1,
            TimelineStep::SyllabusLoaded => 2,
            TimelineStep::ReadyForAnalysis => 3,
            TimelineStep::PlanDelivered => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimelineStep::AwaitingSyllabus => "Syllabus",
            TimelineStep::SyllabusLoaded => "Tests",
            TimelineStep::ReadyForAnalysis => "Analysis",
            TimelineStep::PlanDelivered => "Plan",
        }
    }

    /// Marker emphasis rule: markers strictly below the current step are
    /// lit, the rest are dimmed. Re-applying the same step is a no-op.
    pub fn marker_emphasized(self, marker: u8) -> bool {
        marker < self.index()
    }
}

/// Pure mapping from the artifact counts to a step. The mutation watcher
/// may force `PlanDelivered` on top of this; that override lasts until the
/// next poll recomputes a step from counts.
pub fn step_for_counts(syllabi: usize, tests: usize) -> TimelineStep {
    if syllabi == 0 {
        TimelineStep::AwaitingSyllabus
    } else if tests == 0 {
        TimelineStep::SyllabusLoaded
    } else {
        TimelineStep::ReadyForAnalysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_table_matches_counts() {
        assert_eq!(step_for_counts(0, 0), TimelineStep::AwaitingSyllabus);
        assert_eq!(step_for_counts(0, 5), TimelineStep::AwaitingSyllabus);
        assert_eq!(step_for_counts(1, 0), TimelineStep::SyllabusLoaded);
        assert_eq!(step_for_counts(3, 0), TimelineStep::SyllabusLoaded);
        assert_eq!(step_for_counts(1, 1), TimelineStep::ReadyForAnalysis);
        assert_eq!(step_for_counts(9, 9), TimelineStep::ReadyForAnalysis);
    }

    #[test]
    fn mapping_is_history_independent() {
        for (a, b) in [(4usize, 2usize), (0, 0), (4, 2)] {
            let first = step_for_counts(a, b);
            let second = step_for_counts(a, b);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn steps_are_totally_ordered() {
        let mut sorted = TimelineStep::ALL;
        sorted.sort();
        assert_eq!(sorted, TimelineStep::ALL);
        assert!(TimelineStep::AwaitingSyllabus < TimelineStep::PlanDelivered);
    }

    #[test]
    fn emphasis_lights_markers_below_step() {
        let step = TimelineStep::ReadyForAnalysis;
        assert!(step.marker_emphasized(0));
        assert!(step.marker_emphasized(1));
        assert!(step.marker_emphasized(2));
        assert!(!step.marker_emphasized(3));
    }
}
