use pulse_core::detector::{STATUS_READY, STATUS_WAITING_SYLLABUS, STATUS_WAITING_TESTS};
use pulse_core::{
    derive_highlights, step_for_counts, ArtifactRecord, ChangeDetector, ChartModel, CounterBank,
    CounterId, StateSnapshot, TimelineStep, WorkspaceState, TWEEN_DURATION,
};
use std::time::Instant;

fn snapshot(state: &WorkspaceState) -> StateSnapshot {
    StateSnapshot::of(state)
}

fn artifact(name: &str) -> ArtifactRecord {
    ArtifactRecord::named(name, 16.0, chrono::Utc::now())
}

/// Drives the whole poll -> timeline -> chart -> counter chain the way the
/// deck does, then delivers plan text the way the watcher does.
#[test]
fn upload_sequence_walks_the_timeline_and_plan_delivery_forces_the_last_step() {
    let mut clock = Instant::now();
    let mut workspace = WorkspaceState::default();

    // Bootstrap render: empty workspace.
    let initial = snapshot(&workspace);
    let mut detector = ChangeDetector::primed(&initial);
    let mut step = step_for_counts(initial.syllabi, initial.tests);
    let mut proportion = ChartModel::proportion(initial.syllabi as u64);
    let mut trend = ChartModel::trend(initial.tests as u64);
    let mut counters = CounterBank::new();

    assert_eq!(step, TimelineStep::AwaitingSyllabus);

    // A poll with nothing new re-renders nothing.
    assert!(detector.observe(&snapshot(&workspace)).is_none());

    // The generator uploads a syllabus; the next poll catches it.
    workspace.syllabi.push(artifact("term2-syllabus.pdf"));
    let change = detector.observe(&snapshot(&workspace)).expect("change");
    assert_eq!(change.status, STATUS_WAITING_TESTS);
    step = step_for_counts(change.snapshot.syllabi, change.snapshot.tests);
    assert_eq!(step, TimelineStep::SyllabusLoaded);

    proportion.update(change.snapshot.syllabi as u64);
    trend.update(change.snapshot.tests as u64);
    counters.retarget_counts(&change.snapshot, clock);
    clock += TWEEN_DURATION;
    counters.tick_all(clock);
    assert_eq!(counters.value(CounterId::StatSyllabi), 1);
    assert_eq!(proportion.data(), &[1, 4]);

    // A test paper arrives: ready for analysis.
    workspace.tests.push(artifact("unit-test-1.pdf"));
    let change = detector.observe(&snapshot(&workspace)).expect("change");
    assert_eq!(change.status, STATUS_READY);
    step = step_for_counts(change.snapshot.syllabi, change.snapshot.tests);
    assert_eq!(step, TimelineStep::ReadyForAnalysis);
    trend.update(change.snapshot.tests as u64);
    assert_eq!(trend.data(), &[1, 0, 0, 0]);

    // The renderer writes the plan overview; the mutation path forces the
    // terminal step regardless of counts and derives highlights.
    let plan_text = "Monday: Algebra intro. Wednesday: Algebra practice and Homework.";
    step = TimelineStep::PlanDelivered;
    let highlights = derive_highlights(plan_text);

    assert!(step > TimelineStep::ReadyForAnalysis);
    let algebra = highlights
        .iter()
        .find(|h| h.term == "Algebra")
        .expect("Algebra entry");
    assert_eq!(algebra.score, 1.0);
    let homework = highlights
        .iter()
        .find(|h| h.term == "Homework")
        .expect("Homework entry");
    assert_eq!(homework.score, 0.6);

    // The next poll recomputes from counts again; the override is gone.
    workspace.syllabi.push(artifact("term3-syllabus.pdf"));
    let change = detector.observe(&snapshot(&workspace)).expect("change");
    step = step_for_counts(change.snapshot.syllabi, change.snapshot.tests);
    assert_eq!(step, TimelineStep::ReadyForAnalysis);
}

#[test]
fn initial_empty_state_reports_waiting_for_syllabus() {
    let workspace = WorkspaceState::default();
    let snap = snapshot(&workspace);

    let mut detector = ChangeDetector::new();
    let change = detector.observe(&snap).expect("first observation");
    assert_eq!(change.status, STATUS_WAITING_SYLLABUS);
    assert_eq!(
        step_for_counts(snap.syllabi, snap.tests),
        TimelineStep::AwaitingSyllabus
    );
}

#[test]
fn plans_counter_changes_ride_along_with_artifact_changes() {
    let mut workspace = WorkspaceState::default();
    workspace.syllabi.push(artifact("syllabus.pdf"));
    let mut detector = ChangeDetector::primed(&snapshot(&workspace));

    // Plans moved alone: no poll-driven update.
    workspace.plans_generated = 2;
    assert!(detector.observe(&snapshot(&workspace)).is_none());

    // Once an artifact count moves too, the stale plans value is delivered.
    workspace.tests.push(artifact("quiz.pdf"));
    let change = detector.observe(&snapshot(&workspace)).expect("change");
    assert_eq!(change.snapshot.plans_generated, 2);
}

#[test]
fn repeated_plan_mutations_rederive_from_scratch() {
    let first = derive_highlights("Algebra Algebra Decimals");
    let second = derive_highlights("Review only");

    // Nothing from the first run leaks into the second.
    assert_eq!(
        second.iter().find(|h| h.term == "Algebra").unwrap().score,
        0.0
    );
    assert_eq!(
        second.iter().find(|h| h.term == "Decimals").unwrap().score,
        0.0
    );
    assert_eq!(
        second.iter().find(|h| h.term == "Review").unwrap().score,
        0.6
    );
    assert_eq!(first.len(), second.len());
}
