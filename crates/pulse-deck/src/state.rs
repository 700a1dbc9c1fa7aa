use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pulse_core::{
    derive_highlights, load_state, step_for_counts, status_for_counts, AssistantLog, ChangeDetector,
    ChartModel, CounterBank, HighlightEntry, StateError, StateSnapshot, TimelineStep,
    WorkspaceState, DATA_DIR, PLAN_FILE, STATE_FILE,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

pub const STATUS_ANALYZING: &str = "Analyzing...";
pub const STATUS_PLAN_GENERATED: &str = "Plan generated";
pub const STATUS_PREPARING_EXPORT: &str = "Preparing export";
pub const STATUS_EXPORT_READY: &str = "Ready";

/// How long the export status lingers before settling back to ready.
pub const EXPORT_SETTLE: Duration = Duration::from_millis(900);

const MAX_PREVIEWS: usize = 8;

#[derive(Debug, Clone)]
pub struct FilePreview {
    pub name: String,
    pub size_kb: f64,
    pub kind: &'static str,
    pub added: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusMode {
    #[default]
    Dashboard,
    Assistant,
}

/// The two live chart models. Built on the first sync and mutated in place
/// afterwards; never rebuilt while the session is alive.
#[derive(Debug)]
pub struct ChartPair {
    pub proportion: ChartModel,
    pub trend: ChartModel,
}

impl ChartPair {
    fn new(snapshot: &StateSnapshot) -> Self {
        Self {
            proportion: ChartModel::proportion(snapshot.syllabi as u64),
            trend: ChartModel::trend(snapshot.tests as u64),
        }
    }

    fn update(&mut self, snapshot: &StateSnapshot) {
        self.proportion.update(snapshot.syllabi as u64);
        self.trend.update(snapshot.tests as u64);
    }
}

/// The whole cockpit context: every piece of shared visual state lives
/// here for the session lifetime instead of in ambient globals.
pub struct App {
    pub root: PathBuf,
    pub state_path: PathBuf,
    pub plan_path: PathBuf,
    pub workspace: WorkspaceState,
    /// The last snapshot that was actually rendered. Only advanced by a
    /// change event (or a forced refresh), so indicators never churn on
    /// polls that detected nothing.
    pub snapshot: StateSnapshot,
    detector: ChangeDetector,
    pub step: TimelineStep,
    pub status: String,
    pub counters: CounterBank,
    pub charts: Option<ChartPair>,
    pub highlights: Vec<HighlightEntry>,
    pub previews: Vec<FilePreview>,
    pub plan_text: String,
    pub plan_skeleton: bool,
    pub chat: AssistantLog,
    pub chat_input: String,
    pub focus: FocusMode,
    pub show_assistant: bool,
    pub show_help: bool,
    pending_status: Option<(Instant, &'static str)>,
    pub last_error: Option<String>,
    pub dirty: bool,
    should_quit: bool,
}

pub fn resolve_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    if let Some(root) = find_workspace_root(&cwd) {
        return Ok(root);
    }

    if let Ok(root) = std::env::var("PLANPULSE_ROOT") {
        let trimmed = root.trim();
        if !trimmed.is_empty() {
            let root_path = PathBuf::from(trimmed);
            if root_path.join(DATA_DIR).is_dir() {
                return Ok(root_path);
            }
        }
    }

    Ok(cwd)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(path) = current {
        if path.join(DATA_DIR).is_dir() {
            return Some(path.to_path_buf());
        }
        current = path.parent();
    }
    None
}

impl App {
    pub fn new(root: PathBuf) -> Self {
        let state_path = root.join(DATA_DIR).join(STATE_FILE);
        let plan_path = root.join(DATA_DIR).join(PLAN_FILE);

        Self {
            root,
            state_path,
            plan_path,
            workspace: WorkspaceState::default(),
            snapshot: StateSnapshot::default(),
            detector: ChangeDetector::new(),
            step: TimelineStep::AwaitingSyllabus,
            status: String::new(),
            counters: CounterBank::new(),
            charts: None,
            highlights: Vec::new(),
            previews: Vec::new(),
            plan_text: String::new(),
            plan_skeleton: false,
            chat: AssistantLog::new(),
            chat_input: String::new(),
            focus: FocusMode::Dashboard,
            show_assistant: false,
            show_help: false,
            pending_status: None,
            last_error: None,
            dirty: false,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// One full render from the initial state, before any poll fires. The
    /// detector is primed with the initial pair so an unchanged first poll
    /// does not re-trigger.
    pub fn bootstrap(&mut self, now: Instant) {
        self.read_workspace();
        self.snapshot = StateSnapshot::of(&self.workspace);
        self.detector = ChangeDetector::primed(&self.snapshot);
        self.apply_snapshot_visuals(now);
        self.status = status_for_counts(self.snapshot.syllabi, self.snapshot.tests).to_string();
        if let Ok(text) = std::fs::read_to_string(&self.plan_path) {
            self.plan_text = text;
        }
        self.dirty = true;
    }

    /// The 900 ms poll: read, snapshot, diff, and fan out on change.
    pub fn on_poll(&mut self, now: Instant) {
        if !self.read_workspace() {
            return;
        }
        let fresh = StateSnapshot::of(&self.workspace);
        let Some(change) = self.detector.observe(&fresh) else {
            return;
        };

        let previous = self.snapshot;
        self.snapshot = change.snapshot;
        self.status = change.status.to_string();
        self.apply_snapshot_visuals(now);
        self.sync_previews(&previous);
        self.dirty = true;
    }

    /// The plan file changed: force the terminal step and re-derive the
    /// highlight set from scratch.
    pub fn on_plan_mutation(&mut self) {
        self.step = TimelineStep::PlanDelivered;
        self.status = STATUS_PLAN_GENERATED.to_string();
        self.plan_skeleton = false;
        match std::fs::read_to_string(&self.plan_path) {
            Ok(text) => {
                self.highlights = derive_highlights(&text);
                self.plan_text = text;
            }
            Err(err) => {
                // Skip the highlight pass; the next mutation re-runs it.
                warn!("plan overview unreadable: {err}");
            }
        }
        self.dirty = true;
    }

    /// Per-iteration tick: advances tweens, due chat replies, and the
    /// delayed status reset.
    pub fn on_frame(&mut self, now: Instant) {
        self.counters.tick_all(now);
        if self.chat.tick(now) > 0 {
            self.dirty = true;
        }
        if let Some((due, status)) = self.pending_status {
            if due <= now {
                self.status = status.to_string();
                self.pending_status = None;
                self.dirty = true;
            }
        }
    }

    /// Forced re-read and full re-render, bypassing the diff gate.
    pub fn refresh(&mut self, now: Instant) {
        self.read_workspace();
        self.snapshot = StateSnapshot::of(&self.workspace);
        self.detector = ChangeDetector::primed(&self.snapshot);
        self.status = status_for_counts(self.snapshot.syllabi, self.snapshot.tests).to_string();
        self.apply_snapshot_visuals(now);
        self.dirty = true;
    }

    fn apply_snapshot_visuals(&mut self, now: Instant) {
        self.step = step_for_counts(self.snapshot.syllabi, self.snapshot.tests);
        match &mut self.charts {
            Some(charts) => charts.update(&self.snapshot),
            None => self.charts = Some(ChartPair::new(&self.snapshot)),
        }
        self.counters.retarget_counts(&self.snapshot, now);
    }

    fn read_workspace(&mut self) -> bool {
        match load_state(&self.state_path) {
            Ok(state) => {
                self.workspace = state;
                self.last_error = None;
                true
            }
            Err(StateError::Io { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                // The generator has not created the workspace yet.
                self.workspace = WorkspaceState::default();
                self.last_error = None;
                true
            }
            Err(err) => {
                // Keep the last good state; the next poll self-heals.
                self.last_error = Some(err.to_string());
                warn!("state read failed: {err}");
                false
            }
        }
    }

    /// Surfaces newly arrived artifacts as preview cards, newest first.
    fn sync_previews(&mut self, previous: &StateSnapshot) {
        let added_at = |record: &pulse_core::ArtifactRecord| {
            record
                .added_at
                .map(|ts| ts.with_timezone(&Local))
                .unwrap_or_else(Local::now)
        };

        for record in self.workspace.syllabi.iter().skip(previous.syllabi) {
            self.previews.insert(
                0,
                FilePreview {
                    name: record.name.clone(),
                    size_kb: record.size_kb,
                    kind: "SYLL",
                    added: added_at(record),
                },
            );
        }
        for record in self.workspace.tests.iter().skip(previous.tests) {
            self.previews.insert(
                0,
                FilePreview {
                    name: record.name.clone(),
                    size_kb: record.size_kb,
                    kind: "TEST",
                    added: added_at(record),
                },
            );
        }
        self.previews.truncate(MAX_PREVIEWS);
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.focus == FocusMode::Assistant {
            self.handle_assistant_key(key, now);
            return;
        }
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.show_help = false;
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            KeyCode::Char('a') => {
                self.show_assistant = true;
                self.show_help = false;
                self.focus = FocusMode::Assistant;
            }
            KeyCode::Char('g') => {
                self.trigger_generate();
            }
            KeyCode::Char('e') => {
                self.trigger_export(now);
            }
            KeyCode::Char('r') => {
                self.refresh(now);
            }
            _ => {}
        }
    }

    fn handle_assistant_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => {
                self.show_assistant = false;
                self.focus = FocusMode::Dashboard;
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.chat_input);
                self.chat.submit(&input, now);
                self.dirty = true;
            }
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::Char(c) => {
                self.chat_input.push(c);
            }
            _ => {}
        }
    }

    /// The generate trigger only narrates: it sets the status and swaps
    /// the plan pane for a skeleton until real content arrives.
    fn trigger_generate(&mut self) {
        self.status = STATUS_ANALYZING.to_string();
        self.plan_skeleton = true;
        self.dirty = true;
    }

    fn trigger_export(&mut self, now: Instant) {
        self.status = STATUS_PREPARING_EXPORT.to_string();
        self.pending_status = Some((now + EXPORT_SETTLE, STATUS_EXPORT_READY));
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{save_state, ArtifactRecord};
    use std::time::Duration;

    fn workspace_with(syllabi: usize, tests: usize, plans: u64) -> WorkspaceState {
        let mut state = WorkspaceState::default();
        for i in 0..syllabi {
            state
                .syllabi
                .push(ArtifactRecord::named(format!("syll-{i}.pdf"), 10.0, chrono::Utc::now()));
        }
        for i in 0..tests {
            state
                .tests
                .push(ArtifactRecord::named(format!("test-{i}.pdf"), 8.0, chrono::Utc::now()));
        }
        state.plans_generated = plans;
        state
    }

    fn app_in(dir: &Path) -> App {
        std::fs::create_dir_all(dir.join(DATA_DIR)).expect("data dir");
        App::new(dir.to_path_buf())
    }

    #[test]
    fn poll_applies_change_and_second_poll_is_quiet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let now = Instant::now();

        save_state(&app.state_path, &workspace_with(0, 0, 0)).expect("seed");
        app.bootstrap(now);
        assert_eq!(app.step, TimelineStep::AwaitingSyllabus);
        assert_eq!(app.status, "Waiting for syllabus");

        save_state(&app.state_path, &workspace_with(1, 0, 0)).expect("update");
        app.on_poll(now);
        assert_eq!(app.step, TimelineStep::SyllabusLoaded);
        assert_eq!(app.status, "Waiting for tests");
        assert_eq!(app.previews.len(), 1);
        assert_eq!(app.previews[0].kind, "SYLL");

        app.status.clear();
        app.on_poll(now);
        assert!(app.status.is_empty(), "quiet poll must not re-render");
    }

    #[test]
    fn plans_only_change_waits_for_an_artifact_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let now = Instant::now();

        save_state(&app.state_path, &workspace_with(1, 1, 0)).expect("seed");
        app.bootstrap(now);

        save_state(&app.state_path, &workspace_with(1, 1, 5)).expect("plans only");
        app.on_poll(now);
        assert_eq!(app.snapshot.plans_generated, 0, "not picked up alone");

        save_state(&app.state_path, &workspace_with(2, 1, 5)).expect("pair change");
        app.on_poll(now);
        assert_eq!(app.snapshot.plans_generated, 5, "riding along now");
    }

    #[test]
    fn plan_mutation_forces_terminal_step_and_highlights() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let now = Instant::now();

        save_state(&app.state_path, &workspace_with(0, 0, 0)).expect("seed");
        app.bootstrap(now);

        std::fs::write(&app.plan_path, "Algebra today, Algebra tomorrow").expect("plan");
        app.on_plan_mutation();

        assert_eq!(app.step, TimelineStep::PlanDelivered);
        assert_eq!(app.status, STATUS_PLAN_GENERATED);
        let algebra = app
            .highlights
            .iter()
            .find(|h| h.term == "Algebra")
            .expect("entry");
        assert_eq!(algebra.score, 1.0);

        // The next poll recomputes the step from counts.
        save_state(&app.state_path, &workspace_with(1, 0, 0)).expect("update");
        app.on_poll(now);
        assert_eq!(app.step, TimelineStep::SyllabusLoaded);
    }

    #[test]
    fn export_status_settles_back_after_the_delay() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let now = Instant::now();

        app.trigger_export(now);
        assert_eq!(app.status, STATUS_PREPARING_EXPORT);

        app.on_frame(now + EXPORT_SETTLE - Duration::from_millis(1));
        assert_eq!(app.status, STATUS_PREPARING_EXPORT);

        app.on_frame(now + EXPORT_SETTLE);
        assert_eq!(app.status, STATUS_EXPORT_READY);
    }

    #[test]
    fn unreadable_state_keeps_last_good_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let now = Instant::now();

        save_state(&app.state_path, &workspace_with(2, 1, 0)).expect("seed");
        app.bootstrap(now);
        assert_eq!(app.snapshot.syllabi, 2);

        std::fs::write(&app.state_path, "{ not json").expect("corrupt");
        app.on_poll(now);
        assert_eq!(app.snapshot.syllabi, 2);
        assert!(app.last_error.is_some());
    }

    #[test]
    fn charts_are_created_once_and_updated_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = app_in(dir.path());
        let now = Instant::now();

        save_state(&app.state_path, &workspace_with(1, 2, 0)).expect("seed");
        app.bootstrap(now);
        let charts = app.charts.as_ref().expect("charts");
        assert_eq!(charts.proportion.data(), &[1, 4]);
        assert_eq!(charts.trend.data(), &[2, 1, 0, 0]);

        save_state(&app.state_path, &workspace_with(3, 2, 0)).expect("update");
        app.on_poll(now);
        let charts = app.charts.as_ref().expect("charts");
        assert_eq!(charts.proportion.data(), &[3, 2]);
    }
}
