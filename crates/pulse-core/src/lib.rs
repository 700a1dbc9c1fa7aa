pub mod animate;
pub mod assistant;
pub mod chart;
pub mod detector;
pub mod highlight;
pub mod progress;
pub mod state;
pub mod timeline;

pub use animate::{AnimatedValue, CounterBank, CounterId, TWEEN_DURATION};
pub use assistant::{AssistantLog, ChatBubble, Sender, REPLY_DELAY, SCRIPTED_REPLY};
pub use chart::{proportion_series, trend_series, ChartKind, ChartModel};
pub use detector::{status_for_counts, ChangeDetector, PollChange, POLL_INTERVAL_MS};
pub use highlight::{derive_highlights, HighlightEntry, VOCABULARY};
pub use progress::{artifact_percent, plans_percent, VISUAL_BASELINE};
pub use state::{
    load_state, save_state, ArtifactRecord, StateError, StateSnapshot, WorkspaceState, DATA_DIR,
    PLAN_FILE, STATE_FILE,
};
pub use timeline::{step_for_counts, TimelineStep};
