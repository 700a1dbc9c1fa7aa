use crate::state::StateSnapshot;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Wall-clock length of one counter transition.
pub const TWEEN_DURATION: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy)]
struct Tween {
    start: i64,
    target: i64,
    started_at: Instant,
}

/// One displayed numeric indicator. `rendered` is what is currently on
/// screen; a retarget mid-flight reads it as the new start value, so there
/// is no queue and nothing to cancel.
#[derive(Debug, Clone, Copy)]
pub struct AnimatedValue {
    rendered: i64,
    tween: Option<Tween>,
}

impl AnimatedValue {
    pub fn new(initial: i64) -> Self {
        Self {
            rendered: initial,
            tween: None,
        }
    }

    pub fn rendered(&self) -> i64 {
        self.rendered
    }

    pub fn is_settled(&self) -> bool {
        self.tween.is_none()
    }

    pub fn retarget(&mut self, target: i64, now: Instant) {
        self.tween = Some(Tween {
            start: self.rendered,
            target,
            started_at: now,
        });
    }

    /// Advances the transition. Linear interpolation truncated toward
    /// zero; settles on exactly the target once progress reaches 1.
    pub fn tick(&mut self, now: Instant) -> i64 {
        if let Some(tween) = self.tween {
            let elapsed = now.saturating_duration_since(tween.started_at);
            let progress = elapsed.as_secs_f64() / TWEEN_DURATION.as_secs_f64();
            if progress >= 1.0 {
                self.rendered = tween.target;
                self.tween = None;
            } else {
                let span = (tween.target - tween.start) as f64;
                self.rendered = (tween.start as f64 + span * progress) as i64;
            }
        }
        self.rendered
    }
}

/// The six numeric indicators on the deck: the three stat tiles and the
/// three summary list counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterId {
    StatSyllabi,
    StatTests,
    StatPlans,
    ListSyllabi,
    ListTests,
    ListPlans,
}

impl CounterId {
    pub const ALL: [CounterId; 6] = [
        CounterId::StatSyllabi,
        CounterId::StatTests,
        CounterId::StatPlans,
        CounterId::ListSyllabi,
        CounterId::ListTests,
        CounterId::ListPlans,
    ];

    fn target_in(self, snapshot: &StateSnapshot) -> i64 {
        match self {
            CounterId::StatSyllabi | CounterId::ListSyllabi => snapshot.syllabi as i64,
            CounterId::StatTests | CounterId::ListTests => snapshot.tests as i64,
            CounterId::StatPlans | CounterId::ListPlans => snapshot.plans_generated as i64,
        }
    }
}

/// Session-lifetime registry of the animated indicators, owned by the deck
/// context rather than ambient module state.
#[derive(Debug)]
pub struct CounterBank {
    values: HashMap<CounterId, AnimatedValue>,
}

impl CounterBank {
    pub fn new() -> Self {
        let values = CounterId::ALL
            .iter()
            .map(|id| (*id, AnimatedValue::new(0)))
            .collect();
        Self { values }
    }

    pub fn value(&self, id: CounterId) -> i64 {
        self.values.get(&id).map(|v| v.rendered()).unwrap_or(0)
    }

    pub fn is_settled(&self) -> bool {
        self.values.values().all(AnimatedValue::is_settled)
    }

    /// Points every indicator at the counts in `snapshot`.
    pub fn retarget_counts(&mut self, snapshot: &StateSnapshot, now: Instant) {
        for id in CounterId::ALL {
            let target = id.target_in(snapshot);
            if let Some(value) = self.values.get_mut(&id) {
                value.retarget(target, now);
            }
        }
    }

    pub fn tick_all(&mut self, now: Instant) {
        for value in self.values.values_mut() {
            value.tick(now);
        }
    }
}

impl Default for CounterBank {
    fn default() -> Self {
        Self::new()
    }
}
