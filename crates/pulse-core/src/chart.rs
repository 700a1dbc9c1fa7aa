use crate::progress::VISUAL_BASELINE;

/// Proportion series for the syllabus chart: uploaded vs. still missing
/// against the visual baseline.
pub fn proportion_series(count: u64) -> [u64; 2] {
    [count, VISUAL_BASELINE.saturating_sub(count)]
}

/// Four-point trend series for the tests chart. A synthetic shape derived
/// from the current count, not real history.
pub fn trend_series(count: u64) -> [u64; 4] {
    [
        count,
        count.saturating_sub(1),
        count.saturating_sub(2),
        count.saturating_sub(3),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Proportion,
    Trend,
}

/// A live chart model. Built once on the first render trigger and mutated
/// in place by every later trigger; the deck never rebuilds one while the
/// session is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartModel {
    kind: ChartKind,
    data: Vec<u64>,
}

impl ChartModel {
    pub fn proportion(count: u64) -> Self {
        Self {
            kind: ChartKind::Proportion,
            data: proportion_series(count).to_vec(),
        }
    }

    pub fn trend(count: u64) -> Self {
        Self {
            kind: ChartKind::Trend,
            data: trend_series(count).to_vec(),
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn data(&self) -> &[u64] {
        &self.data
    }

    /// Recomputes the series from `count` without reallocating the model.
    pub fn update(&mut self, count: u64) {
        self.data.clear();
        match self.kind {
            ChartKind::Proportion => self.data.extend(proportion_series(count)),
            ChartKind::Trend => self.data.extend(trend_series(count)),
        }
    }
}
