/// The fixed curriculum vocabulary the derivation pipeline scans for. The
/// scores are a heuristic visualization, not an analytic result.
pub const VOCABULARY: [&str; 6] = [
    "Fractions",
    "Algebra",
    "Decimals",
    "Review",
    "Homework",
    "Project",
];

/// Weight applied per occurrence before capping at 1.0.
pub const OCCURRENCE_WEIGHT: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightEntry {
    pub term: &'static str,
    pub score: f64,
}

impl HighlightEntry {
    pub fn percent(&self) -> u16 {
        (self.score * 100.0).round() as u16
    }

    /// A term that appears at all renders "hot" (the red badge treatment).
    pub fn is_hot(&self) -> bool {
        self.score > 0.0
    }
}

/// Scores every vocabulary term against `text` and returns the full set in
/// vocabulary order. Callers replace their previous set wholesale; nothing
/// is merged or carried over between runs.
pub fn derive_highlights(text: &str) -> Vec<HighlightEntry> {
    VOCABULARY
        .iter()
        .map(|term| {
            let occurrences = text.matches(term).count();
            HighlightEntry {
                term,
                score: (occurrences as f64 * OCCURRENCE_WEIGHT).min(1.0),
            }
        })
        .collect()
}
