/// Visual baseline the artifact bars fill against: five uploads reads as a
/// full bar.
pub const VISUAL_BASELINE: u64 = 5;

/// Percent fill for a syllabus/test bar, clamped to `[0, 100]`.
pub fn artifact_percent(count: usize) -> u16 {
    let pct = (count as f64 / VISUAL_BASELINE as f64) * 100.0;
    (pct.round() as u64).min(100) as u16
}

/// Percent fill for the plans bar. The generator frontend divided the
/// count by `max(1, count)`, so this collapses to 0% or 100%; kept for
/// behavioral parity (see DESIGN.md).
pub fn plans_percent(plans: u64) -> u16 {
    let pct = (plans as f64 / plans.max(1) as f64) * 100.0;
    (pct.round() as u64).min(100) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_percent_scales_against_baseline() {
        assert_eq!(artifact_percent(0), 0);
        assert_eq!(artifact_percent(1), 20);
        assert_eq!(artifact_percent(3), 60);
        assert_eq!(artifact_percent(5), 100);
    }

    #[test]
    fn artifact_percent_clamps_above_baseline() {
        assert_eq!(artifact_percent(6), 100);
        assert_eq!(artifact_percent(500), 100);
    }

    #[test]
    fn plans_percent_is_all_or_nothing() {
        assert_eq!(plans_percent(0), 0);
        assert_eq!(plans_percent(1), 100);
        assert_eq!(plans_percent(40), 100);
    }
}
