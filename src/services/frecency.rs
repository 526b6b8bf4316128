//! Frecency-based scoring for history-backed candidates.
//!
//! Frecency combines frequency (how often) and recency (how recently) with an
//! exponential decay:
//!
//! ```text
//! score = count × weight × decay_factor
//! decay_factor = e^(-λ × age_days)
//! λ = ln(2) / half_life_days
//! ```
//!
//! With the default 30-day half-life, a page last visited 30 days ago counts
//! half as much as one visited just now.

use crate::config::FrecencyConfig;
use crate::core::candidate::{Candidate, CandidateKind};

pub const MS_PER_DAY: f64 = 86_400_000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Decay factor for an item last used `age_days` ago.
pub fn decay_factor(age_days: f64, half_life_days: f64) -> f64 {
    let lambda = std::f64::consts::LN_2 / half_life_days;
    (-lambda * age_days).exp()
}

/// Age in days between two epoch-millisecond timestamps.
///
/// Timestamps in the future count as age zero.
pub fn age_days(now_ms: f64, then_ms: f64) -> f64 {
    ((now_ms - then_ms) / MS_PER_DAY).max(0.0)
}

fn decayed(count: u32, weight: f64, last: Option<f64>, now_ms: f64, half_life_days: f64) -> f64 {
    let Some(last) = last else {
        return 0.0;
    };

    count as f64 * weight * decay_factor(age_days(now_ms, last), half_life_days)
}

/// Decayed frecency term for a candidate at `now_ms`.
///
/// Only navigation, history and bookmark candidates carry visit data; every
/// other kind scores 0.
pub fn frecency_score(candidate: &Candidate, now_ms: f64, cfg: &FrecencyConfig) -> f64 {
    match &candidate.kind {
        CandidateKind::Navigation {
            visit_count,
            last_visit,
            ..
        } => decayed(
            *visit_count,
            cfg.navigation_visit_weight,
            *last_visit,
            now_ms,
            cfg.half_life_days,
        ),
        CandidateKind::History(visits) | CandidateKind::Bookmark(visits) => decayed(
            visits.freq,
            cfg.page_freq_weight,
            visits.last,
            now_ms,
            cfg.half_life_days,
        ),
        _ => 0.0,
    }
}

/// Flat bonus for a navigation candidate visited within the recent window.
pub fn recent_visit_bonus(candidate: &Candidate, now_ms: f64, cfg: &FrecencyConfig) -> f64 {
    let CandidateKind::Navigation {
        last_visit: Some(last),
        ..
    } = &candidate.kind
    else {
        return 0.0;
    };

    if now_ms - last < cfg.recent_visit_window_hours * MS_PER_HOUR {
        cfg.recent_visit_bonus
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidate::PageVisits;

    const NOW: f64 = 1_700_000_000_000.0;

    fn navigation(visit_count: u32, last_visit: Option<f64>) -> Candidate {
        let mut candidate = Candidate::navigation("example.com", false);
        if let CandidateKind::Navigation {
            visit_count: v,
            last_visit: l,
            ..
        } = &mut candidate.kind
        {
            *v = visit_count;
            *l = last_visit;
        }
        candidate
    }

    #[test]
    fn test_decay_factor_half_life() {
        assert!((decay_factor(0.0, 30.0) - 1.0).abs() < 1e-12);
        assert!((decay_factor(30.0, 30.0) - 0.5).abs() < 1e-12);
        assert!((decay_factor(60.0, 30.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_age_days_clamps_future() {
        assert_eq!(age_days(NOW, NOW + MS_PER_DAY), 0.0);
        assert!((age_days(NOW, NOW - 2.0 * MS_PER_DAY) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_navigation_half_life() {
        let cfg = FrecencyConfig::default();
        let fresh = frecency_score(&navigation(10, Some(NOW)), NOW, &cfg);
        let old = frecency_score(
            &navigation(10, Some(NOW - cfg.half_life_days * MS_PER_DAY)),
            NOW,
            &cfg,
        );

        assert!((fresh - 100.0).abs() < 1e-9);
        assert!((old - fresh / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_navigation_recent_window() {
        let cfg = FrecencyConfig::default();
        let inside = navigation(0, Some(NOW - 23.0 * MS_PER_HOUR));
        let outside = navigation(0, Some(NOW - 25.0 * MS_PER_HOUR));

        assert_eq!(recent_visit_bonus(&inside, NOW, &cfg), 500.0);
        assert_eq!(recent_visit_bonus(&outside, NOW, &cfg), 0.0);
        assert_eq!(recent_visit_bonus(&navigation(3, None), NOW, &cfg), 0.0);

        let tab = Candidate::tab("Docs", "https://docs.rs");
        assert_eq!(recent_visit_bonus(&tab, NOW, &cfg), 0.0);
    }

    #[test]
    fn test_missing_last_visit_scores_zero() {
        let cfg = FrecencyConfig::default();
        assert_eq!(frecency_score(&navigation(50, None), NOW, &cfg), 0.0);
    }

    #[test]
    fn test_history_and_bookmark() {
        let cfg = FrecencyConfig::default();
        let visits = PageVisits {
            freq: 3,
            last: Some(NOW),
        };

        let history = Candidate::new(CandidateKind::History(visits), "Docs");
        let bookmark = Candidate::new(CandidateKind::Bookmark(visits), "Docs");

        assert!((frecency_score(&history, NOW, &cfg) - 300.0).abs() < 1e-9);
        assert!((frecency_score(&bookmark, NOW, &cfg) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_other_kinds_score_zero() {
        let cfg = FrecencyConfig::default();
        let tab = Candidate::tab("Docs", "https://docs.rs");
        let ai = Candidate::new(CandidateKind::Ai, "Ask");

        assert_eq!(frecency_score(&tab, NOW, &cfg), 0.0);
        assert_eq!(frecency_score(&ai, NOW, &cfg), 0.0);
    }
}
