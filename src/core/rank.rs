//! Composite ranker.
//!
//! Every surviving candidate gets an additive score built from independent
//! per-candidate terms (see [`ScoreBreakdown`]). Candidates that fail a hard
//! match rule are dropped before scoring. The rest are sorted best-first and
//! capped at `max_results`.
//!
//! The wall clock is read once per [`RankingEngine::rank`] call; every
//! time-dependent term uses that single `now`, so a fixed input set ranks
//! identically on repeated calls.

use serde::Serialize;
use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use super::candidate::{Candidate, CandidateKind};
use super::intent::{self, Intent};
use super::matching::{domain_prefix_match, lexical_match, strict_tab_match};
use super::query::QueryContext;
use crate::config::{CategoryWeights, Config, RankingConfig};
use crate::services::adaptive::AdaptiveStore;
use crate::services::frecency;

/// Individual score terms. The total score is their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base: f64,
    pub matched: f64,
    pub question: f64,
    pub intent: f64,
    pub frecency: f64,
    pub recent_visit: f64,
    pub rich: f64,
    pub pinned: f64,
    pub open_domain: f64,
    pub adaptive: f64,
    pub remote_penalty: f64,
    pub recency: f64,
    pub autofill: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.base
            + self.matched
            + self.question
            + self.intent
            + self.frecency
            + self.recent_visit
            + self.rich
            + self.pinned
            + self.open_domain
            + self.adaptive
            + self.remote_penalty
            + self.recency
            + self.autofill
    }

    /// Replace non-finite terms with 0 so one bad input cannot poison the sum.
    fn sanitized(mut self) -> Self {
        for term in [
            &mut self.base,
            &mut self.matched,
            &mut self.question,
            &mut self.intent,
            &mut self.frecency,
            &mut self.recent_visit,
            &mut self.rich,
            &mut self.pinned,
            &mut self.open_domain,
            &mut self.adaptive,
            &mut self.remote_penalty,
            &mut self.recency,
            &mut self.autofill,
        ] {
            if !term.is_finite() {
                tracing::debug!(value = *term, "Dropping non-finite score term");
                *term = 0.0;
            }
        }
        self
    }
}

/// A candidate with its score attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub score: f64,
    #[serde(rename = "_debug")]
    pub debug: ScoreBreakdown,
}

impl RankedCandidate {
    fn is_autofill(&self) -> bool {
        matches!(
            self.candidate.kind,
            CandidateKind::Navigation { autofill: true, .. }
        )
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Base weight for a candidate's category.
pub fn base_weight(kind: &CandidateKind, weights: &CategoryWeights) -> f64 {
    match kind {
        CandidateKind::QuickAnswer(_) => weights.quick_answer,
        CandidateKind::AppSearch => weights.app_search,
        CandidateKind::Navigation { .. } => weights.navigation,
        CandidateKind::Google => weights.google,
        CandidateKind::Tab { pinned: true, .. } => weights.pinned_tab,
        CandidateKind::Ai => weights.ai,
        CandidateKind::Tab { pinned: false, .. } => weights.tab,
        CandidateKind::History(_) => weights.history,
        CandidateKind::Bookmark(_) => weights.bookmark,
        CandidateKind::Suggestion { .. } => weights.suggestion,
        CandidateKind::Remote(_) => weights.remote,
    }
}

/// Per-call values shared by every candidate in one ranking pass.
struct RankPass<'a> {
    ctx: QueryContext<'a>,
    intent: Option<Intent>,
    is_question: bool,
    now_ms: f64,
}

/// Ranking entry point: configuration plus the adaptive store.
#[derive(Debug, Clone)]
pub struct RankingEngine {
    config: RankingConfig,
    store: AdaptiveStore,
}

impl RankingEngine {
    pub fn new(config: RankingConfig, store: AdaptiveStore) -> Self {
        Self { config, store }
    }

    /// Build an engine from file config, loading the adaptive store from its
    /// configured location.
    pub fn from_config(config: &Config) -> Self {
        let ranking = config.ranking.clone();
        let store = AdaptiveStore::load(config.adaptive_path(), ranking.adaptive.clone());
        Self::new(ranking, store)
    }

    /// Engine with default constants and a store that never touches disk.
    pub fn in_memory() -> Self {
        let config = RankingConfig::default();
        let store = AdaptiveStore::in_memory(config.adaptive.clone());
        Self::new(config, store)
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn store(&self) -> &AdaptiveStore {
        &self.store
    }

    /// Rank `candidates` for `query` at the current time.
    pub fn rank(&self, candidates: &[Candidate], query: &str) -> Vec<RankedCandidate> {
        self.rank_at(candidates, query, now_ms())
    }

    /// Rank `candidates` for `query` at a fixed `now_ms`.
    pub fn rank_at(&self, candidates: &[Candidate], query: &str, now_ms: f64) -> Vec<RankedCandidate> {
        let ctx = QueryContext::new(query);

        let ranked = if ctx.is_blank() {
            self.rank_open_tabs(candidates)
        } else {
            let pass = RankPass {
                intent: intent::detect_intent(&ctx),
                is_question: intent::looks_like_question(&ctx, &self.config.intent),
                ctx,
                now_ms,
            };
            self.rank_matches(candidates, &pass)
        };

        tracing::debug!(
            query,
            candidates = candidates.len(),
            returned = ranked.len(),
            "Ranked candidates"
        );
        ranked
    }

    /// Record the user's pick so later queries with the same prefix favour
    /// its type.
    pub fn record_selection(&mut self, candidate: &Candidate, query: &str) {
        self.store.record_selection(candidate, query);
    }

    /// Blank query: open tabs only, pinned first, then most recently used.
    fn rank_open_tabs(&self, candidates: &[Candidate]) -> Vec<RankedCandidate> {
        let mut tabs: Vec<(&Candidate, bool, f64)> = candidates
            .iter()
            .filter_map(|c| match c.kind {
                CandidateKind::Tab {
                    pinned,
                    last_accessed,
                } => Some((c, pinned, last_accessed.unwrap_or(0.0))),
                _ => None,
            })
            .collect();

        tabs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.total_cmp(&a.2)));

        tabs.into_iter()
            .take(self.config.max_results)
            .map(|(c, _, _)| RankedCandidate {
                candidate: c.clone(),
                score: 0.0,
                debug: ScoreBreakdown::default(),
            })
            .collect()
    }

    fn rank_matches(&self, candidates: &[Candidate], pass: &RankPass) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .filter_map(|c| {
                let debug = self.score(c, pass)?.sanitized();
                Some(RankedCandidate {
                    candidate: c.clone(),
                    score: debug.total(),
                    debug,
                })
            })
            .collect();

        ranked.sort_by(compare_ranked);
        ranked.truncate(self.config.max_results);
        ranked
    }

    /// Score one candidate, or `None` if a hard match rule drops it.
    fn score(&self, candidate: &Candidate, pass: &RankPass) -> Option<ScoreBreakdown> {
        let cfg = &self.config;
        let ctx = &pass.ctx;

        let mut debug = ScoreBreakdown {
            base: base_weight(&candidate.kind, &cfg.weights),
            ..ScoreBreakdown::default()
        };

        match &candidate.kind {
            CandidateKind::Tab { pinned, .. } => {
                let m = strict_tab_match(&candidate.title, &candidate.url, ctx, &cfg.matching);
                if m <= 0.0 {
                    return None;
                }
                debug.matched = m * cfg.matching.tab_scale;
                if *pinned {
                    debug.pinned = cfg.boosts.pinned;
                }
            }
            CandidateKind::Navigation {
                domain,
                autofill,
                open_count,
                ..
            } => {
                let m = domain_prefix_match(domain, ctx);
                if m <= 0.0 {
                    return None;
                }
                if *autofill {
                    if m < 1.0 {
                        return None;
                    }
                    debug.matched = cfg.matching.autofill_match;
                    debug.autofill = cfg.boosts.autofill_priority;
                } else {
                    debug.matched = m * cfg.matching.navigation_scale;
                }
                debug.open_domain = *open_count as f64 * cfg.boosts.open_domain;
            }
            kind => {
                let lexical = lexical_match(candidate, ctx, &cfg.matching);
                let intent_driven = matches!(kind, CandidateKind::Ai) || kind.is_quick_answer();
                if lexical.fuzzy <= cfg.matching.prefilter_threshold && !intent_driven {
                    return None;
                }
                debug.matched = lexical.contribution(&cfg.matching);
            }
        }

        debug.question = intent::question_bonus(candidate, pass.is_question, &cfg.intent);
        debug.intent = intent::intent_bonus(candidate, pass.intent, &cfg.intent);
        debug.frecency = frecency::frecency_score(candidate, pass.now_ms, &cfg.frecency);
        debug.recent_visit = frecency::recent_visit_bonus(candidate, pass.now_ms, &cfg.frecency);

        if candidate.is_rich() {
            debug.rich = cfg.boosts.rich_result;
        }

        debug.adaptive = self
            .store
            .bonus(candidate, ctx.query)
            .min(cfg.adaptive.max_bonus);

        if let CandidateKind::Suggestion { remote_rank } = candidate.kind {
            debug.remote_penalty = -(remote_rank as f64) * cfg.boosts.remote_rank_penalty;
        }

        if candidate.recently_visited {
            debug.recency += cfg.boosts.recently_visited;
        }
        if candidate.recently_searched {
            debug.recency += cfg.boosts.recently_searched;
        }

        Some(debug)
    }
}

/// Autofill first, then total score, then frecency, then display text.
fn compare_ranked(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.is_autofill()
        .cmp(&a.is_autofill())
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| b.debug.frecency.total_cmp(&a.debug.frecency))
        .then_with(|| {
            a.candidate
                .display_text()
                .cmp(b.candidate.display_text())
        })
}
