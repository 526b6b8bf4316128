//! Lexical match scoring.
//!
//! Three strategies, picked by candidate kind:
//!
//! - tabs: strict equality/prefix on title, URL or scheme-stripped URL
//! - navigation: prefix of the `www.`-stripped domain
//! - everything else: fuzzy similarity blended with word overlap
//!
//! All inputs are compared case-insensitively. Empty strings never panic;
//! they simply produce zero similarity.

use std::collections::HashSet;

use super::candidate::Candidate;
use super::query::{strip_url_prefix, strip_www, tokenize, QueryContext};
use crate::config::MatchConfig;

/// Strict tab match: exact match on any representation scores `cfg.exact`,
/// a prefix match scores `cfg.tab_prefix`, anything else is 0.
///
/// There is no containment or fuzzy fallback; switching to the wrong tab
/// costs more than not offering it.
pub fn strict_tab_match(title: &str, url: &str, ctx: &QueryContext, cfg: &MatchConfig) -> f64 {
    let q = ctx.query_lower.as_str();
    if q.is_empty() {
        return 0.0;
    }

    let title = title.to_lowercase();
    let url = url.to_lowercase();
    let bare_url = strip_url_prefix(&url);
    let forms = [title.as_str(), url.as_str(), bare_url];

    if forms.iter().any(|f| *f == q) {
        cfg.exact
    } else if forms.iter().any(|f| f.starts_with(q)) {
        cfg.tab_prefix
    } else {
        0.0
    }
}

/// 1.0 when the `www.`-stripped domain starts with the `www.`-stripped query.
pub fn domain_prefix_match(domain: &str, ctx: &QueryContext) -> f64 {
    let q = ctx.query_host.as_str();
    if q.is_empty() {
        return 0.0;
    }

    let domain = domain.to_lowercase();
    if strip_www(&domain).starts_with(q) {
        1.0
    } else {
        0.0
    }
}

/// Fuzzy similarity in `[0, 1]` between `text` and the lowercase query.
pub fn fuzzy(text: &str, query_lower: &str, cfg: &MatchConfig) -> f64 {
    if query_lower.is_empty() {
        return 0.0;
    }

    let text = text.to_lowercase();
    if text == query_lower {
        return cfg.exact;
    }
    if text.starts_with(query_lower) {
        return cfg.prefix;
    }
    if text.contains(query_lower) {
        return cfg.contains;
    }

    strsim::normalized_levenshtein(&text, query_lower)
}

/// Fraction of query tokens that also appear as a token of `text`.
pub fn overlap(text: &str, query_tokens: &[String]) -> f64 {
    if query_tokens.is_empty() {
        return 0.0;
    }

    let words: HashSet<String> = tokenize(text).into_iter().collect();
    let hits = query_tokens.iter().filter(|t| words.contains(*t)).count();
    hits as f64 / query_tokens.len() as f64
}

/// Fuzzy and overlap components for a non-tab, non-navigation candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LexicalMatch {
    pub fuzzy: f64,
    pub overlap: f64,
}

impl LexicalMatch {
    /// Score contribution: `fuzzy * fuzzy_weight + overlap * overlap_weight`.
    pub fn contribution(&self, cfg: &MatchConfig) -> f64 {
        self.fuzzy * cfg.fuzzy_weight + self.overlap * cfg.overlap_weight
    }
}

/// Best fuzzy similarity over display text and URL, with word overlap
/// measured against both.
pub fn lexical_match(candidate: &Candidate, ctx: &QueryContext, cfg: &MatchConfig) -> LexicalMatch {
    let display = candidate.display_text();
    let fuzzy_score = fuzzy(display, &ctx.query_lower, cfg)
        .max(fuzzy(&candidate.url, &ctx.query_lower, cfg));

    let haystack = format!("{} {}", display, candidate.url);

    LexicalMatch {
        fuzzy: fuzzy_score,
        overlap: overlap(&haystack, &ctx.tokens),
    }
}
