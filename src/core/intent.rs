//! Keyword/regex intent detection.
//!
//! Detects what the user most likely wants from the query alone. Only an
//! explicit `ai` prefix counts as an assistant intent; plain questions are
//! handled separately by [`looks_like_question`].

use once_cell::sync::Lazy;
use regex::Regex;

use super::candidate::{Candidate, CandidateKind, QuickAnswerKind};
use super::query::QueryContext;
use crate::config::IntentConfig;

/// What the query asks for, if anything specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Ai,
    Calc,
    Convert,
    Time,
    Setting,
}

static AI_PREFIX: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^ai(?:\s|:|/|$)").ok());

static MATH_EXPR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[\d\s.,()+\-*/^%×÷]+$").ok());

static MATH_FUNC: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(?:=|calc\b|(?:sqrt|sin|cos|tan|log|ln|abs)\s*\()").ok());

static CONVERSION: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"^-?\d+(?:[.,]\d+)?\s*[a-z°µ$€£"']+\s+(?:to|in|as)\s+[a-z°µ$€£"']+$"#).ok()
});

static TIME_QUERY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"^(?:what(?:'s| is)?\s+(?:the\s+)?)?(?:current\s+)?time\b|\btime\s+(?:in|at|zone)\b|^(?:utc|gmt)(?:\s*[+-]\s*\d{1,2})?$",
    )
    .ok()
});

static SETTING_QUERY: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(?:settings?|preferences|prefs|options|extensions|flags|passwords|privacy|cookies)\b")
        .ok()
});

/// URL prefixes of browser-internal pages (settings, extensions, flags).
const INTERNAL_SCHEMES: &[&str] = &[
    "chrome://",
    "edge://",
    "brave://",
    "opera://",
    "vivaldi://",
    "about:",
];

fn matches(re: &Lazy<Option<Regex>>, text: &str) -> bool {
    match Lazy::force(re) {
        Some(re) => re.is_match(text),
        None => false,
    }
}

fn is_math(query: &str) -> bool {
    if matches(&MATH_FUNC, query) {
        return true;
    }

    // Needs an operator after the first character so "-5" or "42" alone
    // do not count as arithmetic.
    matches(&MATH_EXPR, query)
        && query.chars().any(|c| c.is_ascii_digit())
        && query
            .chars()
            .skip(1)
            .any(|c| matches!(c, '+' | '-' | '*' | '/' | '^' | '%' | '×' | '÷'))
}

/// Detect the query's intent.
pub fn detect_intent(ctx: &QueryContext) -> Option<Intent> {
    let q = ctx.query_lower.as_str();
    if q.is_empty() {
        return None;
    }

    if matches(&AI_PREFIX, q) {
        Some(Intent::Ai)
    } else if matches(&CONVERSION, q) {
        Some(Intent::Convert)
    } else if is_math(q) {
        Some(Intent::Calc)
    } else if matches(&TIME_QUERY, q) {
        Some(Intent::Time)
    } else if matches(&SETTING_QUERY, q) {
        Some(Intent::Setting)
    } else {
        None
    }
}

/// Natural-language question: ends with `?`, or is long in words or characters.
pub fn looks_like_question(ctx: &QueryContext, cfg: &IntentConfig) -> bool {
    !ctx.is_blank()
        && (ctx.query_lower.ends_with('?')
            || ctx.word_count() >= cfg.question_min_words
            || ctx.char_count() >= cfg.question_min_chars)
}

/// Bonus for a candidate whose kind serves the detected intent.
pub fn intent_bonus(candidate: &Candidate, intent: Option<Intent>, cfg: &IntentConfig) -> f64 {
    let Some(intent) = intent else {
        return 0.0;
    };

    match (intent, &candidate.kind) {
        (Intent::Ai, CandidateKind::Ai) => cfg.ai,
        (Intent::Calc, CandidateKind::QuickAnswer(QuickAnswerKind::Calculator)) => cfg.calc,
        (Intent::Convert, CandidateKind::QuickAnswer(QuickAnswerKind::Converter)) => cfg.convert,
        (Intent::Time, CandidateKind::QuickAnswer(QuickAnswerKind::Time)) => cfg.time,
        (Intent::Setting, _) if is_internal_page(&candidate.url) => cfg.setting,
        _ => 0.0,
    }
}

fn is_internal_page(url: &str) -> bool {
    let url = url.to_lowercase();
    INTERNAL_SCHEMES.iter().any(|s| url.starts_with(s))
}

/// Bonus for assistant candidates when the query reads like a question.
pub fn question_bonus(candidate: &Candidate, is_question: bool, cfg: &IntentConfig) -> f64 {
    if is_question && matches!(candidate.kind, CandidateKind::Ai) {
        cfg.question_bonus
    } else {
        0.0
    }
}
