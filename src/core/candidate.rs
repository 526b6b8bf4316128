//! Candidate types consumed by the ranker.
//!
//! Connectors (tabs, history, bookmarks, quick answers, ...) hand candidates
//! over as flat camelCase JSON records distinguished by a `type` string. They
//! are decoded once into [`Candidate`], whose [`CandidateKind`] carries only
//! the fields that matter for that variant.

use serde::{Deserialize, Serialize};

use crate::error::RankResult;

/// Locally computed utility results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAnswerKind {
    Calculator,
    Converter,
    Time,
    Color,
    Qr,
    Password,
    Hash,
    UrlShorten,
    IpLookup,
    Lorem,
    CoinFlip,
    RollDie,
    RandomNumber,
    UserAgent,
    Base64Encode,
    Base64Decode,
}

impl QuickAnswerKind {
    pub const ALL: [QuickAnswerKind; 16] = [
        QuickAnswerKind::Calculator,
        QuickAnswerKind::Converter,
        QuickAnswerKind::Time,
        QuickAnswerKind::Color,
        QuickAnswerKind::Qr,
        QuickAnswerKind::Password,
        QuickAnswerKind::Hash,
        QuickAnswerKind::UrlShorten,
        QuickAnswerKind::IpLookup,
        QuickAnswerKind::Lorem,
        QuickAnswerKind::CoinFlip,
        QuickAnswerKind::RollDie,
        QuickAnswerKind::RandomNumber,
        QuickAnswerKind::UserAgent,
        QuickAnswerKind::Base64Encode,
        QuickAnswerKind::Base64Decode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickAnswerKind::Calculator => "calculator",
            QuickAnswerKind::Converter => "converter",
            QuickAnswerKind::Time => "time",
            QuickAnswerKind::Color => "color",
            QuickAnswerKind::Qr => "qr",
            QuickAnswerKind::Password => "password",
            QuickAnswerKind::Hash => "hash",
            QuickAnswerKind::UrlShorten => "url_shorten",
            QuickAnswerKind::IpLookup => "ip_lookup",
            QuickAnswerKind::Lorem => "lorem",
            QuickAnswerKind::CoinFlip => "coin_flip",
            QuickAnswerKind::RollDie => "roll_die",
            QuickAnswerKind::RandomNumber => "random_number",
            QuickAnswerKind::UserAgent => "user_agent",
            QuickAnswerKind::Base64Encode => "base64_encode",
            QuickAnswerKind::Base64Decode => "base64_decode",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// Frequency and last-use timestamp of a history entry or bookmark.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageVisits {
    pub freq: u32,
    /// Epoch milliseconds.
    pub last: Option<f64>,
}

/// Variant-specific part of a candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateKind {
    /// An open browser tab
    Tab {
        pinned: bool,
        /// Epoch milliseconds.
        last_accessed: Option<f64>,
    },

    /// A domain suggestion built from history, possibly the autofill completion
    Navigation {
        domain: String,
        autofill: bool,
        /// Number of open tabs on this domain
        open_count: u32,
        visit_count: u32,
        /// Epoch milliseconds.
        last_visit: Option<f64>,
    },

    History(PageVisits),

    Bookmark(PageVisits),

    /// A remote query completion
    Suggestion { remote_rank: u32 },

    /// A literal web-search action
    Google,

    /// Open the assistant with the query
    Ai,

    AppSearch,

    QuickAnswer(QuickAnswerKind),

    /// Any `type` string not known to the ranker
    Remote(String),
}

impl CandidateKind {
    /// The wire `type` string.
    pub fn type_name(&self) -> &str {
        match self {
            CandidateKind::Tab { .. } => "tab",
            CandidateKind::Navigation { .. } => "navigation",
            CandidateKind::History(_) => "history",
            CandidateKind::Bookmark(_) => "bookmark",
            CandidateKind::Suggestion { .. } => "suggestion",
            CandidateKind::Google => "google",
            CandidateKind::Ai => "ai",
            CandidateKind::AppSearch => "app_search",
            CandidateKind::QuickAnswer(kind) => kind.as_str(),
            CandidateKind::Remote(name) => name,
        }
    }

    pub fn is_quick_answer(&self) -> bool {
        matches!(self, CandidateKind::QuickAnswer(_))
    }
}

/// One actionable suggestion eligible for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCandidate", into = "RawCandidate")]
pub struct Candidate {
    pub kind: CandidateKind,
    pub title: String,
    /// Secondary display string used by quick answers and suggestions.
    pub text: String,
    pub url: String,
    pub description: Option<String>,
    pub recently_visited: bool,
    pub recently_searched: bool,
}

impl Candidate {
    pub fn new(kind: CandidateKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            text: String::new(),
            url: String::new(),
            description: None,
            recently_visited: false,
            recently_searched: false,
        }
    }

    pub fn tab(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            CandidateKind::Tab {
                pinned: false,
                last_accessed: None,
            },
            title,
        )
        .with_url(url)
    }

    pub fn navigation(domain: impl Into<String>, autofill: bool) -> Self {
        let domain = domain.into();
        Self::new(
            CandidateKind::Navigation {
                domain: domain.clone(),
                autofill,
                open_count: 0,
                visit_count: 0,
                last_visit: None,
            },
            domain.clone(),
        )
        .with_url(format!("https://{}", domain))
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Title when present, otherwise the secondary text.
    pub fn display_text(&self) -> &str {
        if self.title.is_empty() {
            &self.text
        } else {
            &self.title
        }
    }

    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    /// Whether the candidate carries a non-empty description.
    pub fn is_rich(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Decode a JSON array of candidates.
///
/// Elements that do not decode (wrong field types, not an object) are
/// skipped with a warning; only a malformed array is an error.
pub fn parse_candidates(json: &str) -> RankResult<Vec<Candidate>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut candidates = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Candidate>(value) {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed candidate"),
        }
    }

    Ok(candidates)
}

/// Flat record exchanged with connectors and the UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCandidate {
    #[serde(rename = "type")]
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_accessed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    autofill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_count: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visit_count: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_visit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    freq: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recently_visited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recently_searched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_rank: Option<f64>,
}

/// Counts arrive as JSON numbers; negative, fractional or NaN values collapse
/// into a sane integer.
fn count(value: Option<f64>) -> u32 {
    value.map(|v| v.max(0.0) as u32).unwrap_or(0)
}

/// Host part of a URL, without scheme, port or path.
fn host_of(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    host.split(':').next().unwrap_or("").to_lowercase()
}

impl From<RawCandidate> for Candidate {
    fn from(raw: RawCandidate) -> Self {
        let url = raw.url.unwrap_or_default();

        let kind = match raw.kind.as_str() {
            "tab" => CandidateKind::Tab {
                pinned: raw.pinned.unwrap_or(false),
                last_accessed: raw.last_accessed,
            },
            "navigation" => CandidateKind::Navigation {
                domain: raw
                    .domain
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| host_of(&url)),
                autofill: raw.autofill.unwrap_or(false),
                open_count: count(raw.open_count),
                visit_count: count(raw.visit_count),
                last_visit: raw.last_visit,
            },
            "history" => CandidateKind::History(PageVisits {
                freq: count(raw.freq),
                last: raw.last,
            }),
            "bookmark" => CandidateKind::Bookmark(PageVisits {
                freq: count(raw.freq),
                last: raw.last,
            }),
            "suggestion" => CandidateKind::Suggestion {
                remote_rank: count(raw.remote_rank),
            },
            "google" => CandidateKind::Google,
            "ai" => CandidateKind::Ai,
            "app_search" => CandidateKind::AppSearch,
            other => match QuickAnswerKind::parse(other) {
                Some(kind) => CandidateKind::QuickAnswer(kind),
                None => CandidateKind::Remote(other.to_string()),
            },
        };

        Self {
            kind,
            title: raw.title.unwrap_or_default(),
            text: raw.text.unwrap_or_default(),
            url,
            description: raw.description,
            recently_visited: raw.recently_visited.unwrap_or(false),
            recently_searched: raw.recently_searched.unwrap_or(false),
        }
    }
}

impl From<Candidate> for RawCandidate {
    fn from(candidate: Candidate) -> Self {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        let mut raw = RawCandidate {
            kind: candidate.kind.type_name().to_string(),
            title: non_empty(candidate.title),
            text: non_empty(candidate.text),
            url: non_empty(candidate.url),
            description: candidate.description,
            recently_visited: candidate.recently_visited.then_some(true),
            recently_searched: candidate.recently_searched.then_some(true),
            ..RawCandidate::default()
        };

        match candidate.kind {
            CandidateKind::Tab {
                pinned,
                last_accessed,
            } => {
                raw.pinned = Some(pinned);
                raw.last_accessed = last_accessed;
            }
            CandidateKind::Navigation {
                domain,
                autofill,
                open_count,
                visit_count,
                last_visit,
            } => {
                raw.domain = Some(domain);
                raw.autofill = Some(autofill);
                raw.open_count = Some(open_count as f64);
                raw.visit_count = Some(visit_count as f64);
                raw.last_visit = last_visit;
            }
            CandidateKind::History(visits) | CandidateKind::Bookmark(visits) => {
                raw.freq = Some(visits.freq as f64);
                raw.last = visits.last;
            }
            CandidateKind::Suggestion { remote_rank } => {
                raw.remote_rank = Some(remote_rank as f64);
            }
            CandidateKind::Google
            | CandidateKind::Ai
            | CandidateKind::AppSearch
            | CandidateKind::QuickAnswer(_)
            | CandidateKind::Remote(_) => {}
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tab() {
        let json = r#"{"type":"tab","title":"GitHub","url":"https://github.com/foo","pinned":true,"lastAccessed":1700000000000}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();

        assert_eq!(candidate.title, "GitHub");
        assert_eq!(
            candidate.kind,
            CandidateKind::Tab {
                pinned: true,
                last_accessed: Some(1_700_000_000_000.0),
            }
        );
    }

    #[test]
    fn test_decode_quick_answer_and_unknown() {
        let calc: Candidate = serde_json::from_str(r#"{"type":"calculator","text":"2+2"}"#).unwrap();
        assert_eq!(calc.kind, CandidateKind::QuickAnswer(QuickAnswerKind::Calculator));
        assert_eq!(calc.display_text(), "2+2");

        let other: Candidate = serde_json::from_str(r#"{"type":"docs","title":"MDN"}"#).unwrap();
        assert_eq!(other.kind, CandidateKind::Remote("docs".to_string()));
        assert_eq!(other.type_name(), "docs");
    }

    #[test]
    fn test_missing_fields_default() {
        let candidate: Candidate = serde_json::from_str(r#"{"type":"history"}"#).unwrap();
        assert_eq!(candidate.display_text(), "");
        assert_eq!(candidate.url, "");
        assert_eq!(
            candidate.kind,
            CandidateKind::History(PageVisits { freq: 0, last: None })
        );

        let nothing: Candidate = serde_json::from_str("{}").unwrap();
        assert_eq!(nothing.kind, CandidateKind::Remote(String::new()));
    }

    #[test]
    fn test_navigation_domain_falls_back_to_url_host() {
        let json = r#"{"type":"navigation","url":"https://www.Example.com:8080/path?q=1","visitCount":3.7}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();

        match candidate.kind {
            CandidateKind::Navigation {
                domain,
                visit_count,
                ..
            } => {
                assert_eq!(domain, "www.example.com");
                assert_eq!(visit_count, 3);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let json = r#"{"type":"suggestion","title":"rust","remoteRank":-4}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.kind, CandidateKind::Suggestion { remote_rank: 0 });
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let mut candidate = Candidate::navigation("example.com", true);
        candidate.recently_visited = true;

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["type"], "navigation");
        assert_eq!(value["domain"], "example.com");
        assert_eq!(value["autofill"], true);
        assert_eq!(value["recentlyVisited"], true);
        assert!(value.get("recentlySearched").is_none());
    }

    #[test]
    fn test_parse_candidates_skips_malformed() {
        let json = r#"[
            {"type":"tab","title":"Docs","url":"https://docs.rs"},
            {"type":"tab","title":42},
            "not an object",
            {"type":"ai","title":"Ask AI"}
        ]"#;

        let candidates = parse_candidates(json).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].type_name(), "tab");
        assert_eq!(candidates[1].type_name(), "ai");
    }

    #[test]
    fn test_parse_candidates_rejects_non_array() {
        assert!(parse_candidates("{\"type\":\"tab\"}").is_err());
    }

    #[test]
    fn test_quick_answer_names_roundtrip() {
        for kind in QuickAnswerKind::ALL {
            assert_eq!(QuickAnswerKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(QuickAnswerKind::parse("tab"), None);
    }
}
