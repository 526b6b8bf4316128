//! Query context shared by the scorers.
//!
//! The raw query is normalized once per ranking pass so that every candidate
//! is compared against the same lowercase, trimmed and tokenized forms.

/// Context passed to every scoring function
#[derive(Debug, Clone)]
pub struct QueryContext<'a> {
    /// The full query string as typed
    pub query: &'a str,
    /// Query trimmed and converted to lowercase
    pub query_lower: String,
    /// Lowercase query without scheme and `www.`, for URL comparisons
    pub query_host: String,
    /// First word of the query (keyword)
    pub keyword: String,
    /// Text after the keyword (if any)
    pub remaining: Option<String>,
    /// Alphanumeric tokens of the lowercase query
    pub tokens: Vec<String>,
}

impl<'a> QueryContext<'a> {
    pub fn new(query: &'a str) -> Self {
        let query_lower = query.trim().to_lowercase();
        let query_host = strip_url_prefix(&query_lower).to_string();

        let mut parts = query_lower.splitn(2, char::is_whitespace);
        let keyword = parts.next().unwrap_or("").to_string();
        let remaining = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let tokens = tokenize(&query_lower);

        Self {
            query,
            query_lower,
            query_host,
            keyword,
            remaining,
            tokens,
        }
    }

    /// True when the query has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.query_lower.is_empty()
    }

    /// Check if query starts with any of the given prefixes
    pub fn starts_with_any(&self, prefixes: &[&str]) -> bool {
        prefixes.iter().any(|p| self.query_lower.starts_with(p))
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.query_lower.split_whitespace().count()
    }

    /// Length of the trimmed query in characters.
    pub fn char_count(&self) -> usize {
        self.query_lower.chars().count()
    }
}

/// Remove a leading URL scheme and `www.` from an already lowercase string.
pub fn strip_url_prefix(s: &str) -> &str {
    let rest = match s.find("://") {
        Some(idx) => &s[idx + 3..],
        None => s,
    };
    strip_www(rest)
}

pub fn strip_www(s: &str) -> &str {
    s.strip_prefix("www.").unwrap_or(s)
}

/// Split on anything that is not alphanumeric, dropping empty pieces.
pub fn tokenize(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_fields() {
        let ctx = QueryContext::new("  AI: What is Rust?  ");
        assert_eq!(ctx.query_lower, "ai: what is rust?");
        assert_eq!(ctx.keyword, "ai:");
        assert_eq!(ctx.remaining.as_deref(), Some("what is rust?"));
        assert_eq!(ctx.tokens, vec!["ai", "what", "is", "rust"]);
        assert_eq!(ctx.word_count(), 4);
    }

    #[test]
    fn test_blank_query() {
        let ctx = QueryContext::new("   ");
        assert!(ctx.is_blank());
        assert!(ctx.tokens.is_empty());
        assert_eq!(ctx.keyword, "");
        assert_eq!(ctx.remaining, None);
    }

    #[test]
    fn test_query_host_strips_scheme_and_www() {
        assert_eq!(QueryContext::new("https://www.Rust-lang.org").query_host, "rust-lang.org");
        assert_eq!(QueryContext::new("www.exa").query_host, "exa");
        assert_eq!(QueryContext::new("exam").query_host, "exam");
    }

    #[test]
    fn test_starts_with_any() {
        let ctx = QueryContext::new("Settings privacy");
        assert!(ctx.starts_with_any(&["setting", "pref"]));
        assert!(!ctx.starts_with_any(&["pref"]));
    }

    #[test]
    fn test_tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("docs.rs/serde_json?x=1"),
            vec!["docs", "rs", "serde", "json", "x", "1"]
        );
        assert!(tokenize("--//").is_empty());
    }
}
