//! quickrank - ranking engine for a browser quick launcher.
//!
//! Takes the heterogeneous candidates a launcher overlay collects for a query
//! (open tabs, history, bookmarks, quick answers, assistant actions, remote
//! suggestions) and returns one ordered, capped list ready for keyboard
//! navigation.
//!
//! # Architecture
//!
//! - [`config`] - Every scoring constant, loadable from TOML
//! - [`core`] - Candidate types, match scoring, intent detection, ranking
//! - [`services`] - Frecency decay and the adaptive selection store
//! - [`cli`] - Command-line front end (behind the `cli` feature)
//!
//! # Example
//!
//! ```
//! use quickrank::{Candidate, RankingEngine};
//!
//! let mut engine = RankingEngine::in_memory();
//! let candidates = vec![Candidate::tab("GitHub", "https://github.com")];
//!
//! let ranked = engine.rank(&candidates, "git");
//! assert_eq!(ranked[0].candidate.title, "GitHub");
//!
//! engine.record_selection(&ranked[0].candidate, "git");
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod services;

mod error;

pub use config::{Config, RankingConfig};
pub use crate::core::candidate::{parse_candidates, Candidate, CandidateKind, QuickAnswerKind};
pub use crate::core::rank::{RankedCandidate, RankingEngine, ScoreBreakdown};
pub use error::{RankError, RankResult};
pub use services::adaptive::AdaptiveStore;
