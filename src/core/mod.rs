//! Core engine module - the ranking pipeline.
//!
//! - Candidate types and their JSON wire shape
//! - Query normalization
//! - Lexical match scoring (strict tab, domain prefix, fuzzy + overlap)
//! - Intent and question detection
//! - Composite ranking and the `RankingEngine` entry point

pub mod candidate;
pub mod intent;
pub mod matching;
pub mod query;
pub mod rank;

pub use candidate::{parse_candidates, Candidate, CandidateKind, PageVisits, QuickAnswerKind};
pub use rank::{RankedCandidate, RankingEngine, ScoreBreakdown};
