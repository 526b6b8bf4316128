//! Stateful helpers used by the ranker.

pub mod adaptive;
pub mod frecency;
