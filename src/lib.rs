//! Cumulative Weighted Index
//!
//! A mutable sequence of non-negative weights answering prefix-sum and
//! inverse prefix-sum queries, with two interchangeable strategies behind
//! [`index::CumulativeIndex`]. The `cwi` binary replays JSON Lines scripts
//! against either strategy (or both, comparing every step).

pub mod config;
pub mod index;
pub mod logging;
pub mod model;
pub mod replay;
pub mod script;
pub mod source;

// Pure core used by the replay binary
pub mod integration;
