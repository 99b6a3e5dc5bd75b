//! Replay engine: applies parsed scripts to one or both index strategies.
//!
//! In [`Mode::Single`] every operation runs against one strategy. In
//! [`Mode::Verify`] both strategies run in lock-step and the first step where
//! they disagree (query result, mutation outcome, error, or resulting weights)
//! stops the replay with [`ReplayError::Divergence`].

use crate::index::{CumulativeIndex, Strategy};
use crate::model::{IndexError, ReplayError, Sum, Weight};
use crate::script::{Op, ScriptLine};
use serde::Serialize;
use tracing::{debug, warn};

/// Which strategies a replay drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run a single strategy.
    Single(Strategy),
    /// Run both strategies and compare every step.
    Verify,
}

/// Result of a read-only operation, as written to the output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueryResult {
    /// `total_sum()`.
    Total {
        /// Sum of all weights.
        total: Sum,
    },
    /// `prefix_sum(count)`.
    Prefix {
        /// Requested count.
        count: usize,
        /// Sum of the first `count` weights.
        sum: Sum,
    },
    /// `index_of(sum)`.
    IndexOf {
        /// Requested offset.
        sum: Sum,
        /// Unit containing the offset.
        index: usize,
        /// Offset past the unit's start.
        remainder: Sum,
    },
    /// `len()`.
    Len {
        /// Number of units.
        len: usize,
    },
}

/// What applying one operation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A mutation ran; `true` if the sequence changed.
    Changed(bool),
    /// A query ran.
    Query(QueryResult),
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// 1-based script line of the query.
    pub step: usize,
    /// The query result.
    #[serde(flatten)]
    pub result: QueryResult,
}

/// Counters gathered over a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Operations applied.
    pub steps: usize,
    /// Read-only operations among them.
    pub queries: usize,
    /// Mutations that changed the sequence.
    pub effective_mutations: usize,
}

/// Applies one operation to an index.
///
/// `Init` replaces `index` with a fresh index of the same strategy.
///
/// # Errors
///
/// Returns the [`IndexError`] reported by the index.
pub fn apply(index: &mut Box<dyn CumulativeIndex>, op: &Op) -> Result<Outcome, IndexError> {
    let outcome = match op {
        Op::Init { weights } => {
            *index = index.strategy().build(weights.clone());
            Outcome::Changed(true)
        }
        Op::Set { index: at, weight } => Outcome::Changed(index.set_value(*at, *weight)?),
        Op::Insert { index: at, weights } => Outcome::Changed(index.insert_values(*at, weights)?),
        Op::Remove { start, count } => Outcome::Changed(index.remove_values(*start, *count)?),
        Op::Total => Outcome::Query(QueryResult::Total {
            total: index.total_sum(),
        }),
        Op::Prefix { count } => Outcome::Query(QueryResult::Prefix {
            count: *count,
            sum: index.prefix_sum(*count)?,
        }),
        Op::IndexOf { sum } => {
            let found = index.index_of(*sum)?;
            Outcome::Query(QueryResult::IndexOf {
                sum: *sum,
                index: found.index,
                remainder: found.remainder,
            })
        }
        Op::Len => Outcome::Query(QueryResult::Len { len: index.len() }),
    };
    Ok(outcome)
}

/// Drives a script through one or both strategies.
#[derive(Debug)]
pub struct Replayer {
    targets: Vec<Box<dyn CumulativeIndex>>,
    stats: ReplayStats,
}

impl Replayer {
    /// Creates a replayer whose indexes start empty.
    pub fn new(mode: Mode) -> Self {
        let targets = match mode {
            Mode::Single(strategy) => vec![strategy.build(Vec::new())],
            Mode::Verify => Strategy::ALL
                .iter()
                .map(|s| s.build(Vec::new()))
                .collect(),
        };
        Self {
            targets,
            stats: ReplayStats::default(),
        }
    }

    /// Counters gathered so far.
    pub fn stats(&self) -> ReplayStats {
        self.stats
    }

    /// Current weights, as seen by the first strategy.
    pub fn weights(&self) -> &[Weight] {
        self.targets[0].weights()
    }

    /// Applies one script line.
    ///
    /// Returns the output record for queries and `None` for mutations.
    ///
    /// # Errors
    ///
    /// - [`ReplayError::Index`] if the index rejected the operation
    /// - [`ReplayError::Divergence`] if strategies disagree (verify mode only)
    pub fn step(&mut self, line: &ScriptLine) -> Result<Option<Record>, ReplayError> {
        let step = line.line;
        let mut results = self
            .targets
            .iter_mut()
            .map(|index| apply(index, &line.op))
            .collect::<Vec<_>>();

        if let [lazy, balanced] = results.as_slice() {
            if lazy != balanced {
                return Err(divergence(step, line.op.name(), lazy, balanced));
            }
            let (a, b) = (self.targets[0].weights(), self.targets[1].weights());
            if a != b {
                return Err(divergence(step, "weights", &a, &b));
            }
        }

        let outcome = results
            .swap_remove(0)
            .map_err(|source| ReplayError::Index { step, source })?;

        self.stats.steps += 1;
        if line.op.is_query() {
            self.stats.queries += 1;
        }
        debug!(step, op = line.op.name(), ?outcome, "applied");

        match outcome {
            Outcome::Changed(changed) => {
                if changed {
                    self.stats.effective_mutations += 1;
                }
                Ok(None)
            }
            Outcome::Query(result) => Ok(Some(Record { step, result })),
        }
    }

    /// Applies a whole script, collecting query records.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step; see [`Replayer::step`].
    pub fn run(&mut self, script: &[ScriptLine]) -> Result<Vec<Record>, ReplayError> {
        let mut records = Vec::new();
        for line in script {
            if let Some(record) = self.step(line)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn divergence(
    step: usize,
    op: &'static str,
    lazy: &impl std::fmt::Debug,
    balanced: &impl std::fmt::Debug,
) -> ReplayError {
    let (lazy, balanced) = (format!("{lazy:?}"), format!("{balanced:?}"));
    warn!(step, op, %lazy, %balanced, "strategies diverged");
    ReplayError::Divergence {
        step,
        op,
        lazy,
        balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    fn script(text: &str) -> Vec<ScriptLine> {
        parse_script(text.lines()).unwrap()
    }

    #[test]
    fn single_mode_emits_records_for_queries_only() {
        let ops = script(
            r#"{"op":"init","weights":[1,1,2,1,3]}
{"op":"total"}
{"op":"set","index":0,"weight":2}
{"op":"index_of","sum":3}"#,
        );
        let mut replayer = Replayer::new(Mode::Single(Strategy::Balanced));
        let records = replayer.run(&ops).unwrap();
        assert_eq!(
            records,
            vec![
                Record {
                    step: 2,
                    result: QueryResult::Total { total: 8 }
                },
                Record {
                    step: 4,
                    result: QueryResult::IndexOf {
                        sum: 3,
                        index: 2,
                        remainder: 0
                    }
                },
            ]
        );
        assert_eq!(
            replayer.stats(),
            ReplayStats {
                steps: 4,
                queries: 2,
                effective_mutations: 2
            }
        );
    }

    #[test]
    fn verify_mode_agrees_on_mixed_script() {
        let ops = script(
            r#"{"op":"init","weights":[0,0,3]}
{"op":"insert","index":1,"weights":[2,0]}
{"op":"remove","start":0,"count":1}
{"op":"set","index":3,"weight":0}
{"op":"index_of","sum":2}
{"op":"prefix","count":4}
{"op":"len"}"#,
        );
        let mut replayer = Replayer::new(Mode::Verify);
        let records = replayer.run(&ops).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(replayer.weights(), &[2, 0, 0, 0]);
        assert_eq!(
            replayer.stats(),
            ReplayStats {
                steps: 7,
                queries: 3,
                effective_mutations: 4
            }
        );
    }

    #[test]
    fn index_errors_carry_the_step() {
        let ops = script(
            r#"{"op":"init","weights":[1]}
{"op":"remove","start":0,"count":2}"#,
        );
        let err = Replayer::new(Mode::Verify).run(&ops).unwrap_err();
        assert_eq!(
            err,
            ReplayError::Index {
                step: 2,
                source: IndexError::InvalidRange {
                    start: 0,
                    count: 2,
                    len: 1
                }
            }
        );
    }

    #[test]
    fn query_on_empty_index_fails() {
        let ops = script(r#"{"op":"index_of","sum":0}"#);
        let err = Replayer::new(Mode::Single(Strategy::Lazy))
            .run(&ops)
            .unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Index {
                source: IndexError::EmptySequence,
                ..
            }
        ));
    }

    #[test]
    fn record_serializes_with_step_first() {
        let record = Record {
            step: 5,
            result: QueryResult::Prefix { count: 3, sum: 4 },
        };
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"step":5,"op":"prefix","count":3,"sum":4}"#
        );
    }
}
