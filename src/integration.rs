//! Pure core integration functions.
//!
//! This module glues script parsing, replay and output formatting together
//! for the `cwi` binary. Everything here works on in-memory lines and a
//! generic writer, so it is testable without touching stdin/stdout.

use crate::model::AppError;
use crate::replay::{Mode, ReplayStats, Replayer};
use crate::script::parse_script;
use std::io::Write;
use tracing::info;

/// Options for a single replay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Strategy selection.
    pub mode: Mode,
    /// Suppress query output (useful with verify mode).
    pub quiet: bool,
}

/// Parse `lines` as a script and replay it, writing one JSON object per
/// query result to `out`.
///
/// Records are written as they are produced, so output for steps before a
/// failure is still emitted.
///
/// # Errors
///
/// - `AppError::Script` if any line fails to parse (nothing is replayed)
/// - `AppError::Replay` at the first failing or diverging step
/// - `AppError::Output` if writing fails
pub fn run_script<W: Write>(
    lines: &[String],
    options: RunOptions,
    out: &mut W,
) -> Result<ReplayStats, AppError> {
    let script = parse_script(lines.iter().map(String::as_str))?;
    info!(operations = script.len(), mode = ?options.mode, "script parsed");

    let mut replayer = Replayer::new(options.mode);
    for line in &script {
        let record = replayer.step(line)?;
        if let (Some(record), false) = (record, options.quiet) {
            // Serializing a flat struct of integers cannot fail.
            let json = serde_json::to_string(&record).map_err(std::io::Error::from)?;
            writeln!(out, "{json}")?;
        }
    }
    out.flush()?;

    let stats = replayer.stats();
    info!(
        steps = stats.steps,
        queries = stats.queries,
        effective_mutations = stats.effective_mutations,
        "replay finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Strategy;
    use crate::model::{ReplayError, ScriptError};

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_owned).collect()
    }

    fn run(text: &str, mode: Mode, quiet: bool) -> (Result<ReplayStats, AppError>, String) {
        let mut out = Vec::new();
        let result = run_script(&lines(text), RunOptions { mode, quiet }, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn run_script_writes_one_line_per_query() {
        let (result, output) = run(
            r#"{"op":"init","weights":[1,2,3,4]}
{"op":"remove","start":1,"count":2}
{"op":"total"}
{"op":"index_of","sum":4}"#,
            Mode::Single(Strategy::Lazy),
            false,
        );
        assert!(result.is_ok());
        insta::assert_snapshot!(output, @r#"
        {"step":3,"op":"total","total":5}
        {"step":4,"op":"index_of","sum":4,"index":1,"remainder":3}
        "#);
    }

    #[test]
    fn quiet_mode_writes_nothing() {
        let (result, output) = run(
            "{\"op\":\"init\",\"weights\":[1]}\n{\"op\":\"total\"}",
            Mode::Verify,
            true,
        );
        assert_eq!(result.unwrap().queries, 1);
        assert!(output.is_empty());
    }

    #[test]
    fn parse_errors_stop_before_replay() {
        let (result, output) = run(
            "{\"op\":\"init\",\"weights\":[1]}\n{\"op\":\"total\"}\n{\"op\":\"set\",\"index\":-1,\"weight\":0}",
            Mode::Verify,
            false,
        );
        assert!(matches!(
            result,
            Err(AppError::Script(ScriptError::NegativeArgument { line: 3, .. }))
        ));
        assert!(output.is_empty(), "no step should run: {output}");
    }

    #[test]
    fn output_before_a_failing_step_is_kept() {
        let (result, output) = run(
            "{\"op\":\"init\",\"weights\":[2]}\n{\"op\":\"len\"}\n{\"op\":\"prefix\",\"count\":2}",
            Mode::Single(Strategy::Balanced),
            false,
        );
        assert!(matches!(
            result,
            Err(AppError::Replay(ReplayError::Index { step: 3, .. }))
        ));
        assert_eq!(output, "{\"step\":2,\"op\":\"len\",\"len\":1}\n");
    }
}
