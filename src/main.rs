//! Cumulative Weighted Index - Replay Tool Entry Point

use clap::Parser;
use cumulative_index::config::ResolvedConfig;
use cumulative_index::index::Strategy;
use cumulative_index::integration::{run_script, RunOptions};
use cumulative_index::model::AppError;
use cumulative_index::replay::Mode;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Replay JSON Lines scripts of cumulative index operations
#[derive(Parser, Debug)]
#[command(name = "cwi")]
#[command(version)]
#[command(about = "Replay JSON Lines scripts against a cumulative weighted index")]
pub struct Args {
    /// Path to JSONL script (reads from stdin if not provided)
    pub script: Option<PathBuf>,

    /// Index strategy to replay against (selects single-strategy mode)
    #[arg(short, long, value_enum, conflicts_with = "verify")]
    pub strategy: Option<Strategy>,

    /// Run both strategies and fail on the first divergence
    #[arg(long)]
    pub verify: bool,

    /// Run a single strategy even if the config enables verify mode
    #[arg(long, conflicts_with = "verify")]
    pub no_verify: bool,

    /// Suppress query output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Resolve configuration with full precedence chain:
    /// Defaults → Config File → Env Vars → CLI Args
    fn resolve_config(&self) -> Result<ResolvedConfig, AppError> {
        let config_file = cumulative_index::config::load_config_with_precedence(self.config.clone())?;
        let merged = cumulative_index::config::merge_config(config_file);
        let with_env = cumulative_index::config::apply_env_overrides(merged)?;

        Ok(cumulative_index::config::apply_cli_overrides(
            with_env,
            self.strategy,
            self.verify_override(),
        ))
    }

    /// Verify setting requested on the command line, if any.
    ///
    /// An explicit `--strategy` names the one strategy to run, so it turns
    /// verify mode off just like `--no-verify`.
    fn verify_override(&self) -> Option<bool> {
        if self.verify {
            Some(true)
        } else if self.no_verify || self.strategy.is_some() {
            Some(false)
        } else {
            None
        }
    }
}

fn mode_for(config: &ResolvedConfig) -> Mode {
    if config.verify {
        Mode::Verify
    } else {
        Mode::Single(config.strategy)
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let config = args.resolve_config()?;

    let level = if args.verbose { "debug" } else { "info" };
    cumulative_index::logging::init(&config.log_file_path, level)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let mut input_source = cumulative_index::source::detect_input_source(args.script)?;
    info!(source = %input_source.describe(), "reading script");
    let lines = input_source.read_lines()?;

    let options = RunOptions {
        mode: mode_for(&config),
        quiet: args.quiet,
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run_script(&lines, options, &mut out).inspect_err(|err| error!(%err, "replay aborted"))?;

    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        // Help returns Err with DisplayHelp, which is success
        let result = Args::try_parse_from(["cwi", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["cwi", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["cwi"]);
        assert_eq!(args.script, None);
        assert_eq!(args.strategy, None);
        assert!(!args.verify);
        assert!(!args.no_verify);
        assert!(!args.quiet);
        assert!(!args.verbose);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_script_path_populates_script_field() {
        let args = Args::parse_from(["cwi", "ops.jsonl"]);
        assert_eq!(args.script, Some(PathBuf::from("ops.jsonl")));
    }

    #[test]
    fn test_strategy_short_flag() {
        let args = Args::parse_from(["cwi", "-s", "balanced"]);
        assert_eq!(args.strategy, Some(Strategy::Balanced));
    }

    #[test]
    fn test_strategy_long_flag() {
        let args = Args::parse_from(["cwi", "--strategy", "lazy"]);
        assert_eq!(args.strategy, Some(Strategy::Lazy));
    }

    #[test]
    fn test_strategy_invalid_rejects() {
        let result = Args::try_parse_from(["cwi", "--strategy", "skiplist"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_strategy_conflicts_with_verify() {
        let result = Args::try_parse_from(["cwi", "--verify", "--strategy", "lazy"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_no_verify_conflicts_with_verify() {
        let result = Args::try_parse_from(["cwi", "--verify", "--no-verify"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_verify_override_from_flags() {
        assert_eq!(Args::parse_from(["cwi"]).verify_override(), None);
        assert_eq!(Args::parse_from(["cwi", "--verify"]).verify_override(), Some(true));
        assert_eq!(
            Args::parse_from(["cwi", "--no-verify"]).verify_override(),
            Some(false)
        );
        assert_eq!(
            Args::parse_from(["cwi", "-s", "balanced"]).verify_override(),
            Some(false)
        );
    }

    #[test]
    fn test_cli_flags_turn_off_verify_from_config_file() {
        use cumulative_index::config::{apply_cli_overrides, merge_config, ConfigFile};

        let from_file = merge_config(Some(ConfigFile {
            strategy: None,
            verify: Some(true),
            log_file_path: None,
        }));
        assert_eq!(mode_for(&from_file), Mode::Verify);

        let args = Args::parse_from(["cwi", "--no-verify"]);
        let resolved = apply_cli_overrides(from_file.clone(), args.strategy, args.verify_override());
        assert_eq!(mode_for(&resolved), Mode::Single(Strategy::Lazy));

        let args = Args::parse_from(["cwi", "--strategy", "balanced"]);
        let resolved = apply_cli_overrides(from_file, args.strategy, args.verify_override());
        assert_eq!(mode_for(&resolved), Mode::Single(Strategy::Balanced));
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["cwi", "--config", "/custom/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from(["cwi", "ops.jsonl", "--verify", "-q", "-v"]);
        assert_eq!(args.script, Some(PathBuf::from("ops.jsonl")));
        assert!(args.verify);
        assert!(args.quiet);
        assert!(args.verbose);
    }

    #[test]
    fn test_mode_follows_verify_flag() {
        let mut config = ResolvedConfig {
            strategy: Strategy::Balanced,
            ..ResolvedConfig::default()
        };
        assert_eq!(mode_for(&config), Mode::Single(Strategy::Balanced));

        config.verify = true;
        assert_eq!(mode_for(&config), Mode::Verify);
    }

    #[test]
    fn test_strategy_flows_through_config_precedence_chain() {
        use cumulative_index::config::{apply_cli_overrides, merge_config, ConfigFile};

        let config_file = ConfigFile {
            strategy: Some(Strategy::Balanced),
            verify: Some(true),
            log_file_path: None,
        };

        let merged = merge_config(Some(config_file));
        assert_eq!(merged.strategy, Strategy::Balanced);

        // Without verify flags the file value survives
        let args = Args::parse_from(["cwi", "-q"]);
        let kept = apply_cli_overrides(merged.clone(), args.strategy, args.verify_override());
        assert!(kept.verify);

        let args = Args::parse_from(["cwi", "--strategy", "lazy"]);
        let with_cli = apply_cli_overrides(merged, args.strategy, args.verify_override());
        assert_eq!(with_cli.strategy, Strategy::Lazy, "CLI strategy wins");
        assert!(!with_cli.verify);
    }
}
