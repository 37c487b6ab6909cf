//! convlist - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// convlist - lazily rendered conversation list demo
#[derive(Parser, Debug)]
#[command(name = "convlist")]
#[command(version)]
#[command(about = "Terminal demo of a viewport-windowed, lazily loaded conversation list")]
pub struct Args {
    /// JSONL file of conversation summaries (synthetic data if not provided)
    #[arg(short, long, conflicts_with = "count")]
    pub file: Option<PathBuf>,

    /// Number of synthetic conversations to generate
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// Seed for synthetic data and simulated messages
    #[arg(short, long, default_value = "0")]
    pub seed: u64,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scroll debounce delay in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = convlist::config::load_config_with_precedence(args.config.clone())?;
        let merged = convlist::config::merge_config(config_file);
        let with_env = convlist::config::apply_env_overrides(merged);
        convlist::config::apply_cli_overrides(with_env, args.debounce_ms)
    };

    convlist::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let count = args.count.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
    let input_source = convlist::source::detect_input_source(args.file.clone(), count, args.seed)?;
    let colors = convlist::view::ColorConfig::from_env_and_args(args.no_color);

    convlist::view::run_with_source(input_source, &config, colors, args.seed)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["convlist", "--help"]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["convlist", "--version"]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["convlist"]);
        assert_eq!(args.file, None);
        assert_eq!(args.count, None);
        assert_eq!(args.seed, 0);
        assert_eq!(args.config, None);
        assert_eq!(args.debounce_ms, None);
        assert!(!args.no_color);
    }

    #[test]
    fn test_file_flag() {
        let args = Args::parse_from(["convlist", "--file", "chats.jsonl"]);
        assert_eq!(args.file, Some(PathBuf::from("chats.jsonl")));
    }

    #[test]
    fn test_count_and_seed() {
        let args = Args::parse_from(["convlist", "-n", "20000", "--seed", "42"]);
        assert_eq!(args.count, Some(20000));
        assert_eq!(args.seed, 42);
    }

    #[test]
    fn test_count_rejects_zero() {
        let result = Args::try_parse_from(["convlist", "--count", "0"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_file_conflicts_with_count() {
        let result = Args::try_parse_from(["convlist", "-f", "a.jsonl", "-n", "5"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_debounce_ms() {
        let args = Args::parse_from(["convlist", "--debounce-ms", "50"]);
        assert_eq!(args.debounce_ms, Some(50));
    }

    #[test]
    fn test_no_color_flag() {
        let args = Args::parse_from(["convlist", "--no-color"]);
        assert!(args.no_color);
    }

    #[test]
    fn test_config_flag() {
        let args = Args::parse_from(["convlist", "--config", "/tmp/c.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
    }
}
