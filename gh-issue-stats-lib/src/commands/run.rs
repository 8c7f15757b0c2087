//! Command dispatch logic for gh-issue-stats

use super::{CollectArgs, InitArgs, ValidateArgs, collect, init_config, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "gh-issue-stats", version, author, long_about = None)]
#[command(about = "Historical open, new, and closed counts for GitHub issues and pull requests")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: StatsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StatsSubcommand {
    /// Collect statistics from GitHub and generate reports
    Collect(Box<CollectArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        StatsSubcommand::Collect(collect_args) => collect(host, collect_args).await,
        StatsSubcommand::Init(init_args) => init_config(host, init_args),
        StatsSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_collect_arguments_parse() {
        let cli = Cli::parse_from([
            "gh-issue-stats",
            "collect",
            "-s",
            "atom/atom",
            "-s",
            "rails",
            "-l",
            "bug",
            "--period",
            "2w",
            "-n",
            "5",
            "--json",
            "out.json",
        ]);

        let StatsSubcommand::Collect(args) = cli.command else {
            unreachable!("expected the collect subcommand");
        };
        assert_eq!(args.scope, vec!["atom/atom", "rails"]);
        assert_eq!(args.label, vec!["bug"]);
        assert_eq!(args.period.as_deref(), Some("2w"));
        assert_eq!(args.count, Some(5));
        assert_eq!(args.json.as_deref().map(camino::Utf8Path::as_str), Some("out.json"));
        assert!(!args.console);
    }

    #[tokio::test]
    async fn test_run_dispatches_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.toml");

        let mut host = crate::commands::host::TestHost::new();
        run(&mut host, ["gh-issue-stats", "init", path.to_str().unwrap()]).await.unwrap();

        assert!(path.exists());
    }
}
