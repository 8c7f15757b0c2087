use super::Host;
use super::ProgressReporter;
use super::common::{ColorMode, ConsoleFormat, LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::calendar::PeriodSpec;
use crate::github::{GitHubSearch, SearchSettings};
use crate::reports::{generate_console, generate_csv, generate_json, generate_markdown};
use crate::series::{LabelFilter, Progress, Scope, SeriesRequest, StatisticsSeries, build_series};
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use clap::Parser;
use core::time::Duration;
use ohno::IntoAppError;
use std::fs;
use std::io::{Write, stderr, stdout};

const LOG_TARGET: &str = "   collect";

#[derive(Parser, Debug)]
pub struct CollectArgs {
    /// Repository (`owner/name`) or owner to report on, may be repeated
    #[arg(long, short = 's', value_name = "SCOPE")]
    pub scope: Vec<String>,

    /// Report column: `issues`, `pulls`, or a label name, may be repeated
    #[arg(long, short = 'l', value_name = "LABEL")]
    pub label: Vec<String>,

    /// Length of one interval, e.g. `1d`, `2w`, `1m`
    #[arg(long, short = 'p', value_name = "PERIOD")]
    pub period: Option<String>,

    /// Number of intervals to report
    #[arg(long, short = 'n', value_name = "COUNT")]
    pub count: Option<u32>,

    /// Instant the newest interval ends at, in RFC 3339 format (default is now)
    #[arg(long, value_name = "TIMESTAMP")]
    pub now: Option<String>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `issue-stats.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,

    /// Table layout for console output
    #[arg(long, value_name = "FORMAT", default_value = "text", help_heading = "Report Output")]
    pub format: ConsoleFormat,

    /// Output the tables to a Markdown file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub markdown: Option<Utf8PathBuf>,

    /// Output the full series to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Output the full series to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Output the tables to the console even when writing report files
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,
}

pub async fn collect<H: Host>(host: &mut H, args: &CollectArgs) -> Result<()> {
    init_logging(args.log_level);

    match collect_inner(host, args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = writeln!(host.error(), "❌ {e}");
            host.exit(1);
            Err(e)
        }
    }
}

async fn collect_inner<H: Host>(host: &mut H, args: &CollectArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let request = build_request(args, &config)?;
    request.validate()?;

    let settings = SearchSettings {
        api_url: config.api_url()?,
        web_url: config.web_url()?,
        max_concurrent_requests: config.max_concurrent_requests,
        min_request_interval: config.min_request_interval,
        max_rate_limit_wait: config.max_rate_limit_wait,
    };
    let search = GitHubSearch::new(args.github_token.as_deref(), &settings)?;

    let delay = if args.log_level == LogLevel::None {
        Duration::from_millis(300)
    } else {
        Duration::from_hours(365 * 24)
    };
    let progress = ProgressReporter::new(delay, args.color.use_colors(&stderr()));

    progress.set_phase("Connecting");
    progress.set_indeterminate(Box::new(|| "checking GitHub token".to_string()));

    let result = async {
        search.verify_token().await?;
        build_series(&request, &search, &progress).await
    }
    .await;
    progress.done();
    let series = result?;

    let warned = series.cells_with_warnings();
    if warned > 0 {
        log::warn!(target: LOG_TARGET, "{warned} cell(s) are based on incomplete search results");
    }

    report(host, args, &series)
}

/// Combine command-line values with the configuration, command-line values winning.
///
/// The period is parsed before anything else so a bad period fails before any search is made.
fn build_request(args: &CollectArgs, config: &Config) -> Result<SeriesRequest> {
    let period = match &args.period {
        Some(text) => text
            .parse::<PeriodSpec>()
            .into_app_err_with(|| format!("invalid period '{text}'"))?,
        None => config.period,
    };

    let reference_now = match &args.now {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .into_app_err_with(|| format!("invalid timestamp '{text}', expected RFC 3339 such as 2024-05-17T14:30:00Z"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let scopes = if args.scope.is_empty() { &config.scopes } else { &args.scope };
    let labels = if args.label.is_empty() { &config.labels } else { &args.label };

    Ok(SeriesRequest {
        reference_now,
        period,
        interval_count: args.count.unwrap_or(config.interval_count),
        scopes: scopes.iter().map(|s| Scope::parse(s)).collect::<Result<_>>()?,
        labels: labels.iter().map(|l| LabelFilter::parse(l)).collect::<Result<_>>()?,
    })
}

fn report<H: Host>(host: &mut H, args: &CollectArgs, series: &StatisticsSeries) -> Result<()> {
    let generating_reports = args.markdown.is_some() || args.json.is_some() || args.csv.is_some();

    if args.console || !generating_reports {
        let mut console_output = String::new();
        match args.format {
            ConsoleFormat::Text => generate_console(series, args.color.use_colors(&stdout()), &mut console_output)?,
            ConsoleFormat::Markdown => generate_markdown(series, &mut console_output)?,
        }
        let _ = write!(host.output(), "{console_output}");
    }

    if let Some(filename) = &args.markdown {
        let mut markdown = String::new();
        generate_markdown(series, &mut markdown)?;
        fs::write(filename, markdown).into_app_err_with(|| format!("writing Markdown report to '{filename}'"))?;
    }

    if let Some(filename) = &args.json {
        let mut json_output = String::new();
        generate_json(series, &mut json_output)?;
        fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
    }

    if let Some(filename) = &args.csv {
        let mut csv_output = String::new();
        generate_csv(series, &mut csv_output)?;
        fs::write(filename, csv_output).into_app_err_with(|| format!("writing CSV report to '{filename}'"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Granularity, PeriodError};
    use crate::commands::host::TestHost;
    use crate::reports::test_support::sample_series;

    fn args(extra: &[&str]) -> CollectArgs {
        let mut all = vec!["collect"];
        all.extend_from_slice(extra);
        CollectArgs::parse_from(all)
    }

    #[test]
    fn test_command_line_overrides_config() {
        let config = Config {
            scopes: vec!["rails".to_string()],
            ..Config::default()
        };

        let request = build_request(
            &args(&["-s", "atom/atom", "-l", "bug", "-l", "pulls", "-p", "2d", "-n", "3", "--now", "2024-05-17T14:30:00Z"]),
            &config,
        )
        .unwrap();

        assert_eq!(request.scopes, vec![Scope::parse("atom/atom").unwrap()]);
        assert_eq!(request.labels, vec![LabelFilter::parse("bug").unwrap(), LabelFilter::PullRequests]);
        assert_eq!(request.period, PeriodSpec::new(2, Granularity::Day).unwrap());
        assert_eq!(request.interval_count, 3);
        assert_eq!(request.reference_now.to_rfc3339(), "2024-05-17T14:30:00+00:00");
    }

    #[test]
    fn test_config_fills_missing_values() {
        let config = Config {
            scopes: vec!["rails".to_string()],
            interval_count: 6,
            ..Config::default()
        };

        let request = build_request(&args(&[]), &config).unwrap();

        assert_eq!(request.scopes, vec![Scope::parse("rails").unwrap()]);
        assert_eq!(request.labels, vec![LabelFilter::Issues, LabelFilter::PullRequests]);
        assert_eq!(request.period, PeriodSpec::default());
        assert_eq!(request.interval_count, 6);
    }

    #[test]
    fn test_now_with_offset_is_converted_to_utc() {
        let request = build_request(&args(&["-s", "rails", "--now", "2024-05-17T16:30:00+02:00"]), &Config::default()).unwrap();
        assert_eq!(request.reference_now.to_rfc3339(), "2024-05-17T14:30:00+00:00");
    }

    #[test]
    fn test_invalid_now_is_rejected() {
        let _ = build_request(&args(&["-s", "rails", "--now", "yesterday"]), &Config::default()).unwrap_err();
    }

    #[test]
    fn test_unsupported_period_is_rejected() {
        let err = build_request(&args(&["-s", "rails", "-p", "1s"]), &Config::default()).unwrap_err();
        let expected = PeriodError::UnsupportedGranularity("s".to_string()).to_string();
        assert!(err.to_string().contains(&expected), "unexpected error: {err}");
    }

    #[test]
    fn test_invalid_scope_is_rejected() {
        let _ = build_request(&args(&["-s", "a/b/c"]), &Config::default()).unwrap_err();
    }

    #[tokio::test]
    async fn test_missing_scope_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = Utf8PathBuf::from(dir.path().to_string_lossy().to_string()).join("empty.toml");
        fs::write(&config_path, "").unwrap();

        let mut host = TestHost::new();
        let result = collect(&mut host, &args(&["-c", config_path.as_str()])).await;

        let _ = result.unwrap_err();
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_text().contains("at least one scope"));
        assert!(host.output_text().is_empty());
    }

    #[test]
    fn test_console_shown_only_without_report_files() {
        let mut host = TestHost::new();
        report(&mut host, &args(&["--color", "never"]), &sample_series()).unwrap();
        assert!(host.output_text().starts_with("atom/atom\n"));
    }

    #[test]
    fn test_report_files_suppress_console() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = Utf8PathBuf::from(dir.path().to_string_lossy().to_string()).join("series.json");
        let csv_path = json_path.with_extension("csv");

        let mut host = TestHost::new();
        report(
            &mut host,
            &args(&["--json", json_path.as_str(), "--csv", csv_path.as_str()]),
            &sample_series(),
        )
        .unwrap();

        assert!(host.output_text().is_empty());
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["period"], "1d");
        assert!(fs::read_to_string(&csv_path).unwrap().starts_with("scope,label,"));
    }

    #[test]
    fn test_console_flag_forces_markdown_console() {
        let dir = tempfile::tempdir().unwrap();
        let md_path = Utf8PathBuf::from(dir.path().to_string_lossy().to_string()).join("series.md");

        let mut host = TestHost::new();
        report(
            &mut host,
            &args(&["--markdown", md_path.as_str(), "--console", "--format", "markdown"]),
            &sample_series(),
        )
        .unwrap();

        assert_eq!(host.output_text(), fs::read_to_string(&md_path).unwrap());
        assert!(host.output_text().starts_with("### atom/atom"));
    }
}
