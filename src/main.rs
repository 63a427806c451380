//! Command-line interface for the repostats binary.
//!
//! Without a subcommand the CLI fetches every repository given on the command
//! line (and in an optional repository list file) and renders a report. The
//! `dashboard` subcommand opens the interactive single-repository view.

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use repostats::{
    BatchReport, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, Destination, Error,
    OutputFormat, StatsClient, collect_outcomes, load_repository_list, render, run_dashboard,
    write_errors, write_output,
};
use tokio::runtime::{Builder, Runtime};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for fetching repository statistics.
#[derive(Debug, Parser,)]
#[command(
    name = "repostats",
    version,
    about = "Fetch statistics for GitHub repositories",
    args_conflicts_with_subcommands = true
)]
/// Top-level CLI options parsed from user input.
struct Cli
{
    #[command(subcommand)]
    command: Option<Command,>,

    /// Arguments for the default batch report.
    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Browse statistics for one repository at a time.
    Dashboard(DashboardArgs,),
}

/// Connection settings shared by every command.
#[derive(Debug, Args, Clone,)]
struct ConnectionArgs
{
    /// GitHub API token.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String,>,

    /// Origin of the GitHub REST API.
    #[arg(long = "api-url", env = "GITHUB_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

impl ConnectionArgs
{
    fn client_config(&self,) -> ClientConfig
    {
        ClientConfig::new(self.token.clone(),)
            .with_api_url(self.api_url.as_str(),)
            .with_timeout(Duration::from_secs(self.timeout,),)
    }
}

/// Arguments accepted when the CLI is invoked without a subcommand.
#[derive(Debug, Args,)]
struct ReportArgs
{
    /// Repositories in the format 'owner/repo', e.g. 'python/cpython'.
    #[arg(value_name = "REPOSITORY")]
    repositories: Vec<String,>,

    /// Output format.
    #[arg(long = "format", value_enum, ignore_case = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the report to a file instead of standard output.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf,>,

    /// YAML or JSON file listing additional repositories.
    #[arg(long = "targets", value_name = "PATH")]
    targets: Option<PathBuf,>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

#[derive(Debug, Args,)]
struct DashboardArgs
{
    /// Repository to show on start, in the format 'owner/repo'.
    #[arg(value_name = "REPOSITORY")]
    repository: Option<String,>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    match run() {
        Ok(true,) => {}
        Ok(false,) => process::exit(1,),
        Err(error,) => {
            eprintln!("Error: {}", error.to_display_string());
            process::exit(1,);
        }
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the CLI using parsed arguments.
///
/// Returns `Ok(false)` when the run finished but some repositories failed.
///
/// # Errors
///
/// Propagates fatal errors: invalid arguments, unreadable repository lists,
/// client construction and output failures.
fn run() -> Result<bool, Error,>
{
    let cli = Cli::parse();
    let runtime = build_runtime()?;

    match cli.command {
        Some(Command::Dashboard(args,),) => run_dashboard_command(&runtime, args,),
        None => {
            let stdout = io::stdout();
            let stderr = io::stderr();
            run_report(&runtime, cli.report, &mut stdout.lock(), &mut stderr.lock(),)
        }
    }
}

fn build_runtime() -> Result<Runtime, Error,>
{
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Client {
            message: format!("failed to start async runtime: {e}"),
        },)
}

fn run_report<W: Write, E: Write,>(
    runtime: &Runtime,
    args: ReportArgs,
    console: &mut W,
    errors: &mut E,
) -> Result<bool, Error,>
{
    let identifiers = collect_identifiers(&args,)?;
    let client = runtime.block_on(async { StatsClient::new(&args.connection.client_config(),) },)?;

    let outcomes = runtime.block_on(collect_outcomes(&client, &identifiers,),);
    let report = BatchReport::from(outcomes,);

    write_report(&report, args.format, &Destination::from(args.output,), console, errors,)
}

/// Renders the results and lists the errors; returns whether the run succeeded.
fn write_report<W: Write, E: Write,>(
    report: &BatchReport,
    format: OutputFormat,
    destination: &Destination,
    console: &mut W,
    errors: &mut E,
) -> Result<bool, Error,>
{
    if !report.results.is_empty() {
        let rendered = render(&report.results, format,)?;
        write_output(&rendered, format, destination, console,)?;
    }

    write_errors(&report.errors, errors,).map_err(|e| Error::terminal(e.to_string(),),)?;
    info!("{} results, {} errors", report.results.len(), report.errors.len());

    Ok(report.is_success(),)
}

fn collect_identifiers(args: &ReportArgs,) -> Result<Vec<String,>, Error,>
{
    let mut identifiers = args.repositories.clone();
    if let Some(path,) = &args.targets {
        identifiers.extend(load_repository_list(path,)?,);
    }

    if identifiers.is_empty() {
        return Err(Error::validation("at least one repository in the format 'owner/repo' is required",),);
    }

    Ok(identifiers,)
}

fn run_dashboard_command(runtime: &Runtime, args: DashboardArgs,) -> Result<bool, Error,>
{
    let client = runtime.block_on(async { StatsClient::new(&args.connection.client_config(),) },)?;
    run_dashboard(runtime, client, args.repository,)?;

    Ok(true,)
}

#[cfg(test)]
mod tests
{
    use std::{fs, path::Path};

    use clap::Parser;
    use repostats::{BatchReport, Destination, OutputFormat, RepositoryStatistics};
    use tempfile::tempdir;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::{Cli, Command, build_runtime, collect_identifiers, run_report, write_report};

    fn sample(name: &str,) -> RepositoryStatistics
    {
        RepositoryStatistics {
            name:               name.to_owned(),
            stars:              100,
            forks:              50,
            open_issues:        10,
            watchers:           25,
            created_at:         "2022-01-01T00:00:00Z".to_owned(),
            updated_at:         "2022-02-01T00:00:00Z".to_owned(),
            language:           "Python".to_owned(),
            license:            "Unknown".to_owned(),
            size:               0,
            default_branch:     "Unknown".to_owned(),
            open_pull_requests: 0,
            latest_release:     None,
        }
    }

    #[test]
    fn cli_accepts_repositories_and_options()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "a/b",
            "c/d",
            "--format",
            "json",
            "--token",
            "test_token",
            "-o",
            "stats.json",
        ],)
        .expect("failed to parse CLI",);

        assert!(cli.command.is_none());
        assert_eq!(cli.report.repositories, vec!["a/b", "c/d"]);
        assert_eq!(cli.report.format, OutputFormat::Json);
        assert_eq!(cli.report.connection.token.as_deref(), Some("test_token"));
        assert_eq!(cli.report.output.as_deref(), Some(Path::new("stats.json")));
    }

    #[test]
    fn cli_defaults_to_text_with_ten_second_timeout()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "a/b",],)
            .expect("failed to parse CLI",);

        assert_eq!(cli.report.format, OutputFormat::Text);
        assert_eq!(cli.report.connection.timeout, 10);
        assert!(cli.report.output.is_none());
    }

    #[test]
    fn cli_format_is_case_insensitive()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "a/b", "--format", "YAML",],)
            .expect("failed to parse CLI",);
        assert_eq!(cli.report.format, OutputFormat::Yaml);
    }

    #[test]
    fn cli_rejects_unknown_format()
    {
        let result = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "a/b", "--format", "xml",],);
        assert!(result.is_err());
    }

    #[test]
    fn dashboard_subcommand_takes_optional_repository()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "dashboard", "python/cpython",],)
            .expect("failed to parse CLI",);

        match cli.command.expect("missing dashboard command",) {
            Command::Dashboard(args,) => {
                assert_eq!(args.repository.as_deref(), Some("python/cpython"));
            }
        }
    }

    #[test]
    fn missing_repositories_is_a_validation_error()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "--format", "json",],)
            .expect("failed to parse CLI",);

        let error = collect_identifiers(&cli.report,).expect_err("expected validation error",);
        assert!(matches!(error, repostats::Error::Validation { .. }));
    }

    #[test]
    fn targets_file_extends_positional_repositories()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("repos.yaml",);
        fs::write(&path, "repositories:\n  - c/d\n",).expect("failed to write list",);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "a/b",
            "--targets",
            path.to_str().expect("utf8",),
        ],)
        .expect("failed to parse CLI",);

        let identifiers = collect_identifiers(&cli.report,).expect("expected identifiers",);
        assert_eq!(identifiers, vec!["a/b", "c/d"]);
    }

    #[test]
    fn text_report_goes_to_console_with_rows()
    {
        let report = BatchReport {
            results: vec![sample("test/repo",)], errors: Vec::new(),
        };
        let mut console = Vec::<u8,>::new();
        let mut errors = Vec::<u8,>::new();

        let success =
            write_report(&report, OutputFormat::Text, &Destination::Stdout, &mut console, &mut errors,)
                .expect("report failed",);

        let output = String::from_utf8(console,).expect("utf8",);
        assert!(success);
        assert!(output.contains("test/repo statistics"));
        assert!(output.contains("Stars       : 100"));
        assert!(output.contains("Forks       : 50"));
        assert!(errors.is_empty());
    }

    #[test]
    fn partial_failure_renders_results_and_lists_errors()
    {
        let report = BatchReport {
            results: vec![sample("a/b",), sample("c/d",)],
            errors:  vec!["Repository should be in the format 'owner/repo' (got 'bad-format')"
                .to_owned()],
        };
        let mut console = Vec::<u8,>::new();
        let mut errors = Vec::<u8,>::new();

        let success =
            write_report(&report, OutputFormat::Json, &Destination::Stdout, &mut console, &mut errors,)
                .expect("report failed",);

        assert!(!success);
        let output = String::from_utf8(console,).expect("utf8",);
        let first = output.find("\"name\": \"a/b\"",).expect("a/b rendered",);
        let second = output.find("\"name\": \"c/d\"",).expect("c/d rendered",);
        assert!(first < second);

        let listed = String::from_utf8(errors,).expect("utf8",);
        assert_eq!(listed.matches("Error: ").count(), 1);
    }

    #[test]
    fn zero_results_is_a_failure_without_output()
    {
        let mut console = Vec::<u8,>::new();
        let mut errors = Vec::<u8,>::new();

        let success = write_report(
            &BatchReport::default(),
            OutputFormat::Text,
            &Destination::Stdout,
            &mut console,
            &mut errors,
        )
        .expect("report failed",);

        assert!(!success);
        assert!(console.is_empty());
    }

    #[test]
    fn json_report_to_file_ends_with_single_newline()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("stats.json",);
        let report = BatchReport {
            results: vec![sample("test/repo",)], errors: Vec::new(),
        };
        let mut console = Vec::<u8,>::new();

        write_report(
            &report,
            OutputFormat::Json,
            &Destination::File(path.clone(),),
            &mut console,
            &mut Vec::<u8,>::new(),
        )
        .expect("report failed",);

        let contents = fs::read_to_string(&path,).expect("failed to read report",);
        assert!(contents.ends_with("}\n"));
        assert!(!contents.ends_with("\n\n"));
        assert!(String::from_utf8(console).expect("utf8").contains("Wrote json output to"));
    }

    #[test]
    fn batch_against_api_lists_only_collected_errors()
    {
        let runtime = build_runtime().expect("failed to build runtime",);
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET",),)
                .and(path("/repos/test/repo",),)
                .respond_with(ResponseTemplate::new(200,).set_body_json(serde_json::json!({
                    "full_name": "test/repo",
                    "stargazers_count": 7
                }),),)
                .mount(&server,)
                .await;
            Mock::given(method("GET",),)
                .and(path("/repos/test/missing",),)
                .respond_with(
                    ResponseTemplate::new(404,)
                        .set_body_json(serde_json::json!({"message": "Not Found"}),),
                )
                .mount(&server,)
                .await;
            server
        },);

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "bad-format",
            "test/repo",
            "test/missing",
            "--format",
            "json",
            "--api-url",
            server.uri().as_str(),
        ],)
        .expect("failed to parse CLI",);

        let mut console = Vec::<u8,>::new();
        let mut errors = Vec::<u8,>::new();
        let success = run_report(&runtime, cli.report, &mut console, &mut errors,)
            .expect("report failed",);

        assert!(!success);
        let output = String::from_utf8(console,).expect("utf8",);
        assert!(output.contains("\"name\": \"test/repo\""));
        assert!(output.contains("\"stars\": 7"));

        assert_eq!(
            String::from_utf8(errors,).expect("utf8",),
            "\nError: Repository should be in the format 'owner/repo' (got 'bad-format')\n\
             Error: Failed to fetch repository stats for test/missing: Repository \
             'test/missing' not found. Check the repository name and your access.\n"
        );
    }
}
