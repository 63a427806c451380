// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Interactive text-mode dashboard for a single repository.
///
/// The presentation thread owns the prompt and the screen. Each fetch is
/// spawned as one task on the runtime while a spinner keeps the terminal
/// alive; the thread then blocks on the task's join handle, so at most one
/// fetch is ever in flight.
use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::{
    client::{StatsClient, StatsSource},
    error::Error,
    identifier::RepositoryIdentifier,
    render::{format_size, group_thousands},
    stats::RepositoryStatistics,
};

const RULE_WIDTH: usize = 46;

/// Action requested at the dashboard prompt.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum DashboardCommand
{
    /// Fetch the given raw identifier.
    Fetch(String,),
    /// Fetch the last repository again.
    Refresh,
    /// Leave the dashboard.
    Quit,
}

impl DashboardCommand
{
    /// Interprets a prompt line: `q`/`quit` quits, empty refreshes.
    pub fn parse(line: &str,) -> Self
    {
        match line.trim() {
            "q" | "quit" => Self::Quit,
            "" => Self::Refresh,
            other => Self::Fetch(other.to_owned(),),
        }
    }
}

/// Runs the dashboard until the user quits.
///
/// # Errors
///
/// Returns [`Error::Terminal`] when the prompt or the screen cannot be
/// driven. Fetch failures are shown in the view and do not end the loop.
pub fn run_dashboard(
    runtime: &Runtime,
    client: StatsClient,
    initial: Option<String,>,
) -> Result<(), Error,>
{
    let client = Arc::new(client,);
    let mut stdout = io::stdout();
    let mut last: Option<String,> = None;
    let mut pending = initial.filter(|value| !value.trim().is_empty(),);

    loop {
        let raw = match pending.take() {
            Some(raw,) => raw,
            None => {
                let line: String = Input::new()
                    .with_prompt("Repository (owner/repo, Enter to refresh, q to quit)",)
                    .allow_empty(true,)
                    .interact_text()
                    .map_err(|e| Error::terminal(e.to_string(),),)?;

                match DashboardCommand::parse(&line,) {
                    DashboardCommand::Quit => return Ok((),),
                    DashboardCommand::Refresh => match &last {
                        Some(previous,) => previous.clone(),
                        None => continue,
                    },
                    DashboardCommand::Fetch(raw,) => raw,
                }
            }
        };

        let view = match RepositoryIdentifier::parse(&raw,) {
            Ok(identifier,) => {
                last = Some(raw.clone(),);
                match fetch_in_background(runtime, &client, identifier.clone(),) {
                    Ok(stats,) => stats_panel(&identifier, &stats,),
                    Err(error,) => error_panel(&identifier.to_string(), &error.to_display_string(),),
                }
            }
            Err(_,) => error_panel(&raw, "Invalid format. Use 'owner/repo'",),
        };

        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
            .map_err(|e| Error::terminal(e.to_string(),),)?;
        writeln!(stdout, "{view}").map_err(|e| Error::terminal(e.to_string(),),)?;
    }
}

/// Spawns one fetch task and blocks on it while a spinner runs.
fn fetch_in_background(
    runtime: &Runtime,
    client: &Arc<StatsClient,>,
    identifier: RepositoryIdentifier,
) -> Result<RepositoryStatistics, Error,>
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.yellow} {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_spinner(),),
    );
    spinner.set_message(format!("Fetching {identifier}..."),);
    spinner.enable_steady_tick(Duration::from_millis(100,),);

    let task_client = Arc::clone(client,);
    let handle = runtime.spawn(async move { task_client.fetch_stats(&identifier,).await },);
    let joined = runtime.block_on(handle,);
    spinner.finish_and_clear();

    joined.unwrap_or_else(|e| {
        debug!("fetch task did not complete: {}", e);
        Err(Error::terminal(format!("fetch task did not complete: {e}"),),)
    },)
}

/// Builds the statistics view for a repository.
pub fn stats_panel(identifier: &RepositoryIdentifier, stats: &RepositoryStatistics,) -> String
{
    let mut panel = String::with_capacity(1024,);
    panel.push_str(&format!("{}\n", format!("Repository: {identifier}").bold()),);

    section(&mut panel, "Repository Information",);
    row(&mut panel, "Stars", &group_thousands(stats.stars,),);
    row(&mut panel, "Forks", &group_thousands(stats.forks,),);
    row(&mut panel, "Open Issues", &group_thousands(stats.open_issues,),);
    row(&mut panel, "Watchers", &group_thousands(stats.watchers,),);
    row(
        &mut panel,
        "Open PRs",
        &format!("{} (estimated)", group_thousands(stats.open_pull_requests,)),
    );

    section(&mut panel, "Repository Details",);
    row(&mut panel, "Language", &stats.language,);
    row(&mut panel, "License", &stats.license,);
    row(&mut panel, "Default Branch", &stats.default_branch,);
    row(&mut panel, "Size", &format_size(stats.size,),);
    row(&mut panel, "Latest Release", stats.latest_release.as_deref().unwrap_or("None",),);

    section(&mut panel, "Timestamps",);
    row(&mut panel, "Created", &stats.created_at,);
    row(&mut panel, "Last Updated", &stats.updated_at,);

    panel
}

/// Builds the view shown when a repository cannot be displayed.
pub fn error_panel(raw: &str, message: &str,) -> String
{
    format!("{}\n\n{}\n", format!("Repository: {raw}").bold(), message.red())
}

fn section(panel: &mut String, title: &str,)
{
    panel.push_str(&format!("\n{}\n{}\n\n", title.bold().cyan(), "━".repeat(RULE_WIDTH,)),);
}

fn row(panel: &mut String, label: &str, value: &str,)
{
    let label = format!("{label}:");
    panel.push_str(&format!("{}{value}\n", format!("{label:<19}").yellow()),);
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::report::tests::sample;

    #[test]
    fn prompt_lines_map_to_commands()
    {
        assert_eq!(DashboardCommand::parse("q"), DashboardCommand::Quit);
        assert_eq!(DashboardCommand::parse(" quit "), DashboardCommand::Quit);
        assert_eq!(DashboardCommand::parse(""), DashboardCommand::Refresh);
        assert_eq!(
            DashboardCommand::parse("rust-lang/cargo"),
            DashboardCommand::Fetch("rust-lang/cargo".to_owned())
        );
    }

    #[test]
    fn panel_shows_all_sections()
    {
        let identifier = RepositoryIdentifier::parse("a/b",).expect("valid identifier",);
        let mut stats = sample("a/b",);
        stats.stars = 12345;

        let panel = stats_panel(&identifier, &stats,);
        for expected in [
            "Repository: a/b",
            "Repository Information",
            "Repository Details",
            "Timestamps",
            "12,345",
            "2 (estimated)",
            "512 KB",
            "None",
            "2022-02-01T00:00:00Z",
        ] {
            assert!(panel.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn panel_shows_latest_release_when_present()
    {
        let identifier = RepositoryIdentifier::parse("a/b",).expect("valid identifier",);
        let mut stats = sample("a/b",);
        stats.latest_release = Some("v3.1.4".to_owned(),);

        assert!(stats_panel(&identifier, &stats).contains("v3.1.4"));
    }

    #[test]
    fn error_panel_names_input_and_message()
    {
        let panel = error_panel("bad", "Invalid format. Use 'owner/repo'",);
        assert!(panel.contains("Repository: bad"));
        assert!(panel.contains("Invalid format. Use 'owner/repo'"));
    }
}
