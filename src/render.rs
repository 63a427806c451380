// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Rendering of statistics records as text, JSON or YAML.
///
/// Renderers return the document without a trailing newline; the output
/// layer decides how the document is framed on its destination.
use std::fmt;

use clap::ValueEnum;

use crate::{
    error::Error,
    stats::{RepositoryStatistics, is_unknown},
};

/// Width the text labels are padded to.
const LABEL_WIDTH: usize = 12;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum,)]
pub enum OutputFormat
{
    /// Aligned `label : value` rows.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML document.
    Yaml,
}

impl fmt::Display for OutputFormat
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Yaml => "yaml",
        };
        f.write_str(name,)
    }
}

/// Renders the results in the requested format.
///
/// JSON and YAML produce a single document for exactly one result and a
/// sequence otherwise. Text renders one block per result separated by a
/// blank line.
///
/// # Errors
///
/// Returns [`Error::Serialize`] or [`Error::SerializeYaml`] when encoding
/// fails.
///
/// # Examples
///
/// ```
/// use repostats::{OutputFormat, RepositoryStatistics, render};
///
/// let stats = RepositoryStatistics {
///     name:               "octocat/hello".to_owned(),
///     stars:              1500,
///     forks:              3,
///     open_issues:        0,
///     watchers:           7,
///     created_at:         "2011-01-26T19:01:12Z".to_owned(),
///     updated_at:         "2011-01-26T19:14:43Z".to_owned(),
///     language:           "Rust".to_owned(),
///     license:            "MIT".to_owned(),
///     size:               108,
///     default_branch:     "main".to_owned(),
///     open_pull_requests: 0,
///     latest_release:     None,
/// };
/// let text = render(&[stats,], OutputFormat::Text,)?;
/// assert!(text.contains("Stars       : 1,500"));
/// # Ok::<(), repostats::Error>(())
/// ```
pub fn render(results: &[RepositoryStatistics], format: OutputFormat,) -> Result<String, Error,>
{
    match format {
        OutputFormat::Text => Ok(render_text(results,),),
        OutputFormat::Json => render_json(results,),
        OutputFormat::Yaml => render_yaml(results,),
    }
}

fn render_json(results: &[RepositoryStatistics],) -> Result<String, Error,>
{
    let rendered = match results {
        [single,] => serde_json::to_string_pretty(single,)?,
        many => serde_json::to_string_pretty(many,)?,
    };

    Ok(rendered,)
}

fn render_yaml(results: &[RepositoryStatistics],) -> Result<String, Error,>
{
    let rendered = match results {
        [single,] => serde_yaml::to_string(single,)?,
        many => serde_yaml::to_string(many,)?,
    };

    Ok(rendered.trim_end().to_owned(),)
}

fn render_text(results: &[RepositoryStatistics],) -> String
{
    results.iter().map(text_block,).collect::<Vec<_,>>().join("\n\n",)
}

fn text_block(stats: &RepositoryStatistics,) -> String
{
    let header = format!("{} statistics", stats.name);
    let mut block = String::with_capacity(512,);
    block.push_str(&header,);
    block.push('\n',);
    block.push_str(&"-".repeat(header.chars().count(),),);

    for (label, value,) in text_rows(stats,) {
        block.push('\n',);
        block.push_str(&format!("{label:<width$}: {value}", width = LABEL_WIDTH),);
    }

    block
}

/// Label/value rows for a record; optional rows are skipped when empty.
fn text_rows(stats: &RepositoryStatistics,) -> Vec<(&'static str, String,),>
{
    let mut rows = vec![
        ("Stars", group_thousands(stats.stars,),),
        ("Forks", group_thousands(stats.forks,),),
        ("Open issues", group_thousands(stats.open_issues,),),
        ("Watchers", group_thousands(stats.watchers,),),
    ];

    if stats.open_pull_requests > 0 {
        rows.push(("Open PRs", format!("{} (estimated)", group_thousands(stats.open_pull_requests)),),);
    }

    rows.push(("Language", stats.language.clone(),),);

    if !is_unknown(&stats.license,) {
        rows.push(("License", stats.license.clone(),),);
    }
    if stats.size > 0 {
        rows.push(("Size", format_size(stats.size,),),);
    }
    if !is_unknown(&stats.default_branch,) {
        rows.push(("Branch", stats.default_branch.clone(),),);
    }
    if let Some(release,) = &stats.latest_release {
        rows.push(("Release", release.clone(),),);
    }

    rows.push(("Created", stats.created_at.clone(),),);
    rows.push(("Updated", stats.updated_at.clone(),),);
    rows
}

/// Formats a count with comma thousands separators.
pub fn group_thousands(value: u64,) -> String
{
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3,);

    for (index, digit,) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',',);
        }
        grouped.push(digit,);
    }

    grouped
}

/// Formats a size given in kilobytes, switching to megabytes from 1024 KB.
pub fn format_size(kilobytes: u64,) -> String
{
    if kilobytes < 1024 {
        format!("{kilobytes} KB")
    } else {
        format!("{:.1} MB", kilobytes as f64 / 1024.0)
    }
}
