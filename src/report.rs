// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Batch collection of repository statistics.
///
/// Every identifier yields exactly one [`FetchOutcome`]; a failure for one
/// repository never stops the batch.
use tracing::{debug, info};

use crate::{client::StatsSource, identifier::RepositoryIdentifier, stats::RepositoryStatistics};

/// Result of processing a single identifier.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum FetchOutcome
{
    /// Statistics fetched successfully.
    Fetched(RepositoryStatistics,),
    /// Validation or fetch failure with its user-facing message.
    Failed
    {
        /// Raw identifier as supplied.
        identifier: String,
        /// Message shown to the user.
        message:    String,
    },
}

/// Outcomes split into results and errors, both in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct BatchReport
{
    pub results: Vec<RepositoryStatistics,>,
    pub errors:  Vec<String,>,
}

impl BatchReport
{
    /// `true` when every identifier produced statistics.
    pub fn is_success(&self,) -> bool
    {
        self.errors.is_empty() && !self.results.is_empty()
    }
}

impl From<Vec<FetchOutcome,>,> for BatchReport
{
    fn from(outcomes: Vec<FetchOutcome,>,) -> Self
    {
        let mut report = Self::default();

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Fetched(stats,) => report.results.push(stats,),
                FetchOutcome::Failed {
                    message, ..
                } => report.errors.push(message,),
            }
        }

        report
    }
}

/// Validates and fetches each identifier sequentially, preserving order.
///
/// Identifier errors are recorded without issuing any request.
///
/// # Example
///
/// ```no_run
/// use repostats::{BatchReport, ClientConfig, StatsClient, collect_outcomes};
///
/// # async fn example() -> Result<(), repostats::Error> {
/// let client = StatsClient::new(&ClientConfig::new(None,),)?;
/// let identifiers = vec!["rust-lang/cargo".to_owned(), "bad-format".to_owned()];
/// let report = BatchReport::from(collect_outcomes(&client, &identifiers,).await,);
/// assert_eq!(report.errors.len(), 1);
/// # Ok(())
/// # }
/// ```
pub async fn collect_outcomes<S,>(source: &S, identifiers: &[String],) -> Vec<FetchOutcome,>
where
    S: StatsSource,
{
    let mut outcomes = Vec::with_capacity(identifiers.len(),);

    for raw in identifiers {
        let outcome = match RepositoryIdentifier::parse(raw,) {
            Ok(identifier,) => match source.fetch_stats(&identifier,).await {
                Ok(stats,) => FetchOutcome::Fetched(stats,),
                Err(error,) => {
                    debug!("failed to fetch {}: {}", identifier, error);
                    FetchOutcome::Failed {
                        identifier: raw.clone(),
                        message:    format!(
                            "Failed to fetch repository stats for {identifier}: {error}"
                        ),
                    }
                }
            },
            Err(error,) => {
                debug!("rejected identifier {:?}", raw);
                FetchOutcome::Failed {
                    identifier: raw.clone(), message: error.to_display_string(),
                }
            }
        };

        outcomes.push(outcome,);
    }

    let fetched =
        outcomes.iter().filter(|outcome| matches!(outcome, FetchOutcome::Fetched(_)),).count();
    info!("Fetched {} of {} repositories", fetched, identifiers.len());

    outcomes
}
