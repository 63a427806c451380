// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Repository statistics record and the mapping from API payloads.
///
/// The payload types mirror the subset of the GitHub repository resource the
/// record needs. Every field is optional so sparse bodies still decode; the
/// defaults are applied when building [`RepositoryStatistics`].
use serde::{Deserialize, Serialize};

use crate::identifier::RepositoryIdentifier;

/// Placeholder for missing string fields.
pub const UNKNOWN: &str = "Unknown";

/// Flat statistics for a single repository.
///
/// Field order is the serialization order of the JSON and YAML renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepositoryStatistics
{
    /// Full `owner/name` of the repository.
    pub name:               String,
    pub stars:              u64,
    pub forks:              u64,
    pub open_issues:        u64,
    pub watchers:           u64,
    /// Opaque ISO-8601 timestamp.
    pub created_at:         String,
    /// Opaque ISO-8601 timestamp.
    pub updated_at:         String,
    pub language:           String,
    /// SPDX identifier of the license.
    pub license:            String,
    /// Repository size in kilobytes.
    pub size:               u64,
    pub default_branch:     String,
    /// Estimated count: `open_issues_count - open_issues` from the payload.
    pub open_pull_requests: u64,
    pub latest_release:     Option<String,>,
}

/// Repository resource as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Default, Deserialize,)]
pub(crate) struct RepositoryPayload
{
    full_name:         Option<String,>,
    stargazers_count:  Option<u64,>,
    forks_count:       Option<u64,>,
    open_issues_count: Option<u64,>,
    open_issues:       Option<u64,>,
    subscribers_count: Option<u64,>,
    created_at:        Option<String,>,
    updated_at:        Option<String,>,
    language:          Option<String,>,
    license:           Option<LicensePayload,>,
    size:              Option<u64,>,
    default_branch:    Option<String,>,
}

#[derive(Debug, Default, Deserialize,)]
struct LicensePayload
{
    spdx_id: Option<String,>,
}

/// Release resource as returned by `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Debug, Default, Deserialize,)]
pub(crate) struct ReleasePayload
{
    pub(crate) tag_name: Option<String,>,
}

impl RepositoryStatistics
{
    /// Builds the record from a decoded payload and the release lookup.
    pub(crate) fn from_payload(
        identifier: &RepositoryIdentifier,
        payload: RepositoryPayload,
        latest_release: Option<String,>,
    ) -> Self
    {
        let open_issues_count = payload.open_issues_count.unwrap_or(0,);
        let open_issues = payload.open_issues.unwrap_or(0,);

        Self {
            name: payload.full_name.unwrap_or_else(|| identifier.to_string(),),
            stars: payload.stargazers_count.unwrap_or(0,),
            forks: payload.forks_count.unwrap_or(0,),
            open_issues: open_issues_count,
            watchers: payload.subscribers_count.unwrap_or(0,),
            created_at: or_unknown(payload.created_at,),
            updated_at: or_unknown(payload.updated_at,),
            language: or_unknown(payload.language,),
            license: or_unknown(payload.license.and_then(|license| license.spdx_id,),),
            size: payload.size.unwrap_or(0,),
            default_branch: or_unknown(payload.default_branch,),
            open_pull_requests: open_issues_count.saturating_sub(open_issues,),
            latest_release,
        }
    }
}

fn or_unknown(value: Option<String,>,) -> String
{
    value.filter(|value| !value.is_empty(),).unwrap_or_else(|| UNKNOWN.to_owned(),)
}

/// Returns `true` when the value is the [`UNKNOWN`] sentinel.
pub fn is_unknown(value: &str,) -> bool
{
    value == UNKNOWN
}
