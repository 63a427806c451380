//! Client configuration and repository list documents.
//!
//! [`ClientConfig`] carries the read-only settings shared by every request in
//! a run: the API origin, the optional token and the per-request timeout.
//! Repository list files let a batch name its repositories in YAML (or JSON,
//! which is a subset) instead of on the command line.

use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Error, config_error};

/// Origin of the public GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings used to construct a [`StatsClient`](crate::StatsClient).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use repostats::ClientConfig;
///
/// let config = ClientConfig::new(Some("  ".to_owned(),),);
/// assert!(config.token().is_none());
/// assert_eq!(config.timeout(), Duration::from_secs(10,));
/// ```
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ClientConfig
{
    api_url: String,
    token:   Option<String,>,
    timeout: Duration,
}

impl ClientConfig
{
    /// Creates a configuration for the public API with the default timeout.
    ///
    /// Blank tokens are treated as absent.
    pub fn new(token: Option<String,>,) -> Self
    {
        let token = token.map(|value| value.trim().to_owned(),).filter(|value| !value.is_empty(),);

        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS,),
        }
    }

    /// Overrides the API origin, e.g. for GitHub Enterprise or tests.
    pub fn with_api_url(mut self, api_url: impl Into<String,>,) -> Self
    {
        self.api_url = api_url.into().trim_end_matches('/',).to_owned();
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration,) -> Self
    {
        self.timeout = timeout;
        self
    }

    /// API origin without a trailing slash.
    pub fn api_url(&self,) -> &str
    {
        &self.api_url
    }

    /// Token sent in the `Authorization` header, if any.
    pub fn token(&self,) -> Option<&str,>
    {
        self.token.as_deref()
    }

    /// Connect and read timeout applied to each request.
    pub fn timeout(&self,) -> Duration
    {
        self.timeout
    }
}

/// Root document of a repository list file.
///
/// # Examples
///
/// ```
/// use repostats::RepositoryList;
///
/// let yaml = r#"
/// repositories:
///   - rust-lang/cargo
///   - owner: tokio-rs
///     repository: tokio
/// "#;
/// let list: RepositoryList = serde_yaml::from_str(yaml,).expect("valid list",);
/// assert_eq!(list.identifiers(), vec!["rust-lang/cargo", "tokio-rs/tokio"]);
/// ```
#[derive(Debug, Default, Deserialize,)]
pub struct RepositoryList
{
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry,>,
}

/// Single entry of a repository list.
#[derive(Debug, Clone, Deserialize,)]
#[serde(untagged)]
pub enum RepositoryEntry
{
    /// Shorthand `owner/name` string.
    Slug(String,),
    /// Explicit owner and repository fields.
    Descriptor
    {
        #[serde(alias = "user")]
        owner:      String,
        #[serde(alias = "repo")]
        repository: String,
    },
}

impl RepositoryEntry
{
    /// Raw identifier string, validated later together with CLI arguments.
    pub fn identifier(&self,) -> String
    {
        match self {
            Self::Slug(slug,) => slug.trim().to_owned(),
            Self::Descriptor {
                owner,
                repository,
            } => format!("{}/{}", owner.trim(), repository.trim()),
        }
    }
}

impl RepositoryList
{
    /// Identifier strings in document order.
    pub fn identifiers(&self,) -> Vec<String,>
    {
        self.repositories.iter().map(RepositoryEntry::identifier,).collect()
    }
}

/// Loads identifier strings from a repository list file.
///
/// # Errors
///
/// Returns [`Error::Config`] when the file cannot be read or is not a valid
/// repository list document.
pub fn load_repository_list(path: &Path,) -> Result<Vec<String,>, Error,>
{
    let contents =
        fs::read_to_string(path,).map_err(|error| config_error(path, error.to_string(),),)?;
    let list: RepositoryList =
        serde_yaml::from_str(&contents,).map_err(|error| config_error(path, error.to_string(),),)?;

    Ok(list.identifiers(),)
}
