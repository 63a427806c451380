// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// GitHub REST client producing [`RepositoryStatistics`].
///
/// Each fetch issues the repository request followed by a best-effort
/// latest-release lookup. Failures of the primary request are translated
/// into [`Error`] variants carrying user-facing messages; failures of the
/// release lookup are folded into [`ReleaseLookup`] and never escape.
use std::{error::Error as _, future::Future, str::FromStr, sync::Arc};

use chrono::{DateTime, Local};
use http::{
    HeaderMap, HeaderName, HeaderValue, StatusCode, Uri,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_timeout::TimeoutConnector;
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use octocrab::{
    AuthState, Octocrab, OctocrabBuilder,
    service::middleware::{base_uri::BaseUriLayer, extra_headers::ExtraHeadersLayer},
};
use serde::Deserialize;
use tower_http::follow_redirect::FollowRedirectLayer;
use tracing::debug;

use crate::{
    config::ClientConfig,
    error::Error,
    identifier::RepositoryIdentifier,
    stats::{ReleasePayload, RepositoryPayload, RepositoryStatistics},
};

/// Media type selecting the structured JSON representation.
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// `User-Agent` sent with every request.
pub fn user_agent() -> String
{
    format!("repostats/{}", env!("CARGO_PKG_VERSION"))
}

/// Source of repository statistics consumed by the batch runner.
pub trait StatsSource
{
    /// Fetches statistics for a single repository.
    fn fetch_stats(
        &self,
        identifier: &RepositoryIdentifier,
    ) -> impl Future<Output = Result<RepositoryStatistics, Error,>,> + Send;
}

/// Outcome of the secondary `releases/latest` request.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum ReleaseLookup
{
    /// The repository has a latest release with this tag.
    Found(String,),
    /// The repository has no releases.
    Absent,
    /// The lookup failed; the reason is only logged.
    Failed(String,),
}

impl ReleaseLookup
{
    /// Tag to store in the statistics record.
    pub fn into_tag(self,) -> Option<String,>
    {
        match self {
            Self::Found(tag,) => Some(tag,),
            Self::Absent | Self::Failed(_,) => None,
        }
    }
}

/// HTTP client for the repository statistics endpoints.
#[derive(Clone,)]
pub struct StatsClient
{
    octocrab: Octocrab,
}

impl StatsClient
{
    /// Builds a client from the provided configuration.
    ///
    /// The HTTP stack is assembled here rather than through octocrab's
    /// default builder so that every request carries exactly the headers
    /// below, with no retry or tracing layers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Client`] when the API origin is not a valid URI, a
    /// header value is not valid ASCII, or the TLS roots cannot be loaded.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repostats::{ClientConfig, RepositoryIdentifier, StatsClient, StatsSource};
    ///
    /// # async fn example() -> Result<(), repostats::Error> {
    /// let client = StatsClient::new(&ClientConfig::new(None,),)?;
    /// let identifier = RepositoryIdentifier::parse("rust-lang/cargo",)?;
    /// let stats = client.fetch_stats(&identifier,).await?;
    /// println!("{} has {} stars", stats.name, stats.stars);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &ClientConfig,) -> Result<Self, Error,>
    {
        let base_uri = Uri::from_str(config.api_url(),).map_err(|e| Error::Client {
            message: format!("invalid API URL '{}': {e}", config.api_url()),
        },)?;

        let connector = HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| Error::Client {
                message: format!("failed to load TLS roots: {e}"),
            },)?
            .https_or_http()
            .enable_http1()
            .build();
        let mut connector = TimeoutConnector::new(connector,);
        connector.set_connect_timeout(Some(config.timeout(),),);
        connector.set_read_timeout(Some(config.timeout(),),);

        let http = Client::builder(TokioExecutor::new(),).build(connector,);

        let octocrab = OctocrabBuilder::new_empty()
            .with_service(http,)
            .with_layer(&FollowRedirectLayer::new(),)
            .with_layer(&ExtraHeadersLayer::new(Arc::new(request_headers(config,)?,),),)
            .with_layer(&BaseUriLayer::new(base_uri,),)
            .with_auth(AuthState::None,)
            .build()
            .unwrap_or_else(|never| match never {},);

        Ok(Self {
            octocrab,
        },)
    }

    async fn repository(
        &self,
        identifier: &RepositoryIdentifier,
    ) -> Result<RepositoryPayload, Error,>
    {
        let route = format!("/repos/{}/{}", identifier.owner(), identifier.name());
        debug!("GET {}", route);

        let response =
            self.octocrab._get(route,).await.map_err(|e| Error::transport(describe(&e,),),)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = self
            .octocrab
            .body_to_string(response,)
            .await
            .map_err(|e| Error::transport(describe(&e,),),)?;

        if !status.is_success() {
            return Err(status_error(identifier, status, &headers, &body,),);
        }

        serde_json::from_str(&body,).map_err(|source| Error::Decode {
            source,
        },)
    }

    async fn latest_release(&self, identifier: &RepositoryIdentifier,) -> ReleaseLookup
    {
        let route = format!("/repos/{}/{}/releases/latest", identifier.owner(), identifier.name());
        debug!("GET {}", route);

        let response = match self.octocrab._get(route,).await {
            Ok(response,) => response,
            Err(e,) => return ReleaseLookup::Failed(describe(&e,),),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return ReleaseLookup::Absent;
        }
        if !status.is_success() {
            return ReleaseLookup::Failed(format!("unexpected status {status}"),);
        }

        let body = match self.octocrab.body_to_string(response,).await {
            Ok(body,) => body,
            Err(e,) => return ReleaseLookup::Failed(describe(&e,),),
        };

        match serde_json::from_str::<ReleasePayload,>(&body,) {
            Ok(ReleasePayload {
                tag_name: Some(tag,),
            },) if !tag.is_empty() => ReleaseLookup::Found(tag,),
            Ok(_,) => ReleaseLookup::Absent,
            Err(e,) => ReleaseLookup::Failed(e.to_string(),),
        }
    }
}

impl StatsSource for StatsClient
{
    async fn fetch_stats(
        &self,
        identifier: &RepositoryIdentifier,
    ) -> Result<RepositoryStatistics, Error,>
    {
        let payload = self.repository(identifier,).await?;

        let release = self.latest_release(identifier,).await;
        if let ReleaseLookup::Failed(reason,) = &release {
            debug!("release lookup for {} skipped: {}", identifier, reason);
        }

        Ok(RepositoryStatistics::from_payload(identifier, payload, release.into_tag(),),)
    }
}

/// Headers attached to every request.
fn request_headers(config: &ClientConfig,) -> Result<Vec<(HeaderName, HeaderValue,),>, Error,>
{
    let invalid = |name: &str| Error::Client {
        message: format!("invalid {name} header value"),
    };

    let mut headers = vec![
        (ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE,),),
        (USER_AGENT, HeaderValue::from_str(&user_agent(),).map_err(|_| invalid("User-Agent",),)?,),
    ];

    if let Some(token,) = config.token() {
        let mut value = HeaderValue::from_str(&format!("token {token}"),)
            .map_err(|_| invalid("Authorization",),)?;
        value.set_sensitive(true,);
        headers.push((AUTHORIZATION, value,),);
    }

    Ok(headers,)
}

/// Describes an octocrab failure by its chain of causes.
///
/// octocrab's own `Display` ends with a captured backtrace, so only the
/// underlying errors are used; the first paragraph of the outer message is
/// the fallback when there is no cause.
fn describe(error: &octocrab::Error,) -> String
{
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause,) = current {
        if cause.downcast_ref::<octocrab::Error,>().is_none() {
            causes.push(cause.to_string(),);
        }
        current = cause.source();
    }

    if causes.is_empty() {
        let message = error.to_string();
        return message.split("\n\n",).next().unwrap_or_default().trim().to_owned();
    }

    causes.join(": ",)
}

#[derive(Debug, Deserialize,)]
struct ErrorBody
{
    message: Option<String,>,
}

/// Translates a non-success response into the matching [`Error`] variant.
fn status_error(
    identifier: &RepositoryIdentifier,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> Error
{
    if status == StatusCode::NOT_FOUND {
        return Error::NotFound {
            owner: identifier.owner().to_owned(),
            name:  identifier.name().to_owned(),
        };
    }

    if status == StatusCode::FORBIDDEN && header_value(headers, RATE_LIMIT_REMAINING,) == Some("0",)
    {
        let reset_clause = header_value(headers, RATE_LIMIT_RESET,)
            .and_then(format_reset_time,)
            .map(|time| format!(" (resets at {time})"),)
            .unwrap_or_default();

        return Error::RateLimited {
            reset_clause,
        };
    }

    let message = serde_json::from_str::<ErrorBody,>(body,).ok().and_then(|body| body.message,);
    let reason = status.canonical_reason().unwrap_or("Unknown Status",);

    Error::status(status.as_u16(), reason, message.as_deref(),)
}

fn header_value<'a,>(headers: &'a HeaderMap, name: &str,) -> Option<&'a str,>
{
    headers.get(name,).and_then(|value| value.to_str().ok(),).map(str::trim,)
}

/// Renders a Unix timestamp as local `HH:MM:SS`, or `None` if it is invalid.
fn format_reset_time(raw: &str,) -> Option<String,>
{
    let seconds = raw.parse::<i64,>().ok()?;
    let reset = DateTime::from_timestamp(seconds, 0,)?;

    Some(reset.with_timezone(&Local,).format("%H:%M:%S",).to_string(),)
}
