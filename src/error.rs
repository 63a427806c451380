#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the repostats crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Variants fall into two groups. Identifier, transport, status and decoding
//! errors describe a single repository and are collected per identifier by
//! the batch runner. The remaining variants abort the whole run.

use std::path::{Path, PathBuf};

/// Unified error type returned by the client, the renderers and the CLI.
///
/// Display strings are written for end users: they never include the
/// variant name or the debug representation of a source error.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Raised when an identifier is not of the form `owner/name`.
    #[error("Repository should be in the format 'owner/repo' (got '{input}')")]
    Identifier {
        /// Raw identifier as supplied by the user.
        input: String
    },
    /// Connection failures and timeouts while talking to the API.
    #[error("GitHub request failed: {message}")]
    Transport {
        /// Description reported by the HTTP stack.
        message: String
    },
    /// The API answered 404 for the requested repository.
    #[error("Repository '{owner}/{name}' not found. Check the repository name and your access.")]
    NotFound {
        /// Requested repository owner.
        owner: String,
        /// Requested repository name.
        name:  String
    },
    /// The API answered 403 and reported an exhausted quota.
    #[error(
        "GitHub API rate limit exceeded. Try authenticating with a token: repostats --token \
         YOUR_TOKEN owner/repo{reset_clause}"
    )]
    RateLimited {
        /// Either empty or ` (resets at HH:MM:SS)`.
        reset_clause: String
    },
    /// Any other non-success status.
    #[error("{summary}")]
    Status {
        /// Numeric HTTP status.
        status:  u16,
        /// `{status} {reason}` optionally followed by `: {message}`.
        summary: String
    },
    /// The API returned a body that could not be decoded.
    #[error("GitHub returned an invalid response body: {source}")]
    Decode {
        /// Underlying decoding error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing the rendered report.
    #[error("failed to write output to {path:?}: {source}")]
    Output {
        /// Destination file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps JSON serialization errors when rendering reports.
    #[error("failed to serialize statistics: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps YAML serialization errors when rendering reports.
    #[error("failed to serialize statistics: {source}")]
    SerializeYaml {
        /// Underlying serialization error.
        source: serde_yaml::Error
    },
    /// Raised when a repository list file cannot be read or parsed.
    #[error("failed to load repository list from {path:?}: {message}")]
    Config {
        /// Location of the repository list.
        path:    PathBuf,
        /// Human readable description of the failure.
        message: String
    },
    /// Returned when the command line violates invariants.
    #[error("invalid arguments: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// The HTTP client could not be constructed.
    #[error("failed to initialize GitHub client: {message}")]
    Client {
        /// Human readable message describing the failure.
        message: String
    },
    /// Prompt or screen failures in the interactive dashboard.
    #[error("terminal error: {message}")]
    Terminal {
        /// Human readable message describing the failure.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs an identifier error for the raw user input.
    pub fn identifier<M>(input: M) -> Self
    where
        M: Into<String>
    {
        Self::Identifier {
            input: input.into()
        }
    }

    /// Constructs a transport error from the HTTP stack's description.
    pub fn transport<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Transport {
            message: message.into()
        }
    }

    /// Constructs a generic status error.
    ///
    /// # Parameters
    ///
    /// * `status` - Numeric HTTP status.
    /// * `reason` - Canonical reason phrase for the status.
    /// * `message` - `message` field of the JSON error body, if any.
    pub fn status(status: u16, reason: &str, message: Option<&str>) -> Self {
        let summary = match message {
            Some(message) => format!("{status} {reason}: {message}"),
            None => format!("{status} {reason}")
        };

        Self::Status {
            status,
            summary
        }
    }

    /// Constructs a terminal error from the provided displayable value.
    pub fn terminal<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Terminal {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::SerializeYaml {
            source
        }
    }
}

/// Creates an [`Error::Output`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Destination file that could not be written.
/// * `source` - I/O error reported by the operating system.
pub fn output_error(path: &Path, source: std::io::Error) -> Error {
    Error::Output {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Config`] variant for a repository list file.
pub fn config_error<M>(path: &Path, message: M) -> Error
where
    M: Into<String>
{
    Error::Config {
        path:    path.to_path_buf(),
        message: message.into()
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::identifier("bad-format");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn status_with_message_includes_it_verbatim() {
        let error = Error::status(500, "Internal Server Error", Some("Server Error"));
        assert_eq!(error.to_string(), "500 Internal Server Error: Server Error");
        assert!(matches!(error, Error::Status { status: 500, .. }));
    }

    #[test]
    fn status_without_message_falls_back_to_reason() {
        let error = Error::status(502, "Bad Gateway", None);
        assert_eq!(error.to_string(), "502 Bad Gateway");
    }

    #[test]
    fn not_found_names_the_repository() {
        let error = Error::NotFound {
            owner: "test".to_owned(),
            name:  "missing".to_owned()
        };
        let message = error.to_string();
        assert!(message.contains("test/missing"));
        assert!(message.to_lowercase().contains("not found"));
    }

    #[test]
    fn rate_limited_appends_reset_clause() {
        let error = Error::RateLimited {
            reset_clause: " (resets at 12:00:00)".to_owned()
        };
        let message = error.to_string();
        assert!(message.contains("Try authenticating with a token"));
        assert!(message.ends_with("owner/repo (resets at 12:00:00)"));
    }

    #[test]
    fn output_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/report.json");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::output_error(path, io_error);

        match error {
            Error::Output {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected output error, got {other:?}")
        }
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }
}
