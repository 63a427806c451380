// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Parsing of `owner/name` repository identifiers.
//!
//! Identifiers are validated before any request is made, so a malformed
//! argument never costs a network round trip.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Owner and name of a repository hosted on GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Hash,)]
pub struct RepositoryIdentifier
{
    owner: String,
    name:  String,
}

impl RepositoryIdentifier
{
    /// Parses an identifier of the form `owner/name`.
    ///
    /// The input is split on the first `/`. Surrounding whitespace on each
    /// part is trimmed; both parts must be non-empty and the name must not
    /// contain a further separator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Identifier`] for any other shape of input.
    ///
    /// # Examples
    ///
    /// ```
    /// use repostats::RepositoryIdentifier;
    ///
    /// let identifier = RepositoryIdentifier::parse("rust-lang/cargo",)?;
    /// assert_eq!(identifier.owner(), "rust-lang");
    /// assert_eq!(identifier.name(), "cargo");
    /// # Ok::<(), repostats::Error>(())
    /// ```
    pub fn parse(input: &str,) -> Result<Self, Error,>
    {
        let (owner, name,) = input.split_once('/',).ok_or_else(|| Error::identifier(input,),)?;
        let owner = owner.trim();
        let name = name.trim();

        if owner.is_empty() || name.is_empty() || name.contains('/',) {
            return Err(Error::identifier(input,),);
        }

        Ok(Self {
            owner: owner.to_owned(), name: name.to_owned(),
        },)
    }

    /// Repository owner (user or organization).
    pub fn owner(&self,) -> &str
    {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self,) -> &str
    {
        &self.name
    }
}

impl FromStr for RepositoryIdentifier
{
    type Err = Error;

    fn from_str(input: &str,) -> Result<Self, Self::Err,>
    {
        Self::parse(input,)
    }
}

impl fmt::Display for RepositoryIdentifier
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
