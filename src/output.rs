// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Destinations for rendered reports and the error summary.
use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use crate::{
    error::{Error, output_error},
    render::OutputFormat,
};

/// Where a rendered report is written.
#[derive(Debug, Clone, PartialEq, Eq, Default,)]
pub enum Destination
{
    /// Standard output, framed by blank lines.
    #[default]
    Stdout,
    /// A file whose content ends with exactly one newline.
    File(PathBuf,),
}

impl From<Option<PathBuf,>,> for Destination
{
    fn from(path: Option<PathBuf,>,) -> Self
    {
        path.map_or(Self::Stdout, Self::File,)
    }
}

/// Writes a rendered report to its destination.
///
/// For [`Destination::Stdout`] the document is written to `console` with one
/// leading and one trailing blank line. For [`Destination::File`] the file
/// receives the document with exactly one trailing newline and `console`
/// receives a confirmation line.
///
/// # Errors
///
/// Returns [`Error::Output`] when the file cannot be written. Failures to
/// write to `console` are reported the same way against `<stdout>`.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
///
/// use repostats::{Destination, OutputFormat, write_output};
///
/// # fn example() -> Result<(), repostats::Error> {
/// let destination = Destination::File(PathBuf::from("stats.json",),);
/// write_output("{}", OutputFormat::Json, &destination, &mut std::io::stdout(),)?;
/// # Ok(())
/// # }
/// ```
pub fn write_output<W: Write,>(
    rendered: &str,
    format: OutputFormat,
    destination: &Destination,
    console: &mut W,
) -> Result<(), Error,>
{
    match destination {
        Destination::Stdout => {
            writeln!(console, "\n{rendered}\n").map_err(console_error,)?;
        }
        Destination::File(path,) => {
            let mut contents = rendered.trim_end_matches(['\n', '\r',],).to_owned();
            contents.push('\n',);
            fs::write(path, contents,).map_err(|source| output_error(path, source,),)?;

            writeln!(console, "Wrote {format} output to {}", path.display())
                .map_err(console_error,)?;
        }
    }

    Ok((),)
}

/// Writes collected per-identifier errors, preceded by one blank line.
///
/// Nothing is written when `errors` is empty.
pub fn write_errors<W: Write,>(errors: &[String], stream: &mut W,) -> io::Result<(),>
{
    if errors.is_empty() {
        return Ok((),);
    }

    writeln!(stream)?;
    for error in errors {
        writeln!(stream, "Error: {error}")?;
    }

    Ok((),)
}

fn console_error(source: io::Error,) -> Error
{
    output_error(std::path::Path::new("<stdout>",), source,)
}
