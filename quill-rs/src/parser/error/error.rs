// Copyright 2022 Rigetti Computing
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::parser::error::{ErrorInput, ErrorKind, InternalError};
use std::convert::Infallible;
use std::fmt;

/// An error that may occur while parsing.
///
/// This error contains file location information, to assist with debugging.
///
/// # Display
///
/// The [`Display`](fmt::Display) impl for this error allows for alternate outputs.
///
/// The standard output (i.e., with `format!("{}", err)`) outputs just this error, including file
/// location information.
///
/// The alternate output (i.e., with `format!("{:#}", err)`) outputs this error as well a
/// user-readable backtrace of the errors that caused this one.
///
/// When displaying errors to end-users, prefer the alternate format for easier debugging.
#[derive(Debug)]
pub struct Error<E = Infallible>
where
    E: std::error::Error + Send,
{
    line: u32,
    column: usize,
    snippet: String,
    kind: ErrorKind<E>,
    previous: Option<Box<dyn std::error::Error + 'static + Send + Sync>>,
}

impl<I, E> From<InternalError<I, E>> for Error<E>
where
    I: ErrorInput,
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(internal: InternalError<I, E>) -> Self {
        let mut new = Self::internal_new(internal.input, internal.error);
        if let Some(prev) = internal.prev {
            let prev = Self::from(*prev);
            new = new.with_previous(prev);
        }
        new
    }
}

impl<E> PartialEq for Error<E>
where
    E: std::error::Error + PartialEq + Send,
{
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line
            && self.column == other.column
            && self.snippet == other.snippet
            && self.kind == other.kind
            && match (&self.previous, &other.previous) {
                (None, None) => true,
                (None, Some(_)) => false,
                (Some(_), None) => false,
                (Some(left), Some(right)) => left.to_string() == right.to_string(),
            }
    }
}

impl<E> Error<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Attach a previous error to this one.
    pub(crate) fn with_previous<E2>(mut self, previous: E2) -> Self
    where
        E2: std::error::Error + 'static + Send + Sync,
    {
        self.previous = Some(Box::new(previous));
        self
    }

    fn internal_new<I>(input: I, kind: ErrorKind<E>) -> Self
    where
        I: ErrorInput,
    {
        let line = input.line();
        let column = input.column();
        let snippet = input.snippet();
        Self {
            line,
            column,
            snippet,
            kind,
            previous: None,
        }
    }

    /// The line where the error occurred.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The column where the error occurred.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The kind of error that occurred.
    pub fn kind(&self) -> &ErrorKind<E> {
        &self.kind
    }
}

impl<E> fmt::Display for Error<E>
where
    ErrorKind<E>: fmt::Display,
    E: std::error::Error + Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at line {}, column {} ({}): {}",
            self.line, self.column, self.snippet, self.kind
        )?;
        if f.alternate() {
            if let Some(previous) = &self.previous {
                write!(f, "\n\tcause: {previous}")?;
            }
        }
        Ok(())
    }
}

impl<E> std::error::Error for Error<E>
where
    E: std::error::Error + Send,

    Self: fmt::Display + fmt::Debug,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.previous
            .as_ref()
            .map(|prev| prev.as_ref() as &(dyn std::error::Error + 'static))
    }
}
