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

use nom::error::{ErrorKind as NomErrorKind, ParseError};
use std::fmt;

use super::{ErrorInput, ErrorKind};

/// A generic parsing error raised by `nom`, which has not been converted into a more
/// user-friendly kind.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("internal parsing error: {0:?}")]
pub struct GenericParseError(NomErrorKind);

impl GenericParseError {
    pub(crate) fn new(kind: NomErrorKind) -> Self {
        Self(kind)
    }
}

/// The error type used inside the lexer and parser.
///
/// Unlike [`Error`](super::Error) this keeps the raw input around, so that file location
/// information is only computed once the error escapes the parser.
#[derive(Debug)]
pub(crate) struct InternalError<I, E>
where
    E: std::error::Error + Send,
{
    pub(crate) input: I,
    pub(crate) error: ErrorKind<E>,
    pub(crate) prev: Option<Box<Self>>,
}

impl<I, E> InternalError<I, E>
where
    I: ErrorInput,
    E: std::error::Error + Send,
{
    /// Create a new error from the given input and error kind.
    pub(crate) fn from_kind(input: I, error: E) -> Self {
        Self {
            input,
            error: ErrorKind::Other(error),
            prev: None,
        }
    }

    /// Attach a previous error to this one.
    pub(crate) fn with_previous(mut self, prev: Self) -> Self {
        self.prev = Some(Box::new(prev));
        self
    }
}

impl<I, E> ParseError<I> for InternalError<I, E>
where
    I: ErrorInput,
    E: std::error::Error + Send,
{
    fn from_error_kind(input: I, kind: NomErrorKind) -> Self {
        Self {
            input,
            error: ErrorKind::Internal(GenericParseError::new(kind)),
            prev: None,
        }
    }

    fn append(_input: I, _kind: NomErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E> fmt::Display for InternalError<I, E>
where
    I: ErrorInput,
    E: std::error::Error + Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at line {}, column {}: {}",
            self.input.line(),
            self.input.column(),
            self.error
        )
    }
}
