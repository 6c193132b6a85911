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

use crate::parser::{error::ErrorInput, LexError, ParseError};

/// Errors that may occur while parsing OpenQASM source into a [`Program`](crate::program::Program)
/// or an [`Expression`](crate::expression::Expression).
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ProgramError {
    #[error("failed to lex input: {0:#}")]
    Lex(#[from] LexError),
    #[error("failed to parse input: {0:#}")]
    Parse(#[from] ParseError),
    #[error("unexpected input at line {line}, column {column} ({snippet})")]
    Leftover {
        line: u32,
        column: usize,
        snippet: String,
    },
    #[error("input ended unexpectedly")]
    Incomplete,
}

/// Unwrap the result of a complete parse, failing with [`ProgramError::Leftover`] if the parser
/// stopped before the end of the input.
pub(crate) fn disallow_leftover<I, O>(
    result: nom::IResult<I, O, ParseError>,
) -> Result<O, ProgramError>
where
    I: ErrorInput,
{
    match result {
        Ok((leftover, parsed)) => {
            if leftover.is_empty() {
                Ok(parsed)
            } else {
                Err(ProgramError::Leftover {
                    line: leftover.line(),
                    column: leftover.column(),
                    snippet: leftover.snippet(),
                })
            }
        }
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => Err(ProgramError::Parse(err)),
        Err(nom::Err::Incomplete(_)) => Err(ProgramError::Incomplete),
    }
}
