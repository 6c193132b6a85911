// Copyright 2021 Rigetti Computing
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

//! An OpenQASM 2 lexer and parser built on `nom`.
//!
//! Input text is first split into [`TokenWithLocation`]s, which the parser then consumes as a
//! slice, so that every error can point at the line and column of the offending token.

use nom::IResult;

pub(crate) use error::InternalParseError;
pub use error::{ErrorKind, GenericParseError, ParseError, ParserErrorKind};
pub(crate) use expression::parse_expression;
pub(crate) use lexer::lex;
pub use lexer::{LexError, LexErrorKind};
use lexer::{Token, TokenWithLocation};
pub(crate) use statement::parse_program;

mod common;
pub(crate) mod error;
mod expression;
pub(crate) mod lexer;
mod macros;
mod statement;
mod token;

pub(crate) type ParserInput<'a> = &'a [TokenWithLocation<'a>];
type InternalParserResult<'a, R, E = InternalParseError<'a>> = IResult<ParserInput<'a>, R, E>;

/// Returns the next token of the input, along with the rest of the input.
pub(crate) fn split_first_token(input: ParserInput<'_>) -> Option<(&Token, ParserInput<'_>)> {
    input
        .split_first()
        .map(|(first, rest)| (first.as_token(), rest))
}

/// Returns the next token of the input, without consuming it.
pub(crate) fn first_token(input: ParserInput<'_>) -> Option<&Token> {
    input.first().map(TokenWithLocation::as_token)
}
