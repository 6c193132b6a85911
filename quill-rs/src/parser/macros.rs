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

/// Return an error stating that `$expected` was wanted where `$actual` was found.
#[macro_export]
macro_rules! expected_token {
    ($input: expr, $actual:expr, $expected:expr) => {{
        use $crate::parser::error::{InternalError, ParserErrorKind};
        Err(nom::Err::Error(InternalError::from_kind(
            $input,
            ParserErrorKind::ExpectedToken {
                actual: $actual.clone(),
                expected: $expected,
            },
        )))
    }};
}

/// Build a parser which consumes a single token of the given variant.
///
/// * `token!(Semicolon)` matches a unit variant and returns `()`.
/// * `token!(Command(Qreg))` matches a variant wrapping a specific value and returns `()`.
/// * `token!(Identifier(v))` matches a variant wrapping any value and returns a clone of it.
#[macro_export]
macro_rules! token {
    ($expected_variant: ident($enm:ident::$variant:ident)) => {{
        use $crate::parser::lexer::$enm;
        use $crate::parser::lexer::Token;
        move |input: ParserInput<'a>| match $crate::parser::split_first_token(input) {
            None => $crate::unexpected_eof!(input),
            Some((Token::$expected_variant($enm::$variant), remainder)) => Ok((remainder, ())),
            Some((other_token, _)) => {
                $crate::expected_token!(
                    input,
                    other_token,
                    format!("{}", $enm::$variant)
                )
            }
        }
    }};
    ($expected_variant: ident($contents: ident)) => {{
        use $crate::parser::lexer::Token;
        move |input: ParserInput<'a>| match $crate::parser::split_first_token(input) {
            None => $crate::unexpected_eof!(input),
            Some((Token::$expected_variant($contents), remainder)) => {
                Ok((remainder, $contents.clone()))
            }
            Some((other_token, _)) => {
                $crate::expected_token!(
                    input,
                    other_token,
                    stringify!($expected_variant).to_lowercase()
                )
            }
        }
    }};
    ($expected_variant: ident) => {{
        use $crate::parser::lexer::Token;
        move |input: ParserInput<'a>| match $crate::parser::split_first_token(input) {
            None => $crate::unexpected_eof!(input),
            Some((Token::$expected_variant, remainder)) => Ok((remainder, ())),
            Some((other_token, _)) => {
                $crate::expected_token!(
                    input,
                    other_token,
                    format!("{}", Token::$expected_variant)
                )
            }
        }
    }};
}

#[macro_export]
macro_rules! unexpected_eof {
    ($input: expr) => {{
        use $crate::parser::error::{InternalError, ParserErrorKind};
        Err(nom::Err::Error(InternalError::from_kind(
            $input,
            ParserErrorKind::UnexpectedEOF("something else"),
        )))
    }};
}
