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

mod error;
mod wrapped_parsers;

use nom::{
    bytes::complete::{is_not, take_while, take_while1},
    character::complete::multispace1,
    combinator::{all_consuming, map, opt, recognize, value},
    multi::many0,
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult,
};
use nom_locate::LocatedSpan;
use wrapped_parsers::{alt, tag};

pub use super::token::{Token, TokenWithLocation};
use crate::parser::lexer::wrapped_parsers::expecting;
use crate::parser::token::token_with_location;
pub(crate) use error::InternalLexError;
pub use error::{LexError, LexErrorKind};

/// Statement keywords of OpenQASM 2.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    Barrier,
    Creg,
    Gate,
    If,
    Include,
    Measure,
    Opaque,
    #[strum(to_string = "OPENQASM")]
    OpenQasm,
    Qreg,
    Reset,
}

/// Gate modifiers, written before a gate call and separated from it with `@`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Modifier {
    Ctrl,
    Inv,
}

#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
pub enum Operator {
    #[strum(serialize = "^")]
    Caret,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "/")]
    Slash,
    #[strum(serialize = "*")]
    Star,
}

pub type LexInput<'a> = LocatedSpan<&'a str>;
pub(crate) type InternalLexResult<'a, T = Token, E = InternalLexError<'a>> =
    IResult<LexInput<'a>, T, E>;
pub type LexResult<'a, T = Token, E = LexError> = IResult<LexInput<'a>, T, E>;

/// Completely lex a string, returning the tokens within.
pub(crate) fn lex(input: LexInput) -> Result<Vec<TokenWithLocation>, LexError> {
    all_consuming(_lex)(input)
        .finish()
        .map(|(_, tokens)| tokens)
        .map_err(LexError::from)
}

fn _lex(input: LexInput) -> InternalLexResult<Vec<TokenWithLocation>> {
    preceded(skip_trivia, many0(terminated(lex_token, skip_trivia)))(input)
}

/// Whitespace, newlines included, and comments carry no meaning in OpenQASM.
fn skip_trivia(input: LexInput) -> InternalLexResult<()> {
    value(
        (),
        many0(alt("whitespace or a comment", (multispace1, lex_comment))),
    )(input)
}

fn lex_token(input: LexInput) -> InternalLexResult<TokenWithLocation> {
    alt(
        "a token",
        (
            // Punctuation must come before operators so that `->` is not read as a minus
            token_with_location(lex_punctuation),
            token_with_location(lex_string),
            // Operator must come before number (or it may be parsed as a prefix)
            token_with_location(lex_operator),
            token_with_location(lex_number),
            // This should come last because it's sort of a catch all
            token_with_location(lex_keyword_or_identifier),
        ),
    )(input)
}

fn lex_comment(input: LexInput) -> InternalLexResult<LexInput> {
    recognize(pair(tag("//"), take_while(|chr| chr != '\n')))(input)
}

/// If the given identifier string matches a keyword or a modifier, return that token;
/// otherwise, return the original identifier as a token.
fn recognize_keyword_or_identifier(identifier: String) -> Token {
    use Command::*;

    match identifier.as_str() {
        "OPENQASM" => Token::Command(OpenQasm),
        "barrier" => Token::Command(Barrier),
        "creg" => Token::Command(Creg),
        "gate" => Token::Command(Gate),
        "if" => Token::Command(If),
        "include" => Token::Command(Include),
        "measure" => Token::Command(Measure),
        "opaque" => Token::Command(Opaque),
        "qreg" => Token::Command(Qreg),
        "reset" => Token::Command(Reset),
        "ctrl" => Token::Modifier(Modifier::Ctrl),
        "inv" => Token::Modifier(Modifier::Inv),
        _ => Token::Identifier(identifier),
    }
}

fn is_valid_identifier_leading_character(chr: char) -> bool {
    chr.is_ascii_alphabetic() || chr == '_'
}

fn is_valid_identifier_end_character(chr: char) -> bool {
    is_valid_identifier_leading_character(chr) || chr.is_ascii_digit()
}

fn lex_identifier_raw(input: LexInput) -> InternalLexResult<String> {
    expecting(
        "a valid identifier",
        map(
            recognize::<_, _, InternalLexError, _>(pair(
                take_while1(is_valid_identifier_leading_character),
                take_while(is_valid_identifier_end_character),
            )),
            |identifier: LexInput| identifier.to_string(),
        ),
    )(input)
}

fn lex_keyword_or_identifier(input: LexInput) -> InternalLexResult {
    let (input, identifier) = lex_identifier_raw(input)?;
    let token = recognize_keyword_or_identifier(identifier);
    Ok((input, token))
}

fn lex_number(input: LexInput) -> InternalLexResult {
    let (remainder, literal) = recognize_float::<_, InternalLexError>(input)?;
    let literal_str = *literal.fragment();

    if literal_str.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(integer) = literal_str.parse::<u64>() {
            return Ok((remainder, Token::Integer(integer)));
        }
    }

    match literal_str.parse::<f64>() {
        Ok(float) => Ok((remainder, Token::Float(float))),
        Err(_) => Err(nom::Err::Error(InternalLexError::from_kind(
            input,
            LexErrorKind::ExpectedContext("a number"),
        ))),
    }
}

fn lex_operator(input: LexInput) -> InternalLexResult {
    use Operator::*;
    map(
        alt(
            "an operator",
            (
                value(Caret, tag("^")),
                value(Minus, tag("-")),
                value(Plus, tag("+")),
                value(Slash, tag("/")),
                value(Star, tag("*")),
            ),
        ),
        Token::Operator,
    )(input)
}

fn lex_punctuation(input: LexInput) -> InternalLexResult {
    use Token::*;
    alt(
        "punctuation",
        (
            value(Arrow, tag("->")),
            value(At, tag("@")),
            value(Comma, tag(",")),
            value(EqualEqual, tag("==")),
            value(LBrace, tag("{")),
            value(LBracket, tag("[")),
            value(LParenthesis, tag("(")),
            value(RBrace, tag("}")),
            value(RBracket, tag("]")),
            value(RParenthesis, tag(")")),
            value(Semicolon, tag(";")),
        ),
    )(input)
}

fn lex_string(input: LexInput) -> InternalLexResult {
    map(
        delimited(tag("\""), opt(is_not("\"\n")), tag("\"")),
        |content: Option<LexInput>| {
            Token::String(content.map(|c| c.to_string()).unwrap_or_default())
        },
    )(input)
}
