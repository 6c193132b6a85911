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

use nom::{
    combinator::{map, opt},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded},
};

use crate::{
    expected_token,
    expression::Expression,
    program::{Argument, GateModifier},
    token, unexpected_eof,
};

use super::{
    expression::parse_expression,
    lexer::{Modifier, Token},
    InternalParserResult, ParserInput,
};

/// Parse a statement operand: a register name, optionally indexed, such as `q` or `q[0]`.
pub(crate) fn parse_argument<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, Argument> {
    let (input, register) = token!(Identifier(v))(input)?;
    let (input, index) = opt(delimited(
        token!(LBracket),
        token!(Integer(v)),
        token!(RBracket),
    ))(input)?;
    Ok((input, Argument::new(register, index)))
}

/// Parse a comma-separated list of at least one argument.
pub(crate) fn parse_arguments<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, Vec<Argument>> {
    separated_list1(token!(Comma), parse_argument)(input)
}

/// Parse a register name and its size in brackets, such as `q[5]`.
pub(crate) fn parse_register_size<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, (String, u64)> {
    let (input, name) = token!(Identifier(v))(input)?;
    let (input, size) = delimited(token!(LBracket), token!(Integer(v)), token!(RBracket))(input)?;
    Ok((input, (name, size)))
}

/// Parse a comma-separated list of at least one identifier, such as the formal qubits of a gate
/// declaration.
pub(crate) fn parse_identifiers<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, Vec<String>> {
    separated_list1(token!(Comma), token!(Identifier(v)))(input)
}

/// Parse the parenthesized, possibly empty, parameter names of a gate declaration, if present.
pub(crate) fn parse_parameter_names<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, Vec<String>> {
    map(
        opt(delimited(
            token!(LParenthesis),
            separated_list0(token!(Comma), token!(Identifier(v))),
            token!(RParenthesis),
        )),
        Option::unwrap_or_default,
    )(input)
}

/// Parse the parenthesized, possibly empty, parameter expressions of a gate call, if present.
pub(crate) fn parse_parameters<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, Vec<Expression>> {
    map(
        opt(delimited(
            token!(LParenthesis),
            separated_list0(token!(Comma), parse_expression),
            token!(RParenthesis),
        )),
        Option::unwrap_or_default,
    )(input)
}

/// Parse a single gate modifier together with the `@` that follows it, such as `ctrl(2) @`.
pub(crate) fn parse_gate_modifier<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, GateModifier> {
    let (input, modifier) = match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::Modifier(Modifier::Ctrl), remainder)) => {
            let (remainder, count) = opt(delimited(
                token!(LParenthesis),
                token!(Integer(v)),
                token!(RParenthesis),
            ))(remainder)?;
            Ok((remainder, GateModifier::Control(count.unwrap_or(1))))
        }
        Some((Token::Modifier(Modifier::Inv), remainder)) => {
            Ok((remainder, GateModifier::Inverse))
        }
        Some((other_token, _)) => expected_token!(input, other_token, "modifier".to_owned()),
    }?;
    let (input, _) = token!(At)(input)?;
    Ok((input, modifier))
}

/// Parse the parenthesized classical condition of an `if` statement, such as `(c == 1)`.
pub(crate) fn parse_condition<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, (String, u64)> {
    let (input, _) = token!(LParenthesis)(input)?;
    let (input, register) = token!(Identifier(v))(input)?;
    let (input, value) = preceded(token!(EqualEqual), token!(Integer(v)))(input)?;
    let (input, _) = token!(RParenthesis)(input)?;
    Ok((input, (register, value)))
}

#[cfg(test)]
mod tests {
    use nom_locate::LocatedSpan;
    use rstest::rstest;

    use crate::parser::lexer::lex;
    use crate::program::{Argument, GateModifier};

    use super::{parse_argument, parse_arguments, parse_condition, parse_gate_modifier};

    #[rstest]
    #[case("q", Argument::new("q".to_string(), None))]
    #[case("q[3]", Argument::new("q".to_string(), Some(3)))]
    #[case("anc_1[0]", Argument::new("anc_1".to_string(), Some(0)))]
    fn argument(#[case] input: &str, #[case] expected: Argument) {
        let tokens = lex(LocatedSpan::new(input)).unwrap();
        let (remainder, parsed) = parse_argument(&tokens).unwrap();
        assert!(remainder.is_empty());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn arguments_stop_at_semicolon() {
        let tokens = lex(LocatedSpan::new("a[0], b, c[2];")).unwrap();
        let (remainder, parsed) = parse_arguments(&tokens).unwrap();
        assert_eq!(remainder.len(), 1);
        assert_eq!(
            parsed,
            vec![
                Argument::new("a".to_string(), Some(0)),
                Argument::new("b".to_string(), None),
                Argument::new("c".to_string(), Some(2)),
            ]
        );
    }

    #[rstest]
    #[case("ctrl @", GateModifier::Control(1))]
    #[case("ctrl(3) @", GateModifier::Control(3))]
    #[case("inv @", GateModifier::Inverse)]
    fn gate_modifier(#[case] input: &str, #[case] expected: GateModifier) {
        let tokens = lex(LocatedSpan::new(input)).unwrap();
        let (remainder, parsed) = parse_gate_modifier(&tokens).unwrap();
        assert!(remainder.is_empty());
        assert_eq!(parsed, expected);
    }

    #[test]
    fn modifier_requires_at() {
        let tokens = lex(LocatedSpan::new("ctrl h q;")).unwrap();
        assert!(parse_gate_modifier(&tokens).is_err());
    }

    #[test]
    fn condition() {
        let tokens = lex(LocatedSpan::new("(flags==5)")).unwrap();
        let (_, parsed) = parse_condition(&tokens).unwrap();
        assert_eq!(parsed, ("flags".to_string(), 5));
    }
}
