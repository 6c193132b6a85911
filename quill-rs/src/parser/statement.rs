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
    combinator::{cut, opt},
    multi::many0,
    sequence::terminated,
};

use crate::{
    expected_token,
    program::{
        Conditional, GateCall, GateDeclaration, Measurement, RegisterDeclaration, Statement,
    },
    token, unexpected_eof,
};

use super::{
    common::{
        parse_argument, parse_arguments, parse_condition, parse_gate_modifier, parse_identifiers,
        parse_parameter_names, parse_parameters, parse_register_size,
    },
    error::{InternalParseError, ParserErrorKind},
    lexer::{Command, Token},
    InternalParserResult, ParserInput,
};

/// Parse a whole program: an optional `OPENQASM <version>;` header followed by statements.
pub(crate) fn parse_program<'a>(
    input: ParserInput<'a>,
) -> InternalParserResult<'a, (Option<f64>, Vec<Statement>)> {
    let (input, version) = opt(parse_version)(input)?;
    let (input, statements) = parse_statements(input)?;
    Ok((input, (version, statements)))
}

/// Parse statements for as long as the input holds them.
pub(crate) fn parse_statements(input: ParserInput) -> InternalParserResult<Vec<Statement>> {
    many0(parse_statement)(input)
}

fn parse_version<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, f64> {
    let (input, _) = token!(Command(OpenQasm))(input)?;
    let (input, version) = match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::Float(version), remainder)) => Ok((remainder, *version)),
        Some((Token::Integer(version), remainder)) => Ok((remainder, *version as f64)),
        Some((other_token, _)) => expected_token!(input, other_token, "version".to_owned()),
    }?;
    let (input, _) = token!(Semicolon)(input)?;
    Ok((input, version))
}

/// Parse a single statement.
///
/// Once the head of the statement is recognized, any further error is a failure: the input is
/// malformed and no other statement could match it.
pub(crate) fn parse_statement(input: ParserInput) -> InternalParserResult<Statement> {
    match super::split_first_token(input) {
        None => Err(nom::Err::Error(InternalParseError::from_kind(
            input,
            ParserErrorKind::EndOfInput,
        ))),
        Some((Token::Command(command), remainder)) => {
            parse_command(*command, remainder).map_err(|err| {
                nom::Err::Failure(
                    InternalParseError::from_kind(
                        input,
                        ParserErrorKind::InvalidCommand { command: *command },
                    )
                    .with_previous(extract_nom_err(err)),
                )
            })
        }
        Some((Token::Identifier(_), _)) | Some((Token::Modifier(_), _)) => {
            cut(parse_gate_call)(input)
        }
        Some((_, _)) => Err(nom::Err::Error(InternalParseError::from_kind(
            input,
            ParserErrorKind::NotAStatement,
        ))),
    }
}

fn extract_nom_err<E>(err: nom::Err<E>) -> E {
    match err {
        nom::Err::Error(inner) | nom::Err::Failure(inner) => inner,
        nom::Err::Incomplete(_) => unreachable!("token parsers only operate on complete input"),
    }
}

/// Parse the rest of a statement which begins with the given command.
fn parse_command(command: Command, input: ParserInput) -> InternalParserResult<Statement> {
    match command {
        Command::Barrier => parse_barrier(input),
        Command::Creg => parse_register(input, Statement::ClassicalRegister),
        Command::Gate => parse_gate_declaration(input, false),
        Command::If => parse_if(input),
        Command::Include => parse_include(input),
        Command::Measure => parse_measure(input),
        Command::Opaque => parse_gate_declaration(input, true),
        Command::OpenQasm => Err(nom::Err::Error(InternalParseError::from_kind(
            input,
            ParserErrorKind::NotAStatement,
        ))),
        Command::Qreg => parse_register(input, Statement::QuantumRegister),
        Command::Reset => parse_reset(input),
    }
}

fn parse_barrier<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, Statement> {
    let (input, arguments) = terminated(parse_arguments, token!(Semicolon))(input)?;
    Ok((input, Statement::Barrier(arguments)))
}

fn parse_register<'a>(
    input: ParserInput<'a>,
    constructor: fn(RegisterDeclaration) -> Statement,
) -> InternalParserResult<'a, Statement> {
    let (input, (name, size)) = terminated(parse_register_size, token!(Semicolon))(input)?;
    Ok((input, constructor(RegisterDeclaration::new(name, size))))
}

/// Parse the signature of a `gate` or `opaque` declaration and, for `gate`, its body.
fn parse_gate_declaration<'a>(
    input: ParserInput<'a>,
    opaque: bool,
) -> InternalParserResult<'a, Statement> {
    let (input, name) = token!(Identifier(v))(input)?;
    let (input, parameters) = parse_parameter_names(input)?;
    let (input, qubits) = parse_identifiers(input)?;
    let (input, body) = if opaque {
        let (input, _) = token!(Semicolon)(input)?;
        (input, None)
    } else {
        let (input, _) = token!(LBrace)(input)?;
        let (input, body) = parse_statements(input)?;
        let (input, _) = token!(RBrace)(input)?;
        (input, Some(body))
    };
    Ok((
        input,
        Statement::GateDeclaration(GateDeclaration::new(name, parameters, qubits, body)),
    ))
}

fn parse_include<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, Statement> {
    let (input, path) = terminated(token!(String(v)), token!(Semicolon))(input)?;
    Ok((input, Statement::Include(path)))
}

fn parse_measure<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, Statement> {
    let (input, qubit) = parse_argument(input)?;
    let (input, _) = token!(Arrow)(input)?;
    let (input, target) = terminated(parse_argument, token!(Semicolon))(input)?;
    Ok((input, Statement::Measure(Measurement::new(qubit, target))))
}

fn parse_reset<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, Statement> {
    let (input, argument) = terminated(parse_argument, token!(Semicolon))(input)?;
    Ok((input, Statement::Reset(argument)))
}

/// Parse `(c == n)` followed by the quantum operation it guards.
fn parse_if(input: ParserInput) -> InternalParserResult<Statement> {
    let (input, (register, value)) = parse_condition(input)?;
    let (remainder, statement) = parse_statement(input)?;
    match statement {
        Statement::GateCall(_) | Statement::Measure(_) | Statement::Reset(_) => Ok((
            remainder,
            Statement::If(Conditional::new(register, value, statement)),
        )),
        _ => Err(nom::Err::Error(InternalParseError::from_kind(
            input,
            ParserErrorKind::NotAStatement,
        ))),
    }
}

/// Parse a gate call, such as `inv @ cu1(pi/2) q[0], q[1];`.
fn parse_gate_call<'a>(input: ParserInput<'a>) -> InternalParserResult<'a, Statement> {
    let (input, modifiers) = many0(parse_gate_modifier)(input)?;
    let (input, name) = token!(Identifier(v))(input)?;
    let (input, parameters) = parse_parameters(input)?;
    let (input, arguments) = terminated(parse_arguments, token!(Semicolon))(input)?;
    Ok((
        input,
        Statement::GateCall(GateCall::new(name, parameters, arguments, modifiers)),
    ))
}

#[cfg(test)]
mod tests {
    use nom_locate::LocatedSpan;
    use rstest::rstest;

    use crate::expression::Expression;
    use crate::parser::lexer::lex;
    use crate::program::{
        Argument, Conditional, GateCall, GateDeclaration, GateModifier, Measurement,
        RegisterDeclaration, Statement,
    };

    use super::{parse_program, parse_statement};

    fn arg(register: &str, index: u64) -> Argument {
        Argument::new(register.to_string(), Some(index))
    }

    fn parse_one(input: &str) -> Statement {
        let tokens = lex(LocatedSpan::new(input)).unwrap();
        let (remainder, statement) = parse_statement(&tokens).unwrap();
        assert!(remainder.is_empty(), "tokens left over: {remainder:?}");
        statement
    }

    #[test]
    fn registers() {
        assert_eq!(
            parse_one("qreg q[5];"),
            Statement::QuantumRegister(RegisterDeclaration::new("q".to_string(), 5))
        );
        assert_eq!(
            parse_one("creg syndrome[2];"),
            Statement::ClassicalRegister(RegisterDeclaration::new("syndrome".to_string(), 2))
        );
    }

    #[test]
    fn gate_call_with_parameters() {
        assert_eq!(
            parse_one("u3(pi, 0, pi/2) q[1];"),
            Statement::GateCall(GateCall::new(
                "u3".to_string(),
                vec![
                    Expression::PiConstant,
                    Expression::Number(0.0),
                    "pi/2".parse().unwrap(),
                ],
                vec![arg("q", 1)],
                vec![],
            ))
        );
    }

    #[test]
    fn gate_call_with_modifiers() {
        assert_eq!(
            parse_one("ctrl @ inv @ s a[0], b[1];"),
            Statement::GateCall(GateCall::new(
                "s".to_string(),
                vec![],
                vec![arg("a", 0), arg("b", 1)],
                vec![GateModifier::Control(1), GateModifier::Inverse],
            ))
        );
    }

    #[test]
    fn measure() {
        assert_eq!(
            parse_one("measure q[0] -> c[1];"),
            Statement::Measure(Measurement::new(arg("q", 0), arg("c", 1)))
        );
    }

    #[test]
    fn conditional() {
        assert_eq!(
            parse_one("if(c==3) reset q[0];"),
            Statement::If(Conditional::new(
                "c".to_string(),
                3,
                Statement::Reset(arg("q", 0))
            ))
        );
    }

    #[test]
    fn opaque() {
        assert_eq!(
            parse_one("opaque magic(a, b) x, y;"),
            Statement::GateDeclaration(GateDeclaration::new(
                "magic".to_string(),
                vec!["a".to_string(), "b".to_string()],
                vec!["x".to_string(), "y".to_string()],
                None,
            ))
        );
    }

    #[test]
    fn gate_body() {
        let statement = parse_one("gate rot(theta) a { rz(theta/2) a; barrier a; }");
        let Statement::GateDeclaration(declaration) = statement else {
            panic!("expected a gate declaration");
        };
        assert_eq!(declaration.parameters, vec!["theta".to_string()]);
        assert_eq!(
            declaration.body.map(|body| body.len()),
            Some(2),
            "body should hold both statements"
        );
    }

    #[test]
    fn version_header() {
        let tokens = lex(LocatedSpan::new("OPENQASM 2.0; qreg q[1];")).unwrap();
        let (remainder, (version, statements)) = parse_program(&tokens).unwrap();
        assert!(remainder.is_empty());
        assert_eq!(version, Some(2.0));
        assert_eq!(statements.len(), 1);
    }

    #[rstest]
    #[case("qreg q;")]
    #[case("creg c[1]")]
    #[case("gate g a h a;")]
    #[case("include qelib1;")]
    #[case("if (c) x q;")]
    #[case("if (c==1) barrier q;")]
    #[case("h q[0] q[1];")]
    #[case("ctrl @ @ x q;")]
    fn failures(#[case] input: &str) {
        let tokens = lex(LocatedSpan::new(input)).unwrap();
        assert!(matches!(
            parse_statement(&tokens),
            Err(nom::Err::Failure(_))
        ));
    }

    #[test]
    fn not_a_statement() {
        let tokens = lex(LocatedSpan::new("; h q;")).unwrap();
        assert!(matches!(parse_statement(&tokens), Err(nom::Err::Error(_))));
    }
}
