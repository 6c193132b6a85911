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

use nom::combinator::opt;

use crate::expression::{
    Expression, ExpressionFunction, FunctionCallExpression, InfixExpression, InfixOperator,
    PrefixExpression, PrefixOperator,
};
use crate::parser::InternalParserResult;
use crate::{expected_token, token, unexpected_eof};

use super::lexer::{Operator, Token};
use super::ParserInput;

#[derive(Debug, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Sum,
    Product,
    Exponentiation,
}

impl From<&Token> for Precedence {
    fn from(token: &Token) -> Self {
        match token {
            Token::Operator(operator) => Self::from(operator),
            _ => Precedence::Lowest,
        }
    }
}

impl From<&Operator> for Precedence {
    fn from(operator: &Operator) -> Self {
        match operator {
            Operator::Plus | Operator::Minus => Precedence::Sum,
            Operator::Star | Operator::Slash => Precedence::Product,
            Operator::Caret => Precedence::Exponentiation,
        }
    }
}

fn get_precedence(input: ParserInput) -> Precedence {
    match super::first_token(input) {
        Some(v) => Precedence::from(v),
        None => Precedence::Lowest,
    }
}

/// Parse an expression at the head of the current input, for as long as the expression continues.
/// Return an error only if the first token(s) do not form an expression.
pub(crate) fn parse_expression(input: ParserInput) -> InternalParserResult<Expression> {
    parse(input, Precedence::Lowest)
}

/// Recursively parse an expression as long as operator precedence is satisfied.
fn parse(input: ParserInput, precedence: Precedence) -> InternalParserResult<Expression> {
    let (input, prefix) = opt(parse_prefix)(input)?;
    let (mut input, mut left) = match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::Integer(value), remainder)) => {
            Ok((remainder, Expression::Number(*value as f64)))
        }
        Some((Token::Float(value), remainder)) => Ok((remainder, Expression::Number(*value))),
        Some((Token::Identifier(_), _)) => parse_expression_identifier(input),
        Some((Token::LParenthesis, remainder)) => parse_grouped_expression(remainder),
        Some((token, _)) => {
            expected_token!(input, token, "expression".to_owned())
        }
    }?;

    if let Some(prefix) = prefix {
        left = Expression::Prefix(PrefixExpression::new(prefix, left));
    }

    while get_precedence(input) > precedence {
        let (remainder, expression) = parse_infix(input, left)?;
        left = expression;
        input = remainder;
    }

    Ok((input, left))
}

/// Given an expression function, parse the expression within its parentheses.
fn parse_function_call<'a>(
    input: ParserInput<'a>,
    function: ExpressionFunction,
) -> InternalParserResult<'a, Expression> {
    let (input, _) = token!(LParenthesis)(input)?;
    let (input, expression) = parse(input, Precedence::Lowest)?;
    let (input, _) = token!(RParenthesis)(input)?;
    Ok((
        input,
        Expression::FunctionCall(FunctionCallExpression::new(function, expression)),
    ))
}

/// Identifiers name either a built-in function, the constant `pi`, or a gate parameter.
fn parse_expression_identifier(input: ParserInput) -> InternalParserResult<Expression> {
    match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::Identifier(ident), remainder)) => match ident.as_str() {
            "cos" => parse_function_call(remainder, ExpressionFunction::Cosine),
            "exp" => parse_function_call(remainder, ExpressionFunction::Exponent),
            "ln" => parse_function_call(remainder, ExpressionFunction::Ln),
            "pi" => Ok((remainder, Expression::PiConstant)),
            "sin" => parse_function_call(remainder, ExpressionFunction::Sine),
            "sqrt" => parse_function_call(remainder, ExpressionFunction::SquareRoot),
            "tan" => parse_function_call(remainder, ExpressionFunction::Tangent),
            name => Ok((remainder, Expression::Variable(name.to_owned()))),
        },
        Some((other_token, _)) => expected_token!(input, other_token, "identifier".to_owned()),
    }
}

/// To be called following an opening parenthesis, this will parse the expression to its end
/// and then expect a closing right parenthesis.
fn parse_grouped_expression(input: ParserInput) -> InternalParserResult<Expression> {
    let (input, expression) = parse(input, Precedence::Lowest)?;
    match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::RParenthesis, remainder)) => Ok((remainder, expression)),
        Some((other_token, _)) => {
            expected_token!(input, other_token, "right parenthesis".to_owned())
        }
    }
}

/// Parse an infix operator and then the expression to the right of the operator, and return the
/// resulting infixed expression.
fn parse_infix(input: ParserInput, left: Expression) -> InternalParserResult<Expression> {
    match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::Operator(token_operator), remainder)) => {
            let expression_operator = match token_operator {
                Operator::Plus => InfixOperator::Plus,
                Operator::Minus => InfixOperator::Minus,
                Operator::Caret => InfixOperator::Caret,
                Operator::Slash => InfixOperator::Slash,
                Operator::Star => InfixOperator::Star,
            };
            // `^` binds to the right: `2^3^2` is `2^(3^2)`
            let precedence = match token_operator {
                Operator::Caret => Precedence::Product,
                other => Precedence::from(other),
            };
            let (remainder, right) = parse(remainder, precedence)?;
            Ok((
                remainder,
                Expression::Infix(InfixExpression::new(left, expression_operator, right)),
            ))
        }
        Some((other_token, _)) => expected_token!(input, other_token, "infix operator".to_owned()),
    }
}

/// Return the prefix operator at the beginning of the input, if any.
fn parse_prefix(input: ParserInput) -> InternalParserResult<PrefixOperator> {
    match super::split_first_token(input) {
        None => unexpected_eof!(input),
        Some((Token::Operator(Operator::Minus), remainder)) => {
            Ok((remainder, PrefixOperator::Minus))
        }
        Some((Token::Operator(Operator::Plus), remainder)) => Ok((remainder, PrefixOperator::Plus)),
        Some((other_token, _)) => expected_token!(input, other_token, "prefix operator".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use crate::expression::{
        Expression, ExpressionFunction, FunctionCallExpression, InfixExpression, InfixOperator,
        PrefixExpression, PrefixOperator,
    };
    use crate::parser::lexer::lex;

    use nom_locate::LocatedSpan;
    use rstest::rstest;

    use super::parse_expression;

    macro_rules! test {
        ($name: ident, $parser: ident, $input: expr, $expected: expr) => {
            #[test]
            fn $name() {
                let input = LocatedSpan::new($input);
                let tokens = lex(input).unwrap();
                let (remainder, parsed) = $parser(&tokens).unwrap();
                assert_eq!(remainder.len(), 0);
                assert_eq!(parsed, $expected);
            }
        };
    }

    // Round-trip expressions to validate parsing & display
    #[rstest]
    #[case("pi")]
    #[case("sin(pi)")]
    #[case("1+(2*3)")]
    #[case("(1+2)*3")]
    #[case("theta")]
    #[case("cos(theta)")]
    #[case("a+b")]
    #[case("(pi/2)+(1*theta)")]
    #[case("3--2")]
    #[case("2^(3^2)")]
    fn display(#[case] case: &str) {
        let input = LocatedSpan::new(case);
        let tokens = lex(input).unwrap();
        let (remainder, parsed) = parse_expression(&tokens).unwrap();
        assert_eq!(remainder.len(), 0);
        assert_eq!(parsed.to_string(), case);
    }

    test!(
        function_call,
        parse_expression,
        "sin(1)",
        Expression::FunctionCall(FunctionCallExpression::new(
            ExpressionFunction::Sine,
            Expression::Number(1f64),
        ))
    );

    test!(
        nested_function_call,
        parse_expression,
        "sqrt(tan(1))",
        Expression::FunctionCall(FunctionCallExpression::new(
            ExpressionFunction::SquareRoot,
            Expression::FunctionCall(FunctionCallExpression::new(
                ExpressionFunction::Tangent,
                Expression::Number(1f64),
            )),
        ))
    );

    test!(
        simple_infix,
        parse_expression,
        "1+2",
        Expression::Infix(InfixExpression::new(
            Expression::Number(1f64),
            InfixOperator::Plus,
            Expression::Number(2f64),
        ))
    );

    test!(
        infix_with_function_call,
        parse_expression,
        "-pi*sin(theta/2)",
        Expression::Infix(InfixExpression::new(
            Expression::Prefix(PrefixExpression::new(
                PrefixOperator::Minus,
                Expression::PiConstant,
            )),
            InfixOperator::Star,
            Expression::FunctionCall(FunctionCallExpression::new(
                ExpressionFunction::Sine,
                Expression::Infix(InfixExpression::new(
                    Expression::Variable("theta".to_owned()),
                    InfixOperator::Slash,
                    Expression::Number(2f64),
                )),
            )),
        ))
    );

    test!(
        precedence,
        parse_expression,
        "1+2*3",
        Expression::Infix(InfixExpression::new(
            Expression::Number(1f64),
            InfixOperator::Plus,
            Expression::Infix(InfixExpression::new(
                Expression::Number(2f64),
                InfixOperator::Star,
                Expression::Number(3f64),
            )),
        ))
    );

    test!(
        left_associative,
        parse_expression,
        "pi/2/2",
        Expression::Infix(InfixExpression::new(
            Expression::Infix(InfixExpression::new(
                Expression::PiConstant,
                InfixOperator::Slash,
                Expression::Number(2f64),
            )),
            InfixOperator::Slash,
            Expression::Number(2f64),
        ))
    );

    test!(
        right_associative_power,
        parse_expression,
        "2^3^2",
        Expression::Infix(InfixExpression::new(
            Expression::Number(2f64),
            InfixOperator::Caret,
            Expression::Infix(InfixExpression::new(
                Expression::Number(3f64),
                InfixOperator::Caret,
                Expression::Number(2f64),
            )),
        ))
    );

    #[test]
    fn stops_at_closing_tokens() {
        let tokens = lex(LocatedSpan::new("pi/2) q[0];")).unwrap();
        let (remainder, parsed) = parse_expression(&tokens).unwrap();
        assert_eq!(remainder.len(), 6);
        assert_eq!(parsed.to_string(), "pi/2");
    }

    #[test]
    fn unbalanced_parentheses() {
        let tokens = lex(LocatedSpan::new("(pi/2")).unwrap();
        assert!(parse_expression(&tokens).is_err());
    }
}
