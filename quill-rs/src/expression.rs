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

//! Parameter expressions of gate calls, such as `pi/2` or `-theta + 0.5`.

use crate::{
    parser::{lex, parse_expression, ParseError},
    program::{disallow_leftover, ProgramError},
};
use nom_locate::LocatedSpan;
use std::{borrow::Borrow, collections::HashMap, f64::consts::PI, fmt, hash::Hash, str::FromStr};

/// The different possible types of errors that could occur during expression evaluation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("variable {0} is not bound to a value")]
    UnboundVariable(String),
    #[error("expression {0} does not evaluate to a finite number")]
    NotFinite(String),
}

/// The type of OpenQASM parameter expressions.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    FunctionCall(FunctionCallExpression),
    Infix(InfixExpression),
    Number(f64),
    PiConstant,
    Prefix(PrefixExpression),
    /// A gate parameter, only meaningful inside the body of a gate declaration.
    Variable(String),
}

/// The type of function call expressions, e.g. `sin(e)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCallExpression {
    pub function: ExpressionFunction,
    pub expression: Box<Expression>,
}

impl FunctionCallExpression {
    pub fn new(function: ExpressionFunction, expression: Expression) -> Self {
        Self {
            function,
            expression: Box::new(expression),
        }
    }
}

/// The type of infix expressions, e.g. `e1 + e2`.
#[derive(Clone, Debug, PartialEq)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
}

impl InfixExpression {
    pub fn new(left: Expression, operator: InfixOperator, right: Expression) -> Self {
        Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

/// The type of prefix expressions, e.g. `-e`.
#[derive(Clone, Debug, PartialEq)]
pub struct PrefixExpression {
    pub operator: PrefixOperator,
    pub expression: Box<Expression>,
}

impl PrefixExpression {
    pub fn new(operator: PrefixOperator, expression: Expression) -> Self {
        Self {
            operator,
            expression: Box::new(expression),
        }
    }
}

/// Compute the result of an infix expression where both operands are real.
#[inline]
pub(crate) fn calculate_infix(left: f64, operator: InfixOperator, right: f64) -> f64 {
    use InfixOperator::*;
    match operator {
        Caret => left.powf(right),
        Plus => left + right,
        Minus => left - right,
        Slash => left / right,
        Star => left * right,
    }
}

/// Compute the result of an OpenQASM expression function.
#[inline]
pub(crate) fn calculate_function(function: ExpressionFunction, argument: f64) -> f64 {
    use ExpressionFunction::*;
    match function {
        Cosine => argument.cos(),
        Exponent => argument.exp(),
        Ln => argument.ln(),
        Sine => argument.sin(),
        SquareRoot => argument.sqrt(),
        Tangent => argument.tan(),
    }
}

impl Expression {
    /// Evaluate an expression, substituting the given variables.
    ///
    /// Fails if a variable is not bound or if any part of the expression does not evaluate to a
    /// finite number, e.g. `1/0` or `sqrt(-1)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quill_rs::expression::Expression;
    /// use std::collections::HashMap;
    ///
    /// let expression: Expression = "theta / 2".parse().unwrap();
    /// let variables = HashMap::from([("theta", 3.0)]);
    /// assert_eq!(expression.evaluate(&variables).unwrap(), 1.5);
    /// ```
    pub fn evaluate<K>(&self, variables: &HashMap<K, f64>) -> Result<f64, EvaluationError>
    where
        K: Borrow<str> + Hash + Eq,
    {
        use Expression::*;

        let value = match self {
            FunctionCall(FunctionCallExpression {
                function,
                expression,
            }) => calculate_function(*function, expression.evaluate(variables)?),
            Infix(InfixExpression {
                left,
                operator,
                right,
            }) => {
                let left_evaluated = left.evaluate(variables)?;
                let right_evaluated = right.evaluate(variables)?;
                calculate_infix(left_evaluated, *operator, right_evaluated)
            }
            Number(value) => *value,
            PiConstant => PI,
            Prefix(PrefixExpression {
                operator,
                expression,
            }) => {
                let value = expression.evaluate(variables)?;
                match operator {
                    PrefixOperator::Minus => -value,
                    PrefixOperator::Plus => value,
                }
            }
            Variable(identifier) => match variables.get(identifier.as_str()) {
                Some(&value) => value,
                None => return Err(EvaluationError::UnboundVariable(identifier.clone())),
            },
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NotFinite(self.to_string()))
        }
    }

    /// Evaluate an expression which contains no variables.
    pub fn to_real(&self) -> Result<f64, EvaluationError> {
        self.evaluate::<&str>(&HashMap::new())
    }
}

impl FromStr for Expression {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = LocatedSpan::new(s);
        let tokens = lex(input)?;
        disallow_leftover(parse_expression(&tokens).map_err(|err| err.map(ParseError::from)))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expression::*;
        match self {
            FunctionCall(FunctionCallExpression {
                function,
                expression,
            }) => write!(f, "{function}({expression})"),
            Infix(InfixExpression {
                left,
                operator,
                right,
            }) => {
                format_inner_expression(f, left)?;
                write!(f, "{operator}")?;
                format_inner_expression(f, right)
            }
            Number(value) => write!(f, "{value}"),
            PiConstant => write!(f, "pi"),
            Prefix(PrefixExpression {
                operator,
                expression,
            }) => {
                write!(f, "{operator}")?;
                format_inner_expression(f, expression)
            }
            Variable(identifier) => write!(f, "{identifier}"),
        }
    }
}

/// Wrap infix expressions that are part of an expression in parentheses, so that the printed
/// form parses back with the same precedence.
fn format_inner_expression(f: &mut fmt::Formatter<'_>, expression: &Expression) -> fmt::Result {
    match expression {
        Expression::Infix(_) => write!(f, "({expression})"),
        _ => write!(f, "{expression}"),
    }
}

/// A function which may be called within an OpenQASM expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExpressionFunction {
    Cosine,
    Exponent,
    Ln,
    Sine,
    SquareRoot,
    Tangent,
}

impl fmt::Display for ExpressionFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ExpressionFunction::*;
        write!(
            f,
            "{}",
            match self {
                Cosine => "cos",
                Exponent => "exp",
                Ln => "ln",
                Sine => "sin",
                SquareRoot => "sqrt",
                Tangent => "tan",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrefixOperator {
    Plus,
    Minus,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use PrefixOperator::*;
        write!(
            f,
            "{}",
            match self {
                Plus => "+",
                Minus => "-",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InfixOperator {
    Caret,
    Plus,
    Minus,
    Slash,
    Star,
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use InfixOperator::*;
        write!(
            f,
            "{}",
            match self {
                Caret => "^",
                Plus => "+",
                Minus => "-",
                Slash => "/",
                Star => "*",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::{
        EvaluationError, Expression, InfixExpression, InfixOperator, PrefixExpression,
        PrefixOperator,
    };

    #[test]
    fn formats_nested_expression() {
        let expression = Expression::Infix(InfixExpression::new(
            Expression::Prefix(PrefixExpression::new(
                PrefixOperator::Minus,
                Expression::Number(3f64),
            )),
            InfixOperator::Star,
            Expression::Infix(InfixExpression::new(
                Expression::PiConstant,
                InfixOperator::Slash,
                Expression::Number(2f64),
            )),
        ));

        assert_eq!(expression.to_string(), "-3*(pi/2)");
    }

    #[rstest]
    #[case("pi", PI)]
    #[case("-pi/4", -PI / 4.0)]
    #[case("3*pi/4", 3.0 * PI / 4.0)]
    #[case("2^3^2", 512.0)]
    #[case("1 - 2 - 3", -4.0)]
    #[case("sqrt(4) + ln(exp(1))", 3.0)]
    #[case("sin(pi/2) * cos(0) + tan(0)", 1.0)]
    #[case("+0.5", 0.5)]
    #[case("1e-3", 0.001)]
    fn evaluates_to_real(#[case] input: &str, #[case] expected: f64) {
        let expression: Expression = input.parse().unwrap();
        assert_relative_eq!(expression.to_real().unwrap(), expected);
    }

    #[test]
    fn evaluates_variables() {
        let expression: Expression = "lambda + theta/2".parse().unwrap();
        let variables = HashMap::from([("theta".to_string(), PI), ("lambda".to_string(), 1.0)]);
        assert_relative_eq!(expression.evaluate(&variables).unwrap(), 1.0 + PI / 2.0);
    }

    #[test]
    fn unbound_variable() {
        let expression: Expression = "2*phi".parse().unwrap();
        assert_eq!(
            expression.to_real(),
            Err(EvaluationError::UnboundVariable("phi".to_string()))
        );
    }

    #[rstest]
    #[case("1/0")]
    #[case("sqrt(-1)")]
    #[case("ln(0)")]
    fn not_finite(#[case] input: &str) {
        let expression: Expression = input.parse().unwrap();
        assert!(matches!(
            expression.to_real(),
            Err(EvaluationError::NotFinite(_))
        ));
    }

    #[test]
    fn rejects_leftover_tokens() {
        assert!("pi pi".parse::<Expression>().is_err());
    }
}
