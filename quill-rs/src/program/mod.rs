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

//! OpenQASM programs: the statements of a source file, before they are resolved into a
//! [`Circuit`](crate::circuit::Circuit).

use std::fmt;
use std::str::FromStr;

use nom_locate::LocatedSpan;

use crate::parser::{lex, parse_program};

pub(crate) use self::error::disallow_leftover;
pub use self::error::ProgramError;
pub use self::statement::{
    Argument, Conditional, GateCall, GateDeclaration, GateModifier, Measurement,
    RegisterDeclaration, Statement,
};
pub use crate::parser::{
    ErrorKind, GenericParseError, LexError, LexErrorKind, ParseError, ParserErrorKind,
};

mod error;
mod statement;

/// A parsed OpenQASM program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// The version given in the `OPENQASM` header, if any.
    pub version: Option<f64>,
    statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement to the end of the program.
    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Add statements to the end of the program.
    pub fn add_statements<I>(&mut self, statements: I)
    where
        I: IntoIterator<Item = Statement>,
    {
        self.statements.extend(statements);
    }

    /// Returns an iterator over the statements of the program, in source order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Returns an iterator over the gates declared with `gate` or `opaque` in this program.
    pub fn gate_declarations(&self) -> impl Iterator<Item = &GateDeclaration> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::GateDeclaration(declaration) => Some(declaration),
            _ => None,
        })
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = LocatedSpan::new(s);
        let lexed = lex(input)?;
        let (version, statements) =
            disallow_leftover(parse_program(&lexed).map_err(|err| err.map(ParseError::from)))?;
        Ok(Self {
            version,
            statements,
        })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(version) = self.version {
            writeln!(f, "OPENQASM {version:?};")?;
        }
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}
