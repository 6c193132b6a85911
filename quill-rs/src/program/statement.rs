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

use std::fmt;

use itertools::Itertools;

use crate::expression::Expression;

/// A single OpenQASM statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Barrier(Vec<Argument>),
    ClassicalRegister(RegisterDeclaration),
    GateCall(GateCall),
    GateDeclaration(GateDeclaration),
    If(Conditional),
    Include(String),
    Measure(Measurement),
    QuantumRegister(RegisterDeclaration),
    Reset(Argument),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Barrier(arguments) => {
                write!(f, "barrier {};", arguments.iter().join(", "))
            }
            Statement::ClassicalRegister(declaration) => write!(f, "creg {declaration};"),
            Statement::GateCall(call) => write!(f, "{call}"),
            Statement::GateDeclaration(declaration) => write!(f, "{declaration}"),
            Statement::If(conditional) => write!(f, "{conditional}"),
            Statement::Include(path) => write!(f, "include {path:?};"),
            Statement::Measure(measurement) => write!(f, "{measurement}"),
            Statement::QuantumRegister(declaration) => write!(f, "qreg {declaration};"),
            Statement::Reset(argument) => write!(f, "reset {argument};"),
        }
    }
}

/// The declaration of a quantum or classical register, such as `qreg q[5];`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegisterDeclaration {
    pub name: String,
    pub size: u64,
}

impl RegisterDeclaration {
    pub fn new(name: String, size: u64) -> Self {
        Self { name, size }
    }
}

impl fmt::Display for RegisterDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}

/// An operand of a statement: either a whole register (`q`) or one bit of it (`q[1]`).
///
/// Inside the body of a gate declaration, arguments name the gate's formal qubits and are never
/// indexed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Argument {
    pub register: String,
    pub index: Option<u64>,
}

impl Argument {
    pub fn new(register: String, index: Option<u64>) -> Self {
        Self { register, index }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.register, index),
            None => write!(f, "{}", self.register),
        }
    }
}

/// A modifier which changes the meaning of the gate it is applied to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateModifier {
    /// Add the given number of control qubits in front of the gate's own qubits.
    Control(u64),
    /// Take the inverse of the gate.
    Inverse,
}

impl fmt::Display for GateModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateModifier::Control(1) => write!(f, "ctrl"),
            GateModifier::Control(count) => write!(f, "ctrl({count})"),
            GateModifier::Inverse => write!(f, "inv"),
        }
    }
}

/// An application of a gate, such as `ctrl @ rz(pi/4) q[0], q[1];`.
#[derive(Clone, Debug, PartialEq)]
pub struct GateCall {
    pub modifiers: Vec<GateModifier>,
    pub name: String,
    pub parameters: Vec<Expression>,
    pub arguments: Vec<Argument>,
}

impl GateCall {
    pub fn new(
        name: String,
        parameters: Vec<Expression>,
        arguments: Vec<Argument>,
        modifiers: Vec<GateModifier>,
    ) -> Self {
        Self {
            modifiers,
            name,
            parameters,
            arguments,
        }
    }
}

impl fmt::Display for GateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier} @ ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters.iter().join(", "))?;
        }
        write!(f, " {};", self.arguments.iter().join(", "))
    }
}

/// The declaration of a gate: its name, the names of its parameters and qubits and, unless
/// declared `opaque`, its body.
#[derive(Clone, Debug, PartialEq)]
pub struct GateDeclaration {
    pub name: String,
    pub parameters: Vec<String>,
    pub qubits: Vec<String>,
    pub body: Option<Vec<Statement>>,
}

impl GateDeclaration {
    pub fn new(
        name: String,
        parameters: Vec<String>,
        qubits: Vec<String>,
        body: Option<Vec<Statement>>,
    ) -> Self {
        Self {
            name,
            parameters,
            qubits,
            body,
        }
    }

    /// Whether the gate is declared with `opaque` and thus has no body.
    pub fn is_opaque(&self) -> bool {
        self.body.is_none()
    }
}

impl fmt::Display for GateDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "opaque ")?;
        } else {
            write!(f, "gate ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters.iter().join(", "))?;
        }
        write!(f, " {}", self.qubits.iter().join(", "))?;
        match &self.body {
            None => write!(f, ";"),
            Some(body) if body.is_empty() => write!(f, " {{ }}"),
            Some(body) => {
                writeln!(f, " {{")?;
                for statement in body {
                    writeln!(f, "    {statement}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A measurement of a qubit (or a whole register) into a classical bit (or register).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Measurement {
    pub qubit: Argument,
    pub target: Argument,
}

impl Measurement {
    pub fn new(qubit: Argument, target: Argument) -> Self {
        Self { qubit, target }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "measure {} -> {};", self.qubit, self.target)
    }
}

/// A statement which only executes when a classical register holds the given value.
#[derive(Clone, Debug, PartialEq)]
pub struct Conditional {
    pub register: String,
    pub value: u64,
    pub statement: Box<Statement>,
}

impl Conditional {
    pub fn new(register: String, value: u64, statement: Statement) -> Self {
        Self {
            register,
            value,
            statement: Box::new(statement),
        }
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "if({}=={}) {}", self.register, self.value, self.statement)
    }
}
