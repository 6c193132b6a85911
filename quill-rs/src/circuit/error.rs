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

use crate::expression::EvaluationError;
use crate::program::ProgramError;

/// An operation or register that is not valid for a [`Circuit`](super::Circuit).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CircuitError {
    #[error("a register named {0} already exists")]
    DuplicateRegister(String),
    #[error("register {0} must hold at least one bit")]
    EmptyRegister(String),
    #[error("register {0} brings the number of bits past what a circuit can index")]
    TooManyBits(String),
    #[error("operation {0} does not act on any qubit")]
    NoQubits(String),
    #[error("qubit {qubit} is out of range for a circuit of {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },
    #[error("classical bit {clbit} is out of range for a circuit of {num_clbits} classical bits")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },
    #[error("classical register {register} is out of range for a circuit of {num_registers} classical registers")]
    RegisterOutOfRange {
        register: usize,
        num_registers: usize,
    },
    #[error("operation {operation} uses qubit {qubit} more than once")]
    DuplicateQubit { operation: String, qubit: usize },
    #[error("parameter {value} of operation {operation} is not finite")]
    NonFiniteParameter { operation: String, value: f64 },
    #[error("register {register} is too small to ever hold the value {value}")]
    ConditionOutOfRange { register: String, value: u64 },
}

/// Errors that may occur while turning an OpenQASM [`Program`](crate::program::Program) into a
/// [`Circuit`](super::Circuit).
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error("failed to evaluate a parameter of {gate}: {source}")]
    Evaluation {
        gate: String,
        source: EvaluationError,
    },
    #[error("register {0} is not declared")]
    UnknownRegister(String),
    #[error("{0} is a classical register where a quantum register is expected")]
    NotQuantum(String),
    #[error("{0} is a quantum register where a classical register is expected")]
    NotClassical(String),
    #[error("index {index} is out of range for register {register} of size {size}")]
    IndexOutOfRange {
        register: String,
        index: u64,
        size: usize,
    },
    #[error("gate {0} is not declared")]
    UnknownGate(String),
    #[error("gate {0} is declared more than once")]
    DuplicateGate(String),
    #[error("gate {gate} expects {expected} qubits, found {found}")]
    QubitCount {
        gate: String,
        expected: usize,
        found: usize,
    },
    #[error("gate {gate} expects {expected} parameters, found {found}")]
    ParameterCount {
        gate: String,
        expected: usize,
        found: usize,
    },
    #[error("registers of different sizes are used together in `{0}`")]
    BroadcastMismatch(String),
    #[error("a control modifier needs at least one control qubit in `{0}`")]
    ZeroControls(String),
    #[error("too many control qubits in `{0}`")]
    TooManyControls(String),
}
