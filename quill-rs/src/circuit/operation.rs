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

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A qubit, by its index across all quantum registers of a circuit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qubit(pub usize);

/// A classical bit, by its index across all classical registers of a circuit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Clbit(pub usize);

/// A classical guard: the operation only takes effect when the classical register with index
/// `register` holds `value`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub register: usize,
    pub value: u64,
}

impl Condition {
    pub fn new(register: usize, value: u64) -> Self {
        Self { register, value }
    }
}

/// A gate, measurement, reset or barrier applied to some bits of a circuit.
///
/// Gates are identified by their lowercase OpenQASM name, e.g. `h`, `cx` or `u3`. Controlled
/// gates are named by prefixing the name of the target gate with `c` (one control), `cc` (two
/// controls) or `c<n>` (`n` controls); their control qubits come first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub params: Vec<f64>,
    pub qubits: Vec<Qubit>,
    #[serde(default)]
    pub clbits: Vec<Clbit>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl Operation {
    /// A unitary gate.
    pub fn gate(name: impl Into<String>, params: Vec<f64>, qubits: Vec<Qubit>) -> Self {
        Self {
            name: name.into(),
            params,
            qubits,
            clbits: vec![],
            condition: None,
        }
    }

    /// A measurement of `qubit` into `clbit`.
    pub fn measure(qubit: Qubit, clbit: Clbit) -> Self {
        Self {
            name: "measure".to_string(),
            params: vec![],
            qubits: vec![qubit],
            clbits: vec![clbit],
            condition: None,
        }
    }

    pub fn barrier(qubits: Vec<Qubit>) -> Self {
        Self::gate("barrier", vec![], qubits)
    }

    pub fn reset(qubit: Qubit) -> Self {
        Self::gate("reset", vec![], vec![qubit])
    }

    /// Guard this operation with a classical condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn is_barrier(&self) -> bool {
        self.name == "barrier"
    }

    pub fn is_measure(&self) -> bool {
        self.name == "measure"
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(condition) = &self.condition {
            write!(f, "if(c{}=={}) ", condition.register, condition.value)?;
        }
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "({})", self.params.iter().join(", "))?;
        }
        write!(
            f,
            " {}",
            self.qubits.iter().map(|qubit| format!("q{}", qubit.0)).join(", ")
        )?;
        if !self.clbits.is_empty() {
            write!(
                f,
                " -> {}",
                self.clbits.iter().map(|clbit| format!("c{}", clbit.0)).join(", ")
            )?;
        }
        Ok(())
    }
}
