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

//! The circuit model: registers, bits and the ordered list of operations applied to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod error;
pub(crate) mod gates;
mod operation;
mod resolve;

pub use error::{CircuitError, ResolveError};
pub use operation::{Clbit, Condition, Operation, Qubit};

/// A named, fixed-size group of qubits or classical bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    pub name: String,
    pub size: usize,
}

impl Register {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}

/// Where a bit lives: the index of its register within the circuit, and its index within that
/// register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitLocation {
    pub register: usize,
    pub index: usize,
}

/// A quantum circuit: quantum and classical registers and the operations applied to their bits,
/// in program order.
///
/// Bits are numbered across registers in declaration order, so the first bit of the second
/// quantum register has the index of the size of the first one.
///
/// Every [`Operation`] of a circuit is valid for it: its bits and condition register exist and
/// its qubits are distinct. Deserialization enforces the same rules as [`Circuit::append`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircuit")]
pub struct Circuit {
    qregs: Vec<Register>,
    cregs: Vec<Register>,
    operations: Vec<Operation>,
}

/// The unchecked form of a [`Circuit`], as it is read from JSON.
#[derive(Deserialize)]
struct RawCircuit {
    #[serde(default)]
    qregs: Vec<Register>,
    #[serde(default)]
    cregs: Vec<Register>,
    #[serde(default)]
    operations: Vec<Operation>,
}

impl TryFrom<RawCircuit> for Circuit {
    type Error = CircuitError;

    fn try_from(raw: RawCircuit) -> Result<Self, Self::Error> {
        let mut circuit = Circuit::new();
        for register in raw.qregs {
            circuit.add_qreg(register)?;
        }
        for register in raw.cregs {
            circuit.add_creg(register)?;
        }
        for operation in raw.operations {
            circuit.append(operation)?;
        }
        Ok(circuit)
    }
}

impl Circuit {
    /// Create a circuit without any register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a circuit with one quantum register `q` of `num_qubits` qubits and, unless
    /// `num_clbits` is zero, one classical register `c` of `num_clbits` bits.
    pub fn with_size(num_qubits: usize, num_clbits: usize) -> Result<Self, CircuitError> {
        let mut circuit = Self::new();
        if num_qubits > 0 {
            circuit.add_qreg(Register::new("q", num_qubits))?;
        }
        if num_clbits > 0 {
            circuit.add_creg(Register::new("c", num_clbits))?;
        }
        Ok(circuit)
    }

    fn check_new_register(&self, register: &Register) -> Result<(), CircuitError> {
        if register.size == 0 {
            return Err(CircuitError::EmptyRegister(register.name.clone()));
        }
        let taken = self
            .qregs
            .iter()
            .chain(&self.cregs)
            .any(|existing| existing.name == register.name);
        if taken {
            return Err(CircuitError::DuplicateRegister(register.name.clone()));
        }
        // Bits of both kinds share one wire index space when drawn.
        self.qregs
            .iter()
            .chain(&self.cregs)
            .try_fold(register.size, |total, existing| total.checked_add(existing.size))
            .ok_or_else(|| CircuitError::TooManyBits(register.name.clone()))?;
        Ok(())
    }

    /// Add a quantum register; its qubits are numbered after those of all existing registers.
    pub fn add_qreg(&mut self, register: Register) -> Result<(), CircuitError> {
        self.check_new_register(&register)?;
        self.qregs.push(register);
        Ok(())
    }

    /// Add a classical register; its bits are numbered after those of all existing registers.
    pub fn add_creg(&mut self, register: Register) -> Result<(), CircuitError> {
        self.check_new_register(&register)?;
        self.cregs.push(register);
        Ok(())
    }

    /// Append an operation to the end of the circuit, after validating it against the circuit's
    /// registers.
    pub fn append(&mut self, operation: Operation) -> Result<(), CircuitError> {
        self.validate(&operation)?;
        self.operations.push(operation);
        Ok(())
    }

    fn validate(&self, operation: &Operation) -> Result<(), CircuitError> {
        if operation.qubits.is_empty() {
            return Err(CircuitError::NoQubits(operation.name.clone()));
        }

        let num_qubits = self.num_qubits();
        for (position, qubit) in operation.qubits.iter().enumerate() {
            if qubit.0 >= num_qubits {
                return Err(CircuitError::QubitOutOfRange {
                    qubit: qubit.0,
                    num_qubits,
                });
            }
            if operation.qubits[..position].contains(qubit) {
                return Err(CircuitError::DuplicateQubit {
                    operation: operation.name.clone(),
                    qubit: qubit.0,
                });
            }
        }

        let num_clbits = self.num_clbits();
        if let Some(clbit) = operation.clbits.iter().find(|clbit| clbit.0 >= num_clbits) {
            return Err(CircuitError::ClbitOutOfRange {
                clbit: clbit.0,
                num_clbits,
            });
        }

        if let Some(value) = operation.params.iter().find(|value| !value.is_finite()) {
            return Err(CircuitError::NonFiniteParameter {
                operation: operation.name.clone(),
                value: *value,
            });
        }

        if let Some(condition) = &operation.condition {
            let register = self.cregs.get(condition.register).ok_or(
                CircuitError::RegisterOutOfRange {
                    register: condition.register,
                    num_registers: self.cregs.len(),
                },
            )?;
            // A register of 64 bits or more holds every `u64`.
            if register.size < 64 && condition.value >> register.size != 0 {
                return Err(CircuitError::ConditionOutOfRange {
                    register: register.name.clone(),
                    value: condition.value,
                });
            }
        }

        Ok(())
    }

    /// Add a measurement of every qubit into a new classical register, separated from the rest
    /// of the circuit by a barrier.
    ///
    /// The register is called `meas`, or `meas0`, `meas1`, ... if that name is taken.
    pub fn measure_all(&mut self) -> Result<(), CircuitError> {
        let num_qubits = self.num_qubits();
        if num_qubits == 0 {
            return Ok(());
        }

        let name = std::iter::once("meas".to_string())
            .chain((0..).map(|suffix| format!("meas{suffix}")))
            .find(|name| {
                !self
                    .qregs
                    .iter()
                    .chain(&self.cregs)
                    .any(|register| &register.name == name)
            })
            .unwrap_or_default();
        let first_clbit = self.num_clbits();
        self.add_creg(Register::new(name, num_qubits))?;

        self.append(Operation::barrier((0..num_qubits).map(Qubit).collect()))?;
        for index in 0..num_qubits {
            self.append(Operation::measure(Qubit(index), Clbit(first_clbit + index)))?;
        }
        Ok(())
    }

    /// The quantum registers, in declaration order.
    pub fn qregs(&self) -> &[Register] {
        &self.qregs
    }

    /// The classical registers, in declaration order.
    pub fn cregs(&self) -> &[Register] {
        &self.cregs
    }

    /// The operations, in program order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(|register| register.size).sum()
    }

    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(|register| register.size).sum()
    }

    /// Returns the register and index of the given qubit, if it belongs to this circuit.
    pub fn qubit_location(&self, qubit: Qubit) -> Option<BitLocation> {
        locate(&self.qregs, qubit.0)
    }

    /// Returns the register and index of the given classical bit, if it belongs to this circuit.
    pub fn clbit_location(&self, clbit: Clbit) -> Option<BitLocation> {
        locate(&self.cregs, clbit.0)
    }

    /// Returns the index of the first bit of each register.
    pub(crate) fn register_offsets(registers: &[Register]) -> Vec<usize> {
        registers
            .iter()
            .scan(0, |offset, register| {
                let start = *offset;
                *offset += register.size;
                Some(start)
            })
            .collect()
    }

    /// Returns the classical bits of the given classical register.
    pub fn creg_clbits(&self, register: usize) -> impl Iterator<Item = Clbit> {
        let offsets = Self::register_offsets(&self.cregs);
        let range = match (offsets.get(register), self.cregs.get(register)) {
            (Some(&start), Some(creg)) => start..start + creg.size,
            _ => 0..0,
        };
        range.map(Clbit)
    }
}

fn locate(registers: &[Register], bit: usize) -> Option<BitLocation> {
    let mut offset = 0;
    for (register, declared) in registers.iter().enumerate() {
        if bit < offset + declared.size {
            return Some(BitLocation {
                register,
                index: bit - offset,
            });
        }
        offset += declared.size;
    }
    None
}

impl FromStr for Circuit {
    type Err = ResolveError;

    /// Parse and resolve an OpenQASM 2 program.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let program = s.parse()?;
        Self::try_from_program(&program)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{BitLocation, Circuit, CircuitError, Clbit, Condition, Operation, Qubit, Register};

    fn two_registers() -> Circuit {
        let mut circuit = Circuit::new();
        circuit.add_qreg(Register::new("a", 2)).unwrap();
        circuit.add_qreg(Register::new("b", 3)).unwrap();
        circuit.add_creg(Register::new("c", 1)).unwrap();
        circuit.add_creg(Register::new("d", 2)).unwrap();
        circuit
    }

    #[test]
    fn bit_locations() {
        let circuit = two_registers();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(
            circuit.qubit_location(Qubit(3)),
            Some(BitLocation {
                register: 1,
                index: 1
            })
        );
        assert_eq!(
            circuit.clbit_location(Clbit(2)),
            Some(BitLocation {
                register: 1,
                index: 1
            })
        );
        assert_eq!(circuit.qubit_location(Qubit(5)), None);
        assert_eq!(
            circuit.creg_clbits(1).collect::<Vec<_>>(),
            vec![Clbit(1), Clbit(2)]
        );
    }

    #[test]
    fn duplicate_register() {
        let mut circuit = two_registers();
        assert_eq!(
            circuit.add_creg(Register::new("a", 1)),
            Err(CircuitError::DuplicateRegister("a".to_string()))
        );
    }

    #[rstest]
    #[case(Operation::gate("h", vec![], vec![Qubit(5)]), CircuitError::QubitOutOfRange { qubit: 5, num_qubits: 5 })]
    #[case(Operation::gate("cx", vec![], vec![Qubit(1), Qubit(1)]), CircuitError::DuplicateQubit { operation: "cx".to_string(), qubit: 1 })]
    #[case(Operation::gate("gphase", vec![0.5], vec![]), CircuitError::NoQubits("gphase".to_string()))]
    #[case(Operation::measure(Qubit(0), Clbit(3)), CircuitError::ClbitOutOfRange { clbit: 3, num_clbits: 3 })]
    #[case(Operation::gate("x", vec![], vec![Qubit(0)]).with_condition(Condition::new(2, 1)), CircuitError::RegisterOutOfRange { register: 2, num_registers: 2 })]
    #[case(Operation::gate("x", vec![], vec![Qubit(0)]).with_condition(Condition::new(1, 4)), CircuitError::ConditionOutOfRange { register: "d".to_string(), value: 4 })]
    fn invalid_operations(#[case] operation: Operation, #[case] expected: CircuitError) {
        let mut circuit = two_registers();
        assert_eq!(circuit.append(operation), Err(expected));
        assert!(circuit.operations().is_empty());
    }

    #[test]
    fn too_many_bits() {
        let mut circuit = two_registers();
        assert_eq!(
            circuit.add_qreg(Register::new("e", usize::MAX)),
            Err(CircuitError::TooManyBits("e".to_string()))
        );
        assert_eq!(
            circuit.add_creg(Register::new("e", usize::MAX - 7)),
            Err(CircuitError::TooManyBits("e".to_string()))
        );
        circuit.add_creg(Register::new("e", usize::MAX - 8)).unwrap();
        assert_eq!(circuit.num_qubits() + circuit.num_clbits(), usize::MAX);
    }

    #[test]
    fn non_finite_parameter() {
        let mut circuit = two_registers();
        let result = circuit.append(Operation::gate("rx", vec![f64::NAN], vec![Qubit(0)]));
        assert!(matches!(
            result,
            Err(CircuitError::NonFiniteParameter { .. })
        ));
    }

    #[test]
    fn measure_all_picks_a_free_name() {
        let mut circuit = Circuit::new();
        circuit.add_qreg(Register::new("q", 2)).unwrap();
        circuit.add_creg(Register::new("meas", 1)).unwrap();
        circuit.measure_all().unwrap();

        assert_eq!(circuit.cregs()[1], Register::new("meas0", 2));
        assert_eq!(
            circuit.operations(),
            &[
                Operation::barrier(vec![Qubit(0), Qubit(1)]),
                Operation::measure(Qubit(0), Clbit(1)),
                Operation::measure(Qubit(1), Clbit(2)),
            ]
        );
    }

    #[test]
    fn deserializes_and_validates() {
        let circuit: Circuit = serde_json::from_str(
            r#"{
                "qregs": [{"name": "q", "size": 2}],
                "cregs": [{"name": "c", "size": 2}],
                "operations": [
                    {"name": "h", "qubits": [0]},
                    {"name": "cx", "qubits": [0, 1]},
                    {"name": "measure", "qubits": [1], "clbits": [1]},
                    {"name": "x", "qubits": [0], "condition": {"register": 0, "value": 2}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(circuit.operations().len(), 4);
        assert_eq!(
            circuit.operations()[3].condition,
            Some(Condition::new(0, 2))
        );

        let round_tripped: Circuit =
            serde_json::from_str(&serde_json::to_string(&circuit).unwrap()).unwrap();
        assert_eq!(round_tripped, circuit);

        let invalid = serde_json::from_str::<Circuit>(
            r#"{"qregs": [{"name": "q", "size": 1}], "operations": [{"name": "cx", "qubits": [0, 1]}]}"#,
        );
        assert!(invalid.is_err());
    }

    #[test]
    fn deserialization_rejects_too_many_bits() {
        let error = serde_json::from_str::<Circuit>(&format!(
            r#"{{"qregs": [{{"name": "a", "size": {}}}, {{"name": "b", "size": 2}}]}}"#,
            usize::MAX
        ))
        .unwrap_err();
        assert!(error.to_string().contains("register b"));
    }
}
