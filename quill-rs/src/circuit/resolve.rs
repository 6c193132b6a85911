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

//! Resolution of a parsed OpenQASM [`Program`] into a [`Circuit`].

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::program::{Argument, GateCall, GateModifier, Program, Statement};

use super::gates::{self, GateSignature};
use super::{
    Circuit, CircuitError, Clbit, Condition, Operation, Qubit, Register, ResolveError,
};

#[derive(Copy, Clone, Debug)]
enum RegisterKind {
    Quantum,
    Classical,
}

/// Walks the statements of a program, keeping track of the registers and gates declared so far.
#[derive(Debug, Default)]
struct Resolver {
    circuit: Circuit,
    registers: HashMap<String, (RegisterKind, usize)>,
    qubit_offsets: Vec<usize>,
    clbit_offsets: Vec<usize>,
    declared_gates: IndexMap<String, GateSignature>,
}

impl Circuit {
    /// Build a circuit from an OpenQASM program.
    ///
    /// Arguments which name a whole register are broadcast: `h q;` applies `h` to every qubit of
    /// `q`, and `cx a, b;` pairs the qubits of `a` and `b`, which must have the same size. Gate
    /// modifiers are folded into the gate name, so that `ctrl @ inv @ s a, b;` becomes `csdg`.
    ///
    /// Standard gates are known whether or not `qelib1.inc` is included; other includes are
    /// ignored. The bodies of declared gates are not expanded.
    pub fn try_from_program(program: &Program) -> Result<Self, ResolveError> {
        let mut resolver = Resolver::default();
        for statement in program.statements() {
            resolver.resolve(statement, None)?;
        }
        Ok(resolver.circuit)
    }
}

impl Resolver {
    fn resolve(
        &mut self,
        statement: &Statement,
        condition: Option<Condition>,
    ) -> Result<(), ResolveError> {
        match statement {
            Statement::Include(path) => {
                if path != "qelib1.inc" {
                    tracing::warn!("ignoring include of {path:?}");
                }
            }
            Statement::QuantumRegister(declaration) => {
                self.declare_register(&declaration.name, declaration.size, RegisterKind::Quantum)?
            }
            Statement::ClassicalRegister(declaration) => self.declare_register(
                &declaration.name,
                declaration.size,
                RegisterKind::Classical,
            )?,
            Statement::GateDeclaration(declaration) => {
                if self.declared_gates.contains_key(&declaration.name) {
                    return Err(ResolveError::DuplicateGate(declaration.name.clone()));
                }
                self.declared_gates.insert(
                    declaration.name.clone(),
                    GateSignature {
                        num_qubits: declaration.qubits.len(),
                        num_params: declaration.parameters.len(),
                    },
                );
            }
            Statement::GateCall(call) => self.resolve_gate_call(call, condition)?,
            Statement::Measure(measurement) => {
                // Either bit to bit, or register to register of the same size.
                let qubits = self.qubits(&measurement.qubit)?;
                let clbits = self.clbits(&measurement.target)?;
                if qubits.len() != clbits.len() {
                    return Err(ResolveError::BroadcastMismatch(statement.to_string()));
                }
                for (qubit, clbit) in qubits.into_iter().zip(clbits) {
                    self.append(Operation::measure(qubit, clbit), condition)?;
                }
            }
            Statement::Reset(argument) => {
                for qubit in self.qubits(argument)? {
                    self.append(Operation::reset(qubit), condition)?;
                }
            }
            Statement::Barrier(arguments) => {
                let mut qubits = Vec::new();
                for argument in arguments {
                    qubits.extend(self.qubits(argument)?);
                }
                let qubits = qubits.into_iter().unique().collect();
                self.append(Operation::barrier(qubits), condition)?;
            }
            Statement::If(conditional) => {
                let register = self.register(&conditional.register, RegisterKind::Classical)?;
                let condition = Condition::new(register, conditional.value);
                self.resolve(&conditional.statement, Some(condition))?;
            }
        }
        Ok(())
    }

    fn append(
        &mut self,
        operation: Operation,
        condition: Option<Condition>,
    ) -> Result<(), ResolveError> {
        let operation = match condition {
            Some(condition) => operation.with_condition(condition),
            None => operation,
        };
        tracing::trace!(%operation, "resolved operation");
        self.circuit.append(operation)?;
        Ok(())
    }

    fn declare_register(
        &mut self,
        name: &str,
        size: u64,
        kind: RegisterKind,
    ) -> Result<(), ResolveError> {
        let size =
            usize::try_from(size).map_err(|_| CircuitError::TooManyBits(name.to_string()))?;
        let register = Register::new(name, size);
        let index = match kind {
            RegisterKind::Quantum => {
                self.qubit_offsets.push(self.circuit.num_qubits());
                self.circuit.add_qreg(register)?;
                self.circuit.qregs().len() - 1
            }
            RegisterKind::Classical => {
                self.clbit_offsets.push(self.circuit.num_clbits());
                self.circuit.add_creg(register)?;
                self.circuit.cregs().len() - 1
            }
        };
        self.registers.insert(name.to_string(), (kind, index));
        Ok(())
    }

    /// Returns the index of the register with the given name, which must be of the given kind.
    fn register(&self, name: &str, expected: RegisterKind) -> Result<usize, ResolveError> {
        match (self.registers.get(name), expected) {
            (None, _) => Err(ResolveError::UnknownRegister(name.to_string())),
            (Some((RegisterKind::Quantum, index)), RegisterKind::Quantum)
            | (Some((RegisterKind::Classical, index)), RegisterKind::Classical) => Ok(*index),
            (Some((RegisterKind::Classical, _)), RegisterKind::Quantum) => {
                Err(ResolveError::NotQuantum(name.to_string()))
            }
            (Some((RegisterKind::Quantum, _)), RegisterKind::Classical) => {
                Err(ResolveError::NotClassical(name.to_string()))
            }
        }
    }

    /// Returns the absolute indices of the bits an argument refers to.
    fn bits(&self, argument: &Argument, kind: RegisterKind) -> Result<Vec<usize>, ResolveError> {
        let register = self.register(&argument.register, kind)?;
        let (offset, size) = match kind {
            RegisterKind::Quantum => (
                self.qubit_offsets[register],
                self.circuit.qregs()[register].size,
            ),
            RegisterKind::Classical => (
                self.clbit_offsets[register],
                self.circuit.cregs()[register].size,
            ),
        };
        match argument.index {
            None => Ok((offset..offset + size).collect()),
            Some(index) => match usize::try_from(index) {
                Ok(index) if index < size => Ok(vec![offset + index]),
                _ => Err(ResolveError::IndexOutOfRange {
                    register: argument.register.clone(),
                    index,
                    size,
                }),
            },
        }
    }

    fn qubits(&self, argument: &Argument) -> Result<Vec<Qubit>, ResolveError> {
        Ok(self
            .bits(argument, RegisterKind::Quantum)?
            .into_iter()
            .map(Qubit)
            .collect())
    }

    fn clbits(&self, argument: &Argument) -> Result<Vec<Clbit>, ResolveError> {
        Ok(self
            .bits(argument, RegisterKind::Classical)?
            .into_iter()
            .map(Clbit)
            .collect())
    }

    fn signature(&self, name: &str) -> Result<GateSignature, ResolveError> {
        self.declared_gates
            .get(name)
            .copied()
            .or_else(|| gates::standard_signature(name))
            .ok_or_else(|| ResolveError::UnknownGate(name.to_string()))
    }

    fn resolve_gate_call(
        &mut self,
        call: &GateCall,
        condition: Option<Condition>,
    ) -> Result<(), ResolveError> {
        let base = gates::canonical_name(&call.name);
        let signature = self.signature(base)?;

        let mut controls = 0usize;
        let mut inverted = false;
        for modifier in &call.modifiers {
            match modifier {
                GateModifier::Control(0) => {
                    return Err(ResolveError::ZeroControls(call.to_string()))
                }
                GateModifier::Control(count) => {
                    controls = usize::try_from(*count)
                        .ok()
                        .and_then(|count| controls.checked_add(count))
                        .ok_or_else(|| ResolveError::TooManyControls(call.to_string()))?;
                }
                GateModifier::Inverse => inverted = !inverted,
            }
        }

        let expected_qubits = signature
            .num_qubits
            .checked_add(controls)
            .ok_or_else(|| ResolveError::TooManyControls(call.to_string()))?;
        if call.arguments.len() != expected_qubits {
            return Err(ResolveError::QubitCount {
                gate: call.name.clone(),
                expected: expected_qubits,
                found: call.arguments.len(),
            });
        }
        if call.parameters.len() != signature.num_params {
            return Err(ResolveError::ParameterCount {
                gate: call.name.clone(),
                expected: signature.num_params,
                found: call.parameters.len(),
            });
        }

        let params = call
            .parameters
            .iter()
            .map(|parameter| {
                parameter
                    .to_real()
                    .map_err(|source| ResolveError::Evaluation {
                        gate: call.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Inversion commutes with control, so invert the target gate first.
        let (mut name, params) = if inverted {
            gates::inverse(base, &params)
        } else {
            (base.to_string(), params)
        };
        if controls > 0 {
            name = gates::controlled_name(&name, controls);
        }

        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.qubits(argument))
            .collect::<Result<Vec<_>, _>>()?;
        let sizes = arguments.iter().map(Vec::len).collect::<Vec<_>>();
        let repetitions = broadcast(&sizes)
            .ok_or_else(|| ResolveError::BroadcastMismatch(call.to_string()))?;

        for i in 0..repetitions {
            let qubits = arguments
                .iter()
                .map(|qubits| qubits[i.min(qubits.len() - 1)])
                .collect();
            self.append(Operation::gate(name.clone(), params.clone(), qubits), condition)?;
        }
        Ok(())
    }
}

/// Returns how many times a statement with arguments of the given sizes is applied, or `None`
/// if registers of different sizes are mixed.
///
/// Single bits are repeated alongside registers.
fn broadcast(sizes: &[usize]) -> Option<usize> {
    let registers = sizes
        .iter()
        .copied()
        .filter(|size| *size > 1)
        .unique()
        .collect::<Vec<_>>();
    match registers.as_slice() {
        [] => Some(1),
        [size] => Some(*size),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::circuit::{Circuit, CircuitError, Clbit, Condition, Operation, Qubit, ResolveError};

    fn resolve(input: &str) -> Result<Circuit, ResolveError> {
        input.parse()
    }

    #[test]
    fn bell_pair() {
        let circuit = resolve(
            r#"OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
h q[0];
CX q[0], q[1];
measure q -> c;"#,
        )
        .unwrap();

        assert_eq!(
            circuit.operations(),
            &[
                Operation::gate("h", vec![], vec![Qubit(0)]),
                Operation::gate("cx", vec![], vec![Qubit(0), Qubit(1)]),
                Operation::measure(Qubit(0), Clbit(0)),
                Operation::measure(Qubit(1), Clbit(1)),
            ]
        );
    }

    #[test]
    fn broadcasts_registers_and_bits() {
        let circuit = resolve(
            "qreg a[3]; qreg b[3]; qreg anc[1];
cx a, b;
ccx a, b, anc[0];
reset a;",
        )
        .unwrap();

        let names = circuit
            .operations()
            .iter()
            .map(|operation| (operation.name.as_str(), operation.qubits.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                ("cx", vec![Qubit(0), Qubit(3)]),
                ("cx", vec![Qubit(1), Qubit(4)]),
                ("cx", vec![Qubit(2), Qubit(5)]),
                ("ccx", vec![Qubit(0), Qubit(3), Qubit(6)]),
                ("ccx", vec![Qubit(1), Qubit(4), Qubit(6)]),
                ("ccx", vec![Qubit(2), Qubit(5), Qubit(6)]),
                ("reset", vec![Qubit(0)]),
                ("reset", vec![Qubit(1)]),
                ("reset", vec![Qubit(2)]),
            ]
        );
    }

    #[test]
    fn barrier_spans_all_arguments() {
        let circuit = resolve("qreg q[3]; qreg r[1]; barrier q[1], r, q;").unwrap();
        assert_eq!(
            circuit.operations(),
            &[Operation::barrier(vec![
                Qubit(1),
                Qubit(3),
                Qubit(0),
                Qubit(2)
            ])]
        );
    }

    #[test]
    fn modifiers() {
        let circuit = resolve(
            "qreg q[4];
ctrl @ inv @ s q[0], q[1];
ctrl(2) @ x q[0], q[1], q[2];
ctrl @ ctrl(2) @ x q[0], q[1], q[2], q[3];
ctrl(2) @ cx q[0], q[1], q[2], q[3];
inv @ u3(pi, pi/2, pi/4) q[0];
inv @ inv @ t q[0];",
        )
        .unwrap();

        let names = circuit
            .operations()
            .iter()
            .map(|operation| operation.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["csdg", "ccx", "c3x", "c3x", "u3", "t"]);
        assert_eq!(circuit.operations()[4].params, vec![-PI, -PI / 4.0, -PI / 2.0]);
    }

    #[test]
    fn conditions() {
        let circuit = resolve("qreg q[2]; creg a[1]; creg b[2]; if (b == 3) x q;").unwrap();
        assert_eq!(
            circuit.operations(),
            &[
                Operation::gate("x", vec![], vec![Qubit(0)]).with_condition(Condition::new(1, 3)),
                Operation::gate("x", vec![], vec![Qubit(1)]).with_condition(Condition::new(1, 3)),
            ]
        );
    }

    #[test]
    fn declared_gates() {
        let circuit = resolve(
            "gate majority a, b, c { cx c, b; cx c, a; ccx a, b, c; }
opaque oracle(theta) a, b;
qreg q[3];
majority q[0], q[1], q[2];
oracle(pi) q[2], q[0];",
        )
        .unwrap();
        assert_eq!(circuit.operations()[0].name, "majority");
        assert_eq!(circuit.operations()[1].params, vec![PI]);
    }

    #[rstest]
    #[case("qreg q[1]; foo q[0];", ResolveError::UnknownGate("foo".to_string()))]
    #[case("qreg q[2]; h r[0];", ResolveError::UnknownRegister("r".to_string()))]
    #[case("qreg q[2]; creg c[2]; h c[0];", ResolveError::NotQuantum("c".to_string()))]
    #[case("qreg q[2]; if (q == 1) x q[0];", ResolveError::NotClassical("q".to_string()))]
    #[case("qreg q[2]; h q[2];", ResolveError::IndexOutOfRange { register: "q".to_string(), index: 2, size: 2 })]
    #[case("qreg q[2]; cx q[0];", ResolveError::QubitCount { gate: "cx".to_string(), expected: 2, found: 1 })]
    #[case("qreg q[2]; ctrl @ h q[0];", ResolveError::QubitCount { gate: "h".to_string(), expected: 2, found: 1 })]
    #[case("qreg q[2]; rx q[0];", ResolveError::ParameterCount { gate: "rx".to_string(), expected: 1, found: 0 })]
    #[case("qreg a[2]; qreg b[3]; cx a, b;", ResolveError::BroadcastMismatch("cx a, b;".to_string()))]
    #[case("qreg q[2]; ctrl(0) @ h q[0];", ResolveError::ZeroControls("ctrl(0) @ h q[0];".to_string()))]
    #[case("gate g a { } gate g b { }", ResolveError::DuplicateGate("g".to_string()))]
    #[case("qreg q[2]; creg c[2]; measure q -> c[0];", ResolveError::BroadcastMismatch("measure q -> c[0];".to_string()))]
    #[case("qreg q[1]; creg c[2]; measure q[0] -> c;", ResolveError::BroadcastMismatch("measure q[0] -> c;".to_string()))]
    #[case("qreg q[2]; ctrl(18446744073709551615) @ ctrl @ x q[0], q[1];", ResolveError::TooManyControls("ctrl(18446744073709551615) @ ctrl @ x q[0], q[1];".to_string()))]
    #[case("qreg a[18446744073709551615]; qreg b[2]; h b[0];", ResolveError::Circuit(CircuitError::TooManyBits("b".to_string())))]
    #[case("qreg q[1]; creg a[18446744073709551615]; creg b[1];", ResolveError::Circuit(CircuitError::TooManyBits("a".to_string())))]
    #[case("qreg q[2]; cx q[1], q[1];", ResolveError::Circuit(CircuitError::DuplicateQubit { operation: "cx".to_string(), qubit: 1 }))]
    #[case("qreg q[2]; qreg q[1];", ResolveError::Circuit(CircuitError::DuplicateRegister("q".to_string())))]
    #[case("qreg q[1]; creg c[1]; if (c == 2) x q[0];", ResolveError::Circuit(CircuitError::ConditionOutOfRange { register: "c".to_string(), value: 2 }))]
    fn errors(#[case] input: &str, #[case] expected: ResolveError) {
        assert_eq!(resolve(input).unwrap_err(), expected);
    }

    #[test]
    fn unbound_parameter() {
        let error = resolve("qreg q[1]; rx(theta) q[0];").unwrap_err();
        assert!(matches!(error, ResolveError::Evaluation { .. }));
    }

    #[test]
    fn syntax_error() {
        let error = resolve("qreg q[1]; h q[0]").unwrap_err();
        assert!(matches!(error, ResolveError::Program(_)));
    }
}
