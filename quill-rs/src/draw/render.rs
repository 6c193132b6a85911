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

//! The cells drawn for a single operation.

use std::collections::BTreeMap;

use crate::circuit::{gates, Circuit, Operation, Qubit};

use super::cell::{Cell, Input, InputLabel};
use super::typst::{as_fraction_of_pi, op_to_typst};
use super::DrawError;

/// The cells contributed by one operation, by wire index.
pub(crate) type Cells = BTreeMap<usize, Cell>;

/// Renders operations of a circuit into cells.
///
/// Wires are numbered from the top of the diagram: one per qubit, followed by one per classical
/// register.
pub(crate) struct OperationRenderer<'c> {
    circuit: &'c Circuit,
}

impl<'c> OperationRenderer<'c> {
    pub(crate) fn new(circuit: &'c Circuit) -> Self {
        Self { circuit }
    }

    pub(crate) fn num_wires(&self) -> usize {
        self.circuit.num_qubits() + self.circuit.cregs().len()
    }

    fn qubit_wire(qubit: &Qubit) -> usize {
        qubit.0
    }

    fn register_wire(&self, register: usize) -> usize {
        self.circuit.num_qubits() + register
    }

    pub(crate) fn render(&self, operation: &Operation) -> Result<Cells, DrawError> {
        tracing::trace!(%operation, "rendering operation");
        self.render_from(operation, 0, &operation.name, false)
    }

    /// Render `operation` as the gate `name` applied to its qubits starting at `offset`, the
    /// qubits before `offset` being controls.
    fn render_from(
        &self,
        operation: &Operation,
        offset: usize,
        name: &str,
        controlled: bool,
    ) -> Result<Cells, DrawError> {
        if let Some(condition) = &operation.condition {
            return self.render_conditioned(operation, condition.register, condition.value);
        }

        let qubits = &operation.qubits[offset.min(operation.qubits.len())..];
        let wire = |position: usize| {
            qubits
                .get(position)
                .map(Self::qubit_wire)
                .ok_or_else(|| DrawError::MissingQubit {
                    operation: operation.to_string(),
                    position: offset + position,
                })
        };
        let parameter = |position: usize| {
            operation
                .params
                .get(position)
                .map(|theta| as_fraction_of_pi(*theta))
                .ok_or_else(|| DrawError::MissingParameter {
                    gate: name.to_string(),
                    position,
                })
        };

        let mut cells = Cells::new();
        match name {
            "barrier" => {
                let top = qubits.iter().map(Self::qubit_wire).min();
                let bottom = qubits.iter().map(Self::qubit_wire).max();
                let (Some(top), Some(bottom)) = (top, bottom) else {
                    return Err(DrawError::MissingQubit {
                        operation: operation.to_string(),
                        position: 0,
                    });
                };
                for other in (0..self.num_wires()).filter(|other| *other != top) {
                    cells.insert(other, Cell::Empty);
                }
                cells.insert(
                    top,
                    Cell::Slice {
                        n: bottom - top + 1,
                    },
                );
            }
            "cp" => {
                let (mut first, mut second) = (wire(0)?, wire(1)?);
                if second < first {
                    (first, second) = (second, first);
                }
                cells.insert(
                    first,
                    Cell::CtrlPhase {
                        target: distance(first, second),
                        theta: parameter(0)?,
                    },
                );
                cells.insert(second, Cell::Ctrl { target: 0 });
            }
            "cz" => {
                let (first, second) = (wire(0)?, wire(1)?);
                cells.insert(
                    first,
                    Cell::Ctrl {
                        target: distance(first, second),
                    },
                );
                cells.insert(second, Cell::Ctrl { target: 0 });
            }
            "measure" => {
                let qubit = wire(0)?;
                let clbit = operation
                    .clbits
                    .first()
                    .ok_or_else(|| DrawError::MissingClbit {
                        operation: operation.to_string(),
                    })?;
                let location = self
                    .circuit
                    .clbit_location(*clbit)
                    .ok_or(DrawError::UnknownClbit { clbit: clbit.0 })?;
                let register = self.register_wire(location.register);
                cells.insert(
                    qubit,
                    Cell::Meter {
                        target: distance(qubit, register),
                    },
                );
                cells.insert(
                    register,
                    Cell::MeasureTarget {
                        index: location.index,
                    },
                );
            }
            "p" => {
                cells.insert(
                    wire(0)?,
                    Cell::Phase {
                        theta: parameter(0)?,
                    },
                );
            }
            "rzz" => {
                let (first, second) = (wire(0)?, wire(1)?);
                cells.insert(
                    first,
                    Cell::CtrlZz {
                        target: distance(first, second),
                        theta: parameter(0)?,
                    },
                );
                cells.insert(second, Cell::Ctrl { target: 0 });
            }
            "swap" => {
                let (first, second) = (wire(0)?, wire(1)?);
                cells.insert(
                    first,
                    Cell::Swap {
                        target: distance(first, second),
                    },
                );
                cells.insert(second, Cell::SwapTarget);
            }
            "x" if controlled => {
                cells.insert(wire(0)?, Cell::Targ);
            }
            _ if name.starts_with('c') && qubits.len() >= 2 => {
                return self.render_controlled(operation, offset, name);
            }
            _ => {
                let (top, cell) = self.render_box(operation, offset, name)?;
                cells.insert(top, cell);
            }
        }
        Ok(cells)
    }

    /// A conditioned operation: a dot on the register's wire connected to the lowest qubit, and
    /// the operation itself.
    fn render_conditioned(
        &self,
        operation: &Operation,
        register: usize,
        value: u64,
    ) -> Result<Cells, DrawError> {
        let lowest = operation
            .qubits
            .iter()
            .map(Self::qubit_wire)
            .max()
            .ok_or_else(|| DrawError::MissingQubit {
                operation: operation.to_string(),
                position: 0,
            })?;
        let register = self.register_wire(register);

        let mut cells = Cells::new();
        cells.insert(
            register,
            Cell::Condition {
                target: distance(register, lowest),
                value,
            },
        );
        let unconditioned = Operation {
            condition: None,
            ..operation.clone()
        };
        cells.extend(self.render_from(&unconditioned, 0, &operation.name, false)?);
        Ok(cells)
    }

    /// A gate whose name starts with `c`: `cc` stands for two controls, `c<n>` for `n`, and a
    /// single `c` for one. The controls come first among the qubits.
    fn render_controlled(
        &self,
        operation: &Operation,
        offset: usize,
        name: &str,
    ) -> Result<Cells, DrawError> {
        let (count, base) = gates::split_controls(name).unwrap_or((0, name));

        let available = operation.qubits.len() - offset;
        if count == 0 || count >= available {
            return Err(DrawError::ControlCount {
                gate: name.to_string(),
                controls: count,
                qubits: available,
            });
        }

        let (controls, targets) = operation.qubits[offset..].split_at(count);
        let top = targets.iter().map(Self::qubit_wire).min().unwrap_or(0);
        let bottom = targets.iter().map(Self::qubit_wire).max().unwrap_or(0);

        let target_cells = self.render_from(operation, offset + count, base, true)?;
        let boxed = matches!(target_cells.get(&top), Some(Cell::MultiGate { .. }));

        let mut cells = Cells::new();
        for control in controls.iter().map(Self::qubit_wire) {
            // Controls inside a box are drawn as inputs of the box.
            if boxed && top < control && control < bottom {
                continue;
            }
            cells.insert(
                control,
                Cell::Ctrl {
                    target: distance(control, top),
                },
            );
        }
        cells.extend(target_cells);
        Ok(cells)
    }

    /// A gate drawn as a box over its qubits starting at `offset`. Returns the top wire of the
    /// box and its cell.
    fn render_box(
        &self,
        operation: &Operation,
        offset: usize,
        name: &str,
    ) -> Result<(usize, Cell), DrawError> {
        let label = op_to_typst(name, &operation.params)?;
        let (controls, targets) = operation.qubits.split_at(offset.min(operation.qubits.len()));
        let (Some(top), Some(bottom)) = (
            targets.iter().map(Self::qubit_wire).min(),
            targets.iter().map(Self::qubit_wire).max(),
        ) else {
            return Err(DrawError::MissingQubit {
                operation: operation.to_string(),
                position: offset,
            });
        };

        let n = bottom - top + 1;
        if n == 1 {
            return Ok((top, Cell::Gate(label)));
        }

        let mut inputs: Vec<Input> = targets
            .iter()
            .enumerate()
            .map(|(index, qubit)| Input {
                qubit: Self::qubit_wire(qubit) - top,
                label: InputLabel::Index(index),
            })
            .collect();
        inputs.extend(
            controls
                .iter()
                .map(Self::qubit_wire)
                .filter(|control| top < *control && *control < bottom)
                .map(|control| Input {
                    qubit: control - top,
                    label: InputLabel::Bullet,
                }),
        );

        // Widen boxes with an input on the middle wire, where the label is drawn.
        let middle_taken = n % 2 == 1
            && operation
                .qubits
                .iter()
                .any(|qubit| Self::qubit_wire(qubit).checked_sub(top) == Some(n / 2));
        let width = if middle_taken { 6.5 } else { 5.0 };

        Ok((
            top,
            Cell::MultiGate {
                label,
                n,
                inputs,
                width,
            },
        ))
    }
}

/// The signed number of wires from `from` down to `to`.
fn distance(from: usize, to: usize) -> isize {
    to as isize - from as isize
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Cells, OperationRenderer};
    use crate::circuit::{Circuit, Operation, Qubit};
    use crate::draw::cell::{Cell, Input, InputLabel};
    use crate::draw::DrawError;

    fn render_last(input: &str) -> Cells {
        let circuit: Circuit = input.parse().unwrap();
        let operation = circuit.operations().last().unwrap();
        OperationRenderer::new(&circuit).render(operation).unwrap()
    }

    fn gate(label: &str) -> Cell {
        Cell::Gate(label.to_string())
    }

    #[rstest]
    #[case("qreg q[1]; h q[0];", vec![(0, gate("$H$"))])]
    #[case("qreg q[2]; cx q[0], q[1];", vec![(0, Cell::Ctrl { target: 1 }), (1, Cell::Targ)])]
    #[case("qreg q[2]; cx q[1], q[0];", vec![(0, Cell::Targ), (1, Cell::Ctrl { target: -1 })])]
    #[case(
        "qreg q[3]; ccx q[0], q[2], q[1];",
        vec![(0, Cell::Ctrl { target: 1 }), (1, Cell::Targ), (2, Cell::Ctrl { target: -1 })]
    )]
    #[case(
        "qreg q[4]; c3x q[0], q[1], q[2], q[3];",
        vec![
            (0, Cell::Ctrl { target: 3 }),
            (1, Cell::Ctrl { target: 2 }),
            (2, Cell::Ctrl { target: 1 }),
            (3, Cell::Targ),
        ]
    )]
    #[case(
        "qreg q[5]; ctrl @ c3x q[0], q[1], q[2], q[3], q[4];",
        vec![
            (0, Cell::Ctrl { target: 4 }),
            (1, Cell::Ctrl { target: 3 }),
            (2, Cell::Ctrl { target: 2 }),
            (3, Cell::Ctrl { target: 1 }),
            (4, Cell::Targ),
        ]
    )]
    #[case("qreg q[2]; ch q[0], q[1];", vec![(0, Cell::Ctrl { target: 1 }), (1, gate("$H$"))])]
    #[case(
        "qreg q[2]; crx(pi/2) q[0], q[1];",
        vec![(0, Cell::Ctrl { target: 1 }), (1, gate("$R_X (pi / 2)$"))]
    )]
    #[case(
        "qreg q[3]; cp(pi/4) q[2], q[0];",
        vec![
            (0, Cell::CtrlPhase { target: 2, theta: "pi / 4".to_string() }),
            (2, Cell::Ctrl { target: 0 }),
        ]
    )]
    #[case(
        "qreg q[3]; cz q[0], q[2];",
        vec![(0, Cell::Ctrl { target: 2 }), (2, Cell::Ctrl { target: 0 })]
    )]
    #[case(
        "qreg q[2]; rzz(pi) q[0], q[1];",
        vec![(0, Cell::CtrlZz { target: 1, theta: "pi".to_string() }), (1, Cell::Ctrl { target: 0 })]
    )]
    #[case("qreg q[2]; swap q[0], q[1];", vec![(0, Cell::Swap { target: 1 }), (1, Cell::SwapTarget)])]
    #[case(
        "qreg q[3]; cswap q[1], q[0], q[2];",
        vec![
            (0, Cell::Swap { target: 2 }),
            (1, Cell::Ctrl { target: -1 }),
            (2, Cell::SwapTarget),
        ]
    )]
    #[case("qreg q[1]; p(pi/2) q[0];", vec![(0, Cell::Phase { theta: "pi / 2".to_string() })])]
    #[case(
        "qreg q[2]; creg c[2]; measure q[1] -> c[1];",
        vec![(1, Cell::Meter { target: 1 }), (2, Cell::MeasureTarget { index: 1 })]
    )]
    #[case(
        "qreg q[2]; creg a[1]; creg b[2]; measure q[0] -> b[0];",
        vec![(0, Cell::Meter { target: 3 }), (3, Cell::MeasureTarget { index: 0 })]
    )]
    #[case(
        "qreg q[2]; creg c[1]; if (c == 1) x q[0];",
        vec![(0, gate("$X$")), (2, Cell::Condition { target: -2, value: 1 })]
    )]
    #[case(
        "qreg q[2]; creg c[1]; if (c == 1) cx q[0], q[1];",
        vec![
            (0, Cell::Ctrl { target: 1 }),
            (1, Cell::Targ),
            (2, Cell::Condition { target: -1, value: 1 }),
        ]
    )]
    #[case(
        "qreg q[3]; creg c[1]; barrier q[2], q[0];",
        vec![(0, Cell::Slice { n: 3 }), (1, Cell::Empty), (2, Cell::Empty), (3, Cell::Empty)]
    )]
    fn renders(#[case] input: &str, #[case] expected: Vec<(usize, Cell)>) {
        assert_eq!(render_last(input), Cells::from_iter(expected));
    }

    #[test]
    fn boxed_gate() {
        assert_eq!(
            render_last("qreg q[3]; rxx(pi) q[0], q[2];"),
            Cells::from([(
                0,
                Cell::MultiGate {
                    label: "$R_(X X) (pi)$".to_string(),
                    n: 3,
                    inputs: vec![
                        Input {
                            qubit: 0,
                            label: InputLabel::Index(0)
                        },
                        Input {
                            qubit: 2,
                            label: InputLabel::Index(1)
                        },
                    ],
                    width: 5.0,
                }
            )])
        );
    }

    #[test]
    fn control_inside_box() {
        assert_eq!(
            render_last("qreg q[3]; ctrl @ rxx(pi) q[1], q[0], q[2];"),
            Cells::from([(
                0,
                Cell::MultiGate {
                    label: "$R_(X X) (pi)$".to_string(),
                    n: 3,
                    inputs: vec![
                        Input {
                            qubit: 0,
                            label: InputLabel::Index(0)
                        },
                        Input {
                            qubit: 2,
                            label: InputLabel::Index(1)
                        },
                        Input {
                            qubit: 1,
                            label: InputLabel::Bullet
                        },
                    ],
                    width: 6.5,
                }
            )])
        );
    }

    #[test]
    fn control_outside_box() {
        assert_eq!(
            render_last("qreg q[3]; ctrl @ iswap q[0], q[1], q[2];"),
            Cells::from([
                (0, Cell::Ctrl { target: 1 }),
                (
                    1,
                    Cell::MultiGate {
                        label: "\"iSWAP\"".to_string(),
                        n: 2,
                        inputs: vec![
                            Input {
                                qubit: 0,
                                label: InputLabel::Index(0)
                            },
                            Input {
                                qubit: 1,
                                label: InputLabel::Index(1)
                            },
                        ],
                        width: 5.0,
                    }
                ),
            ])
        );
    }

    #[test]
    fn too_many_controls() {
        let mut circuit = Circuit::with_size(2, 0).unwrap();
        circuit
            .append(Operation::gate("c3x", vec![], vec![Qubit(0), Qubit(1)]))
            .unwrap();
        let renderer = OperationRenderer::new(&circuit);
        assert_eq!(
            renderer.render(&circuit.operations()[0]),
            Err(DrawError::ControlCount {
                gate: "c3x".to_string(),
                controls: 3,
                qubits: 2,
            })
        );
    }
}
