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

use crate::circuit::Circuit;

use super::cell::Cell;
use super::layers::layers;
use super::render::OperationRenderer;
use super::typst::wire_name;
use super::DrawError;

/// One wire of a diagram.
#[derive(Clone, Debug)]
struct Row {
    label: String,
    classical: bool,
    /// One cell per layer; `None` is a plain wire.
    cells: Vec<Option<Cell>>,
}

/// The grid of cells of a `quantum-circuit` call: one row per qubit, then one row per classical
/// register, and one column per layer.
#[derive(Clone, Debug)]
pub(crate) struct Diagram {
    rows: Vec<Row>,
}

impl Diagram {
    pub(crate) fn new(circuit: &Circuit) -> Result<Self, DrawError> {
        let layers = layers(circuit);
        let depth = layers.len();

        let qubit_rows = circuit.qregs().iter().flat_map(|register| {
            (0..register.size).map(move |index| Row {
                label: wire_name(register, Some(index), true),
                classical: false,
                cells: vec![None; depth],
            })
        });
        let clbit_rows = circuit.cregs().iter().map(|register| Row {
            label: wire_name(register, None, false),
            classical: true,
            cells: vec![None; depth],
        });
        let mut rows: Vec<Row> = qubit_rows.chain(clbit_rows).collect();

        let renderer = OperationRenderer::new(circuit);
        for (column, layer) in layers.iter().enumerate() {
            for index in layer {
                let cells = renderer.render(&circuit.operations()[*index])?;
                for (wire, cell) in cells {
                    let Some(slot) = rows.get_mut(wire).map(|row| &mut row.cells[column]) else {
                        continue;
                    };
                    // The space around a barrier never hides another operation of the layer.
                    let occupied = slot.as_ref().is_some_and(|existing| *existing != Cell::Empty);
                    if cell == Cell::Empty && occupied {
                        continue;
                    }
                    *slot = Some(cell);
                }
            }
        }

        Ok(Self { rows })
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quantum-circuit(")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "lstick({})", row.label)?;
            if row.classical {
                write!(f, ",setwire(2)")?;
            }
            for cell in &row.cells {
                match cell {
                    Some(cell) => write!(f, ",{cell}")?,
                    None => write!(f, ",{}", Cell::Wire)?,
                }
            }
            write!(f, ",{}", Cell::Wire)?;
            if i + 1 != self.rows.len() {
                write!(f, r",[\ ]")?;
            }
        }
        write!(f, ")")
    }
}
