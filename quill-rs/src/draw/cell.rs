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

/// The label of an input of a multi-qubit gate box.
#[derive(Clone, Debug, PartialEq)]
pub enum InputLabel {
    /// The position of the qubit among the gate's arguments.
    Index(usize),
    /// A control which sits inside the box.
    Bullet,
}

/// An input of a multi-qubit gate box, on the wire `qubit` rows below the top of the box.
#[derive(Clone, Debug, PartialEq)]
pub struct Input {
    pub qubit: usize,
    pub label: InputLabel,
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            InputLabel::Index(index) => write!(f, "(qubit: {}, label: \"{index}\")", self.qubit),
            InputLabel::Bullet => write!(f, "(qubit: {}, label: $bullet$)", self.qubit),
        }
    }
}

/// One cell of a `quantum-circuit` grid, named after the quill function it calls.
///
/// Distances (`target`) are counted in wires, positive downwards.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// `1`: a plain wire.
    Wire,
    /// `0`: nothing, not even a wire. Fills the columns taken by a barrier.
    Empty,
    /// A single-wire gate, written as its label.
    Gate(String),
    /// `mqgate(...)`: a gate spanning `n` wires, starting on this one.
    MultiGate {
        label: String,
        n: usize,
        inputs: Vec<Input>,
        width: f64,
    },
    /// `ctrl(target)`: a control dot connected to the wire `target` rows away.
    Ctrl { target: isize },
    /// A control dot labelled with the phase of a controlled-phase gate.
    CtrlPhase { target: isize, theta: String },
    /// A control dot labelled with the angle of a ZZ rotation.
    CtrlZz { target: isize, theta: String },
    /// The dot on a classical wire which conditions a gate on the register's value.
    Condition { target: isize, value: u64 },
    /// The dot on a classical wire receiving the result of a measurement into bit `index`.
    MeasureTarget { index: usize },
    /// `meter(target: ...)`: a measurement, connected to the classical wire `target` rows away.
    Meter { target: isize },
    /// `phase(...)`: a phase gate drawn as a labelled dot.
    Phase { theta: String },
    /// `slice(...)`: a dashed barrier across `n` wires.
    Slice { n: usize },
    /// `swap(target)`: one end of a swap.
    Swap { target: isize },
    /// `targX()`: the other end of a swap.
    SwapTarget,
    /// `targ()`: the target of a controlled not.
    Targ,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Wire => write!(f, "1"),
            Cell::Empty => write!(f, "0"),
            Cell::Gate(label) => write!(f, "{label}"),
            Cell::MultiGate {
                label,
                n,
                inputs,
                width,
            } => {
                write!(f, "mqgate({label}, n: {n}, inputs: (")?;
                for (i, input) in inputs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{input}")?;
                }
                write!(f, "), width: {width:?}em)")
            }
            Cell::Ctrl { target } => write!(f, "ctrl({target})"),
            Cell::CtrlPhase { target, theta } => write!(
                f,
                "ctrl({target}, wire-label: (content: ${theta}$, pos: top, dy: -0.75em))"
            ),
            Cell::CtrlZz { target, theta } => {
                write!(f, "ctrl({target}, wire-label: $Z Z ({theta})$)")
            }
            Cell::Condition { target, value } => write!(
                f,
                "ctrl({target}, label: ((content: ${value}$, pos: bottom)), wire-count: 2)"
            ),
            Cell::MeasureTarget { index } => {
                write!(f, "ctrl(0, label: ((content: ${index}$, pos: bottom)))")
            }
            Cell::Meter { target } => write!(f, "meter(target: {target})"),
            Cell::Phase { theta } => {
                write!(f, "phase((content: ${theta}$, pos: top, dy: -0.75em))")
            }
            Cell::Slice { n } => write!(
                f,
                "slice(n: {n}, stroke: (paint: black, dash: \"dashed\"))"
            ),
            Cell::Swap { target } => write!(f, "swap({target})"),
            Cell::SwapTarget => write!(f, "targX()"),
            Cell::Targ => write!(f, "targ()"),
        }
    }
}
