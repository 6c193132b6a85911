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

//! Drawing circuits as typst markup.
//!
//! A [`Circuit`] is drawn as a call to `quantum-circuit` from the typst package
//! [`quill`], with one row per qubit and one double wire per classical register. Operations are
//! laid out in columns the way the qiskit text drawer does it, sliding each operation as far left
//! as the operations before it allow.
//!
//! # Supported Operations
//!
//!   - Standard gates, drawn as boxes labelled with their usual symbol and their parameters as
//!     fractions of pi
//!   - Controlled gates (`c<gate>`, `cc<gate>`, `c<n><gate>`), including `cx` and `ccx`
//!     targets, `cz`, `cp`, `rzz`, `swap` and `cswap`
//!   - Phase gates `p`, measurements, barriers, and classically conditioned operations
//!   - Any other gate, drawn as a box labelled with its upper case name
//!
//! [`quill`]: https://typst.app/universe/package/quill

mod cell;
mod diagram;
mod document;
mod layers;
mod render;
mod typst;

use crate::circuit::Circuit;

use self::diagram::Diagram;

pub use document::Document;
pub use layers::{layers, Layer};
pub use typst::{as_fraction_of_pi, op_to_typst, wire_name, SUPPORTED_TYPST_SYMBOLS};

/// The typst import statements for the packages used by drawn circuits.
pub const IMPORTS: [&str; 2] = [
    r#"#import "@preview/physica:0.9.3": *"#,
    r#"#import "@preview/quill:0.3.0": *"#,
];

/// RenderSettings contains the options of the generated typst code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Write `#quantum-circuit(...)` rather than `quantum-circuit(...)`, for use in markup mode.
    pub leading_hash: bool,
    /// Prepend the imports of the `physica` and `quill` packages.
    pub imports: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            leading_hash: true,
            imports: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DrawError {
    #[error("gate {gate} is missing parameter {position}")]
    MissingParameter { gate: String, position: usize },
    #[error("operation `{operation}` has no qubit at position {position}")]
    MissingQubit { operation: String, position: usize },
    #[error("measurement `{operation}` has no classical bit")]
    MissingClbit { operation: String },
    #[error("classical bit {clbit} does not belong to any register")]
    UnknownClbit { clbit: usize },
    #[error("gate {gate} has {controls} controls but acts on {qubits} qubits")]
    ControlCount {
        gate: String,
        controls: usize,
        qubits: usize,
    },
}

pub trait ToTypst {
    fn to_typst(&self, settings: RenderSettings) -> Result<String, DrawError>;
}

impl ToTypst for Circuit {
    /// Returns the circuit as a typst `quantum-circuit`.
    ///
    /// # Examples
    /// ```
    /// use quill_rs::{draw::{RenderSettings, ToTypst}, Circuit};
    ///
    /// let circuit: Circuit = "qreg q[2]; h q[0]; cx q[0], q[1];".parse().expect("");
    /// let typst = circuit
    ///     .to_typst(RenderSettings { leading_hash: false, ..Default::default() })
    ///     .expect("");
    /// assert!(typst.starts_with("quantum-circuit(lstick($ket(q_(0))$),$H$,ctrl(1),1"));
    /// ```
    fn to_typst(&self, settings: RenderSettings) -> Result<String, DrawError> {
        let diagram = Diagram::new(self)?;
        let mut typst = String::new();
        if settings.imports {
            for import in IMPORTS {
                typst.push_str(import);
                typst.push('\n');
            }
        }
        if settings.leading_hash {
            typst.push('#');
        }
        typst.push_str(&diagram.to_string());
        Ok(typst)
    }
}

/// Draw a circuit with the default [`RenderSettings`].
pub fn draw(circuit: &Circuit) -> Result<String, DrawError> {
    circuit.to_typst(RenderSettings::default())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{draw, RenderSettings, ToTypst};
    use crate::circuit::Circuit;

    fn bell() -> Circuit {
        "OPENQASM 2.0;
include \"qelib1.inc\";
qreg q[2];
creg c[2];
h q[0];
cx q[0], q[1];
measure q -> c;"
            .parse()
            .unwrap()
    }

    #[test]
    fn draw_bell() {
        insta::assert_snapshot!(draw(&bell()).unwrap(), @r###"#quantum-circuit(lstick($ket(q_(0))$),$H$,ctrl(1),meter(target: 2),1,1,[\ ],lstick($ket(q_(1))$),1,targ(),1,meter(target: 1),1,[\ ],lstick($c$),setwire(2),1,1,ctrl(0, label: ((content: $0$, pos: bottom))),ctrl(0, label: ((content: $1$, pos: bottom))),1)"###);
    }

    #[test]
    fn settings() {
        let circuit: Circuit = "qreg q[1]; x q[0];".parse().unwrap();
        let plain = circuit
            .to_typst(RenderSettings {
                leading_hash: false,
                imports: false,
            })
            .unwrap();
        assert_eq!(plain, "quantum-circuit(lstick($ket(q)$),$X$,1)");

        let standalone = circuit
            .to_typst(RenderSettings {
                leading_hash: true,
                imports: true,
            })
            .unwrap();
        assert_eq!(
            standalone,
            "#import \"@preview/physica:0.9.3\": *\n#import \"@preview/quill:0.3.0\": *\n#quantum-circuit(lstick($ket(q)$),$X$,1)"
        );
    }
}
