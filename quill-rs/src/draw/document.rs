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

//! Standalone typst documents gathering several circuits.

use std::fmt::Write;

use crate::circuit::Circuit;

use super::{DrawError, RenderSettings, ToTypst, IMPORTS};

/// Page and heading setup of a document, after the imports.
const PAGE_SETUP: [&str; 2] = [
    r#"#set page("a4", flipped: true, numbering: "1 / 1")"#,
    r#"#set heading(numbering: "1.")"#,
];

/// A drawn circuit along with its title and source.
#[derive(Clone, Debug)]
struct Section {
    title: String,
    source: String,
    circuit: Circuit,
}

/// A typst document with one section per circuit, each on its own landscape page.
///
/// ```
/// use quill_rs::{draw::Document, Circuit};
///
/// let source = "qreg q[1]; h q[0];";
/// let mut document = Document::new();
/// document.add_section("hadamard", source, source.parse::<Circuit>().expect(""));
/// let typst = document.to_typst().expect("");
/// assert!(typst.contains("= `hadamard`"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section titled `title`, showing `source` verbatim followed by the drawing of
    /// `circuit`.
    pub fn add_section(
        &mut self,
        title: impl Into<String>,
        source: impl Into<String>,
        circuit: Circuit,
    ) {
        self.sections.push(Section {
            title: title.into(),
            source: source.into(),
            circuit,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn to_typst(&self) -> Result<String, DrawError> {
        let mut typst = String::new();
        for line in IMPORTS.iter().chain(&PAGE_SETUP) {
            typst.push_str(line);
            typst.push('\n');
        }
        for section in &self.sections {
            let diagram = section.circuit.to_typst(RenderSettings::default())?;
            tracing::debug!(title = %section.title, "drew document section");
            // Writing to a `String` cannot fail.
            let _ = write!(
                typst,
                "= `{}`\n```\n{}\n```\n{diagram}\n#pagebreak()\n",
                section.title,
                section.source.trim_end()
            );
        }
        Ok(typst)
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::circuit::Circuit;

    #[test]
    fn empty_document() {
        insta::assert_snapshot!(Document::new().to_typst().unwrap(), @r###"
        #import "@preview/physica:0.9.3": *
        #import "@preview/quill:0.3.0": *
        #set page("a4", flipped: true, numbering: "1 / 1")
        #set heading(numbering: "1.")
        "###);
    }

    #[test]
    fn sections() {
        let mut document = Document::new();
        for (title, source) in [("x", "qreg q[1];\nx q[0];\n"), ("y", "qreg q[1];\ny q[0];")] {
            document.add_section(title, source, source.parse::<Circuit>().unwrap());
        }
        insta::assert_snapshot!(document.to_typst().unwrap(), @r###"
        #import "@preview/physica:0.9.3": *
        #import "@preview/quill:0.3.0": *
        #set page("a4", flipped: true, numbering: "1 / 1")
        #set heading(numbering: "1.")
        = `x`
        ```
        qreg q[1];
        x q[0];
        ```
        #quantum-circuit(lstick($ket(q)$),$X$,1)
        #pagebreak()
        = `y`
        ```
        qreg q[1];
        y q[0];
        ```
        #quantum-circuit(lstick($ket(q)$),$Y$,1)
        #pagebreak()
        "###);
    }
}
