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

//! Left-justified layering of a circuit: which operations are drawn in which column.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::circuit::{Circuit, Clbit, Operation};

/// A wire of the dependency graph between operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Wire {
    Quantum(usize),
    Classical(usize),
}

/// The operations drawn in one column of a diagram, by their index in the circuit.
pub type Layer = Vec<usize>;

/// Split the operations of a circuit into layers.
///
/// Operations are first grouped into generations of the dependency graph, where an operation
/// depends on the previous operation on each of its qubits, on each classical bit it writes, and
/// on each bit of the register its condition reads. Each operation of a generation, in program
/// order, is then slid as far left as possible into an existing layer, without jumping past an
/// operation on one of its qubits and without overlapping the vertical extent of another
/// operation of that layer.
pub fn layers(circuit: &Circuit) -> Vec<Layer> {
    let mut spooler = LayerSpooler::new(circuit);
    for generation in generations(circuit) {
        let index = spooler.layers.len().checked_sub(1);
        for operation in generation {
            spooler.slide_from_left(operation, index);
        }
    }
    tracing::debug!(depth = spooler.layers.len(), "laid out circuit");
    spooler.layers
}

/// The wires an operation depends on.
fn wires(circuit: &Circuit, operation: &Operation) -> Vec<Wire> {
    let mut wires: Vec<Wire> = operation
        .qubits
        .iter()
        .map(|qubit| Wire::Quantum(qubit.0))
        .chain(operation.clbits.iter().map(|clbit| Wire::Classical(clbit.0)))
        .collect();
    if let Some(condition) = &operation.condition {
        for clbit in circuit.creg_clbits(condition.register) {
            let wire = Wire::Classical(clbit.0);
            if !wires.contains(&wire) {
                wires.push(wire);
            }
        }
    }
    wires
}

/// Group the operations of a circuit by their depth in the dependency graph, each group in
/// program order.
fn generations(circuit: &Circuit) -> Vec<Vec<usize>> {
    let mut graph = DiGraph::<usize, Wire>::new();
    let mut last_on_wire: HashMap<Wire, NodeIndex> = HashMap::new();
    for (index, operation) in circuit.operations().iter().enumerate() {
        let node = graph.add_node(index);
        for wire in wires(circuit, operation) {
            if let Some(previous) = last_on_wire.insert(wire, node) {
                graph.update_edge(previous, node, wire);
            }
        }
    }

    // Nodes are added in program order and edges always point forward, so the graph is acyclic.
    let order = toposort(&graph, None).unwrap_or_else(|_| graph.node_indices().collect());
    let mut depths = vec![0; graph.node_count()];
    for node in order {
        depths[node.index()] = graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|predecessor| depths[predecessor.index()] + 1)
            .max()
            .unwrap_or(0);
    }

    let mut generations: Vec<Vec<usize>> = Vec::new();
    for node in graph.node_indices() {
        let depth = depths[node.index()];
        if generations.len() <= depth {
            generations.resize_with(depth + 1, Vec::new);
        }
        generations[depth].push(graph[node]);
    }
    generations
}

struct LayerSpooler<'c> {
    circuit: &'c Circuit,
    layers: Vec<Layer>,
    /// The last layer holding a measurement into each classical bit.
    measure_map: Vec<Option<usize>>,
}

impl<'c> LayerSpooler<'c> {
    fn new(circuit: &'c Circuit) -> Self {
        Self {
            circuit,
            layers: Vec::new(),
            measure_map: vec![None; circuit.num_clbits()],
        }
    }

    fn operation(&self, index: usize) -> &'c Operation {
        &self.circuit.operations()[index]
    }

    /// The qubit wires covered when drawing an operation. Operations touching the classical
    /// wires extend to the last qubit, since they are connected to a wire below all qubits.
    fn span(&self, index: usize) -> RangeInclusive<usize> {
        let operation = self.operation(index);
        let min = operation.qubits.iter().map(|qubit| qubit.0).min().unwrap_or(0);
        let max = operation.qubits.iter().map(|qubit| qubit.0).max().unwrap_or(0);
        if !operation.clbits.is_empty() || operation.condition.is_some() {
            min..=self.circuit.num_qubits().saturating_sub(1).max(max)
        } else {
            min..=max
        }
    }

    /// Does any operation of the layer act on one of the qubits of the given operation?
    fn is_found_in(&self, index: usize, layer: &Layer) -> bool {
        let qubits = &self.operation(index).qubits;
        layer
            .iter()
            .flat_map(|other| &self.operation(*other).qubits)
            .any(|qubit| qubits.contains(qubit))
    }

    /// Can the given operation be drawn in the layer without overlapping another one?
    fn insertable(&self, index: usize, layer: &Layer) -> bool {
        let span = self.span(index);
        layer
            .iter()
            .filter(|other| **other != index)
            .all(|other| {
                let other = self.span(*other);
                other.end() < span.start() || span.end() < other.start()
            })
    }

    /// The last layer this operation may not be placed in or before: that of the latest
    /// measurement into a classical bit it reads or writes.
    fn index_stop(&self, operation: &Operation) -> Option<usize> {
        let condition_bits = operation
            .condition
            .iter()
            .flat_map(|condition| self.circuit.creg_clbits(condition.register));
        condition_bits
            .chain(operation.clbits.iter().copied())
            .filter_map(|Clbit(clbit)| self.measure_map.get(clbit).copied().flatten())
            .max()
    }

    fn slide_from_left(&mut self, index: usize, current: Option<usize>) {
        let operation = self.operation(index);
        let mut placed = None;

        if !self.layers.is_empty() {
            let stop = self.index_stop(operation);
            let mut last_insertable = None;
            if let Some(current) = current {
                for candidate in (0..=current).rev() {
                    if stop.is_some_and(|stop| candidate <= stop) {
                        break;
                    }
                    let layer = &self.layers[candidate];
                    if self.is_found_in(index, layer) {
                        break;
                    }
                    if self.insertable(index, layer) {
                        last_insertable = Some(candidate);
                    }
                }
            }

            placed = last_insertable.or_else(|| {
                (current.unwrap_or(0)..self.layers.len())
                    .find(|candidate| self.insertable(index, &self.layers[*candidate]))
            });
        }

        let layer = match placed {
            Some(layer) => {
                self.layers[layer].push(index);
                layer
            }
            None => {
                self.layers.push(vec![index]);
                self.layers.len() - 1
            }
        };

        if operation.is_measure() {
            for Clbit(clbit) in &operation.clbits {
                if let Some(slot) = self.measure_map.get_mut(*clbit) {
                    *slot = Some(slot.map_or(layer, |previous| previous.max(layer)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::layers;
    use crate::circuit::Circuit;

    fn layered(input: &str) -> Vec<Vec<usize>> {
        let circuit: Circuit = input.parse().unwrap();
        layers(&circuit)
    }

    #[test]
    fn empty_circuit() {
        assert!(layered("qreg q[2];").is_empty());
    }

    #[test]
    fn parallel_gates_share_a_layer() {
        assert_eq!(
            layered("qreg q[4]; h q[0]; h q[1]; cx q[2], q[3]; x q[0];"),
            vec![vec![0, 1, 2], vec![3]]
        );
    }

    #[test]
    fn overlapping_gates_are_split() {
        // `cx q[0], q[2]` covers q[1] when drawn.
        assert_eq!(
            layered("qreg q[3]; cx q[0], q[2]; h q[1];"),
            vec![vec![0], vec![1]]
        );
    }

    #[test]
    fn slides_into_earlier_layers() {
        // The second `h q[3]` is in the same generation as `cx q[0], q[1]` and shares its layer.
        assert_eq!(
            layered("qreg q[4]; h q[0]; cx q[0], q[1]; cx q[1], q[2]; h q[3]; h q[3];"),
            vec![vec![0, 3], vec![1, 4], vec![2]]
        );
    }

    #[test]
    fn parallel_cx() {
        assert_eq!(
            layered(
                "qreg q[4];
cx q[0], q[1]; cx q[2], q[3];
cx q[1], q[2];
cx q[0], q[1]; cx q[2], q[3];"
            ),
            vec![vec![0, 1], vec![2], vec![3, 4]]
        );
    }

    #[test]
    fn barrier_splits_layers() {
        assert_eq!(
            layered("qreg q[2]; h q[0]; barrier q; h q[1];"),
            vec![vec![0], vec![1], vec![2]]
        );
    }

    #[test]
    fn measurements_serialize() {
        // Measurements reach down to the classical wire and so overlap each other.
        assert_eq!(
            layered("qreg q[2]; creg c[2]; measure q -> c;"),
            vec![vec![0], vec![1]]
        );
    }

    #[test]
    fn condition_follows_measurement() {
        assert_eq!(
            layered("qreg q[2]; creg c[1]; measure q[0] -> c[0]; h q[1]; if (c == 1) x q[1];"),
            vec![vec![0], vec![1], vec![2]]
        );
    }

    #[test]
    fn condition_waits_for_measurement_of_its_register() {
        // The conditioned gate on q[0] may not slide left of the measurement of q[1].
        assert_eq!(
            layered(
                "qreg q[2]; creg c[1];
h q[0]; h q[1]; h q[1];
measure q[1] -> c[0];
if (c == 1) x q[0];"
            ),
            vec![vec![0, 1], vec![2], vec![3], vec![4]]
        );
    }
}
