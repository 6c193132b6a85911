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

//! The standard gates of `qelib1.inc` (and a few more), and how modifiers rename them.

use std::f64::consts::PI;

use once_cell::sync::Lazy;
use regex::Regex;

/// The signature of a gate: how many qubits it acts on and how many parameters it takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct GateSignature {
    pub(crate) num_qubits: usize,
    pub(crate) num_params: usize,
}

const fn signature(num_qubits: usize, num_params: usize) -> GateSignature {
    GateSignature {
        num_qubits,
        num_params,
    }
}

/// Returns the signature of a standard gate, or `None` if the gate is not standard.
pub(crate) fn standard_signature(name: &str) -> Option<GateSignature> {
    let signature = match name {
        "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg" => signature(1, 0),
        "p" | "rx" | "ry" | "rz" | "u0" | "u1" => signature(1, 1),
        "r" | "u2" => signature(1, 2),
        "u" | "u3" | "rv" => signature(1, 3),
        "cx" | "cy" | "cz" | "ch" | "csx" | "swap" | "iswap" | "dcx" | "ecr" => signature(2, 0),
        "cp" | "crx" | "cry" | "crz" | "cu1" | "rxx" | "ryy" | "rzz" | "rzx" => signature(2, 1),
        "xx_minus_yy" | "xx_plus_yy" => signature(2, 2),
        "cu3" => signature(2, 3),
        "cu" => signature(2, 4),
        "ccx" | "cswap" | "rccx" | "ccz" => signature(3, 0),
        "c3x" | "c3sqrtx" | "rc3x" => signature(4, 0),
        "c4x" => signature(5, 0),
        _ => return None,
    };
    Some(signature)
}

/// Map the builtin gates of OpenQASM 2 onto their `qelib1.inc` counterparts.
pub(crate) fn canonical_name(name: &str) -> &str {
    match name {
        "U" => "u",
        "CX" => "cx",
        other => other,
    }
}

/// Splits the control prefix off a gate name: `cc` stands for two controls, `c<n>` for `n`, and
/// a single `c` for one. Returns `None` for names that do not start with `c`.
pub(crate) fn split_controls(name: &str) -> Option<(usize, &str)> {
    static CONTROL_COUNT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^c(?P<count>\d+)(?P<base>\w.*)$").unwrap());

    if let Some(base) = name.strip_prefix("cc") {
        return Some((2, base));
    }
    if let Some(captures) = CONTROL_COUNT.captures(name) {
        let count = captures["count"].parse::<usize>().unwrap_or(0);
        let base = captures.name("base").map_or("", |base| base.as_str());
        return Some((count, base));
    }
    name.strip_prefix('c').map(|base| (1, base))
}

/// The name of `base` controlled by `count` extra qubits. Controls already named by `base` are
/// counted in, so that `c3x` with one more control is `c4x`.
pub(crate) fn controlled_name(base: &str, count: usize) -> String {
    let (count, base) = match split_controls(base) {
        Some((existing, inner)) if existing > 0 => (count.saturating_add(existing), inner),
        _ => (count, base),
    };
    match count {
        1 => format!("c{base}"),
        2 => format!("cc{base}"),
        _ => format!("c{count}{base}"),
    }
}

/// The name and parameters of the inverse of the given gate.
pub(crate) fn inverse(name: &str, params: &[f64]) -> (String, Vec<f64>) {
    let negated = || params.iter().map(|param| -param).collect::<Vec<_>>();

    match name {
        "id" | "x" | "y" | "z" | "h" | "cx" | "cy" | "cz" | "ch" | "ccx" | "ccz" | "c3x"
        | "c4x" | "swap" | "cswap" | "ecr" => (name.to_string(), params.to_vec()),
        "s" => ("sdg".to_string(), vec![]),
        "sdg" => ("s".to_string(), vec![]),
        "t" => ("tdg".to_string(), vec![]),
        "tdg" => ("t".to_string(), vec![]),
        "sx" => ("sxdg".to_string(), vec![]),
        "sxdg" => ("sx".to_string(), vec![]),
        "p" | "rx" | "ry" | "rz" | "u1" | "cp" | "crx" | "cry" | "crz" | "cu1" | "rxx"
        | "ryy" | "rzz" | "rzx" | "rv" => (name.to_string(), negated()),
        "u" | "u3" | "cu3" if params.len() == 3 => (
            name.to_string(),
            vec![-params[0], -params[2], -params[1]],
        ),
        "cu" if params.len() == 4 => (
            name.to_string(),
            vec![-params[0], -params[2], -params[1], -params[3]],
        ),
        "u2" if params.len() == 2 => (
            name.to_string(),
            vec![-params[1] - PI, -params[0] + PI],
        ),
        "r" if params.len() == 2 => (name.to_string(), vec![-params[0], params[1]]),
        "xx_minus_yy" | "xx_plus_yy" if params.len() == 2 => {
            (name.to_string(), vec![-params[0], params[1]])
        }
        other => match other.strip_suffix("_dg") {
            Some(original) => (original.to_string(), params.to_vec()),
            None => (format!("{other}_dg"), params.to_vec()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

use once_cell::sync::Lazy;
use regex::Regex;

    use rstest::rstest;

    use super::{controlled_name, inverse, split_controls, standard_signature};

    #[rstest]
    #[case("h", 1, 0)]
    #[case("u3", 1, 3)]
    #[case("cu1", 2, 1)]
    #[case("c4x", 5, 0)]
    fn signatures(#[case] name: &str, #[case] num_qubits: usize, #[case] num_params: usize) {
        let signature = standard_signature(name).unwrap();
        assert_eq!(signature.num_qubits, num_qubits);
        assert_eq!(signature.num_params, num_params);
    }

    #[test]
    fn unknown_signature() {
        assert_eq!(standard_signature("majority"), None);
        assert_eq!(standard_signature("U"), None);
    }

    #[rstest]
    #[case("x", 1, "cx")]
    #[case("x", 2, "ccx")]
    #[case("x", 3, "c3x")]
    #[case("cx", 1, "ccx")]
    #[case("ccx", 1, "c3x")]
    #[case("c3x", 1, "c4x")]
    #[case("ccx", 2, "c4x")]
    #[case("crx", 2, "c3rx")]
    #[case("h", 4, "c4h")]
    fn control_names(#[case] base: &str, #[case] count: usize, #[case] expected: &str) {
        assert_eq!(controlled_name(base, count), expected);
    }

    #[rstest]
    #[case("cx", Some((1, "x")))]
    #[case("ccx", Some((2, "x")))]
    #[case("c3sqrtx", Some((3, "sqrtx")))]
    #[case("cu1", Some((1, "u1")))]
    #[case("h", None)]
    fn control_prefixes(#[case] name: &str, #[case] expected: Option<(usize, &str)>) {
        assert_eq!(split_controls(name), expected);
    }

    #[rstest]
    #[case("h", vec![], "h", vec![])]
    #[case("s", vec![], "sdg", vec![])]
    #[case("tdg", vec![], "t", vec![])]
    #[case("rz", vec![0.5], "rz", vec![-0.5])]
    #[case("u3", vec![1.0, 2.0, 3.0], "u3", vec![-1.0, -3.0, -2.0])]
    #[case("u2", vec![0.0, PI], "u2", vec![-2.0 * PI, PI])]
    #[case("r", vec![1.0, 2.0], "r", vec![-1.0, 2.0])]
    #[case("majority", vec![], "majority_dg", vec![])]
    #[case("majority_dg", vec![], "majority", vec![])]
    fn inverses(
        #[case] name: &str,
        #[case] params: Vec<f64>,
        #[case] expected_name: &str,
        #[case] expected_params: Vec<f64>,
    ) {
        assert_eq!(
            inverse(name, &params),
            (expected_name.to_string(), expected_params)
        );
    }
}
