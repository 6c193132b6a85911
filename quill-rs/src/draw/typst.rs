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

//! Conversion of names and numbers to typst math.

use std::collections::HashMap;
use std::f64::consts::PI;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::circuit::Register;

use super::DrawError;

/// Register names that typst renders as a symbol rather than as italic letters.
pub const SUPPORTED_TYPST_SYMBOLS: &[&str] = &[
    "alpha", "Alpha", "beta", "Beta", "chi", "Chi", "delta", "Delta", "epsilon", "Epsilon", "eta",
    "Eta", "gamma", "Gamma", "iota", "Iota", "kai", "Kai", "kappa", "Kappa", "lambda", "Lambda",
    "mu", "Mu", "nu", "Nu", "omega", "Omega", "omicron", "Omicron", "phi", "Phi", "pi", "Pi",
    "psi", "Psi", "rho", "Rho", "sigma", "Sigma", "tau", "Tau", "theta", "Theta", "upsilon",
    "Upsilon", "xi", "Xi", "zeta", "Zeta",
];

/// The largest denominator used when approximating an angle as a fraction of pi.
const MAX_DENOMINATOR: u32 = 1_000_000;

/// Write an angle as a rational multiple of pi, as typst math.
///
/// The ratio `theta / pi` is approximated by the closest fraction whose denominator is at most
/// one million.
///
/// ```
/// use std::f64::consts::PI;
/// use quill_rs::draw::as_fraction_of_pi;
///
/// assert_eq!(as_fraction_of_pi(3.0 * PI / 4.0), "(3 pi) / 4");
/// assert_eq!(as_fraction_of_pi(-PI), "-pi");
/// ```
pub fn as_fraction_of_pi(theta: f64) -> String {
    if theta == 0.0 {
        return "0".to_string();
    }
    let Some(ratio) = BigRational::from_float(theta / PI) else {
        return theta.to_string();
    };
    let ratio = limit_denominator(&ratio, &BigInt::from(MAX_DENOMINATOR));
    let (numerator, denominator) = (ratio.numer(), ratio.denom());

    let minus_one = -BigInt::one();
    match (numerator, denominator.is_one()) {
        (n, true) if n.is_one() => "pi".to_string(),
        (n, false) if n.is_one() => format!("pi / {denominator}"),
        (n, true) if *n == minus_one => "-pi".to_string(),
        (n, false) if *n == minus_one => format!("-pi / {denominator}"),
        (n, true) => format!("{n} pi"),
        (n, false) => format!("({n} pi) / {denominator}"),
    }
}

/// The closest fraction to `value` with a denominator of at most `max_denominator`, found by
/// walking the continued fraction expansion of `value`.
fn limit_denominator(value: &BigRational, max_denominator: &BigInt) -> BigRational {
    if value.denom() <= max_denominator {
        return value.clone();
    }

    let (mut p0, mut q0, mut p1, mut q1) =
        (BigInt::zero(), BigInt::one(), BigInt::one(), BigInt::zero());
    let (mut n, mut d) = (value.numer().clone(), value.denom().clone());
    loop {
        let a = n.div_floor(&d);
        let q2 = &q0 + &a * &q1;
        if &q2 > max_denominator {
            break;
        }
        let p2 = &p0 + &a * &p1;
        (p0, q0, p1, q1) = (p1, q1, p2, q2);
        let remainder = &n - &a * &d;
        (n, d) = (d, remainder);
    }

    let k = (max_denominator - &q0).div_floor(&q1);
    let lower = BigRational::new(&p0 + &k * &p1, &q0 + &k * &q1);
    let upper = BigRational::new(p1, q1);
    if (&upper - value).abs() <= (&lower - value).abs() {
        upper
    } else {
        lower
    }
}

/// The label at the very left of a wire.
///
/// Names are quoted unless they are a single character or a supported symbol, registers with
/// more than one bit get the index as a subscript, and quantum wires are wrapped in a ket.
pub fn wire_name(register: &Register, index: Option<usize>, quantum: bool) -> String {
    let mut name = if register.name.chars().count() == 1
        || SUPPORTED_TYPST_SYMBOLS.contains(&register.name.as_str())
    {
        register.name.clone()
    } else {
        format!("\"{}\"", register.name)
    };
    if let Some(index) = index {
        if register.size > 1 {
            name = format!("{name}_({index})");
        }
    }
    if quantum {
        name = format!("ket({name})");
    }
    format!("${name}$")
}

/// Labels of the gates which are drawn as a plain box. `{i}` stands for the `i`-th parameter.
static GATE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("h", "$H$"),
        ("id", "$I$"),
        ("iswap", "\"iSWAP\""),
        ("p", "$P({0})$"),
        ("r", "$R({0})$"),
        ("rv", "$R_V ({0}, {1}, {2})$"),
        ("rx", "$R_X ({0})$"),
        ("rxx", "$R_(X X) ({0})$"),
        ("ry", "$R_Y ({0})$"),
        ("ryy", "$R_(Y Y) ({0})$"),
        ("rz", "$R_Z ({0})$"),
        ("rzx", "$R_(Z X) ({0})$"),
        ("s", "$S$"),
        ("sdg", "$S^dagger$"),
        ("sx", "$sqrt(X)$"),
        ("sxdg", "$sqrt(X)^dagger$"),
        ("t", "$T$"),
        ("tdg", "$T^dagger$"),
        ("u", "$U({0}, {1}, {2})$"),
        ("u1", "$P({0})$"),
        ("u2", "$U(pi / 2, {0}, {1})$"),
        ("u3", "$U({0}, {1}, {2})$"),
        ("unitary", "\"Unitary\""),
        ("x", "$X$"),
        ("y", "$Y$"),
        ("z", "$Z$"),
        ("inner_product", "\"InnerProd.\""),
        ("xx_minus_yy", "$(X X - Y Y) ({0}, {1})$"),
        ("xx_plus_yy", "$(X X + Y Y) ({0}, {1})$"),
    ])
});

/// The typst label of a gate drawn as a box.
///
/// Known gates get their usual symbol, with parameters written as fractions of pi (except for
/// `rv`, whose parameters are the components of a rotation vector). Other names made of word
/// characters are written upper case in quotes; anything else is kept verbatim.
pub fn op_to_typst(name: &str, params: &[f64]) -> Result<String, DrawError> {
    static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());
    static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").unwrap());

    let Some(template) = GATE_LABELS.get(name) else {
        return Ok(if WORD.is_match(name) {
            format!("\"{}\"", name.to_uppercase())
        } else {
            name.to_string()
        });
    };

    let format_parameter = |theta: f64| {
        if name == "rv" {
            format!("{theta:?}")
        } else {
            as_fraction_of_pi(theta)
        }
    };

    let mut missing = None;
    let label = PLACEHOLDER.replace_all(template, |captures: &regex::Captures| {
        let position = captures[1].parse::<usize>().unwrap_or(usize::MAX);
        match params.get(position) {
            Some(theta) => format_parameter(*theta),
            None => {
                missing = Some(position);
                String::new()
            }
        }
    });
    match missing {
        Some(position) => Err(DrawError::MissingParameter {
            gate: name.to_string(),
            position,
        }),
        None => Ok(label.into_owned()),
    }
}
