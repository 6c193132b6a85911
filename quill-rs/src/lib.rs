// Copyright 2021 Rigetti Computing
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

//! Draw quantum circuits as [typst] markup for the [quill] package.
//!
//! Within this crate you'll find:
//!
//! * A [circuit] model, with builder utilities and a serde representation
//! * A [parser] for OpenQASM 2 programs, along with their [expressions]
//! * A [drawer] producing `quantum-circuit` calls, and [documents] gathering several of them
//!
//! This crate is still early in its development and does not claim a stable API. Prior to
//! `v1.0`, minor-version changes are considered breaking changes.
//!
//! ```
//! use quill_rs::{draw, Circuit};
//!
//! let circuit: Circuit = "qreg q[2]; h q[0]; cx q[0], q[1];".parse().expect("");
//! let typst = draw(&circuit).expect("");
//! assert!(typst.starts_with("#quantum-circuit("));
//! ```
//!
//! [circuit]: crate::circuit::Circuit
//! [documents]: crate::draw::Document
//! [drawer]: crate::draw::ToTypst
//! [expressions]: crate::expression::Expression
//! [parser]: crate::program::Program#method.from_str
//! [quill]: https://typst.app/universe/package/quill
//! [typst]: https://typst.app

pub mod circuit;
pub mod draw;
pub mod expression;
pub(crate) mod parser;
pub mod program;

pub use circuit::Circuit;
pub use draw::draw;
pub use program::Program;
