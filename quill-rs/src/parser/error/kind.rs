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

use crate::parser::error::GenericParseError;

/// The kind of a parsing error: either one raised by `nom` itself, or one specific to the lexer
/// or parser.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ErrorKind<E>
where
    E: std::error::Error + Send,
{
    #[error(transparent)]
    Internal(GenericParseError),
    #[error(transparent)]
    Other(E),
}
