//! Memory model for the interpreter
//!
//! This module provides the runtime state that evaluation reads and writes:
//! - [`scope`]: the scope chain, stored as an arena of scopes in stack order
//! - [`input`]: the integer pool consumed by `cin`
//!
//! # Arrays
//!
//! There is no array allocation. `a[i][j]` is stored under the compound key
//! `a[<i>][<j>]` built from the evaluated indices, so arrays are unbounded
//! sparse maps and equal indices always alias the same slot. Declared sizes
//! are never checked.

pub mod input;
pub mod scope;

pub use input::InputPool;
pub use scope::{ScopeId, ScopeStack};
