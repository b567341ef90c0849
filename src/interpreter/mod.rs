//! Tree-walking execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`Interpreter`](engine::Interpreter), its configuration
//!   and statement dispatch
//! - [`errors`]: Runtime error types
//! - [`constants`]: default limits and reserved names
//!
//! The remaining files add `impl Interpreter` blocks for expressions,
//! non-loop statements, loops, and built-ins with user function calls.
//!
//! # Execution Model
//!
//! The interpreter walks the AST depth first. Every statement yields a
//! [`ControlFlow`](engine::ControlFlow); a `return` travels up as
//! `ControlFlow::Return` through blocks and loops until the enclosing call
//! turns it into the call's value. Expressions yield plain `i32` values.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod loops;
pub mod statements;
