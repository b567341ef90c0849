//! Runtime error types for the interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to parse errors or I/O errors).
//!
//! All runtime errors are fatal: they halt execution, and only the output
//! produced before the fault is kept.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `cin` ran past the end of the input pool
    #[error("Input exhausted at {location}: 'cin' needed value #{} but only {consumed} were supplied", .consumed + 1)]
    InputExhausted {
        consumed: usize,
        location: SourceLocation,
    },

    /// Undefined function call
    #[error("Call to undefined function '{name}' at {location}")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// The program has no `main` to run
    #[error("No main() function found")]
    NoMainFunction,

    /// Call with the wrong number of arguments
    #[error("Function '{name}' expects {expected} argument(s) but was given {found} at {location}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
        location: SourceLocation,
    },

    /// Division or remainder by zero
    #[error("Division by zero at {location}")]
    DivisionByZero { location: SourceLocation },

    /// Execution ran longer than the configured step ceiling
    #[error("Step limit of {limit} exceeded at {location}")]
    StepLimitExceeded {
        limit: u64,
        location: SourceLocation,
    },

    /// Nested calls went deeper than the configured ceiling
    #[error("Call depth limit of {limit} exceeded at {location}")]
    CallDepthExceeded {
        limit: usize,
        location: SourceLocation,
    },

    /// Trace history limit exceeded
    #[error("Trace memory limit exceeded: {current} bytes needed, limit is {limit} bytes")]
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// A statement node reached expression evaluation
    #[error("'{statement}' cannot be used as a value at {location}")]
    StatementInExpression {
        statement: &'static str,
        location: SourceLocation,
    },
}

impl RuntimeError {
    /// Get the source location where the error occurred (if available)
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            RuntimeError::InputExhausted { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::DivisionByZero { location }
            | RuntimeError::StepLimitExceeded { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. }
            | RuntimeError::StatementInExpression { location, .. } => Some(*location),
            RuntimeError::NoMainFunction | RuntimeError::SnapshotLimitExceeded { .. } => None,
        }
    }
}
