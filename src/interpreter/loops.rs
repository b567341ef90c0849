//! Loop statement execution (`while`, `for`).
//!
//! Adds `impl Interpreter` methods for the two loop forms. The loop header
//! (init, condition, step) lives in the scope that contains the loop; only a
//! `{}` body opens a scope of its own. A `return` inside the body is
//! reported as [`LoopBodyResult::Exit`] so the loop unwinds immediately.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::AstNode;

/// Result returned by [`Interpreter::execute_loop_body`] to signal how the body ended.
pub(crate) enum LoopBodyResult {
    /// Body completed normally; the loop should iterate again.
    Continue,
    /// `return` was executed; the loop should stop and pass the value up.
    Exit(i32),
}

impl Interpreter {
    /// Runs one iteration of a loop body, counting it against the step limit.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &AstNode,
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.tick()?;
        match self.execute(body)? {
            ControlFlow::Normal => Ok(LoopBodyResult::Continue),
            ControlFlow::Return(value) => Ok(LoopBodyResult::Exit(value)),
        }
    }

    /// Executes a `while (condition) body` loop.
    pub(crate) fn execute_while(
        &mut self,
        condition: &AstNode,
        body: &AstNode,
    ) -> Result<ControlFlow, RuntimeError> {
        while self.evaluate(condition)? != 0 {
            if let LoopBodyResult::Exit(value) = self.execute_loop_body(body)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }

    /// Executes a `for (init; condition; step) body` loop.
    ///
    /// An empty condition is always true.
    pub(crate) fn execute_for(
        &mut self,
        init: &AstNode,
        condition: &AstNode,
        step: &AstNode,
        body: &AstNode,
    ) -> Result<ControlFlow, RuntimeError> {
        if let ControlFlow::Return(value) = self.execute(init)? {
            return Ok(ControlFlow::Return(value));
        }

        loop {
            let keep_going = match condition {
                AstNode::Empty => true,
                _ => self.evaluate(condition)? != 0,
            };
            if !keep_going {
                break;
            }

            if let LoopBodyResult::Exit(value) = self.execute_loop_body(body)? {
                return Ok(ControlFlow::Return(value));
            }
            self.evaluate(step)?;
        }

        Ok(ControlFlow::Normal)
    }
}
