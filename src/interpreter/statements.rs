//! Non-loop statement execution (declarations, `if`, blocks, `return`).

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::AstNode;
use log::trace;

impl Interpreter {
    /// `int name;` claims `name` for the current scope and zeroes it
    pub(crate) fn execute_declaration(&mut self, name: &str) {
        trace!("declare '{}' in scope {}", name, self.current_scope);
        self.scopes.declare(self.current_scope, name);
    }

    pub(crate) fn execute_if(
        &mut self,
        condition: &AstNode,
        then_branch: &AstNode,
        else_branch: Option<&AstNode>,
    ) -> Result<ControlFlow, RuntimeError> {
        if self.evaluate(condition)? != 0 {
            self.execute(then_branch)
        } else if let Some(else_branch) = else_branch {
            self.execute(else_branch)
        } else {
            Ok(ControlFlow::Normal)
        }
    }

    /// `{ ... }` runs in a fresh child scope so its declarations do not leak
    pub(crate) fn execute_block(&mut self, body: &AstNode) -> Result<ControlFlow, RuntimeError> {
        self.with_child_scope(|interp| interp.execute(body))
    }

    pub(crate) fn execute_return(&mut self, expr: &AstNode) -> Result<ControlFlow, RuntimeError> {
        let value = self.evaluate(expr)?;
        Ok(ControlFlow::Return(value))
    }
}
