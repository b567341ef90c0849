//! Stream operations, `putchar`, and calls into the function table
//!
//! `cin >> a >> b[i]` pops one integer per destination from the input pool.
//! `cout << x << endl` prints each item in decimal, with `endl` as a line
//! break. `putchar(x)` is resolved before the function table is consulted.

use crate::interpreter::constants::PUTCHAR;
use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{AstNode, SourceLocation, VarRef};
use log::trace;

impl Interpreter {
    /// Read one value from the input pool into each target, left to right
    pub(crate) fn execute_input(
        &mut self,
        targets: &[VarRef],
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        for target in targets {
            let key = self.resolve_key(target)?;
            let value = self
                .input
                .next_value()
                .ok_or(RuntimeError::InputExhausted {
                    consumed: self.input.consumed(),
                    location,
                })?;
            self.scopes.set(self.current_scope, &key, value);
        }
        Ok(0)
    }

    /// Print each item in order; `endl` prints a line break
    pub(crate) fn execute_output(&mut self, items: &[AstNode]) -> Result<i32, RuntimeError> {
        for item in items {
            match item {
                AstNode::Endl { .. } => self.terminal.newline(),
                _ => {
                    let value = self.evaluate(item)?;
                    self.terminal.print_int(value);
                }
            }
        }
        Ok(0)
    }

    /// Call `name` with `args` evaluated in the caller's scope
    pub(crate) fn call_function(
        &mut self,
        name: &str,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        if name == PUTCHAR {
            return self.call_putchar(args, location);
        }

        let function = self
            .function(name)
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            })?;
        if function.params.len() != args.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                name: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
                location,
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        // `main` sits at depth 1, so `limit` counts nested user calls
        let limit = self.config().max_call_depth;
        if self.call_depth > limit {
            return Err(RuntimeError::CallDepthExceeded { limit, location });
        }
        self.tick()?;

        trace!("call {}({:?}) at depth {}", name, values, self.call_depth + 1);
        let caller = std::mem::replace(&mut self.current_function, function.name.clone());
        self.call_depth += 1;

        // The callee's scope hangs off the caller's current scope
        let result = self.with_child_scope(|interp| {
            for (param, value) in function.params.iter().zip(values) {
                interp.scopes.declare(interp.current_scope, param);
                interp.scopes.set(interp.current_scope, param, value);
            }
            interp.execute(&function.body)
        });

        self.call_depth -= 1;
        self.current_function = caller;

        match result? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Normal => Ok(0),
        }
    }

    /// `putchar(x)` prints the low byte of `x` and yields `x`
    fn call_putchar(
        &mut self,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        let [arg] = args else {
            return Err(RuntimeError::ArgumentCountMismatch {
                name: PUTCHAR.to_string(),
                expected: 1,
                found: args.len(),
                location,
            });
        };
        let value = self.evaluate(arg)?;
        self.terminal.put_byte(value as u8);
        Ok(value)
    }
}
