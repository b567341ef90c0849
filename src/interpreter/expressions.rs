//! Expression evaluation implementation
//!
//! This module handles evaluation of all expression node types:
//!
//! - Literals and variable references (plain or indexed)
//! - Assignment, which yields the stored value so `a = b = 5` chains
//! - Unary `!`, plus and negation
//! - Binary arithmetic, comparison and logical operators
//! - Function calls, dispatched to built-ins or the function table
//!
//! # Arithmetic
//!
//! Values are 32-bit and wrap on overflow. Division truncates toward zero and
//! the remainder takes the sign of the dividend. Dividing by zero is fatal.
//! `&&`, `||` and `^` evaluate both operands and act on truthiness.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::scope::compound_key;
use crate::parser::ast::*;

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate(&mut self, expr: &AstNode) -> Result<i32, RuntimeError> {
        match expr {
            AstNode::Empty | AstNode::Endl { .. } => Ok(0),

            AstNode::Literal { value, .. } => Ok(*value),

            AstNode::Variable(var) => {
                let key = self.resolve_key(var)?;
                Ok(self.scopes.get(self.current_scope, &key))
            }

            AstNode::Assignment {
                target, value, ..
            } => {
                let value = self.evaluate(value)?;
                let key = self.resolve_key(target)?;
                self.scopes.set(self.current_scope, &key, value);
                Ok(value)
            }

            AstNode::UnaryOp { op, operand, .. } => {
                let value = self.evaluate(operand)?;
                Ok(apply_unary(*op, value))
            }

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                apply_binary(*op, lhs, rhs, *location)
            }

            AstNode::FunctionCall {
                name,
                args,
                location,
            } => self.call_function(name, args, *location),

            AstNode::Input { targets, location } => self.execute_input(targets, *location),

            AstNode::Output { items, .. } => self.execute_output(items),

            AstNode::Sequence(_)
            | AstNode::Declaration { .. }
            | AstNode::If { .. }
            | AstNode::While { .. }
            | AstNode::For { .. }
            | AstNode::Return { .. }
            | AstNode::Block { .. } => Err(RuntimeError::StatementInExpression {
                statement: expr.label(),
                location: expr.location().unwrap_or(self.current_location),
            }),
        }
    }

    /// Build the storage key of a variable reference by evaluating its
    /// indices in order: `a[i+1][j]` becomes `a[3][0]`.
    pub(crate) fn resolve_key(&mut self, var: &VarRef) -> Result<String, RuntimeError> {
        if var.indices.is_empty() {
            return Ok(var.name.clone());
        }

        let mut indices = Vec::with_capacity(var.indices.len());
        for index in &var.indices {
            indices.push(self.evaluate(index)?);
        }
        Ok(compound_key(&var.name, &indices))
    }
}

fn truth(value: i32) -> i32 {
    i32::from(value != 0)
}

/// Apply a unary operator. `++x` and `--x` are unary plus and negation.
pub(crate) fn apply_unary(op: UnOp, value: i32) -> i32 {
    match op {
        UnOp::Plus => value,
        UnOp::Neg => value.wrapping_neg(),
        UnOp::Not => i32::from(value == 0),
    }
}

/// Apply a binary operator to two evaluated operands
#[inline]
pub(crate) fn apply_binary(
    op: BinOp,
    lhs: i32,
    rhs: i32,
    location: SourceLocation,
) -> Result<i32, RuntimeError> {
    let value = match op {
        BinOp::Add => lhs.wrapping_add(rhs),
        BinOp::Sub => lhs.wrapping_sub(rhs),
        BinOp::Mul => lhs.wrapping_mul(rhs),
        BinOp::Div => {
            if rhs == 0 {
                return Err(RuntimeError::DivisionByZero { location });
            }
            lhs.wrapping_div(rhs)
        }
        BinOp::Mod => {
            if rhs == 0 {
                return Err(RuntimeError::DivisionByZero { location });
            }
            lhs.wrapping_rem(rhs)
        }
        BinOp::Lt => i32::from(lhs < rhs),
        BinOp::Le => i32::from(lhs <= rhs),
        BinOp::Gt => i32::from(lhs > rhs),
        BinOp::Ge => i32::from(lhs >= rhs),
        BinOp::Eq => i32::from(lhs == rhs),
        BinOp::Ne => i32::from(lhs != rhs),
        BinOp::Xor => truth(lhs) ^ truth(rhs),
        BinOp::And => truth(lhs) & truth(rhs),
        BinOp::Or => truth(lhs) | truth(rhs),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(op: BinOp, lhs: i32, rhs: i32) -> Result<i32, RuntimeError> {
        apply_binary(op, lhs, rhs, SourceLocation::new(1, 1))
    }

    #[test]
    fn test_truncating_division() {
        assert_eq!(binary(BinOp::Div, 7, 2), Ok(3));
        assert_eq!(binary(BinOp::Div, -7, 2), Ok(-3));
        assert_eq!(binary(BinOp::Mod, -7, 2), Ok(-1));
        assert_eq!(binary(BinOp::Mod, 7, -2), Ok(1));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            binary(BinOp::Div, 1, 0),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            binary(BinOp::Mod, 1, 0),
            Err(RuntimeError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_overflow_wraps() {
        assert_eq!(binary(BinOp::Add, i32::MAX, 1), Ok(i32::MIN));
        assert_eq!(binary(BinOp::Mul, 65536, 65536), Ok(0));
        assert_eq!(binary(BinOp::Div, i32::MIN, -1), Ok(i32::MIN));
        assert_eq!(apply_unary(UnOp::Neg, i32::MIN), i32::MIN);
    }

    #[test]
    fn test_logical_operators_use_truthiness() {
        assert_eq!(binary(BinOp::And, 5, -3), Ok(1));
        assert_eq!(binary(BinOp::And, 5, 0), Ok(0));
        assert_eq!(binary(BinOp::Or, 0, 0), Ok(0));
        assert_eq!(binary(BinOp::Or, 0, 9), Ok(1));
        assert_eq!(binary(BinOp::Xor, 2, 3), Ok(0));
        assert_eq!(binary(BinOp::Xor, 2, 0), Ok(1));
        assert_eq!(apply_unary(UnOp::Not, 4), 0);
        assert_eq!(apply_unary(UnOp::Not, 0), 1);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(BinOp::Lt, 1, 2), Ok(1));
        assert_eq!(binary(BinOp::Ge, 1, 2), Ok(0));
        assert_eq!(binary(BinOp::Eq, 3, 3), Ok(1));
        assert_eq!(binary(BinOp::Ne, 3, 3), Ok(0));
    }
}
