//! Expression parsing implementation
//!
//! Expressions are parsed with a two-stack operator precedence algorithm. The
//! token slice is wrapped in a synthetic `(` ... `)` so the final closer
//! reduces everything left on the stacks.
//!
//! # Precedence (higher binds tighter)
//!
//! ```text
//! 12  ! ++ --        (unary; ++/-- are rewritten prefix +/-)
//! 11  * / %
//! 10  + -
//!  9  < <= > >=
//!  8  == !=
//!  7  ^              (logical xor)
//!  6  &&
//!  5  ||
//!  4  =              (right associative)
//!  3  << >>          (stream insertion / extraction)
//!  2  ,              (argument separator)
//!  1  ) ]
//!  0  ( (( [         (openers; `((` opens a call)
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

/// Operators as they live on the operator stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Unary(UnOp),
    Binary(BinOp),
    Assign,
    Extract,
    Insert,
    Comma,
    CloseParen,
    CloseBracket,
    OpenParen,
    OpenCall,
    OpenIndex,
}

impl Operator {
    fn priority(self) -> u8 {
        match self {
            Operator::Unary(_) => 12,
            Operator::Binary(op) => match op {
                BinOp::Mul | BinOp::Div | BinOp::Mod => 11,
                BinOp::Add | BinOp::Sub => 10,
                BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 9,
                BinOp::Eq | BinOp::Ne => 8,
                BinOp::Xor => 7,
                BinOp::And => 6,
                BinOp::Or => 5,
            },
            Operator::Assign => 4,
            Operator::Extract | Operator::Insert => 3,
            Operator::Comma => 2,
            Operator::CloseParen | Operator::CloseBracket => 1,
            Operator::OpenParen | Operator::OpenCall | Operator::OpenIndex => 0,
        }
    }

    fn is_opener(self) -> bool {
        matches!(
            self,
            Operator::OpenParen | Operator::OpenCall | Operator::OpenIndex
        )
    }

    /// Whether `top` must be reduced before `incoming` is pushed.
    ///
    /// Unary operators never reduce anything, and `=` does not reduce an
    /// equal-priority `=` so that assignment chains right to left.
    fn can_pop(top: Operator, incoming: Operator) -> bool {
        if matches!(incoming, Operator::Unary(_)) {
            return false;
        }
        top.priority() > incoming.priority()
            || (top.priority() == incoming.priority() && incoming != Operator::Assign)
    }
}

/// Entries on the operand stack
#[derive(Debug)]
enum Operand {
    Node(AstNode),
    /// Arguments accumulated by `,` inside a call
    Args(Vec<AstNode>),
    /// Nothing between an opener and its closer
    Empty,
}

/// The operator and operand stacks for one expression
struct ExpressionBuilder {
    operators: Vec<(Operator, SourceLocation)>,
    operands: Vec<Operand>,
    last_is_operand: bool,
}

impl ExpressionBuilder {
    fn new(start: SourceLocation) -> Self {
        ExpressionBuilder {
            operators: vec![(Operator::OpenParen, start)],
            operands: Vec::new(),
            last_is_operand: false,
        }
    }

    fn push_operand(&mut self, node: AstNode) {
        self.operands.push(Operand::Node(node));
        self.last_is_operand = true;
    }

    fn push_token(&mut self, token: &Token) -> Result<(), ParseError> {
        let location = token.location;
        match token.text.as_str() {
            "cin" => self.push_operand(AstNode::Input {
                targets: Vec::new(),
                location,
            }),
            "cout" => self.push_operand(AstNode::Output {
                items: Vec::new(),
                location,
            }),
            "endl" => self.push_operand(AstNode::Endl { location }),
            _ if token.is_numeral() => {
                let value = token.text.parse::<i32>().map_err(|_| {
                    ParseError::new(format!("Invalid integer literal {}", token), location)
                })?;
                self.push_operand(AstNode::Literal { value, location });
            }
            _ if token.is_word() => {
                self.push_operand(AstNode::Variable(VarRef::new(&token.text, location)));
            }
            text => {
                let operator = self.classify(text).ok_or_else(|| {
                    ParseError::new(format!("Unexpected token {} in expression", token), location)
                })?;
                self.push_operator(operator, location)?;
            }
        }
        Ok(())
    }

    /// Map an operator lexeme to its stack form, resolving the unary/binary
    /// and call/grouping ambiguities from the previous token.
    fn classify(&self, text: &str) -> Option<Operator> {
        let operator = match text {
            "(" if self.last_is_operand => Operator::OpenCall,
            "(" => Operator::OpenParen,
            "[" => Operator::OpenIndex,
            ")" => Operator::CloseParen,
            "]" => Operator::CloseBracket,
            "+" if !self.last_is_operand => Operator::Unary(UnOp::Plus),
            "-" if !self.last_is_operand => Operator::Unary(UnOp::Neg),
            "=" => Operator::Assign,
            ">>" => Operator::Extract,
            "<<" => Operator::Insert,
            "," => Operator::Comma,
            _ => match UnOp::from_token(text) {
                Some(op) => Operator::Unary(op),
                None => Operator::Binary(BinOp::from_token(text)?),
            },
        };
        Some(operator)
    }

    fn push_operator(
        &mut self,
        operator: Operator,
        location: SourceLocation,
    ) -> Result<(), ParseError> {
        if !operator.is_opener() {
            while let Some(&(top, top_location)) = self.operators.last() {
                if !Operator::can_pop(top, operator) {
                    break;
                }
                self.operators.pop();
                self.reduce(top, top_location)?;
            }
        }

        match operator {
            Operator::CloseParen => self.close_paren(location),
            Operator::CloseBracket => self.close_bracket(location),
            _ => {
                self.operators.push((operator, location));
                self.last_is_operand = false;
                Ok(())
            }
        }
    }

    /// Apply a popped operator to the operand stack
    fn reduce(&mut self, operator: Operator, location: SourceLocation) -> Result<(), ParseError> {
        match operator {
            Operator::Unary(op) => {
                let operand = self.pop_node(location)?;
                self.operands.push(Operand::Node(AstNode::UnaryOp {
                    op,
                    operand: Box::new(operand),
                    location,
                }));
            }
            Operator::Binary(op) => {
                let right = self.pop_node(location)?;
                let left = self.pop_node(location)?;
                self.operands.push(Operand::Node(AstNode::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                    location,
                }));
            }
            Operator::Assign => {
                let value = self.pop_node(location)?;
                let target = self.pop_variable(location)?;
                self.operands.push(Operand::Node(AstNode::Assignment {
                    target,
                    value: Box::new(value),
                    location,
                }));
            }
            Operator::Extract => {
                let target = self.pop_variable(location)?;
                match self.operands.last_mut() {
                    Some(Operand::Node(AstNode::Input { targets, .. })) => targets.push(target),
                    _ => return Err(ParseError::new("'>>' must follow 'cin'", location)),
                }
            }
            Operator::Insert => {
                let item = self.pop_node(location)?;
                match self.operands.last_mut() {
                    Some(Operand::Node(AstNode::Output { items, .. })) => items.push(item),
                    _ => return Err(ParseError::new("'<<' must follow 'cout'", location)),
                }
            }
            Operator::Comma => {
                let right = self.pop_node(location)?;
                let args = match self.operands.pop() {
                    Some(Operand::Args(mut args)) => {
                        args.push(right);
                        args
                    }
                    Some(Operand::Node(left)) => vec![left, right],
                    _ => return Err(ParseError::new("Expected expression before ','", location)),
                };
                self.operands.push(Operand::Args(args));
            }
            Operator::CloseParen
            | Operator::CloseBracket
            | Operator::OpenParen
            | Operator::OpenCall
            | Operator::OpenIndex => {
                return Err(ParseError::new("Unbalanced brackets in expression", location));
            }
        }
        Ok(())
    }

    fn close_paren(&mut self, location: SourceLocation) -> Result<(), ParseError> {
        if !self.last_is_operand {
            self.operands.push(Operand::Empty);
        }

        match self.operators.pop() {
            Some((Operator::OpenParen, _)) => {}
            Some((Operator::OpenCall, _)) => {
                let args = match self.operands.pop() {
                    Some(Operand::Args(args)) => args,
                    Some(Operand::Node(arg)) => vec![arg],
                    Some(Operand::Empty) | None => Vec::new(),
                };
                let callee = match self.operands.pop() {
                    Some(Operand::Node(AstNode::Variable(var))) if var.indices.is_empty() => var,
                    _ => return Err(ParseError::new("Only named functions can be called", location)),
                };
                self.operands.push(Operand::Node(AstNode::FunctionCall {
                    name: callee.name,
                    args,
                    location: callee.location,
                }));
            }
            _ => return Err(ParseError::new("Unmatched ')'", location)),
        }

        self.last_is_operand = true;
        Ok(())
    }

    fn close_bracket(&mut self, location: SourceLocation) -> Result<(), ParseError> {
        match self.operators.pop() {
            Some((Operator::OpenIndex, _)) => {}
            _ => return Err(ParseError::new("Unmatched ']'", location)),
        }

        let index = self.pop_node(location)?;
        match self.operands.last_mut() {
            Some(Operand::Node(AstNode::Variable(var))) => var.indices.push(index),
            _ => return Err(ParseError::new("Only variables can be indexed", location)),
        }

        self.last_is_operand = true;
        Ok(())
    }

    fn pop_node(&mut self, location: SourceLocation) -> Result<AstNode, ParseError> {
        match self.operands.pop() {
            Some(Operand::Node(node)) => Ok(node),
            _ => Err(ParseError::new("Expected an operand", location)),
        }
    }

    fn pop_variable(&mut self, location: SourceLocation) -> Result<VarRef, ParseError> {
        match self.pop_node(location)? {
            AstNode::Variable(var) => Ok(var),
            _ => Err(ParseError::new("Expected a variable", location)),
        }
    }

    fn finish(mut self, end: SourceLocation) -> Result<AstNode, ParseError> {
        self.push_operator(Operator::CloseParen, end)?;

        if let Some(&(_, location)) = self.operators.last() {
            return Err(ParseError::new("Unclosed bracket in expression", location));
        }

        let result = self.operands.pop();
        if !self.operands.is_empty() {
            return Err(ParseError::new("Missing operator between operands", end));
        }
        match result {
            Some(Operand::Node(node)) => Ok(node),
            Some(Operand::Args(_)) => Err(ParseError::new("Unexpected ',' outside a call", end)),
            Some(Operand::Empty) | None => Err(ParseError::new("Expected expression", end)),
        }
    }
}

impl Parser {
    /// Parse a token slice containing no statement keywords into one
    /// expression node. An empty slice yields [`AstNode::Empty`].
    pub fn parse_expression(&self, tokens: &[Token]) -> Result<AstNode, ParseError> {
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return Ok(AstNode::Empty);
        };

        let mut builder = ExpressionBuilder::new(first.location);
        for token in tokens {
            builder.push_token(token)?;
        }
        builder.finish(last.location)
    }
}
