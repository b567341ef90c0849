//! Statement parsing implementation
//!
//! A token slice is partitioned into statements by dispatching on the first
//! token of each one:
//!
//! ```text
//! statement ::= "return" expr ";"
//!             | "for" "(" stmt expr ";" expr ")" statement
//!             | "while" "(" expr ")" statement
//!             | "if" "(" expr ")" statement [ "else" statement ]
//!             | "{" statement* "}"
//!             | "int" declarator { "," declarator } ";"
//!             | expr ";"
//! declarator ::= name { "[" ... "]" } [ "=" expr ]
//! ```
//!
//! Statement ends and matching closers are found by bracket depth counting,
//! so nested bodies never need a cursor.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a slice holding zero or more complete statements into a
    /// [`AstNode::Sequence`].
    pub fn parse_statements(&self, tokens: &[Token]) -> Result<AstNode, ParseError> {
        let mut statements = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            let location = token.location;

            match token.text.as_str() {
                "return" => {
                    let end = self.expect_semicolon_end(tokens, i + 1, location)?;
                    let expr = self.parse_expression(&tokens[i + 1..end])?;
                    statements.push(AstNode::Return {
                        expr: Box::new(expr),
                        location,
                    });
                    i = end + 1;
                }
                "for" => {
                    let (node, next) = self.parse_for(tokens, i)?;
                    statements.push(node);
                    i = next;
                }
                "while" => {
                    let close = self.matching_close(tokens, i + 1, "(", ")")?;
                    let condition = self.parse_expression(&tokens[i + 2..close])?;
                    let (body, next) = self.parse_body(tokens, close + 1)?;
                    statements.push(AstNode::While {
                        condition: Box::new(condition),
                        body: Box::new(body),
                        location,
                    });
                    i = next;
                }
                "if" => {
                    let close = self.matching_close(tokens, i + 1, "(", ")")?;
                    let condition = self.parse_expression(&tokens[i + 2..close])?;
                    let then_end = self.bare_statement_end(tokens, close + 1)?;
                    let then_branch = self.parse_statements(&tokens[close + 1..=then_end])?;
                    let (else_branch, next) = match tokens.get(then_end + 1) {
                        Some(t) if t.is("else") => {
                            let (branch, next) = self.parse_body(tokens, then_end + 2)?;
                            (Some(Box::new(branch)), next)
                        }
                        _ => (None, then_end + 1),
                    };
                    statements.push(AstNode::If {
                        condition: Box::new(condition),
                        then_branch: Box::new(then_branch),
                        else_branch,
                        location,
                    });
                    i = next;
                }
                "{" => {
                    let close = self.matching_close(tokens, i, "{", "}")?;
                    let body = self.parse_statements(&tokens[i + 1..close])?;
                    statements.push(AstNode::Block {
                        body: Box::new(body),
                        location,
                    });
                    i = close + 1;
                }
                "int" => {
                    let (declarations, next) = self.parse_declaration(tokens, i)?;
                    statements.extend(declarations);
                    i = next;
                }
                "else" => {
                    return Err(ParseError::new("'else' without a matching 'if'", location));
                }
                _ => {
                    let end = self.expect_semicolon_end(tokens, i, location)?;
                    statements.push(self.parse_expression(&tokens[i..end])?);
                    i = end + 1;
                }
            }
        }

        Ok(AstNode::Sequence(statements))
    }

    /// `for ( init ; cond ; step ) body`, located by the two top-level `;`
    /// inside the matched parentheses.
    fn parse_for(&self, tokens: &[Token], start: usize) -> Result<(AstNode, usize), ParseError> {
        let location = tokens[start].location;
        let close = self.matching_close(tokens, start + 1, "(", ")")?;

        let mut depth = 0usize;
        let mut separators = Vec::new();
        for (j, token) in tokens.iter().enumerate().take(close).skip(start + 2) {
            match token.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                ";" if depth == 0 => separators.push(j),
                _ => {}
            }
        }
        let &[first, second] = separators.as_slice() else {
            return Err(ParseError::new(
                format!(
                    "Expected two ';' in 'for' header, found {}",
                    separators.len()
                ),
                location,
            ));
        };

        let init = self.parse_statements(&tokens[start + 2..=first])?;
        let condition = self.parse_expression(&tokens[first + 1..second])?;
        let step = self.parse_expression(&tokens[second + 1..close])?;
        let (body, next) = self.parse_body(tokens, close + 1)?;

        Ok((
            AstNode::For {
                init: Box::new(init),
                condition: Box::new(condition),
                step: Box::new(step),
                body: Box::new(body),
                location,
            },
            next,
        ))
    }

    /// Parse the single statement (possibly a block) starting at `start` as
    /// the body of a control structure. Returns the body and the index just
    /// past it.
    fn parse_body(&self, tokens: &[Token], start: usize) -> Result<(AstNode, usize), ParseError> {
        let end = self.statement_end(tokens, start)?;
        let body = self.parse_statements(&tokens[start..=end])?;
        Ok((body, end + 1))
    }

    /// `int a, b[10], c = expr;` becomes one declaration per name, each
    /// followed by an assignment when it has an initializer. Array sizes are
    /// skipped.
    pub(crate) fn parse_declaration(
        &self,
        tokens: &[Token],
        start: usize,
    ) -> Result<(Vec<AstNode>, usize), ParseError> {
        let location = tokens[start].location;
        let end = self.expect_semicolon_end(tokens, start + 1, location)?;

        let mut nodes = Vec::new();
        for declarator in split_top_level(&tokens[start + 1..end], ",") {
            let Some(name_token) = declarator.first() else {
                return Err(ParseError::new("Expected a name in declaration", location));
            };
            let name = self.expect_identifier(name_token)?;

            let mut k = 1;
            while declarator.get(k).is_some_and(|t| t.is("[")) {
                k = self.matching_close(declarator, k, "[", "]")? + 1;
            }

            nodes.push(AstNode::Declaration {
                name: name.clone(),
                location: name_token.location,
            });

            match declarator.get(k) {
                None => {}
                Some(t) if t.is("=") => {
                    let value = self.parse_expression(&declarator[k + 1..])?;
                    if value == AstNode::Empty {
                        return Err(ParseError::new(
                            format!("Missing initializer for '{}'", name),
                            t.location,
                        ));
                    }
                    nodes.push(AstNode::Assignment {
                        target: VarRef::new(name, name_token.location),
                        value: Box::new(value),
                        location: t.location,
                    });
                }
                Some(t) => {
                    return Err(ParseError::new(
                        format!("Unexpected {} in declaration of '{}'", t, name),
                        t.location,
                    ));
                }
            }
        }

        Ok((nodes, end + 1))
    }

    /// Index of the last token of the statement starting at `start`.
    ///
    /// A block ends at its matching `}`; `for`/`while` end where their body
    /// ends; `if` ends where its then-branch ends, or where its `else` branch
    /// ends if the token right after the then-branch is `else`. Anything else
    /// ends at the next top-level `;`.
    pub(crate) fn statement_end(&self, tokens: &[Token], start: usize) -> Result<usize, ParseError> {
        let first = self.statement_start(tokens, start)?;
        match first.text.as_str() {
            "{" => self.matching_close(tokens, start, "{", "}"),
            "for" | "while" => {
                let close = self.matching_close(tokens, start + 1, "(", ")")?;
                self.statement_end(tokens, close + 1)
            }
            "if" => {
                let end = self.bare_statement_end(tokens, start)?;
                match tokens.get(end + 1) {
                    Some(t) if t.is("else") => self.statement_end(tokens, end + 2),
                    _ => Ok(end),
                }
            }
            _ => self.expect_semicolon_end(tokens, start, first.location),
        }
    }

    /// End of a statement without following any `else`, so that a nested
    /// `if` in a then-branch leaves the `else` to the enclosing `if`.
    fn bare_statement_end(&self, tokens: &[Token], start: usize) -> Result<usize, ParseError> {
        let first = self.statement_start(tokens, start)?;
        match first.text.as_str() {
            "{" => self.matching_close(tokens, start, "{", "}"),
            "if" | "for" | "while" => {
                let close = self.matching_close(tokens, start + 1, "(", ")")?;
                self.bare_statement_end(tokens, close + 1)
            }
            _ => self.expect_semicolon_end(tokens, start, first.location),
        }
    }

    fn statement_start<'a>(
        &self,
        tokens: &'a [Token],
        start: usize,
    ) -> Result<&'a Token, ParseError> {
        tokens.get(start).ok_or_else(|| {
            let location = tokens
                .last()
                .map_or_else(|| self.end_location(), |t| t.location);
            ParseError::new("Expected a statement", location)
        })
    }

    /// Like [`Parser::semicolon_end`] but reports a missing `;` at `location`.
    fn expect_semicolon_end(
        &self,
        tokens: &[Token],
        start: usize,
        location: SourceLocation,
    ) -> Result<usize, ParseError> {
        self.semicolon_end(tokens, start)
            .ok_or_else(|| ParseError::new("Expected ';' at end of statement", location))
    }

    /// The next `;` at bracket depth zero relative to `start`
    fn semicolon_end(&self, tokens: &[Token], start: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in tokens.iter().enumerate().skip(start) {
            match token.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" => depth = depth.saturating_sub(1),
                ";" if depth == 0 => return Some(i),
                _ => {}
            }
        }
        None
    }
}

/// Split on `separator` tokens that are not nested inside brackets
fn split_top_level<'a>(tokens: &'a [Token], separator: &str) -> Vec<&'a [Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut part_start = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token.text.as_str() {
            "(" | "[" => depth += 1,
            ")" | "]" => depth = depth.saturating_sub(1),
            text if text == separator && depth == 0 => {
                parts.push(&tokens[part_start..i]);
                part_start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[part_start..]);
    parts
}
