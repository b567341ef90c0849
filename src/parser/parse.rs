//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, bracket-matching helpers, and loading of the
//! top-level program into a function table.
//!
//! # Parser Architecture
//!
//! Parsing works on token slices rather than a cursor:
//! - This module: Parser struct, helpers, top-level functions and globals
//! - `statements`: partitions a slice into statements by bracket counting
//! - `expressions`: two-stack operator precedence parsing of one expression
//!
//! Parser methods are split across these files using `impl Parser` blocks.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use log::debug;
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        ParseError {
            message: message.into(),
            location,
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.to_string(),
            location: err.location(),
        }
    }
}

/// Parser for the restricted C++ subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
}

impl Parser {
    /// Lex `source` (prologue included) and prepare to parse it.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        debug!("lexed {} tokens", tokens.len());
        Ok(Self::from_tokens(tokens))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Parse the entire program into a function table.
    ///
    /// Every top-level item starts with `int`: either a function definition
    /// `int name(int a, ...) { ... }` or a global declaration `int a, b[10];`.
    pub fn parse_program(&self) -> Result<Program, ParseError> {
        let tokens = self.tokens.as_slice();
        let mut program = Program::new();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            if !token.is("int") {
                return Err(ParseError::new(
                    format!("Expected 'int' at top level, found {}", token),
                    token.location,
                ));
            }

            if tokens.get(i + 2).is_some_and(|t| t.is("(")) {
                let (function, next) = self.parse_function(tokens, i)?;
                debug!(
                    "loaded function '{}' with {} parameter(s)",
                    function.name,
                    function.params.len()
                );
                if program.functions.contains_key(&function.name) {
                    return Err(ParseError::new(
                        format!("Function '{}' is defined more than once", function.name),
                        function.location,
                    ));
                }
                program.functions.insert(function.name.clone(), function);
                i = next;
            } else {
                let (declarations, next) = self.parse_declaration(tokens, i)?;
                program.globals.extend(declarations);
                i = next;
            }
        }

        Ok(program)
    }

    /// Parse `int name(int a, int b) { body }` starting at `start`.
    /// Returns the function and the index just past its closing brace.
    fn parse_function(
        &self,
        tokens: &[Token],
        start: usize,
    ) -> Result<(FunctionDef, usize), ParseError> {
        let name_token = &tokens[start + 1];
        let name = self.expect_identifier(name_token)?;

        let params_close = self.matching_close(tokens, start + 2, "(", ")")?;
        let mut params = Vec::new();
        let param_tokens = &tokens[start + 3..params_close];
        if !param_tokens.is_empty() {
            for param in param_tokens.split(|t| t.is(",")) {
                match param {
                    [ty, param_name] if ty.is("int") => {
                        params.push(self.expect_identifier(param_name)?);
                    }
                    _ => {
                        let location = param
                            .first()
                            .map(|t| t.location)
                            .unwrap_or(tokens[params_close].location);
                        return Err(ParseError::new(
                            format!("Expected 'int <name>' in parameters of '{}'", name),
                            location,
                        ));
                    }
                }
            }
        }

        let body_open = params_close + 1;
        match tokens.get(body_open) {
            Some(t) if t.is("{") => {}
            other => {
                return Err(ParseError::new(
                    format!("Expected '{{' before body of '{}'", name),
                    other.map_or(self.end_location(), |t| t.location),
                ));
            }
        }
        let body_close = self.matching_close(tokens, body_open, "{", "}")?;
        let body = self.parse_statements(&tokens[body_open + 1..body_close])?;

        Ok((
            FunctionDef {
                name,
                params,
                body,
                location: name_token.location,
            },
            body_close + 1,
        ))
    }

    /// Accept a plain identifier (a word token that is not a numeral).
    pub(crate) fn expect_identifier(&self, token: &Token) -> Result<String, ParseError> {
        if token.is_word() && !token.is_numeral() {
            Ok(token.text.clone())
        } else {
            Err(ParseError::new(
                format!("Expected identifier, found {}", token),
                token.location,
            ))
        }
    }

    /// Find the closer matching the opener at `open_index`, counting nesting of
    /// the same bracket kind.
    pub(crate) fn matching_close(
        &self,
        tokens: &[Token],
        open_index: usize,
        open: &str,
        close: &str,
    ) -> Result<usize, ParseError> {
        match tokens.get(open_index) {
            Some(t) if t.is(open) => {}
            other => {
                return Err(ParseError::new(
                    format!("Expected '{}'", open),
                    other.map_or(self.end_location(), |t| t.location),
                ));
            }
        }

        let mut depth = 0usize;
        for (i, token) in tokens.iter().enumerate().skip(open_index) {
            if token.is(open) {
                depth += 1;
            } else if token.is(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
        }

        Err(ParseError::new(
            format!("Unclosed '{}'", open),
            tokens[open_index].location,
        ))
    }

    /// Location reported for errors at the end of input
    pub(crate) fn end_location(&self) -> SourceLocation {
        self.tokens
            .last()
            .map(|t| t.location)
            .unwrap_or_else(|| SourceLocation::new(1, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn parser(body: &str) -> Parser {
        Parser::from_tokens(Lexer::new(body).tokenize_body())
    }

    #[test]
    fn test_function_table() {
        let program = parser("int f(int x, int y){return x+y;} int main(){cout<<f(1,2);}")
            .parse_program()
            .unwrap();

        assert_eq!(program.functions.len(), 2);
        assert_eq!(program.functions["f"].params, vec!["x", "y"]);
        assert!(program.functions["main"].params.is_empty());
    }

    #[test]
    fn test_globals_are_collected() {
        let program = parser("int n, a[100]; int main(){}").parse_program().unwrap();
        assert_eq!(
            program.globals,
            vec![
                AstNode::Declaration {
                    name: "n".to_string(),
                    location: SourceLocation::new(1, 5),
                },
                AstNode::Declaration {
                    name: "a".to_string(),
                    location: SourceLocation::new(1, 8),
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let err = parser("int f(){} int f(){}").parse_program().unwrap_err();
        assert!(err.message.contains("more than once"));
    }

    #[test]
    fn test_bad_top_level() {
        let err = parser("void main(){}").parse_program().unwrap_err();
        assert!(err.message.contains("Expected 'int'"));

        let err = parser("int f(x){}").parse_program().unwrap_err();
        assert!(err.message.contains("parameters"));

        let err = parser("int main(){").parse_program().unwrap_err();
        assert!(err.message.contains("Unclosed"));
    }

    #[test]
    fn test_matching_close_counts_nesting() {
        let p = parser("( ( a ) ( b ) ) c )");
        assert_eq!(p.matching_close(p.tokens(), 0, "(", ")").unwrap(), 7);
        assert!(p.matching_close(p.tokens(), 9, "(", ")").is_err());
    }
}
