//! Source parser
//!
//! This module transforms program text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Prologue check and tokenization (source text → lexemes)
//! - [`statements`]: Statement partitioning by bracket counting
//! - [`expressions`]: Operator precedence parsing of single expressions
//! - [`parse`]: The [`parse::Parser`] coordinator and the function table
//! - [`ast`]: AST node definitions
//!
//! # Supported Subset
//!
//! - Types: `int` only; `int a[n]` declares an unbounded sparse array
//! - Statements: declarations, `if`/`else`, `while`, `for`, blocks, `return`
//! - Expressions: arithmetic, comparison, logical, assignment, calls, indexing
//! - I/O: `cin >> ...`, `cout << ... << endl`, `putchar(c)`
//! - A fixed three-line prologue instead of a preprocessor

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod statements;
