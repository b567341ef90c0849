//! # Introduction
//!
//! minicpp interprets a tiny fixed-prologue subset of C++: integer variables,
//! sparse arrays, functions, `if`/`while`/`for`, `cin`, `cout` and `putchar`.
//! Optionally it records a snapshot of the interpreter state before each
//! statement, which a terminal UI built with [ratatui](https://docs.rs/ratatui)
//! replays step by step.
//!
//! ## Execution pipeline
//!
//! ```text
//! stdin → source → Lexer → Parser → AST → Interpreter → output (+ Snapshots → TUI)
//! ```
//!
//! 1. [`source`]: splits raw input into the integer pool and the program text.
//! 2. [`parser`]: checks the prologue, tokenises, and builds the function
//!    table with an operator-precedence expression parser.
//! 3. [`interpreter`]: walks the AST against a scope chain and input pool.
//! 4. [`memory`]: scopes keyed by compound names, and the input pool.
//! 5. [`snapshot`]: captured output and the optional execution trace.
//! 6. [`ui`]: ratatui-based trace viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use minicpp::interpreter::engine::InterpreterConfig;
//!
//! let program = "#include<iostream>\n#include<cstdio>\nusing namespace std;\n\
//!                int main(){int a;cin>>a;cout<<a*2<<endl;}";
//! let output = minicpp::run_program(program, vec![5], InterpreterConfig::default()).unwrap();
//! assert_eq!(output, "10\n");
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod source;
pub mod ui;

use interpreter::engine::{Interpreter, InterpreterConfig};
use interpreter::errors::RuntimeError;
use parser::parse::{ParseError, Parser};
use snapshot::{SnapshotManager, Terminal};
use source::SourceError;
use thiserror::Error;

/// Any failure of a run, from reading its input to executing it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Everything a run produced. Output written before a runtime error is kept.
#[derive(Debug)]
pub struct Execution {
    pub output: Terminal,
    pub trace: Option<SnapshotManager>,
    pub error: Option<Error>,
}

impl Execution {
    fn failed(error: Error) -> Self {
        Execution {
            output: Terminal::new(),
            trace: None,
            error: Some(error),
        }
    }
}

/// Parse and run `program` (prologue included) with `inputs` as the `cin` pool
pub fn execute(program: &str, inputs: Vec<i32>, config: InterpreterConfig) -> Execution {
    let loaded = Parser::new(program).and_then(|parser| parser.parse_program());
    let program = match loaded {
        Ok(program) => program,
        Err(e) => return Execution::failed(e.into()),
    };

    let mut interpreter = Interpreter::new(program, inputs, config);
    let error = interpreter.run().err().map(Error::from);

    Execution {
        output: interpreter.take_terminal(),
        trace: interpreter.take_snapshots(),
        error,
    }
}

/// Split raw standard input into pool and program, then run it
pub fn execute_input(text: &str, config: InterpreterConfig) -> Execution {
    match source::split_input(text) {
        Ok(input) => execute(&input.program, input.inputs, config),
        Err(e) => Execution::failed(e.into()),
    }
}

/// Run `program` and return its output as text
pub fn run_program(
    program: &str,
    inputs: Vec<i32>,
    config: InterpreterConfig,
) -> Result<String, Error> {
    let execution = execute(program, inputs, config);
    match execution.error {
        Some(e) => Err(e),
        None => Ok(execution.output.text()),
    }
}
