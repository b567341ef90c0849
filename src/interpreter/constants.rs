// Constants for the interpreter

/// Default ceiling on executed statements and loop iterations
pub const DEFAULT_MAX_STEPS: u64 = 500_000_000;

/// Default ceiling on nested user function calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Default memory budget for the execution trace (256 MB)
pub const DEFAULT_TRACE_MEMORY_LIMIT: usize = 256 * 1024 * 1024;

/// Stack size of the thread that runs the evaluator (512 MB)
/// Evaluation recurses once per nested expression, statement and call
pub const INTERPRETER_STACK_SIZE: usize = 512 * 1024 * 1024;

/// Name of the built-in that prints one byte
pub const PUTCHAR: &str = "putchar";

/// Entry point of every program
pub const MAIN_FUNCTION: &str = "main";
