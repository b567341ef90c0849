// Execution engine for the interpreter

use crate::interpreter::constants::{
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_STEPS, DEFAULT_TRACE_MEMORY_LIMIT, MAIN_FUNCTION,
};
use crate::interpreter::errors::RuntimeError;
use crate::memory::{InputPool, ScopeId, ScopeStack};
use crate::parser::ast::*;
use crate::snapshot::{Snapshot, SnapshotManager, Terminal};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Resource ceilings and tracing options for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum executed statements plus loop iterations, `None` for no limit
    pub max_steps: Option<u64>,
    /// Maximum nesting of user function calls
    pub max_call_depth: usize,
    /// Record a trace with this memory budget, `None` to skip tracing
    pub trace_memory_limit: Option<usize>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_steps: Some(DEFAULT_MAX_STEPS),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            trace_memory_limit: None,
        }
    }
}

impl InterpreterConfig {
    /// Default limits with tracing enabled at the default budget
    pub fn traced() -> Self {
        InterpreterConfig {
            trace_memory_limit: Some(DEFAULT_TRACE_MEMORY_LIMIT),
            ..Self::default()
        }
    }
}

/// How a statement finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Normal,
    /// `return` unwinding to the nearest call with its value
    Return(i32),
}

/// The main interpreter that executes a loaded program
pub struct Interpreter {
    /// Function table, immutable after loading
    functions: FxHashMap<String, Rc<FunctionDef>>,

    /// Top-level declarations, run in the root scope before `main`
    globals: Vec<AstNode>,

    /// All live scopes
    pub(crate) scopes: ScopeStack,

    /// Scope that statements currently execute in
    pub(crate) current_scope: ScopeId,

    /// Integers consumed by `cin`
    pub(crate) input: InputPool,

    /// Captured `cout` and `putchar` output
    pub(crate) terminal: Terminal,

    config: InterpreterConfig,

    /// Statements and loop iterations executed so far
    steps: u64,

    /// Nesting of active user function calls
    pub(crate) call_depth: usize,

    /// Name of the function currently executing
    pub(crate) current_function: String,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,

    /// Execution trace, when enabled
    snapshot_manager: Option<SnapshotManager>,

    /// Whether execution has finished
    finished: bool,
}

impl Interpreter {
    /// Create a new interpreter for `program` reading `inputs` through `cin`
    pub fn new(program: Program, inputs: Vec<i32>, config: InterpreterConfig) -> Self {
        let functions = program
            .functions
            .into_iter()
            .map(|(name, def)| (name, Rc::new(def)))
            .collect();
        let scopes = ScopeStack::new();
        let root = scopes.root();

        Interpreter {
            functions,
            globals: program.globals,
            scopes,
            current_scope: root,
            input: InputPool::new(inputs),
            terminal: Terminal::new(),
            config,
            steps: 0,
            call_depth: 0,
            current_function: String::new(),
            current_location: SourceLocation::new(1, 1),
            snapshot_manager: config.trace_memory_limit.map(SnapshotManager::new),
            finished: false,
        }
    }

    /// Run the program from start to finish
    ///
    /// Globals are declared in the root scope, then `main` runs directly in
    /// that root scope with no arguments. Its return value is discarded.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let main_fn = self
            .functions
            .get(MAIN_FUNCTION)
            .cloned()
            .ok_or(RuntimeError::NoMainFunction)?;

        let globals = std::mem::take(&mut self.globals);
        for global in &globals {
            self.execute(global)?;
        }
        self.globals = globals;

        debug!("entering main");
        self.current_function = MAIN_FUNCTION.to_string();
        self.current_location = main_fn.location;
        self.call_depth = 1;

        let flow = self.execute(&main_fn.body)?;
        if let ControlFlow::Return(value) = flow {
            debug!("main returned {}", value);
        }

        self.call_depth = 0;
        self.finished = true;
        debug!(
            "finished after {} steps, {} byte(s) of output",
            self.steps,
            self.terminal.len()
        );
        Ok(())
    }

    /// Execute a single statement
    pub(crate) fn execute(&mut self, stmt: &AstNode) -> Result<ControlFlow, RuntimeError> {
        if let AstNode::Sequence(statements) = stmt {
            for statement in statements {
                let flow = self.execute(statement)?;
                if flow != ControlFlow::Normal {
                    return Ok(flow);
                }
            }
            return Ok(ControlFlow::Normal);
        }

        if let Some(location) = stmt.location() {
            self.current_location = location;
        }
        self.tick()?;
        self.take_snapshot(stmt.label())?;

        match stmt {
            AstNode::Declaration { name, .. } => {
                self.execute_declaration(name);
                Ok(ControlFlow::Normal)
            }

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => self.execute_if(condition, then_branch, else_branch.as_deref()),

            AstNode::While {
                condition, body, ..
            } => self.execute_while(condition, body),

            AstNode::For {
                init,
                condition,
                step,
                body,
                ..
            } => self.execute_for(init, condition, step, body),

            AstNode::Block { body, .. } => self.execute_block(body),

            AstNode::Return { expr, .. } => self.execute_return(expr),

            // Expression statement
            _ => {
                self.evaluate(stmt)?;
                Ok(ControlFlow::Normal)
            }
        }
    }

    /// Run `f` inside a fresh child of the current scope
    pub(crate) fn with_child_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let saved = self.current_scope;
        self.current_scope = self.enter_scope(saved);
        let result = f(self);
        self.exit_scope(saved);
        result
    }

    pub(crate) fn enter_scope(&mut self, parent: ScopeId) -> ScopeId {
        let scope = self.scopes.push(parent);
        trace!("entered scope {} (parent {})", scope, parent);
        scope
    }

    /// Release the innermost scope and resume in `resume`
    pub(crate) fn exit_scope(&mut self, resume: ScopeId) {
        self.scopes.pop();
        self.current_scope = resume;
    }

    /// Count one unit of work against the step ceiling
    pub(crate) fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        match self.config.max_steps {
            Some(limit) if self.steps > limit => Err(RuntimeError::StepLimitExceeded {
                limit,
                location: self.current_location,
            }),
            _ => Ok(()),
        }
    }

    /// Record the state before a statement runs, when tracing
    fn take_snapshot(&mut self, statement: &'static str) -> Result<(), RuntimeError> {
        let Some(manager) = self.snapshot_manager.as_mut() else {
            return Ok(());
        };

        let snapshot = Snapshot {
            step: self.steps,
            location: self.current_location,
            statement,
            function: self.current_function.clone(),
            call_depth: self.call_depth,
            scopes: Snapshot::capture_scopes(&self.scopes, self.current_scope),
            output_len: self.terminal.len(),
        };

        let limit = manager.memory_limit();
        manager
            .push(snapshot)
            .map_err(|current| RuntimeError::SnapshotLimitExceeded { current, limit })
    }

    pub(crate) fn function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.functions.get(name).cloned()
    }

    pub(crate) fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Captured output so far
    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// Take the captured output, leaving an empty terminal behind
    pub fn take_terminal(&mut self) -> Terminal {
        std::mem::take(&mut self.terminal)
    }

    /// Take the recorded trace, if tracing was enabled
    pub fn take_snapshots(&mut self) -> Option<SnapshotManager> {
        self.snapshot_manager.take()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read a variable from the root scope (for inspection after a run)
    pub fn global(&self, key: &str) -> i32 {
        self.scopes.get(self.scopes.root(), key)
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    const PROLOGUE: &str = "#include<iostream>\n#include<cstdio>\nusing namespace std;\n";

    fn interpreter(body: &str, inputs: Vec<i32>, config: InterpreterConfig) -> Interpreter {
        let source = format!("{PROLOGUE}{body}");
        let parser = Parser::new(&source).expect("lexing failed");
        let program = parser.parse_program().expect("parsing failed");
        Interpreter::new(program, inputs, config)
    }

    #[test]
    fn test_main_runs_in_root_scope() {
        let mut interp = interpreter(
            "int main(){int a;a=3;b=a+1;}",
            vec![],
            InterpreterConfig::default(),
        );
        interp.run().expect("run failed");
        assert!(interp.is_finished());
        assert_eq!(interp.global("a"), 3);
        assert_eq!(interp.global("b"), 4);
    }

    #[test]
    fn test_missing_main() {
        let mut interp = interpreter("int f(){return 1;}", vec![], InterpreterConfig::default());
        assert_eq!(interp.run(), Err(RuntimeError::NoMainFunction));
    }

    #[test]
    fn test_globals_run_before_main() {
        let mut interp = interpreter(
            "int g=7,h;int main(){h=g*2;}",
            vec![],
            InterpreterConfig::default(),
        );
        interp.run().expect("run failed");
        assert_eq!(interp.global("h"), 14);
    }

    #[test]
    fn test_step_limit() {
        let config = InterpreterConfig {
            max_steps: Some(100),
            ..InterpreterConfig::default()
        };
        let mut interp = interpreter("int main(){while(1);}", vec![], config);
        assert!(matches!(
            interp.run(),
            Err(RuntimeError::StepLimitExceeded { limit: 100, .. })
        ));
        assert_eq!(interp.steps(), 101);
    }

    #[test]
    fn test_block_scope_is_released() {
        let mut interp = interpreter(
            "int main(){{int x;x=5;}}",
            vec![],
            InterpreterConfig::default(),
        );
        interp.run().expect("run failed");
        assert_eq!(interp.scopes.depth(), 1);
        assert_eq!(interp.global("x"), 0);
    }

    #[test]
    fn test_trace_records_statements() {
        let mut interp = interpreter(
            "int main(){int a;a=2;cout<<a;}",
            vec![],
            InterpreterConfig::traced(),
        );
        interp.run().expect("run failed");
        let trace = interp.take_snapshots().expect("tracing enabled");
        let labels: Vec<&str> = trace.snapshots().iter().map(|s| s.statement).collect();
        assert_eq!(labels, vec!["declaration", "assignment", "cout"]);
        assert_eq!(trace.get(2).map(|s| s.output_len), Some(0));
        assert_eq!(interp.terminal().text(), "2");
    }

    #[test]
    fn test_trace_limit_is_fatal() {
        let config = InterpreterConfig {
            trace_memory_limit: Some(1),
            ..InterpreterConfig::default()
        };
        let mut interp = interpreter("int main(){int a;}", vec![], config);
        assert!(matches!(
            interp.run(),
            Err(RuntimeError::SnapshotLimitExceeded { limit: 1, .. })
        ));
    }
}
