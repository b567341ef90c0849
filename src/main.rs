// minicpp: interpreter for a tiny fixed-prologue subset of C++

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, LevelFilter, Log, Metadata, Record};
use ratatui::{backend::CrosstermBackend, Terminal};

use minicpp::interpreter::constants::{
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_STEPS, DEFAULT_TRACE_MEMORY_LIMIT, INTERPRETER_STACK_SIZE,
};
use minicpp::interpreter::engine::InterpreterConfig;
use minicpp::ui::App;
use minicpp::{execute_input, Execution};

/// Interpret a program read as `n`, then `n` integers for `cin`, then the
/// program text starting with its three-line prologue.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read the input from this file instead of stdin.
    file: Option<String>,

    /// Abort after this many statements and loop iterations (0 for no limit).
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u64,

    /// Abort when user function calls nest deeper than this.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Record every step and browse the run in a terminal UI.
    #[arg(long)]
    tui: bool,

    /// Memory budget for the recorded trace, in bytes.
    #[arg(long, default_value_t = DEFAULT_TRACE_MEMORY_LIMIT)]
    trace_limit: usize,

    /// Log more on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> InterpreterConfig {
        InterpreterConfig {
            max_steps: (self.max_steps > 0).then_some(self.max_steps),
            max_call_depth: self.max_depth,
            trace_memory_limit: self.tui.then_some(self.trace_limit),
        }
    }
}

/// Writes log records to stderr
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn read_input(file: Option<&str>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Run on a worker thread with a large stack, since evaluation recurses
/// once per nested statement, expression and call
fn run_on_large_stack(text: String, config: InterpreterConfig) -> io::Result<Execution> {
    let worker = thread::Builder::new()
        .name("interpreter".to_string())
        .stack_size(INTERPRETER_STACK_SIZE)
        .spawn(move || execute_input(&text, config))?;

    worker
        .join()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "interpreter thread panicked"))
}

fn run_tui(execution: Execution, source: String) -> io::Result<()> {
    let Execution {
        output,
        trace,
        error,
    } = execution;
    let Some(trace) = trace else {
        return Ok(());
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(trace, output, source, error.map(|e| e.to_string()));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let text = match read_input(args.file.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: failed to read input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = args.config();
    info!("running with {:?}", config);
    let execution = match run_on_large_stack(text.clone(), config) {
        Ok(execution) => execution,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.tui && execution.trace.is_some() {
        let failed = execution.error.is_some();
        let source = minicpp::source::split_input(&text)
            .map(|input| input.program)
            .unwrap_or_default();
        if let Err(e) = run_tui(execution, source) {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
        return if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout
        .write_all(execution.output.as_bytes())
        .and_then(|()| stdout.flush())
    {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    match execution.error {
        Some(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
