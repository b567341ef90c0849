// AST (Abstract Syntax Tree) definitions for the interpreter

use rustc_hash::FxHashMap;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    // Logical (on truthiness)
    Xor,
    And,
    Or,
}

impl BinOp {
    pub fn from_token(text: &str) -> Option<Self> {
        let op = match text {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Mod,
            "<" => BinOp::Lt,
            "<=" => BinOp::Le,
            ">" => BinOp::Gt,
            ">=" => BinOp::Ge,
            "==" => BinOp::Eq,
            "!=" => BinOp::Ne,
            "^" => BinOp::Xor,
            "&&" => BinOp::And,
            "||" => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Xor => "^",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary operators
///
/// The expression parser rewrites a prefix `+`/`-` into `++`/`--`, so in this
/// grammar those two tokens mean unary plus and negation, not increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus, // ++x
    Neg,  // --x
    Not,  // !x
}

impl UnOp {
    pub fn from_token(text: &str) -> Option<Self> {
        match text {
            "++" => Some(UnOp::Plus),
            "--" => Some(UnOp::Neg),
            "!" => Some(UnOp::Not),
            _ => None,
        }
    }
}

/// A variable reference, possibly indexed (`a`, `a[i]`, `grid[i][j]`).
///
/// Array slots are addressed by a compound key built from the base name and
/// the evaluated indices, see [`crate::memory::scope::compound_key`].
#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    pub name: String,
    pub indices: Vec<AstNode>,
    pub location: SourceLocation,
}

impl VarRef {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        VarRef {
            name: name.into(),
            indices: Vec::new(),
            location,
        }
    }
}

/// AST nodes representing statements and expressions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Statement sequence
    Sequence(Vec<AstNode>),
    /// Empty statement or missing expression (`;`, `for(;;)`, `f()`)
    Empty,

    // Expressions
    Literal {
        value: i32,
        location: SourceLocation,
    },
    Variable(VarRef),
    FunctionCall {
        name: String,
        args: Vec<AstNode>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<AstNode>,
        location: SourceLocation,
    },
    BinaryOp {
        op: BinOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
        location: SourceLocation,
    },
    Assignment {
        target: VarRef,
        value: Box<AstNode>,
        location: SourceLocation,
    },
    /// `cin >> a >> b[i]`
    Input {
        targets: Vec<VarRef>,
        location: SourceLocation,
    },
    /// `cout << a << endl`
    Output {
        items: Vec<AstNode>,
        location: SourceLocation,
    },
    Endl {
        location: SourceLocation,
    },

    // Statements
    Declaration {
        name: String,
        location: SourceLocation,
    },
    If {
        condition: Box<AstNode>,
        then_branch: Box<AstNode>,
        else_branch: Option<Box<AstNode>>,
        location: SourceLocation,
    },
    While {
        condition: Box<AstNode>,
        body: Box<AstNode>,
        location: SourceLocation,
    },
    For {
        init: Box<AstNode>,
        condition: Box<AstNode>,
        step: Box<AstNode>,
        body: Box<AstNode>,
        location: SourceLocation,
    },
    Return {
        expr: Box<AstNode>,
        location: SourceLocation,
    },
    /// `{ ... }`: evaluated in a fresh child scope
    Block {
        body: Box<AstNode>,
        location: SourceLocation,
    },
}

impl AstNode {
    /// Get the source location of this node, if it has one
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            AstNode::Sequence(_) | AstNode::Empty => None,
            AstNode::Variable(var) => Some(var.location),
            AstNode::Literal { location, .. }
            | AstNode::FunctionCall { location, .. }
            | AstNode::UnaryOp { location, .. }
            | AstNode::BinaryOp { location, .. }
            | AstNode::Assignment { location, .. }
            | AstNode::Input { location, .. }
            | AstNode::Output { location, .. }
            | AstNode::Endl { location }
            | AstNode::Declaration { location, .. }
            | AstNode::If { location, .. }
            | AstNode::While { location, .. }
            | AstNode::For { location, .. }
            | AstNode::Return { location, .. }
            | AstNode::Block { location, .. } => Some(*location),
        }
    }

    /// Short human-readable label used by the trace viewer
    pub fn label(&self) -> &'static str {
        match self {
            AstNode::Sequence(_) => "sequence",
            AstNode::Empty => "empty",
            AstNode::Literal { .. } => "literal",
            AstNode::Variable(_) => "variable",
            AstNode::FunctionCall { .. } => "call",
            AstNode::UnaryOp { .. } => "unary",
            AstNode::BinaryOp { .. } => "binary",
            AstNode::Assignment { .. } => "assignment",
            AstNode::Input { .. } => "cin",
            AstNode::Output { .. } => "cout",
            AstNode::Endl { .. } => "endl",
            AstNode::Declaration { .. } => "declaration",
            AstNode::If { .. } => "if",
            AstNode::While { .. } => "while",
            AstNode::For { .. } => "for",
            AstNode::Return { .. } => "return",
            AstNode::Block { .. } => "block",
        }
    }
}

/// A top-level function: `int name(int a, int b) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: AstNode,
    pub location: SourceLocation,
}

/// Loaded program: the function table plus top-level declarations, which
/// run in the root scope before `main`
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub functions: FxHashMap<String, FunctionDef>,
    pub globals: Vec<AstNode>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
