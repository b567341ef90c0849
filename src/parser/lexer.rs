//! Lexer (tokenizer) for program source
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Tokens carry no kind: the parsers classify them by comparing the lexeme.
//!
//! A character extends the running token only when the pair is one of:
//! word characters (`[0-9A-Za-z_]`) on both sides, `<`/`>`/`=`/`!` followed by
//! `=`, or one of `&&`, `||`, `<<`, `>>`. Anything else starts a new token, and
//! whitespace-only tokens are dropped.
//!
//! The program must open with the fixed three-line [`PROLOGUE`]; the lexer
//! checks it and tokenizes only what follows.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// The three lines every program must start with, in order.
pub const PROLOGUE: [&str; 3] = [
    "#include<iostream>",
    "#include<cstdio>",
    "using namespace std;",
];

/// A lexeme together with where it starts in the program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(text: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            text: text.into(),
            location,
        }
    }

    /// Check the lexeme against a literal
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    /// Identifiers, keywords and numerals are all word tokens
    pub fn is_word(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(is_word_char)
    }

    pub fn is_numeral(&self) -> bool {
        self.text.starts_with(|c: char| c.is_ascii_digit())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Missing prologue line {expected:?} at line {line} (found {found:?})")]
    MissingPrologue {
        expected: &'static str,
        found: Option<String>,
        line: usize,
    },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::MissingPrologue { line, .. } => SourceLocation::new(*line, 1),
        }
    }
}

pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Whether `next` may extend the running token `current`.
fn continues(current: &str, next: char) -> bool {
    let Some(last) = current.chars().last() else {
        return false;
    };
    if is_word_char(last) && is_word_char(next) {
        return true;
    }
    matches!(
        (current, next),
        ("<" | ">" | "=" | "!", '=') | ("&", '&') | ("|", '|') | ("<", '<') | (">", '>')
    )
}

/// Lexer for program source
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given program text (prologue included).
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Check the prologue and tokenize everything after it
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut lines = self.input.lines().enumerate();

        for expected in PROLOGUE {
            let found = lines.by_ref().find(|(_, line)| !line.trim().is_empty());
            match found {
                Some((_, line)) if line.trim_end() == expected => {}
                Some((index, line)) => {
                    return Err(LexError::MissingPrologue {
                        expected,
                        found: Some(line.to_string()),
                        line: index + 1,
                    });
                }
                None => {
                    return Err(LexError::MissingPrologue {
                        expected,
                        found: None,
                        line: self.input.lines().count() + 1,
                    });
                }
            }
        }

        let mut tokens = Vec::new();
        for (index, line) in lines {
            lex_line(line, index + 1, &mut tokens);
        }
        Ok(tokens)
    }

    /// Tokenize the input as program body, without a prologue
    pub fn tokenize_body(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        for (index, line) in self.input.lines().enumerate() {
            lex_line(line, index + 1, &mut tokens);
        }
        tokens
    }
}

/// Lines are joined by a space before lexing, which can never extend a
/// token, so lexing each line on its own yields the same stream.
fn lex_line(line: &str, line_number: usize, tokens: &mut Vec<Token>) {
    let mut current = String::new();
    let mut start_column = 1;

    for (offset, ch) in line.chars().enumerate() {
        if continues(&current, ch) {
            current.push(ch);
            continue;
        }
        flush(&mut current, line_number, start_column, tokens);
        current.push(ch);
        start_column = offset + 1;
    }
    flush(&mut current, line_number, start_column, tokens);
}

fn flush(current: &mut String, line: usize, column: usize, tokens: &mut Vec<Token>) {
    if !current.trim().is_empty() {
        tokens.push(Token::new(
            std::mem::take(current),
            SourceLocation::new(line, column),
        ));
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn program(body: &str) -> String {
        format!("{}\n{}\n{}\n{}", PROLOGUE[0], PROLOGUE[1], PROLOGUE[2], body)
    }

    #[test]
    fn test_simple_tokens() {
        let source = program("int main(){return 0;}");
        let tokens = Lexer::new(&source).tokenize().unwrap();

        assert_eq!(
            texts(&tokens),
            vec!["int", "main", "(", ")", "{", "return", "0", ";", "}"]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = Lexer::new("a<=b>=c==d!=e&&f||g<<h>>i").tokenize_body();
        assert_eq!(
            texts(&tokens),
            vec![
                "a", "<=", "b", ">=", "c", "==", "d", "!=", "e", "&&", "f", "||", "g", "<<",
                "h", ">>", "i"
            ]
        );
    }

    #[test]
    fn test_no_merge_across_failed_continuation() {
        // `<<=` is `<<` then `=`; `+=` and `++` are never merged
        let tokens = Lexer::new("a<<=b+=c++").tokenize_body();
        assert_eq!(
            texts(&tokens),
            vec!["a", "<<", "=", "b", "+", "=", "c", "+", "+"]
        );

        let tokens = Lexer::new("===").tokenize_body();
        assert_eq!(texts(&tokens), vec!["==", "="]);
    }

    #[test]
    fn test_words_and_numerals() {
        let tokens = Lexer::new("x_1 42abc _y\t9").tokenize_body();
        assert_eq!(texts(&tokens), vec!["x_1", "42abc", "_y", "9"]);
        assert!(tokens[1].is_numeral());
        assert!(tokens[2].is_word());
        assert!(!tokens[0].is_numeral());
    }

    #[test]
    fn test_lines_never_merge() {
        let tokens = Lexer::new("ab\ncd\n<\n=").tokenize_body();
        assert_eq!(texts(&tokens), vec!["ab", "cd", "<", "="]);
    }

    #[test]
    fn test_locations() {
        let source = program("int  a;\n  cout<<a;");
        let tokens = Lexer::new(&source).tokenize().unwrap();

        assert_eq!(tokens[0].location, SourceLocation::new(4, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(4, 6));
        assert_eq!(tokens[3].location, SourceLocation::new(5, 3));
        assert_eq!(tokens[4].location, SourceLocation::new(5, 7));
    }

    #[test]
    fn test_retokenize_canonical_form_is_identity() {
        let source = "int main(){int a[3];for(i=0;i<=3&&!b;i=i+1)a[i]=-i*2;cout<<a[2]<<endl;}";
        let first = Lexer::new(source).tokenize_body();
        let joined = texts(&first).join(" ");
        let second = Lexer::new(&joined).tokenize_body();

        assert_eq!(texts(&first), texts(&second));
    }

    #[test]
    fn test_prologue_required() {
        let err = Lexer::new("#include<iostream>\nint main(){}")
            .tokenize()
            .unwrap_err();
        assert!(matches!(
            err,
            LexError::MissingPrologue { expected: "#include<cstdio>", line: 2, .. }
        ));

        let err = Lexer::new("").tokenize().unwrap_err();
        assert!(matches!(err, LexError::MissingPrologue { found: None, .. }));
    }

    #[test]
    fn test_prologue_tolerates_blank_lines_and_crlf() {
        let source = "\n#include<iostream>\r\n#include<cstdio>\r\nusing namespace std;\r\nint x;";
        let tokens = Lexer::new(source).tokenize().unwrap();
        assert_eq!(texts(&tokens), vec!["int", "x", ";"]);
    }
}
