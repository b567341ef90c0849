//! Splitting a run's standard input into the input pool and program text
//!
//! The input opens with a count `n` followed by `n` integers, separated by
//! any whitespace including line breaks. Whatever follows the last integer on
//! its line is discarded, and every later line belongs to the program.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Expected the input count at line {line}, found {found:?}")]
    InvalidCount { found: Option<String>, line: usize },

    #[error("Expected integer input #{index} at line {line}, found {found:?}")]
    InvalidInput {
        index: usize,
        found: Option<String>,
        line: usize,
    },
}

/// A run's input: the integers for `cin` and the program text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInput {
    pub inputs: Vec<i32>,
    pub program: String,
}

/// Whitespace-separated words with their byte offsets
struct Words<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Words<'a> {
    /// The next word and the byte offset just past it
    fn next_word(&mut self) -> Option<(&'a str, usize)> {
        let rest = &self.text[self.offset..];
        let start = self.offset + rest.find(|c: char| !c.is_whitespace())?;
        let len = self.text[start..]
            .find(char::is_whitespace)
            .unwrap_or(self.text.len() - start);
        self.offset = start + len;
        Some((&self.text[start..start + len], self.offset))
    }

    /// 1-based line number at the current offset
    fn line(&self) -> usize {
        self.text[..self.offset].matches('\n').count() + 1
    }
}

/// Split raw standard input into the input pool and the program text
pub fn split_input(text: &str) -> Result<RunInput, SourceError> {
    let mut words = Words { text, offset: 0 };

    let count = match words.next_word() {
        Some((word, _)) => word.parse::<usize>().map_err(|_| SourceError::InvalidCount {
            found: Some(word.to_string()),
            line: words.line(),
        })?,
        None => {
            return Err(SourceError::InvalidCount {
                found: None,
                line: words.line(),
            })
        }
    };

    let mut inputs = Vec::with_capacity(count);
    for index in 1..=count {
        let word = words.next_word();
        let value = word.and_then(|(w, _)| w.parse::<i32>().ok());
        match value {
            Some(value) => inputs.push(value),
            None => {
                return Err(SourceError::InvalidInput {
                    index,
                    found: word.map(|(w, _)| w.to_string()),
                    line: words.line(),
                })
            }
        }
    }

    // Drop the remainder of the line holding the last integer
    let rest = &text[words.offset..];
    let program = match rest.find('\n') {
        Some(pos) => rest[pos + 1..].to_string(),
        None => String::new(),
    };

    Ok(RunInput { inputs, program })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        let input = split_input("2 5 -7\n#include<iostream>\nint main(){}\n").unwrap();
        assert_eq!(input.inputs, vec![5, -7]);
        assert_eq!(input.program, "#include<iostream>\nint main(){}\n");
    }

    #[test]
    fn test_inputs_span_lines_and_rest_of_line_is_dropped() {
        let input = split_input("3\n1 2\n3 trailing words\nline one\nline two").unwrap();
        assert_eq!(input.inputs, vec![1, 2, 3]);
        assert_eq!(input.program, "line one\nline two");
    }

    #[test]
    fn test_zero_inputs() {
        let input = split_input("0\r\nprogram\n").unwrap();
        assert!(input.inputs.is_empty());
        assert_eq!(input.program, "program\n");
    }

    #[test]
    fn test_malformed_header() {
        assert_eq!(
            split_input(""),
            Err(SourceError::InvalidCount {
                found: None,
                line: 1
            })
        );
        assert!(matches!(
            split_input("x\n"),
            Err(SourceError::InvalidCount { .. })
        ));
        assert_eq!(
            split_input("2 1\n#include<iostream>\n"),
            Err(SourceError::InvalidInput {
                index: 2,
                found: Some("#include<iostream>".to_string()),
                line: 2
            })
        );
    }
}
