use crate::error::IntcodeError;
use log::debug;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Initial memory contents parsed from program text
///
/// Program text is a comma separated list of base 10 integers. Surrounding
/// whitespace, including a trailing newline, is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    words: Vec<i64>,
}

impl Program {
    pub fn new(words: Vec<i64>) -> Self {
        Program { words }
    }

    /// Load and parse a program file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, IntcodeError> {
        let path = path.as_ref();
        debug!("Loading Intcode program: {}", path.display());
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    pub fn words(&self) -> &[i64] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromStr for Program {
    type Err = IntcodeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Program::default());
        }

        let words = text
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| IntcodeError::InvalidProgram(token.to_string(), index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("parsed program of {} words", words.len());
        Ok(Program { words })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", word)?;
        }
        Ok(())
    }
}

impl From<Vec<i64>> for Program {
    fn from(words: Vec<i64>) -> Self {
        Program::new(words)
    }
}

/// Parse a comma separated list of integers given on the command line
pub fn parse_values(text: &str) -> Result<Vec<i64>, IntcodeError> {
    Ok(text.parse::<Program>()?.words)
}
