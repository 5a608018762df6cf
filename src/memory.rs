use crate::error::IntcodeError;
use log::{debug, warn};

/// Largest tape a program may grow to, in words (2 GiB of storage)
pub const MAX_WORDS: usize = 1 << 28;

/// Intcode memory tape
///
/// Logically infinite: reads past the allocated extent yield 0 and writes
/// past it grow the backing storage, zero-filling the gap. The tape never
/// shrinks. Negative addresses are always rejected, and a write that would
/// grow the tape beyond `MAX_WORDS` or fail to allocate is an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Memory {
    words: Vec<i64>,
}

impl Memory {
    /// Create a tape holding a private copy of the program
    pub fn new(program: &[i64]) -> Self {
        Memory {
            words: program.to_vec(),
        }
    }

    /// Read the word at `address`
    pub fn read(&self, address: i64) -> Result<i64, IntcodeError> {
        let index = Self::index(address)?;
        Ok(self.words.get(index).copied().unwrap_or(0))
    }

    /// Write `value` at `address`, growing the tape if needed
    pub fn write(&mut self, address: i64, value: i64) -> Result<(), IntcodeError> {
        let index = Self::index(address)?;
        if index >= self.words.len() {
            debug!(
                "growing memory from {} to {} words",
                self.words.len(),
                index + 1
            );
            if index >= MAX_WORDS {
                warn!("write to address {} exceeds the memory limit", address);
                return Err(IntcodeError::MemoryExhausted(address));
            }
            self.words
                .try_reserve_exact(index + 1 - self.words.len())
                .map_err(|_| IntcodeError::MemoryExhausted(address))?;
            self.words.resize(index + 1, 0);
        }
        self.words[index] = value;
        Ok(())
    }

    /// Fetch the word at a program-counter index
    pub fn fetch(&self, index: usize) -> i64 {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// Allocated extent in words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.words
    }

    fn index(address: i64) -> Result<usize, IntcodeError> {
        usize::try_from(address).map_err(|_| IntcodeError::InvalidAddress(address))
    }
}
