use crate::instruction::Instruction;
use crate::memory::Memory;
use std::fmt::Write;

/// Linear sweep disassembler
///
/// Intcode mixes code and data freely, so any word that does not decode as an
/// instruction is listed as data and the sweep moves on by one word.
pub struct Disassembler<'a> {
    words: &'a [i64],
}

/// One line of a listing
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Code { addr: usize, inst: Instruction },
    Data { addr: usize, value: i64 },
}

impl<'a> Disassembler<'a> {
    pub fn new(words: &'a [i64]) -> Self {
        Disassembler { words }
    }

    /// Decode the whole program
    pub fn listing(&self) -> Vec<Listing> {
        let memory = Memory::new(self.words);
        let mut lines = Vec::new();
        let mut addr = 0;

        while addr < self.words.len() {
            match Instruction::decode(&memory, addr) {
                // Instructions running off the end of the program are data
                Ok(inst) if addr + inst.size() <= self.words.len() => {
                    let size = inst.size();
                    lines.push(Listing::Code { addr, inst });
                    addr += size;
                }
                _ => {
                    lines.push(Listing::Data {
                        addr,
                        value: self.words[addr],
                    });
                    addr += 1;
                }
            }
        }
        lines
    }

    /// Format the listing, optionally with the raw words of each line
    pub fn disassemble(&self, dump_hex: bool) -> String {
        let mut output = String::new();
        for line in self.listing() {
            let (addr, size, text) = match &line {
                Listing::Code { addr, inst } => (*addr, inst.size(), inst.to_string()),
                Listing::Data { addr, value } => (*addr, 1, format!("data {}", value)),
            };

            let _ = write!(&mut output, "{:05}: ", addr);
            if dump_hex {
                let raw: Vec<String> = self.words[addr..addr + size]
                    .iter()
                    .map(|w| w.to_string())
                    .collect();
                let _ = write!(&mut output, "{:<32} ", raw.join(" "));
            }
            let _ = writeln!(&mut output, "{}", text);
        }
        output
    }
}
