//! Utility functions for reading E20 machine code files.
//!
//! Each line holds one word, in order from address 0:
//! `ram[0] = 16'b0010000010000101;  // optional comment`

use std::path::Path;

use text_io::try_scan;

use crate::error::LoadError;
use crate::error::SimulatorResult;
use crate::memory::ram::MEM_SIZE;

/// Reads a machine code file into a flat program image
pub fn load_file(path: &Path) -> SimulatorResult<Vec<u16>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::FileReadError(path.to_path_buf(), e))?;
    load_machine_code(&content)
}

/// Parses machine code text into a flat program image
pub fn load_machine_code(content: &str) -> SimulatorResult<Vec<u16>> {
    let mut image: Vec<u16> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let (address, word) =
            scan_line(line).ok_or_else(|| LoadError::ParseError {
                line: line_num + 1,
                content: line.to_string(),
            })?;

        if address != image.len() {
            return Err(LoadError::OutOfSequence(address).into());
        }
        if address >= MEM_SIZE {
            return Err(LoadError::ProgramTooBig(address).into());
        }
        image.push(word);
    }

    tracing::debug!(words = image.len(), "loaded program");
    Ok(image)
}

/// Returns the address and word of one line, if well-formed
fn scan_line(line: &str) -> Option<(usize, u16)> {
    // Anything after the terminating semicolon is a comment
    let end = line.find(';')?;
    let (address, bits) = scan_fields(&line[..=end]).ok()?;
    if bits.is_empty() || !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    let word = u16::from_str_radix(&bits, 2).ok()?;
    Some((address, word))
}

fn scan_fields(line: &str) -> Result<(usize, String), text_io::Error> {
    let address: usize;
    let bits: String;
    try_scan!(line.bytes() => "ram[{}] = 16'b{};", address, bits);
    Ok((address, bits))
}
