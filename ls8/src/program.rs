use log::*;
use ls8_cpu::{ImageTooLarge, RAM_SIZE};
use std::{fs::File, io::Read};
use thiserror::Error;

/// Why a program image couldn't be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open! {path}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to read {path}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to load {path}")]
    TooLarge {
        path: String,
        source: ImageTooLarge,
    },
}

/// An LS-8 program image: one byte per line, written as a run of `0`s and
/// `1`s. Whatever follows the digits (usually a `#` comment) is ignored, and
/// lines without any leading digits don't produce a byte.
///
/// ```text
/// 10000010 # LDI R0,8
/// 00000000
/// 00001000
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

/// The leading binary digits of a line, as a byte. Lines are raw bytes so
/// comments in any encoding are fine; a trailing `\r` just ends the digits.
///
/// Runs longer than eight digits keep only their low eight bits, at any
/// length. Runs over 64 digits therefore do not saturate to 0xFF the way a
/// C `strtoul` loader's would.
fn parse_line(line: &[u8]) -> Option<u8> {
    let start = line
        .iter()
        .position(|c| !c.is_ascii_whitespace())
        .unwrap_or(line.len());
    let line = &line[start..];
    let end = line
        .iter()
        .position(|&c| c != b'0' && c != b'1')
        .unwrap_or(line.len());
    let digits = &line[..end];
    if digits.is_empty() {
        return None;
    }
    Some(
        digits
            .iter()
            .fold(0u8, |byte, digit| (byte << 1) | (digit - b'0')),
    )
}

impl Program {
    pub fn parse(source: &[u8]) -> Result<Program, ImageTooLarge> {
        let bytes: Vec<u8> = source
            .split(|&c| c == b'\n')
            .filter_map(parse_line)
            .collect();
        if bytes.len() > RAM_SIZE {
            return Err(ImageTooLarge { len: bytes.len() });
        }
        Ok(Program { bytes })
    }

    pub fn from_path(path: &str) -> Result<Program, LoadError> {
        info!("Attempting to open path: '{path}'");
        let mut f = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        let mut source = Vec::new();
        f.read_to_end(&mut source)
            .map_err(|source| LoadError::Read {
                path: path.to_owned(),
                source,
            })?;
        let program = Program::parse(&source).map_err(|source| LoadError::TooLarge {
            path: path.to_owned(),
            source,
        })?;
        info!("Program info: {} bytes", program.bytes.len());
        Ok(program)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let program = Program::parse(
            b"# print8.ls8: Print the number 8 on the screen\n\
             \n\
             10000010 # LDI R0,8\n\
             00000000\n\
             00001000\n\
             01000111 # PRN R0\n\
             00000000\n\
             00000001 # HLT\n",
        )
        .unwrap();
        assert_eq!(program.bytes(), &[0x82, 0x00, 0x08, 0x47, 0x00, 0x01]);
    }

    #[test]
    fn digits_stop_at_the_first_other_character() {
        assert_eq!(parse_line(b"101abc"), Some(0b101));
        assert_eq!(parse_line(b"  11\t# indented"), Some(0b11));
        assert_eq!(parse_line(b"0"), Some(0));
        assert_eq!(parse_line(b"2"), None);
        assert_eq!(parse_line(b""), None);
        assert_eq!(parse_line(b"# 1010"), None);
    }

    #[test]
    fn long_runs_keep_the_low_byte() {
        assert_eq!(parse_line(b"100000001"), Some(1));
        assert_eq!(parse_line(b"111111111111"), Some(0xFF));
    }

    #[test]
    fn windows_line_endings() {
        let program = Program::parse(b"00000001\r\n00000010\r\n").unwrap();
        assert_eq!(program.bytes(), &[1, 2]);
    }

    #[test]
    fn comments_need_not_be_utf8() {
        let program = Program::parse(b"01000111 # PRN R0 caf\xE9\n00000000\n00000001\n").unwrap();
        assert_eq!(program.bytes(), &[0x47, 0x00, 0x01]);
    }

    #[test]
    fn image_must_fit_in_memory() {
        let full = "00000000\n".repeat(RAM_SIZE);
        assert_eq!(Program::parse(full.as_bytes()).unwrap().bytes().len(), RAM_SIZE);
        let too_big = "00000000\n".repeat(RAM_SIZE + 1);
        assert_eq!(Program::parse(too_big.as_bytes()).unwrap_err().len, RAM_SIZE + 1);
    }

    #[test]
    fn from_path_reads_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "10000010 # LDI R0,8").unwrap();
        writeln!(file, "00000000").unwrap();
        writeln!(file, "00001000").unwrap();
        let path = file.path().to_str().unwrap();
        let program = Program::from_path(path).unwrap();
        assert_eq!(program.bytes(), &[0x82, 0x00, 0x08]);
    }

    #[test]
    fn from_path_accepts_latin1_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"01000111 # PRN R0 caf\xE9\n00000000\n00000001\n")
            .unwrap();
        let program = Program::from_path(file.path().to_str().unwrap()).unwrap();
        assert_eq!(program.bytes(), &[0x47, 0x00, 0x01]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.ls8");
        let path = path.to_str().unwrap();
        let error = Program::from_path(path).unwrap_err();
        assert!(matches!(error, LoadError::Open { .. }));
        assert!(error.to_string().contains(path));
    }
}
