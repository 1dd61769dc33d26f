//! Transfer header encoding and parsing.
//!
//! Each file on the wire is announced by a header line:
//!
//! ```text
//! C<4-digit-octal-mode> <decimal-size> <basename>\n
//! ```
//!
//! The declared size exactly bounds the payload phase that follows; the
//! name must be a bare base name so a remote peer can never steer the
//! destination outside the target directory.

use std::io::Read;

use crate::error::{Result, ScpError};

/// Parsed form of the `C`-record announcing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Permission bits (e.g. `0o644`). Only the low 12 bits are encoded.
    pub mode: u32,
    /// Exact payload length in bytes.
    pub size: u64,
    /// Base name of the file, without any path component.
    pub name: String,
}

impl FileHeader {
    /// Create a header, validating the name.
    pub fn new(mode: u32, size: u64, name: &str) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            mode,
            size,
            name: name.to_string(),
        })
    }

    /// Serialize to the wire line, including the trailing newline.
    pub fn encode(&self) -> String {
        format!("C{:04o} {} {}\n", self.mode, self.size, self.name)
    }

    /// Parse a complete header line (trailing newline optional).
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let body = line
            .strip_prefix('C')
            .ok_or_else(|| ScpError::InvalidHeader(format!("missing C prefix: {line:?}")))?;

        let mut parts = body.splitn(3, ' ');
        let mode_field = parts
            .next()
            .ok_or_else(|| ScpError::InvalidHeader("missing mode field".into()))?;
        let size_field = parts
            .next()
            .ok_or_else(|| ScpError::InvalidHeader("missing size field".into()))?;
        let name = parts
            .next()
            .ok_or_else(|| ScpError::InvalidHeader("missing file name".into()))?;

        let mode = parse_mode(mode_field)?;
        let size: u64 = size_field
            .parse()
            .map_err(|_| ScpError::InvalidHeader(format!("bad size: {size_field:?}")))?;

        Self::new(mode, size, name)
    }

    /// Read a header from the stream, after the `C` control byte has
    /// already been consumed by the download loop.
    ///
    /// Reads the fixed-width 5-byte mode field (`"0644 "`), then decimal
    /// size digits up to a space, then the name up to the newline.
    pub fn read_after_control<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut mode_field = [0u8; 5];
        reader.read_exact(&mut mode_field).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ScpError::UnexpectedEof { step: "header" }
            } else {
                ScpError::Io(e)
            }
        })?;
        if mode_field[4] != b' ' {
            return Err(ScpError::InvalidHeader(format!(
                "mode field not space-terminated: {:?}",
                String::from_utf8_lossy(&mode_field)
            )));
        }
        let mode = parse_mode(std::str::from_utf8(&mode_field[..4]).map_err(|_| {
            ScpError::InvalidHeader("mode field is not ASCII".into())
        })?)?;

        let mut size: u64 = 0;
        let mut saw_digit = false;
        loop {
            let byte = read_byte(reader, "header")?;
            match byte {
                b'0'..=b'9' => {
                    saw_digit = true;
                    size = size
                        .checked_mul(10)
                        .and_then(|s| s.checked_add(u64::from(byte - b'0')))
                        .ok_or_else(|| ScpError::InvalidHeader("size overflow".into()))?;
                }
                b' ' if saw_digit => break,
                other => {
                    return Err(ScpError::InvalidHeader(format!(
                        "unexpected byte 0x{other:02x} in size field"
                    )))
                }
            }
        }

        let mut name = Vec::new();
        loop {
            let byte = read_byte(reader, "header")?;
            if byte == b'\n' {
                break;
            }
            name.push(byte);
        }
        let name = String::from_utf8(name)
            .map_err(|_| ScpError::InvalidHeader("file name is not UTF-8".into()))?;

        Self::new(mode, size, &name)
    }
}

fn read_byte<R: Read + ?Sized>(reader: &mut R, step: &'static str) -> Result<u8> {
    let mut byte = [0u8; 1];
    if reader.read(&mut byte)? == 0 {
        return Err(ScpError::UnexpectedEof { step });
    }
    Ok(byte[0])
}

fn parse_mode(field: &str) -> Result<u32> {
    if field.len() != 4 || !field.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(ScpError::InvalidHeader(format!(
            "mode is not 4 octal digits: {field:?}"
        )));
    }
    u32::from_str_radix(field, 8)
        .map_err(|_| ScpError::InvalidHeader(format!("bad mode: {field:?}")))
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScpError::InvalidHeader("empty file name".into()));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ScpError::InvalidHeader(format!(
            "file name must be a bare base name: {name:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_encode_format() {
        let header = FileHeader::new(0o644, 5000, "f.txt").unwrap();
        assert_eq!(header.encode(), "C0644 5000 f.txt\n");
    }

    #[test]
    fn test_roundtrip_size_grid() {
        for size in [0u64, 1, 1_048_576, 2_147_483_647] {
            let header = FileHeader::new(0o644, size, "data.bin").unwrap();
            let parsed = FileHeader::parse(&header.encode()).unwrap();
            assert_eq!(parsed, header, "roundtrip failed for size {size}");
        }
    }

    #[test]
    fn test_read_after_control() {
        let mut cursor = Cursor::new(b"0644 5000 f.txt\nrest".to_vec());
        let header = FileHeader::read_after_control(&mut cursor).unwrap();
        assert_eq!(header.mode, 0o644);
        assert_eq!(header.size, 5000);
        assert_eq!(header.name, "f.txt");
        // Nothing past the newline was consumed
        assert_eq!(cursor.position() as usize, b"0644 5000 f.txt\n".len());
    }

    #[test]
    fn test_zero_size_header() {
        let mut cursor = Cursor::new(b"0600 0 empty\n".to_vec());
        let header = FileHeader::read_after_control(&mut cursor).unwrap();
        assert_eq!(header.size, 0);
    }

    #[test]
    fn test_rejects_path_separator() {
        assert!(FileHeader::new(0o644, 1, "../etc/passwd").is_err());
        assert!(FileHeader::new(0o644, 1, "a/b").is_err());
        assert!(FileHeader::new(0o644, 1, "..").is_err());
        assert!(FileHeader::parse("C0644 1 ../x\n").is_err());
    }

    #[test]
    fn test_rejects_bad_mode() {
        assert!(FileHeader::parse("C64 1 f\n").is_err());
        assert!(FileHeader::parse("C0899 1 f\n").is_err());
        let mut cursor = Cursor::new(b"06444 1 f\n".to_vec());
        assert!(FileHeader::read_after_control(&mut cursor).is_err());
    }

    #[test]
    fn test_rejects_bad_size() {
        assert!(FileHeader::parse("C0644 12x3 f\n").is_err());
        let mut cursor = Cursor::new(b"0644 1x f\n".to_vec());
        assert!(FileHeader::read_after_control(&mut cursor).is_err());
    }

    #[test]
    fn test_truncated_header_is_eof() {
        let mut cursor = Cursor::new(b"0644 50".to_vec());
        match FileHeader::read_after_control(&mut cursor) {
            Err(ScpError::UnexpectedEof { step }) => assert_eq!(step, "header"),
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn test_roundtrip_law(
            mode in 0u32..=0o7777,
            size in 0u64..=u64::from(u32::MAX),
            name in "[A-Za-z0-9._-]{1,64}",
        ) {
            prop_assume!(name != "." && name != "..");
            let header = FileHeader::new(mode, size, &name).unwrap();
            let parsed = FileHeader::parse(&header.encode()).unwrap();
            prop_assert_eq!(parsed, header);
        }

        #[test]
        fn test_stream_parse_matches_line_parse(
            size in 0u64..=u64::from(u32::MAX),
            name in "[A-Za-z0-9._-]{1,32}",
        ) {
            prop_assume!(name != "." && name != "..");
            let header = FileHeader::new(0o644, size, &name).unwrap();
            let line = header.encode();
            let from_line = FileHeader::parse(&line).unwrap();
            let mut cursor = Cursor::new(line.as_bytes()[1..].to_vec());
            let from_stream = FileHeader::read_after_control(&mut cursor).unwrap();
            prop_assert_eq!(from_line, from_stream);
        }
    }
}
