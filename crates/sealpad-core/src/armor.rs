//! ASCII armor for binary OpenPGP messages.
//!
//! ```text
//! -----BEGIN PGP MESSAGE-----
//! Comment: sealpad 0.1.0
//!
//! <base64, 64 columns>
//! =<base64 CRC-24>
//! -----END PGP MESSAGE-----
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, SealpadError};

const BEGIN_LINE: &str = "-----BEGIN PGP MESSAGE-----";
const END_LINE: &str = "-----END PGP MESSAGE-----";
const LINE_WIDTH: usize = 64;

const CRC24_INIT: u32 = 0x00B7_04CE;
const CRC24_POLY: u32 = 0x0186_4CFB;

/// CRC-24 checksum over `data`.
pub fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for byte in data {
        crc ^= u32::from(*byte) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

/// Armor a binary message.
pub fn encode(data: &[u8]) -> String {
    let body = STANDARD.encode(data);
    let crc = crc24(data).to_be_bytes();

    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 128);
    out.push_str(BEGIN_LINE);
    out.push('\n');
    out.push_str("Comment: sealpad ");
    out.push_str(crate::VERSION);
    out.push_str("\n\n");
    // Base64 output is ASCII, so every byte offset is a char boundary.
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        out.push_str(line);
        out.push('\n');
        rest = tail;
    }
    out.push('=');
    out.push_str(&STANDARD.encode(&crc[1..]));
    out.push('\n');
    out.push_str(END_LINE);
    out.push('\n');
    out
}

/// Strip armor and return the binary message.
///
/// Text before the BEGIN line and after the END line is ignored, as are
/// CRLF line endings and armor header lines. A missing checksum line is
/// accepted; a present one must match.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r').trim());

    lines
        .by_ref()
        .find(|line| *line == BEGIN_LINE)
        .ok_or_else(|| SealpadError::malformed("missing armor BEGIN line"))?;

    // Header lines run until the first blank line. Some writers omit the
    // blank line when there are no headers, so a non-header line also ends
    // the block and is treated as body.
    let mut body = String::new();
    let mut checksum: Option<&str> = None;
    let mut in_headers = true;
    let mut saw_end = false;

    for line in lines {
        if line == END_LINE {
            saw_end = true;
            break;
        }
        if in_headers {
            if line.is_empty() {
                in_headers = false;
                continue;
            }
            if is_header_line(line) {
                continue;
            }
            in_headers = false;
        }
        if line.is_empty() {
            continue;
        }
        if let Some(crc) = line.strip_prefix('=') {
            checksum = Some(crc);
            continue;
        }
        if checksum.is_some() {
            return Err(SealpadError::malformed("armor data after checksum line"));
        }
        body.push_str(line);
    }

    if !saw_end {
        return Err(SealpadError::malformed("missing armor END line"));
    }

    let data = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| SealpadError::malformed(format!("invalid base64 in armor: {}", e)))?;
    if data.is_empty() {
        return Err(SealpadError::malformed("armor contains no data"));
    }

    if let Some(encoded) = checksum {
        let crc = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|_| SealpadError::malformed("invalid armor checksum encoding"))?;
        if crc.len() != 3 {
            return Err(SealpadError::malformed("invalid armor checksum length"));
        }
        let expected = u32::from_be_bytes([0, crc[0], crc[1], crc[2]]);
        if expected != crc24(&data) {
            return Err(SealpadError::malformed("armor checksum mismatch"));
        }
    }

    Ok(data)
}

fn is_header_line(line: &str) -> bool {
    match line.split_once(": ") {
        Some((key, _)) => !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc24_known_values() {
        assert_eq!(crc24(b""), CRC24_INIT);
        // Reference value for the ASCII digits 1-9.
        assert_eq!(crc24(b"123456789"), 0x21CF02);
    }

    #[test]
    fn test_encode_layout() {
        let data = vec![0xAB; 100];
        let armored = encode(&data);
        let lines: Vec<&str> = armored.lines().collect();

        assert_eq!(lines[0], BEGIN_LINE);
        assert!(lines[1].starts_with("Comment: sealpad "));
        assert_eq!(lines[2], "");
        assert!(lines.iter().all(|line| line.len() <= LINE_WIDTH));
        assert!(lines[lines.len() - 2].starts_with('='));
        assert_eq!(lines[lines.len() - 1], END_LINE);
    }

    #[test]
    fn test_encode_wraps_body_at_line_width() {
        let data = vec![0x5A; 200];
        let armored = encode(&data);
        let body: Vec<&str> = armored
            .lines()
            .skip(3)
            .take_while(|line| !line.starts_with('='))
            .collect();

        let (last, full) = body.split_last().unwrap();
        assert!(full.iter().all(|line| line.len() == LINE_WIDTH));
        assert!(!last.is_empty() && last.len() <= LINE_WIDTH);
        assert_eq!(body.concat(), STANDARD.encode(&data));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&data)).unwrap(), data);
    }

    #[test]
    fn test_decode_tolerates_crlf_and_surrounding_text() {
        let data = b"binary message".to_vec();
        let armored = format!(
            "Some preamble\r\n{}trailing notes\r\n",
            encode(&data).replace('\n', "\r\n")
        );
        assert_eq!(decode(&armored).unwrap(), data);
    }

    #[test]
    fn test_decode_without_headers_or_checksum() {
        let text = format!(
            "{}\n{}\n{}\n",
            BEGIN_LINE,
            STANDARD.encode(b"abc"),
            END_LINE
        );
        assert_eq!(decode(&text).unwrap(), b"abc");
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let armored = encode(b"payload");
        let crc_line = armored
            .lines()
            .find(|line| line.starts_with('='))
            .unwrap()
            .to_string();
        let tampered = armored.replace(&crc_line, "=AAAA");
        assert!(matches!(
            decode(&tampered),
            Err(SealpadError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_decode_rejects_missing_markers_and_bad_base64() {
        assert!(decode("hello world").is_err());
        assert!(decode(&format!("{}\n\nAAAA\n", BEGIN_LINE)).is_err());
        assert!(decode(&format!("{}\n\n!!!!\n{}\n", BEGIN_LINE, END_LINE)).is_err());
        assert!(decode(&format!("{}\n\n{}\n", BEGIN_LINE, END_LINE)).is_err());
    }
}
