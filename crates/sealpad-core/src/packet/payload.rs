//! The payload inside the encryption layer: an optional Compressed Data
//! packet wrapping a Literal Data packet.

use std::io::{Read, Write};

use chrono::{DateTime, TimeZone, Utc};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};

use crate::config::Compression;
use crate::error::{Result, SealpadError};

use super::{parse_packets, write_packet, Reader, Tag};

/// Literal data format octet for UTF-8 text.
const FORMAT_UTF8: u8 = b'u';

const MAX_NESTING: usize = 4;

/// Plaintext recovered from a decrypted payload.
#[derive(Debug)]
pub struct DecodedPayload {
    pub data: Vec<u8>,
    pub compression: Compression,
    pub created_at: Option<DateTime<Utc>>,
}

/// Serialize `plaintext` as a literal packet, compressed when requested.
pub fn build(plaintext: &[u8], compression: Compression, created_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut literal = Vec::with_capacity(plaintext.len() + 6);
    literal.push(FORMAT_UTF8);
    literal.push(0); // empty file name
    let timestamp = u32::try_from(created_at.timestamp()).unwrap_or(0);
    literal.extend_from_slice(&timestamp.to_be_bytes());
    literal.extend_from_slice(plaintext);

    let mut inner = Vec::with_capacity(literal.len() + 6);
    write_packet(&mut inner, Tag::Literal, &literal);

    let compressed = match compression {
        Compression::None => return Ok(inner),
        Compression::Zip => {
            let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&inner)?;
            encoder.finish()?
        }
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&inner)?;
            encoder.finish()?
        }
    };

    let mut body = Vec::with_capacity(compressed.len() + 1);
    body.push(compression.algorithm_id());
    body.extend_from_slice(&compressed);

    let mut out = Vec::with_capacity(body.len() + 6);
    write_packet(&mut out, Tag::Compressed, &body);
    Ok(out)
}

/// Find the literal data in a decrypted packet sequence.
pub fn open(data: &[u8]) -> Result<DecodedPayload> {
    open_nested(data, None, 0)
}

fn open_nested(data: &[u8], outer: Option<Compression>, depth: usize) -> Result<DecodedPayload> {
    if depth > MAX_NESTING {
        return Err(SealpadError::malformed("compressed packets nested too deeply"));
    }

    for packet in parse_packets(data)? {
        match packet.tag {
            Tag::Literal => {
                let (created_at, data) = parse_literal(&packet.body)?;
                return Ok(DecodedPayload {
                    data,
                    compression: outer.unwrap_or(Compression::None),
                    created_at,
                });
            }
            Tag::Compressed => {
                let (algorithm, inflated) = decompress(&packet.body)?;
                return open_nested(&inflated, Some(outer.unwrap_or(algorithm)), depth + 1);
            }
            // Marker and unrelated packets carry nothing we need.
            _ => continue,
        }
    }

    Err(SealpadError::malformed("no literal data packet in payload"))
}

fn parse_literal(body: &[u8]) -> Result<(Option<DateTime<Utc>>, Vec<u8>)> {
    let mut reader = Reader::new(body);
    let _format = reader.u8()?;
    let name_len = reader.u8()?;
    reader.take(usize::from(name_len))?;
    let timestamp = reader.u32()?;
    let created_at = match timestamp {
        0 => None,
        secs => Utc.timestamp_opt(i64::from(secs), 0).single(),
    };
    Ok((created_at, reader.rest().to_vec()))
}

fn decompress(body: &[u8]) -> Result<(Compression, Vec<u8>)> {
    let (&id, compressed) = body
        .split_first()
        .ok_or_else(|| SealpadError::malformed("empty compressed data packet"))?;
    let algorithm = Compression::from_algorithm_id(id).ok_or_else(|| {
        SealpadError::malformed(format!("unsupported compression algorithm {}", id))
    })?;

    let mut out = Vec::new();
    let result = match algorithm {
        Compression::None => {
            out.extend_from_slice(compressed);
            Ok(0)
        }
        Compression::Zip => DeflateDecoder::new(compressed).read_to_end(&mut out),
        Compression::Zlib => ZlibDecoder::new(compressed).read_to_end(&mut out),
    };
    result.map_err(|e| SealpadError::DecompressionFailed(e.to_string()))?;
    Ok((algorithm, out))
}
