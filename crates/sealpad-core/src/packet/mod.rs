//! OpenPGP packet framing.
//!
//! Packets are written with new-format headers and definite lengths. The
//! reader also accepts old-format headers and partial body lengths, which
//! other OpenPGP implementations emit for streamed data.

pub mod payload;
pub mod seipd;
pub mod skesk;

use crate::config::SymmetricCipher;
use crate::error::{Result, SealpadError};

/// Packet tags this crate reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Skesk,
    Compressed,
    Marker,
    Literal,
    Seipd,
    Mdc,
    Other(u8),
}

impl Tag {
    pub fn from_u8(tag: u8) -> Self {
        match tag {
            3 => Tag::Skesk,
            8 => Tag::Compressed,
            10 => Tag::Marker,
            11 => Tag::Literal,
            18 => Tag::Seipd,
            19 => Tag::Mdc,
            other => Tag::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Tag::Skesk => 3,
            Tag::Compressed => 8,
            Tag::Marker => 10,
            Tag::Literal => 11,
            Tag::Seipd => 18,
            Tag::Mdc => 19,
            Tag::Other(other) => other,
        }
    }

    /// The new-format header octet, also used as associated data.
    pub fn header_octet(self) -> u8 {
        0xC0 | self.to_u8()
    }
}

/// AEAD mode identifiers. Only GCM is produced or accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadMode {
    Gcm,
}

impl AeadMode {
    pub fn algorithm_id(self) -> u8 {
        match self {
            AeadMode::Gcm => 3,
        }
    }

    pub fn from_algorithm_id(id: u8) -> Result<Self> {
        match id {
            3 => Ok(AeadMode::Gcm),
            1 | 2 => Err(SealpadError::malformed(format!(
                "AEAD mode {} is not supported (GCM only)",
                if id == 1 { "EAX" } else { "OCB" }
            ))),
            other => Err(SealpadError::malformed(format!(
                "unknown AEAD algorithm {}",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AeadMode::Gcm => "gcm",
        }
    }

    pub fn nonce_len(self) -> usize {
        match self {
            AeadMode::Gcm => crate::crypto::cipher::GCM_NONCE_LEN,
        }
    }
}

/// Look up a symmetric cipher by its wire id.
pub(crate) fn cipher_from_id(id: u8) -> Result<SymmetricCipher> {
    SymmetricCipher::from_algorithm_id(id)
        .ok_or_else(|| SealpadError::malformed(format!("unsupported symmetric cipher {}", id)))
}

/// A packet with its body fully assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub tag: Tag,
    pub body: Vec<u8>,
}

/// Append a packet with a new-format header to `out`.
pub fn write_packet(out: &mut Vec<u8>, tag: Tag, body: &[u8]) {
    out.push(tag.header_octet());
    write_length(out, body.len());
    out.extend_from_slice(body);
}

fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let adjusted = len - 192;
        out.push(((adjusted >> 8) + 192) as u8);
        out.push((adjusted & 0xFF) as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
}

/// Split `data` into packets.
pub fn parse_packets(data: &[u8]) -> Result<Vec<Packet>> {
    let mut reader = Reader::new(data);
    let mut packets = Vec::new();
    while !reader.is_empty() {
        packets.push(read_packet(&mut reader)?);
    }
    Ok(packets)
}

fn read_packet(reader: &mut Reader<'_>) -> Result<Packet> {
    let ctb = reader.u8()?;
    if ctb & 0x80 == 0 {
        return Err(SealpadError::malformed(format!(
            "invalid packet header octet {:#04x}",
            ctb
        )));
    }

    if ctb & 0x40 != 0 {
        let tag = Tag::from_u8(ctb & 0x3F);
        let body = read_new_format_body(reader)?;
        return Ok(Packet { tag, body });
    }

    let tag = Tag::from_u8((ctb >> 2) & 0x0F);
    let len = match ctb & 0x03 {
        0 => usize::from(reader.u8()?),
        1 => usize::from(reader.u16()?),
        2 => reader.u32()? as usize,
        // Indeterminate: the packet runs to the end of the input.
        _ => reader.remaining(),
    };
    let body = reader.take(len)?.to_vec();
    Ok(Packet { tag, body })
}

fn read_new_format_body(reader: &mut Reader<'_>) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let first = reader.u8()?;
        match first {
            0..=191 => {
                body.extend_from_slice(reader.take(usize::from(first))?);
                return Ok(body);
            }
            192..=223 => {
                let second = reader.u8()?;
                let len = ((usize::from(first) - 192) << 8) + usize::from(second) + 192;
                body.extend_from_slice(reader.take(len)?);
                return Ok(body);
            }
            224..=254 => {
                let len = 1usize << (first & 0x1F);
                body.extend_from_slice(reader.take(len)?);
            }
            255 => {
                let len = reader.u32()? as usize;
                body.extend_from_slice(reader.take(len)?);
                return Ok(body);
            }
        }
    }
}

/// Bounds-checked cursor over a byte slice.
///
/// Every read past the end is a [`SealpadError::MalformedEnvelope`].
#[derive(Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| SealpadError::malformed("packet data truncated"))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos.min(self.data.len())..];
        self.pos = self.data.len();
        slice
    }
}
