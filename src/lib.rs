//! # biocompress
//!
//! Lossless compression of DNA sequences over the alphabet `{A,C,T,G}`,
//! exploiting exact repeats (factors) and reverse-complement repeats
//! (palindromes) against a fixed-depth k-mer position index.
//!
//! ## Buffer example
//!
//! ```rs
//! use biocompress::{base, encoder, decoder, options::STD_OPTIONS};
//! let seq = base::parse_sequence("ACGTACGT").expect("invalid input");
//! let encoded = encoder::encode(&seq, &STD_OPTIONS);
//! let decoded = decoder::decode(&encoded.bytes, encoded.bit_len).expect("decode failed");
//! assert_eq!(seq, decoded);
//! ```
//!
//! ## File example
//!
//! ```rs
//! use biocompress::{encode_file, decode_file, options::STD_OPTIONS};
//! encode_file("some_input_path", "some_output_path", &STD_OPTIONS).expect("compression failed");
//! decode_file("some_output_path", "some_roundtrip_path").expect("expansion failed");
//! ```

pub mod base;
pub mod bits;
pub mod decoder;
pub mod encoder;
mod error;
pub mod index;
pub mod integer_codec;
pub mod matcher;
pub mod options;

pub use base::Base;
pub use error::Error;

/// A parsed, in-memory DNA sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence(pub Vec<Base>);

impl Sequence {
    pub fn parse(s: &str) -> Result<Self, Error> {
        Ok(Self(base::parse_sequence(s)?))
    }

    pub fn as_str(&self) -> String {
        self.0.iter().map(|b| b.to_char()).collect()
    }
}

/// Compress `seq` into the core bit-stream format (no file framing).
pub fn encode(seq: &[Base], options: &options::Options) -> encoder::EncodedSequence {
    encoder::encode(seq, options)
}

/// Decompress a core bit stream back into bases.
pub fn decode(bytes: &[u8], bit_len: usize) -> Result<Vec<Base>, Error> {
    decoder::decode(bytes, bit_len)
}

/// Read a raw `{A,C,T,G}` text file, compress it, and write the result with
/// an 8-byte little-endian bit-length header (`spec.md` §9 recommends
/// storing the logical bit length externally rather than relying on
/// zero-padding detection; this crate's choice of an explicit header is
/// recorded as an Open Question resolution in DESIGN.md).
pub fn encode_file(input_path: &str, output_path: &str, options: &options::Options) -> Result<(), Error> {
    let text = std::fs::read_to_string(input_path)?;
    let seq = base::parse_sequence(text.trim_end())?;
    let encoded = encoder::encode(&seq, options);
    log::debug!("encoded {} base(s) into {} bit(s)", seq.len(), encoded.bit_len);
    let mut out = Vec::with_capacity(8 + encoded.bytes.len());
    out.extend_from_slice(&(encoded.bit_len as u64).to_le_bytes());
    out.extend_from_slice(&encoded.bytes);
    std::fs::write(output_path, out)?;
    Ok(())
}

/// Inverse of `encode_file`.
pub fn decode_file(input_path: &str, output_path: &str) -> Result<(), Error> {
    let raw = std::fs::read(input_path)?;
    if raw.len() < 8 {
        return Err(Error::Corrupt("file shorter than the bit-length header".into()));
    }
    let mut header = [0u8; 8];
    header.copy_from_slice(&raw[..8]);
    let bit_len = u64::from_le_bytes(header) as usize;
    let seq = decoder::decode(&raw[8..], bit_len)?;
    let text: String = seq.iter().map(|b| b.to_char()).collect();
    std::fs::write(output_path, text)?;
    Ok(())
}
