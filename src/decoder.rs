//! Inverts the encoder's format (`spec.md` §4.C7): alternating raw/ref
//! segments, starting with raw, reconstructing the output progressively so
//! references can resolve against the already-decoded prefix.

use crate::base::Base;
use crate::bits::BitReader;
use crate::error::Error;
use crate::integer_codec::{decode_position, position_bound, read_fibonacci};
use bit_vec::BitVec;

#[derive(PartialEq, Eq, Clone, Copy)]
enum Expected {
    Raw,
    Ref,
}

struct StagedReference {
    is_palindrome: bool,
    position: u64,
    length: usize,
}

/// Decode a bit stream produced by `encode`/`crate::encoder::encode`, given
/// the logical bit length (the decoder needs no other parameter, `spec.md`
/// §6: "Parameters that affect decoder: NONE").
pub fn decode(bytes: &[u8], bit_len: usize) -> Result<Vec<Base>, Error> {
    let bits = BitVec::from_bytes(bytes);
    let mut r = BitReader::new(&bits, bit_len);
    let mut out: Vec<Base> = Vec::new();
    let mut expected = Expected::Raw;

    while !r.at_end() {
        let count = read_fibonacci(&mut r)? as usize;
        match expected {
            Expected::Raw => {
                log::trace!("decoding raw segment of {count} base(s)");
                for _ in 0..count {
                    let hi = r.read_bit()?;
                    let lo = r.read_bit()?;
                    out.push(Base::from_bits(hi, lo));
                }
                expected = Expected::Ref;
            }
            Expected::Ref => {
                log::trace!("decoding reference segment of {count} reference(s)");
                let mut staged = Vec::with_capacity(count);
                let mut accumulated = 0u64;
                for _ in 0..count {
                    let is_palindrome = r.read_bit()?;
                    let cursor = out.len() as u64 + accumulated;
                    let position = decode_position(&mut r, position_bound(cursor, is_palindrome))?;
                    if position == 0 {
                        return Err(Error::Corrupt("reference position field decoded to 0".into()));
                    }
                    let length = read_fibonacci(&mut r)? as usize;
                    accumulated += length as u64;
                    staged.push(StagedReference { is_palindrome, position, length });
                }
                for reference in staged {
                    apply_reference(&mut out, &reference)?;
                }
                expected = Expected::Raw;
            }
        }
    }

    Ok(out)
}

fn apply_reference(out: &mut Vec<Base>, reference: &StagedReference) -> Result<(), Error> {
    let m = out.len();
    let length = reference.length;
    if reference.is_palindrome {
        let delta = reference.position - 1;
        let start = m
            .checked_sub(delta as usize)
            .ok_or_else(|| Error::Corrupt("palindrome offset precedes start of output".into()))?;
        let end = start
            .checked_add(length)
            .ok_or_else(|| Error::Corrupt("palindrome reference length overflows".into()))?;
        if end > m {
            return Err(Error::Corrupt("palindrome reference reads past the decoded prefix".into()));
        }
        let copied: Vec<Base> = out[start..end].iter().map(|b| b.complement()).collect();
        out.extend(copied);
    } else {
        let p = (reference.position - 1) as usize;
        let end = p
            .checked_add(length)
            .ok_or_else(|| Error::Corrupt("factor reference length overflows".into()))?;
        if end > m {
            return Err(Error::Corrupt("factor reference reads past the decoded prefix".into()));
        }
        let copied: Vec<Base> = out[p..end].to_vec();
        out.extend(copied);
    }
    Ok(())
}
