//! Cursor-driven segmenter producing the bit stream (`spec.md` §4.C6).

use crate::base::Base;
use crate::bits::BitWriter;
use crate::index::KmerIndex;
use crate::integer_codec::{encode_fibonacci, encode_position, position_bound};
use crate::matcher::{find_match, MatchCandidate};
use crate::options::Options;

/// An encoded sequence, packed to bytes, plus the logical bit length needed
/// to strip the zero-padding on the final byte (`spec.md` §9).
pub struct EncodedSequence {
    pub bytes: Vec<u8>,
    pub bit_len: usize,
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum Bucket {
    Raw,
    Ref,
}

fn bucket_of(candidate: &MatchCandidate) -> Bucket {
    if candidate.is_raw() { Bucket::Raw } else { Bucket::Ref }
}

/// Encode `seq` per the options' tuning parameters. The decoder needs none
/// of `options` back (`spec.md` §6).
pub fn encode(seq: &[Base], options: &Options) -> EncodedSequence {
    let height = options.height;
    let mut index = KmerIndex::new(height);
    let mut writer = BitWriter::new();

    let mut current: Option<Bucket> = None;
    let mut raw_buf: Vec<Base> = Vec::new();
    let mut ref_buf: Vec<(MatchCandidate, u64)> = Vec::new();

    let mut i = 0usize;
    while i < seq.len() {
        let candidate = find_match(seq, i, &index, height);
        let bucket = bucket_of(&candidate);

        if let Some(open) = current {
            if open != bucket {
                flush(&mut writer, open, &mut raw_buf, &mut ref_buf);
            }
        }
        current = Some(bucket);

        let len = candidate.len();
        match bucket {
            Bucket::Raw => {
                if let MatchCandidate::Raw(bases) = candidate {
                    log::trace!("raw run of {} base(s) at cursor {}", bases.len(), i);
                    raw_buf.extend(bases);
                }
            }
            Bucket::Ref => {
                log::trace!("reference candidate of length {} at cursor {}", len, i);
                ref_buf.push((candidate, i as u64));
            }
        }

        index.insert(seq, i);
        i += len;
    }

    if let Some(open) = current {
        flush(&mut writer, open, &mut raw_buf, &mut ref_buf);
    }

    let (bytes, bit_len) = writer.into_bytes();
    EncodedSequence { bytes, bit_len }
}

fn flush(
    writer: &mut BitWriter,
    kind: Bucket,
    raw_buf: &mut Vec<Base>,
    ref_buf: &mut Vec<(MatchCandidate, u64)>,
) {
    match kind {
        Bucket::Raw => {
            log::debug!("flushing raw segment of {} base(s)", raw_buf.len());
            writer.push_bits(&encode_fibonacci(raw_buf.len() as u64));
            for base in raw_buf.drain(..) {
                let (hi, lo) = base.to_bits();
                writer.push_bit(hi);
                writer.push_bit(lo);
            }
        }
        Bucket::Ref => {
            log::debug!("flushing reference segment of {} reference(s)", ref_buf.len());
            writer.push_bits(&encode_fibonacci(ref_buf.len() as u64));
            for (candidate, cursor) in ref_buf.drain(..) {
                match candidate {
                    MatchCandidate::Factor { pos, len } => {
                        writer.push_bit(false);
                        writer.push_bits(&encode_position(pos as u64 + 1, position_bound(cursor, false)));
                        writer.push_bits(&encode_fibonacci(len as u64));
                    }
                    MatchCandidate::Palindrome { rel, len } => {
                        writer.push_bit(true);
                        writer.push_bits(&encode_position(rel as u64 + 1, position_bound(cursor, true)));
                        writer.push_bits(&encode_fibonacci(len as u64));
                    }
                    MatchCandidate::Raw(_) => unreachable!("raw candidates never enter the reference buffer"),
                }
            }
        }
    }
}
