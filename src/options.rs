//! Options controlling compression.

/// Tuning parameters for the encoder. The decoder needs none of these
/// (`spec.md` §6: "Parameters that affect decoder: NONE").
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// k-mer index depth, also the minimum match length considered without
    /// extension. Recommended range 11-13.
    pub height: usize,
}

pub const STD_OPTIONS: Options = Options { height: 11 };
