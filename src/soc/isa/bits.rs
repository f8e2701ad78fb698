//! Bit-order helpers used when turning left-to-right authored patterns into encodings.

/// Widest encoding the reversal transform can realign.
pub const MAX_ENCODING_BITS: u32 = u64::BITS;

/// Returns the value whose bit `i` equals bit `63 - i` of `n`.
#[inline]
pub fn reverse64(n: u64) -> u64 {
    n.reverse_bits()
}

/// Realigns a pattern accumulated low-to-high (first authored character in bit 0) so the first
/// authored character lands in bit `width - 1` and the last one in bit 0.
///
/// `width` must not exceed [`MAX_ENCODING_BITS`]; a zero width yields zero.
pub fn realign_msb_first(raw: u64, width: u32) -> u64 {
    debug_assert!(width <= MAX_ENCODING_BITS, "width {width} exceeds 64 bits");
    if width == 0 {
        return 0;
    }
    reverse64(raw) >> (MAX_ENCODING_BITS - width)
}

/// Mask with the low `width` bits set.
pub fn bit_mask(width: u32) -> u64 {
    match width {
        0 => 0,
        w if w >= MAX_ENCODING_BITS => u64::MAX,
        w => (1u64 << w) - 1,
    }
}

/// Mask covering a field of `width` bits whose least-significant bit sits at `shift`.
pub fn field_mask(width: u32, shift: u32) -> u64 {
    if shift >= MAX_ENCODING_BITS {
        return 0;
    }
    bit_mask(width) << shift
}

/// Renders the low `width` bits of `value`, most-significant first.
pub fn format_binary(value: u64, width: u32) -> String {
    let width = width.min(MAX_ENCODING_BITS);
    (0..width)
        .rev()
        .map(|bit| if (value >> bit) & 1 == 1 { '1' } else { '0' })
        .collect()
}
