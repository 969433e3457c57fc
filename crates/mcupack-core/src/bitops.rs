//! Bit-mask arithmetic shared by every extractor.

use tracing::trace;

/// All-bits-set sentinel returned for register sizes outside 1..=4 bytes.
pub const UNKNOWN_SIZE_ONES: u64 = u64::MAX;

/// Derive `(offset, width)` from a bitfield mask.
///
/// The offset is the lowest set bit and the width is the length of the
/// contiguous run starting there; a non-contiguous mask only counts its first
/// run. A zero mask yields `(0, 1)`.
pub fn bit_range_from_mask(mask: u64) -> (u32, u32) {
    if mask == 0 {
        return (0, 1);
    }
    let offset = mask.trailing_zeros();
    let width = (mask >> offset).trailing_ones();
    trace!(mask = format_args!("{mask:#x}"), offset, width, "bit range from mask");
    (offset, width)
}

/// All-ones pattern for a register of `byte_size` bytes.
pub fn all_ones(byte_size: u32) -> u64 {
    match byte_size {
        1 => 0xFF,
        2 => 0xFFFF,
        3 => 0xFF_FFFF,
        4 => 0xFFFF_FFFF,
        _ => UNKNOWN_SIZE_ONES,
    }
}

/// XOR-accumulate the individual bitfield masks of one register.
pub fn combined_mask<I>(masks: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    masks.into_iter().fold(0, |acc, mask| acc ^ mask)
}

/// Unprogrammed value of a configuration register.
///
/// An explicit initial value from the source wins; otherwise the value is the
/// all-ones pattern with the combined bitfield mask cleared, matching the
/// vendor toolchain's default-fuse convention.
pub fn default_register_value(explicit: Option<u64>, combined: u64, byte_size: u32) -> u64 {
    match explicit {
        Some(value) => value,
        None => all_ones(byte_size) & !combined,
    }
}

/// Mask covering `width` bits starting at `offset`.
pub fn mask_from_range(offset: u32, width: u32) -> u64 {
    if offset >= 64 || width == 0 {
        return 0;
    }
    let ones = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    ones << offset
}

/// Read `width` bits at `offset` out of `value`.
pub fn extract(value: u64, offset: u32, width: u32) -> u64 {
    if offset >= 64 {
        return 0;
    }
    (value & mask_from_range(offset, width)) >> offset
}

/// Whether a field reaches past the end of a register of `byte_size` bytes.
pub fn field_overflows(offset: u32, width: u32, byte_size: u32) -> bool {
    u64::from(offset) + u64::from(width) > u64::from(byte_size) * 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_from_simple_masks() {
        assert_eq!(bit_range_from_mask(0x01), (0, 1));
        assert_eq!(bit_range_from_mask(0x0C), (2, 2));
        assert_eq!(bit_range_from_mask(0x70), (4, 3));
        assert_eq!(bit_range_from_mask(0x8000_0000), (31, 1));
        assert_eq!(bit_range_from_mask(0xFFFF_FFFF), (0, 32));
    }

    #[test]
    fn zero_mask_defaults_to_single_bit() {
        assert_eq!(bit_range_from_mask(0), (0, 1));
    }

    #[test]
    fn non_contiguous_mask_counts_first_run() {
        assert_eq!(bit_range_from_mask(0b1011), (0, 2));
        assert_eq!(bit_range_from_mask(0b1_0110), (1, 2));
    }

    #[test]
    fn every_contiguous_mask_round_trips() {
        let ones = all_ones(4);
        for offset in 0..32u32 {
            for width in 1..=(32 - offset) {
                let mask = ((ones >> (32 - width)) << offset) & ones;
                let (got_offset, got_width) = bit_range_from_mask(mask);
                assert_eq!((got_offset, got_width), (offset, width), "mask {mask:#x}");
                assert_eq!(mask_from_range(got_offset, got_width), mask);
            }
        }
    }

    #[test]
    fn all_ones_table() {
        assert_eq!(all_ones(1), 0xFF);
        assert_eq!(all_ones(2), 0xFFFF);
        assert_eq!(all_ones(3), 0xFF_FFFF);
        assert_eq!(all_ones(4), 0xFFFF_FFFF);
        assert_eq!(all_ones(0), UNKNOWN_SIZE_ONES);
        assert_eq!(all_ones(8), UNKNOWN_SIZE_ONES);
    }

    #[test]
    fn default_value_for_two_fields() {
        let combined = combined_mask([0x03, 0x0C]);
        assert_eq!(combined, 0x0F);
        assert_eq!(default_register_value(None, combined, 1), 0xF0);
    }

    #[test]
    fn explicit_init_value_wins() {
        assert_eq!(default_register_value(Some(0x62), 0x0F, 1), 0x62);
    }

    #[test]
    fn default_round_trips_per_field() {
        // Byte register fully covered by four non-overlapping fields.
        let masks = [0x01u64, 0x06, 0x38, 0xC0];
        let combined = combined_mask(masks);
        let value = default_register_value(None, combined, 1);
        for mask in masks {
            let (offset, width) = bit_range_from_mask(mask);
            let field = extract(value, offset, width);
            assert_eq!(field, 0, "mask {mask:#x}");
        }
        // Re-masking with the combined mask restores the unprogrammed pattern.
        assert_eq!(value | combined, all_ones(1));
        // Uncovered bits stay at the unprogrammed convention.
        let partial = default_register_value(None, combined_mask([0x03]), 1);
        assert_eq!(extract(partial, 2, 6), 0x3F);
        assert_eq!(partial | 0x03, 0xFF);
    }

    #[test]
    fn overflow_detection() {
        assert!(!field_overflows(4, 4, 1));
        assert!(field_overflows(6, 4, 1));
        assert!(!field_overflows(12, 4, 2));
    }

    #[test]
    fn extract_reads_bits() {
        assert_eq!(extract(0xF0, 4, 4), 0xF);
        assert_eq!(extract(0xF0, 0, 4), 0x0);
        assert_eq!(extract(0xABCD, 8, 8), 0xAB);
        assert_eq!(extract(1, 64, 1), 0);
    }
}
