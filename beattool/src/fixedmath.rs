//! Integer and fixed-point helpers shared by the knobs and clocks.
//!
//! Everything in here truncates toward zero the same way the hardware
//! reference does, so results are bit-exact across platforms.

pub use fixed::types::*;

/// Linearly project `x` from the range `[in_lo, in_hi]` onto
/// `[out_lo, out_hi]`, truncating the result.
///
/// The input is not clamped, so values outside the input range extrapolate.
/// A zero-width input range maps everything to `out_lo`.
pub const fn map_range(x: i64, in_lo: i64, in_hi: i64, out_lo: i64, out_hi: i64) -> i64 {
    let span = in_hi - in_lo;
    if span == 0 {
        return out_lo;
    }
    (x - in_lo) * (out_hi - out_lo) / span + out_lo
}

/// Position of `x` within `[lo, hi]` as a fraction in `[0, 1]`.
pub fn unit_fraction(x: u16, lo: u16, hi: u16) -> U1F15 {
    let clamped = x.clamp(lo, hi);
    let bits = map_range(clamped as i64, lo as i64, hi as i64, 0, U1F15::ONE.to_bits() as i64);
    U1F15::from_bits(bits as u16)
}

/// Scale `value` by `numerator / denominator`, saturating at `u32::MAX`.
pub fn scale_ratio(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return u32::MAX;
    }
    let wide = value as u64 * numerator as u64 / denominator as u64;
    u32::try_from(wide).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_range_truncates() {
        assert_eq!(map_range(0, 0, 4, 0, 1024), 0);
        assert_eq!(map_range(3, 0, 4, 0, 1024), 768);
        assert_eq!(map_range(1, 0, 3, 0, 10), 3);
        // descending output ranges work too
        assert_eq!(map_range(1, 0, 4, 100, 0), 75);
    }
    #[test]
    fn map_range_zero_span() {
        assert_eq!(map_range(7, 5, 5, 10, 20), 10);
    }
    #[test]
    fn unit_fraction_endpoints() {
        assert_eq!(unit_fraction(507, 507, 1023), U1F15::ZERO);
        assert_eq!(unit_fraction(1023, 507, 1023), U1F15::ONE);
        assert_eq!(unit_fraction(0, 10, 20), U1F15::ZERO);
        assert_eq!(unit_fraction(100, 10, 20), U1F15::ONE);
        assert_eq!(unit_fraction(15, 10, 20), U1F15::lit("0.5"));
    }
    #[test]
    fn scale_ratio_saturates() {
        assert_eq!(scale_ratio(1000, 3, 2), 1500);
        assert_eq!(scale_ratio(1000, 2, 3), 666);
        assert_eq!(scale_ratio(u32::MAX, 2, 1), u32::MAX);
        assert_eq!(scale_ratio(5, 1, 0), u32::MAX);
    }
}
