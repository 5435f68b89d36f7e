//! Knobs with a non-linear response.
//!
//! A [CurveKnob] approximates a smooth (usually exponential) response with a
//! handful of hand-placed breakpoints and integer linear interpolation
//! between them.  The cost of [CurveKnob::value] is one table lookup and one
//! widening multiply, regardless of the shape of the curve.

use crate::knob::QuantizedKnob;
use crate::UnitFxP;
use num_traits::{AsPrimitive, PrimInt};

/// Types that can be stored as curve breakpoints.
///
/// This is implemented for all primitive integers that fit in an `i64`.
pub trait CurveValue: Copy {
    /// Linearly interpolate between `a` (at `frac == 0`) and `b` (at
    /// `frac == 1`).  The result is exact at both ends and truncates toward
    /// negative infinity in between.
    fn lerp(a: Self, b: Self, frac: UnitFxP) -> Self;
}

impl<T> CurveValue for T
where
    T: PrimInt + AsPrimitive<i64>,
    i64: AsPrimitive<T>,
{
    fn lerp(a: T, b: T, frac: UnitFxP) -> T {
        let a_wide: i64 = a.as_();
        let b_wide: i64 = b.as_();
        let delta = ((b_wide - a_wide) * frac.to_bits() as i64) >> UnitFxP::FRAC_NBITS;
        (a_wide + delta).as_()
    }
}

/// A knob whose output follows a piecewise-linear curve.
///
/// A curve of `n + 1` breakpoints splits the knob into `n` buckets; within
/// bucket `i` the output slides from `curve[i]` to `curve[i + 1]` as the raw
/// reading crosses the bucket's hysteresis window.
///
/// ```
/// use beattool::CurveKnob;
///
/// const CURVE: [u32; 3] = [1000, 100, 10];
/// let mut knob = CurveKnob::new(&CURVE, 5);
/// knob.update(0);
/// assert_eq!(knob.value(), 1000);
/// knob.update(1023);
/// assert_eq!(knob.value(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct CurveKnob<'a, T: CurveValue> {
    knob: QuantizedKnob,
    curve: &'a [T],
}

fn num_segments<T>(curve: &[T]) -> u8 {
    assert!(curve.len() >= 2, "A curve needs at least two breakpoints");
    assert!(curve.len() <= u8::MAX as usize + 1, "Too many curve breakpoints");
    (curve.len() - 1) as u8
}

impl<'a, T: CurveValue> CurveKnob<'a, T> {
    /// Create a new knob following `curve`.
    ///
    /// # Panics
    ///
    /// Panics if `curve` has fewer than two breakpoints or more than 256.
    pub fn new(curve: &'a [T], hysteresis: u16) -> Self {
        Self {
            knob: QuantizedKnob::new(num_segments(curve), hysteresis),
            curve,
        }
    }
    /// Feed a new raw reading to the underlying knob
    pub fn update(&mut self, raw: u16) {
        self.knob.update(raw);
    }
    /// Replace the breakpoints without disturbing the knob position.  If the
    /// new curve has a different number of segments the knob is
    /// reconfigured to match.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [CurveKnob::new]
    pub fn set_curve(&mut self, curve: &'a [T]) {
        let segments = num_segments(curve);
        if segments != self.knob.num_values() {
            self.knob.set_num_values(segments);
        }
        self.curve = curve;
    }
    /// The breakpoints currently in use
    pub fn curve(&self) -> &'a [T] {
        self.curve
    }
    /// The interpolated value for the current knob position
    pub fn value(&self) -> T {
        let i = self.knob.index() as usize;
        T::lerp(self.curve[i], self.curve[i + 1], self.knob.inner_fraction())
    }
    /// The segment of the curve the knob is in
    pub fn index(&self) -> u8 {
        self.knob.index()
    }
    /// The last raw reading
    pub fn raw(&self) -> u16 {
        self.knob.raw()
    }
    /// The underlying quantized knob
    pub fn knob(&self) -> &QuantizedKnob {
        &self.knob
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RAW_MAX;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(u32::lerp(100, 1000, UnitFxP::ZERO), 100);
        assert_eq!(u32::lerp(100, 1000, UnitFxP::ONE), 1000);
        assert_eq!(u32::lerp(100, 1000, UnitFxP::lit("0.5")), 550);
        assert_eq!(u32::lerp(1000, 100, UnitFxP::lit("0.5")), 550);
        assert_eq!(i16::lerp(-100, 100, UnitFxP::lit("0.25")), -50);
        assert_eq!(u8::lerp(0, 255, UnitFxP::ONE), 255);
        assert_eq!(u32::lerp(10_000_000, 1_000_000, UnitFxP::ONE), 1_000_000);
    }
    fn check_two_point(a: u32, b: u32) {
        let curve = [a, b];
        let mut knob = CurveKnob::new(&curve, 5);
        knob.update(0);
        assert_eq!(knob.value(), a);
        let mut last = knob.value();
        for raw in 1..=RAW_MAX {
            knob.update(raw);
            let value = knob.value();
            if b >= a {
                assert!(value >= last, "raw={raw}");
            } else {
                assert!(value <= last, "raw={raw}");
            }
            last = value;
        }
        assert_eq!(knob.value(), b);
    }
    #[test]
    fn two_point_curve() {
        check_two_point(100_000, 1_000_000);
        check_two_point(1_000_000, 100_000);
        check_two_point(7, 7);
    }
    #[test]
    fn top_bucket_is_covered() {
        const CURVE: [u32; 3] = [10_000_000, 3_000_000, 1_000_000];
        let mut knob = CurveKnob::new(&CURVE, 5);
        knob.update(RAW_MAX);
        assert_eq!(knob.index(), 1);
        assert_eq!(knob.value(), 1_000_000);
        // bottom of the top bucket's window is the middle breakpoint
        let (lower, _) = knob.knob().bounds();
        knob.update(lower);
        assert_eq!(knob.index(), 1);
        assert_eq!(knob.value(), 3_000_000);
        knob.update(0);
        assert_eq!(knob.index(), 0);
        assert_eq!(knob.value(), 10_000_000);
    }
    #[test]
    fn values_stay_between_breakpoints() {
        const CURVE: [u32; 5] = [250_000, 20_000, 2_273, 1_500, 1_000];
        let mut knob = CurveKnob::new(&CURVE, 5);
        for raw in 0..=RAW_MAX {
            knob.update(raw);
            let i = knob.index() as usize;
            let value = knob.value();
            assert!(value <= CURVE[i] && value >= CURVE[i + 1], "raw={raw}");
        }
    }
    #[test]
    fn set_curve_keeps_position() {
        const SLOW: [u32; 3] = [2_000_000, 1_000_000, 666_000];
        const FAST: [u32; 3] = [333_000, 250_000, 166_000];
        let mut knob = CurveKnob::new(&SLOW, 5);
        knob.update(RAW_MAX);
        assert_eq!(knob.value(), 666_000);
        knob.set_curve(&FAST);
        assert_eq!(knob.index(), 1);
        assert_eq!(knob.raw(), RAW_MAX);
        assert_eq!(knob.value(), 166_000);
        const COARSE: [u32; 2] = [100, 200];
        knob.set_curve(&COARSE);
        assert_eq!(knob.knob().num_values(), 1);
        assert_eq!(knob.value(), 200);
    }
    #[test]
    #[should_panic]
    fn single_breakpoint_is_rejected() {
        let _ = CurveKnob::new(&[1u32], 5);
    }
}
