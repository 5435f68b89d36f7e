//! Discrete knobs: quantize a raw ADC reading into one of a handful of
//! positions without the position flickering when the reading sits near a
//! boundary.

use crate::fixedmath::{map_range, unit_fraction};
use crate::{UnitFxP, RAW_MAX, RAW_RANGE};

/// A knob (or CV input) split into `num_values` equally wide buckets.
///
/// The reported index only changes once the raw reading leaves the current
/// bucket by more than the hysteresis margin, so noise smaller than the
/// margin can never make the index oscillate.
///
/// ```
/// use beattool::QuantizedKnob;
///
/// let mut knob = QuantizedKnob::new(4, 5);
/// knob.update(261);
/// assert_eq!(knob.index(), 0);
/// knob.update(262);
/// assert_eq!(knob.index(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct QuantizedKnob {
    num_values: u8,
    hysteresis: u16,
    step: u16,
    index: u8,
    raw: u16,
    lower: u16,
    upper: u16,
}

impl QuantizedKnob {
    /// Create a knob with `num_values` positions (at least one) and a
    /// hysteresis margin of `hysteresis` raw units.  The knob starts at
    /// index 0 with a raw reading of 0.
    pub const fn new(num_values: u8, hysteresis: u16) -> Self {
        let mut retval = Self {
            num_values: 1,
            hysteresis,
            step: RAW_RANGE,
            index: 0,
            raw: 0,
            lower: 0,
            upper: RAW_MAX,
        };
        retval.configure(num_values);
        retval
    }
    const fn configure(&mut self, num_values: u8) {
        self.num_values = if num_values == 0 { 1 } else { num_values };
        self.step = RAW_RANGE / self.num_values as u16;
        if self.step == 0 {
            self.step = 1;
        }
        self.index = self.quantize(self.raw);
        self.update_bounds();
    }
    const fn quantize(&self, raw: u16) -> u8 {
        let index = raw / self.step;
        let top = self.num_values as u16 - 1;
        if index > top {
            top as u8
        } else {
            index as u8
        }
    }
    const fn update_bounds(&mut self) {
        let base = self.index as u16 * self.step;
        self.lower = if self.index == 0 {
            0
        } else {
            base.saturating_sub(self.hysteresis)
        };
        self.upper = if self.index as u16 + 1 >= self.num_values as u16 {
            RAW_MAX
        } else {
            let upper = (base + self.step).saturating_add(self.hysteresis);
            if upper > RAW_MAX {
                RAW_MAX
            } else {
                upper
            }
        };
    }
    /// Feed a new raw reading to the knob.  Readings above [RAW_MAX] are
    /// clamped.
    pub fn update(&mut self, raw: u16) {
        let raw = raw.min(RAW_MAX);
        self.raw = raw;
        if raw < self.lower || raw > self.upper {
            self.index = self.quantize(raw);
            self.update_bounds();
        }
    }
    /// The current position, in `0..num_values`
    pub const fn index(&self) -> u8 {
        self.index
    }
    /// The last raw reading passed to [QuantizedKnob::update]
    pub const fn raw(&self) -> u16 {
        self.raw
    }
    /// The number of positions
    pub const fn num_values(&self) -> u8 {
        self.num_values
    }
    /// The width of each bucket, in raw units
    pub const fn step(&self) -> u16 {
        self.step
    }
    /// The hysteresis margin, in raw units
    pub const fn hysteresis(&self) -> u16 {
        self.hysteresis
    }
    /// The inclusive window `(lower, upper)` of raw readings that keep the
    /// current index
    pub const fn bounds(&self) -> (u16, u16) {
        (self.lower, self.upper)
    }
    /// Change the number of positions.  The index and window are re-derived
    /// from the last raw reading immediately.
    pub fn set_num_values(&mut self, num_values: u8) {
        self.configure(num_values);
    }
    /// Change the hysteresis margin.  The window around the current index is
    /// recomputed immediately.
    pub fn set_hysteresis(&mut self, hysteresis: u16) {
        self.hysteresis = hysteresis;
        self.update_bounds();
    }
    /// Map the current index (over the domain `0..=num_values`) linearly
    /// into `[lower, upper]`
    pub fn map_index(&self, lower: u32, upper: u32) -> u32 {
        map_range(
            self.index as i64,
            0,
            self.num_values as i64,
            lower as i64,
            upper as i64,
        ) as u32
    }
    /// Map the last raw reading from the current hysteresis window linearly
    /// into `[lower, upper]`.  This gives a continuous position within the
    /// current bucket.
    pub fn map_inner_raw(&self, lower: u32, upper: u32) -> u32 {
        map_range(
            self.raw as i64,
            self.lower as i64,
            self.upper as i64,
            lower as i64,
            upper as i64,
        ) as u32
    }
    /// The position of the last raw reading within the current hysteresis
    /// window, as a fraction in `[0, 1]`
    pub fn inner_fraction(&self) -> UnitFxP {
        unit_fraction(self.raw, self.lower, self.upper)
    }
}
