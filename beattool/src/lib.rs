//! This crate contains the control logic for the Beat Tool, a small clock
//! utility module.  Once per control cycle it takes a snapshot of the front
//! panel (three knob/CV readings and one gate input) and produces a single
//! output level, acting as a clock divider, clock multiplier, burst generator
//! or free-running clock depending on the position of the mode knob.
//!
//! The crate is `no_std`, never allocates, and uses only integer and
//! fixed-point arithmetic so that it can run on small microcontrollers
//! without an FPU.  Sampling the ADCs and driving the output pin are left to
//! the caller; see [InputFrame] and [selector::ModeSelector::next].
//!
//! The building blocks live in their own modules and can be used on their
//! own:
//!
//!  - [knob::QuantizedKnob] turns a raw reading into a discrete index, with
//!    hysteresis to stop the index from chattering at bucket boundaries.
//!  - [curve::CurveKnob] interpolates a value from a small table of
//!    breakpoints, approximating exponential response curves.
//!  - [clock::PhaseClock] is a square wave with a variable period, pulse
//!    width, sync and edge detection.

#![no_std]
#![warn(missing_docs)]

mod fixedmath;

pub mod clock;
pub mod config;
pub mod curve;
pub mod knob;
pub mod modes;
pub mod selector;

pub use clock::PhaseClock;
pub use config::Config;
pub use curve::{CurveKnob, CurveValue};
pub use knob::QuantizedKnob;
pub use selector::{InputFrame, Mode, ModeSelector};

/// The largest value a raw knob/CV reading can take (10 bit ADC)
pub const RAW_MAX: u16 = 1023;
/// The number of distinct raw readings, `RAW_MAX + 1`
pub const RAW_RANGE: u16 = RAW_MAX + 1;

/// Output level for a low gate
pub const OUT_LOW: u8 = 0;
/// Output level for a high gate
pub const OUT_HIGH: u8 = u8::MAX;

/// A clock phase as an unsigned 8 bit fixed point number in the interval
/// `[0, 1)`.  One full cycle of a [PhaseClock] is 256 phase units.
pub type PhaseFxP = fixedmath::U0F8;
/// An unsigned 16 bit fixed point number in the interval `[0, 1]`, with one
/// integral bit so that 1.0 is exactly representable.  Used as an
/// interpolation fraction.
pub type UnitFxP = fixedmath::U1F15;

/// The number of phase units in one period of a [PhaseClock]
pub const PHASE_MAX: u32 = 1 << PhaseFxP::FRAC_NBITS;

/// Widen a gate state to a full-scale output level
pub const fn gate_to_output(state: bool) -> u8 {
    if state {
        OUT_HIGH
    } else {
        OUT_LOW
    }
}
