//! The Beat Tool's operating modes.
//!
//! Each mode is a [Behavior]: a small state machine that owns its own knobs
//! and clock, and turns the rate/range knobs and the gate input into an
//! output level once per control cycle.

use core::fmt::Debug;

mod burst;
mod clock;
mod divmul;

pub use burst::{BurstMode, BURST_RATE_CURVE, BURST_REPEAT_OPTIONS};
pub use clock::{ClockMode, CLOCK_RATE_CURVES};
pub use divmul::{Direction, DivideMultiplyMode, Ratio, MULTIPLIERS};

/// The part of an input frame that a mode gets to see
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeInput {
    /// Raw reading of the rate knob/CV (PARAM 1)
    pub rate: u16,
    /// Raw reading of the range/repeats knob/CV (PARAM 2)
    pub range: u16,
    /// The GATE/TRG input
    pub trigger: bool,
}

impl ModeInput {
    /// Constructor
    pub const fn new(rate: u16, range: u16, trigger: bool) -> Self {
        Self {
            rate,
            range,
            trigger,
        }
    }
}

/// One of the Beat Tool's operating modes.
///
/// The caller guarantees that `time` never goes backwards (modulo `u32`
/// wraparound) between calls to [Behavior::next], except across a
/// [Behavior::resume].
pub trait Behavior: Debug {
    /// Run one control cycle at `time` (in microseconds) and return the
    /// output level
    fn next(&mut self, time: u32, input: ModeInput) -> u8;
    /// Called before the first [Behavior::next] after the mode has been
    /// inactive.  Time references are shifted to `time` so that the mode
    /// continues exactly where it was left.
    fn resume(&mut self, time: u32);
    /// Like [Behavior::next], but runs over an iterator of `(time, input)`
    /// pairs and returns an iterator over the outputs
    fn process<It>(&mut self, input: It) -> BehaviorIter<'_, Self, It>
    where
        It: Iterator<Item = (u32, ModeInput)>,
        Self: Sized,
    {
        BehaviorIter {
            behavior: self,
            input,
        }
    }
}

/// An iterator over a [Behavior] returned by [Behavior::process]
pub struct BehaviorIter<'a, B: Behavior, It: Iterator<Item = (u32, ModeInput)>> {
    behavior: &'a mut B,
    input: It,
}

impl<'a, B: Behavior, It: Iterator<Item = (u32, ModeInput)>> Iterator for BehaviorIter<'a, B, It> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        let (time, input) = self.input.next()?;
        Some(self.behavior.next(time, input))
    }
}
