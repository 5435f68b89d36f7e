use super::{Behavior, ModeInput};
use crate::clock::PhaseClock;
use crate::fixedmath::scale_ratio;
use crate::knob::QuantizedKnob;
use crate::{gate_to_output, PhaseFxP, PHASE_MAX};

/// A rational clock multiplication/division factor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ratio {
    /// Numerator
    pub numerator: u8,
    /// Denominator
    pub denominator: u8,
}

impl Ratio {
    /// Constructor
    pub const fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
    /// Is this ratio 1:1?
    pub const fn is_unity(&self) -> bool {
        self.numerator == self.denominator
    }
    /// The `(numerator, denominator)` that the input period has to be
    /// scaled by to get the output period.  Multiplying the clock by `n/d`
    /// divides the period by the same factor, and vice versa.
    pub const fn period_factor(&self, direction: Direction) -> (u32, u32) {
        match direction {
            Direction::Multiply => (self.denominator as u32, self.numerator as u32),
            Direction::Divide => (self.numerator as u32, self.denominator as u32),
        }
    }
    /// The number of input periods after which the input and output line
    /// up again
    pub const fn realign_every(&self, direction: Direction) -> u8 {
        match direction {
            Direction::Multiply => self.denominator,
            Direction::Divide => self.numerator,
        }
    }
}

/// The factors available at each position of the rate knob (columns), for
/// each position of the range knob (rows).  The same table serves both
/// multiplication (x n/d) and division (/ n/d).
pub const MULTIPLIERS: [[Ratio; 8]; 4] = {
    const fn r(n: u8, d: u8) -> Ratio {
        Ratio::new(n, d)
    }
    [
        [r(1, 1), r(5, 4), r(4, 3), r(3, 2), r(8, 5), r(5, 3), r(5, 2), r(12, 5)],
        [r(1, 1), r(2, 1), r(3, 1), r(4, 1), r(5, 1), r(6, 1), r(7, 1), r(8, 1)],
        [r(1, 1), r(2, 1), r(3, 1), r(4, 1), r(6, 1), r(8, 1), r(16, 1), r(32, 1)],
        [r(1, 1), r(2, 1), r(4, 1), r(8, 1), r(16, 1), r(32, 1), r(64, 1), r(128, 1)],
    ]
};

/// Whether a [DivideMultiplyMode] divides or multiplies its input clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Output runs slower than the input
    Divide,
    /// Output runs faster than the input
    Multiply,
}

/// Clock divider/multiplier.  The gate input is a clock, and the output is
/// that clock divided or multiplied by the factor picked with the rate and
/// range knobs.
///
/// Internally a follower clock runs at the estimated input period scaled by
/// the factor, and is re-synced to the input whenever the two should line
/// up.  Whole-number division is therefore exact; anything else relies on
/// the period estimate and drifts briefly if the input tempo changes or
/// swings.  The output copies the input's pulse width.
#[derive(Clone, Debug)]
pub struct DivideMultiplyMode {
    direction: Direction,
    rate: QuantizedKnob,
    range: QuantizedKnob,
    follower: PhaseClock,
    last_rising_edge: Option<u32>,
    input_period: u32,
    edges_since_sync: u8,
    prev_clock: bool,
    last_time: u32,
}

impl DivideMultiplyMode {
    /// Constructor
    pub fn new(direction: Direction, hysteresis: u16) -> Self {
        Self {
            direction,
            rate: QuantizedKnob::new(MULTIPLIERS[0].len() as u8, hysteresis),
            range: QuantizedKnob::new(MULTIPLIERS.len() as u8, hysteresis),
            follower: PhaseClock::new(0),
            last_rising_edge: None,
            input_period: 0,
            edges_since_sync: 0,
            prev_clock: false,
            last_time: 0,
        }
    }
    /// Divide or multiply?
    pub fn direction(&self) -> Direction {
        self.direction
    }
    /// The factor currently selected by the knobs
    pub fn ratio(&self) -> Ratio {
        MULTIPLIERS[self.range.index() as usize][self.rate.index() as usize]
    }
    /// The last measured period of the input clock, or 0 if it hasn't been
    /// measured yet
    pub fn input_period(&self) -> u32 {
        self.input_period
    }
    /// The follower clock that generates the output
    pub fn follower(&self) -> &PhaseClock {
        &self.follower
    }
    fn on_rising_edge(&mut self, time: u32, ratio: Ratio) {
        if let Some(last) = self.last_rising_edge {
            self.input_period = time.wrapping_sub(last);
            let (num, den) = ratio.period_factor(self.direction);
            let period = scale_ratio(self.input_period, num, den).max(1);
            self.follower.set_period(period);
            if !self.follower.is_running() {
                self.follower.start(time);
                self.edges_since_sync = 0;
            }
        }
        self.last_rising_edge = Some(time);

        if self.edges_since_sync == 0 {
            self.follower.sync(PhaseFxP::ZERO);
        }
        self.edges_since_sync = self.edges_since_sync.saturating_add(1);
        if self.edges_since_sync >= ratio.realign_every(self.direction) {
            self.edges_since_sync = 0;
        }
    }
    fn on_falling_edge(&mut self, time: u32, ratio: Ratio) {
        let Some(last) = self.last_rising_edge else {
            return;
        };
        if self.input_period == 0 {
            return;
        }
        let high = time.wrapping_sub(last) as u64;
        let width = high * PHASE_MAX as u64 / self.input_period as u64;
        let width = width.clamp(1, PHASE_MAX as u64 - 1);
        self.follower.set_duty(PhaseFxP::from_bits(width as u8));
        if ratio.is_unity() {
            self.follower.sync(self.follower.duty());
        }
    }
}

impl Behavior for DivideMultiplyMode {
    fn next(&mut self, time: u32, input: ModeInput) -> u8 {
        self.rate.update(input.rate);
        self.range.update(input.range);
        self.follower.update(time);
        self.last_time = time;

        let ratio = self.ratio();
        if input.trigger && !self.prev_clock {
            self.on_rising_edge(time, ratio);
        } else if !input.trigger && self.prev_clock {
            self.on_falling_edge(time, ratio);
        }
        self.prev_clock = input.trigger;
        gate_to_output(self.follower.state())
    }
    fn resume(&mut self, time: u32) {
        let gap = time.wrapping_sub(self.last_time);
        if let Some(last) = self.last_rising_edge.as_mut() {
            *last = last.wrapping_add(gap);
        }
        self.last_time = time;
        self.follower.resume(time);
    }
}
