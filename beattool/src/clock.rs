//! A phase accumulator clock.
//!
//! The clock never integrates time itself; instead every call to
//! [PhaseClock::update] derives the phase from the time elapsed since the
//! last rising edge.  That keeps the phase exact no matter how irregular the
//! control loop is, as long as the loop runs often enough not to miss edges.
//!
//! All time arithmetic wraps, so a free-running microsecond counter that
//! overflows is handled correctly provided no single measured interval is
//! longer than `u32::MAX` microseconds.

use crate::{PhaseFxP, PHASE_MAX};

/// A square wave with a variable period, pulse width and sync.
#[derive(Clone, Debug)]
pub struct PhaseClock {
    period: u32,
    duty: PhaseFxP,
    phase: PhaseFxP,
    running: bool,
    prev_state: bool,
    last_rising_edge: u32,
    last_time: u32,
}

impl PhaseClock {
    /// The default pulse width, half of the period
    pub const DEFAULT_DUTY: PhaseFxP = PhaseFxP::lit("0.5");

    /// Create a stopped clock with the given period (in microseconds, 0 to
    /// disable the clock) and a 50% duty cycle
    pub const fn new(period: u32) -> Self {
        Self {
            period,
            duty: Self::DEFAULT_DUTY,
            phase: PhaseFxP::ZERO,
            running: false,
            prev_state: false,
            last_rising_edge: 0,
            last_time: 0,
        }
    }
    /// The period, in microseconds
    pub const fn period(&self) -> u32 {
        self.period
    }
    /// Set the period, in microseconds.  A period of 0 freezes the clock.
    pub fn set_period(&mut self, period: u32) {
        self.period = period;
    }
    /// The phase below which the output is high
    pub const fn duty(&self) -> PhaseFxP {
        self.duty
    }
    /// Set the pulse width
    pub fn set_duty(&mut self, duty: PhaseFxP) {
        self.duty = duty;
    }
    /// The current phase within the period
    pub const fn phase(&self) -> PhaseFxP {
        self.phase
    }
    /// Is the clock running?
    pub const fn is_running(&self) -> bool {
        self.running
    }
    /// The current output of the clock.  A stopped or disabled clock is
    /// always low.
    pub const fn state(&self) -> bool {
        self.running && self.period != 0 && self.phase.to_bits() < self.duty.to_bits()
    }
    /// True if the output went from low to high on the last update
    pub const fn is_rising(&self) -> bool {
        !self.prev_state && self.state()
    }
    /// True if the output went from high to low on the last update
    pub const fn is_falling(&self) -> bool {
        self.prev_state && !self.state()
    }
    /// Start (or restart) the clock at the beginning of its period, with
    /// the start of the period aligned to `now`
    pub fn start(&mut self, now: u32) {
        self.running = true;
        self.prev_state = false;
        self.phase = PhaseFxP::ZERO;
        self.last_time = now;
        self.last_rising_edge = now;
    }
    /// Stop the clock.  The output goes (and stays) low.
    pub fn stop(&mut self) {
        self.running = false;
        self.prev_state = false;
        self.phase = PhaseFxP::ZERO;
    }
    /// Jump to `phase`, relative to the last time the clock was updated.
    /// Does nothing if the clock is stopped.
    ///
    /// A following update at the same time reports exactly `phase` as long
    /// as the period is at least [PHASE_MAX] microseconds.  Shorter periods
    /// can't resolve every phase unit, and the update lands on the first
    /// representable phase after `phase`.
    pub fn sync(&mut self, phase: PhaseFxP) {
        if !self.running {
            return;
        }
        self.phase = phase;
        // Round the offset up so that a following update() at the same time
        // never lands short of `phase`
        let offset =
            (phase.to_bits() as u64 * self.period as u64 + (PHASE_MAX as u64 - 1)) / PHASE_MAX as u64;
        self.last_rising_edge = self.last_time.wrapping_sub(offset as u32);
    }
    /// Advance the clock to `time`.  Does nothing if the clock is stopped or
    /// the period is 0.
    pub fn update(&mut self, time: u32) {
        if !self.running || self.period == 0 {
            return;
        }
        self.prev_state = self.state();
        self.last_time = time;
        let elapsed = time.wrapping_sub(self.last_rising_edge) % self.period;
        let phase = ((elapsed as u64) << PhaseFxP::FRAC_NBITS) / self.period as u64;
        self.phase = PhaseFxP::from_bits(phase as u8);
        if self.is_rising() {
            self.last_rising_edge = time;
        }
    }
    /// Pick up where the clock left off after not being updated for a
    /// while: the time between the last update and `now` is skipped, so the
    /// phase is the same as it was when the clock was last updated.
    pub fn resume(&mut self, now: u32) {
        if !self.running {
            return;
        }
        let gap = now.wrapping_sub(self.last_time);
        self.last_rising_edge = self.last_rising_edge.wrapping_add(gap);
        self.last_time = now;
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new(0)
    }
}
