use super::{Behavior, ModeInput};
use crate::clock::PhaseClock;
use crate::curve::CurveKnob;
use crate::knob::QuantizedKnob;
use crate::{gate_to_output, PhaseFxP};

/// Clock periods (in microseconds) swept by the rate knob, one curve per
/// position of the range knob.  Each curve is a rough exponential through
/// three breakpoints.
pub const CLOCK_RATE_CURVES: [[u32; 3]; 5] = [
    // LFO range: 10s to 1s
    [10_000_000, 3_000_000, 1_000_000],
    // Slow tempos: 30 to 90 bpm
    [2_000_000, 1_000_000, 666_000],
    // Musical tempos: 60 to 180 bpm
    [1_000_000, 600_000, 333_000],
    // Fast tempos: 180 to 360 bpm
    [333_000, 250_000, 166_000],
    // Audible range: 4Hz to 1kHz
    [250_000, 2_273, 1_000],
];

/// Clock mode: a free-running square wave whose rate is set by the rate
/// knob within the range selected by the range knob.  A rising edge on the
/// gate input restarts the cycle.
#[derive(Clone, Debug)]
pub struct ClockMode {
    rate: CurveKnob<'static, u32>,
    range: QuantizedKnob,
    clock: PhaseClock,
    prev_sync: bool,
}

impl ClockMode {
    /// Constructor
    pub fn new(hysteresis: u16) -> Self {
        Self {
            rate: CurveKnob::new(&CLOCK_RATE_CURVES[0], hysteresis),
            range: QuantizedKnob::new(CLOCK_RATE_CURVES.len() as u8, hysteresis),
            clock: PhaseClock::new(0),
            prev_sync: false,
        }
    }
    /// The generated clock
    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }
    /// The rate knob
    pub fn rate_knob(&self) -> &CurveKnob<'static, u32> {
        &self.rate
    }
    /// The range knob
    pub fn range_knob(&self) -> &QuantizedKnob {
        &self.range
    }
}

impl Behavior for ClockMode {
    fn next(&mut self, time: u32, input: ModeInput) -> u8 {
        self.rate.update(input.rate);
        self.range.update(input.range);
        self.rate
            .set_curve(&CLOCK_RATE_CURVES[self.range.index() as usize]);
        self.clock.set_period(self.rate.value());
        if !self.clock.is_running() {
            self.clock.start(time);
        }
        self.clock.update(time);
        if input.trigger && !self.prev_sync {
            self.clock.sync(PhaseFxP::ZERO);
        }
        self.prev_sync = input.trigger;
        gate_to_output(self.clock.state())
    }
    fn resume(&mut self, time: u32) {
        self.clock.resume(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OUT_HIGH, OUT_LOW, RAW_MAX};

    // fast tempo range, rate knob all the way up: 166ms period
    const FAST: ModeInput = ModeInput::new(RAW_MAX, 3 * 205 + 100, false);

    #[test]
    fn range_selects_curve() {
        let mut mode = ClockMode::new(5);
        mode.next(0, ModeInput::new(0, 0, false));
        assert_eq!(mode.clock().period(), 10_000_000);
        mode.next(1000, ModeInput::new(RAW_MAX, RAW_MAX, false));
        assert_eq!(mode.range_knob().index(), 4);
        assert_eq!(mode.clock().period(), 1_000);
        mode.next(2000, FAST);
        assert_eq!(mode.range_knob().index(), 3);
        assert_eq!(mode.clock().period(), 166_000);
    }
    #[test]
    fn free_running_square_wave() {
        let mut mode = ClockMode::new(5);
        let outputs = mode.process((0..166_000u32).step_by(1000).map(|t| (t, FAST)));
        for (i, out) in outputs.enumerate() {
            let t = i as u32 * 1000;
            let expected = if t < 83_000 { OUT_HIGH } else { OUT_LOW };
            assert_eq!(out, expected, "t={t}");
        }
        assert_eq!(mode.next(166_000, FAST), OUT_HIGH);
    }
    #[test]
    fn trigger_resyncs() {
        let mut mode = ClockMode::new(5);
        for t in (0..=100_000).step_by(1000) {
            mode.next(t, FAST);
        }
        assert_eq!(mode.next(101_000, FAST), OUT_LOW);
        let trig = ModeInput { trigger: true, ..FAST };
        assert_eq!(mode.next(102_000, trig), OUT_HIGH);
        assert_eq!(mode.clock().phase(), PhaseFxP::ZERO);
        // holding the trigger high doesn't keep resetting the clock
        for t in (103_000..185_000).step_by(1000) {
            assert_eq!(mode.next(t, trig), OUT_HIGH, "t={t}");
        }
        assert_eq!(mode.next(185_000, trig), OUT_LOW);
    }
}
