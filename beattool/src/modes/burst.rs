use super::{Behavior, ModeInput};
use crate::clock::PhaseClock;
use crate::curve::CurveKnob;
use crate::gate_to_output;
use crate::knob::QuantizedKnob;

/// Number of gates in a burst, selected by the repeats knob
pub const BURST_REPEAT_OPTIONS: [u8; 11] = [1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 16];

/// Time between the gates of a burst (in microseconds), swept by the rate
/// knob: 100ms to 1s
pub const BURST_RATE_CURVE: [u32; 2] = [100_000, 1_000_000];

/// Burst mode: a rising edge on the gate input fires a burst of gates.
///
/// The gates within a burst run freely at the rate set by the rate knob;
/// they aren't synchronized to anything, since the gate input is taken by
/// the trigger.  A new trigger during a burst restarts it.
#[derive(Clone, Debug)]
pub struct BurstMode {
    repeats: QuantizedKnob,
    rate: CurveKnob<'static, u32>,
    clock: PhaseClock,
    prev_trigger: bool,
    gates_sent: u8,
}

impl BurstMode {
    /// Constructor
    pub fn new(hysteresis: u16) -> Self {
        Self {
            repeats: QuantizedKnob::new(BURST_REPEAT_OPTIONS.len() as u8, hysteresis),
            rate: CurveKnob::new(&BURST_RATE_CURVE, hysteresis),
            clock: PhaseClock::new(0),
            prev_trigger: false,
            gates_sent: 0,
        }
    }
    /// The number of gates per burst currently selected
    pub fn repeats(&self) -> u8 {
        BURST_REPEAT_OPTIONS[self.repeats.index() as usize]
    }
    /// The number of gates completed so far in the current burst
    pub fn gates_sent(&self) -> u8 {
        self.gates_sent
    }
    /// The gate clock
    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }
    /// The rate knob
    pub fn rate_knob(&self) -> &CurveKnob<'static, u32> {
        &self.rate
    }
}

impl Behavior for BurstMode {
    fn next(&mut self, time: u32, input: ModeInput) -> u8 {
        self.rate.update(input.rate);
        self.repeats.update(input.range);
        self.clock.set_period(self.rate.value());
        self.clock.update(time);

        if input.trigger && !self.prev_trigger {
            self.clock.start(time);
            self.gates_sent = 0;
        }
        self.prev_trigger = input.trigger;

        if self.clock.is_falling() {
            self.gates_sent = self.gates_sent.saturating_add(1);
        }
        if self.gates_sent >= self.repeats() {
            self.clock.stop();
            self.gates_sent = 0;
        }
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

    // Middle of the bucket for BURST_REPEAT_OPTIONS[i]
    const fn repeats_raw(i: u16) -> u16 {
        let step = crate::RAW_RANGE / BURST_REPEAT_OPTIONS.len() as u16;
        i * step + step / 2
    }

    fn run_burst(mode: &mut BurstMode, input: ModeInput, from: u32, to: u32) -> (u32, u32) {
        let mut falling = 0;
        let mut last_high = from;
        let mut prev = OUT_LOW;
        for t in (from..to).step_by(1000) {
            let trigger = t == from;
            let out = mode.next(t, ModeInput { trigger, ..input });
            if prev == OUT_HIGH && out == OUT_LOW {
                falling += 1;
            }
            if out == OUT_HIGH {
                last_high = t;
            }
            prev = out;
        }
        (falling, last_high)
    }

    #[test]
    fn four_gates_then_idle() {
        let mut mode = BurstMode::new(5);
        let input = ModeInput::new(0, repeats_raw(3), false);
        mode.next(0, input);
        assert_eq!(mode.repeats(), 4);
        assert!(!mode.clock().is_running());
        let (falling, last_high) = run_burst(&mut mode, input, 1000, 2_000_000);
        assert_eq!(falling, 4);
        // 100ms gates: the fourth gate starts 300ms after the trigger
        assert_eq!(last_high, 1000 + 300_000 + 49_000);
        assert!(!mode.clock().is_running());
        assert_eq!(mode.gates_sent(), 0);
        for t in (2_000_000..3_000_000).step_by(1000) {
            assert_eq!(mode.next(t, input), OUT_LOW);
        }
    }
    #[test]
    fn every_repeat_option() {
        for (i, &count) in BURST_REPEAT_OPTIONS.iter().enumerate() {
            let mut mode = BurstMode::new(5);
            let input = ModeInput::new(0, repeats_raw(i as u16), false);
            mode.next(0, input);
            assert_eq!(mode.repeats(), count);
            let (falling, _) = run_burst(&mut mode, input, 1000, 3_000_000);
            assert_eq!(falling, count as u32);
        }
    }
    #[test]
    fn retrigger_restarts_burst() {
        let mut mode = BurstMode::new(5);
        let input = ModeInput::new(0, repeats_raw(1), false);
        let trig = ModeInput { trigger: true, ..input };
        mode.next(0, input);
        assert_eq!(mode.next(1000, trig), OUT_HIGH);
        for t in (2000..60_000).step_by(1000) {
            mode.next(t, input);
        }
        assert_eq!(mode.gates_sent(), 1);
        let (falling, _) = run_burst(&mut mode, input, 60_000, 1_000_000);
        assert_eq!(falling, 2);
    }
    #[test]
    fn slow_rate_stretches_gates() {
        let mut mode = BurstMode::new(5);
        let input = ModeInput::new(RAW_MAX, repeats_raw(0), false);
        mode.next(0, input);
        assert_eq!(mode.clock().period(), 1_000_000);
        let (falling, last_high) = run_burst(&mut mode, input, 1000, 2_000_000);
        assert_eq!(falling, 1);
        assert_eq!(last_high, 1000 + 499_000);
    }
}
