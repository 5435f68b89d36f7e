//! The top level of the control core: pick a mode with the mode knob and
//! run it.

use crate::config::Config;
use crate::knob::QuantizedKnob;
use crate::modes::{Behavior, BurstMode, ClockMode, Direction, DivideMultiplyMode, ModeInput};

/// One snapshot of the front panel, taken by the caller once per control
/// cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Time of the snapshot in microseconds.  Wraps around.
    pub time: u32,
    /// Raw reading of the mode knob (PARAM 3)
    pub mode: u16,
    /// Raw reading of the rate knob/CV (PARAM 1)
    pub rate: u16,
    /// Raw reading of the range/repeats knob/CV (PARAM 2)
    pub range: u16,
    /// The GATE/TRG input
    pub gate: bool,
}

impl InputFrame {
    /// Constructor
    pub const fn new(time: u32, mode: u16, rate: u16, range: u16, gate: bool) -> Self {
        Self {
            time,
            mode,
            rate,
            range,
            gate,
        }
    }
}

impl From<&InputFrame> for ModeInput {
    fn from(frame: &InputFrame) -> Self {
        ModeInput::new(frame.rate, frame.range, frame.gate)
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
/// The positions of the mode knob
pub enum Mode {
    /// Clock divider
    #[default]
    Divide,
    /// Clock multiplier
    Multiply,
    /// Burst generator
    Burst,
    /// Clock generator
    Clock,
}

impl Mode {
    const ELEM: [Mode; 4] = [Self::Divide, Self::Multiply, Self::Burst, Self::Clock];
    /// Returns a slice to all of the possible modes, in knob order
    pub const fn modes() -> &'static [Mode] {
        &Self::ELEM
    }
    /// Provides the name of the mode
    pub const fn to_str(&self) -> &'static str {
        ["Divide", "Multiply", "Burst", "Clock"][*self as usize]
    }
    /// Try to create a Mode from a u8
    pub const fn new_from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::ELEM.len() {
            Some(Self::ELEM[value as usize])
        } else {
            None
        }
    }
}

impl From<Mode> for &'static str {
    fn from(value: Mode) -> Self {
        value.to_str()
    }
}

impl TryFrom<u8> for Mode {
    type Error = &'static str;
    fn try_from(value: u8) -> Result<Self, &'static str> {
        Self::new_from_u8(value).ok_or("Conversion of u8 to Mode Overflowed")
    }
}

/// The whole Beat Tool.
///
/// Owns one instance of every mode and runs exactly one of them per cycle.
/// Modes that aren't selected are paused rather than reset: when the mode
/// knob comes back to them they carry on from where they were left.
///
/// ```
/// use beattool::{InputFrame, ModeSelector, OUT_HIGH, RAW_MAX};
///
/// let mut tool = ModeSelector::default();
/// // Clock mode, fastest clock in the audio range
/// let frame = InputFrame::new(0, RAW_MAX, RAW_MAX, RAW_MAX, false);
/// assert_eq!(tool.next(&frame), OUT_HIGH);
/// ```
#[derive(Clone, Debug)]
pub struct ModeSelector {
    config: Config,
    mode_knob: QuantizedKnob,
    active: Option<Mode>,
    divide: DivideMultiplyMode,
    multiply: DivideMultiplyMode,
    burst: BurstMode,
    clock: ClockMode,
    last_report: u32,
}

impl ModeSelector {
    /// Create a new Beat Tool.  Settings that [Config::validate] would
    /// reject are clamped into range first.
    pub fn new(config: Config) -> Self {
        let config = config.clamped();
        let hysteresis = config.hysteresis;
        Self {
            config,
            mode_knob: QuantizedKnob::new(Mode::modes().len() as u8, hysteresis),
            active: None,
            divide: DivideMultiplyMode::new(Direction::Divide, hysteresis),
            multiply: DivideMultiplyMode::new(Direction::Multiply, hysteresis),
            burst: BurstMode::new(hysteresis),
            clock: ClockMode::new(hysteresis),
            last_report: 0,
        }
    }
    /// Create a new Beat Tool if `config` is valid, or return `None`
    /// otherwise
    pub fn maybe_create(config: Config) -> Option<Self> {
        config.validate().ok().map(|_| Self::new(config))
    }
    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }
    /// The mode selected on the last cycle (the default mode before the
    /// first cycle)
    pub fn mode(&self) -> Mode {
        self.active.unwrap_or_default()
    }
    /// The clock divider
    pub fn divide_mode(&self) -> &DivideMultiplyMode {
        &self.divide
    }
    /// The clock multiplier
    pub fn multiply_mode(&self) -> &DivideMultiplyMode {
        &self.multiply
    }
    /// The burst generator
    pub fn burst_mode(&self) -> &BurstMode {
        &self.burst
    }
    /// The clock generator
    pub fn clock_mode(&self) -> &ClockMode {
        &self.clock
    }
    fn behavior(&self, mode: Mode) -> &dyn Behavior {
        match mode {
            Mode::Divide => &self.divide,
            Mode::Multiply => &self.multiply,
            Mode::Burst => &self.burst,
            Mode::Clock => &self.clock,
        }
    }
    fn behavior_mut(&mut self, mode: Mode) -> &mut dyn Behavior {
        match mode {
            Mode::Divide => &mut self.divide,
            Mode::Multiply => &mut self.multiply,
            Mode::Burst => &mut self.burst,
            Mode::Clock => &mut self.clock,
        }
    }
    /// Run one control cycle and return the output level
    pub fn next(&mut self, frame: &InputFrame) -> u8 {
        self.mode_knob.update(frame.mode);
        let mode = Mode::new_from_u8(self.mode_knob.index()).unwrap_or_default();
        if self.active != Some(mode) {
            log::trace!("Switching to {} mode", mode.to_str());
            self.behavior_mut(mode).resume(frame.time);
            self.active = Some(mode);
        }

        let output = self.behavior_mut(mode).next(frame.time, frame.into());

        if frame.time.wrapping_sub(self.last_report) >= self.config.report_interval {
            self.last_report = frame.time;
            log::debug!(
                "{} mode, t={}, out={}: {:?}",
                mode.to_str(),
                frame.time,
                output,
                self.behavior(mode)
            );
        }
        output
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
