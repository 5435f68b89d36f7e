//! Tunables for the control core.

use crate::RAW_RANGE;

/// Configuration shared by every mode of a [crate::ModeSelector]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Hysteresis margin for all knobs, in raw ADC units
    pub hysteresis: u16,
    /// Interval between diagnostic snapshots, in microseconds
    pub report_interval: u32,
}

impl Config {
    /// Default hysteresis margin
    pub const DEFAULT_HYSTERESIS: u16 = 5;
    /// Default diagnostic snapshot interval (0.5s)
    pub const DEFAULT_REPORT_INTERVAL: u32 = 500_000;
    /// The largest hysteresis margin accepted by [Config::maybe_create]:
    /// half the width of the narrowest bucket of any 16-position knob
    pub const MAX_HYSTERESIS: u16 = RAW_RANGE / 16 / 2;

    /// Create the default configuration
    pub const fn new() -> Self {
        Self {
            hysteresis: Self::DEFAULT_HYSTERESIS,
            report_interval: Self::DEFAULT_REPORT_INTERVAL,
        }
    }
    /// Replace the hysteresis margin
    pub const fn with_hysteresis(self, hysteresis: u16) -> Self {
        Self { hysteresis, ..self }
    }
    /// Replace the diagnostic snapshot interval
    pub const fn with_report_interval(self, report_interval: u32) -> Self {
        Self {
            report_interval,
            ..self
        }
    }
    /// Check that the configuration is usable
    pub const fn validate(&self) -> Result<(), &'static str> {
        if self.hysteresis > Self::MAX_HYSTERESIS {
            Err("Hysteresis is wider than half a knob bucket")
        } else if self.report_interval == 0 {
            Err("Report interval must be non-zero")
        } else {
            Ok(())
        }
    }
    /// Pull every setting into the range accepted by [Config::validate]
    pub const fn clamped(self) -> Self {
        let hysteresis = if self.hysteresis > Self::MAX_HYSTERESIS {
            Self::MAX_HYSTERESIS
        } else {
            self.hysteresis
        };
        let report_interval = if self.report_interval == 0 {
            1
        } else {
            self.report_interval
        };
        Self {
            hysteresis,
            report_interval,
        }
    }
    /// Create a configuration if the values provided are valid, or return
    /// `None` otherwise
    pub fn maybe_create(hysteresis: u16, report_interval: u32) -> Option<Self> {
        let config = Self::new()
            .with_hysteresis(hysteresis)
            .with_report_interval(report_interval);
        config.validate().ok().map(|_| config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.hysteresis, 5);
        assert_eq!(config.report_interval, 500_000);
        assert!(config.validate().is_ok());
    }
    #[test]
    fn maybe_create_validates() {
        assert_eq!(
            Config::maybe_create(10, 1000),
            Some(Config::new().with_hysteresis(10).with_report_interval(1000))
        );
        assert_eq!(Config::maybe_create(Config::MAX_HYSTERESIS + 1, 1000), None);
        assert_eq!(Config::maybe_create(5, 0), None);
    }
    #[test]
    fn clamped_is_valid() {
        let config = Config::new().with_hysteresis(u16::MAX).with_report_interval(0);
        assert!(config.validate().is_err());
        let config = config.clamped();
        assert!(config.validate().is_ok());
        assert_eq!(config.hysteresis, Config::MAX_HYSTERESIS);
        assert_eq!(config.report_interval, 1);
        assert_eq!(Config::default().clamped(), Config::default());
    }
}
