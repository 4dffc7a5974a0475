//! Fan PWM control and tachometer bookkeeping
//!
//! Eight fans, each driven by a timer compare channel at a fixed PWM
//! period. The tachometers share one capture timer behind an input
//! multiplexer: the capture interrupt records the pulse period of the
//! currently selected fan, and a slow foreground tick walks the mux
//! across all eight inputs, leaving settle time between switches.

use boreas_hal::pwm::{FanPwm, TachCapture, FAN_CHANNELS};

use crate::error::Error;

/// PWM period in timer counts
pub const PWM_PERIOD: u8 = 9;

/// Foreground ticks between mux switches, so the capture timer settles
/// on the new input before its value is trusted
const TACH_SETTLE_TICKS: u32 = 10_000;

/// How far below the expected RPM a fan may run before it is flagged
const RPM_SLACK: u32 = 1500;

/// Fan speed setting
///
/// Duty cycles and the RPM each should produce come from the fan's
/// datasheet curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Off,
    #[default]
    Low,
    Medium,
    Max,
}

impl Speed {
    /// PWM duty cycle in percent
    pub fn duty_percent(self) -> u8 {
        match self {
            Speed::Off => 0,
            Speed::Low => 40,
            Speed::Medium => 70,
            Speed::Max => 100,
        }
    }

    /// RPM the fan should reach at this setting
    pub fn expected_rpm(self) -> u32 {
        match self {
            Speed::Off => 0,
            Speed::Low => 3500,
            Speed::Medium => 8000,
            Speed::Max => 13_100,
        }
    }

    /// Name as entered and printed at the shell
    pub fn name(self) -> &'static str {
        match self {
            Speed::Off => "off",
            Speed::Low => "low",
            Speed::Medium => "medium",
            Speed::Max => "max",
        }
    }

    /// Parse a speed name as entered at the shell
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(Speed::Off),
            "low" => Some(Speed::Low),
            "medium" => Some(Speed::Medium),
            "max" => Some(Speed::Max),
            _ => None,
        }
    }
}

/// A fan running under-speed for its setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnderSpeed {
    pub rpm: u32,
    pub expected: u32,
}

/// The eight-channel fan bank
pub struct FanBank<P, T> {
    pub(crate) pwm: P,
    pub(crate) tach: T,
    speeds: [Speed; FAN_CHANNELS],
    rpm: [u32; FAN_CHANNELS],
    active_input: usize,
    ticks: u32,
}

impl<P, T> FanBank<P, T>
where
    P: FanPwm,
    T: TachCapture,
{
    /// Create a bank with every fan at the default setting
    pub fn new(pwm: P, tach: T) -> Self {
        Self {
            pwm,
            tach,
            speeds: [Speed::default(); FAN_CHANNELS],
            rpm: [0; FAN_CHANNELS],
            active_input: 0,
            ticks: 0,
        }
    }

    /// Start PWM generation and tach capture
    pub fn init(&mut self) {
        self.tach.enable();
        self.pwm.enable();

        for fan in 0..FAN_CHANNELS {
            self.pwm.set_compare(fan, duty_compare(self.speeds[fan]));
        }
        self.tach.select_input(self.active_input);
    }

    /// Set one fan's speed
    pub fn set_speed(&mut self, fan: usize, speed: Speed) -> Result<(), Error> {
        if fan >= FAN_CHANNELS {
            return Err(Error::InvalidArgument);
        }

        self.speeds[fan] = speed;
        self.pwm.set_compare(fan, duty_compare(speed));

        Ok(())
    }

    /// Configured speed of one fan
    pub fn speed(&self, fan: usize) -> Option<Speed> {
        self.speeds.get(fan).copied()
    }

    /// Last measured RPM of one fan
    pub fn rpm(&self, fan: usize) -> u32 {
        self.rpm.get(fan).copied().unwrap_or(0)
    }

    /// Capture interrupt body: convert the pulse period of the
    /// currently selected input to RPM
    ///
    /// The capture timer counts at 5 MHz and the tach signal pulses
    /// twice per revolution.
    pub fn on_capture(&mut self, pulse: u16) {
        if pulse == 0 {
            // No edge captured since the mux switched
            return;
        }

        self.rpm[self.active_input] = (1_000_000_000 / (pulse as u32 * 200 * 2)) * 60;
    }

    /// Foreground tick: rotate the capture mux across the tach inputs
    /// once the settle interval has elapsed
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks < TACH_SETTLE_TICKS {
            return;
        }
        self.ticks = 0;

        self.active_input = (self.active_input + 1) % FAN_CHANNELS;
        self.tach.select_input(self.active_input);
    }

    /// Flag a fan that runs well below what its setting calls for
    pub fn check_speed(&self, fan: usize) -> Option<UnderSpeed> {
        let expected = self.speeds.get(fan)?.expected_rpm();
        let rpm = self.rpm[fan];

        if rpm + RPM_SLACK < expected {
            Some(UnderSpeed { rpm, expected })
        } else {
            None
        }
    }
}

fn duty_compare(speed: Speed) -> u8 {
    (PWM_PERIOD as u16 * speed.duty_percent() as u16 / 100) as u8
}
