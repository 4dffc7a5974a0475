//! Fan PWM and tachometer capture abstractions
//!
//! The fan outputs are plain timer compare channels; the tachometers
//! share a single capture timer behind an input multiplexer, so only
//! one fan's pulse period is being measured at any moment. Captured
//! pulse values arrive through the capture interrupt shim.

/// Number of fan channels the board wires up
pub const FAN_CHANNELS: usize = 8;

/// PWM compare registers for the fan outputs
pub trait FanPwm {
    /// Configure the timer(s) and start PWM generation
    fn enable(&mut self);

    /// Load the compare register for one fan channel
    ///
    /// `value` is in timer counts, in `0..=period` for the configured
    /// PWM period.
    fn set_compare(&mut self, channel: usize, value: u8);
}

/// Tachometer pulse-period capture
pub trait TachCapture {
    /// Configure the capture timer and its event routing
    fn enable(&mut self);

    /// Route the given tach input to the capture timer
    fn select_input(&mut self, channel: usize);
}
