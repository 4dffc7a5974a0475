//! Bus baud-rate generation
//!
//! Derives the timing divisor from the nominal bus frequency and the
//! signaling mode. The mode's minimum low-period constraint is checked
//! against a fixed-point (x1e7) estimate of the low-period fraction to
//! keep the whole computation in integer arithmetic; the rise-time and
//! offset terms of the full datasheet equation are dropped as they are
//! below the divisor register's resolution.

use boreas_hal::twi::BusMode;

/// Minimum scaled low-period for a mode (x1e7, last two digits dropped)
fn low_period_floor(mode: BusMode) -> u64 {
    match mode {
        BusMode::Standard => 47,
        BusMode::Fast => 13,
        BusMode::FastPlus => 5,
    }
}

/// Compute the baud divisor for `nominal_hz` on a bus clocked at
/// `bus_clock_hz`
///
/// Pure and deterministic. `nominal_hz` must be nonzero. The result is
/// truncated to the divisor register's width.
pub fn compute_baud(nominal_hz: u32, mode: BusMode, bus_clock_hz: u32) -> u8 {
    let clk = bus_clock_hz as u64;

    let mut base = (clk / nominal_hz as u64).saturating_sub(10);

    let low_scaled = ((base + 5) * 10_000_000) / clk;

    if low_scaled < low_period_floor(mode) {
        // The requested rate would undershoot the mode's minimum low
        // period; recompute the divisor from the floor instead
        base = ((clk * low_period_floor(mode)) / 10_000_000).saturating_sub(5);
    }

    base as u8
}
