//! Two-wire bus register abstractions
//!
//! The peripheral is modeled as two half-independent register files:
//! the master half (address, data, status, command registers driven by
//! foreground polling code) and the slave half (address match, data and
//! response registers driven from the bus interrupt). A single hardware
//! instance usually implements both traits.

/// Bus signaling-speed class
///
/// Each mode carries a minimum bus low-period requirement that the baud
/// generator must honor when deriving the timing divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// Standard mode (up to 100 kHz)
    Standard,
    /// Fast mode (up to 400 kHz)
    Fast,
    /// Fast mode plus (up to 1 MHz)
    FastPlus,
}

/// Two-wire bus configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiConfig {
    /// Nominal SCL frequency in Hz
    pub frequency: u32,
    /// Signaling mode
    pub mode: BusMode,
}

impl Default for TwiConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TwiConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        mode: BusMode::Standard,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        mode: BusMode::Fast,
    };

    /// Fast mode plus (1 MHz)
    pub const FAST_PLUS: Self = Self {
        frequency: 1_000_000,
        mode: BusMode::FastPlus,
    };
}

/// Snapshot of the master-half status register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MasterStatus {
    /// The hardware has acted on the previous request (WIF)
    pub write_complete: bool,
    /// A received byte is ready and the bus clock is held (CLKHOLD)
    pub clock_hold: bool,
    /// The last address or data byte was not acknowledged (RXACK)
    pub rx_nack: bool,
    /// Illegal bus condition detected
    pub bus_error: bool,
    /// Another master won arbitration
    pub arb_lost: bool,
}

impl MasterStatus {
    /// The peripheral has something for the poll loop to look at
    pub fn ready(&self) -> bool {
        self.write_complete || self.clock_hold
    }

    /// Bus error or arbitration loss
    pub fn fault(&self) -> bool {
        self.bus_error || self.arb_lost
    }
}

/// Snapshot of the slave-half status register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlaveStatus {
    /// A data byte needs handling (DIF)
    pub data_pending: bool,
    /// Transfer direction: true when the remote master is reading from
    /// us, false when it is writing to us (DIR)
    pub master_read: bool,
    /// An address match or stop condition needs handling (APIF)
    pub addr_or_stop: bool,
    /// The pending condition is an address match; otherwise it is a
    /// stop or collision (AP)
    pub address_match: bool,
}

/// Acknowledge action latched for the next slave response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckAction {
    Ack,
    Nack,
}

/// Master half of the two-wire peripheral
///
/// Write-then-poll semantics: each command register write is followed
/// by polling [`master_status`](Self::master_status) until the hardware
/// reports it has acted.
pub trait TwiMasterRegs {
    /// Load the baud divisor register
    fn set_baud(&mut self, divisor: u8);

    /// Force the bus state machine to idle and enable the master half
    fn enable_master(&mut self);

    /// Start (or repeated-start) a transaction: write the 7-bit target
    /// address and the direction bit
    fn write_address(&mut self, addr: u8, read: bool);

    /// Place the next data byte on the bus
    fn write_data(&mut self, byte: u8);

    /// Take the received byte out of the data register
    fn read_data(&mut self) -> u8;

    /// Read the status register
    fn master_status(&self) -> MasterStatus;

    /// Issue a stop condition
    fn cmd_stop(&mut self);

    /// Acknowledge the current byte and clock in the next one
    fn cmd_receive_next(&mut self);
}

/// Slave half of the two-wire peripheral
///
/// Entirely interrupt-driven: the hardware raises the bus interrupt for
/// data and address/stop conditions, and the handler answers through
/// the response commands while the bus clock is held.
pub trait TwiSlaveRegs {
    /// Set the 7-bit address the slave half answers to
    fn set_slave_address(&mut self, addr: u8);

    /// Enable the slave half and its data and address/stop interrupts
    fn enable_slave(&mut self);

    /// Read the status register
    fn slave_status(&self) -> SlaveStatus;

    /// Take the byte the remote master wrote out of the data register
    fn slave_data(&mut self) -> u8;

    /// Present a byte for the remote master to read
    fn set_slave_data(&mut self, byte: u8);

    /// Latch the acknowledge action for the next response
    fn set_ack_action(&mut self, action: AckAction);

    /// Continue the transaction, releasing the held clock
    fn cmd_response(&mut self);

    /// Mark the transaction complete
    fn cmd_complete(&mut self);
}
