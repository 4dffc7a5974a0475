//! Error taxonomy shared across the firmware core
//!
//! Every bus operation returns one of these by value; nothing in this
//! crate treats an error as fatal. The interrupt context never returns
//! an error at all - a buffer underflow or overflow inside the slave
//! handler is converted straight into a NACK on the bus.

/// Firmware-wide error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The address phase went unacknowledged; no such peer on the bus
    NoDevice,
    /// Bus error, arbitration loss, a mid-transfer NACK, or a wedged
    /// bus that exhausted its poll budget
    Busy,
    /// Unexpected transaction termination during a read
    Io,
    /// Ring buffer underflow
    NoData,
    /// Ring buffer overflow
    NoMemory,
    /// Malformed or missing argument
    InvalidArgument,
    /// No such entry
    NotFound,
}

impl Error {
    /// Human-readable description, used by the shell
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::NoDevice => "No such device",
            Error::Busy => "Device or resource busy",
            Error::Io => "I/O error",
            Error::NoData => "No data available",
            Error::NoMemory => "Out of memory",
            Error::InvalidArgument => "Invalid argument",
            Error::NotFound => "No such entry",
        }
    }
}
