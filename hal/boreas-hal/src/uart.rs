//! Serial console register abstractions
//!
//! Transmit is blocking (poll the data-register-empty flag, then
//! write); receive is interrupt-driven, with the RX vector shim handing
//! each byte to the console driver.

/// UART peripheral registers
pub trait UartRegs {
    /// Load the baud rate register
    fn set_baud(&mut self, setting: u32);

    /// Enable transmitter, receiver and the receive interrupt
    fn enable(&mut self);

    /// The transmit data register can accept a byte (DREIF)
    fn tx_ready(&self) -> bool;

    /// Write a byte to the transmit data register
    fn write_data(&mut self, byte: u8);
}
