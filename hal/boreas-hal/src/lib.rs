//! Boreas Hardware Abstraction Layer
//!
//! This crate defines the register-level traits the board-agnostic core
//! is written against. A chip-specific HAL implements them over the
//! actual memory-mapped peripherals; the test suites implement them
//! over scripted mocks, which is what makes the whole bus driver
//! testable on the host.
//!
//! # Traits
//!
//! - [`twi::TwiMasterRegs`], [`twi::TwiSlaveRegs`] - Two-wire bus peripheral
//! - [`irq::IrqMask`] - Scoped interrupt masking
//! - [`uart::UartRegs`] - Serial console peripheral
//! - [`nvm::Eeprom`] - Byte-addressed non-volatile memory
//! - [`pwm::FanPwm`], [`pwm::TachCapture`] - Fan PWM outputs and
//!   tachometer capture

#![no_std]
#![deny(unsafe_code)]

pub mod irq;
pub mod nvm;
pub mod pwm;
pub mod twi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use irq::IrqMask;
pub use nvm::Eeprom;
pub use pwm::{FanPwm, TachCapture};
pub use twi::{TwiMasterRegs, TwiSlaveRegs};
pub use uart::UartRegs;
