//! Board-agnostic core logic for the Boreas fan controller firmware
//!
//! This crate contains everything that does not touch a real register:
//!
//! - Two-wire bus controller: master engine, interrupt-driven slave
//!   engine, baud generation and the shared ring buffers
//! - Serial console driver (same interrupt-safe buffer contract as the
//!   bus slave, without the protocol state machine)
//! - Persisted configuration store
//! - Fan PWM control and tachometer bookkeeping
//! - Line-oriented command shell
//! - System wiring: boot sequence and the cooperative foreground loop
//!
//! All hardware access goes through the `boreas-hal` traits, so the
//! whole crate runs under the host test harness with mock registers.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod board;
pub mod bus;
pub mod console;
pub mod error;
pub mod fan;
pub mod shell;
pub mod store;
pub mod system;

#[cfg(test)]
pub(crate) mod mock;

pub use error::Error;
