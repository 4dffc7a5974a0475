//! Peer command protocol for the Boreas fan controller
//!
//! Devices on the shared two-wire bus address each other with small
//! command packets. The format is deliberately tiny - a command id, an
//! argument length, and the arguments - because packets have to fit in
//! the slave engine's fixed receive buffer and are assembled inside an
//! interrupt handler one byte at a time.
//!
//! A command id outside the known range is an error the receiver
//! reports and drops; it is never retried.

#![no_std]
#![deny(unsafe_code)]

pub mod packet;

pub use packet::{CommandId, CommandPacket, PacketError, HEADER_SIZE, MAX_ARG_LEN};
