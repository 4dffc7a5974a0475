//! Serial console driver
//!
//! Receive follows the same interrupt-safe contract as the bus slave
//! engine: the RX interrupt produces single bytes into a ring buffer,
//! the foreground drains it in bulk under the interrupt mask. There is
//! no protocol state machine here - the console is a plain byte pipe
//! for the shell.
//!
//! Transmit is blocking on the data-register-empty flag; the flag is
//! raised by local hardware, not a shared bus, so it cannot wedge the
//! way a bus transaction can.

use core::fmt;

use boreas_hal::irq::IrqMask;
use boreas_hal::uart::UartRegs;

use crate::bus::RingBuffer;

/// Receive ring capacity
pub const RX_CAPACITY: usize = 64;

/// Baud register setting for `baud` on a peripheral clocked at
/// `clock_hz`
///
/// Folded form of `(64 * clk) / (16 * baud) + 0.5`, kept in integer
/// arithmetic.
pub fn baud_setting(clock_hz: u32, baud: u32) -> u32 {
    (((8 * clock_hz as u64) + baud as u64) / (2 * baud as u64)) as u32
}

/// Console driver over a UART peripheral
pub struct Console<U, I> {
    pub(crate) regs: U,
    irq: I,
    rx: RingBuffer<RX_CAPACITY>,
}

impl<U, I> Console<U, I>
where
    U: UartRegs,
    I: IrqMask,
{
    pub fn new(regs: U, irq: I) -> Self {
        Self {
            regs,
            irq,
            rx: RingBuffer::new(),
        }
    }

    /// Program the baud rate and enable the peripheral
    pub fn init(&mut self, clock_hz: u32, baud: u32) {
        self.regs.set_baud(baud_setting(clock_hz, baud));
        self.regs.enable();
    }

    /// RX interrupt body: queue one received byte
    ///
    /// On overflow the oldest byte is dropped in favor of the new one,
    /// so the tail of an over-long line is what survives.
    pub fn on_rx_interrupt(&mut self, byte: u8) {
        if self.rx.write(byte).is_err() {
            let _ = self.rx.read();
            let _ = self.rx.write(byte);
        }
    }

    /// Drain received bytes into `buf`, returning the count available
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let Self { irq, rx, .. } = self;

        irq.masked(|| {
            let mut count = 0;
            while count < buf.len() {
                match rx.read() {
                    Ok(byte) => {
                        buf[count] = byte;
                        count += 1;
                    }
                    Err(_) => break,
                }
            }
            count
        })
    }

    /// Blocking transmit
    pub fn write(&mut self, data: &[u8]) {
        for &byte in data {
            while !self.regs.tx_ready() {}
            self.regs.write_data(byte);
        }
    }
}

impl<U, I> fmt::Write for Console<U, I>
where
    U: UartRegs,
    I: IrqMask,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s.as_bytes());
        Ok(())
    }
}
