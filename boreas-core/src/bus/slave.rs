//! Interrupt-driven slave responder
//!
//! Runs entirely inside the bus interrupt, with the remote master's
//! clock held until we answer - so everything here is O(1) buffer work
//! and register writes, nothing that can wait. The engine keeps no
//! protocol state of its own between invocations; everything lives in
//! the two ring buffers and the hardware's status bits.

use boreas_hal::twi::{AckAction, TwiSlaveRegs};

use super::ringbuf::RingBuffer;
use super::SLAVE_BUFFER_CAPACITY;

pub(crate) struct SlaveEngine {
    /// Foreground produces, interrupt consumes
    pub(crate) tx: RingBuffer<SLAVE_BUFFER_CAPACITY>,
    /// Interrupt produces, foreground consumes
    pub(crate) rx: RingBuffer<SLAVE_BUFFER_CAPACITY>,
}

impl SlaveEngine {
    pub(crate) const fn new() -> Self {
        Self {
            tx: RingBuffer::new(),
            rx: RingBuffer::new(),
        }
    }

    /// Interrupt handler body
    pub(crate) fn on_interrupt<R: TwiSlaveRegs>(&mut self, regs: &mut R) {
        let status = regs.slave_status();

        if status.data_pending {
            let result = if status.master_read {
                // Remote master reads from us: serve the next queued byte
                match self.tx.read() {
                    Ok(byte) => {
                        regs.set_slave_data(byte);
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            } else {
                // Remote master writes to us: queue the received byte
                self.rx.write(regs.slave_data())
            };

            if result.is_err() {
                // Underflow/overflow becomes a NACK on the bus; the
                // error never leaves the interrupt context
                regs.set_ack_action(AckAction::Nack);
            }

            regs.cmd_response();
        }

        if status.addr_or_stop {
            if status.address_match {
                regs.set_ack_action(AckAction::Ack);
                regs.cmd_response();
            } else {
                // Stop or collision: refuse and close out
                regs.set_ack_action(AckAction::Nack);
                regs.cmd_complete();
            }
        }
    }
}
