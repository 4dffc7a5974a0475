//! Master-side transaction engine
//!
//! Foreground-only, busy-polling, one transaction at a time. Each
//! protocol phase writes a register and then polls the status register
//! until the hardware reports it acted; the bus is shared, so a
//! transaction in flight is never abandoned to go do something else.
//!
//! The reference hardware never guarantees a status flag on a wedged
//! bus, so every poll loop carries a bounded budget; exhausting it
//! reports the bus as busy instead of hanging the foreground loop.

use boreas_hal::twi::{MasterStatus, TwiMasterRegs};

use crate::error::Error;

/// Default number of status polls before a phase is declared wedged
pub const DEFAULT_POLL_BUDGET: u32 = 100_000;

/// Transfer direction of a transaction or phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Write,
    Read,
}

pub(crate) struct MasterEngine {
    poll_budget: u32,
}

impl MasterEngine {
    pub(crate) const fn new(poll_budget: u32) -> Self {
        Self { poll_budget }
    }

    pub(crate) fn set_poll_budget(&mut self, poll_budget: u32) {
        self.poll_budget = poll_budget;
    }

    /// Poll until the hardware has acted on the previous request
    ///
    /// Acknowledged writes, errors and arbitration loss set the write
    /// flag; received bytes hold the clock.
    fn wait_acted<R: TwiMasterRegs>(&self, regs: &R) -> Result<MasterStatus, Error> {
        for _ in 0..self.poll_budget {
            let status = regs.master_status();
            if status.ready() {
                return Ok(status);
            }
        }

        Err(Error::Busy)
    }

    /// Address phase: put the target address and direction bit on the
    /// bus and classify the outcome
    pub(crate) fn address<R: TwiMasterRegs>(
        &self,
        regs: &mut R,
        addr: u8,
        dir: Direction,
    ) -> Result<(), Error> {
        regs.write_address(addr, dir == Direction::Read);
        let status = self.wait_acted(regs)?;

        if status.rx_nack {
            // Not acknowledged: no such device, release the bus
            regs.cmd_stop();
            return Err(Error::NoDevice);
        }
        if status.fault() {
            // Bus error or arbitration loss; the hardware has already
            // released the bus, so no stop here
            return Err(Error::Busy);
        }

        Ok(())
    }

    /// Write data phase
    ///
    /// A NACK mid-transfer stops the transaction and reports the bus
    /// busy; the count of bytes already placed on the bus is not
    /// reported back to the caller.
    pub(crate) fn write_bytes<R: TwiMasterRegs>(
        &self,
        regs: &mut R,
        data: &[u8],
    ) -> Result<usize, Error> {
        for &byte in data {
            regs.write_data(byte);
            let status = self.wait_acted(regs)?;

            if status.rx_nack {
                regs.cmd_stop();
                return Err(Error::Busy);
            }
            if status.fault() {
                return Err(Error::Busy);
            }
        }

        Ok(data.len())
    }

    /// Read data phase
    ///
    /// Each byte after the first is requested with the receive-next
    /// command; a write flag before the requested count is reached
    /// means the transaction terminated under us.
    pub(crate) fn read_bytes<R: TwiMasterRegs>(
        &self,
        regs: &mut R,
        buf: &mut [u8],
    ) -> Result<usize, Error> {
        let mut received = 0;

        while received < buf.len() {
            let status = self.wait_acted(regs)?;

            if status.write_complete {
                return Err(Error::Io);
            }

            buf[received] = regs.read_data();
            received += 1;

            if received < buf.len() {
                regs.cmd_receive_next();
            }
        }

        Ok(received)
    }

    /// Complete write transaction: address, data, stop
    pub(crate) fn send<R: TwiMasterRegs>(
        &self,
        regs: &mut R,
        addr: u8,
        data: &[u8],
    ) -> Result<usize, Error> {
        self.address(regs, addr, Direction::Write)?;
        let sent = self.write_bytes(regs, data)?;
        regs.cmd_stop();

        Ok(sent)
    }

    /// Complete read transaction: address, data, stop
    pub(crate) fn recv<R: TwiMasterRegs>(
        &self,
        regs: &mut R,
        addr: u8,
        buf: &mut [u8],
    ) -> Result<usize, Error> {
        self.address(regs, addr, Direction::Read)?;
        let received = self.read_bytes(regs, buf)?;
        regs.cmd_stop();

        Ok(received)
    }
}
