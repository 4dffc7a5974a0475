//! Scripted register mocks for the host test suites
//!
//! Each mock records every register access and plays back a behavior
//! configured by the test: which bytes a remote device serves, where it
//! NACKs, whether the bus wedges. This is the stand-in for the real
//! chip HAL when the core runs under the host harness.

use heapless::Vec;

use boreas_hal::irq::IrqMask;
use boreas_hal::nvm::Eeprom;
use boreas_hal::pwm::{FanPwm, TachCapture, FAN_CHANNELS};
use boreas_hal::twi::{AckAction, MasterStatus, SlaveStatus, TwiMasterRegs, TwiSlaveRegs};
use boreas_hal::uart::UartRegs;

use crate::board::Board;

/// Two-wire peripheral mock covering both register halves
#[derive(Default)]
pub(crate) struct MockTwi {
    // Master-half observations
    pub baud: Option<u8>,
    pub master_enabled: bool,
    pub addresses: Vec<(u8, bool), 8>,
    pub writes: Vec<u8, 32>,
    pub stops: usize,
    pub continues: usize,

    // Master-half scripting
    pub addr_nack: bool,
    pub addr_fault: bool,
    /// 1-based index of the data byte whose acknowledge is a NACK
    pub nack_on_byte: Option<usize>,
    /// Bytes the scripted remote device serves to master reads
    pub rx_bytes: Vec<u8, 32>,
    rx_index: usize,
    /// Never raise a status flag (wedged bus)
    pub stall: bool,
    status: MasterStatus,

    // Slave-half observations
    pub slave_addr: Option<u8>,
    pub slave_enabled: bool,
    pub slave_data_out: Vec<u8, 32>,
    pub ack_actions: Vec<AckAction, 32>,
    pub responses: usize,
    pub completes: usize,

    // Slave-half scripting
    pub slave_status: SlaveStatus,
    pub slave_data_in: u8,
}

impl MockTwi {
    fn settle(&mut self, status: MasterStatus) {
        self.status = if self.stall {
            MasterStatus::default()
        } else {
            status
        };
    }

    fn rx_pending_status(&self) -> MasterStatus {
        if self.rx_index < self.rx_bytes.len() {
            // Byte ready, clock held
            MasterStatus {
                clock_hold: true,
                ..MasterStatus::default()
            }
        } else {
            // Nothing left: the scripted remote terminates the transfer
            MasterStatus {
                write_complete: true,
                ..MasterStatus::default()
            }
        }
    }
}

impl TwiMasterRegs for MockTwi {
    fn set_baud(&mut self, divisor: u8) {
        self.baud = Some(divisor);
    }

    fn enable_master(&mut self) {
        self.master_enabled = true;
    }

    fn write_address(&mut self, addr: u8, read: bool) {
        self.addresses.push((addr, read)).unwrap();

        let status = if self.addr_nack {
            MasterStatus {
                write_complete: true,
                rx_nack: true,
                ..MasterStatus::default()
            }
        } else if self.addr_fault {
            MasterStatus {
                write_complete: true,
                bus_error: true,
                ..MasterStatus::default()
            }
        } else if read {
            self.rx_pending_status()
        } else {
            MasterStatus {
                write_complete: true,
                ..MasterStatus::default()
            }
        };
        self.settle(status);
    }

    fn write_data(&mut self, byte: u8) {
        self.writes.push(byte).unwrap();

        let nacked = self.nack_on_byte == Some(self.writes.len());
        self.settle(MasterStatus {
            write_complete: true,
            rx_nack: nacked,
            ..MasterStatus::default()
        });
    }

    fn read_data(&mut self) -> u8 {
        let byte = self.rx_bytes[self.rx_index];
        self.rx_index += 1;
        byte
    }

    fn master_status(&self) -> MasterStatus {
        self.status
    }

    fn cmd_stop(&mut self) {
        self.stops += 1;
    }

    fn cmd_receive_next(&mut self) {
        self.continues += 1;
        let status = self.rx_pending_status();
        self.settle(status);
    }
}

impl TwiSlaveRegs for MockTwi {
    fn set_slave_address(&mut self, addr: u8) {
        self.slave_addr = Some(addr);
    }

    fn enable_slave(&mut self) {
        self.slave_enabled = true;
    }

    fn slave_status(&self) -> SlaveStatus {
        self.slave_status
    }

    fn slave_data(&mut self) -> u8 {
        self.slave_data_in
    }

    fn set_slave_data(&mut self, byte: u8) {
        self.slave_data_out.push(byte).unwrap();
    }

    fn set_ack_action(&mut self, action: AckAction) {
        self.ack_actions.push(action).unwrap();
    }

    fn cmd_response(&mut self) {
        self.responses += 1;
    }

    fn cmd_complete(&mut self) {
        self.completes += 1;
    }
}

/// Interrupt mask mock counting bracket entries
#[derive(Clone, Default)]
pub(crate) struct MockIrq {
    pub masked_calls: usize,
}

impl IrqMask for MockIrq {
    fn masked<R>(&mut self, f: impl FnOnce() -> R) -> R {
        self.masked_calls += 1;
        f()
    }
}

/// UART mock collecting transmitted bytes
#[derive(Default)]
pub(crate) struct MockUart {
    pub baud: Option<u32>,
    pub enabled: bool,
    pub tx: Vec<u8, 512>,
}

impl MockUart {
    pub fn tx_str(&self) -> &str {
        core::str::from_utf8(&self.tx).unwrap()
    }
}

impl UartRegs for MockUart {
    fn set_baud(&mut self, setting: u32) {
        self.baud = Some(setting);
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn tx_ready(&self) -> bool {
        true
    }

    fn write_data(&mut self, byte: u8) {
        self.tx.push(byte).unwrap();
    }
}

/// Array-backed EEPROM mock
pub(crate) struct MockEeprom {
    pub mem: [u8; 64],
    pub write_ops: usize,
}

impl Default for MockEeprom {
    fn default() -> Self {
        // Fresh parts read as erased
        Self {
            mem: [0xff; 64],
            write_ops: 0,
        }
    }
}

impl Eeprom for MockEeprom {
    fn read(&mut self, offset: usize, buf: &mut [u8]) {
        buf.copy_from_slice(&self.mem[offset..offset + buf.len()]);
    }

    fn update(&mut self, offset: usize, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            if self.mem[offset + i] != byte {
                self.mem[offset + i] = byte;
                self.write_ops += 1;
            }
        }
    }
}

/// Fan PWM mock recording compare values
#[derive(Default)]
pub(crate) struct MockPwm {
    pub enabled: bool,
    pub compares: [Option<u8>; FAN_CHANNELS],
}

impl FanPwm for MockPwm {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn set_compare(&mut self, channel: usize, value: u8) {
        self.compares[channel] = Some(value);
    }
}

/// Tachometer capture mock recording input selection
#[derive(Default)]
pub(crate) struct MockTach {
    pub enabled: bool,
    pub selected: Vec<usize, 32>,
}

impl TachCapture for MockTach {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn select_input(&mut self, channel: usize) {
        self.selected.push(channel).unwrap();
    }
}

/// Board bundle over the mocks
pub(crate) struct MockBoard;

impl Board for MockBoard {
    type Twi = MockTwi;
    type Irq = MockIrq;
    type Nvm = MockEeprom;
    type Uart = MockUart;
    type Pwm = MockPwm;
    type Tach = MockTach;
}
