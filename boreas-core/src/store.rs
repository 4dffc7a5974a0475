//! Persisted configuration store
//!
//! A flat configuration struct mirrored byte-for-byte into EEPROM at
//! fixed field offsets, behind a single valid-marker byte. A fresh
//! part (marker absent) runs on compiled-in defaults until the first
//! update writes through and sets the marker. Reads are served from the
//! RAM mirror; only updates touch the EEPROM.

use boreas_hal::nvm::Eeprom;

const MARKER_OFFSET: usize = 0;
const MARKER_VALID: u8 = 0x1;
/// Config fields start right after the marker
const DATA_OFFSET: usize = 1;

const SLAVE_ADDR_OFFSET: usize = 0;
const TEMP_ADDR_OFFSET: usize = 1;

/// Default bus address we answer to as a slave
pub const DEFAULT_SLAVE_ADDR: u8 = 9;
/// Default bus address of the temperature peer
pub const DEFAULT_TEMP_ADDR: u8 = 5;

/// Configuration store over an EEPROM-style backend
pub struct Store<E> {
    nvm: E,
    twi_slave_addr: u8,
    twi_temp_addr: u8,
}

impl<E: Eeprom> Store<E> {
    /// Create a store holding the defaults; call [`load`](Self::load)
    /// to pick up persisted values
    pub fn new(nvm: E) -> Self {
        Self {
            nvm,
            twi_slave_addr: DEFAULT_SLAVE_ADDR,
            twi_temp_addr: DEFAULT_TEMP_ADDR,
        }
    }

    /// Read the persisted configuration, if any was ever saved
    pub fn load(&mut self) {
        if self.nvm.read_byte(MARKER_OFFSET) != MARKER_VALID {
            return;
        }

        self.twi_slave_addr = self.nvm.read_byte(DATA_OFFSET + SLAVE_ADDR_OFFSET);
        self.twi_temp_addr = self.nvm.read_byte(DATA_OFFSET + TEMP_ADDR_OFFSET);
    }

    /// Bus address we answer to as a slave
    pub fn twi_slave_addr(&self) -> u8 {
        self.twi_slave_addr
    }

    /// Bus address of the temperature peer
    pub fn twi_temp_addr(&self) -> u8 {
        self.twi_temp_addr
    }

    /// Update and persist the slave address
    pub fn set_twi_slave_addr(&mut self, addr: u8) {
        self.twi_slave_addr = addr;
        self.persist(SLAVE_ADDR_OFFSET, addr);
    }

    /// Update and persist the temperature peer address
    pub fn set_twi_temp_addr(&mut self, addr: u8) {
        self.twi_temp_addr = addr;
        self.persist(TEMP_ADDR_OFFSET, addr);
    }

    fn persist(&mut self, field_offset: usize, value: u8) {
        self.nvm.update_byte(DATA_OFFSET + field_offset, value);
        self.nvm.update_byte(MARKER_OFFSET, MARKER_VALID);
    }
}
