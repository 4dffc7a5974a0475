//! Byte-addressed non-volatile memory
//!
//! Minimal EEPROM-style interface for the configuration store: flat
//! offset addressing, update-only-if-changed write semantics (to spare
//! erase cycles), no wear leveling layer.

/// EEPROM-style storage
pub trait Eeprom {
    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buf: &mut [u8]);

    /// Write `data` starting at `offset`, skipping bytes that already
    /// hold the target value
    fn update(&mut self, offset: usize, data: &[u8]);

    /// Read a single byte at `offset`
    fn read_byte(&mut self, offset: usize) -> u8 {
        let mut buf = [0u8; 1];
        self.read(offset, &mut buf);
        buf[0]
    }

    /// Update a single byte at `offset`
    fn update_byte(&mut self, offset: usize, value: u8) {
        self.update(offset, &[value]);
    }
}
