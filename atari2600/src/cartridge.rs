use std::error;
use std::fmt;
use ya6502::memory::{Memory, Read, ReadResult, Write, WriteResult};

/// A cartridge insertion error: the byte blob's length doesn't match any
/// supported Atari cartridge size.
#[derive(Debug, Clone, PartialEq)]
pub struct CartridgeError {
    size: usize,
}

impl CartridgeError {
    /// Constructs the same error condition for a byte blob whose length
    /// doesn't match its declared cartridge-type tag, even if that length
    /// happens to be a size some other tag would accept.
    pub fn size_mismatch(size: usize) -> Self {
        CartridgeError { size }
    }
}

impl error::Error for CartridgeError {}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Unsupported cartridge size: {} bytes. Supported sizes: \
            2048, 4096, 8192, 12288, 16384, 32768",
            self.size
        )
    }
}

/// A single bank-switched Atari cartridge, covering every size variant in
/// the 2K..32K family. 2K and 4K cartridges have a single, fixed bank; the
/// larger variants switch their visible 4 KiB window on any read or write
/// at or past `bank_switch_address`.
#[derive(Debug)]
pub struct Cartridge {
    data: Vec<u8>,
    bank_count: usize,
    bank_switch_address: u16,
    bank_index: usize,
    address_mask: u16,
}

impl Cartridge {
    /// Creates a cartridge from a ROM image. The image size selects the
    /// variant; any other size is rejected.
    pub fn new(data: &[u8]) -> Result<Cartridge, CartridgeError> {
        let (bank_count, bank_switch_address, address_mask) = match data.len() {
            0x0800 => (1, 0xFFFF, 0x07FF),
            0x1000 => (1, 0xFFFF, 0x0FFF),
            0x2000 => (2, 0x0FF8, 0x0FFF),
            0x3000 => (3, 0x0FF8, 0x0FFF),
            0x4000 => (4, 0x0FF6, 0x0FFF),
            0x8000 => (8, 0x0FF4, 0x0FFF),
            _ => return Err(CartridgeError { size: data.len() }),
        };
        Ok(Cartridge {
            data: data.to_vec(),
            bank_count,
            bank_switch_address,
            bank_index: 0,
            address_mask,
        })
    }

    /// Resets the bank index to 0, as real hardware does on power-up.
    pub fn reset(&mut self) {
        self.bank_index = 0;
    }

    fn maybe_switch_bank(&mut self, address: u16) {
        if address >= self.bank_switch_address {
            let bank_index = (address - self.bank_switch_address) as usize;
            if bank_index < self.bank_count {
                self.bank_index = bank_index;
            }
        }
    }

    fn offset(&self, address: u16) -> usize {
        self.bank_index * 0x1000 + (address as usize & self.address_mask as usize)
    }
}

impl Read for Cartridge {
    fn read(&mut self, address: u16) -> ReadResult {
        self.maybe_switch_bank(address);
        Ok(self.data[self.offset(address)])
    }
}

impl Write for Cartridge {
    /// Writes are ignored by the cartridge's own storage (it's read-only
    /// ROM), but still trigger a bank switch on the multi-bank variants.
    fn write(&mut self, address: u16, _value: u8) -> WriteResult {
        self.maybe_switch_bank(address);
        Ok(())
    }
}

impl Memory for Cartridge {}

#[cfg(test)]
mod tests {
    use super::*;

    fn cartridge_of_size(size: usize) -> Cartridge {
        let mut data = vec![0u8; size];
        for (bank, chunk) in data.chunks_mut(0x1000).enumerate() {
            chunk[0] = bank as u8;
        }
        Cartridge::new(&data).unwrap()
    }

    #[test]
    fn rejects_unsupported_sizes() {
        assert_eq!(Cartridge::new(&[0u8; 100]).unwrap_err(), CartridgeError { size: 100 });
    }

    #[test]
    fn two_kib_mirrors_within_a_4k_window() {
        let mut data = vec![0u8; 0x0800];
        data[5] = 42;
        let mut cartridge = Cartridge::new(&data).unwrap();
        assert_eq!(cartridge.read(5).unwrap(), 42);
        assert_eq!(cartridge.read(0x0805).unwrap(), 42);
        assert_eq!(cartridge.read(0x1805).unwrap(), 42);
    }

    #[test]
    fn four_kib_has_a_single_fixed_bank() {
        let mut data = vec![0u8; 0x1000];
        data[0x0005] = 7;
        let mut cartridge = Cartridge::new(&data).unwrap();
        assert_eq!(cartridge.read(0x0005).unwrap(), 7);
    }

    #[test]
    fn eight_kib_switches_bank_on_read() {
        let mut cartridge = cartridge_of_size(0x2000);
        assert_eq!(cartridge.read(0).unwrap(), 0);
        cartridge.read(0x0FF9).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 1);
        cartridge.read(0x0FF8).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 0);
    }

    #[test]
    fn bank_switch_also_triggers_on_write() {
        let mut cartridge = cartridge_of_size(0x2000);
        cartridge.write(0x0FF9, 0).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 1);
    }

    #[test]
    fn twelve_kib_has_three_banks() {
        let mut cartridge = cartridge_of_size(0x3000);
        cartridge.read(0x0FF8).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 0);
        cartridge.read(0x0FFA).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 2);
        // Out of range: bank index stays put.
        cartridge.read(0x0FFB).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 2);
    }

    #[test]
    fn sixteen_kib_has_four_banks() {
        let mut cartridge = cartridge_of_size(0x4000);
        cartridge.read(0x0FF6 + 3).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 3);
    }

    #[test]
    fn thirty_two_kib_has_eight_banks() {
        let mut cartridge = cartridge_of_size(0x8000);
        cartridge.read(0x0FF4 + 7).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 7);
    }

    #[test]
    fn reset_returns_to_bank_zero() {
        let mut cartridge = cartridge_of_size(0x2000);
        cartridge.read(0x0FF9).unwrap();
        assert_eq!(cartridge.read(0).unwrap(), 1);
        cartridge.reset();
        assert_eq!(cartridge.read(0).unwrap(), 0);
    }
}
