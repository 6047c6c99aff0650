use crate::cartridge::Cartridge;
use crate::riot::Riot;
use crate::tia::Tia;
use ya6502::memory::Read;
use ya6502::memory::Write;
use ya6502::memory::{Memory, ReadResult, WriteResult};

/// Dispatches read/write calls to the three memory-mapped devices on the
/// 2600's address bus: TIA registers, RIOT (registers and its 128-byte RAM),
/// and the cartridge.
#[derive(Debug)]
pub struct AddressSpace {
    pub tia: Tia,
    pub riot: Riot,
    pub cartridge: Cartridge,
}

enum MemoryArea {
    Tia,
    RiotRam,
    RiotRegisters,
    Cartridge,
}

/// bit 12 selects the cartridge; of the rest, bit 7 clear selects TIA, and
/// bit 7 set splits between RIOT's RAM and its registers by bit 9/7 (address
/// & 0x280 == 0x280 is the register range; this specific mirroring pattern
/// is relied on by real cartridge programs and must be preserved).
fn map_address(address: u16) -> MemoryArea {
    if address & 0b0001_0000_0000_0000 != 0 {
        MemoryArea::Cartridge
    } else if address & 0b0000_0000_1000_0000 == 0 {
        MemoryArea::Tia
    } else if address & 0b0000_0010_1000_0000 == 0b0000_0010_1000_0000 {
        MemoryArea::RiotRegisters
    } else {
        MemoryArea::RiotRam
    }
}

impl Read for AddressSpace {
    fn read(&mut self, address: u16) -> ReadResult {
        match map_address(address) {
            MemoryArea::Tia => self.tia.read(address),
            MemoryArea::RiotRam => self.riot.ram().read(address),
            MemoryArea::RiotRegisters => self.riot.read(address),
            MemoryArea::Cartridge => self.cartridge.read(address & 0x0FFF),
        }
    }
}

impl Write for AddressSpace {
    fn write(&mut self, address: u16, value: u8) -> WriteResult {
        match map_address(address) {
            MemoryArea::Tia => self.tia.write(address, value),
            MemoryArea::RiotRam => self.riot.ram().write(address, value),
            MemoryArea::RiotRegisters => self.riot.write(address, value),
            MemoryArea::Cartridge => self.cartridge.write(address & 0x0FFF, value),
        }
    }
}

impl Memory for AddressSpace {}
