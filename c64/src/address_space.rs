use crate::port::Port;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use ya6502::memory::dump_zero_page;
use ya6502::memory::Memory;
use ya6502::memory::Ram;
use ya6502::memory::Read;
use ya6502::memory::ReadError;
use ya6502::memory::ReadResult;
use ya6502::memory::Rom;
use ya6502::memory::Write;
use ya6502::memory::WriteError;
use ya6502::memory::WriteResult;

/// A C64 address space, as visible from the 6510 CPU perspective, through the
/// C64 PLA chip. Note that technically, it also will handle the CPU port
/// (addresses 0x0000 and 0x0001), although it should technically be handled by
/// the CPU itself. This is because the CPU port controls the address space
/// layout.
#[derive(Debug)]
pub struct AddressSpace<VIC: Memory, SID: Memory, CIA: Memory> {
    cpu_port: Port,
    ram: Rc<RefCell<Ram>>,
    basic_rom: Rom,
    vic: VIC,
    sid: SID,
    color_ram: Rc<RefCell<Ram>>, // TODO: replace with an actual single-nibble RAM
    cia1: CIA,
    cia2: CIA,
    kernal_rom: Rom,
    pub cartridge: Option<Cartridge>,
}

impl<VIC: Memory, SID: Memory, CIA: Memory> AddressSpace<VIC, SID, CIA> {
    pub fn mut_vic(&mut self) -> &mut VIC {
        &mut self.vic
    }
    pub fn mut_cia1(&mut self) -> &mut CIA {
        &mut self.cia1
    }
}

impl<VIC: Memory, SID: Memory, CIA: Memory> AddressSpace<VIC, SID, CIA> {
    pub fn new(
        ram: Rc<RefCell<Ram>>,
        basic_rom: Rom,
        vic: VIC,
        sid: SID,
        color_ram: Rc<RefCell<Ram>>,
        cia1: CIA,
        cia2: CIA,
        kernal_rom: Rom,
    ) -> Self {
        let mut cpu_port = Port::default();
        // Set the default values of the CPU port pins. Bits 0-2 and 4 are set
        // to 1 by pull-up registers. Note that the behavior of bits 3 (dangling
        // if no Datasette) and 5 (attempting to read from the motor output
        // driver) are just wild guess, but mostly irrelevant.
        cpu_port.pins = 0b0011_0111;
        return Self {
            cpu_port,
            ram,
            basic_rom,
            vic,
            sid,
            color_ram,
            cia1,
            cia2,
            kernal_rom,
            cartridge: None,
        };
    }
}

impl<VIC: Memory, SID: Memory, CIA: Memory> Read for AddressSpace<VIC, SID, CIA> {
    fn read(&self, address: u16) -> ReadResult {
        match address {
            0x0000 => Ok(self.cpu_port.direction),
            0x0001 => Ok(self.cpu_port.read()),
            0x8000..=0x9FFF => match &self.cartridge {
                Some(Cartridge { mode: _, rom }) => rom.read(address),
                _ => self.ram.borrow().read(address),
            },
            0xA000..=0xBFFF => match &self.cartridge {
                Some(Cartridge {
                    mode: CartridgeMode::Standard16k,
                    rom,
                }) => rom.read(address),
                _ => self.basic_rom.read(address),
            },
            0xD000..=0xD3FF => self.vic.read(address),
            0xD400..=0xD7FF => self.sid.read(address),
            0xD800..=0xDBFF => self.color_ram.borrow().read(address),
            0xDC00..=0xDCFF => self.cia1.read(address),
            0xDD00..=0xDDFF => self.cia2.read(address),
            0xDE00..=0xDFFF => Err(ReadError { address }),
            0xE000..=0xFFFF => match &self.cartridge {
                Some(Cartridge {
                    mode: CartridgeMode::Ultimax,
                    rom,
                }) => rom.read(address),
                _ => self.kernal_rom.read(address),
            },
            _ => self.ram.borrow().read(address),
        }
    }
}

impl<VIC: Memory, SID: Memory, CIA: Memory> Write for AddressSpace<VIC, SID, CIA> {
    fn write(&mut self, address: u16, value: u8) -> WriteResult {
        match address {
            0x0000 => Ok(self.cpu_port.direction = value),
            0x0001 => {
                // For now, only allow one memory layout and don't allow turning
                // Datasette on.
                if value & 0b0010_0111 == 0b0010_0111 {
                    Ok(self.cpu_port.register = value)
                } else {
                    Err(WriteError { address, value })
                }
            }
            0xD000..=0xD3FF => self.vic.write(address, value),
            0xD400..=0xD7FF => self.sid.write(address, value),
            0xD800..=0xDBFF => self.color_ram.borrow_mut().write(address, value),
            0xDC00..=0xDCFF => self.cia1.write(address, value),
            0xDD00..=0xDDFF => self.cia2.write(address, value),
            0xDE00..=0xDFFF => Err(WriteError { address, value }),
            _ => self.ram.borrow_mut().write(address, value),
        }
    }
}

impl<VIC: Memory, SID: Memory, CIA: Memory> Memory for AddressSpace<VIC, SID, CIA> {}

impl<VIC: Memory, SID: Memory, CIA: Memory> fmt::Display for AddressSpace<VIC, SID, CIA> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        dump_zero_page(self, f)
    }
}

#[derive(Debug)]
pub struct Cartridge {
    pub mode: CartridgeMode,
    pub rom: Rom,
}

/// Types of cartridge ROM available in the C64 architecture.
#[derive(Debug)]
pub enum CartridgeMode {
    /// Standard 8KiB cartridge ($8000-$9FFF)
    #[allow(dead_code)]
    Standard8k,
    /// Standard 16KiB cartridge ($8000-$BFFF)
    #[allow(dead_code)]
    Standard16k,
    /// Ultimax 16KiB cartridge ($8000-$9FFF, $E000-$FFFF).
    Ultimax,
}

/// An address space, as visible by the VIC-II chip. Note that it doesn't
/// include the Color RAM, since it's addressed using a separate address line.
#[derive(Debug)]
pub struct VicAddressSpace<RAM: Read, CHR: Read> {
    ram: Rc<RefCell<RAM>>,
    char_rom: Rc<RefCell<CHR>>,
}

impl<RAM: Read, CHR: Read> VicAddressSpace<RAM, CHR> {
    pub fn new(ram: Rc<RefCell<RAM>>, char_rom: Rc<RefCell<CHR>>) -> Self {
        Self { ram, char_rom }
    }
}

impl<RAM: Read, CHR: Read> Read for VicAddressSpace<RAM, CHR> {
    fn read(&self, address: u16) -> ReadResult {
        let address = address & 0x3FFF;
        match address {
            0x1000..=0x1FFF => self.char_rom.borrow().read(address),
            _ => self.ram.borrow().read(address),
        }
    }
}
