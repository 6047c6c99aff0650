use log::warn;
use rand::Rng;
use ya6502::memory::Inspect;
use ya6502::memory::Read;
use ya6502::memory::Write;
use ya6502::memory::{Memory, ReadError, ReadResult, WriteError, WriteResult};

/// A MOS Technology 6532 RIOT chip: 128 bytes of RAM, two 8-bit parallel
/// ports with per-line direction, an interval timer with a four-step
/// prescaler, and edge-detect interrupt on port A bit 7.
#[derive(Debug)]
pub struct Riot {
    ram: [u8; 128],

    /// Output register for each port (SWCHA/SWCHB).
    data: [u8; 2],
    /// Pin direction for each port, 1 = output (SWACNT/SWBCNT).
    direction: [u8; 2],
    /// Direct input pin state, set by `set_port`.
    peripheral: [u8; 2],
    /// Port A value last seen by `run_edge_detect`, used to tell whether bit
    /// 7 has changed since the last read of port A.
    latched_port_a: u8,
    /// Edge-detect polarity: true = detect 0->1, false = detect 1->0.
    edge_detect_positive: bool,
    edge_detect_interrupt_enable: bool,

    /// Raw countdown value; already pre-multiplied by the prescaler on
    /// write, decremented by exactly 1 every tick. INTIM exposes
    /// `timer >> prescaler_shift` while it's non-negative.
    timer: i16,
    prescaler_shift: u8,
    timer_interrupt_enable: bool,
    /// True only between the tick that made `timer` cross from 0 to -1 and
    /// the next tick; suppresses the INTIM-read flag-clear on that one read.
    timer_just_expired: bool,

    /// Bit 6 = edge-detect flag, bit 7 = timer flag (TIMINT).
    interrupt_flag: u8,
}

pub enum Port {
    PA,
    PB,
}

impl Riot {
    pub fn new() -> Riot {
        let mut rng = rand::thread_rng();
        let mut ram = [0u8; 128];
        rng.fill(&mut ram[..]);
        Riot {
            ram,
            data: [0; 2],
            direction: [0; 2],
            peripheral: [0; 2],
            latched_port_a: 0,
            edge_detect_positive: false,
            edge_detect_interrupt_enable: false,
            timer: rng.gen(),
            prescaler_shift: [0, 3, 6, 10][rng.gen_range(0..4)],
            timer_interrupt_enable: false,
            timer_just_expired: false,
            interrupt_flag: 0,
        }
    }

    /// Randomizes RAM, clears both ports' data/direction registers and the
    /// edge-detect configuration. Leaves the timer and interrupt-flag byte
    /// untouched.
    pub fn reset(&mut self) {
        let mut rng = rand::thread_rng();
        rng.fill(&mut self.ram[..]);
        self.data = [0; 2];
        self.direction = [0; 2];
        self.edge_detect_positive = false;
        self.edge_detect_interrupt_enable = false;
    }

    pub fn tick(&mut self) {
        self.timer_just_expired = false;
        if self.timer > -0xFF {
            self.timer -= 1;
            if self.timer == -1 {
                self.interrupt_flag |= flags::TIMER;
                self.timer_just_expired = true;
            }
        }
    }

    pub fn interrupt_asserted(&self) -> bool {
        (self.interrupt_flag & flags::TIMER != 0 && self.timer_interrupt_enable)
            || (self.interrupt_flag & flags::EDGE_DETECT != 0 && self.edge_detect_interrupt_enable)
    }

    /// Sets the direct input level of a port's pins. Note: per the MOS 6532
    /// datasheet, a grounded input pin always overrides the output register
    /// on read, regardless of direction.
    pub fn set_port(&mut self, port: Port, value: u8) {
        match port {
            Port::PA => self.peripheral[0] = value,
            Port::PB => self.peripheral[1] = value,
        }
    }

    fn port_value(&self, i: usize) -> u8 {
        (self.peripheral[i] & !self.direction[i]) | (self.data[i] & self.direction[i])
    }

    /// Runs edge detect against the current port A value, setting the
    /// edge-detect interrupt flag on a polarity-matching bit 7 transition,
    /// then latches the new value for the next comparison.
    fn run_port_a_edge_detect(&mut self) {
        let current = self.port_value(0);
        let went_high = self.latched_port_a & 0x80 == 0 && current & 0x80 != 0;
        let went_low = self.latched_port_a & 0x80 != 0 && current & 0x80 == 0;
        let matches = if self.edge_detect_positive {
            went_high
        } else {
            went_low
        };
        if matches {
            self.interrupt_flag |= flags::EDGE_DETECT;
        }
        self.latched_port_a = current;
    }

    fn timer_value(&self) -> u8 {
        if self.timer >= 0 {
            (self.timer >> self.prescaler_shift) as u8
        } else {
            (256 + self.timer as i32) as u8
        }
    }

    fn write_timer(&mut self, raw_address: u16, value: u8) {
        self.timer_interrupt_enable = raw_address & 0b1000 != 0;
        self.interrupt_flag &= !flags::TIMER;
        self.prescaler_shift = [0, 3, 6, 10][(raw_address & 0b11) as usize];
        self.timer = (value as i16) << self.prescaler_shift;
        self.timer_just_expired = false;
    }
}

impl Inspect for Riot {
    fn inspect(&self, address: u16) -> ReadResult {
        match canonical_read_address(address) {
            registers::SWCHA => Ok(self.port_value(0)),
            registers::SWACNT => Ok(self.direction[0]),
            registers::SWCHB => Ok(self.port_value(1)),
            registers::SWBCNT => Ok(self.direction[1]),
            registers::INTIM => Ok(self.timer_value()),
            registers::TIMINT => Ok(self.interrupt_flag),
            _ => Err(ReadError { address }),
        }
    }
}

impl Read for Riot {
    fn read(&mut self, address: u16) -> ReadResult {
        match canonical_read_address(address) {
            registers::SWCHA => {
                self.run_port_a_edge_detect();
                Ok(self.port_value(0))
            }
            registers::INTIM => {
                self.timer_interrupt_enable = address & 0b1000 != 0;
                if !self.timer_just_expired {
                    self.interrupt_flag &= !flags::TIMER;
                }
                Ok(self.timer_value())
            }
            registers::TIMINT => {
                let flag = self.interrupt_flag;
                self.interrupt_flag &= !flags::EDGE_DETECT;
                Ok(flag)
            }
            _ => self.inspect(address),
        }
    }
}

impl Write for Riot {
    fn write(&mut self, address: u16, value: u8) -> WriteResult {
        match canonical_write_address(address) {
            registers::SWCHA => {
                self.data[0] = value;
                self.run_port_a_edge_detect();
            }
            registers::SWACNT => {
                self.direction[0] = value;
                self.run_port_a_edge_detect();
            }
            registers::SWCHB => self.data[1] = value,
            registers::SWBCNT => self.direction[1] = value,
            0x04 | 0x05 => {
                self.edge_detect_positive = address & 0b01 != 0;
                self.edge_detect_interrupt_enable = address & 0b10 != 0;
            }
            registers::TIM1T..=registers::T1024T => self.write_timer(address, value),
            _ => {
                warn!("Unknown RIOT register write at address {:#06x}", address);
                return Err(WriteError { address, value });
            }
        };
        Ok(())
    }
}

impl Memory for Riot {}

/// Exposes the 128-byte RIOT RAM as a separate address space, addressed by
/// the low 7 bits.
#[derive(Debug)]
pub struct RiotRam<'a> {
    ram: &'a mut [u8; 128],
}

impl Riot {
    pub fn ram(&mut self) -> RiotRam {
        RiotRam { ram: &mut self.ram }
    }
}

impl Inspect for RiotRam<'_> {
    fn inspect(&self, address: u16) -> ReadResult {
        Ok(self.ram[(address & 0x7F) as usize])
    }
}

impl Read for RiotRam<'_> {
    fn read(&mut self, address: u16) -> ReadResult {
        self.inspect(address)
    }
}

impl Write for RiotRam<'_> {
    fn write(&mut self, address: u16, value: u8) -> WriteResult {
        self.ram[(address & 0x7F) as usize] = value;
        Ok(())
    }
}

impl Memory for RiotRam<'_> {}

fn canonical_read_address(address: u16) -> u16 {
    if address & 0b0100 != 0 {
        address & 0b0101
    } else {
        address & 0b0011
    }
}

fn canonical_write_address(address: u16) -> u16 {
    if address & 0b0001_0100 == 0b0001_0100 {
        address & 0b0001_0111
    } else if address & 0b0001_0100 == 0b0000_0100 {
        address & 0b0000_0101
    } else {
        address & 0b0011
    }
}

mod registers {
    pub const SWCHA: u16 = 0x00;
    pub const SWACNT: u16 = 0x01;
    pub const SWCHB: u16 = 0x02;
    pub const SWBCNT: u16 = 0x03;
    pub const INTIM: u16 = 0x04;
    pub const TIMINT: u16 = 0x05;
    pub const TIM1T: u16 = 0x14;
    pub const T1024T: u16 = 0x17;
}

mod flags {
    pub const TIMER: u8 = 1 << 7;
    pub const EDGE_DETECT: u8 = 1 << 6;
}
