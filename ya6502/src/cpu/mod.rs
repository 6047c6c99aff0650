mod bcd;
mod flags;
pub mod opcodes;

use crate::memory::Memory;
use log::warn;
use rand::Rng;
use std::error;
use std::fmt;
use std::fmt::Debug;

type TickResult = Result<(), Box<dyn error::Error>>;

/// The addressing mode determines how an opcode's effective address (and any
/// extra page-crossing cycle) is computed. It does not by itself determine
/// timing or instruction length; those come from the per-opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

/// A fully decoded instruction, per the decode-once contract: everything
/// `execute` needs is resolved up front, against the bus state as it stood at
/// decode time.
#[derive(Debug, Clone, Copy)]
struct Operation {
    opcode: u8,
    /// -1 for implied/accumulator opcodes, or an opcode whose branch
    /// condition wasn't met.
    effective_address: i32,
    duration: u32,
    length: u16,
}

#[derive(Debug, Clone)]
struct UnknownOpcodeError {
    pub opcode: u8,
    pub address: u16,
}

impl error::Error for UnknownOpcodeError {}

impl fmt::Display for UnknownOpcodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Unknown opcode: ${:02X} at ${:04X}",
            self.opcode, self.address
        )
    }
}

/// A 6502 CPU that operates on a given type of memory. A key to creating a
/// working hardware implementation is to provide a `Memory` implementation
/// specific to your particular hardware.
#[derive(Debug)]
pub struct Cpu<M: Memory> {
    memory: Box<M>,

    reg_pc: u16,
    reg_a: u8,
    reg_x: u8,
    reg_y: u8,
    reg_sp: u8,
    flags: u8,

    /// The CPU's RDY input. While false, `tick` is a no-op.
    is_ready: bool,
    operation: Operation,
    /// Number of color clocks spent on the current operation so far.
    operation_clock: u32,
}

impl<M: Memory + Debug> Cpu<M> {
    /// Creates a new `CPU` that owns given `memory`. The newly created `CPU` is
    /// not yet ready for executing programs; it first needs to be reset using
    /// the [`reset`](#method.reset) method.
    pub fn new(memory: Box<M>) -> Self {
        let mut rng = rand::thread_rng();
        Cpu {
            memory,
            reg_pc: rng.gen(),
            reg_a: rng.gen(),
            reg_x: rng.gen(),
            reg_y: rng.gen(),
            reg_sp: rng.gen(),
            flags: rng.gen(),
            is_ready: true,
            operation: Operation {
                opcode: 0,
                effective_address: -1,
                duration: 2,
                length: 1,
            },
            operation_clock: 0,
        }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn mut_memory(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Sets the CPU's readiness (RDY) line. While not ready, `tick` does
    /// nothing; a chip holding WSYNC (or any other stall source) calls this
    /// with `false`, then `true` again once the stall condition clears.
    pub fn set_ready(&mut self, ready: bool) {
        self.is_ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn reg_a(&self) -> u8 {
        self.reg_a
    }

    pub fn reg_x(&self) -> u8 {
        self.reg_x
    }

    pub fn reg_y(&self) -> u8 {
        self.reg_y
    }

    pub fn reg_pc(&self) -> u16 {
        self.reg_pc
    }

    pub fn reg_sp(&self) -> u8 {
        self.reg_sp
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    /// Resets the CPU: sets the interrupt-disable flag, the stack pointer to
    /// 0xFD, loads the program counter from the reset vector, then decodes
    /// the first instruction immediately.
    pub fn reset(&mut self) -> TickResult {
        self.flags |= flags::I;
        self.reg_sp = 0xFD;
        self.reg_pc = self.read_u16(0xFFFC)?;
        self.operation_clock = 0;
        self.operation = self.decode()?;
        Ok(())
    }

    /// A single color-clock step. If not ready, does nothing. Otherwise
    /// advances the operation clock; once it reaches the decoded duration,
    /// the program counter advances by the instruction length, the operation
    /// executes atomically, and the next instruction is decoded.
    pub fn tick(&mut self) -> TickResult {
        if !self.is_ready {
            return Ok(());
        }
        self.operation_clock += 1;
        if self.operation_clock == self.operation.duration {
            let operation = self.operation;
            self.reg_pc = self.reg_pc.wrapping_add(operation.length);
            self.execute(operation)?;
            self.operation_clock = 0;
            self.operation = self.decode()?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn ticks(&mut self, n_ticks: u32) -> TickResult {
        for _ in 0..n_ticks {
            self.tick()?;
        }
        Ok(())
    }

    // --- Decoding ---------------------------------------------------------

    fn decode(&mut self) -> Result<Operation, Box<dyn error::Error>> {
        let pc = self.reg_pc;
        let opcode = self.memory.read(pc)?;
        let info = match opcode_info(opcode) {
            Some(info) => info,
            None => {
                warn!(
                    "{}",
                    UnknownOpcodeError {
                        opcode,
                        address: pc,
                    }
                );
                return Ok(Operation {
                    opcode,
                    effective_address: -1,
                    duration: 1,
                    length: 1,
                });
            }
        };
        let (effective_address, extra_cycles) = self.compute_address(info.mode, opcode, pc)?;
        let duration = info.base_duration
            + if info.variable_duration {
                extra_cycles
            } else {
                0
            };
        Ok(Operation {
            opcode,
            effective_address,
            duration,
            length: info.length,
        })
    }

    fn compute_address(
        &mut self,
        mode: Mode,
        opcode: u8,
        pc: u16,
    ) -> Result<(i32, u32), Box<dyn error::Error>> {
        Ok(match mode {
            Mode::Implied | Mode::Accumulator => (-1, 0),
            Mode::Immediate => (pc.wrapping_add(1) as i32, 0),
            Mode::ZeroPage => {
                let zp = self.memory.read(pc.wrapping_add(1))?;
                (zp as i32, 0)
            }
            Mode::ZeroPageX => {
                let zp = self.memory.read(pc.wrapping_add(1))?;
                (zp.wrapping_add(self.reg_x) as i32, 0)
            }
            Mode::ZeroPageY => {
                let zp = self.memory.read(pc.wrapping_add(1))?;
                (zp.wrapping_add(self.reg_y) as i32, 0)
            }
            Mode::Absolute => {
                let addr = self.read_u16(pc.wrapping_add(1))?;
                (addr as i32, 0)
            }
            Mode::AbsoluteX => {
                let base = self.read_u16(pc.wrapping_add(1))?;
                let addr = base.wrapping_add(self.reg_x as u16);
                (addr as i32, page_crossed(base, addr) as u32)
            }
            Mode::AbsoluteY => {
                let base = self.read_u16(pc.wrapping_add(1))?;
                let addr = base.wrapping_add(self.reg_y as u16);
                (addr as i32, page_crossed(base, addr) as u32)
            }
            Mode::Indirect => {
                let ptr = self.read_u16(pc.wrapping_add(1))?;
                let addr = self.read_u16(ptr)?;
                (addr as i32, 0)
            }
            Mode::IndirectX => {
                let zp = self.memory.read(pc.wrapping_add(1))?;
                let ptr = zp.wrapping_add(self.reg_x);
                let addr = self.read_u16_zero_page(ptr)?;
                (addr as i32, 0)
            }
            Mode::IndirectY => {
                let zp = self.memory.read(pc.wrapping_add(1))?;
                let base = self.read_u16_zero_page(zp)?;
                let addr = base.wrapping_add(self.reg_y as u16);
                (addr as i32, page_crossed(base, addr) as u32)
            }
            Mode::Relative => {
                let offset = self.memory.read(pc.wrapping_add(1))? as i8;
                if branch_taken(opcode, self.flags) {
                    let base = pc.wrapping_add(2);
                    let target = base.wrapping_add(offset as u16);
                    let extra = if page_crossed(base, target) { 2 } else { 1 };
                    (target as i32, extra)
                } else {
                    (-1, 0)
                }
            }
        })
    }

    fn read_u16(&mut self, address: u16) -> Result<u16, Box<dyn error::Error>> {
        let lo = self.memory.read(address)?;
        let hi = self.memory.read(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Like [`read_u16`], but wraps within the zero page instead of crossing
    /// into page 1, as the real `(indirect,X)`/`(indirect),Y` modes do.
    fn read_u16_zero_page(&mut self, address: u8) -> Result<u16, Box<dyn error::Error>> {
        let lo = self.memory.read(address as u16)?;
        let hi = self.memory.read(address.wrapping_add(1) as u16)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    // --- Execution ----------------------------------------------------------

    fn execute(&mut self, op: Operation) -> TickResult {
        use opcodes::*;
        let addr = op.effective_address;
        // Unknown opcodes are logged and scheduled as no-ops by `decode`.
        if opcode_info(op.opcode).is_none() {
            return Ok(());
        }
        match op.opcode {
            NOP => {}

            LDA_IMM | LDA_ZP | LDA_ZP_X | LDA_ABS | LDA_ABS_X | LDA_ABS_Y | LDA_X_INDIR
            | LDA_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                self.set_reg_a(value);
            }
            LDX_IMM | LDX_ZP | LDX_ZP_Y | LDX_ABS | LDX_ABS_Y => {
                let value = self.memory.read(addr as u16)?;
                self.set_reg_x(value);
            }
            LDY_IMM | LDY_ZP | LDY_ZP_X | LDY_ABS | LDY_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                self.set_reg_y(value);
            }

            STA_ZP | STA_ZP_X | STA_ABS | STA_ABS_X | STA_ABS_Y | STA_X_INDIR | STA_INDIR_Y => {
                self.memory.write(addr as u16, self.reg_a)?;
            }
            STX_ZP | STX_ZP_Y | STX_ABS => {
                self.memory.write(addr as u16, self.reg_x)?;
            }
            STY_ZP | STY_ZP_X | STY_ABS => {
                self.memory.write(addr as u16, self.reg_y)?;
            }

            AND_IMM | AND_ZP | AND_ZP_X | AND_ABS | AND_ABS_X | AND_ABS_Y | AND_X_INDIR
            | AND_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                self.set_reg_a(self.reg_a & value);
            }
            ORA_IMM | ORA_ZP | ORA_ZP_X | ORA_ABS | ORA_ABS_X | ORA_ABS_Y | ORA_X_INDIR
            | ORA_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                self.set_reg_a(self.reg_a | value);
            }
            EOR_IMM | EOR_ZP | EOR_ZP_X | EOR_ABS | EOR_ABS_X | EOR_ABS_Y | EOR_X_INDIR
            | EOR_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                self.set_reg_a(self.reg_a ^ value);
            }

            ADC_IMM | ADC_ZP | ADC_ZP_X | ADC_ABS | ADC_ABS_X | ADC_ABS_Y | ADC_X_INDIR
            | ADC_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                let result = self.add_with_carry(self.reg_a, value);
                self.set_reg_a(result);
            }
            SBC_IMM | SBC_ZP | SBC_ZP_X | SBC_ABS | SBC_ABS_X | SBC_ABS_Y | SBC_X_INDIR
            | SBC_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                let result = self.sub_with_carry(self.reg_a, value);
                self.set_reg_a(result);
            }

            CMP_IMM | CMP_ZP | CMP_ZP_X | CMP_ABS | CMP_ABS_X | CMP_ABS_Y | CMP_X_INDIR
            | CMP_INDIR_Y => {
                let value = self.memory.read(addr as u16)?;
                self.compare(self.reg_a, value);
            }
            CPX_IMM | CPX_ZP | CPX_ABS => {
                let value = self.memory.read(addr as u16)?;
                self.compare(self.reg_x, value);
            }
            CPY_IMM | CPY_ZP | CPY_ABS => {
                let value = self.memory.read(addr as u16)?;
                self.compare(self.reg_y, value);
            }

            BIT_ZP | BIT_ABS => {
                let value = self.memory.read(addr as u16)?;
                self.test_bits(value);
            }

            ASL_A => {
                let result = self.shift_left(self.reg_a);
                self.set_reg_a(result);
            }
            ASL_ZP | ASL_ZP_X | ASL_ABS | ASL_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                let result = self.shift_left(value);
                self.update_flags_nz(result);
                self.memory.write(addr as u16, result)?;
            }
            LSR_A => {
                let result = self.shift_right(self.reg_a);
                self.set_reg_a(result);
            }
            LSR_ZP | LSR_ZP_X | LSR_ABS | LSR_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                let result = self.shift_right(value);
                self.update_flags_nz(result);
                self.memory.write(addr as u16, result)?;
            }
            ROL_A => {
                let result = self.rotate_left(self.reg_a);
                self.set_reg_a(result);
            }
            ROL_ZP | ROL_ZP_X | ROL_ABS | ROL_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                let result = self.rotate_left(value);
                self.update_flags_nz(result);
                self.memory.write(addr as u16, result)?;
            }
            ROR_A => {
                let result = self.rotate_right(self.reg_a);
                self.set_reg_a(result);
            }
            ROR_ZP | ROR_ZP_X | ROR_ABS | ROR_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                let result = self.rotate_right(value);
                self.update_flags_nz(result);
                self.memory.write(addr as u16, result)?;
            }

            INC_ZP | INC_ZP_X | INC_ABS | INC_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                let result = self.inc(value);
                self.memory.write(addr as u16, result)?;
            }
            DEC_ZP | DEC_ZP_X | DEC_ABS | DEC_ABS_X => {
                let value = self.memory.read(addr as u16)?;
                let result = self.dec(value);
                self.memory.write(addr as u16, result)?;
            }
            INX => {
                let result = self.inc(self.reg_x);
                self.reg_x = result;
            }
            INY => {
                let result = self.inc(self.reg_y);
                self.reg_y = result;
            }
            DEX => {
                let result = self.dec(self.reg_x);
                self.reg_x = result;
            }
            DEY => {
                let result = self.dec(self.reg_y);
                self.reg_y = result;
            }

            TAX => self.set_reg_x(self.reg_a),
            TAY => self.set_reg_y(self.reg_a),
            TXA => self.set_reg_a(self.reg_x),
            TYA => self.set_reg_a(self.reg_y),
            TXS => self.reg_sp = self.reg_x,
            TSX => self.set_reg_x(self.reg_sp),

            PHA => self.push_byte(self.reg_a)?,
            PHP => self.push_byte(self.flags | flags::PUSHED)?,
            PLA => {
                let value = self.pull_byte()?;
                self.set_reg_a(value);
            }
            PLP => {
                let value = self.pull_byte()?;
                self.flags = (value & !flags::B) | flags::UNUSED;
            }

            SEI => self.flags |= flags::I,
            CLI => self.flags &= !flags::I,
            SED => self.flags |= flags::D,
            CLD => self.flags &= !flags::D,
            SEC => self.flags |= flags::C,
            CLC => self.flags &= !flags::C,
            CLV => self.flags &= !flags::V,

            BEQ | BNE | BCC | BCS | BPL | BMI | BVS | BVC => {
                if addr >= 0 {
                    self.reg_pc = addr as u16;
                }
            }

            JMP_ABS | JMP_IND => self.reg_pc = addr as u16,
            JSR => {
                let return_address = self.reg_pc.wrapping_sub(1);
                self.push_word(return_address)?;
                self.reg_pc = addr as u16;
            }
            RTS => {
                let return_address = self.pull_word()?;
                self.reg_pc = return_address.wrapping_add(1);
            }
            RTI => {
                let status = self.pull_byte()?;
                self.flags = (status & !flags::B) | flags::UNUSED;
                self.reg_pc = self.pull_word()?;
            }
            BRK => {
                self.push_word(self.reg_pc)?;
                self.push_byte(self.flags | flags::PUSHED)?;
                self.flags |= flags::I;
                self.reg_pc = self.read_u16(0xFFFE)?;
            }

            _ => unreachable!("execute called with opcode not covered by opcode_info"),
        }
        Ok(())
    }

    fn push_byte(&mut self, value: u8) -> TickResult {
        self.memory.write(self.stack_pointer(), value)?;
        self.reg_sp = self.reg_sp.wrapping_sub(1);
        Ok(())
    }

    fn pull_byte(&mut self) -> Result<u8, Box<dyn error::Error>> {
        self.reg_sp = self.reg_sp.wrapping_add(1);
        Ok(self.memory.read(self.stack_pointer())?)
    }

    fn push_word(&mut self, value: u16) -> TickResult {
        let [lo, hi] = value.to_le_bytes();
        self.push_byte(hi)?;
        self.push_byte(lo)?;
        Ok(())
    }

    fn pull_word(&mut self) -> Result<u16, Box<dyn error::Error>> {
        let lo = self.pull_byte()?;
        let hi = self.pull_byte()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    fn set_reg_a(&mut self, value: u8) {
        self.reg_a = value;
        self.update_flags_nz(value);
    }

    fn set_reg_x(&mut self, value: u8) {
        self.reg_x = value;
        self.update_flags_nz(value);
    }

    fn set_reg_y(&mut self, value: u8) {
        self.reg_y = value;
        self.update_flags_nz(value);
    }

    /// Updates the N and Z flags to reflect the given value.
    fn update_flags_nz(&mut self, value: u8) {
        let flag_z = if value == 0 { flags::Z } else { 0 };
        let flag_n = if value & 0b1000_0000 != 0 {
            flags::N
        } else {
            0
        };
        self.flags = (self.flags & !(flags::Z | flags::N)) | flag_z | flag_n;
    }

    fn test_bits(&mut self, value: u8) {
        // Clear N, V, and Z. Then load N and V (bits 7 and 6) directly from the
        // value, and update Z by performing an AND with the accumulator.
        self.flags = self.flags & !(flags::N | flags::V | flags::Z)
            | (value & (flags::N | flags::V))
            | if value & self.reg_a == 0 { flags::Z } else { 0 };
    }

    /// Calculates lhs+rhs+C, updates the C and V flags, and returns the result.
    /// The V flag is not set in BCD mode, which is not how the real CPU works,
    /// but it's undefined anyway.
    fn add_with_carry(&mut self, lhs: u8, rhs: u8) -> u8 {
        if self.flags & flags::D != 0 {
            let (result, carry) = bcd::bcd_add(lhs, rhs, self.flags & flags::C != 0);
            self.flags = if carry {
                self.flags | flags::C
            } else {
                self.flags & !flags::C
            };
            return result;
        }

        let (mut unsigned_sum, mut unsigned_overflow) = lhs.overflowing_add(rhs);
        if self.flags & flags::C != 0 {
            let (unsigned_sum_2, unsigned_overflow_2) = unsigned_sum.overflowing_add(1);
            unsigned_sum = unsigned_sum_2;
            unsigned_overflow |= unsigned_overflow_2;
        }
        let signed_lhs = lhs as i8;
        let signed_rhs = rhs as i8;
        let (mut signed_sum, mut signed_overflow) = signed_lhs.overflowing_add(signed_rhs);
        if self.flags & flags::C != 0 {
            let (signed_sum_2, signed_overflow_2) = signed_sum.overflowing_add(1);
            signed_sum = signed_sum_2;
            signed_overflow |= signed_overflow_2;
        }
        debug_assert_eq!(unsigned_sum, signed_sum as u8); // sanity check
        self.flags = (self.flags & !(flags::C | flags::V))
            | if unsigned_overflow { flags::C } else { 0 }
            | if signed_overflow { flags::V } else { 0 };
        unsigned_sum
    }

    /// Calculates lhs-rhs-(1-C), updates the C and V flags, and returns the
    /// result.
    fn sub_with_carry(&mut self, lhs: u8, rhs: u8) -> u8 {
        if self.flags & flags::D != 0 {
            let (result, borrow) = bcd::bcd_sub(lhs, rhs, self.flags & flags::C == 0);
            self.flags = if borrow {
                self.flags & !flags::C
            } else {
                self.flags | flags::C
            };
            return result;
        }

        let (mut unsigned_diff, mut unsigned_overflow) = lhs.overflowing_sub(rhs);
        if self.flags & flags::C == 0 {
            let (unsigned_diff_2, unsigned_overflow_2) = unsigned_diff.overflowing_sub(1);
            unsigned_diff = unsigned_diff_2;
            unsigned_overflow |= unsigned_overflow_2;
        }
        let signed_lhs = lhs as i8;
        let signed_rhs = rhs as i8;
        let (mut signed_diff, mut signed_overflow) = signed_lhs.overflowing_sub(signed_rhs);
        if self.flags & flags::C == 0 {
            let (signed_diff_2, signed_overflow_2) = signed_diff.overflowing_sub(1);
            signed_diff = signed_diff_2;
            signed_overflow |= signed_overflow_2;
        }
        debug_assert_eq!(unsigned_diff, signed_diff as u8); // sanity check
        self.flags = (self.flags & !(flags::C | flags::V))
            | if unsigned_overflow { 0 } else { flags::C }
            | if signed_overflow { flags::V } else { 0 };
        unsigned_diff
    }

    fn shift_left(&mut self, value: u8) -> u8 {
        let carry = (value & (1 << 7)) >> 7;
        self.flags = (self.flags & !flags::C) | carry;
        value << 1
    }

    fn shift_right(&mut self, value: u8) -> u8 {
        let carry = value & 1;
        self.flags = (self.flags & !flags::C) | carry;
        value >> 1
    }

    fn rotate_left(&mut self, value: u8) -> u8 {
        let prev_carry = self.flags & flags::C;
        let carry = (value & (1 << 7)) >> 7;
        self.flags = (self.flags & !flags::C) | carry;
        (value << 1) | prev_carry
    }

    fn rotate_right(&mut self, value: u8) -> u8 {
        let prev_carry = self.flags & flags::C;
        let carry = value & 1;
        self.flags = (self.flags & !flags::C) | carry;
        (value >> 1) | (prev_carry << 7)
    }

    fn compare(&mut self, register: u8, value: u8) {
        let (difference, borrow) = register.overflowing_sub(value);
        self.update_flags_nz(difference);
        self.flags = self.flags & !flags::C | if borrow { 0 } else { flags::C };
    }

    fn inc(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.update_flags_nz(result);
        result
    }

    fn dec(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.update_flags_nz(result);
        result
    }

    fn stack_pointer(&self) -> u16 {
        0x100 | self.reg_sp as u16
    }
}

fn page_crossed(base: u16, actual: u16) -> bool {
    base & 0xFF00 != actual & 0xFF00
}

fn branch_taken(opcode: u8, flags: u8) -> bool {
    use opcodes::*;
    match opcode {
        BEQ => flags & flags::Z != 0,
        BNE => flags & flags::Z == 0,
        BCS => flags & flags::C != 0,
        BCC => flags & flags::C == 0,
        BMI => flags & flags::N != 0,
        BPL => flags & flags::N == 0,
        BVS => flags & flags::V != 0,
        BVC => flags & flags::V == 0,
        _ => unreachable!("branch_taken called with a non-branch opcode"),
    }
}

struct OpcodeInfo {
    mode: Mode,
    base_duration: u32,
    length: u16,
    variable_duration: bool,
}

const fn op(mode: Mode, base_duration: u32, length: u16, variable_duration: bool) -> OpcodeInfo {
    OpcodeInfo {
        mode,
        base_duration,
        length,
        variable_duration,
    }
}

/// The documented MOS 6502 opcode table: addressing mode, base cycle count,
/// instruction length in bytes, and whether a page-crossing (or, for
/// branches, a taken/crossed condition) adds to the cycle count.
fn opcode_info(opcode: u8) -> Option<OpcodeInfo> {
    use opcodes::*;
    use Mode::*;
    Some(match opcode {
        NOP => op(Implied, 2, 1, false),

        LDA_IMM => op(Immediate, 2, 2, false),
        LDA_ZP => op(ZeroPage, 3, 2, false),
        LDA_ZP_X => op(ZeroPageX, 4, 2, false),
        LDA_ABS => op(Absolute, 4, 3, false),
        LDA_ABS_X => op(AbsoluteX, 4, 3, true),
        LDA_ABS_Y => op(AbsoluteY, 4, 3, true),
        LDA_X_INDIR => op(IndirectX, 6, 2, false),
        LDA_INDIR_Y => op(IndirectY, 5, 2, true),

        LDX_IMM => op(Immediate, 2, 2, false),
        LDX_ZP => op(ZeroPage, 3, 2, false),
        LDX_ZP_Y => op(ZeroPageY, 4, 2, false),
        LDX_ABS => op(Absolute, 4, 3, false),
        LDX_ABS_Y => op(AbsoluteY, 4, 3, true),

        LDY_IMM => op(Immediate, 2, 2, false),
        LDY_ZP => op(ZeroPage, 3, 2, false),
        LDY_ZP_X => op(ZeroPageX, 4, 2, false),
        LDY_ABS => op(Absolute, 4, 3, false),
        LDY_ABS_X => op(AbsoluteX, 4, 3, true),

        STA_ZP => op(ZeroPage, 3, 2, false),
        STA_ZP_X => op(ZeroPageX, 4, 2, false),
        STA_ABS => op(Absolute, 4, 3, false),
        STA_ABS_X => op(AbsoluteX, 5, 3, false),
        STA_ABS_Y => op(AbsoluteY, 5, 3, false),
        STA_X_INDIR => op(IndirectX, 6, 2, false),
        STA_INDIR_Y => op(IndirectY, 6, 2, false),

        STX_ZP => op(ZeroPage, 3, 2, false),
        STX_ZP_Y => op(ZeroPageY, 4, 2, false),
        STX_ABS => op(Absolute, 4, 3, false),

        STY_ZP => op(ZeroPage, 3, 2, false),
        STY_ZP_X => op(ZeroPageX, 4, 2, false),
        STY_ABS => op(Absolute, 4, 3, false),

        AND_IMM | ORA_IMM | EOR_IMM | ADC_IMM | SBC_IMM | CMP_IMM => op(Immediate, 2, 2, false),
        AND_ZP | ORA_ZP | EOR_ZP | ADC_ZP | SBC_ZP | CMP_ZP => op(ZeroPage, 3, 2, false),
        AND_ZP_X | ORA_ZP_X | EOR_ZP_X | ADC_ZP_X | SBC_ZP_X | CMP_ZP_X => {
            op(ZeroPageX, 4, 2, false)
        }
        AND_ABS | ORA_ABS | EOR_ABS | ADC_ABS | SBC_ABS | CMP_ABS => op(Absolute, 4, 3, false),
        AND_ABS_X | ORA_ABS_X | EOR_ABS_X | ADC_ABS_X | SBC_ABS_X | CMP_ABS_X => {
            op(AbsoluteX, 4, 3, true)
        }
        AND_ABS_Y | ORA_ABS_Y | EOR_ABS_Y | ADC_ABS_Y | SBC_ABS_Y | CMP_ABS_Y => {
            op(AbsoluteY, 4, 3, true)
        }
        AND_X_INDIR | ORA_X_INDIR | EOR_X_INDIR | ADC_X_INDIR | SBC_X_INDIR | CMP_X_INDIR => {
            op(IndirectX, 6, 2, false)
        }
        AND_INDIR_Y | ORA_INDIR_Y | EOR_INDIR_Y | ADC_INDIR_Y | SBC_INDIR_Y | CMP_INDIR_Y => {
            op(IndirectY, 5, 2, true)
        }

        CPX_IMM | CPY_IMM => op(Immediate, 2, 2, false),
        CPX_ZP | CPY_ZP => op(ZeroPage, 3, 2, false),
        CPX_ABS | CPY_ABS => op(Absolute, 4, 3, false),

        BIT_ZP => op(ZeroPage, 3, 2, false),
        BIT_ABS => op(Absolute, 4, 3, false),

        ASL_A | LSR_A | ROL_A | ROR_A => op(Accumulator, 2, 1, false),
        ASL_ZP | LSR_ZP | ROL_ZP | ROR_ZP => op(ZeroPage, 5, 2, false),
        ASL_ZP_X | LSR_ZP_X | ROL_ZP_X | ROR_ZP_X => op(ZeroPageX, 6, 2, false),
        ASL_ABS | LSR_ABS | ROL_ABS | ROR_ABS => op(Absolute, 6, 3, false),
        ASL_ABS_X | LSR_ABS_X | ROL_ABS_X | ROR_ABS_X => op(AbsoluteX, 7, 3, false),

        INC_ZP | DEC_ZP => op(ZeroPage, 5, 2, false),
        INC_ZP_X | DEC_ZP_X => op(ZeroPageX, 6, 2, false),
        INC_ABS | DEC_ABS => op(Absolute, 6, 3, false),
        INC_ABS_X | DEC_ABS_X => op(AbsoluteX, 7, 3, false),

        INX | INY | DEX | DEY => op(Implied, 2, 1, false),
        TAX | TAY | TXA | TYA | TXS | TSX => op(Implied, 2, 1, false),

        PHA | PHP => op(Implied, 3, 1, false),
        PLA | PLP => op(Implied, 4, 1, false),

        SEI | CLI | SED | CLD | SEC | CLC | CLV => op(Implied, 2, 1, false),

        BEQ | BNE | BCC | BCS | BPL | BMI | BVS | BVC => op(Relative, 2, 2, true),

        JMP_ABS => op(Absolute, 3, 3, false),
        JMP_IND => op(Indirect, 5, 3, false),
        JSR => op(Absolute, 6, 3, false),
        RTS => op(Implied, 6, 1, false),
        RTI => op(Implied, 6, 1, false),
        BRK => op(Implied, 7, 2, false),

        _ => return None,
    })
}

impl<M: Memory> fmt::Display for Cpu<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "A  X  Y  SP PC   NV-BDIZC\n\
            {:02X} {:02X} {:02X} {:02X} {:04X} {}",
            self.reg_a,
            self.reg_x,
            self.reg_y,
            self.reg_sp,
            self.reg_pc,
            flags::flags_to_string(self.flags, flags::FlagRepresentation::Letters)
        )
    }
}
