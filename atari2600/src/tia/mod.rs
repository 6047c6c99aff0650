mod audio_generator;
mod ball;
mod flags;
mod missile;
mod player;
mod playfield;
mod registers;
mod tests;

use audio_generator::AudioGenerator;
use ball::Ball;
use enum_map::{enum_map, Enum, EnumMap};
use missile::Missile;
use player::Player;
use playfield::Playfield;
use ya6502::memory::{Inspect, Memory, Read, ReadError, ReadResult, Write, WriteError, WriteResult};

#[derive(Debug, Enum, Copy, Clone)]
pub enum Port {
    Input0,
    Input1,
    Input2,
    Input3,
    Input4,
    Input5,
}

/// TIA is responsible for generating the video signal, sound, and for
/// synchronizing the MPU with the screen's electron beam.
#[derive(Debug)]
pub struct Tia {
    reg_vsync: u8,
    reg_vblank: u8,
    reg_colup0: u8,
    reg_colup1: u8,
    reg_colupf: u8,
    reg_colubk: u8,

    // Collision registers. Bits 6/7 hold one pair each, per §4.2's read
    // table; together the eight registers make up the 16-bit latch.
    reg_cxm0p: u8,
    reg_cxm1p: u8,
    reg_cxp0fb: u8,
    reg_cxp1fb: u8,
    reg_cxm0fb: u8,
    reg_cxm1fb: u8,
    reg_cxblpf: u8,
    reg_cxppmm: u8,

    /// Raw, unlatched input pin levels.
    input_ports: EnumMap<Port, bool>,
    /// Latched value of INPT4/INPT5, held while the input latch is enabled.
    reg_inpt45: EnumMap<Port, bool>,

    /// Each scanline has 228 color clocks, of which the first
    /// `blank_reset_clock` are horizontal blank.
    color_clock: u32,
    blank_reset_clock: u32,
    hsync_on: bool,
    vsync_on: bool,
    /// Holds the MPU's readiness flag low until end of scanline.
    wait_for_sync: bool,

    player0: Player,
    player1: Player,
    missile0: Missile,
    missile1: Missile,
    ball: Ball,
    playfield: Playfield,

    audio0: AudioGenerator,
    audio1: AudioGenerator,
}

impl Tia {
    pub fn new() -> Tia {
        Tia {
            reg_vsync: 0,
            reg_vblank: 0,
            reg_colup0: 0,
            reg_colup1: 0,
            reg_colupf: 0,
            reg_colubk: 0,

            reg_cxm0p: 0,
            reg_cxm1p: 0,
            reg_cxp0fb: 0,
            reg_cxp1fb: 0,
            reg_cxm0fb: 0,
            reg_cxm1fb: 0,
            reg_cxblpf: 0,
            reg_cxppmm: 0,

            input_ports: enum_map! { _ => true },
            reg_inpt45: enum_map! { _ => true },

            color_clock: 0,
            blank_reset_clock: HBLANK_WIDTH,
            hsync_on: false,
            vsync_on: false,
            wait_for_sync: false,

            player0: Player::new(),
            player1: Player::new(),
            missile0: Missile::new(),
            missile1: Missile::new(),
            ball: Ball::new(),
            playfield: Playfield::new(),

            audio0: AudioGenerator::new(),
            audio1: AudioGenerator::new(),
        }
    }

    /// Runs a single color-clock step. Returns the signal word for this
    /// clock, plus flags telling the console whether to drive the RIOT and
    /// MPU this tick.
    pub fn tick(&mut self) -> TiaOutput {
        let horizontal_blank = self.color_clock < self.blank_reset_clock;

        let pixel = if horizontal_blank {
            None
        } else {
            let p = self.color_clock - HBLANK_WIDTH;
            let color = self.draw(p);
            self.advance_objects();
            color
        };

        let output = TiaOutput {
            video: VideoOutput {
                hsync: self.hsync_on,
                vsync: self.vsync_on,
                pixel,
            },
            audio: AudioOutput {
                au0: self.audio0.tick(),
                au1: self.audio1.tick(),
            },
            riot_tick: self.color_clock % 3 == 0,
            cpu_tick: !self.wait_for_sync && self.color_clock % 3 == 0,
        };

        self.advance_color_clock();
        output
    }

    /// Computes the collision mask and the output color index for the
    /// current clock, per §4.3's draw predicates and priority chain.
    fn draw(&mut self, p: u32) -> Option<u8> {
        let p0 = self.player0.is_drawing();
        let p1 = self.player1.is_drawing();
        if self.missile0.reset_to_player() {
            self.missile0.set_position(self.player0.position());
        }
        if self.missile1.reset_to_player() {
            self.missile1.set_position(self.player1.position());
        }
        let m0 = self.missile0.is_drawing();
        let m1 = self.missile1.is_drawing();
        let bl = self.ball.is_drawing();
        let pf = self.playfield.is_drawing(p);

        self.accumulate_collisions(p0, p1, m0, m1, bl, pf);

        if self.reg_vblank & flags::VBLANK_ON != 0 {
            return None;
        }

        let right_half = p >= 80;
        Some(if pf && self.playfield.priority && !self.playfield.score_mode {
            self.reg_colupf
        } else if p0 || m0 {
            self.reg_colup0
        } else if p1 || m1 {
            self.reg_colup1
        } else if bl {
            self.reg_colupf
        } else if pf {
            if self.playfield.score_mode {
                if right_half {
                    self.reg_colup1
                } else {
                    self.reg_colup0
                }
            } else {
                self.reg_colupf
            }
        } else {
            self.reg_colubk
        })
    }

    fn accumulate_collisions(&mut self, p0: bool, p1: bool, m0: bool, m1: bool, bl: bool, pf: bool) {
        if m0 && p1 {
            self.reg_cxm0p |= 1 << 7;
        }
        if m0 && p0 {
            self.reg_cxm0p |= 1 << 6;
        }
        if m1 && p0 {
            self.reg_cxm1p |= 1 << 7;
        }
        if m1 && p1 {
            self.reg_cxm1p |= 1 << 6;
        }
        if p0 && pf {
            self.reg_cxp0fb |= 1 << 7;
        }
        if p0 && bl {
            self.reg_cxp0fb |= 1 << 6;
        }
        if p1 && pf {
            self.reg_cxp1fb |= 1 << 7;
        }
        if p1 && bl {
            self.reg_cxp1fb |= 1 << 6;
        }
        if m0 && pf {
            self.reg_cxm0fb |= 1 << 7;
        }
        if m0 && bl {
            self.reg_cxm0fb |= 1 << 6;
        }
        if m1 && pf {
            self.reg_cxm1fb |= 1 << 7;
        }
        if m1 && bl {
            self.reg_cxm1fb |= 1 << 6;
        }
        if bl && pf {
            self.reg_cxblpf |= 1 << 7;
        }
        if p0 && p1 {
            self.reg_cxppmm |= 1 << 7;
        }
        if m0 && m1 {
            self.reg_cxppmm |= 1 << 6;
        }
    }

    fn advance_objects(&mut self) {
        self.player0.tick();
        self.player1.tick();
        self.missile0.tick();
        self.missile1.tick();
        self.ball.tick();
    }

    fn advance_color_clock(&mut self) {
        match self.color_clock {
            HSYNC_START => self.hsync_on = true,
            HSYNC_END => self.hsync_on = false,
            _ => {}
        }
        self.color_clock += 1;
        if self.color_clock >= TOTAL_WIDTH {
            self.color_clock = 0;
            self.blank_reset_clock = HBLANK_WIDTH;
            self.wait_for_sync = false;
        }
    }

    pub fn set_port(&mut self, port: Port, value: bool) {
        self.input_ports[port] = value;
        if matches!(port, Port::Input4 | Port::Input5) {
            self.update_latch(port);
        }
    }

    fn update_latch(&mut self, port: Port) {
        let latch_enabled = self.reg_vblank & flags::VBLANK_INPUT_LATCH != 0;
        let current = self.input_ports[port];
        let previous = self.reg_inpt45[port];
        self.reg_inpt45[port] = current && (!latch_enabled || previous);
    }

    fn read_inpt(&self, port: Port) -> u8 {
        if self.reg_vblank & flags::VBLANK_INPUT_DUMP != 0 {
            return 0;
        }
        let high = match port {
            Port::Input4 | Port::Input5 => self.reg_inpt45[port],
            _ => self.input_ports[port],
        };
        if high {
            flags::INPUT_HIGH
        } else {
            0
        }
    }
}

impl Inspect for Tia {
    fn inspect(&self, address: u16) -> ReadResult {
        match address & 0b1111 {
            registers::CXM0P => Ok(self.reg_cxm0p),
            registers::CXM1P => Ok(self.reg_cxm1p),
            registers::CXP0FB => Ok(self.reg_cxp0fb),
            registers::CXP1FB => Ok(self.reg_cxp1fb),
            registers::CXM0FB => Ok(self.reg_cxm0fb),
            registers::CXM1FB => Ok(self.reg_cxm1fb),
            registers::CXBLPF => Ok(self.reg_cxblpf),
            registers::CXPPMM => Ok(self.reg_cxppmm),
            registers::INPT0 => Ok(self.read_inpt(Port::Input0)),
            registers::INPT1 => Ok(self.read_inpt(Port::Input1)),
            registers::INPT2 => Ok(self.read_inpt(Port::Input2)),
            registers::INPT3 => Ok(self.read_inpt(Port::Input3)),
            registers::INPT4 => Ok(self.read_inpt(Port::Input4)),
            registers::INPT5 => Ok(self.read_inpt(Port::Input5)),
            _ => Err(ReadError { address }),
        }
    }
}

impl Read for Tia {
    fn read(&mut self, address: u16) -> ReadResult {
        self.inspect(address)
    }
}

impl Write for Tia {
    fn write(&mut self, address: u16, value: u8) -> WriteResult {
        match address & 0b0011_1111 {
            registers::VSYNC => {
                self.reg_vsync = value;
                self.vsync_on = value & flags::VSYNC_ON != 0;
            }
            registers::VBLANK => {
                let was_latched = self.reg_vblank & flags::VBLANK_INPUT_LATCH != 0;
                self.reg_vblank = value;
                if was_latched && value & flags::VBLANK_INPUT_LATCH == 0 {
                    self.reg_inpt45 = enum_map! { _ => true };
                }
            }
            registers::WSYNC => {
                if self.color_clock != 0 {
                    self.wait_for_sync = true;
                }
            }
            registers::RSYNC => {
                self.color_clock = (TOTAL_WIDTH as i32 - 6).rem_euclid(TOTAL_WIDTH as i32) as u32;
            }
            registers::NUSIZ0 => {
                self.player0.set_nusiz(value);
                self.missile0.set_nusiz(value);
            }
            registers::NUSIZ1 => {
                self.player1.set_nusiz(value);
                self.missile1.set_nusiz(value);
            }
            registers::COLUP0 => self.reg_colup0 = value,
            registers::COLUP1 => self.reg_colup1 = value,
            registers::COLUPF => self.reg_colupf = value,
            registers::COLUBK => self.reg_colubk = value,
            registers::CTRLPF => {
                self.playfield.set_ctrlpf(value);
                self.ball.set_size(value);
            }
            registers::REFP0 => self.player0.set_refp(value),
            registers::REFP1 => self.player1.set_refp(value),
            registers::PF0 => self.playfield.set_pf0(value),
            registers::PF1 => self.playfield.set_pf1(value),
            registers::PF2 => self.playfield.set_pf2(value),
            registers::RESP0 => self.player0.reset_position(),
            registers::RESP1 => self.player1.reset_position(),
            registers::RESM0 => self.missile0.reset_position(),
            registers::RESM1 => self.missile1.reset_position(),
            registers::RESBL => self.ball.reset_position(),

            registers::AUDC0 => self.audio0.set_pattern(value),
            registers::AUDC1 => self.audio1.set_pattern(value),
            registers::AUDF0 => self.audio0.set_frequency_divider(value),
            registers::AUDF1 => self.audio1.set_frequency_divider(value),
            registers::AUDV0 => self.audio0.set_volume(value),
            registers::AUDV1 => self.audio1.set_volume(value),

            registers::GRP0 => {
                self.player1.latch_delayed();
                self.player0.write_graphics(value);
            }
            registers::GRP1 => {
                self.player0.latch_delayed();
                self.player1.write_graphics(value);
                self.ball.latch_delayed();
            }
            registers::ENAM0 => self.missile0.set_enabled(value),
            registers::ENAM1 => self.missile1.set_enabled(value),
            registers::ENABL => self.ball.set_enabled(value),
            registers::HMP0 => self.player0.set_motion(value),
            registers::HMP1 => self.player1.set_motion(value),
            registers::HMM0 => self.missile0.set_motion(value),
            registers::HMM1 => self.missile1.set_motion(value),
            registers::HMBL => self.ball.set_motion(value),
            registers::VDELP0 => self.player0.set_vdelp(value),
            registers::VDELP1 => self.player1.set_vdelp(value),
            registers::VDELBL => self.ball.set_vdelbl(value),
            registers::RESMP0 => self.missile0.set_reset_to_player(value),
            registers::RESMP1 => self.missile1.set_reset_to_player(value),
            registers::HMOVE => {
                self.blank_reset_clock = HBLANK_EXTENDED_WIDTH;
                self.player0.hmove_adjust(self.color_clock);
                self.player1.hmove_adjust(self.color_clock);
                self.missile0.hmove_adjust(self.color_clock);
                self.missile1.hmove_adjust(self.color_clock);
                self.ball.hmove_adjust(self.color_clock);
            }
            registers::HMCLR => {
                self.player0.set_motion(0);
                self.player1.set_motion(0);
                self.missile0.set_motion(0);
                self.missile1.set_motion(0);
                self.ball.set_motion(0);
            }
            registers::CXCLR => {
                self.reg_cxm0p = 0;
                self.reg_cxm1p = 0;
                self.reg_cxp0fb = 0;
                self.reg_cxp1fb = 0;
                self.reg_cxm0fb = 0;
                self.reg_cxm1fb = 0;
                self.reg_cxblpf = 0;
                self.reg_cxppmm = 0;
            }
            _ => return Err(WriteError { address, value }),
        }
        Ok(())
    }
}

impl Memory for Tia {}

/// TIA output structure. It indicates how a single TIA clock tick influences
/// other parts of the system.
pub struct TiaOutput {
    pub video: VideoOutput,
    pub audio: AudioOutput,
    /// If `true`, TIA allows the MPU to perform a tick. Otherwise, the MPU
    /// is put on hold.
    pub cpu_tick: bool,
    /// If `true`, TIA tells RIOT to perform a tick.
    pub riot_tick: bool,
}

/// TIA video output. The TIA chip actually produces a composite sync signal,
/// but it doesn't make sense to encode it only to decode it downstream in
/// the emulation process.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct VideoOutput {
    pub vsync: bool,
    pub hsync: bool,
    /// If outside horizontal and vertical blanking area, this field contains
    /// the currently emitted pixel's palette index.
    pub pixel: Option<u8>,
}

#[cfg(test)]
impl VideoOutput {
    pub fn pixel(pixel: u8) -> Self {
        VideoOutput { vsync: false, hsync: false, pixel: Some(pixel) }
    }

    pub fn blank() -> Self {
        VideoOutput { vsync: false, hsync: false, pixel: None }
    }

    pub fn with_hsync(mut self) -> Self {
        self.hsync = true;
        self
    }

    pub fn with_vsync(mut self) -> Self {
        self.vsync = true;
        self
    }
}

pub const HSYNC_START: u32 = 16;
pub const HSYNC_END: u32 = 32;
pub const HBLANK_WIDTH: u32 = 68;
pub const HBLANK_EXTENDED_WIDTH: u32 = 76;
pub const FRAME_WIDTH: u32 = 160;
pub const TOTAL_WIDTH: u32 = FRAME_WIDTH + HBLANK_WIDTH;

pub struct AudioOutput {
    pub au0: u8,
    pub au1: u8,
}
