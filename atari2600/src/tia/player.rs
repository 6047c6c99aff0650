use super::flags;

/// One row of the NUSIZx copy-mode table: which of the ten 8-color-clock
/// sections starting a copy, and the size scale (0 = normal, 1 = double,
/// 2 = quad).
#[derive(Debug, Clone, Copy)]
struct CopyMode {
    mask: u16,
    scale: u8,
}

const COPY_MODES: [CopyMode; 8] = [
    CopyMode { mask: 0b00_0000_0001, scale: 0 }, // one copy
    CopyMode { mask: 0b00_0000_0101, scale: 0 }, // two copies, close
    CopyMode { mask: 0b00_0000_1001, scale: 0 }, // two copies, medium
    CopyMode { mask: 0b00_0001_0101, scale: 0 }, // three copies, close
    CopyMode { mask: 0b01_0000_0001, scale: 0 }, // two copies, wide
    CopyMode { mask: 0b00_0000_0011, scale: 1 }, // double-sized player
    CopyMode { mask: 0b01_0001_0001, scale: 0 }, // three copies, medium
    CopyMode { mask: 0b00_0000_1111, scale: 2 }, // quad-sized player
];

fn copy_mode(nusiz: u8) -> CopyMode {
    COPY_MODES[(nusiz & flags::NUSIZX_COPY_MODE_MASK) as usize]
}

/// The copy-mask bits of a NUSIZx value, shared with the associated missile
/// (which ignores the scale field players use to widen their own copies).
pub fn copy_mask_for_nusiz(value: u8) -> u16 {
    copy_mode(value).mask
}

/// A player graphics object: an 8-bit bitmap that can be drawn in up to
/// three copies per scanline, at normal/double/quad size.
#[derive(Debug)]
pub struct Player {
    copy_mask: u16,
    scale: u8,
    /// [current, delayed] x [normal, reflected] graphics patterns.
    graphics: [u8; 2],
    reflected: bool,
    vertical_delay: bool,
    position_reset_pending: bool,
    position: u8,
    motion: i8,
}

impl Player {
    pub fn new() -> Self {
        let mode = copy_mode(0);
        Player {
            copy_mask: mode.mask,
            scale: mode.scale,
            graphics: [0, 0],
            reflected: false,
            vertical_delay: false,
            position_reset_pending: false,
            position: 0,
            motion: 0,
        }
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn set_nusiz(&mut self, value: u8) {
        let mode = copy_mode(value);
        self.copy_mask = mode.mask;
        self.scale = mode.scale;
    }

    pub fn set_refp(&mut self, value: u8) {
        self.reflected = value & flags::REFPX_REFLECT != 0;
    }

    pub fn set_vdelp(&mut self, value: u8) {
        self.vertical_delay = value & flags::VDELXX_ON != 0;
    }

    /// Writes GRP0/GRP1's own current graphics.
    pub fn write_graphics(&mut self, value: u8) {
        self.graphics[0] = value;
    }

    /// Latches the other player's current graphics into its delayed slot;
    /// called when the complementary GRPx register is written.
    pub fn latch_delayed(&mut self) {
        self.graphics[1] = self.graphics[0];
    }

    pub fn set_motion(&mut self, value: u8) {
        self.motion = flags::motion_from_reg(value);
    }

    /// Resets the position counter to the reset point and marks the primary
    /// copy as pending until the next wraparound.
    pub fn reset_position(&mut self) {
        self.position = 156;
        self.position_reset_pending = true;
    }

    pub fn hmove_adjust(&mut self, color_clock: u32) {
        if color_clock > 69 {
            return;
        }
        let window = (76 - 7 - color_clock as i32) / 4;
        let delta = (self.motion as i32).min(window);
        self.advance_by(delta);
    }

    /// Advances the position counter by one tick (called once per non-blank
    /// color clock).
    pub fn tick(&mut self) {
        self.advance_by(1);
    }

    fn advance_by(&mut self, delta: i32) {
        let step: i32 = if delta >= 0 { 1 } else { -1 };
        for _ in 0..delta.abs() {
            self.position = (self.position as i32 + step).rem_euclid(160) as u8;
            if self.position == 0 {
                self.position_reset_pending = false;
            }
        }
    }

    fn graphics_pattern(&self) -> u8 {
        if self.vertical_delay {
            self.graphics[1]
        } else {
            self.graphics[0]
        }
    }

    /// True if this player should draw a pixel at the current position.
    pub fn is_drawing(&self) -> bool {
        if self.position_reset_pending {
            return false;
        }
        let p = self.position as u32;
        let section = (p >> 3) >> self.scale;
        if section >= 16 || self.copy_mask & (1 << section) == 0 {
            return false;
        }
        let bit = p & 0b111;
        let shift = if self.reflected { bit } else { 7 - bit };
        self.graphics_pattern() & (1 << shift) != 0
    }
}
