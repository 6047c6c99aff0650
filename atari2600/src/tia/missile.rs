use super::flags;

/// A missile graphics object: a single-bit-wide, variable-width copy pattern
/// sharing its copy positions with the associated player.
#[derive(Debug)]
pub struct Missile {
    copy_mask: u16,
    size: u8,
    enabled: bool,
    reset_to_player: bool,
    position: u8,
    motion: i8,
}

impl Missile {
    pub fn new() -> Self {
        Missile {
            copy_mask: 0b1,
            size: 1,
            enabled: false,
            reset_to_player: false,
            position: 0,
            motion: 0,
        }
    }

    pub fn set_reset_to_player(&mut self, value: u8) {
        self.reset_to_player = value & flags::RESMPX_RESET != 0;
    }

    pub fn reset_to_player(&self) -> bool {
        self.reset_to_player
    }

    pub fn set_position(&mut self, position: u8) {
        self.position = position;
    }

    /// Shares the player's copy-mask bits (NUSIZx bits 0-2) but keeps its own
    /// width from bits 4-5.
    pub fn set_nusiz(&mut self, value: u8) {
        self.copy_mask = super::player::copy_mask_for_nusiz(value);
        let width_bits = (value & flags::NUSIZX_MISSILE_WIDTH_MASK) >> flags::NUSIZX_MISSILE_WIDTH_SHIFT;
        self.size = 1 << width_bits;
    }

    pub fn set_enabled(&mut self, value: u8) {
        self.enabled = value & flags::ENAXX_ENABLE != 0;
    }

    pub fn set_motion(&mut self, value: u8) {
        self.motion = flags::motion_from_reg(value);
    }

    pub fn reset_position(&mut self) {
        self.position = 156;
    }

    pub fn hmove_adjust(&mut self, color_clock: u32) {
        if color_clock > 69 {
            return;
        }
        let window = (76 - 7 - color_clock as i32) / 4;
        let delta = (self.motion as i32).min(window);
        self.advance_by(delta);
    }

    pub fn tick(&mut self) {
        self.advance_by(1);
    }

    fn advance_by(&mut self, delta: i32) {
        let step: i32 = if delta >= 0 { 1 } else { -1 };
        for _ in 0..delta.abs() {
            self.position = (self.position as i32 + step).rem_euclid(160) as u8;
        }
    }

    pub fn is_drawing(&self) -> bool {
        if !self.enabled || self.reset_to_player {
            return false;
        }
        let p = self.position as u32;
        let section = p >> 3;
        if section >= 16 || self.copy_mask & (1 << section) == 0 {
            return false;
        }
        (p & 0b111) < self.size as u32
    }
}
