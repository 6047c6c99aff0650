use super::flags;

/// A ball graphics object: a single copy, variable-width, with a delayed
/// enable latch tied to the player-1 graphics write.
///
/// Grounded on `rr_ball`/`rr_ball_needs_drawing` from
/// `examples/original_source/librayracer/objects/ball.h` and `ball.c`,
/// which the teacher's TIA never modeled at all (it had no ball object).
#[derive(Debug)]
pub struct Ball {
    size: u8,
    enabled_current: bool,
    enabled_delayed: bool,
    delayed: bool,
    position: u8,
    motion: i8,
}

impl Ball {
    pub fn new() -> Self {
        Ball {
            size: 1,
            enabled_current: false,
            enabled_delayed: false,
            delayed: false,
            position: 0,
            motion: 0,
        }
    }

    pub fn set_size(&mut self, ctrlpf: u8) {
        let bits = (ctrlpf & flags::CTRLPF_BALL_SIZE_MASK) >> flags::CTRLPF_BALL_SIZE_SHIFT;
        self.size = 1 << bits;
    }

    pub fn set_enabled(&mut self, value: u8) {
        self.enabled_current = value & flags::ENAXX_ENABLE != 0;
    }

    pub fn set_vdelbl(&mut self, value: u8) {
        self.delayed = value & flags::VDELXX_ON != 0;
    }

    /// Latches the current enabled flag into the delayed slot; called when
    /// GRP1 is written.
    pub fn latch_delayed(&mut self) {
        self.enabled_delayed = self.enabled_current;
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
        let enabled = if self.delayed {
            self.enabled_delayed
        } else {
            self.enabled_current
        };
        enabled && (self.position as u32) < self.size as u32
    }
}
