use super::flags;

/// The playfield: a 20-bit pattern, precomputed into two 40-bit rendering
/// words (normal and reflected) covering the full scanline at 4-color-clocks
/// per bit.
///
/// Grounded on the teacher's `Tia::playfield_bit_at`/
/// `playfiled_bit_index_to_latch`, which assembled the same 20-bit pattern
/// one color clock at a time through a cycle-delay buffer; here the whole
/// 40-bit word is recomputed whenever a PFx or CTRLPF register changes,
/// since the spec's per-clock procedure reads it directly rather than
/// through a latch.
#[derive(Debug)]
pub struct Playfield {
    pf0: u8,
    pf1: u8,
    pf2: u8,
    word_normal: u64,
    word_reflected: u64,
    pub reflected: bool,
    pub score_mode: bool,
    pub priority: bool,
}

impl Playfield {
    pub fn new() -> Self {
        let mut playfield = Playfield {
            pf0: 0,
            pf1: 0,
            pf2: 0,
            word_normal: 0,
            word_reflected: 0,
            reflected: false,
            score_mode: false,
            priority: false,
        };
        playfield.recompute();
        playfield
    }

    pub fn set_pf0(&mut self, value: u8) {
        self.pf0 = value;
        self.recompute();
    }

    pub fn set_pf1(&mut self, value: u8) {
        self.pf1 = value;
        self.recompute();
    }

    pub fn set_pf2(&mut self, value: u8) {
        self.pf2 = value;
        self.recompute();
    }

    pub fn set_ctrlpf(&mut self, value: u8) {
        self.reflected = value & flags::CTRLPF_REFLECT != 0;
        self.score_mode = value & flags::CTRLPF_SCORE != 0;
        self.priority = value & flags::CTRLPF_PRIORITY != 0;
        self.recompute();
    }

    /// PF0's upper nibble read forward (bits 4-7), PF1 read backward (bits
    /// 7-0), PF2 read forward (bits 0-7): the three together form bits
    /// [0..20) of the left half of the scanline.
    fn bit_at(&self, index: u32) -> bool {
        let (mask, register) = match index {
            0..=3 => (0b0001_0000 << index, self.pf0),
            4..=11 => (0b1000_0000 >> (index - 4), self.pf1),
            12..=19 => (0b0000_0001 << (index - 12), self.pf2),
            _ => (0, 0),
        };
        mask & register != 0
    }

    fn recompute(&mut self) {
        let mut left: u64 = 0;
        for i in 0..20u32 {
            if self.bit_at(i) {
                left |= 1 << i;
            }
        }
        self.word_normal = left | (left << 20);
        let mut mirrored: u64 = 0;
        for i in 0..20u32 {
            if left & (1 << i) != 0 {
                mirrored |= 1 << (19 - i);
            }
        }
        self.word_reflected = left | (mirrored << 20);
    }

    /// True if the playfield draws at visible-window position `p` (0..159).
    pub fn is_drawing(&self, p: u32) -> bool {
        let word = if self.reflected {
            self.word_reflected
        } else {
            self.word_normal
        };
        let bit = p >> 2;
        word & (1 << bit) != 0
    }
}
