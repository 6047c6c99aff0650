#![cfg(test)]

use super::*;

fn wait_ticks(tia: &mut Tia, n: u32) {
    for _ in 0..n {
        tia.tick();
    }
}

fn scan_video(tia: &mut Tia, n_pixels: u32) -> Vec<VideoOutput> {
    (0..n_pixels).map(|_| tia.tick().video).collect()
}

fn scan_audio(tia: &mut Tia, n_ticks: u32) -> Vec<AudioOutput> {
    (0..n_ticks).map(|_| tia.tick().audio).collect()
}

#[test]
fn draws_background_pixels() {
    let mut tia = Tia::new();
    wait_ticks(&mut tia, HBLANK_WIDTH);

    tia.write(registers::COLUBK, 0x02).unwrap();
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x02));

    tia.write(registers::COLUBK, 0xfe).unwrap();
    assert_eq!(tia.tick().video, VideoOutput::pixel(0xfe));
}

#[test]
fn horizontal_blank_suppresses_pixels() {
    let mut tia = Tia::new();
    tia.write(registers::COLUBK, 0x08).unwrap();
    let outputs = scan_video(&mut tia, HBLANK_WIDTH);
    assert!(outputs.iter().all(|o| o.pixel.is_none()));
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x08));
}

#[test]
fn hmove_extends_horizontal_blank_to_76_clocks() {
    let mut tia = Tia::new();
    tia.write(registers::COLUBK, 0x08).unwrap();
    wait_ticks(&mut tia, 10);
    tia.write(registers::HMOVE, 0).unwrap();
    let outputs = scan_video(&mut tia, HBLANK_EXTENDED_WIDTH - 10);
    assert!(outputs.iter().all(|o| o.pixel.is_none()));
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x08));
}

#[test]
fn emits_vsync() {
    let mut tia = Tia::new();
    tia.write(registers::VSYNC, flags::VSYNC_ON).unwrap();
    wait_ticks(&mut tia, 10);
    assert!(tia.tick().video.vsync);

    tia.write(registers::VSYNC, 0).unwrap();
    assert!(!tia.tick().video.vsync);
}

#[test]
fn emits_hsync_once_per_scanline() {
    let mut tia = Tia::new();
    let outputs = scan_video(&mut tia, TOTAL_WIDTH);
    let hsync_count = outputs.iter().filter(|o| o.hsync).count();
    assert_eq!(hsync_count, (HSYNC_END - HSYNC_START) as usize);
}

#[test]
fn wsync_stalls_cpu_until_end_of_scanline() {
    let mut tia = Tia::new();
    wait_ticks(&mut tia, 9);
    tia.write(registers::WSYNC, 0).unwrap();

    let mut saw_cpu_tick = false;
    for _ in 0..(TOTAL_WIDTH - 9) {
        if tia.tick().cpu_tick {
            saw_cpu_tick = true;
        }
    }
    assert!(!saw_cpu_tick);
    // The clock wrapped back to 0, so the MPU is released again.
    assert!(tia.tick().cpu_tick);
}

#[test]
fn rsync_jumps_close_to_end_of_scanline() {
    let mut tia = Tia::new();
    tia.write(registers::RSYNC, 0).unwrap();
    assert_eq!(tia.color_clock, TOTAL_WIDTH - 6);
}

#[test]
fn vblank_suppresses_pixels_but_keeps_collisions() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x20).unwrap();
    tia.write(registers::GRP0, 0xFF).unwrap();
    tia.write(registers::COLUPF, 0x10).unwrap();
    tia.write(registers::PF0, 0b1111_0000).unwrap();
    tia.write(registers::VBLANK, flags::VBLANK_ON).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESP0, 0).unwrap();

    let outputs = scan_video(&mut tia, FRAME_WIDTH);
    assert!(outputs.iter().all(|o| o.pixel.is_none()));
    assert_ne!(tia.read(registers::CXP0FB).unwrap() & 0x80, 0);
}

#[test]
fn playfield_draws_left_half_from_pf1() {
    let mut tia = Tia::new();
    tia.write(registers::COLUPF, 0x10).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    // PF1 bit 7, read forward, is playfield bit 4: color clocks 16..20.
    tia.write(registers::PF1, 0b1000_0000).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH + 16);
    let outputs = scan_video(&mut tia, 4);
    assert!(outputs.iter().all(|o| o.pixel == Some(0x10)));
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x00));
}

#[test]
fn playfield_reflects_right_half_when_ctrlpf_set() {
    let mut tia = Tia::new();
    tia.write(registers::COLUPF, 0x10).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::CTRLPF, flags::CTRLPF_REFLECT).unwrap();
    // Playfield bit 0 (PF0's bit 4) is the first 4 clocks; reflected, it
    // should reappear as the scanline's last 4 clocks.
    tia.write(registers::PF0, 0b0001_0000).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH + FRAME_WIDTH - 4);
    let outputs = scan_video(&mut tia, 4);
    assert!(outputs.iter().all(|o| o.pixel == Some(0x10)));
}

#[test]
fn playfield_score_mode_colors_left_and_right_halves_separately() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x20).unwrap();
    tia.write(registers::COLUP1, 0x40).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::CTRLPF, flags::CTRLPF_SCORE).unwrap();
    tia.write(registers::PF0, 0b0001_0000).unwrap();
    tia.write(registers::PF1, 0b1000_0000).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    let left = scan_video(&mut tia, 4);
    assert!(left.iter().all(|o| o.pixel == Some(0x20)));
    wait_ticks(&mut tia, 76);
    let right = scan_video(&mut tia, 4);
    assert!(right.iter().all(|o| o.pixel == Some(0x40)));
}

#[test]
fn player_draws_single_copy_at_reset_position() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x20).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::GRP0, 0b1111_1111).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESP0, 0).unwrap();
    // RESPx effectively draws 3 clocks late; skip ahead to the visible copy.
    wait_ticks(&mut tia, 4);
    let outputs = scan_video(&mut tia, 8);
    assert!(outputs.iter().all(|o| o.pixel == Some(0x20)));
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x00));
}

#[test]
fn player_reflected_flips_graphics_pattern() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x20).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::REFP0, flags::REFPX_REFLECT).unwrap();
    tia.write(registers::GRP0, 0b1000_0000).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESP0, 0).unwrap();
    wait_ticks(&mut tia, 4 + 7);
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x20));
}

#[test]
fn player_vertical_delay_uses_previous_graphics_write() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x20).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::VDELP0, flags::VDELXX_ON).unwrap();
    tia.write(registers::GRP0, 0b1111_1111).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESP0, 0).unwrap();
    wait_ticks(&mut tia, 4);
    // Writing GRP1 latches player0's delayed copy of its previous GRP0 value.
    tia.write(registers::GRP1, 0).unwrap();
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x20));

    tia.write(registers::GRP0, 0).unwrap();
    tia.write(registers::GRP1, 0).unwrap();
}

#[test]
fn missile_draws_within_its_width() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x30).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::NUSIZ0, 0b0011_0000).unwrap(); // missile width 8
    tia.write(registers::ENAM0, flags::ENAXX_ENABLE).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESM0, 0).unwrap();
    wait_ticks(&mut tia, 4);
    let outputs = scan_video(&mut tia, 8);
    assert!(outputs.iter().all(|o| o.pixel == Some(0x30)));
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x00));
}

#[test]
fn missile_reset_to_player_never_draws_on_its_own() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x30).unwrap();
    tia.write(registers::ENAM0, flags::ENAXX_ENABLE).unwrap();
    tia.write(registers::RESMP0, flags::RESMPX_RESET).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    let outputs = scan_video(&mut tia, FRAME_WIDTH);
    assert!(outputs.iter().all(|o| o.pixel != Some(0x30)));
}

#[test]
fn ball_draws_within_its_width() {
    let mut tia = Tia::new();
    tia.write(registers::COLUPF, 0x40).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::CTRLPF, 0b0011_0000).unwrap(); // ball size 8
    tia.write(registers::ENABL, flags::ENAXX_ENABLE).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESBL, 0).unwrap();
    wait_ticks(&mut tia, 4);
    let outputs = scan_video(&mut tia, 8);
    assert!(outputs.iter().all(|o| o.pixel == Some(0x40)));
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x00));
}

#[test]
fn ball_delayed_enable_uses_value_latched_at_grp1_write() {
    let mut tia = Tia::new();
    tia.write(registers::COLUPF, 0x40).unwrap();
    tia.write(registers::COLUBK, 0x00).unwrap();
    tia.write(registers::VDELBL, flags::VDELXX_ON).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESBL, 0).unwrap();
    wait_ticks(&mut tia, 4);

    // Not yet enabled: nothing has latched.
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x00));

    tia.write(registers::ENABL, flags::ENAXX_ENABLE).unwrap();
    tia.write(registers::RESBL, 0).unwrap();
    wait_ticks(&mut tia, 4);
    // Still not drawing: the enable hasn't been latched in via GRP1 yet.
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x00));

    tia.write(registers::GRP1, 0).unwrap();
    tia.write(registers::RESBL, 0).unwrap();
    wait_ticks(&mut tia, 4);
    assert_eq!(tia.tick().video, VideoOutput::pixel(0x40));
}

#[test]
fn collision_latch_accumulates_and_is_cleared_by_cxclr() {
    let mut tia = Tia::new();
    tia.write(registers::COLUP0, 0x20).unwrap();
    tia.write(registers::GRP0, 0xFF).unwrap();
    tia.write(registers::COLUPF, 0x10).unwrap();
    tia.write(registers::PF0, 0b1111_0000).unwrap();
    wait_ticks(&mut tia, HBLANK_WIDTH);
    tia.write(registers::RESP0, 0).unwrap();
    wait_ticks(&mut tia, FRAME_WIDTH);

    assert_ne!(tia.read(registers::CXP0FB).unwrap() & 0x80, 0);

    tia.write(registers::CXCLR, 0).unwrap();
    assert_eq!(tia.read(registers::CXP0FB).unwrap(), 0);
}

#[test]
fn hmove_moves_player_copy_earlier_when_motion_is_positive() {
    // HMOVE's motion is added to the position counter itself: the more it
    // advances before the visible window starts, the sooner the counter
    // wraps back to its draw range, so positive motion pulls the copy left.
    let mut without_motion = Tia::new();
    without_motion.write(registers::COLUP0, 0x20).unwrap();
    without_motion.write(registers::COLUBK, 0x00).unwrap();
    without_motion.write(registers::GRP0, 0xFF).unwrap();
    without_motion.write(registers::RESP0, 0).unwrap();
    wait_ticks(&mut without_motion, HBLANK_WIDTH);
    let baseline = scan_video(&mut without_motion, FRAME_WIDTH);
    let baseline_start = baseline.iter().position(|o| o.pixel == Some(0x20)).unwrap();

    let mut with_motion = Tia::new();
    with_motion.write(registers::COLUP0, 0x20).unwrap();
    with_motion.write(registers::COLUBK, 0x00).unwrap();
    with_motion.write(registers::GRP0, 0xFF).unwrap();
    with_motion.write(registers::RESP0, 0).unwrap();
    with_motion.write(registers::HMP0, 0x70).unwrap(); // motion = +7
    with_motion.write(registers::HMOVE, 0).unwrap();
    wait_ticks(&mut with_motion, HBLANK_EXTENDED_WIDTH);
    let moved = scan_video(&mut with_motion, FRAME_WIDTH);
    let moved_start = moved.iter().position(|o| o.pixel == Some(0x20)).unwrap();

    assert!(moved_start < baseline_start);
}

#[test]
fn input_ports_reflect_pin_state() {
    let mut tia = Tia::new();
    tia.set_port(Port::Input0, false);
    assert_eq!(tia.read(registers::INPT0).unwrap(), 0);
    tia.set_port(Port::Input0, true);
    assert_eq!(tia.read(registers::INPT0).unwrap(), flags::INPUT_HIGH);
}

#[test]
fn input_latch_holds_port_4_low_once_tripped() {
    let mut tia = Tia::new();
    tia.write(registers::VBLANK, flags::VBLANK_INPUT_LATCH).unwrap();
    tia.set_port(Port::Input4, true);
    assert_eq!(tia.read(registers::INPT4).unwrap(), flags::INPUT_HIGH);
    tia.set_port(Port::Input4, false);
    // Once latched low, it stays low even after the pin returns high.
    assert_eq!(tia.read(registers::INPT4).unwrap(), 0);
    tia.set_port(Port::Input4, true);
    assert_eq!(tia.read(registers::INPT4).unwrap(), 0);

    tia.write(registers::VBLANK, 0).unwrap();
    assert_eq!(tia.read(registers::INPT4).unwrap(), flags::INPUT_HIGH);
}

#[test]
fn input_dump_grounds_inpt0() {
    let mut tia = Tia::new();
    tia.set_port(Port::Input0, true);
    tia.write(registers::VBLANK, flags::VBLANK_INPUT_DUMP).unwrap();
    assert_eq!(tia.read(registers::INPT0).unwrap(), 0);
}

#[test]
fn generates_audio() {
    let mut tia = Tia::new();
    tia.write(registers::AUDV0, 15).unwrap();
    tia.write(registers::AUDF0, 0).unwrap();
    tia.write(registers::AUDC0, 4).unwrap();
    let samples = scan_audio(&mut tia, 4);
    assert!(samples.iter().all(|a| a.au0 == 15 || a.au0 == 0));
}

#[test]
fn audio_volume_clamps_to_four_bits() {
    let mut tia = Tia::new();
    tia.write(registers::AUDF0, 0).unwrap();
    tia.write(registers::AUDC0, 4).unwrap();
    tia.write(registers::AUDV0, 0xF7).unwrap();
    let samples = scan_audio(&mut tia, 2);
    assert!(samples.iter().all(|a| a.au0 <= 0x07));
}
