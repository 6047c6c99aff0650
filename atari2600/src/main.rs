mod address_space;
mod audio;
mod cartridge;
mod console;
mod controller;
mod palette;
mod riot;
mod tia;

use audio::create_consumer_and_source;
use clap::Parser;
use console::{CartridgeType, Console};
use controller::PanelSwitch;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A minimal demonstration host: loads a ROM, drives the console's master
/// clock, and reports the frame count. Wiring the video signal to an actual
/// display and the audio samples to an actual output device is host-level
/// plumbing and out of scope for this crate.
#[derive(Parser)]
#[clap(name = "atari2600")]
struct Args {
    /// Path to the ROM image to load.
    rom_file: String,
}

fn main() {
    let args = Args::parse();
    let rom_bytes = std::fs::read(&args.rom_file).unwrap_or_else(|e| {
        eprintln!("Unable to read the ROM image file: {}", e);
        process::exit(1);
    });
    let cartridge_type = CartridgeType::from_size(rom_bytes.len()).unwrap_or_else(|| {
        eprintln!("Unsupported ROM size: {} bytes", rom_bytes.len());
        process::exit(1);
    });

    let mut console = Console::new();
    if let Err(e) = console.insert_cartridge(cartridge_type, &rom_bytes) {
        eprintln!("Unable to load the ROM into the console: {}", e);
        process::exit(1);
    }

    console.set_switch(PanelSwitch::TvType, true);
    console.set_switch(PanelSwitch::LeftDifficulty, true);
    console.set_switch(PanelSwitch::RightDifficulty, true);
    console.set_switch(PanelSwitch::GameReset, false);
    console.set_switch(PanelSwitch::GameReset, true);
    console.joysticks_write([0, 0]);

    let (audio_consumer, _audio_source) = create_consumer_and_source();
    console.set_audio_callback(move |audio| {
        audio_consumer.consume((audio.au0 as f32 + audio.au1 as f32) / 30.0 - 0.5);
    });

    console.set_video_callback(move |video| {
        if video.vsync {
            eprint!(".");
        }
    });

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_handler = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        eprintln!("Terminating.");
        interrupted_handler.store(true, Ordering::Relaxed);
    })
    .expect("Unable to set interrupt signal handler");

    println!("Ready player ONE!");
    while !interrupted.load(Ordering::Relaxed) {
        if let Err(e) = console.advance_clock() {
            eprintln!("ERROR: {}. Console halted.", e);
            break;
        }
    }
}
