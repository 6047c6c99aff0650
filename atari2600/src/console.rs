//! The master-clock driver: owns the MPU, RIOT, TIA and the currently
//! inserted cartridge, steps them in lockstep, and exposes the host-facing
//! callback and input surface (§4.5/§4.6/§6).

use crate::address_space::AddressSpace;
use crate::cartridge::{Cartridge, CartridgeError};
use crate::controller::{Controller, PanelSwitch};
use crate::riot::{self, Riot};
use crate::tia::{self, AudioOutput, Tia, VideoOutput};
use std::error;
use ya6502::cpu::Cpu;

/// Cartridge ROM sizes the console accepts, with the byte length each tag
/// declares; `insert_cartridge` rejects a mismatch as a `CartridgeError`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CartridgeType {
    TwoKilobytes,
    FourKilobytes,
    EightKilobytes,
    TwelveKilobytes,
    SixteenKilobytes,
    ThirtyTwoKilobytes,
}

impl CartridgeType {
    fn expected_size(self) -> usize {
        match self {
            Self::TwoKilobytes => 0x0800,
            Self::FourKilobytes => 0x1000,
            Self::EightKilobytes => 0x2000,
            Self::TwelveKilobytes => 0x3000,
            Self::SixteenKilobytes => 0x4000,
            Self::ThirtyTwoKilobytes => 0x8000,
        }
    }

    /// Infers the cartridge type from a ROM image's byte length, for hosts
    /// (like the demonstration binary) that only have a file to go on.
    pub fn from_size(size: usize) -> Option<Self> {
        match size {
            0x0800 => Some(Self::TwoKilobytes),
            0x1000 => Some(Self::FourKilobytes),
            0x2000 => Some(Self::EightKilobytes),
            0x3000 => Some(Self::TwelveKilobytes),
            0x4000 => Some(Self::SixteenKilobytes),
            0x8000 => Some(Self::ThirtyTwoKilobytes),
            _ => None,
        }
    }
}

/// A no-op placeholder cartridge, installed until the host calls
/// `insert_cartridge`.
fn blank_cartridge() -> Cartridge {
    Cartridge::new(&[0u8; 0x1000]).expect("0x1000 is always a valid cartridge size")
}

type VideoCallback = Box<dyn FnMut(VideoOutput)>;
type AudioCallback = Box<dyn FnMut(AudioOutput)>;

pub struct Console {
    cpu: Cpu<AddressSpace>,
    controller: Controller,
    video_callback: VideoCallback,
    audio_callback: AudioCallback,
}

impl Console {
    pub fn new() -> Self {
        let address_space = AddressSpace {
            tia: Tia::new(),
            riot: Riot::new(),
            cartridge: blank_cartridge(),
        };
        Console {
            cpu: Cpu::new(Box::new(address_space)),
            controller: Controller::new(),
            video_callback: Box::new(|_| {}),
            audio_callback: Box::new(|_| {}),
        }
    }

    /// Registers the callback invoked once per TIA color clock with that
    /// clock's video signal (§6).
    pub fn set_video_callback(&mut self, callback: impl FnMut(VideoOutput) + 'static) {
        self.video_callback = Box::new(callback);
    }

    /// Registers the callback invoked once per TIA color clock with that
    /// clock's audio sample, one per channel.
    pub fn set_audio_callback(&mut self, callback: impl FnMut(AudioOutput) + 'static) {
        self.audio_callback = Box::new(callback);
    }

    /// Loads a cartridge image matching `cartridge_type`'s declared size and
    /// resets the console, as real hardware does when a cartridge is
    /// inserted and the console is powered on.
    pub fn insert_cartridge(
        &mut self,
        cartridge_type: CartridgeType,
        bytes: &[u8],
    ) -> Result<(), CartridgeError> {
        if bytes.len() != cartridge_type.expected_size() {
            return Err(CartridgeError::size_mismatch(bytes.len()));
        }
        self.cpu.mut_memory().cartridge = Cartridge::new(bytes)?;
        self.reset().expect("reset right after cartridge insertion cannot fail");
        Ok(())
    }

    pub fn joysticks_write(&mut self, buttons: [u8; 2]) {
        self.controller.joysticks_write(buttons);
        self.sync_controller_ports();
    }

    pub fn set_switch(&mut self, switch: PanelSwitch, up: bool) {
        self.controller.set_switch(switch, up);
        self.sync_controller_ports();
    }

    fn sync_controller_ports(&mut self) {
        let memory = self.cpu.mut_memory();
        memory.riot.set_port(riot::Port::PA, self.controller.port_a_value());
        memory.riot.set_port(riot::Port::PB, self.controller.port_b_value());
        memory.tia.set_port(tia::Port::Input4, self.controller.fire_input_pin(0));
        memory.tia.set_port(tia::Port::Input5, self.controller.fire_input_pin(1));
    }

    /// Resets the MPU, RIOT RAM contents, and the cartridge's bank index,
    /// then runs a handful of clocks so the first instruction is decoded.
    pub fn reset(&mut self) -> Result<(), Box<dyn error::Error>> {
        self.cpu.mut_memory().riot.reset();
        self.cpu.mut_memory().cartridge.reset();
        self.cpu.reset()?;
        self.sync_controller_ports();
        for _ in 0..8 {
            self.advance_clock()?;
        }
        Ok(())
    }

    /// One master clock tick: a single TIA color clock, with the MPU and
    /// RIOT each advancing in step at their 1/3x rate as the TIA signals
    /// (§5's ordering guarantee: MPU step, then RIOT step, then the TIA
    /// step that produced the signal).
    pub fn advance_clock(&mut self) -> Result<(), Box<dyn error::Error>> {
        let tia_result = self.cpu.mut_memory().tia.tick();
        if tia_result.cpu_tick {
            self.cpu.tick()?;
        }
        if tia_result.riot_tick {
            self.cpu.mut_memory().riot.tick();
        }
        (self.video_callback)(tia_result.video);
        (self.audio_callback)(tia_result.audio);
        Ok(())
    }

    pub fn cpu(&self) -> &Cpu<AddressSpace> {
        &self.cpu
    }
}
