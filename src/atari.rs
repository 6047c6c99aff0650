use crate::address_space::AddressSpace;
use crate::colors;
use crate::cpu::CPU;
use crate::frame_renderer::FrameRenderer;
use crate::frame_renderer::FrameRendererBuilder;
use crate::memory::RAM;
use crate::tia::TIA;
use image;
use image::RgbaImage;

type AtariAddressSpace = AddressSpace<TIA, RAM, RAM>;

pub struct Atari<'a> {
    cpu: CPU<'a, AtariAddressSpace>,
    frame_renderer: FrameRenderer,
}

impl<'a> Atari<'a> {
    pub fn new(address_space: &mut AtariAddressSpace) -> Atari {
        Atari {
            cpu: CPU::new(address_space),
            frame_renderer: FrameRendererBuilder::new()
                .with_palette(colors::ntsc_palette())
                .build(),
        }
    }

    pub fn next_frame(&mut self) -> &RgbaImage {
        loop {
            let frame_complete = self.tick();
            if frame_complete {
                return self.frame_renderer.frame_image();
            }
        }
    }

    pub fn tick(&mut self) -> bool {
        let tia_result = self.cpu.memory().tia.tick();
        if tia_result.cpu_tick {
            self.cpu.tick();
        }
        return self.frame_renderer.consume(tia_result.video);
    }

    pub fn frame_image(&self) -> &RgbaImage {
        self.frame_renderer.frame_image()
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
    }
}
