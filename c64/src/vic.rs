use std::cell::RefCell;
use std::rc::Rc;
use ya6502::memory::Read;
use ya6502::memory::ReadError;
use ya6502::memory::ReadResult;
use ya6502::memory::Write;
use ya6502::memory::WriteError;
use ya6502::memory::WriteResult;

pub type Color = u8;

/// VIC-II video chip emulator that outputs a stream of bytes. Each byte encodes
/// a single pixel and has a value from a 0..=15 range.
pub struct Vic<GM: Read, CM: Read> {
    graphics_memory: Box<GM>,
    color_memory: Rc<RefCell<CM>>,

    reg_border_color: Color,
    reg_background_color: Color,

    raster_counter: usize,
    x_counter: usize,
    graphics_column: u16,
    graphics_row: u16,
    character_offset: u16,
    graphics_mask: u8,
}

impl<GM: Read, CM: Read> Vic<GM, CM> {
    pub fn new(graphics_memory: Box<GM>, color_memory: Rc<RefCell<CM>>) -> Self {
        Self {
            graphics_memory,
            color_memory,

            reg_border_color: 0,
            reg_background_color: 0,

            raster_counter: 0,
            x_counter: 0,
            graphics_column: 0,
            graphics_row: 0,
            character_offset: 0,
            graphics_mask: 0b1000_0000,
        }
    }

    /// Emulates a single tick of the pixel clock and returns a pixel color. For
    /// simplicity, we don't distinguish between blanking and visible pixels.
    /// This is different from TIA, since TIA is controlled to much higher
    /// degree by software.
    pub fn tick(&mut self) -> TickResult {
        const DISPLAY_WINDOW_LAST_LINE: usize = BOTTOM_BORDER_FIRST_LINE - 1;
        const DISPLAY_WINDOW_END: usize = RIGHT_BORDER_START - 1;
        let color = match self.raster_counter {
            DISPLAY_WINDOW_FIRST_LINE..=DISPLAY_WINDOW_LAST_LINE => match self.x_counter {
                DISPLAY_WINDOW_START..=DISPLAY_WINDOW_END => self.background_tick()?,
                _ => self.reg_border_color,
            },
            _ => self.reg_border_color,
        };

        let output = VicOutput {
            x: self.x_counter,
            y: self.raster_counter,
            color,
        };

        self.x_counter += 1;
        if self.x_counter >= RASTER_LENGTH {
            self.x_counter = 0;
            self.raster_counter += 1;
            if self.raster_counter >= TOTAL_HEIGHT {
                self.raster_counter = 0;
            }
        }

        return Ok(output);
    }

    fn background_tick(&mut self) -> Result<Color, ReadError> {
        let character_index = self
            .graphics_memory
            .read(0x0400 + self.graphics_row + self.graphics_column)?;
        let character_pixel_row = self
            .graphics_memory
            .read(0x1000 + character_index as u16 * 8 + self.character_offset)?;
        let draws_graphics_pixel = character_pixel_row & self.graphics_mask != 0;
        let color = if draws_graphics_pixel {
            self.color_memory
                .borrow_mut()
                .read(0xD800 + self.graphics_row + self.graphics_column)?
        } else {
            self.reg_background_color
        };

        self.graphics_mask = self.graphics_mask.rotate_right(1);
        if self.graphics_mask & 0b1000_0000 != 0 {
            if self.graphics_column >= 39 {
                self.graphics_column = 0;
                if self.character_offset >= 7 {
                    self.character_offset = 0;
                    self.graphics_row = (self.graphics_row + 40) % (40 * 25);
                } else {
                    self.character_offset += 1;
                }
            } else {
                self.graphics_column += 1;
            }
        }

        return Ok(color);
    }
}

/// The video output of [`Vic::tick`]. Note that the coordinates are raw and
/// include horizontal and vertical blanking areas; it's u to the consumer to
/// crop pixels to the viewport.
pub struct VicOutput {
    pub color: Color,
    /// Raw X coordinate (including horizontal blanking area).
    pub x: usize,
    /// Raw Y coordinate (including vertical blanking area).
    pub y: usize,
}

pub type TickResult = Result<VicOutput, ReadError>;

impl<GM: Read, CM: Read> Read for Vic<GM, CM> {
    fn read(&self, address: u16) -> ReadResult {
        Err(ReadError { address })
    }
}

impl<GM: Read, CM: Read> Write for Vic<GM, CM> {
    fn write(&mut self, address: u16, value: u8) -> WriteResult {
        match address {
            registers::BORDER_COLOR => self.reg_border_color = value,
            registers::BACKGROUND_COLOR_0 => self.reg_background_color = value,
            _ => return Err(WriteError { address, value }),
        }
        Ok(())
    }
}

const LEFT_BORDER_START: usize = 77;
const LEFT_BORDER_WIDTH: usize = 47;
const DISPLAY_WINDOW_START: usize = LEFT_BORDER_START + LEFT_BORDER_WIDTH;
const DISPLAY_WINDOW_WIDTH: usize = 320;
const RIGHT_BORDER_START: usize = DISPLAY_WINDOW_START + DISPLAY_WINDOW_WIDTH;
#[allow(dead_code)]
const RIGHT_BORDER_WIDTH: usize = 48;
#[allow(dead_code)]
const BORDER_END: usize = RIGHT_BORDER_START + RIGHT_BORDER_WIDTH;
#[allow(dead_code)]
const VISIBLE_PIXELS: usize = LEFT_BORDER_WIDTH + DISPLAY_WINDOW_WIDTH + RIGHT_BORDER_WIDTH;
const RASTER_LENGTH: usize = 65 * 8;
#[allow(dead_code)]
const RIGHT_BLANK_WIDTH: usize = RASTER_LENGTH - BORDER_END;

#[allow(dead_code)]
const TOP_BORDER_FIRST_LINE: usize = 20;
#[allow(dead_code)]
const TOP_BORDER_HEIGHT: usize = DISPLAY_WINDOW_FIRST_LINE - TOP_BORDER_FIRST_LINE;
const DISPLAY_WINDOW_FIRST_LINE: usize = 51;
const DISPLAY_WINDOW_HEIGHT: usize = 200;
const BOTTOM_BORDER_FIRST_LINE: usize = DISPLAY_WINDOW_FIRST_LINE + DISPLAY_WINDOW_HEIGHT;
#[allow(dead_code)]
const BOTTOM_BORDER_HEIGHT: usize = TOTAL_HEIGHT - BOTTOM_BORDER_FIRST_LINE;
#[allow(dead_code)]
const TOTAL_HEIGHT: usize = 262;

mod registers {
    pub const BORDER_COLOR: u16 = 0xD020;
    pub const BACKGROUND_COLOR_0: u16 = 0xD021;
}
