use image::Pixel;
use image::Rgba;

/// A color palette that maps 8-bit TIA color codes (see
/// [`tia::VideoOutput.pixel`](../tia/struct.VideoOutput.html#structfield.pixel))
/// to RGBA pixels.
pub type Palette = Vec<Rgba<u8>>;

/// Creates a TIA palette of RGBA colors out of an `u32` array slice. Each number
/// represents a 3-byte RGB color, where each channel is represented by 8 bits.
///
/// Note: TIA only uses 7 bits for representing colors, and bit 0 is unused. For
/// simplicity, we just store each color twice so that accessing the palette with
/// bit 0 set either to 0 or 1 yields the same RGBA pixel.
pub fn create_palette(colors: &[u32]) -> Palette {
    let mut palette = Palette::with_capacity(colors.len() * 2);
    for color in colors {
        let color_rgba = Rgba::from_channels(
            ((color & 0xFF0000) >> 16) as u8, // Red (most significant byte)
            ((color & 0xFF00) >> 8) as u8,    // Blue
            (color & 0xFF) as u8,             // Green (least significant byte)
            0xFF,                             // Alpha: always set to 100% opacity
        );
        palette.push(color_rgba);
        palette.push(color_rgba);
    }
    return palette;
}
