//! Types describing what the display can do and how pixel data handed to it is laid out.

/// Pixel formats a display driver may be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1 bit per pixel, 0 is black.
    Mono01,
    /// 1 bit per pixel, 1 is black.
    Mono10,
    Rgb565,
    Bgr565,
    Rgb888,
    Argb8888,
}

/// Rotation of the image relative to the panel's native scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
}

/// How bytes of pixel data map onto the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenLayout {
    /// Each byte is 8 vertically adjacent pixels of one column within a page, LSB on top.
    MonoVerticalTiled,
    /// Each byte is 8 horizontally adjacent pixels, MSB on the left.
    MonoHorizontalMsbFirst,
}

/// A static description of a display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub x_resolution: u16,
    pub y_resolution: u16,
    pub supported_pixel_formats: &'static [PixelFormat],
    pub current_pixel_format: PixelFormat,
    pub current_orientation: Orientation,
    pub screen_layout: ScreenLayout,
}

/// Describes a block of pixel data handed to a write.
///
/// `buf_size` is the number of bytes in the block. `width` and `height` are the pixel dimensions
/// of the block and `pitch` is the distance, in pixels, between the starts of consecutive rows.
/// For the vertically tiled layout a "row" of the block is one page band, `width` bytes long.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub buf_size: usize,
    pub width: u16,
    pub height: u16,
    pub pitch: u16,
}

impl BufferDescriptor {
    /// A descriptor for a tightly packed block of `width` x `height` pixels.
    pub fn packed(width: u16, height: u16) -> Self {
        BufferDescriptor {
            buf_size: width as usize * height as usize / 8,
            width,
            height,
            pitch: width,
        }
    }
}
