//! Static configuration of a display: its geometry on the controller's RAM and the panel wiring
//! settings sent during bring-up.

use crate::command::consts::*;
use crate::command::*;
use crate::error::Error;

/// A configuration for the display. It is fixed once the driver is built. Builder methods offer
/// a declarative way to override the settings the bring-up sequence sends, which default to the
/// values that suit the common 128x64 modules. Offsets default to 0; modules whose glass starts
/// at column 4 need `offset(4, 0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) x_offset: u16,
    pub(crate) y_offset: u16,
    pub(crate) bus_frequency: u32,
    pub(crate) bias: Bias,
    pub(crate) segment_direction: SegmentDirection,
    pub(crate) com_scan_direction: ComScanDirection,
    pub(crate) resistor_ratio: u8,
    pub(crate) contrast: u8,
}

impl DisplayConfig {
    /// Create a new configuration for a display with `width` x `height` viewable pixels.
    pub fn new(width: u16, height: u16) -> Self {
        DisplayConfig {
            width,
            height,
            x_offset: 0,
            y_offset: 0,
            bus_frequency: 4_000_000,
            bias: Bias::OneSeventh,
            segment_direction: SegmentDirection::Normal,
            com_scan_direction: ComScanDirection::Reverse,
            resistor_ratio: 7,
            contrast: 0,
        }
    }

    /// Some modules connect the glass starting part way into the controller's RAM. `x` is the RAM
    /// column shown as pixel column 0, and `y` is the RAM row shown as pixel row 0; `y` must fall
    /// on a page boundary.
    pub fn offset(self, x: u16, y: u16) -> Self {
        Self {
            x_offset: x,
            y_offset: y,
            ..self
        }
    }

    /// The maximum SPI clock the module accepts, in Hz. Only informational for the driver; use it
    /// when setting up the SPI device.
    pub fn bus_frequency(self, hz: u32) -> Self {
        Self {
            bus_frequency: hz,
            ..self
        }
    }

    /// See `Command::SetBias`.
    pub fn bias(self, bias: Bias) -> Self {
        Self { bias, ..self }
    }

    /// See `Command::SetSegmentDirection`.
    pub fn segment_direction(self, segment_direction: SegmentDirection) -> Self {
        Self {
            segment_direction,
            ..self
        }
    }

    /// See `Command::SetComScanDirection`.
    pub fn com_scan_direction(self, com_scan_direction: ComScanDirection) -> Self {
        Self {
            com_scan_direction,
            ..self
        }
    }

    /// See `Command::SetResistorRatio`.
    pub fn resistor_ratio(self, ratio: u8) -> Self {
        Self {
            resistor_ratio: ratio,
            ..self
        }
    }

    /// The electronic volume set at the end of bring-up. See `Command::SetVolume`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bus_frequency_hz(&self) -> u32 {
        self.bus_frequency
    }

    /// Bytes in one page band of the framebuffer, one per pixel column.
    pub fn row_bytes(&self) -> usize {
        self.width as usize
    }

    pub fn page_count(&self) -> usize {
        (self.height / PAGE_HEIGHT) as usize
    }

    /// Size of the framebuffer this configuration needs.
    pub const fn buffer_len(width: u16, height: u16) -> usize {
        width as usize * height as usize / 8
    }

    /// RAM column that pixel column 0 is written to.
    pub(crate) fn start_column(&self) -> u8 {
        self.x_offset as u8
    }

    /// RAM page that framebuffer page 0 is written to.
    pub(crate) fn start_page(&self) -> u8 {
        (self.y_offset / PAGE_HEIGHT) as u8
    }

    /// Check that the display fits in the controller's RAM and that every setting is in range.
    pub fn validate(&self) -> Result<(), Error> {
        if false
            || self.width == 0
            || self.height == 0
            || self.height % PAGE_HEIGHT != 0
            || self.y_offset % PAGE_HEIGHT != 0
            || self.x_offset as u32 + self.width as u32 > NUM_COLUMNS as u32
            || self.y_offset as u32 + self.height as u32 > NUM_ROWS as u32
            || self.resistor_ratio > RESISTOR_RATIO_MAX
            || self.contrast > VOLUME_MAX
        {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}
