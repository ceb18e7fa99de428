//! The command set for the ST7565.
//!
//! Every command is a single byte sent with A0 low. Commands with a parameter carry it in the low
//! bits of the opcode, except the electronic volume (contrast), which is a two-byte sequence of
//! `SelectVolume` followed by `SetVolume`.
//!
//! Note 1: The display RAM is 132 columns by 65 rows, organized as 8 pages of 8 rows (plus a
//! single-row icon page which this driver does not use). Each byte written to the RAM covers one
//! column of one page, with the least significant bit as the topmost row of the page.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Geometry of the controller's display RAM. (Note 1)

    pub const NUM_COLUMNS: u16 = 132;
    pub const NUM_ROWS: u16 = 64;
    pub const PAGE_HEIGHT: u16 = 8;
    pub const NUM_PAGES: u8 = (NUM_ROWS / PAGE_HEIGHT) as u8;
    pub const COLUMN_MAX: u8 = (NUM_COLUMNS - 1) as u8;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
    pub const START_LINE_MAX: u8 = (NUM_ROWS - 1) as u8;
    pub const VOLUME_MAX: u8 = 0x3F;
    pub const RESISTOR_RATIO_MAX: u8 = 0x07;
}

use self::consts::*;

/// LCD drive voltage bias ratio. The right value depends on the glass; see the module datasheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bias {
    /// 1/9 bias.
    OneNinth,
    /// 1/7 bias.
    OneSeventh,
}

/// Mapping of RAM column addresses to segment drivers (the "ADC select" setting).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentDirection {
    /// Column address 0 drives SEG0.
    Normal,
    /// Column address 0 drives SEG131, mirroring the image horizontally.
    Reverse,
}

/// Setting of the COM line scanning of rows. This is dictated by how the module wires the glass
/// to the controller; changing it flips the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM0 -> COM63.
    Normal,
    /// COM63 -> COM0.
    Reverse,
}

/// Which stages of the built-in power supply are switched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerControl {
    pub converter: bool,
    pub regulator: bool,
    pub follower: bool,
}

impl PowerControl {
    fn bits(self) -> u8 {
        (self.converter as u8) << 2 | (self.regulator as u8) << 1 | self.follower as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the display off. RAM contents are kept.
    DisplayOff,
    /// Turn the display on, showing the RAM contents.
    DisplayOn,
    /// Set which RAM row is shown on the first COM line, rolling the image. Range 0-63.
    SetStartLine(u8),
    /// Set the page address for subsequent data writes. Range 0-7.
    SetPage(u8),
    /// Set the low nibble of the column address. Range 0-15.
    SetColumnLower(u8),
    /// Set the high nibble of the column address. Range 0-15, though columns beyond 131 do not
    /// exist. (Note 1)
    SetColumnUpper(u8),
    /// Select how columns map to segment drivers.
    SetSegmentDirection(SegmentDirection),
    /// Light every pixel regardless of RAM contents (`true`) or show RAM normally (`false`).
    SetAllPoints(bool),
    /// Select the LCD bias ratio.
    SetBias(Bias),
    /// Reset the controller's internal registers to their power-on defaults.
    InternalReset,
    /// Select the COM scan direction.
    SetComScanDirection(ComScanDirection),
    /// Switch stages of the internal power supply.
    SetPowerControl(PowerControl),
    /// Set the internal V0 regulator resistor ratio. Range 0-7.
    SetResistorRatio(u8),
    /// Enter electronic volume mode. Must be followed by `SetVolume`.
    SelectVolume,
    /// Set the electronic volume (contrast). Range 0-63.
    SetVolume(u8),
}

impl Command {
    /// The command byte for this command, or `InvalidArgument` if a parameter is out of range.
    pub fn encode(self) -> Result<u8, Error> {
        let code = match self {
            Command::DisplayOff => 0xAE,
            Command::DisplayOn => 0xAF,
            Command::SetStartLine(line) => match line {
                0..=START_LINE_MAX => 0x40 | line,
                _ => return Err(Error::InvalidArgument),
            },
            Command::SetPage(page) => match page {
                0..=PAGE_MAX => 0xB0 | page,
                _ => return Err(Error::InvalidArgument),
            },
            Command::SetColumnLower(nibble) => match nibble {
                0..=0x0F => nibble,
                _ => return Err(Error::InvalidArgument),
            },
            Command::SetColumnUpper(nibble) => match nibble {
                0..=0x0F => 0x10 | nibble,
                _ => return Err(Error::InvalidArgument),
            },
            Command::SetSegmentDirection(dir) => match dir {
                SegmentDirection::Normal => 0xA0,
                SegmentDirection::Reverse => 0xA1,
            },
            Command::SetAllPoints(on) => match on {
                false => 0xA4,
                true => 0xA5,
            },
            Command::SetBias(bias) => match bias {
                Bias::OneNinth => 0xA2,
                Bias::OneSeventh => 0xA3,
            },
            Command::InternalReset => 0xE2,
            Command::SetComScanDirection(dir) => match dir {
                ComScanDirection::Normal => 0xC0,
                ComScanDirection::Reverse => 0xC8,
            },
            Command::SetPowerControl(power) => 0x28 | power.bits(),
            Command::SetResistorRatio(ratio) => match ratio {
                0..=RESISTOR_RATIO_MAX => 0x20 | ratio,
                _ => return Err(Error::InvalidArgument),
            },
            Command::SelectVolume => 0x81,
            Command::SetVolume(volume) => match volume {
                0..=VOLUME_MAX => volume,
                _ => return Err(Error::InvalidArgument),
            },
        };
        Ok(code)
    }

    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        iface.send_command(self.encode()?)
    }
}

pub enum BufCommand<'buf> {
    /// Write one page of display RAM: address `page` with the column pointer at `start_column`,
    /// then burst `data` into RAM, one byte per column. The controller auto-increments the column
    /// address but never the page, so `data` must not run past column 131.
    WritePageData {
        page: u8,
        start_column: u8,
        data: &'buf [u8],
    },
}

impl<'a> BufCommand<'a> {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error>
    where
        DI: DisplayInterface,
    {
        match self {
            BufCommand::WritePageData {
                page,
                start_column,
                data,
            } => {
                if start_column > COLUMN_MAX
                    || start_column as usize + data.len() > NUM_COLUMNS as usize
                {
                    return Err(Error::InvalidArgument);
                }
                Command::SetPage(page).send(iface)?;
                Command::SetColumnLower(start_column & 0x0F).send(iface)?;
                Command::SetColumnUpper((start_column >> 4) & 0x0F).send(iface)?;
                iface.send_data(data)
            }
        }
    }
}
