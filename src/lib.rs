//! Driver library for the Sitronix ST7565 dot matrix LCD controller.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate embedded_hal as hal;
extern crate itertools;
extern crate log;


pub mod capabilities;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod interface;

// Re-exports for primary API.
pub use capabilities::{BufferDescriptor, Capabilities, Orientation, PixelFormat, ScreenLayout};
pub use command::{consts, Bias, ComScanDirection, SegmentDirection};
pub use config::DisplayConfig;
pub use display::{Builder, Display, Display128x64};
pub use error::Error;
pub use interface::spi::SpiInterface;
