//! The transport the driver speaks the controller protocol over.

use crate::error::Error;

/// A write-only channel to the controller which can tell it whether the bytes that follow are
/// commands or display memory data.
pub trait DisplayInterface {
    /// Select command mode and transfer a single command byte.
    fn send_command(&mut self, cmd: u8) -> Result<(), Error>;
    /// Select data mode and transfer `buf` as one block.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Error>;
}

pub mod spi {
    //! The SPI interface drives the "4-wire" serial mode of the controller: SCL and SI on the SPI
    //! bus, and the A0 pin on a GPIO selecting between command (low) and data (high) bytes. Chip
    //! select is left to the SPI implementation or the board.

    use hal::blocking::spi;
    use hal::digital::v2::OutputPin;

    use super::DisplayInterface;
    use crate::error::Error;

    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the ST7565, configured for 8-bit words.
        spi: SPI,
        /// A GPIO output pin connected to the A0 (command/data select) pin of the ST7565.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: spi::Write<u8>,
        DC: OutputPin,
    {
        /// Create a new SPI interface to communicate with the display driver. `spi` is the SPI
        /// master device, and `dc` is the GPIO output pin connected to the A0 pin of the ST7565.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }

        /// Give back the SPI device and the A0 pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: spi::Write<u8>,
        DC: OutputPin,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), Error> {
            self.dc.set_low().map_err(|_| Error::ControlLine)?;
            self.spi.write(&[cmd]).map_err(|_| Error::Transport)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Error> {
            self.dc.set_high().map_err(|_| Error::ControlLine)?;
            self.spi.write(buf).map_err(|_| Error::Transport)
        }
    }

}
