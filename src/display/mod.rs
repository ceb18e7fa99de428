//! The main API to the display driver. `Builder` collects the resources the display needs and
//! brings the controller up; the resulting `Display` keeps the framebuffer and pushes it to the
//! controller on every write.

pub mod init;

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;

use crate::capabilities::*;
use crate::command::{BufCommand, Command};
use crate::config::DisplayConfig;
use crate::error::Error;
use crate::framebuffer::Framebuffer;
use crate::interface::DisplayInterface;

/// A `Display` for the common 128x64 modules.
pub type Display128x64<DI, RST> = Display<DI, RST, { DisplayConfig::buffer_len(128, 64) }>;

/// Collects the transport and control lines for one display and runs its bring-up.
pub struct Builder<DI, RST> {
    config: DisplayConfig,
    iface: Option<DI>,
    reset: Option<RST>,
}

impl<DI, RST> Builder<DI, RST>
where
    DI: DisplayInterface,
    RST: OutputPin,
{
    pub fn new(config: DisplayConfig) -> Self {
        Builder {
            config,
            iface: None,
            reset: None,
        }
    }

    /// The transport, which also drives the command/data select line.
    pub fn connect_interface(self, iface: DI) -> Self {
        Self {
            iface: Some(iface),
            ..self
        }
    }

    /// The GPIO output pin connected to the active-low /RES pin of the ST7565.
    pub fn connect_reset(self, reset: RST) -> Self {
        Self {
            reset: Some(reset),
            ..self
        }
    }

    /// Power up and initialize the controller, blocking for the hold times it requires, and
    /// return the ready driver with a zeroed framebuffer. The display is left blanked.
    ///
    /// Nothing is sent if the configuration is invalid or a resource is missing. If any step of
    /// the bring-up fails, the resources are dropped along with the half-initialized driver.
    pub fn init<D, const N: usize>(self, delay: &mut D) -> Result<Display<DI, RST, N>, Error>
    where
        D: DelayMs<u16>,
    {
        self.config.validate()?;
        let framebuffer = Framebuffer::new(self.config.width, self.config.height)?;
        let (mut iface, mut reset) = match (self.iface, self.reset) {
            (Some(iface), Some(reset)) => (iface, reset),
            (None, _) => {
                log::error!("Could not get transport for display");
                return Err(Error::ResourceUnavailable);
            }
            (_, None) => {
                log::error!("Could not get reset line for display");
                return Err(Error::ResourceUnavailable);
            }
        };
        log::debug!(
            "Bringing up {}x{} display, bus at {} Hz",
            self.config.width,
            self.config.height,
            self.config.bus_frequency
        );
        init::run(&mut iface, &mut reset, delay, &self.config)?;
        Ok(Display {
            iface,
            reset,
            config: self.config,
            framebuffer,
        })
    }
}

/// A driver for an initialized ST7565 display with an `N` byte framebuffer.
pub struct Display<DI, RST, const N: usize> {
    iface: DI,
    reset: RST,
    config: DisplayConfig,
    framebuffer: Framebuffer<N>,
}

impl<DI, RST, const N: usize> Display<DI, RST, N>
where
    DI: DisplayInterface,
    RST: OutputPin,
{
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Turn the display off. Display RAM, and the framebuffer, are untouched.
    pub fn blanking_on(&mut self) -> Result<(), Error> {
        log::info!("Blanking on");
        Command::DisplayOff.send(&mut self.iface)
    }

    /// Turn the display back on.
    pub fn blanking_off(&mut self) -> Result<(), Error> {
        log::info!("Blanking off");
        Command::DisplayOn.send(&mut self.iface)
    }

    /// Copy `desc.buf_size` bytes of `buf` verbatim into the framebuffer at the byte offset of
    /// pixel (`x`, `y`), then send the whole frame to the display.
    ///
    /// The data is taken to already be in the vertically tiled layout and is not merged bit by
    /// bit, so `y` should be a multiple of 8. A write that would run off the end of the
    /// framebuffer, or a descriptor claiming more bytes than `buf` holds, is rejected before
    /// anything changes.
    pub fn write(
        &mut self,
        x: u16,
        y: u16,
        desc: &BufferDescriptor,
        buf: &[u8],
    ) -> Result<(), Error> {
        let data = buf.get(..desc.buf_size).ok_or(Error::InvalidArgument)?;
        if y % 8 != 0 {
            log::warn!("Write at row {} is not page aligned", y);
        }
        let offset = self.framebuffer.offset_of(x, y);
        self.framebuffer.write(offset, data)?;
        self.sync()
    }

    /// Copy a `desc.width` x `desc.height` block of tiled pixel data to (`x`, `y`), honoring
    /// `desc.pitch`, then send the whole frame to the display. `y` and `desc.height` must be
    /// multiples of 8.
    pub fn write_tiled(
        &mut self,
        x: u16,
        y: u16,
        desc: &BufferDescriptor,
        buf: &[u8],
    ) -> Result<(), Error> {
        if y % 8 != 0 || desc.height % 8 != 0 {
            return Err(Error::InvalidArgument);
        }
        let data = buf.get(..desc.buf_size).ok_or(Error::InvalidArgument)?;
        self.framebuffer.write_tiled(
            x as usize,
            y as usize / 8,
            desc.width as usize,
            desc.height as usize / 8,
            desc.pitch as usize,
            data,
        )?;
        self.sync()
    }

    /// Send every page of the framebuffer to the controller, top to bottom.
    ///
    /// If this fails part way, the display shows a mix of old and new pages; call it again to
    /// bring the display back in line with the framebuffer.
    pub fn sync(&mut self) -> Result<(), Error> {
        let start_page = self.config.start_page();
        let start_column = self.config.start_column();
        for (page, data) in self.framebuffer.pages().enumerate() {
            BufCommand::WritePageData {
                page: start_page + page as u8,
                start_column,
                data,
            }
            .send(&mut self.iface)?;
        }
        Ok(())
    }

    /// The in-memory image, in the controller's tiled layout.
    pub fn framebuffer(&self) -> &[u8] {
        self.framebuffer.as_bytes()
    }

    /// Display RAM cannot be read back over the serial interface.
    pub fn read(
        &mut self,
        _x: u16,
        _y: u16,
        _desc: &BufferDescriptor,
        _buf: &mut [u8],
    ) -> Result<(), Error> {
        Err(Error::NotSupported)
    }

    /// The framebuffer is not exposed for direct, memory-mapped drawing.
    pub fn get_framebuffer(&mut self) -> Option<&mut [u8]> {
        None
    }

    /// There is no backlight control.
    pub fn set_brightness(&mut self, _brightness: u8) -> Result<(), Error> {
        Err(Error::NotSupported)
    }

    /// Set the electronic volume. Only the low six bits of `contrast` are used.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error> {
        log::info!("Set contrast {}", contrast);
        Command::SelectVolume.send(&mut self.iface)?;
        Command::SetVolume(contrast & 0x3F).send(&mut self.iface)
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            x_resolution: self.config.width,
            y_resolution: self.config.height,
            supported_pixel_formats: &[PixelFormat::Mono01],
            current_pixel_format: PixelFormat::Mono01,
            current_orientation: Orientation::Normal,
            screen_layout: ScreenLayout::MonoVerticalTiled,
        }
    }

    /// Only `PixelFormat::Mono01` is supported.
    pub fn set_pixel_format(&mut self, format: PixelFormat) -> Result<(), Error> {
        match format {
            PixelFormat::Mono01 => Ok(()),
            _ => {
                log::error!("Pixel format change not implemented");
                Err(Error::NotSupported)
            }
        }
    }

    /// Only `Orientation::Normal` is supported.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Error> {
        match orientation {
            Orientation::Normal => Ok(()),
            _ => {
                log::error!("Changing display orientation not implemented");
                Err(Error::NotSupported)
            }
        }
    }

    /// Give back the transport and the reset line.
    pub fn release(self) -> (DI, RST) {
        (self.iface, self.reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface, TestSpyPin};

    type TestDisplay<const N: usize> = Display<TestSpyInterface, TestSpyPin, N>;

    fn bring_up<const N: usize>(di: &TestSpyInterface, config: DisplayConfig) -> TestDisplay<N> {
        let disp = Builder::new(config)
            .connect_interface(di.split())
            .connect_reset(di.reset_pin())
            .init(&mut di.delay())
            .unwrap();
        di.clear();
        disp
    }

    /// Expected transcript of a full sync of `fb`, starting at `start_page`/`start_column`.
    fn sync_transcript(fb: &[u8], row_bytes: usize, start_page: u8, start_column: u8) -> Vec<Sent> {
        let mut sent = Vec::new();
        for (page, data) in fb.chunks(row_bytes).enumerate() {
            sent.push(Sent::Cmd(0xB0 | (start_page + page as u8)));
            sent.push(Sent::Cmd(start_column & 0x0F));
            sent.push(Sent::Cmd(0x10 | (start_column >> 4)));
            sent.push(Sent::Data(data.to_vec()));
        }
        sent
    }

    #[test]
    fn init_brings_up_and_blanks() {
        let di = TestSpyInterface::new();
        let disp: Display128x64<_, _> = Builder::new(DisplayConfig::new(128, 64))
            .connect_interface(di.split())
            .connect_reset(di.reset_pin())
            .init(&mut di.delay())
            .unwrap();
        let cmds = di.commands();
        assert_eq!(cmds.first(), Some(&0xE2));
        assert_eq!(cmds.last(), Some(&0xAE));
        assert!(di.data_blocks().is_empty());
        assert!(disp.framebuffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn init_missing_resources() {
        let di = TestSpyInterface::new();
        let no_reset = Builder::<_, TestSpyPin>::new(DisplayConfig::new(128, 64))
            .connect_interface(di.split())
            .init::<_, 1024>(&mut di.delay());
        assert_eq!(no_reset.err(), Some(Error::ResourceUnavailable));

        let no_iface = Builder::<TestSpyInterface, _>::new(DisplayConfig::new(128, 64))
            .connect_reset(di.reset_pin())
            .init::<_, 1024>(&mut di.delay());
        assert_eq!(no_iface.err(), Some(Error::ResourceUnavailable));

        // Nothing was touched.
        di.check_multi(&[]);
    }

    #[test]
    fn init_rejects_bad_geometry() {
        let di = TestSpyInterface::new();
        let bad_height = Builder::new(DisplayConfig::new(128, 60))
            .connect_interface(di.split())
            .connect_reset(di.reset_pin())
            .init::<_, 960>(&mut di.delay());
        assert_eq!(bad_height.err(), Some(Error::InvalidArgument));

        let wrong_buffer = Builder::new(DisplayConfig::new(128, 64))
            .connect_interface(di.split())
            .connect_reset(di.reset_pin())
            .init::<_, 512>(&mut di.delay());
        assert_eq!(wrong_buffer.err(), Some(Error::InvalidArgument));
        di.check_multi(&[]);
    }

    #[test]
    fn init_failure_yields_no_display() {
        let di = TestSpyInterface::new();
        di.fail_transfer(9);
        let disp = Builder::new(DisplayConfig::new(128, 64))
            .connect_interface(di.split())
            .connect_reset(di.reset_pin())
            .init::<_, 1024>(&mut di.delay());
        assert_eq!(disp.err(), Some(Error::Transport));
        assert_eq!(di.commands().len(), 9);

        let di = TestSpyInterface::new();
        di.fail_reset(1);
        let disp = Builder::new(DisplayConfig::new(128, 64))
            .connect_interface(di.split())
            .connect_reset(di.reset_pin())
            .init::<_, 1024>(&mut di.delay());
        assert_eq!(disp.err(), Some(Error::ControlLine));
        di.check_multi(&[Sent::Reset(true), Sent::DelayMs(10)]);
    }

    #[test]
    fn blanking_is_repeatable() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        disp.blanking_on().unwrap();
        disp.blanking_on().unwrap();
        disp.blanking_off().unwrap();
        di.check_multi(sends!(0xAE, 0xAE, 0xAF));
    }

    #[test]
    fn write_then_sync_full_frame() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        let data = [0xFF; 128];
        disp.write(4, 0, &BufferDescriptor::packed(128, 8), &data)
            .unwrap();

        let fb = disp.framebuffer();
        assert!(fb[..4].iter().all(|&b| b == 0));
        assert!(fb[4..132].iter().all(|&b| b == 0xFF));
        assert!(fb[132..].iter().all(|&b| b == 0));

        di.check_multi(&sync_transcript(fb, 128, 0, 0));
        let blocks = di.data_blocks();
        assert_eq!(blocks.len(), 8);
        assert!(blocks.iter().all(|b| b.len() == 128));
        assert_eq!(&blocks[0][..4], &[0, 0, 0, 0]);
        assert!(blocks[0][4..].iter().all(|&b| b == 0xFF));
        assert_eq!(&blocks[1][..4], &[0xFF; 4]);
        assert!(blocks[1][4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn tiny_write_resyncs_every_page() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        let desc = BufferDescriptor {
            buf_size: 1,
            width: 1,
            height: 8,
            pitch: 1,
        };
        disp.write(127, 56, &desc, &[0x81]).unwrap();
        assert_eq!(disp.framebuffer()[1023], 0x81);
        let cmds = di.commands();
        let pages: Vec<u8> = cmds.iter().cloned().filter(|c| c & 0xF0 == 0xB0).collect();
        assert_eq!(pages, vec![0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7]);
        assert_eq!(di.data_blocks().len(), 8);
    }

    #[test]
    fn sync_follows_configured_geometry() {
        let di = TestSpyInterface::new();
        let cfg = DisplayConfig::new(102, 32).offset(30, 16);
        let mut disp: TestDisplay<408> = bring_up(&di, cfg);
        disp.write(0, 8, &BufferDescriptor::packed(102, 8), &[0x3C; 102])
            .unwrap();
        di.check_multi(&sync_transcript(disp.framebuffer(), 102, 2, 30));
        assert_eq!(&di.commands()[..3], &[0xB2, 0x0E, 0x11]);
        assert_eq!(di.data_blocks()[1], vec![0x3C; 102]);
    }

    #[test]
    fn default_column_start_and_module_offset() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        disp.sync().unwrap();
        assert_eq!(&di.commands()[..3], &[0xB0, 0x00, 0x10]);

        // Modules whose glass starts at SEG4.
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> =
            bring_up(&di, DisplayConfig::new(128, 64).offset(4, 0));
        disp.sync().unwrap();
        di.check_multi(&sync_transcript(disp.framebuffer(), 128, 0, 4));
        assert_eq!(&di.commands()[..3], &[0xB0, 0x04, 0x10]);
    }

    #[test]
    fn write_round_trips_through_framebuffer() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        let data: Vec<u8> = (0..200).map(|i| i as u8).collect();
        let desc = BufferDescriptor {
            buf_size: data.len(),
            width: 128,
            height: 16,
            pitch: 128,
        };
        disp.write(16, 24, &desc, &data).unwrap();
        let offset = 16 + 24 * 128 / 8;
        assert_eq!(&disp.framebuffer()[offset..offset + data.len()], &data[..]);
    }

    #[test]
    fn write_out_of_bounds_is_rejected() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        let data = [0xFF; 128];
        let desc = BufferDescriptor::packed(128, 8);
        assert_eq!(
            disp.write(4, 56, &desc, &data),
            Err(Error::InvalidArgument)
        );
        // Descriptor claims more than the buffer holds.
        assert_eq!(
            disp.write(0, 0, &BufferDescriptor::packed(128, 16), &data),
            Err(Error::InvalidArgument)
        );
        assert!(disp.framebuffer().iter().all(|&b| b == 0));
        di.check_multi(&[]);
    }

    #[test]
    fn failed_sync_keeps_framebuffer() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        // Fail the data burst of page 2.
        di.fail_transfer(11);
        assert_eq!(
            disp.write(0, 0, &BufferDescriptor::packed(128, 8), &[0x55; 128]),
            Err(Error::Transport)
        );
        assert!(disp.framebuffer()[..128].iter().all(|&b| b == 0x55));
        assert_eq!(di.data_blocks().len(), 2);

        di.clear();
        disp.sync().unwrap();
        di.check_multi(&sync_transcript(disp.framebuffer(), 128, 0, 0));
    }

    #[test]
    fn write_tiled_honors_pitch() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        let desc = BufferDescriptor {
            buf_size: 6,
            width: 2,
            height: 16,
            pitch: 4,
        };
        disp.write_tiled(8, 16, &desc, &[1, 2, 0, 0, 3, 4]).unwrap();
        let fb = disp.framebuffer();
        assert_eq!(&fb[2 * 128 + 8..2 * 128 + 10], &[1, 2]);
        assert_eq!(&fb[3 * 128 + 8..3 * 128 + 10], &[3, 4]);
        assert_eq!(di.data_blocks().len(), 8);

        di.clear();
        assert_eq!(
            disp.write_tiled(8, 4, &desc, &[0; 6]),
            Err(Error::InvalidArgument)
        );
        di.check_multi(&[]);
    }

    #[test]
    fn contrast_is_sent_and_accepted() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        disp.set_contrast(0x2A).unwrap();
        disp.set_contrast(0xFF).unwrap();
        di.check_multi(sends!(0x81, 0x2A, 0x81, 0x3F));
    }

    #[test]
    fn unsupported_operations() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        let mut buf = [0u8; 16];
        let desc = BufferDescriptor::packed(16, 8);
        assert_eq!(disp.read(0, 0, &desc, &mut buf), Err(Error::NotSupported));
        assert_eq!(disp.set_brightness(128), Err(Error::NotSupported));
        assert!(disp.get_framebuffer().is_none());
        di.check_multi(&[]);
    }

    #[test]
    fn pixel_format_and_orientation() {
        let di = TestSpyInterface::new();
        let mut disp: TestDisplay<1024> = bring_up(&di, DisplayConfig::new(128, 64));
        assert!(disp.set_pixel_format(PixelFormat::Mono01).is_ok());
        for format in &[
            PixelFormat::Mono10,
            PixelFormat::Rgb565,
            PixelFormat::Bgr565,
            PixelFormat::Rgb888,
            PixelFormat::Argb8888,
        ] {
            assert_eq!(disp.set_pixel_format(*format), Err(Error::NotSupported));
        }
        assert_eq!(disp.capabilities().current_pixel_format, PixelFormat::Mono01);

        assert!(disp.set_orientation(Orientation::Normal).is_ok());
        for orientation in &[
            Orientation::Rotated90,
            Orientation::Rotated180,
            Orientation::Rotated270,
        ] {
            assert_eq!(disp.set_orientation(*orientation), Err(Error::NotSupported));
        }
        assert_eq!(disp.capabilities().current_orientation, Orientation::Normal);
        di.check_multi(&[]);
    }

    #[test]
    fn reports_capabilities() {
        let di = TestSpyInterface::new();
        let disp: TestDisplay<408> = bring_up(&di, DisplayConfig::new(102, 32));
        assert_eq!(
            disp.capabilities(),
            Capabilities {
                x_resolution: 102,
                y_resolution: 32,
                supported_pixel_formats: &[PixelFormat::Mono01],
                current_pixel_format: PixelFormat::Mono01,
                current_orientation: Orientation::Normal,
                screen_layout: ScreenLayout::MonoVerticalTiled,
            }
        );
    }
}
