//! The in-memory image of the display, kept in the controller's own RAM layout so a sync is a
//! straight copy of each page.

use core::slice::ChunksExact;

use itertools::iproduct;

use crate::command::consts::PAGE_HEIGHT;
use crate::error::Error;

/// A page-major, vertically tiled monochrome framebuffer of `N` bytes.
///
/// Page `p` occupies bytes `[p * row_bytes, (p + 1) * row_bytes)`, one byte per pixel column, and
/// bit `b` of a byte is pixel row `p * 8 + b`. Each driver owns its own buffer.
pub struct Framebuffer<const N: usize> {
    buf: [u8; N],
    row_bytes: usize,
    page_count: usize,
}

impl<const N: usize> Framebuffer<N> {
    /// A zeroed framebuffer for a `width` x `height` display. `height` must be a multiple of the
    /// page height and the buffer must be exactly large enough to hold the display.
    pub fn new(width: u16, height: u16) -> Result<Self, Error> {
        if false
            || width == 0
            || height == 0
            || height % PAGE_HEIGHT != 0
            || width as usize * height as usize / 8 != N
        {
            return Err(Error::InvalidArgument);
        }
        Ok(Framebuffer {
            buf: [0; N],
            row_bytes: width as usize,
            page_count: (height / PAGE_HEIGHT) as usize,
        })
    }

    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The linear byte offset of pixel (`x`, `y`). Only meaningful when `y` is on a page
    /// boundary; otherwise it lands part way through a page band.
    pub fn offset_of(&self, x: u16, y: u16) -> usize {
        x as usize + y as usize * self.row_bytes / 8
    }

    /// Copy `data` verbatim into the buffer starting at byte `offset`.
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), Error> {
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= N)
            .ok_or(Error::InvalidArgument)?;
        self.buf[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Copy a tiled block `width` columns wide and `bands` pages tall into the buffer, with its
    /// top left corner at column `x` of page `page`. Band `b` of the block starts at
    /// `data[b * pitch]`.
    pub fn write_tiled(
        &mut self,
        x: usize,
        page: usize,
        width: usize,
        bands: usize,
        pitch: usize,
        data: &[u8],
    ) -> Result<(), Error> {
        if bands == 0 || width == 0 {
            return Ok(());
        }
        if false
            || pitch < width
            || x + width > self.row_bytes
            || page + bands > self.page_count
            || (bands - 1) * pitch + width > data.len()
        {
            return Err(Error::InvalidArgument);
        }
        for (band, col) in iproduct!(0..bands, 0..width) {
            self.buf[(page + band) * self.row_bytes + x + col] = data[band * pitch + col];
        }
        Ok(())
    }

    /// The bytes of page `page`, if the display has that many pages.
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        if page >= self.page_count {
            return None;
        }
        Some(&self.buf[page * self.row_bytes..(page + 1) * self.row_bytes])
    }

    /// All pages, top to bottom.
    pub fn pages(&self) -> ChunksExact<'_, u8> {
        self.buf.chunks_exact(self.row_bytes)
    }
}
