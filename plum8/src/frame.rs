use bitvec::prelude::*;
#[cfg(feature = "embedded-graphics")]
use embedded_graphics::{image::ImageRaw, pixelcolor::BinaryColor};

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
const ROW_BYTES: usize = WIDTH / 8;
const FRAME_BYTES: usize = ROW_BYTES * HEIGHT;

/// Pixels of the 64x32 monochrome display
///
/// Rows are stored top to bottom, `ROW_BYTES` each, with the leftmost pixel
/// in the most significant bit of a row's first byte. The same layout is
/// what `embedded-graphics` expects of a `BinaryColor` raw image.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Frame([u8; FRAME_BYTES]);

/// Read-only borrow of a `Frame`, handed out to the driving loop
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameView<'a>(&'a [u8; FRAME_BYTES]);

impl<'a> FrameView<'a> {
    pub fn as_raw(&self) -> &'a [u8] {
        self.0
    }

    /// Owned snapshot, e.g. to compare against a later state
    pub fn copy_frame(self) -> Frame {
        Frame(*self.0)
    }

    fn row(&self, y: usize) -> Option<&'a BitSlice<Msb0, u8>> {
        self.0
            .get(y * ROW_BYTES..(y + 1) * ROW_BYTES)
            .map(|bytes| bytes.view_bits::<Msb0>())
    }

    /// Pixel at (`x`, `y`), `None` off the display
    pub fn get_bit(&self, x: usize, y: usize) -> Option<&'a bool> {
        self.row(y).and_then(|row| row.get(x))
    }

    pub fn count_ones(&self) -> usize {
        self.0.view_bits::<Msb0>().count_ones()
    }

    pub fn iter_rows_as_bitslices(&self) -> impl Iterator<Item = &'a BitSlice<Msb0, u8>> {
        self.0.view_bits::<Msb0>().chunks(WIDTH)
    }

    /// Rows of pixels magnified `scale` times: every pixel is repeated
    /// `scale` times within its row and every row `scale` times in a row.
    pub fn iter_pixelwise_scaled(
        &self,
        scale: usize,
    ) -> impl Iterator<Item = impl Iterator<Item = &'a bool>> {
        self.iter_rows_as_bitslices().flat_map(move |row| {
            (0..scale).map(move |_| {
                row.iter()
                    .flat_map(move |pixel| core::iter::repeat(pixel).take(scale))
            })
        })
    }

    #[cfg(feature = "embedded-graphics")]
    pub fn as_raw_image(&self) -> ImageRaw<'a, BinaryColor> {
        ImageRaw::new(self.0, WIDTH as u32, HEIGHT as u32)
    }
}

impl Frame {
    pub fn new() -> Self {
        Self([0; FRAME_BYTES])
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView(&self.0)
    }

    pub fn clear(&mut self) {
        self.0 = [0; FRAME_BYTES];
    }

    /// XOR pixel at (`x` mod WIDTH, `y` mod HEIGHT) with `val`
    ///
    /// Returns `true` when a pixel that was on got turned off.
    pub(crate) fn xor_bit(&mut self, x: usize, y: usize, val: bool) -> bool {
        let (x, y) = (x % WIDTH, y % HEIGHT);
        let bits = self.0.view_bits_mut::<Msb0>();
        let index = y * WIDTH + x;
        let was_on = bits[index];
        bits.set(index, was_on ^ val);
        was_on && val
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}
