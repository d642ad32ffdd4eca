//! Geometric transforms on raster buffers.
//!
//! Both map formats store their cells in a scan order that is rotated or
//! mirrored relative to the editor's top-left, row-major layout. These
//! operations realign them. Each returns a freshly allocated buffer and leaves
//! the input untouched.

use crate::RasterBuffer;

/// Rotate a buffer by a quarter turn.
///
/// The output has width and height swapped. For an input of `H` rows and `W`
/// columns, the pixel at `(r, c)` moves to `(c, H - 1 - r)` when
/// `clockwise` is false and to `(W - 1 - c, r)` when it is true, so the two
/// directions undo each other.
pub fn rotate_quarter_turn(buffer: &RasterBuffer, clockwise: bool) -> RasterBuffer {
    let (width, height, channels) = buffer.shape();
    let (w, h, ch) = (width as usize, height as usize, channels as usize);

    // Output is `w` rows of `h` pixels.
    let mut out = vec![0u8; buffer.pixels().len()];

    for (index, pixel) in buffer.iter_pixels().enumerate() {
        let (r, c) = (index / w, index % w);
        let (dst_row, dst_col) = if clockwise {
            (w - 1 - c, r)
        } else {
            (c, h - 1 - r)
        };
        let dst = (dst_row * h + dst_col) * ch;
        out[dst..dst + ch].copy_from_slice(pixel);
    }

    RasterBuffer::from_parts(height, width, channels, out)
}

/// Rotate a buffer by 180 degrees: two quarter turns in the same direction.
///
/// The pixel at `(r, c)` moves to `(H - 1 - r, W - 1 - c)`, which is just the
/// pixel order reversed. The operation is its own inverse.
pub fn rotate_half_turn(buffer: &RasterBuffer) -> RasterBuffer {
    let (width, height, channels) = buffer.shape();

    let mut out = Vec::with_capacity(buffer.pixels().len());
    for pixel in buffer.iter_pixels().rev() {
        out.extend_from_slice(pixel);
    }

    RasterBuffer::from_parts(width, height, channels, out)
}

/// Mirror a buffer over its vertical axis: `(r, c)` moves to `(r, W - 1 - c)`.
pub fn flip_horizontal(buffer: &RasterBuffer) -> RasterBuffer {
    let (width, height, channels) = buffer.shape();
    let ch = channels as usize;

    let mut out = Vec::with_capacity(buffer.pixels().len());
    for row in buffer.rows() {
        for pixel in row.chunks_exact(ch).rev() {
            out.extend_from_slice(pixel);
        }
    }

    RasterBuffer::from_parts(width, height, channels, out)
}
