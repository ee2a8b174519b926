//! The image-byte source interface for pattern fills.

use std::fmt;
use std::io;

use crate::color::Color;

/// Supplies 32-bit pixel data to the pattern loader, for example from a
/// decoded image file.
///
/// Pixels arrive in row order, either RGBA or BGRA; the pattern-load
/// call's flags say which.
pub trait ImageReader {
    /// Copies up to `buffer.len()` pixels into `buffer`, returning how
    /// many were copied. A short count means the source is running low;
    /// zero means it is empty.
    fn read_pixels(&mut self, buffer: &mut [Color]) -> usize;

    /// Repositions the source at its first pixel. Returns false if the
    /// source cannot rewind.
    fn rewind(&mut self) -> bool;
}

/// A trivial in-memory image source.
pub struct SlicePixels<'a> {
    pixels: &'a [Color],
    position: usize,
}

impl<'a> SlicePixels<'a> {
    pub fn new(pixels: &'a [Color]) -> SlicePixels<'a> {
        SlicePixels {
            pixels,
            position: 0,
        }
    }
}

impl<'a> ImageReader for SlicePixels<'a> {
    fn read_pixels(&mut self, buffer: &mut [Color]) -> usize {
        let n = buffer.len().min(self.pixels.len() - self.position);
        buffer[..n].copy_from_slice(&self.pixels[self.position..self.position + n]);
        self.position += n;
        n
    }

    fn rewind(&mut self) -> bool {
        self.position = 0;
        true
    }
}

/// Errors surfaced while decoding an image source.
#[derive(Debug)]
pub enum ImageError {
    /// The source ended before the decoder was done with it.
    UnexpectedEof,
    /// The data is not in a format the decoder supports.
    Unsupported(&'static str),
    /// A header field held an impossible value.
    BadHeader(&'static str),
    /// An underlying I/O failure.
    Io(io::Error),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ImageError::UnexpectedEof => write!(f, "unexpected end of image data"),
            ImageError::Unsupported(what) => write!(f, "unsupported image: {}", what),
            ImageError::BadHeader(what) => write!(f, "bad image header: {}", what),
            ImageError::Io(err) => write!(f, "image read error: {}", err),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ImageError {
    fn from(err: io::Error) -> ImageError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            ImageError::UnexpectedEof
        } else {
            ImageError::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_reader_drains_and_rewinds() {
        let data = [1u32, 2, 3, 4, 5];
        let mut reader = SlicePixels::new(&data);
        let mut buf = [0u32; 3];
        assert_eq!(reader.read_pixels(&mut buf), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(reader.read_pixels(&mut buf), 2);
        assert_eq!(buf[..2], [4, 5]);
        assert_eq!(reader.read_pixels(&mut buf), 0);
        assert!(reader.rewind());
        assert_eq!(reader.read_pixels(&mut buf), 3);
        assert_eq!(buf, [1, 2, 3]);
    }
}
