//! A rudimentary BMP reader: 24- and 32-bpp uncompressed images.

use std::io::{Read, Seek, SeekFrom};

use crate::color::Color;
use crate::image::{ImageError, ImageReader};
use crate::{FLAG_IMAGE_BGRA32, FLAG_IMAGE_BOTTOMUP};

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

// Info header sizes: BITMAPINFOHEADER, BITMAPV4HEADER, BITMAPV5HEADER.
const INFO_SIZE: u32 = 40;
const V4_SIZE: u32 = 108;
const V5_SIZE: u32 = 124;

/// Reads pixel data serially from a BMP image and serves it through the
/// [`ImageReader`] interface, always converting to 32 bits per pixel.
///
/// Accepts 24- and 32-bpp uncompressed data, `BI_RGB` or `BI_BITFIELDS`
/// with the standard byte-aligned masks, stored top-down or bottom-up.
/// 24-bpp pixels come out with alpha 0xFF; 32-bpp pixels keep their
/// alpha channel when the file declares one. Callers should pass the
/// reported [`flags`](Self::flags) through to the pattern loader so row
/// order and channel order are honored.
pub struct BmpReader<R: Read + Seek> {
    source: R,
    /// Byte offset of the pixel data in the source.
    offset: u64,
    width: i32,
    height: i32,
    bpp: u32,
    /// File alpha channel present (32-bpp only).
    has_alpha: bool,
    flags: u32,
    /// Padding bytes at the end of each row.
    pad: usize,
    row: i32,
    col: i32,
}

fn read_u16(source: &mut impl Read) -> Result<u16, ImageError> {
    let mut buf = [0u8; 2];
    source.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32(source: &mut impl Read) -> Result<u32, ImageError> {
    let mut buf = [0u8; 4];
    source.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

impl<R: Read + Seek> BmpReader<R> {
    /// Parses the file and info headers and positions the source at the
    /// first pixel.
    pub fn new(mut source: R) -> Result<BmpReader<R>, ImageError> {
        let mut magic = [0u8; 2];
        source.read_exact(&mut magic)?;
        if &magic != b"BM" {
            return Err(ImageError::Unsupported("not a BMP file"));
        }
        let _file_size = read_u32(&mut source)?;
        let _reserved = read_u32(&mut source)?;
        let offset = u64::from(read_u32(&mut source)?);

        let info_size = read_u32(&mut source)?;
        if info_size != INFO_SIZE && info_size != V4_SIZE && info_size != V5_SIZE {
            return Err(ImageError::Unsupported("info header type"));
        }
        let width = read_u32(&mut source)? as i32;
        let raw_height = read_u32(&mut source)? as i32;
        let _planes = read_u16(&mut source)?;
        let bpp = u32::from(read_u16(&mut source)?);
        let compression = read_u32(&mut source)?;
        // Skip image size, resolution and color-table counts.
        for _ in 0..5 {
            read_u32(&mut source)?;
        }

        if width <= 0 || raw_height == 0 {
            return Err(ImageError::BadHeader("image dimensions"));
        }
        if width > 5000 || raw_height.abs() > 5000 {
            return Err(ImageError::BadHeader("excessively large image"));
        }
        if compression != BI_RGB && compression != BI_BITFIELDS {
            return Err(ImageError::Unsupported("compressed pixel data"));
        }
        if bpp != 24 && bpp != 32 {
            return Err(ImageError::Unsupported("bits per pixel"));
        }

        // The channel masks follow the basic info header for
        // BI_BITFIELDS, and are part of the V4/V5 headers.
        let mut red_mask = 0;
        let mut green_mask = 0;
        let mut blue_mask = 0;
        let mut alpha_mask = 0;
        if compression == BI_BITFIELDS || info_size >= V4_SIZE {
            red_mask = read_u32(&mut source)?;
            green_mask = read_u32(&mut source)?;
            blue_mask = read_u32(&mut source)?;
            if info_size >= V4_SIZE {
                alpha_mask = read_u32(&mut source)?;
            }
        }
        if compression == BI_BITFIELDS {
            if green_mask != 0x0000_ff00 || (red_mask | blue_mask) != 0x00ff_00ff {
                return Err(ImageError::Unsupported("channel masks"));
            }
        }

        let mut flags = 0;
        if compression == BI_RGB || blue_mask == 0x0000_00ff {
            // Little-endian BGR byte order reads as 0xAARRGGBB words.
            flags |= FLAG_IMAGE_BGRA32;
        }
        let height = if raw_height < 0 {
            -raw_height
        } else {
            flags |= FLAG_IMAGE_BOTTOMUP;
            raw_height
        };

        let stride = (((width as u32 * bpp) + 31) & !31) >> 3;
        let pad = stride as usize - (bpp as usize >> 3) * width as usize;

        let mut reader = BmpReader {
            source,
            offset,
            width,
            height,
            bpp,
            has_alpha: alpha_mask == 0xff00_0000,
            flags,
            pad,
            row: 0,
            col: 0,
        };
        if !reader.rewind() {
            return Err(ImageError::BadHeader("pixel data offset"));
        }
        Ok(reader)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Image-orientation and channel-order flags to pass along to the
    /// pattern loader.
    #[inline]
    pub fn flags(&self) -> u32 {
        self.flags
    }
}

impl<R: Read + Seek> ImageReader for BmpReader<R> {
    fn read_pixels(&mut self, buffer: &mut [Color]) -> usize {
        let bytes_per_pixel = (self.bpp >> 3) as usize;
        let mut raw = [0u8; 4];
        raw[3] = 0xff;

        for (k, out) in buffer.iter_mut().enumerate() {
            if self.col >= self.width {
                self.row += 1;
                if self.row >= self.height {
                    return k; // past the last row
                }
                // Skip the padding at the end of the row. Padding is
                // never more than three bytes.
                if self.pad > 0 {
                    let mut padbuf = [0u8; 3];
                    if self.source.read_exact(&mut padbuf[..self.pad]).is_err() {
                        log::warn!("BMP row padding read failed at row {}", self.row);
                        return k;
                    }
                }
                self.col = 0;
            }
            if self
                .source
                .read_exact(&mut raw[..bytes_per_pixel])
                .is_err()
            {
                log::warn!("BMP pixel read past end of data");
                return k;
            }
            if self.bpp == 32 && !self.has_alpha {
                raw[3] = 0xff;
            } else if self.bpp == 24 {
                raw[3] = 0xff;
            }
            *out = u32::from_le_bytes(raw);
            self.col += 1;
        }
        buffer.len()
    }

    fn rewind(&mut self) -> bool {
        self.row = 0;
        self.col = 0;
        self.source.seek(SeekFrom::Start(self.offset)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Builds an uncompressed BMP byte stream in memory.
    fn build_bmp(width: i32, height: i32, bpp: u32, rows: &[Vec<[u8; 4]>]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"BM");
        let header_size = 14 + 40;
        out.extend_from_slice(&0u32.to_le_bytes()); // file size (unchecked)
        out.extend_from_slice(&0u32.to_le_bytes()); // reserved
        out.extend_from_slice(&(header_size as u32).to_le_bytes()); // pixel offset

        out.extend_from_slice(&40u32.to_le_bytes()); // info header size
        out.extend_from_slice(&(width as u32).to_le_bytes());
        out.extend_from_slice(&(height as u32).to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // planes
        out.extend_from_slice(&(bpp as u16).to_le_bytes());
        out.extend_from_slice(&BI_RGB.to_le_bytes());
        for _ in 0..5 {
            out.extend_from_slice(&0u32.to_le_bytes());
        }

        let stride = (((width as u32 * bpp) + 31) & !31) >> 3;
        for row in rows {
            let mut written = 0;
            for px in row {
                if bpp == 24 {
                    out.extend_from_slice(&px[..3]);
                    written += 3;
                } else {
                    out.extend_from_slice(px);
                    written += 4;
                }
            }
            for _ in written..stride as usize {
                out.push(0);
            }
        }
        out
    }

    #[test]
    fn reads_24bpp_with_padding_and_opaque_alpha() {
        // 3x2 bottom-up image; rows in file order are the bottom row
        // first. 3 pixels * 3 bytes = 9, padded to 12.
        let rows = vec![
            vec![[1, 2, 3, 0], [4, 5, 6, 0], [7, 8, 9, 0]],
            vec![[10, 11, 12, 0], [13, 14, 15, 0], [16, 17, 18, 0]],
        ];
        let data = build_bmp(3, 2, 24, &rows);
        let mut reader = BmpReader::new(Cursor::new(data)).unwrap();
        assert_eq!(reader.width(), 3);
        assert_eq!(reader.height(), 2);
        assert!(reader.flags() & FLAG_IMAGE_BOTTOMUP != 0);
        assert!(reader.flags() & FLAG_IMAGE_BGRA32 != 0);

        let mut pixels = [0u32; 6];
        assert_eq!(reader.read_pixels(&mut pixels), 6);
        // Bytes are little-endian B,G,R -> 0xffRRGGBB.
        assert_eq!(pixels[0], 0xff03_0201);
        assert_eq!(pixels[3], 0xff0c_0b0a);
        // The source is exhausted now.
        assert_eq!(reader.read_pixels(&mut pixels[..1]), 0);
        assert!(reader.rewind());
        assert_eq!(reader.read_pixels(&mut pixels[..1]), 1);
        assert_eq!(pixels[0], 0xff03_0201);
    }

    #[test]
    fn reads_32bpp_without_alpha_as_opaque() {
        let rows = vec![vec![[0x11, 0x22, 0x33, 0x00], [0x44, 0x55, 0x66, 0x00]]];
        let data = build_bmp(2, 1, 32, &rows);
        let mut reader = BmpReader::new(Cursor::new(data)).unwrap();
        let mut pixels = [0u32; 2];
        assert_eq!(reader.read_pixels(&mut pixels), 2);
        assert_eq!(pixels[0], 0xff33_2211);
        assert_eq!(pixels[1], 0xff66_5544);
    }

    #[test]
    fn top_down_image_reports_no_bottomup_flag() {
        let rows = vec![vec![[9, 9, 9, 0]]];
        let mut data = build_bmp(1, 1, 24, &rows);
        // Patch the height field (offset 14 + 8) to -1: top-down.
        let height_bytes = (-1i32 as u32).to_le_bytes();
        data[22..26].copy_from_slice(&height_bytes);
        let reader = BmpReader::new(Cursor::new(data)).unwrap();
        assert_eq!(reader.height(), 1);
        assert_eq!(reader.flags() & FLAG_IMAGE_BOTTOMUP, 0);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(matches!(
            BmpReader::new(Cursor::new(b"PNG not bmp".to_vec())),
            Err(ImageError::Unsupported(_))
        ));

        let rows = vec![vec![[0, 0, 0, 0]]];
        let mut data = build_bmp(1, 1, 24, &rows);
        data[28] = 8; // 8 bpp
        assert!(BmpReader::new(Cursor::new(data)).is_err());
    }
}
