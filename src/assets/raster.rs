// Minimal raster decoder for the asset pipeline: 24-bit uncompressed BMP,
// bottom-up or top-down. Everything else is rejected - maps and textures
// are authored in exactly this format.

use std::io::{Cursor, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use thiserror::Error;

const BMP_MAGIC: u16 = 0x4D42; // "BM"

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("i/o error reading raster: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a BMP file (magic {0:#06x})")]
    BadMagic(u16),

    #[error("unsupported BMP variant: {0}")]
    Unsupported(&'static str),
}

/// Decoded image: row-major top-down 0xAARGB pixels, alpha forced opaque.
#[derive(Debug)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Raster {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        Self::decode(&std::fs::read(path)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let mut cur = Cursor::new(bytes);

        /* ---- file header (14 bytes) --------------------------------- */
        let magic = cur.read_u16::<LittleEndian>()?;
        if magic != BMP_MAGIC {
            return Err(RasterError::BadMagic(magic));
        }
        cur.seek(SeekFrom::Current(8))?; // file size + reserved
        let data_offset = cur.read_u32::<LittleEndian>()? as u64;

        /* ---- DIB header --------------------------------------------- */
        let dib_size = cur.read_u32::<LittleEndian>()?;
        if dib_size < 40 {
            return Err(RasterError::Unsupported("pre-BITMAPINFOHEADER header"));
        }
        let width = cur.read_i32::<LittleEndian>()?;
        let raw_height = cur.read_i32::<LittleEndian>()?;
        let _planes = cur.read_u16::<LittleEndian>()?;
        let bpp = cur.read_u16::<LittleEndian>()?;
        let compression = cur.read_u32::<LittleEndian>()?;

        if bpp != 24 {
            return Err(RasterError::Unsupported("only 24-bit pixels"));
        }
        if compression != 0 {
            return Err(RasterError::Unsupported("compressed pixel data"));
        }
        if width <= 0 || raw_height == 0 {
            return Err(RasterError::Unsupported("degenerate dimensions"));
        }

        // positive height = bottom-up row order, negative = top-down
        let bottom_up = raw_height > 0;
        let width = width as usize;
        let height = raw_height.unsigned_abs() as usize;

        /* ---- pixel rows, padded to 4-byte stride -------------------- */
        let stride = (width * 3).div_ceil(4) * 4;
        let mut pixels = vec![0u32; width * height];

        cur.seek(SeekFrom::Start(data_offset))?;
        let mut row = vec![0u8; stride];
        for i in 0..height {
            std::io::Read::read_exact(&mut cur, &mut row)?;
            let y = if bottom_up { height - 1 - i } else { i };
            for x in 0..width {
                let b = row[x * 3] as u32;
                let g = row[x * 3 + 1] as u32;
                let r = row[x * 3 + 2] as u32;
                pixels[y * width + x] = 0xFF00_0000 | r << 16 | g << 8 | b;
            }
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    /// RGB channels of a pixel, for palette matching.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let p = self.pixel(x, y);
        ((p >> 16) as u8, (p >> 8) as u8, p as u8)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-built 2x2 bottom-up BMP:
    ///   top row:    red,  green
    ///   bottom row: blue, white
    fn tiny_bmp() -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(&0x4D42u16.to_le_bytes()); // "BM"
        b.extend_from_slice(&70u32.to_le_bytes()); // file size (unused)
        b.extend_from_slice(&0u32.to_le_bytes()); // reserved
        b.extend_from_slice(&54u32.to_le_bytes()); // pixel data offset
        b.extend_from_slice(&40u32.to_le_bytes()); // DIB header size
        b.extend_from_slice(&2i32.to_le_bytes()); // width
        b.extend_from_slice(&2i32.to_le_bytes()); // height (bottom-up)
        b.extend_from_slice(&1u16.to_le_bytes()); // planes
        b.extend_from_slice(&24u16.to_le_bytes()); // bpp
        b.extend_from_slice(&[0u8; 24]); // compression + remaining fields
        // bottom row first (BGR + 2 bytes padding to the 8-byte stride)
        b.extend_from_slice(&[255, 0, 0, 255, 255, 255, 0, 0]); // blue, white
        b.extend_from_slice(&[0, 0, 255, 0, 255, 0, 0, 0]); // red, green
        b
    }

    #[test]
    fn decodes_bottom_up_rows_with_padding() {
        let img = Raster::decode(&tiny_bmp()).unwrap();
        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(img.rgb(0, 0), (255, 0, 0)); // red at top-left
        assert_eq!(img.rgb(1, 0), (0, 255, 0));
        assert_eq!(img.rgb(0, 1), (0, 0, 255));
        assert_eq!(img.rgb(1, 1), (255, 255, 255));
    }

    #[test]
    fn rejects_non_bmp() {
        let err = Raster::decode(&[0x50, 0x4B, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, RasterError::BadMagic(_)));
    }

    #[test]
    fn rejects_unsupported_depth() {
        let mut bytes = tiny_bmp();
        bytes[28] = 8; // bpp field
        let err = Raster::decode(&bytes).unwrap_err();
        assert!(matches!(err, RasterError::Unsupported(_)));
    }
}
