// Format-agnostic repository of textures decoded by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because the bank inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: square, 32-bit **ARGB** (0xAARRGGBB), row-major.
///
/// The texture collaborator hands over flat packed-pixel arrays; squareness
/// (size = sqrt of length) is validated on insert. Texel `0` is the
/// transparency key for billboards.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub size: usize,
    pub pixels: Vec<u32>,
}

impl Texture {
    /// Wrap a flat packed-pixel array, deriving the side length.
    pub fn from_pixels(pixels: Vec<u32>) -> Result<Self, TextureError> {
        let size = (pixels.len() as f64).sqrt() as usize;
        if size * size != pixels.len() || size == 0 {
            return Err(TextureError::NotSquare(pixels.len()));
        }
        Ok(Self { size, pixels })
    }

    #[inline]
    pub fn texel(&self, u: usize, v: usize) -> u32 {
        self.pixels[v * self.size + u]
    }
}

/// Convenience checkerboard 8x8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: u32 = 0xFF_A0A0A0;
        const DARK: u32 = 0xFF_404040;
        let mut pix = vec![0u32; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture { size: 8, pixels: pix }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Pixel array length has no integer square root.
    #[error("texture pixel array of length {0} is not square")]
    NotSquare(usize),
}

/// A format-agnostic cache of square textures.
///
/// * Does **not** know about BMP, PNG, OpenGL - that's the loader's job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
///
/// **Thread-safety:** the bank is only ever borrowed immutably during a
/// frame, so sharing it across the column fan-out needs no locking.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback. The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to the checkerboard id.
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe borrow: bad ids resolve to the checkerboard.
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.data[0])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: u32) -> Texture {
        Texture {
            size: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels[0], 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).size, 8);
    }

    #[test]
    fn non_square_rejected() {
        let err = Texture::from_pixels(vec![0; 12]).unwrap_err();
        assert_eq!(err, TextureError::NotSquare(12));
        assert_eq!(Texture::from_pixels(vec![0; 16]).unwrap().size, 4);
    }
}
