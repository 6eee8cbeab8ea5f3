//! Distance-based shading: one closed-form curve plus a per-row lookup
//! table so the floor/ceiling pass never exponentiates per pixel.

/// Brightness floor - even the farthest surface stays faintly visible.
pub const MIN_SHADE: f32 = 0.1;

/// Runtime-tunable shading curve.
///
/// `shade(d) = max(MIN_SHADE, (1 - d/max_distance)^exponent)`. Changing
/// either field invalidates any [`ShadeLut`] built from it; the renderer
/// rebuilds on `set_shading`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    pub exponent: f32,
    pub max_distance: f32,
}

impl Default for Shading {
    fn default() -> Self {
        Self {
            exponent: 5.0,
            max_distance: 64.0,
        }
    }
}

impl Shading {
    /// Brightness factor in `[MIN_SHADE, 1]` for a surface at distance `d`.
    #[inline]
    pub fn shade(&self, d: f32) -> f32 {
        // clamp the ratio so the power never sees a negative base
        let ratio = (d / self.max_distance).clamp(0.0, 1.0);
        (1.0 - ratio).powf(self.exponent).max(MIN_SHADE)
    }
}

/// Precomputed per-row brightness for the floor/ceiling projector.
///
/// Row `y` holds `shade(|h / (2y - h)|)` - the shade of the floor/ceiling
/// point whose projection lands on that row. Mirrored rows agree by
/// construction.
pub struct ShadeLut {
    rows: Vec<f32>,
}

impl ShadeLut {
    pub fn build(shading: Shading, height: usize) -> Self {
        let h = height as f32;
        let rows = (0..height)
            .map(|y| {
                let denom = 2.0 * y as f32 - h;
                let dist = if denom == 0.0 {
                    f32::INFINITY // horizon row
                } else {
                    (h / denom).abs()
                };
                shading.shade(dist)
            })
            .collect();
        Self { rows }
    }

    #[inline]
    pub fn row(&self, y: usize) -> f32 {
        self.rows[y]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Multiply each color channel by `s`, keeping alpha opaque.
#[inline]
pub fn shade_color(color: u32, s: f32) -> u32 {
    let r = ((color >> 16 & 0xFF) as f32 * s) as u32;
    let g = ((color >> 8 & 0xFF) as f32 * s) as u32;
    let b = ((color & 0xFF) as f32 * s) as u32;
    0xFF00_0000 | r << 16 | g << 8 | b
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
