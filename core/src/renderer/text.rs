use std::{
    cell::RefCell,
    collections::HashMap,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
    rc::Rc
};

use ahash::AHasher;
use lru::LruCache;
use cosmic_text::{
    FontSystem, Buffer, Attrs, Metrics, Shaping,
    SwashCache, SwashContent, Placement
};
use tiny_skia::{ColorU8, Mask, Pixmap, PixmapMut, PixmapPaint, Transform};

use crate::{
    color::Color,
    draw::{TextInfo, TextMeasurer},
    error::MeasureError,
    geometry::{Rect, Size}
};

const GLYPH_CACHE_SIZE: usize = 64;

/// Upper bound handed to cosmic-text when laying out; widgets here are
/// single-line, so this never constrains anything real.
const MAX_LAYOUT_SIZE: f32 = 4096f32;

/// Shared text shaping state: one `FontSystem` serving both synchronous
/// widget measurement and the renderer's glyph rasterization.
///
/// Cheap to clone; all clones share the same caches. Single-threaded by
/// design, like everything else that touches widget state.
#[derive(Clone)]
pub struct TextEngine {
    inner: Rc<RefCell<Inner>>
}

struct Inner {
    font_system: FontSystem,
    swash: SwashCache,
    measured: HashMap<CacheKey, Size>,
    glyphs: LruCache<GlyphKey, Glyph>
}

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
struct CacheKey(u64);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct GlyphKey {
    swash_key: cosmic_text::CacheKey,
    /// RGB color
    color: [u8; 3]
}

struct Glyph {
    image: Pixmap,
    placement: Placement
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                font_system: FontSystem::new(),
                swash: SwashCache::new(),
                measured: HashMap::new(),
                glyphs: LruCache::new(
                    NonZeroUsize::new(GLYPH_CACHE_SIZE)
                        .expect("cache size is non-zero")
                )
            }))
        }
    }

    pub(super) fn draw(
        &self,
        pixmap: &mut PixmapMut,
        mask: Option<&Mask>,
        info: &TextInfo,
        rect: Rect,
        color: Color
    ) {
        let inner = &mut *self.inner.borrow_mut();
        let buffer = inner.shape(info, rect.size());

        for run in buffer.layout_runs() {
            for glyph in run.glyphs {
                let phys_glyph = glyph.physical((0., 0.), 1f32);
                let key = GlyphKey {
                    swash_key: phys_glyph.cache_key,
                    color: [color.r, color.g, color.b]
                };

                let Some(glyph) = glyph_image(
                    &mut inner.glyphs,
                    &mut inner.font_system,
                    &mut inner.swash,
                    key
                ) else {
                    continue;
                };

                pixmap.draw_pixmap(
                    rect.x as i32 + phys_glyph.x + glyph.placement.left,
                    rect.y as i32 + phys_glyph.y - glyph.placement.top +
                        run.line_y.round() as i32,
                    glyph.image.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    mask
                );
            }
        }
    }
}

impl TextMeasurer for TextEngine {
    fn measure(&mut self, info: &TextInfo) -> Result<Size, MeasureError> {
        if !info.size.is_finite() || info.size <= 0f32 {
            return Err(MeasureError::DegenerateFontSize(info.size));
        }

        let key = CacheKey::new(info);
        let inner = &mut *self.inner.borrow_mut();

        if let Some(size) = inner.measured.get(&key) {
            return Ok(*size);
        }

        let buffer = inner.shape(
            info,
            Size::new(MAX_LAYOUT_SIZE, MAX_LAYOUT_SIZE)
        );

        let mut lines = 0;
        let mut width = 0f32;

        for run in buffer.layout_runs() {
            lines += 1;
            width = run.line_w.max(width);
        }

        if width == 0f32 && info.text.chars().any(|c| !c.is_whitespace()) {
            return Err(MeasureError::ZeroWidthLayout(info.text.to_owned()));
        }

        let line_height = info.line_height.to_absolute(info.size);
        let size = Size::new(width, lines as f32 * line_height);

        inner.measured.insert(key, size);

        Ok(size)
    }
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn shape(&mut self, info: &TextInfo, size: Size) -> Buffer {
        let metrics = Metrics {
            font_size: info.size,
            line_height: info.line_height.to_absolute(info.size)
        };

        let attrs = Attrs {
            color_opt: None,
            family: info.font.family,
            stretch: info.font.stretch,
            style: info.font.style,
            weight: info.font.weight,
            metadata: 0
        };

        let mut buffer = Buffer::new_empty(metrics);
        buffer.set_size(&mut self.font_system, size.width, size.height);
        buffer.set_text(&mut self.font_system, info.text, attrs, Shaping::Basic);

        buffer
    }
}

fn glyph_image<'a>(
    glyphs: &'a mut LruCache<GlyphKey, Glyph>,
    font_system: &mut FontSystem,
    swash: &mut SwashCache,
    key: GlyphKey
) -> Option<&'a Glyph> {
    struct NoGlyphImageErr;

    let glyph = glyphs.try_get_or_insert(key, || {
        let Some(image) = swash.get_image_uncached(font_system, key.swash_key)
        else {
            return Err(NoGlyphImageErr);
        };

        let placement = image.placement;

        let mut pixmap = Pixmap::new(placement.width, placement.height)
            .ok_or(NoGlyphImageErr)?;

        let pixels = pixmap.pixels_mut();

        match image.content {
            SwashContent::Color => {
                let mut i = 0;

                for _ in 0..placement.height {
                    for _ in 0..placement.width {
                        let color = ColorU8::from_rgba(
                            image.data[i],
                            image.data[i + 1],
                            image.data[i + 2],
                            image.data[i + 3]
                        ).premultiply();

                        pixels[i >> 2] = color;
                        i += 4;
                    }
                }
            }
            SwashContent::Mask => {
                let [r, g, b] = key.color;
                let mut i = 0;

                for _ in 0..placement.height {
                    for _ in 0..placement.width {
                        let color = ColorU8::from_rgba(r, g, b, image.data[i])
                            .premultiply();

                        pixels[i] = color;
                        i += 1;
                    }
                }
            }
            SwashContent::SubpixelMask => { }
        }

        Ok(Glyph {
            image: pixmap,
            placement
        })
    });

    glyph.ok()
}

impl CacheKey {
    fn new(info: &TextInfo) -> Self {
        let mut hasher = AHasher::default();
        info.text.hash(&mut hasher);
        info.size.to_bits().hash(&mut hasher);
        info.line_height.hash(&mut hasher);
        info.font.hash(&mut hasher);

        Self(hasher.finish())
    }
}
