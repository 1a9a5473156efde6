#[derive(Clone, Copy, PartialEq, Hash, PartialOrd, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Multiplies the color's alpha value by `opacity`.
    /// `opacity` is clamped to the 0..=1 range first.
    #[inline]
    pub fn apply_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0f32, 1f32);
        let alpha = (f32::from(self.a) / 255.0) * opacity;
        self.a = (alpha * 255.0).round() as u8;
    }
}

impl From<Color> for tiny_skia::Color {
    #[inline]
    fn from(value: Color) -> Self {
        tiny_skia::Color::from_rgba8(value.r, value.g, value.b, value.a)
    }
}
