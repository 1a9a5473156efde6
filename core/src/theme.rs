use cosmic_text::{Family, Stretch, Style, Weight};

use crate::color::Color;

/// Named defaults shared by all widgets. Per-widget config structs are
/// merged over these at construction, so field-initializer order never
/// decides what a widget looks like.
#[derive(Clone, Debug)]
pub struct Theme {
    pub font: Font,
    pub font_size: f32,
    pub text_padding: f32,
    pub widget_height: f32,
    pub min_element_size: f32,
    pub default_fill: Color,
    pub highlight: Color,
    pub focus: Color,
    pub font_color: Color,
    /// Color of the suggested completion shown ahead of the typed prefix.
    pub hint_color: Color,
    pub toggle_fill: Color
}

#[derive(Clone, Copy, PartialEq, Hash, Debug)]
pub struct Font {
    pub family: Family<'static>,
    pub stretch: Stretch,
    pub style: Style,
    pub weight: Weight
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font: Font::default(),
            font_size: 16f32,
            text_padding: 5f32,
            widget_height: 32f32,
            min_element_size: 32f32,
            default_fill: Color::rgb(211, 211, 211),
            highlight: Color::rgb(135, 206, 250),
            focus: Color::rgb(0, 0, 205),
            font_color: Color::BLACK,
            hint_color: Color::rgb(176, 176, 176),
            toggle_fill: Color::rgb(128, 128, 128)
        }
    }
}

impl Default for Theme {
    #[inline]
    fn default() -> Self {
        Self::light()
    }
}

impl Default for Font {
    #[inline]
    fn default() -> Self {
        Self {
            family: Family::SansSerif,
            stretch: Stretch::Normal,
            style: Style::Normal,
            weight: Weight::NORMAL
        }
    }
}
