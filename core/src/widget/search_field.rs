use crate::{
    color::Color,
    draw::{Quad, Surface, TextInfo, TextMeasurer},
    event::{
        KeyboardEvent, KeyboardEventKind, Key,
        MouseEvent, MouseEventKind,
        WidgetEvent, WidgetEventKind
    },
    geometry::{Geometry, Rect},
    reactive::EventEmitter,
    theme::{Font, Theme},
    ui::{EventCtx, WidgetId},
    widget::{resize_to_text, HitState, Widget}
};

/// Construction-time overrides, merged over the theme's named defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub geometry: Geometry,
    pub text: String,
    /// Ordered candidate list for autocompletion.
    pub array: Vec<String>,
    pub fill: Option<Color>,
    pub radius: f32,
    pub font: Option<Font>,
    pub font_size: Option<f32>,
    pub font_color: Option<Color>,
    pub hint_color: Option<Color>,
    pub highlight: Option<Color>
}

/// A single-line text input with inline autocompletion drawn from a
/// fixed candidate list.
pub struct SearchField {
    id: WidgetId,
    geometry: Geometry,
    state: HitState,
    focus: bool,
    text: String,
    array: Vec<String>,
    auto_text: String,
    /// Measured pixel width of `text`, cached on every resize for
    /// cursor placement.
    text_width: f32,
    fill: Option<Color>,
    radius: f32,
    font: Font,
    font_size: f32,
    font_color: Color,
    hint_color: Color,
    highlight: Color,
    focus_color: Color,
    emitter: EventEmitter
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            text: String::new(),
            array: Vec::new(),
            fill: Some(Color::WHITE),
            radius: 0f32,
            font: None,
            font_size: None,
            font_color: None,
            hint_color: None,
            highlight: None
        }
    }
}

impl SearchField {
    pub fn new(id: WidgetId, config: Config, theme: &Theme) -> Self {
        let mut geometry = config.geometry;
        geometry.padding = theme.text_padding;

        Self {
            id,
            geometry,
            state: HitState::Idle,
            focus: false,
            text: config.text,
            array: config.array,
            auto_text: String::new(),
            text_width: 0f32,
            fill: config.fill,
            radius: config.radius,
            font: config.font.unwrap_or(theme.font),
            font_size: config.font_size.unwrap_or(theme.font_size),
            font_color: config.font_color.unwrap_or(theme.font_color),
            hint_color: config.hint_color.unwrap_or(theme.hint_color),
            highlight: config.highlight.unwrap_or(theme.highlight),
            focus_color: theme.focus,
            emitter: EventEmitter::new()
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The longest case-insensitive prefix match from the candidate
    /// list, or empty when there is none.
    #[inline]
    pub fn auto_text(&self) -> &str {
        &self.auto_text
    }

    #[inline]
    pub fn state(&self) -> HitState {
        self.state
    }

    #[inline]
    pub fn focus(&self) -> bool {
        self.focus
    }

    #[inline]
    pub fn text_width(&self) -> f32 {
        self.text_width
    }

    #[inline]
    pub fn subscribe(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.emitter.subscribe(listener);
    }

    /// Replaces the text and recomputes size and autocompletion.
    pub fn set_text(&mut self, text: impl Into<String>, measurer: &mut dyn TextMeasurer) {
        self.text = text.into();
        self.recompute_auto_text();
        self.resize(measurer);
    }

    pub fn set_array(&mut self, array: Vec<String>) {
        self.array = array;
        self.recompute_auto_text();
    }

    pub fn set_font(&mut self, font: Font, measurer: &mut dyn TextMeasurer) {
        self.font = font;
        self.resize(measurer);
    }

    pub fn set_font_size(&mut self, size: f32, measurer: &mut dyn TextMeasurer) {
        self.font_size = size;
        self.resize(measurer);
    }

    fn resize(&mut self, measurer: &mut dyn TextMeasurer) {
        let info = TextInfo::new(&self.text, self.font_size)
            .with_font(self.font);

        if let Some(width) = resize_to_text(&mut self.geometry, measurer, &info) {
            self.text_width = if self.text.is_empty() {
                0f32
            } else {
                width
            };
        }
    }

    fn apply_edit(text: &str, key: Key) -> String {
        match key {
            Key::Backspace => {
                let mut text = text.to_owned();
                text.pop();

                text
            }
            Key::Char(c) => {
                let mut text = text.to_owned();
                text.push(c);

                text
            }
            _ => text.to_owned()
        }
    }

    /// First candidate whose lowercase form starts with the lowercase
    /// text; ties resolve to first-in-list. Empty text never matches.
    fn recompute_auto_text(&mut self) {
        if self.text.is_empty() {
            self.auto_text.clear();
            return;
        }

        let needle = self.text.to_lowercase();
        let found = self.array
            .iter()
            .find(|x| x.to_lowercase().starts_with(&needle));

        match found {
            Some(found) => self.auto_text = found.clone(),
            None => self.auto_text.clear()
        }
    }
}

impl Widget for SearchField {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn mouse(&mut self, ctx: &mut EventCtx<'_>, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::Enter | MouseEventKind::Exit =>
                self.state.apply_hover(event.kind),
            MouseEventKind::Click => {
                // focus only; hit-state is deliberately left untouched
                ctx.request_keyboard_focus(self.id);

                true
            }
            MouseEventKind::Down | MouseEventKind::Up => false
        }
    }

    fn keyboard(&mut self, ctx: &mut EventCtx<'_>, event: &KeyboardEvent) -> bool {
        match event.kind {
            KeyboardEventKind::FocusIn => {
                self.focus = true;

                true
            }
            KeyboardEventKind::FocusOut => {
                self.focus = false;

                true
            }
            KeyboardEventKind::KeyDown(key) => {
                if !self.focus {
                    return false;
                }

                let accept = matches!(key, Key::Enter | Key::ArrowRight);
                if accept && !self.auto_text.is_empty() {
                    let completed = self.auto_text.clone();
                    self.set_text(completed, ctx.measurer);
                } else if !accept {
                    let edited = Self::apply_edit(&self.text, key);
                    self.set_text(edited, ctx.measurer);
                }

                self.emitter.emit(&WidgetEvent {
                    source: self.id,
                    time_stamp: event.time_stamp,
                    kind: WidgetEventKind::TextChanged
                })
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let rect = self.geometry.padding_box();
        let padding = self.geometry.padding;

        if self.state == HitState::Hover {
            surface.fill_quad(
                Quad::rounded(rect, Color::TRANSPARENT, self.radius)
                    .with_border(8f32, self.highlight)
            );
        }

        let border_color = if self.focus {
            self.focus_color
        } else {
            Color::BLACK
        };

        surface.fill_quad(
            Quad::rounded(
                rect,
                self.fill.unwrap_or(Color::TRANSPARENT),
                self.radius
            ).with_border(1f32, border_color)
        );

        // clip text if it's wider than the text area
        surface.push_clip(rect);

        let line = TextInfo::new(&self.text, self.font_size)
            .with_font(self.font)
            .line_box(rect);

        // Suggested completion ahead of the typed prefix. The match is
        // case-insensitive, so the candidate's byte offsets need not
        // line up with the typed text's; index by character count.
        let typed = self.text.chars().count();
        if let Some((offset, _)) = self.auto_text.char_indices().nth(typed) {
            let visible = &self.auto_text[offset..];
            let info = TextInfo::new(visible, self.font_size)
                .with_font(self.font);

            surface.fill_text(
                &info,
                Rect::new(
                    rect.x + padding + self.text_width,
                    line.y,
                    rect.width - padding - self.text_width,
                    line.height
                ),
                self.hint_color
            );
        }

        let info = TextInfo::new(&self.text, self.font_size)
            .with_font(self.font);

        surface.fill_text(
            &info,
            Rect::new(rect.x + padding, line.y, rect.width - padding, line.height),
            self.font_color
        );

        // simple cursor
        if self.focus {
            let cursor_x = rect.x + padding + self.text_width + 1f32;

            surface.fill_quad(Quad::new(
                Rect::new(
                    cursor_x,
                    rect.y + padding / 2f32,
                    1f32,
                    rect.height - padding
                ),
                self.font_color
            ));
        }

        surface.pop_clip();
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::{rc::Rc, cell::Cell};

    use super::*;
    use crate::{ui::EventCtx, widget::test_util::FixedMeasurer};

    fn field(array: &[&str]) -> SearchField {
        SearchField::new(
            WidgetId::default(),
            Config {
                array: array.iter().map(|x| x.to_string()).collect(),
                ..Config::default()
            },
            &Theme::light()
        )
    }

    fn focus(field: &mut SearchField, measurer: &mut FixedMeasurer) {
        let mut ctx = EventCtx::new(measurer);
        let event = KeyboardEvent::new(KeyboardEventKind::FocusIn, 0);
        assert!(field.keyboard(&mut ctx, &event));
    }

    fn type_key(field: &mut SearchField, measurer: &mut FixedMeasurer, key: Key) -> bool {
        let mut ctx = EventCtx::new(measurer);
        let event = KeyboardEvent::new(KeyboardEventKind::KeyDown(key), 42);

        field.keyboard(&mut ctx, &event)
    }

    #[test]
    fn first_prefix_match_wins() {
        let mut field = field(&["apple", "apricot"]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Char('a'));
        type_key(&mut field, &mut measurer, Key::Char('p'));
        assert_eq!(field.text(), "ap");
        assert_eq!(field.auto_text(), "apple");

        type_key(&mut field, &mut measurer, Key::Char('r'));
        assert_eq!(field.auto_text(), "apricot");

        type_key(&mut field, &mut measurer, Key::Backspace);
        assert_eq!(field.text(), "ap");
        assert_eq!(field.auto_text(), "apple");
    }

    #[test]
    fn no_match_clears_auto_text() {
        let mut field = field(&["apple", "apricot"]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Char('z'));
        assert_eq!(field.auto_text(), "");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut field = field(&["Apple"]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Char('a'));
        assert_eq!(field.auto_text(), "Apple");
    }

    #[test]
    fn enter_accepts_the_completion() {
        let mut field = field(&["apple"]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Char('a'));
        assert_eq!(field.auto_text(), "apple");

        type_key(&mut field, &mut measurer, Key::Enter);
        assert_eq!(field.text(), "apple");
        assert_eq!(field.auto_text(), "apple");
    }

    #[test]
    fn enter_without_completion_changes_nothing() {
        let mut field = field(&[]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Char('x'));
        type_key(&mut field, &mut measurer, Key::Enter);
        assert_eq!(field.text(), "x");
    }

    #[test]
    fn backspace_on_empty_text_is_a_no_op() {
        let mut field = field(&["apple"]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Backspace);
        assert_eq!(field.text(), "");
        assert_eq!(field.auto_text(), "");
    }

    #[test]
    fn keydown_emits_textchanged_only_with_listeners() {
        let mut field = field(&["apple"]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        // state mutates but the event is reported unhandled
        assert!(!type_key(&mut field, &mut measurer, Key::Char('a')));
        assert_eq!(field.text(), "a");

        let seen = Rc::new(Cell::new(0u64));
        let inner = Rc::clone(&seen);
        field.subscribe(move |event| {
            assert_eq!(event.kind, WidgetEventKind::TextChanged);
            inner.set(event.time_stamp);
        });

        assert!(type_key(&mut field, &mut measurer, Key::Char('p')));
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn keydown_without_focus_is_unhandled() {
        let mut field = field(&["apple"]);
        let mut measurer = FixedMeasurer::new();

        assert!(!type_key(&mut field, &mut measurer, Key::Char('a')));
        assert_eq!(field.text(), "");
    }

    #[test]
    fn typing_resizes_and_caches_text_width() {
        let mut field = field(&[]);
        let mut measurer = FixedMeasurer::new();
        focus(&mut field, &mut measurer);

        type_key(&mut field, &mut measurer, Key::Char('a'));
        type_key(&mut field, &mut measurer, Key::Char('b'));

        // FixedMeasurer: 8px per char, 16px line, 5px theme padding
        assert_eq!(field.text_width(), 16f32);
        assert_eq!(field.geometry().width, 26f32);
        assert_eq!(field.geometry().height, 26f32);
    }

    #[test]
    fn hint_text_slices_on_char_boundaries() {
        // "ẞX" lowercases to "ßx": a one-char prefix match whose byte
        // lengths differ between the candidate and the typed text
        let mut field = field(&["ẞX"]);
        let mut measurer = FixedMeasurer::new();

        field.set_text("ß", &mut measurer);
        assert_eq!(field.auto_text(), "ẞX");

        let mut surface = TextRecorder::default();
        field.draw(&mut surface);

        assert!(surface.texts.contains(&"X".to_owned()));
    }

    #[derive(Default)]
    struct TextRecorder {
        texts: Vec<String>
    }

    impl Surface for TextRecorder {
        fn fill_quad(&mut self, _quad: Quad) { }
        fn fill_circle(&mut self, _circle: crate::draw::Circle) { }
        fn push_clip(&mut self, _clip: Rect) { }
        fn pop_clip(&mut self) { }

        fn fill_text(&mut self, info: &TextInfo<'_>, _rect: Rect, _color: Color) {
            self.texts.push(info.text.to_owned());
        }
    }

    #[test]
    fn click_requests_keyboard_focus_without_touching_state() {
        let mut field = field(&[]);
        let mut measurer = FixedMeasurer::new();

        let mut ctx = EventCtx::new(&mut measurer);
        let handled = field.mouse(
            &mut ctx,
            &MouseEvent::new(MouseEventKind::Click, 1)
        );

        assert!(handled);
        assert_eq!(field.state(), HitState::Idle);
    }

    #[test]
    fn down_and_up_are_unhandled() {
        let mut field = field(&[]);
        let mut measurer = FixedMeasurer::new();
        let mut ctx = EventCtx::new(&mut measurer);

        assert!(!field.mouse(&mut ctx, &MouseEvent::new(MouseEventKind::Down, 1)));
        assert!(!field.mouse(&mut ctx, &MouseEvent::new(MouseEventKind::Up, 2)));
        assert_eq!(field.state(), HitState::Idle);
    }
}
