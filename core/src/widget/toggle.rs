use crate::{
    color::Color,
    draw::{Circle, Quad, Surface},
    event::{MouseEvent, MouseEventKind, WidgetEvent, WidgetEventKind},
    geometry::{Geometry, Point, Size},
    reactive::EventEmitter,
    theme::Theme,
    ui::{EventCtx, WidgetId},
    widget::{HitState, Widget}
};

/// Fallback width when no explicit width is supplied; toggles display
/// no text, so there is nothing to measure.
const MIN_WIDTH: f32 = 80f32;

/// Construction-time overrides, merged over the theme's named defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub geometry: Geometry,
    pub toggled: bool,
    pub radius: f32,
    pub dot_padding: f32,
    pub fill: Option<Color>,
    pub toggle_fill: Option<Color>,
    pub dot_fill: Option<Color>,
    pub highlight: Option<Color>,
    pub border_color: Option<Color>
}

/// A binary switch: press and release flips the persisted value and
/// emits `ToggleOn`/`ToggleOff`.
pub struct Toggle {
    id: WidgetId,
    geometry: Geometry,
    state: HitState,
    toggle: bool,
    radius: f32,
    dot_padding: f32,
    fill: Color,
    toggle_fill: Color,
    dot_fill: Color,
    highlight: Color,
    border_color: Color,
    emitter: EventEmitter
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            toggled: false,
            radius: 4f32,
            dot_padding: 5f32,
            fill: None,
            toggle_fill: None,
            dot_fill: Some(Color::WHITE),
            highlight: None,
            border_color: None
        }
    }
}

impl Toggle {
    pub fn new(id: WidgetId, config: Config, theme: &Theme) -> Self {
        let mut geometry = config.geometry;
        geometry.padding = theme.text_padding;

        geometry.resize(Size::new(MIN_WIDTH, theme.widget_height));

        Self {
            id,
            geometry,
            state: HitState::Idle,
            toggle: config.toggled,
            radius: config.radius,
            dot_padding: config.dot_padding,
            fill: config.fill.unwrap_or(theme.default_fill),
            toggle_fill: config.toggle_fill.unwrap_or(theme.toggle_fill),
            dot_fill: config.dot_fill.unwrap_or(Color::WHITE),
            highlight: config.highlight.unwrap_or(theme.highlight),
            border_color: config.border_color.unwrap_or(Color::BLACK),
            emitter: EventEmitter::new()
        }
    }

    /// The persisted binary value.
    #[inline]
    pub fn toggle(&self) -> bool {
        self.toggle
    }

    #[inline]
    pub fn state(&self) -> HitState {
        self.state
    }

    pub fn set_toggle(&mut self, toggle: bool) {
        self.toggle = toggle;
    }

    #[inline]
    pub fn subscribe(&mut self, listener: impl FnMut(&WidgetEvent) + 'static) {
        self.emitter.subscribe(listener);
    }

    /// The dot's position is a pure function of `toggle` and geometry:
    /// left-aligned when off, right-aligned when on.
    fn dot(&self) -> Circle {
        let rect = self.geometry.padding_box();
        let radius = (rect.height - self.dot_padding * 2f32) / 2f32;

        let x = if self.toggle {
            rect.x + rect.width - self.dot_padding - radius
        } else {
            rect.x + self.dot_padding + radius
        };

        Circle::new(
            Point::new(x, rect.y + rect.height / 2f32),
            radius,
            self.dot_fill
        ).with_border(1f32, self.border_color)
    }
}

impl Widget for Toggle {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    fn mouse(&mut self, ctx: &mut EventCtx<'_>, event: &MouseEvent) -> bool {
        match event.kind {
            MouseEventKind::Down => {
                self.state.apply(event.kind);
                ctx.request_mouse_focus(self.id);

                true
            }
            MouseEventKind::Up => {
                if !self.state.is_down() {
                    return false;
                }

                self.state = HitState::Hover;
                self.toggle = !self.toggle;

                let kind = if self.toggle {
                    WidgetEventKind::ToggleOn
                } else {
                    WidgetEventKind::ToggleOff
                };

                self.emitter.emit(&WidgetEvent {
                    source: self.id,
                    time_stamp: event.time_stamp,
                    kind
                })
            }
            MouseEventKind::Enter | MouseEventKind::Exit =>
                self.state.apply(event.kind),
            MouseEventKind::Click => false
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let rect = self.geometry.padding_box();

        if self.state != HitState::Idle {
            surface.fill_quad(
                Quad::rounded(rect, Color::TRANSPARENT, self.radius)
                    .with_border(8f32, self.highlight)
            );
        }

        let track = if self.state.is_down() {
            self.highlight
        } else if self.toggle {
            self.fill
        } else {
            self.toggle_fill
        };

        let border_width = if self.state.is_down() { 4f32 } else { 2f32 };

        surface.fill_quad(
            Quad::rounded(rect, track, self.radius)
                .with_border(border_width, self.border_color)
        );

        surface.fill_circle(self.dot());
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
