use slotmap::SlotMap;

use crate::{
    dispatch::{FocusDispatcher, FocusRequests},
    draw::{Surface, TextMeasurer},
    event::{
        KeyboardEvent, KeyboardEventKind, Key,
        MouseEvent, MouseEventKind
    },
    geometry::Point,
    task::Tick,
    theme::Theme,
    widget::Widget
};

slotmap::new_key_type! {
    pub struct WidgetId;
}

/// Owns the widgets, the focus dispatcher and the text measurer, and
/// translates raw pointer/keyboard input into the per-widget events of
/// [`Widget::mouse`] and [`Widget::keyboard`].
///
/// Everything here runs on one logical thread: an event handler always
/// runs to completion before the next event (pointer, keyboard or timer
/// tick) is processed.
pub struct Ui {
    widgets: SlotMap<WidgetId, Box<dyn Widget>>,
    /// Insertion order; later entries sit on top for hit-testing.
    order: Vec<WidgetId>,
    dispatcher: FocusDispatcher,
    measurer: Box<dyn TextMeasurer>,
    theme: Theme,
    cursor: Point,
    hovered: Option<WidgetId>,
    pressed: Option<WidgetId>
}

/// Handler-scoped context: text measurement for synchronous resizes and
/// the focus-request buffer. Requests are applied by the ui after the
/// handler returns, never reentrantly.
pub struct EventCtx<'a> {
    pub measurer: &'a mut dyn TextMeasurer,
    requests: FocusRequests
}

impl<'a> EventCtx<'a> {
    pub(crate) fn new(measurer: &'a mut dyn TextMeasurer) -> Self {
        Self {
            measurer,
            requests: FocusRequests::default()
        }
    }

    #[inline]
    pub fn request_mouse_focus(&mut self, id: WidgetId) {
        self.requests.mouse = Some(id);
    }

    #[inline]
    pub fn request_keyboard_focus(&mut self, id: WidgetId) {
        self.requests.keyboard = Some(id);
    }
}

impl Ui {
    pub fn new(theme: Theme, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            widgets: SlotMap::with_key(),
            order: Vec::new(),
            dispatcher: FocusDispatcher::default(),
            measurer,
            theme,
            cursor: Point::ZERO,
            hovered: None,
            pressed: None
        }
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn dispatcher(&self) -> &FocusDispatcher {
        &self.dispatcher
    }

    #[inline]
    pub fn measurer_mut(&mut self) -> &mut dyn TextMeasurer {
        self.measurer.as_mut()
    }

    /// Inserts a widget, handing it the id it will use as the `source`
    /// of its semantic events.
    pub fn insert(
        &mut self,
        build: impl FnOnce(WidgetId) -> Box<dyn Widget>
    ) -> WidgetId {
        let id = self.widgets.insert_with_key(build);
        self.order.push(id);

        id
    }

    pub fn remove(&mut self, id: WidgetId) {
        self.widgets.remove(id);
        self.order.retain(|x| *x != id);

        if self.hovered == Some(id) {
            self.hovered = None;
        }

        if self.pressed == Some(id) {
            self.pressed = None;
        }
    }

    /// Typed access to a widget, for application-level mutators like
    /// [`Timer::start`](crate::widget::Timer::start).
    pub fn get_mut<W: Widget + 'static>(&mut self, id: WidgetId) -> Option<&mut W> {
        self.widgets
            .get_mut(id)
            .and_then(|x| x.as_any_mut().downcast_mut())
    }

    pub fn get<W: Widget + 'static>(&self, id: WidgetId) -> Option<&W> {
        self.widgets
            .get(id)
            .and_then(|x| x.as_any().downcast_ref())
    }

    /// Typed access plus the measurer, for mutators with resize side
    /// effects like [`SearchField::set_text`](crate::widget::SearchField::set_text).
    pub fn with_widget<W: Widget + 'static, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W, &mut dyn TextMeasurer) -> R
    ) -> Option<R> {
        let widget = self.widgets.get_mut(id)?;
        let widget = widget.as_any_mut().downcast_mut()?;

        Some(f(widget, self.measurer.as_mut()))
    }

    /// Pointer motion: synthesizes `Enter`/`Exit` from padding-box
    /// containment transitions.
    pub fn pointer_moved(&mut self, pos: Point, time_stamp: u64) {
        self.cursor = pos;

        let hovered = self.topmost_at(pos);
        if hovered == self.hovered {
            return;
        }

        if let Some(old) = self.hovered.take() {
            self.deliver_mouse(
                old,
                MouseEvent::new(MouseEventKind::Exit, time_stamp)
            );
        }

        if let Some(new) = hovered {
            self.deliver_mouse(
                new,
                MouseEvent::new(MouseEventKind::Enter, time_stamp)
            );
        }

        self.hovered = hovered;
    }

    /// Pointer press: `Down` goes to the widgets under the cursor, top
    /// to bottom, until one consumes it.
    pub fn pointer_pressed(&mut self, time_stamp: u64) {
        self.pressed = self.topmost_at(self.cursor);
        self.propagate_at_cursor(
            MouseEvent::new(MouseEventKind::Down, time_stamp)
        );
    }

    /// Pointer release: `Up` goes to the mouse-focus holder if there is
    /// one, otherwise propagates under the cursor. If press and release
    /// landed in the same widget a `Click` follows.
    pub fn pointer_released(&mut self, time_stamp: u64) {
        let event = MouseEvent::new(MouseEventKind::Up, time_stamp);

        match self.dispatcher.mouse_focus() {
            Some(holder) => {
                self.deliver_mouse(holder, event);
            }
            None => {
                self.propagate_at_cursor(event);
            }
        }

        if let Some(pressed) = self.pressed.take() {
            if self.topmost_at(self.cursor) == Some(pressed) {
                self.deliver_mouse(
                    pressed,
                    MouseEvent::new(MouseEventKind::Click, time_stamp)
                );
            }
        }

        self.dispatcher.release_mouse_focus();
    }

    /// Keyboard input goes to the keyboard-focus holder only.
    pub fn key_down(&mut self, key: Key, time_stamp: u64) -> bool {
        let Some(holder) = self.dispatcher.keyboard_focus() else {
            return false;
        };

        self.deliver_keyboard(
            holder,
            KeyboardEvent::new(KeyboardEventKind::KeyDown(key), time_stamp)
        )
    }

    pub fn deliver_tick(&mut self, tick: Tick) {
        let Some(widget) = self.widgets.get_mut(tick.id) else {
            return;
        };

        let mut ctx = EventCtx::new(self.measurer.as_mut());
        widget.tick(&mut ctx, tick.time_stamp);

        let requests = ctx.requests;
        self.apply_requests(requests, tick.time_stamp);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for id in self.order.iter() {
            self.widgets[*id].draw(surface);
        }
    }

    fn topmost_at(&self, pos: Point) -> Option<WidgetId> {
        self.order
            .iter()
            .rev()
            .find(|id| self.widgets[**id].geometry().contains(pos))
            .copied()
    }

    fn propagate_at_cursor(&mut self, event: MouseEvent) {
        let mut targets = self.order
            .iter()
            .rev()
            .filter(|id| self.widgets[**id].geometry().contains(self.cursor))
            .copied()
            .collect::<Vec<_>>();

        for id in targets.drain(..) {
            if self.deliver_mouse(id, event) {
                break;
            }
        }
    }

    fn deliver_mouse(&mut self, id: WidgetId, event: MouseEvent) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            return false;
        };

        let mut ctx = EventCtx::new(self.measurer.as_mut());
        let handled = widget.mouse(&mut ctx, &event);

        let requests = ctx.requests;
        self.apply_requests(requests, event.time_stamp);

        handled
    }

    fn deliver_keyboard(&mut self, id: WidgetId, event: KeyboardEvent) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            return false;
        };

        let mut ctx = EventCtx::new(self.measurer.as_mut());
        let handled = widget.keyboard(&mut ctx, &event);

        let requests = ctx.requests;
        self.apply_requests(requests, event.time_stamp);

        handled
    }

    fn apply_requests(&mut self, requests: FocusRequests, time_stamp: u64) {
        if requests.is_empty() {
            return;
        }

        if let Some(id) = requests.mouse {
            self.dispatcher.grant_mouse_focus(id);
        }

        if let Some(id) = requests.keyboard {
            if self.dispatcher.keyboard_focus() != Some(id) {
                let old = self.dispatcher.grant_keyboard_focus(id);

                if let Some(old) = old {
                    self.deliver_keyboard(
                        old,
                        KeyboardEvent::new(KeyboardEventKind::FocusOut, time_stamp)
                    );
                }

                self.deliver_keyboard(
                    id,
                    KeyboardEvent::new(KeyboardEventKind::FocusIn, time_stamp)
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        theme::Theme,
        widget::{SearchField, Toggle, test_util::FixedMeasurer},
        widget::search_field,
        widget::toggle
    };

    fn ui() -> Ui {
        Ui::new(Theme::light(), Box::new(FixedMeasurer::new()))
    }

    fn add_field(ui: &mut Ui, x: f32, y: f32) -> WidgetId {
        let theme = ui.theme().clone();
        ui.insert(|id| {
            let field = SearchField::new(
                id,
                search_field::Config {
                    geometry: crate::geometry::Geometry::new(x, y)
                        .with_width(100f32)
                        .with_height(30f32),
                    ..search_field::Config::default()
                },
                &theme
            );

            Box::new(field)
        })
    }

    #[test]
    fn pointer_motion_synthesizes_enter_and_exit() {
        let mut ui = ui();
        let field = add_field(&mut ui, 0f32, 0f32);

        ui.pointer_moved(Point::new(10f32, 10f32), 1);
        assert_eq!(
            ui.get::<SearchField>(field).unwrap().state(),
            crate::widget::HitState::Hover
        );

        ui.pointer_moved(Point::new(500f32, 500f32), 2);
        assert_eq!(
            ui.get::<SearchField>(field).unwrap().state(),
            crate::widget::HitState::Idle
        );
    }

    #[test]
    fn click_moves_keyboard_focus_between_fields() {
        let mut ui = ui();
        let first = add_field(&mut ui, 0f32, 0f32);
        let second = add_field(&mut ui, 0f32, 100f32);

        ui.pointer_moved(Point::new(10f32, 10f32), 1);
        ui.pointer_pressed(2);
        ui.pointer_released(3);

        assert_eq!(ui.dispatcher().keyboard_focus(), Some(first));
        assert!(ui.get::<SearchField>(first).unwrap().focus());

        ui.pointer_moved(Point::new(10f32, 110f32), 4);
        ui.pointer_pressed(5);
        ui.pointer_released(6);

        assert_eq!(ui.dispatcher().keyboard_focus(), Some(second));
        assert!(!ui.get::<SearchField>(first).unwrap().focus());
        assert!(ui.get::<SearchField>(second).unwrap().focus());
    }

    #[test]
    fn unhandled_press_propagates_to_widget_beneath() {
        let mut ui = ui();

        let theme = ui.theme().clone();
        let below = ui.insert(|id| {
            Box::new(Toggle::new(
                id,
                toggle::Config {
                    geometry: crate::geometry::Geometry::new(0f32, 0f32)
                        .with_width(100f32)
                        .with_height(30f32),
                    ..toggle::Config::default()
                },
                &theme
            ))
        });

        // search fields do not consume `Down`
        let top = add_field(&mut ui, 0f32, 0f32);

        ui.pointer_moved(Point::new(10f32, 10f32), 1);
        ui.pointer_pressed(2);

        assert_eq!(
            ui.get::<Toggle>(below).unwrap().state(),
            crate::widget::HitState::Down
        );
        assert_eq!(ui.dispatcher().mouse_focus(), Some(below));
        let _ = top;
    }

    #[test]
    fn key_down_without_focus_holder_is_unhandled() {
        let mut ui = ui();
        add_field(&mut ui, 0f32, 0f32);

        assert!(!ui.key_down(Key::Char('a'), 1));
    }
}
